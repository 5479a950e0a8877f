//! Settings resolved from the process environment.

use eks_credentials::identity::{global_sts_endpoint, regional_sts_endpoint};
use eks_credentials::{Credentials, StsPresigner};
use url::Url;

use crate::{ConfigError, EksRegistry, ProfileBuilder, RegistryError};

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

const ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
const SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
const SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";
const REGION: &str = "AWS_REGION";
const DEFAULT_REGION_VAR: &str = "AWS_DEFAULT_REGION";
const STS_REGIONAL_ENDPOINTS: &str = "AWS_STS_REGIONAL_ENDPOINTS";
const ENDPOINT_URL: &str = "AWS_ENDPOINT_URL";
const ENDPOINT_URL_STS: &str = "AWS_ENDPOINT_URL_STS";
const ENDPOINT_URL_EKS: &str = "AWS_ENDPOINT_URL_EKS";

/// Credentials, region and endpoints for talking to STS and EKS.
#[derive(Debug, Clone)]
pub struct Config {
    credentials: Credentials,
    region: String,
    sts_endpoint: Url,
    sts_global: bool,
    eks_endpoint: Option<Url>,
}

impl Config {
    /// Resolve from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve from an arbitrary variable lookup. Empty values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let access_key_id = get(ACCESS_KEY_ID).ok_or(ConfigError::Missing(ACCESS_KEY_ID))?;
        let secret_access_key =
            get(SECRET_ACCESS_KEY).ok_or(ConfigError::Missing(SECRET_ACCESS_KEY))?;

        let mut credentials = Credentials::new(access_key_id, secret_access_key);
        if let Some(token) = get(SESSION_TOKEN) {
            credentials = credentials.with_session_token(token);
        }

        let region = get(REGION)
            .or_else(|| get(DEFAULT_REGION_VAR))
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let endpoint = |name: &'static str| {
            get(name)
                .map(|value| {
                    Url::parse(&value)
                        .map_err(|source| ConfigError::InvalidEndpoint { name, source })
                })
                .transpose()
        };

        let shared_endpoint = endpoint(ENDPOINT_URL)?;

        let sts_global = get(STS_REGIONAL_ENDPOINTS)
            .is_some_and(|mode| mode.eq_ignore_ascii_case("legacy"));
        let sts_override = endpoint(ENDPOINT_URL_STS)?.or_else(|| shared_endpoint.clone());
        let sts_global = sts_global && sts_override.is_none();

        let sts_endpoint = match sts_override {
            Some(url) => url,
            None if sts_global => global_sts_endpoint()?,
            None => regional_sts_endpoint(&region)?,
        };

        let eks_endpoint = endpoint(ENDPOINT_URL_EKS)?.or(shared_endpoint);

        Ok(Self {
            credentials,
            region,
            sts_endpoint,
            sts_global,
            eks_endpoint,
        })
    }

    /// Replace the region, re-deriving endpoints that were not overridden.
    pub fn with_region(mut self, region: impl Into<String>) -> Result<Self, ConfigError> {
        let previous = regional_sts_endpoint(&self.region)?;
        self.region = region.into();
        if self.sts_endpoint == previous {
            self.sts_endpoint = regional_sts_endpoint(&self.region)?;
        }
        Ok(self)
    }

    /// Get the signing region.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Get the credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Get the STS endpoint tokens are presigned against.
    pub fn sts_endpoint(&self) -> &Url {
        &self.sts_endpoint
    }

    /// Get the EKS endpoint override, if any.
    pub fn eks_endpoint(&self) -> Option<&Url> {
        self.eks_endpoint.as_ref()
    }

    /// Presigner for the configured identity. The global STS endpoint is
    /// always signed for `us-east-1`.
    pub fn presigner(&self) -> StsPresigner {
        let region = if self.sts_global {
            DEFAULT_REGION
        } else {
            self.region.as_str()
        };
        StsPresigner::new(self.credentials.clone(), region, self.sts_endpoint.clone())
    }

    /// Registry for the configured region.
    pub fn registry(&self) -> Result<EksRegistry, RegistryError> {
        match &self.eks_endpoint {
            Some(endpoint) => {
                EksRegistry::new(self.credentials.clone(), self.region.clone(), endpoint.clone())
            }
            None => EksRegistry::regional(self.credentials.clone(), self.region.clone()),
        }
    }

    /// Profile builder over [`Config::registry`] and [`Config::presigner`].
    pub fn profile_builder(&self) -> Result<ProfileBuilder<EksRegistry, StsPresigner>, RegistryError> {
        Ok(ProfileBuilder::new(self.registry()?, self.presigner()))
    }
}
