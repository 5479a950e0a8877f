//! Connection profiles pair a cluster's API endpoint and trust anchor with a
//! freshly minted bearer token.

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use eks_credentials::{ClusterId, Presigner, SigningError, Token, TokenGenerator};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Certificate, Client};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{ClientError, ClusterRegistry, ProfileError, RegistryError};

/// User agent presented by every profile.
pub const USER_AGENT: &str = concat!("eks-connect/", env!("CARGO_PKG_VERSION"));

/// Everything a client needs to reach a cluster's API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionProfile {
    bearer_token: Token,
    host: Url,
    ca_data: Vec<u8>,
    user_agent: &'static str,
}

impl ConnectionProfile {
    /// Bearer token for the `Authorization` header.
    pub fn bearer_token(&self) -> &Token {
        &self.bearer_token
    }

    /// API server endpoint.
    pub fn host(&self) -> &Url {
        &self.host
    }

    /// Decoded certificate authority bytes (PEM as served by EKS).
    pub fn ca_data(&self) -> &[u8] {
        &self.ca_data
    }

    /// User agent to present.
    pub fn user_agent(&self) -> &'static str {
        self.user_agent
    }

    /// Build an HTTP client that trusts the cluster CA and authenticates
    /// every request with the bearer token.
    pub fn http_client(&self) -> Result<Client, ClientError> {
        let certificate = Certificate::from_pem(&self.ca_data).map_err(ClientError::Certificate)?;

        let mut authorization =
            HeaderValue::from_str(&format!("Bearer {}", self.bearer_token.as_str()))?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);

        Client::builder()
            .add_root_certificate(certificate)
            .default_headers(headers)
            .user_agent(self.user_agent)
            .build()
            .map_err(ClientError::Build)
    }
}

/// Builds [`ConnectionProfile`]s from a cluster registry and a presigner.
///
/// Every build performs exactly one registry lookup and at most one
/// presign; nothing is cached between builds.
///
/// # Examples
///
/// ```
/// use eks_connect::{ClusterMetadata, MemoryRegistry, ProfileBuilder};
/// use eks_credentials::ClusterId;
/// use eks_credentials::helpers::StaticPresigner;
/// use tokio_util::sync::CancellationToken;
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let cluster = ClusterId::new("production")?;
/// let registry = MemoryRegistry::new();
/// registry
///     .insert(
///         &cluster,
///         ClusterMetadata::new(Url::parse("https://ABCD.gr7.eu-west-1.eks.amazonaws.com")?, "Y2E="),
///     )
///     .await;
///
/// let builder = ProfileBuilder::new(registry, StaticPresigner::returning("http://example/com")?);
/// let profile = builder
///     .build_profile(&cluster, &CancellationToken::new())
///     .await?;
///
/// assert_eq!(profile.ca_data(), b"ca");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ProfileBuilder<R, P> {
    registry: R,
    tokens: TokenGenerator<P>,
}

impl<R, P> ProfileBuilder<R, P>
where
    R: ClusterRegistry + Sync,
    P: Presigner,
{
    /// Create a builder over the given collaborators.
    pub fn new(registry: R, presigner: P) -> Self {
        Self {
            registry,
            tokens: TokenGenerator::new(presigner),
        }
    }

    /// Get the cluster registry.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Get the token generator.
    pub fn tokens(&self) -> &TokenGenerator<P> {
        &self.tokens
    }

    /// Build a profile for `cluster`.
    ///
    /// The certificate authority is decoded before a token is minted, so a
    /// malformed CA never reaches the signing backend.
    pub async fn build_profile(
        &self,
        cluster: &ClusterId,
        cancel: &CancellationToken,
    ) -> Result<ConnectionProfile, ProfileError> {
        let metadata = match self.registry.describe_cluster_until(cluster, cancel).await {
            Ok(metadata) => metadata,
            Err(RegistryError::Canceled) => return Err(ProfileError::Canceled),
            Err(source) => {
                return Err(ProfileError::MetadataLookupFailed {
                    cluster: cluster.clone(),
                    source,
                });
            }
        };

        let ca_data = BASE64_STANDARD
            .decode(metadata.certificate_authority.trim())
            .map_err(ProfileError::InvalidCaEncoding)?;

        let bearer_token = match self.tokens.generate_token(cluster, cancel).await {
            Ok(token) => token,
            Err(SigningError::Canceled) => return Err(ProfileError::Canceled),
            Err(error) => return Err(ProfileError::TokenGenerationFailed(error)),
        };

        Ok(ConnectionProfile {
            bearer_token,
            host: metadata.endpoint,
            ca_data,
            user_agent: USER_AGENT,
        })
    }
}
