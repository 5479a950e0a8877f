use eks_credentials::{ClusterId, SigningError};
use thiserror::Error;

/// Errors returned by a [`ClusterRegistry`](crate::ClusterRegistry).
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The registry does not know the cluster.
    #[error("cluster {0} was not found")]
    NotFound(ClusterId),
    /// The registry endpoint cannot address clusters.
    #[error("invalid registry endpoint: {0}")]
    InvalidEndpoint(String),
    /// The registry request could not be signed.
    #[error("failed to sign registry request: {0}")]
    Signing(#[from] SigningError),
    /// The request did not reach the registry or the response was cut short.
    #[error("registry request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The registry answered with an error status.
    #[error("registry rejected request with status {status}: {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Error message reported by the registry
        message: String,
    },
    /// The registry cannot currently serve lookups.
    #[error("registry unavailable: {0}")]
    Unavailable(String),
    /// The registry answered with an unusable description.
    #[error("invalid registry response: {0}")]
    InvalidResponse(String),
    /// The caller canceled the lookup.
    #[error("registry lookup was canceled")]
    Canceled,
}

/// Errors returned by [`ProfileBuilder::build_profile`](crate::ProfileBuilder::build_profile).
#[derive(Error, Debug)]
pub enum ProfileError {
    /// The registry failed or does not know the cluster.
    #[error("failed to look up metadata for cluster {cluster}")]
    MetadataLookupFailed {
        /// The cluster that was looked up
        cluster: ClusterId,
        /// Registry failure
        #[source]
        source: RegistryError,
    },
    /// The certificate authority is not valid standard base64.
    #[error("cluster certificate authority is not valid base64")]
    InvalidCaEncoding(#[source] base64::DecodeError),
    /// The bearer token could not be minted.
    #[error("failed to generate token")]
    TokenGenerationFailed(#[source] SigningError),
    /// The caller canceled the build.
    #[error("profile build was canceled")]
    Canceled,
}

/// Errors building an HTTP client from a connection profile.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The certificate authority is not a PEM certificate.
    #[error("invalid certificate authority: {0}")]
    Certificate(#[source] reqwest::Error),
    /// The bearer token is not a valid header value.
    #[error("invalid authorization header: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
    /// The client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

/// Errors resolving [`Config`](crate::Config).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("missing required setting {0}")]
    Missing(&'static str),
    /// An endpoint override is not a valid URL.
    #[error("invalid endpoint in {name}: {source}")]
    InvalidEndpoint {
        /// Name of the offending setting
        name: &'static str,
        /// Parse failure
        #[source]
        source: url::ParseError,
    },
    /// A derived endpoint could not be constructed.
    #[error(transparent)]
    Signing(#[from] SigningError),
}
