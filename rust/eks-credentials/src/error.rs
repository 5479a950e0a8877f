use thiserror::Error;

/// Errors that can occur while presigning or minting a token.
#[derive(Error, Debug)]
pub enum SigningError {
    /// Credentials are missing or unusable.
    #[error("invalid credentials: {0}")]
    Credentials(String),
    /// The endpoint URL is invalid (e.g., missing host).
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// Failed to parse a URL.
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    /// The signing backend rejected or failed the presign request.
    #[error("signing backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The caller canceled the operation before it completed.
    #[error("presign request was canceled")]
    Canceled,
}

/// A cluster identifier was empty.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cluster identifier must not be empty")]
pub struct InvalidClusterId;
