//! Kubernetes exec credential plugin output.

use chrono::{DateTime, SecondsFormat, Utc};
use eks_credentials::Token;
use serde::Serialize;

/// API version of the emitted `ExecCredential`.
pub const EXEC_CREDENTIAL_API_VERSION: &str = "client.authentication.k8s.io/v1beta1";

/// `ExecCredential` document printed for kubectl's exec credential plugin.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecCredential {
    api_version: &'static str,
    kind: &'static str,
    spec: ExecCredentialSpec,
    status: ExecCredentialStatus,
}

#[derive(Debug, Clone, Default, Serialize)]
struct ExecCredentialSpec {}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExecCredentialStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    expiration_timestamp: Option<String>,
    token: String,
}

impl ExecCredential {
    /// Wrap `token`, taking the expiry from its embedded signature.
    pub fn new(token: &Token) -> Self {
        Self::with_expiration(token, token.expiration())
    }

    /// Wrap `token` with an explicit expiry.
    pub fn with_expiration(token: &Token, expiration: Option<DateTime<Utc>>) -> Self {
        Self {
            api_version: EXEC_CREDENTIAL_API_VERSION,
            kind: "ExecCredential",
            spec: ExecCredentialSpec::default(),
            status: ExecCredentialStatus {
                expiration_timestamp: expiration
                    .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true)),
                token: token.as_str().to_string(),
            },
        }
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
