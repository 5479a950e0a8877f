//! Kubeconfig rendering of a [`ConnectionProfile`].
//!
//! kubectl accepts JSON as well as YAML, so the document is serialized as
//! JSON and carries a single cluster, user and context named after the
//! cluster.

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use eks_credentials::ClusterId;
use serde::Serialize;

use crate::ConnectionProfile;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
struct Cluster {
    server: String,
    certificate_authority_data: String,
}

#[derive(Debug, Clone, Serialize)]
struct User {
    token: String,
}

#[derive(Debug, Clone, Serialize)]
struct Context {
    cluster: String,
    user: String,
}

#[derive(Debug, Clone, Serialize)]
struct NamedCluster {
    name: String,
    cluster: Cluster,
}

#[derive(Debug, Clone, Serialize)]
struct NamedUser {
    name: String,
    user: User,
}

#[derive(Debug, Clone, Serialize)]
struct NamedContext {
    name: String,
    context: Context,
}

/// A kubeconfig document for one cluster.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Kubeconfig {
    #[serde(rename = "apiVersion")]
    api_version: &'static str,
    kind: &'static str,
    clusters: Vec<NamedCluster>,
    users: Vec<NamedUser>,
    contexts: Vec<NamedContext>,
    current_context: String,
    preferences: Preferences,
}

#[derive(Debug, Clone, Default, Serialize)]
struct Preferences {}

impl Kubeconfig {
    /// Describe how to reach `cluster` with `profile`.
    pub fn new(cluster: &ClusterId, profile: &ConnectionProfile) -> Self {
        let name = cluster.to_string();

        Self {
            api_version: "v1",
            kind: "Config",
            clusters: vec![NamedCluster {
                name: name.clone(),
                cluster: Cluster {
                    server: profile.host().to_string(),
                    certificate_authority_data: BASE64_STANDARD.encode(profile.ca_data()),
                },
            }],
            users: vec![NamedUser {
                name: name.clone(),
                user: User {
                    token: profile.bearer_token().as_str().to_string(),
                },
            }],
            contexts: vec![NamedContext {
                name: name.clone(),
                context: Context {
                    cluster: name.clone(),
                    user: name.clone(),
                },
            }],
            current_context: name,
            preferences: Preferences::default(),
        }
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
