//! Cluster registries resolve a cluster identifier to connection metadata.
//!
//! [`EksRegistry`] queries the EKS `DescribeCluster` API; [`MemoryRegistry`]
//! serves metadata from memory and is meant for tests.

use async_trait::async_trait;
use eks_credentials::ClusterId;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::RegistryError;

mod eks;
pub use eks::*;

mod memory;
pub use memory::*;

/// Connection metadata of a cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterMetadata {
    /// Kubernetes API server endpoint
    pub endpoint: Url,
    /// Certificate authority, base64 encoded as transported by the registry
    pub certificate_authority: String,
    /// Cluster ARN
    pub arn: Option<String>,
    /// Kubernetes version
    pub version: Option<String>,
    /// Lifecycle status (e.g. `ACTIVE`)
    pub status: Option<String>,
}

impl ClusterMetadata {
    /// Create metadata with an endpoint and base64 encoded CA.
    pub fn new(endpoint: Url, certificate_authority: impl Into<String>) -> Self {
        Self {
            endpoint,
            certificate_authority: certificate_authority.into(),
            arn: None,
            version: None,
            status: None,
        }
    }
}

/// Looks up connection metadata for a cluster.
#[async_trait]
pub trait ClusterRegistry {
    /// Describe `cluster`, failing with [`RegistryError::NotFound`] if the
    /// registry does not know it.
    async fn describe_cluster(&self, cluster: &ClusterId) -> Result<ClusterMetadata, RegistryError>;

    /// Describe `cluster` unless `cancel` fires first, in which case the
    /// in-flight lookup is dropped and [`RegistryError::Canceled`] returned.
    async fn describe_cluster_until(
        &self,
        cluster: &ClusterId,
        cancel: &CancellationToken,
    ) -> Result<ClusterMetadata, RegistryError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(RegistryError::Canceled),
            metadata = self.describe_cluster(cluster) => metadata,
        }
    }
}
