//! In-memory cluster registry for testing

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use eks_credentials::ClusterId;
use tokio::sync::RwLock;

use super::{ClusterMetadata, ClusterRegistry};
use crate::RegistryError;

#[derive(Debug, Clone)]
enum Entry {
    Found(ClusterMetadata),
    Failing(String),
}

/// Registry serving cluster metadata from memory.
///
/// Clones share the same clusters and lookup counter.
///
/// # Examples
///
/// ```
/// use eks_connect::{ClusterMetadata, ClusterRegistry, MemoryRegistry};
/// use eks_credentials::ClusterId;
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let registry = MemoryRegistry::new();
/// let cluster = ClusterId::new("production")?;
/// let endpoint = Url::parse("https://ABCD.gr7.eu-west-1.eks.amazonaws.com")?;
///
/// registry
///     .insert(&cluster, ClusterMetadata::new(endpoint.clone(), "LS0tLS1CRUdJTg=="))
///     .await;
///
/// let metadata = registry.describe_cluster(&cluster).await?;
/// assert_eq!(metadata.endpoint, endpoint);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    clusters: Arc<RwLock<HashMap<ClusterId, Entry>>>,
    lookups: Arc<AtomicUsize>,
}

impl MemoryRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register metadata for a cluster
    pub async fn insert(&self, cluster: &ClusterId, metadata: ClusterMetadata) {
        let mut clusters = self.clusters.write().await;
        clusters.insert(cluster.clone(), Entry::Found(metadata));
    }

    /// Make lookups of `cluster` fail with `message`
    pub async fn fail(&self, cluster: &ClusterId, message: impl Into<String>) {
        let mut clusters = self.clusters.write().await;
        clusters.insert(cluster.clone(), Entry::Failing(message.into()));
    }

    /// Number of lookups served so far
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClusterRegistry for MemoryRegistry {
    async fn describe_cluster(&self, cluster: &ClusterId) -> Result<ClusterMetadata, RegistryError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        let clusters = self.clusters.read().await;
        match clusters.get(cluster) {
            Some(Entry::Found(metadata)) => Ok(metadata.clone()),
            Some(Entry::Failing(message)) => Err(RegistryError::Unavailable(message.clone())),
            None => Err(RegistryError::NotFound(cluster.clone())),
        }
    }
}
