use async_trait::async_trait;
use eks_connect::{
    ClusterMetadata, ClusterRegistry, MemoryRegistry, ProfileBuilder, ProfileError, RegistryError,
};
use eks_credentials::helpers::StaticPresigner;
use eks_credentials::{CLUSTER_ID_HEADER, ClusterId, SigningError, TOKEN_EXPIRES};
use pretty_assertions::assert_eq;
use testresult::TestResult;
use tokio_util::sync::CancellationToken;
use url::Url;

const STUB_URL: &str = "http://example/com";
const STUB_TOKEN: &str = "k8s-aws-v1.aHR0cDovL2V4YW1wbGUvY29t";

/// A registry whose lookups never complete.
struct PendingRegistry;

#[async_trait]
impl ClusterRegistry for PendingRegistry {
    async fn describe_cluster(&self, _: &ClusterId) -> Result<ClusterMetadata, RegistryError> {
        std::future::pending().await
    }
}

async fn registry_with(
    cluster: &ClusterId,
    endpoint: &str,
    ca: &str,
) -> Result<MemoryRegistry, url::ParseError> {
    let registry = MemoryRegistry::new();
    registry
        .insert(cluster, ClusterMetadata::new(Url::parse(endpoint)?, ca))
        .await;
    Ok(registry)
}

#[tokio::test]
async fn it_builds_a_profile_from_registry_metadata() -> TestResult {
    let cluster = ClusterId::new("prod")?;
    let endpoint = "https://ABCD1234.gr7.eu-west-1.eks.amazonaws.com";
    let registry = registry_with(&cluster, endpoint, "LS0tLS1CRUdJTiBDRVJUSUZJQ0FURS0tLS0tCg==").await?;
    let presigner = StaticPresigner::returning(STUB_URL)?;

    let builder = ProfileBuilder::new(registry.clone(), presigner.clone());
    let profile = builder
        .build_profile(&cluster, &CancellationToken::new())
        .await?;

    assert_eq!(profile.host(), &Url::parse(endpoint)?);
    assert_eq!(profile.ca_data(), b"-----BEGIN CERTIFICATE-----\n");
    assert_eq!(profile.bearer_token().as_str(), STUB_TOKEN);

    assert_eq!(registry.lookups(), 1);
    let calls = presigner.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].header(CLUSTER_ID_HEADER), Some("prod"));
    assert_eq!(calls[0].expires, TOKEN_EXPIRES);

    Ok(())
}

#[tokio::test]
async fn it_fetches_metadata_on_every_build() -> TestResult {
    let cluster = ClusterId::new("prod")?;
    let registry = registry_with(&cluster, "https://prod.example.com", "Y2E=").await?;
    let presigner = StaticPresigner::sequence(["https://sts.example.com/a", "https://sts.example.com/b"])?;

    let builder = ProfileBuilder::new(registry.clone(), presigner.clone());
    let cancel = CancellationToken::new();
    let first = builder.build_profile(&cluster, &cancel).await?;
    let second = builder.build_profile(&cluster, &cancel).await?;

    assert_ne!(first.bearer_token(), second.bearer_token());
    assert_eq!(registry.lookups(), 2);
    assert_eq!(presigner.call_count().await, 2);

    Ok(())
}

#[tokio::test]
async fn it_fails_lookup_without_signing_for_unknown_clusters() -> TestResult {
    let cluster = ClusterId::new("missing")?;
    let presigner = StaticPresigner::returning(STUB_URL)?;

    let builder = ProfileBuilder::new(MemoryRegistry::new(), presigner.clone());
    let result = builder
        .build_profile(&cluster, &CancellationToken::new())
        .await;

    match result {
        Err(ProfileError::MetadataLookupFailed { cluster: failed, source }) => {
            assert_eq!(failed, cluster);
            assert!(matches!(source, RegistryError::NotFound(_)));
        }
        other => panic!("expected lookup failure, got {:?}", other),
    }
    assert_eq!(presigner.call_count().await, 0);

    Ok(())
}

#[tokio::test]
async fn it_fails_lookup_without_signing_when_the_registry_errors() -> TestResult {
    let cluster = ClusterId::new("prod")?;
    let registry = MemoryRegistry::new();
    registry.fail(&cluster, "throttled").await;
    let presigner = StaticPresigner::returning(STUB_URL)?;

    let builder = ProfileBuilder::new(registry, presigner.clone());
    let result = builder
        .build_profile(&cluster, &CancellationToken::new())
        .await;

    assert!(matches!(
        result,
        Err(ProfileError::MetadataLookupFailed {
            source: RegistryError::Unavailable(_),
            ..
        })
    ));
    assert_eq!(presigner.call_count().await, 0);

    Ok(())
}

#[tokio::test]
async fn it_rejects_malformed_certificate_authority_without_signing() -> TestResult {
    let cluster = ClusterId::new("prod")?;
    let registry = registry_with(&cluster, "https://prod.example.com", "not*base64!").await?;
    let presigner = StaticPresigner::returning(STUB_URL)?;

    let builder = ProfileBuilder::new(registry, presigner.clone());
    let result = builder
        .build_profile(&cluster, &CancellationToken::new())
        .await;

    assert!(matches!(result, Err(ProfileError::InvalidCaEncoding(_))));
    assert_eq!(presigner.call_count().await, 0);

    Ok(())
}

#[tokio::test]
async fn it_reports_signing_failures() -> TestResult {
    let cluster = ClusterId::new("prod")?;
    let registry = registry_with(&cluster, "https://prod.example.com", "Y2E=").await?;

    let builder = ProfileBuilder::new(registry, StaticPresigner::failing("access denied"));
    let result = builder
        .build_profile(&cluster, &CancellationToken::new())
        .await;

    match result {
        Err(ProfileError::TokenGenerationFailed(SigningError::Backend(cause))) => {
            assert_eq!(cause.to_string(), "access denied");
        }
        other => panic!("expected token generation failure, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn it_is_canceled_before_any_work() -> TestResult {
    let cluster = ClusterId::new("prod")?;
    let registry = registry_with(&cluster, "https://prod.example.com", "Y2E=").await?;
    let presigner = StaticPresigner::returning(STUB_URL)?;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let builder = ProfileBuilder::new(registry, presigner.clone());
    let result = builder.build_profile(&cluster, &cancel).await;

    assert!(matches!(result, Err(ProfileError::Canceled)));
    assert_eq!(presigner.call_count().await, 0);

    Ok(())
}

#[tokio::test]
async fn it_abandons_a_pending_lookup_when_canceled() -> TestResult {
    let cluster = ClusterId::new("prod")?;
    let presigner = StaticPresigner::returning(STUB_URL)?;
    let builder = ProfileBuilder::new(PendingRegistry, presigner.clone());

    let cancel = CancellationToken::new();
    let deadline = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        deadline.cancel();
    });

    let result = builder.build_profile(&cluster, &cancel).await;

    assert!(matches!(result, Err(ProfileError::Canceled)));
    assert_eq!(presigner.call_count().await, 0);

    Ok(())
}

#[tokio::test]
async fn it_is_canceled_while_signing_after_a_successful_lookup() -> TestResult {
    let cluster = ClusterId::new("prod")?;
    let registry = registry_with(&cluster, "https://prod.example.com", "Y2E=").await?;
    let presigner = StaticPresigner::pending();
    let builder = ProfileBuilder::new(registry.clone(), presigner.clone());

    let cancel = CancellationToken::new();
    let deadline = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        deadline.cancel();
    });

    let result = builder.build_profile(&cluster, &cancel).await;

    assert!(matches!(result, Err(ProfileError::Canceled)));
    assert_eq!(registry.lookups(), 1);
    assert_eq!(presigner.call_count().await, 1);

    Ok(())
}
