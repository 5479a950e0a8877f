//! Deterministic stand-ins for tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use url::Url;

use crate::SigningError;
use crate::identity::{PresignOverrides, Presigner};
use crate::sigv4::PresignedRequest;

#[derive(Debug, Default)]
struct State {
    responses: VecDeque<Result<Url, String>>,
    fallback: Option<Url>,
    pending: bool,
    calls: Vec<PresignOverrides>,
}

/// A [`Presigner`] that answers with canned URLs and records every
/// [`PresignOverrides`] it receives.
///
/// Queued responses are consumed in order; once exhausted, the fallback URL
/// (if any) is returned for every further call. Clones share state, so a
/// test can keep a handle while the generator owns another.
///
/// # Examples
///
/// ```
/// use eks_credentials::helpers::StaticPresigner;
/// use eks_credentials::{ClusterId, TokenGenerator};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let presigner = StaticPresigner::returning("http://example/com")?;
/// let generator = TokenGenerator::new(presigner.clone());
///
/// let token = generator
///     .generate_token(&ClusterId::new("foo")?, &CancellationToken::new())
///     .await?;
///
/// assert_eq!(token.as_str(), "k8s-aws-v1.aHR0cDovL2V4YW1wbGUvY29t");
/// assert_eq!(presigner.calls().await.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticPresigner {
    state: Arc<Mutex<State>>,
}

impl StaticPresigner {
    /// Create a presigner with no responses; every call fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a presigner that always answers with `url`.
    pub fn returning(url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            state: Arc::new(Mutex::new(State {
                fallback: Some(Url::parse(url)?),
                ..State::default()
            })),
        })
    }

    /// Create a presigner that answers with `urls` in order.
    pub fn sequence<'a>(
        urls: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, url::ParseError> {
        let mut responses = VecDeque::new();
        for url in urls {
            responses.push_back(Ok(Url::parse(url)?));
        }

        Ok(Self {
            state: Arc::new(Mutex::new(State {
                responses,
                ..State::default()
            })),
        })
    }

    /// Create a presigner whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        let message = message.into();
        let mut responses = VecDeque::new();
        responses.push_back(Err(message));

        Self {
            state: Arc::new(Mutex::new(State {
                responses,
                ..State::default()
            })),
        }
    }

    /// Create a presigner that records each call and then never answers.
    pub fn pending() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                pending: true,
                ..State::default()
            })),
        }
    }

    /// Every override set received so far, in call order.
    pub async fn calls(&self) -> Vec<PresignOverrides> {
        self.state.lock().await.calls.clone()
    }

    /// Number of presign calls received so far.
    pub async fn call_count(&self) -> usize {
        self.state.lock().await.calls.len()
    }
}

#[async_trait]
impl Presigner for StaticPresigner {
    async fn presign_get_caller_identity(
        &self,
        overrides: &PresignOverrides,
    ) -> Result<PresignedRequest, SigningError> {
        let mut state = self.state.lock().await;
        state.calls.push(overrides.clone());

        if state.pending {
            drop(state);
            return std::future::pending().await;
        }

        let response = match state.responses.pop_front() {
            Some(Err(message)) => {
                // Failures are sticky
                state.responses.push_front(Err(message.clone()));
                Err(message)
            }
            Some(Ok(url)) => Ok(url),
            None => state
                .fallback
                .clone()
                .ok_or_else(|| "no presigned URL configured".to_string()),
        };

        let url = response.map_err(|message| SigningError::Backend(message.into()))?;

        Ok(PresignedRequest {
            url,
            method: "GET".to_string(),
            headers: overrides.headers.clone(),
        })
    }
}
