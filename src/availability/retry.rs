//! Retry/backoff engine shared by every catalog client.
//!
//! Each HTTP round trip is classified into a [`SearchAttempt`]; this module
//! owns the policy for what happens next.
//!
//! **Algorithm:**
//! 1. Attempt the search
//! 2. `Success` → return the payload
//! 3. `PermanentRejection` → log, return [`Searched::Rejected`] (not an error)
//! 4. `Retryable` → if the attempt budget is spent, fail with
//!    [`LookupError::ExhaustedRetries`]; otherwise log, sleep `n²` seconds
//!    where `n` is the number of failed attempts so far, and go to 1
//!
//! Sleeping goes through [`Sleeper`] so tests can observe backoff durations
//! without waiting for them.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use super::domain::{AlbumRequest, LookupError, Provider};

/// Default attempt budget per provider call
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// Outcome of a single request to a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAttempt<T> {
    /// Expected status and a body holding the result container
    Success(T),
    /// The provider refuses this query outright; retrying won't help
    PermanentRejection { status: u16 },
    /// Bad status, transport failure, or a body we couldn't use
    Retryable { status: Option<u16>, reason: String },
}

/// Terminal, non-error outcome of a retried search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Searched<T> {
    Found(T),
    Rejected { status: u16 },
}

/// How hard to retry before declaring the provider down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// Delay after `failures` consecutive failed attempts
    pub fn backoff(&self, failures: u32) -> Duration {
        Duration::from_secs(u64::from(failures).pow(2))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

/// Book-keeping for one in-flight provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryState {
    /// 1-based number of the attempt currently being made
    pub attempt: u32,
    pub max_attempts: u32,
    /// Delay scheduled before the next attempt
    pub next_backoff: Duration,
}

impl RetryState {
    pub fn new(policy: &RetryPolicy) -> Self {
        Self {
            attempt: 1,
            max_attempts: policy.max_attempts,
            next_backoff: Duration::ZERO,
        }
    }

    /// Record a failed attempt.
    ///
    /// Returns the backoff to sleep before trying again, or `None` once the
    /// budget is spent.
    pub fn record_failure(&mut self, policy: &RetryPolicy) -> Option<Duration> {
        let failures = self.attempt;
        if failures >= self.max_attempts {
            return None;
        }
        self.next_backoff = policy.backoff(failures);
        self.attempt += 1;
        Some(self.next_backoff)
    }
}

/// Blocking delay used for backoff and pacing
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real sleeper backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Drive `attempt` until it succeeds, is rejected, or the budget runs out.
pub async fn search_with_retry<F, Fut, T>(
    provider: Provider,
    request: &AlbumRequest,
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    mut attempt: F,
) -> Result<Searched<T>, LookupError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = SearchAttempt<T>>,
{
    let mut state = RetryState::new(policy);

    loop {
        tracing::debug!(
            %provider,
            artist = %request.artist,
            album = %request.album,
            attempt = state.attempt,
            "Searching catalog"
        );

        match attempt().await {
            SearchAttempt::Success(payload) => {
                if state.attempt > 1 {
                    tracing::info!(
                        %provider,
                        artist = %request.artist,
                        album = %request.album,
                        attempt = state.attempt,
                        "Search succeeded after retry"
                    );
                }
                return Ok(Searched::Found(payload));
            }
            SearchAttempt::PermanentRejection { status } => {
                tracing::info!(
                    %provider,
                    artist = %request.artist,
                    album = %request.album,
                    status,
                    "Provider rejected query, treating as not streamable"
                );
                return Ok(Searched::Rejected { status });
            }
            SearchAttempt::Retryable { status, reason } => {
                let Some(backoff) = state.record_failure(policy) else {
                    tracing::error!(
                        %provider,
                        artist = %request.artist,
                        album = %request.album,
                        status = ?status,
                        attempts = state.attempt,
                        reason = %reason,
                        "Search failed: attempt budget exhausted"
                    );
                    return Err(LookupError::ExhaustedRetries {
                        provider,
                        artist: request.artist.clone(),
                        album: request.album.clone(),
                        attempts: state.attempt,
                    });
                };

                tracing::warn!(
                    %provider,
                    artist = %request.artist,
                    album = %request.album,
                    status = ?status,
                    reason = %reason,
                    attempt = state.attempt - 1,
                    backoff_secs = backoff.as_secs(),
                    "Search failed, will retry after backoff"
                );

                sleeper.sleep(backoff).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::traits::mocks::RecordingSleeper;
    use std::cell::Cell;

    fn retryable<T>() -> SearchAttempt<T> {
        SearchAttempt::Retryable {
            status: Some(502),
            reason: "Bad Gateway".to_string(),
        }
    }

    fn request() -> AlbumRequest {
        AlbumRequest::new("Pixies", "Doolittle")
    }

    #[test]
    fn test_backoff_is_square_of_failures() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_secs(1));
        assert_eq!(policy.backoff(3), Duration::from_secs(9));
        assert_eq!(policy.backoff(10), Duration::from_secs(100));
    }

    #[test]
    fn test_policy_never_allows_zero_attempts() {
        assert_eq!(RetryPolicy::new(0).max_attempts, 1);
    }

    #[test]
    fn test_retry_state_transitions() {
        let policy = RetryPolicy::new(3);
        let mut state = RetryState::new(&policy);
        assert_eq!(state.record_failure(&policy), Some(Duration::from_secs(1)));
        assert_eq!(state.record_failure(&policy), Some(Duration::from_secs(4)));
        assert_eq!(state.attempt, 3);
        assert_eq!(state.record_failure(&policy), None);
    }

    #[tokio::test]
    async fn test_succeeds_first_attempt_without_sleeping() {
        let sleeper = RecordingSleeper::default();
        let result = search_with_retry(
            Provider::Spotify,
            &request(),
            &RetryPolicy::default(),
            &sleeper,
            || async { SearchAttempt::Success(42) },
        )
        .await;

        assert_eq!(result.unwrap(), Searched::Found(42));
        assert!(sleeper.durations().is_empty());
    }

    #[tokio::test]
    async fn test_three_failures_then_success() {
        let sleeper = RecordingSleeper::default();
        let calls = Cell::new(0u32);

        let result = search_with_retry(
            Provider::Spotify,
            &request(),
            &RetryPolicy::default(),
            &sleeper,
            || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move {
                    if n <= 3 {
                        retryable()
                    } else {
                        SearchAttempt::Success("payload")
                    }
                }
            },
        )
        .await;

        assert_eq!(result.unwrap(), Searched::Found("payload"));
        assert_eq!(calls.get(), 4);
        assert_eq!(
            sleeper.durations(),
            vec![
                Duration::from_secs(1),
                Duration::from_secs(4),
                Duration::from_secs(9)
            ]
        );
    }

    #[tokio::test]
    async fn test_permanent_rejection_is_not_retried() {
        let sleeper = RecordingSleeper::default();
        let calls = Cell::new(0u32);

        let result = search_with_retry(
            Provider::Spotify,
            &request(),
            &RetryPolicy::default(),
            &sleeper,
            || {
                calls.set(calls.get() + 1);
                async { SearchAttempt::<()>::PermanentRejection { status: 403 } }
            },
        )
        .await;

        assert_eq!(result.unwrap(), Searched::Rejected { status: 403 });
        assert_eq!(calls.get(), 1);
        assert!(sleeper.durations().is_empty());
    }

    #[tokio::test]
    async fn test_hundred_failures_is_fatal() {
        let sleeper = RecordingSleeper::default();
        let calls = Cell::new(0u32);

        let result = search_with_retry(
            Provider::Rdio,
            &request(),
            &RetryPolicy::default(),
            &sleeper,
            || {
                calls.set(calls.get() + 1);
                async { retryable::<()>() }
            },
        )
        .await;

        match result {
            Err(LookupError::ExhaustedRetries {
                provider, attempts, ..
            }) => {
                assert_eq!(provider, Provider::Rdio);
                assert_eq!(attempts, 100);
            }
            other => panic!("expected ExhaustedRetries, got {:?}", other),
        }
        assert_eq!(calls.get(), 100);
        assert_eq!(sleeper.durations().len(), 99);
        assert_eq!(sleeper.durations().last(), Some(&Duration::from_secs(99 * 99)));
    }
}
