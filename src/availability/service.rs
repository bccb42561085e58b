//! Availability service - looks an album up on every provider
//!
//! For each provider:
//! 1. Search the catalog, retrying transient failures with backoff
//! 2. Treat a permanent rejection as "not streamable"
//! 3. Match the hits against the request
//!
//! Providers are queried one after the other, Spotify first.

use std::sync::Arc;

use crate::availability::{
    domain::{AlbumRequest, LookupError, Provider, StreamResult},
    matcher,
    rdio::{self, RdioClient, oauth::Consumer},
    retry::{self, RetryPolicy, Searched, Sleeper, TokioSleeper},
    spotify::{self, SpotifyClient},
    traits::CatalogApi,
};

/// Configuration for the availability service
#[derive(Debug, Clone)]
pub struct AvailabilityConfig {
    /// ISO country code availability is judged for
    pub country: String,
    /// Rdio OAuth consumer key
    pub rdio_consumer_key: String,
    /// Rdio OAuth consumer secret
    pub rdio_consumer_secret: String,
    /// Attempts per provider call before giving up
    pub max_attempts: u32,
    pub spotify_search_url: String,
    pub rdio_api_url: String,
    pub rdio_web_origin: String,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            country: "US".to_string(),
            rdio_consumer_key: String::new(),
            rdio_consumer_secret: String::new(),
            max_attempts: retry::DEFAULT_MAX_ATTEMPTS,
            spotify_search_url: spotify::DEFAULT_SEARCH_URL.to_string(),
            rdio_api_url: rdio::DEFAULT_API_URL.to_string(),
            rdio_web_origin: rdio::DEFAULT_WEB_ORIGIN.to_string(),
        }
    }
}

/// Both providers' results for one album
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub spotify: StreamResult,
    pub rdio: StreamResult,
}

/// Service for checking album availability on every provider
pub struct AvailabilityService {
    spotify: Box<dyn CatalogApi>,
    rdio: Box<dyn CatalogApi>,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl AvailabilityService {
    /// Create a service with real HTTP clients
    pub fn new(config: &AvailabilityConfig) -> Result<Self, LookupError> {
        let spotify = SpotifyClient::new(&config.spotify_search_url, &config.country)?;
        let rdio = RdioClient::new(
            Consumer::new(&config.rdio_consumer_key, &config.rdio_consumer_secret),
            &config.rdio_api_url,
            &config.rdio_web_origin,
            &config.country,
        )?;

        Ok(Self::with_clients(
            Box::new(spotify),
            Box::new(rdio),
            RetryPolicy::new(config.max_attempts),
            Arc::new(TokioSleeper),
        ))
    }

    /// Create a service from arbitrary clients (used by tests)
    pub fn with_clients(
        spotify: Box<dyn CatalogApi>,
        rdio: Box<dyn CatalogApi>,
        policy: RetryPolicy,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            spotify,
            rdio,
            policy,
            sleeper,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    fn client(&self, provider: Provider) -> &dyn CatalogApi {
        match provider {
            Provider::Spotify => self.spotify.as_ref(),
            Provider::Rdio => self.rdio.as_ref(),
        }
    }

    /// Look an album up on one provider
    ///
    /// Fails only when the provider kept failing for the whole attempt budget.
    pub async fn lookup(
        &self,
        provider: Provider,
        request: &AlbumRequest,
    ) -> Result<StreamResult, LookupError> {
        let client = self.client(provider);

        let searched = retry::search_with_retry(
            provider,
            request,
            &self.policy,
            self.sleeper.as_ref(),
            || client.search_once(request),
        )
        .await?;

        Ok(match searched {
            Searched::Found(hits) => matcher::match_hits(&hits, request),
            Searched::Rejected { .. } => StreamResult::unavailable(),
        })
    }

    /// Look an album up on Spotify, then Rdio
    pub async fn reconcile(&self, request: &AlbumRequest) -> Result<Reconciled, LookupError> {
        let spotify = self.lookup(Provider::Spotify, request).await?;
        let rdio = self.lookup(Provider::Rdio, request).await?;
        Ok(Reconciled { spotify, rdio })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::retry::SearchAttempt;
    use crate::availability::traits::mocks::{MockCatalog, RecordingSleeper};
    use crate::test_utils::hit;
    use std::time::Duration;

    fn build_service(
        spotify: MockCatalog,
        rdio: MockCatalog,
    ) -> (AvailabilityService, Arc<RecordingSleeper>) {
        let sleeper = Arc::new(RecordingSleeper::default());
        let service = AvailabilityService::with_clients(
            Box::new(spotify),
            Box::new(rdio),
            RetryPolicy::default(),
            sleeper.clone(),
        );
        (service, sleeper)
    }

    fn pixies() -> AlbumRequest {
        AlbumRequest::new("Pixies", "Doolittle")
    }

    #[test]
    fn test_default_config() {
        let config = AvailabilityConfig::default();
        assert_eq!(config.country, "US");
        assert_eq!(config.max_attempts, 100);
        assert!(config.rdio_consumer_key.is_empty());
    }

    #[test]
    fn test_new_requires_rdio_credentials() {
        let result = AvailabilityService::new(&AvailabilityConfig::default());
        assert!(matches!(result, Err(LookupError::MissingCredentials(Provider::Rdio))));
    }

    #[test]
    fn test_new_with_credentials() {
        let config = AvailabilityConfig {
            rdio_consumer_key: "key".to_string(),
            rdio_consumer_secret: "secret".to_string(),
            max_attempts: 5,
            ..Default::default()
        };
        let service = AvailabilityService::new(&config).unwrap();
        assert_eq!(service.policy().max_attempts, 5);
    }

    #[tokio::test]
    async fn test_permanent_rejection_is_unavailable() {
        let spotify = MockCatalog::always(
            Provider::Spotify,
            SearchAttempt::PermanentRejection { status: 403 },
        );
        let (service, sleeper) = build_service(spotify, MockCatalog::with_hits(Provider::Rdio, vec![]));

        let result = service.lookup(Provider::Spotify, &pixies()).await.unwrap();

        assert_eq!(result, StreamResult::unavailable());
        assert!(sleeper.durations().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_retries_then_matches() {
        let rdio = MockCatalog::scripted(
            Provider::Rdio,
            vec![
                SearchAttempt::Retryable {
                    status: Some(500),
                    reason: "Internal Server Error".to_string(),
                },
                SearchAttempt::Retryable {
                    status: Some(200),
                    reason: "unexpected json".to_string(),
                },
            ],
            SearchAttempt::Success(vec![hit("Doolittle", &["Pixies"], "http://rdio.com/x/", true)]),
        );
        let (service, sleeper) =
            build_service(MockCatalog::with_hits(Provider::Spotify, vec![]), rdio);

        let result = service.lookup(Provider::Rdio, &pixies()).await.unwrap();

        assert!(result.can_stream);
        assert_eq!(result.url.as_deref(), Some("http://rdio.com/x/"));
        assert_eq!(
            sleeper.durations(),
            vec![Duration::from_secs(1), Duration::from_secs(4)]
        );
    }

    #[tokio::test]
    async fn test_reconcile_merges_both_providers() {
        let spotify = MockCatalog::with_hits(
            Provider::Spotify,
            vec![hit("Doolittle", &["Pixies"], "spotify:album:1", true)],
        );
        let rdio = MockCatalog::with_hits(Provider::Rdio, vec![]);
        let (service, _) = build_service(spotify, rdio);

        let reconciled = service.reconcile(&pixies()).await.unwrap();

        assert!(reconciled.spotify.can_stream);
        assert_eq!(reconciled.rdio, StreamResult::unavailable());
    }

    #[tokio::test]
    async fn test_reconcile_fails_when_provider_exhausted() {
        let (service, _) = build_service(
            MockCatalog::with_hits(Provider::Spotify, vec![]),
            MockCatalog::failing(Provider::Rdio, 502),
        );

        let result = service.reconcile(&pixies()).await;

        assert!(matches!(
            result,
            Err(LookupError::ExhaustedRetries {
                provider: Provider::Rdio,
                attempts: 100,
                ..
            })
        ));
    }
}
