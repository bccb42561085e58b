//! Rdio HTTP client
//!
//! Every call is a form-encoded POST to a single endpoint, signed with the
//! consumer credentials.
//!
//! ## API Quirks
//!
//! A 200 status alone does not mean success: the envelope sometimes comes
//! back without `result.results` (or with it null) under load. Those
//! responses are retried like any other failure. Rdio has no status we treat
//! as a permanent rejection.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

use super::oauth::{self, Consumer};
use super::{adapter, dto};
use crate::availability::domain::{AlbumRequest, CatalogHit, LookupError, Provider};
use crate::availability::retry::SearchAttempt;

/// Default API endpoint
pub const DEFAULT_API_URL: &str = "http://api.rdio.com/1/";

/// Default origin prepended to relative album URLs
pub const DEFAULT_WEB_ORIGIN: &str = "http://rdio.com";

/// Rdio API client
pub struct RdioClient {
    http_client: reqwest::Client,
    api_url: String,
    web_origin: String,
    country: String,
    consumer: Consumer,
}

impl RdioClient {
    /// Create a new client
    ///
    /// Fails with [`LookupError::MissingCredentials`] when the key or secret is empty.
    pub fn new(
        consumer: Consumer,
        api_url: impl Into<String>,
        web_origin: impl Into<String>,
        country: impl Into<String>,
    ) -> Result<Self, LookupError> {
        if consumer.key.is_empty() || consumer.secret.is_empty() {
            return Err(LookupError::MissingCredentials(Provider::Rdio));
        }

        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(crate::availability::USER_AGENT)
            .build()
            .map_err(|e| LookupError::Http(e.to_string()))?;

        Ok(Self {
            http_client,
            api_url: api_url.into(),
            web_origin: web_origin.into(),
            country: country.into(),
            consumer,
        })
    }

    /// Form parameters for an album search
    pub fn search_params(&self, request: &AlbumRequest) -> Vec<(&'static str, String)> {
        vec![
            ("method", "search".to_string()),
            ("query", format!("{} {}", request.artist, request.album)),
            ("types", "Album".to_string()),
            ("_region", self.country.clone()),
        ]
    }

    /// Make one signed search request and classify the outcome
    pub async fn search_once(&self, request: &AlbumRequest) -> SearchAttempt<Vec<CatalogHit>> {
        let params = self.search_params(request);

        let authorization = match oauth::authorization_header(
            &self.consumer,
            "POST",
            &self.api_url,
            &params,
            &oauth::generate_nonce(),
            oauth::timestamp_now(),
        ) {
            Ok(header) => header,
            Err(e) => {
                return SearchAttempt::Retryable {
                    status: None,
                    reason: e.to_string(),
                };
            }
        };

        let response = match self
            .http_client
            .post(&self.api_url)
            .header(AUTHORIZATION, authorization)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(form_body(&params))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return SearchAttempt::Retryable {
                    status: None,
                    reason: format!("request to {} failed: {}", self.api_url, e),
                };
            }
        };

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return SearchAttempt::Retryable {
                    status: Some(status),
                    reason: format!("failed to read body: {}", e),
                };
            }
        };

        classify(status, &body, &self.web_origin)
    }
}

/// Encode parameters as an `application/x-www-form-urlencoded` body.
///
/// Uses the same percent-encoding as the signature so both sides agree.
fn form_body(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", oauth::percent_encode(k), oauth::percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Classify a raw Rdio response
pub(crate) fn classify(
    status: u16,
    body: &str,
    web_origin: &str,
) -> SearchAttempt<Vec<CatalogHit>> {
    if status != 200 {
        return SearchAttempt::Retryable {
            status: Some(status),
            reason: reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("Unknown")
                .to_string(),
        };
    }

    match serde_json::from_str::<dto::SearchResponse>(body) {
        Ok(response) => {
            let message = response.message.clone();
            match response.into_results() {
                Some(results) => SearchAttempt::Success(adapter::to_hits(results, web_origin)),
                None => SearchAttempt::Retryable {
                    status: Some(status),
                    reason: format!(
                        "unexpected json from rdio: no result list ({})",
                        message.as_deref().unwrap_or("no message")
                    ),
                },
            }
        }
        Err(e) => SearchAttempt::Retryable {
            status: Some(status),
            reason: format!("unexpected json from rdio: {}", e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> RdioClient {
        RdioClient::new(
            Consumer::new("key", "secret"),
            DEFAULT_API_URL,
            DEFAULT_WEB_ORIGIN,
            "US",
        )
        .unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = client();
        assert_eq!(client.api_url, DEFAULT_API_URL);
        assert_eq!(client.web_origin, DEFAULT_WEB_ORIGIN);
    }

    #[test]
    fn test_missing_credentials() {
        let result = RdioClient::new(
            Consumer::new("key", ""),
            DEFAULT_API_URL,
            DEFAULT_WEB_ORIGIN,
            "US",
        );
        assert!(matches!(
            result,
            Err(LookupError::MissingCredentials(Provider::Rdio))
        ));
    }

    #[test]
    fn test_search_params() {
        let params = client().search_params(&AlbumRequest::new("Pixies", "Doolittle"));
        assert_eq!(
            params,
            vec![
                ("method", "search".to_string()),
                ("query", "Pixies Doolittle".to_string()),
                ("types", "Album".to_string()),
                ("_region", "US".to_string()),
            ]
        );
    }

    #[test]
    fn test_form_body_encoding() {
        let body = form_body(&[
            ("method", "search".to_string()),
            ("query", "Simon & Garfunkel Bookends".to_string()),
        ]);
        assert_eq!(body, "method=search&query=Simon%20%26%20Garfunkel%20Bookends");
    }

    #[test]
    fn test_classify_success() {
        let body = r#"{"status": "ok", "result": {"results": [
            {"name": "Doolittle", "artist": "Pixies", "url": "/artist/Pixies/album/Doolittle/", "canStream": true}
        ]}}"#;
        match classify(200, body, DEFAULT_WEB_ORIGIN) {
            SearchAttempt::Success(hits) => {
                assert_eq!(hits[0].url, "http://rdio.com/artist/Pixies/album/Doolittle/");
                assert!(hits[0].streamable);
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_null_can_stream_keeps_other_hits() {
        let body = r#"{"status": "ok", "result": {"results": [
            {"name": "Doolittle", "artist": "Pixies", "url": "/artist/Pixies/album/Doolittle/", "canStream": true},
            {"name": "Doolittle (Live)", "artist": "Pixies", "url": "/artist/Pixies/album/Doolittle_Live/", "canStream": null}
        ]}}"#;
        match classify(200, body, DEFAULT_WEB_ORIGIN) {
            SearchAttempt::Success(hits) => {
                assert_eq!(hits.len(), 2);
                assert!(hits[0].streamable);
                assert!(!hits[1].streamable);
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_null_results_is_retryable() {
        let body = r#"{"status": "ok", "result": {"results": null}}"#;
        assert!(matches!(
            classify(200, body, DEFAULT_WEB_ORIGIN),
            SearchAttempt::Retryable {
                status: Some(200),
                ..
            }
        ));
    }

    #[test]
    fn test_classify_error_envelope_is_retryable() {
        let body = r#"{"status": "error", "message": "Developer Over Qps"}"#;
        match classify(200, body, DEFAULT_WEB_ORIGIN) {
            SearchAttempt::Retryable { reason, .. } => {
                assert!(reason.contains("Developer Over Qps"));
            }
            other => panic!("expected retryable, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_forbidden_is_retryable() {
        assert!(matches!(
            classify(403, "", DEFAULT_WEB_ORIGIN),
            SearchAttempt::Retryable {
                status: Some(403),
                ..
            }
        ));
    }
}
