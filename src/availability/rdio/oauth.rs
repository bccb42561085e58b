//! Two-legged OAuth 1.0a request signing (HMAC-SHA1).
//!
//! Rdio authenticates API calls with a consumer key and secret only; there is
//! no user token, so the token secret in the signing key is empty.
//!
//! See RFC 5849 sections 3.4 (signature) and 3.5.1 (Authorization header).

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use rand::Rng;
use sha1::Sha1;

use crate::availability::domain::LookupError;

type HmacSha1 = Hmac<Sha1>;

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

/// Application credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consumer {
    pub key: String,
    pub secret: String,
}

impl Consumer {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }
}

/// RFC 3986 percent-encoding (unreserved characters pass through)
pub fn percent_encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Random nonce, unique per request
pub fn generate_nonce() -> String {
    format!("{:016x}", rand::rng().random::<u64>())
}

/// Seconds since the Unix epoch
pub fn timestamp_now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Build the signature base string from already-collected parameters.
///
/// Parameters are encoded, sorted by name then value, and joined.
pub fn signature_base_string(method: &str, url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();

    let normalized = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(url),
        percent_encode(&normalized)
    )
}

/// Sign a base string with the consumer secret and an empty token secret
pub fn sign(consumer: &Consumer, base_string: &str) -> Result<String, LookupError> {
    let key = format!("{}&", percent_encode(&consumer.secret));
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| LookupError::Signing(e.to_string()))?;
    mac.update(base_string.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Build the `Authorization` header value for a request.
///
/// `body_params` are the form-encoded body parameters; they take part in the
/// signature but are not repeated in the header.
pub fn authorization_header(
    consumer: &Consumer,
    method: &str,
    url: &str,
    body_params: &[(&str, String)],
    nonce: &str,
    timestamp: i64,
) -> Result<String, LookupError> {
    let mut oauth_params: Vec<(String, String)> = vec![
        ("oauth_consumer_key".to_string(), consumer.key.clone()),
        ("oauth_nonce".to_string(), nonce.to_string()),
        (
            "oauth_signature_method".to_string(),
            SIGNATURE_METHOD.to_string(),
        ),
        ("oauth_timestamp".to_string(), timestamp.to_string()),
        ("oauth_version".to_string(), OAUTH_VERSION.to_string()),
    ];

    let mut all_params = oauth_params.clone();
    all_params.extend(
        body_params
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone())),
    );

    let base = signature_base_string(method, url, &all_params);
    let signature = sign(consumer, &base)?;

    oauth_params.push(("oauth_signature".to_string(), signature));
    oauth_params.sort();

    let fields = oauth_params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!("OAuth {}", fields))
}
