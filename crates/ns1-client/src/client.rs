// NS1 REST client
//
// Wraps `reqwest::Client` with NS1 authentication, URL construction and
// response handling. Endpoint methods live in the `api` modules as inherent
// methods, one file per API domain, so this module only deals with transport.

use std::fmt;
use std::time::Duration;

use ns1_core::{ApiResponse, Error, ProviderConfig, Result, convert_to_ns1_error};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Header carrying the NS1 API key
pub const API_KEY_HEADER: &str = "X-NSONE-Key";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin async client for the NS1 REST API
///
/// Every request is sent exactly once. HTTP 404 becomes [`Error::NotFound`],
/// any other non-2xx status becomes [`Error::Api`] carrying the status, method,
/// URL and the API's `message`.
#[derive(Clone)]
pub struct Ns1Client {
    http: reqwest::Client,
    endpoint: String,
    alerting_endpoint: String,
    enable_debug: bool,
}

// Custom Debug implementation, the inner client holds the API key header
impl fmt::Debug for Ns1Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ns1Client")
            .field("endpoint", &self.endpoint)
            .field("alerting_endpoint", &self.alerting_endpoint)
            .field("enable_debug", &self.enable_debug)
            .finish_non_exhaustive()
    }
}

impl Ns1Client {
    /// Build a client from provider configuration
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;

        let mut key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| Error::config("API key contains invalid header characters"))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .danger_accept_invalid_certs(config.ignore_ssl)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        if config.ignore_ssl {
            tracing::warn!("TLS certificate verification is disabled");
        }

        Ok(Self::with_client(http, &config.endpoint).with_debug(config.enable_debug))
    }

    /// Create a client around a pre-built `reqwest::Client`
    ///
    /// The caller is responsible for authentication headers.
    pub fn with_client(http: reqwest::Client, endpoint: &str) -> Self {
        let endpoint = if endpoint.ends_with('/') {
            endpoint.to_string()
        } else {
            format!("{}/", endpoint)
        };
        let alerting_endpoint = alerting_endpoint(&endpoint);

        Self {
            http,
            endpoint,
            alerting_endpoint,
            enable_debug: false,
        }
    }

    /// A client sending no API key
    ///
    /// Only useful for building resources that are listed and never applied;
    /// every request it sends is rejected by the API.
    pub fn unauthenticated(endpoint: &str) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    /// Enable or disable request/response body logging
    pub fn with_debug(mut self, enable_debug: bool) -> Self {
        self.enable_debug = enable_debug;
        self
    }

    /// The API endpoint, ending in `/`
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The alerting API endpoint derived from the main endpoint
    pub fn alerting_endpoint(&self) -> &str {
        &self.alerting_endpoint
    }

    // ── URL builders ─────────────────────────────────────────────────

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    pub(crate) fn alerting_url(&self, path: &str) -> String {
        format!("{}{}", self.alerting_endpoint, path)
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.send(Method::GET, url, None).await
    }

    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        let body = serde_json::to_value(body)?;
        self.send(Method::PUT, url, Some(body)).await
    }

    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        let body = serde_json::to_value(body)?;
        self.send(Method::POST, url, Some(body)).await
    }

    pub(crate) async fn patch<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        let body = serde_json::to_value(body)?;
        self.send(Method::PATCH, url, Some(body)).await
    }

    /// DELETE ignores the response body
    pub(crate) async fn delete(&self, url: &str) -> Result<()> {
        self.execute(Method::DELETE, url, None).await.map(|_| ())
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
    ) -> Result<T> {
        let (response, text) = self.execute(method, url, body).await?;

        let decoded = serde_json::from_str(&text).map_err(Error::from);
        convert_to_ns1_error(Some(&response), decoded)
    }

    /// Send one request, returning response metadata and the raw body
    async fn execute(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
    ) -> Result<(ApiResponse, String)> {
        debug!("{} {}", method, url);
        if self.enable_debug {
            if let Some(ref body) = body {
                debug!("request body: {}", body);
            }
        }

        let mut request = self.http.request(method.clone(), url);
        if let Some(ref body) = body {
            request = request.json(body);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| Error::http(format!("{} {} failed: {}", method, url, e)))?;

        let status = resp.status();
        let response = ApiResponse::new(status.as_u16(), method.as_str(), url);

        let text = resp
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response body: {}", e)))?;

        if self.enable_debug {
            debug!("response {}: {}", status, text);
        }

        if status.is_success() {
            return Ok((response, text));
        }

        let message = error_message(status, &text);
        if status == StatusCode::NOT_FOUND {
            return Err(Error::not_found(format!("{} {}", response, message)));
        }

        Err(Error::api(response, message))
    }
}

/// Extract the API's `message` from an error body, falling back to the raw
/// body and then to the status reason
fn error_message(status: StatusCode, body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        v.get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    match parsed {
        Some(message) => message,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    }
}

/// Derive the alerting endpoint: `https://host/v1/` becomes
/// `https://host/alerting/v1/`
fn alerting_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim_end_matches('/');
    match trimmed.strip_suffix("/v1") {
        Some(base) => format!("{}/alerting/v1/", base),
        None => format!("{}/alerting/v1/", trimmed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alerting_endpoint_replaces_version_segment() {
        assert_eq!(
            alerting_endpoint("https://api.nsone.net/v1/"),
            "https://api.nsone.net/alerting/v1/"
        );
        assert_eq!(
            alerting_endpoint("http://localhost:8080/v1"),
            "http://localhost:8080/alerting/v1/"
        );
    }

    #[test]
    fn test_alerting_endpoint_without_version_segment() {
        assert_eq!(
            alerting_endpoint("http://127.0.0.1:4000/"),
            "http://127.0.0.1:4000/alerting/v1/"
        );
    }

    #[test]
    fn test_error_message_prefers_api_message() {
        let msg = error_message(StatusCode::BAD_REQUEST, r#"{"message":"zone already exists"}"#);
        assert_eq!(msg, "zone already exists");
    }

    #[test]
    fn test_error_message_falls_back_to_body_then_reason() {
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, "upstream down"), "upstream down");
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, ""), "Bad Gateway");
    }

    #[test]
    fn test_debug_does_not_expose_key() {
        let config = ProviderConfig::new("super-secret-key");
        let client = Ns1Client::from_config(&config).unwrap();

        let debug = format!("{:?}", client);
        assert!(!debug.contains("super-secret-key"));
        assert!(debug.contains("api.nsone.net"));
    }

    #[test]
    fn test_from_config_rejects_empty_key() {
        let config = ProviderConfig::new("");
        assert!(matches!(Ns1Client::from_config(&config), Err(Error::Config(_))));
    }
}
