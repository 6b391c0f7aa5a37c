//! Provider configuration
//!
//! The provider is configured either from a serialized [`ProviderConfig`] or
//! from the environment:
//!
//! - `NS1_APIKEY`: API key (required)
//! - `NS1_ENDPOINT`: API endpoint, defaults to [`DEFAULT_ENDPOINT`]
//! - `NS1_IGNORE_SSL`: skip TLS certificate verification
//! - `NS1_DEBUG`: log full request and response bodies

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default NS1 API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.nsone.net/v1/";

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "NS1_APIKEY";
/// Environment variable overriding the endpoint
pub const ENV_ENDPOINT: &str = "NS1_ENDPOINT";
/// Environment variable disabling TLS verification
pub const ENV_IGNORE_SSL: &str = "NS1_IGNORE_SSL";
/// Environment variable enabling request/response logging
pub const ENV_DEBUG: &str = "NS1_DEBUG";

/// NS1 provider configuration
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderConfig {
    /// NS1 API key
    pub api_key: String,

    /// API endpoint, always ending in `/`
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Skip TLS certificate verification
    #[serde(default)]
    pub ignore_ssl: bool,

    /// Log request and response bodies at debug level
    #[serde(default)]
    pub enable_debug: bool,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

// Custom Debug implementation that hides the API key
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<REDACTED>")
            .field("endpoint", &self.endpoint)
            .field("ignore_ssl", &self.ignore_ssl)
            .field("enable_debug", &self.enable_debug)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ProviderConfig {
    /// Create a configuration for the default endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: default_endpoint(),
            ignore_ssl: false,
            enable_debug: false,
            user_agent: default_user_agent(),
        }
    }

    /// Set the endpoint, normalizing the trailing slash
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = normalize_endpoint(&endpoint.into());
        self
    }

    /// Enable or disable TLS verification bypass
    pub fn with_ignore_ssl(mut self, ignore_ssl: bool) -> Self {
        self.ignore_ssl = ignore_ssl;
        self
    }

    /// Enable or disable body logging
    pub fn with_debug(mut self, enable_debug: bool) -> Self {
        self.enable_debug = enable_debug;
        self
    }

    /// Load configuration from `NS1_*` environment variables
    pub fn from_env() -> Result<Self, crate::Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, crate::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY).unwrap_or_default();
        let mut config = Self::new(api_key);

        if let Some(endpoint) = lookup(ENV_ENDPOINT).filter(|e| !e.is_empty()) {
            config = config.with_endpoint(endpoint);
        }
        if let Some(raw) = lookup(ENV_IGNORE_SSL) {
            config.ignore_ssl = parse_env_bool(ENV_IGNORE_SSL, &raw)?;
        }
        if let Some(raw) = lookup(ENV_DEBUG) {
            config.enable_debug = parse_env_bool(ENV_DEBUG, &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_key.trim().is_empty() {
            return Err(crate::Error::config(format!(
                "NS1 API key is required. Set it via: export {}=your_key",
                ENV_API_KEY
            )));
        }

        if !self.endpoint.starts_with("https://") && !self.endpoint.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "NS1 endpoint must use HTTP or HTTPS scheme. Got: {}",
                self.endpoint
            )));
        }

        if !self.endpoint.ends_with('/') {
            return Err(crate::Error::config(format!(
                "NS1 endpoint must end with '/'. Got: {}",
                self.endpoint
            )));
        }

        Ok(())
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_user_agent() -> String {
    format!("terraform-provider-ns1/{}", env!("CARGO_PKG_VERSION"))
}

fn normalize_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    }
}

fn parse_env_bool(key: &str, raw: &str) -> Result<bool, crate::Error> {
    match raw.trim().to_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        other => Err(crate::Error::config(format!(
            "{} must be a boolean. Got: {}",
            key, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_from_env() {
        let config = ProviderConfig::from_lookup(lookup(&[(ENV_API_KEY, "abc123")])).unwrap();

        assert_eq!(config.api_key, "abc123");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(!config.ignore_ssl);
        assert!(!config.enable_debug);
        assert!(config.user_agent.starts_with("terraform-provider-ns1/"));
    }

    #[test]
    fn test_endpoint_is_normalized() {
        let config = ProviderConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "abc123"),
            (ENV_ENDPOINT, "https://ns1.internal/v1"),
            (ENV_IGNORE_SSL, "true"),
            (ENV_DEBUG, "1"),
        ]))
        .unwrap();

        assert_eq!(config.endpoint, "https://ns1.internal/v1/");
        assert!(config.ignore_ssl);
        assert!(config.enable_debug);
    }

    #[test]
    fn test_missing_api_key() {
        let err = ProviderConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("NS1_APIKEY"));
    }

    #[test]
    fn test_invalid_bool() {
        let err = ProviderConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "abc123"),
            (ENV_IGNORE_SSL, "sometimes"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("NS1_IGNORE_SSL"));
    }

    #[test]
    fn test_invalid_scheme() {
        let config = ProviderConfig::new("abc123").with_endpoint("ftp://api.nsone.net/v1/");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_not_exposed_in_debug() {
        let config = ProviderConfig::new("secret_key_12345");
        let debug_str = format!("{:?}", config);

        assert!(!debug_str.contains("secret_key_12345"));
        assert!(debug_str.contains("ProviderConfig"));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: ProviderConfig = serde_json::from_str(r#"{"api_key":"k"}"#).unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.validate().is_ok());
    }
}
