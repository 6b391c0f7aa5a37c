//! Redirect models: HTTP redirect configurations and their certificates

use serde::{Deserialize, Serialize};

/// An HTTP(S) redirect served by NS1
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_id: Option<String>,

    pub domain: String,

    pub path: String,

    pub target: String,

    #[serde(default)]
    pub tags: Vec<String>,

    /// `all`, `capture` or `none`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forwarding_mode: Option<String>,

    /// `permanent`, `temporary` or `masking`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forwarding_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_redirect: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_forwarding: Option<bool>,

    #[serde(default, skip_serializing)]
    pub last_updated: Option<i64>,
}

/// A TLS certificate NS1 issues for redirect domains
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectCertificate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub domain: String,

    #[serde(default, skip_serializing)]
    pub certificate: Option<String>,

    #[serde(default, skip_serializing)]
    pub valid_from: Option<i64>,

    #[serde(default, skip_serializing)]
    pub valid_until: Option<i64>,

    #[serde(default, skip_serializing)]
    pub processing: Option<bool>,

    #[serde(default, skip_serializing)]
    pub errors: Option<String>,

    #[serde(default, skip_serializing)]
    pub last_updated: Option<i64>,
}
