//! `ns1_redirect_certificate`: a TLS certificate issued for redirect domains
//!
//! Updating a certificate renews it. Deletion is asynchronous on the API
//! side, so delete waits for the certificate to disappear.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ns1_client::Ns1Client;
use ns1_client::model::RedirectCertificate;
use ns1_core::diff::canonical;
use ns1_core::{Error, Resource, ResourceData, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::{deleted, found, require};

pub const TYPE_NAME: &str = "ns1_redirect_certificate";

/// Attributes the API fills in when left unset
const COMPUTED: &[&str] = &[
    "certificate",
    "valid_from",
    "valid_until",
    "processing",
    "errors",
    "last_updated",
];

/// Polls made after a delete before giving up
pub const DELETE_POLL_ATTEMPTS: u32 = 20;

pub const DELETE_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedirectCertificateAttrs {
    #[serde(default)]
    pub domain: String,

    // Computed by the API
    #[serde(default)]
    pub certificate: Option<String>,
    #[serde(default)]
    pub valid_from: Option<i64>,
    #[serde(default)]
    pub valid_until: Option<i64>,
    #[serde(default)]
    pub processing: Option<bool>,
    #[serde(default)]
    pub errors: Option<String>,
    #[serde(default)]
    pub last_updated: Option<i64>,
}

impl RedirectCertificateAttrs {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        require(&mut errors, "domain", &self.domain);
        Error::from_validation(errors)
    }

    pub fn from_model(cert: &RedirectCertificate) -> Self {
        Self {
            domain: cert.domain.clone(),
            certificate: cert.certificate.clone(),
            valid_from: cert.valid_from,
            valid_until: cert.valid_until,
            processing: cert.processing,
            errors: cert.errors.clone(),
            last_updated: cert.last_updated,
        }
    }
}

pub struct RedirectCertificateResource {
    client: Arc<Ns1Client>,
    poll_interval: Duration,
}

impl RedirectCertificateResource {
    pub fn new(client: Arc<Ns1Client>) -> Self {
        Self {
            client,
            poll_interval: DELETE_POLL_INTERVAL,
        }
    }

    /// Override the delete poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Wait until the certificate is gone or the attempts run out
    async fn wait_deleted(&self, id: &str) -> Result<()> {
        for attempt in 1..=DELETE_POLL_ATTEMPTS {
            match self.client.get_redirect_certificate(id).await {
                Err(e) if e.is_not_found() => {
                    debug!("certificate {} gone after {} poll(s)", id, attempt);
                    return Ok(());
                }
                Err(e) => return Err(e),
                Ok(_) => tokio::time::sleep(self.poll_interval).await,
            }
        }

        warn!(
            "certificate {} still present after {} polls, giving up",
            id, DELETE_POLL_ATTEMPTS
        );
        Ok(())
    }
}

#[async_trait]
impl Resource for RedirectCertificateResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn computed(&self) -> &'static [&'static str] {
        COMPUTED
    }

    fn canonicalize(&self, attrs: &Map<String, Value>) -> Option<Map<String, Value>> {
        canonical::<RedirectCertificateAttrs>(attrs)
    }

    fn force_new(&self) -> &'static [&'static str] {
        &["domain"]
    }

    fn validate(&self, data: &ResourceData) -> Result<()> {
        data.decode_with_computed::<RedirectCertificateAttrs>(COMPUTED)?.validate()
    }

    async fn create(&self, data: &mut ResourceData) -> Result<()> {
        let attrs: RedirectCertificateAttrs = data.decode_with_computed(COMPUTED)?;

        let cert = self.client.create_redirect_certificate(&attrs.domain).await?;
        let id = cert
            .id
            .clone()
            .ok_or_else(|| Error::Other("certificate created without an id".to_string()))?;
        info!("Requested certificate for {} ({})", cert.domain, id);

        data.set_id(id);
        data.set_state(&RedirectCertificateAttrs::from_model(&cert))
    }

    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let result = self.client.get_redirect_certificate(&id).await;
        let Some(cert) = found(data, TYPE_NAME, result)? else {
            return Ok(());
        };
        data.set_state(&RedirectCertificateAttrs::from_model(&cert))
    }

    async fn update(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();

        self.client.renew_redirect_certificate(&id).await?;
        info!("Renewing certificate {}", id);

        let cert = self.client.get_redirect_certificate(&id).await?;
        data.set_state(&RedirectCertificateAttrs::from_model(&cert))
    }

    async fn delete(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let result = match self.client.delete_redirect_certificate(&id).await {
            Ok(()) => self.wait_deleted(&id).await,
            Err(e) => Err(e),
        };
        deleted(data, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_model_keeps_computed_fields() {
        let cert = RedirectCertificate {
            id: Some("c1".into()),
            domain: "*.example.io".into(),
            valid_until: Some(1_800_000_000),
            processing: Some(true),
            ..Default::default()
        };

        let attrs = RedirectCertificateAttrs::from_model(&cert);
        assert_eq!(attrs.domain, "*.example.io");
        assert_eq!(attrs.valid_until, Some(1_800_000_000));
        assert_eq!(attrs.processing, Some(true));
    }

    #[test]
    fn test_domain_required() {
        assert!(RedirectCertificateAttrs::default().validate().is_err());
    }
}
