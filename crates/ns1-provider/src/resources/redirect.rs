//! `ns1_redirect`: an HTTP redirect from a domain and path to a target URL

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use ns1_client::Ns1Client;
use ns1_client::model::RedirectConfiguration;
use ns1_core::data::attr;
use ns1_core::diff::canonical;
use ns1_core::{Error, Resource, ResourceData, Result, StringEnum};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use super::{deleted, found, require};

pub const TYPE_NAME: &str = "ns1_redirect";

/// Attributes the API fills in when left unset
const COMPUTED: &[&str] = &[
    "certificate_id",
    "forwarding_mode",
    "forwarding_type",
    "ssl_enabled",
    "force_redirect",
    "query_forwarding",
    "last_updated",
];

pub static FORWARDING_MODES: LazyLock<StringEnum> =
    LazyLock::new(|| StringEnum::new(&["all", "capture", "none"]));

pub static FORWARDING_TYPES: LazyLock<StringEnum> =
    LazyLock::new(|| StringEnum::new(&["permanent", "temporary", "masking"]));

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedirectAttrs {
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub certificate_id: Option<String>,
    #[serde(default)]
    pub forwarding_mode: Option<String>,
    #[serde(default)]
    pub forwarding_type: Option<String>,
    #[serde(default)]
    pub ssl_enabled: Option<bool>,
    #[serde(default)]
    pub force_redirect: Option<bool>,
    #[serde(default)]
    pub query_forwarding: Option<bool>,
    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub tags: Vec<String>,
    /// Unix time of the last change, computed
    #[serde(default)]
    pub last_updated: Option<i64>,
}

impl RedirectAttrs {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        require(&mut errors, "domain", &self.domain);
        require(&mut errors, "path", &self.path);
        require(&mut errors, "target", &self.target);
        if let Some(mode) = &self.forwarding_mode {
            FORWARDING_MODES.validate_into("forwarding_mode", mode, &mut errors);
        }
        if let Some(kind) = &self.forwarding_type {
            FORWARDING_TYPES.validate_into("forwarding_type", kind, &mut errors);
        }
        if self.force_redirect == Some(true) && self.ssl_enabled == Some(false) {
            errors.push("force_redirect: requires ssl_enabled".to_string());
        }
        Error::from_validation(errors)
    }

    pub fn to_model(&self, id: Option<String>) -> RedirectConfiguration {
        RedirectConfiguration {
            id,
            certificate_id: self.certificate_id.clone().filter(|c| !c.is_empty()),
            domain: self.domain.clone(),
            path: self.path.clone(),
            target: self.target.clone(),
            tags: self.tags.clone(),
            forwarding_mode: self.forwarding_mode.clone(),
            forwarding_type: self.forwarding_type.clone(),
            ssl_enabled: self.ssl_enabled,
            force_redirect: self.force_redirect,
            query_forwarding: self.query_forwarding,
            last_updated: None,
        }
    }

    pub fn from_model(redirect: &RedirectConfiguration) -> Self {
        Self {
            domain: redirect.domain.clone(),
            path: redirect.path.clone(),
            target: redirect.target.clone(),
            certificate_id: redirect.certificate_id.clone(),
            forwarding_mode: redirect.forwarding_mode.clone(),
            forwarding_type: redirect.forwarding_type.clone(),
            ssl_enabled: redirect.ssl_enabled,
            force_redirect: redirect.force_redirect,
            query_forwarding: redirect.query_forwarding,
            tags: redirect.tags.clone(),
            last_updated: redirect.last_updated,
        }
    }
}

pub struct RedirectResource {
    client: Arc<Ns1Client>,
}

impl RedirectResource {
    pub fn new(client: Arc<Ns1Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for RedirectResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn computed(&self) -> &'static [&'static str] {
        COMPUTED
    }

    fn canonicalize(&self, attrs: &Map<String, Value>) -> Option<Map<String, Value>> {
        canonical::<RedirectAttrs>(attrs)
    }

    fn validate(&self, data: &ResourceData) -> Result<()> {
        data.decode_with_computed::<RedirectAttrs>(COMPUTED)?.validate()
    }

    async fn create(&self, data: &mut ResourceData) -> Result<()> {
        let attrs: RedirectAttrs = data.decode_with_computed(COMPUTED)?;

        let redirect = self.client.create_redirect(&attrs.to_model(None)).await?;
        let id = redirect
            .id
            .clone()
            .ok_or_else(|| Error::Other("redirect created without an id".to_string()))?;
        info!(
            "Created redirect {}{} -> {} ({})",
            redirect.domain, redirect.path, redirect.target, id
        );

        data.set_id(id);
        data.set_state(&RedirectAttrs::from_model(&redirect))
    }

    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let Some(redirect) = found(data, TYPE_NAME, self.client.get_redirect(&id).await)? else {
            return Ok(());
        };
        data.set_state(&RedirectAttrs::from_model(&redirect))
    }

    async fn update(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let attrs: RedirectAttrs = data.decode_with_computed(COMPUTED)?;

        let redirect = self.client.update_redirect(&attrs.to_model(Some(id))).await?;
        data.set_state(&RedirectAttrs::from_model(&redirect))
    }

    async fn delete(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let result = self.client.delete_redirect(&id).await;
        deleted(data, result)
    }
}
