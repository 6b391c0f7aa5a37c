//! `ns1_apikey`: an API key with its own or team-inherited permissions
//!
//! The secret `key` is only ever produced by the API and kept in state.

use std::sync::Arc;

use async_trait::async_trait;
use ns1_client::Ns1Client;
use ns1_client::model::ApiKey;
use ns1_core::data::attr;
use ns1_core::diff::canonical;
use ns1_core::{Error, Resource, ResourceData, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::{deleted, found, require};
use crate::permissions::{PermissionAttrs, is_permission_field, suppress_permission_diff};

pub const TYPE_NAME: &str = "ns1_apikey";

/// Attributes the API fills in when left unset
const COMPUTED: &[&str] = &["key"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiKeyAttrs {
    #[serde(default)]
    pub name: String,
    /// Team IDs
    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub teams: Vec<String>,
    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub ip_whitelist: Vec<String>,
    #[serde(default)]
    pub ip_whitelist_strict: bool,
    /// Secret key, computed
    #[serde(default)]
    pub key: Option<String>,
    #[serde(flatten)]
    pub permissions: PermissionAttrs,
}

impl ApiKeyAttrs {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name);
        Error::from_validation(errors)
    }

    pub fn to_model(&self, id: Option<String>) -> ApiKey {
        ApiKey {
            id,
            key: None,
            name: self.name.clone(),
            teams: self.teams.clone(),
            ip_whitelist: self.ip_whitelist.clone(),
            ip_whitelist_strict: self.ip_whitelist_strict,
            permissions: self.permissions.to_model(),
            last_access: None,
        }
    }

    /// Map an API key back, keeping a previously seen secret when the
    /// response omits it
    pub fn from_model(key: &ApiKey, prior_key: Option<String>) -> Self {
        Self {
            name: key.name.clone(),
            teams: key.teams.clone(),
            ip_whitelist: key.ip_whitelist.clone(),
            ip_whitelist_strict: key.ip_whitelist_strict,
            key: key.key.clone().or(prior_key),
            permissions: PermissionAttrs::from_model(&key.permissions),
        }
    }
}

pub struct ApiKeyResource {
    client: Arc<Ns1Client>,
}

impl ApiKeyResource {
    pub fn new(client: Arc<Ns1Client>) -> Self {
        Self { client }
    }
}

fn prior_key(data: &ResourceData) -> Option<String> {
    data.state()
        .get("key")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}

#[async_trait]
impl Resource for ApiKeyResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn computed(&self) -> &'static [&'static str] {
        COMPUTED
    }

    fn canonicalize(&self, attrs: &Map<String, Value>) -> Option<Map<String, Value>> {
        canonical::<ApiKeyAttrs>(attrs)
    }

    fn validate(&self, data: &ResourceData) -> Result<()> {
        data.decode_with_computed::<ApiKeyAttrs>(COMPUTED)?.validate()
    }

    async fn create(&self, data: &mut ResourceData) -> Result<()> {
        let attrs: ApiKeyAttrs = data.decode_with_computed(COMPUTED)?;

        let created = self.client.create_api_key(&attrs.to_model(None)).await?;
        let id = created
            .id
            .clone()
            .ok_or_else(|| Error::Other("API key created without an id".to_string()))?;
        info!("Created API key {} ({})", created.name, id);

        let mut key = created.clone();
        if !attrs.teams.is_empty() {
            debug!("API key {} joined teams, refreshing permissions", id);
            key = self.client.get_api_key(&id).await?;
        }

        data.set_id(id);
        data.set_state(&ApiKeyAttrs::from_model(&key, created.key))
    }

    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let prior = prior_key(data);
        let Some(key) = found(data, TYPE_NAME, self.client.get_api_key(&id).await)? else {
            return Ok(());
        };
        data.set_state(&ApiKeyAttrs::from_model(&key, prior))
    }

    async fn update(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let attrs: ApiKeyAttrs = data.decode_with_computed(COMPUTED)?;
        let teams_changed = data.has_change("teams");
        let prior = prior_key(data);

        let mut key = self.client.update_api_key(&attrs.to_model(Some(id.clone()))).await?;
        if teams_changed {
            debug!("API key {} teams changed, refreshing permissions", id);
            key = self.client.get_api_key(&id).await?;
        }

        data.set_state(&ApiKeyAttrs::from_model(&key, prior))
    }

    async fn delete(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let result = self.client.delete_api_key(&id).await;
        deleted(data, result)
    }

    fn suppress_diff(&self, key: &str, old: &str, new: &str, data: &ResourceData) -> bool {
        is_permission_field(key) && suppress_permission_diff(old, new, data)
    }
}
