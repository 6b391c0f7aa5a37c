//! `ns1_dnsview`: a DNS view, identified by name

use std::sync::Arc;

use async_trait::async_trait;
use ns1_client::Ns1Client;
use ns1_client::model::View;
use ns1_core::data::attr;
use ns1_core::diff::canonical;
use ns1_core::{Error, Resource, ResourceData, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use super::{deleted, found, require};

pub const TYPE_NAME: &str = "ns1_dnsview";

/// Attributes the API fills in when left unset
const COMPUTED: &[&str] = &["created_at", "updated_at"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DnsViewAttrs {
    #[serde(default)]
    pub name: String,
    /// ACL names allowed to query the view
    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub read_acls: Vec<String>,
    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub update_acls: Vec<String>,
    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub zones: Vec<String>,
    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub networks: Vec<u32>,
    #[serde(default)]
    pub preference: u32,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<i64>,
}

impl DnsViewAttrs {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name);
        Error::from_validation(errors)
    }

    pub fn to_model(&self) -> View {
        View {
            name: self.name.clone(),
            read_acls: self.read_acls.clone(),
            update_acls: self.update_acls.clone(),
            zones: self.zones.clone(),
            networks: self.networks.clone(),
            preference: self.preference,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn from_model(view: &View) -> Self {
        Self {
            name: view.name.clone(),
            read_acls: view.read_acls.clone(),
            update_acls: view.update_acls.clone(),
            zones: view.zones.clone(),
            networks: view.networks.clone(),
            preference: view.preference,
            created_at: view.created_at,
            updated_at: view.updated_at,
        }
    }
}

pub struct DnsViewResource {
    client: Arc<Ns1Client>,
}

impl DnsViewResource {
    pub fn new(client: Arc<Ns1Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for DnsViewResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn computed(&self) -> &'static [&'static str] {
        COMPUTED
    }

    fn canonicalize(&self, attrs: &Map<String, Value>) -> Option<Map<String, Value>> {
        canonical::<DnsViewAttrs>(attrs)
    }

    fn force_new(&self) -> &'static [&'static str] {
        &["name"]
    }

    fn validate(&self, data: &ResourceData) -> Result<()> {
        data.decode_with_computed::<DnsViewAttrs>(COMPUTED)?.validate()
    }

    async fn create(&self, data: &mut ResourceData) -> Result<()> {
        let attrs: DnsViewAttrs = data.decode_with_computed(COMPUTED)?;

        let view = self.client.create_view(&attrs.to_model()).await?;
        info!("Created view {} with {} zone(s)", view.name, view.zones.len());

        data.set_id(view.name.clone());
        data.set_state(&DnsViewAttrs::from_model(&view))
    }

    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let Some(view) = found(data, TYPE_NAME, self.client.get_view(&id).await)? else {
            return Ok(());
        };
        data.set_state(&DnsViewAttrs::from_model(&view))
    }

    async fn update(&self, data: &mut ResourceData) -> Result<()> {
        data.require_id()?;
        let attrs: DnsViewAttrs = data.decode_with_computed(COMPUTED)?;

        let view = self.client.update_view(&attrs.to_model()).await?;
        data.set_state(&DnsViewAttrs::from_model(&view))
    }

    async fn delete(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let result = self.client.delete_view(&id).await;
        deleted(data, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_timestamps_are_not_sent() {
        let attrs: DnsViewAttrs = ResourceData::from_state(
            "internal",
            json!({"name": "internal", "zones": ["corp.example.io"], "created_at": 1700000000}),
        )
        .unwrap()
        .decode()
        .unwrap();

        let body = serde_json::to_value(attrs.to_model()).unwrap();
        assert!(body.get("created_at").is_none());
        assert_eq!(body["zones"], json!(["corp.example.io"]));
    }
}
