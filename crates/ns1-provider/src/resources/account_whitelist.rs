//! `ns1_account_whitelist`: an account-wide list of addresses allowed to use
//! the API, applying to every user and key with `ip_whitelist_strict`

use std::sync::Arc;

use async_trait::async_trait;
use ns1_client::Ns1Client;
use ns1_client::model::IpWhitelist;
use ns1_core::data::attr;
use ns1_core::diff::canonical;
use ns1_core::{Error, Resource, ResourceData, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use super::{deleted, found, require};

pub const TYPE_NAME: &str = "ns1_account_whitelist";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountWhitelistAttrs {
    #[serde(default)]
    pub name: String,
    /// Addresses or CIDR prefixes
    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub values: Vec<String>,
}

impl AccountWhitelistAttrs {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name);
        if self.values.is_empty() {
            errors.push("values: at least one address is required".to_string());
        }
        for (i, value) in self.values.iter().enumerate() {
            require(&mut errors, &format!("values.{}", i), value);
        }
        Error::from_validation(errors)
    }

    pub fn to_model(&self, id: Option<String>) -> IpWhitelist {
        IpWhitelist {
            id,
            name: self.name.clone(),
            values: self.values.clone(),
        }
    }

    pub fn from_model(list: &IpWhitelist) -> Self {
        Self {
            name: list.name.clone(),
            values: list.values.clone(),
        }
    }
}

pub struct AccountWhitelistResource {
    client: Arc<Ns1Client>,
}

impl AccountWhitelistResource {
    pub fn new(client: Arc<Ns1Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for AccountWhitelistResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn canonicalize(&self, attrs: &Map<String, Value>) -> Option<Map<String, Value>> {
        canonical::<AccountWhitelistAttrs>(attrs)
    }

    fn validate(&self, data: &ResourceData) -> Result<()> {
        data.decode::<AccountWhitelistAttrs>()?.validate()
    }

    async fn create(&self, data: &mut ResourceData) -> Result<()> {
        let attrs: AccountWhitelistAttrs = data.decode()?;

        let list = self.client.create_account_whitelist(&attrs.to_model(None)).await?;
        let id = list
            .id
            .clone()
            .ok_or_else(|| Error::Other("whitelist created without an id".to_string()))?;
        info!("Created account whitelist {} ({})", list.name, id);

        data.set_id(id);
        data.set_state(&AccountWhitelistAttrs::from_model(&list))
    }

    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let result = self.client.get_account_whitelist(&id).await;
        let Some(list) = found(data, TYPE_NAME, result)? else {
            return Ok(());
        };
        data.set_state(&AccountWhitelistAttrs::from_model(&list))
    }

    async fn update(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let attrs: AccountWhitelistAttrs = data.decode()?;

        let list = self
            .client
            .update_account_whitelist(&attrs.to_model(Some(id)))
            .await?;
        data.set_state(&AccountWhitelistAttrs::from_model(&list))
    }

    async fn delete(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let result = self.client.delete_account_whitelist(&id).await;
        deleted(data, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_values_are_required() {
        let attrs: AccountWhitelistAttrs = ResourceData::from_config(json!({"name": "office"}))
            .unwrap()
            .decode()
            .unwrap();

        let err = attrs.validate().unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap(),
            ["values: at least one address is required"]
        );
    }

    #[test]
    fn test_update_carries_id() {
        let attrs = AccountWhitelistAttrs {
            name: "office".into(),
            values: vec!["192.0.2.0/24".into()],
        };

        let model = attrs.to_model(Some("wl1".into()));
        assert_eq!(model.id.as_deref(), Some("wl1"));
        assert_eq!(AccountWhitelistAttrs::from_model(&model), attrs);
    }
}
