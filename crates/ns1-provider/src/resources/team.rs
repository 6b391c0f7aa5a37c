//! `ns1_team`: a named permission set users and API keys can join
//!
//! Teams own their permissions, so permission attributes are diffed normally.

use std::sync::Arc;

use async_trait::async_trait;
use ns1_client::Ns1Client;
use ns1_client::model::{IpWhitelist, Team};
use ns1_core::data::attr;
use ns1_core::diff::canonical;
use ns1_core::{Error, Resource, ResourceData, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use super::{deleted, found, require};
use crate::permissions::PermissionAttrs;

pub const TYPE_NAME: &str = "ns1_team";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamAttrs {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub ip_whitelist: Vec<IpWhitelistAttrs>,
    #[serde(flatten)]
    pub permissions: PermissionAttrs,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpWhitelistAttrs {
    pub name: String,
    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub values: Vec<String>,
}

impl TeamAttrs {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name);
        for (i, list) in self.ip_whitelist.iter().enumerate() {
            require(&mut errors, &format!("ip_whitelist.{}.name", i), &list.name);
        }
        Error::from_validation(errors)
    }

    pub fn to_model(&self, id: Option<String>) -> Team {
        Team {
            id,
            name: self.name.clone(),
            permissions: self.permissions.to_model(),
            ip_whitelist: self
                .ip_whitelist
                .iter()
                .map(|w| IpWhitelist {
                    id: None,
                    name: w.name.clone(),
                    values: w.values.clone(),
                })
                .collect(),
        }
    }

    pub fn from_model(team: &Team) -> Self {
        Self {
            name: team.name.clone(),
            ip_whitelist: team
                .ip_whitelist
                .iter()
                .map(|w| IpWhitelistAttrs {
                    name: w.name.clone(),
                    values: w.values.clone(),
                })
                .collect(),
            permissions: PermissionAttrs::from_model(&team.permissions),
        }
    }
}

pub struct TeamResource {
    client: Arc<Ns1Client>,
}

impl TeamResource {
    pub fn new(client: Arc<Ns1Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for TeamResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn canonicalize(&self, attrs: &Map<String, Value>) -> Option<Map<String, Value>> {
        canonical::<TeamAttrs>(attrs)
    }

    fn validate(&self, data: &ResourceData) -> Result<()> {
        data.decode::<TeamAttrs>()?.validate()
    }

    async fn create(&self, data: &mut ResourceData) -> Result<()> {
        let attrs: TeamAttrs = data.decode()?;

        let team = self.client.create_team(&attrs.to_model(None)).await?;
        let id = team
            .id
            .clone()
            .ok_or_else(|| Error::Other("team created without an id".to_string()))?;
        info!("Created team {} ({})", team.name, id);

        data.set_id(id);
        data.set_state(&TeamAttrs::from_model(&team))
    }

    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let Some(team) = found(data, TYPE_NAME, self.client.get_team(&id).await)? else {
            return Ok(());
        };
        data.set_state(&TeamAttrs::from_model(&team))
    }

    async fn update(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let attrs: TeamAttrs = data.decode()?;

        let team = self.client.update_team(&attrs.to_model(Some(id))).await?;
        data.set_state(&TeamAttrs::from_model(&team))
    }

    async fn delete(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let result = self.client.delete_team(&id).await;
        deleted(data, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_permissions_decode_next_to_team_fields() {
        let data = ResourceData::from_config(json!({
            "name": "ops",
            "dns_view_zones": true,
            "dns_zones_allow": ["example.io"],
            "ip_whitelist": [{"name": "office", "values": ["192.0.2.0/24"]}]
        }))
        .unwrap();

        let attrs: TeamAttrs = data.decode().unwrap();
        let model = attrs.to_model(None);

        assert!(model.permissions.dns.view_zones);
        assert_eq!(model.permissions.dns.zones_allow, vec!["example.io".to_string()]);
        assert!(!model.permissions.account.manage_users);
        assert_eq!(TeamAttrs::from_model(&model), attrs);
    }

    #[test]
    fn test_state_is_flat() {
        let attrs = TeamAttrs {
            name: "ops".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&attrs).unwrap();

        assert_eq!(value["name"], "ops");
        assert_eq!(value["account_manage_users"], false);
        assert!(value.get("permissions").is_none());
    }
}
