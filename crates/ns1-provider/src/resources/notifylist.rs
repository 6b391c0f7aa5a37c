//! `ns1_notifylist`: a list of notification targets for monitoring jobs

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use ns1_client::Ns1Client;
use ns1_client::model::{Notifier, NotifyList};
use ns1_core::data::attr;
use ns1_core::diff::canonical;
use ns1_core::{Error, Resource, ResourceData, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use super::{deleted, found, require};
use crate::config_values;

pub const TYPE_NAME: &str = "ns1_notifylist";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotifyListAttrs {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub notifications: Vec<NotificationAttrs>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationAttrs {
    #[serde(rename = "type")]
    pub notifier_type: String,
    #[serde(default, deserialize_with = "attr::string_map")]
    pub config: BTreeMap<String, String>,
}

impl NotifyListAttrs {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name);
        for (i, n) in self.notifications.iter().enumerate() {
            require(&mut errors, &format!("notifications.{}.type", i), &n.notifier_type);
        }
        Error::from_validation(errors)
    }

    pub fn to_model(&self, id: Option<String>) -> NotifyList {
        NotifyList {
            id,
            name: self.name.clone(),
            notifiers: self
                .notifications
                .iter()
                .map(|n| Notifier {
                    notifier_type: n.notifier_type.clone(),
                    config: config_values::to_wire(&n.config),
                })
                .collect(),
        }
    }

    pub fn from_model(list: &NotifyList) -> Self {
        Self {
            name: list.name.clone(),
            notifications: list
                .notifiers
                .iter()
                .map(|n| NotificationAttrs {
                    notifier_type: n.notifier_type.clone(),
                    config: config_values::from_wire(&n.config),
                })
                .collect(),
        }
    }
}

pub struct NotifyListResource {
    client: Arc<Ns1Client>,
}

impl NotifyListResource {
    pub fn new(client: Arc<Ns1Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for NotifyListResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn canonicalize(&self, attrs: &Map<String, Value>) -> Option<Map<String, Value>> {
        canonical::<NotifyListAttrs>(attrs)
    }

    fn validate(&self, data: &ResourceData) -> Result<()> {
        data.decode::<NotifyListAttrs>()?.validate()
    }

    async fn create(&self, data: &mut ResourceData) -> Result<()> {
        let attrs: NotifyListAttrs = data.decode()?;

        let list = self.client.create_notify_list(&attrs.to_model(None)).await?;
        let id = list
            .id
            .clone()
            .ok_or_else(|| Error::Other("notify list created without an id".to_string()))?;
        info!("Created notify list {} ({})", list.name, id);

        data.set_id(id);
        data.set_state(&NotifyListAttrs::from_model(&list))
    }

    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let Some(list) = found(data, TYPE_NAME, self.client.get_notify_list(&id).await)? else {
            return Ok(());
        };
        data.set_state(&NotifyListAttrs::from_model(&list))
    }

    async fn update(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let attrs: NotifyListAttrs = data.decode()?;

        let list = self.client.update_notify_list(&attrs.to_model(Some(id))).await?;
        data.set_state(&NotifyListAttrs::from_model(&list))
    }

    async fn delete(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let result = self.client.delete_notify_list(&id).await;
        deleted(data, result)
    }
}
