//! `ns1_alert`: an account alert delivered to notification lists

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use ns1_client::Ns1Client;
use ns1_client::model::Alert;
use ns1_core::data::attr;
use ns1_core::diff::canonical;
use ns1_core::{Error, Resource, ResourceData, Result, StringEnum};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use super::{deleted, found, require};

pub const TYPE_NAME: &str = "ns1_alert";

/// Attributes the API fills in when left unset
const COMPUTED: &[&str] = &["created_at", "created_by", "updated_at", "updated_by"];

pub static ALERT_TYPES: LazyLock<StringEnum> =
    LazyLock::new(|| StringEnum::new(&["zone", "account", "redirect"]));

pub static ALERT_SUBTYPES: LazyLock<StringEnum> = LazyLock::new(|| {
    StringEnum::new(&[
        "transfer_failed",
        "record_usage",
        "query_usage",
        "certificate_renewal_failed",
    ])
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertAttrs {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub alert_type: String,
    #[serde(default)]
    pub subtype: String,
    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub notifier_list_ids: Vec<String>,
    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub zone_names: Vec<String>,
    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub record_ids: Vec<String>,

    // Computed
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub updated_at: Option<i64>,
    #[serde(default)]
    pub updated_by: Option<String>,
}

impl AlertAttrs {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name);
        ALERT_TYPES.validate_into("type", &self.alert_type, &mut errors);
        ALERT_SUBTYPES.validate_into("subtype", &self.subtype, &mut errors);
        Error::from_validation(errors)
    }

    pub fn to_model(&self, id: Option<String>) -> Alert {
        Alert {
            id,
            name: self.name.clone(),
            alert_type: self.alert_type.clone(),
            subtype: self.subtype.clone(),
            notifier_list_ids: self.notifier_list_ids.clone(),
            zone_names: self.zone_names.clone(),
            record_ids: self.record_ids.clone(),
            ..Default::default()
        }
    }

    pub fn from_model(alert: &Alert) -> Self {
        Self {
            name: alert.name.clone(),
            alert_type: alert.alert_type.clone(),
            subtype: alert.subtype.clone(),
            notifier_list_ids: alert.notifier_list_ids.clone(),
            zone_names: alert.zone_names.clone(),
            record_ids: alert.record_ids.clone(),
            created_at: alert.created_at,
            created_by: alert.created_by.clone(),
            updated_at: alert.updated_at,
            updated_by: alert.updated_by.clone(),
        }
    }
}

pub struct AlertResource {
    client: Arc<Ns1Client>,
}

impl AlertResource {
    pub fn new(client: Arc<Ns1Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for AlertResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn computed(&self) -> &'static [&'static str] {
        COMPUTED
    }

    fn canonicalize(&self, attrs: &Map<String, Value>) -> Option<Map<String, Value>> {
        canonical::<AlertAttrs>(attrs)
    }

    fn force_new(&self) -> &'static [&'static str] {
        &["type", "subtype"]
    }

    fn validate(&self, data: &ResourceData) -> Result<()> {
        data.decode_with_computed::<AlertAttrs>(COMPUTED)?.validate()
    }

    async fn create(&self, data: &mut ResourceData) -> Result<()> {
        let attrs: AlertAttrs = data.decode_with_computed(COMPUTED)?;

        let alert = self.client.create_alert(&attrs.to_model(None)).await?;
        let id = alert
            .id
            .clone()
            .ok_or_else(|| Error::Other("alert created without an id".to_string()))?;
        info!("Created {}/{} alert {} ({})", alert.alert_type, alert.subtype, alert.name, id);

        data.set_id(id);
        data.set_state(&AlertAttrs::from_model(&alert))
    }

    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let Some(alert) = found(data, TYPE_NAME, self.client.get_alert(&id).await)? else {
            return Ok(());
        };
        data.set_state(&AlertAttrs::from_model(&alert))
    }

    async fn update(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let attrs: AlertAttrs = data.decode_with_computed(COMPUTED)?;

        let alert = self.client.update_alert(&attrs.to_model(Some(id))).await?;
        data.set_state(&AlertAttrs::from_model(&alert))
    }

    async fn delete(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let result = self.client.delete_alert(&id).await;
        deleted(data, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_audit_fields_stay_out_of_requests() {
        let attrs: AlertAttrs = ResourceData::from_state(
            "a1",
            json!({
                "name": "xfr",
                "type": "zone",
                "subtype": "transfer_failed",
                "zone_names": ["example.io"],
                "created_by": "jdoe"
            }),
        )
        .unwrap()
        .decode()
        .unwrap();
        assert!(attrs.validate().is_ok());

        let body = serde_json::to_value(attrs.to_model(Some("a1".into()))).unwrap();
        assert_eq!(body["type"], "zone");
        assert!(body.get("created_by").is_none());
    }

    #[test]
    fn test_unknown_subtype() {
        let attrs = AlertAttrs {
            name: "x".into(),
            alert_type: "zone".into(),
            subtype: "exploded".into(),
            ..Default::default()
        };
        let err = attrs.validate().unwrap_err();
        assert!(err.validation_errors().unwrap()[0].starts_with("subtype:"));
    }
}
