//! `ns1_datasource`: a source of metadata updates, such as NS1 monitoring or
//! a third-party integration

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use ns1_client::Ns1Client;
use ns1_client::model::DataSource;
use ns1_core::data::attr;
use ns1_core::diff::canonical;
use ns1_core::{Error, Resource, ResourceData, Result, StringEnum};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use super::{deleted, found, require};
use crate::config_values;

pub const TYPE_NAME: &str = "ns1_datasource";

pub static SOURCE_TYPES: LazyLock<StringEnum> = LazyLock::new(|| {
    StringEnum::new(&[
        "nsone_v1",
        "nsone_monitoring",
        "a10",
        "aws",
        "cloudwatch",
        "datadog",
        "dynatrace",
        "newrelic",
        "pingdom",
        "rackspace",
        "statuscake",
        "webhook",
    ])
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSourceAttrs {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sourcetype: String,
    #[serde(default, deserialize_with = "attr::string_map")]
    pub config: BTreeMap<String, String>,
}

impl DataSourceAttrs {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name);
        SOURCE_TYPES.validate_into("sourcetype", &self.sourcetype, &mut errors);
        Error::from_validation(errors)
    }

    pub fn to_model(&self, id: Option<String>) -> DataSource {
        DataSource {
            id,
            name: self.name.clone(),
            sourcetype: self.sourcetype.clone(),
            config: config_values::to_wire(&self.config),
        }
    }

    pub fn from_model(source: &DataSource) -> Self {
        Self {
            name: source.name.clone(),
            sourcetype: source.sourcetype.clone(),
            config: config_values::from_wire(&source.config),
        }
    }
}

pub struct DataSourceResource {
    client: Arc<Ns1Client>,
}

impl DataSourceResource {
    pub fn new(client: Arc<Ns1Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for DataSourceResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn canonicalize(&self, attrs: &Map<String, Value>) -> Option<Map<String, Value>> {
        canonical::<DataSourceAttrs>(attrs)
    }

    fn force_new(&self) -> &'static [&'static str] {
        &["sourcetype"]
    }

    fn validate(&self, data: &ResourceData) -> Result<()> {
        data.decode::<DataSourceAttrs>()?.validate()
    }

    async fn create(&self, data: &mut ResourceData) -> Result<()> {
        let attrs: DataSourceAttrs = data.decode()?;

        let source = self.client.create_data_source(&attrs.to_model(None)).await?;
        let id = source
            .id
            .clone()
            .ok_or_else(|| Error::Other("data source created without an id".to_string()))?;
        info!("Created {} data source {} ({})", source.sourcetype, source.name, id);

        data.set_id(id);
        data.set_state(&DataSourceAttrs::from_model(&source))
    }

    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let Some(source) = found(data, TYPE_NAME, self.client.get_data_source(&id).await)? else {
            return Ok(());
        };
        data.set_state(&DataSourceAttrs::from_model(&source))
    }

    async fn update(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let attrs: DataSourceAttrs = data.decode()?;

        let source = self.client.update_data_source(&attrs.to_model(Some(id))).await?;
        data.set_state(&DataSourceAttrs::from_model(&source))
    }

    async fn delete(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let result = self.client.delete_data_source(&id).await;
        deleted(data, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_sourcetype_is_rejected() {
        let attrs: DataSourceAttrs =
            ResourceData::from_config(json!({"name": "feeds", "sourcetype": "carrier_pigeon"}))
                .unwrap()
                .decode()
                .unwrap();

        let err = attrs.validate().unwrap_err();
        assert!(err.validation_errors().unwrap()[0].starts_with("sourcetype: expecting one of"));
    }

    #[test]
    fn test_config_round_trip() {
        let attrs = DataSourceAttrs {
            name: "pd".into(),
            sourcetype: "nsone_v1".into(),
            config: BTreeMap::from([("timeout".to_string(), "30".to_string())]),
        };

        let model = attrs.to_model(None);
        assert_eq!(model.config["timeout"], json!(30));
        assert_eq!(DataSourceAttrs::from_model(&model), attrs);
    }
}
