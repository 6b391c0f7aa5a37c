//! `ns1_datafeed`: a feed of a data source that answer metadata can point at
//!
//! Feeds are addressed through their source, so the import ID is
//! `source_id/feed_id`.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use ns1_client::Ns1Client;
use ns1_client::model::DataFeed;
use ns1_core::data::attr;
use ns1_core::diff::canonical;
use ns1_core::{Error, Resource, ResourceData, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use super::{deleted, found, require};
use crate::config_values;

pub const TYPE_NAME: &str = "ns1_datafeed";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataFeedAttrs {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub source_id: String,
    #[serde(default, deserialize_with = "attr::string_map")]
    pub config: BTreeMap<String, String>,
}

impl DataFeedAttrs {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name);
        require(&mut errors, "source_id", &self.source_id);
        Error::from_validation(errors)
    }

    pub fn to_model(&self, id: Option<String>) -> DataFeed {
        DataFeed {
            id,
            name: self.name.clone(),
            config: config_values::to_wire(&self.config),
        }
    }

    pub fn from_model(source_id: &str, feed: &DataFeed) -> Self {
        Self {
            name: feed.name.clone(),
            source_id: source_id.to_string(),
            config: config_values::from_wire(&feed.config),
        }
    }
}

/// Split a `source_id/feed_id` import ID
pub fn parse_import_id(id: &str) -> Result<(String, String)> {
    match id.split_once('/') {
        Some((source, feed)) if !source.is_empty() && !feed.is_empty() && !feed.contains('/') => {
            Ok((source.to_string(), feed.to_string()))
        }
        _ => Err(Error::invalid_input(format!(
            "invalid data feed import id {:?}, expected source_id/feed_id",
            id
        ))),
    }
}

pub struct DataFeedResource {
    client: Arc<Ns1Client>,
}

impl DataFeedResource {
    pub fn new(client: Arc<Ns1Client>) -> Self {
        Self { client }
    }

    async fn fetch(&self, data: &mut ResourceData, source_id: &str, feed_id: &str) -> Result<()> {
        let result = self.client.get_data_feed(source_id, feed_id).await;
        let Some(feed) = found(data, TYPE_NAME, result)? else {
            return Ok(());
        };
        data.set_state(&DataFeedAttrs::from_model(source_id, &feed))
    }
}

#[async_trait]
impl Resource for DataFeedResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn canonicalize(&self, attrs: &Map<String, Value>) -> Option<Map<String, Value>> {
        canonical::<DataFeedAttrs>(attrs)
    }

    fn force_new(&self) -> &'static [&'static str] {
        &["source_id"]
    }

    fn validate(&self, data: &ResourceData) -> Result<()> {
        data.decode::<DataFeedAttrs>()?.validate()
    }

    async fn create(&self, data: &mut ResourceData) -> Result<()> {
        let attrs: DataFeedAttrs = data.decode()?;

        let feed = self
            .client
            .create_data_feed(&attrs.source_id, &attrs.to_model(None))
            .await?;
        let id = feed
            .id
            .clone()
            .ok_or_else(|| Error::Other("data feed created without an id".to_string()))?;
        info!("Created data feed {} ({}) on source {}", feed.name, id, attrs.source_id);

        data.set_id(id);
        data.set_state(&DataFeedAttrs::from_model(&attrs.source_id, &feed))
    }

    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let state: DataFeedAttrs = data.decode_state()?;
        self.fetch(data, &state.source_id, &id).await
    }

    async fn update(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let attrs: DataFeedAttrs = data.decode()?;

        let feed = self
            .client
            .update_data_feed(&attrs.source_id, &attrs.to_model(Some(id)))
            .await?;
        data.set_state(&DataFeedAttrs::from_model(&attrs.source_id, &feed))
    }

    async fn delete(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let state: DataFeedAttrs = data.decode_state()?;
        let result = self.client.delete_data_feed(&state.source_id, &id).await;
        deleted(data, result)
    }

    async fn import(&self, id: &str, data: &mut ResourceData) -> Result<()> {
        let (source_id, feed_id) = parse_import_id(id)?;
        data.set_id(feed_id.clone());
        self.fetch(data, &source_id, &feed_id).await
    }
}
