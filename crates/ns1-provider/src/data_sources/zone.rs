//! `ns1_zone` data source: an existing zone by name

use std::sync::Arc;

use async_trait::async_trait;
use ns1_client::Ns1Client;
use ns1_core::{DataSource, Error, ResourceData, Result};
use serde::Deserialize;

use crate::resources::zone::ZoneAttrs;

pub const TYPE_NAME: &str = "ns1_zone";

#[derive(Debug, Deserialize)]
struct ZoneLookup {
    #[serde(default)]
    zone: String,
}

pub struct ZoneDataSource {
    client: Arc<Ns1Client>,
}

impl ZoneDataSource {
    pub fn new(client: Arc<Ns1Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for ZoneDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let lookup: ZoneLookup = data.decode()?;
        if lookup.zone.is_empty() {
            return Err(Error::validation("zone: required attribute is empty"));
        }

        let zone = self.client.get_zone(&lookup.zone).await?;
        data.set_id(zone.zone.clone());
        data.set_state(&ZoneAttrs::from_model(&zone, None))
    }
}
