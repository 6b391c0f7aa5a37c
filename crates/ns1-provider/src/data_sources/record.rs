//! `ns1_record` data source: an existing record by zone, domain and type

use std::sync::Arc;

use async_trait::async_trait;
use ns1_client::Ns1Client;
use ns1_core::{DataSource, Error, ResourceData, Result};
use serde::Deserialize;

use crate::resources::record::RecordAttrs;

pub const TYPE_NAME: &str = "ns1_record";

#[derive(Debug, Deserialize)]
struct RecordLookup {
    #[serde(default)]
    zone: String,
    #[serde(default)]
    domain: String,
    #[serde(default, rename = "type")]
    record_type: String,
}

pub struct RecordDataSource {
    client: Arc<Ns1Client>,
}

impl RecordDataSource {
    pub fn new(client: Arc<Ns1Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for RecordDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let lookup: RecordLookup = data.decode()?;

        let mut errors = Vec::new();
        for (key, value) in [
            ("zone", &lookup.zone),
            ("domain", &lookup.domain),
            ("type", &lookup.record_type),
        ] {
            if value.is_empty() {
                errors.push(format!("{}: required attribute is empty", key));
            }
        }
        Error::from_validation(errors)?;

        let record_type = lookup.record_type.to_uppercase();
        let record = self
            .client
            .get_record(&lookup.zone, &lookup.domain, &record_type)
            .await?;

        data.set_id(format!("{}/{}/{}", lookup.zone, lookup.domain, record_type));
        data.set_state(&RecordAttrs::from_model(&record))
    }
}
