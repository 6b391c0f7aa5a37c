//! `ns1_dataset`: a scheduled usage report
//!
//! The API has no update for datasets. Every attribute forces replacement and
//! an in-place update is rejected.

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use ns1_client::Ns1Client;
use ns1_client::model::{Dataset, Datatype, Repeat, Report, Timeframe};
use ns1_core::data::attr;
use ns1_core::diff::canonical;
use ns1_core::{Error, Resource, ResourceData, Result, StringEnum};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use super::{deleted, found, require};

pub const TYPE_NAME: &str = "ns1_dataset";

/// Attributes the API fills in when left unset
const COMPUTED: &[&str] = &["reports"];

pub static DATATYPE_TYPES: LazyLock<StringEnum> = LazyLock::new(|| {
    StringEnum::new(&["num_queries", "num_ebot_response", "num_nxd_response", "zero_queries"])
});

pub static DATATYPE_SCOPES: LazyLock<StringEnum> = LazyLock::new(|| {
    StringEnum::new(&[
        "account",
        "network_single",
        "record_single",
        "zone_single",
        "network_each",
        "record_each",
        "zone_each",
        "top_n_zones",
        "top_n_records",
    ])
});

pub static REPEAT_INTERVALS: LazyLock<StringEnum> =
    LazyLock::new(|| StringEnum::new(&["hour", "day", "week", "month"]));

pub static AGGREGATIONS: LazyLock<StringEnum> =
    LazyLock::new(|| StringEnum::new(&["daily", "weekly", "monthly", "billing_period"]));

pub static EXPORT_TYPES: LazyLock<StringEnum> =
    LazyLock::new(|| StringEnum::new(&["csv", "json", "xlsx"]));

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetAttrs {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub datatype: DatatypeAttrs,
    #[serde(default)]
    pub repeat: Option<RepeatAttrs>,
    #[serde(default)]
    pub timeframe: TimeframeAttrs,
    #[serde(default)]
    pub export_type: String,
    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub recipient_emails: Vec<String>,
    /// Generated reports, computed
    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub reports: Vec<Report>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatatypeAttrs {
    #[serde(default, rename = "type")]
    pub data_type: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default, deserialize_with = "attr::string_map")]
    pub data: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepeatAttrs {
    pub start: i64,
    pub repeats_every: String,
    #[serde(default)]
    pub end_after_n: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeframeAttrs {
    #[serde(default)]
    pub aggregation: String,
    #[serde(default)]
    pub cycles: Option<u32>,
    #[serde(default)]
    pub from: Option<i64>,
    #[serde(default)]
    pub to: Option<i64>,
}

impl DatasetAttrs {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name);
        DATATYPE_TYPES.validate_into("datatype.type", &self.datatype.data_type, &mut errors);
        DATATYPE_SCOPES.validate_into("datatype.scope", &self.datatype.scope, &mut errors);
        if let Some(repeat) = &self.repeat {
            REPEAT_INTERVALS.validate_into(
                "repeat.repeats_every",
                &repeat.repeats_every,
                &mut errors,
            );
        }
        AGGREGATIONS.validate_into(
            "timeframe.aggregation",
            &self.timeframe.aggregation,
            &mut errors,
        );
        if let (Some(from), Some(to)) = (self.timeframe.from, self.timeframe.to) {
            if from > to {
                errors.push("timeframe: from must not be after to".to_string());
            }
        }
        EXPORT_TYPES.validate_into("export_type", &self.export_type, &mut errors);
        Error::from_validation(errors)
    }

    pub fn to_model(&self) -> Dataset {
        Dataset {
            id: None,
            name: self.name.clone(),
            datatype: Datatype {
                data_type: self.datatype.data_type.clone(),
                scope: self.datatype.scope.clone(),
                data: self.datatype.data.clone(),
            },
            repeat: self.repeat.as_ref().map(|r| Repeat {
                start: r.start,
                repeats_every: r.repeats_every.clone(),
                end_after_n: r.end_after_n,
            }),
            timeframe: Timeframe {
                aggregation: self.timeframe.aggregation.clone(),
                cycles: self.timeframe.cycles,
                from: self.timeframe.from,
                to: self.timeframe.to,
            },
            export_type: self.export_type.clone(),
            reports: Vec::new(),
            recipient_emails: self.recipient_emails.clone(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn from_model(dataset: &Dataset) -> Self {
        Self {
            name: dataset.name.clone(),
            datatype: DatatypeAttrs {
                data_type: dataset.datatype.data_type.clone(),
                scope: dataset.datatype.scope.clone(),
                data: dataset.datatype.data.clone(),
            },
            repeat: dataset.repeat.as_ref().map(|r| RepeatAttrs {
                start: r.start,
                repeats_every: r.repeats_every.clone(),
                end_after_n: r.end_after_n,
            }),
            timeframe: TimeframeAttrs {
                aggregation: dataset.timeframe.aggregation.clone(),
                cycles: dataset.timeframe.cycles,
                from: dataset.timeframe.from,
                to: dataset.timeframe.to,
            },
            export_type: dataset.export_type.clone(),
            recipient_emails: dataset.recipient_emails.clone(),
            reports: dataset.reports.clone(),
        }
    }
}

pub struct DatasetResource {
    client: Arc<Ns1Client>,
}

impl DatasetResource {
    pub fn new(client: Arc<Ns1Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for DatasetResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn computed(&self) -> &'static [&'static str] {
        COMPUTED
    }

    fn canonicalize(&self, attrs: &Map<String, Value>) -> Option<Map<String, Value>> {
        canonical::<DatasetAttrs>(attrs)
    }

    fn force_new(&self) -> &'static [&'static str] {
        &[
            "name",
            "datatype",
            "repeat",
            "timeframe",
            "export_type",
            "recipient_emails",
        ]
    }

    fn validate(&self, data: &ResourceData) -> Result<()> {
        data.decode_with_computed::<DatasetAttrs>(COMPUTED)?.validate()
    }

    async fn create(&self, data: &mut ResourceData) -> Result<()> {
        let attrs: DatasetAttrs = data.decode_with_computed(COMPUTED)?;

        let dataset = self.client.create_dataset(&attrs.to_model()).await?;
        let id = dataset
            .id
            .clone()
            .ok_or_else(|| Error::Other("dataset created without an id".to_string()))?;
        info!("Created dataset {} ({})", dataset.name, id);

        data.set_id(id);
        data.set_state(&DatasetAttrs::from_model(&dataset))
    }

    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let Some(dataset) = found(data, TYPE_NAME, self.client.get_dataset(&id).await)? else {
            return Ok(());
        };
        data.set_state(&DatasetAttrs::from_model(&dataset))
    }

    async fn update(&self, _data: &mut ResourceData) -> Result<()> {
        Err(Error::unsupported(
            "datasets cannot be updated in place, change forces a new dataset",
        ))
    }

    async fn delete(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let result = self.client.delete_dataset(&id).await;
        deleted(data, result)
    }
}
