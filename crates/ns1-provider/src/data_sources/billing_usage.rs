//! `ns1_billing_usage` data source: account usage counters for one metric
//!
//! `queries`, `limits` and `decisions` cover a window given as Unix
//! timestamps in `from` and `to`. The other metrics are current totals and
//! ignore the window.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use ns1_client::Ns1Client;
use ns1_client::model::{QueryUsage, TotalUsage, UsageLimits};
use ns1_core::validation::StringEnum;
use ns1_core::{DataSource, Error, ResourceData, Result};
use serde::{Deserialize, Serialize};

pub const TYPE_NAME: &str = "ns1_billing_usage";

pub static METRIC_TYPES: LazyLock<StringEnum> = LazyLock::new(|| {
    StringEnum::new(&["queries", "limits", "decisions", "records", "monitors", "filter_chains"])
});

#[derive(Debug, Default, Deserialize)]
struct UsageLookup {
    #[serde(default)]
    metric_type: String,
    from: Option<i64>,
    to: Option<i64>,
}

impl UsageLookup {
    fn windowed(&self) -> bool {
        matches!(self.metric_type.as_str(), "queries" | "limits" | "decisions")
    }

    fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        METRIC_TYPES.validate_into("metric_type", &self.metric_type, &mut errors);
        if self.windowed() {
            match (self.from, self.to) {
                (Some(from), Some(to)) if from >= to => {
                    errors.push("from: must be earlier than to".to_string())
                }
                (Some(_), Some(_)) => {}
                _ => errors.push(format!(
                    "from, to: required for metric_type {:?}",
                    self.metric_type
                )),
            }
        }
        Error::from_validation(errors)
    }

    /// The window, for metrics that take one
    fn window(&self) -> Option<(i64, i64)> {
        if !self.windowed() {
            return None;
        }
        self.from.zip(self.to)
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Usage {
    Queries(QueryUsage),
    Limits(UsageLimits),
    Total(TotalUsage),
}

#[derive(Debug, Serialize)]
struct UsageState<'a> {
    metric_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<i64>,
    #[serde(flatten)]
    usage: Usage,
}

pub struct BillingUsageDataSource {
    client: Arc<Ns1Client>,
}

impl BillingUsageDataSource {
    pub fn new(client: Arc<Ns1Client>) -> Self {
        Self { client }
    }

    async fn fetch(&self, lookup: &UsageLookup) -> Result<Usage> {
        let window = lookup.window();
        let usage = match (lookup.metric_type.as_str(), window) {
            ("queries", Some((from, to))) => {
                Usage::Queries(self.client.get_query_usage(from, to).await?)
            }
            ("limits", Some((from, to))) => {
                Usage::Limits(self.client.get_usage_limits(from, to).await?)
            }
            ("decisions", Some((from, to))) => {
                Usage::Total(self.client.get_decision_usage(from, to).await?)
            }
            ("records", _) => Usage::Total(self.client.get_record_usage().await?),
            ("monitors", _) => Usage::Total(self.client.get_monitor_usage().await?),
            ("filter_chains", _) => Usage::Total(self.client.get_filter_chain_usage().await?),
            (other, _) => {
                return Err(Error::invalid_input(format!("unknown metric_type {:?}", other)));
            }
        };
        Ok(usage)
    }
}

#[async_trait]
impl DataSource for BillingUsageDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let lookup: UsageLookup = data.decode()?;
        lookup.validate()?;

        let usage = self.fetch(&lookup).await?;

        data.set_id(format!("billing_usage/{}", lookup.metric_type));
        let window = lookup.window();
        data.set_state(&UsageState {
            metric_type: &lookup.metric_type,
            from: window.map(|(from, _)| from),
            to: window.map(|(_, to)| to),
            usage,
        })
    }
}
