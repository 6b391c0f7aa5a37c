//! Pulsar models: applications and their measurement jobs

use serde::{Deserialize, Serialize};

/// A Pulsar application grouping measurement jobs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Application {
    #[serde(default, rename = "appid", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_wait_millis: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs_per_transaction: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_config: Option<DefaultConfig>,
}

/// Defaults applied to every job of an application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultConfig {
    #[serde(default)]
    pub http: bool,
    #[serde(default)]
    pub https: bool,
    #[serde(default)]
    pub request_timeout_millis: u32,
    #[serde(default)]
    pub job_timeout_millis: u32,
    #[serde(default)]
    pub use_xhr: bool,
    #[serde(default)]
    pub static_values: bool,
}

/// A Pulsar measurement job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PulsarJob {
    #[serde(default, rename = "jobid", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "appid")]
    pub app_id: String,

    #[serde(rename = "typeid")]
    pub type_id: String,

    pub name: String,

    #[serde(default)]
    pub active: bool,

    #[serde(default)]
    pub shared: bool,

    #[serde(default, skip_serializing)]
    pub community: Option<bool>,

    #[serde(default, skip_serializing)]
    pub customer: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<JobConfig>,
}

/// Measurement settings of a Pulsar job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub https: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_millis: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_timeout_millis: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_xhr: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_values: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_metric_weights: Option<BlendMetricWeights>,
}

/// How measurements are blended into a single score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlendMetricWeights {
    pub timestamp: u64,
    #[serde(default)]
    pub weights: Vec<Weight>,
}

/// One weighted metric of a blend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Weight {
    pub name: String,
    pub weight: u32,
    pub default_value: f64,
    #[serde(default)]
    pub maximize: bool,
}
