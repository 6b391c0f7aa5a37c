//! Monitoring models: jobs, notification lists and monitoring regions

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A monitoring job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    pub job_type: String,

    #[serde(default)]
    pub active: bool,

    #[serde(default)]
    pub regions: Vec<String>,

    pub frequency: u32,

    #[serde(default)]
    pub rapid_recheck: bool,

    /// How many regions must fail for the job to fail
    pub policy: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_scope: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Job-type specific settings (host, port, url, ...)
    #[serde(default)]
    pub config: Map<String, Value>,

    #[serde(default)]
    pub notify_delay: u32,

    #[serde(default)]
    pub notify_repeat: u32,

    #[serde(default)]
    pub notify_failback: bool,

    #[serde(default)]
    pub notify_regional: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_list: Option<String>,

    #[serde(default)]
    pub rules: Vec<Rule>,

    #[serde(default)]
    pub mute: bool,
}

/// A rule deciding whether a job's output means failure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub key: String,
    pub value: Value,
    pub comparison: String,
}

/// A notification list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotifyList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(default, rename = "notify_list")]
    pub notifiers: Vec<Notifier>,
}

/// One notification target of a list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Notifier {
    #[serde(rename = "type")]
    pub notifier_type: String,

    #[serde(default)]
    pub config: Map<String, Value>,
}

/// A region monitoring jobs can run from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorRegion {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub subnets: Vec<String>,
}
