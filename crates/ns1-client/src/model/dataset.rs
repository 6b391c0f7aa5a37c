//! Dataset models: scheduled usage reports

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A dataset definition producing periodic reports
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    pub datatype: Datatype,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<Repeat>,

    pub timeframe: Timeframe,

    pub export_type: String,

    #[serde(default, skip_serializing)]
    pub reports: Vec<Report>,

    #[serde(default)]
    pub recipient_emails: Vec<String>,

    #[serde(default, skip_serializing)]
    pub created_at: Option<i64>,

    #[serde(default, skip_serializing)]
    pub updated_at: Option<i64>,
}

/// What a dataset measures and over which scope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Datatype {
    #[serde(rename = "type")]
    pub data_type: String,
    pub scope: String,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

/// Repetition schedule of a dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repeat {
    pub start: i64,
    pub repeats_every: String,
    pub end_after_n: u32,
}

/// Time window a dataset report covers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeframe {
    pub aggregation: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycles: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<i64>,
}

/// A generated report of a dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub start: Option<i64>,
    #[serde(default)]
    pub end: Option<i64>,
    #[serde(default)]
    pub created_at: Option<i64>,
}
