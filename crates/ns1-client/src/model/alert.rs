//! Alerting models

use serde::{Deserialize, Serialize};

/// An account alert delivered to notification lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    /// Alert category, e.g. `zone`
    #[serde(rename = "type")]
    pub alert_type: String,

    /// Condition within the category, e.g. `transfer_failed`
    pub subtype: String,

    #[serde(default)]
    pub notifier_list_ids: Vec<String>,

    #[serde(default)]
    pub zone_names: Vec<String>,

    #[serde(default)]
    pub record_ids: Vec<String>,

    #[serde(default, skip_serializing)]
    pub created_at: Option<i64>,

    #[serde(default, skip_serializing)]
    pub created_by: Option<String>,

    #[serde(default, skip_serializing)]
    pub updated_at: Option<i64>,

    #[serde(default, skip_serializing)]
    pub updated_by: Option<String>,
}
