//! IPAM and network models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An IPAM subnet (an "address" object with a prefix)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subnet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    pub prefix: String,

    pub network_id: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,

    #[serde(default, skip_serializing)]
    pub parent_id: Option<u64>,

    #[serde(default, skip_serializing)]
    pub children: Option<u32>,

    #[serde(default, skip_serializing)]
    pub total_addresses: Option<u64>,

    #[serde(default, skip_serializing)]
    pub free_addresses: Option<u64>,

    #[serde(default, skip_serializing)]
    pub used_addresses: Option<u64>,
}

/// An NS1 network zones can be published to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub network_id: u32,
    pub name: String,
    #[serde(default)]
    pub label: String,
}
