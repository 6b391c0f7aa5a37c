//! DNS models: zones, records, views and TSIG keys

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::data::Meta;

/// A DNS zone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub zone: String,

    /// Zone this one is linked to, sharing its records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nx_ttl: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<u32>,

    #[serde(default, skip_serializing)]
    pub serial: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostmaster: Option<String>,

    /// Nameservers the zone is served from (server-computed)
    #[serde(default, skip_serializing)]
    pub dns_servers: Vec<String>,

    /// Networks the zone is published to
    #[serde(
        default,
        rename = "networks",
        skip_serializing_if = "Option::is_none"
    )]
    pub network_ids: Option<Vec<u32>>,

    /// Present when NS1 is secondary for this zone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<ZoneSecondary>,

    /// Present when NS1 is primary for this zone and notifies secondaries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<ZonePrimary>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dnssec: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
}

impl Zone {
    /// Create a zone model with only its name set
    pub fn new(zone: impl Into<String>) -> Self {
        Self {
            zone: zone.into(),
            ..Self::default()
        }
    }
}

/// Secondary-zone settings: where NS1 transfers the zone from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneSecondary {
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_ip: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_port: Option<u16>,

    #[serde(default)]
    pub other_ips: Vec<String>,

    #[serde(default)]
    pub other_ports: Vec<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tsig: Option<ZoneTsig>,

    #[serde(default, skip_serializing)]
    pub expired: Option<bool>,

    #[serde(default, skip_serializing)]
    pub last_xfr: Option<i64>,
}

/// Primary-zone settings: secondaries NS1 allows transfers to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZonePrimary {
    pub enabled: bool,

    #[serde(default)]
    pub secondaries: Vec<ZoneSecondaryServer>,
}

/// A secondary server of a primary zone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneSecondaryServer {
    pub ip: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default)]
    pub notify: bool,

    #[serde(default)]
    pub networks: Vec<u32>,
}

/// TSIG settings for zone transfers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneTsig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

/// A DNS record (all answers for one domain and type)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub zone: String,

    pub domain: String,

    #[serde(rename = "type")]
    pub record_type: String,

    /// Domain this record links to, replacing its answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_client_subnet: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_ttl: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_address_records: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    #[serde(default)]
    pub answers: Vec<Answer>,

    #[serde(default)]
    pub filters: Vec<Filter>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub regions: BTreeMap<String, Region>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_tags: Option<Vec<String>>,
}

/// One answer of a record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Rdata fields; the API returns numeric fields (MX preference) as numbers
    #[serde(rename = "answer")]
    pub rdata: Vec<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl Answer {
    /// Create an answer from rdata strings
    pub fn new<I, S>(rdata: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rdata: rdata.into_iter().map(|s| Value::String(s.into())).collect(),
            ..Self::default()
        }
    }
}

/// A filter in a record's filter chain
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(rename = "filter")]
    pub filter_type: String,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,

    #[serde(default)]
    pub config: Map<String, Value>,
}

/// Metadata attached to a named region of a record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Region {
    #[serde(default)]
    pub meta: Meta,
}

/// A DNS view restricting which clients see which zones
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub name: String,

    #[serde(default)]
    pub read_acls: Vec<String>,

    #[serde(default)]
    pub update_acls: Vec<String>,

    #[serde(default)]
    pub zones: Vec<String>,

    #[serde(default)]
    pub networks: Vec<u32>,

    #[serde(default)]
    pub preference: u32,

    #[serde(default, skip_serializing)]
    pub created_at: Option<i64>,

    #[serde(default, skip_serializing)]
    pub updated_at: Option<i64>,
}

/// A TSIG key used to sign zone transfers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TsigKey {
    pub name: String,
    pub algorithm: String,
    pub secret: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_zone_create_body_is_minimal() {
        let body = serde_json::to_value(Zone::new("example.io")).unwrap();
        assert_eq!(body, json!({"zone": "example.io"}));
    }

    #[test]
    fn test_record_decodes_numeric_rdata() {
        let record: Record = serde_json::from_value(json!({
            "id": "r1",
            "zone": "example.io",
            "domain": "example.io",
            "type": "MX",
            "answers": [{"answer": [10, "mx1.example.io"], "id": "a1"}],
            "filters": [{"filter": "up", "config": {}}]
        }))
        .unwrap();

        assert_eq!(record.answers[0].rdata, vec![json!(10), json!("mx1.example.io")]);
        assert!(!record.filters[0].disabled);
    }

    #[test]
    fn test_filter_skips_disabled_false() {
        let filter = Filter {
            filter_type: "up".to_string(),
            disabled: false,
            config: Map::new(),
        };
        assert_eq!(
            serde_json::to_value(filter).unwrap(),
            json!({"filter": "up", "config": {}})
        );
    }
}
