//! Data models: record metadata, feed pointers, data sources and feeds

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Pointer to a data feed that supplies a metadata value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPtr {
    pub feed: String,
}

/// A metadata value: either a literal or a feed pointer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue<T> {
    /// Value sourced from a data feed
    Feed(FeedPtr),
    /// Literal value
    Value(T),
}

impl<T> MetaValue<T> {
    /// The literal value, if this is not a feed pointer
    pub fn value(&self) -> Option<&T> {
        match self {
            MetaValue::Value(v) => Some(v),
            MetaValue::Feed(_) => None,
        }
    }
}

impl<T> From<T> for MetaValue<T> {
    fn from(value: T) -> Self {
        MetaValue::Value(value)
    }
}

/// Answer, region or record metadata used by the filter chain
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up: Option<MetaValue<bool>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<MetaValue<u64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests: Option<MetaValue<u64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loadavg: Option<MetaValue<f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pulsar: Option<MetaValue<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<MetaValue<f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<MetaValue<f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub georegion: Option<MetaValue<Vec<String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<MetaValue<Vec<String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub us_state: Option<MetaValue<Vec<String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_province: Option<MetaValue<Vec<String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<MetaValue<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_prefixes: Option<MetaValue<Vec<String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn: Option<MetaValue<Vec<u32>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<MetaValue<u64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<MetaValue<f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_watermark: Option<MetaValue<u64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_watermark: Option<MetaValue<u64>>,

    /// Country code → subdivision codes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdivisions: Option<MetaValue<BTreeMap<String, Vec<String>>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<MetaValue<f64>>,
}

impl Meta {
    /// Whether no field is set
    pub fn is_empty(&self) -> bool {
        *self == Meta::default()
    }
}

/// A data source (monitoring, or a third-party feed integration)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    pub sourcetype: String,

    #[serde(default)]
    pub config: Map<String, Value>,
}

/// A feed belonging to a data source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataFeed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(default)]
    pub config: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_meta_value_feed_or_literal() {
        let meta: Meta = serde_json::from_value(json!({
            "up": {"feed": "f1"},
            "weight": 2.5,
            "subdivisions": {"US": ["CA", "NY"]}
        }))
        .unwrap();

        assert_eq!(
            meta.up,
            Some(MetaValue::Feed(FeedPtr {
                feed: "f1".to_string()
            }))
        );
        assert_eq!(meta.weight.as_ref().and_then(MetaValue::value), Some(&2.5));
        assert!(meta.subdivisions.is_some());
    }

    #[test]
    fn test_empty_meta_serializes_to_empty_object() {
        assert!(Meta::default().is_empty());
        assert_eq!(serde_json::to_value(Meta::default()).unwrap(), json!({}));
    }
}
