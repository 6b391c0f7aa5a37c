//! Attribute diffs between recorded state and configuration
//!
//! Both sides are first brought into canonical form by the resource, then
//! nulls and empty values are dropped at every level, so an attribute the
//! API echoes back with defaults filled in compares equal to the
//! configuration that left them out. Diffs are reported on flattened string
//! values, the form attribute-level suppression rules are written against.
//!
//! For an existing resource every attribute on either side takes part: an
//! attribute removed from configuration diffs unless the resource lists it
//! as computed.

use std::collections::BTreeSet;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::data::{ResourceData, flatten_value, normalize_value};
use crate::traits::Resource;

/// A single attribute that configuration wants changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeDiff {
    /// Attribute name
    pub key: String,
    /// Flattened value in state
    pub old: String,
    /// Flattened value in configuration
    pub new: String,
    /// Whether applying the change replaces the resource
    pub requires_replace: bool,
}

/// Compute the diffs `resource` would act on for `data`
pub fn compute(resource: &dyn Resource, data: &ResourceData) -> Vec<AttributeDiff> {
    let exists = data.id().is_some();
    let old_attrs = resource
        .canonicalize(data.state())
        .unwrap_or_else(|| data.state().clone());
    let new_attrs = resource
        .canonicalize(data.config())
        .unwrap_or_else(|| data.config().clone());

    // A resource that does not exist yet only diffs what configuration sets
    let keys: BTreeSet<&String> = if exists {
        old_attrs.keys().chain(new_attrs.keys()).collect()
    } else {
        data.config().keys().collect()
    };

    let mut diffs = Vec::new();
    for key in keys {
        let old_value = old_attrs.get(key).and_then(normalize_value);
        let new_value = new_attrs.get(key).and_then(normalize_value);
        if old_value == new_value {
            continue;
        }
        if new_value.is_none() && resource.computed().contains(&key.as_str()) {
            continue;
        }

        let old = old_value.as_ref().map(flatten_value).unwrap_or_default();
        let new = new_value.as_ref().map(flatten_value).unwrap_or_default();
        if old == new {
            continue;
        }

        if resource.suppress_diff(key, &old, &new, data) {
            debug!(
                "Suppressed diff on {}.{}: {:?} -> {:?}",
                resource.type_name(),
                key,
                old,
                new
            );
            continue;
        }

        diffs.push(AttributeDiff {
            key: key.clone(),
            old,
            new,
            requires_replace: exists && resource.force_new().contains(&key.as_str()),
        });
    }

    diffs
}

/// Canonical attribute map of the typed attribute struct `T`
///
/// Decodes `attrs` as `T` and serializes it back, so defaults, map ordering
/// and stringified scalars come out the same on both sides of a diff.
/// `None` when `attrs` does not decode.
pub fn canonical<T>(attrs: &Map<String, Value>) -> Option<Map<String, Value>>
where
    T: DeserializeOwned + Serialize,
{
    let present: Map<String, Value> = attrs
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let typed: T = serde_json::from_value(Value::Object(present)).ok()?;
    match serde_json::to_value(&typed).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Suppression rule for names the API stores case-folded
pub fn case_insensitive(old: &str, new: &str) -> bool {
    old.eq_ignore_ascii_case(new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use async_trait::async_trait;
    use serde_json::json;

    struct Named;

    #[async_trait]
    impl Resource for Named {
        fn type_name(&self) -> &'static str {
            "ns1_named"
        }

        fn force_new(&self) -> &'static [&'static str] {
            &["name"]
        }

        fn computed(&self) -> &'static [&'static str] {
            &["serial"]
        }

        async fn create(&self, _data: &mut ResourceData) -> Result<()> {
            Ok(())
        }

        async fn read(&self, _data: &mut ResourceData) -> Result<()> {
            Ok(())
        }

        async fn update(&self, _data: &mut ResourceData) -> Result<()> {
            Ok(())
        }

        async fn delete(&self, _data: &mut ResourceData) -> Result<()> {
            Ok(())
        }

        fn suppress_diff(&self, key: &str, old: &str, new: &str, _data: &ResourceData) -> bool {
            key == "domain" && case_insensitive(old, new)
        }
    }

    #[test]
    fn test_new_resource_diffs_every_set_attribute() {
        let data = ResourceData::from_config(json!({"name": "a", "ttl": 60, "tags": {}})).unwrap();
        let diffs = compute(&Named, &data);

        assert_eq!(diffs.len(), 2);
        assert!(diffs.iter().all(|d| !d.requires_replace));
    }

    #[test]
    fn test_force_new_on_existing_resource() {
        let data = ResourceData::from_state("1", json!({"name": "a", "ttl": 60}))
            .unwrap()
            .with_config(json!({"name": "b", "ttl": 60}))
            .unwrap();
        let diffs = compute(&Named, &data);

        assert_eq!(
            diffs,
            vec![AttributeDiff {
                key: "name".to_string(),
                old: "a".to_string(),
                new: "b".to_string(),
                requires_replace: true,
            }]
        );
    }

    #[test]
    fn test_suppression_hook_applies() {
        let data = ResourceData::from_state("1", json!({"domain": "WWW.example.io"}))
            .unwrap()
            .with_config(json!({"domain": "www.example.io"}))
            .unwrap();
        assert!(compute(&Named, &data).is_empty());
    }

    #[test]
    fn test_unset_computed_attributes_are_ignored() {
        let data = ResourceData::from_state("1", json!({"name": "a", "serial": 7}))
            .unwrap()
            .with_config(json!({"name": "a"}))
            .unwrap();
        assert!(compute(&Named, &data).is_empty());
    }

    #[test]
    fn test_removed_attribute_diffs() {
        let data = ResourceData::from_state("1", json!({"name": "a", "link": "other.io"}))
            .unwrap()
            .with_config(json!({"name": "a", "link": null}))
            .unwrap();

        assert_eq!(
            compute(&Named, &data),
            vec![AttributeDiff {
                key: "link".to_string(),
                old: "other.io".to_string(),
                new: String::new(),
                requires_replace: false,
            }]
        );
    }

    #[test]
    fn test_nested_unset_values_compare_equal() {
        let data = ResourceData::from_state(
            "1",
            json!({"name": "a", "answers": [{"answer": "192.0.2.1", "meta": {}, "region": null}]}),
        )
        .unwrap()
        .with_config(json!({"name": "a", "answers": [{"answer": "192.0.2.1"}]}))
        .unwrap();

        assert!(compute(&Named, &data).is_empty());
    }

    #[derive(Serialize, serde::Deserialize)]
    struct Sample {
        #[serde(default)]
        name: String,
        #[serde(default)]
        port: Option<u16>,
        #[serde(default)]
        enabled: bool,
    }

    #[test]
    fn test_canonical_fills_defaults() {
        let attrs = json!({"name": "a", "port": null});
        let canonical = canonical::<Sample>(attrs.as_object().unwrap()).unwrap();

        assert_eq!(Value::Object(canonical), json!({"name": "a", "port": null, "enabled": false}));
        assert!(super::canonical::<Sample>(json!({"port": "x"}).as_object().unwrap()).is_none());
    }
}
