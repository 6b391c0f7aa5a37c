//! Resource attribute bag
//!
//! [`ResourceData`] is the handle every CRUD callback receives. It carries the
//! resource ID, the attributes recorded in state after the last successful
//! operation, and the attributes requested by configuration.
//!
//! Callbacks never poke at individual attributes by type assertion. They
//! decode the whole bag into a typed config struct with [`ResourceData::decode`]
//! and write a typed state struct back with [`ResourceData::set_state`].
//!
//! Configuration is authoritative: an attribute it leaves out or sets to null
//! is unset, whatever state holds. Only attributes the API computes when left
//! unset keep their recorded value, see [`ResourceData::decode_with_computed`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Attribute bag for a single resource instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceData {
    /// Resource ID, `None` when the resource does not exist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    /// Attributes recorded after the last successful operation
    #[serde(default)]
    state: Map<String, Value>,

    /// Attributes requested by configuration
    #[serde(default)]
    config: Map<String, Value>,

    /// Layout version `state` was written in
    #[serde(default, skip_serializing_if = "is_zero")]
    schema_version: u32,
}

impl ResourceData {
    /// Create an empty attribute bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bag holding only configuration
    pub fn from_config(config: Value) -> Result<Self> {
        Ok(Self {
            config: into_object("config", config)?,
            ..Self::default()
        })
    }

    /// Create a bag for an existing resource from its recorded state
    pub fn from_state(id: impl Into<String>, state: Value) -> Result<Self> {
        Ok(Self {
            id: Some(id.into()),
            state: into_object("state", state)?,
            ..Self::default()
        })
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: Value) -> Result<Self> {
        self.config = into_object("config", config)?;
        Ok(self)
    }

    /// Resource ID
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Resource ID, or an error naming the operation that needed it
    pub fn require_id(&self) -> Result<&str> {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::invalid_input("resource has no ID"))
    }

    /// Set the resource ID
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Clear the resource ID, marking the resource as gone
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    /// Recorded state
    pub fn state(&self) -> &Map<String, Value> {
        &self.state
    }

    /// Requested configuration
    pub fn config(&self) -> &Map<String, Value> {
        &self.config
    }

    /// Current view of an attribute: configuration first, then state
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.config
            .get(key)
            .filter(|v| !v.is_null())
            .or_else(|| self.state.get(key))
    }

    /// Current view of a string attribute
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Prior and requested values of an attribute
    pub fn get_change(&self, key: &str) -> (Option<&Value>, Option<&Value>) {
        (self.state.get(key), self.config.get(key))
    }

    /// Whether configuration requests a different value than state holds
    ///
    /// Null, empty strings and empty collections are all treated as unset.
    pub fn has_change(&self, key: &str) -> bool {
        let (old, new) = self.get_change(key);
        non_empty(old) != non_empty(new)
    }

    /// Decode configuration into a typed struct
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        self.decode_with_computed(&[])
    }

    /// Decode configuration, keeping the recorded value of every `computed`
    /// attribute configuration leaves unset
    pub fn decode_with_computed<T: DeserializeOwned>(&self, computed: &[&str]) -> Result<T> {
        let mut merged: Map<String, Value> = self
            .config
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        for key in computed {
            if non_empty(merged.get(*key)).is_some() {
                continue;
            }
            if let Some(recorded) = non_empty(self.state.get(*key)) {
                merged.insert(key.to_string(), recorded.clone());
            }
        }

        decode_object(merged)
    }

    /// Decode recorded state only into a typed struct
    pub fn decode_state<T: DeserializeOwned>(&self) -> Result<T> {
        decode_object(self.state.clone())
    }

    /// Replace the recorded state with a typed struct
    pub fn set_state<T: Serialize>(&mut self, value: &T) -> Result<()> {
        self.state = into_object("state", serde_json::to_value(value)?)?;
        Ok(())
    }

    /// Set a single state attribute
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.state.insert(key.into(), value.into());
    }

    /// Layout version of the recorded state
    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    /// Bring recorded state up to layout version `target`
    ///
    /// `step(version, state)` rewrites state from `version` into
    /// `version + 1` and runs once per missing version. Empty state has no
    /// layout and is only stamped. State newer than `target` is an error.
    pub fn upgrade_state<F>(&mut self, target: u32, mut step: F) -> Result<()>
    where
        F: FnMut(u32, Map<String, Value>) -> Result<Map<String, Value>>,
    {
        if self.schema_version > target {
            return Err(Error::config(format!(
                "state has schema version {}, newer than the supported {}",
                self.schema_version, target
            )));
        }

        if !self.state.is_empty() {
            for version in self.schema_version..target {
                let state = std::mem::take(&mut self.state);
                self.state = step(version, state)?;
            }
        }
        self.schema_version = target;
        Ok(())
    }
}

fn is_zero(version: &u32) -> bool {
    *version == 0
}

fn into_object(what: &str, value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(Error::invalid_input(format!(
            "{} must be an object, got {}",
            what, other
        ))),
    }
}

fn decode_object<T: DeserializeOwned>(map: Map<String, Value>) -> Result<T> {
    serde_json::from_value(Value::Object(map))
        .map_err(|e| Error::validation(format!("invalid attributes: {}", e)))
}

fn non_empty(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !is_empty_value(v))
}

/// Whether a value counts as unset
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

/// Remove nulls and empty values at every level; `None` when nothing is left
///
/// List elements keep their position, an element that normalizes to nothing
/// becomes null.
pub fn normalize_value(value: &Value) -> Option<Value> {
    match value {
        Value::Object(map) => {
            let kept: Map<String, Value> = map
                .iter()
                .filter_map(|(key, v)| normalize_value(v).map(|v| (key.clone(), v)))
                .collect();
            (!kept.is_empty()).then_some(Value::Object(kept))
        }
        Value::Array(items) => {
            let kept: Vec<Value> = items
                .iter()
                .map(|v| normalize_value(v).unwrap_or(Value::Null))
                .collect();
            (!kept.is_empty()).then_some(Value::Array(kept))
        }
        other if is_empty_value(other) => None,
        other => Some(other.clone()),
    }
}

/// Flatten an attribute value into the string form diffs are computed on
pub fn flatten_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Serde helpers for attribute-side encodings
pub mod attr {
    use serde::de::{self, Deserializer};
    use serde::Deserialize;
    use serde_json::Value;
    use std::collections::BTreeMap;

    /// Deserialize a map of strings, accepting scalar values of any kind
    ///
    /// Attribute maps are string-typed; configuration written by hand often
    /// carries numbers and booleans, which are stringified here. Nulls drop.
    pub fn string_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<BTreeMap<String, Value>> = Option::deserialize(deserializer)?;
        let mut out = BTreeMap::new();

        for (key, value) in raw.unwrap_or_default() {
            let text = match value {
                Value::Null => continue,
                Value::String(s) => s,
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                other => {
                    return Err(de::Error::custom(format!(
                        "map value for {:?} must be a scalar, got {}",
                        key, other
                    )));
                }
            };
            out.insert(key, text);
        }

        Ok(out)
    }

    /// Deserialize a list that may be given as null
    pub fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Sample {
        name: String,
        #[serde(default)]
        ttl: Option<u32>,
        #[serde(default, deserialize_with = "attr::string_map")]
        tags: BTreeMap<String, String>,
    }

    #[test]
    fn test_decode_reads_configuration_only() {
        let data = ResourceData::from_state("abc", json!({"name": "old", "ttl": 3600}))
            .unwrap()
            .with_config(json!({"name": "new", "ttl": null}))
            .unwrap();

        let sample: Sample = data.decode().unwrap();
        assert_eq!(sample.name, "new");
        assert_eq!(sample.ttl, None);
    }

    #[test]
    fn test_computed_attributes_keep_recorded_value() {
        let data = ResourceData::from_state("abc", json!({"name": "old", "ttl": 3600}))
            .unwrap()
            .with_config(json!({"name": "new"}))
            .unwrap();
        let sample: Sample = data.decode_with_computed(&["ttl"]).unwrap();
        assert_eq!(sample.ttl, Some(3600));

        let data = data.with_config(json!({"name": "new", "ttl": 60})).unwrap();
        let sample: Sample = data.decode_with_computed(&["ttl"]).unwrap();
        assert_eq!(sample.ttl, Some(60));
    }

    #[test]
    fn test_normalize_drops_nested_unset_values() {
        let raw = json!([{"answer": "192.0.2.1", "meta": {}, "region": null, "note": ""}]);
        assert_eq!(normalize_value(&raw), Some(json!([{"answer": "192.0.2.1"}])));

        assert_eq!(normalize_value(&json!({"tsig": {"name": null}})), None);
        assert_eq!(normalize_value(&json!(false)), Some(json!(false)));
        assert_eq!(normalize_value(&json!([])), None);
    }

    #[test]
    fn test_decode_error_is_validation() {
        let data = ResourceData::from_config(json!({"ttl": "soon"})).unwrap();
        let err = data.decode::<Sample>().unwrap_err();
        assert!(err.validation_errors().is_some());
    }

    #[test]
    fn test_string_map_stringifies_scalars() {
        let data = ResourceData::from_config(json!({
            "name": "x",
            "tags": {"n": 1, "flag": true, "s": "v", "gone": null}
        }))
        .unwrap();

        let sample: Sample = data.decode().unwrap();
        assert_eq!(sample.tags.get("n").map(String::as_str), Some("1"));
        assert_eq!(sample.tags.get("flag").map(String::as_str), Some("true"));
        assert_eq!(sample.tags.get("s").map(String::as_str), Some("v"));
        assert!(!sample.tags.contains_key("gone"));
    }

    #[test]
    fn test_has_change_treats_empty_as_unset() {
        let data = ResourceData::from_state("u", json!({"teams": []}))
            .unwrap()
            .with_config(json!({"teams": null}))
            .unwrap();
        assert!(!data.has_change("teams"));

        let data = ResourceData::from_state("u", json!({"teams": ["a"]}))
            .unwrap()
            .with_config(json!({"teams": []}))
            .unwrap();
        assert!(data.has_change("teams"));
    }

    #[test]
    fn test_set_state_and_clear_id() {
        let mut data = ResourceData::new();
        data.set_id("example.io");
        data.set_state(&Sample {
            name: "example.io".to_string(),
            ttl: Some(3600),
            tags: BTreeMap::new(),
        })
        .unwrap();

        assert_eq!(data.get("ttl"), Some(&json!(3600)));
        data.clear_id();
        assert_eq!(data.id(), None);
        assert!(data.require_id().is_err());
    }

    #[test]
    fn test_state_upgrade_runs_each_missing_step() {
        let mut data = ResourceData::from_state("r1", json!({"hosts": "a"})).unwrap();
        let mut seen = Vec::new();

        data.upgrade_state(2, |version, mut state| {
            seen.push(version);
            state.insert(format!("v{}", version + 1), json!(true));
            Ok(state)
        })
        .unwrap();

        assert_eq!(seen, [0, 1]);
        assert_eq!(data.schema_version(), 2);
        assert_eq!(data.state()["v2"], true);

        // Already current: nothing runs
        data.upgrade_state(2, |_, _| Err(Error::Other("ran".into()))).unwrap();
    }

    #[test]
    fn test_state_upgrade_stamps_empty_state() {
        let mut data = ResourceData::from_config(json!({"name": "a"})).unwrap();
        data.upgrade_state(3, |_, _| Err(Error::Other("ran".into()))).unwrap();
        assert_eq!(data.schema_version(), 3);

        let bag: ResourceData =
            serde_json::from_value(json!({"id": "r1", "state": {"a": 1}, "schema_version": 4}))
                .unwrap();
        let mut newer = bag.clone();
        assert!(matches!(newer.upgrade_state(3, |_, s| Ok(s)), Err(Error::Config(_))));
        assert_eq!(newer, bag);
    }

    #[test]
    fn test_flatten_value() {
        assert_eq!(flatten_value(&json!(null)), "");
        assert_eq!(flatten_value(&json!("a")), "a");
        assert_eq!(flatten_value(&json!(true)), "true");
        assert_eq!(flatten_value(&json!(1.5)), "1.5");
        assert_eq!(flatten_value(&json!(["a", "b"])), r#"["a","b"]"#);
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(ResourceData::from_config(json!([1, 2])).is_err());
    }
}
