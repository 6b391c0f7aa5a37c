//! Record, answer and region metadata conversion
//!
//! On the attribute side metadata is a flat `map<string, string>`. On the
//! wire it is the typed [`Meta`] structure. Any field may hold a data feed
//! pointer instead of a literal, written on the attribute side as the JSON
//! text `{"feed":"<id>"}`.
//!
//! Conversion failures are reported per field and collected, so one pass
//! reports every malformed entry.

use ns1_client::model::{FeedPtr, Meta, MetaValue};
use ns1_core::{Error, Result};
use serde_json::Value;
use std::collections::BTreeMap;

/// Every metadata key the attribute side accepts
pub const META_FIELDS: &[&str] = &[
    "up",
    "connections",
    "requests",
    "loadavg",
    "pulsar",
    "latitude",
    "longitude",
    "georegion",
    "country",
    "us_state",
    "ca_province",
    "note",
    "ip_prefixes",
    "asn",
    "priority",
    "weight",
    "low_watermark",
    "high_watermark",
    "subdivisions",
    "cost",
];

type FieldResult<T> = std::result::Result<T, Vec<String>>;

/// Convert an attribute map into typed metadata
///
/// `scope` prefixes every error message, e.g. `meta` or `answers.0.meta`.
pub fn meta_from_map(scope: &str, attrs: &BTreeMap<String, String>) -> Result<Meta> {
    let mut meta = Meta::default();
    let mut errors = Vec::new();

    for (key, raw) in attrs {
        if let Err(field_errors) = set_field(&mut meta, key, raw) {
            errors.extend(
                field_errors
                    .into_iter()
                    .map(|e| format!("{}.{}: {}", scope, key, e)),
            );
        }
    }

    Error::from_validation(errors)?;
    Ok(meta)
}

/// Convert typed metadata into an attribute map
pub fn meta_to_map(meta: &Meta) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();

    put(&mut out, "up", &meta.up, |v| v.to_string());
    put(&mut out, "connections", &meta.connections, |v| v.to_string());
    put(&mut out, "requests", &meta.requests, |v| v.to_string());
    put(&mut out, "loadavg", &meta.loadavg, |v| v.to_string());
    put(&mut out, "pulsar", &meta.pulsar, |v| v.to_string());
    put(&mut out, "latitude", &meta.latitude, |v| v.to_string());
    put(&mut out, "longitude", &meta.longitude, |v| v.to_string());
    put(&mut out, "georegion", &meta.georegion, |v| v.join(","));
    put(&mut out, "country", &meta.country, |v| v.join(","));
    put(&mut out, "us_state", &meta.us_state, |v| v.join(","));
    put(&mut out, "ca_province", &meta.ca_province, |v| v.join(","));
    put(&mut out, "note", &meta.note, |v| v.clone());
    put(&mut out, "ip_prefixes", &meta.ip_prefixes, |v| v.join(","));
    put(&mut out, "asn", &meta.asn, |v| {
        v.iter().map(u32::to_string).collect::<Vec<_>>().join(",")
    });
    put(&mut out, "priority", &meta.priority, |v| v.to_string());
    put(&mut out, "weight", &meta.weight, |v| v.to_string());
    put(&mut out, "low_watermark", &meta.low_watermark, |v| v.to_string());
    put(&mut out, "high_watermark", &meta.high_watermark, |v| v.to_string());
    put(&mut out, "subdivisions", &meta.subdivisions, format_subdivisions);
    put(&mut out, "cost", &meta.cost, |v| v.to_string());

    out
}

/// Parse `"US-CA,US-NY,GB-LND"` into `{"GB": ["LND"], "US": ["CA", "NY"]}`
///
/// Every entry must hold exactly one hyphen separating two non-empty codes.
/// All malformed entries are reported together.
pub fn parse_subdivisions(raw: &str) -> Result<BTreeMap<String, Vec<String>>> {
    subdivisions(raw).or_else(|errors| Error::from_validation(errors).map(|_| BTreeMap::new()))
}

/// Join a subdivision map back into its comma-separated form
pub fn format_subdivisions(map: &BTreeMap<String, Vec<String>>) -> String {
    map.iter()
        .flat_map(|(country, subs)| subs.iter().map(move |s| format!("{}-{}", country, s)))
        .collect::<Vec<_>>()
        .join(",")
}

fn subdivisions(raw: &str) -> FieldResult<BTreeMap<String, Vec<String>>> {
    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut errors = Vec::new();

    for entry in split_list(raw) {
        match entry.split('-').collect::<Vec<_>>().as_slice() {
            [country, sub] if !country.is_empty() && !sub.is_empty() => {
                map.entry(country.to_string())
                    .or_default()
                    .push(sub.to_string());
            }
            _ => errors.push(format!(
                "invalid subdivision {:?}, expected COUNTRY-SUBDIVISION",
                entry
            )),
        }
    }

    if errors.is_empty() { Ok(map) } else { Err(errors) }
}

fn set_field(meta: &mut Meta, key: &str, raw: &str) -> FieldResult<()> {
    match key {
        "up" => meta.up = Some(field(raw, parse_bool)?),
        "connections" => meta.connections = Some(field(raw, parse_uint)?),
        "requests" => meta.requests = Some(field(raw, parse_uint)?),
        "loadavg" => meta.loadavg = Some(field(raw, parse_float)?),
        "pulsar" => meta.pulsar = Some(field(raw, parse_json)?),
        "latitude" => meta.latitude = Some(field(raw, parse_float)?),
        "longitude" => meta.longitude = Some(field(raw, parse_float)?),
        "georegion" => meta.georegion = Some(field(raw, parse_strings)?),
        "country" => meta.country = Some(field(raw, parse_strings)?),
        "us_state" => meta.us_state = Some(field(raw, parse_strings)?),
        "ca_province" => meta.ca_province = Some(field(raw, parse_strings)?),
        "note" => meta.note = Some(field(raw, |s| Ok(s.to_string()))?),
        "ip_prefixes" => meta.ip_prefixes = Some(field(raw, parse_strings)?),
        "asn" => meta.asn = Some(field(raw, parse_asns)?),
        "priority" => meta.priority = Some(field(raw, parse_uint)?),
        "weight" => meta.weight = Some(field(raw, parse_float)?),
        "low_watermark" => meta.low_watermark = Some(field(raw, parse_uint)?),
        "high_watermark" => meta.high_watermark = Some(field(raw, parse_uint)?),
        "subdivisions" => meta.subdivisions = Some(field(raw, subdivisions)?),
        "cost" => meta.cost = Some(field(raw, parse_float)?),
        _ => return Err(vec!["unknown meta field".to_string()]),
    }
    Ok(())
}

/// A feed pointer if `raw` is one, else the parsed literal
fn field<T>(raw: &str, parse: impl Fn(&str) -> FieldResult<T>) -> FieldResult<MetaValue<T>> {
    if let Some(feed) = feed_pointer(raw) {
        return Ok(MetaValue::Feed(feed));
    }
    parse(raw).map(MetaValue::Value)
}

fn feed_pointer(raw: &str) -> Option<FeedPtr> {
    let trimmed = raw.trim();
    if !trimmed.starts_with('{') {
        return None;
    }
    serde_json::from_str(trimmed).ok()
}

fn put<T>(
    out: &mut BTreeMap<String, String>,
    key: &str,
    value: &Option<MetaValue<T>>,
    format: impl Fn(&T) -> String,
) {
    let text = match value {
        None => return,
        Some(MetaValue::Value(v)) => format(v),
        Some(MetaValue::Feed(ptr)) => format!("{{\"feed\":{}}}", Value::String(ptr.feed.clone())),
    };
    out.insert(key.to_string(), text);
}

fn parse_bool(raw: &str) -> FieldResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Ok(true),
        "0" | "f" | "false" => Ok(false),
        _ => Err(vec![format!("{:?} is not a boolean", raw)]),
    }
}

fn parse_uint(raw: &str) -> FieldResult<u64> {
    raw.trim()
        .parse()
        .map_err(|_| vec![format!("{:?} is not a non-negative integer", raw)])
}

fn parse_float(raw: &str) -> FieldResult<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .ok_or_else(|| vec![format!("{:?} is not a number", raw)])
}

fn parse_json(raw: &str) -> FieldResult<Value> {
    serde_json::from_str(raw).map_err(|e| vec![format!("invalid JSON: {}", e)])
}

fn parse_strings(raw: &str) -> FieldResult<Vec<String>> {
    Ok(split_list(raw).map(str::to_string).collect())
}

fn parse_asns(raw: &str) -> FieldResult<Vec<u32>> {
    let mut asns = Vec::new();
    let mut errors = Vec::new();

    for entry in split_list(raw) {
        match entry.parse() {
            Ok(asn) => asns.push(asn),
            Err(_) => errors.push(format!("{:?} is not an AS number", entry)),
        }
    }

    if errors.is_empty() { Ok(asns) } else { Err(errors) }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_subdivisions_parse_and_format() {
        let parsed = parse_subdivisions("US-CA,US-NY").unwrap();
        assert_eq!(parsed["US"], vec!["CA".to_string(), "NY".to_string()]);

        let formatted = format_subdivisions(&parsed);
        let mut parts: Vec<_> = formatted.split(',').collect();
        parts.sort();
        assert_eq!(parts, vec!["US-CA", "US-NY"]);
    }

    #[test]
    fn test_subdivisions_report_every_malformed_entry() {
        let err = parse_subdivisions("US-CA,USNY,GB-LND-X").unwrap_err();
        let errors = err.validation_errors().unwrap();

        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("\"USNY\""));
        assert!(errors[1].contains("\"GB-LND-X\""));
    }

    #[test]
    fn test_meta_round_trip_every_field_kind() {
        let attrs = map(&[
            ("up", "true"),
            ("connections", "5"),
            ("loadavg", "1.5"),
            ("pulsar", r#"[{"bias":"*0.55","job_id":"abc"}]"#),
            ("georegion", "US-WEST,US-EAST"),
            ("note", "primary pop"),
            ("asn", "3,4"),
            ("weight", "100"),
            ("subdivisions", "BR-SP,US-CA"),
            ("priority", r#"{"feed":"f1"}"#),
        ]);

        let meta = meta_from_map("meta", &attrs).unwrap();
        assert_eq!(meta.up, Some(MetaValue::Value(true)));
        assert_eq!(meta.asn, Some(MetaValue::Value(vec![3, 4])));
        assert_eq!(
            meta.priority,
            Some(MetaValue::Feed(FeedPtr { feed: "f1".into() }))
        );

        assert_eq!(meta_to_map(&meta), attrs);
    }

    #[test]
    fn test_meta_errors_are_aggregated_and_field_scoped() {
        let attrs = map(&[
            ("up", "maybe"),
            ("latitude", "north"),
            ("subdivisions", "US"),
            ("colour", "blue"),
        ]);

        let err = meta_from_map("answers.0.meta", &attrs).unwrap_err();
        let errors = err.validation_errors().unwrap();

        assert_eq!(errors.len(), 4);
        assert!(errors.iter().any(|e| e.starts_with("answers.0.meta.up:")));
        assert!(errors.iter().any(|e| e.starts_with("answers.0.meta.latitude:")));
        assert!(errors.iter().any(|e| e.contains("\"US\"")));
        assert!(errors.iter().any(|e| e == "answers.0.meta.colour: unknown meta field"));
    }

    #[test]
    fn test_meta_field_list_matches_conversion() {
        for key in META_FIELDS {
            let raw = format!("{{\"feed\":\"{}\"}}", key);
            let attrs = map(&[(key, raw.as_str())]);
            let meta = meta_from_map("meta", &attrs).unwrap();
            assert_eq!(meta_to_map(&meta), attrs, "field {}", key);
        }
    }
}
