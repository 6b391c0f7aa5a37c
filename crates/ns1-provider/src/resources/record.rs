//! `ns1_record`: all answers for one domain and type in a zone
//!
//! Answers carry their rdata as a single string on the attribute side, split
//! on whitespace into rdata fields, except for TXT and SPF where the whole
//! string is one field. Regions are a list on the attribute side and a map
//! keyed by region name on the wire.

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use ns1_client::Ns1Client;
use ns1_client::model::{Answer, Filter, Meta, Record, Region};
use ns1_core::data::attr;
use ns1_core::diff::{canonical, case_insensitive};
use ns1_core::{Error, Resource, ResourceData, Result, StringEnum};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::info;

use super::{deleted, found, require};
use crate::config_values;
use crate::meta::{meta_from_map, meta_to_map};

pub const TYPE_NAME: &str = "ns1_record";

/// Attributes the API fills in when left unset
const COMPUTED: &[&str] = &["ttl", "use_client_subnet", "override_ttl", "override_address_records"];

/// Record types the API accepts
pub static RECORD_TYPES: LazyLock<StringEnum> = LazyLock::new(|| {
    StringEnum::new(&[
        "A", "AAAA", "AFSDB", "ALIAS", "CAA", "CERT", "CNAME", "DNAME", "DS", "HINFO", "HTTPS",
        "MX", "NAPTR", "NS", "PTR", "SPF", "SRV", "SVCB", "TXT", "URLFWD",
    ])
});

/// Record attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordAttrs {
    #[serde(default)]
    pub zone: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default, rename = "type")]
    pub record_type: String,
    #[serde(default)]
    pub ttl: Option<u32>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub use_client_subnet: Option<bool>,
    #[serde(default)]
    pub override_ttl: Option<bool>,
    #[serde(default)]
    pub override_address_records: Option<bool>,
    #[serde(default, deserialize_with = "attr::string_map")]
    pub meta: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub regions: Vec<RegionAttrs>,
    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub answers: Vec<AnswerAttrs>,
    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub filters: Vec<FilterAttrs>,
    #[serde(default, deserialize_with = "attr::string_map")]
    pub tags: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub blocked_tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerAttrs {
    /// Whitespace-separated rdata
    pub answer: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "attr::string_map")]
    pub meta: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionAttrs {
    pub name: String,
    #[serde(default, deserialize_with = "attr::string_map")]
    pub meta: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterAttrs {
    pub filter: String,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, deserialize_with = "attr::string_map")]
    pub config: BTreeMap<String, String>,
}

impl RecordAttrs {
    /// Local checks, including every metadata conversion
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        require(&mut errors, "zone", &self.zone);
        require(&mut errors, "domain", &self.domain);
        RECORD_TYPES.validate_into("type", &self.record_type, &mut errors);

        if self.link.as_deref().is_some_and(|l| !l.is_empty()) && !self.answers.is_empty() {
            errors.push("link: conflicts with answers".to_string());
        }

        if !self.zone.is_empty() && !self.domain.is_empty() && !in_zone(&self.domain, &self.zone) {
            errors.push(format!(
                "domain: {:?} is not inside zone {:?}",
                self.domain, self.zone
            ));
        }

        if let Err(e) = self.to_model() {
            match e.validation_errors() {
                Some(messages) => errors.extend(messages.iter().cloned()),
                None => errors.push(e.to_string()),
            }
        }

        Error::from_validation(errors)
    }

    /// Build the API record; metadata failures across the record, its
    /// answers and regions are reported together
    pub fn to_model(&self) -> Result<Record> {
        let mut errors = Vec::new();
        let mut meta = |scope: String, attrs: &BTreeMap<String, String>| -> Option<Meta> {
            if attrs.is_empty() {
                return None;
            }
            match meta_from_map(&scope, attrs) {
                Ok(m) => Some(m),
                Err(e) => {
                    errors.extend(e.validation_errors().unwrap_or_default().iter().cloned());
                    None
                }
            }
        };

        let record_meta = meta("meta".to_string(), &self.meta);

        let answers = self
            .answers
            .iter()
            .enumerate()
            .map(|(i, a)| Answer {
                rdata: split_rdata(&self.record_type, &a.answer),
                region: a.region.clone().filter(|r| !r.is_empty()),
                meta: meta(format!("answers.{}.meta", i), &a.meta),
                ..Answer::default()
            })
            .collect();

        let regions = self
            .regions
            .iter()
            .map(|r| {
                let region_meta = meta(format!("regions.{}.meta", r.name), &r.meta);
                (r.name.clone(), Region { meta: region_meta.unwrap_or_default() })
            })
            .collect();

        Error::from_validation(errors)?;

        Ok(Record {
            zone: self.zone.clone(),
            domain: self.domain.clone(),
            record_type: self.record_type.clone(),
            link: self.link.clone().filter(|l| !l.is_empty()),
            ttl: self.ttl,
            use_client_subnet: self.use_client_subnet,
            override_ttl: self.override_ttl,
            override_address_records: self.override_address_records,
            meta: record_meta,
            answers,
            filters: self
                .filters
                .iter()
                .map(|f| Filter {
                    filter_type: f.filter.clone(),
                    disabled: f.disabled,
                    config: config_values::to_wire(&f.config),
                })
                .collect(),
            regions,
            tags: (!self.tags.is_empty()).then(|| self.tags.clone()),
            blocked_tags: (!self.blocked_tags.is_empty()).then(|| self.blocked_tags.clone()),
            ..Record::default()
        })
    }

    pub fn from_model(record: &Record) -> Self {
        Self {
            zone: record.zone.clone(),
            domain: record.domain.clone(),
            record_type: record.record_type.clone(),
            ttl: record.ttl,
            link: record.link.clone(),
            use_client_subnet: record.use_client_subnet,
            override_ttl: record.override_ttl,
            override_address_records: record.override_address_records,
            meta: record.meta.as_ref().map(meta_to_map).unwrap_or_default(),
            regions: record
                .regions
                .iter()
                .map(|(name, region)| RegionAttrs {
                    name: name.clone(),
                    meta: meta_to_map(&region.meta),
                })
                .collect(),
            answers: record
                .answers
                .iter()
                .map(|a| AnswerAttrs {
                    answer: join_rdata(&a.rdata),
                    region: a.region.clone(),
                    meta: a.meta.as_ref().map(meta_to_map).unwrap_or_default(),
                })
                .collect(),
            filters: record
                .filters
                .iter()
                .map(|f| FilterAttrs {
                    filter: f.filter_type.clone(),
                    disabled: f.disabled,
                    config: config_values::from_wire(&f.config),
                })
                .collect(),
            tags: record.tags.clone().unwrap_or_default(),
            blocked_tags: record.blocked_tags.clone().unwrap_or_default(),
        }
    }
}

/// Split an answer string into rdata fields
pub fn split_rdata(record_type: &str, answer: &str) -> Vec<Value> {
    if record_type.eq_ignore_ascii_case("TXT") || record_type.eq_ignore_ascii_case("SPF") {
        return vec![Value::String(answer.to_string())];
    }
    answer
        .split_whitespace()
        .map(|s| Value::String(s.to_string()))
        .collect()
}

/// Join rdata fields back into an answer string
pub fn join_rdata(rdata: &[Value]) -> String {
    rdata
        .iter()
        .map(config_values::attr_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Version 0 state kept regions as the wire map keyed by name, and plain
/// answers under `short_answers`
fn upgrade_from_v0(mut state: Map<String, Value>) -> Map<String, Value> {
    match state.remove("regions") {
        Some(Value::Object(regions)) => {
            let mut list: Vec<Value> = regions
                .into_iter()
                .map(|(name, region)| {
                    let meta = region.get("meta").cloned().unwrap_or_else(|| json!({}));
                    json!({"name": name, "meta": meta})
                })
                .collect();
            list.sort_by(|a, b| region_name(a).cmp(region_name(b)));
            state.insert("regions".to_string(), Value::Array(list));
        }
        Some(other) => {
            state.insert("regions".to_string(), other);
        }
        None => {}
    }

    if let Some(Value::Array(short)) = state.remove("short_answers") {
        let has_answers = matches!(state.get("answers"), Some(Value::Array(a)) if !a.is_empty());
        if !has_answers {
            let answers = short.into_iter().map(|answer| json!({"answer": answer})).collect();
            state.insert("answers".to_string(), Value::Array(answers));
        }
    }

    state
}

fn region_name(region: &Value) -> &str {
    region.get("name").and_then(Value::as_str).unwrap_or_default()
}

fn in_zone(domain: &str, zone: &str) -> bool {
    let domain = domain.trim_end_matches('.').to_ascii_lowercase();
    let zone = zone.trim_end_matches('.').to_ascii_lowercase();
    domain == zone || domain.ends_with(&format!(".{}", zone))
}

/// Parse a `zone/domain/type` import ID
pub fn parse_import_id(id: &str) -> Result<(String, String, String)> {
    match id.split('/').collect::<Vec<_>>().as_slice() {
        [zone, domain, record_type]
            if !zone.is_empty() && !domain.is_empty() && !record_type.is_empty() =>
        {
            Ok((zone.to_string(), domain.to_string(), record_type.to_uppercase()))
        }
        _ => Err(Error::invalid_input(format!(
            "invalid record import ID {:?}, expected zone/domain/type",
            id
        ))),
    }
}

pub struct RecordResource {
    client: Arc<Ns1Client>,
}

impl RecordResource {
    pub fn new(client: Arc<Ns1Client>) -> Self {
        Self { client }
    }

    async fn fetch(
        &self,
        data: &mut ResourceData,
        zone: &str,
        domain: &str,
        record_type: &str,
    ) -> Result<()> {
        let result = self.client.get_record(zone, domain, record_type).await;
        let Some(record) = found(data, TYPE_NAME, result)? else {
            return Ok(());
        };

        if let Some(id) = &record.id {
            data.set_id(id.clone());
        }
        data.set_state(&RecordAttrs::from_model(&record))
    }
}

#[async_trait]
impl Resource for RecordResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn computed(&self) -> &'static [&'static str] {
        COMPUTED
    }

    /// Regions are keyed by name on the wire, so their order carries no meaning
    fn canonicalize(&self, attrs: &Map<String, Value>) -> Option<Map<String, Value>> {
        let mut attrs = canonical::<RecordAttrs>(attrs)?;
        if let Some(Value::Array(regions)) = attrs.get_mut("regions") {
            regions.sort_by(|a, b| region_name(a).cmp(region_name(b)));
        }
        Some(attrs)
    }

    fn force_new(&self) -> &'static [&'static str] {
        &["zone", "domain", "type"]
    }

    fn schema_version(&self) -> u32 {
        1
    }

    fn upgrade_state(&self, version: u32, state: Map<String, Value>) -> Result<Map<String, Value>> {
        Ok(match version {
            0 => upgrade_from_v0(state),
            _ => state,
        })
    }

    fn validate(&self, data: &ResourceData) -> Result<()> {
        data.decode_with_computed::<RecordAttrs>(COMPUTED)?.validate()
    }

    async fn create(&self, data: &mut ResourceData) -> Result<()> {
        let attrs: RecordAttrs = data.decode_with_computed(COMPUTED)?;

        let record = self.client.create_record(&attrs.to_model()?).await?;
        info!("Created record {}/{}/{}", record.zone, record.domain, record.record_type);

        data.set_id(record.id.clone().unwrap_or_else(|| {
            format!("{}/{}/{}", record.zone, record.domain, record.record_type)
        }));
        data.set_state(&RecordAttrs::from_model(&record))
    }

    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        data.require_id()?;
        let attrs: RecordAttrs = data.decode_state()?;
        self.fetch(data, &attrs.zone, &attrs.domain, &attrs.record_type).await
    }

    async fn update(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let attrs: RecordAttrs = data.decode_with_computed(COMPUTED)?;

        let mut model = attrs.to_model()?;
        model.id = Some(id);

        let record = self.client.update_record(&model).await?;
        data.set_state(&RecordAttrs::from_model(&record))
    }

    async fn delete(&self, data: &mut ResourceData) -> Result<()> {
        data.require_id()?;
        let attrs: RecordAttrs = data.decode_state()?;
        let result = self
            .client
            .delete_record(&attrs.zone, &attrs.domain, &attrs.record_type)
            .await;
        deleted(data, result)
    }

    async fn import(&self, id: &str, data: &mut ResourceData) -> Result<()> {
        let (zone, domain, record_type) = parse_import_id(id)?;
        data.set_id(id);
        self.fetch(data, &zone, &domain, &record_type).await
    }

    fn suppress_diff(&self, key: &str, old: &str, new: &str, _data: &ResourceData) -> bool {
        matches!(key, "zone" | "domain" | "link") && case_insensitive(old, new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(config: Value) -> RecordAttrs {
        ResourceData::from_config(config).unwrap().decode().unwrap()
    }

    #[test]
    fn test_txt_answer_is_single_rdata() {
        assert_eq!(
            split_rdata("TXT", "v=spf1 include:x -all"),
            vec![json!("v=spf1 include:x -all")]
        );
        assert_eq!(
            split_rdata("MX", "10  mx1.example.io"),
            vec![json!("10"), json!("mx1.example.io")]
        );
    }

    #[test]
    fn test_numeric_rdata_joins_back() {
        assert_eq!(join_rdata(&[json!(10), json!("mx1.example.io")]), "10 mx1.example.io");
    }

    #[test]
    fn test_filter_config_is_typed_on_the_wire() {
        let a = attrs(json!({
            "zone": "example.io", "domain": "www.example.io", "type": "A",
            "answers": [{"answer": "1.2.3.4"}],
            "filters": [{"filter": "select_first_n", "config": {"N": 1}}]
        }));
        assert_eq!(a.filters[0].config["N"], "1");

        let model = a.to_model().unwrap();
        assert_eq!(Value::Object(model.filters[0].config.clone()), json!({"N": 1}));
        assert_eq!(RecordAttrs::from_model(&model).filters[0].config["N"], "1");
    }

    #[test]
    fn test_regions_map_by_name() {
        let a = attrs(json!({
            "zone": "example.io", "domain": "example.io", "type": "A",
            "answers": [{"answer": "1.2.3.4", "region": "east"}],
            "regions": [{"name": "east", "meta": {"georegion": "US-EAST"}}]
        }));

        let model = a.to_model().unwrap();
        assert!(model.regions.contains_key("east"));
        assert_eq!(RecordAttrs::from_model(&model).regions, a.regions);
    }

    #[test]
    fn test_validation_aggregates_everything() {
        let a = attrs(json!({
            "zone": "example.io", "domain": "www.other.io", "type": "BOGUS",
            "link": "www.example.io",
            "answers": [{"answer": "1.2.3.4", "meta": {"subdivisions": "USCA"}}],
            "meta": {"up": "sometimes"}
        }));

        let err = a.validate().unwrap_err();
        let errors = err.validation_errors().unwrap();

        assert!(errors.iter().any(|e| e.starts_with("type: expecting one of")));
        assert!(errors.iter().any(|e| e == "link: conflicts with answers"));
        assert!(errors.iter().any(|e| e.starts_with("domain:")));
        assert!(errors.iter().any(|e| e.starts_with("answers.0.meta.subdivisions:")));
        assert!(errors.iter().any(|e| e.starts_with("meta.up:")));
    }

    #[test]
    fn test_apex_domain_is_inside_zone() {
        assert!(in_zone("Example.io.", "example.io"));
        assert!(in_zone("a.b.example.io", "example.io"));
        assert!(!in_zone("badexample.io", "example.io"));
    }

    #[test]
    fn test_import_id_format() {
        let (zone, domain, t) = parse_import_id("example.io/www.example.io/cname").unwrap();
        assert_eq!(
            (zone.as_str(), domain.as_str(), t.as_str()),
            ("example.io", "www.example.io", "CNAME")
        );
        assert!(parse_import_id("example.io/www").is_err());
    }

    #[test]
    fn test_region_order_is_not_a_change() {
        let client = Ns1Client::unauthenticated("http://127.0.0.1/v1/");
        let resource = RecordResource::new(Arc::new(client));
        let record = |regions: Value| {
            json!({
                "zone": "example.io",
                "domain": "www.example.io",
                "type": "A",
                "answers": [{"answer": "192.0.2.1", "region": "us"}],
                "regions": regions
            })
        };

        let state = record(json!([
            {"name": "eu", "meta": {"up": "false"}},
            {"name": "us", "meta": {"up": "true"}}
        ]));
        let data = ResourceData::from_state("rec1", state.clone())
            .unwrap()
            .with_config(record(json!([
                {"name": "us", "meta": {"up": "true"}},
                {"name": "eu", "meta": {"up": "false"}}
            ])))
            .unwrap();
        assert!(ns1_core::diff::compute(&resource, &data).is_empty());

        let data = ResourceData::from_state("rec1", state)
            .unwrap()
            .with_config(record(json!([
                {"name": "us", "meta": {"up": "false"}},
                {"name": "eu", "meta": {"up": "false"}}
            ])))
            .unwrap();
        let diffs = ns1_core::diff::compute(&resource, &data);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].key, "regions");
    }

    #[test]
    fn test_version_zero_state_is_upgraded() {
        let client = Ns1Client::unauthenticated("http://127.0.0.1/v1/");
        let resource = RecordResource::new(Arc::new(client));
        let state = json!({
            "zone": "example.io",
            "domain": "www.example.io",
            "type": "A",
            "regions": {"us": {"meta": {"up": "true"}}, "eu": {}},
            "short_answers": ["192.0.2.1", "192.0.2.2"]
        });
        let Value::Object(state) = state else { unreachable!() };

        let upgraded = resource.upgrade_state(0, state).unwrap();
        assert_eq!(
            upgraded["regions"],
            json!([{"name": "eu", "meta": {}}, {"name": "us", "meta": {"up": "true"}}])
        );
        assert_eq!(
            upgraded["answers"],
            json!([{"answer": "192.0.2.1"}, {"answer": "192.0.2.2"}])
        );
        assert!(!upgraded.contains_key("short_answers"));
    }
}
