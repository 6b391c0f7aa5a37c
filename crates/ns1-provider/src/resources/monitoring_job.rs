//! `ns1_monitoringjob`: an active monitor run from a set of regions
//!
//! Job `config` and rule values are string-typed attributes that are sent to
//! the API as numbers or booleans when they parse as such.

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use ns1_client::Ns1Client;
use ns1_client::model::{Job, Rule};
use ns1_core::data::attr;
use ns1_core::diff::canonical;
use ns1_core::{Error, Resource, ResourceData, Result, StringEnum};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use super::{deleted, found, require};
use crate::config_values;

pub const TYPE_NAME: &str = "ns1_monitoringjob";

/// How many regions must fail for the job to fail
pub static POLICIES: LazyLock<StringEnum> =
    LazyLock::new(|| StringEnum::new(&["quorum", "one", "all"]));

pub static COMPARISONS: LazyLock<StringEnum> = LazyLock::new(|| {
    StringEnum::new(&["<", "<=", ">", ">=", "==", "!=", "contains", "notcontains"])
});

fn default_policy() -> String {
    "quorum".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringJobAttrs {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub job_type: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub regions: Vec<String>,
    #[serde(default)]
    pub frequency: u32,
    #[serde(default)]
    pub rapid_recheck: bool,
    #[serde(default = "default_policy")]
    pub policy: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "attr::string_map")]
    pub config: BTreeMap<String, String>,
    #[serde(default)]
    pub notify_delay: u32,
    #[serde(default)]
    pub notify_repeat: u32,
    #[serde(default)]
    pub notify_failback: bool,
    #[serde(default)]
    pub notify_regional: bool,
    #[serde(default)]
    pub notify_list: Option<String>,
    #[serde(default)]
    pub mute: bool,
    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub rules: Vec<RuleAttrs>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleAttrs {
    pub key: String,
    pub value: String,
    pub comparison: String,
}

impl MonitoringJobAttrs {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name);
        require(&mut errors, "job_type", &self.job_type);
        if self.regions.is_empty() {
            errors.push("regions: at least one region is required".to_string());
        }
        if self.frequency == 0 {
            errors.push("frequency: must be greater than zero".to_string());
        }
        if self.config.is_empty() {
            errors.push("config: required attribute is empty".to_string());
        }
        POLICIES.validate_into("policy", &self.policy, &mut errors);
        for (i, rule) in self.rules.iter().enumerate() {
            require(&mut errors, &format!("rules.{}.key", i), &rule.key);
            let key = format!("rules.{}.comparison", i);
            COMPARISONS.validate_into(&key, &rule.comparison, &mut errors);
        }
        Error::from_validation(errors)
    }

    pub fn to_model(&self, id: Option<String>) -> Job {
        Job {
            id,
            name: self.name.clone(),
            job_type: self.job_type.clone(),
            active: self.active,
            regions: self.regions.clone(),
            frequency: self.frequency,
            rapid_recheck: self.rapid_recheck,
            policy: self.policy.clone(),
            region_scope: None,
            notes: self.notes.clone().filter(|n| !n.is_empty()),
            config: config_values::to_wire(&self.config),
            notify_delay: self.notify_delay,
            notify_repeat: self.notify_repeat,
            notify_failback: self.notify_failback,
            notify_regional: self.notify_regional,
            notify_list: self.notify_list.clone().filter(|n| !n.is_empty()),
            rules: self
                .rules
                .iter()
                .map(|r| Rule {
                    key: r.key.clone(),
                    value: config_values::typed_value(&r.value),
                    comparison: r.comparison.clone(),
                })
                .collect(),
            mute: self.mute,
        }
    }

    pub fn from_model(job: &Job) -> Self {
        Self {
            name: job.name.clone(),
            job_type: job.job_type.clone(),
            active: job.active,
            regions: job.regions.clone(),
            frequency: job.frequency,
            rapid_recheck: job.rapid_recheck,
            policy: job.policy.clone(),
            notes: job.notes.clone(),
            config: config_values::from_wire(&job.config),
            notify_delay: job.notify_delay,
            notify_repeat: job.notify_repeat,
            notify_failback: job.notify_failback,
            notify_regional: job.notify_regional,
            notify_list: job.notify_list.clone(),
            mute: job.mute,
            rules: job
                .rules
                .iter()
                .map(|r| RuleAttrs {
                    key: r.key.clone(),
                    value: config_values::attr_string(&r.value),
                    comparison: r.comparison.clone(),
                })
                .collect(),
        }
    }
}

pub struct MonitoringJobResource {
    client: Arc<Ns1Client>,
}

impl MonitoringJobResource {
    pub fn new(client: Arc<Ns1Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for MonitoringJobResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn canonicalize(&self, attrs: &Map<String, Value>) -> Option<Map<String, Value>> {
        canonical::<MonitoringJobAttrs>(attrs)
    }

    fn force_new(&self) -> &'static [&'static str] {
        &["job_type"]
    }

    fn validate(&self, data: &ResourceData) -> Result<()> {
        data.decode::<MonitoringJobAttrs>()?.validate()
    }

    async fn create(&self, data: &mut ResourceData) -> Result<()> {
        let attrs: MonitoringJobAttrs = data.decode()?;

        let job = self.client.create_job(&attrs.to_model(None)).await?;
        let id = job
            .id
            .clone()
            .ok_or_else(|| Error::Other("monitoring job created without an id".to_string()))?;
        info!("Created {} monitoring job {} ({})", job.job_type, job.name, id);

        data.set_id(id);
        data.set_state(&MonitoringJobAttrs::from_model(&job))
    }

    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let Some(job) = found(data, TYPE_NAME, self.client.get_job(&id).await)? else {
            return Ok(());
        };
        data.set_state(&MonitoringJobAttrs::from_model(&job))
    }

    async fn update(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let attrs: MonitoringJobAttrs = data.decode()?;

        let job = self.client.update_job(&attrs.to_model(Some(id))).await?;
        data.set_state(&MonitoringJobAttrs::from_model(&job))
    }

    async fn delete(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let result = self.client.delete_job(&id).await;
        deleted(data, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(config: serde_json::Value) -> MonitoringJobAttrs {
        ResourceData::from_config(config).unwrap().decode().unwrap()
    }

    #[test]
    fn test_config_and_rule_values_are_typed() {
        let job = attrs(json!({
            "name": "web",
            "job_type": "tcp",
            "regions": ["sjc", "lga"],
            "frequency": 60,
            "config": {"host": "192.0.2.10", "port": 443, "ssl": "true"},
            "rules": [{"key": "connect", "value": "200", "comparison": "<"}]
        }));
        assert!(job.validate().is_ok());

        let model = job.to_model(None);
        assert_eq!(model.policy, "quorum");
        assert_eq!(model.config["port"], json!(443));
        assert_eq!(model.config["ssl"], json!(true));
        assert_eq!(model.config["host"], json!("192.0.2.10"));
        assert_eq!(model.rules[0].value, json!(200));

        let back = MonitoringJobAttrs::from_model(&model);
        assert_eq!(back.config["port"], "443");
        assert_eq!(back.rules[0].value, "200");
    }

    #[test]
    fn test_validation_aggregates_enum_failures() {
        let job = attrs(json!({
            "name": "web",
            "job_type": "tcp",
            "regions": ["sjc"],
            "frequency": 60,
            "config": {"host": "192.0.2.10"},
            "policy": "most",
            "rules": [{"key": "connect", "value": "1", "comparison": "~"}]
        }));

        let err = job.validate().unwrap_err();
        let errors = err.validation_errors().unwrap();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("policy:"));
        assert!(errors[1].starts_with("rules.0.comparison:"));
    }

    #[test]
    fn test_missing_regions_and_frequency() {
        let job = attrs(json!({"name": "web", "job_type": "ping", "config": {"host": "h"}}));
        let err = job.validate().unwrap_err();
        let errors = err.validation_errors().unwrap();

        assert!(errors.iter().any(|e| e.starts_with("regions:")));
        assert!(errors.iter().any(|e| e.starts_with("frequency:")));
    }
}
