//! `ns1_pulsarjob`: a Pulsar measurement job inside an application
//!
//! Jobs are addressed through their application, so the import ID is
//! `app_id/job_id`. Blend metric weights are split on the attribute side into
//! `blend_metric_weights { timestamp }` and a top-level `weights` list.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use ns1_client::Ns1Client;
use ns1_client::model::{BlendMetricWeights, JobConfig, PulsarJob, Weight};
use ns1_core::data::attr;
use ns1_core::diff::canonical;
use ns1_core::{Error, Resource, ResourceData, Result, StringEnum};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use super::{deleted, found, require};

pub const TYPE_NAME: &str = "ns1_pulsarjob";

/// Attributes the API fills in when left unset
const COMPUTED: &[&str] = &["customer", "community"];

pub static TYPE_IDS: LazyLock<StringEnum> =
    LazyLock::new(|| StringEnum::new(&["latency", "custom"]));

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PulsarJobAttrs {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub type_id: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub shared: bool,
    #[serde(default)]
    pub config: Option<JobConfigAttrs>,
    #[serde(default)]
    pub blend_metric_weights: Option<BlendMetricWeightsAttrs>,
    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub weights: Vec<WeightAttrs>,

    // Computed
    #[serde(default)]
    pub customer: Option<u64>,
    #[serde(default)]
    pub community: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfigAttrs {
    pub host: Option<String>,
    pub url_path: Option<String>,
    pub http: Option<bool>,
    pub https: Option<bool>,
    pub request_timeout_millis: Option<u32>,
    pub job_timeout_millis: Option<u32>,
    pub use_xhr: Option<bool>,
    pub static_values: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlendMetricWeightsAttrs {
    pub timestamp: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightAttrs {
    pub name: String,
    pub weight: u32,
    pub default_value: f64,
    #[serde(default)]
    pub maximize: bool,
}

impl PulsarJobAttrs {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name);
        require(&mut errors, "app_id", &self.app_id);
        TYPE_IDS.validate_into("type_id", &self.type_id, &mut errors);
        if !self.weights.is_empty() && self.blend_metric_weights.is_none() {
            errors.push("weights: requires blend_metric_weights".to_string());
        }
        for (i, w) in self.weights.iter().enumerate() {
            require(&mut errors, &format!("weights.{}.name", i), &w.name);
        }
        Error::from_validation(errors)
    }

    pub fn to_model(&self, id: Option<String>) -> PulsarJob {
        let blend = self.blend_metric_weights.as_ref().map(|b| BlendMetricWeights {
            timestamp: b.timestamp,
            weights: self
                .weights
                .iter()
                .map(|w| Weight {
                    name: w.name.clone(),
                    weight: w.weight,
                    default_value: w.default_value,
                    maximize: w.maximize,
                })
                .collect(),
        });

        let config = match (&self.config, blend) {
            (None, None) => None,
            (config, blend) => {
                let c = config.clone().unwrap_or_default();
                Some(JobConfig {
                    host: c.host,
                    url_path: c.url_path,
                    http: c.http,
                    https: c.https,
                    request_timeout_millis: c.request_timeout_millis,
                    job_timeout_millis: c.job_timeout_millis,
                    use_xhr: c.use_xhr,
                    static_values: c.static_values,
                    blend_metric_weights: blend,
                })
            }
        };

        PulsarJob {
            id,
            app_id: self.app_id.clone(),
            type_id: self.type_id.clone(),
            name: self.name.clone(),
            active: self.active,
            shared: self.shared,
            community: None,
            customer: None,
            config,
        }
    }

    pub fn from_model(job: &PulsarJob) -> Self {
        let blend = job.config.as_ref().and_then(|c| c.blend_metric_weights.as_ref());

        Self {
            name: job.name.clone(),
            app_id: job.app_id.clone(),
            type_id: job.type_id.clone(),
            active: job.active,
            shared: job.shared,
            config: job.config.as_ref().map(|c| JobConfigAttrs {
                host: c.host.clone(),
                url_path: c.url_path.clone(),
                http: c.http,
                https: c.https,
                request_timeout_millis: c.request_timeout_millis,
                job_timeout_millis: c.job_timeout_millis,
                use_xhr: c.use_xhr,
                static_values: c.static_values,
            }),
            blend_metric_weights: blend.map(|b| BlendMetricWeightsAttrs {
                timestamp: b.timestamp,
            }),
            weights: blend
                .map(|b| {
                    b.weights
                        .iter()
                        .map(|w| WeightAttrs {
                            name: w.name.clone(),
                            weight: w.weight,
                            default_value: w.default_value,
                            maximize: w.maximize,
                        })
                        .collect()
                })
                .unwrap_or_default(),
            customer: job.customer,
            community: job.community,
        }
    }
}

/// Split an `app_id/job_id` import ID
pub fn parse_import_id(id: &str) -> Result<(String, String)> {
    match id.split_once('/') {
        Some((app, job)) if !app.is_empty() && !job.is_empty() && !job.contains('/') => {
            Ok((app.to_string(), job.to_string()))
        }
        _ => Err(Error::invalid_input(format!(
            "invalid pulsar job import id {:?}, expected app_id/job_id",
            id
        ))),
    }
}

pub struct PulsarJobResource {
    client: Arc<Ns1Client>,
}

impl PulsarJobResource {
    pub fn new(client: Arc<Ns1Client>) -> Self {
        Self { client }
    }

    async fn fetch(&self, data: &mut ResourceData, app_id: &str, job_id: &str) -> Result<()> {
        let result = self.client.get_pulsar_job(app_id, job_id).await;
        let Some(job) = found(data, TYPE_NAME, result)? else {
            return Ok(());
        };
        data.set_state(&PulsarJobAttrs::from_model(&job))
    }
}

#[async_trait]
impl Resource for PulsarJobResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn computed(&self) -> &'static [&'static str] {
        COMPUTED
    }

    fn canonicalize(&self, attrs: &Map<String, Value>) -> Option<Map<String, Value>> {
        canonical::<PulsarJobAttrs>(attrs)
    }

    fn force_new(&self) -> &'static [&'static str] {
        &["app_id", "type_id"]
    }

    fn validate(&self, data: &ResourceData) -> Result<()> {
        data.decode_with_computed::<PulsarJobAttrs>(COMPUTED)?.validate()
    }

    async fn create(&self, data: &mut ResourceData) -> Result<()> {
        let attrs: PulsarJobAttrs = data.decode_with_computed(COMPUTED)?;

        let job = self.client.create_pulsar_job(&attrs.to_model(None)).await?;
        let id = job
            .id
            .clone()
            .ok_or_else(|| Error::Other("pulsar job created without an id".to_string()))?;
        info!("Created {} Pulsar job {} ({}) in app {}", job.type_id, job.name, id, job.app_id);

        data.set_id(id);
        data.set_state(&PulsarJobAttrs::from_model(&job))
    }

    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let state: PulsarJobAttrs = data.decode_state()?;
        self.fetch(data, &state.app_id, &id).await
    }

    async fn update(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let attrs: PulsarJobAttrs = data.decode_with_computed(COMPUTED)?;

        let job = self.client.update_pulsar_job(&attrs.to_model(Some(id))).await?;
        data.set_state(&PulsarJobAttrs::from_model(&job))
    }

    async fn delete(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let state: PulsarJobAttrs = data.decode_state()?;
        let result = self.client.delete_pulsar_job(&state.app_id, &id).await;
        deleted(data, result)
    }

    async fn import(&self, id: &str, data: &mut ResourceData) -> Result<()> {
        let (app_id, job_id) = parse_import_id(id)?;
        data.set_id(job_id.clone());
        self.fetch(data, &app_id, &job_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_weights_nest_under_config() {
        let attrs: PulsarJobAttrs = ResourceData::from_config(json!({
            "name": "perf",
            "app_id": "app1",
            "type_id": "latency",
            "config": {"host": "cdn.example.io", "https": true},
            "blend_metric_weights": {"timestamp": 1700000000},
            "weights": [{"name": "p50", "weight": 100, "default_value": 1.5, "maximize": false}]
        }))
        .unwrap()
        .decode()
        .unwrap();
        assert!(attrs.validate().is_ok());

        let body = serde_json::to_value(attrs.to_model(None)).unwrap();
        assert_eq!(body["appid"], "app1");
        assert_eq!(body["typeid"], "latency");
        assert_eq!(body["config"]["blend_metric_weights"]["timestamp"], 1700000000u64);
        assert_eq!(body["config"]["blend_metric_weights"]["weights"][0]["name"], "p50");
        assert!(body["config"].get("url_path").is_none());

        assert_eq!(PulsarJobAttrs::from_model(&attrs.to_model(None)), attrs);
    }

    #[test]
    fn test_weights_without_blend_is_invalid() {
        let attrs = PulsarJobAttrs {
            name: "perf".into(),
            app_id: "app1".into(),
            type_id: "custom".into(),
            weights: vec![WeightAttrs {
                name: "p50".into(),
                weight: 1,
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(attrs.validate().is_err());
    }

    #[test]
    fn test_parse_import_id() {
        assert_eq!(
            parse_import_id("app1/job1").unwrap(),
            ("app1".to_string(), "job1".to_string())
        );
        assert!(parse_import_id("job1").is_err());
    }
}
