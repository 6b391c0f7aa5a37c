//! `ns1_application`: a Pulsar application grouping measurement jobs

use std::sync::Arc;

use async_trait::async_trait;
use ns1_client::Ns1Client;
use ns1_client::model::{Application, DefaultConfig};
use ns1_core::diff::canonical;
use ns1_core::{Error, Resource, ResourceData, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use super::{deleted, found, require};

pub const TYPE_NAME: &str = "ns1_application";

/// Attributes the API fills in when left unset
const COMPUTED: &[&str] = &[
    "browser_wait_millis",
    "jobs_per_transaction",
    "active",
    "default_config",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationAttrs {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub browser_wait_millis: Option<u32>,
    #[serde(default)]
    pub jobs_per_transaction: Option<u32>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub default_config: Option<DefaultConfigAttrs>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultConfigAttrs {
    pub http: bool,
    pub https: bool,
    pub request_timeout_millis: u32,
    pub job_timeout_millis: u32,
    pub use_xhr: bool,
    pub static_values: bool,
}

impl ApplicationAttrs {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name);
        if let Some(config) = &self.default_config {
            if config.request_timeout_millis > 0
                && config.job_timeout_millis > 0
                && config.request_timeout_millis > config.job_timeout_millis
            {
                errors.push(
                    "default_config.request_timeout_millis: must not exceed job_timeout_millis"
                        .to_string(),
                );
            }
        }
        Error::from_validation(errors)
    }

    pub fn to_model(&self, id: Option<String>) -> Application {
        Application {
            id,
            name: self.name.clone(),
            browser_wait_millis: self.browser_wait_millis,
            jobs_per_transaction: self.jobs_per_transaction,
            active: self.active,
            default_config: self.default_config.as_ref().map(|c| DefaultConfig {
                http: c.http,
                https: c.https,
                request_timeout_millis: c.request_timeout_millis,
                job_timeout_millis: c.job_timeout_millis,
                use_xhr: c.use_xhr,
                static_values: c.static_values,
            }),
        }
    }

    pub fn from_model(app: &Application) -> Self {
        Self {
            name: app.name.clone(),
            browser_wait_millis: app.browser_wait_millis,
            jobs_per_transaction: app.jobs_per_transaction,
            active: app.active,
            default_config: app.default_config.as_ref().map(|c| DefaultConfigAttrs {
                http: c.http,
                https: c.https,
                request_timeout_millis: c.request_timeout_millis,
                job_timeout_millis: c.job_timeout_millis,
                use_xhr: c.use_xhr,
                static_values: c.static_values,
            }),
        }
    }
}

pub struct ApplicationResource {
    client: Arc<Ns1Client>,
}

impl ApplicationResource {
    pub fn new(client: Arc<Ns1Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for ApplicationResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn computed(&self) -> &'static [&'static str] {
        COMPUTED
    }

    fn canonicalize(&self, attrs: &Map<String, Value>) -> Option<Map<String, Value>> {
        canonical::<ApplicationAttrs>(attrs)
    }

    fn validate(&self, data: &ResourceData) -> Result<()> {
        data.decode_with_computed::<ApplicationAttrs>(COMPUTED)?.validate()
    }

    async fn create(&self, data: &mut ResourceData) -> Result<()> {
        let attrs: ApplicationAttrs = data.decode_with_computed(COMPUTED)?;

        let app = self.client.create_application(&attrs.to_model(None)).await?;
        let id = app
            .id
            .clone()
            .ok_or_else(|| Error::Other("application created without an id".to_string()))?;
        info!("Created Pulsar application {} ({})", app.name, id);

        data.set_id(id);
        data.set_state(&ApplicationAttrs::from_model(&app))
    }

    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let Some(app) = found(data, TYPE_NAME, self.client.get_application(&id).await)? else {
            return Ok(());
        };
        data.set_state(&ApplicationAttrs::from_model(&app))
    }

    async fn update(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let attrs: ApplicationAttrs = data.decode_with_computed(COMPUTED)?;

        let app = self.client.update_application(&attrs.to_model(Some(id))).await?;
        data.set_state(&ApplicationAttrs::from_model(&app))
    }

    async fn delete(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let result = self.client.delete_application(&id).await;
        deleted(data, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_default_config_fills_in() {
        let attrs: ApplicationAttrs = ResourceData::from_config(json!({
            "name": "web",
            "default_config": {"https": true, "job_timeout_millis": 5000}
        }))
        .unwrap()
        .decode()
        .unwrap();
        assert!(attrs.validate().is_ok());

        let body = serde_json::to_value(attrs.to_model(None)).unwrap();
        assert_eq!(body["default_config"]["https"], true);
        assert_eq!(body["default_config"]["http"], false);
        assert!(body.get("appid").is_none());
        assert!(body.get("active").is_none());
    }

    #[test]
    fn test_request_timeout_bounded_by_job_timeout() {
        let attrs = ApplicationAttrs {
            name: "web".into(),
            default_config: Some(DefaultConfigAttrs {
                request_timeout_millis: 6000,
                job_timeout_millis: 5000,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(attrs.validate().is_err());
    }
}
