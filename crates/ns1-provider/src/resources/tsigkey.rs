//! `ns1_tsigkey`: a TSIG key for signing zone transfers, identified by name

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use ns1_client::Ns1Client;
use ns1_client::model::TsigKey;
use ns1_core::diff::canonical;
use ns1_core::{Error, Resource, ResourceData, Result, StringEnum};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use super::{deleted, found, require};

pub const TYPE_NAME: &str = "ns1_tsigkey";

pub static ALGORITHMS: LazyLock<StringEnum> = LazyLock::new(|| {
    StringEnum::new(&[
        "hmac-md5",
        "hmac-sha1",
        "hmac-sha224",
        "hmac-sha256",
        "hmac-sha384",
        "hmac-sha512",
    ])
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TsigKeyAttrs {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub algorithm: String,
    #[serde(default)]
    pub secret: String,
}

impl TsigKeyAttrs {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name);
        ALGORITHMS.validate_into("algorithm", &self.algorithm, &mut errors);
        require(&mut errors, "secret", &self.secret);
        Error::from_validation(errors)
    }

    pub fn to_model(&self) -> TsigKey {
        TsigKey {
            name: self.name.clone(),
            algorithm: self.algorithm.clone(),
            secret: self.secret.clone(),
        }
    }

    pub fn from_model(key: &TsigKey) -> Self {
        Self {
            name: key.name.clone(),
            algorithm: key.algorithm.clone(),
            secret: key.secret.clone(),
        }
    }
}

pub struct TsigKeyResource {
    client: Arc<Ns1Client>,
}

impl TsigKeyResource {
    pub fn new(client: Arc<Ns1Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for TsigKeyResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn canonicalize(&self, attrs: &Map<String, Value>) -> Option<Map<String, Value>> {
        canonical::<TsigKeyAttrs>(attrs)
    }

    fn force_new(&self) -> &'static [&'static str] {
        &["name"]
    }

    fn validate(&self, data: &ResourceData) -> Result<()> {
        data.decode::<TsigKeyAttrs>()?.validate()
    }

    async fn create(&self, data: &mut ResourceData) -> Result<()> {
        let attrs: TsigKeyAttrs = data.decode()?;

        let key = self.client.create_tsig_key(&attrs.to_model()).await?;
        info!("Created TSIG key {} ({})", key.name, key.algorithm);

        data.set_id(key.name.clone());
        data.set_state(&TsigKeyAttrs::from_model(&key))
    }

    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let Some(key) = found(data, TYPE_NAME, self.client.get_tsig_key(&id).await)? else {
            return Ok(());
        };
        data.set_state(&TsigKeyAttrs::from_model(&key))
    }

    async fn update(&self, data: &mut ResourceData) -> Result<()> {
        data.require_id()?;
        let attrs: TsigKeyAttrs = data.decode()?;

        let key = self.client.update_tsig_key(&attrs.to_model()).await?;
        data.set_state(&TsigKeyAttrs::from_model(&key))
    }

    async fn delete(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let result = self.client.delete_tsig_key(&id).await;
        deleted(data, result)
    }
}
