//! `ns1_subnet`: an IPAM subnet
//!
//! The API identifies subnets by a numeric ID, carried as a decimal string.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use ns1_client::Ns1Client;
use ns1_client::model::Subnet;
use ns1_core::data::attr;
use ns1_core::diff::canonical;
use ns1_core::{Error, Resource, ResourceData, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use super::{deleted, found, require};

pub const TYPE_NAME: &str = "ns1_subnet";

/// Attributes the API fills in when left unset
const COMPUTED: &[&str] = &[
    "status",
    "parent_id",
    "children",
    "total_addresses",
    "free_addresses",
    "used_addresses",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubnetAttrs {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub network_id: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "attr::string_map")]
    pub tags: BTreeMap<String, String>,

    // Computed
    #[serde(default)]
    pub parent_id: Option<u64>,
    #[serde(default)]
    pub children: Option<u32>,
    #[serde(default)]
    pub total_addresses: Option<u64>,
    #[serde(default)]
    pub free_addresses: Option<u64>,
    #[serde(default)]
    pub used_addresses: Option<u64>,
}

impl SubnetAttrs {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        require(&mut errors, "prefix", &self.prefix);
        if !self.prefix.is_empty() && !is_prefix(&self.prefix) {
            errors.push(format!("prefix: {:?} is not an address/length prefix", self.prefix));
        }
        Error::from_validation(errors)
    }

    pub fn to_model(&self, id: Option<u64>) -> Subnet {
        Subnet {
            id,
            prefix: self.prefix.clone(),
            network_id: self.network_id,
            name: self.name.clone(),
            desc: self.desc.clone(),
            status: self.status.clone(),
            tags: self.tags.clone(),
            ..Default::default()
        }
    }

    pub fn from_model(subnet: &Subnet) -> Self {
        Self {
            prefix: subnet.prefix.clone(),
            network_id: subnet.network_id,
            name: subnet.name.clone(),
            desc: subnet.desc.clone(),
            status: subnet.status.clone(),
            tags: subnet.tags.clone(),
            parent_id: subnet.parent_id,
            children: subnet.children,
            total_addresses: subnet.total_addresses,
            free_addresses: subnet.free_addresses,
            used_addresses: subnet.used_addresses,
        }
    }
}

fn is_prefix(prefix: &str) -> bool {
    let Some((addr, len)) = prefix.split_once('/') else {
        return false;
    };
    let Ok(len) = len.parse::<u8>() else {
        return false;
    };
    match addr.parse::<std::net::IpAddr>() {
        Ok(std::net::IpAddr::V4(_)) => len <= 32,
        Ok(std::net::IpAddr::V6(_)) => len <= 128,
        Err(_) => false,
    }
}

fn subnet_id(data: &ResourceData) -> Result<u64> {
    let id = data.require_id()?;
    id.parse()
        .map_err(|_| Error::invalid_input(format!("subnet id {:?} is not numeric", id)))
}

pub struct SubnetResource {
    client: Arc<Ns1Client>,
}

impl SubnetResource {
    pub fn new(client: Arc<Ns1Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for SubnetResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn computed(&self) -> &'static [&'static str] {
        COMPUTED
    }

    fn canonicalize(&self, attrs: &Map<String, Value>) -> Option<Map<String, Value>> {
        canonical::<SubnetAttrs>(attrs)
    }

    fn force_new(&self) -> &'static [&'static str] {
        &["prefix", "network_id"]
    }

    fn validate(&self, data: &ResourceData) -> Result<()> {
        data.decode_with_computed::<SubnetAttrs>(COMPUTED)?.validate()
    }

    async fn create(&self, data: &mut ResourceData) -> Result<()> {
        let attrs: SubnetAttrs = data.decode_with_computed(COMPUTED)?;

        let subnet = self.client.create_subnet(&attrs.to_model(None)).await?;
        let id = subnet
            .id
            .ok_or_else(|| Error::Other("subnet created without an id".to_string()))?;
        info!("Created subnet {} ({}) in network {}", subnet.prefix, id, subnet.network_id);

        data.set_id(id.to_string());
        data.set_state(&SubnetAttrs::from_model(&subnet))
    }

    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let id = subnet_id(data)?;
        let Some(subnet) = found(data, TYPE_NAME, self.client.get_subnet(id).await)? else {
            return Ok(());
        };
        data.set_state(&SubnetAttrs::from_model(&subnet))
    }

    async fn update(&self, data: &mut ResourceData) -> Result<()> {
        let id = subnet_id(data)?;
        let attrs: SubnetAttrs = data.decode_with_computed(COMPUTED)?;

        let subnet = self.client.update_subnet(&attrs.to_model(Some(id))).await?;
        data.set_state(&SubnetAttrs::from_model(&subnet))
    }

    async fn delete(&self, data: &mut ResourceData) -> Result<()> {
        let id = subnet_id(data)?;
        let result = self.client.delete_subnet(id).await;
        deleted(data, result)
    }
}
