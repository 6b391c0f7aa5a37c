//! `ns1_zone`: DNS zones, identified by zone name
//!
//! A zone is either primary on NS1 (optionally notifying `secondaries`),
//! secondary on NS1 (transferred from `primary`), or linked to another zone.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use ns1_client::Ns1Client;
use ns1_client::model::{Zone, ZonePrimary, ZoneSecondary, ZoneSecondaryServer, ZoneTsig};
use ns1_core::data::attr;
use ns1_core::diff::{canonical, case_insensitive};
use ns1_core::{Error, Resource, ResourceData, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use super::{deleted, found, require};

pub const TYPE_NAME: &str = "ns1_zone";

/// Attributes the API fills in when left unset
const COMPUTED: &[&str] = &[
    "ttl",
    "refresh",
    "retry",
    "expiry",
    "nx_ttl",
    "hostmaster",
    "networks",
    "dnssec",
    "autogenerate_ns_record",
    "dns_servers",
];

/// Zone attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneAttrs {
    #[serde(default)]
    pub zone: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub ttl: Option<u32>,
    #[serde(default)]
    pub refresh: Option<u32>,
    #[serde(default)]
    pub retry: Option<u32>,
    #[serde(default)]
    pub expiry: Option<u32>,
    #[serde(default)]
    pub nx_ttl: Option<u32>,
    #[serde(default)]
    pub hostmaster: Option<String>,

    /// Primary server NS1 transfers this zone from
    #[serde(default)]
    pub primary: Option<String>,
    #[serde(default)]
    pub primary_port: Option<u16>,
    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub additional_primaries: Vec<String>,
    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub additional_ports: Vec<u16>,

    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub networks: Vec<u32>,
    #[serde(default)]
    pub dnssec: Option<bool>,

    /// Only sent on create
    #[serde(default)]
    pub autogenerate_ns_record: Option<bool>,

    /// Servers NS1 notifies and allows transfers to
    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub secondaries: Vec<SecondaryAttrs>,

    #[serde(default)]
    pub tsig: Option<TsigAttrs>,

    #[serde(default, deserialize_with = "attr::string_map")]
    pub tags: BTreeMap<String, String>,

    /// Comma-joined nameservers, computed
    #[serde(default)]
    pub dns_servers: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecondaryAttrs {
    pub ip: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub notify: bool,
    #[serde(default, deserialize_with = "attr::nullable_vec")]
    pub networks: Vec<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TsigAttrs {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
}

impl ZoneAttrs {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        require(&mut errors, "zone", &self.zone);

        if non_empty(&self.link).is_some() {
            if non_empty(&self.primary).is_some() {
                errors.push("link: conflicts with primary".to_string());
            }
            if !self.secondaries.is_empty() {
                errors.push("link: conflicts with secondaries".to_string());
            }
        }

        if non_empty(&self.primary).is_none() && !self.additional_primaries.is_empty() {
            errors.push("additional_primaries: requires primary".to_string());
        }
        if !self.additional_ports.is_empty()
            && self.additional_ports.len() != self.additional_primaries.len()
        {
            errors.push(format!(
                "additional_ports: expected {} entries to match additional_primaries, got {}",
                self.additional_primaries.len(),
                self.additional_ports.len()
            ));
        }

        for (i, secondary) in self.secondaries.iter().enumerate() {
            require(&mut errors, &format!("secondaries.{}.ip", i), &secondary.ip);
        }

        Error::from_validation(errors)
    }

    pub fn to_model(&self) -> Zone {
        let tsig = self.tsig.as_ref().map(|t| ZoneTsig {
            enabled: t.enabled,
            name: t.name.clone(),
            hash: t.hash.clone(),
        });

        let secondary = non_empty(&self.primary).map(|ip| ZoneSecondary {
            enabled: true,
            primary_ip: Some(ip.to_string()),
            primary_port: self.primary_port,
            other_ips: self.additional_primaries.clone(),
            other_ports: self.additional_ports.clone(),
            tsig,
            ..ZoneSecondary::default()
        });

        let primary = (!self.secondaries.is_empty()).then(|| ZonePrimary {
            enabled: true,
            secondaries: self
                .secondaries
                .iter()
                .map(|s| ZoneSecondaryServer {
                    ip: s.ip.clone(),
                    port: s.port,
                    notify: s.notify,
                    networks: s.networks.clone(),
                })
                .collect(),
        });

        Zone {
            zone: self.zone.clone(),
            link: non_empty(&self.link).map(str::to_string),
            ttl: self.ttl,
            nx_ttl: self.nx_ttl,
            retry: self.retry,
            refresh: self.refresh,
            expiry: self.expiry,
            hostmaster: non_empty(&self.hostmaster).map(str::to_string),
            network_ids: (!self.networks.is_empty()).then(|| self.networks.clone()),
            secondary,
            primary,
            dnssec: self.dnssec,
            tags: (!self.tags.is_empty()).then(|| self.tags.clone()),
            ..Zone::default()
        }
    }

    /// Map an API zone back; `autogenerate_ns_record` is not returned by the
    /// API and is carried over from the prior attributes
    pub fn from_model(zone: &Zone, autogenerate_ns_record: Option<bool>) -> Self {
        let secondary = zone.secondary.as_ref().filter(|s| s.enabled);

        Self {
            zone: zone.zone.clone(),
            link: zone.link.clone(),
            ttl: zone.ttl,
            refresh: zone.refresh,
            retry: zone.retry,
            expiry: zone.expiry,
            nx_ttl: zone.nx_ttl,
            hostmaster: zone.hostmaster.clone(),
            primary: secondary.and_then(|s| s.primary_ip.clone()),
            primary_port: secondary.and_then(|s| s.primary_port),
            additional_primaries: secondary.map(|s| s.other_ips.clone()).unwrap_or_default(),
            additional_ports: secondary.map(|s| s.other_ports.clone()).unwrap_or_default(),
            networks: zone.network_ids.clone().unwrap_or_default(),
            dnssec: zone.dnssec,
            autogenerate_ns_record,
            secondaries: zone
                .primary
                .iter()
                .flat_map(|p| p.secondaries.iter())
                .map(|s| SecondaryAttrs {
                    ip: s.ip.clone(),
                    port: s.port,
                    notify: s.notify,
                    networks: s.networks.clone(),
                })
                .collect(),
            tsig: secondary.and_then(|s| s.tsig.as_ref()).map(|t| TsigAttrs {
                enabled: t.enabled,
                name: t.name.clone(),
                hash: t.hash.clone(),
            }),
            tags: zone.tags.clone().unwrap_or_default(),
            dns_servers: (!zone.dns_servers.is_empty()).then(|| zone.dns_servers.join(",")),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

pub struct ZoneResource {
    client: Arc<Ns1Client>,
}

impl ZoneResource {
    pub fn new(client: Arc<Ns1Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for ZoneResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn computed(&self) -> &'static [&'static str] {
        COMPUTED
    }

    fn canonicalize(&self, attrs: &Map<String, Value>) -> Option<Map<String, Value>> {
        canonical::<ZoneAttrs>(attrs)
    }

    fn force_new(&self) -> &'static [&'static str] {
        &["zone"]
    }

    fn validate(&self, data: &ResourceData) -> Result<()> {
        data.decode_with_computed::<ZoneAttrs>(COMPUTED)?.validate()
    }

    async fn create(&self, data: &mut ResourceData) -> Result<()> {
        let attrs: ZoneAttrs = data.decode_with_computed(COMPUTED)?;
        let autogenerate = attrs.autogenerate_ns_record.unwrap_or(true);

        let zone = self.client.create_zone(&attrs.to_model(), autogenerate).await?;
        info!("Created zone {}", zone.zone);

        data.set_id(zone.zone.clone());
        data.set_state(&ZoneAttrs::from_model(&zone, attrs.autogenerate_ns_record))
    }

    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let autogenerate = data
            .get("autogenerate_ns_record")
            .and_then(serde_json::Value::as_bool);

        let Some(zone) = found(data, TYPE_NAME, self.client.get_zone(&id).await)? else {
            return Ok(());
        };
        data.set_state(&ZoneAttrs::from_model(&zone, autogenerate))
    }

    async fn update(&self, data: &mut ResourceData) -> Result<()> {
        data.require_id()?;
        let attrs: ZoneAttrs = data.decode_with_computed(COMPUTED)?;

        let zone = self.client.update_zone(&attrs.to_model()).await?;
        data.set_state(&ZoneAttrs::from_model(&zone, attrs.autogenerate_ns_record))
    }

    async fn delete(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.require_id()?.to_string();
        let result = self.client.delete_zone(&id).await;
        deleted(data, result)
    }

    fn suppress_diff(&self, key: &str, old: &str, new: &str, _data: &ResourceData) -> bool {
        matches!(key, "zone" | "link") && case_insensitive(old, new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(config: serde_json::Value) -> ZoneAttrs {
        ResourceData::from_config(config).unwrap().decode().unwrap()
    }

    #[test]
    fn test_secondary_zone_maps_to_secondary_block() {
        let a = attrs(json!({
            "zone": "example.io",
            "primary": "192.0.2.1",
            "additional_primaries": ["192.0.2.2"],
            "additional_ports": [5353],
            "tsig": {"enabled": true, "name": "key1", "hash": "hmac-sha256"}
        }));

        let model = a.to_model();
        let secondary = model.secondary.as_ref().unwrap();
        assert!(secondary.enabled);
        assert_eq!(secondary.primary_ip.as_deref(), Some("192.0.2.1"));
        assert_eq!(secondary.other_ports, vec![5353]);
        assert!(model.primary.is_none());

        let back = ZoneAttrs::from_model(&model, None);
        assert_eq!(back.primary, a.primary);
        assert_eq!(back.additional_primaries, a.additional_primaries);
        assert_eq!(back.tsig, a.tsig);
    }

    #[test]
    fn test_link_conflicts_with_primary_and_secondaries() {
        let a = attrs(json!({
            "zone": "example.io",
            "link": "other.io",
            "primary": "192.0.2.1",
            "secondaries": [{"ip": "192.0.2.9"}]
        }));

        let err = a.validate().unwrap_err();
        assert_eq!(err.validation_errors().unwrap().len(), 2);
    }

    #[test]
    fn test_additional_ports_must_match_primaries() {
        let a = attrs(json!({
            "zone": "example.io",
            "primary": "192.0.2.1",
            "additional_primaries": ["192.0.2.2", "192.0.2.3"],
            "additional_ports": [53]
        }));

        assert!(a.validate().unwrap_err().to_string().contains("additional_ports"));
    }

    #[test]
    fn test_dns_servers_are_comma_joined() {
        let zone = Zone {
            zone: "example.io".into(),
            dns_servers: vec!["dns1.p01.nsone.net".into(), "dns2.p01.nsone.net".into()],
            ..Zone::default()
        };

        let a = ZoneAttrs::from_model(&zone, Some(false));
        assert_eq!(a.dns_servers.as_deref(), Some("dns1.p01.nsone.net,dns2.p01.nsone.net"));
        assert_eq!(a.autogenerate_ns_record, Some(false));
    }

    #[test]
    fn test_zone_name_compares_case_insensitively() {
        let r = ZoneResource::new(Arc::new(Ns1Client::with_client(
            Default::default(),
            "http://localhost/v1/",
        )));
        let data = ResourceData::new();

        assert!(r.suppress_diff("zone", "Example.IO", "example.io", &data));
        assert!(!r.suppress_diff("hostmaster", "A@x.io", "a@x.io", &data));
    }
}
