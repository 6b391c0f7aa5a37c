// Zones, records, DNS views and TSIG keys

use ns1_core::Result;
use tracing::debug;

use crate::client::Ns1Client;
use crate::model::{Record, TsigKey, View, Zone};

impl Ns1Client {
    /// `GET /zones/{zone}`
    pub async fn get_zone(&self, zone: &str) -> Result<Zone> {
        self.get(&self.url(&format!("zones/{}", zone))).await
    }

    /// `PUT /zones/{zone}`
    ///
    /// When `autogenerate_ns_record` is false the API is told not to create
    /// the apex NS record.
    pub async fn create_zone(&self, zone: &Zone, autogenerate_ns_record: bool) -> Result<Zone> {
        let mut url = self.url(&format!("zones/{}", zone.zone));
        if !autogenerate_ns_record {
            url.push_str("?autogenerate_ns_record=false");
        }
        debug!("creating zone {}", zone.zone);
        self.put(&url, zone).await
    }

    /// `POST /zones/{zone}`
    pub async fn update_zone(&self, zone: &Zone) -> Result<Zone> {
        self.post(&self.url(&format!("zones/{}", zone.zone)), zone).await
    }

    /// `DELETE /zones/{zone}`
    pub async fn delete_zone(&self, zone: &str) -> Result<()> {
        self.delete(&self.url(&format!("zones/{}", zone))).await
    }

    /// `GET /zones/{zone}/{domain}/{type}`
    pub async fn get_record(&self, zone: &str, domain: &str, record_type: &str) -> Result<Record> {
        self.get(&self.url(&record_path(zone, domain, record_type))).await
    }

    /// `PUT /zones/{zone}/{domain}/{type}`
    pub async fn create_record(&self, record: &Record) -> Result<Record> {
        let path = record_path(&record.zone, &record.domain, &record.record_type);
        debug!("creating record {}", path);
        self.put(&self.url(&path), record).await
    }

    /// `POST /zones/{zone}/{domain}/{type}`
    pub async fn update_record(&self, record: &Record) -> Result<Record> {
        let path = record_path(&record.zone, &record.domain, &record.record_type);
        self.post(&self.url(&path), record).await
    }

    /// `DELETE /zones/{zone}/{domain}/{type}`
    pub async fn delete_record(&self, zone: &str, domain: &str, record_type: &str) -> Result<()> {
        self.delete(&self.url(&record_path(zone, domain, record_type))).await
    }

    /// `GET /views/{name}`
    pub async fn get_view(&self, name: &str) -> Result<View> {
        self.get(&self.url(&format!("views/{}", name))).await
    }

    /// `PUT /views/{name}`
    pub async fn create_view(&self, view: &View) -> Result<View> {
        self.put(&self.url(&format!("views/{}", view.name)), view).await
    }

    /// `POST /views/{name}`
    pub async fn update_view(&self, view: &View) -> Result<View> {
        self.post(&self.url(&format!("views/{}", view.name)), view).await
    }

    /// `DELETE /views/{name}`
    pub async fn delete_view(&self, name: &str) -> Result<()> {
        self.delete(&self.url(&format!("views/{}", name))).await
    }

    /// `GET /tsig/{name}`
    pub async fn get_tsig_key(&self, name: &str) -> Result<TsigKey> {
        self.get(&self.url(&format!("tsig/{}", name))).await
    }

    /// `PUT /tsig/{name}`
    pub async fn create_tsig_key(&self, key: &TsigKey) -> Result<TsigKey> {
        self.put(&self.url(&format!("tsig/{}", key.name)), key).await
    }

    /// `POST /tsig/{name}`
    pub async fn update_tsig_key(&self, key: &TsigKey) -> Result<TsigKey> {
        self.post(&self.url(&format!("tsig/{}", key.name)), key).await
    }

    /// `DELETE /tsig/{name}`
    pub async fn delete_tsig_key(&self, name: &str) -> Result<()> {
        self.delete(&self.url(&format!("tsig/{}", name))).await
    }
}

fn record_path(zone: &str, domain: &str, record_type: &str) -> String {
    format!("zones/{}/{}/{}", zone, domain, record_type)
}
