//! `ns1_monitoring_regions` data source: regions monitoring jobs can run from

use std::sync::Arc;

use async_trait::async_trait;
use ns1_client::Ns1Client;
use ns1_client::model::MonitorRegion;
use ns1_core::{DataSource, ResourceData, Result};
use serde::Serialize;

pub const TYPE_NAME: &str = "ns1_monitoring_regions";

#[derive(Debug, Serialize)]
struct RegionsState<'a> {
    regions: &'a [MonitorRegion],
}

pub struct MonitoringRegionsDataSource {
    client: Arc<Ns1Client>,
}

impl MonitoringRegionsDataSource {
    pub fn new(client: Arc<Ns1Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for MonitoringRegionsDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let regions = self.client.list_monitor_regions().await?;

        data.set_id("monitoring_regions");
        data.set_state(&RegionsState { regions: &regions })
    }
}
