//! `ns1_networks` data source: every network zones can be published to

use std::sync::Arc;

use async_trait::async_trait;
use ns1_client::Ns1Client;
use ns1_client::model::Network;
use ns1_core::{DataSource, ResourceData, Result};
use serde::Serialize;

pub const TYPE_NAME: &str = "ns1_networks";

#[derive(Debug, Serialize)]
struct NetworksState<'a> {
    networks: &'a [Network],
}

pub struct NetworksDataSource {
    client: Arc<Ns1Client>,
}

impl NetworksDataSource {
    pub fn new(client: Arc<Ns1Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for NetworksDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        let networks = self.client.list_networks().await?;

        data.set_id("networks");
        data.set_state(&NetworksState {
            networks: &networks,
        })
    }
}
