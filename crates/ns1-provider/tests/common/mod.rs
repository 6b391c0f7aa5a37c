// Shared helpers for provider lifecycle tests

#![allow(dead_code)]

use std::sync::Arc;

use ns1_client::Ns1Client;
use ns1_core::{Provider, ProviderConfig, ResourceData};
use serde_json::Value;
use wiremock::MockServer;

fn config(server: &MockServer) -> ProviderConfig {
    ProviderConfig::new("test-key").with_endpoint(format!("{}/v1/", server.uri()))
}

/// Start a mock NS1 API and a provider pointed at it
pub async fn setup() -> (MockServer, Provider) {
    let server = MockServer::start().await;
    let provider = ns1_provider::new_provider(&config(&server)).unwrap();
    (server, provider)
}

/// Start a mock NS1 API and a bare client, for driving one resource directly
pub async fn setup_client() -> (MockServer, Arc<Ns1Client>) {
    let server = MockServer::start().await;
    let client = Ns1Client::from_config(&config(&server)).unwrap();
    (server, Arc::new(client))
}

/// Attribute bag for a resource about to be created
pub fn config_bag(config: Value) -> ResourceData {
    ResourceData::from_config(config).unwrap()
}

/// Attribute bag for an existing resource
pub fn state_bag(id: &str, state: Value) -> ResourceData {
    ResourceData::from_state(id, state).unwrap()
}
