// Shared helpers for client integration tests

#![allow(dead_code)]

use ns1_client::Ns1Client;
use wiremock::MockServer;

/// Start a mock NS1 API and a client pointed at its `/v1/` endpoint
pub async fn setup() -> (MockServer, Ns1Client) {
    let server = MockServer::start().await;
    let client = Ns1Client::with_client(reqwest::Client::new(), &format!("{}/v1/", server.uri()));
    (server, client)
}

/// Start a mock NS1 API and a client built from configuration
pub async fn setup_with_key(api_key: &str) -> (MockServer, Ns1Client) {
    let server = MockServer::start().await;
    let config =
        ns1_core::ProviderConfig::new(api_key).with_endpoint(format!("{}/v1/", server.uri()));
    let client = Ns1Client::from_config(&config).unwrap();
    (server, client)
}
