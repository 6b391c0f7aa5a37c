// Integration tests for `Ns1Client` using wiremock.

mod common;

use ns1_client::model::{Alert, Answer, IpWhitelist, Record, Subnet, Zone};
use ns1_core::Error;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use common::{setup, setup_with_key};

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_sends_api_key_header() {
    let (server, client) = setup_with_key("abc123").await;

    Mock::given(method("GET"))
        .and(path("/v1/zones/example.io"))
        .and(header("X-NSONE-Key", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "5c3f", "zone": "example.io", "ttl": 3600,
            "dns_servers": ["dns1.p01.nsone.net", "dns2.p01.nsone.net"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let zone = client.get_zone("example.io").await.unwrap();

    assert_eq!(zone.zone, "example.io");
    assert_eq!(zone.ttl, Some(3600));
    assert_eq!(zone.dns_servers.len(), 2);
}

#[tokio::test]
async fn test_create_zone_without_autogenerated_ns() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/v1/zones/example.io"))
        .and(query_param("autogenerate_ns_record", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "zone": "example.io", "ttl": 3600, "refresh": 43200,
            "retry": 7200, "expiry": 1209600, "nx_ttl": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let zone = client
        .create_zone(&Zone::new("example.io"), false)
        .await
        .unwrap();

    assert_eq!(zone.refresh, Some(43200));
    assert_eq!(zone.expiry, Some(1209600));
}

#[tokio::test]
async fn test_create_record_puts_typed_body() {
    let (server, client) = setup().await;

    let mut record = Record {
        zone: "example.io".into(),
        domain: "www.example.io".into(),
        record_type: "A".into(),
        ..Default::default()
    };
    record.answers.push(Answer::new(["1.2.3.4"]));

    Mock::given(method("PUT"))
        .and(path("/v1/zones/example.io/www.example.io/A"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "rec1", "zone": "example.io", "domain": "www.example.io",
            "type": "A", "answers": [{"answer": ["1.2.3.4"]}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client.create_record(&record).await.unwrap();

    assert_eq!(created.id.as_deref(), Some("rec1"));
    assert_eq!(created.answers[0].rdata, vec![json!("1.2.3.4")]);
}

#[tokio::test]
async fn test_alerts_use_alerting_endpoint_and_patch() {
    let (server, client) = setup().await;

    let alert = Alert {
        id: Some("al1".into()),
        name: "transfer".into(),
        alert_type: "zone".into(),
        subtype: "transfer_failed".into(),
        ..Default::default()
    };

    Mock::given(method("PATCH"))
        .and(path("/alerting/v1/alerts/al1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "al1", "name": "transfer", "type": "zone",
            "subtype": "transfer_failed", "created_by": "ops"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let updated = client.update_alert(&alert).await.unwrap();
    assert_eq!(updated.created_by.as_deref(), Some("ops"));
}

#[tokio::test]
async fn test_subnet_create_omits_computed_fields() {
    let (server, client) = setup().await;

    let subnet = Subnet {
        prefix: "10.0.0.0/24".into(),
        network_id: 1,
        total_addresses: Some(256),
        ..Default::default()
    };

    Mock::given(method("PUT"))
        .and(path("/v1/ipam/address"))
        .and(body_json(json!({"prefix": "10.0.0.0/24", "network_id": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7, "prefix": "10.0.0.0/24", "network_id": 1, "total_addresses": 256
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client.create_subnet(&subnet).await.unwrap();
    assert_eq!(created.id, Some(7));
}

#[tokio::test]
async fn test_delete_ignores_body() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/tsig/key1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_tsig_key("key1").await.unwrap();
}

#[tokio::test]
async fn test_account_whitelist_create_and_update() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/v1/account/whitelist"))
        .and(body_json(json!({"name": "office", "values": ["192.0.2.0/24"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "wl1", "name": "office", "values": ["192.0.2.0/24"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/account/whitelist/wl1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "wl1", "name": "office", "values": ["192.0.2.0/25"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut list = IpWhitelist {
        id: None,
        name: "office".into(),
        values: vec!["192.0.2.0/24".into()],
    };
    let created = client.create_account_whitelist(&list).await.unwrap();
    assert_eq!(created.id.as_deref(), Some("wl1"));

    assert!(client.update_account_whitelist(&list).await.is_err());
    list.id = created.id;
    list.values = vec!["192.0.2.0/25".into()];
    let updated = client.update_account_whitelist(&list).await.unwrap();
    assert_eq!(updated.values, vec!["192.0.2.0/25"]);
}

#[tokio::test]
async fn test_billing_usage_sends_window() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/billing-usage/queries"))
        .and(query_param("from", "1700000000"))
        .and(query_param("to", "1702592000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "clean_queries": 1200,
            "ddos_queries": 3,
            "nxd_responses": 40,
            "by_network": [{"network": 0, "clean_queries": 1200, "billable_queries": 1200}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/billing-usage/records"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total_usage": 812})))
        .expect(1)
        .mount(&server)
        .await;

    let usage = client.get_query_usage(1700000000, 1702592000).await.unwrap();
    assert_eq!(usage.clean_queries, 1200);
    assert_eq!(usage.by_network[0].billable_queries, 1200);

    assert_eq!(client.get_record_usage().await.unwrap().total_usage, 812);
}

// ── Error-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_404_is_not_found_on_every_endpoint() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "record not found"})),
        )
        .mount(&server)
        .await;

    let record = client.get_record("example.io", "a.example.io", "A").await;
    assert!(matches!(record, Err(Error::NotFound(_))));

    let user = client.get_user("jdoe").await;
    assert!(matches!(user, Err(Error::NotFound(_))));

    let cert = client.get_redirect_certificate("c1").await;
    assert!(matches!(cert, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_api_error_carries_status_method_and_message() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/v1/account/teams"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "team name exists"})),
        )
        .mount(&server)
        .await;

    let team = ns1_client::model::Team {
        name: "ops".into(),
        ..Default::default()
    };
    let err = client.create_team(&team).await.unwrap_err();

    match err {
        Error::Api(api) => {
            assert_eq!(api.response.status, 400);
            assert_eq!(api.response.method, "PUT");
            assert!(api.response.url.ends_with("/v1/account/teams"));
            assert_eq!(api.message, "team name exists");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_adapted_to_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/views/internal"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client.get_view("internal").await.unwrap_err();

    match err {
        Error::Api(api) => {
            assert_eq!(api.response.status, 200);
            assert!(api.message.contains("JSON error"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_transport_failure_is_http_error() {
    let client =
        ns1_client::Ns1Client::with_client(reqwest::Client::new(), "http://127.0.0.1:1/v1/");

    let err = client.list_networks().await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
}
