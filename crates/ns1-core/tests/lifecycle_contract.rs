//! Architectural Contract Test: Resource Lifecycle
//!
//! This test verifies the contract every lifecycle operation follows when
//! dispatched through the provider.
//!
//! Constraints verified:
//! - Validation runs before create and update, and failures reach no API
//! - A read that finds nothing clears the ID and succeeds
//! - Delete clears the ID even when the remote call fails
//! - Unknown types are configuration errors
//!
//! If this test fails, state drift handling is broken.

mod common;

use common::*;
use ns1_core::{Error, Operation, ResourceData};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn invalid_config_never_reaches_the_api() {
    let (provider, calls) = widget_provider(Remote::Ok);
    let mut data = ResourceData::from_config(json!({"name": ""})).unwrap();

    let err = provider
        .apply("ns1_widget", Operation::Create, &mut data)
        .await
        .unwrap_err();

    assert!(err.validation_errors().is_some());
    assert_eq!(calls.api_calls(), 0, "validation failure must not call the API");
    assert!(data.id().is_none());
}

#[test]
fn create_records_id_and_state() {
    let (provider, _calls) = widget_provider(Remote::Ok);
    let mut data = ResourceData::from_config(json!({"name": "alpha"})).unwrap();

    assert_ok!(tokio_test::block_on(provider.apply(
        "ns1_widget",
        Operation::Create,
        &mut data
    )));

    assert_eq!(data.id(), Some("w-alpha"));
    assert_eq!(data.state()["name"], "alpha");
}

#[tokio::test]
async fn read_of_missing_object_clears_id() {
    let (provider, calls) = widget_provider(Remote::Missing);
    let mut data = ResourceData::from_state("w-alpha", json!({"name": "alpha"})).unwrap();

    provider
        .apply("ns1_widget", Operation::Read, &mut data)
        .await
        .unwrap();

    assert!(data.id().is_none(), "drifted resource must be dropped from state");
    assert_eq!(calls.read.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn read_failure_keeps_id() {
    let (provider, _calls) = widget_provider(Remote::Failing);
    let mut data = ResourceData::from_state("w-alpha", json!({"name": "alpha"})).unwrap();

    let err = provider
        .apply("ns1_widget", Operation::Read, &mut data)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Http(_)));
    assert_eq!(data.id(), Some("w-alpha"));
}

#[tokio::test]
async fn delete_clears_id_on_failure() {
    let (provider, _calls) = widget_provider(Remote::Failing);
    let mut data = ResourceData::from_state("w-alpha", json!({"name": "alpha"})).unwrap();

    assert_err!(
        provider
            .apply("ns1_widget", Operation::Delete, &mut data)
            .await,
        "delete failure must still be reported"
    );
    assert!(data.id().is_none());
}

#[tokio::test]
async fn import_adopts_the_id() {
    let (provider, calls) = widget_provider(Remote::Ok);
    let mut data = ResourceData::new();

    provider.import("ns1_widget", "w-beta", &mut data).await.unwrap();

    assert_eq!(data.id(), Some("w-beta"));
    assert_eq!(calls.read.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unknown_type_is_a_config_error() {
    let (provider, calls) = widget_provider(Remote::Ok);
    let mut data = ResourceData::from_config(json!({"name": "alpha"})).unwrap();

    let err = provider
        .apply("ns1_gadget", Operation::Create, &mut data)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Config(_)));
    assert_eq!(calls.api_calls(), 0);
}
