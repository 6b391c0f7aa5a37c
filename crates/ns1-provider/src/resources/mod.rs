//! Managed NS1 resources
//!
//! Every resource follows the same shape:
//!
//! - an attribute struct (`*Attrs`) decoded from the attribute bag
//! - `to_model` / `from_model` mapping functions between the attributes and
//!   the API model
//! - a [`Resource`](ns1_core::Resource) implementation calling the client
//!
//! The helpers below hold the parts of the lifecycle contract every resource
//! shares: drift on read and ID clearing on delete.

pub mod account_whitelist;
pub mod alert;
pub mod apikey;
pub mod application;
pub mod datafeed;
pub mod dataset;
pub mod datasource;
pub mod dnsview;
pub mod monitoring_job;
pub mod notifylist;
pub mod pulsar_job;
pub mod record;
pub mod redirect;
pub mod redirect_certificate;
pub mod subnet;
pub mod team;
pub mod tsigkey;
pub mod user;
pub mod zone;

use ns1_core::{ResourceData, Result};
use tracing::warn;

/// Unwrap a read, treating not-found as drift
///
/// A missing remote object clears the ID and yields `None`; the caller then
/// returns `Ok(())` so the host plans a re-create.
pub(crate) fn found<T>(
    data: &mut ResourceData,
    what: &str,
    result: Result<T>,
) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => {
            warn!("{} {} not found, removing from state", what, data.id().unwrap_or("<none>"));
            data.clear_id();
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Finish a delete: the ID is cleared whatever the outcome
pub(crate) fn deleted(data: &mut ResourceData, result: Result<()>) -> Result<()> {
    data.clear_id();
    result
}

/// Record a required string attribute failure
pub(crate) fn require(errors: &mut Vec<String>, key: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(format!("{}: required attribute is empty", key));
    }
}
