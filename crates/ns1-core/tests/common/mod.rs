//! Test doubles and common utilities for provider contract tests
//!
//! The doubles stand in for real resources: they count every callback and
//! behave the way a resource talking to a remote API would, without one.

#![allow(dead_code)]

use async_trait::async_trait;
use ns1_core::error::Result;
use ns1_core::{Error, Provider, Resource, ResourceData, ResourceRegistry};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Outcome the fake remote reports for a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remote {
    /// The call succeeds
    Ok,
    /// The remote object is gone
    Missing,
    /// The remote rejects the call
    Failing,
}

/// Per-callback call counters, shareable across clones
#[derive(Debug, Default, Clone)]
pub struct Calls {
    pub create: Arc<AtomicUsize>,
    pub read: Arc<AtomicUsize>,
    pub update: Arc<AtomicUsize>,
    pub delete: Arc<AtomicUsize>,
}

impl Calls {
    pub fn api_calls(&self) -> usize {
        self.create.load(Ordering::SeqCst)
            + self.read.load(Ordering::SeqCst)
            + self.update.load(Ordering::SeqCst)
            + self.delete.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Deserialize)]
struct WidgetAttrs {
    #[serde(default)]
    name: String,
}

/// A resource with a required `name`, a force-new `name` and a
/// case-insensitive `label`
pub struct MockWidget {
    remote: Remote,
    calls: Calls,
}

impl MockWidget {
    pub fn new(remote: Remote) -> (Self, Calls) {
        let calls = Calls::default();
        (
            Self {
                remote,
                calls: calls.clone(),
            },
            calls,
        )
    }

    fn outcome(&self) -> Result<()> {
        match self.remote {
            Remote::Ok => Ok(()),
            Remote::Missing => Err(Error::not_found("widget not found")),
            Remote::Failing => Err(Error::http("connection reset")),
        }
    }
}

#[async_trait]
impl Resource for MockWidget {
    fn type_name(&self) -> &'static str {
        "ns1_widget"
    }

    fn force_new(&self) -> &'static [&'static str] {
        &["name"]
    }

    fn validate(&self, data: &ResourceData) -> Result<()> {
        let attrs: WidgetAttrs = data.decode()?;
        if attrs.name.is_empty() {
            return Err(Error::validation("name: required attribute is empty"));
        }
        Ok(())
    }

    async fn create(&self, data: &mut ResourceData) -> Result<()> {
        self.calls.create.fetch_add(1, Ordering::SeqCst);
        self.outcome()?;
        let attrs: WidgetAttrs = data.decode()?;
        data.set_id(format!("w-{}", attrs.name));
        data.set_state(&json!({ "name": attrs.name }))
    }

    async fn read(&self, data: &mut ResourceData) -> Result<()> {
        self.calls.read.fetch_add(1, Ordering::SeqCst);
        match self.outcome() {
            Err(e) if e.is_not_found() => {
                data.clear_id();
                Ok(())
            }
            other => other,
        }
    }

    async fn update(&self, _data: &mut ResourceData) -> Result<()> {
        self.calls.update.fetch_add(1, Ordering::SeqCst);
        self.outcome()
    }

    async fn delete(&self, data: &mut ResourceData) -> Result<()> {
        self.calls.delete.fetch_add(1, Ordering::SeqCst);
        data.clear_id();
        self.outcome()
    }

    fn suppress_diff(&self, key: &str, old: &str, new: &str, _data: &ResourceData) -> bool {
        key == "label" && old.eq_ignore_ascii_case(new)
    }
}

/// A provider with a single widget resource registered
pub fn widget_provider(remote: Remote) -> (Provider, Calls) {
    let (widget, calls) = MockWidget::new(remote);
    let mut registry = ResourceRegistry::new();
    registry.register_resource(Arc::new(widget));
    (Provider::new(registry), calls)
}
