//! Provider dispatcher
//!
//! The Provider is responsible for:
//! - Resolving a type name to its registered implementation
//! - Validating configuration before any API call
//! - Driving one lifecycle operation against one attribute bag
//! - Logging each operation and its outcome
//!
//! ## Flow
//!
//! ```text
//!  host ── (type, operation, ResourceData) ──┐
//!                                            ▼
//!                                    ┌──────────────┐
//!                                    │   Provider   │
//!                                    └──────────────┘
//!                                            │
//!                 ┌──────────────────────────┼──────────────────────────┐
//!                 ▼                          ▼                          ▼
//!        ┌────────────────┐        ┌──────────────────┐       ┌──────────────────┐
//!        │ ResourceRegistry│        │ Resource::validate│       │ Resource::<op>   │
//!        │ (lookup)        │        │ (local checks)    │       │ (API round trip) │
//!        └────────────────┘        └──────────────────┘       └──────────────────┘
//! ```
//!
//! The Provider holds no per-instance state; the host may call it for
//! distinct instances concurrently.

use std::fmt;

use tracing::{debug, error, info, warn};

use crate::data::ResourceData;
use crate::diff::{self, AttributeDiff};
use crate::error::Result;
use crate::registry::ResourceRegistry;
use crate::traits::Resource;

/// Lifecycle operation on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Create a new remote object
    Create,
    /// Refresh state from the remote object
    Read,
    /// Apply configuration changes in place
    Update,
    /// Remove the remote object
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Bring state written by an older release up to the resource's layout
fn upgrade(resource: &dyn Resource, data: &mut ResourceData) -> Result<()> {
    let from = data.schema_version();
    let to = resource.schema_version();
    if from < to {
        debug!("upgrading {} state from version {} to {}", resource.type_name(), from, to);
    }
    data.upgrade_state(to, |version, state| resource.upgrade_state(version, state))
}

/// Dispatches lifecycle operations to registered resources
pub struct Provider {
    registry: ResourceRegistry,
}

impl Provider {
    /// Create a provider over a populated registry
    pub fn new(registry: ResourceRegistry) -> Self {
        Self { registry }
    }

    /// The registry operations are dispatched through
    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Run one lifecycle operation
    ///
    /// Create and Update validate configuration first; nothing is sent to the
    /// API when validation fails.
    pub async fn apply(
        &self,
        type_name: &str,
        operation: Operation,
        data: &mut ResourceData,
    ) -> Result<()> {
        let resource = self.registry.resource(type_name)?;
        upgrade(resource.as_ref(), data)?;

        if matches!(operation, Operation::Create | Operation::Update) {
            resource.validate(data)?;
        }

        debug!("{} {} (id: {:?})", operation, type_name, data.id());

        let result = match operation {
            Operation::Create => resource.create(data).await,
            Operation::Read => resource.read(data).await,
            Operation::Update => resource.update(data).await,
            Operation::Delete => resource.delete(data).await,
        };

        match &result {
            Ok(()) => match (operation, data.id()) {
                (Operation::Read, None) => {
                    warn!("{} no longer exists remotely, removing from state", type_name);
                }
                (_, Some(id)) => info!("{} {} succeeded: {}", operation, type_name, id),
                (_, None) => info!("{} {} succeeded", operation, type_name),
            },
            Err(e) => error!("{} {} failed: {}", operation, type_name, e),
        }

        result
    }

    /// Adopt an existing remote object by import ID
    pub async fn import(&self, type_name: &str, id: &str, data: &mut ResourceData) -> Result<()> {
        let resource = self.registry.resource(type_name)?;
        info!("Importing {} {}", type_name, id);

        upgrade(resource.as_ref(), data)?;
        resource.import(id, data).await?;

        if data.id().is_none() {
            warn!("Import of {} {} found nothing", type_name, id);
        }
        Ok(())
    }

    /// Validate configuration and compute the diffs an apply would act on
    pub fn plan(&self, type_name: &str, data: &ResourceData) -> Result<Vec<AttributeDiff>> {
        let resource = self.registry.resource(type_name)?;
        let mut data = data.clone();
        upgrade(resource.as_ref(), &mut data)?;
        resource.validate(&data)?;

        let diffs = diff::compute(resource.as_ref(), &data);
        debug!("{} planned {} change(s)", type_name, diffs.len());
        Ok(diffs)
    }

    /// Read a data source
    pub async fn read_data_source(&self, type_name: &str, data: &mut ResourceData) -> Result<()> {
        let data_source = self.registry.data_source(type_name)?;
        debug!("read data source {}", type_name);

        data_source.read(data).await
    }
}
