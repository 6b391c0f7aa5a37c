// # Resource Trait
//
// Defines the lifecycle every managed NS1 object implements.
//
// ## Implementations
//
// - `ns1-provider` crate: zones, records, teams, users, API keys, ...
//
// ## Usage
//
// ```rust,ignore
// use ns1_core::{Resource, ResourceData};
//
// async fn apply(resource: &dyn Resource) -> ns1_core::Result<()> {
//     let mut data = ResourceData::from_config(serde_json::json!({"zone": "example.io"}))?;
//
//     resource.create(&mut data).await?;
//     assert!(data.id().is_some());
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::data::ResourceData;
use crate::error::Result;

/// Trait for managed NS1 resources
///
/// Each callback receives the instance's attribute bag, maps it onto the API
/// model, calls the client and maps the response back into the bag.
///
/// # Contract
///
/// - `create`: build the model from configuration, create it remotely, record
///   the returned model as state and set the ID.
/// - `read`: fetch by ID or natural key. A not-found answer clears the ID and
///   is not an error.
/// - `update`: rebuild the model with the existing ID and record the response.
/// - `delete`: remove remotely, clear the ID whatever the outcome, then report
///   the outcome.
///
/// # Thread Safety
///
/// The host may drive distinct instances concurrently, so implementations
/// hold nothing mutable between calls.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Resource type name (e.g., "ns1_zone")
    fn type_name(&self) -> &'static str;

    /// Attributes whose change forces the resource to be replaced
    fn force_new(&self) -> &'static [&'static str] {
        &[]
    }

    /// Attributes the API fills in when configuration leaves them unset
    ///
    /// An unset computed attribute keeps its recorded value and never diffs.
    fn computed(&self) -> &'static [&'static str] {
        &[]
    }

    /// Canonical form of an attribute map, used to compare state with
    /// configuration
    ///
    /// Implementations usually decode into their attribute struct and
    /// serialize it back with [`crate::diff::canonical`]. `None` compares the
    /// maps as given.
    fn canonicalize(&self, _attrs: &Map<String, Value>) -> Option<Map<String, Value>> {
        None
    }

    /// Version of the state layout this resource writes
    fn schema_version(&self) -> u32 {
        0
    }

    /// Rewrite state recorded at `version` into the layout of `version + 1`
    fn upgrade_state(
        &self,
        _version: u32,
        state: Map<String, Value>,
    ) -> Result<Map<String, Value>> {
        Ok(state)
    }

    /// Check configuration before any API call is made
    ///
    /// The default decodes nothing and accepts everything.
    fn validate(&self, _data: &ResourceData) -> Result<()> {
        Ok(())
    }

    /// Create the resource
    async fn create(&self, data: &mut ResourceData) -> Result<()>;

    /// Refresh state from the remote object
    async fn read(&self, data: &mut ResourceData) -> Result<()>;

    /// Apply configuration changes in place
    async fn update(&self, data: &mut ResourceData) -> Result<()>;

    /// Delete the resource
    async fn delete(&self, data: &mut ResourceData) -> Result<()>;

    /// Adopt an existing remote object
    ///
    /// By default the import ID is the resource ID.
    async fn import(&self, id: &str, data: &mut ResourceData) -> Result<()> {
        data.set_id(id);
        self.read(data).await
    }

    /// Whether a detected difference on `key` should be ignored
    ///
    /// `old` and `new` are the flattened state and configuration values.
    fn suppress_diff(&self, _key: &str, _old: &str, _new: &str, _data: &ResourceData) -> bool {
        false
    }
}
