// # Data Source Trait
//
// Read-only lookups of remote NS1 data that are not managed.

use async_trait::async_trait;

use crate::data::ResourceData;
use crate::error::Result;

/// Trait for read-only data sources
///
/// `read` takes its lookup keys from configuration and records everything it
/// finds as state. Unlike resources, a missing object is an error.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Data source type name (e.g., "ns1_zone")
    fn type_name(&self) -> &'static str;

    /// Look up the remote data
    async fn read(&self, data: &mut ResourceData) -> Result<()>;
}
