//! Read-only data sources
//!
//! Data sources look objects up by the keys given in configuration. A lookup
//! that finds nothing is an error, unlike a resource read.

pub mod billing_usage;
pub mod monitoring_regions;
pub mod networks;
pub mod record;
pub mod zone;
