//! Core traits for the NS1 provider
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`Resource`]: Managed objects with a Create/Read/Update/Delete lifecycle
//! - [`DataSource`]: Read-only lookups

pub mod data_source;
pub mod resource;

pub use data_source::DataSource;
pub use resource::Resource;
