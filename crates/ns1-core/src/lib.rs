// # ns1-core
//
// Core library for the NS1 resource provider.
//
// ## Architecture Overview
//
// This library provides the pieces every resource is built from:
// - **ResourceData**: The attribute bag a lifecycle callback works on
// - **Resource** / **DataSource**: Traits implemented per NS1 object type
// - **ResourceRegistry**: Type-name registry of implementations
// - **Provider**: Dispatches one operation to one registered resource
// - **StringEnum**: Validator for closed string sets
// - **Error**: One error type, plus the adapter normalizing API failures
//
// ## Design Principles
//
// 1. **Typed decode**: Attribute bags are decoded into typed config structs once
// 2. **Wire at the edge**: String-typed attribute values stay on the attribute side
// 3. **No globals**: Configuration and registries are built per invocation
// 4. **Tagged not-found**: Drift is detected by error variant, never by message

pub mod config;
pub mod data;
pub mod diff;
pub mod error;
pub mod provider;
pub mod registry;
pub mod traits;
pub mod validation;

// Re-export core types for convenience
pub use config::ProviderConfig;
pub use data::ResourceData;
pub use diff::AttributeDiff;
pub use error::{ApiError, ApiResponse, Error, Result, convert_to_ns1_error};
pub use provider::{Operation, Provider};
pub use registry::ResourceRegistry;
pub use traits::{DataSource, Resource};
pub use validation::StringEnum;
