//! Common types for the order service.
//!
//! This crate defines the data model shared by every other crate in the
//! workspace: the order record, the HTTP API bodies, configuration schema
//! validation for pluggable backends, and a few small helpers.

/// API types for HTTP endpoints and request/response structures.
pub mod api;
/// The order record and its line items.
pub mod order;
/// Registry trait tying configuration names to factories.
pub mod registry;
/// Storage namespaces.
pub mod storage;
/// Utility functions for formatting and timestamps.
pub mod utils;
/// Configuration validation types for pluggable backends.
pub mod validation;

pub use api::*;
pub use order::*;
pub use registry::ImplementationRegistry;
pub use storage::*;
pub use utils::{current_timestamp, truncate_id};
pub use validation::*;
