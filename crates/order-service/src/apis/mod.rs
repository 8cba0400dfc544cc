//! API endpoint implementations for the order service.

pub mod order;
