//! Core of the order service.
//!
//! [`OrderService`] implements the three order operations (create, fetch by
//! id, change status) on top of an [`order_storage::OrderRepository`], and
//! [`OrderServiceBuilder`] assembles it from configuration and storage factories.

pub mod builder;
pub mod service;

pub use builder::{BuilderError, OrderServiceBuilder, OrderServiceFactories};
pub use service::{OrderService, OrderServiceError};
