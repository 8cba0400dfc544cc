//! Builder for wiring an order service from configuration.
//!
//! Storage backends are created through factory functions keyed by the name
//! they are configured under, so the binary decides which backends exist and
//! the configuration decides which one is used.

use crate::OrderService;
use order_config::Config;
use order_storage::{
	StorageError, StorageInterface, StorageOrderRepository, StorageService,
};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while building the order service.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Missing required component: {0}")]
	MissingComponent(String),
}

/// Factory functions needed to build an [`OrderService`].
pub struct OrderServiceFactories<SF> {
	pub storage_factories: HashMap<String, SF>,
}

/// Builder for constructing an [`OrderService`] with a pluggable storage backend.
pub struct OrderServiceBuilder {
	config: Config,
}

impl OrderServiceBuilder {
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	/// Builds the service on top of the configured primary storage backend.
	///
	/// Every configured implementation that has a factory is created, so a
	/// broken table is reported even when it is not the primary one.
	pub fn build<SF>(self, factories: OrderServiceFactories<SF>) -> Result<OrderService, BuilderError>
	where
		SF: Fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>,
	{
		let mut storage_impls = HashMap::new();
		for (name, config) in &self.config.storage.implementations {
			let Some(factory) = factories.storage_factories.get(name) else {
				tracing::warn!(
					component = "storage",
					implementation = %name,
					"No factory registered, skipping"
				);
				continue;
			};

			match factory(config) {
				Ok(implementation) => {
					let is_primary = &self.config.storage.primary == name;
					tracing::info!(component = "storage", implementation = %name, enabled = %is_primary, "Loaded");
					storage_impls.insert(name.clone(), implementation);
				},
				Err(e) => {
					tracing::error!(
						component = "storage",
						implementation = %name,
						error = %e,
						"Failed to create storage implementation"
					);
					return Err(BuilderError::Config(format!(
						"Failed to create storage implementation '{}': {}",
						name, e
					)));
				},
			}
		}

		let primary_storage = &self.config.storage.primary;
		let backend = storage_impls.remove(primary_storage).ok_or_else(|| {
			BuilderError::MissingComponent(format!(
				"Primary storage '{}' has no registered implementation",
				primary_storage
			))
		})?;

		let storage = Arc::new(StorageService::new(backend));
		let repository = Arc::new(StorageOrderRepository::new(storage));

		tracing::info!(
			service_id = %self.config.service.id,
			storage = %primary_storage,
			"Order service ready"
		);

		Ok(OrderService::new(repository))
	}
}
