//! Configuration builder for tests and local development.

use crate::{ApiConfig, Config, ServiceConfig, StorageConfig};
use std::collections::HashMap;

/// Builder for creating `Config` instances with a fluent API.
///
/// Defaults to a single in-memory storage backend and no API server.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	service_id: String,
	storage_primary: String,
	storage_implementations: HashMap<String, toml::Value>,
	api: Option<ApiConfig>,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	pub fn new() -> Self {
		let mut storage_implementations = HashMap::new();
		storage_implementations.insert(
			"memory".to_string(),
			toml::Value::Table(toml::map::Map::new()),
		);

		Self {
			service_id: "test-order-service".to_string(),
			storage_primary: "memory".to_string(),
			storage_implementations,
			api: None,
		}
	}

	pub fn service_id(mut self, id: impl Into<String>) -> Self {
		self.service_id = id.into();
		self
	}

	/// Sets the primary storage implementation.
	pub fn storage_primary(mut self, primary: impl Into<String>) -> Self {
		self.storage_primary = primary.into();
		self
	}

	/// Adds or replaces a storage implementation table.
	pub fn storage_implementation(mut self, name: impl Into<String>, config: toml::Value) -> Self {
		self.storage_implementations.insert(name.into(), config);
		self
	}

	pub fn api(mut self, api: Option<ApiConfig>) -> Self {
		self.api = api;
		self
	}

	/// Builds the `Config` without running validation.
	pub fn build(self) -> Config {
		Config {
			service: ServiceConfig {
				id: self.service_id,
			},
			storage: StorageConfig {
				primary: self.storage_primary,
				implementations: self.storage_implementations,
			},
			api: self.api,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = ConfigBuilder::new().build();

		assert_eq!(config.service.id, "test-order-service");
		assert_eq!(config.storage.primary, "memory");
		assert!(config.storage.implementations.contains_key("memory"));
		assert!(config.api.is_none());
	}

	#[test]
	fn test_overrides() {
		let config = ConfigBuilder::new()
			.service_id("custom")
			.storage_primary("file")
			.storage_implementation("file", toml::Value::Table(toml::map::Map::new()))
			.api(Some(ApiConfig::default()))
			.build();

		assert_eq!(config.service.id, "custom");
		assert_eq!(config.storage.primary, "file");
		assert_eq!(config.storage.implementations.len(), 2);
		assert_eq!(config.api.unwrap().port, 3000);
	}
}
