//! Order repository.
//!
//! The repository is the only owner of persisted order state. The order
//! service talks to it exclusively through the [`OrderRepository`] trait, which
//! reports a missing order as [`StorageError::NotFound`] and every other
//! failure through the remaining variants.

use crate::{StorageError, StorageService};
use async_trait::async_trait;
use order_types::{truncate_id, Order, StorageKey};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Data access contract for order records.
#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
	/// Persists a fully populated order.
	async fn create_order(&self, order: Order) -> Result<(), StorageError>;

	/// Fetches an order by id, returning [`StorageError::NotFound`] when absent.
	async fn get_order_by_id(&self, id: &str) -> Result<Order, StorageError>;

	/// Replaces the status of an existing order, leaving all other fields untouched.
	async fn change_order_status(&self, id: &str, status: &str) -> Result<(), StorageError>;
}

/// Order repository backed by a [`StorageService`].
///
/// Orders are stored as JSON documents in the `orders` namespace. Writes are
/// serialized through a mutex so that the read-modify-write of a status change
/// cannot interleave with another write from the same process.
pub struct StorageOrderRepository {
	storage: Arc<StorageService>,
	write_lock: Mutex<()>,
}

impl StorageOrderRepository {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self {
			storage,
			write_lock: Mutex::new(()),
		}
	}
}

#[async_trait]
impl OrderRepository for StorageOrderRepository {
	async fn create_order(&self, order: Order) -> Result<(), StorageError> {
		let _guard = self.write_lock.lock().await;
		self.storage
			.insert(StorageKey::Orders.as_str(), &order.id, &order)
			.await?;
		tracing::debug!(order_id = %truncate_id(&order.id), "Stored order");
		Ok(())
	}

	async fn get_order_by_id(&self, id: &str) -> Result<Order, StorageError> {
		self.storage.retrieve(StorageKey::Orders.as_str(), id).await
	}

	async fn change_order_status(&self, id: &str, status: &str) -> Result<(), StorageError> {
		let _guard = self.write_lock.lock().await;

		let mut order: Order = self
			.storage
			.retrieve(StorageKey::Orders.as_str(), id)
			.await?;
		order.status = status.to_string();

		self.storage
			.update(StorageKey::Orders.as_str(), id, &order)
			.await?;
		tracing::debug!(order_id = %truncate_id(id), status = %status, "Updated order status");
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::implementations::{file::FileStorage, memory::MemoryStorage};
	use order_types::OrderItem;
	use tempfile::TempDir;

	fn sample_order(id: &str) -> Order {
		let mut order = Order::new("c1", "r1", vec![OrderItem::new("p1", "Burger", 5.5, 2)]);
		order.id = id.to_string();
		order.status = "Pending".to_string();
		order.created_on = 1_700_000_000;
		order
	}

	fn memory_repository() -> StorageOrderRepository {
		StorageOrderRepository::new(Arc::new(StorageService::new(Box::new(MemoryStorage::new()))))
	}

	#[tokio::test]
	async fn test_create_and_get() {
		let repository = memory_repository();
		let order = sample_order("id-1");

		repository.create_order(order.clone()).await.unwrap();
		let loaded = repository.get_order_by_id("id-1").await.unwrap();

		assert_eq!(loaded, order);
	}

	#[tokio::test]
	async fn test_create_duplicate_id_fails() {
		let repository = memory_repository();

		repository.create_order(sample_order("dup")).await.unwrap();
		let result = repository.create_order(sample_order("dup")).await;

		assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
	}

	#[tokio::test]
	async fn test_get_missing_is_not_found() {
		let repository = memory_repository();
		let result = repository.get_order_by_id("missing-id").await;
		assert!(matches!(result, Err(StorageError::NotFound)));
	}

	#[tokio::test]
	async fn test_change_status_only_touches_status() {
		let repository = memory_repository();
		let order = sample_order("id-1");
		repository.create_order(order.clone()).await.unwrap();

		repository
			.change_order_status("id-1", "Delivered")
			.await
			.unwrap();

		let loaded = repository.get_order_by_id("id-1").await.unwrap();
		assert_eq!(loaded.status, "Delivered");
		assert_eq!(
			Order {
				status: order.status.clone(),
				..loaded
			},
			order
		);
	}

	#[tokio::test]
	async fn test_change_status_unknown_id_is_not_found() {
		let repository = memory_repository();
		let result = repository.change_order_status("missing", "Delivered").await;
		assert!(matches!(result, Err(StorageError::NotFound)));
	}

	#[tokio::test]
	async fn test_concurrent_status_changes_keep_order_intact() {
		let repository = Arc::new(memory_repository());
		repository.create_order(sample_order("id-1")).await.unwrap();

		let mut handles = Vec::new();
		for i in 0..16 {
			let repository = Arc::clone(&repository);
			handles.push(tokio::spawn(async move {
				repository
					.change_order_status("id-1", &format!("Status{}", i))
					.await
			}));
		}
		for handle in handles {
			handle.await.unwrap().unwrap();
		}

		let loaded = repository.get_order_by_id("id-1").await.unwrap();
		assert!(loaded.status.starts_with("Status"));
		assert_eq!(loaded.customer_id, "c1");
	}

	#[tokio::test]
	async fn test_file_backed_repository() {
		let temp_dir = TempDir::new().unwrap();
		let repository = StorageOrderRepository::new(Arc::new(StorageService::new(Box::new(
			FileStorage::new(temp_dir.path().to_path_buf()),
		))));

		repository.create_order(sample_order("id-1")).await.unwrap();
		repository
			.change_order_status("id-1", "Cooking")
			.await
			.unwrap();

		let loaded = repository.get_order_by_id("id-1").await.unwrap();
		assert_eq!(loaded.status, "Cooking");
		assert_eq!(loaded.order_items.len(), 1);
	}
}
