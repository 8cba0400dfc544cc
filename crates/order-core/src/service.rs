//! Order service.
//!
//! Orchestrates the three supported operations on top of an
//! [`OrderRepository`]: it assigns the generated fields of new orders and
//! translates storage failures into [`OrderServiceError`]. Storage errors never
//! cross this boundary; they are logged here and replaced.

use order_storage::{OrderRepository, StorageError};
use order_types::{current_timestamp, Order, ORDER_STATUS_PENDING};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Errors reported by the order service.
///
/// Callers can tell these kinds apart but never see the underlying storage
/// error, which is logged when the failure is translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OrderServiceError {
	/// No order matches the requested id.
	#[error("order not found")]
	OrderNotFound,
	/// Reading from the repository failed.
	#[error("unable to query repository")]
	QueryRepositoryFailure,
	/// Writing to the repository failed.
	#[error("unable to command repository")]
	CommandRepositoryFailure,
}

/// Stateless service over an order repository.
///
/// Cloning is cheap and every clone shares the same repository.
#[derive(Clone)]
pub struct OrderService {
	repository: Arc<dyn OrderRepository>,
}

impl OrderService {
	pub fn new(repository: Arc<dyn OrderRepository>) -> Self {
		Self { repository }
	}

	/// Creates an order and returns its newly generated id.
	///
	/// The id, status and creation time are always assigned here; values the
	/// caller put in those fields are discarded.
	pub async fn create(&self, mut order: Order) -> Result<String, OrderServiceError> {
		let id = Uuid::new_v4().to_string();
		order.id = id.clone();
		order.status = ORDER_STATUS_PENDING.to_string();
		order.created_on = current_timestamp();

		if let Err(e) = self.repository.create_order(order).await {
			tracing::error!(method = "Create", err = %e);
			return Err(OrderServiceError::CommandRepositoryFailure);
		}

		Ok(id)
	}

	/// Returns the order with the given id.
	pub async fn get_by_id(&self, id: &str) -> Result<Order, OrderServiceError> {
		self.repository.get_order_by_id(id).await.map_err(|e| {
			tracing::error!(method = "GetByID", err = %e);
			match e {
				StorageError::NotFound => OrderServiceError::OrderNotFound,
				_ => OrderServiceError::QueryRepositoryFailure,
			}
		})
	}

	/// Sets the status of an order.
	///
	/// The status is forwarded unchanged; no transition rules are enforced.
	pub async fn change_status(&self, id: &str, status: &str) -> Result<(), OrderServiceError> {
		self.repository
			.change_order_status(id, status)
			.await
			.map_err(|e| {
				tracing::error!(method = "ChangeStatus", err = %e);
				OrderServiceError::CommandRepositoryFailure
			})
	}
}
