//! Order API implementation.
//!
//! Validates incoming requests, calls the [`OrderService`] and converts its
//! error taxonomy into [`APIError`] values with stable error codes.

use order_core::{OrderService, OrderServiceError};
use order_types::{
	APIError, ChangeStatusRequest, ChangeStatusResponse, CreateOrderResponse, GetOrderResponse,
	Order,
};

/// Maps a service error to its HTTP representation.
pub fn to_api_error(error: OrderServiceError) -> APIError {
	match error {
		OrderServiceError::OrderNotFound => APIError::NotFound {
			error_type: "ORDER_NOT_FOUND".to_string(),
			message: error.to_string(),
		},
		OrderServiceError::QueryRepositoryFailure => APIError::InternalServerError {
			error_type: "QUERY_REPOSITORY_FAILURE".to_string(),
			message: error.to_string(),
		},
		OrderServiceError::CommandRepositoryFailure => APIError::InternalServerError {
			error_type: "COMMAND_REPOSITORY_FAILURE".to_string(),
			message: error.to_string(),
		},
	}
}

fn require(field: &str, value: &str) -> Result<(), APIError> {
	if value.trim().is_empty() {
		return Err(APIError::BadRequest {
			error_type: "INVALID_REQUEST".to_string(),
			message: format!("{} is required", field),
			details: Some(serde_json::json!({ "field": field })),
		});
	}
	Ok(())
}

/// Creates a new order from the submitted body.
pub async fn create_order(
	order: Order,
	service: &OrderService,
) -> Result<CreateOrderResponse, APIError> {
	require("customer_id", &order.customer_id)?;
	require("restaurant_id", &order.restaurant_id)?;

	let id = service.create(order).await.map_err(to_api_error)?;
	Ok(CreateOrderResponse { id })
}

pub async fn get_order_by_id(
	id: &str,
	service: &OrderService,
) -> Result<GetOrderResponse, APIError> {
	let order = service.get_by_id(id).await.map_err(to_api_error)?;
	Ok(GetOrderResponse { order })
}

/// Changes the status of an existing order.
///
/// Any non-empty status is accepted; there is no transition table.
pub async fn change_order_status(
	request: ChangeStatusRequest,
	service: &OrderService,
) -> Result<ChangeStatusResponse, APIError> {
	require("id", &request.id)?;
	require("status", &request.status)?;

	service
		.change_status(&request.id, &request.status)
		.await
		.map_err(to_api_error)?;
	Ok(ChangeStatusResponse::default())
}

#[cfg(test)]
mod tests {
	use super::*;
	use order_storage::{MockOrderRepository, StorageError};
	use std::sync::Arc;

	fn service_with(mock: MockOrderRepository) -> OrderService {
		OrderService::new(Arc::new(mock))
	}

	#[test]
	fn test_error_codes() {
		let not_found = to_api_error(OrderServiceError::OrderNotFound);
		assert_eq!(not_found.status_code(), 404);
		assert_eq!(not_found.to_error_response().error, "ORDER_NOT_FOUND");

		let query = to_api_error(OrderServiceError::QueryRepositoryFailure);
		assert_eq!(query.status_code(), 500);
		assert_eq!(query.to_error_response().error, "QUERY_REPOSITORY_FAILURE");

		let command = to_api_error(OrderServiceError::CommandRepositoryFailure);
		assert_eq!(command.status_code(), 500);
		assert_eq!(
			command.to_error_response().error,
			"COMMAND_REPOSITORY_FAILURE"
		);
	}

	#[tokio::test]
	async fn test_create_rejects_missing_customer() {
		// Validation happens before the repository is touched.
		let service = service_with(MockOrderRepository::new());

		let result = create_order(Order::new("", "r1", vec![]), &service).await;

		let err = result.unwrap_err();
		assert_eq!(err.status_code(), 400);
		assert_eq!(
			err.to_error_response().details,
			Some(serde_json::json!({ "field": "customer_id" }))
		);
	}

	#[tokio::test]
	async fn test_create_rejects_blank_restaurant() {
		let service = service_with(MockOrderRepository::new());

		let result = create_order(Order::new("c1", "  ", vec![]), &service).await;

		assert_eq!(result.unwrap_err().status_code(), 400);
	}

	#[tokio::test]
	async fn test_change_status_rejects_empty_status() {
		let service = service_with(MockOrderRepository::new());
		let request = ChangeStatusRequest {
			id: "order-1".into(),
			status: String::new(),
		};

		let result = change_order_status(request, &service).await;

		assert_eq!(result.unwrap_err().status_code(), 400);
	}

	#[tokio::test]
	async fn test_get_maps_backend_failure_to_500() {
		let mut mock = MockOrderRepository::new();
		mock.expect_get_order_by_id()
			.returning(|_| Err(StorageError::Backend("io".into())));

		let result = get_order_by_id("order-1", &service_with(mock)).await;

		let err = result.unwrap_err();
		assert_eq!(err.status_code(), 500);
		assert_eq!(err.to_error_response().error, "QUERY_REPOSITORY_FAILURE");
	}

	#[tokio::test]
	async fn test_change_status_success() {
		let mut mock = MockOrderRepository::new();
		mock.expect_change_order_status()
			.times(1)
			.returning(|_, _| Ok(()));
		let request = ChangeStatusRequest {
			id: "order-1".into(),
			status: "Delivered".into(),
		};

		let response = change_order_status(request, &service_with(mock))
			.await
			.unwrap();

		assert_eq!(response, ChangeStatusResponse::default());
	}
}
