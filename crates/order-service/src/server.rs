//! HTTP server for the order API.
//!
//! Exposes the order service under `/api` plus a `/health` probe, with CORS,
//! request size limits, request timeouts and request tracing applied to every
//! route.

use axum::{
	extract::{DefaultBodyLimit, Path, State},
	http::{HeaderName, HeaderValue, Method, StatusCode},
	response::Json,
	routing::{get, post},
	Router,
};
use order_config::{ApiConfig, CorsConfig};
use order_core::OrderService;
use order_types::{
	APIError, ChangeStatusRequest, ChangeStatusResponse, CreateOrderResponse, GetOrderResponse,
	Order,
};
use serde_json::Value;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
	cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer},
	timeout::TimeoutLayer,
	trace::TraceLayer,
};

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// The order service handling every request.
	pub service: OrderService,
}

/// Builds the router with all routes and middleware.
pub fn router(api_config: &ApiConfig, service: OrderService) -> Router {
	let app_state = AppState { service };

	Router::new()
		.nest(
			"/api",
			Router::new()
				.route("/orders", post(handle_create_order))
				.route("/orders/status", post(handle_change_status))
				.route("/orders/{id}", get(handle_get_order_by_id)),
		)
		.route("/health", get(handle_health))
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(cors_layer(api_config.cors.as_ref()))
				.layer(TimeoutLayer::new(Duration::from_secs(
					api_config.timeout_seconds,
				))),
		)
		.layer(DefaultBodyLimit::max(api_config.max_request_size))
		.with_state(app_state)
}

/// Starts the HTTP server and serves until Ctrl+C is received.
pub async fn start_server(
	api_config: ApiConfig,
	service: OrderService,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = router(&api_config, service);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Order API server starting on {}", bind_address);

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	Ok(())
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		tracing::error!("Failed to listen for shutdown signal: {}", e);
		return;
	}
	tracing::info!("Shutdown signal received");
}

/// Builds the CORS layer, permissive when no configuration is given.
///
/// A `"*"` entry allows any value for that list. Entries that are not valid
/// header values, methods or header names are skipped with a warning.
fn cors_layer(cors: Option<&CorsConfig>) -> CorsLayer {
	let Some(cors) = cors else {
		return CorsLayer::permissive();
	};

	let origins = if cors.allowed_origins.iter().any(|o| o == "*") {
		AllowOrigin::from(Any)
	} else {
		AllowOrigin::list(parse_entries(&cors.allowed_origins, "origin", |o| {
			HeaderValue::from_str(o).ok()
		}))
	};

	let methods = if cors.allowed_methods.iter().any(|m| m == "*") {
		AllowMethods::from(Any)
	} else {
		AllowMethods::list(parse_entries(&cors.allowed_methods, "method", |m| {
			Method::from_bytes(m.to_uppercase().as_bytes()).ok()
		}))
	};

	let headers = if cors.allowed_headers.iter().any(|h| h == "*") {
		AllowHeaders::from(Any)
	} else {
		AllowHeaders::list(parse_entries(&cors.allowed_headers, "header", |h| {
			HeaderName::from_bytes(h.as_bytes()).ok()
		}))
	};

	CorsLayer::new()
		.allow_origin(origins)
		.allow_methods(methods)
		.allow_headers(headers)
}

fn parse_entries<T>(entries: &[String], kind: &str, parse: impl Fn(&str) -> Option<T>) -> Vec<T> {
	entries
		.iter()
		.filter_map(|entry| {
			let parsed = parse(entry);
			if parsed.is_none() {
				tracing::warn!(kind = %kind, entry = %entry, "Ignoring invalid CORS entry");
			}
			parsed
		})
		.collect()
}

/// Handles POST /api/orders requests.
async fn handle_create_order(
	State(state): State<AppState>,
	Json(order): Json<Order>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), APIError> {
	match crate::apis::order::create_order(order, &state.service).await {
		Ok(response) => Ok((StatusCode::CREATED, Json(response))),
		Err(e) => {
			tracing::warn!("Order creation failed: {}", e);
			Err(e)
		},
	}
}

/// Handles GET /api/orders/{id} requests.
async fn handle_get_order_by_id(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<GetOrderResponse>, APIError> {
	match crate::apis::order::get_order_by_id(&id, &state.service).await {
		Ok(response) => Ok(Json(response)),
		Err(e) => {
			tracing::warn!("Order retrieval failed: {}", e);
			Err(e)
		},
	}
}

/// Handles POST /api/orders/status requests.
async fn handle_change_status(
	State(state): State<AppState>,
	Json(request): Json<ChangeStatusRequest>,
) -> Result<Json<ChangeStatusResponse>, APIError> {
	match crate::apis::order::change_order_status(request, &state.service).await {
		Ok(response) => Ok(Json(response)),
		Err(e) => {
			tracing::warn!("Order status change failed: {}", e);
			Err(e)
		},
	}
}

async fn handle_health() -> Json<Value> {
	Json(serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::body::{to_bytes, Body};
	use axum::http::Request;
	use order_storage::implementations::memory::MemoryStorage;
	use order_storage::{
		MockOrderRepository, StorageError, StorageOrderRepository, StorageService,
	};
	use std::sync::Arc;
	use tower::ServiceExt;

	fn memory_service() -> OrderService {
		let storage = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));
		OrderService::new(Arc::new(StorageOrderRepository::new(storage)))
	}

	fn app(service: OrderService) -> Router {
		router(&ApiConfig::default(), service)
	}

	fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
		Request::builder()
			.method(method)
			.uri(uri)
			.header("content-type", "application/json")
			.body(Body::from(body.to_string()))
			.unwrap()
	}

	fn get_request(uri: &str) -> Request<Body> {
		Request::builder().uri(uri).body(Body::empty()).unwrap()
	}

	async fn body_json(response: axum::response::Response) -> Value {
		let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
		serde_json::from_slice(&bytes).unwrap()
	}

	fn burger_order() -> Value {
		serde_json::json!({
			"customer_id": "c1",
			"restaurant_id": "r1",
			"order_items": [
				{ "product_code": "p1", "name": "Burger", "unit_price": 5.5, "quantity": 2 }
			]
		})
	}

	#[tokio::test]
	async fn test_health() {
		let response = app(memory_service())
			.oneshot(get_request("/health"))
			.await
			.unwrap();

		assert_eq!(response.status(), StatusCode::OK);
		assert_eq!(body_json(response).await, serde_json::json!({ "status": "ok" }));
	}

	#[tokio::test]
	async fn test_order_lifecycle_over_http() {
		let app = app(memory_service());

		let response = app
			.clone()
			.oneshot(json_request("POST", "/api/orders", burger_order()))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::CREATED);
		let id = body_json(response).await["id"]
			.as_str()
			.unwrap()
			.to_string();

		let response = app
			.clone()
			.oneshot(get_request(&format!("/api/orders/{}", id)))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::OK);
		let body = body_json(response).await;
		assert_eq!(body["order"]["id"], id.as_str());
		assert_eq!(body["order"]["status"], "Pending");
		assert_eq!(body["order"]["order_items"][0]["name"], "Burger");
		assert!(body["order"]["created_on"].as_i64().unwrap() > 0);

		let response = app
			.clone()
			.oneshot(json_request(
				"POST",
				"/api/orders/status",
				serde_json::json!({ "id": id, "status": "Delivered" }),
			))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::OK);
		assert_eq!(body_json(response).await, serde_json::json!({}));

		let response = app
			.oneshot(get_request(&format!("/api/orders/{}", id)))
			.await
			.unwrap();
		assert_eq!(body_json(response).await["order"]["status"], "Delivered");
	}

	#[tokio::test]
	async fn test_get_unknown_order_is_404() {
		let response = app(memory_service())
			.oneshot(get_request("/api/orders/missing-id"))
			.await
			.unwrap();

		assert_eq!(response.status(), StatusCode::NOT_FOUND);
		let body = body_json(response).await;
		assert_eq!(body["error"], "ORDER_NOT_FOUND");
		assert_eq!(body["details"], Value::Null);
	}

	#[tokio::test]
	async fn test_create_without_customer_is_400() {
		let response = app(memory_service())
			.oneshot(json_request(
				"POST",
				"/api/orders",
				serde_json::json!({ "customer_id": "", "restaurant_id": "r1" }),
			))
			.await
			.unwrap();

		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
		assert_eq!(body_json(response).await["error"], "INVALID_REQUEST");
	}

	#[tokio::test]
	async fn test_malformed_json_is_rejected() {
		let request = Request::builder()
			.method("POST")
			.uri("/api/orders")
			.header("content-type", "application/json")
			.body(Body::from("{not json"))
			.unwrap();

		let response = app(memory_service()).oneshot(request).await.unwrap();

		assert!(response.status().is_client_error());
	}

	#[tokio::test]
	async fn test_repository_failure_is_500() {
		let mut mock = MockOrderRepository::new();
		mock.expect_create_order()
			.returning(|_| Err(StorageError::Backend("disk full".into())));

		let response = app(OrderService::new(Arc::new(mock)))
			.oneshot(json_request("POST", "/api/orders", burger_order()))
			.await
			.unwrap();

		assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
		let body = body_json(response).await;
		assert_eq!(body["error"], "COMMAND_REPOSITORY_FAILURE");
		assert!(!body["message"].as_str().unwrap().contains("disk full"));
	}

	#[tokio::test]
	async fn test_oversized_body_is_rejected() {
		let config = ApiConfig {
			max_request_size: 16,
			..ApiConfig::default()
		};

		let response = router(&config, memory_service())
			.oneshot(json_request("POST", "/api/orders", burger_order()))
			.await
			.unwrap();

		assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
	}

	fn preflight(origin: &str) -> Request<Body> {
		Request::builder()
			.method("OPTIONS")
			.uri("/api/orders")
			.header("origin", origin)
			.header("access-control-request-method", "POST")
			.body(Body::empty())
			.unwrap()
	}

	#[tokio::test]
	async fn test_configured_cors_allows_only_listed_origins() {
		let config = ApiConfig {
			cors: Some(CorsConfig {
				// Invalid entries are skipped rather than failing startup.
				allowed_origins: vec!["http://localhost:8080".into(), "bad\norigin".into()],
				allowed_headers: vec!["*".into()],
				allowed_methods: vec!["get".into(), "POST".into()],
			}),
			..ApiConfig::default()
		};
		let app = router(&config, memory_service());

		let response = app
			.clone()
			.oneshot(preflight("http://localhost:8080"))
			.await
			.unwrap();
		assert_eq!(
			response.headers().get("access-control-allow-origin").unwrap(),
			"http://localhost:8080"
		);
		let methods = response
			.headers()
			.get("access-control-allow-methods")
			.unwrap()
			.to_str()
			.unwrap();
		assert!(methods.contains("GET") && methods.contains("POST"));

		let response = app.oneshot(preflight("http://evil.example")).await.unwrap();
		assert!(response
			.headers()
			.get("access-control-allow-origin")
			.is_none());
	}

	#[tokio::test]
	async fn test_default_cors_is_permissive() {
		let response = app(memory_service())
			.oneshot(preflight("http://anywhere.example"))
			.await
			.unwrap();

		assert_eq!(
			response.headers().get("access-control-allow-origin").unwrap(),
			"*"
		);
	}
}
