//! Order types for the order service.
//!
//! This module defines the order record and its line items as they are
//! persisted by the repository and exchanged with transports.

use serde::{Deserialize, Serialize};

/// Status assigned to every order at creation time.
///
/// This is the only status the service itself ever writes. Later values are
/// supplied by callers and are not checked against a fixed vocabulary.
pub const ORDER_STATUS_PENDING: &str = "Pending";

/// Represents a customer purchase from a restaurant.
///
/// Callers construct an order with `customer_id`, `restaurant_id` and
/// `order_items`. The service fills in `id`, `status` and `created_on`
/// when the order is created, overwriting anything the caller supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
	/// Unique identifier, empty until assigned at creation.
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub id: String,
	/// Identifier of the purchasing customer.
	pub customer_id: String,
	/// Current status of the order.
	#[serde(default)]
	pub status: String,
	/// Unix timestamp (seconds) when the order was created, zero until assigned.
	#[serde(default, skip_serializing_if = "is_zero")]
	pub created_on: i64,
	/// Identifier of the fulfilling restaurant.
	pub restaurant_id: String,
	/// Line items in display order.
	#[serde(default)]
	pub order_items: Vec<OrderItem>,
}

/// A line item within an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
	/// Identifier of the purchased product.
	pub product_code: String,
	/// Display name of the product.
	pub name: String,
	/// Price per unit.
	pub unit_price: f32,
	/// Number of units ordered.
	pub quantity: i32,
}

fn is_zero(value: &i64) -> bool {
	*value == 0
}

impl Order {
	/// Creates a new order for a customer and restaurant.
	///
	/// The id, status and creation time are left empty; they are assigned by
	/// the service when the order is created.
	pub fn new(
		customer_id: impl Into<String>,
		restaurant_id: impl Into<String>,
		order_items: Vec<OrderItem>,
	) -> Self {
		Self {
			id: String::new(),
			customer_id: customer_id.into(),
			status: String::new(),
			created_on: 0,
			restaurant_id: restaurant_id.into(),
			order_items,
		}
	}

	/// Sum of all line item subtotals.
	pub fn total(&self) -> f64 {
		self.order_items.iter().map(OrderItem::subtotal).sum()
	}
}

impl OrderItem {
	pub fn new(
		product_code: impl Into<String>,
		name: impl Into<String>,
		unit_price: f32,
		quantity: i32,
	) -> Self {
		Self {
			product_code: product_code.into(),
			name: name.into(),
			unit_price,
			quantity,
		}
	}

	/// Unit price multiplied by quantity.
	pub fn subtotal(&self) -> f64 {
		f64::from(self.unit_price) * f64::from(self.quantity)
	}
}
