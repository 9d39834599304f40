//! Shared types for order state handoff

use serde::{Deserialize, Serialize};

// ============================================================================
// Order Type
// ============================================================================

/// Fulfillment type chosen at checkout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Eat at the table
    #[default]
    DineIn,
    /// Packed to go
    Takeaway,
    /// Delivered to a location on the premises
    Delivery,
}

// ============================================================================
// Line Items
// ============================================================================

/// Order line item - a denormalized product snapshot
///
/// Copies the product fields at the moment the cart was serialized so a
/// receipt stays stable even if the catalog later changes. `qty` is
/// always at least 1; zero-quantity items are never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLineItem {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub qty: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl OrderLineItem {
    /// Line total in the smallest currency unit
    pub fn line_total(&self) -> i64 {
        self.price * i64::from(self.qty)
    }
}

/// Subtotal over a sequence of line items
pub fn compute_subtotal(items: &[OrderLineItem]) -> i64 {
    items.iter().map(OrderLineItem::line_total).sum()
}

// ============================================================================
// Handoff Wire Shape
// ============================================================================

/// Order state as it crosses page boundaries
///
/// This is the wire shape of the `state` query parameter consumed
/// identically by the checkout, payment, and receipt/tracking stages.
/// Every field except `items` is optional; a missing `subtotal` is
/// recomputed from the items on decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OrderState {
    #[serde(default)]
    pub items: Vec<OrderLineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "orderType")]
    pub order_type: Option<OrderType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "queueNumber")]
    pub queue_number: Option<u32>,
}

impl OrderState {
    /// Subtotal, preferring the carried value and falling back to the
    /// recomputed one
    pub fn effective_subtotal(&self) -> i64 {
        self.subtotal.unwrap_or_else(|| compute_subtotal(&self.items))
    }
}
