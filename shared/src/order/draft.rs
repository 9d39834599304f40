//! Checkout draft and the submitted order record

use serde::{Deserialize, Serialize};

use crate::util;

use super::types::{compute_subtotal, OrderLineItem, OrderState, OrderType};

/// Mutable order being assembled at checkout
///
/// Unlike [`OrderState`], every field here is concrete. The subtotal is
/// recalculated after each mutation so it can never drift from the
/// items.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderDraft {
    pub items: Vec<OrderLineItem>,
    pub subtotal: i64,
    pub order_type: OrderType,
    pub location: String,
    pub notes: String,
}

impl OrderDraft {
    /// Build a draft from incoming handoff state
    ///
    /// The carried subtotal is discarded and recomputed; stale values
    /// from an edited URL must not survive into checkout.
    pub fn from_state(state: OrderState) -> Self {
        let subtotal = compute_subtotal(&state.items);
        Self {
            items: state.items,
            subtotal,
            order_type: state.order_type.unwrap_or_default(),
            location: state.location.unwrap_or_default(),
            notes: state.notes.unwrap_or_default(),
        }
    }

    /// Recompute the subtotal from the current items
    pub fn recalculate(&mut self) {
        self.subtotal = compute_subtotal(&self.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Snapshot the draft back into the handoff shape
    pub fn to_state(&self) -> OrderState {
        OrderState {
            items: self.items.clone(),
            subtotal: Some(self.subtotal),
            order_type: Some(self.order_type),
            location: (!self.location.is_empty()).then(|| self.location.clone()),
            notes: (!self.notes.is_empty()).then(|| self.notes.clone()),
            queue_number: None,
        }
    }
}

/// Submitted order as persisted for the tracking stage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistedOrder {
    #[serde(rename = "orderId")]
    pub order_id: String,
    pub items: Vec<OrderLineItem>,
    pub subtotal: i64,
    #[serde(rename = "orderType")]
    pub order_type: OrderType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "submittedAt")]
    pub submitted_at: i64,
}

impl PersistedOrder {
    /// Seal a draft into an order record with a fresh id
    pub fn from_draft(draft: &OrderDraft) -> Self {
        Self {
            order_id: util::order_id(),
            items: draft.items.clone(),
            subtotal: draft.subtotal,
            order_type: draft.order_type,
            location: (!draft.location.is_empty()).then(|| draft.location.clone()),
            notes: (!draft.notes.is_empty()).then(|| draft.notes.clone()),
            submitted_at: util::now_millis(),
        }
    }

    /// Project the record back into the handoff shape for the next stage
    pub fn to_state(&self) -> OrderState {
        OrderState {
            items: self.items.clone(),
            subtotal: Some(self.subtotal),
            order_type: Some(self.order_type),
            location: self.location.clone(),
            notes: self.notes.clone(),
            queue_number: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: i64, price: i64, qty: u32) -> OrderLineItem {
        OrderLineItem { id, name: format!("Item {id}"), price, qty, image: None }
    }

    #[test]
    fn from_state_ignores_carried_subtotal() {
        let state = OrderState {
            items: vec![line(1, 3000, 2)],
            subtotal: Some(999),
            ..OrderState::default()
        };
        let draft = OrderDraft::from_state(state);
        assert_eq!(draft.subtotal, 6000);
        assert_eq!(draft.order_type, OrderType::DineIn);
    }

    #[test]
    fn to_state_omits_blank_location_and_notes() {
        let draft = OrderDraft { items: vec![line(1, 3000, 1)], subtotal: 3000, ..Default::default() };
        let state = draft.to_state();
        assert_eq!(state.location, None);
        assert_eq!(state.notes, None);
        assert_eq!(state.subtotal, Some(3000));
    }

    #[test]
    fn sealed_order_has_prefixed_id() {
        let mut draft = OrderDraft::default();
        draft.items.push(line(4, 13000, 1));
        draft.recalculate();
        let order = PersistedOrder::from_draft(&draft);
        assert!(order.order_id.starts_with("MP"));
        assert_eq!(order.subtotal, 13000);
        assert_eq!(order.to_state().items, draft.items);
    }
}
