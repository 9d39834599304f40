//! Order state types
//!
//! - **types**: order type, line items, the handoff wire shape
//! - **draft**: the editable checkout draft and the immutable
//!   submitted order

pub mod draft;
pub mod types;

pub use draft::{OrderDraft, PersistedOrder};
pub use types::{compute_subtotal, OrderLineItem, OrderState, OrderType};
