//! Checkout session
//!
//! Owns the order draft between the cart and the submitted order. The
//! session is opened with the state token handed over from the cart,
//! lets the guest adjust lines, pick a fulfillment type, fill in a
//! delivery location and notes, and finally seals the draft into a
//! [`PersistedOrder`].
//!
//! Location and notes are also persisted on their own keys so they
//! survive the guest navigating back to the menu and returning with a
//! fresh token.

use tracing::{info, warn};

use shared::error::{OrderError, OrderResult};
use shared::models::Product;
use shared::order::{OrderDraft, OrderType, PersistedOrder};

use crate::codec::{decode_state, encode_state};
use crate::services::catalog::CatalogClient;
use crate::storage::{self, KvStore};

/// Result of a successful submit: the sealed order plus the token that
/// carries it into the tracking stage
#[derive(Debug, Clone)]
pub struct Submission {
    pub order: PersistedOrder,
    pub token: String,
}

/// One guest's trip through the checkout page
pub struct CheckoutSession {
    draft: OrderDraft,
    /// Notes text while the notes dialog is open; committed on save
    notes_draft: Option<String>,
    /// Set when a submit was rejected for a missing delivery location
    focus_location: bool,
    kv: KvStore,
}

impl CheckoutSession {
    /// Open a session from an incoming state token
    ///
    /// When the token carries no location or notes, previously saved
    /// values are restored from storage, so leaving checkout and
    /// coming back does not lose them.
    pub fn open(kv: KvStore, token: Option<&str>) -> Self {
        let state = decode_state(token);
        let had_location = state.location.is_some();
        let had_notes = state.notes.is_some();
        let mut draft = OrderDraft::from_state(state);

        if !had_location {
            match kv.get_json::<String>(storage::LOCATION_KEY) {
                Ok(Some(saved)) => draft.location = saved,
                Ok(None) => {}
                Err(e) => warn!("failed to restore saved location: {e}"),
            }
        }
        if !had_notes {
            match kv.get_json::<String>(storage::NOTES_KEY) {
                Ok(Some(saved)) => draft.notes = saved,
                Ok(None) => {}
                Err(e) => warn!("failed to restore saved notes: {e}"),
            }
        }

        Self { draft, notes_draft: None, focus_location: false, kv }
    }

    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    /// Token for navigating back to the menu without losing edits
    pub fn state_token(&self) -> String {
        encode_state(&self.draft.to_state())
    }

    // ========================================================================
    // Line edits
    // ========================================================================

    /// Adjust the line at `index` by a signed delta; reaching zero
    /// removes the line. Out-of-range indices are ignored.
    pub fn change_qty(&mut self, index: usize, delta: i64) {
        let Some(item) = self.draft.items.get_mut(index) else {
            return;
        };
        let next = i64::from(item.qty).saturating_add(delta);
        if next <= 0 {
            self.draft.items.remove(index);
        } else {
            item.qty = u32::try_from(next).unwrap_or(u32::MAX);
        }
        self.draft.recalculate();
    }

    /// Remove the line at `index` outright
    pub fn remove_item(&mut self, index: usize) {
        if index < self.draft.items.len() {
            self.draft.items.remove(index);
            self.draft.recalculate();
        }
    }

    /// Add a suggested product
    ///
    /// A product already in the order gets its quantity bumped in
    /// place instead of a duplicate line.
    pub fn add_addon(&mut self, product: &Product) {
        match self.draft.items.iter_mut().find(|item| item.id == product.id) {
            Some(item) => item.qty += 1,
            None => self.draft.items.push(product.to_line_item(1)),
        }
        self.draft.recalculate();
    }

    /// Add a suggestion by product id through the catalog
    ///
    /// An id the catalog does not know is ignored; the suggestion
    /// strip only shows known products anyway.
    pub fn add_addon_by_id(&mut self, product_id: i64, catalog: &CatalogClient) {
        if let Some(product) = catalog.product(product_id) {
            self.add_addon(&product);
        }
    }

    // ========================================================================
    // Fulfillment
    // ========================================================================

    /// Switch the fulfillment type
    ///
    /// The location is kept even when leaving delivery, so toggling
    /// back does not force retyping it.
    pub fn set_order_type(&mut self, order_type: OrderType) {
        self.draft.order_type = order_type;
    }

    /// Update the delivery location and persist it
    pub fn set_location(&mut self, location: impl Into<String>) {
        self.draft.location = location.into();
        if let Err(e) = self.kv.put_json(storage::LOCATION_KEY, &self.draft.location) {
            warn!("failed to persist location: {e}");
        }
    }

    pub fn clear_location(&mut self) {
        self.draft.location.clear();
        if let Err(e) = self.kv.remove(storage::LOCATION_KEY) {
            warn!("failed to clear saved location: {e}");
        }
    }

    /// Whether the UI should move focus to the location field, set by a
    /// submit rejected for a missing location. Reading it resets it.
    pub fn take_focus_location(&mut self) -> bool {
        std::mem::take(&mut self.focus_location)
    }

    // ========================================================================
    // Notes dialog
    // ========================================================================

    /// Open the notes dialog, seeded with the current notes
    pub fn open_notes(&mut self) {
        self.notes_draft = Some(self.draft.notes.clone());
    }

    /// Replace the dialog text while it is open
    pub fn edit_notes_draft(&mut self, text: impl Into<String>) {
        if self.notes_draft.is_some() {
            self.notes_draft = Some(text.into());
        }
    }

    pub fn notes_draft(&self) -> Option<&str> {
        self.notes_draft.as_deref()
    }

    /// Commit the dialog text into the order and persist it
    pub fn save_notes(&mut self) {
        if let Some(text) = self.notes_draft.take() {
            self.draft.notes = text;
            if let Err(e) = self.kv.put_json(storage::NOTES_KEY, &self.draft.notes) {
                warn!("failed to persist notes: {e}");
            }
        }
    }

    /// Close the dialog without touching the order
    pub fn discard_notes(&mut self) {
        self.notes_draft = None;
    }

    /// Remove the notes from the order and from storage
    pub fn clear_notes(&mut self) {
        self.draft.notes.clear();
        self.notes_draft = None;
        if let Err(e) = self.kv.remove(storage::NOTES_KEY) {
            warn!("failed to clear saved notes: {e}");
        }
    }

    // ========================================================================
    // Submit
    // ========================================================================

    /// Validate and seal the draft into an order
    ///
    /// An empty order is rejected. A delivery order with a blank
    /// location is rejected and flags the location field for focus.
    /// On success the order record replaces the cart in storage and
    /// the returned token carries the state to the tracking stage.
    pub fn submit(&mut self) -> OrderResult<Submission> {
        if self.draft.is_empty() {
            return Err(OrderError::EmptyOrder);
        }
        if self.draft.order_type == OrderType::Delivery && self.draft.location.trim().is_empty() {
            self.focus_location = true;
            return Err(OrderError::MissingLocation);
        }

        let order = PersistedOrder::from_draft(&self.draft);
        info!(order_id = %order.order_id, subtotal = order.subtotal, "order submitted");

        if let Err(e) = self.kv.put_json(storage::ORDER_STATE_KEY, &order) {
            warn!("failed to persist submitted order: {e}");
        }
        if let Err(e) = self.kv.remove(storage::CART_KEY) {
            warn!("failed to clear cart after submit: {e}");
        }

        let token = encode_state(&order.to_state());
        Ok(Submission { order, token })
    }
}
