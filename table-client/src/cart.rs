//! Cart state and persistence
//!
//! The cart maps product ids to quantities. A quantity can be mid-edit:
//! while the guest is typing into the quantity field the raw text is
//! kept as-is (including the empty string) and only resolved to a
//! number when the edit is committed. Resolving to zero or to garbage
//! drops the line.
//!
//! Every mutation is persisted immediately under [`storage::CART_KEY`],
//! and a second cart holding the same store picks the change up through
//! the storage event stream.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use shared::models::Product;
use shared::order::OrderLineItem;

use crate::storage::{self, KvStore, StorageEvent};

/// A cart quantity, either settled or mid-edit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Quantity {
    Count(u32),
    Pending(String),
}

/// Saturate a positive count into the stored range instead of letting
/// a huge value wrap through zero
fn clamp_count(n: i64) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

impl Quantity {
    /// Resolved count; a pending edit counts as whatever it parses to,
    /// or zero
    pub fn count(&self) -> u32 {
        match self {
            Self::Count(n) => *n,
            Self::Pending(raw) => raw.trim().parse().unwrap_or(0),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

/// Cart of the current guest
///
/// Entries keep first-add order: a product added earlier stays above a
/// product added later no matter how often quantities change.
pub struct CartStore {
    entries: Vec<(i64, Quantity)>,
    kv: KvStore,
}

impl CartStore {
    /// Load the cart from storage
    ///
    /// A missing or unreadable cart starts empty. Persisted carts lose
    /// insertion order, so entries come back sorted by product id.
    pub fn load(kv: KvStore) -> Self {
        let entries = Self::read_entries(&kv);
        Self { entries, kv }
    }

    fn read_entries(kv: &KvStore) -> Vec<(i64, Quantity)> {
        let map: BTreeMap<String, Quantity> = match kv.get_json(storage::CART_KEY) {
            Ok(Some(map)) => map,
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                warn!("failed to load cart, starting empty: {e}");
                BTreeMap::new()
            }
        };
        let mut entries: Vec<(i64, Quantity)> = map
            .into_iter()
            .filter_map(|(id, qty)| id.parse().ok().map(|id| (id, qty)))
            .collect();
        entries.sort_by_key(|(id, _)| *id);
        entries
    }

    /// Adjust a product's quantity by a signed delta
    ///
    /// Adjusting an absent product treats it as quantity zero, so a
    /// positive delta adds it. Reaching zero or below removes the line.
    pub fn change_quantity(&mut self, product_id: i64, delta: i64) {
        let current = i64::from(self.quantity(product_id));
        self.set_quantity(product_id, current.saturating_add(delta));
    }

    /// Add one of the given product
    pub fn add_product(&mut self, product_id: i64) {
        self.change_quantity(product_id, 1);
    }

    /// Set a product's quantity outright; zero or negative removes it
    pub fn set_quantity(&mut self, product_id: i64, qty: i64) {
        if qty <= 0 {
            self.entries.retain(|(id, _)| *id != product_id);
        } else {
            self.upsert(product_id, Quantity::Count(clamp_count(qty)));
        }
        self.persist();
    }

    /// Remove a product's line entirely
    pub fn remove_product(&mut self, product_id: i64) {
        self.entries.retain(|(id, _)| *id != product_id);
        self.persist();
    }

    /// Apply a keystroke in a quantity field
    ///
    /// An empty field is kept as a pending edit so the guest can clear
    /// and retype. Non-empty text resolves immediately: zero or
    /// negative removes the line, a valid count settles it, and
    /// anything unparsable stays pending until the edit is committed.
    pub fn begin_edit(&mut self, product_id: i64, raw: &str) {
        if raw.is_empty() {
            self.upsert(product_id, Quantity::Pending(String::new()));
        } else {
            match raw.trim().parse::<i64>() {
                Ok(n) if n <= 0 => {
                    self.entries.retain(|(id, _)| *id != product_id);
                }
                Ok(n) => self.upsert(product_id, Quantity::Count(clamp_count(n))),
                Err(_) => self.upsert(product_id, Quantity::Pending(raw.to_string())),
            }
        }
        self.persist();
    }

    /// Commit a pending edit when the field loses focus
    ///
    /// A pending value that does not resolve to a positive count drops
    /// the line. Settled quantities are untouched.
    pub fn commit_edit(&mut self, product_id: i64) {
        let Some(pos) = self.entries.iter().position(|(id, _)| *id == product_id) else {
            return;
        };
        let resolved = match &self.entries[pos].1 {
            Quantity::Pending(raw) => raw.trim().parse::<i64>().ok(),
            Quantity::Count(_) => return,
        };
        match resolved {
            Some(n) if n > 0 => self.entries[pos].1 = Quantity::Count(clamp_count(n)),
            _ => {
                self.entries.remove(pos);
            }
        }
        self.persist();
    }

    fn upsert(&mut self, product_id: i64, qty: Quantity) {
        match self.entries.iter_mut().find(|(id, _)| *id == product_id) {
            Some(entry) => entry.1 = qty,
            None => self.entries.push((product_id, qty)),
        }
    }

    /// Resolved quantity for one product, zero if absent
    pub fn quantity(&self, product_id: i64) -> u32 {
        self.entries
            .iter()
            .find(|(id, _)| *id == product_id)
            .map(|(_, qty)| qty.count())
            .unwrap_or(0)
    }

    /// Raw quantity entry, used to render a field mid-edit
    pub fn raw_quantity(&self, product_id: i64) -> Option<&Quantity> {
        self.entries.iter().find(|(id, _)| *id == product_id).map(|(_, qty)| qty)
    }

    /// Total item count across all lines (the cart badge)
    pub fn total_item_count(&self) -> u32 {
        self.entries.iter().map(|(_, qty)| qty.count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_item_count() == 0
    }

    /// Denormalize the cart into checkout line items
    ///
    /// Lines with a resolved count of zero are skipped. A product the
    /// catalog no longer knows still produces a line, with a
    /// placeholder name and zero price, so the guest's count is never
    /// silently lost.
    pub fn checkout_lines(&self, catalog: &[Product]) -> Vec<OrderLineItem> {
        self.entries
            .iter()
            .filter(|(_, qty)| qty.count() > 0)
            .map(|(id, qty)| match catalog.iter().find(|p| p.id == *id) {
                Some(product) => OrderLineItem {
                    id: *id,
                    name: product.name.clone(),
                    price: product.price,
                    qty: qty.count(),
                    image: product.image.clone(),
                },
                None => OrderLineItem {
                    id: *id,
                    name: "Item".into(),
                    price: 0,
                    qty: qty.count(),
                    image: None,
                },
            })
            .collect()
    }

    /// Drop every line
    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    /// Re-read the cart from storage, discarding in-memory state
    pub fn sync_from_storage(&mut self) {
        self.entries = Self::read_entries(&self.kv);
    }

    /// React to a storage notification from another cart holder
    pub fn on_storage_event(&mut self, event: &StorageEvent) {
        if event.key == storage::CART_KEY {
            self.sync_from_storage();
        }
    }

    fn persist(&self) {
        let map: BTreeMap<String, &Quantity> =
            self.entries.iter().map(|(id, qty)| (id.to_string(), qty)).collect();
        if let Err(e) = self.kv.put_json(storage::CART_KEY, &map) {
            warn!("failed to persist cart: {e}");
        }
    }
}
