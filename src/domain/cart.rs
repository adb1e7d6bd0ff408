//! Persisted cart store.
//!
//! The canonical durable representation is a JSON array of line items under
//! the `"ecommerce-cart-data"` slot. Every mutation re-reads the slot fresh,
//! applies the change and re-serializes the full snapshot, so concurrent tabs
//! converge on a read-modify-write of the same key. A `"cart"` slot left by
//! older pages is migrated once on construction.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::events::CartEvent;
use crate::domain::value_objects::Money;
use crate::storage::{StorageEvent, TabHandle};
use crate::{Result, StorefrontError};

/// Canonical durable slot for the cart snapshot.
pub const CART_SLOT: &str = "ecommerce-cart-data";
const LEGACY_CART_SLOT: &str = "cart";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub quantity: u32,
    /// Thumbnail URL, or an emoji glyph standing in for one.
    pub image: String,
}

impl CartLineItem {
    pub fn line_total(&self) -> Money {
        self.price.times(self.quantity)
    }
}

/// Owner of the canonical cart snapshot. All mutations funnel through here.
pub struct CartStore {
    slot: TabHandle,
    events: Vec<CartEvent>,
}

impl CartStore {
    pub fn new(slot: TabHandle) -> Self {
        if let Some(legacy) = slot.get(LEGACY_CART_SLOT) {
            if slot.get(CART_SLOT).is_none() {
                debug!("migrating legacy cart slot");
                slot.set(CART_SLOT, &legacy);
            }
            slot.remove(LEGACY_CART_SLOT);
        }
        Self {
            slot,
            events: Vec::new(),
        }
    }

    /// Current snapshot, parsed fresh from the slot. A missing or malformed
    /// slot reads as an empty cart; the cart must never break a page load.
    pub fn items(&self) -> Vec<CartLineItem> {
        let Some(raw) = self.slot.get(CART_SLOT) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(err) => {
                warn!(%err, "malformed cart slot, treating as empty");
                Vec::new()
            }
        }
    }

    /// Adds a line item. A second add of the same id increments the existing
    /// quantity instead of duplicating the entry.
    pub fn add(&mut self, item: CartLineItem) -> Vec<CartLineItem> {
        let mut items = self.items();
        let id = item.id.clone();
        let quantity = item.quantity;
        if let Some(existing) = items.iter_mut().find(|i| i.id == item.id) {
            existing.quantity += item.quantity;
        } else {
            items.push(item);
        }
        self.write(&items);
        self.events.push(CartEvent::Added { id, quantity });
        items
    }

    /// Removes the line item with `id`. A miss is a silent no-op.
    pub fn remove(&mut self, id: &str) -> Vec<CartLineItem> {
        let mut items = self.items();
        let before = items.len();
        items.retain(|i| i.id != id);
        if items.len() != before {
            self.write(&items);
            self.events.push(CartEvent::Removed { id: id.to_string() });
        }
        items
    }

    /// Overwrites the quantity of an existing line item. Quantities below 1
    /// are rejected; removal is an explicit operation, not quantity zero.
    pub fn set_quantity(&mut self, id: &str, quantity: u32) -> Result<Vec<CartLineItem>> {
        if quantity < 1 {
            return Err(StorefrontError::InvalidQuantity(quantity));
        }
        let mut items = self.items();
        let item = items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| StorefrontError::ItemNotFound(id.to_string()))?;
        item.quantity = quantity;
        self.write(&items);
        self.events.push(CartEvent::QuantityChanged {
            id: id.to_string(),
            quantity,
        });
        Ok(items)
    }

    pub fn clear(&mut self) {
        self.slot.remove(CART_SLOT);
        self.events.push(CartEvent::Cleared);
    }

    pub fn total(&self) -> Money {
        self.items().iter().map(CartLineItem::line_total).sum()
    }

    /// Sum of quantities, the counter-badge number.
    pub fn item_count(&self) -> u32 {
        self.items().iter().map(|i| i.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn take_events(&mut self) -> Vec<CartEvent> {
        std::mem::take(&mut self.events)
    }

    /// Storage changes other tabs have made since the last call.
    pub fn slot_events(&self) -> Vec<StorageEvent> {
        self.slot.drain_events()
    }

    fn write(&self, items: &[CartLineItem]) {
        match serde_json::to_string(items) {
            Ok(json) => self.slot.set(CART_SLOT, &json),
            Err(err) => warn!(%err, "cart snapshot failed to serialize"),
        }
    }
}
