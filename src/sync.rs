//! Cart-to-UI synchronization.
//!
//! Whenever the cart slot changes, every cart-dependent fragment is
//! recomputed from the store snapshot: the counter badge, the line-item list
//! and the subtotal/tax/total display. The same pass serves this tab (after a
//! local mutation) and other tabs (after a storage event).

use tracing::debug;

use crate::domain::cart::{CartLineItem, CartStore, CART_SLOT};
use crate::domain::value_objects::Money;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CartTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl CartTotals {
    pub fn from_subtotal(subtotal: Money) -> Self {
        let tax = subtotal.tax();
        Self {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

/// Rendering contract for cart-dependent fragments. Implementors own named
/// slots on their page; the engine never reaches into markup.
pub trait CartPanel {
    /// Counter badge: sum of quantities, hidden at zero.
    fn set_counter(&mut self, count: u32, visible: bool);
    fn set_lines(&mut self, lines: &[CartLineItem]);
    fn set_totals(&mut self, totals: CartTotals);
}

pub struct CartSynchronizer {
    store: CartStore,
    panels: Vec<Box<dyn CartPanel>>,
}

impl CartSynchronizer {
    pub fn new(store: CartStore) -> Self {
        Self {
            store,
            panels: Vec::new(),
        }
    }

    pub fn attach(&mut self, panel: Box<dyn CartPanel>) {
        self.panels.push(panel);
    }

    pub fn store(&self) -> &CartStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut CartStore {
        &mut self.store
    }

    /// Recomputes every fragment from the current snapshot and pushes it to
    /// all panels. Idempotent: the same snapshot renders the same output.
    pub fn refresh(&mut self) {
        let lines = self.store.items();
        let count: u32 = lines.iter().map(|l| l.quantity).sum();
        let totals =
            CartTotals::from_subtotal(lines.iter().map(CartLineItem::line_total).sum());
        for panel in &mut self.panels {
            panel.set_counter(count, count > 0);
            panel.set_lines(&lines);
            panel.set_totals(totals);
        }
    }

    /// Drains cross-tab storage events and refreshes if any touched the cart
    /// slot.
    pub fn pump(&mut self) {
        if self
            .store
            .slot_events()
            .iter()
            .any(|e| e.key == CART_SLOT)
        {
            debug!("cart slot changed in another tab");
            self.refresh();
        }
    }
}
