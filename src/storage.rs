//! Durable per-origin key-value storage with cross-tab change events.
//!
//! Models the browser storage the storefront pages persist the cart in: one
//! slot table shared by every open tab of an origin, plus a change
//! notification delivered to every tab *except* the one that wrote (the
//! browser's storage event never fires in the mutating tab). Last write to a
//! slot wins; there is no locking across tabs.

use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::trace;

/// Change to a single slot, as observed from another tab.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

struct Shared {
    slots: HashMap<String, String>,
    tabs: Vec<(usize, Sender<StorageEvent>)>,
    next_tab: usize,
}

impl Shared {
    fn broadcast(&mut self, source: usize, event: StorageEvent) {
        // Drop senders whose tab has gone away.
        self.tabs
            .retain(|(id, tx)| *id == source || tx.send(event.clone()).is_ok());
    }
}

/// Per-origin storage shared by every open tab.
#[derive(Clone)]
pub struct OriginStorage {
    shared: Arc<Mutex<Shared>>,
}

impl OriginStorage {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                slots: HashMap::new(),
                tabs: Vec::new(),
                next_tab: 0,
            })),
        }
    }

    /// Opens a tab-scoped view of this origin's storage.
    pub fn open_tab(&self) -> TabHandle {
        let (tx, rx) = channel();
        let mut shared = lock(&self.shared);
        let id = shared.next_tab;
        shared.next_tab += 1;
        shared.tabs.push((id, tx));
        TabHandle {
            shared: Arc::clone(&self.shared),
            id,
            events: rx,
        }
    }
}

impl Default for OriginStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// One tab's handle on the origin storage.
pub struct TabHandle {
    shared: Arc<Mutex<Shared>>,
    id: usize,
    events: Receiver<StorageEvent>,
}

impl TabHandle {
    pub fn get(&self, key: &str) -> Option<String> {
        lock(&self.shared).slots.get(key).cloned()
    }

    pub fn set(&self, key: &str, value: &str) {
        let mut shared = lock(&self.shared);
        let old_value = shared.slots.insert(key.to_string(), value.to_string());
        trace!(key, tab = self.id, "slot written");
        shared.broadcast(
            self.id,
            StorageEvent {
                key: key.to_string(),
                old_value,
                new_value: Some(value.to_string()),
            },
        );
    }

    pub fn remove(&self, key: &str) {
        let mut shared = lock(&self.shared);
        let Some(old_value) = shared.slots.remove(key) else {
            return;
        };
        trace!(key, tab = self.id, "slot removed");
        shared.broadcast(
            self.id,
            StorageEvent {
                key: key.to_string(),
                old_value: Some(old_value),
                new_value: None,
            },
        );
    }

    /// Drains the change events other tabs have produced since the last call.
    pub fn drain_events(&self) -> Vec<StorageEvent> {
        self.events.try_iter().collect()
    }
}

fn lock(shared: &Mutex<Shared>) -> std::sync::MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}
