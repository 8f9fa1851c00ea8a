//! Observable application state.
//!
//! Both collections are immutable shared slices. Every mutation swaps in a
//! whole new slice and then fires the change callback exactly once, after the
//! lock is released, so the callback can read the container freely.

use std::sync::Arc;

use parking_lot::Mutex;
use shared::domain::{CartItem, InventoryItem};

pub type ChangeCallback = Arc<dyn Fn(&Snapshot) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub inventory: Arc<[InventoryItem]>,
    pub cart: Arc<[CartItem]>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            inventory: Arc::from(Vec::new()),
            cart: Arc::from(Vec::new()),
        }
    }
}

#[derive(Default)]
struct Inner {
    snapshot: Snapshot,
    on_change: Option<ChangeCallback>,
}

#[derive(Default)]
pub struct StateContainer {
    inner: Mutex<Inner>,
}

impl StateContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.inner.lock().snapshot.clone()
    }

    pub fn inventory(&self) -> Arc<[InventoryItem]> {
        Arc::clone(&self.inner.lock().snapshot.inventory)
    }

    pub fn cart(&self) -> Arc<[CartItem]> {
        Arc::clone(&self.inner.lock().snapshot.cart)
    }

    /// Single slot: registering a callback drops the previous one.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        self.inner.lock().on_change = Some(Arc::new(callback));
    }

    pub fn set_inventory(&self, next: impl Into<Arc<[InventoryItem]>>) {
        let next = next.into();
        self.mutate(|current| {
            Some(Snapshot {
                inventory: next,
                cart: Arc::clone(&current.cart),
            })
        });
    }

    pub fn set_cart(&self, next: impl Into<Arc<[CartItem]>>) {
        let next = next.into();
        self.mutate(|current| {
            Some(Snapshot {
                inventory: Arc::clone(&current.inventory),
                cart: next,
            })
        });
    }

    pub fn update_inventory<F>(&self, f: F)
    where
        F: FnOnce(&[InventoryItem]) -> Arc<[InventoryItem]>,
    {
        self.mutate(|current| {
            Some(Snapshot {
                inventory: f(&current.inventory),
                cart: Arc::clone(&current.cart),
            })
        });
    }

    /// Like [`update_inventory`](Self::update_inventory), but `None` means
    /// "unchanged" and publishes nothing. Returns whether a write happened.
    pub fn try_update_inventory<F>(&self, f: F) -> bool
    where
        F: FnOnce(&[InventoryItem]) -> Option<Arc<[InventoryItem]>>,
    {
        self.mutate(|current| {
            f(&current.inventory).map(|inventory| Snapshot {
                inventory,
                cart: Arc::clone(&current.cart),
            })
        })
    }

    pub fn update_cart<F>(&self, f: F)
    where
        F: FnOnce(&[CartItem]) -> Arc<[CartItem]>,
    {
        self.mutate(|current| {
            Some(Snapshot {
                inventory: Arc::clone(&current.inventory),
                cart: f(&current.cart),
            })
        });
    }

    /// Replaces both collections under one notification.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&Snapshot) -> Snapshot,
    {
        self.mutate(|current| Some(f(current)));
    }

    fn mutate<F>(&self, f: F) -> bool
    where
        F: FnOnce(&Snapshot) -> Option<Snapshot>,
    {
        let (snapshot, callback) = {
            let mut inner = self.inner.lock();
            let Some(next) = f(&inner.snapshot) else {
                return false;
            };
            inner.snapshot = next.clone();
            (next, inner.on_change.clone())
        };

        if let Some(callback) = callback {
            callback(&snapshot);
        }
        true
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
