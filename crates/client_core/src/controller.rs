//! Binds UI events to reconciliation rules, store calls and state writes.

use std::{collections::HashSet, sync::Arc};

use parking_lot::Mutex;
use shared::{
    domain::{CartItem, InventoryItem, ItemId},
    error::StoreError,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    reconcile::{self, CommitPlan, StageStep},
    state::{Snapshot, StateContainer},
    store::RemoteStore,
};

pub trait Renderer: Send + Sync {
    fn render_inventory(&self, inventory: &[InventoryItem]);
    fn render_cart(&self, cart: &[CartItem]);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    Increase(ItemId),
    Decrease(ItemId),
    AddToCart(ItemId),
    Delete(ItemId),
    Checkout,
    Refresh,
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("unknown inventory item {0}")]
    UnknownItem(ItemId),
    #[error("a commit for item {0} is already in progress")]
    CommitInFlight(ItemId),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Skipped,
    Created(CartItem),
    Updated(CartItem),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Staged { id: ItemId, amount: u32 },
    Unchanged,
    Committed(CommitOutcome),
    Deleted(ItemId),
    CheckedOut,
    Refreshed,
}

pub struct Controller<S: RemoteStore> {
    store: Arc<S>,
    state: Arc<StateContainer>,
    inflight: Mutex<HashSet<ItemId>>,
}

struct InflightGuard<'a> {
    ids: &'a Mutex<HashSet<ItemId>>,
    id: ItemId,
}

impl Drop for InflightGuard<'_> {
    fn drop(&mut self) {
        self.ids.lock().remove(&self.id);
    }
}

impl<S: RemoteStore> Controller<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_state(store, Arc::new(StateContainer::new()))
    }

    pub fn with_state(store: Arc<S>, state: Arc<StateContainer>) -> Self {
        Self {
            store,
            state,
            inflight: Mutex::new(HashSet::new()),
        }
    }

    pub fn state(&self) -> &Arc<StateContainer> {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    /// Re-renders both lists on every change, then loads both collections.
    pub async fn init(&self, renderer: Arc<dyn Renderer>) -> Result<(), ControllerError> {
        self.state.subscribe(move |snapshot| {
            renderer.render_inventory(&snapshot.inventory);
            renderer.render_cart(&snapshot.cart);
        });
        self.refresh().await
    }

    pub async fn refresh(&self) -> Result<(), ControllerError> {
        let (inventory, cart) =
            futures::join!(self.store.fetch_inventory(), self.store.fetch_cart());

        let inventory_result = inventory.map(|fresh| {
            self.state
                .update_inventory(|current| reconcile::carry_staged(current, fresh));
        });
        let cart_result = cart.map(|cart| self.state.set_cart(cart));

        match (inventory_result, cart_result) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(err), Ok(())) | (Ok(()), Err(err)) => Err(self.report("refresh", None, err)),
            (Err(inventory_err), Err(cart_err)) => {
                self.report("refresh", None, cart_err);
                Err(self.report("refresh", None, inventory_err))
            }
        }
    }

    pub async fn handle(&self, event: UiEvent) -> Result<EventOutcome, ControllerError> {
        match event {
            UiEvent::Increase(id) => self.stage(id, StageStep::Increase),
            UiEvent::Decrease(id) => self.stage(id, StageStep::Decrease),
            UiEvent::AddToCart(id) => self.add_to_cart(id).await.map(EventOutcome::Committed),
            UiEvent::Delete(id) => self.delete(id).await.map(|()| EventOutcome::Deleted(id)),
            UiEvent::Checkout => self.checkout().await.map(|()| EventOutcome::CheckedOut),
            UiEvent::Refresh => self.refresh().await.map(|()| EventOutcome::Refreshed),
        }
    }

    pub fn increase(&self, id: ItemId) -> Result<u32, ControllerError> {
        self.stage(id, StageStep::Increase).map(|_| self.staged_amount(id))
    }

    pub fn decrease(&self, id: ItemId) -> Result<u32, ControllerError> {
        self.stage(id, StageStep::Decrease).map(|_| self.staged_amount(id))
    }

    fn stage(&self, id: ItemId, step: StageStep) -> Result<EventOutcome, ControllerError> {
        if reconcile::find_inventory(&self.state.inventory(), id).is_none() {
            return Err(ControllerError::UnknownItem(id));
        }

        let changed = self
            .state
            .try_update_inventory(|inventory| reconcile::adjust_staged(inventory, id, step));
        if !changed {
            return Ok(EventOutcome::Unchanged);
        }
        Ok(EventOutcome::Staged {
            id,
            amount: self.staged_amount(id),
        })
    }

    fn staged_amount(&self, id: ItemId) -> u32 {
        reconcile::find_inventory(&self.state.inventory(), id).map_or(0, |item| item.amount)
    }

    pub async fn add_to_cart(&self, id: ItemId) -> Result<CommitOutcome, ControllerError> {
        let _guard = self.begin_commit(id)?;

        let snapshot = self.state.snapshot();
        let item = reconcile::find_inventory(&snapshot.inventory, id)
            .ok_or(ControllerError::UnknownItem(id))?;
        let committed = item.amount;
        let plan = reconcile::plan_commit(item, reconcile::find_cart_line(&snapshot.cart, id));

        let outcome = match plan {
            CommitPlan::Skip => {
                debug!(item_id = id.0, "nothing staged; add to cart skipped");
                return Ok(CommitOutcome::Skipped);
            }
            CommitPlan::Create(new_item) => self
                .store
                .create_cart_item(new_item)
                .await
                .map(CommitOutcome::Created),
            CommitPlan::Update { id, amount } => self
                .store
                .update_cart_item(id, amount)
                .await
                .map(CommitOutcome::Updated),
        }
        .map_err(|err| self.report("add_to_cart", Some(id), err))?;

        let record = match &outcome {
            CommitOutcome::Created(record) | CommitOutcome::Updated(record) => record.clone(),
            CommitOutcome::Skipped => return Ok(outcome),
        };
        self.state.update(|current| Snapshot {
            inventory: reconcile::settle_staged(&current.inventory, id, committed),
            cart: reconcile::merge_committed(&current.cart, record),
        });
        info!(item_id = id.0, committed, "committed to cart");
        Ok(outcome)
    }

    pub async fn delete(&self, id: ItemId) -> Result<(), ControllerError> {
        self.store
            .delete_cart_item(id)
            .await
            .map_err(|err| self.report("delete", Some(id), err))?;
        self.state
            .update_cart(|cart| reconcile::remove_line(cart, id));
        Ok(())
    }

    /// On partial failure only the lines the store actually removed leave the cart.
    pub async fn checkout(&self) -> Result<(), ControllerError> {
        match self.store.checkout().await {
            Ok(()) => {
                self.state.set_cart(Vec::new());
                Ok(())
            }
            Err(StoreError::PartialCheckout { removed, failed }) => {
                self.state
                    .update_cart(|cart| reconcile::remove_lines(cart, &removed));
                Err(self.report(
                    "checkout",
                    None,
                    StoreError::PartialCheckout { removed, failed },
                ))
            }
            Err(err) => Err(self.report("checkout", None, err)),
        }
    }

    fn begin_commit(&self, id: ItemId) -> Result<InflightGuard<'_>, ControllerError> {
        if !self.inflight.lock().insert(id) {
            warn!(item_id = id.0, "rejected concurrent commit");
            return Err(ControllerError::CommitInFlight(id));
        }
        Ok(InflightGuard {
            ids: &self.inflight,
            id,
        })
    }

    fn report(&self, action: &str, id: Option<ItemId>, err: StoreError) -> ControllerError {
        match id {
            Some(id) => warn!(action, item_id = id.0, error = %err, "store call failed"),
            None => warn!(action, error = %err, "store call failed"),
        }
        ControllerError::Store(err)
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
