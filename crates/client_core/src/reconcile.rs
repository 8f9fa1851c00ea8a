//! Pure merge rules between staged inventory quantities and committed cart lines.

use std::{collections::HashMap, sync::Arc};

use shared::{
    domain::{CartItem, InventoryItem, ItemId, StagedAmount},
    protocol::NewCartItem,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitPlan {
    /// Nothing staged; no zero-quantity lines are ever created.
    Skip,
    Create(NewCartItem),
    /// `amount` is the new committed total, not the increment.
    Update { id: ItemId, amount: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStep {
    Increase,
    Decrease,
}

pub fn find_inventory(inventory: &[InventoryItem], id: ItemId) -> Option<&InventoryItem> {
    inventory.iter().find(|item| item.id == id)
}

pub fn find_cart_line(cart: &[CartItem], id: ItemId) -> Option<&CartItem> {
    cart.iter().find(|line| line.id == id)
}

pub fn plan_commit(item: &InventoryItem, existing: Option<&CartItem>) -> CommitPlan {
    let StagedAmount::Units(staged) = item.staged() else {
        return CommitPlan::Skip;
    };

    match existing {
        Some(line) => CommitPlan::Update {
            id: line.id,
            amount: line.amount.saturating_add(staged.get()),
        },
        None => CommitPlan::Create(NewCartItem {
            id: item.id,
            content: item.content.clone(),
            amount: staged.get(),
        }),
    }
}

/// Replaces the line with the record's id, or appends it when absent.
pub fn merge_committed(cart: &[CartItem], record: CartItem) -> Arc<[CartItem]> {
    let mut next = cart.to_vec();
    match next.iter_mut().find(|line| line.id == record.id) {
        Some(slot) => *slot = record,
        None => next.push(record),
    }
    next.into()
}

/// Moves `committed` units out of the staged amount for `id`, stopping at 0.
pub fn settle_staged(inventory: &[InventoryItem], id: ItemId, committed: u32) -> Arc<[InventoryItem]> {
    inventory
        .iter()
        .map(|item| {
            if item.id == id {
                item.clone().with_amount(item.amount.saturating_sub(committed))
            } else {
                item.clone()
            }
        })
        .collect()
}

/// One +/- click. `None` when the id is unknown or the amount cannot move.
pub fn adjust_staged(
    inventory: &[InventoryItem],
    id: ItemId,
    step: StageStep,
) -> Option<Arc<[InventoryItem]>> {
    let current = find_inventory(inventory, id)?.amount;
    let amount = match step {
        StageStep::Increase => current.saturating_add(1),
        StageStep::Decrease => current.saturating_sub(1),
    };
    if amount == current {
        return None;
    }

    Some(
        inventory
            .iter()
            .map(|item| {
                if item.id == id {
                    item.clone().with_amount(amount)
                } else {
                    item.clone()
                }
            })
            .collect(),
    )
}

pub fn remove_line(cart: &[CartItem], id: ItemId) -> Arc<[CartItem]> {
    remove_lines(cart, &[id])
}

pub fn remove_lines(cart: &[CartItem], ids: &[ItemId]) -> Arc<[CartItem]> {
    cart.iter()
        .filter(|line| !ids.contains(&line.id))
        .cloned()
        .collect()
}

/// Keeps staged amounts across a re-fetch of the catalog.
pub fn carry_staged(current: &[InventoryItem], fresh: Vec<InventoryItem>) -> Arc<[InventoryItem]> {
    let staged: HashMap<ItemId, u32> = current
        .iter()
        .filter(|item| item.amount > 0)
        .map(|item| (item.id, item.amount))
        .collect();

    fresh
        .into_iter()
        .map(|item| {
            let amount = staged.get(&item.id).copied().unwrap_or(0);
            item.with_amount(amount)
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/reconcile_tests.rs"]
mod tests;
