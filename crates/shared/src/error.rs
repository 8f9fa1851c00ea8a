use thiserror::Error;

use crate::domain::ItemId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("network error: {0}")]
    Network(String),
    #[error("cart item {0} not found")]
    NotFound(ItemId),
    #[error("checkout incomplete: {} line(s) removed, failed for {}", removed.len(), describe_failures(failed))]
    PartialCheckout {
        removed: Vec<ItemId>,
        failed: Vec<(ItemId, String)>,
    },
    #[error("invalid store url: {0}")]
    InvalidBaseUrl(String),
}

impl StoreError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Ids whose delete failed during checkout.
    pub fn failed_ids(&self) -> Vec<ItemId> {
        match self {
            StoreError::PartialCheckout { failed, .. } => {
                failed.iter().map(|(id, _)| *id).collect()
            }
            _ => Vec::new(),
        }
    }
}

fn describe_failures(failed: &[(ItemId, String)]) -> String {
    failed
        .iter()
        .map(|(id, reason)| format!("{id} ({reason})"))
        .collect::<Vec<_>>()
        .join(", ")
}
