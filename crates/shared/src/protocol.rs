use serde::{Deserialize, Serialize};

use crate::domain::{CartItem, InventoryItem, ItemId};

/// `GET /inventory` element. Any `amount` the store sends is dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub id: ItemId,
    pub content: String,
}

impl From<InventoryRecord> for InventoryItem {
    fn from(record: InventoryRecord) -> Self {
        InventoryItem::new(record.id, record.content)
    }
}

/// `POST /cart` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCartItem {
    pub id: ItemId,
    pub content: String,
    pub amount: u32,
}

impl From<NewCartItem> for CartItem {
    fn from(item: NewCartItem) -> Self {
        CartItem::new(item.id, item.content, item.amount)
    }
}

/// `PATCH /cart/{id}` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountPatch {
    pub amount: u32,
}
