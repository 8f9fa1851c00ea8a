use std::{fmt, num::NonZeroU32};

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

id_newtype!(ItemId);

/// Catalog entry plus the quantity the user has staged but not committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItem {
    pub id: ItemId,
    pub content: String,
    /// Local only; the store never sees this until it is committed.
    pub amount: u32,
}

impl InventoryItem {
    pub fn new(id: ItemId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
            amount: 0,
        }
    }

    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = amount;
        self
    }

    pub fn staged(&self) -> StagedAmount {
        StagedAmount::from(self.amount)
    }
}

/// Server-confirmed cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ItemId,
    pub content: String,
    pub amount: u32,
}

impl CartItem {
    pub fn new(id: ItemId, content: impl Into<String>, amount: u32) -> Self {
        Self {
            id,
            content: content.into(),
            amount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagedAmount {
    Nothing,
    Units(NonZeroU32),
}

impl StagedAmount {
    pub fn get(self) -> u32 {
        match self {
            StagedAmount::Nothing => 0,
            StagedAmount::Units(units) => units.get(),
        }
    }
}

impl From<u32> for StagedAmount {
    fn from(value: u32) -> Self {
        NonZeroU32::new(value).map_or(StagedAmount::Nothing, StagedAmount::Units)
    }
}
