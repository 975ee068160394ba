//! Shop catalog entities.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ItemId = Uuid;

/// Catalog entry category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShopItemType {
    Ship,
    Equipment,
}

/// A purchasable catalog entry. Seeded at startup, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopItem {
    #[serde(rename = "uuid")]
    pub id: ItemId,
    pub name: String,
    /// Whole-credit price, non-negative.
    pub price: u32,
    #[serde(rename = "type")]
    pub kind: ShopItemType,
}

/// A catalog entry as it appears in the seed file, before an id is
/// assigned. `(kind, name, price)` identifies an entry for idempotent
/// seeding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewShopItem {
    pub name: String,
    pub price: u32,
    #[serde(rename = "type")]
    pub kind: ShopItemType,
}

impl NewShopItem {
    /// Promote to a full catalog entry with a freshly assigned id.
    pub fn assign_id(self) -> ShopItem {
        ShopItem {
            id: Uuid::new_v4(),
            name: self.name,
            price: self.price,
            kind: self.kind,
        }
    }

    /// Seeding identity: whether an existing entry matches this seed row.
    pub fn matches(&self, item: &ShopItem) -> bool {
        self.kind == item.kind && self.name == item.name && self.price == item.price
    }
}
