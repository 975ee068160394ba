mod account;
mod shop_item;

pub use account::{Account, AccountId, AccountSession, SessionToken};
pub use shop_item::{ItemId, NewShopItem, ShopItem, ShopItemType};
