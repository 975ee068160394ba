//! Core business entities and rules: accounts, sessions, the shop
//! catalog, and the error taxonomy shared across layers.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::{
    Account, AccountId, AccountSession, ItemId, NewShopItem, SessionToken, ShopItem, ShopItemType,
};
pub use errors::{ErrorDetail, GameError};
pub use value_objects::{Nickname, NicknameError, MAX_NICKNAME_LEN};
