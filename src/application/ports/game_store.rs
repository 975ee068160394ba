//! Persistence gateway port.
//!
//! The store is the sole transaction boundary of the system: every
//! multi-step read-check-mutate sequence (buy, sell, login) runs against
//! one [`StoreTransaction`] so concurrent writers to the same balance or
//! ownership rows are serialized by the backing implementation.

use crate::domain::{
    Account, AccountId, AccountSession, GameError, ItemId, NewShopItem, Nickname, SessionToken,
    ShopItem,
};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Persistence gateway for accounts, sessions, balances, the catalog,
/// and item ownership.
#[async_trait]
pub trait GameStore: Send + Sync {
    /// Begin an atomic unit of work. Dropping the transaction without
    /// calling [`StoreTransaction::commit`] rolls back every mutation.
    async fn begin(&self) -> Box<dyn StoreTransaction>;
}

/// One atomic unit of work against the store. All operations observe the
/// transaction's own uncommitted mutations.
#[async_trait]
pub trait StoreTransaction: Send {
    // Accounts

    async fn find_account_by_nickname(&mut self, nickname: &Nickname) -> Option<Account>;

    /// Fails with `AccountAlreadyExists` if the nickname is taken.
    async fn create_account(&mut self, nickname: Nickname) -> Result<Account, GameError>;

    // Sessions

    async fn create_session(&mut self, account_id: AccountId)
        -> Result<AccountSession, GameError>;

    /// Fails with `AccountSessionNotFound` if the token is unknown.
    async fn delete_session(&mut self, token: SessionToken) -> Result<(), GameError>;

    /// Resolve a session token to its owning account.
    async fn find_account_by_session(
        &mut self,
        token: SessionToken,
    ) -> Result<Account, GameError>;

    // Balances

    async fn create_balance(
        &mut self,
        account_id: AccountId,
        amount: Decimal,
    ) -> Result<(), GameError>;

    async fn balance_of(&mut self, account_id: AccountId) -> Result<Decimal, GameError>;

    async fn credit(&mut self, account_id: AccountId, amount: Decimal) -> Result<(), GameError>;

    /// Fails with `NotEnoughFunds` (carrying the current balance) if the
    /// debit would take the balance below zero.
    async fn debit(&mut self, account_id: AccountId, amount: Decimal) -> Result<(), GameError>;

    async fn set_balance(
        &mut self,
        account_id: AccountId,
        amount: Decimal,
    ) -> Result<(), GameError>;

    // Catalog

    async fn list_catalog(&mut self) -> Vec<ShopItem>;

    async fn find_item(&mut self, item_id: ItemId) -> Result<ShopItem, GameError>;

    /// Insert a catalog entry unless one already matches on
    /// `(kind, name, price)`. Returns the stored entry either way.
    async fn add_item_if_absent(&mut self, item: NewShopItem) -> ShopItem;

    // Ownership

    /// Fails with `AccountAlreadyOwnsItem` if the pair already exists.
    async fn grant_ownership(
        &mut self,
        account_id: AccountId,
        item: &ShopItem,
    ) -> Result<(), GameError>;

    /// Fails with `AccountDoesntOwnItem` if the pair does not exist.
    async fn revoke_ownership(
        &mut self,
        account_id: AccountId,
        item: &ShopItem,
    ) -> Result<(), GameError>;

    async fn owned_items(&mut self, account_id: AccountId) -> Vec<ShopItem>;

    /// Make every mutation of this transaction durable.
    async fn commit(self: Box<Self>) -> Result<(), GameError>;
}
