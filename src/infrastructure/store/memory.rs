//! In-memory persistence gateway with real transaction semantics.
//!
//! `begin()` takes an owned lock over the whole game state, so at most one
//! transaction is in flight at a time: conflicting buyers of the same
//! funds serialize here instead of racing. The transaction works on a
//! clone of the state; `commit` swaps it back in, dropping without commit
//! discards every mutation.

use crate::application::ports::{GameStore, StoreTransaction};
use crate::domain::{
    Account, AccountId, AccountSession, GameError, ItemId, NewShopItem, Nickname, SessionToken,
    ShopItem,
};
use async_trait::async_trait;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default, Clone)]
struct GameState {
    accounts: HashMap<AccountId, Account>,
    nicknames: HashMap<Nickname, AccountId>,
    sessions: HashMap<SessionToken, AccountSession>,
    balances: HashMap<AccountId, Decimal>,
    /// IndexMap keeps catalog listing order stable across calls.
    catalog: IndexMap<ItemId, ShopItem>,
    ownership: HashSet<(AccountId, ItemId)>,
}

/// In-memory [`GameStore`]. Cheap to clone; clones share state.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<GameState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameStore for MemoryStore {
    async fn begin(&self) -> Box<dyn StoreTransaction> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();
        Box::new(MemoryTransaction { guard, working })
    }
}

/// Unit of work over a cloned state snapshot. Holds the store lock for
/// its whole lifetime, which is the serialization point the buy/sell
/// paths rely on.
pub struct MemoryTransaction {
    guard: OwnedMutexGuard<GameState>,
    working: GameState,
}

impl MemoryTransaction {
    fn balance_mut(&mut self, account_id: AccountId) -> Result<&mut Decimal, GameError> {
        self.working
            .balances
            .get_mut(&account_id)
            .ok_or(GameError::AccountBalanceNotFound {
                account: account_id.to_string(),
            })
    }
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn find_account_by_nickname(&mut self, nickname: &Nickname) -> Option<Account> {
        let id = self.working.nicknames.get(nickname)?;
        self.working.accounts.get(id).cloned()
    }

    async fn create_account(&mut self, nickname: Nickname) -> Result<Account, GameError> {
        if self.working.nicknames.contains_key(&nickname) {
            return Err(GameError::AccountAlreadyExists {
                nickname: nickname.to_string(),
            });
        }
        let account = Account::new(nickname.clone());
        self.working.nicknames.insert(nickname, account.id);
        self.working.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn create_session(
        &mut self,
        account_id: AccountId,
    ) -> Result<AccountSession, GameError> {
        if !self.working.accounts.contains_key(&account_id) {
            return Err(GameError::AccountNotExist);
        }
        let session = AccountSession::open(account_id);
        self.working.sessions.insert(session.token, session.clone());
        Ok(session)
    }

    async fn delete_session(&mut self, token: SessionToken) -> Result<(), GameError> {
        self.working
            .sessions
            .remove(&token)
            .map(|_| ())
            .ok_or(GameError::AccountSessionNotFound)
    }

    async fn find_account_by_session(
        &mut self,
        token: SessionToken,
    ) -> Result<Account, GameError> {
        let session = self
            .working
            .sessions
            .get(&token)
            .ok_or(GameError::AccountSessionNotFound)?;
        self.working
            .accounts
            .get(&session.account_id)
            .cloned()
            .ok_or(GameError::AccountNotExist)
    }

    async fn create_balance(
        &mut self,
        account_id: AccountId,
        amount: Decimal,
    ) -> Result<(), GameError> {
        if amount.is_sign_negative() {
            return Err(GameError::BadRequest);
        }
        self.working.balances.insert(account_id, amount.round_dp(2));
        Ok(())
    }

    async fn balance_of(&mut self, account_id: AccountId) -> Result<Decimal, GameError> {
        self.working
            .balances
            .get(&account_id)
            .copied()
            .ok_or(GameError::AccountBalanceNotFound {
                account: account_id.to_string(),
            })
    }

    async fn credit(&mut self, account_id: AccountId, amount: Decimal) -> Result<(), GameError> {
        if amount.is_sign_negative() {
            return Err(GameError::BadRequest);
        }
        let balance = self.balance_mut(account_id)?;
        *balance += amount;
        Ok(())
    }

    async fn debit(&mut self, account_id: AccountId, amount: Decimal) -> Result<(), GameError> {
        if amount.is_sign_negative() {
            return Err(GameError::BadRequest);
        }
        let balance = self.balance_mut(account_id)?;
        if *balance < amount {
            return Err(GameError::NotEnoughFunds { balance: *balance });
        }
        *balance -= amount;
        Ok(())
    }

    async fn set_balance(
        &mut self,
        account_id: AccountId,
        amount: Decimal,
    ) -> Result<(), GameError> {
        if amount.is_sign_negative() {
            return Err(GameError::BadRequest);
        }
        let balance = self.balance_mut(account_id)?;
        *balance = amount;
        Ok(())
    }

    async fn list_catalog(&mut self) -> Vec<ShopItem> {
        self.working.catalog.values().cloned().collect()
    }

    async fn find_item(&mut self, item_id: ItemId) -> Result<ShopItem, GameError> {
        self.working
            .catalog
            .get(&item_id)
            .cloned()
            .ok_or(GameError::ShopItemNotFound {
                item: item_id.to_string(),
            })
    }

    async fn add_item_if_absent(&mut self, item: NewShopItem) -> ShopItem {
        if let Some(existing) = self
            .working
            .catalog
            .values()
            .find(|stored| item.matches(stored))
        {
            return existing.clone();
        }
        let item = item.assign_id();
        self.working.catalog.insert(item.id, item.clone());
        item
    }

    async fn grant_ownership(
        &mut self,
        account_id: AccountId,
        item: &ShopItem,
    ) -> Result<(), GameError> {
        if !self.working.ownership.insert((account_id, item.id)) {
            return Err(GameError::AccountAlreadyOwnsItem {
                item: item.name.clone(),
            });
        }
        Ok(())
    }

    async fn revoke_ownership(
        &mut self,
        account_id: AccountId,
        item: &ShopItem,
    ) -> Result<(), GameError> {
        if !self.working.ownership.remove(&(account_id, item.id)) {
            return Err(GameError::AccountDoesntOwnItem {
                item: item.name.clone(),
            });
        }
        Ok(())
    }

    async fn owned_items(&mut self, account_id: AccountId) -> Vec<ShopItem> {
        self.working
            .catalog
            .values()
            .filter(|item| self.working.ownership.contains(&(account_id, item.id)))
            .cloned()
            .collect()
    }

    async fn commit(self: Box<Self>) -> Result<(), GameError> {
        let MemoryTransaction { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}
