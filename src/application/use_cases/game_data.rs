//! Session snapshot retrieval.

use crate::application::ports::GameStore;
use crate::domain::{Account, GameError, SessionToken, ShopItem};
use rust_decimal::Decimal;

/// Everything a client needs to render its state: the account, its
/// balance, the session token proving the login, and the owned items.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub account: Account,
    pub balance: Decimal,
    pub session_token: SessionToken,
    pub owned_items: Vec<ShopItem>,
}

/// Resolve a session token and return the account's current snapshot.
/// The token is echoed back unchanged; this never rotates a session.
pub async fn game_data(
    store: &dyn GameStore,
    token: SessionToken,
) -> Result<SessionSnapshot, GameError> {
    let mut tx = store.begin().await;
    let account = tx.find_account_by_session(token).await?;
    let balance = tx.balance_of(account.id).await?;
    let owned_items = tx.owned_items(account.id).await;
    // Read-only path, nothing to commit.

    Ok(SessionSnapshot {
        account,
        balance,
        session_token: token,
        owned_items,
    })
}
