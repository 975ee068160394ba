//! Selling: ownership removal plus credit, all or nothing.

use crate::application::ports::GameStore;
use crate::domain::{GameError, ItemId, SessionToken};
use rust_decimal::Decimal;

/// Sell an owned item back at its catalog price. Atomic: no observable
/// state where the item is gone but the credit has not landed.
pub async fn sell_item(
    store: &dyn GameStore,
    token: SessionToken,
    item_id: ItemId,
) -> Result<(), GameError> {
    let mut tx = store.begin().await;

    let account = tx.find_account_by_session(token).await?;
    let item = tx.find_item(item_id).await?;

    tx.revoke_ownership(account.id, &item).await?;
    tx.credit(account.id, Decimal::from(item.price)).await?;
    tx.commit().await
}
