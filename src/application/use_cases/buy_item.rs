//! Buying: exactly-once ownership grant plus debit, all or nothing.

use crate::application::ports::GameStore;
use crate::domain::{GameError, ItemId, SessionToken};
use rust_decimal::Decimal;

/// Buy a catalog item for the session's account.
///
/// The whole sequence runs in one store transaction: resolve session,
/// resolve item, check funds, grant ownership, debit the price. Any
/// failure leaves neither a partial debit nor a dangling ownership row.
pub async fn buy_item(
    store: &dyn GameStore,
    token: SessionToken,
    item_id: ItemId,
) -> Result<(), GameError> {
    let mut tx = store.begin().await;

    let account = tx.find_account_by_session(token).await?;
    let item = tx.find_item(item_id).await?;
    let balance = tx.balance_of(account.id).await?;

    let price = Decimal::from(item.price);
    if balance < price {
        return Err(GameError::NotEnoughFunds { balance });
    }

    tx.grant_ownership(account.id, &item).await?;
    tx.debit(account.id, price).await?;
    tx.commit().await
}
