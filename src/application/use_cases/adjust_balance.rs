//! Administrative balance adjustment.
//!
//! Not reachable from the wire routing table; used operationally and by
//! tests to put an account into a known state.

use crate::application::ports::GameStore;
use crate::domain::{GameError, SessionToken};
use rust_decimal::Decimal;

/// Set the session's account balance to an exact non-negative amount.
pub async fn adjust_balance(
    store: &dyn GameStore,
    token: SessionToken,
    amount: Decimal,
) -> Result<(), GameError> {
    if amount.is_sign_negative() {
        return Err(GameError::BadRequest);
    }

    let mut tx = store.begin().await;
    let account = tx.find_account_by_session(token).await?;
    tx.set_balance(account.id, amount.round_dp(2)).await?;
    tx.commit().await
}
