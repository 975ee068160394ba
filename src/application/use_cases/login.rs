//! Login: find-or-create the account, issue a fresh session.

use crate::application::ports::GameStore;
use crate::application::use_cases::SessionSnapshot;
use crate::domain::{GameError, Nickname};
use rand::Rng;
use rust_decimal::Decimal;

/// Inclusive range the starting balance is drawn from, in whole credits
/// with two decimal places.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartingBalanceRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl StartingBalanceRange {
    /// Draw a uniform random amount with exactly two decimal places.
    /// Sampling happens in cents so no float ever touches the balance.
    pub fn sample(&self) -> Decimal {
        let min_cents = to_cents(self.min);
        let max_cents = to_cents(self.max).max(min_cents);
        let cents = rand::thread_rng().gen_range(min_cents..=max_cents);
        Decimal::new(cents, 2)
    }
}

fn to_cents(amount: Decimal) -> i64 {
    use rust_decimal::prelude::ToPrimitive;
    // Config validation rejects bounds past i64 cents; saturate if a range
    // is built by hand anyway.
    (amount.round_dp(2) * Decimal::ONE_HUNDRED)
        .to_i64()
        .unwrap_or(i64::MAX)
}

/// Log in with a nickname. First login creates the account and seeds its
/// balance with a random amount from `range`; every login issues a new
/// session without invalidating prior ones.
pub async fn login(
    store: &dyn GameStore,
    range: StartingBalanceRange,
    nickname: Nickname,
) -> Result<SessionSnapshot, GameError> {
    let mut tx = store.begin().await;

    let account = match tx.find_account_by_nickname(&nickname).await {
        Some(existing) => existing,
        None => {
            let account = tx.create_account(nickname).await?;
            tx.create_balance(account.id, range.sample()).await?;
            account
        }
    };

    let session = tx.create_session(account.id).await?;
    let balance = tx.balance_of(account.id).await?;
    let owned_items = tx.owned_items(account.id).await;
    tx.commit().await?;

    Ok(SessionSnapshot {
        account,
        balance,
        session_token: session.token,
        owned_items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn sample_stays_inside_the_range_with_two_decimals() {
        let range = StartingBalanceRange {
            min: dec!(5.00),
            max: dec!(10.00),
        };
        for _ in 0..100 {
            let amount = range.sample();
            assert!(amount >= dec!(5.00) && amount <= dec!(10.00));
            assert!(amount.scale() <= 2);
        }
    }

    #[test]
    fn degenerate_range_is_deterministic() {
        let range = StartingBalanceRange {
            min: dec!(13.52),
            max: dec!(13.52),
        };
        assert_eq!(range.sample(), dec!(13.52));
    }
}
