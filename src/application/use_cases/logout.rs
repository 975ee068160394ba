//! Logout: delete the session matching the token.

use crate::application::ports::GameStore;
use crate::domain::{GameError, SessionToken};

pub async fn logout(store: &dyn GameStore, token: SessionToken) -> Result<(), GameError> {
    let mut tx = store.begin().await;
    tx.delete_session(token).await?;
    tx.commit().await
}
