//! Catalog listing, available without a session.

use crate::application::ports::GameStore;
use crate::domain::ShopItem;

pub async fn list_catalog(store: &dyn GameStore) -> Vec<ShopItem> {
    let mut tx = store.begin().await;
    tx.list_catalog().await
}
