//! Dispatcher-level economy scenarios: login determinism, logout
//! invalidation, buy atomicity, sell reversibility, and the acceptance
//! scenario (Sampson, price 24, starting balance 13.52).

use rust_decimal_macros::dec;
use starport::application::use_cases::{
    adjust_balance, buy_item, game_data, list_catalog, login, logout, sell_item,
    StartingBalanceRange,
};
use starport::presentation::protocol::{
    ActionType, ItemRequest, ProtocolRequest, RequestData, ResponseData,
};
use starport::{
    Dispatcher, GameError, GameStore, MemoryStore, NewShopItem, Nickname, ShopItem, ShopItemType,
};
use std::sync::Arc;

// ============================================================================
// Test fixtures
// ============================================================================

fn sampson() -> NewShopItem {
    NewShopItem {
        name: "Sampson".into(),
        price: 24,
        kind: ShopItemType::Ship,
    }
}

fn nickname(value: &str) -> Nickname {
    Nickname::new(value).unwrap()
}

fn fixed_range(amount: rust_decimal::Decimal) -> StartingBalanceRange {
    StartingBalanceRange {
        min: amount,
        max: amount,
    }
}

/// Store with the Sampson ship seeded once.
async fn seeded_store() -> (MemoryStore, ShopItem) {
    let store = MemoryStore::new();
    let mut tx = store.begin().await;
    let item = tx.add_item_if_absent(sampson()).await;
    tx.commit().await.unwrap();
    (store, item)
}

// ============================================================================
// Login / logout
// ============================================================================

#[tokio::test]
async fn login_twice_returns_same_account_with_fresh_sessions() {
    let (store, _) = seeded_store().await;
    let range = fixed_range(dec!(42.00));

    let first = login(&store, range, nickname("rickastley")).await.unwrap();
    let second = login(&store, range, nickname("rickastley")).await.unwrap();

    // Same account, distinct sessions, balance assigned exactly once.
    assert_eq!(first.account.id, second.account.id);
    assert_ne!(first.session_token, second.session_token);
    assert_eq!(first.balance, second.balance);

    // The first session still works: logins never invalidate each other.
    assert!(game_data(&store, first.session_token).await.is_ok());
}

#[tokio::test]
async fn logout_invalidates_only_that_session() {
    let (store, _) = seeded_store().await;
    let range = fixed_range(dec!(42.00));

    let first = login(&store, range, nickname("rickastley")).await.unwrap();
    let second = login(&store, range, nickname("rickastley")).await.unwrap();

    logout(&store, first.session_token).await.unwrap();

    let err = game_data(&store, first.session_token).await.unwrap_err();
    assert_eq!(err, GameError::AccountSessionNotFound);
    assert_eq!(err.code(), 1101);

    assert!(game_data(&store, second.session_token).await.is_ok());
}

#[tokio::test]
async fn logout_with_unknown_token_fails() {
    let (store, _) = seeded_store().await;
    let err = logout(&store, uuid::Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err, GameError::AccountSessionNotFound);
}

// ============================================================================
// Buy atomicity
// ============================================================================

#[tokio::test]
async fn buy_with_exact_funds_succeeds_exactly_once() {
    let (store, item) = seeded_store().await;
    let session = login(&store, fixed_range(dec!(24.00)), nickname("nick"))
        .await
        .unwrap();

    buy_item(&store, session.session_token, item.id).await.unwrap();

    let snapshot = game_data(&store, session.session_token).await.unwrap();
    assert_eq!(snapshot.balance, dec!(0.00));
    assert_eq!(snapshot.owned_items, vec![item.clone()]);

    // Second buy of the same item fails and leaves the balance alone.
    let err = buy_item(&store, session.session_token, item.id)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        GameError::AccountAlreadyOwnsItem {
            item: "Sampson".into()
        }
    );
    let snapshot = game_data(&store, session.session_token).await.unwrap();
    assert_eq!(snapshot.balance, dec!(0.00));
}

#[tokio::test]
async fn underfunded_buy_mutates_nothing() {
    let (store, item) = seeded_store().await;
    let session = login(&store, fixed_range(dec!(13.52)), nickname("nick"))
        .await
        .unwrap();

    let err = buy_item(&store, session.session_token, item.id)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        GameError::NotEnoughFunds {
            balance: dec!(13.52)
        }
    );

    let snapshot = game_data(&store, session.session_token).await.unwrap();
    assert_eq!(snapshot.balance, dec!(13.52));
    assert!(snapshot.owned_items.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_buyers_of_the_same_funds_serialize() {
    let store = MemoryStore::new();
    let mut tx = store.begin().await;
    let ship = tx.add_item_if_absent(sampson()).await;
    let thruster = tx
        .add_item_if_absent(NewShopItem {
            name: "Ion Thruster".into(),
            price: 24,
            kind: ShopItemType::Equipment,
        })
        .await;
    tx.commit().await.unwrap();

    // Funds for exactly one of the two 24-credit items.
    let session = login(&store, fixed_range(dec!(24.00)), nickname("nick"))
        .await
        .unwrap();
    let token = session.session_token;

    let first = {
        let store = store.clone();
        tokio::spawn(async move { buy_item(&store, token, ship.id).await })
    };
    let second = {
        let store = store.clone();
        tokio::spawn(async move { buy_item(&store, token, thruster.id).await })
    };
    let first = first.await.unwrap();
    let second = second.await.unwrap();

    // The transactions serialize on the store, so exactly one buyer wins
    // and the loser sees the post-purchase balance.
    assert_ne!(first.is_ok(), second.is_ok());
    let loser = if first.is_ok() { second } else { first };
    assert_eq!(
        loser.unwrap_err(),
        GameError::NotEnoughFunds {
            balance: dec!(0.00)
        }
    );

    let snapshot = game_data(&store, token).await.unwrap();
    assert_eq!(snapshot.balance, dec!(0.00));
    assert_eq!(snapshot.owned_items.len(), 1);
}

#[tokio::test]
async fn buying_an_unknown_item_fails() {
    let (store, _) = seeded_store().await;
    let session = login(&store, fixed_range(dec!(100.00)), nickname("nick"))
        .await
        .unwrap();

    let missing = uuid::Uuid::new_v4();
    let err = buy_item(&store, session.session_token, missing)
        .await
        .unwrap_err();
    assert_eq!(err.code(), 1201);
}

// ============================================================================
// Sell reversibility
// ============================================================================

#[tokio::test]
async fn buy_then_sell_restores_the_exact_balance() {
    let (store, item) = seeded_store().await;
    let session = login(&store, fixed_range(dec!(31.07)), nickname("nick"))
        .await
        .unwrap();

    buy_item(&store, session.session_token, item.id).await.unwrap();
    sell_item(&store, session.session_token, item.id).await.unwrap();

    let snapshot = game_data(&store, session.session_token).await.unwrap();
    assert_eq!(snapshot.balance, dec!(31.07));
    assert!(snapshot.owned_items.is_empty());
}

#[tokio::test]
async fn selling_an_item_never_owned_fails() {
    let (store, item) = seeded_store().await;
    let session = login(&store, fixed_range(dec!(100.00)), nickname("nick"))
        .await
        .unwrap();

    let err = sell_item(&store, session.session_token, item.id)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        GameError::AccountDoesntOwnItem {
            item: "Sampson".into()
        }
    );
}

// ============================================================================
// Acceptance scenario
// ============================================================================

#[tokio::test]
async fn sampson_scenario() {
    // Seeding twice leaves exactly one catalog row.
    let (store, item) = seeded_store().await;
    let mut tx = store.begin().await;
    tx.add_item_if_absent(sampson()).await;
    tx.commit().await.unwrap();
    assert_eq!(list_catalog(&store).await.len(), 1);

    let session = login(&store, fixed_range(dec!(13.52)), nickname("nick"))
        .await
        .unwrap();
    assert_eq!(session.balance, dec!(13.52));

    let err = buy_item(&store, session.session_token, item.id)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        GameError::NotEnoughFunds {
            balance: dec!(13.52)
        }
    );

    // Admin top-up, then the purchase goes through.
    adjust_balance(&store, session.session_token, dec!(24.00))
        .await
        .unwrap();
    buy_item(&store, session.session_token, item.id).await.unwrap();

    let snapshot = game_data(&store, session.session_token).await.unwrap();
    assert_eq!(snapshot.balance, dec!(0.00));
    assert!(snapshot.owned_items.iter().any(|i| i.name == "Sampson"));
}

// ============================================================================
// Dispatcher boundary
// ============================================================================

#[tokio::test]
async fn dispatcher_turns_domain_errors_into_error_frames() {
    let (store, item) = seeded_store().await;
    let dispatcher = Dispatcher::new(Arc::new(store), fixed_range(dec!(1.00)));

    let response = dispatcher
        .dispatch(ProtocolRequest {
            action_type: ActionType::BuyItem,
            session_uuid: Some(uuid::Uuid::new_v4()),
            data: Some(RequestData::Item(ItemRequest { item_uuid: item.id })),
        })
        .await;

    match response.data {
        ResponseData::Error(err) => assert_eq!(err.error_code, 1101),
        other => panic!("expected session error, got {other:?}"),
    }
}

#[tokio::test]
async fn catalog_needs_no_session() {
    let (store, _) = seeded_store().await;
    let dispatcher = Dispatcher::new(Arc::new(store), fixed_range(dec!(1.00)));

    let response = dispatcher
        .dispatch(ProtocolRequest {
            action_type: ActionType::GetAllItemList,
            session_uuid: None,
            data: None,
        })
        .await;

    match response.data {
        ResponseData::Items(items) => assert_eq!(items.len(), 1),
        other => panic!("expected item list, got {other:?}"),
    }
}
