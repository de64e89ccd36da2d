mod common;

use std::sync::Arc;

use common::*;
use fyndd_application::{AuthUseCase, CartUseCase};
use fyndd_core::FynddError;
use fyndd_core::auth::{AuthSession, Credentials, PendingAction, SessionStore};
use fyndd_core::product::{NormalizedProduct, ProductId};

fn product(id: Option<&str>) -> NormalizedProduct {
    NormalizedProduct {
        id: id.map(ProductId::from),
        title: "Red Dress".to_string(),
        price: 1200.0,
        ..Default::default()
    }
}

async fn logged_in_session() -> Arc<fyndd_infrastructure::StoredSessionStore> {
    let (state, _) = memory_state();
    let session = session_store(&state);
    session
        .save_session(&AuthSession {
            token: "t".to_string(),
            user: None,
        })
        .await
        .unwrap();
    session
}

#[tokio::test]
async fn test_removing_missing_item_succeeds_and_refetches() {
    let api = Arc::new(FakeCartApi::default());
    *api.items.lock().unwrap() = vec![cart_item("p1", 500.0, 2)];
    api.missing.lock().unwrap().push(ProductId::from("p9"));
    let cart = CartUseCase::new(api.clone(), logged_in_session().await);

    let refreshed = cart.remove(&ProductId::from("p9")).await.unwrap();

    assert_eq!(api.fetch_count(), 1);
    assert!(!refreshed.contains(&ProductId::from("p9")));
    assert_eq!(cart.subtotal().await, 1000.0);
}

#[tokio::test]
async fn test_clear_without_cart_is_success() {
    let api = Arc::new(FakeCartApi::default());
    let cart = CartUseCase::new(api.clone(), logged_in_session().await);

    let refreshed = cart.clear().await.unwrap();
    assert!(refreshed.is_empty());
    assert_eq!(api.fetch_count(), 1);
}

#[tokio::test]
async fn test_product_without_id_is_unusable() {
    let api = Arc::new(FakeCartApi::default());
    let cart = CartUseCase::new(api.clone(), logged_in_session().await);

    let err = cart.add_product(&product(None), 1, "/product").await.unwrap_err();
    assert_eq!(err, FynddError::ProductUnusable);
    assert!(api.adds.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_zero_quantity_rejected() {
    let api = Arc::new(FakeCartApi::default());
    let cart = CartUseCase::new(api, logged_in_session().await);
    let err = cart.add_product(&product(Some("7")), 0, "/product/7").await.unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_add_updates_subtotal_from_fresh_fetch() {
    let api = Arc::new(FakeCartApi::default());
    let cart = CartUseCase::new(api.clone(), logged_in_session().await);

    let refreshed = cart.add_product(&product(Some("7")), 3, "/product/7").await.unwrap();

    assert_eq!(refreshed.item_count(), 3);
    assert_eq!(cart.subtotal().await, 300.0);
}

#[tokio::test]
async fn test_logged_out_add_is_replayed_after_login() {
    let (state, _) = memory_state();
    let session = session_store(&state);
    let cart_api = Arc::new(FakeCartApi::default());
    let cart = CartUseCase::new(cart_api.clone(), session.clone());
    let auth = AuthUseCase::new(Arc::new(FakeAuthApi::with_token("fresh")), session.clone());

    let err = cart.add_product(&product(Some("7")), 2, "/product/7").await.unwrap_err();
    assert!(err.is_not_authenticated());
    assert!(cart_api.adds.lock().unwrap().is_empty());

    let outcome = auth
        .login(&Credentials::new("me@example.com", "secret1"))
        .await
        .unwrap();
    let redirect = outcome.redirect.expect("redirect saved by the deferred add");
    assert_eq!(redirect.from_path, "/product/7");
    let action = redirect.pending_action.expect("pending add");
    assert_eq!(
        action,
        PendingAction::AddToCart {
            product_id: ProductId::from("7"),
            quantity: 2
        }
    );

    cart.replay(&action).await.unwrap();
    assert_eq!(
        cart_api.adds.lock().unwrap().clone(),
        vec![(ProductId::from("7"), 2)]
    );
}

#[tokio::test]
async fn test_server_401_on_add_defers_action() {
    let session = logged_in_session().await;
    let api = Arc::new(FakeCartApi::default());
    *api.reject_auth.lock().unwrap() = true;
    let cart = CartUseCase::new(api, session.clone());

    let err = cart.add_product(&product(Some("9")), 1, "/search").await.unwrap_err();
    assert!(err.is_not_authenticated());
    let intent = session.take_redirect().await.unwrap();
    assert_eq!(intent.from_path, "/search");
}
