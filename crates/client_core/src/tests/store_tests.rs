use super::*;
use std::{collections::HashSet, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct CollectionState {
    cart: Arc<Mutex<Vec<CartItem>>>,
    failing_deletes: Arc<HashSet<i64>>,
}

async fn list_inventory() -> Json<Value> {
    Json(json!([
        {"id": 1, "content": "Widget"},
        {"id": 2, "content": "Gadget", "amount": 7}
    ]))
}

async fn list_cart(State(state): State<CollectionState>) -> Json<Vec<CartItem>> {
    Json(state.cart.lock().await.clone())
}

async fn create_line(
    State(state): State<CollectionState>,
    Json(item): Json<NewCartItem>,
) -> (StatusCode, Json<CartItem>) {
    let line = CartItem::from(item);
    state.cart.lock().await.push(line.clone());
    (StatusCode::CREATED, Json(line))
}

async fn patch_line(
    State(state): State<CollectionState>,
    Path(id): Path<i64>,
    Json(body): Json<AmountPatch>,
) -> Result<Json<CartItem>, StatusCode> {
    let mut cart = state.cart.lock().await;
    let line = cart
        .iter_mut()
        .find(|line| line.id == ItemId(id))
        .ok_or(StatusCode::NOT_FOUND)?;
    line.amount = body.amount;
    Ok(Json(line.clone()))
}

async fn delete_line(State(state): State<CollectionState>, Path(id): Path<i64>) -> StatusCode {
    if state.failing_deletes.contains(&id) {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    let mut cart = state.cart.lock().await;
    let before = cart.len();
    cart.retain(|line| line.id != ItemId(id));
    if cart.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    }
}

async fn spawn_collection_server(state: CollectionState) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new()
        .route("/inventory", get(list_inventory))
        .route("/cart", get(list_cart).post(create_line))
        .route("/cart/:id", patch(patch_line).delete(delete_line))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

fn seeded(lines: Vec<CartItem>, failing: &[i64]) -> CollectionState {
    CollectionState {
        cart: Arc::new(Mutex::new(lines)),
        failing_deletes: Arc::new(failing.iter().copied().collect()),
    }
}

#[tokio::test]
async fn fetch_inventory_starts_every_item_unstaged() {
    let url = spawn_collection_server(CollectionState::default()).await;
    let store = HttpRemoteStore::new(&url).expect("store");

    let inventory = store.fetch_inventory().await.expect("inventory");

    assert_eq!(
        inventory,
        vec![
            InventoryItem::new(ItemId(1), "Widget"),
            InventoryItem::new(ItemId(2), "Gadget"),
        ]
    );
}

#[tokio::test]
async fn create_then_patch_returns_canonical_records() {
    let state = CollectionState::default();
    let url = spawn_collection_server(state.clone()).await;
    let store = HttpRemoteStore::new(&url).expect("store");

    let created = store
        .create_cart_item(NewCartItem {
            id: ItemId(1),
            content: "Widget".into(),
            amount: 2,
        })
        .await
        .expect("create");
    assert_eq!(created, CartItem::new(ItemId(1), "Widget", 2));

    let updated = store.update_cart_item(ItemId(1), 5).await.expect("update");
    assert_eq!(updated, CartItem::new(ItemId(1), "Widget", 5));
    assert_eq!(
        store.fetch_cart().await.expect("cart"),
        vec![CartItem::new(ItemId(1), "Widget", 5)]
    );
}

#[tokio::test]
async fn patch_on_missing_line_is_not_found() {
    let url = spawn_collection_server(CollectionState::default()).await;
    let store = HttpRemoteStore::new(&url).expect("store");

    let err = store
        .update_cart_item(ItemId(9), 3)
        .await
        .expect_err("no such line");

    assert_eq!(err, StoreError::NotFound(ItemId(9)));
}

#[tokio::test]
async fn deleting_an_absent_line_is_tolerated() {
    let url = spawn_collection_server(CollectionState::default()).await;
    let store = HttpRemoteStore::new(&url).expect("store");

    store
        .delete_cart_item(ItemId(4))
        .await
        .expect("404 on delete is success");
}

#[tokio::test]
async fn server_error_maps_to_network_error() {
    let url = spawn_collection_server(seeded(
        vec![CartItem::new(ItemId(3), "Gizmo", 1)],
        &[3],
    ))
    .await;
    let store = HttpRemoteStore::new(&url).expect("store");

    let err = store.delete_cart_item(ItemId(3)).await.expect_err("500");

    match err {
        StoreError::Network(message) => assert!(message.contains("500"), "{message}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_store_is_network_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let store = HttpRemoteStore::new(&format!("http://{addr}")).expect("store");

    let err = store.fetch_cart().await.expect_err("nothing listening");

    assert!(matches!(err, StoreError::Network(_)), "{err:?}");
}

#[tokio::test]
async fn hung_request_times_out_as_network_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new().route(
        "/cart",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!([]))
        }),
    );
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let store = HttpRemoteStore::with_timeout(&format!("http://{addr}"), Duration::from_millis(100))
        .expect("store");

    let started = std::time::Instant::now();
    let err = store.fetch_cart().await.expect_err("request times out");

    assert!(matches!(err, StoreError::Network(_)), "{err:?}");
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn checkout_deletes_every_server_line() {
    let state = seeded(
        vec![
            CartItem::new(ItemId(1), "Widget", 2),
            CartItem::new(ItemId(2), "Gadget", 1),
        ],
        &[],
    );
    let url = spawn_collection_server(state.clone()).await;
    let store = HttpRemoteStore::new(&url).expect("store");

    store.checkout().await.expect("checkout");

    assert!(state.cart.lock().await.is_empty());
}

#[tokio::test]
async fn checkout_surfaces_partial_failure() {
    let state = seeded(
        vec![
            CartItem::new(ItemId(1), "Widget", 2),
            CartItem::new(ItemId(2), "Gadget", 1),
        ],
        &[2],
    );
    let url = spawn_collection_server(state.clone()).await;
    let store = HttpRemoteStore::new(&url).expect("store");

    let err = store.checkout().await.expect_err("one delete fails");

    match &err {
        StoreError::PartialCheckout { removed, .. } => assert_eq!(removed, &vec![ItemId(1)]),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.failed_ids(), vec![ItemId(2)]);
    assert_eq!(
        *state.cart.lock().await,
        vec![CartItem::new(ItemId(2), "Gadget", 1)]
    );
}

#[test]
fn rejects_unusable_base_urls() {
    assert!(matches!(
        HttpRemoteStore::new("not a url"),
        Err(StoreError::InvalidBaseUrl(_))
    ));
    assert!(matches!(
        HttpRemoteStore::new("ftp://localhost:3000"),
        Err(StoreError::InvalidBaseUrl(_))
    ));
}

#[test]
fn trims_trailing_slash_from_base_url() {
    let store = HttpRemoteStore::with_timeout("http://localhost:3000/", Duration::from_secs(2))
        .expect("store");
    assert_eq!(store.base_url(), "http://localhost:3000");
}
