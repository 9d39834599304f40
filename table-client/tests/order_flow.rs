//! End-to-end flow: menu -> cart -> checkout -> submit -> tracking

use shared::models::Product;
use shared::order::{OrderType, PersistedOrder};
use table_client::codec::decode_state;
use table_client::storage::{self, KvStore};
use table_client::tracking::TrackingStage;
use table_client::{CartStore, CheckoutSession, TrackingProjector};

fn open_store(dir: &tempfile::TempDir) -> KvStore {
    KvStore::open(dir.path().join("flow.redb")).expect("open store")
}

fn menu() -> Vec<Product> {
    let mut katsu = Product::new(5, "Nasi Katsu", 13000);
    katsu.image = Some("/img/katsu.jpg".into());
    vec![
        Product::new(1, "Teh Manis", 3000),
        Product::new(2, "Es Beng Beng", 5000),
        katsu,
    ]
}

#[test]
fn full_order_flow() {
    let dir = tempfile::tempdir().expect("tempdir");
    let kv = open_store(&dir);
    let menu = menu();

    // Guest builds a cart on the menu page
    let mut cart = CartStore::load(kv.clone());
    cart.add_product(5);
    cart.add_product(5);
    cart.add_product(1);
    assert_eq!(cart.total_item_count(), 3);

    // Cart hands its lines to checkout through the state token
    let lines = cart.checkout_lines(&menu);
    let state = shared::order::OrderState { items: lines, ..Default::default() };
    let token = table_client::encode_state(&state);

    let mut session = CheckoutSession::open(kv.clone(), Some(&token));
    assert_eq!(session.draft().subtotal, 2 * 13000 + 3000);

    // One more drink from the suggestions, notes, takeaway
    session.add_addon(&menu[1]);
    session.set_order_type(OrderType::Takeaway);
    session.open_notes();
    session.edit_notes_draft("sambal terpisah");
    session.save_notes();

    let submission = session.submit().expect("submit succeeds");
    assert!(submission.order.order_id.starts_with("MP"));
    assert_eq!(submission.order.subtotal, 2 * 13000 + 3000 + 5000);
    assert_eq!(submission.order.order_type, OrderType::Takeaway);
    assert_eq!(submission.order.notes.as_deref(), Some("sambal terpisah"));

    // Submit replaced the cart with the order record
    let reloaded = CartStore::load(kv.clone());
    assert!(reloaded.is_empty());
    let stored: Option<PersistedOrder> = kv.get_json(storage::ORDER_STATE_KEY).unwrap();
    assert_eq!(stored.unwrap().order_id, submission.order.order_id);

    // The token carries the full state into tracking
    let carried = decode_state(Some(&submission.token));
    assert_eq!(carried.items.len(), 3);
    assert_eq!(carried.subtotal, Some(submission.order.subtotal));

    let tracker = TrackingProjector::open_system(&kv, Some(&submission.token));
    assert_eq!(tracker.stage(), TrackingStage::Received);
    assert!((1..=5).contains(&tracker.queue_number()));
}

#[test]
fn tracking_recovers_after_reload_without_token() {
    let dir = tempfile::tempdir().expect("tempdir");
    let kv = open_store(&dir);

    let mut cart = CartStore::load(kv.clone());
    cart.add_product(2);
    let state = shared::order::OrderState {
        items: cart.checkout_lines(&menu()),
        ..Default::default()
    };
    let token = table_client::encode_state(&state);
    let mut session = CheckoutSession::open(kv.clone(), Some(&token));
    let submission = session.submit().expect("submit succeeds");

    // Reload with no token at all, as after closing the browser
    let tracker = TrackingProjector::open_system(&kv, None);
    assert_eq!(tracker.order_id(), Some(submission.order.order_id.as_str()));
    assert_eq!(tracker.state().subtotal, Some(5000));
}

#[test]
fn returning_to_menu_keeps_checkout_inputs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let kv = open_store(&dir);

    let mut cart = CartStore::load(kv.clone());
    cart.add_product(1);
    let state = shared::order::OrderState {
        items: cart.checkout_lines(&menu()),
        ..Default::default()
    };
    let token = table_client::encode_state(&state);

    let mut session = CheckoutSession::open(kv.clone(), Some(&token));
    session.set_order_type(OrderType::Delivery);
    session.set_location("Gazebo belakang");

    // Guest goes back to the menu and returns with a fresh token
    let fresh = CheckoutSession::open(kv, Some(&token));
    assert_eq!(fresh.draft().location, "Gazebo belakang");
}
