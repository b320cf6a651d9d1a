//! End-to-end order lifecycle against the in-memory store alone, mirroring
//! the gateway -> store data flow without going through the WAL.

use orderwal_store::types::{OrderType, PlaceOrderRequest, Side, TimeInForce};
use orderwal_store::OrderStore;

fn place(coid: &str, symbol: &str, qty: f64, price: Option<f64>) -> PlaceOrderRequest {
    PlaceOrderRequest {
        client_order_id: coid.to_string(),
        symbol: symbol.to_string(),
        side: Side::Buy,
        order_type: OrderType::Limit,
        tif: TimeInForce::GTC,
        qty,
        price,
    }
}

#[test]
fn basic_lifecycle_reaches_filled_with_correct_vwap() {
    let store = OrderStore::new();
    store.note_order_params(&place("A", "BTCUSDT", 2.0, Some(50000.0)));
    store.apply_order_update("A", "", "", "V1", "NEW", "", 1000);
    store.apply_fill("A", "BTCUSDT", 0.5, 50000.0, 2000);
    store.apply_fill("A", "BTCUSDT", 1.0, 49990.0, 3000);
    store.apply_fill("A", "BTCUSDT", 0.5, 50010.0, 4000);

    let order = store.get("A").expect("order must exist");
    assert_eq!(order.status, "FILLED");
    assert!((order.executed_qty - 2.0).abs() < 1e-9);
    assert!(order.avg_price > 49997.0 && order.avg_price < 49998.0);
    assert_eq!(order.venue_order_id, "V1");
    assert!(order.created_ts_ns <= order.last_ts_ns);
}

#[test]
fn partial_fills_stay_non_terminal_until_quantity_reached() {
    let store = OrderStore::new();
    store.note_order_params(&place("B", "ETHUSDT", 10.0, Some(2000.0)));
    store.apply_fill("B", "ETHUSDT", 4.0, 2000.0, 1);
    assert_eq!(store.get("B").unwrap().status, "PARTIALLY_FILLED");
    assert_eq!(store.count_pending(), 1);
    assert_eq!(store.count_terminal(), 0);

    store.apply_fill("B", "ETHUSDT", 6.0, 1990.0, 2);
    assert_eq!(store.get("B").unwrap().status, "FILLED");
    assert_eq!(store.count_terminal(), 1);
}

#[test]
fn market_order_without_limit_price_still_fills() {
    let store = OrderStore::new();
    store.note_order_params(&place("C", "BTCUSDT", 1.0, None));
    store.apply_fill("C", "BTCUSDT", 1.0, 49000.0, 1);
    let order = store.get("C").unwrap();
    assert_eq!(order.status, "FILLED");
    assert!(order.limit_price.is_none());
}

#[test]
fn rejected_order_never_accumulates_quantity_via_update_but_fill_still_does() {
    let store = OrderStore::new();
    store.note_order_params(&place("X", "BTCUSDT", 1.0, None));
    store.apply_order_update("X", "", "", "", "CANCELED", "", 100);
    store.apply_fill("X", "", 1.0, 100.0, 200);

    let order = store.get("X").unwrap();
    assert_eq!(order.status, "CANCELED");
    assert!((order.executed_qty - 1.0).abs() < 1e-9);
}

#[test]
fn unknown_order_returns_none() {
    let store = OrderStore::new();
    assert!(store.get("nonexistent").is_none());
}
