//! File rotation by size threshold and retention cleanup (spec scenario
//! S3, §4.3 "Retention").

use orderwal_store::types::{OrderType, PlaceOrderRequest, Side, TimeInForce};
use orderwal_store::wal::WalConfig;
use orderwal_store::{OrderStore, OrderWal};
use tempfile::tempdir;

fn place(coid: &str) -> PlaceOrderRequest {
    PlaceOrderRequest {
        client_order_id: coid.to_string(),
        symbol: "BTCUSDT".to_string(),
        side: Side::Buy,
        order_type: OrderType::Limit,
        tif: TimeInForce::GTC,
        qty: 1.0,
        price: Some(100.0),
    }
}

fn count_wal_files(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".wal"))
        .count()
}

#[test]
fn scenario_s3_fifty_orders_under_tight_file_size_rotate_and_replay_fully() {
    let dir = tempdir().unwrap();
    let wal = OrderWal::open(WalConfig {
        directory: dir.path().to_path_buf(),
        max_file_size: 1024,
        ..WalConfig::default()
    })
    .unwrap();

    for i in 0..50 {
        wal.log_order_new(&place(&format!("ORD{i}")));
    }

    let stats = wal.stats();
    assert!(stats.rotations >= 1);
    assert!(count_wal_files(dir.path()) >= 2);
    assert_eq!(stats.current_sequence, 50);

    let store = OrderStore::new();
    wal.replay_into(&store).unwrap();
    assert_eq!(store.count(), 50);
}

#[test]
fn manual_rotate_appends_marker_and_opens_next_file() {
    let dir = tempdir().unwrap();
    let wal = OrderWal::open(WalConfig {
        directory: dir.path().to_path_buf(),
        ..WalConfig::default()
    })
    .unwrap();

    wal.log_order_new(&place("A"));
    let before = wal.stats().current_sequence;
    let rotated_seq = wal.rotate();
    assert_eq!(rotated_seq, before + 1);
    assert_eq!(wal.stats().rotations, 1);
    assert_eq!(count_wal_files(dir.path()), 2);
}

#[test]
fn cleanup_old_files_keeps_only_max_files_most_recent() {
    let dir = tempdir().unwrap();
    let wal = OrderWal::open(WalConfig {
        directory: dir.path().to_path_buf(),
        max_file_size: 64,
        max_files: 3,
        ..WalConfig::default()
    })
    .unwrap();

    for i in 0..30 {
        wal.log_order_new(&place(&format!("ORD{i}")));
    }
    assert!(count_wal_files(dir.path()) > 3);

    wal.cleanup_old_files().unwrap();
    assert_eq!(count_wal_files(dir.path()), 3);
}

#[test]
fn cleanup_is_a_no_op_when_under_the_limit() {
    let dir = tempdir().unwrap();
    let wal = OrderWal::open(WalConfig {
        directory: dir.path().to_path_buf(),
        max_files: 8,
        ..WalConfig::default()
    })
    .unwrap();
    wal.log_order_new(&place("A"));
    wal.cleanup_old_files().unwrap();
    assert_eq!(count_wal_files(dir.path()), 1);
}
