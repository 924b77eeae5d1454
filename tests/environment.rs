#![allow(missing_docs)]
use signet_handover::*;

#[test]
fn test_open() {
    let env = Environment::builder().open();
    assert_eq!(env.name(), "default");
    assert_eq!(env.latest_version(), 0);

    let env = Environment::builder().set_name("named").open();
    assert_eq!(env.name(), "named");
}

#[test]
fn test_begin_txn() {
    let env = Environment::builder().open();
    let rw = env.begin_rw_txn();
    let ro = env.begin_ro_txn();
    assert_eq!(rw.version(), 0);
    assert_eq!(ro.version(), 0);
    assert!(ro.table_names().is_empty());
}

#[test]
fn test_clones_share_state() {
    let env = Environment::builder().open();
    let clone = env.clone();
    assert!(env.ptr_eq(&clone));
    assert!(!env.ptr_eq(&Environment::builder().open()));

    let txn = clone.begin_rw_txn();
    txn.create_table("t").unwrap();
    txn.commit();
    assert_eq!(env.latest_version(), 1);
    assert!(env.begin_ro_txn().has_table("t"));
}

#[test]
fn test_info() {
    let env = Environment::builder().open();
    let info = env.info();
    assert_eq!(info.latest_version(), 0);
    assert_eq!(info.pinned_tickets(), 0);
    assert_eq!(info.oldest_pinned_version(), None);

    let txn = env.begin_rw_txn();
    txn.create_table("t").unwrap();
    txn.commit();

    let txn = env.begin_ro_txn();
    let ticket = txn.open_table("t").unwrap().export_for_handover().unwrap();
    let info = env.info();
    assert_eq!(info.latest_version(), 1);
    assert_eq!(info.pinned_tickets(), 1);
    assert_eq!(info.oldest_pinned_version(), Some(1));

    drop(ticket);
    assert_eq!(env.info().pinned_tickets(), 0);
}

#[test]
fn test_unlimited_pins() {
    let env = Environment::builder().set_max_pinned_tickets(0).open();
    let txn = env.begin_rw_txn();
    txn.create_table("t").unwrap();
    txn.commit();

    let txn = env.begin_ro_txn();
    let table = txn.open_table("t").unwrap();
    let tickets: Vec<_> = (0..2048).map(|_| table.export_for_handover().unwrap()).collect();
    assert_eq!(env.info().pinned_tickets(), 2048);
    drop(tickets);
    assert_eq!(env.info().pinned_tickets(), 0);
}
