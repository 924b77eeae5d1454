//! Utility functions for benchmarks.
#![allow(dead_code, unreachable_pub)]

use signet_handover::{Environment, ObjKey, PropertyFlags, PropertyType};

/// Name of the benchmark table.
pub const TABLE: &str = "bench";

/// Generate a cell string for testing.
pub fn get_label(n: u32) -> String {
    format!("label{n}")
}

/// Create an environment holding a table with `num_rows` rows of
/// `(value: Int, label: String)`. Returns the row keys in creation order.
pub fn setup_bench_env(num_rows: u32) -> (Environment, Vec<ObjKey>) {
    let env = Environment::builder().set_name("bench").set_max_pinned_tickets(0).open();

    let txn = env.begin_rw_txn();
    let table = txn.create_table(TABLE).unwrap();
    let value =
        txn.add_column(TABLE, "value", PropertyType::Int, PropertyFlags::INDEXED, None).unwrap();
    let label =
        txn.add_column(TABLE, "label", PropertyType::String, PropertyFlags::empty(), None).unwrap();

    let mut keys = Vec::with_capacity(num_rows as usize);
    for i in 0..num_rows {
        let row = table.add_empty_row().unwrap();
        row.set(value, i64::from(i % 97)).unwrap();
        row.set(label, get_label(i)).unwrap();
        keys.push(row.key());
    }
    txn.commit();
    (env, keys)
}
