//! Property-based tests for arbitrary values, queries and handovers.
//!
//! Query and sort results are checked against a plain `Vec` model; handover
//! imports are checked against the version ordering of the snapshots
//! involved.
#![allow(missing_docs)]
mod common;

use proptest::prelude::*;
use signet_handover::*;

/// Strategy for a nullable integer cell.
fn arb_cell() -> impl Strategy<Value = Option<i64>> {
    prop::option::of(-50i64..50)
}

/// Strategy for a comparison operator.
fn arb_op() -> impl Strategy<Value = CompareOp> {
    prop_oneof![
        Just(CompareOp::Equal),
        Just(CompareOp::NotEqual),
        Just(CompareOp::Greater),
        Just(CompareOp::GreaterEqual),
        Just(CompareOp::Less),
        Just(CompareOp::LessEqual),
    ]
}

/// Model of [`Condition::matches`] for a nullable integer column compared to
/// an integer operand.
fn model_matches(cell: Option<i64>, op: CompareOp, operand: i64) -> bool {
    match (op, cell) {
        (CompareOp::Equal, cell) => cell == Some(operand),
        (CompareOp::NotEqual, cell) => cell != Some(operand),
        (_, None) => false,
        (CompareOp::Greater, Some(v)) => v > operand,
        (CompareOp::GreaterEqual, Some(v)) => v >= operand,
        (CompareOp::Less, Some(v)) => v < operand,
        (CompareOp::LessEqual, Some(v)) => v <= operand,
    }
}

/// Commits a table `t` with a nullable `n: Int` column and an `id: Int`
/// column holding each row's position.
fn setup_cells(cells: &[Option<i64>]) -> Environment {
    let env = Environment::builder().open();
    let txn = env.begin_rw_txn();
    let table = txn.create_table("t").unwrap();
    let n = txn.add_column("t", "n", PropertyType::Int, PropertyFlags::NULLABLE, None).unwrap();
    let id = txn.add_column("t", "id", PropertyType::Int, PropertyFlags::empty(), None).unwrap();
    for (i, cell) in cells.iter().enumerate() {
        let row = table.add_empty_row().unwrap();
        row.set(n, *cell).unwrap();
        row.set(id, i as i64).unwrap();
    }
    txn.commit();
    env
}

fn ids<K: TransactionKind>(rows: &[Row<'_, K>]) -> Vec<i64> {
    rows.iter().map(|row| row.get_as::<i64>(ColKey(1)).unwrap()).collect()
}

// =============================================================================
// Values
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Arbitrary strings survive a commit unchanged.
    #[test]
    fn set_get_arbitrary_string(value in ".{0,64}") {
        let env = common::setup();
        let txn = env.begin_rw_txn();
        let key = {
            let object = Object::create(&txn, common::STRING_OBJECT).unwrap();
            object.set("value", value.as_str()).unwrap();
            object.row().key()
        };
        txn.commit();

        let txn = env.begin_ro_txn();
        let object = Object::from_key(&txn, common::STRING_OBJECT, key).unwrap();
        prop_assert_eq!(object.get_as::<String>("value").unwrap(), value);
    }

    /// Reading an arbitrary row or column returns an error, never a panic.
    #[test]
    fn get_arbitrary_keys_does_not_panic(obj in any::<u64>(), index in any::<usize>()) {
        let env = common::setup();
        let txn = env.begin_ro_txn();
        let table = txn.open_table("class_int_object").unwrap();
        prop_assert!(table.get(ObjKey(obj)).is_err());
        prop_assert!(table.row_at(index).is_err());
    }
}

// =============================================================================
// Queries and sorting
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Query evaluation agrees with a filtered model, in creation order.
    #[test]
    fn query_matches_model(
        cells in prop::collection::vec(arb_cell(), 0..40),
        op in arb_op(),
        operand in -50i64..50,
    ) {
        let env = setup_cells(&cells);
        let txn = env.begin_ro_txn();
        let table = txn.open_table("t").unwrap();
        let results = Results::new(table.where_().filter(ColKey(0), op, operand));

        let expected: Vec<i64> = cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| model_matches(**cell, op, operand))
            .map(|(i, _)| i as i64)
            .collect();
        prop_assert_eq!(results.len().unwrap(), expected.len());
        prop_assert_eq!(ids(&results.rows().unwrap()), expected);
    }

    /// Sorting is stable and orders nulls first, matching `Vec::sort_by_key`.
    #[test]
    fn sort_matches_model(
        cells in prop::collection::vec(arb_cell(), 0..40),
        ascending in any::<bool>(),
    ) {
        let env = setup_cells(&cells);
        let txn = env.begin_ro_txn();
        let table = txn.open_table("t").unwrap();
        let results = Results::new(table.where_()).sort(SortDescriptor::by(ColKey(0), ascending));

        let mut expected: Vec<(usize, Option<i64>)> = cells.iter().copied().enumerate().collect();
        if ascending {
            expected.sort_by(|a, b| a.1.cmp(&b.1));
        } else {
            expected.sort_by(|a, b| b.1.cmp(&a.1));
        }
        let expected: Vec<i64> = expected.into_iter().map(|(i, _)| i as i64).collect();
        prop_assert_eq!(ids(&results.rows().unwrap()), expected);
    }

    /// A handed-over `Results` keeps its query and sort on another thread.
    #[test]
    fn results_handover_preserves_order(
        cells in prop::collection::vec(arb_cell(), 0..40),
        operand in -50i64..50,
        ascending in any::<bool>(),
    ) {
        let env = setup_cells(&cells);
        let txn = env.begin_ro_txn();
        let table = txn.open_table("t").unwrap();
        let results = Results::with_sort(
            table.where_().greater_equal(ColKey(0), operand),
            SortDescriptor::by(ColKey(0), ascending),
        );
        let before = ids(&results.rows().unwrap());
        let handover = ThreadConfined::from(results).export_for_handover().unwrap();

        let after = std::thread::spawn(move || {
            let txn = env.begin_ro_txn();
            let imported = handover.import_from_handover(&txn).unwrap();
            ids(&imported.get_results().rows().unwrap())
        })
        .join()
        .unwrap();
        prop_assert_eq!(before, after);
    }
}

// =============================================================================
// Versions and operation sequences
// =============================================================================

#[derive(Debug, Clone)]
enum Op {
    Add(i64),
    Set(usize, i64),
    Remove(usize),
    Commit,
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        3 => any::<i64>().prop_map(Op::Add),
        2 => (any::<usize>(), any::<i64>()).prop_map(|(i, v)| Op::Set(i, v)),
        1 => any::<usize>().prop_map(Op::Remove),
        1 => Just(Op::Commit),
    ];
    prop::collection::vec(op, 0..48)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Import succeeds exactly when the importer reads the exporting snapshot
    /// or a newer one.
    #[test]
    fn import_respects_version_order(commits in 1usize..8, from in 0usize..8, into in 0usize..8) {
        let from = from % (commits + 1);
        let into = into % (commits + 1);

        let env = common::setup();
        let mut readers = vec![env.begin_ro_txn()];
        for _ in 0..commits {
            let txn = env.begin_rw_txn();
            Object::create(&txn, common::INT_OBJECT).unwrap();
            txn.commit();
            readers.push(env.begin_ro_txn());
        }

        let ticket =
            readers[from].open_table("class_int_object").unwrap().export_for_handover().unwrap();
        let exported = readers[from].version();
        let current = readers[into].version();
        match ticket.import(&readers[into]) {
            Ok(table) => {
                prop_assert!(into >= from);
                prop_assert_eq!(table.len().unwrap(), into);
            }
            Err(err) => {
                prop_assert!(into < from);
                prop_assert_eq!(err, StoreError::HandoverVersionIncompatible { exported, current });
            }
        }
        prop_assert_eq!(env.info().pinned_tickets(), 0);
    }

    /// Arbitrary write sequences leave the table equal to the model, and row
    /// tickets exported before the writes import only for surviving rows.
    #[test]
    fn op_sequence_matches_model(ops in arb_ops()) {
        let env = common::setup_with(Environment::builder().set_max_pinned_tickets(0));
        let mut model: Vec<(ObjKey, i64)> = Vec::new();
        let mut tickets: Vec<(ObjKey, RowTicket)> = Vec::new();

        let mut txn = env.begin_rw_txn();
        for op in ops {
            let table = txn.open_table("class_int_object").unwrap();
            let col = table.column_key("value").unwrap();
            match op {
                Op::Add(value) => {
                    let row = table.add_empty_row().unwrap();
                    row.set(col, value).unwrap();
                    model.push((row.key(), value));
                }
                Op::Set(_, _) | Op::Remove(_) if model.is_empty() => {}
                Op::Set(i, value) => {
                    let len = model.len();
                    let slot = &mut model[i % len];
                    table.get(slot.0).unwrap().set(col, value).unwrap();
                    slot.1 = value;
                }
                Op::Remove(i) => {
                    let (key, _) = model.remove(i % model.len());
                    table.remove(key).unwrap();
                }
                Op::Commit => {
                    txn.commit();
                    let reader = env.begin_ro_txn();
                    let table = reader.open_table("class_int_object").unwrap();
                    for (key, _) in &model {
                        let ticket = table.get(*key).unwrap().export_for_handover().unwrap();
                        tickets.push((*key, ticket));
                    }
                    drop(reader);
                    txn = env.begin_rw_txn();
                }
            }
        }
        txn.commit();

        let reader = env.begin_ro_txn();
        let table = reader.open_table("class_int_object").unwrap();
        let col = table.column_key("value").unwrap();
        let actual: Vec<(ObjKey, i64)> = table
            .keys()
            .unwrap()
            .into_iter()
            .map(|key| (key, table.get(key).unwrap().get_as(col).unwrap()))
            .collect();
        prop_assert_eq!(&actual, &model);

        for (key, ticket) in tickets {
            let alive = model.iter().any(|(k, _)| *k == key);
            match ticket.import(&reader) {
                Ok(row) => prop_assert!(alive && row.key() == key),
                Err(err) => {
                    prop_assert!(!alive);
                    prop_assert_eq!(err, StoreError::HandoverTargetGone(HandoverTarget::Row));
                }
            }
        }
        prop_assert_eq!(env.info().pinned_tickets(), 0);
    }
}
