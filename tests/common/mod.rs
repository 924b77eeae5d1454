//! Shared fixture: three classes mirroring a typical object model.
//!
//! - `string_object` with a nullable `value: String`
//! - `int_object` with `value: Int`
//! - `int_array_object` with `value: Array<int_object>`
#![allow(missing_docs, dead_code)]
use signet_handover::{
    Environment, ObjectSchema, Property, PropertyType, Results, Row, Schema, TransactionKind,
};

pub const STRING_OBJECT: &str = "string_object";
pub const INT_OBJECT: &str = "int_object";
pub const INT_ARRAY_OBJECT: &str = "int_array_object";

pub fn schema() -> Schema {
    Schema::new([
        ObjectSchema::new(STRING_OBJECT, [Property::new("value", PropertyType::String).nullable()]),
        ObjectSchema::new(INT_OBJECT, [Property::new("value", PropertyType::Int)]),
        ObjectSchema::new(
            INT_ARRAY_OBJECT,
            [Property::link("value", PropertyType::Array, INT_OBJECT)],
        ),
    ])
}

/// Opens an environment with the fixture schema committed at version 1.
pub fn setup() -> Environment {
    setup_with(&mut Environment::builder())
}

pub fn setup_with(builder: &mut signet_handover::EnvironmentBuilder) -> Environment {
    let env = builder.set_name("test").open();
    let txn = env.begin_rw_txn();
    txn.update_schema(&schema()).unwrap();
    assert_eq!(txn.commit(), 1);
    env
}

/// Reads the `value` column of an `int_object` row.
pub fn int_value<K: TransactionKind>(row: Row<'_, K>) -> i64 {
    let col = row.table().column_key("value").unwrap();
    row.get_as(col).unwrap()
}

/// Reads the `value` column of every `string_object` row in `results`.
pub fn string_values<K: TransactionKind>(results: &Results<'_, K>) -> Vec<String> {
    let col = results.get_query().table().column_key("value").unwrap();
    results.rows().unwrap().into_iter().map(|row| row.get_as(col).unwrap()).collect()
}
