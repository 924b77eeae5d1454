//! Immutable point-in-time database state.
//!
//! A [`Snapshot`] is published by every commit and shared read-only through
//! `Arc`. Write transactions mutate a private copy via `Arc::make_mut`;
//! tables are individually `Arc`ed so only the tables a transaction touches
//! are copied.
//!
//! Every mutating operation validates its inputs before changing anything,
//! so a failed operation leaves the snapshot untouched.

use crate::{
    ColKey, ObjKey, ObjectSchema, PropertyFlags, PropertyType, Schema, StoreError, StoreResult,
    TableKey, Value, schema::CLASS_TABLE_PREFIX,
};
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

/// Storage of a single cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Cell {
    Value(Value),
    List(Vec<ObjKey>),
}

/// Column metadata.
#[derive(Debug, Clone)]
pub(crate) struct Column {
    pub(crate) name: String,
    pub(crate) kind: PropertyType,
    pub(crate) flags: PropertyFlags,
    pub(crate) target: Option<TableKey>,
}

impl Column {
    fn default_cell(&self) -> Cell {
        match self.kind {
            PropertyType::Array => Cell::List(Vec::new()),
            PropertyType::Object => Cell::Value(Value::Null),
            _ if self.flags.is_nullable() => Cell::Value(Value::Null),
            PropertyType::Int => Cell::Value(Value::Int(0)),
            PropertyType::Bool => Cell::Value(Value::Bool(false)),
            PropertyType::String => Cell::Value(Value::String(String::new())),
        }
    }

    const fn accepts_null(&self) -> bool {
        self.flags.is_nullable() || matches!(self.kind, PropertyType::Object)
    }

    fn mismatch(&self) -> StoreError {
        StoreError::TypeMismatch { column: self.name.clone(), declared: self.kind }
    }
}

/// Rows and columns of one table.
#[derive(Debug, Clone)]
pub(crate) struct TableData {
    name: String,
    columns: Vec<Column>,
    rows: BTreeMap<ObjKey, Vec<Cell>>,
    next_obj: u64,
}

impl TableData {
    fn new(name: String) -> Self {
        Self { name, columns: Vec::new(), rows: BTreeMap::new(), next_obj: 0 }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    /// Row keys in ascending (creation) order.
    pub(crate) fn keys(&self) -> impl Iterator<Item = ObjKey> + '_ {
        self.rows.keys().copied()
    }

    pub(crate) fn contains(&self, obj: ObjKey) -> bool {
        self.rows.contains_key(&obj)
    }

    pub(crate) fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub(crate) fn column_key(&self, name: &str) -> StoreResult<ColKey> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .map(ColKey)
            .ok_or_else(|| StoreError::NoSuchColumn(name.to_owned()))
    }

    pub(crate) fn column(&self, col: ColKey) -> StoreResult<&Column> {
        self.columns.get(col.0).ok_or_else(|| StoreError::NoSuchColumn(format!("#{}", col.0)))
    }

    /// Returns the column if it holds scalar values (anything but a list).
    pub(crate) fn scalar_column(&self, col: ColKey) -> StoreResult<&Column> {
        let column = self.column(col)?;
        if column.kind == PropertyType::Array {
            return Err(column.mismatch());
        }
        Ok(column)
    }

    /// Returns the column if it holds link lists.
    pub(crate) fn list_column(&self, col: ColKey) -> StoreResult<&Column> {
        let column = self.column(col)?;
        if column.kind != PropertyType::Array {
            return Err(column.mismatch());
        }
        Ok(column)
    }

    fn cells(&self, obj: ObjKey) -> StoreResult<&[Cell]> {
        self.rows.get(&obj).map(Vec::as_slice).ok_or(StoreError::NoSuchObject(obj))
    }

    fn cell_mut(&mut self, obj: ObjKey, col: ColKey) -> StoreResult<&mut Cell> {
        self.rows
            .get_mut(&obj)
            .ok_or(StoreError::NoSuchObject(obj))?
            .get_mut(col.0)
            .ok_or_else(|| StoreError::NoSuchColumn(format!("#{}", col.0)))
    }

    /// Borrow a scalar cell without validation. `None` for lists, missing
    /// rows and missing columns.
    pub(crate) fn value_ref(&self, obj: ObjKey, col: ColKey) -> Option<&Value> {
        match self.rows.get(&obj)?.get(col.0)? {
            Cell::Value(value) => Some(value),
            Cell::List(_) => None,
        }
    }

    pub(crate) fn value(&self, obj: ObjKey, col: ColKey) -> StoreResult<Value> {
        let column = self.scalar_column(col)?;
        match &self.cells(obj)?[col.0] {
            Cell::Value(value) => Ok(value.clone()),
            Cell::List(_) => Err(column.mismatch()),
        }
    }

    pub(crate) fn list(&self, obj: ObjKey, col: ColKey) -> StoreResult<&[ObjKey]> {
        let column = self.list_column(col)?;
        match &self.cells(obj)?[col.0] {
            Cell::List(keys) => Ok(keys),
            Cell::Value(_) => Err(column.mismatch()),
        }
    }

    fn list_mut(&mut self, obj: ObjKey, col: ColKey) -> StoreResult<&mut Vec<ObjKey>> {
        self.list_column(col)?;
        match self.cell_mut(obj, col)? {
            Cell::List(keys) => Ok(keys),
            Cell::Value(_) => Err(StoreError::TypeMismatch {
                column: format!("#{}", col.0),
                declared: PropertyType::Array,
            }),
        }
    }

    fn add_column(&mut self, column: Column) -> StoreResult<ColKey> {
        if self.columns.iter().any(|c| c.name == column.name) {
            return Err(StoreError::ColumnExists(column.name));
        }
        let cell = column.default_cell();
        for cells in self.rows.values_mut() {
            cells.push(cell.clone());
        }
        self.columns.push(column);
        Ok(ColKey(self.columns.len() - 1))
    }

    fn create_row(&mut self) -> ObjKey {
        let key = ObjKey(self.next_obj);
        self.next_obj += 1;
        let cells = self.columns.iter().map(Column::default_cell).collect();
        self.rows.insert(key, cells);
        key
    }

    /// Nulls links and removes list entries pointing at `obj` in `target`.
    fn strip_links(&mut self, target: TableKey, obj: ObjKey) {
        let cols: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.target == Some(target))
            .map(|(i, _)| i)
            .collect();
        for cells in self.rows.values_mut() {
            for &i in &cols {
                match &mut cells[i] {
                    Cell::Value(value) if *value == Value::Link(obj) => *value = Value::Null,
                    Cell::List(keys) => keys.retain(|k| *k != obj),
                    Cell::Value(_) => {}
                }
            }
        }
    }

    fn links_to(&self, target: TableKey) -> bool {
        self.columns.iter().any(|c| c.target == Some(target))
    }
}

/// A complete, versioned database state.
#[derive(Debug, Clone, Default)]
pub(crate) struct Snapshot {
    pub(crate) version: u64,
    next_table: u64,
    tables: BTreeMap<TableKey, Arc<TableData>>,
    names: BTreeMap<String, TableKey>,
    classes: BTreeMap<String, Arc<ObjectSchema>>,
}

impl Snapshot {
    pub(crate) fn table(&self, key: TableKey) -> Option<&TableData> {
        self.tables.get(&key).map(Arc::as_ref)
    }

    pub(crate) fn table_checked(&self, key: TableKey) -> StoreResult<&TableData> {
        self.table(key).ok_or_else(|| StoreError::NoSuchTable(format!("#{}", key.0)))
    }

    fn table_mut(&mut self, key: TableKey) -> StoreResult<&mut TableData> {
        self.tables
            .get_mut(&key)
            .map(Arc::make_mut)
            .ok_or_else(|| StoreError::NoSuchTable(format!("#{}", key.0)))
    }

    pub(crate) fn table_key(&self, name: &str) -> Option<TableKey> {
        self.names.get(name).copied()
    }

    pub(crate) fn table_names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    pub(crate) fn class(&self, name: &str) -> Option<&Arc<ObjectSchema>> {
        self.classes.get(name)
    }

    pub(crate) fn classes(&self) -> impl Iterator<Item = &Arc<ObjectSchema>> {
        self.classes.values()
    }

    pub(crate) fn create_table(&mut self, name: &str) -> StoreResult<TableKey> {
        if self.names.contains_key(name) {
            return Err(StoreError::TableExists(name.to_owned()));
        }
        let key = TableKey(self.next_table);
        self.next_table += 1;
        self.tables.insert(key, Arc::new(TableData::new(name.to_owned())));
        self.names.insert(name.to_owned(), key);
        Ok(key)
    }

    pub(crate) fn remove_table(&mut self, name: &str) -> StoreResult<()> {
        let key = self.table_key(name).ok_or_else(|| StoreError::NoSuchTable(name.to_owned()))?;
        if self.tables.iter().any(|(k, t)| *k != key && t.links_to(key)) {
            return Err(StoreError::TableIsLinkTarget(name.to_owned()));
        }
        self.tables.remove(&key);
        self.names.remove(name);
        self.classes.retain(|_, class| class.table_name() != name);
        Ok(())
    }

    pub(crate) fn add_column(
        &mut self,
        table: TableKey,
        name: &str,
        kind: PropertyType,
        flags: PropertyFlags,
        target: Option<&str>,
    ) -> StoreResult<ColKey> {
        let target = match (kind.is_link(), target) {
            (true, Some(t)) => {
                Some(self.table_key(t).ok_or_else(|| StoreError::NoSuchTable(t.to_owned()))?)
            }
            (false, None) => None,
            _ => return Err(StoreError::LinkTargetMismatch(name.to_owned())),
        };
        self.table_mut(table)?.add_column(Column { name: name.to_owned(), kind, flags, target })
    }

    pub(crate) fn create_row(&mut self, table: TableKey) -> StoreResult<ObjKey> {
        Ok(self.table_mut(table)?.create_row())
    }

    /// Checks that `obj` exists in the table targeted by `column`.
    fn check_link(&self, column: &Column, obj: ObjKey) -> StoreResult<()> {
        let target = column
            .target
            .and_then(|t| self.table(t))
            .ok_or_else(|| StoreError::LinkTargetMismatch(column.name.clone()))?;
        if !target.contains(obj) {
            return Err(StoreError::NoSuchObject(obj));
        }
        Ok(())
    }

    pub(crate) fn set_value(
        &mut self,
        table: TableKey,
        obj: ObjKey,
        col: ColKey,
        value: Value,
    ) -> StoreResult<()> {
        let data = self.table_checked(table)?;
        let column = data.scalar_column(col)?;
        if !data.contains(obj) {
            return Err(StoreError::NoSuchObject(obj));
        }
        if value.is_null() && !column.accepts_null() {
            return Err(StoreError::NotNullable(column.name.clone()));
        }
        if !value.fits(column.kind) {
            return Err(column.mismatch());
        }
        if let Value::Link(target) = value {
            self.check_link(column, target)?;
        }

        *self.table_mut(table)?.cell_mut(obj, col)? = Cell::Value(value);
        Ok(())
    }

    pub(crate) fn list_insert(
        &mut self,
        table: TableKey,
        obj: ObjKey,
        col: ColKey,
        index: Option<usize>,
        target: ObjKey,
    ) -> StoreResult<()> {
        let data = self.table_checked(table)?;
        let column = data.list_column(col)?;
        let len = data.list(obj, col)?.len();
        let index = index.unwrap_or(len);
        if index > len {
            return Err(StoreError::IndexOutOfBounds { index, len });
        }
        self.check_link(column, target)?;

        self.table_mut(table)?.list_mut(obj, col)?.insert(index, target);
        Ok(())
    }

    pub(crate) fn list_remove(
        &mut self,
        table: TableKey,
        obj: ObjKey,
        col: ColKey,
        index: usize,
    ) -> StoreResult<ObjKey> {
        let len = self.table_checked(table)?.list(obj, col)?.len();
        if index >= len {
            return Err(StoreError::IndexOutOfBounds { index, len });
        }
        Ok(self.table_mut(table)?.list_mut(obj, col)?.remove(index))
    }

    pub(crate) fn list_clear(
        &mut self,
        table: TableKey,
        obj: ObjKey,
        col: ColKey,
    ) -> StoreResult<()> {
        self.table_checked(table)?.list(obj, col)?;
        self.table_mut(table)?.list_mut(obj, col)?.clear();
        Ok(())
    }

    /// Removes a row and every link pointing at it.
    pub(crate) fn remove_row(&mut self, table: TableKey, obj: ObjKey) -> StoreResult<()> {
        if !self.table_checked(table)?.contains(obj) {
            return Err(StoreError::NoSuchObject(obj));
        }
        self.table_mut(table)?.rows.remove(&obj);

        let referencing: Vec<TableKey> =
            self.tables.iter().filter(|(_, t)| t.links_to(table)).map(|(k, _)| *k).collect();
        for key in referencing {
            self.table_mut(key)?.strip_links(table, obj);
        }
        Ok(())
    }

    /// Creates tables and columns for new classes and registers their
    /// descriptors. Classes already registered must match exactly.
    pub(crate) fn update_schema(&mut self, schema: &Schema) -> StoreResult<()> {
        let mut pending: Vec<&ObjectSchema> = Vec::new();
        let mut seen = BTreeSet::new();

        for class in schema.iter() {
            match self.classes.get(class.name()) {
                Some(existing) if **existing == *class => continue,
                Some(_) => return Err(StoreError::SchemaMismatch(class.name().to_owned())),
                None => {}
            }
            if !seen.insert(class.name()) {
                if pending.iter().any(|c| *c == class) {
                    continue;
                }
                return Err(StoreError::SchemaMismatch(class.name().to_owned()));
            }
            if self.names.contains_key(&class.table_name()) {
                return Err(StoreError::TableExists(class.table_name()));
            }

            let mut props = BTreeSet::new();
            for prop in class.properties() {
                if !props.insert(prop.name.as_str()) {
                    return Err(StoreError::ColumnExists(prop.name.clone()));
                }
                if prop.kind.is_link() != prop.object_type.is_some() {
                    return Err(StoreError::LinkTargetMismatch(prop.name.clone()));
                }
                if let Some(target) = &prop.object_type {
                    if !self.classes.contains_key(target) && schema.find(target).is_none() {
                        return Err(StoreError::NoSuchObjectSchema(target.clone()));
                    }
                }
            }
            pending.push(class);
        }

        // Tables first, so link columns between new classes resolve.
        let mut created = Vec::with_capacity(pending.len());
        for class in &pending {
            created.push(self.create_table(&class.table_name())?);
        }
        for (class, table) in pending.into_iter().zip(created) {
            for prop in class.properties() {
                let target =
                    prop.object_type.as_deref().map(|t| format!("{CLASS_TABLE_PREFIX}{t}"));
                self.add_column(table, &prop.name, prop.kind, prop.flags, target.as_deref())?;
            }
            self.classes.insert(class.name().to_owned(), Arc::new(class.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Property;

    fn people() -> (Snapshot, TableKey) {
        let mut snapshot = Snapshot::default();
        let schema = Schema::new([
            ObjectSchema::new(
                "person",
                [
                    Property::new("name", PropertyType::String),
                    Property::new("age", PropertyType::Int).nullable(),
                    Property::link("friends", PropertyType::Array, "person"),
                    Property::link("best", PropertyType::Object, "person"),
                ],
            ),
        ]);
        snapshot.update_schema(&schema).unwrap();
        let table = snapshot.table_key("class_person").unwrap();
        (snapshot, table)
    }

    #[test]
    fn defaults_follow_nullability() {
        let (mut snapshot, table) = people();
        let obj = snapshot.create_row(table).unwrap();
        let data = snapshot.table(table).unwrap();
        assert_eq!(data.value(obj, ColKey(0)).unwrap(), Value::from(""));
        assert_eq!(data.value(obj, ColKey(1)).unwrap(), Value::Null);
        assert!(data.list(obj, ColKey(2)).unwrap().is_empty());
        assert_eq!(data.value(obj, ColKey(3)).unwrap(), Value::Null);
    }

    #[test]
    fn set_value_validates_before_writing() {
        let (mut snapshot, table) = people();
        let obj = snapshot.create_row(table).unwrap();

        assert_eq!(
            snapshot.set_value(table, obj, ColKey(0), Value::Null),
            Err(StoreError::NotNullable("name".into()))
        );
        assert_eq!(
            snapshot.set_value(table, obj, ColKey(0), Value::Int(1)),
            Err(StoreError::TypeMismatch { column: "name".into(), declared: PropertyType::String })
        );
        assert_eq!(
            snapshot.set_value(table, obj, ColKey(3), Value::Link(ObjKey(99))),
            Err(StoreError::NoSuchObject(ObjKey(99)))
        );
        assert_eq!(
            snapshot.table(table).unwrap().value(obj, ColKey(0)).unwrap(),
            Value::from("")
        );
    }

    #[test]
    fn removing_a_row_strips_links() {
        let (mut snapshot, table) = people();
        let a = snapshot.create_row(table).unwrap();
        let b = snapshot.create_row(table).unwrap();
        snapshot.list_insert(table, a, ColKey(2), None, b).unwrap();
        snapshot.list_insert(table, a, ColKey(2), None, a).unwrap();
        snapshot.set_value(table, a, ColKey(3), Value::Link(b)).unwrap();

        snapshot.remove_row(table, b).unwrap();

        let data = snapshot.table(table).unwrap();
        assert_eq!(data.list(a, ColKey(2)).unwrap(), &[a]);
        assert_eq!(data.value(a, ColKey(3)).unwrap(), Value::Null);
        assert!(!data.contains(b));
    }

    #[test]
    fn object_keys_are_not_reused() {
        let (mut snapshot, table) = people();
        let a = snapshot.create_row(table).unwrap();
        snapshot.remove_row(table, a).unwrap();
        let b = snapshot.create_row(table).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn recreated_table_gets_fresh_key() {
        let mut snapshot = Snapshot::default();
        let first = snapshot.create_table("t").unwrap();
        snapshot.remove_table("t").unwrap();
        let second = snapshot.create_table("t").unwrap();
        assert_ne!(first, second);
        assert!(snapshot.table(first).is_none());
    }

    #[test]
    fn schema_update_is_idempotent_and_strict() {
        let (mut snapshot, _) = people();
        let same = Schema::from(snapshot.classes().cloned().collect::<Vec<_>>());
        snapshot.update_schema(&same).unwrap();

        let changed = Schema::new([ObjectSchema::new(
            "person",
            [Property::new("name", PropertyType::Int)],
        )]);
        assert_eq!(
            snapshot.update_schema(&changed),
            Err(StoreError::SchemaMismatch("person".into()))
        );

        let dangling = Schema::new([ObjectSchema::new(
            "dog",
            [Property::link("owner", PropertyType::Object, "cat")],
        )]);
        assert_eq!(
            snapshot.update_schema(&dangling),
            Err(StoreError::NoSuchObjectSchema("cat".into()))
        );
        assert!(snapshot.table_key("class_dog").is_none());
    }

    #[test]
    fn linked_table_cannot_be_removed() {
        let mut snapshot = Snapshot::default();
        let a = snapshot.create_table("a").unwrap();
        snapshot.create_table("b").unwrap();
        snapshot
            .add_column(a, "to_b", PropertyType::Object, PropertyFlags::empty(), Some("b"))
            .unwrap();
        assert_eq!(snapshot.remove_table("b"), Err(StoreError::TableIsLinkTarget("b".into())));
        snapshot.remove_table("a").unwrap();
        snapshot.remove_table("b").unwrap();
    }
}
