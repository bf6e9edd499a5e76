//! Explicit dirty tracking for loaded records.

use crate::{
    Error,
    model::RecordMeta,
    statement::BoundStatement,
    traits::{AccessError, Record},
    value::Value,
};
use std::collections::BTreeSet;

/// Set of field names.
pub type ColumnSet = BTreeSet<String>;

///
/// Tracked
///
/// A record together with the fields loaded from the store, a snapshot of
/// its loaded state, and the fields changed since. Merging walks the dirty
/// fields only.
///

#[derive(Clone, Debug)]
pub struct Tracked<T: Record> {
    loaded: ColumnSet,
    dirty: ColumnSet,
    original: Option<T>,
    current: T,
}

impl<T: Record> Tracked<T> {
    /// Track a record that does not exist in the store yet.
    #[must_use]
    pub const fn new(record: T) -> Self {
        Self {
            loaded: ColumnSet::new(),
            dirty: ColumnSet::new(),
            original: None,
            current: record,
        }
    }

    /// Track a record hydrated from the store with the given fields.
    #[must_use]
    pub fn loaded<I, S>(record: T, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            loaded: fields.into_iter().map(Into::into).collect(),
            dirty: ColumnSet::new(),
            original: Some(record.clone()),
            current: record,
        }
    }

    /// Track a record hydrated with every column of `meta`.
    #[must_use]
    pub fn loaded_all(record: T, meta: &RecordMeta) -> Self {
        Self::loaded(record, meta.columns().keys().copied())
    }

    #[must_use]
    pub const fn get(&self) -> &T {
        &self.current
    }

    #[must_use]
    pub const fn original(&self) -> Option<&T> {
        self.original.as_ref()
    }

    #[must_use]
    pub const fn loaded_fields(&self) -> &ColumnSet {
        &self.loaded
    }

    #[must_use]
    pub const fn dirty(&self) -> &ColumnSet {
        &self.dirty
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    #[must_use]
    pub fn into_inner(self) -> T {
        self.current
    }

    /// Write one field and mark it dirty.
    pub fn set(&mut self, field: &str, value: Value) -> Result<(), AccessError> {
        self.current.set_field(field, value)?;
        self.dirty.insert(field.to_string());

        Ok(())
    }

    /// Mutate the record directly; `fields` are marked dirty.
    pub fn modify<F>(&mut self, fields: &[&str], f: F)
    where
        F: FnOnce(&mut T),
    {
        f(&mut self.current);
        self.dirty.extend(fields.iter().map(ToString::to_string));
    }

    /// Mark every loaded column whose value differs from the snapshot.
    pub fn detect_changes(&mut self, meta: &RecordMeta) -> Result<(), AccessError> {
        let Some(original) = &self.original else {
            return Ok(());
        };

        for column in meta.columns().values() {
            let field = column.field_name();
            if !self.loaded.contains(field) || self.dirty.contains(field) {
                continue;
            }

            if column.get_value(original)? != column.get_value(&self.current)? {
                self.dirty.insert(field.to_string());
            }
        }

        Ok(())
    }

    /// One UPDATE assigning only the dirty columns, with the encoded column
    /// values followed by the encoded key values. `None` when nothing changed.
    pub fn merge_statement(&self, meta: &RecordMeta) -> Result<Option<BoundStatement>, Error> {
        let columns: Vec<_> = meta
            .columns()
            .values()
            .filter(|c| self.dirty.contains(c.field_name()))
            .collect();
        if columns.is_empty() {
            return Ok(None);
        }

        let names: Vec<&str> = columns.iter().map(|c| c.field_name()).collect();
        let update = meta.statements().update_columns(&names, None)?;

        let mut values = Vec::with_capacity(columns.len() + 2);
        for column in &columns {
            values.push(column.transcoder().encode(&column.get_value(&self.current)?)?);
        }

        let only_static = columns.iter().all(|c| c.structure().is_static());
        values.extend(meta.transcoding().encode_primary_key(&self.current, only_static)?);

        tracing::debug!(
            entity = meta.type_name(),
            dirty = names.len(),
            "merged dirty columns"
        );

        Ok(Some(BoundStatement {
            query: update.to_string(),
            values,
        }))
    }

    /// Accept the current state as persisted.
    pub fn commit(&mut self) {
        self.loaded.append(&mut self.dirty);
        self.original = Some(self.current.clone());
    }
}

///
/// TESTS
///
