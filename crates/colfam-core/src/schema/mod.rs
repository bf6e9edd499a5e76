//! Table DDL generation and live schema validation.

mod ddl;
mod live;
mod update;
mod validate;


use crate::{
    model::{ColumnMeta, RecordMeta},
    value::CqlType,
};
use thiserror::Error as ThisError;

// re-exports
pub use ddl::{create_indexes, create_table};
pub use live::{ColumnMetadata, TableMetadata};
pub use update::SchemaUpdater;
pub use validate::SchemaValidator;

///
/// SchemaError
/// Live schema disagrees with declared metadata; always fatal.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SchemaError {
    #[error("table '{table}' has no column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("column '{column}' of table '{table}' has type '{actual}', expected '{expected}'")]
    TypeMismatch {
        table: String,
        column: String,
        expected: CqlType,
        actual: CqlType,
    },

    #[error("column '{column}' of table '{table}' should {}be static", negation(.expected))]
    StaticMismatch {
        table: String,
        column: String,
        expected: bool,
    },

    #[error("column '{column}' of table '{table}' should {}be indexed", negation(.expected))]
    IndexMismatch {
        table: String,
        column: String,
        expected: bool,
    },

    #[error(
        "{segment} key of table '{table}' is ({}), expected ({})",
        .actual.join(","),
        .expected.join(",")
    )]
    KeyMismatch {
        table: String,
        segment: &'static str,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("live schema describes table '{actual}', expected '{expected}'")]
    TableMismatch { expected: String, actual: String },
}

const fn negation(expected: &bool) -> &'static str {
    if *expected { "" } else { "not " }
}

impl RecordMeta {
    #[must_use]
    pub const fn schema(&self) -> RecordSchema<'_> {
        RecordSchema { meta: self }
    }
}

///
/// RecordSchema
///

#[derive(Clone, Copy)]
pub struct RecordSchema<'a> {
    meta: &'a RecordMeta,
}

impl<'a> RecordSchema<'a> {
    /// `CREATE TABLE IF NOT EXISTS` statement for this entity.
    #[must_use]
    pub fn create_table(&self) -> String {
        create_table(self.meta)
    }

    /// One `CREATE INDEX` statement per indexed column.
    #[must_use]
    pub fn create_indexes(&self) -> Vec<String> {
        create_indexes(self.meta)
    }

    /// Stored columns: key columns in partition-then-clustering order, then
    /// the value columns the table holds.
    #[must_use]
    pub fn columns(&self) -> Vec<&'a ColumnMeta> {
        self.key_columns()
            .into_iter()
            .chain(self.value_columns())
            .collect()
    }

    #[must_use]
    pub fn key_columns(&self) -> Vec<&'a ColumnMeta> {
        let id = self.meta.id_meta();

        match id.compound_key() {
            Some(props) => props.all_components().collect(),
            None => vec![id],
        }
    }

    /// Counter tables hold only their counters; other tables hold every
    /// non-counter column.
    #[must_use]
    pub fn value_columns(&self) -> Vec<&'a ColumnMeta> {
        if self.meta.structure().is_counter_table() {
            self.meta.counter_columns().collect()
        } else {
            self.meta.columns_except_id_and_counters().collect()
        }
    }

    #[must_use]
    pub fn partition_key(&self) -> Vec<&'a str> {
        let id = self.meta.id_meta();

        match id.compound_key() {
            Some(props) => props.partition().wire_component_names(),
            None => vec![id.wire_column_name()],
        }
    }

    #[must_use]
    pub fn clustering_key(&self) -> Vec<&'a str> {
        self.meta
            .id_meta()
            .compound_key()
            .map(|props| props.clustering().wire_component_names())
            .unwrap_or_default()
    }
}
