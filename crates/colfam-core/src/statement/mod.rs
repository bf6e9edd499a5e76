//! Statement fragment generation from column and record metadata.
//!
//! Every fragment is a pure function of the metadata plus caller supplied
//! literal indices. Bind markers use the column's wire name.

mod record;

#[cfg(test)]
mod tests;

use crate::{
    error::ErrorClass,
    model::{ColumnKind, ColumnMeta},
    query::{Assignment, Clause, Delete, Insert, Select, Term, Update},
    traits::DynRecord,
    transcode::TranscodeError,
    value::Value,
};
use std::fmt;
use thiserror::Error as ThisError;

// re-exports
pub use record::{BoundStatement, RecordStatements};

///
/// StatementError
///

#[derive(Debug, ThisError)]
pub enum StatementError {
    #[error("counter column '{column}' cannot be removed, only incremented or decremented")]
    CounterRemoval { column: String },

    #[error("counter column '{column}' cannot be assigned, only incremented or decremented")]
    CounterAssignment { column: String },

    #[error("column '{column}' is not a counter")]
    NotACounter { column: String },

    #[error("change '{change}' does not apply to {kind} column '{column}'")]
    InvalidChange {
        column: String,
        kind: ColumnKind,
        change: CollectionChange,
    },

    #[error("primary key column '{column}' cannot be updated or removed")]
    KeyColumn { column: String },

    #[error("unknown column '{column}' on entity '{entity}'")]
    UnknownColumn { entity: &'static str, column: String },

    #[error("no columns given for entity '{entity}'")]
    NoColumns { entity: &'static str },
}

impl StatementError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::UnknownColumn { .. } | Self::NoColumns { .. } => ErrorClass::Validation,
            Self::CounterRemoval { .. }
            | Self::CounterAssignment { .. }
            | Self::NotACounter { .. }
            | Self::InvalidChange { .. }
            | Self::KeyColumn { .. } => ErrorClass::Unsupported,
        }
    }
}

///
/// CollectionChange
/// One collection mutation; each maps to exactly one fragment shape.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CollectionChange {
    RemoveAll,
    AddToSet,
    RemoveFromSet,
    AppendToList,
    PrependToList,
    RemoveFromList,
    SetAtIndex(usize),
    RemoveAtIndex(usize),
    AddToMap,
    RemoveFromMap,
}

impl CollectionChange {
    #[must_use]
    pub const fn is_removal(self) -> bool {
        matches!(
            self,
            Self::RemoveAll
                | Self::RemoveFromSet
                | Self::RemoveFromList
                | Self::RemoveAtIndex(_)
                | Self::RemoveFromMap
        )
    }
}

impl fmt::Display for CollectionChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemoveAll => f.write_str("remove all"),
            Self::AddToSet => f.write_str("add to set"),
            Self::RemoveFromSet => f.write_str("remove from set"),
            Self::AppendToList => f.write_str("append to list"),
            Self::PrependToList => f.write_str("prepend to list"),
            Self::RemoveFromList => f.write_str("remove from list"),
            Self::SetAtIndex(i) => write!(f, "set at index {i}"),
            Self::RemoveAtIndex(i) => write!(f, "remove at index {i}"),
            Self::AddToMap => f.write_str("add to map"),
            Self::RemoveFromMap => f.write_str("remove from map"),
        }
    }
}

impl ColumnMeta {
    #[must_use]
    pub const fn statements(&self) -> ColumnStatements<'_> {
        ColumnStatements { column: self }
    }
}

///
/// ColumnStatements
///
/// Fragment generators for one column. Primary key fragments are generated
/// from the id column; a compound key expands to its components in
/// partition-then-clustering order.
///

#[derive(Clone, Copy)]
pub struct ColumnStatements<'a> {
    column: &'a ColumnMeta,
}

impl<'a> ColumnStatements<'a> {
    // ---------------------------------------------------------------------
    // primary key fragments
    // ---------------------------------------------------------------------

    /// Wire names of the key columns to address. A key targeted through
    /// static columns only is addressed by its partition segment.
    #[must_use]
    pub fn key_names(&self, partition_only: bool) -> Vec<&'a str> {
        match self.column.compound_key() {
            Some(props) => props
                .components(partition_only)
                .map(ColumnMeta::wire_column_name)
                .collect(),
            None => vec![self.column.wire_column_name()],
        }
    }

    #[must_use]
    pub fn prepare_insert_primary_key(&self, insert: Insert, only_static: bool) -> Insert {
        self.key_names(only_static)
            .into_iter()
            .fold(insert, Insert::value_marker)
    }

    #[must_use]
    pub fn generate_where_clause_for_select(
        &self,
        select: Select,
        extra: Option<&ColumnMeta>,
    ) -> Select {
        self.key_clauses(extra).into_iter().fold(select, Select::where_)
    }

    #[must_use]
    pub fn generate_where_clause_for_delete(
        &self,
        delete: Delete,
        extra: Option<&ColumnMeta>,
    ) -> Delete {
        self.key_clauses(extra).into_iter().fold(delete, Delete::where_)
    }

    #[must_use]
    pub fn generate_where_clause_for_update(
        &self,
        update: Update,
        extra: Option<&ColumnMeta>,
    ) -> Update {
        self.key_clauses(extra).into_iter().fold(update, Update::where_)
    }

    /// WHERE clause addressing one record, with its encoded key values.
    ///
    /// A compound key renders its first component as a literal and the rest
    /// as bind markers; every encoded component value is returned in order.
    /// A simple key renders the encoded id as a literal.
    pub fn generate_where_clause_for_update_with_values(
        &self,
        update: Update,
        record: &dyn DynRecord,
        only_static: bool,
    ) -> Result<(Update, Vec<Value>), TranscodeError> {
        let column = self.column;

        match column.compound_key() {
            Some(props) => {
                let key = column.get_key(record)?;
                let values = column
                    .transcoder()
                    .encode_to_components(Some(key), only_static)?;

                let update = props
                    .components(only_static)
                    .zip(&values)
                    .enumerate()
                    .fold(update, |update, (i, (component, value))| {
                        let name = component.wire_column_name();
                        if i == 0 {
                            update.where_(Clause::eq(name, Term::value(value)))
                        } else {
                            update.where_(Clause::eq_marker(name))
                        }
                    });

                Ok((update, values))
            }
            None => {
                let value = column.transcoder().encode(&column.get_value(record)?)?;
                let update =
                    update.where_(Clause::eq(column.wire_column_name(), Term::value(&value)));

                Ok((update, vec![value]))
            }
        }
    }

    fn key_clauses(&self, extra: Option<&ColumnMeta>) -> Vec<Clause> {
        let partition_only = extra.is_some_and(|c| c.structure().is_static());

        self.key_names(partition_only)
            .into_iter()
            .map(Clause::eq_marker)
            .collect()
    }

    // ---------------------------------------------------------------------
    // column fragments
    // ---------------------------------------------------------------------

    /// Add this column to a selection. A compound key selects its
    /// components.
    #[must_use]
    pub fn prepare_select_field(&self, select: Select) -> Select {
        self.key_names(false)
            .into_iter()
            .fold(select, Select::column)
    }

    /// `c=:c`.
    pub fn prepare_update_field(&self, update: Update) -> Result<Update, StatementError> {
        match self.column.kind() {
            ColumnKind::Counter => Err(StatementError::CounterAssignment {
                column: self.name(),
            }),
            ColumnKind::EmbeddedKey | ColumnKind::CompoundKeyComponent => {
                Err(self.key_column())
            }
            ColumnKind::Scalar | ColumnKind::List | ColumnKind::Set | ColumnKind::Map => {
                Ok(update.with(Assignment::set(self.wire(), self.marker())))
            }
        }
    }

    /// Add this column to a DELETE. Counters can never be removed.
    pub fn prepare_delete_field(&self, delete: Delete) -> Result<Delete, StatementError> {
        match self.column.kind() {
            ColumnKind::Counter => Err(self.counter_removal()),
            ColumnKind::EmbeddedKey | ColumnKind::CompoundKeyComponent => {
                Err(self.key_column())
            }
            ColumnKind::Scalar | ColumnKind::List | ColumnKind::Set | ColumnKind::Map => {
                Ok(delete.column(self.wire()))
            }
        }
    }

    /// Add one collection mutation to an UPDATE.
    pub fn generate_collection_update(
        &self,
        update: Update,
        change: CollectionChange,
    ) -> Result<Update, StatementError> {
        let kind = self.column.kind();
        if kind.is_counter() && change.is_removal() {
            return Err(self.counter_removal());
        }

        let c = self.wire();
        let assignment = match (kind, change) {
            (ColumnKind::List | ColumnKind::Set | ColumnKind::Map, CollectionChange::RemoveAll) => {
                Assignment::set(c, self.marker())
            }
            (ColumnKind::Set, CollectionChange::AddToSet)
            | (ColumnKind::List, CollectionChange::AppendToList)
            | (ColumnKind::Map, CollectionChange::AddToMap) => Assignment::append(c, self.marker()),
            (ColumnKind::Set, CollectionChange::RemoveFromSet)
            | (ColumnKind::List, CollectionChange::RemoveFromList) => {
                Assignment::remove(c, self.marker())
            }
            (ColumnKind::List, CollectionChange::PrependToList) => {
                Assignment::prepend(c, self.marker())
            }
            (ColumnKind::List, CollectionChange::SetAtIndex(i)) => {
                Assignment::set_at(c, Term::literal(i), Term::Anonymous)
            }
            (ColumnKind::List, CollectionChange::RemoveAtIndex(i)) => {
                Assignment::set_at(c, Term::literal(i), Term::null())
            }
            (ColumnKind::Map, CollectionChange::RemoveFromMap) => {
                Assignment::put(c, Term::marker("key"), Term::marker("nullValue"))
            }
            _ => {
                return Err(StatementError::InvalidChange {
                    column: self.name(),
                    kind,
                    change,
                });
            }
        };

        Ok(update.with(assignment))
    }

    /// `c=c+:c` on a counter column.
    pub fn increment(&self, update: Update) -> Result<Update, StatementError> {
        self.require_counter()?;
        Ok(update.with(Assignment::increment(self.wire(), self.marker())))
    }

    /// `c=c-:c` on a counter column.
    pub fn decrement(&self, update: Update) -> Result<Update, StatementError> {
        self.require_counter()?;
        Ok(update.with(Assignment::decrement(self.wire(), self.marker())))
    }

    fn require_counter(&self) -> Result<(), StatementError> {
        if self.column.kind().is_counter() {
            Ok(())
        } else {
            Err(StatementError::NotACounter {
                column: self.name(),
            })
        }
    }

    fn wire(&self) -> &'a str {
        self.column.wire_column_name()
    }

    fn marker(&self) -> Term {
        Term::marker(self.wire())
    }

    fn name(&self) -> String {
        self.column.column_name().to_string()
    }

    fn counter_removal(&self) -> StatementError {
        StatementError::CounterRemoval {
            column: self.name(),
        }
    }

    fn key_column(&self) -> StatementError {
        StatementError::KeyColumn {
            column: self.name(),
        }
    }
}
