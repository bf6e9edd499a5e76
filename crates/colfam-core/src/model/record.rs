use crate::{
    model::{
        ColumnKind, ColumnMeta, Consistency, ConsistencyLevel, Event, InterceptError, Interceptor,
    },
    traits::{AccessError, DynRecord, Instantiator},
    value::Value,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, sync::Arc};

///
/// InsertStrategy
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertStrategy {
    /// Bind every column, nulls included.
    #[default]
    AllFields,
    /// Leave null regular columns out of the INSERT.
    NotNullFields,
}

///
/// RecordMeta
///
/// Immutable metadata of one entity type: table identity, the id column, the
/// remaining columns in declaration order, and entity level configuration.
///
/// Views that depend only on structure are computed once at build time.
///

pub struct RecordMeta {
    pub(crate) type_name: &'static str,
    pub(crate) table_name: String,
    pub(crate) keyspace: Option<String>,
    pub(crate) comment: String,
    pub(crate) id: ColumnMeta,
    pub(crate) columns: IndexMap<&'static str, ColumnMeta>,
    pub(crate) consistency: Consistency,
    pub(crate) insert_strategy: InsertStrategy,
    pub(crate) schema_update: bool,
    pub(crate) interceptors: HashMap<Event, Vec<Arc<dyn Interceptor>>>,
    pub(crate) instantiate: Instantiator,

    // cached views
    pub(crate) regular_positions: Vec<usize>,
    pub(crate) counter_positions: Vec<usize>,
    pub(crate) clustered_counter: bool,
}

impl RecordMeta {
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub const fn id_meta(&self) -> &ColumnMeta {
        &self.id
    }

    /// Non-id columns keyed by field name, in declaration order.
    #[must_use]
    pub const fn columns(&self) -> &IndexMap<&'static str, ColumnMeta> {
        &self.columns
    }

    /// Look a column up by field name, column name or wire name.
    /// The id column is included.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnMeta> {
        if let Some(column) = self.columns.get(name) {
            return Some(column);
        }

        self.all_columns().find(|column| {
            column.field_name() == name
                || column.column_name() == name
                || column.wire_column_name() == name
        })
    }

    /// Id column followed by every other column.
    pub fn all_columns(&self) -> impl Iterator<Item = &ColumnMeta> {
        std::iter::once(&self.id).chain(self.columns.values())
    }

    /// Id column followed by every non-counter column.
    pub fn columns_except_counters(&self) -> impl Iterator<Item = &ColumnMeta> {
        std::iter::once(&self.id).chain(self.columns_except_id_and_counters())
    }

    pub fn columns_except_id_and_counters(&self) -> impl Iterator<Item = &ColumnMeta> {
        self.positions(&self.regular_positions)
    }

    pub fn counter_columns(&self) -> impl Iterator<Item = &ColumnMeta> {
        self.positions(&self.counter_positions)
    }

    fn positions<'a>(&'a self, positions: &'a [usize]) -> impl Iterator<Item = &'a ColumnMeta> {
        positions
            .iter()
            .filter_map(|&i| self.columns.get_index(i).map(|(_, column)| column))
    }

    #[must_use]
    pub const fn structure(&self) -> RecordStructure<'_> {
        RecordStructure { meta: self }
    }

    #[must_use]
    pub const fn config(&self) -> RecordConfig<'_> {
        RecordConfig { meta: self }
    }

    #[must_use]
    pub const fn values(&self) -> RecordValues<'_> {
        RecordValues { meta: self }
    }

    #[must_use]
    pub const fn interception(&self) -> RecordInterception<'_> {
        RecordInterception { meta: self }
    }
}

impl fmt::Debug for RecordMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordMeta")
            .field("type_name", &self.type_name)
            .field("table", &self.table_name)
            .field("keyspace", &self.keyspace)
            .field("id", &self.id)
            .field("columns", &self.columns.keys().collect::<Vec<_>>())
            .field("consistency", &self.consistency)
            .field("insert_strategy", &self.insert_strategy)
            .finish_non_exhaustive()
    }
}

///
/// RecordStructure
///

#[derive(Clone, Copy)]
pub struct RecordStructure<'a> {
    meta: &'a RecordMeta,
}

impl RecordStructure<'_> {
    /// True when the id is an embedded compound key.
    #[must_use]
    pub const fn has_compound_key(&self) -> bool {
        matches!(self.meta.id.kind, ColumnKind::EmbeddedKey)
    }

    /// True when the compound key has at least one clustering component.
    #[must_use]
    pub fn is_clustered(&self) -> bool {
        self.meta.id.structure().is_clustered()
    }

    /// Clustered entity whose only column besides the id is one counter.
    #[must_use]
    pub const fn is_clustered_counter(&self) -> bool {
        self.meta.clustered_counter
    }

    #[must_use]
    pub const fn has_counters(&self) -> bool {
        !self.meta.counter_positions.is_empty()
    }

    /// Every non-key column is a counter, so the table is a counter table.
    #[must_use]
    pub const fn is_counter_table(&self) -> bool {
        self.has_counters() && self.meta.regular_positions.is_empty()
    }

    #[must_use]
    pub fn has_static_columns(&self) -> bool {
        self.meta.columns.values().any(|c| c.structure().is_static())
    }

    pub fn static_columns(&self) -> impl Iterator<Item = &ColumnMeta> {
        self.meta
            .columns
            .values()
            .filter(|c| c.structure().is_static())
    }
}

///
/// RecordConfig
/// Resolved entity level configuration.
///

#[derive(Clone, Copy)]
pub struct RecordConfig<'a> {
    meta: &'a RecordMeta,
}

impl<'a> RecordConfig<'a> {
    #[must_use]
    pub fn table_name(&self) -> &'a str {
        &self.meta.table_name
    }

    #[must_use]
    pub fn keyspace(&self) -> Option<&'a str> {
        self.meta.keyspace.as_deref()
    }

    /// `keyspace.table`, or the bare table name without a keyspace.
    #[must_use]
    pub fn qualified_table_name(&self) -> String {
        match &self.meta.keyspace {
            Some(keyspace) => format!("{keyspace}.{}", self.meta.table_name),
            None => self.meta.table_name.clone(),
        }
    }

    #[must_use]
    pub fn comment(&self) -> &'a str {
        &self.meta.comment
    }

    #[must_use]
    pub const fn consistency(&self) -> Consistency {
        self.meta.consistency
    }

    #[must_use]
    pub const fn read_consistency(&self) -> ConsistencyLevel {
        self.meta.consistency.read
    }

    #[must_use]
    pub const fn write_consistency(&self) -> ConsistencyLevel {
        self.meta.consistency.write
    }

    #[must_use]
    pub const fn insert_strategy(&self) -> InsertStrategy {
        self.meta.insert_strategy
    }

    /// Whether the live schema may be updated to match this entity.
    #[must_use]
    pub const fn schema_update(&self) -> bool {
        self.meta.schema_update
    }
}

///
/// RecordValues
/// Value access over a record instance of this entity.
///

#[derive(Clone, Copy)]
pub struct RecordValues<'a> {
    meta: &'a RecordMeta,
}

impl RecordValues<'_> {
    /// Default-construct an empty record.
    #[must_use]
    pub fn instantiate(&self) -> Box<dyn DynRecord> {
        (self.meta.instantiate)()
    }

    pub fn get(&self, record: &dyn DynRecord, column: &str) -> Result<Value, AccessError> {
        self.lookup(column)?.get_value(record)
    }

    pub fn set(
        &self,
        record: &mut dyn DynRecord,
        column: &str,
        value: Value,
    ) -> Result<(), AccessError> {
        self.lookup(column)?.set_value(record, value)
    }

    /// In-memory primary key values: the single id, or every compound key
    /// component in canonical order.
    pub fn primary_key(&self, record: &dyn DynRecord) -> Result<Vec<Value>, AccessError> {
        let id = &self.meta.id;

        match id.compound_key() {
            Some(props) => {
                let key = id.get_key(record)?;
                props.all_components().map(|c| c.get_value(key)).collect()
            }
            None => Ok(vec![id.get_value(record)?]),
        }
    }

    fn lookup(&self, column: &str) -> Result<&ColumnMeta, AccessError> {
        self.meta
            .column(column)
            .ok_or_else(|| AccessError::unknown_field(self.meta.type_name, column))
    }
}

///
/// RecordInterception
///

#[derive(Clone, Copy)]
pub struct RecordInterception<'a> {
    meta: &'a RecordMeta,
}

impl RecordInterception<'_> {
    #[must_use]
    pub fn has(&self, event: Event) -> bool {
        self.meta
            .interceptors
            .get(&event)
            .is_some_and(|list| !list.is_empty())
    }

    /// Run the interceptors registered for `event` in registration order,
    /// stopping at the first failure.
    pub fn intercept(
        &self,
        event: Event,
        record: &mut dyn DynRecord,
    ) -> Result<(), InterceptError> {
        let Some(interceptors) = self.meta.interceptors.get(&event) else {
            return Ok(());
        };

        for interceptor in interceptors {
            tracing::trace!(
                entity = self.meta.type_name,
                %event,
                interceptor = %interceptor.name(),
                "running interceptor"
            );

            interceptor
                .on_event(event, record)
                .map_err(|err| InterceptError::Failed {
                    interceptor: interceptor.name(),
                    event,
                    type_name: self.meta.type_name,
                    source: Box::new(err),
                })?;
        }

        Ok(())
    }
}
