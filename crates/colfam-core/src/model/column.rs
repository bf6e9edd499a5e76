use crate::{
    codec::Codec,
    model::{ColumnKind, CompoundKeyProperties, Consistency},
    traits::{AccessError, DynRecord},
    value::{CqlType, Value, ValueType},
};
use std::{fmt, sync::Arc};

///
/// ClusteringOrder
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum ClusteringOrder {
    #[default]
    Asc,
    Desc,
}

impl ClusteringOrder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for ClusteringOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// IndexSpec
/// Secondary index declared on a column; the name is synthesized when absent.
///

#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct IndexSpec {
    pub name: Option<String>,
}

impl IndexSpec {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// Declared name, or `{table}_{column}_idx`.
    #[must_use]
    pub fn resolved_name(&self, table: &str, column: &str) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("{table}_{column}_idx"))
    }
}

///
/// ColumnMeta
///
/// Immutable descriptor of one mapped field, built once by `MetaBuilder`.
///
/// Identity is `(owning_type_name, column_name, kind)`; the remaining
/// attributes are derived from that declaration and never change.
///

#[derive(Clone)]
pub struct ColumnMeta {
    pub(crate) owning_type_name: &'static str,
    pub(crate) field_name: &'static str,
    pub(crate) column_name: String,
    pub(crate) wire_column_name: String,
    pub(crate) kind: ColumnKind,
    pub(crate) value_type: ValueType,
    pub(crate) key_type: Option<ValueType>,
    pub(crate) codec: Option<Arc<dyn Codec>>,
    pub(crate) consistency: Consistency,
    pub(crate) is_static: bool,
    pub(crate) index: Option<IndexSpec>,
    pub(crate) order: ClusteringOrder,
    pub(crate) empty_collection_if_null: bool,
    pub(crate) compound_key: Option<Arc<CompoundKeyProperties>>,
}

impl ColumnMeta {
    #[must_use]
    pub const fn owning_type_name(&self) -> &'static str {
        self.owning_type_name
    }

    /// Rust field this column is read from and written to.
    #[must_use]
    pub const fn field_name(&self) -> &'static str {
        self.field_name
    }

    #[must_use]
    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    /// Name as the store reports it: unquoted identifiers fold to lowercase.
    #[must_use]
    pub fn wire_column_name(&self) -> &str {
        &self.wire_column_name
    }

    #[must_use]
    pub const fn kind(&self) -> ColumnKind {
        self.kind
    }

    /// Declared in-memory class (element class for lists and sets, value
    /// class for maps).
    #[must_use]
    pub const fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    #[must_use]
    pub const fn key_type(&self) -> Option<&ValueType> {
        self.key_type.as_ref()
    }

    /// Full declared class, with the collection wrapper applied.
    #[must_use]
    pub fn declared_type(&self) -> ValueType {
        let elem = Box::new(self.value_type.clone());
        match (self.kind, &self.key_type) {
            (ColumnKind::List, _) => ValueType::List(elem),
            (ColumnKind::Set, _) => ValueType::Set(elem),
            (ColumnKind::Map, Some(key)) => ValueType::Map(Box::new(key.clone()), elem),
            _ => self.value_type.clone(),
        }
    }

    #[must_use]
    pub fn codec(&self) -> Option<&dyn Codec> {
        self.codec.as_deref()
    }

    /// Native column type, `None` for embedded keys which span several
    /// columns.
    #[must_use]
    pub fn wire_type(&self) -> Option<CqlType> {
        match self.kind {
            ColumnKind::Counter => Some(CqlType::Counter),
            ColumnKind::EmbeddedKey => None,
            _ => self.codec.as_ref().map(|codec| codec.wire_type()),
        }
    }

    #[must_use]
    pub const fn consistency(&self) -> Consistency {
        self.consistency
    }

    #[must_use]
    pub fn compound_key(&self) -> Option<&CompoundKeyProperties> {
        self.compound_key.as_deref()
    }

    #[must_use]
    pub fn index(&self) -> Option<&IndexSpec> {
        self.index.as_ref()
    }

    #[must_use]
    pub const fn structure(&self) -> ColumnStructure<'_> {
        ColumnStructure { column: self }
    }

    // ---------------------------------------------------------------------
    // value access
    // ---------------------------------------------------------------------

    pub fn get_value(&self, record: &dyn DynRecord) -> Result<Value, AccessError> {
        record.get_field(self.field_name)
    }

    pub fn set_value(&self, record: &mut dyn DynRecord, value: Value) -> Result<(), AccessError> {
        record.set_field(self.field_name, value)
    }

    pub fn get_key<'r>(&self, record: &'r dyn DynRecord) -> Result<&'r dyn DynRecord, AccessError> {
        record.get_key(self.field_name)
    }

    pub fn set_key(
        &self,
        record: &mut dyn DynRecord,
        key: Box<dyn DynRecord>,
    ) -> Result<(), AccessError> {
        record.set_key(self.field_name, key)
    }
}

impl PartialEq for ColumnMeta {
    fn eq(&self, other: &Self) -> bool {
        self.owning_type_name == other.owning_type_name
            && self.column_name == other.column_name
            && self.kind == other.kind
    }
}

impl Eq for ColumnMeta {}

impl fmt::Debug for ColumnMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnMeta")
            .field("owner", &self.owning_type_name)
            .field("column", &self.column_name)
            .field("kind", &self.kind)
            .field("value_type", &self.value_type)
            .field("static", &self.is_static)
            .finish_non_exhaustive()
    }
}

///
/// ColumnStructure
///

#[derive(Clone, Copy)]
pub struct ColumnStructure<'a> {
    column: &'a ColumnMeta,
}

impl ColumnStructure<'_> {
    #[must_use]
    pub const fn is_collection(&self) -> bool {
        self.column.kind.is_collection()
    }

    #[must_use]
    pub const fn is_counter(&self) -> bool {
        self.column.kind.is_counter()
    }

    #[must_use]
    pub const fn is_embedded_key(&self) -> bool {
        self.column.kind.is_embedded_key()
    }

    /// True for an embedded key with at least one clustering component.
    #[must_use]
    pub fn is_clustered(&self) -> bool {
        self.column
            .compound_key()
            .is_some_and(|props| !props.clustering().is_empty())
    }

    #[must_use]
    pub const fn is_static(&self) -> bool {
        self.column.is_static
    }

    #[must_use]
    pub const fn is_indexed(&self) -> bool {
        self.column.index.is_some()
    }

    #[must_use]
    pub const fn order(&self) -> ClusteringOrder {
        self.column.order
    }

    #[must_use]
    pub const fn empty_collection_if_null(&self) -> bool {
        self.column.empty_collection_if_null && self.column.kind.is_collection()
    }

    /// Empty value of the column's collection kind, if it is one.
    #[must_use]
    pub const fn empty_collection(&self) -> Option<Value> {
        match self.column.kind {
            ColumnKind::List => Some(Value::List(Vec::new())),
            ColumnKind::Set => Some(Value::Set(Vec::new())),
            ColumnKind::Map => Some(Value::Map(Vec::new())),
            _ => None,
        }
    }
}
