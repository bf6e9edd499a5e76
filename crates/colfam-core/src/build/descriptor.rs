use crate::{
    codec::Codec,
    model::{ClusteringOrder, ColumnKind, ConsistencyLevel, IndexSpec, InsertStrategy},
    traits::{FieldShape, Instantiator, Record},
    value::ValueType,
};
use std::sync::Arc;

///
/// FieldRole
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FieldRole {
    /// Simple primary key.
    Id,
    /// Field holding a compound key type.
    EmbeddedId,
    /// Partition component, inside a compound key type.
    Partition,
    /// Clustering component, inside a compound key type.
    Clustering,
    Column,
}

///
/// KeyDescriptor
/// How to describe and default-construct the compound key type of an
/// embedded id field.
///

#[derive(Clone, Copy, Debug)]
pub struct KeyDescriptor {
    pub type_name: &'static str,
    pub descriptor: fn() -> RecordDescriptor,
    pub instantiate: Instantiator,
}

impl KeyDescriptor {
    #[must_use]
    pub fn of<K: Record>() -> Self {
        Self {
            type_name: K::TYPE_NAME,
            descriptor: K::descriptor,
            instantiate: K::instantiate,
        }
    }
}

///
/// FieldDescriptor
///
/// Declarative description of one field, as written by `#[derive(Record)]`
/// or by hand.
///

#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    pub field: &'static str,
    pub role: FieldRole,
    pub shape: FieldShape,
    pub column_name: Option<&'static str>,
    pub is_static: bool,
    pub index: Option<IndexSpec>,
    pub order: ClusteringOrder,
    pub read: Option<ConsistencyLevel>,
    pub write: Option<ConsistencyLevel>,
    pub empty_collection_if_null: bool,
    pub codec: Option<fn() -> Arc<dyn Codec>>,
    pub key: Option<KeyDescriptor>,
}

impl FieldDescriptor {
    #[must_use]
    pub const fn new(field: &'static str, role: FieldRole, shape: FieldShape) -> Self {
        Self {
            field,
            role,
            shape,
            column_name: None,
            is_static: false,
            index: None,
            order: ClusteringOrder::Asc,
            read: None,
            write: None,
            empty_collection_if_null: false,
            codec: None,
            key: None,
        }
    }

    /// Embedded compound key field of type `K`. Its declared class is the
    /// opaque key type.
    #[must_use]
    pub fn embedded_id<K: Record>(field: &'static str) -> Self {
        let shape = FieldShape {
            kind: ColumnKind::EmbeddedKey,
            value_type: ValueType::Json(K::TYPE_NAME.to_string()),
            key_type: None,
        };

        Self {
            key: Some(KeyDescriptor::of::<K>()),
            ..Self::new(field, FieldRole::EmbeddedId, shape)
        }
    }

    #[must_use]
    pub const fn column_name(mut self, name: &'static str) -> Self {
        self.column_name = Some(name);
        self
    }

    #[must_use]
    pub const fn static_column(mut self) -> Self {
        self.is_static = true;
        self
    }

    #[must_use]
    pub fn index(mut self, name: Option<&str>) -> Self {
        self.index = Some(IndexSpec {
            name: name.map(ToString::to_string),
        });
        self
    }

    #[must_use]
    pub const fn order(mut self, order: ClusteringOrder) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub const fn read(mut self, level: ConsistencyLevel) -> Self {
        self.read = Some(level);
        self
    }

    #[must_use]
    pub const fn write(mut self, level: ConsistencyLevel) -> Self {
        self.write = Some(level);
        self
    }

    #[must_use]
    pub const fn empty_if_null(mut self) -> Self {
        self.empty_collection_if_null = true;
        self
    }

    #[must_use]
    pub fn codec(mut self, codec: fn() -> Arc<dyn Codec>) -> Self {
        self.codec = Some(codec);
        self
    }
}

///
/// RecordDescriptor
///
/// Declarative description of a record type: container level options and
/// its fields in declaration order. `MetaBuilder` turns it into a
/// `RecordMeta` (or into compound key properties for a key type).
///

#[derive(Clone, Debug)]
pub struct RecordDescriptor {
    pub type_name: &'static str,
    pub table: Option<&'static str>,
    pub keyspace: Option<&'static str>,
    pub comment: Option<&'static str>,
    pub read: Option<ConsistencyLevel>,
    pub write: Option<ConsistencyLevel>,
    pub insert_strategy: Option<InsertStrategy>,
    pub schema_update: Option<bool>,
    pub fields: Vec<FieldDescriptor>,
    pub instantiate: Instantiator,
}

impl RecordDescriptor {
    #[must_use]
    pub const fn new(type_name: &'static str, instantiate: Instantiator) -> Self {
        Self {
            type_name,
            table: None,
            keyspace: None,
            comment: None,
            read: None,
            write: None,
            insert_strategy: None,
            schema_update: None,
            fields: Vec::new(),
            instantiate,
        }
    }

    #[must_use]
    pub fn of<T: Record>() -> Self {
        Self::new(T::TYPE_NAME, T::instantiate)
    }

    #[must_use]
    pub const fn table(mut self, table: &'static str) -> Self {
        self.table = Some(table);
        self
    }

    #[must_use]
    pub const fn keyspace(mut self, keyspace: &'static str) -> Self {
        self.keyspace = Some(keyspace);
        self
    }

    #[must_use]
    pub const fn comment(mut self, comment: &'static str) -> Self {
        self.comment = Some(comment);
        self
    }

    #[must_use]
    pub const fn read(mut self, level: ConsistencyLevel) -> Self {
        self.read = Some(level);
        self
    }

    #[must_use]
    pub const fn write(mut self, level: ConsistencyLevel) -> Self {
        self.write = Some(level);
        self
    }

    #[must_use]
    pub const fn insert_strategy(mut self, strategy: InsertStrategy) -> Self {
        self.insert_strategy = Some(strategy);
        self
    }

    #[must_use]
    pub const fn schema_update(mut self, enabled: bool) -> Self {
        self.schema_update = Some(enabled);
        self
    }

    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }
}
