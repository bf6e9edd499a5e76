mod field_value;


use crate::{
    build::RecordDescriptor,
    model::ColumnKind,
    value::{Value, ValueType},
};
use std::{any::Any, fmt};
use thiserror::Error as ThisError;

///
/// AccessError
///
/// Failures of the per-type accessor table: unknown fields, values of the
/// wrong class, and nulls where the field cannot hold one.
///

#[derive(Debug, ThisError)]
pub enum AccessError {
    #[error("type '{type_name}' has no field '{field}'")]
    UnknownField {
        type_name: &'static str,
        field: String,
    },

    #[error("field '{field}' of type '{type_name}' is not an embedded key")]
    NotAKeyField {
        type_name: &'static str,
        field: String,
    },

    #[error("field '{field}' of type '{type_name}' is an embedded key and has no single value")]
    EmbeddedKey {
        type_name: &'static str,
        field: String,
    },

    #[error("unexpected null for a value of type '{expected}'")]
    UnexpectedNull { expected: String },

    #[error("expected a value of type '{expected}', got '{actual}'")]
    WrongType { expected: String, actual: String },

    #[error("invalid json for '{expected}': {message}")]
    Json { expected: String, message: String },

    #[error("field '{field}' of type '{type_name}': {source}")]
    Field {
        type_name: &'static str,
        field: String,
        #[source]
        source: Box<Self>,
    },
}

impl AccessError {
    /// Attach the owning type and field to an accessor failure.
    #[must_use]
    pub fn field(type_name: &'static str, field: &str, source: Self) -> Self {
        Self::Field {
            type_name,
            field: field.to_string(),
            source: Box::new(source),
        }
    }

    #[must_use]
    pub fn unknown_field(type_name: &'static str, field: &str) -> Self {
        Self::UnknownField {
            type_name,
            field: field.to_string(),
        }
    }

    #[must_use]
    pub fn not_a_key_field(type_name: &'static str, field: &str) -> Self {
        Self::NotAKeyField {
            type_name,
            field: field.to_string(),
        }
    }

    #[must_use]
    pub fn embedded_key(type_name: &'static str, field: &str) -> Self {
        Self::EmbeddedKey {
            type_name,
            field: field.to_string(),
        }
    }

    #[doc(hidden)]
    pub fn wrong_type(expected: impl fmt::Display, actual: &Value) -> Self {
        if actual.is_null() {
            Self::UnexpectedNull {
                expected: expected.to_string(),
            }
        } else {
            Self::WrongType {
                expected: expected.to_string(),
                actual: actual.type_name(),
            }
        }
    }
}

///
/// FieldShape
///
/// Column shape derived from a field's Rust type: its kind, its declared
/// element class, and for maps the declared key class.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldShape {
    pub kind: ColumnKind,
    pub value_type: ValueType,
    pub key_type: Option<ValueType>,
}

impl FieldShape {
    #[must_use]
    pub const fn scalar(value_type: ValueType) -> Self {
        Self {
            kind: ColumnKind::Scalar,
            value_type,
            key_type: None,
        }
    }

    /// Shape of a user enum stored by variant name.
    #[must_use]
    pub fn enumeration(path: &str) -> Self {
        Self::scalar(ValueType::Enum(path.to_string()))
    }
}

///
/// FieldValue
///
/// Conversion between one Rust field type and the dynamic `Value`.
/// Derived record accessors go through this trait for every field.
///

pub trait FieldValue: Sized {
    fn shape() -> FieldShape;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, AccessError>;
}

/// Factory that default-constructs a record without running user code.
pub type Instantiator = fn() -> Box<dyn DynRecord>;

///
/// DynRecord
///
/// Object-safe accessor table for one record type, keyed by field name.
/// Implemented by `#[derive(Record)]`; compound keys implement it too.
///

pub trait DynRecord: Any + Send + Sync + fmt::Debug {
    fn type_name(&self) -> &'static str;

    fn get_field(&self, field: &str) -> Result<Value, AccessError>;

    fn set_field(&mut self, field: &str, value: Value) -> Result<(), AccessError>;

    /// Borrow an embedded compound-key field.
    fn get_key(&self, field: &str) -> Result<&dyn DynRecord, AccessError> {
        Err(AccessError::not_a_key_field(self.type_name(), field))
    }

    /// Replace an embedded compound-key field.
    fn set_key(&mut self, field: &str, key: Box<dyn DynRecord>) -> Result<(), AccessError> {
        let _ = key;
        Err(AccessError::not_a_key_field(self.type_name(), field))
    }

    fn clone_record(&self) -> Box<dyn DynRecord>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl dyn DynRecord {
    #[must_use]
    pub fn downcast_ref<T: DynRecord>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    pub fn downcast_mut<T: DynRecord>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }
}

impl Clone for Box<dyn DynRecord> {
    fn clone(&self) -> Self {
        self.clone_record()
    }
}

///
/// Record
///
/// A statically known record type: its accessor table plus the declarative
/// descriptor `MetaBuilder` turns into metadata.
///

pub trait Record: DynRecord + Clone + Default {
    const TYPE_NAME: &'static str;

    fn descriptor() -> RecordDescriptor;

    #[must_use]
    fn instantiate() -> Box<dyn DynRecord>
    where
        Self: Sized,
    {
        Box::new(Self::default())
    }
}

/// Unbox an embedded key handed to `DynRecord::set_key`.
pub fn downcast_key<K: DynRecord>(key: Box<dyn DynRecord>) -> Result<K, AccessError> {
    let actual = key.type_name();

    key.into_any()
        .downcast::<K>()
        .map(|key| *key)
        .map_err(|_| AccessError::WrongType {
            expected: std::any::type_name::<K>().to_string(),
            actual: actual.to_string(),
        })
}
