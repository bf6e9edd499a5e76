mod cql;
mod json;
mod literal;
mod ty;

#[cfg(test)]
mod tests;

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use uuid::Uuid;

// re-exports
pub use cql::{CqlType, CqlTypeParseError};
pub use json::{to_canonical_json, to_json};
pub use ty::ValueType;

///
/// Value
///
/// One closed value enum for both sides of a codec.
///
/// In-memory values may use every variant. Wire values, the form the store
/// accepts and returns, never contain `Date`, `Enum` or `Json`: codecs lower
/// those to `Timestamp`, `Text` and `Text` respectively.
///
/// Set members and map entries keep the order they were produced in; the
/// store does its own ordering.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    TinyInt(i8),
    SmallInt(i16),
    Int(i32),
    BigInt(i64),
    Float(f32),
    Double(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
    Uuid(Uuid),
    TimeUuid(Uuid),
    Blob(Vec<u8>),
    Enum(ValueEnum),
    Json(serde_json::Value),
    List(Vec<Self>),
    Set(Vec<Self>),
    Map(Vec<(Self, Self)>),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True when the variant is something the store understands natively.
    #[must_use]
    pub fn is_wire(&self) -> bool {
        match self {
            Self::Date(_) | Self::Enum(_) | Self::Json(_) => false,
            Self::List(items) | Self::Set(items) => items.iter().all(Self::is_wire),
            Self::Map(entries) => entries.iter().all(|(k, v)| k.is_wire() && v.is_wire()),
            _ => true,
        }
    }

    /// Runtime class of this value.
    ///
    /// `None` for `Null`, and for empty collections whose element class is
    /// unknowable from the value alone.
    #[must_use]
    pub fn value_type(&self) -> Option<ValueType> {
        let ty = match self {
            Self::Null => return None,
            Self::Boolean(_) => ValueType::Boolean,
            Self::TinyInt(_) => ValueType::TinyInt,
            Self::SmallInt(_) => ValueType::SmallInt,
            Self::Int(_) => ValueType::Int,
            Self::BigInt(_) => ValueType::BigInt,
            Self::Float(_) => ValueType::Float,
            Self::Double(_) => ValueType::Double,
            Self::Text(_) => ValueType::Text,
            Self::Timestamp(_) => ValueType::Timestamp,
            Self::Date(_) => ValueType::Date,
            Self::Uuid(_) => ValueType::Uuid,
            Self::TimeUuid(_) => ValueType::TimeUuid,
            Self::Blob(_) => ValueType::Blob,
            Self::Enum(e) => ValueType::Enum(e.path.clone()),
            Self::Json(_) => ValueType::Json(String::new()),
            Self::List(items) => ValueType::List(Box::new(first_type(items)?)),
            Self::Set(items) => ValueType::Set(Box::new(first_type(items)?)),
            Self::Map(entries) => {
                let (k, v) = entries.iter().find(|(k, v)| !k.is_null() && !v.is_null())?;
                ValueType::Map(Box::new(k.value_type()?), Box::new(v.value_type()?))
            }
        };

        Some(ty)
    }

    /// Human readable runtime class name used in diagnostics.
    #[must_use]
    pub fn type_name(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Json(_) => "Json".to_string(),
            Self::List(_) | Self::Set(_) | Self::Map(_) => self.value_type().map_or_else(
                || match self {
                    Self::List(_) => "Vec<_>".to_string(),
                    Self::Set(_) => "BTreeSet<_>".to_string(),
                    _ => "BTreeMap<_, _>".to_string(),
                },
                |ty| ty.to_string(),
            ),
            other => other
                .value_type()
                .map(|ty| ty.to_string())
                .unwrap_or_default(),
        }
    }

    /// Render this value as a CQL literal.
    #[must_use]
    pub fn to_cql_literal(&self) -> String {
        literal::render(self)
    }

    #[must_use]
    pub fn from_text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    #[must_use]
    pub const fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

fn first_type(items: &[Value]) -> Option<ValueType> {
    items.iter().find_map(Value::value_type)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Enum(e) => f.write_str(&e.variant),
            other => f.write_str(&other.to_cql_literal()),
        }
    }
}

///
/// ValueEnum
///
/// An enum variant carried by name together with the enum's type path.
/// Stored on the wire as its variant name.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ValueEnum {
    pub path: String,
    pub variant: String,
}

impl ValueEnum {
    #[must_use]
    pub fn new(path: impl Into<String>, variant: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            variant: variant.into(),
        }
    }
}

impl fmt::Display for ValueEnum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.path, self.variant)
    }
}

// From impls for the common scalars so call sites can write `Value::from(15i64)`.
macro_rules! impl_from_scalar {
    ( $( $ty:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar!(
    bool => Boolean,
    i8 => TinyInt,
    i16 => SmallInt,
    i32 => Int,
    i64 => BigInt,
    f32 => Float,
    f64 => Double,
    String => Text,
    DateTime<Utc> => Timestamp,
    NaiveDate => Date,
    Uuid => Uuid,
);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}
