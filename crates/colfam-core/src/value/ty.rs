use crate::value::Value;
use std::fmt;

///
/// ValueType
///
/// Declared in-memory class of a column or compound-key component.
/// This is the authority for type-checking caller supplied values.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ValueType {
    Boolean,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    Text,
    Timestamp,
    Date,
    Uuid,
    TimeUuid,
    Blob,
    /// Enum stored by variant name; carries the enum type path.
    Enum(String),
    /// Structured value stored as a JSON document; carries the type name.
    Json(String),
    List(Box<Self>),
    Set(Box<Self>),
    Map(Box<Self>, Box<Self>),
}

impl ValueType {
    /// Whether a value whose runtime class is `actual` may be supplied where
    /// `self` is declared.
    ///
    /// The accepted conversions are exactly:
    /// - identical classes
    /// - integer widening `i8 -> i16 -> i32 -> i64`
    /// - float widening `f32 -> f64`
    /// - `TimeUuid` where `Uuid` is declared
    /// - `DateTime<Utc>` where `NaiveDate` is declared
    /// - any `Json` where a `Json` type is declared, since runtime JSON values
    ///   carry no type name
    /// - collections whose element classes are accepted by the same rules
    #[must_use]
    pub fn accepts(&self, actual: &Self) -> bool {
        if self == actual {
            return true;
        }

        match (self, actual) {
            (Self::SmallInt, Self::TinyInt)
            | (Self::Int, Self::TinyInt | Self::SmallInt)
            | (Self::BigInt, Self::TinyInt | Self::SmallInt | Self::Int)
            | (Self::Double, Self::Float)
            | (Self::Uuid, Self::TimeUuid)
            | (Self::Date, Self::Timestamp)
            | (Self::Json(_), Self::Json(_)) => true,
            (Self::List(declared), Self::List(actual))
            | (Self::Set(declared), Self::Set(actual)) => declared.accepts(actual),
            (Self::Map(dk, dv), Self::Map(ak, av)) => dk.accepts(ak) && dv.accepts(av),
            _ => false,
        }
    }

    /// Value-level variant of [`Self::accepts`].
    ///
    /// Collections are checked element by element so empty collections are
    /// accepted by any collection of the same shape. `Null` is never accepted.
    #[must_use]
    pub fn accepts_value(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => false,
            (Self::List(elem), Value::List(items)) | (Self::Set(elem), Value::Set(items)) => {
                items.iter().all(|item| elem.accepts_value(item))
            }
            (Self::Map(key, val), Value::Map(entries)) => entries
                .iter()
                .all(|(k, v)| key.accepts_value(k) && val.accepts_value(v)),
            (declared, value) => value
                .value_type()
                .is_some_and(|actual| declared.accepts(&actual)),
        }
    }

    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self, Self::List(_) | Self::Set(_) | Self::Map(..))
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => f.write_str("bool"),
            Self::TinyInt => f.write_str("i8"),
            Self::SmallInt => f.write_str("i16"),
            Self::Int => f.write_str("i32"),
            Self::BigInt => f.write_str("i64"),
            Self::Float => f.write_str("f32"),
            Self::Double => f.write_str("f64"),
            Self::Text => f.write_str("String"),
            Self::Timestamp => f.write_str("DateTime<Utc>"),
            Self::Date => f.write_str("NaiveDate"),
            Self::Uuid => f.write_str("Uuid"),
            Self::TimeUuid => f.write_str("TimeUuid"),
            Self::Blob => f.write_str("Blob"),
            Self::Enum(path) => f.write_str(path),
            Self::Json(name) if name.is_empty() => f.write_str("Json"),
            Self::Json(name) => write!(f, "Json<{name}>"),
            Self::List(elem) => write!(f, "Vec<{elem}>"),
            Self::Set(elem) => write!(f, "BTreeSet<{elem}>"),
            Self::Map(key, value) => write!(f, "BTreeMap<{key}, {value}>"),
        }
    }
}
