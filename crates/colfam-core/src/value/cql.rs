use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error as ThisError;

///
/// CqlType
///
/// Store-native column type, as spelled in DDL and reported by the live
/// schema.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum CqlType {
    Boolean,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    Text,
    Timestamp,
    Uuid,
    TimeUuid,
    Blob,
    Counter,
    List(Box<Self>),
    Set(Box<Self>),
    Map(Box<Self>, Box<Self>),
}

impl CqlType {
    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self, Self::List(_) | Self::Set(_) | Self::Map(..))
    }

    const fn scalar_name(&self) -> Option<&'static str> {
        let name = match self {
            Self::Boolean => "boolean",
            Self::TinyInt => "tinyint",
            Self::SmallInt => "smallint",
            Self::Int => "int",
            Self::BigInt => "bigint",
            Self::Float => "float",
            Self::Double => "double",
            Self::Text => "text",
            Self::Timestamp => "timestamp",
            Self::Uuid => "uuid",
            Self::TimeUuid => "timeuuid",
            Self::Blob => "blob",
            Self::Counter => "counter",
            Self::List(_) | Self::Set(_) | Self::Map(..) => return None,
        };

        Some(name)
    }

    fn parse_scalar(name: &str) -> Option<Self> {
        let ty = match name {
            "boolean" => Self::Boolean,
            "tinyint" => Self::TinyInt,
            "smallint" => Self::SmallInt,
            "int" => Self::Int,
            "bigint" => Self::BigInt,
            "float" => Self::Float,
            "double" => Self::Double,
            "text" | "varchar" => Self::Text,
            "timestamp" => Self::Timestamp,
            "uuid" => Self::Uuid,
            "timeuuid" => Self::TimeUuid,
            "blob" => Self::Blob,
            "counter" => Self::Counter,
            _ => return None,
        };

        Some(ty)
    }
}

impl fmt::Display for CqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(elem) => write!(f, "list<{elem}>"),
            Self::Set(elem) => write!(f, "set<{elem}>"),
            Self::Map(key, value) => write!(f, "map<{key},{value}>"),
            scalar => f.write_str(scalar.scalar_name().unwrap_or_default()),
        }
    }
}

///
/// CqlTypeParseError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
#[error("unrecognised cql type '{0}'")]
pub struct CqlTypeParseError(pub String);

impl FromStr for CqlType {
    type Err = CqlTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let fail = || CqlTypeParseError(s.to_string());

        if let Some(scalar) = Self::parse_scalar(&normalized) {
            return Ok(scalar);
        }

        let (outer, inner) = normalized
            .strip_suffix('>')
            .and_then(|rest| rest.split_once('<'))
            .ok_or_else(fail)?;

        match outer.trim() {
            "list" => Ok(Self::List(Box::new(inner.parse()?))),
            "set" => Ok(Self::Set(Box::new(inner.parse()?))),
            "map" => {
                let (key, value) = split_top_level(inner).ok_or_else(fail)?;
                Ok(Self::Map(Box::new(key.parse()?), Box::new(value.parse()?)))
            }
            _ => Err(fail()),
        }
    }
}

// Split `k,v` at the first comma that is not nested inside `<...>`.
fn split_top_level(s: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => return Some((&s[..i], &s[i + 1..])),
            _ => {}
        }
    }

    None
}

impl TryFrom<String> for CqlType {
    type Error = CqlTypeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CqlType> for String {
    fn from(value: CqlType) -> Self {
        value.to_string()
    }
}
