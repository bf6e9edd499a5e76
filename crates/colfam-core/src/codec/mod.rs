//! Per-column converters between in-memory values and their wire form.

mod collection;
mod native;


use crate::{
    model::ColumnKind,
    value::{CqlType, Value, ValueType},
};
use std::{fmt, sync::Arc};
use thiserror::Error as ThisError;

// re-exports
pub use collection::{ListCodec, MapCodec, SetCodec};
pub use native::{DateCodec, EnumCodec, JsonCodec, NativeCodec};

///
/// CodecError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CodecError {
    #[error("{codec} codec cannot convert a value of type '{actual}', expected '{expected}'")]
    UnexpectedValue {
        codec: &'static str,
        expected: String,
        actual: String,
    },

    #[error("invalid json document: {0}")]
    Json(String),

    #[error("{0}")]
    Custom(String),
}

impl CodecError {
    pub(crate) fn unexpected(
        codec: &'static str,
        expected: impl fmt::Display,
        actual: &Value,
    ) -> Self {
        Self::UnexpectedValue {
            codec,
            expected: expected.to_string(),
            actual: actual.type_name(),
        }
    }
}

///
/// Codec
///
/// Converts one column's values. `encode` produces a wire value, `decode`
/// accepts one. Both pass `Value::Null` through unchanged.
///
/// Custom codecs are declared per column with `#[column(codec = "path")]`,
/// naming a function that returns `Arc<dyn Codec>`. For collection columns
/// the declared codec converts elements and is wrapped by the collection
/// codec of the column's kind.
///

pub trait Codec: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// In-memory class accepted by `encode`.
    fn source_type(&self) -> ValueType;

    /// Native column type produced by `encode`.
    fn wire_type(&self) -> CqlType;

    fn encode(&self, value: &Value) -> Result<Value, CodecError>;

    fn decode(&self, wire: &Value) -> Result<Value, CodecError>;
}

/// Default codec for a declared class.
#[must_use]
pub fn codec_for(value_type: &ValueType) -> Arc<dyn Codec> {
    match value_type {
        ValueType::Date => Arc::new(DateCodec),
        ValueType::Enum(path) => Arc::new(EnumCodec::new(path.clone())),
        ValueType::Json(name) => Arc::new(JsonCodec::new(name.clone())),
        ValueType::List(elem) => Arc::new(ListCodec::new(codec_for(elem))),
        ValueType::Set(elem) => Arc::new(SetCodec::new(codec_for(elem))),
        ValueType::Map(key, value) => Arc::new(MapCodec::new(codec_for(key), codec_for(value))),
        scalar => Arc::new(NativeCodec::new(scalar.clone())),
    }
}

/// Codec of a whole column. `element` overrides the default element codec;
/// `None` is returned for kinds that are never transcoded through a codec,
/// and for a map without a key class.
#[must_use]
pub fn column_codec(
    kind: ColumnKind,
    value_type: &ValueType,
    key_type: Option<&ValueType>,
    element: Option<Arc<dyn Codec>>,
) -> Option<Arc<dyn Codec>> {
    let element = || element.clone().unwrap_or_else(|| codec_for(value_type));

    match kind {
        ColumnKind::Scalar | ColumnKind::CompoundKeyComponent => Some(element()),
        ColumnKind::List => Some(Arc::new(ListCodec::new(element()))),
        ColumnKind::Set => Some(Arc::new(SetCodec::new(element()))),
        ColumnKind::Map => {
            let key = codec_for(key_type?);
            Some(Arc::new(MapCodec::new(key, element())))
        }
        ColumnKind::Counter | ColumnKind::EmbeddedKey => None,
    }
}
