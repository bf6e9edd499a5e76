//! Per-column transcoding, dispatched on the column kind.

use crate::{
    codec::{Codec, CodecError},
    error::ErrorClass,
    model::{ColumnKind, ColumnMeta, CompoundKeyProperties, KeyComponents, RecordMeta},
    traits::{AccessError, DynRecord},
    value::{Value, to_canonical_json},
};
use thiserror::Error as ThisError;

///
/// TranscodeError
///

#[derive(Debug, ThisError)]
pub enum TranscodeError {
    #[error("column '{column}': {source}")]
    Codec {
        column: String,
        #[source]
        source: CodecError,
    },

    #[error("component '{component}' of key type '{key_type}' decoded to null")]
    NullComponent {
        component: String,
        key_type: &'static str,
    },

    #[error("key type '{key_type}' has {expected} component(s), got {actual} value(s)")]
    ComponentCount {
        key_type: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("column '{column}' is not an embedded key")]
    NotAnEmbeddedKey { column: String },

    #[error("{kind} column '{column}' has no single wire value")]
    NotTranscodable { column: String, kind: ColumnKind },

    #[error("unknown column '{column}' on entity '{entity}'")]
    UnknownColumn { entity: &'static str, column: String },

    #[error(transparent)]
    Access(#[from] AccessError),
}

impl TranscodeError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::NullComponent { .. } | Self::ComponentCount { .. } => ErrorClass::Decode,
            Self::Codec { .. } => ErrorClass::Codec,
            Self::NotAnEmbeddedKey { .. } | Self::NotTranscodable { .. } => {
                ErrorClass::Unsupported
            }
            Self::UnknownColumn { .. } => ErrorClass::Validation,
            Self::Access(_) => ErrorClass::Access,
        }
    }
}

/// Opaque string form of a value: text passes through unchanged, anything
/// else becomes canonical JSON.
#[must_use]
pub fn force_encode_to_json(value: &Value) -> String {
    match value {
        Value::Text(text) => text.clone(),
        other => to_canonical_json(other),
    }
}

impl ColumnMeta {
    #[must_use]
    pub const fn transcoder(&self) -> Transcoder<'_> {
        Transcoder { column: self }
    }
}

///
/// Transcoder
///
/// Encode and decode for one column. Counters pass through untouched; an
/// embedded key goes through its components instead of a single value.
///

#[derive(Clone, Copy)]
pub struct Transcoder<'a> {
    column: &'a ColumnMeta,
}

impl<'a> Transcoder<'a> {
    pub fn encode(&self, value: &Value) -> Result<Value, TranscodeError> {
        match self.column.kind() {
            ColumnKind::Scalar
            | ColumnKind::List
            | ColumnKind::Set
            | ColumnKind::Map
            | ColumnKind::CompoundKeyComponent => self
                .codec()?
                .encode(value)
                .map_err(|err| self.codec_error(err)),
            ColumnKind::Counter => Ok(value.clone()),
            ColumnKind::EmbeddedKey => Err(self.not_transcodable()),
        }
    }

    pub fn decode(&self, wire: &Value) -> Result<Value, TranscodeError> {
        match self.column.kind() {
            ColumnKind::Scalar
            | ColumnKind::List
            | ColumnKind::Set
            | ColumnKind::Map
            | ColumnKind::CompoundKeyComponent => self
                .codec()?
                .decode(wire)
                .map_err(|err| self.codec_error(err)),
            ColumnKind::Counter => Ok(wire.clone()),
            ColumnKind::EmbeddedKey => Err(self.not_transcodable()),
        }
    }

    /// Build a key instance from wire values given in canonical component
    /// order.
    pub fn decode_from_components(
        &self,
        wire: &[Value],
    ) -> Result<Box<dyn DynRecord>, TranscodeError> {
        let props = self.compound_key()?;
        if wire.len() != props.len() {
            return Err(TranscodeError::ComponentCount {
                key_type: props.key_type_name(),
                expected: props.len(),
                actual: wire.len(),
            });
        }

        let mut key = props.instantiate();
        for (component, wire) in props.all_components().zip(wire) {
            let value = component.transcoder().decode(wire)?;
            if value.is_null() {
                return Err(TranscodeError::NullComponent {
                    component: component.column_name().to_string(),
                    key_type: props.key_type_name(),
                });
            }

            component.set_value(key.as_mut(), value)?;
        }

        Ok(key)
    }

    /// Encoded component values of a key instance, all of them or the
    /// partition segment only. An absent key encodes to nothing.
    pub fn encode_to_components(
        &self,
        key: Option<&dyn DynRecord>,
        partition_only: bool,
    ) -> Result<Vec<Value>, TranscodeError> {
        let props = self.compound_key()?;
        let Some(key) = key else {
            return Ok(Vec::new());
        };

        props
            .components(partition_only)
            .map(|component| component.transcoder().encode(&component.get_value(key)?))
            .collect()
    }

    pub fn encode_partition_components(
        &self,
        values: &[Value],
    ) -> Result<Vec<Value>, TranscodeError> {
        let props = self.compound_key()?;
        encode_positional(props, props.partition(), values)
    }

    pub fn encode_clustering_components(
        &self,
        values: &[Value],
    ) -> Result<Vec<Value>, TranscodeError> {
        let props = self.compound_key()?;
        encode_positional(props, props.clustering(), values)
    }

    /// Encode the candidates of an `IN` restriction on the last partition
    /// component.
    pub fn encode_partition_components_in(
        &self,
        values: &[Value],
    ) -> Result<Vec<Value>, TranscodeError> {
        let props = self.compound_key()?;
        encode_with_last(props, props.partition(), values)
    }

    pub fn encode_clustering_components_in(
        &self,
        values: &[Value],
    ) -> Result<Vec<Value>, TranscodeError> {
        let props = self.compound_key()?;
        encode_with_last(props, props.clustering(), values)
    }

    /// Opaque string form of an encoded value, used where a counter's owning
    /// key is stored as a single text column.
    pub fn force_encode_to_json(&self, value: &Value) -> Result<String, TranscodeError> {
        let encoded = match self.column.kind() {
            ColumnKind::EmbeddedKey => value.clone(),
            _ => self.encode(value)?,
        };

        Ok(force_encode_to_json(&encoded))
    }

    fn codec(&self) -> Result<&'a dyn Codec, TranscodeError> {
        self.column.codec().ok_or_else(|| self.not_transcodable())
    }

    fn compound_key(&self) -> Result<&'a CompoundKeyProperties, TranscodeError> {
        self.column
            .compound_key()
            .ok_or_else(|| TranscodeError::NotAnEmbeddedKey {
                column: self.column.column_name().to_string(),
            })
    }

    fn codec_error(&self, source: CodecError) -> TranscodeError {
        TranscodeError::Codec {
            column: self.column.column_name().to_string(),
            source,
        }
    }

    fn not_transcodable(&self) -> TranscodeError {
        TranscodeError::NotTranscodable {
            column: self.column.column_name().to_string(),
            kind: self.column.kind(),
        }
    }
}

fn encode_positional(
    props: &CompoundKeyProperties,
    segment: &KeyComponents,
    values: &[Value],
) -> Result<Vec<Value>, TranscodeError> {
    if values.len() > segment.len() {
        return Err(TranscodeError::ComponentCount {
            key_type: props.key_type_name(),
            expected: segment.len(),
            actual: values.len(),
        });
    }

    segment
        .iter()
        .zip(values)
        .map(|(component, value)| component.transcoder().encode(value))
        .collect()
}

fn encode_with_last(
    props: &CompoundKeyProperties,
    segment: &KeyComponents,
    values: &[Value],
) -> Result<Vec<Value>, TranscodeError> {
    let Some(last) = segment.last() else {
        return Err(TranscodeError::ComponentCount {
            key_type: props.key_type_name(),
            expected: 0,
            actual: values.len(),
        });
    };

    values.iter().map(|value| last.transcoder().encode(value)).collect()
}

impl RecordMeta {
    #[must_use]
    pub const fn transcoding(&self) -> RecordTranscoding<'_> {
        RecordTranscoding { meta: self }
    }
}

///
/// RecordTranscoding
/// Entity level transcoding over a record instance.
///

#[derive(Clone, Copy)]
pub struct RecordTranscoding<'a> {
    meta: &'a RecordMeta,
}

impl<'a> RecordTranscoding<'a> {
    pub fn encode_column(&self, column: &str, value: &Value) -> Result<Value, TranscodeError> {
        self.lookup(column)?.transcoder().encode(value)
    }

    pub fn decode_column(&self, column: &str, wire: &Value) -> Result<Value, TranscodeError> {
        self.lookup(column)?.transcoder().decode(wire)
    }

    /// Encoded primary key: the single id, or the components of the embedded
    /// key (partition segment only when `partition_only`).
    pub fn encode_primary_key(
        &self,
        record: &dyn DynRecord,
        partition_only: bool,
    ) -> Result<Vec<Value>, TranscodeError> {
        let id = self.meta.id_meta();

        if id.compound_key().is_some() {
            let key = id.get_key(record)?;
            id.transcoder().encode_to_components(Some(key), partition_only)
        } else {
            Ok(vec![id.transcoder().encode(&id.get_value(record)?)?])
        }
    }

    /// Encoded values of every non-id, non-counter column, in declaration
    /// order.
    pub fn encode_columns(
        &self,
        record: &dyn DynRecord,
    ) -> Result<Vec<(&'a ColumnMeta, Value)>, TranscodeError> {
        self.meta
            .columns_except_id_and_counters()
            .map(|column| {
                let value = column.get_value(record)?;
                Ok((column, column.transcoder().encode(&value)?))
            })
            .collect()
    }

    fn lookup(&self, column: &str) -> Result<&'a ColumnMeta, TranscodeError> {
        self.meta
            .column(column)
            .ok_or_else(|| TranscodeError::UnknownColumn {
                entity: self.meta.type_name(),
                column: column.to_string(),
            })
    }
}
