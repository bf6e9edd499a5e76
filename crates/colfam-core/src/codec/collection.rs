use crate::{
    codec::{Codec, CodecError},
    value::{CqlType, Value, ValueType},
};
use std::sync::Arc;

fn convert_items(
    items: &[Value],
    f: impl Fn(&Value) -> Result<Value, CodecError>,
) -> Result<Vec<Value>, CodecError> {
    items.iter().map(f).collect()
}

///
/// ListCodec
///

#[derive(Clone, Debug)]
pub struct ListCodec {
    element: Arc<dyn Codec>,
}

impl ListCodec {
    #[must_use]
    pub fn new(element: Arc<dyn Codec>) -> Self {
        Self { element }
    }
}

impl Codec for ListCodec {
    fn name(&self) -> &'static str {
        "list"
    }

    fn source_type(&self) -> ValueType {
        ValueType::List(Box::new(self.element.source_type()))
    }

    fn wire_type(&self) -> CqlType {
        CqlType::List(Box::new(self.element.wire_type()))
    }

    fn encode(&self, value: &Value) -> Result<Value, CodecError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::List(items) => Ok(Value::List(convert_items(items, |v| {
                self.element.encode(v)
            })?)),
            other => Err(CodecError::unexpected(self.name(), self.source_type(), other)),
        }
    }

    fn decode(&self, wire: &Value) -> Result<Value, CodecError> {
        match wire {
            Value::Null => Ok(Value::Null),
            Value::List(items) => Ok(Value::List(convert_items(items, |v| {
                self.element.decode(v)
            })?)),
            other => Err(CodecError::unexpected(self.name(), self.wire_type(), other)),
        }
    }
}

///
/// SetCodec
/// Also accepts list values on encode, since callers often build sets as lists.
///

#[derive(Clone, Debug)]
pub struct SetCodec {
    element: Arc<dyn Codec>,
}

impl SetCodec {
    #[must_use]
    pub fn new(element: Arc<dyn Codec>) -> Self {
        Self { element }
    }
}

impl Codec for SetCodec {
    fn name(&self) -> &'static str {
        "set"
    }

    fn source_type(&self) -> ValueType {
        ValueType::Set(Box::new(self.element.source_type()))
    }

    fn wire_type(&self) -> CqlType {
        CqlType::Set(Box::new(self.element.wire_type()))
    }

    fn encode(&self, value: &Value) -> Result<Value, CodecError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Set(items) | Value::List(items) => {
                Ok(Value::Set(convert_items(items, |v| self.element.encode(v))?))
            }
            other => Err(CodecError::unexpected(self.name(), self.source_type(), other)),
        }
    }

    fn decode(&self, wire: &Value) -> Result<Value, CodecError> {
        match wire {
            Value::Null => Ok(Value::Null),
            Value::Set(items) => Ok(Value::Set(convert_items(items, |v| self.element.decode(v))?)),
            other => Err(CodecError::unexpected(self.name(), self.wire_type(), other)),
        }
    }
}

///
/// MapCodec
///

#[derive(Clone, Debug)]
pub struct MapCodec {
    key: Arc<dyn Codec>,
    value: Arc<dyn Codec>,
}

impl MapCodec {
    #[must_use]
    pub fn new(key: Arc<dyn Codec>, value: Arc<dyn Codec>) -> Self {
        Self { key, value }
    }

    fn convert(
        &self,
        entries: &[(Value, Value)],
        encode: bool,
    ) -> Result<Vec<(Value, Value)>, CodecError> {
        entries
            .iter()
            .map(|(k, v)| {
                if encode {
                    Ok((self.key.encode(k)?, self.value.encode(v)?))
                } else {
                    Ok((self.key.decode(k)?, self.value.decode(v)?))
                }
            })
            .collect()
    }
}

impl Codec for MapCodec {
    fn name(&self) -> &'static str {
        "map"
    }

    fn source_type(&self) -> ValueType {
        ValueType::Map(
            Box::new(self.key.source_type()),
            Box::new(self.value.source_type()),
        )
    }

    fn wire_type(&self) -> CqlType {
        CqlType::Map(
            Box::new(self.key.wire_type()),
            Box::new(self.value.wire_type()),
        )
    }

    fn encode(&self, value: &Value) -> Result<Value, CodecError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Map(entries) => Ok(Value::Map(self.convert(entries, true)?)),
            other => Err(CodecError::unexpected(self.name(), self.source_type(), other)),
        }
    }

    fn decode(&self, wire: &Value) -> Result<Value, CodecError> {
        match wire {
            Value::Null => Ok(Value::Null),
            Value::Map(entries) => Ok(Value::Map(self.convert(entries, false)?)),
            other => Err(CodecError::unexpected(self.name(), self.wire_type(), other)),
        }
    }
}
