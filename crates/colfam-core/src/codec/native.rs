use crate::{
    codec::{Codec, CodecError},
    value::{CqlType, Value, ValueEnum, ValueType},
};
use chrono::{NaiveDate, NaiveTime};

/// Native column type a declared class is stored as.
fn wire_type_of(value_type: &ValueType) -> CqlType {
    match value_type {
        ValueType::Boolean => CqlType::Boolean,
        ValueType::TinyInt => CqlType::TinyInt,
        ValueType::SmallInt => CqlType::SmallInt,
        ValueType::Int => CqlType::Int,
        ValueType::BigInt => CqlType::BigInt,
        ValueType::Float => CqlType::Float,
        ValueType::Double => CqlType::Double,
        ValueType::Text | ValueType::Enum(_) | ValueType::Json(_) => CqlType::Text,
        ValueType::Timestamp | ValueType::Date => CqlType::Timestamp,
        ValueType::Uuid => CqlType::Uuid,
        ValueType::TimeUuid => CqlType::TimeUuid,
        ValueType::Blob => CqlType::Blob,
        ValueType::List(elem) => CqlType::List(Box::new(wire_type_of(elem))),
        ValueType::Set(elem) => CqlType::Set(Box::new(wire_type_of(elem))),
        ValueType::Map(key, value) => {
            CqlType::Map(Box::new(wire_type_of(key)), Box::new(wire_type_of(value)))
        }
    }
}

// Widen a value to the declared class, or `None` when not accepted.
fn coerce(declared: &ValueType, value: &Value) -> Option<Value> {
    let coerced = match (declared, value) {
        (ValueType::SmallInt, Value::TinyInt(v)) => Value::SmallInt(i16::from(*v)),
        (ValueType::Int, Value::TinyInt(v)) => Value::Int(i32::from(*v)),
        (ValueType::Int, Value::SmallInt(v)) => Value::Int(i32::from(*v)),
        (ValueType::BigInt, Value::TinyInt(v)) => Value::BigInt(i64::from(*v)),
        (ValueType::BigInt, Value::SmallInt(v)) => Value::BigInt(i64::from(*v)),
        (ValueType::BigInt, Value::Int(v)) => Value::BigInt(i64::from(*v)),
        (ValueType::Double, Value::Float(v)) => Value::Double(f64::from(*v)),
        (ValueType::Uuid, Value::TimeUuid(v)) => Value::Uuid(*v),
        (declared, value) if value.value_type().as_ref() == Some(declared) => value.clone(),
        _ => return None,
    };

    Some(coerced)
}

///
/// NativeCodec
/// Identity codec for classes the store understands natively, with widening.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NativeCodec {
    value_type: ValueType,
}

impl NativeCodec {
    #[must_use]
    pub const fn new(value_type: ValueType) -> Self {
        Self { value_type }
    }

    fn convert(&self, value: &Value) -> Result<Value, CodecError> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        coerce(&self.value_type, value)
            .ok_or_else(|| CodecError::unexpected(self.name(), &self.value_type, value))
    }
}

impl Codec for NativeCodec {
    fn name(&self) -> &'static str {
        "native"
    }

    fn source_type(&self) -> ValueType {
        self.value_type.clone()
    }

    fn wire_type(&self) -> CqlType {
        wire_type_of(&self.value_type)
    }

    fn encode(&self, value: &Value) -> Result<Value, CodecError> {
        self.convert(value)
    }

    fn decode(&self, wire: &Value) -> Result<Value, CodecError> {
        self.convert(wire)
    }
}

///
/// DateCodec
/// Stores a `NaiveDate` as a timestamp at midnight UTC.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DateCodec;

impl Codec for DateCodec {
    fn name(&self) -> &'static str {
        "date"
    }

    fn source_type(&self) -> ValueType {
        ValueType::Date
    }

    fn wire_type(&self) -> CqlType {
        CqlType::Timestamp
    }

    fn encode(&self, value: &Value) -> Result<Value, CodecError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Date(date) => Ok(Value::Timestamp(midnight_utc(*date))),
            Value::Timestamp(ts) => Ok(Value::Timestamp(*ts)),
            other => Err(CodecError::unexpected(self.name(), ValueType::Date, other)),
        }
    }

    fn decode(&self, wire: &Value) -> Result<Value, CodecError> {
        match wire {
            Value::Null => Ok(Value::Null),
            Value::Timestamp(ts) => Ok(Value::Date(ts.date_naive())),
            Value::Date(date) => Ok(Value::Date(*date)),
            other => Err(CodecError::unexpected(self.name(), CqlType::Timestamp, other)),
        }
    }
}

fn midnight_utc(date: NaiveDate) -> chrono::DateTime<chrono::Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

///
/// EnumCodec
/// Stores an enum by variant name.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnumCodec {
    path: String,
}

impl EnumCodec {
    #[must_use]
    pub const fn new(path: String) -> Self {
        Self { path }
    }
}

impl Codec for EnumCodec {
    fn name(&self) -> &'static str {
        "enum"
    }

    fn source_type(&self) -> ValueType {
        ValueType::Enum(self.path.clone())
    }

    fn wire_type(&self) -> CqlType {
        CqlType::Text
    }

    fn encode(&self, value: &Value) -> Result<Value, CodecError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Enum(e) if e.path == self.path => Ok(Value::Text(e.variant.clone())),
            Value::Text(variant) => Ok(Value::Text(variant.clone())),
            other => Err(CodecError::unexpected(self.name(), self.source_type(), other)),
        }
    }

    fn decode(&self, wire: &Value) -> Result<Value, CodecError> {
        match wire {
            Value::Null => Ok(Value::Null),
            Value::Text(variant) => Ok(Value::Enum(ValueEnum::new(
                self.path.clone(),
                variant.clone(),
            ))),
            other => Err(CodecError::unexpected(self.name(), CqlType::Text, other)),
        }
    }
}

///
/// JsonCodec
/// Stores a structured value as canonical JSON text.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JsonCodec {
    type_name: String,
}

impl JsonCodec {
    #[must_use]
    pub const fn new(type_name: String) -> Self {
        Self { type_name }
    }
}

impl Codec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn source_type(&self) -> ValueType {
        ValueType::Json(self.type_name.clone())
    }

    fn wire_type(&self) -> CqlType {
        CqlType::Text
    }

    fn encode(&self, value: &Value) -> Result<Value, CodecError> {
        match value {
            Value::Null => Ok(Value::Null),
            // serde_json objects without `preserve_order` serialize with sorted keys
            Value::Json(json) => serde_json::to_string(json)
                .map(Value::Text)
                .map_err(|err| CodecError::Json(err.to_string())),
            Value::Text(text) => Ok(Value::Text(text.clone())),
            other => Err(CodecError::unexpected(self.name(), self.source_type(), other)),
        }
    }

    fn decode(&self, wire: &Value) -> Result<Value, CodecError> {
        match wire {
            Value::Null => Ok(Value::Null),
            Value::Text(text) => serde_json::from_str(text)
                .map(Value::Json)
                .map_err(|err| CodecError::Json(err.to_string())),
            other => Err(CodecError::unexpected(self.name(), CqlType::Text, other)),
        }
    }
}
