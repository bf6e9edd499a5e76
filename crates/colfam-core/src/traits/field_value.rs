use crate::{
    model::ColumnKind,
    traits::{AccessError, FieldShape, FieldValue},
    types::{Blob, Counter, Json, TimeUuid},
    value::{Value, ValueType},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Serialize, de::DeserializeOwned};
use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet},
    hash::Hash,
};
use uuid::Uuid;

// Scalars whose Value variant(s) map one-to-one onto the Rust type. Extra
// source variants list the accepted widenings.
macro_rules! impl_scalar_field_value {
    ( $( $ty:ty => $value_type:ident, $variant:ident $( | $widen:ident )* ; )* ) => {
        $(
            impl FieldValue for $ty {
                fn shape() -> FieldShape {
                    FieldShape::scalar(ValueType::$value_type)
                }

                fn to_value(&self) -> Value {
                    Value::$variant(self.clone())
                }

                fn from_value(value: Value) -> Result<Self, AccessError> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        $( Value::$widen(v) => Ok(Self::from(v)), )*
                        other => Err(AccessError::wrong_type(ValueType::$value_type, &other)),
                    }
                }
            }
        )*
    };
}

impl_scalar_field_value! {
    bool => Boolean, Boolean;
    i8 => TinyInt, TinyInt;
    i16 => SmallInt, SmallInt | TinyInt;
    i32 => Int, Int | SmallInt | TinyInt;
    i64 => BigInt, BigInt | Int | SmallInt | TinyInt;
    f32 => Float, Float;
    f64 => Double, Double | Float;
    String => Text, Text;
    DateTime<Utc> => Timestamp, Timestamp;
}

impl FieldValue for NaiveDate {
    fn shape() -> FieldShape {
        FieldShape::scalar(ValueType::Date)
    }

    fn to_value(&self) -> Value {
        Value::Date(*self)
    }

    fn from_value(value: Value) -> Result<Self, AccessError> {
        match value {
            Value::Date(d) => Ok(d),
            Value::Timestamp(ts) => Ok(ts.date_naive()),
            other => Err(AccessError::wrong_type(ValueType::Date, &other)),
        }
    }
}

impl FieldValue for Uuid {
    fn shape() -> FieldShape {
        FieldShape::scalar(ValueType::Uuid)
    }

    fn to_value(&self) -> Value {
        Value::Uuid(*self)
    }

    fn from_value(value: Value) -> Result<Self, AccessError> {
        match value {
            Value::Uuid(u) | Value::TimeUuid(u) => Ok(u),
            other => Err(AccessError::wrong_type(ValueType::Uuid, &other)),
        }
    }
}

impl FieldValue for TimeUuid {
    fn shape() -> FieldShape {
        FieldShape::scalar(ValueType::TimeUuid)
    }

    fn to_value(&self) -> Value {
        Value::TimeUuid(self.0)
    }

    fn from_value(value: Value) -> Result<Self, AccessError> {
        match value {
            Value::TimeUuid(u) => Ok(Self(u)),
            other => Err(AccessError::wrong_type(ValueType::TimeUuid, &other)),
        }
    }
}

impl FieldValue for Blob {
    fn shape() -> FieldShape {
        FieldShape::scalar(ValueType::Blob)
    }

    fn to_value(&self) -> Value {
        Value::Blob(self.0.clone())
    }

    fn from_value(value: Value) -> Result<Self, AccessError> {
        match value {
            Value::Blob(bytes) => Ok(Self(bytes)),
            other => Err(AccessError::wrong_type(ValueType::Blob, &other)),
        }
    }
}

impl FieldValue for Counter {
    fn shape() -> FieldShape {
        FieldShape {
            kind: ColumnKind::Counter,
            value_type: ValueType::BigInt,
            key_type: None,
        }
    }

    fn to_value(&self) -> Value {
        Value::BigInt(self.0)
    }

    fn from_value(value: Value) -> Result<Self, AccessError> {
        i64::from_value(value).map(Self)
    }
}

impl<T> FieldValue for Json<T>
where
    T: Serialize + DeserializeOwned,
{
    fn shape() -> FieldShape {
        FieldShape::scalar(ValueType::Json(std::any::type_name::<T>().to_string()))
    }

    fn to_value(&self) -> Value {
        serde_json::to_value(&self.0).map_or(Value::Null, Value::Json)
    }

    fn from_value(value: Value) -> Result<Self, AccessError> {
        let expected = || std::any::type_name::<T>().to_string();
        let decoded = match value {
            Value::Json(json) => serde_json::from_value(json),
            Value::Text(text) => serde_json::from_str(&text),
            other => return Err(AccessError::wrong_type(format!("Json<{}>", expected()), &other)),
        };

        decoded.map(Self).map_err(|err| AccessError::Json {
            expected: expected(),
            message: err.to_string(),
        })
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn shape() -> FieldShape {
        T::shape()
    }

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, FieldValue::to_value)
    }

    fn from_value(value: Value) -> Result<Self, AccessError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

fn collection_shape<T: FieldValue>(kind: ColumnKind) -> FieldShape {
    FieldShape {
        kind,
        value_type: T::shape().value_type,
        key_type: None,
    }
}

// Lists and sets decode from either collection variant; absent collections
// decode to empty ones.
fn collection_items(value: Value, expected: &str) -> Result<Vec<Value>, AccessError> {
    match value {
        Value::List(items) | Value::Set(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        other => Err(AccessError::wrong_type(expected, &other)),
    }
}

fn map_entries(value: Value) -> Result<Vec<(Value, Value)>, AccessError> {
    match value {
        Value::Map(entries) => Ok(entries),
        Value::Null => Ok(Vec::new()),
        other => Err(AccessError::wrong_type("map", &other)),
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn shape() -> FieldShape {
        collection_shape::<T>(ColumnKind::List)
    }

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(FieldValue::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, AccessError> {
        collection_items(value, "list")?
            .into_iter()
            .map(T::from_value)
            .collect()
    }
}

impl<T: FieldValue + Ord> FieldValue for BTreeSet<T> {
    fn shape() -> FieldShape {
        collection_shape::<T>(ColumnKind::Set)
    }

    fn to_value(&self) -> Value {
        Value::Set(self.iter().map(FieldValue::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, AccessError> {
        collection_items(value, "set")?
            .into_iter()
            .map(T::from_value)
            .collect()
    }
}

impl<T: FieldValue + Eq + Hash> FieldValue for HashSet<T> {
    fn shape() -> FieldShape {
        collection_shape::<T>(ColumnKind::Set)
    }

    fn to_value(&self) -> Value {
        Value::Set(self.iter().map(FieldValue::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, AccessError> {
        collection_items(value, "set")?
            .into_iter()
            .map(T::from_value)
            .collect()
    }
}

fn map_shape<K: FieldValue, V: FieldValue>() -> FieldShape {
    FieldShape {
        kind: ColumnKind::Map,
        value_type: V::shape().value_type,
        key_type: Some(K::shape().value_type),
    }
}

impl<K: FieldValue + Ord, V: FieldValue> FieldValue for BTreeMap<K, V> {
    fn shape() -> FieldShape {
        map_shape::<K, V>()
    }

    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.to_value(), v.to_value()))
                .collect(),
        )
    }

    fn from_value(value: Value) -> Result<Self, AccessError> {
        map_entries(value)?
            .into_iter()
            .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
            .collect()
    }
}

impl<K: FieldValue + Eq + Hash, V: FieldValue> FieldValue for HashMap<K, V> {
    fn shape() -> FieldShape {
        map_shape::<K, V>()
    }

    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.to_value(), v.to_value()))
                .collect(),
        )
    }

    fn from_value(value: Value) -> Result<Self, AccessError> {
        map_entries(value)?
            .into_iter()
            .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
            .collect()
    }
}
