use crate::value::Value;
use serde_json::{Map, Number, Value as JsonValue};

/// Convert a value into its canonical JSON form.
///
/// Object keys are sorted (serde_json's default map is ordered), maps with
/// non-text keys use the key's display form, non-finite floats become `null`.
#[must_use]
pub fn to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Boolean(v) => JsonValue::Bool(*v),
        Value::TinyInt(v) => JsonValue::from(*v),
        Value::SmallInt(v) => JsonValue::from(*v),
        Value::Int(v) => JsonValue::from(*v),
        Value::BigInt(v) => JsonValue::from(*v),
        Value::Float(v) => float(f64::from(*v)),
        Value::Double(v) => float(*v),
        Value::Text(s) => JsonValue::String(s.clone()),
        Value::Timestamp(ts) => JsonValue::from(ts.timestamp_millis()),
        Value::Date(d) => JsonValue::String(d.format("%Y-%m-%d").to_string()),
        Value::Uuid(u) | Value::TimeUuid(u) => JsonValue::String(u.hyphenated().to_string()),
        Value::Blob(_) => JsonValue::String(value.to_cql_literal()),
        Value::Enum(e) => JsonValue::String(e.variant.clone()),
        Value::Json(j) => j.clone(),
        Value::List(items) | Value::Set(items) => {
            JsonValue::Array(items.iter().map(to_json).collect())
        }
        Value::Map(entries) => {
            let object = entries
                .iter()
                .map(|(k, v)| (k.to_string(), to_json(v)))
                .collect::<Map<_, _>>();
            JsonValue::Object(object)
        }
    }
}

/// Serialize a value to its canonical compact JSON document.
#[must_use]
pub fn to_canonical_json(value: &Value) -> String {
    to_json(value).to_string()
}

fn float(v: f64) -> JsonValue {
    Number::from_f64(v).map_or(JsonValue::Null, JsonValue::Number)
}
