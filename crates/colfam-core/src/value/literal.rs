use crate::value::{Value, json::to_canonical_json};
use std::fmt::Write as _;

// CQL literal rendering. Text is single-quoted with embedded quotes doubled,
// timestamps render as epoch milliseconds, blobs as 0x-prefixed hex.
pub(super) fn render(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Boolean(v) => v.to_string(),
        Value::TinyInt(v) => v.to_string(),
        Value::SmallInt(v) => v.to_string(),
        Value::Int(v) => v.to_string(),
        Value::BigInt(v) => v.to_string(),
        Value::Float(v) => render_float(*v),
        Value::Double(v) => render_float(*v),
        Value::Text(s) => quote(s),
        Value::Timestamp(ts) => ts.timestamp_millis().to_string(),
        Value::Date(d) => quote(&d.format("%Y-%m-%d").to_string()),
        Value::Uuid(u) | Value::TimeUuid(u) => u.hyphenated().to_string(),
        Value::Blob(bytes) => {
            let mut out = String::with_capacity(2 + bytes.len() * 2);
            out.push_str("0x");
            for b in bytes {
                let _ = write!(out, "{b:02x}");
            }
            out
        }
        Value::Enum(e) => quote(&e.variant),
        Value::Json(_) => quote(&to_canonical_json(value)),
        Value::List(items) => format!("[{}]", join(items)),
        Value::Set(items) => format!("{{{}}}", join(items)),
        Value::Map(entries) => {
            let body = entries
                .iter()
                .map(|(k, v)| format!("{}:{}", render(k), render(v)))
                .collect::<Vec<_>>()
                .join(",");
            format!("{{{body}}}")
        }
    }
}

fn join(items: &[Value]) -> String {
    items.iter().map(render).collect::<Vec<_>>().join(",")
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

// Finite floats render in their own precision.
fn render_float<F: Copy + Into<f64> + ToString>(v: F) -> String {
    let wide: f64 = v.into();

    if wide.is_nan() {
        "NaN".to_string()
    } else if wide.is_infinite() {
        if wide > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        v.to_string()
    }
}
