use crate::value::{CqlType, Value, ValueEnum, ValueType, to_canonical_json};
use chrono::{NaiveDate, TimeZone, Utc};
use uuid::Uuid;

// ---- widening table ----------------------------------------------------

#[test]
fn integer_widening_is_accepted() {
    assert!(ValueType::BigInt.accepts(&ValueType::Int));
    assert!(ValueType::BigInt.accepts(&ValueType::TinyInt));
    assert!(ValueType::Int.accepts(&ValueType::SmallInt));
    assert!(ValueType::Double.accepts(&ValueType::Float));
}

#[test]
fn narrowing_and_cross_family_are_rejected() {
    assert!(!ValueType::Int.accepts(&ValueType::BigInt));
    assert!(!ValueType::Float.accepts(&ValueType::Double));
    assert!(!ValueType::Double.accepts(&ValueType::BigInt));
    assert!(!ValueType::Text.accepts(&ValueType::Uuid));
    assert!(!ValueType::TimeUuid.accepts(&ValueType::Uuid));
}

#[test]
fn subtypes_are_accepted() {
    assert!(ValueType::Uuid.accepts(&ValueType::TimeUuid));
    assert!(ValueType::Date.accepts(&ValueType::Timestamp));
    assert!(!ValueType::Timestamp.accepts(&ValueType::Date));
}

#[test]
fn any_json_is_accepted_where_json_is_declared() {
    let declared = ValueType::Json("app::Prefs".into());
    assert!(declared.accepts(&ValueType::Json(String::new())));
    assert!(declared.accepts(&ValueType::Json("app::Other".into())));
    assert!(declared.accepts_value(&Value::Json(serde_json::json!({ "dark": true }))));
    assert!(!declared.accepts(&ValueType::Text));
    assert!(!ValueType::Text.accepts(&ValueType::Json(String::new())));
}

#[test]
fn collections_are_checked_element_wise() {
    let declared = ValueType::List(Box::new(ValueType::BigInt));
    assert!(declared.accepts_value(&Value::List(vec![Value::Int(1), Value::BigInt(2)])));
    assert!(declared.accepts_value(&Value::List(vec![])));
    assert!(!declared.accepts_value(&Value::List(vec![Value::Text("x".into())])));
    assert!(!declared.accepts_value(&Value::Set(vec![Value::BigInt(1)])));
}

#[test]
fn enum_types_are_matched_by_path() {
    let declared = ValueType::Enum("app::Status".into());
    assert!(declared.accepts_value(&Value::Enum(ValueEnum::new("app::Status", "Active"))));
    assert!(!declared.accepts_value(&Value::Enum(ValueEnum::new("app::Other", "Active"))));
}

#[test]
fn type_names_use_rust_spelling() {
    assert_eq!(Value::BigInt(15).type_name(), "i64");
    assert_eq!(Value::Int(15).type_name(), "i32");
    assert_eq!(Value::Text("x".into()).type_name(), "String");
    assert_eq!(Value::List(vec![]).type_name(), "Vec<_>");
    assert_eq!(
        Value::Map(vec![(Value::Text("a".into()), Value::Int(1))]).type_name(),
        "BTreeMap<String, i32>"
    );
}

// ---- literals ------------------------------------------------------------

#[test]
fn literals_render_in_cql_syntax() {
    assert_eq!(Value::Text("it's".into()).to_cql_literal(), "'it''s'");
    assert_eq!(Value::BigInt(11).to_cql_literal(), "11");
    assert_eq!(Value::Boolean(true).to_cql_literal(), "true");
    assert_eq!(Value::Blob(vec![0x0a, 0xff]).to_cql_literal(), "0x0aff");
    assert_eq!(Value::Null.to_cql_literal(), "null");

    let ts = Utc.timestamp_millis_opt(1_000).single().expect("valid millis");
    assert_eq!(Value::Timestamp(ts).to_cql_literal(), "1000");

    let list = Value::List(vec![Value::Int(1), Value::Int(2)]);
    assert_eq!(list.to_cql_literal(), "[1,2]");

    let map = Value::Map(vec![(Value::Text("a".into()), Value::Int(1))]);
    assert_eq!(map.to_cql_literal(), "{'a':1}");
}

#[test]
fn float_literals_keep_their_precision() {
    assert_eq!(Value::Float(0.1).to_cql_literal(), "0.1");
    assert_eq!(Value::Double(0.1).to_cql_literal(), "0.1");
    assert_eq!(Value::Float(f32::NAN).to_cql_literal(), "NaN");
    assert_eq!(Value::Float(f32::NEG_INFINITY).to_cql_literal(), "-Infinity");
}

#[test]
fn uuid_literal_is_hyphenated() {
    let id = Uuid::nil();
    assert_eq!(
        Value::Uuid(id).to_cql_literal(),
        "00000000-0000-0000-0000-000000000000"
    );
}

// ---- wire-ness -----------------------------------------------------------

#[test]
fn wire_values_exclude_in_memory_only_variants() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 2).expect("valid date");
    assert!(!Value::Date(date).is_wire());
    assert!(!Value::List(vec![Value::Enum(ValueEnum::new("a", "b"))]).is_wire());
    assert!(Value::List(vec![Value::Int(1)]).is_wire());
}

// ---- json ----------------------------------------------------------------

#[test]
fn canonical_json_sorts_object_keys() {
    let value = Value::Map(vec![
        (Value::Text("b".into()), Value::Int(2)),
        (Value::Text("a".into()), Value::Int(1)),
    ]);
    assert_eq!(to_canonical_json(&value), r#"{"a":1,"b":2}"#);
}

// ---- cql types -----------------------------------------------------------

#[test]
fn cql_types_parse_their_display_form() {
    for spelling in ["text", "bigint", "list<text>", "set<int>", "map<text,list<int>>"] {
        let ty: CqlType = spelling.parse().expect("known type");
        assert_eq!(ty.to_string(), spelling);
    }
}

#[test]
fn cql_type_parsing_normalizes_aliases() {
    assert_eq!("VARCHAR".parse::<CqlType>(), Ok(CqlType::Text));
    assert_eq!(
        "map<text, int>".parse::<CqlType>(),
        Ok(CqlType::Map(Box::new(CqlType::Text), Box::new(CqlType::Int)))
    );
    assert!("frozen<text>".parse::<CqlType>().is_err());
}
