use super::common::Field;
use super::{Schema, Variant};
use crate::error::AvroliteErr;
use crate::value::Value;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::str::FromStr;

fn primitive_schema_objects() -> HashMap<&'static str, Variant> {
    let mut s = HashMap::new();
    s.insert(r##"{ "type": "null" }"##, Variant::Null);
    s.insert(r##"{ "type": "boolean" }"##, Variant::Boolean);
    s.insert(r##"{ "type": "int" }"##, Variant::Int);
    s.insert(r##"{ "type": "long" }"##, Variant::Long);
    s.insert(r##"{ "type": "float" }"##, Variant::Float);
    s.insert(r##"{ "type": "double" }"##, Variant::Double);
    s.insert(r##"{ "type": "bytes" }"##, Variant::Bytes);
    s.insert(r##"{ "type": "string" }"##, Variant::Str);
    s
}

fn primitive_schema_strings() -> HashMap<&'static str, Variant> {
    let mut s = HashMap::new();
    s.insert(r##""null""##, Variant::Null);
    s.insert(r##""boolean""##, Variant::Boolean);
    s.insert(r##""int""##, Variant::Int);
    s.insert(r##""long""##, Variant::Long);
    s.insert(r##""float""##, Variant::Float);
    s.insert(r##""double""##, Variant::Double);
    s.insert(r##""bytes""##, Variant::Bytes);
    s.insert(r##""string""##, Variant::Str);
    s
}

#[test]
fn parse_primitives_as_json_objects() {
    for (s, v) in primitive_schema_objects() {
        let schema = Schema::from_str(s).unwrap();
        assert_eq!(schema.variant, v);
    }
}

#[test]
fn parse_primitives_as_json_strings() {
    for (s, v) in primitive_schema_strings() {
        let schema = Schema::from_str(s).unwrap();
        assert_eq!(schema.variant, v);
    }
}

#[test]
fn unknown_primitive_name_fails() {
    assert!(Schema::from_str(r##""integer""##).is_err());
}

#[test]
fn parse_record_with_defaults_and_link() {
    let schema = Schema::from_str(
        r##"{
            "type": "record",
            "name": "Can",
            "fields" : [
                {
                    "name": "next",
                    "type": ["null", "Can"]
                },
                {
                    "name": "value",
                    "type": "long",
                    "default": 1
                }
            ]
        }"##,
    )
    .unwrap();

    let mut fields = IndexMap::new();
    let f1 = Field::new(
        "next",
        Variant::Union {
            variants: vec![Variant::Null, Variant::Named("Can".to_string())],
        },
        None,
    )
    .unwrap();
    let f2 = Field::new("value", Variant::Long, Some(Value::Long(1))).unwrap();
    fields.insert("next".to_string(), f1);
    fields.insert("value".to_string(), f2);

    let expected = Variant::Record {
        name: "Can".to_string(),
        fields,
    };

    assert_eq!(&expected, schema.variant());
    assert!(schema.cxt.contains("Can"));
}

#[test]
fn nested_named_types_register() {
    let schema = Schema::from_str(
        r##"{
        "name": "longlist",
        "type": "record",
        "fields": [
            {"name": "magic", "type": {"type": "fixed", "name": "magic_marker", "size": 4}},
            {"name": "inner_rec", "type": {"type": "record", "name": "inner", "fields": [
                {
                    "name": "test",
                    "type": {"type": "fixed", "name": "hello", "size": 5}
                }
            ]}}
        ]
    }"##,
    )
    .unwrap();

    assert!(schema.cxt.contains("longlist"));
    assert!(schema.cxt.contains("magic_marker"));
    assert!(schema.cxt.contains("inner"));
    assert!(schema.cxt.contains("hello"));
}

#[test]
fn duplicate_named_schema_fails() {
    let schema = Schema::from_str(
        r##"{
        "name": "r",
        "type": "record",
        "fields": [
            {"name": "a", "type": {"type": "fixed", "name": "md5", "size": 16}},
            {"name": "b", "type": {"type": "fixed", "name": "md5", "size": 16}}
        ]
    }"##,
    );
    assert!(matches!(schema, Err(AvroliteErr::DuplicateSchema(_))));
}

#[test]
fn union_of_same_unnamed_type_fails() {
    assert!(Schema::from_str(r##"["int", "int"]"##).is_err());
    assert!(Schema::from_str(r##"["string", ["null", "int"]]"##).is_err());
}

#[test]
fn enum_symbols_parse_in_order() {
    let schema = Schema::from_str(
        r##"{"type": "enum", "name": "suits", "symbols": ["CLUBS", "DIAMONDS", "HEARTS", "SPADES"]}"##,
    )
    .unwrap();
    match schema.variant() {
        Variant::Enum { symbols, .. } => {
            assert_eq!(symbols, &["CLUBS", "DIAMONDS", "HEARTS", "SPADES"]);
        }
        other => panic!("expected an enum, got {:?}", other),
    }
}

#[test]
fn fixed_size_must_be_a_number() {
    assert!(Schema::from_str(r##"{"type": "fixed", "name": "f", "size": "big"}"##).is_err());
    assert!(Schema::from_str(r##"{"type": "fixed", "name": "f", "size": -2}"##).is_err());
}

///////////////////////////////////////////////////////////////////////////////
/// Structural equality
///////////////////////////////////////////////////////////////////////////////

const LONG_LIST: &str = r##"{
    "type": "record",
    "name": "LongList",
    "fields" : [
        {"name": "value", "type": "long"},
        {"name": "next", "type": ["null", "LongList"]}
    ]
}"##;

#[test]
fn equality_is_reflexive_on_recursive_schemas() {
    let a = Schema::from_str(LONG_LIST).unwrap();
    let b = Schema::from_str(LONG_LIST).unwrap();
    assert_eq!(a, a);
    assert_eq!(a, b);
    assert_eq!(b, a);
}

#[test]
fn equality_is_transitive() {
    let a = Schema::from_str(LONG_LIST).unwrap();
    let b = Schema::from_str(LONG_LIST).unwrap();
    let c = Schema::from_str(LONG_LIST).unwrap();
    assert!(a == b && b == c && a == c);
}

#[test]
fn field_schema_difference_breaks_equality() {
    let a = Schema::from_str(LONG_LIST).unwrap();
    let b = Schema::from_str(
        r##"{
        "type": "record",
        "name": "LongList",
        "fields" : [
            {"name": "value", "type": "int"},
            {"name": "next", "type": ["null", "LongList"]}
        ]
    }"##,
    )
    .unwrap();
    assert_ne!(a, b);
}

#[test]
fn name_difference_breaks_equality() {
    let a = Schema::from_str(r##"{"type": "fixed", "name": "a", "size": 2}"##).unwrap();
    let b = Schema::from_str(r##"{"type": "fixed", "name": "b", "size": 2}"##).unwrap();
    let a2 = Schema::from_str(r##"{"type": "fixed", "name": "a", "size": 2}"##).unwrap();
    assert_ne!(a, b);
    assert_eq!(a, a2);
}

///////////////////////////////////////////////////////////////////////////////
/// Validation
///////////////////////////////////////////////////////////////////////////////

#[test]
fn primitive_widenings_validate() {
    let long_schema = Schema::from_str(r##""long""##).unwrap();
    assert!(long_schema.validate(&Value::Int(1)).is_ok());
    assert!(long_schema.validate(&Value::Long(1)).is_ok());
    assert!(long_schema.validate(&Value::Float(1.0)).is_err());

    let double_schema = Schema::from_str(r##""double""##).unwrap();
    assert!(double_schema.validate(&Value::Int(1)).is_ok());
    assert!(double_schema.validate(&Value::Long(1)).is_ok());
    assert!(double_schema.validate(&Value::Float(1.0)).is_ok());
    assert!(double_schema.validate(&Value::Double(1.0)).is_ok());
    assert!(double_schema.validate(&Value::Str("1.0".into())).is_err());
}

#[test]
fn long_narrows_to_int_only_in_range() {
    let int_schema = Schema::from_str(r##""int""##).unwrap();
    assert!(int_schema.validate(&Value::Long(42)).is_ok());
    assert!(int_schema
        .validate(&Value::Long(i64::from(i32::MAX) + 1))
        .is_err());
}

#[test]
fn string_and_bool_do_not_conflate() {
    let bool_schema = Schema::from_str(r##""boolean""##).unwrap();
    assert!(bool_schema.validate(&Value::Str("true".into())).is_err());
    let str_schema = Schema::from_str(r##""string""##).unwrap();
    assert!(str_schema.validate(&Value::Boolean(true)).is_err());
}

#[test]
fn array_elements_all_validate() {
    let schema = Schema::from_str(r##"{"type": "array", "items": "int"}"##).unwrap();
    assert!(schema.validate(&Value::Array(vec![])).is_ok());
    assert!(schema
        .validate(&Value::Array(vec![Value::Int(1), Value::Int(2)]))
        .is_ok());
    assert!(schema
        .validate(&Value::Array(vec![Value::Int(1), Value::Str("2".into())]))
        .is_err());
}

#[test]
fn record_validates_against_recursive_schema() {
    let schema = Schema::from_str(LONG_LIST).unwrap();
    let mut tail = crate::Record::new("LongList");
    tail.insert("value", 2i64).unwrap();
    tail.insert("next", Value::Null).unwrap();
    let mut head = crate::Record::new("LongList");
    head.insert("value", 1i64).unwrap();
    head.insert("next", Value::Record(tail)).unwrap();
    assert!(schema.validate(&Value::Record(head)).is_ok());
}

#[test]
fn record_with_unknown_datum_field_fails() {
    let schema = Schema::from_str(
        r##"{"type": "record", "name": "r", "fields": [{"name": "a", "type": "int"}]}"##,
    )
    .unwrap();
    let mut rec = crate::Record::new("r");
    rec.insert("a", 1i32).unwrap();
    rec.insert("b", 2i32).unwrap();
    assert!(schema.validate(&Value::Record(rec)).is_err());
}

#[test]
fn union_validates_any_branch() {
    let schema = Schema::from_str(r##"["null", "string"]"##).unwrap();
    assert!(schema.validate(&Value::Null).is_ok());
    assert!(schema.validate(&Value::Str("a".into())).is_ok());
    assert!(schema.validate(&Value::Int(1)).is_err());
}
