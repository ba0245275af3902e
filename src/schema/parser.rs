//! The schema JSON front-end.
//!
//! Schemas in JSON notation are either a string naming a primitive or a
//! previously declared named type, an object with a `type` field, or an
//! array of schemas forming a union. The parser builds unfrozen
//! [`SchemaNode`]s through the builder surface and freezes the result.

use super::builder::SchemaNode;
use super::{Schema, Variant};
use crate::error::{AvroliteErr, AvroliteResult};
use crate::value::{Record, Value};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashSet;

pub(crate) fn parse_schema_json(json: &JsonValue) -> AvroliteResult<Schema> {
    let mut declared = HashSet::new();
    let root = parse_node(json, &mut declared)?;
    Schema::freeze(root)
}

// `declared` tracks named types seen so far, so a bare string can be told
// apart between an unknown primitive and a back-reference.
fn parse_node(value: &JsonValue, declared: &mut HashSet<String>) -> AvroliteResult<SchemaNode> {
    match value {
        JsonValue::Object(schema) => parse_object(schema, declared),
        JsonValue::String(schema) => parse_primitive(schema, declared),
        JsonValue::Array(schema) => parse_union(schema, declared),
        _ => Err(AvroliteErr::UnknownSchema),
    }
}

fn parse_primitive(schema: &str, declared: &mut HashSet<String>) -> AvroliteResult<SchemaNode> {
    match schema {
        "null" => Ok(SchemaNode::null()),
        "boolean" => Ok(SchemaNode::boolean()),
        "int" => Ok(SchemaNode::int()),
        "long" => Ok(SchemaNode::long()),
        "float" => Ok(SchemaNode::float()),
        "double" => Ok(SchemaNode::double()),
        "bytes" => Ok(SchemaNode::bytes()),
        "string" => Ok(SchemaNode::string()),
        other if declared.contains(other) => SchemaNode::link(other),
        other => Err(AvroliteErr::UnresolvedLink(other.to_string())),
    }
}

fn parse_union(
    branches: &[JsonValue],
    declared: &mut HashSet<String>,
) -> AvroliteResult<SchemaNode> {
    let mut union = SchemaNode::union();
    for branch in branches {
        union.append_branch(parse_node(branch, declared)?)?;
    }
    Ok(union)
}

fn name_of(value: &Map<String, JsonValue>) -> AvroliteResult<&str> {
    match value.get("name") {
        Some(JsonValue::String(s)) => Ok(s),
        _ => Err(AvroliteErr::RecordNameNotFound),
    }
}

fn parse_object(
    value: &Map<String, JsonValue>,
    declared: &mut HashSet<String>,
) -> AvroliteResult<SchemaNode> {
    let ty = match value.get("type") {
        Some(JsonValue::String(s)) => s.as_str(),
        _ => return Err(AvroliteErr::SchemaParseFailed),
    };
    match ty {
        "record" => {
            let name = name_of(value)?;
            let mut record = SchemaNode::record(name)?;
            // declared up front so fields may refer back to this record
            declared.insert(name.to_string());

            let fields = match value.get("fields") {
                Some(JsonValue::Array(fields)) => fields,
                _ => return Err(AvroliteErr::ExpectedFieldsJsonArray),
            };
            for field in fields {
                let field = match field {
                    JsonValue::Object(o) => o,
                    _ => return Err(AvroliteErr::InvalidRecordFieldType),
                };
                let field_name = field
                    .get("name")
                    .and_then(|n| n.as_str())
                    .ok_or(AvroliteErr::RecordNameNotFound)?;
                let field_ty = field.get("type").ok_or(AvroliteErr::RecordTypeNotFound)?;
                let field_ty = parse_node(field_ty, declared)?;

                match field.get("default") {
                    Some(default) => {
                        let default = parse_default(default, field_ty.variant())?;
                        record.append_field_default(field_name, field_ty, default)?;
                    }
                    None => record.append_field(field_name, field_ty)?,
                }
            }
            Ok(record)
        }
        "enum" => {
            let name = name_of(value)?;
            let mut enum_schema = SchemaNode::enumeration(name)?;
            declared.insert(name.to_string());

            let symbols = match value.get("symbols") {
                Some(JsonValue::Array(symbols)) => symbols,
                Some(_) => return Err(AvroliteErr::EnumSymbolParseErr),
                None => return Err(AvroliteErr::EnumSymbolsMissing),
            };
            for symbol in symbols {
                let symbol = symbol.as_str().ok_or(AvroliteErr::EnumSymbolParseErr)?;
                enum_schema.append_symbol(symbol)?;
            }
            Ok(enum_schema)
        }
        "fixed" => {
            let name = name_of(value)?;
            let size = value.get("size").ok_or(AvroliteErr::FixedSizeNotFound)?;
            let size = size.as_u64().ok_or(AvroliteErr::FixedSizeNotNumber)?;
            let fixed = SchemaNode::fixed(name, size as usize)?;
            declared.insert(name.to_string());
            Ok(fixed)
        }
        "array" => {
            let items = value.get("items").ok_or(AvroliteErr::SchemaParseFailed)?;
            Ok(SchemaNode::array(parse_node(items, declared)?))
        }
        "map" => {
            let values = value.get("values").ok_or(AvroliteErr::SchemaParseFailed)?;
            Ok(SchemaNode::map(parse_node(values, declared)?))
        }
        // {"type": "int"} is the object spelling of a primitive
        primitive => parse_primitive(primitive, declared),
    }
}

pub(crate) fn parse_default(
    default_value: &JsonValue,
    schema_variant: &Variant,
) -> Result<Value, AvroliteErr> {
    match (default_value, schema_variant) {
        // a union field's default conforms to the union's first branch
        (d, Variant::Union { variants }) => {
            let first_variant = variants.first().ok_or(AvroliteErr::DefaultValueParse)?;
            parse_default(d, first_variant)
        }
        (JsonValue::Null, Variant::Null) => Ok(Value::Null),
        (JsonValue::Bool(v), Variant::Boolean) => Ok(Value::Boolean(*v)),
        (JsonValue::Number(n), Variant::Int) => Ok(Value::Int(
            n.as_i64().ok_or(AvroliteErr::DefaultValueParse)? as i32,
        )),
        (JsonValue::Number(n), Variant::Long) => {
            Ok(Value::Long(n.as_i64().ok_or(AvroliteErr::DefaultValueParse)?))
        }
        (JsonValue::Number(n), Variant::Float) => Ok(Value::Float(
            n.as_f64().ok_or(AvroliteErr::DefaultValueParse)? as f32,
        )),
        (JsonValue::Number(n), Variant::Double) => {
            Ok(Value::Double(n.as_f64().ok_or(AvroliteErr::DefaultValueParse)?))
        }
        (JsonValue::String(s), Variant::Bytes) => Ok(Value::Bytes(s.as_bytes().to_vec())),
        (JsonValue::String(s), Variant::Str) => Ok(Value::Str(s.clone())),
        (JsonValue::String(s), Variant::Enum { symbols, .. }) => {
            if symbols.contains(s) {
                Ok(Value::Enum(s.clone()))
            } else {
                Err(AvroliteErr::DefaultValueParse)
            }
        }
        (JsonValue::String(s), Variant::Fixed { size, .. }) => {
            let bytes = s.as_bytes().to_vec();
            if bytes.len() == *size {
                Ok(Value::Fixed(bytes))
            } else {
                Err(AvroliteErr::DefaultValueParse)
            }
        }
        (JsonValue::Object(v), Variant::Record { name, fields }) => {
            let mut record = Record::new(name);
            for (k, v) in v {
                let field = fields.get(k).ok_or(AvroliteErr::DefaultValueParse)?;
                let parsed = parse_default(v, &field.ty)?;
                record.insert(k, parsed)?;
            }
            Ok(Value::Record(record))
        }
        (JsonValue::Array(arr), Variant::Array { items }) => {
            let mut default_items = Vec::with_capacity(arr.len());
            for v in arr {
                default_items.push(parse_default(v, items)?);
            }
            Ok(Value::Array(default_items))
        }
        (JsonValue::Object(map), Variant::Map { values }) => {
            let mut default_map = std::collections::HashMap::with_capacity(map.len());
            for (k, v) in map {
                default_map.insert(k.to_string(), parse_default(v, values)?);
            }
            Ok(Value::Map(default_map))
        }
        (_d, _s) => Err(AvroliteErr::DefaultValueParse),
    }
}
