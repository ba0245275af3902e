//! The in-memory datum model and its serialization path.

use crate::codec::{
    encode_bool, encode_bytes, encode_double, encode_float, encode_int, encode_long,
    encode_raw_bytes,
};
use crate::error::{AvroliteErr, AvroliteResult};
use crate::schema::common::validate_name;
use crate::schema::{Registry, Variant};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::io::Write;

/// Convenient type alias for map initialization.
pub type Map = HashMap<String, Value>;

/// A record value: an ordered mapping from field names to values.
///
/// The record's name must match the name of the record schema it is
/// written with; it is what selects the correct branch when a union
/// contains several record schemas.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub(crate) name: String,
    pub(crate) fields: IndexMap<String, Value>,
}

impl Record {
    /// Creates a new record value with the given name and no fields.
    pub fn new(name: &str) -> Self {
        Record {
            name: name.to_string(),
            fields: IndexMap::new(),
        }
    }

    /// The record's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a field to the record.
    pub fn insert<T: Into<Value>>(&mut self, field_name: &str, value: T) -> AvroliteResult<()> {
        validate_name(field_name)?;
        self.fields.insert(field_name.to_string(), value.into());
        Ok(())
    }

    /// Returns the value of the named field, if present.
    pub fn get(&self, field_name: &str) -> Option<&Value> {
        self.fields.get(field_name)
    }

    /// Iterates the fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Creates a record from a
    /// [BTreeMap](https://doc.rust-lang.org/std/collections/struct.BTreeMap.html)
    /// by consuming it. The values must implement `Into<Value>`. The `name`
    /// provided must match the name in the record schema being written.
    pub fn from_btree<K: Into<String> + Ord + Display, V: Into<Value>>(
        name: &str,
        btree: BTreeMap<K, V>,
    ) -> AvroliteResult<Self> {
        let mut record = Record::new(name);
        for (k, v) in btree {
            record.insert(&k.to_string(), v.into())?;
        }
        Ok(record)
    }
}

/// A concrete value annotated with its type tag.
///
/// Values mirror the schema tags. There is no link arm (links are followed
/// during encode and decode) and no explicit union arm: the union branch is
/// chosen at encode time by validating the value against each branch.
///
/// Equality on floats and doubles compares bit patterns, so a round-tripped
/// `NaN` compares equal to the value that was written and `0.0` differs
/// from `-0.0`.
#[derive(Debug, Clone)]
pub enum Value {
    /// A null value.
    Null,
    /// A boolean value.
    Boolean(bool),
    /// An i32 integer value.
    Int(i32),
    /// An i64 long value.
    Long(i64),
    /// An f32 float value.
    Float(f32),
    /// An f64 double value.
    Double(f64),
    /// A sequence of u8 bytes.
    Bytes(Vec<u8>),
    /// Rust strings map directly to avro-style strings.
    Str(String),
    /// A record value with named, ordered fields.
    Record(Record),
    /// An enumeration symbol. Unlike Rust enums, variants carry no data.
    Enum(String),
    /// An array of values sharing one item schema.
    Array(Vec<Value>),
    /// A mapping from string keys to values sharing one value schema.
    Map(Map),
    /// A fixed-length sequence of bytes.
    Fixed(Vec<u8>),
}

// Floats compare by bit pattern: NaN payloads survive a round trip and
// must still compare equal, while the signed zeros are distinct encodings.
// Containers recurse through this same equality.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Fixed(a), Value::Fixed(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    pub(crate) fn encode<W: Write>(
        &self,
        writer: &mut W,
        schema: &Variant,
        cxt: &Registry,
    ) -> AvroliteResult<()> {
        match (self, schema) {
            (Value::Null, Variant::Null) => {}
            (Value::Boolean(b), Variant::Boolean) => encode_bool(*b, writer)?,
            (Value::Int(i), Variant::Int) => {
                encode_int(*i, writer)?;
            }
            // int is promotable to long, float or double ---
            (Value::Int(i), Variant::Long) => {
                encode_long(i64::from(*i), writer)?;
            }
            (Value::Int(i), Variant::Float) => encode_float(*i as f32, writer)?,
            (Value::Int(i), Variant::Double) => encode_double(*i as f64, writer)?,
            // ---
            (Value::Long(l), Variant::Long) => {
                encode_long(*l, writer)?;
            }
            // a long narrows to int when its value fits
            (Value::Long(l), Variant::Int) => {
                let narrowed = i32::try_from(*l).map_err(|_| AvroliteErr::SchemaDataMismatch)?;
                encode_int(narrowed, writer)?;
            }
            (Value::Long(l), Variant::Float) => encode_float(*l as f32, writer)?,
            (Value::Long(l), Variant::Double) => encode_double(*l as f64, writer)?,
            (Value::Float(f), Variant::Float) => encode_float(*f, writer)?,
            // float is promotable to double ---
            (Value::Float(f), Variant::Double) => encode_double(f64::from(*f), writer)?,
            (Value::Double(d), Variant::Double) => encode_double(*d, writer)?,
            (Value::Bytes(b), Variant::Bytes) => encode_bytes(b, writer)?,
            (Value::Str(s), Variant::Str) => encode_bytes(s.as_bytes(), writer)?,
            (Value::Fixed(v), Variant::Fixed { size, .. }) => {
                if v.len() != *size {
                    return Err(AvroliteErr::FixedValueLenMismatch {
                        found: v.len(),
                        expected: *size,
                    });
                }
                encode_raw_bytes(v, writer)?;
            }
            (value, Variant::Named(name)) => {
                let target = cxt
                    .get(name)
                    .ok_or_else(|| AvroliteErr::UnresolvedLink(name.clone()))?;
                value.encode(writer, target, cxt)?;
            }
            // union resolution must come before the more specific arms
            (value, Variant::Union { variants }) => {
                let (branch_idx, branch) = resolve_union(value, variants, cxt)?;
                encode_long(branch_idx as i64, writer)?;
                value.encode(writer, branch, cxt)?;
            }
            (Value::Record(record), Variant::Record { fields, .. }) => {
                // fields are written in schema order, not datum order
                for (fname, field) in fields {
                    match record.fields.get(fname) {
                        Some(value) => value.encode(writer, &field.ty, cxt)?,
                        None => match &field.default {
                            Some(default) => default.encode(writer, &field.ty, cxt)?,
                            None => return Err(AvroliteErr::MissingField(fname.clone())),
                        },
                    }
                }
            }
            (Value::Enum(symbol), Variant::Enum { symbols, .. }) => {
                let idx = symbols
                    .iter()
                    .position(|s| s == symbol)
                    .ok_or(AvroliteErr::EnumSymbolNotPresent)?;
                encode_long(idx as i64, writer)?;
            }
            (Value::Array(values), Variant::Array { items }) => {
                // one block carrying every element, then the terminator
                if !values.is_empty() {
                    encode_long(values.len() as i64, writer)?;
                    for value in values {
                        value.encode(writer, items, cxt)?;
                    }
                }
                encode_long(0, writer)?;
            }
            (Value::Map(map), Variant::Map { values }) => {
                if !map.is_empty() {
                    encode_long(map.len() as i64, writer)?;
                    for (k, v) in map.iter() {
                        encode_bytes(k.as_bytes(), writer)?;
                        v.encode(writer, values, cxt)?;
                    }
                }
                encode_long(0, writer)?;
            }
            _ => return Err(AvroliteErr::SchemaDataMismatch),
        };
        Ok(())
    }
}

// Given a value, returns the index and schema of the first union branch the
// value validates against.
fn resolve_union<'a>(
    value: &Value,
    variants: &'a [Variant],
    cxt: &Registry,
) -> AvroliteResult<(usize, &'a Variant)> {
    for (idx, branch) in variants.iter().enumerate() {
        if branch.validate(value, cxt).is_ok() {
            return Ok((idx, branch));
        }
    }
    Err(AvroliteErr::NotFoundInUnion)
}

///////////////////////////////////////////////////////////////////////////////
/// From impls for Value
///////////////////////////////////////////////////////////////////////////////

impl From<()> for Value {
    fn from(_v: ()) -> Value {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Value {
        Value::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Value {
        Value::Int(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Value {
        Value::Long(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Value {
        Value::Long(value as i64)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Value {
        Value::Float(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Value {
        Value::Double(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Value {
        Value::Str(value)
    }
}

impl<'a> From<&'a str> for Value {
    fn from(value: &'a str) -> Value {
        Value::Str(value.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Value {
        Value::Bytes(value)
    }
}

impl<'a> From<&'a [u8]> for Value {
    fn from(value: &'a [u8]) -> Value {
        Value::Bytes(value.to_vec())
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Value {
        Value::Record(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Value {
        Value::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<HashMap<String, T>> for Value {
    fn from(map: HashMap<String, T>) -> Value {
        let mut out = HashMap::with_capacity(map.len());
        for (k, v) in map {
            out.insert(k, v.into());
        }
        Value::Map(out)
    }
}

///////////////////////////////////////////////////////////////////////////////
/// Value -> Rust value
///////////////////////////////////////////////////////////////////////////////

impl Value {
    /// Try to retrieve a null value
    pub fn as_null(&self) -> AvroliteResult<()> {
        if let Value::Null = self {
            Ok(())
        } else {
            Err(AvroliteErr::SchemaDataMismatch)
        }
    }
    /// Try to retrieve a boolean
    pub fn as_boolean(&self) -> AvroliteResult<bool> {
        if let Value::Boolean(b) = self {
            Ok(*b)
        } else {
            Err(AvroliteErr::SchemaDataMismatch)
        }
    }
    /// Try to retrieve an int
    pub fn as_int(&self) -> AvroliteResult<i32> {
        if let Value::Int(v) = self {
            Ok(*v)
        } else {
            Err(AvroliteErr::SchemaDataMismatch)
        }
    }
    /// Try to retrieve a long
    pub fn as_long(&self) -> AvroliteResult<i64> {
        if let Value::Long(v) = self {
            Ok(*v)
        } else {
            Err(AvroliteErr::SchemaDataMismatch)
        }
    }
    /// Try to retrieve a float
    pub fn as_float(&self) -> AvroliteResult<f32> {
        if let Value::Float(v) = self {
            Ok(*v)
        } else {
            Err(AvroliteErr::SchemaDataMismatch)
        }
    }
    /// Try to retrieve a double
    pub fn as_double(&self) -> AvroliteResult<f64> {
        if let Value::Double(v) = self {
            Ok(*v)
        } else {
            Err(AvroliteErr::SchemaDataMismatch)
        }
    }
    /// Try to retrieve a bytes value
    pub fn as_bytes(&self) -> AvroliteResult<&[u8]> {
        if let Value::Bytes(v) = self {
            Ok(v)
        } else {
            Err(AvroliteErr::SchemaDataMismatch)
        }
    }
    /// Try to retrieve a string
    pub fn as_string(&self) -> AvroliteResult<&str> {
        if let Value::Str(v) = self {
            Ok(v)
        } else {
            Err(AvroliteErr::SchemaDataMismatch)
        }
    }
    /// Try to retrieve a record
    pub fn as_record(&self) -> AvroliteResult<&Record> {
        if let Value::Record(v) = self {
            Ok(v)
        } else {
            Err(AvroliteErr::SchemaDataMismatch)
        }
    }
    /// Try to retrieve the symbol of an enum value
    pub fn as_enum(&self) -> AvroliteResult<&str> {
        if let Value::Enum(v) = self {
            Ok(v)
        } else {
            Err(AvroliteErr::SchemaDataMismatch)
        }
    }
    /// Try to retrieve an array
    pub fn as_array(&self) -> AvroliteResult<&[Value]> {
        if let Value::Array(v) = self {
            Ok(v)
        } else {
            Err(AvroliteErr::SchemaDataMismatch)
        }
    }
    /// Try to retrieve a map
    pub fn as_map(&self) -> AvroliteResult<&HashMap<String, Value>> {
        if let Value::Map(v) = self {
            Ok(v)
        } else {
            Err(AvroliteErr::SchemaDataMismatch)
        }
    }
    /// Try to retrieve a fixed value
    pub fn as_fixed(&self) -> AvroliteResult<&[u8]> {
        if let Value::Fixed(v) = self {
            Ok(v)
        } else {
            Err(AvroliteErr::SchemaDataMismatch)
        }
    }
}
