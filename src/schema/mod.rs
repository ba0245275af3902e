//! The schema model: a tree of typed nodes with named back-references.
//!
//! Schemas are constructed programmatically through [`builder::SchemaNode`]
//! or parsed from their JSON notation, then frozen into an immutable
//! [`Schema`] that writers and readers share.

pub mod builder;
pub(crate) mod common;
mod parser;
#[cfg(test)]
mod tests;

use crate::error::{AvroliteErr, AvroliteResult};
use crate::value::Value;
use common::Field;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::fs::OpenOptions;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Variant {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    Str,
    Record {
        name: String,
        fields: IndexMap<String, Field>,
    },
    Enum {
        name: String,
        symbols: Vec<String>,
    },
    Fixed {
        name: String,
        size: usize,
    },
    Map {
        values: Box<Variant>,
    },
    Array {
        items: Box<Variant>,
    },
    Union {
        variants: Vec<Variant>,
    },
    // A link to an already-declared named type, resolved through the
    // schema's registry. The only way a schema tree closes a cycle.
    Named(String),
}

// The { name -> node } lookup table built at freeze time. Links resolve
// through it during equality, validation, encode and decode.
#[derive(Debug, Clone, Default)]
pub(crate) struct Registry {
    cxt: HashMap<String, Variant>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get<'a>(&'a self, name: &str) -> Option<&'a Variant> {
        self.cxt.get(name)
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.cxt.contains_key(name)
    }

    pub(crate) fn insert(&mut self, name: String, variant: Variant) {
        self.cxt.insert(name, variant);
    }
}

/// A frozen schema describing the shape of encoded values.
///
/// A `Schema` is immutable once built and safe to share between writers and
/// readers on different threads.
#[derive(Debug, Clone)]
pub struct Schema {
    // schema context with a lookup table resolving named back-references
    pub(crate) cxt: Registry,
    pub(crate) variant: Variant,
}

impl std::str::FromStr for Schema {
    type Err = AvroliteErr;
    /// Parse a schema from its JSON notation.
    /// One can use Rust's raw string syntax (r##""##) to pass the schema.
    fn from_str(schema: &str) -> Result<Self, Self::Err> {
        let schema_json: JsonValue =
            serde_json::from_str(schema).map_err(|e| AvroliteErr::SchemaParseErr(e.into()))?;
        parser::parse_schema_json(&schema_json)
    }
}

impl Schema {
    /// Parses a schema from a JSON schema file. Alternatively, one can use
    /// the [`FromStr`](std::str::FromStr) impl to create the Schema from a
    /// JSON string:
    /// ```
    /// use std::str::FromStr;
    /// use avrolite::Schema;
    ///
    /// let schema = Schema::from_str(r##""null""##).unwrap();
    /// ```
    pub fn from_path<P: AsRef<Path> + Debug>(path: P) -> AvroliteResult<Self> {
        let schema_file = OpenOptions::new()
            .read(true)
            .open(&path)
            .map_err(AvroliteErr::SchemaParseErr)?;
        let value: JsonValue = serde_json::from_reader(schema_file)
            .map_err(|e| AvroliteErr::SchemaParseErr(e.into()))?;
        parser::parse_schema_json(&value)
    }

    pub(crate) fn variant(&self) -> &Variant {
        &self.variant
    }

    /// Checks that a value conforms to this schema.
    #[inline(always)]
    pub fn validate(&self, value: &Value) -> AvroliteResult<()> {
        self.variant.validate(value, &self.cxt)
    }
}

/// Structural equality: same tags, same names, recursively equal children,
/// links followed with cycle detection.
impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        let mut visited = HashSet::new();
        variant_equal(
            &self.variant,
            &other.variant,
            &self.cxt,
            &other.cxt,
            &mut visited,
        )
    }
}

// A pair of named types already on the comparison stack compares equal;
// that is what terminates recursive schemas.
pub(crate) fn variant_equal(
    a: &Variant,
    b: &Variant,
    a_cxt: &Registry,
    b_cxt: &Registry,
    visited: &mut HashSet<(String, String)>,
) -> bool {
    match (a, b) {
        (Variant::Named(name), _) => match a_cxt.get(name) {
            Some(target) => variant_equal(target, b, a_cxt, b_cxt, visited),
            None => false,
        },
        (_, Variant::Named(name)) => match b_cxt.get(name) {
            Some(target) => variant_equal(a, target, a_cxt, b_cxt, visited),
            None => false,
        },
        (Variant::Null, Variant::Null)
        | (Variant::Boolean, Variant::Boolean)
        | (Variant::Int, Variant::Int)
        | (Variant::Long, Variant::Long)
        | (Variant::Float, Variant::Float)
        | (Variant::Double, Variant::Double)
        | (Variant::Bytes, Variant::Bytes)
        | (Variant::Str, Variant::Str) => true,
        (
            Variant::Record {
                name: a_name,
                fields: a_fields,
            },
            Variant::Record {
                name: b_name,
                fields: b_fields,
            },
        ) => {
            if a_name != b_name {
                return false;
            }
            let pair = (a_name.clone(), b_name.clone());
            if !visited.insert(pair) {
                return true;
            }
            a_fields.len() == b_fields.len()
                && a_fields.iter().zip(b_fields.iter()).all(
                    |((a_fname, a_field), (b_fname, b_field))| {
                        a_fname == b_fname
                            && variant_equal(&a_field.ty, &b_field.ty, a_cxt, b_cxt, visited)
                    },
                )
        }
        (
            Variant::Enum {
                name: a_name,
                symbols: a_symbols,
            },
            Variant::Enum {
                name: b_name,
                symbols: b_symbols,
            },
        ) => a_name == b_name && a_symbols == b_symbols,
        (
            Variant::Fixed {
                name: a_name,
                size: a_size,
            },
            Variant::Fixed {
                name: b_name,
                size: b_size,
            },
        ) => a_name == b_name && a_size == b_size,
        (Variant::Array { items: a_items }, Variant::Array { items: b_items }) => {
            variant_equal(a_items, b_items, a_cxt, b_cxt, visited)
        }
        (Variant::Map { values: a_values }, Variant::Map { values: b_values }) => {
            variant_equal(a_values, b_values, a_cxt, b_cxt, visited)
        }
        (Variant::Union { variants: a_vars }, Variant::Union { variants: b_vars }) => {
            a_vars.len() == b_vars.len()
                && a_vars
                    .iter()
                    .zip(b_vars.iter())
                    .all(|(x, y)| variant_equal(x, y, a_cxt, b_cxt, visited))
        }
        _ => false,
    }
}

impl Variant {
    pub(crate) fn validate(&self, value: &Value, cxt: &Registry) -> AvroliteResult<()> {
        match (value, self) {
            (Value::Null, Variant::Null)
            | (Value::Boolean(_), Variant::Boolean)
            | (Value::Int(_), Variant::Int)
            // int is promotable to long, float or double
            | (Value::Int(_), Variant::Long)
            | (Value::Int(_), Variant::Float)
            | (Value::Int(_), Variant::Double)
            | (Value::Long(_), Variant::Long)
            // long is promotable to float or double
            | (Value::Long(_), Variant::Float)
            | (Value::Long(_), Variant::Double)
            | (Value::Float(_), Variant::Float)
            // float is promotable to double
            | (Value::Float(_), Variant::Double)
            | (Value::Double(_), Variant::Double)
            | (Value::Bytes(_), Variant::Bytes)
            | (Value::Str(_), Variant::Str) => Ok(()),
            // a long narrows to int when its value fits
            (Value::Long(l), Variant::Int) => {
                if i32::try_from(*l).is_ok() {
                    Ok(())
                } else {
                    Err(AvroliteErr::SchemaDataMismatch)
                }
            }
            (Value::Fixed(v), Variant::Fixed { size, .. }) => {
                if v.len() == *size {
                    Ok(())
                } else {
                    Err(AvroliteErr::FixedValueLenMismatch {
                        found: v.len(),
                        expected: *size,
                    })
                }
            }
            (Value::Enum(symbol), Variant::Enum { symbols, .. }) => {
                if symbols.iter().any(|s| s == symbol) {
                    Ok(())
                } else {
                    Err(AvroliteErr::EnumSymbolNotPresent)
                }
            }
            (Value::Array(items), Variant::Array { items: item_schema }) => {
                for item in items {
                    item_schema.validate(item, cxt)?;
                }
                Ok(())
            }
            (Value::Map(map), Variant::Map { values }) => {
                for value in map.values() {
                    values.validate(value, cxt)?;
                }
                Ok(())
            }
            (Value::Record(rec), Variant::Record { name, fields }) => {
                // name equality is what disambiguates record branches in unions
                if rec.name() != name {
                    return Err(AvroliteErr::SchemaDataMismatch);
                }
                for (fname, field) in fields {
                    match rec.get(fname) {
                        Some(v) => field.ty.validate(v, cxt)?,
                        None if field.default.is_some() => {}
                        None => return Err(AvroliteErr::MissingField(fname.clone())),
                    }
                }
                for (fname, _) in rec.fields() {
                    if !fields.contains_key(fname) {
                        return Err(AvroliteErr::SchemaDataMismatch);
                    }
                }
                Ok(())
            }
            (value, Variant::Union { variants }) => {
                for branch in variants {
                    if branch.validate(value, cxt).is_ok() {
                        return Ok(());
                    }
                }
                Err(AvroliteErr::NotFoundInUnion)
            }
            (value, Variant::Named(name)) => {
                let target = cxt
                    .get(name)
                    .ok_or_else(|| AvroliteErr::UnresolvedLink(name.clone()))?;
                target.validate(value, cxt)
            }
            _ => Err(AvroliteErr::SchemaDataMismatch),
        }
    }
}
