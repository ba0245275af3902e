#![allow(dead_code)]

use avrolite::Schema;
use avrolite::{Reader, Writer};
use std::str::FromStr;

#[derive(Debug)]
pub(crate) enum Primitive {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
}

impl std::fmt::Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Primitive::*;
        let str_repr = match self {
            Null => "null",
            Boolean => "boolean",
            Int => "int",
            Long => "long",
            Float => "float",
            Double => "double",
            Bytes => "bytes",
            String => "string",
        };
        write!(f, "{}", str_repr)
    }
}

pub(crate) fn writer_from_schema(schema: &Schema) -> Writer<'_, Vec<u8>> {
    Writer::new(schema, vec![])
}

pub(crate) fn reader_with_schema<'a>(
    writer_schema: &'a Schema,
    reader_schema: &'a Schema,
    buffer: &'a [u8],
) -> Reader<'a, &'a [u8]> {
    Reader::with_schema(buffer, writer_schema, reader_schema).unwrap()
}

pub(crate) struct MockSchema;

impl MockSchema {
    // creates a primitive schema
    pub fn prim(self, ty: &str) -> Schema {
        let schema_str = format!("{{\"type\": \"{}\"}}", ty);
        Schema::from_str(&schema_str).unwrap()
    }

    pub fn record(self) -> Schema {
        Schema::from_str(
            r#"
        {
            "type": "record",
            "name": "LongList",
            "fields" : [
              {"name": "value", "type": "long"},
              {"name": "next", "type": ["null", "LongList"]}
            ]
        }
        "#,
        )
        .unwrap()
    }

    pub fn record_default(self) -> Schema {
        Schema::from_str(
            r#"
        {
            "type": "record",
            "name": "LongList",
            "fields" : [
              {"name": "value", "type": "long"},
              {"name": "next", "type": ["null", "LongList"]},
              {"name": "other", "type": "long", "default": 1}
            ]
        }
        "#,
        )
        .unwrap()
    }
}
