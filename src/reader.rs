//! The Reader decodes a stream of values written under a writer's schema,
//! optionally resolving them against a reader's schema.

use crate::codec::{
    decode_bool, decode_bytes, decode_double, decode_float, decode_int, decode_len, decode_long,
    decode_raw_bytes, decode_string,
};
use crate::error::{AvroliteErr, AvroliteResult};
use crate::io::skip_bytes;
use crate::schema::{Registry, Schema, Variant};
use crate::value::{Record, Value};
use std::collections::HashMap;
use std::io::Read;

/// Decodes values from a byte stream.
///
/// The stream holds values back-to-back with no envelope, so the reader
/// must be handed the schema they were written under. When a reader schema
/// is also provided, each value is resolved against it: matching is
/// checked up front, numeric promotions are applied, record fields are
/// matched by name (writer-only fields are skipped on the wire,
/// reader-only fields are filled from their defaults) and enum symbols are
/// re-looked-up in the reader's symbol list.
///
/// `Reader` implements [`Iterator`]; iteration ends when the stream is
/// exhausted at a value boundary. Running out of bytes in the middle of a
/// value is an error.
pub struct Reader<'a, R> {
    source: R,
    peeked: Option<u8>,
    writer_schema: &'a Schema,
    reader_schema: Option<&'a Schema>,
}

impl<'a, R: Read> Reader<'a, R> {
    /// Creates a reader decoding `source` under the schema the values were
    /// written with.
    pub fn new(source: R, writer_schema: &'a Schema) -> Self {
        Reader {
            source,
            peeked: None,
            writer_schema,
            reader_schema: None,
        }
    }

    /// Creates a reader that resolves values written under `writer_schema`
    /// into values conforming to `reader_schema`.
    ///
    /// Fails when the two schemas do not match per the resolution rules.
    pub fn with_schema(
        source: R,
        writer_schema: &'a Schema,
        reader_schema: &'a Schema,
    ) -> AvroliteResult<Self> {
        if !schema_match(
            writer_schema.variant(),
            reader_schema.variant(),
            &writer_schema.cxt,
            &reader_schema.cxt,
        ) {
            return Err(AvroliteErr::SchemaResolutionFailed(
                format!("{:?}", reader_schema.variant()),
                format!("{:?}", writer_schema.variant()),
            ));
        }
        Ok(Reader {
            source,
            peeked: None,
            writer_schema,
            reader_schema: Some(reader_schema),
        })
    }

    fn decode_next(&mut self) -> AvroliteResult<Value> {
        let mut source = Probed {
            peeked: &mut self.peeked,
            inner: &mut self.source,
        };
        let w_schema = self.writer_schema;
        match self.reader_schema {
            Some(r_schema) => decode_resolved(
                w_schema.variant(),
                r_schema.variant(),
                &w_schema.cxt,
                &r_schema.cxt,
                &mut source,
            ),
            None => decode(w_schema.variant(), &mut source, &w_schema.cxt),
        }
    }

    // True when the stream is exhausted at a value boundary. On false the
    // probed byte is buffered and replayed into the next decode.
    fn at_eof(&mut self) -> AvroliteResult<bool> {
        if self.peeked.is_some() {
            return Ok(false);
        }
        let mut buf = [0u8; 1];
        loop {
            match self.source.read(&mut buf) {
                Ok(0) => return Ok(true),
                Ok(_) => {
                    self.peeked = Some(buf[0]);
                    return Ok(false);
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(AvroliteErr::DecodeFailed(e)),
            }
        }
    }
}

impl<'a, R: Read> Iterator for Reader<'a, R> {
    type Item = AvroliteResult<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.at_eof() {
            Ok(true) => None,
            Ok(false) => Some(self.decode_next()),
            Err(e) => Some(Err(e)),
        }
    }
}

struct Probed<'p, R> {
    peeked: &'p mut Option<u8>,
    inner: &'p mut R,
}

impl<R: Read> Read for Probed<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if let Some(byte) = self.peeked.take() {
            buf[0] = byte;
            return Ok(1);
        }
        self.inner.read(buf)
    }
}

/// The resolution matching rules: a writer schema matches a reader schema
/// when values written under the former can be decoded under the latter.
pub(crate) fn schema_match(
    w_schema: &Variant,
    r_schema: &Variant,
    w_cxt: &Registry,
    r_cxt: &Registry,
) -> bool {
    // links are followed on both sides
    let w_schema = match w_schema {
        Variant::Named(name) => match w_cxt.get(name) {
            Some(target) => target,
            None => return false,
        },
        other => other,
    };
    let r_schema = match r_schema {
        Variant::Named(name) => match r_cxt.get(name) {
            Some(target) => target,
            None => return false,
        },
        other => other,
    };

    match (w_schema, r_schema) {
        // per-branch work happens during decode
        (Variant::Union { .. }, _) | (_, Variant::Union { .. }) => true,
        (Variant::Null, Variant::Null)
        | (Variant::Boolean, Variant::Boolean)
        | (Variant::Int, Variant::Int)
        // int promotes to long, float or double
        | (Variant::Int, Variant::Long)
        | (Variant::Int, Variant::Float)
        | (Variant::Int, Variant::Double)
        | (Variant::Long, Variant::Long)
        // long promotes to float or double
        | (Variant::Long, Variant::Float)
        | (Variant::Long, Variant::Double)
        | (Variant::Float, Variant::Float)
        // float promotes to double
        | (Variant::Float, Variant::Double)
        | (Variant::Double, Variant::Double)
        | (Variant::Bytes, Variant::Bytes)
        | (Variant::Str, Variant::Str) => true,
        (Variant::Record { name: w_name, .. }, Variant::Record { name: r_name, .. }) => {
            w_name == r_name
        }
        (Variant::Enum { name: w_name, .. }, Variant::Enum { name: r_name, .. }) => {
            w_name == r_name
        }
        (
            Variant::Fixed {
                name: w_name,
                size: w_size,
            },
            Variant::Fixed {
                name: r_name,
                size: r_size,
            },
        ) => w_name == r_name && w_size == r_size,
        (Variant::Array { items: w_items }, Variant::Array { items: r_items }) => {
            schema_match(w_items, r_items, w_cxt, r_cxt)
        }
        (Variant::Map { values: w_values }, Variant::Map { values: r_values }) => {
            schema_match(w_values, r_values, w_cxt, r_cxt)
        }
        _ => false,
    }
}

// Decodes a value written under `schema`, with no resolution.
pub(crate) fn decode<R: Read>(
    schema: &Variant,
    reader: &mut R,
    cxt: &Registry,
) -> AvroliteResult<Value> {
    let value = match schema {
        Variant::Null => Value::Null,
        Variant::Boolean => Value::Boolean(decode_bool(reader)?),
        Variant::Int => Value::Int(decode_int(reader)?),
        Variant::Long => Value::Long(decode_long(reader)?),
        Variant::Float => Value::Float(decode_float(reader)?),
        Variant::Double => Value::Double(decode_double(reader)?),
        Variant::Bytes => Value::Bytes(decode_bytes(reader)?),
        Variant::Str => Value::Str(decode_string(reader)?),
        Variant::Fixed { size, .. } => Value::Fixed(decode_raw_bytes(reader, *size)?),
        Variant::Enum { symbols, .. } => {
            let idx = decode_long(reader)?;
            let symbol = usize::try_from(idx)
                .ok()
                .and_then(|i| symbols.get(i))
                .ok_or(AvroliteErr::EnumIndexOutOfRange {
                    idx,
                    len: symbols.len(),
                })?;
            Value::Enum(symbol.clone())
        }
        Variant::Array { items } => {
            let mut decoded = Vec::new();
            decode_blocks(reader, |reader| {
                decoded.push(decode(items, reader, cxt)?);
                Ok(())
            })?;
            Value::Array(decoded)
        }
        Variant::Map { values } => {
            let mut decoded = HashMap::new();
            decode_blocks(reader, |reader| {
                let key = decode_string(reader)?;
                decoded.insert(key, decode(values, reader, cxt)?);
                Ok(())
            })?;
            Value::Map(decoded)
        }
        Variant::Record { name, fields } => {
            let mut rec = Record::new(name);
            for (fname, field) in fields {
                let value = decode(&field.ty, reader, cxt)?;
                rec.insert(fname, value)?;
            }
            Value::Record(rec)
        }
        Variant::Union { variants } => {
            let idx = decode_long(reader)?;
            let branch = usize::try_from(idx)
                .ok()
                .and_then(|i| variants.get(i))
                .ok_or(AvroliteErr::UnionBranchOutOfRange {
                    idx,
                    len: variants.len(),
                })?;
            decode(branch, reader, cxt)?
        }
        Variant::Named(name) => {
            let target = cxt
                .get(name)
                .ok_or_else(|| AvroliteErr::UnresolvedLink(name.clone()))?;
            decode(target, reader, cxt)?
        }
    };

    Ok(value)
}

// Runs `entry` once per entry across a block sequence: (count, entries...)*
// terminated by a zero count. A negative count is followed by the block's
// byte size, which plain decoding consumes and discards.
fn decode_blocks<R: Read>(
    reader: &mut R,
    mut entry: impl FnMut(&mut R) -> AvroliteResult<()>,
) -> AvroliteResult<()> {
    let mut block_count = decode_long(reader)?;
    while block_count != 0 {
        if block_count < 0 {
            let _block_size = decode_len(reader)?;
            block_count = block_count
                .checked_neg()
                .ok_or(AvroliteErr::VarintRange)?;
        }
        for _ in 0..block_count {
            entry(reader)?;
        }
        block_count = decode_long(reader)?;
    }
    Ok(())
}

// Decodes a value written under `w_schema` into a value conforming to
// `r_schema`. Both registries travel along for link resolution.
pub(crate) fn decode_resolved<R: Read>(
    w_schema: &Variant,
    r_schema: &Variant,
    w_cxt: &Registry,
    r_cxt: &Registry,
    reader: &mut R,
) -> AvroliteResult<Value> {
    if let Variant::Named(name) = w_schema {
        let target = w_cxt
            .get(name)
            .ok_or_else(|| AvroliteErr::UnresolvedLink(name.clone()))?;
        return decode_resolved(target, r_schema, w_cxt, r_cxt, reader);
    }
    if let Variant::Named(name) = r_schema {
        let target = r_cxt
            .get(name)
            .ok_or_else(|| AvroliteErr::UnresolvedLink(name.clone()))?;
        return decode_resolved(w_schema, target, w_cxt, r_cxt, reader);
    }

    let value = match (w_schema, r_schema) {
        // the writer wrote a branch index; the reader picks its first
        // branch that matches the selected writer branch
        (
            Variant::Union {
                variants: w_variants,
            },
            Variant::Union {
                variants: r_variants,
            },
        ) => {
            let w_branch = read_branch(reader, w_variants)?;
            let r_branch = r_variants
                .iter()
                .find(|r_branch| schema_match(w_branch, r_branch, w_cxt, r_cxt))
                .ok_or_else(|| resolution_failed(w_branch, r_schema))?;
            return decode_resolved(w_branch, r_branch, w_cxt, r_cxt, reader);
        }
        // no branch index on the wire; the first reader branch matching the
        // writer schema wins
        (
            w_schema,
            Variant::Union {
                variants: r_variants,
            },
        ) => {
            let r_branch = r_variants
                .iter()
                .find(|r_branch| schema_match(w_schema, r_branch, w_cxt, r_cxt))
                .ok_or_else(|| resolution_failed(w_schema, r_schema))?;
            return decode_resolved(w_schema, r_branch, w_cxt, r_cxt, reader);
        }
        (
            Variant::Union {
                variants: w_variants,
            },
            r_schema,
        ) => {
            let w_branch = read_branch(reader, w_variants)?;
            if !schema_match(w_branch, r_schema, w_cxt, r_cxt) {
                return Err(resolution_failed(w_branch, r_schema));
            }
            return decode_resolved(w_branch, r_schema, w_cxt, r_cxt, reader);
        }
        (Variant::Null, Variant::Null) => Value::Null,
        (Variant::Boolean, Variant::Boolean) => Value::Boolean(decode_bool(reader)?),
        (Variant::Int, Variant::Int) => Value::Int(decode_int(reader)?),
        // int is promotable to long, float or double: the writer's
        // representation is decoded and widened
        (Variant::Int, Variant::Long) => Value::Long(i64::from(decode_int(reader)?)),
        (Variant::Int, Variant::Float) => Value::Float(decode_int(reader)? as f32),
        (Variant::Int, Variant::Double) => Value::Double(decode_int(reader)? as f64),
        (Variant::Long, Variant::Long) => Value::Long(decode_long(reader)?),
        // long is promotable to float or double
        (Variant::Long, Variant::Float) => Value::Float(decode_long(reader)? as f32),
        (Variant::Long, Variant::Double) => Value::Double(decode_long(reader)? as f64),
        (Variant::Float, Variant::Float) => Value::Float(decode_float(reader)?),
        // float is promotable to double
        (Variant::Float, Variant::Double) => Value::Double(f64::from(decode_float(reader)?)),
        (Variant::Double, Variant::Double) => Value::Double(decode_double(reader)?),
        (Variant::Bytes, Variant::Bytes) => Value::Bytes(decode_bytes(reader)?),
        (Variant::Str, Variant::Str) => Value::Str(decode_string(reader)?),
        (
            Variant::Fixed {
                name: w_name,
                size: w_size,
            },
            Variant::Fixed {
                name: r_name,
                size: r_size,
            },
        ) => {
            if w_name != r_name || w_size != r_size {
                return Err(AvroliteErr::FixedSchemaMismatch);
            }
            Value::Fixed(decode_raw_bytes(reader, *r_size)?)
        }
        (
            Variant::Enum {
                name: w_name,
                symbols: w_symbols,
            },
            Variant::Enum {
                name: r_name,
                symbols: r_symbols,
            },
        ) => {
            if w_name != r_name {
                return Err(AvroliteErr::EnumNameMismatch);
            }
            // the wire index is the writer's; the symbol is looked up again
            // in the reader's symbol list
            let idx = decode_long(reader)?;
            let symbol = usize::try_from(idx)
                .ok()
                .and_then(|i| w_symbols.get(i))
                .ok_or(AvroliteErr::EnumIndexOutOfRange {
                    idx,
                    len: w_symbols.len(),
                })?;
            if !r_symbols.iter().any(|s| s == symbol) {
                return Err(AvroliteErr::EnumSymbolNotFound {
                    symbol: symbol.clone(),
                });
            }
            Value::Enum(symbol.clone())
        }
        (Variant::Array { items: w_items }, Variant::Array { items: r_items }) => {
            let mut decoded = Vec::new();
            decode_blocks(reader, |reader| {
                decoded.push(decode_resolved(w_items, r_items, w_cxt, r_cxt, reader)?);
                Ok(())
            })?;
            Value::Array(decoded)
        }
        (
            Variant::Map { values: w_values },
            Variant::Map { values: r_values },
        ) => {
            let mut decoded = HashMap::new();
            decode_blocks(reader, |reader| {
                let key = decode_string(reader)?;
                decoded.insert(
                    key,
                    decode_resolved(w_values, r_values, w_cxt, r_cxt, reader)?,
                );
                Ok(())
            })?;
            Value::Map(decoded)
        }
        (
            Variant::Record {
                name: w_name,
                fields: w_fields,
            },
            Variant::Record {
                name: r_name,
                fields: r_fields,
            },
        ) => {
            if w_name != r_name {
                return Err(AvroliteErr::RecordNameMismatch);
            }
            // the stream is laid out in writer field order: decode fields
            // the reader also has, skip the rest in place
            let mut decoded: HashMap<&str, Value> = HashMap::new();
            for (fname, w_field) in w_fields {
                match r_fields.get(fname) {
                    Some(r_field) => {
                        let value =
                            decode_resolved(&w_field.ty, &r_field.ty, w_cxt, r_cxt, reader)?;
                        decoded.insert(fname, value);
                    }
                    None => skip_value(&w_field.ty, reader, w_cxt)?,
                }
            }
            // assemble in reader field order, defaults filling the gaps
            let mut rec = Record::new(r_name);
            for (fname, r_field) in r_fields {
                match decoded.remove(fname.as_str()) {
                    Some(value) => rec.insert(fname, value)?,
                    None => match &r_field.default {
                        Some(default) => rec.insert(fname, default.clone())?,
                        None => return Err(AvroliteErr::MissingField(fname.clone())),
                    },
                }
            }
            Value::Record(rec)
        }
        (w_schema, r_schema) => return Err(resolution_failed(w_schema, r_schema)),
    };

    Ok(value)
}

fn resolution_failed(w_schema: &Variant, r_schema: &Variant) -> AvroliteErr {
    AvroliteErr::SchemaResolutionFailed(format!("{:?}", r_schema), format!("{:?}", w_schema))
}

fn read_branch<'s, R: Read>(
    reader: &mut R,
    variants: &'s [Variant],
) -> AvroliteResult<&'s Variant> {
    let idx = decode_long(reader)?;
    usize::try_from(idx)
        .ok()
        .and_then(|i| variants.get(i))
        .ok_or(AvroliteErr::UnionBranchOutOfRange {
            idx,
            len: variants.len(),
        })
}

// Discards one value of the given schema from the stream, leaving the
// stream positioned after it. Used for writer-only record fields.
pub(crate) fn skip_value<R: Read>(
    schema: &Variant,
    reader: &mut R,
    cxt: &Registry,
) -> AvroliteResult<()> {
    match schema {
        Variant::Null => Ok(()),
        Variant::Boolean => skip_bytes(reader, 1),
        Variant::Int => decode_int(reader).map(|_| ()),
        Variant::Long => decode_long(reader).map(|_| ()),
        Variant::Float => skip_bytes(reader, 4),
        Variant::Double => skip_bytes(reader, 8),
        Variant::Bytes | Variant::Str => {
            let len = decode_len(reader)?;
            skip_bytes(reader, len as u64)
        }
        Variant::Fixed { size, .. } => skip_bytes(reader, *size as u64),
        Variant::Enum { .. } => decode_long(reader).map(|_| ()),
        Variant::Record { fields, .. } => {
            for field in fields.values() {
                skip_value(&field.ty, reader, cxt)?;
            }
            Ok(())
        }
        Variant::Array { items } => skip_blocks(reader, |reader| skip_value(items, reader, cxt)),
        Variant::Map { values } => skip_blocks(reader, |reader| {
            let key_len = decode_len(reader)?;
            skip_bytes(reader, key_len as u64)?;
            skip_value(values, reader, cxt)
        }),
        Variant::Union { variants } => {
            let branch = read_branch(reader, variants)?;
            skip_value(branch, reader, cxt)
        }
        Variant::Named(name) => {
            let target = cxt
                .get(name)
                .ok_or_else(|| AvroliteErr::UnresolvedLink(name.clone()))?;
            skip_value(target, reader, cxt)
        }
    }
}

// Like decode_blocks, but a sized block is skipped wholesale using its
// byte-size prefix instead of entry by entry.
fn skip_blocks<R: Read>(
    reader: &mut R,
    mut entry: impl FnMut(&mut R) -> AvroliteResult<()>,
) -> AvroliteResult<()> {
    let mut block_count = decode_long(reader)?;
    while block_count != 0 {
        if block_count < 0 {
            let block_size = decode_len(reader)?;
            skip_bytes(reader, block_size as u64)?;
        } else {
            for _ in 0..block_count {
                entry(reader)?;
            }
        }
        block_count = decode_long(reader)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Schema, Writer};
    use std::io::Cursor;
    use std::str::FromStr;

    fn encoded(schema: &Schema, value: impl Into<Value>) -> Vec<u8> {
        let mut writer = Writer::new(schema, vec![]);
        writer.write(value).unwrap();
        writer.into_inner().unwrap()
    }

    #[test]
    fn skip_leaves_stream_at_value_boundary() {
        let schema = Schema::from_str(
            r##"{
                "type": "record",
                "name": "entry",
                "fields": [
                    {"name": "key", "type": "string"},
                    {"name": "counts", "type": {"type": "array", "items": "long"}},
                    {"name": "flag", "type": "boolean"}
                ]
            }"##,
        )
        .unwrap();

        let mut rec = crate::Record::new("entry");
        rec.insert("key", "k1").unwrap();
        rec.insert("counts", vec![1i64, 2, 3]).unwrap();
        rec.insert("flag", true).unwrap();
        let buf = encoded(&schema, rec);

        // decoding and skipping must consume the same number of bytes
        let mut cursor = Cursor::new(buf.clone());
        decode(schema.variant(), &mut cursor, &schema.cxt).unwrap();
        let decoded_pos = cursor.position();

        let mut cursor = Cursor::new(buf);
        skip_value(schema.variant(), &mut cursor, &schema.cxt).unwrap();
        assert_eq!(cursor.position(), decoded_pos);
    }

    #[test]
    fn skip_every_schema_shape() {
        for (schema_json, value) in [
            (r##""null""##, Value::Null),
            (r##""boolean""##, Value::Boolean(true)),
            (r##""int""##, Value::Int(-73)),
            (r##""long""##, Value::Long(1 << 40)),
            (r##""float""##, Value::Float(2.5)),
            (r##""double""##, Value::Double(-0.25)),
            (r##""bytes""##, Value::Bytes(vec![1, 2, 3])),
            (r##""string""##, Value::Str("skipped".to_string())),
            (r##"["null", "string"]"##, Value::Str("s".to_string())),
        ] {
            let schema = Schema::from_str(schema_json).unwrap();
            let buf = encoded(&schema, value);
            let mut cursor = Cursor::new(buf.clone());
            skip_value(schema.variant(), &mut cursor, &schema.cxt).unwrap();
            assert_eq!(cursor.position() as usize, buf.len(), "{}", schema_json);
        }
    }

    #[test]
    fn multi_block_array_decodes_like_single_block() {
        let schema = Schema::from_str(r##"{"type": "array", "items": "int"}"##).unwrap();
        let single = encoded(&schema, vec![1i32, 2, 3]);
        assert_eq!(single, vec![0x06, 0x02, 0x04, 0x06, 0x00]);

        // the same array split into blocks of 1 and 2 elements
        let split = vec![0x02, 0x02, 0x04, 0x04, 0x06, 0x00];
        let a = decode(schema.variant(), &mut single.as_slice(), &schema.cxt).unwrap();
        let b = decode(schema.variant(), &mut split.as_slice(), &schema.cxt).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn sized_block_with_negative_count_decodes() {
        let schema = Schema::from_str(r##"{"type": "array", "items": "int"}"##).unwrap();
        // count -3 (zigzag 0x05), byte size 3 (zigzag 0x06), entries 1 2 3
        let framed = vec![0x05, 0x06, 0x02, 0x04, 0x06, 0x00];
        let value = decode(schema.variant(), &mut framed.as_slice(), &schema.cxt).unwrap();
        assert_eq!(
            value,
            Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );

        // skipping rides the size prefix
        let mut cursor = Cursor::new(framed.clone());
        skip_value(schema.variant(), &mut cursor, &schema.cxt).unwrap();
        assert_eq!(cursor.position() as usize, framed.len());
    }

    #[test]
    fn union_branch_out_of_range_is_malformed() {
        let schema = Schema::from_str(r##"["null", "string"]"##).unwrap();
        // branch index 2 (zigzag 0x04) on a two-branch union
        let buf = vec![0x04];
        let err = decode(schema.variant(), &mut buf.as_slice(), &schema.cxt).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Malformed);
    }

    #[test]
    fn truncated_union_string_is_malformed() {
        let schema = Schema::from_str(r##"["null", "string"]"##).unwrap();
        // branch 1, string length 1, but the body is missing
        let buf = vec![0x02, 0x02];
        let err = decode(schema.variant(), &mut buf.as_slice(), &schema.cxt).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Malformed);
    }

    #[test]
    fn enum_index_out_of_range_is_malformed() {
        let schema = Schema::from_str(
            r##"{"type": "enum", "name": "suit", "symbols": ["H", "S"]}"##,
        )
        .unwrap();
        let buf = vec![0x04];
        let err = decode(schema.variant(), &mut buf.as_slice(), &schema.cxt).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Malformed);
    }

    #[test]
    fn recursive_record_round_trips() {
        let schema = Schema::from_str(
            r##"{
                "type": "record",
                "name": "LongList",
                "fields": [
                    {"name": "value", "type": "long"},
                    {"name": "next", "type": ["null", "LongList"]}
                ]
            }"##,
        )
        .unwrap();

        let mut tail = crate::Record::new("LongList");
        tail.insert("value", 2i64).unwrap();
        tail.insert("next", Value::Null).unwrap();
        let mut head = crate::Record::new("LongList");
        head.insert("value", 1i64).unwrap();
        head.insert("next", Value::Record(tail)).unwrap();

        let buf = encoded(&schema, Value::Record(head.clone()));
        let value = decode(schema.variant(), &mut buf.as_slice(), &schema.cxt).unwrap();
        assert_eq!(value, Value::Record(head));
    }
}
