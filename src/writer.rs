//! The Writer is the primary interface for serializing values.

use crate::error::{AvroliteErr, AvroliteResult};
use crate::schema::Schema;
use crate::value::Value;
use std::io::Write;

/// Serializes values under a frozen schema onto an output stream.
///
/// The writer takes a reference to the schema used for validating and
/// encoding values and an output stream `W`, which can be any type
/// implementing the [Write](https://doc.rust-lang.org/std/io/trait.Write.html)
/// trait. Values are written back-to-back with no envelope; writes are
/// append-only and never seek.
///
/// Every value is validated against the schema before the first byte of it
/// is written. If an encode fails midway the stream may hold a partial
/// value and should be considered poisoned.
pub struct Writer<'a, W> {
    schema: &'a Schema,
    out_stream: W,
}

impl<'a, W: Write> Writer<'a, W> {
    /// Creates a writer serializing values under `schema` onto `out_stream`.
    pub fn new(schema: &'a Schema, out_stream: W) -> Self {
        Writer { schema, out_stream }
    }

    /// Validates a value against the schema and appends its encoding to the
    /// output stream.
    pub fn write<T: Into<Value>>(&mut self, value: T) -> AvroliteResult<()> {
        let value: Value = value.into();
        self.schema.validate(&value)?;
        value.encode(&mut self.out_stream, self.schema.variant(), &self.schema.cxt)
    }

    /// Flushes the underlying output stream.
    pub fn flush(&mut self) -> AvroliteResult<()> {
        self.out_stream.flush().map_err(AvroliteErr::EncodeFailed)
    }

    /// Consumes self and yields the inner `Write` instance, flushing first.
    pub fn into_inner(mut self) -> AvroliteResult<W> {
        self.flush()?;
        Ok(self.out_stream)
    }
}
