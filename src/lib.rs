//! Avrolite is the core of an Avro-style data serialization library: a
//! schema model with named, self-referential types, a schema-aware binary
//! codec for streams of typed values, and a schema-resolution engine that
//! reconciles a writer's schema with a reader's schema on decode.
//!
//! Container files, RPC framing and code generation are deliberately out of
//! scope; values are written back-to-back with no envelope.
//!
//! ## A hello world example of writing and reading a value stream
//!
//! ```rust
//! use avrolite::{Reader, Schema, Writer};
//! use std::str::FromStr;
//! use anyhow::Error;
//!
//! fn main() -> Result<(), Error> {
//!     // Writing data
//!
//!     // Create a schema, here via the JSON notation
//!     let schema = Schema::from_str(r##"{"type": "array", "items": "long"}"##)?;
//!     // Create a writer from the schema and a buffer to write to
//!     let mut writer = Writer::new(&schema, vec![]);
//!     // Values are validated against the schema, then encoded
//!     writer.write(vec![1i64, 2, 3])?;
//!     // Retrieve the underlying buffer using the into_inner method
//!     let buf = writer.into_inner()?;
//!
//!     // Reading data
//!
//!     // A reader needs the schema the values were written under
//!     let reader = Reader::new(buf.as_slice(), &schema);
//!     for value in reader {
//!         // decoding can fail, so the iterator yields results
//!         let value = value?;
//!         assert_eq!(value.as_array()?.len(), 3);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! Schemas can also be composed programmatically through
//! [`SchemaNode`](crate::SchemaNode) and frozen with
//! [`Schema::freeze`](crate::Schema::freeze).

#![deny(missing_docs)]
#![recursion_limit = "1024"]
#![deny(unused_must_use)]
#![deny(rust_2018_idioms)]

mod codec;
mod error;
pub mod io;
mod reader;
mod schema;
mod value;
mod writer;

pub use error::AvroliteErr;
pub use error::AvroliteResult;
pub use error::ErrorKind;
pub use reader::Reader;
pub use schema::builder::SchemaNode;
pub use schema::Schema;
pub use value::Record;
pub use value::Value;
pub use writer::Writer;
