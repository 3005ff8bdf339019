//! TagWire: schema-driven tagged-record binary codec
//!
//! This crate encodes dynamically typed records into a compact, self-describing
//! binary form and decodes them back, validating against a runtime schema.
//! Every field is prefixed by its wire type and numeric tag, so readers skip
//! fields they do not know and tolerate fields whose type has drifted.
//!
//! # Wire Format
//!
//! ```text
//! struct  := field* STOP
//! field   := type:u8 tag:i16 payload
//! list    := elem:u8 count payload*
//! map     := key:u8 value:u8 count (key value)*
//! string  := len bytes
//! ```
//!
//! The binary variant writes tags as 2 bytes, lengths and counts as 4 bytes and
//! integers at fixed width, in the configured byte order. The compact variant
//! writes tags and integers as zigzag varints and lengths as varints.
//!
//! # Features
//!
//! - Forward compatibility: unknown tags are skipped structurally
//! - Schema drift tolerance: mismatched wire types drop the field, not the record
//! - Allocation-free encoding into user-provided buffers
//! - Depth and length limits against hostile input
//! - `no_std` support with `alloc`
//!
//! # Example
//!
//! ```rust
//! use tagwire::*;
//!
//! let schema = StructSchema::builder("NamespaceListing")
//!     .required(1, "name", FieldType::String)
//!     .required(2, "is_namespace", FieldType::Bool)
//!     .build()?;
//!
//! let record = Record::new().with(1, "logs").with(2, true);
//!
//! let codec = Codec::default();
//! let bytes = codec.encode(&record, &schema)?;
//! assert_eq!(bytes, [11, 0, 1, 0, 0, 0, 4, b'l', b'o', b'g', b's', 2, 0, 2, 1, 0]);
//!
//! let decoded = codec.decode(&bytes, &schema)?;
//! assert_eq!(decoded.get(1).and_then(Value::as_str), Some("logs"));
//! # Ok::<(), tagwire::Error>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

pub mod codec;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod messages;
pub mod record;
pub mod schema;
pub mod value;
pub mod varint;
pub mod wire;

// Re-export main types
pub use codec::Codec;
pub use config::{ByteOrder, CodecConfig, Protocol, DEFAULT_MAX_DEPTH};
pub use decoder::{DecodeReport, SchemaMismatch, UnknownTag, WireCursor};
pub use encoder::{SliceSink, WireEncoder, WireSink};
pub use error::{Error, ErrorKind, Result};
pub use record::Record;
pub use schema::{FieldDescriptor, FieldType, SchemaBuilder, StructSchema};
pub use value::Value;
pub use wire::{FieldHeader, ListHeader, MapHeader, WireType};
