//! Record codec entry points

use alloc::vec::Vec;

use crate::config::CodecConfig;
use crate::decoder::{DecodeReport, WireCursor};
use crate::encoder::{SliceSink, WireEncoder, WireSink};
use crate::error::{Error, Result};
use crate::record::Record;
use crate::schema::StructSchema;

/// Encodes and decodes records for one wire configuration
///
/// A `Codec` holds no per-call state, so one value can be copied freely or
/// shared across threads alongside an `Arc<StructSchema>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    /// Create new codec
    #[inline]
    pub const fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    #[inline]
    pub const fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Validate and encode a record into a new buffer
    pub fn encode(&self, record: &Record, schema: &StructSchema) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.encode_to(record, schema, &mut out)?;
        Ok(out)
    }

    /// Validate and encode a record into a caller buffer
    ///
    /// Returns the number of bytes written, or [`Error::ShortBuffer`] when the
    /// buffer is too small. The buffer contents are unspecified on error.
    pub fn encode_into(&self, record: &Record, schema: &StructSchema, buf: &mut [u8]) -> Result<usize> {
        let mut sink = SliceSink::new(buf);
        self.encode_to(record, schema, &mut sink)?;
        Ok(sink.position())
    }

    /// Validate and encode a record into any [`WireSink`]
    ///
    /// On error the sink is left as it was before the call.
    pub fn encode_to<S: WireSink + ?Sized>(
        &self,
        record: &Record,
        schema: &StructSchema,
        sink: &mut S,
    ) -> Result<()> {
        WireEncoder::new(sink, self.config).put_struct(record, schema)
    }

    /// Decode exactly one struct spanning all of `bytes`
    pub fn decode(&self, bytes: &[u8], schema: &StructSchema) -> Result<Record> {
        self.decode_with_report(bytes, schema)
            .map(|(record, _)| record)
    }

    /// Decode like [`decode`](Self::decode), also returning the non-fatal findings
    pub fn decode_with_report(
        &self,
        bytes: &[u8],
        schema: &StructSchema,
    ) -> Result<(Record, DecodeReport)> {
        let (record, consumed, report) = self.decode_one(bytes, schema)?;
        if consumed != bytes.len() {
            return Err(Error::TrailingBytes(bytes.len() - consumed));
        }
        Ok((record, report))
    }

    /// Decode one struct from the front of `bytes`
    ///
    /// Returns the record and the number of bytes it occupied, for reading
    /// back-to-back structs from a stream.
    pub fn decode_prefix(&self, bytes: &[u8], schema: &StructSchema) -> Result<(Record, usize)> {
        self.decode_one(bytes, schema)
            .map(|(record, consumed, _)| (record, consumed))
    }

    fn decode_one(
        &self,
        bytes: &[u8],
        schema: &StructSchema,
    ) -> Result<(Record, usize, DecodeReport)> {
        let mut cursor = WireCursor::new(bytes, self.config);
        let record = cursor.get_struct(schema)?;
        schema.validate(&record)?;
        let consumed = cursor.position();
        Ok((record, consumed, cursor.into_report()))
    }

    /// Check a record against a schema without encoding it
    #[inline]
    pub fn validate(&self, record: &Record, schema: &StructSchema) -> Result<()> {
        schema.validate(record)
    }
}
