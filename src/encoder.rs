//! Record encoder
//!
//! The encoder writes through a [`WireSink`]: either a growable `Vec<u8>` or a
//! [`SliceSink`] over a caller-provided buffer, which keeps encoding
//! allocation-free on hot paths.

use alloc::string::ToString;
use alloc::vec::Vec;

use tracing::trace;

use crate::config::{ByteOrder, CodecConfig, Protocol};
use crate::error::{Error, Result};
use crate::record::Record;
use crate::schema::{FieldDescriptor, FieldType, StructSchema};
use crate::value::Value;
use crate::varint;
use crate::wire::WireType;

/// Destination of encoded bytes
pub trait WireSink {
    /// Append bytes
    fn put_slice(&mut self, bytes: &[u8]) -> Result<()>;

    /// Bytes written so far
    fn position(&self) -> usize;

    /// Discard everything written after `pos`
    fn rewind(&mut self, pos: usize);
}

impl WireSink for Vec<u8> {
    #[inline]
    fn put_slice(&mut self, bytes: &[u8]) -> Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }

    #[inline]
    fn position(&self) -> usize {
        self.len()
    }

    #[inline]
    fn rewind(&mut self, pos: usize) {
        self.truncate(pos);
    }
}

/// Fixed-capacity sink over a caller buffer
#[derive(Debug)]
pub struct SliceSink<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SliceSink<'a> {
    /// Create new sink writing from the start of `buf`
    #[inline]
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Get remaining buffer capacity
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Get a slice of the encoded data
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    /// Reset sink for reuse with the same buffer
    #[inline]
    pub fn reset(&mut self) {
        self.pos = 0;
    }
}

impl WireSink for SliceSink<'_> {
    #[inline]
    fn put_slice(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > self.remaining() {
            return Err(Error::ShortBuffer);
        }
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
        Ok(())
    }

    #[inline]
    fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    fn rewind(&mut self, pos: usize) {
        self.pos = self.pos.min(pos);
    }
}

/// Primitive and struct writer for one wire variant
pub struct WireEncoder<'s, S: WireSink + ?Sized> {
    sink: &'s mut S,
    config: CodecConfig,
}

impl<'s, S: WireSink + ?Sized> WireEncoder<'s, S> {
    /// Create new encoder writing into `sink`
    #[inline]
    pub fn new(sink: &'s mut S, config: CodecConfig) -> Self {
        Self { sink, config }
    }

    /// Get current position in the sink
    #[inline]
    pub fn position(&self) -> usize {
        self.sink.position()
    }

    #[inline]
    fn compact(&self) -> bool {
        self.config.protocol == Protocol::Compact
    }

    #[inline]
    fn put_varint(&mut self, value: u64) -> Result<()> {
        let mut buf = [0u8; varint::MAX_VARINT_U64_SIZE];
        let len = varint::encode_u64(value, &mut buf)?;
        self.sink.put_slice(&buf[..len])
    }

    #[inline]
    fn put_fixed<const N: usize>(&mut self, be: [u8; N], le: [u8; N]) -> Result<()> {
        match self.config.byte_order {
            ByteOrder::BigEndian => self.sink.put_slice(&be),
            ByteOrder::LittleEndian => self.sink.put_slice(&le),
        }
    }

    /// Write a u8 value
    #[inline]
    pub fn put_u8(&mut self, value: u8) -> Result<()> {
        self.sink.put_slice(&[value])
    }

    /// Write a BOOL payload
    #[inline]
    pub fn put_bool(&mut self, value: bool) -> Result<()> {
        self.put_u8(u8::from(value))
    }

    /// Write a BYTE payload
    #[inline]
    pub fn put_byte(&mut self, value: i8) -> Result<()> {
        self.put_u8(value as u8)
    }

    /// Write an I16 payload
    #[inline]
    pub fn put_i16(&mut self, value: i16) -> Result<()> {
        if self.compact() {
            self.put_varint(u64::from(varint::zigzag_encode_i32(i32::from(value))))
        } else {
            self.put_fixed(value.to_be_bytes(), value.to_le_bytes())
        }
    }

    /// Write an I32 payload
    #[inline]
    pub fn put_i32(&mut self, value: i32) -> Result<()> {
        if self.compact() {
            self.put_varint(u64::from(varint::zigzag_encode_i32(value)))
        } else {
            self.put_fixed(value.to_be_bytes(), value.to_le_bytes())
        }
    }

    /// Write an I64 payload
    #[inline]
    pub fn put_i64(&mut self, value: i64) -> Result<()> {
        if self.compact() {
            self.put_varint(varint::zigzag_encode_i64(value))
        } else {
            self.put_fixed(value.to_be_bytes(), value.to_le_bytes())
        }
    }

    /// Write a DOUBLE payload
    #[inline]
    pub fn put_double(&mut self, value: f64) -> Result<()> {
        self.put_fixed(value.to_be_bytes(), value.to_le_bytes())
    }

    /// Write a length or element count
    fn put_len(&mut self, len: usize) -> Result<()> {
        let len = u32::try_from(len).map_err(|_| Error::Overflow)?;
        if let Some(limit) = self.config.max_length {
            if len > limit {
                return Err(Error::SizeLimitExceeded {
                    length: u64::from(len),
                    limit,
                });
            }
        }
        if self.compact() {
            self.put_varint(u64::from(len))
        } else {
            self.put_fixed(len.to_be_bytes(), len.to_le_bytes())
        }
    }

    /// Write a length-prefixed STRING/BINARY payload
    #[inline]
    pub fn put_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.put_len(bytes.len())?;
        self.sink.put_slice(bytes)
    }

    /// Write a field header
    pub fn put_field_header(&mut self, wire_type: WireType, tag: i16) -> Result<()> {
        self.put_u8(wire_type.code())?;
        if self.compact() {
            self.put_varint(u64::from(varint::zigzag_encode_i32(i32::from(tag))))
        } else {
            self.put_fixed(tag.to_be_bytes(), tag.to_le_bytes())
        }
    }

    /// Write the STOP marker ending a struct
    #[inline]
    pub fn put_field_stop(&mut self) -> Result<()> {
        self.put_u8(WireType::Stop.code())
    }

    /// Write a LIST/SET header
    pub fn put_list_header(&mut self, elem: WireType, count: usize) -> Result<()> {
        self.put_u8(elem.code())?;
        self.put_len(count)
    }

    /// Write a MAP header
    pub fn put_map_header(&mut self, key: WireType, value: WireType, count: usize) -> Result<()> {
        self.put_u8(key.code())?;
        self.put_u8(value.code())?;
        self.put_len(count)
    }

    /// Validate `record` against `schema`, then write every set field in schema
    /// order followed by STOP
    ///
    /// Nothing is written when validation fails. Limit and buffer errors hit
    /// while writing rewind the sink to where the struct started.
    pub fn put_struct(&mut self, record: &Record, schema: &StructSchema) -> Result<()> {
        schema.validate(record)?;
        let start = self.sink.position();
        self.put_struct_at(record, schema, 0).inspect_err(|_| {
            self.sink.rewind(start);
        })
    }

    fn put_struct_at(&mut self, record: &Record, schema: &StructSchema, depth: usize) -> Result<()> {
        if depth >= self.config.max_depth {
            return Err(Error::DepthLimitExceeded(self.config.max_depth));
        }
        trace!(struct_name = schema.name(), depth, "encode struct");

        for field in schema.fields() {
            let Some(value) = record.get(field.tag()) else {
                continue;
            };
            self.put_field_header(field.wire_type(), field.tag())?;
            self.put_value(field.field_type(), value, depth, (schema, field))?;
        }
        self.put_field_stop()
    }

    fn put_value(
        &mut self,
        ty: &FieldType,
        value: &Value,
        depth: usize,
        owner: (&StructSchema, &FieldDescriptor),
    ) -> Result<()> {
        match (ty, value) {
            (FieldType::Bool, Value::Bool(b)) => self.put_bool(*b),
            (FieldType::Byte, Value::Byte(b)) => self.put_byte(*b),
            (FieldType::I16, Value::I16(i)) => self.put_i16(*i),
            (FieldType::I32, Value::I32(i)) => self.put_i32(*i),
            (FieldType::I64, Value::I64(i)) => self.put_i64(*i),
            (FieldType::Double, Value::Double(d)) => self.put_double(*d),
            (FieldType::String, Value::String(s)) => self.put_bytes(s.as_bytes()),
            (FieldType::Binary, Value::Binary(b)) => self.put_bytes(b),
            (FieldType::Struct(schema), Value::Struct(record)) => {
                self.put_struct_at(record, schema, depth + 1)
            }
            (FieldType::List(elem), Value::List(items))
            | (FieldType::Set(elem), Value::Set(items)) => {
                self.enter(depth)?;
                self.put_list_header(elem.wire_type(), items.len())?;
                items
                    .iter()
                    .try_for_each(|item| self.put_value(elem, item, depth + 1, owner))
            }
            (FieldType::Map(k, v), Value::Map(entries)) => {
                self.enter(depth)?;
                self.put_map_header(k.wire_type(), v.wire_type(), entries.len())?;
                for (key, val) in entries {
                    self.put_value(k, key, depth + 1, owner)?;
                    self.put_value(v, val, depth + 1, owner)?;
                }
                Ok(())
            }
            _ => {
                let (schema, field) = owner;
                Err(Error::TypeMismatch {
                    struct_name: schema.name().to_string(),
                    field: field.name().to_string(),
                    expected: field.field_type().to_string(),
                })
            }
        }
    }

    #[inline]
    fn enter(&self, depth: usize) -> Result<()> {
        if depth + 1 >= self.config.max_depth {
            return Err(Error::DepthLimitExceeded(self.config.max_depth));
        }
        Ok(())
    }
}
