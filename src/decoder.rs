//! Record decoder
//!
//! [`WireCursor`] reads one wire variant from a borrowed slice. Struct decoding
//! is driven by field tags, not position:
//!
//! ```text
//! ExpectHeader --field--> ExpectPayload --> ExpectHeader
//! ExpectHeader --STOP---> Done
//! ```
//!
//! Payloads whose tag is unknown, or whose wire type disagrees with the
//! schema, are skipped structurally and the field is left unset.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use tracing::{debug, trace, warn};

use crate::config::{ByteOrder, CodecConfig, Protocol};
use crate::error::{Error, Result};
use crate::record::Record;
use crate::schema::{FieldType, StructSchema};
use crate::value::Value;
use crate::varint;
use crate::wire::{FieldHeader, ListHeader, MapHeader, WireType};

/// A known field whose payload did not have the declared wire type
///
/// For containers, `expected`/`found` are the element, key or value codes
/// that disagreed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaMismatch {
    /// Struct type name
    pub struct_name: String,
    /// Field name
    pub field: String,
    /// Field tag
    pub tag: i16,
    /// Wire type the schema declares
    pub expected: WireType,
    /// Wire type found on the wire
    pub found: WireType,
}

/// A field tag the schema does not declare
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTag {
    /// Struct type name
    pub struct_name: String,
    /// Tag found on the wire
    pub tag: i16,
    /// Wire type of the skipped payload
    pub wire_type: WireType,
}

/// Non-fatal findings of one decode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeReport {
    /// Known fields dropped because of schema drift
    pub mismatches: Vec<SchemaMismatch>,
    /// Unknown fields skipped
    pub unknown_tags: Vec<UnknownTag>,
}

impl DecodeReport {
    /// True when every field on the wire was understood
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty() && self.unknown_tags.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
struct Drift {
    expected: WireType,
    found: WireType,
}

enum Decoded {
    Present(Value),
    Dropped(Drift),
}

/// Cursor reading one wire variant with position tracking
#[derive(Debug)]
pub struct WireCursor<'a> {
    buf: &'a [u8],
    pos: usize,
    config: CodecConfig,
    report: DecodeReport,
}

impl<'a> WireCursor<'a> {
    /// Create new cursor at the start of `buf`
    #[inline]
    pub fn new(buf: &'a [u8], config: CodecConfig) -> Self {
        Self {
            buf,
            pos: 0,
            config,
            report: DecodeReport::default(),
        }
    }

    /// Get current read position
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Get remaining bytes in cursor
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Check if cursor is at end
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Findings collected so far
    #[inline]
    pub fn report(&self) -> &DecodeReport {
        &self.report
    }

    /// Consume the cursor, keeping its findings
    #[inline]
    pub fn into_report(self) -> DecodeReport {
        self.report
    }

    #[inline]
    fn compact(&self) -> bool {
        self.config.protocol == Protocol::Compact
    }

    /// Skip raw bytes
    #[inline]
    pub fn advance(&mut self, n: usize) -> Result<()> {
        if n > self.remaining() {
            return Err(Error::UnexpectedEof);
        }
        self.pos += n;
        Ok(())
    }

    #[inline]
    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self
            .buf
            .get(self.pos..self.pos + N)
            .ok_or(Error::UnexpectedEof)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        self.pos += N;
        Ok(out)
    }

    #[inline]
    fn get_varint(&mut self) -> Result<u64> {
        let (value, len) = varint::decode_u64(&self.buf[self.pos..])?;
        self.pos += len;
        Ok(value)
    }

    #[inline]
    fn get_varint_u32(&mut self) -> Result<u32> {
        let (value, len) = varint::decode_u32(&self.buf[self.pos..])?;
        self.pos += len;
        Ok(value)
    }

    /// Read a u8 value
    #[inline]
    pub fn get_u8(&mut self) -> Result<u8> {
        let [b] = self.take::<1>()?;
        Ok(b)
    }

    /// Read a BOOL payload; only 0 and 1 are accepted
    #[inline]
    pub fn get_bool(&mut self) -> Result<bool> {
        match self.get_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Error::InvalidBool(other)),
        }
    }

    /// Read a BYTE payload
    #[inline]
    pub fn get_byte(&mut self) -> Result<i8> {
        Ok(self.get_u8()? as i8)
    }

    /// Read an I16 payload
    #[inline]
    pub fn get_i16(&mut self) -> Result<i16> {
        if self.compact() {
            let v = varint::zigzag_decode_i32(self.get_varint_u32()?);
            i16::try_from(v).map_err(|_| Error::Overflow)
        } else {
            let b = self.take::<2>()?;
            Ok(match self.config.byte_order {
                ByteOrder::BigEndian => i16::from_be_bytes(b),
                ByteOrder::LittleEndian => i16::from_le_bytes(b),
            })
        }
    }

    /// Read an I32 payload
    #[inline]
    pub fn get_i32(&mut self) -> Result<i32> {
        if self.compact() {
            Ok(varint::zigzag_decode_i32(self.get_varint_u32()?))
        } else {
            let b = self.take::<4>()?;
            Ok(match self.config.byte_order {
                ByteOrder::BigEndian => i32::from_be_bytes(b),
                ByteOrder::LittleEndian => i32::from_le_bytes(b),
            })
        }
    }

    /// Read an I64 payload
    #[inline]
    pub fn get_i64(&mut self) -> Result<i64> {
        if self.compact() {
            Ok(varint::zigzag_decode_i64(self.get_varint()?))
        } else {
            let b = self.take::<8>()?;
            Ok(match self.config.byte_order {
                ByteOrder::BigEndian => i64::from_be_bytes(b),
                ByteOrder::LittleEndian => i64::from_le_bytes(b),
            })
        }
    }

    /// Read a DOUBLE payload
    #[inline]
    pub fn get_double(&mut self) -> Result<f64> {
        let b = self.take::<8>()?;
        Ok(match self.config.byte_order {
            ByteOrder::BigEndian => f64::from_be_bytes(b),
            ByteOrder::LittleEndian => f64::from_le_bytes(b),
        })
    }

    /// Read a length or count, applying the configured limit
    fn get_len(&mut self) -> Result<usize> {
        let len = if self.compact() {
            self.get_varint_u32()?
        } else {
            let b = self.take::<4>()?;
            match self.config.byte_order {
                ByteOrder::BigEndian => u32::from_be_bytes(b),
                ByteOrder::LittleEndian => u32::from_le_bytes(b),
            }
        };
        if let Some(limit) = self.config.max_length {
            if len > limit {
                return Err(Error::SizeLimitExceeded {
                    length: u64::from(len),
                    limit,
                });
            }
        }
        Ok(len as usize)
    }

    /// Fail unless `count` items of at least `min_len` bytes each can still follow
    fn ensure_fits(&self, count: usize, min_len: usize) -> Result<()> {
        let needed = (count as u64).saturating_mul(min_len as u64);
        if needed > self.remaining() as u64 {
            return Err(Error::LengthExceedsBuffer {
                declared: needed,
                remaining: self.remaining(),
            });
        }
        Ok(())
    }

    /// Read a length-prefixed STRING/BINARY payload
    ///
    /// Returns a zero-copy slice into the original buffer
    #[inline]
    pub fn get_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.get_len()?;
        self.ensure_fits(len, 1)?;
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Read a STRING payload
    #[inline]
    pub fn get_str(&mut self) -> Result<&'a str> {
        core::str::from_utf8(self.get_bytes()?).map_err(|_| Error::InvalidUtf8)
    }

    /// Read a field header or the STOP marker
    pub fn get_field_header(&mut self) -> Result<FieldHeader> {
        let wire_type = WireType::from_code(self.get_u8()?)?;
        if wire_type == WireType::Stop {
            return Ok(FieldHeader::Stop);
        }
        let tag = if self.compact() {
            let raw = varint::zigzag_decode_i32(self.get_varint_u32()?);
            i16::try_from(raw).map_err(|_| Error::Overflow)?
        } else {
            let b = self.take::<2>()?;
            match self.config.byte_order {
                ByteOrder::BigEndian => i16::from_be_bytes(b),
                ByteOrder::LittleEndian => i16::from_le_bytes(b),
            }
        };
        Ok(FieldHeader::Field { wire_type, tag })
    }

    /// Read a LIST/SET header, rejecting counts that cannot fit in the input
    pub fn get_list_header(&mut self) -> Result<ListHeader> {
        let elem = WireType::from_element_code(self.get_u8()?)?;
        let count = self.get_len()?;
        self.ensure_fits(count, elem.min_payload_len(self.config.protocol))?;
        Ok(ListHeader {
            elem,
            count: count as u32,
        })
    }

    /// Read a MAP header, rejecting counts that cannot fit in the input
    pub fn get_map_header(&mut self) -> Result<MapHeader> {
        let key = WireType::from_element_code(self.get_u8()?)?;
        let value = WireType::from_element_code(self.get_u8()?)?;
        let count = self.get_len()?;
        let protocol = self.config.protocol;
        self.ensure_fits(
            count,
            key.min_payload_len(protocol) + value.min_payload_len(protocol),
        )?;
        Ok(MapHeader {
            key,
            value,
            count: count as u32,
        })
    }

    #[inline]
    fn enter(&self, depth: usize) -> Result<()> {
        if depth >= self.config.max_depth {
            return Err(Error::DepthLimitExceeded(self.config.max_depth));
        }
        Ok(())
    }

    /// Consume exactly one payload of `wire_type` without interpreting it
    ///
    /// Nested structs and containers are walked structurally since the encoding
    /// carries no length for them.
    pub fn skip_value(&mut self, wire_type: WireType) -> Result<()> {
        self.skip_at(wire_type, 0)
    }

    fn skip_at(&mut self, wire_type: WireType, depth: usize) -> Result<()> {
        match wire_type {
            WireType::Stop => Err(Error::UnknownWireType(WireType::Stop.code())),
            WireType::Bool | WireType::Byte => self.advance(1),
            WireType::Double => self.advance(8),
            WireType::I16 | WireType::I32 | WireType::I64 if self.compact() => {
                self.get_varint().map(drop)
            }
            WireType::I16 => self.advance(2),
            WireType::I32 => self.advance(4),
            WireType::I64 => self.advance(8),
            WireType::String => self.get_bytes().map(drop),
            WireType::Struct => {
                self.enter(depth + 1)?;
                loop {
                    match self.get_field_header()? {
                        FieldHeader::Stop => return Ok(()),
                        FieldHeader::Field { wire_type, .. } => {
                            self.skip_at(wire_type, depth + 1)?
                        }
                    }
                }
            }
            WireType::List | WireType::Set => {
                self.enter(depth + 1)?;
                let header = self.get_list_header()?;
                for _ in 0..header.count {
                    self.skip_at(header.elem, depth + 1)?;
                }
                Ok(())
            }
            WireType::Map => {
                self.enter(depth + 1)?;
                let header = self.get_map_header()?;
                for _ in 0..header.count {
                    self.skip_at(header.key, depth + 1)?;
                    self.skip_at(header.value, depth + 1)?;
                }
                Ok(())
            }
        }
    }

    /// Decode one struct up to and including its STOP marker
    ///
    /// The result is not validated; see [`Codec::decode`](crate::Codec::decode).
    pub fn get_struct(&mut self, schema: &StructSchema) -> Result<Record> {
        self.get_struct_at(schema, 0)
    }

    fn get_struct_at(&mut self, schema: &StructSchema, depth: usize) -> Result<Record> {
        self.enter(depth)?;
        trace!(struct_name = schema.name(), depth, "decode struct");

        let mut record = Record::new();
        loop {
            let (wire_type, tag) = match self.get_field_header()? {
                FieldHeader::Stop => return Ok(record),
                FieldHeader::Field { wire_type, tag } => (wire_type, tag),
            };

            let Some(field) = schema.field(tag) else {
                debug!(struct_name = schema.name(), tag, %wire_type, "skipping unknown field");
                self.report.unknown_tags.push(UnknownTag {
                    struct_name: schema.name().to_string(),
                    tag,
                    wire_type,
                });
                self.skip_at(wire_type, depth)?;
                continue;
            };

            let drift = if field.wire_type() != wire_type {
                self.skip_at(wire_type, depth)?;
                Drift {
                    expected: field.wire_type(),
                    found: wire_type,
                }
            } else {
                match self.get_value(field.field_type(), depth)? {
                    Decoded::Present(value) => {
                        record.set(tag, value);
                        continue;
                    }
                    Decoded::Dropped(drift) => drift,
                }
            };

            warn!(
                struct_name = schema.name(),
                field = field.name(),
                tag,
                expected = %drift.expected,
                found = %drift.found,
                "dropping field with unexpected wire type"
            );
            self.report.mismatches.push(SchemaMismatch {
                struct_name: schema.name().to_string(),
                field: field.name().to_string(),
                tag,
                expected: drift.expected,
                found: drift.found,
            });
        }
    }

    /// Decode a payload whose header already matched `ty`
    fn get_value(&mut self, ty: &FieldType, depth: usize) -> Result<Decoded> {
        let value = match ty {
            FieldType::Bool => Value::Bool(self.get_bool()?),
            FieldType::Byte => Value::Byte(self.get_byte()?),
            FieldType::I16 => Value::I16(self.get_i16()?),
            FieldType::I32 => Value::I32(self.get_i32()?),
            FieldType::I64 => Value::I64(self.get_i64()?),
            FieldType::Double => Value::Double(self.get_double()?),
            FieldType::String => Value::String(self.get_str()?.to_string()),
            FieldType::Binary => Value::Binary(self.get_bytes()?.to_vec()),
            FieldType::Struct(schema) => Value::Struct(self.get_struct_at(schema, depth + 1)?),
            FieldType::List(elem) | FieldType::Set(elem) => {
                self.enter(depth + 1)?;
                let header = self.get_list_header()?;
                let items = match self.get_elements(elem, header, depth + 1)? {
                    Ok(items) => items,
                    Err(drift) => return Ok(Decoded::Dropped(drift)),
                };
                if matches!(ty, FieldType::Set(_)) {
                    Value::Set(items)
                } else {
                    Value::List(items)
                }
            }
            FieldType::Map(k, v) => {
                self.enter(depth + 1)?;
                let header = self.get_map_header()?;
                match self.get_entries(k, v, header, depth + 1)? {
                    Ok(entries) => Value::Map(entries),
                    Err(drift) => return Ok(Decoded::Dropped(drift)),
                }
            }
        };
        Ok(Decoded::Present(value))
    }

    fn get_elements(
        &mut self,
        elem: &FieldType,
        header: ListHeader,
        depth: usize,
    ) -> Result<core::result::Result<Vec<Value>, Drift>> {
        if header.count > 0 && header.elem != elem.wire_type() {
            for _ in 0..header.count {
                self.skip_at(header.elem, depth)?;
            }
            return Ok(Err(Drift {
                expected: elem.wire_type(),
                found: header.elem,
            }));
        }

        let mut items = Vec::with_capacity(header.count as usize);
        let mut drift = None;
        for _ in 0..header.count {
            match self.get_value(elem, depth)? {
                Decoded::Present(item) => items.push(item),
                Decoded::Dropped(d) => drift = drift.or(Some(d)),
            }
        }
        Ok(match drift {
            Some(d) => Err(d),
            None => Ok(items),
        })
    }

    fn get_entries(
        &mut self,
        k: &FieldType,
        v: &FieldType,
        header: MapHeader,
        depth: usize,
    ) -> Result<core::result::Result<Vec<(Value, Value)>, Drift>> {
        if header.count > 0 && (header.key != k.wire_type() || header.value != v.wire_type()) {
            for _ in 0..header.count {
                self.skip_at(header.key, depth)?;
                self.skip_at(header.value, depth)?;
            }
            let (expected, found) = if header.key != k.wire_type() {
                (k.wire_type(), header.key)
            } else {
                (v.wire_type(), header.value)
            };
            return Ok(Err(Drift { expected, found }));
        }

        let mut entries = Vec::with_capacity(header.count as usize);
        let mut drift = None;
        for _ in 0..header.count {
            let key = self.get_value(k, depth)?;
            let value = self.get_value(v, depth)?;
            match (key, value) {
                (Decoded::Present(key), Decoded::Present(value)) => entries.push((key, value)),
                (Decoded::Dropped(d), _) | (_, Decoded::Dropped(d)) => drift = drift.or(Some(d)),
            }
        }
        Ok(match drift {
            Some(d) => Err(d),
            None => Ok(entries),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::WireEncoder;
    use alloc::vec;

    fn cursor(buf: &[u8]) -> WireCursor<'_> {
        WireCursor::new(buf, CodecConfig::binary())
    }

    #[test]
    fn test_cursor_operations() {
        let data = [0x00, 0x07, 0xFF, 0xFF, 0xFF, 0xFE, 0x01, 0x05];
        let mut c = cursor(&data);

        assert_eq!(c.remaining(), 8);
        assert!(!c.is_at_end());
        assert_eq!(c.get_i16().unwrap(), 7);
        assert_eq!(c.get_i32().unwrap(), -2);
        assert!(c.get_bool().unwrap());
        assert_eq!(c.get_bool(), Err(Error::InvalidBool(5)));
        assert!(c.is_at_end());
        assert_eq!(c.get_u8(), Err(Error::UnexpectedEof));
        assert_eq!(c.advance(1), Err(Error::UnexpectedEof));
    }

    #[test]
    fn test_little_endian_reads() {
        let data = [0x07, 0x00, 0x01, 0x00, 0x00, 0x00];
        let config = CodecConfig::binary().with_byte_order(ByteOrder::LittleEndian);
        let mut c = WireCursor::new(&data, config);
        assert_eq!(c.get_i16().unwrap(), 7);
        assert_eq!(c.get_i32().unwrap(), 1);
    }

    #[test]
    fn test_field_headers() {
        let data = [11, 0, 1, 0];
        let mut c = cursor(&data);
        assert_eq!(
            c.get_field_header().unwrap(),
            FieldHeader::Field {
                wire_type: WireType::String,
                tag: 1
            }
        );
        assert_eq!(c.get_field_header().unwrap(), FieldHeader::Stop);

        let mut c = cursor(&[9, 0, 1]);
        assert_eq!(c.get_field_header(), Err(Error::UnknownWireType(9)));
    }

    #[test]
    fn test_length_prefix_exceeding_input() {
        let mut c = cursor(&[0, 0, 0, 10, b'a', b'b']);
        assert_eq!(
            c.get_bytes(),
            Err(Error::LengthExceedsBuffer {
                declared: 10,
                remaining: 2
            })
        );

        // one million i64s cannot fit in zero bytes
        let mut c = cursor(&[10, 0x00, 0x0F, 0x42, 0x40]);
        assert!(matches!(
            c.get_list_header(),
            Err(Error::LengthExceedsBuffer { .. })
        ));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut c = cursor(&[0, 0, 0, 2, 0xC3, 0x28]);
        assert_eq!(c.get_str(), Err(Error::InvalidUtf8));
    }

    #[test]
    fn test_skip_consumes_exactly_one_payload() {
        let inner = StructSchema::builder("Inner")
            .optional(1, "xs", FieldType::list(FieldType::String))
            .optional(2, "m", FieldType::map(FieldType::I32, FieldType::Double))
            .build()
            .unwrap();
        let record = Record::new()
            .with(1, Value::List(vec!["a".into(), "bc".into()]))
            .with(2, Value::Map(vec![(Value::I32(1), Value::Double(0.5))]));

        for config in [CodecConfig::binary(), CodecConfig::compact()] {
            let mut out = Vec::new();
            let mut enc = WireEncoder::new(&mut out, config);
            enc.put_struct(&record, &inner).unwrap();
            enc.put_u8(0xAA).unwrap();

            let mut c = WireCursor::new(&out, config);
            c.skip_value(WireType::Struct).unwrap();
            assert_eq!(c.get_u8().unwrap(), 0xAA);
            assert!(c.is_at_end());
        }
    }

    #[test]
    fn test_skip_depth_limit() {
        // LIST<LIST<LIST<BOOL>>> each holding one element
        let data = [15, 0, 0, 0, 1, 15, 0, 0, 0, 1, 2, 0, 0, 0, 1, 1];
        let shallow = CodecConfig::binary().with_max_depth(2);
        let mut c = WireCursor::new(&data, shallow);
        assert_eq!(
            c.skip_value(WireType::List),
            Err(Error::DepthLimitExceeded(2))
        );

        let mut c = WireCursor::new(&data, CodecConfig::binary());
        c.skip_value(WireType::List).unwrap();
        assert!(c.is_at_end());
    }

    #[test]
    fn test_report_collects_drift_and_unknown() {
        let schema = StructSchema::builder("S")
            .optional(1, "count", FieldType::I32)
            .build()
            .unwrap();
        // field 1 as I64 (drift), field 9 as BOOL (unknown), STOP
        let data = [10, 0, 1, 0, 0, 0, 0, 0, 0, 0, 5, 2, 0, 9, 1, 0];
        let mut c = cursor(&data);
        let record = c.get_struct(&schema).unwrap();
        assert!(record.is_empty());
        assert!(c.is_at_end());

        let report = c.into_report();
        assert!(!report.is_clean());
        assert_eq!(
            report.mismatches,
            vec![SchemaMismatch {
                struct_name: "S".into(),
                field: "count".into(),
                tag: 1,
                expected: WireType::I32,
                found: WireType::I64,
            }]
        );
        assert_eq!(
            report.unknown_tags,
            vec![UnknownTag {
                struct_name: "S".into(),
                tag: 9,
                wire_type: WireType::Bool,
            }]
        );
    }

    #[test]
    fn test_element_drift_drops_field() {
        let schema = StructSchema::builder("S")
            .optional(1, "ids", FieldType::list(FieldType::I32))
            .optional(2, "flag", FieldType::Bool)
            .build()
            .unwrap();
        // ids: LIST<I64> of one element, flag: true, STOP
        let data = [
            15, 0, 1, 10, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 3, 2, 0, 2, 1, 0,
        ];
        let mut c = cursor(&data);
        let record = c.get_struct(&schema).unwrap();
        assert!(!record.is_set(1));
        assert_eq!(record.get(2), Some(&Value::Bool(true)));
        assert_eq!(c.report().mismatches[0].found, WireType::I64);
        assert_eq!(c.report().mismatches[0].expected, WireType::I32);
    }

    #[test]
    fn test_empty_container_ignores_element_code() {
        let schema = StructSchema::builder("S")
            .optional(1, "ids", FieldType::set(FieldType::I32))
            .build()
            .unwrap();
        let data = [14, 0, 1, 11, 0, 0, 0, 0, 0];
        let mut c = cursor(&data);
        let record = c.get_struct(&schema).unwrap();
        assert_eq!(record.get(1), Some(&Value::Set(vec![])));
        assert!(c.report().is_clean());
    }
}
