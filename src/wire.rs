//! Wire type codes and field headers

use core::fmt;

use crate::config::Protocol;
use crate::error::{Error, Result};

/// On-wire type code carried by every field header and container header
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WireType {
    /// Struct terminator, carries no tag and no payload
    Stop = 0,
    /// One byte, 0 or 1
    Bool = 2,
    /// One signed byte
    Byte = 3,
    /// IEEE-754 binary64
    Double = 4,
    /// 16-bit signed integer
    I16 = 6,
    /// 32-bit signed integer
    I32 = 8,
    /// 64-bit signed integer
    I64 = 10,
    /// Length-prefixed bytes (UTF-8 strings and raw binary)
    String = 11,
    /// Nested header...STOP sequence
    Struct = 12,
    /// Key type, value type, count, alternating entries
    Map = 13,
    /// Element type, count, elements
    Set = 14,
    /// Element type, count, elements
    List = 15,
}

impl WireType {
    /// Parse a type code read from the wire
    #[inline]
    pub fn from_code(code: u8) -> Result<Self> {
        Ok(match code {
            0 => WireType::Stop,
            2 => WireType::Bool,
            3 => WireType::Byte,
            4 => WireType::Double,
            6 => WireType::I16,
            8 => WireType::I32,
            10 => WireType::I64,
            11 => WireType::String,
            12 => WireType::Struct,
            13 => WireType::Map,
            14 => WireType::Set,
            15 => WireType::List,
            other => return Err(Error::UnknownWireType(other)),
        })
    }

    /// Parse an element/key/value code of a container header, where STOP is not allowed
    #[inline]
    pub fn from_element_code(code: u8) -> Result<Self> {
        match Self::from_code(code) {
            Ok(WireType::Stop) => Err(Error::UnknownWireType(code)),
            other => other,
        }
    }

    /// Numeric code written on the wire
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Smallest number of bytes a payload of this type can occupy
    ///
    /// Used to reject element counts that cannot possibly fit in the remaining input
    /// before anything is allocated.
    pub const fn min_payload_len(self, protocol: Protocol) -> usize {
        match (self, protocol) {
            (WireType::Stop, _) => 0,
            (WireType::Bool | WireType::Byte, _) => 1,
            (WireType::Double, _) => 8,
            (WireType::I16, Protocol::Binary) => 2,
            (WireType::I32, Protocol::Binary) => 4,
            (WireType::I64, Protocol::Binary) => 8,
            (WireType::I16 | WireType::I32 | WireType::I64, Protocol::Compact) => 1,
            (WireType::String, Protocol::Binary) => 4,
            (WireType::String, Protocol::Compact) => 1,
            // an empty struct is a lone STOP
            (WireType::Struct, _) => 1,
            (WireType::List | WireType::Set, Protocol::Binary) => 5,
            (WireType::List | WireType::Set, Protocol::Compact) => 2,
            (WireType::Map, Protocol::Binary) => 6,
            (WireType::Map, Protocol::Compact) => 3,
        }
    }

    /// Upper-case protocol name
    pub const fn name(self) -> &'static str {
        match self {
            WireType::Stop => "STOP",
            WireType::Bool => "BOOL",
            WireType::Byte => "BYTE",
            WireType::Double => "DOUBLE",
            WireType::I16 => "I16",
            WireType::I32 => "I32",
            WireType::I64 => "I64",
            WireType::String => "STRING",
            WireType::Struct => "STRUCT",
            WireType::Map => "MAP",
            WireType::Set => "SET",
            WireType::List => "LIST",
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Header preceding every field payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldHeader {
    /// A field payload follows
    Field {
        /// Payload type
        wire_type: WireType,
        /// Field tag
        tag: i16,
    },
    /// End of the enclosing struct
    Stop,
}

/// Container header for LIST and SET payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListHeader {
    /// Element type
    pub elem: WireType,
    /// Element count
    pub count: u32,
}

/// Container header for MAP payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapHeader {
    /// Key type
    pub key: WireType,
    /// Value type
    pub value: WireType,
    /// Entry count
    pub count: u32,
}
