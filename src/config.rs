//! Codec configuration
//!
//! The wire variant and byte order are fixed when a [`Codec`](crate::Codec) is
//! constructed; both ends of a connection must agree on them.

/// Default limit on struct and container nesting
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Concrete wire variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Protocol {
    /// Fixed-width integers, 2-byte tags, 4-byte lengths and counts
    #[default]
    Binary,
    /// Zigzag varint integers and tags, varint lengths and counts
    Compact,
}

/// Byte order of fixed-width fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ByteOrder {
    /// Network order
    #[default]
    BigEndian,
    /// Little-endian
    LittleEndian,
}

/// Construction-time codec settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CodecConfig {
    /// Wire variant
    pub protocol: Protocol,
    /// Byte order of fixed-width integers, tags, lengths and doubles
    pub byte_order: ByteOrder,
    /// Maximum struct/container nesting, applied to encode, decode and skip
    pub max_depth: usize,
    /// Maximum string/binary length and container count, if any
    pub max_length: Option<u32>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            protocol: Protocol::Binary,
            byte_order: ByteOrder::BigEndian,
            max_depth: DEFAULT_MAX_DEPTH,
            max_length: None,
        }
    }
}

impl CodecConfig {
    /// Binary variant, big-endian
    #[inline]
    pub const fn binary() -> Self {
        Self {
            protocol: Protocol::Binary,
            byte_order: ByteOrder::BigEndian,
            max_depth: DEFAULT_MAX_DEPTH,
            max_length: None,
        }
    }

    /// Compact variant, doubles big-endian
    #[inline]
    pub const fn compact() -> Self {
        Self {
            protocol: Protocol::Compact,
            ..Self::binary()
        }
    }

    /// Override the byte order
    #[inline]
    pub const fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Override the nesting limit
    #[inline]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Bound string/binary lengths and container counts
    #[inline]
    pub const fn with_max_length(mut self, max_length: u32) -> Self {
        self.max_length = Some(max_length);
        self
    }
}
