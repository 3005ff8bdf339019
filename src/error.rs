//! Error types for the tagwire codec

use alloc::string::String;

/// Broad classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The record does not satisfy its schema (missing required field, wrong value type)
    Validation,
    /// The input bytes are not a well-formed struct encoding
    Protocol,
    /// The schema itself, or a by-name lookup against it, is invalid
    Schema,
    /// The caller-provided output buffer is too small
    Buffer,
}

/// Errors that can occur while building schemas, encoding or decoding records
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A required field is absent
    #[error("required field '{field}' of struct {struct_name} is not set")]
    MissingRequiredField {
        /// Struct type name
        struct_name: String,
        /// Name of the first missing required field
        field: String,
    },
    /// A present value does not match the declared field type
    #[error("field '{field}' of struct {struct_name} expects {expected}")]
    TypeMismatch {
        /// Struct type name
        struct_name: String,
        /// Offending field name
        field: String,
        /// Declared type, rendered for diagnostics
        expected: String,
    },
    /// The record carries a tag the schema does not declare
    #[error("struct {struct_name} does not declare field tag {tag}")]
    UndeclaredField {
        /// Struct type name
        struct_name: String,
        /// Undeclared tag
        tag: i16,
    },
    /// By-name lookup of a field the schema does not declare
    #[error("struct {struct_name} has no field named '{name}'")]
    UnknownField {
        /// Struct type name
        struct_name: String,
        /// Requested field name
        name: String,
    },
    /// Schema construction failed
    #[error("invalid schema {struct_name}: {reason}")]
    InvalidSchema {
        /// Struct type name
        struct_name: String,
        /// What is wrong with it
        reason: String,
    },
    /// Input ended before the struct was terminated
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// Header or container carries a code outside the wire type set
    #[error("unknown wire type code {0}")]
    UnknownWireType(u8),
    /// A length prefix or element count cannot fit in the remaining input
    #[error("declared length {declared} exceeds the {remaining} bytes remaining")]
    LengthExceedsBuffer {
        /// Bytes the prefix claims
        declared: u64,
        /// Bytes actually left
        remaining: usize,
    },
    /// A STRING payload is not valid UTF-8
    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,
    /// A BOOL payload other than 0 or 1
    #[error("invalid bool byte {0:#04x}")]
    InvalidBool(u8),
    /// Varint too long, or an integer out of range for its type
    #[error("integer overflow in varint or length")]
    Overflow,
    /// Nesting deeper than the configured limit
    #[error("nesting depth exceeds limit of {0}")]
    DepthLimitExceeded(usize),
    /// Length or count larger than the configured limit
    #[error("length {length} exceeds configured limit of {limit}")]
    SizeLimitExceeded {
        /// Length found
        length: u64,
        /// Configured limit
        limit: u32,
    },
    /// Bytes remain after the struct's STOP marker
    #[error("{0} trailing bytes after struct")]
    TrailingBytes(usize),
    /// Output buffer too small
    #[error("buffer too small for operation")]
    ShortBuffer,
}

impl Error {
    /// Returns the taxonomy bucket this error belongs to
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingRequiredField { .. }
            | Error::TypeMismatch { .. }
            | Error::UndeclaredField { .. } => ErrorKind::Validation,
            Error::UnknownField { .. } | Error::InvalidSchema { .. } => ErrorKind::Schema,
            Error::ShortBuffer => ErrorKind::Buffer,
            Error::UnexpectedEof
            | Error::UnknownWireType(_)
            | Error::LengthExceedsBuffer { .. }
            | Error::InvalidUtf8
            | Error::InvalidBool(_)
            | Error::Overflow
            | Error::DepthLimitExceeded(_)
            | Error::SizeLimitExceeded { .. }
            | Error::TrailingBytes(_) => ErrorKind::Protocol,
        }
    }

    /// True for errors raised because a record does not satisfy its schema
    pub const fn is_validation(&self) -> bool {
        matches!(self.kind(), ErrorKind::Validation)
    }

    /// True for errors raised because the input bytes are malformed
    pub const fn is_protocol(&self) -> bool {
        matches!(self.kind(), ErrorKind::Protocol)
    }
}

/// Result type alias for tagwire operations
pub type Result<T> = core::result::Result<T, Error>;
