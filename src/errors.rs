//! Error types for layout construction and buffer access.

use std::fmt;

/// How a field was looked up in a [crate::layout::Layout].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKey {
    /// By field name.
    Name(String),
    /// By exact start offset in bytes.
    Offset(usize),
}

impl From<&str> for FieldKey {
    fn from(name: &str) -> Self {
        FieldKey::Name(name.to_owned())
    }
}

impl From<usize> for FieldKey {
    fn from(offset: usize) -> Self {
        FieldKey::Offset(offset)
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Name(name) => write!(f, "`{name}`"),
            FieldKey::Offset(offset) => write!(f, "at offset {offset}"),
        }
    }
}

/// Errors produced when building a [crate::field::Field] or a [crate::layout::Layout].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// Bit field has zero length or does not fit in a single byte.
    #[error("invalid bit field: offset {offset} + length {length} must be within 1..=8 bits")]
    InvalidBitRange {
        /// Bit offset inside the byte.
        offset: u8,
        /// Number of bits.
        length: u8,
    },
    /// Layout was given no fields.
    #[error("a layout requires at least one field")]
    EmptyLayout,
    /// Declared size cannot hold every field.
    #[error("layout size {declared} is smaller than the {required} bytes its fields require")]
    LayoutTooSmall {
        /// Bytes needed by the furthest-reaching field.
        required: usize,
        /// Size the caller asked for.
        declared: usize,
    },
    /// A bit field described as wider than one byte.
    #[error("bit field `{name}` must be 1 byte long, not {length}")]
    BitFieldWidth {
        /// Field name.
        name: String,
        /// Declared byte length.
        length: usize,
    },
    /// Field reaches past the largest addressable offset.
    #[error("field `{name}` at offset {offset} with length {length} overflows the address space")]
    FieldOverflow {
        /// Field name.
        name: String,
        /// Byte offset.
        offset: usize,
        /// Byte length.
        length: usize,
    },
    /// Two fields share a name.
    #[error("field `{0}` is declared more than once")]
    DuplicateField(String),
}

/// Errors produced when binding, reading or writing a buffer through a layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// Bit offset/length passed to a bit primitive is outside the byte.
    #[error("invalid bit range: offset {offset} + length {length} must be within 1..=8 bits")]
    InvalidRange {
        /// Bit offset inside the byte.
        offset: u8,
        /// Number of bits.
        length: u8,
    },
    /// A buffer, value or record has the wrong length.
    #[error("size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Length required.
        expected: usize,
        /// Length supplied.
        actual: usize,
    },
    /// Array buffer length is not a multiple of the record stride.
    #[error("buffer of {len} bytes is not a multiple of the {stride} byte record stride")]
    MisalignedLength {
        /// Buffer length in bytes.
        len: usize,
        /// Record stride in bytes.
        stride: usize,
    },
    /// Offset does not land on a record boundary.
    #[error("offset {offset} is not aligned to the {stride} byte record stride")]
    Misaligned {
        /// Requested byte offset.
        offset: usize,
        /// Record stride in bytes.
        stride: usize,
    },
    /// Offset or index reaches past the end of the buffer.
    #[error("offset {offset} is out of bounds for a buffer of {len} bytes")]
    OutOfBounds {
        /// Requested byte offset.
        offset: usize,
        /// Buffer length in bytes.
        len: usize,
    },
    /// No field matches this name or exact start offset.
    #[error("unknown field {0}")]
    UnknownField(FieldKey),
    /// Replacement record was built from a different layout.
    #[error("record layout is not compatible with the target layout")]
    IncompatibleLayout,
    /// Zero-terminated text is not valid UTF-8.
    #[error("zero-terminated text is not valid UTF-8")]
    InvalidText,
    /// Bit fields have no addressable bytes of their own.
    #[error("bit field `{0}` cannot be viewed mutably")]
    BitFieldView(String),
}
