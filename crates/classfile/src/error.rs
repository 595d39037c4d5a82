//! Decode errors for class-file buffers.

use thiserror::Error;

/// Errors that occur while decoding a class file.
///
/// Every failure aborts the decode of the whole class; no partially
/// populated [`ClassFile`](crate::ClassFile) is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Fewer bytes remain than the current read step requires.
    #[error("truncated input at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// The first four bytes are not `0xCAFEBABE`.
    #[error("bad magic: {found:#010x}")]
    BadMagic { found: u32 },

    /// Index 0, an index past the end of the pool, or the unused second
    /// slot of a Long/Double entry.
    #[error("invalid constant pool index {index}")]
    InvalidConstantIndex { index: u16 },

    /// The entry exists but is not of the requested kind.
    #[error("constant pool index {index}: expected {expected}, found {found}")]
    WrongConstantKind {
        index: u16,
        expected: &'static str,
        found: &'static str,
    },

    /// Tag byte outside the known constant set; its length cannot be known.
    #[error("unsupported constant pool tag {tag} at offset {offset}")]
    UnsupportedConstantTag { tag: u8, offset: usize },

    /// Utf8 constant bytes are not valid modified UTF-8.
    #[error("malformed modified UTF-8 at offset {offset}")]
    MalformedUtf8 { offset: usize },

    /// A Utf8 entry holds an unpaired surrogate where Unicode text is
    /// required (names, descriptors).
    #[error("constant pool index {index} is not valid Unicode")]
    NotUnicode { index: u16 },

    /// A structurally decoded attribute did not fill its declared length.
    #[error("attribute {name}: declared length {declared}, decoded {consumed}")]
    AttributeLengthMismatch {
        name: String,
        declared: u32,
        consumed: usize,
    },

    /// Bytes remain after the last class-level attribute.
    #[error("{remaining} trailing bytes at offset {offset}")]
    TrailingBytes { offset: usize, remaining: usize },
}
