use crate::major::MajorType;

/// Errors raised while reading item heads and bodies off a byte source.
///
/// Every variant that can be tied to a position carries the byte offset
/// (from the start of the source) where the problem was detected. For
/// binary payloads that offset is the only useful coordinate.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// Input ended before a complete head, argument or body could be read.
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: u64 },

    /// Additional-information values 28, 29 and 30 are reserved.
    ///
    /// Also raised when 31 (indefinite length) appears where only a
    /// definite argument is allowed, e.g. on an integer or a tag.
    #[error("invalid additional information {info} at offset {offset}")]
    InvalidAdditionalInfo { offset: u64, info: u8 },

    /// A chunk of an indefinite-length string was not a definite string
    /// of the same major type.
    #[error("expected {expected:?} at offset {offset}, found {found:?}")]
    UnexpectedMajorType {
        offset: u64,
        expected: MajorType,
        found: MajorType,
    },

    /// A text string body was not well-formed UTF-8.
    #[error("invalid UTF-8 in text string at offset {offset}")]
    InvalidUtf8 { offset: u64 },

    /// A declared length does not fit in memory on this platform.
    #[error("length {length} at offset {offset} exceeds addressable memory")]
    LengthOverflow { offset: u64, length: u64 },

    /// I/O error from a stream-backed source.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
