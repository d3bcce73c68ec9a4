use cbor_types::HandlerError;
use cbor_wire::{MajorType, WireError};

/// Errors that can occur while decoding a binary item stream.
///
/// Wire-level failures (truncation, reserved additional information,
/// bad UTF-8) come from `cbor-wire` and are wrapped transparently. The
/// remaining variants are structural problems only visible at the item
/// level, plus failures reported back by the handler.
///
/// ```text
///   DecodeError
///   ├── Wire(WireError)            ← head, argument or string body
///   ├── UnexpectedBreak            ← 0xFF where an item was expected
///   ├── UnsupportedMapKey          ← map key neither text nor bytes
///   ├── UnsupportedSimpleValue     ← simple value outside 20..=23
///   ├── InvalidDecimalFraction     ← tag 4/5 payload not [exp, mantissa]
///   ├── NestingTooDeep             ← container depth over the limit
///   ├── BignumTooLarge             ← tag 2/3 payload over the limit
///   ├── TrailingData               ← bytes after a single-item decode
///   └── Handler(HandlerError)      ← consumer aborted the read
/// ```
///
/// Every variant knows its [`ErrorCode`], a flat `Copy` classification
/// suited to matching and reporting.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Wire(#[from] WireError),

    /// A break byte appeared outside an indefinite-length container, or
    /// where a map value was still owed.
    #[error("unexpected break byte at offset {offset}")]
    UnexpectedBreak { offset: u64 },

    /// Map keys must be text strings or byte strings.
    #[error("unsupported map key of type {found:?} at offset {offset}")]
    UnsupportedMapKey { offset: u64, found: MajorType },

    /// Simple values other than false, true, null and undefined have no
    /// event to map to.
    #[error("unsupported simple value {value} at offset {offset}")]
    UnsupportedSimpleValue { offset: u64, value: u8 },

    /// The payload of a decimal fraction or bigfloat tag was malformed.
    #[error("invalid decimal fraction at offset {offset}: {reason}")]
    InvalidDecimalFraction { offset: u64, reason: &'static str },

    /// Opening another container would exceed the configured depth.
    #[error("nesting deeper than {limit} at offset {offset}")]
    NestingTooDeep { offset: u64, limit: usize },

    /// A tag 2 or tag 3 byte string is longer than the configured limit.
    #[error("bignum of {len} bytes exceeds limit {limit} at offset {offset}")]
    BignumTooLarge {
        offset: u64,
        len: usize,
        limit: usize,
    },

    /// Bytes remained after the single item a caller asked for.
    #[error("{extra_bytes} trailing bytes after item at offset {offset}")]
    TrailingData { offset: u64, extra_bytes: usize },

    /// The handler refused an event.
    #[error("handler failed at offset {offset}: {source}")]
    Handler {
        offset: u64,
        #[source]
        source: HandlerError,
    },
}

/// Flat classification of a [`DecodeError`].
///
/// ```text
/// ┌────────────────────────┬───────────────────────────────────────┐
/// │ Code                   │ Raised by                             │
/// ├────────────────────────┼───────────────────────────────────────┤
/// │ UnexpectedEof          │ input exhausted mid-item              │
/// │ InvalidAdditionalInfo  │ reserved info 28..=30, misplaced 31   │
/// │ UnexpectedMajorType    │ foreign chunk in an indefinite string │
/// │ InvalidUtf8            │ text string body                      │
/// │ LengthOverflow         │ length beyond addressable memory      │
/// │ UnexpectedBreak        │ stray 0xFF                            │
/// │ UnsupportedMapKey      │ non-string map key                    │
/// │ UnsupportedSimpleValue │ unassigned simple value               │
/// │ InvalidDecimalFraction │ malformed tag 4/5 payload             │
/// │ NestingTooDeep         │ depth limit                           │
/// │ BignumTooLarge         │ bignum byte-length limit              │
/// │ TrailingData           │ single-item convenience decode        │
/// │ Handler                │ handler returned an error             │
/// │ Io                     │ stream-backed source                  │
/// └────────────────────────┴───────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    UnexpectedEof,
    InvalidAdditionalInfo,
    UnexpectedMajorType,
    InvalidUtf8,
    LengthOverflow,
    UnexpectedBreak,
    UnsupportedMapKey,
    UnsupportedSimpleValue,
    InvalidDecimalFraction,
    NestingTooDeep,
    BignumTooLarge,
    TrailingData,
    Handler,
    Io,
}

impl ErrorCode {
    /// Stable snake-case name for reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnexpectedEof => "unexpected_eof",
            Self::InvalidAdditionalInfo => "invalid_additional_info",
            Self::UnexpectedMajorType => "unexpected_major_type",
            Self::InvalidUtf8 => "invalid_utf8",
            Self::LengthOverflow => "length_overflow",
            Self::UnexpectedBreak => "unexpected_break",
            Self::UnsupportedMapKey => "unsupported_map_key",
            Self::UnsupportedSimpleValue => "unsupported_simple_value",
            Self::InvalidDecimalFraction => "invalid_decimal_fraction",
            Self::NestingTooDeep => "nesting_too_deep",
            Self::BignumTooLarge => "bignum_too_large",
            Self::TrailingData => "trailing_data",
            Self::Handler => "handler",
            Self::Io => "io",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DecodeError {
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Wire(wire) => match wire {
                WireError::UnexpectedEof { .. } => ErrorCode::UnexpectedEof,
                WireError::InvalidAdditionalInfo { .. } => ErrorCode::InvalidAdditionalInfo,
                WireError::UnexpectedMajorType { .. } => ErrorCode::UnexpectedMajorType,
                WireError::InvalidUtf8 { .. } => ErrorCode::InvalidUtf8,
                WireError::LengthOverflow { .. } => ErrorCode::LengthOverflow,
                WireError::Io(_) => ErrorCode::Io,
            },
            Self::UnexpectedBreak { .. } => ErrorCode::UnexpectedBreak,
            Self::UnsupportedMapKey { .. } => ErrorCode::UnsupportedMapKey,
            Self::UnsupportedSimpleValue { .. } => ErrorCode::UnsupportedSimpleValue,
            Self::InvalidDecimalFraction { .. } => ErrorCode::InvalidDecimalFraction,
            Self::NestingTooDeep { .. } => ErrorCode::NestingTooDeep,
            Self::BignumTooLarge { .. } => ErrorCode::BignumTooLarge,
            Self::TrailingData { .. } => ErrorCode::TrailingData,
            Self::Handler { .. } => ErrorCode::Handler,
        }
    }

    /// Byte offset the error was detected at, when there is one.
    #[must_use]
    pub fn offset(&self) -> Option<u64> {
        match self {
            Self::Wire(wire) => match wire {
                WireError::UnexpectedEof { offset }
                | WireError::InvalidAdditionalInfo { offset, .. }
                | WireError::UnexpectedMajorType { offset, .. }
                | WireError::InvalidUtf8 { offset }
                | WireError::LengthOverflow { offset, .. } => Some(*offset),
                WireError::Io(_) => None,
            },
            Self::UnexpectedBreak { offset }
            | Self::UnsupportedMapKey { offset, .. }
            | Self::UnsupportedSimpleValue { offset, .. }
            | Self::InvalidDecimalFraction { offset, .. }
            | Self::NestingTooDeep { offset, .. }
            | Self::BignumTooLarge { offset, .. }
            | Self::TrailingData { offset, .. }
            | Self::Handler { offset, .. } => Some(*offset),
        }
    }
}
