/// Semantic interpretation attached to a decoded item.
///
/// A wire tag (major type 6) reinterprets the single item that follows
/// it. The decoder resolves the tag number to one of these variants and
/// passes it along with the item's event. Items without a recognised tag
/// carry [`SemanticTag::None`].
///
/// ```text
/// ┌──────┬────────────────────┬──────────────────────────────────┐
/// │ Wire │ Variant            │ Applies to                       │
/// ├──────┼────────────────────┼──────────────────────────────────┤
/// │ 0    │ DateTime           │ text string (RFC 3339)           │
/// │ 1    │ EpochTime          │ integer or float seconds         │
/// │ 2    │ BigIntegerPositive │ byte string magnitude            │
/// │ 3    │ BigIntegerNegative │ byte string magnitude            │
/// │ 4    │ DecimalFraction    │ array [exponent, mantissa]       │
/// │ 5    │ Bigfloat           │ array [exponent, mantissa]       │
/// │ 21   │ Base64Url          │ byte string                      │
/// │ 22   │ Base64             │ byte string                      │
/// │ 23   │ Base16             │ byte string                      │
/// │ -    │ Undefined          │ simple value 23                  │
/// └──────┴────────────────────┴──────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SemanticTag {
    #[default]
    None,
    DateTime,
    EpochTime,
    BigIntegerPositive,
    BigIntegerNegative,
    DecimalFraction,
    Bigfloat,
    Base64Url,
    Base64,
    Base16,
    Undefined,
}

impl SemanticTag {
    /// Short lowercase label used in diagnostics and event listings.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::DateTime => "datetime",
            Self::EpochTime => "epoch-time",
            Self::BigIntegerPositive => "bignum+",
            Self::BigIntegerNegative => "bignum-",
            Self::DecimalFraction => "decimal-fraction",
            Self::Bigfloat => "bigfloat",
            Self::Base64Url => "base64url",
            Self::Base64 => "base64",
            Self::Base16 => "base16",
            Self::Undefined => "undefined",
        }
    }

    /// The byte-string display format this tag asks for, if any.
    #[must_use]
    pub fn byte_string_format(self) -> ByteStringFormat {
        match self {
            Self::Base64Url => ByteStringFormat::Base64Url,
            Self::Base64 => ByteStringFormat::Base64,
            Self::Base16 => ByteStringFormat::Base16,
            _ => ByteStringFormat::None,
        }
    }
}

/// Preferred text encoding for a byte string when it is rendered as text.
///
/// `None` leaves the choice to the consumer (the JSON renderer falls back
/// to its configured default).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ByteStringFormat {
    #[default]
    None,
    Base64Url,
    Base64,
    Base16,
}
