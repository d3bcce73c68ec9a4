use cbor_types::SemanticTag;
use cbor_wire::MajorType;

/// What a wire tag number means to the decoder.
///
/// The table is fixed: adding a tag means adding a variant here and
/// handling it at the dispatch point of the major type it applies to.
///
/// ```text
/// ┌────────┬─────────────────┬──────────────────┐
/// │ Number │ Meaning         │ Applies to       │
/// ├────────┼─────────────────┼──────────────────┤
/// │ 0      │ DateTime        │ text string      │
/// │ 1      │ EpochTime       │ integer, float   │
/// │ 2      │ PositiveBignum  │ byte string      │
/// │ 3      │ NegativeBignum  │ byte string      │
/// │ 4      │ DecimalFraction │ array            │
/// │ 5      │ Bigfloat        │ array            │
/// │ 21     │ Base64Url       │ byte string      │
/// │ 22     │ Base64          │ byte string      │
/// │ 23     │ Base16          │ byte string      │
/// │ other  │ Unrecognized    │ nothing          │
/// └────────┴─────────────────┴──────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagMeaning {
    DateTime,
    EpochTime,
    PositiveBignum,
    NegativeBignum,
    DecimalFraction,
    Bigfloat,
    Base64Url,
    Base64,
    Base16,
    Unrecognized(u64),
}

impl TagMeaning {
    #[must_use]
    pub fn resolve(number: u64) -> Self {
        match number {
            0 => Self::DateTime,
            1 => Self::EpochTime,
            2 => Self::PositiveBignum,
            3 => Self::NegativeBignum,
            4 => Self::DecimalFraction,
            5 => Self::Bigfloat,
            21 => Self::Base64Url,
            22 => Self::Base64,
            23 => Self::Base16,
            n => Self::Unrecognized(n),
        }
    }

    /// The wire tag number.
    #[must_use]
    pub fn number(self) -> u64 {
        match self {
            Self::DateTime => 0,
            Self::EpochTime => 1,
            Self::PositiveBignum => 2,
            Self::NegativeBignum => 3,
            Self::DecimalFraction => 4,
            Self::Bigfloat => 5,
            Self::Base64Url => 21,
            Self::Base64 => 22,
            Self::Base16 => 23,
            Self::Unrecognized(n) => n,
        }
    }

    /// Whether the tag has a meaning for an item of `major`.
    ///
    /// `MajorType::Simple` stands for the float widths only; booleans and
    /// null never carry a tag.
    #[must_use]
    pub fn applies_to(self, major: MajorType) -> bool {
        matches!(
            (self, major),
            (Self::DateTime, MajorType::TextString)
                | (
                    Self::EpochTime,
                    MajorType::UnsignedInteger | MajorType::NegativeInteger | MajorType::Simple
                )
                | (
                    Self::PositiveBignum
                        | Self::NegativeBignum
                        | Self::Base64Url
                        | Self::Base64
                        | Self::Base16,
                    MajorType::ByteString
                )
                | (Self::DecimalFraction | Self::Bigfloat, MajorType::Array)
        )
    }

    /// The tag handed to the handler alongside the item.
    #[must_use]
    pub fn semantic_tag(self) -> SemanticTag {
        match self {
            Self::DateTime => SemanticTag::DateTime,
            Self::EpochTime => SemanticTag::EpochTime,
            Self::PositiveBignum => SemanticTag::BigIntegerPositive,
            Self::NegativeBignum => SemanticTag::BigIntegerNegative,
            Self::DecimalFraction => SemanticTag::DecimalFraction,
            Self::Bigfloat => SemanticTag::Bigfloat,
            Self::Base64Url => SemanticTag::Base64Url,
            Self::Base64 => SemanticTag::Base64,
            Self::Base16 => SemanticTag::Base16,
            Self::Unrecognized(_) => SemanticTag::None,
        }
    }
}
