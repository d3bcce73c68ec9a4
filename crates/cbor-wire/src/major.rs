/// The eight major types, stored in the top three bits of a control byte.
///
/// ```text
///   7   6   5   4   3   2   1   0
/// ┌───┬───┬───┬───┬───┬───┬───┬───┐
/// │ major type│ additional info   │
/// └───┴───┴───┴───┴───┴───┴───┴───┘
/// ```
///
/// ```text
/// ┌───────┬─────────────────┬──────────────────────────────────────┐
/// │ Major │ Variant         │ Argument meaning                     │
/// ├───────┼─────────────────┼──────────────────────────────────────┤
/// │ 0     │ UnsignedInteger │ the value                            │
/// │ 1     │ NegativeInteger │ magnitude m, value is -1 - m         │
/// │ 2     │ ByteString      │ byte length                          │
/// │ 3     │ TextString      │ byte length of UTF-8 text            │
/// │ 4     │ Array           │ element count                        │
/// │ 5     │ Map             │ entry count                          │
/// │ 6     │ SemanticTag     │ tag number                           │
/// │ 7     │ Simple          │ simple value or float width          │
/// └───────┴─────────────────┴──────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MajorType {
    UnsignedInteger,
    NegativeInteger,
    ByteString,
    TextString,
    Array,
    Map,
    SemanticTag,
    Simple,
}

impl MajorType {
    /// Build from the 3-bit major type number. Only the low three bits
    /// of `raw` are looked at, so every input maps to a variant.
    #[must_use]
    pub fn from_raw(raw: u8) -> Self {
        match raw & 0x07 {
            0 => Self::UnsignedInteger,
            1 => Self::NegativeInteger,
            2 => Self::ByteString,
            3 => Self::TextString,
            4 => Self::Array,
            5 => Self::Map,
            6 => Self::SemanticTag,
            _ => Self::Simple,
        }
    }

    /// The 3-bit major type number.
    #[must_use]
    pub fn raw(self) -> u8 {
        self as u8
    }
}

/// Named additional-information values.
pub mod additional {
    /// Largest argument stored directly in the control byte.
    pub const MAX_DIRECT: u8 = 23;
    pub const ONE_BYTE: u8 = 24;
    pub const TWO_BYTES: u8 = 25;
    pub const FOUR_BYTES: u8 = 26;
    pub const EIGHT_BYTES: u8 = 27;
    pub const INDEFINITE: u8 = 31;

    // Simple values (major type 7)
    pub const FALSE: u8 = 20;
    pub const TRUE: u8 = 21;
    pub const NULL: u8 = 22;
    pub const UNDEFINED: u8 = 23;
    pub const HALF_FLOAT: u8 = 25;
    pub const SINGLE_FLOAT: u8 = 26;
    pub const DOUBLE_FLOAT: u8 = 27;
}

/// The "break" stop code terminating indefinite-length items.
pub const BREAK: u8 = 0xFF;

/// Major type of a control byte.
#[must_use]
pub fn major_type(byte: u8) -> MajorType {
    MajorType::from_raw(byte >> 5)
}

/// The 5-bit additional-information value of a control byte.
#[must_use]
pub fn additional_info(byte: u8) -> u8 {
    byte & 0x1F
}

/// Split a control byte into its major type and additional information.
#[must_use]
pub fn classify(byte: u8) -> (MajorType, u8) {
    (major_type(byte), additional_info(byte))
}
