use crate::error::WireError;
use crate::major::{BREAK, MajorType, additional, classify};
use crate::source::Source;

/// Declared length of a container or string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Length {
    /// Element, entry or byte count stated up front.
    Definite(u64),
    /// Terminated by a [`BREAK`] byte.
    Indefinite,
}

/// A decoded negative integer, kept as its wire magnitude.
///
/// The encoded value is `-1 - magnitude`, so the representable range is
/// `-2^64 ..= -1`. That is wider than `i64`; [`to_i64`](Self::to_i64)
/// returns `None` for the values that only fit in `i128`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NegativeInt {
    magnitude: u64,
}

impl NegativeInt {
    #[must_use]
    pub fn from_magnitude(magnitude: u64) -> Self {
        Self { magnitude }
    }

    /// The raw argument `m` from the wire.
    #[must_use]
    pub fn magnitude(self) -> u64 {
        self.magnitude
    }

    /// The value as `i64`, if it fits.
    #[must_use]
    pub fn to_i64(self) -> Option<i64> {
        i64::try_from(self.magnitude).ok().map(|m| -1 - m)
    }

    /// The value as `i128`. Always exact.
    #[must_use]
    pub fn to_i128(self) -> i128 {
        -1 - i128::from(self.magnitude)
    }
}

// ── Arguments ─────────────────────────────────────────────────────────────────

/// Read `N` big-endian bytes.
fn read_be<const N: usize, S: Source + ?Sized>(source: &mut S) -> Result<[u8; N], WireError> {
    let mut buf = [0u8; N];
    source.read_exact_into(&mut buf)?;
    Ok(buf)
}

/// Decode the argument that follows a control byte.
///
/// `offset` is the position of the control byte, used for diagnostics.
///
/// ```text
/// ┌────────────┬─────────────────────────────────┐
/// │ info       │ argument                        │
/// ├────────────┼─────────────────────────────────┤
/// │ 0..=23     │ info itself                     │
/// │ 24         │ next 1 byte                     │
/// │ 25         │ next 2 bytes, big-endian        │
/// │ 26         │ next 4 bytes, big-endian        │
/// │ 27         │ next 8 bytes, big-endian        │
/// │ 28..=31    │ error (31 is handled by callers │
/// │            │ that accept indefinite length)  │
/// └────────────┴─────────────────────────────────┘
/// ```
///
/// # Errors
///
/// - [`WireError::UnexpectedEof`] if the trailing bytes are missing.
/// - [`WireError::InvalidAdditionalInfo`] for 28 through 31.
pub fn decode_argument<S: Source + ?Sized>(
    source: &mut S,
    info: u8,
    offset: u64,
) -> Result<u64, WireError> {
    match info {
        0..=additional::MAX_DIRECT => Ok(u64::from(info)),
        additional::ONE_BYTE => Ok(u64::from(source.expect_byte()?)),
        additional::TWO_BYTES => Ok(u64::from(u16::from_be_bytes(read_be(source)?))),
        additional::FOUR_BYTES => Ok(u64::from(u32::from_be_bytes(read_be(source)?))),
        additional::EIGHT_BYTES => Ok(u64::from_be_bytes(read_be(source)?)),
        _ => Err(WireError::InvalidAdditionalInfo { offset, info }),
    }
}

/// Consume a control byte, checking its major type.
fn expect_head<S: Source + ?Sized>(
    source: &mut S,
    expected: MajorType,
) -> Result<(u64, u8), WireError> {
    let offset = source.position();
    let (major, info) = classify(source.expect_byte()?);
    if major != expected {
        return Err(WireError::UnexpectedMajorType {
            offset,
            expected,
            found: major,
        });
    }
    Ok((offset, info))
}

/// Convert a wire length into a `usize`.
///
/// # Errors
///
/// [`WireError::LengthOverflow`] when the platform cannot address it.
pub fn to_usize(length: u64, offset: u64) -> Result<usize, WireError> {
    usize::try_from(length).map_err(|_| WireError::LengthOverflow { offset, length })
}

// ── Integers ──────────────────────────────────────────────────────────────────

/// Decode an unsigned integer (major type 0), head included.
///
/// # Errors
///
/// - [`WireError::UnexpectedEof`] if the source runs out.
/// - [`WireError::InvalidAdditionalInfo`] for reserved or indefinite info.
/// - [`WireError::UnexpectedMajorType`] if the head is not major type 0.
pub fn decode_uint64<S: Source + ?Sized>(source: &mut S) -> Result<u64, WireError> {
    let (offset, info) = expect_head(source, MajorType::UnsignedInteger)?;
    decode_argument(source, info, offset)
}

/// Decode a negative integer (major type 1), head included.
///
/// # Errors
///
/// As for [`decode_uint64`].
pub fn decode_negative<S: Source + ?Sized>(source: &mut S) -> Result<NegativeInt, WireError> {
    let (offset, info) = expect_head(source, MajorType::NegativeInteger)?;
    decode_argument(source, info, offset).map(NegativeInt::from_magnitude)
}

/// Decode a tag number (major type 6), head included.
///
/// # Errors
///
/// As for [`decode_uint64`].
pub fn decode_tag<S: Source + ?Sized>(source: &mut S) -> Result<u64, WireError> {
    let (offset, info) = expect_head(source, MajorType::SemanticTag)?;
    decode_argument(source, info, offset)
}

/// Decode the length of an array, map or string, head included.
///
/// The major type is not checked; the caller has already dispatched on it.
///
/// # Errors
///
/// - [`WireError::UnexpectedEof`] if the source runs out.
/// - [`WireError::InvalidAdditionalInfo`] for 28 through 30.
pub fn decode_length<S: Source + ?Sized>(source: &mut S) -> Result<Length, WireError> {
    let offset = source.position();
    let (_, info) = classify(source.expect_byte()?);
    if info == additional::INDEFINITE {
        return Ok(Length::Indefinite);
    }
    decode_argument(source, info, offset).map(Length::Definite)
}

// ── Strings ───────────────────────────────────────────────────────────────────

/// Read a definite or indefinite string body of `major` into `out`.
///
/// An indefinite string is a sequence of definite chunks of the same
/// major type closed by a break byte:
///
/// ```text
///   0x5F │ 0x42 aa bb │ 0x41 cc │ 0xFF      → [aa bb cc]
/// ```
fn decode_string_body<S: Source + ?Sized>(
    source: &mut S,
    major: MajorType,
    out: &mut Vec<u8>,
) -> Result<u64, WireError> {
    let (offset, info) = expect_head(source, major)?;
    if info != additional::INDEFINITE {
        let len = decode_argument(source, info, offset)?;
        source.append_exact(out, len)?;
        return Ok(offset);
    }

    loop {
        let chunk_offset = source.position();
        let byte = source.peek()?.ok_or(WireError::UnexpectedEof {
            offset: chunk_offset,
        })?;
        if byte == BREAK {
            source.advance()?;
            return Ok(offset);
        }
        let (chunk_major, chunk_info) = classify(byte);
        if chunk_major != major {
            return Err(WireError::UnexpectedMajorType {
                offset: chunk_offset,
                expected: major,
                found: chunk_major,
            });
        }
        source.advance()?;
        // Chunks may not nest
        let len = decode_argument(source, chunk_info, chunk_offset)?;
        source.append_exact(out, len)?;
    }
}

/// Decode a byte string (major type 2) into `buf`, replacing its contents.
///
/// # Errors
///
/// - [`WireError::UnexpectedEof`] if fewer bytes remain than declared.
/// - [`WireError::UnexpectedMajorType`] for a foreign chunk.
/// - [`WireError::InvalidAdditionalInfo`] for reserved info or a nested
///   indefinite chunk.
pub fn decode_byte_string<S: Source + ?Sized>(
    source: &mut S,
    buf: &mut Vec<u8>,
) -> Result<(), WireError> {
    buf.clear();
    decode_string_body(source, MajorType::ByteString, buf).map(|_| ())
}

/// Decode a text string (major type 3), borrowing the result from `buf`.
///
/// # Errors
///
/// As for [`decode_byte_string`], plus [`WireError::InvalidUtf8`].
pub fn decode_text_string<'b, S: Source + ?Sized>(
    source: &mut S,
    buf: &'b mut Vec<u8>,
) -> Result<&'b str, WireError> {
    buf.clear();
    let offset = decode_string_body(source, MajorType::TextString, buf)?;
    std::str::from_utf8(buf).map_err(|_| WireError::InvalidUtf8 { offset })
}

// ── Floats ────────────────────────────────────────────────────────────────────

/// Widen an IEEE-754 half-precision bit pattern to `f64`.
///
/// ```text
///   15  14      10  9                0
/// ┌───┬──────────┬───────────────────┐
/// │ s │ exponent │ mantissa          │   bias 15
/// └───┴──────────┴───────────────────┘
/// ```
///
/// Every half value is exactly representable as a double, so the
/// conversion is lossless (subnormals, infinities and NaN included).
#[must_use]
pub fn half_to_f64(bits: u16) -> f64 {
    let exponent = i32::from((bits >> 10) & 0x1F);
    let mantissa = bits & 0x03FF;
    let magnitude = match exponent {
        0 => f64::from(mantissa) * 2f64.powi(-24),
        0x1F if mantissa == 0 => f64::INFINITY,
        0x1F => f64::NAN,
        _ => f64::from(mantissa + 1024) * 2f64.powi(exponent - 25),
    };
    if bits & 0x8000 == 0 {
        magnitude
    } else {
        -magnitude
    }
}

/// Decode a half, single or double precision float (major type 7, info
/// 25/26/27), head included.
///
/// # Errors
///
/// - [`WireError::UnexpectedEof`] if the value bytes are missing.
/// - [`WireError::InvalidAdditionalInfo`] if the head is not a float.
pub fn decode_float<S: Source + ?Sized>(source: &mut S) -> Result<f64, WireError> {
    let (offset, info) = expect_head(source, MajorType::Simple)?;
    match info {
        additional::HALF_FLOAT => Ok(half_to_f64(u16::from_be_bytes(read_be(source)?))),
        additional::SINGLE_FLOAT => Ok(f64::from(f32::from_be_bytes(read_be(source)?))),
        additional::DOUBLE_FLOAT => Ok(f64::from_be_bytes(read_be(source)?)),
        _ => Err(WireError::InvalidAdditionalInfo { offset, info }),
    }
}
