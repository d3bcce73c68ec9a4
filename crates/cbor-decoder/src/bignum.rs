//! Exact decimal rendering of arbitrary-precision numbers.
//!
//! Tagged bignums (tags 2 and 3), decimal fractions (tag 4) and bigfloats
//! (tag 5) are all delivered to the handler as decimal strings. The
//! arithmetic here is just what that needs: build a magnitude from bytes
//! or a `u64`, multiply by small factors, print in base 10.

use std::fmt;

use cbor_wire::NegativeInt;

/// Largest exponent magnitude accepted for decimal fractions and
/// bigfloats. Rendering `m x 2^-k` exactly needs about `0.7 k` digits.
pub const MAX_SCALE: u64 = 16_384;

const LIMB_BASE: u64 = 1_000_000_000;
/// 5^13, the largest power of five below 2^32.
const POW5_13: u32 = 1_220_703_125;

/// Unsigned magnitude stored as little-endian base-10^9 limbs.
///
/// Zero is the empty limb vector; no operation leaves a zero top limb.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BigUint {
    limbs: Vec<u32>,
}

impl BigUint {
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_u64(mut value: u64) -> Self {
        let mut limbs = Vec::with_capacity(3);
        while value > 0 {
            limbs.push((value % LIMB_BASE) as u32);
            value /= LIMB_BASE;
        }
        Self { limbs }
    }

    /// Interpret `bytes` as a big-endian unsigned integer.
    ///
    /// Consumes three bytes per pass. Still quadratic in the length, so
    /// callers bound it (see `DecoderOptions::max_bignum_bytes`).
    #[must_use]
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        let mut n = Self::default();
        let (head, body) = bytes.split_at(bytes.len() % 3);
        for &b in head {
            n.mul_add(256, u32::from(b));
        }
        for c in body.chunks_exact(3) {
            n.mul_add(1 << 24, u32::from_be_bytes([0, c[0], c[1], c[2]]));
        }
        n
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.limbs.is_empty()
    }

    /// `self = self * mul + add`. Remainders mod 10^9 always fit a `u32`.
    #[allow(clippy::cast_possible_truncation)]
    fn mul_add(&mut self, mul: u32, add: u32) {
        let mut carry = u64::from(add);
        for limb in &mut self.limbs {
            let v = u64::from(*limb) * u64::from(mul) + carry;
            *limb = (v % LIMB_BASE) as u32;
            carry = v / LIMB_BASE;
        }
        while carry > 0 {
            self.limbs.push((carry % LIMB_BASE) as u32);
            carry /= LIMB_BASE;
        }
    }

    pub fn add_one(&mut self) {
        self.mul_add(1, 1);
    }

    /// Multiply by `2^bits`.
    pub fn shl(&mut self, mut bits: u64) {
        while bits >= 31 {
            self.mul_add(1 << 31, 0);
            bits -= 31;
        }
        if bits > 0 {
            self.mul_add(1 << bits, 0);
        }
    }

    /// Multiply by `5^k`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn mul_pow5(&mut self, mut k: u64) {
        while k >= 13 {
            self.mul_add(POW5_13, 0);
            k -= 13;
        }
        if k > 0 {
            self.mul_add(5u32.pow(k as u32), 0);
        }
    }
}

impl fmt::Display for BigUint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some((top, rest)) = self.limbs.split_last() else {
            return f.write_str("0");
        };
        write!(f, "{top}")?;
        for limb in rest.iter().rev() {
            write!(f, "{limb:09}")?;
        }
        Ok(())
    }
}

/// Sign and magnitude.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BigInt {
    pub negative: bool,
    pub magnitude: BigUint,
}

impl BigInt {
    #[must_use]
    pub fn from_u64(value: u64) -> Self {
        Self {
            negative: false,
            magnitude: BigUint::from_u64(value),
        }
    }

    /// The value `-1 - m` of a negative-integer item.
    #[must_use]
    pub fn from_negative(n: NegativeInt) -> Self {
        let mut magnitude = BigUint::from_u64(n.magnitude());
        magnitude.add_one();
        Self {
            negative: true,
            magnitude,
        }
    }

    /// The value of a tag 2 (`negative == false`) or tag 3 byte string.
    #[must_use]
    pub fn from_bignum_bytes(bytes: &[u8], negative: bool) -> Self {
        let mut magnitude = BigUint::from_be_bytes(bytes);
        if negative {
            magnitude.add_one();
        }
        Self {
            negative,
            magnitude,
        }
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative && !self.magnitude.is_zero() {
            f.write_str("-")?;
        }
        write!(f, "{}", self.magnitude)
    }
}

/// Decimal value of a tag 2 byte string.
#[must_use]
pub fn positive_bignum(bytes: &[u8]) -> String {
    BigInt::from_bignum_bytes(bytes, false).to_string()
}

/// Decimal value of a tag 3 byte string: `-1 - n`.
#[must_use]
pub fn negative_bignum(bytes: &[u8]) -> String {
    BigInt::from_bignum_bytes(bytes, true).to_string()
}

/// Insert a decimal point `scale` digits from the right of `digits`,
/// left-padding with zeros as needed.
fn place_point(digits: &str, scale: usize) -> String {
    if digits.len() > scale {
        let (int, frac) = digits.split_at(digits.len() - scale);
        format!("{int}.{frac}")
    } else {
        format!("0.{}{digits}", "0".repeat(scale - digits.len()))
    }
}

fn scale_of(exponent: i64) -> Option<usize> {
    let k = exponent.unsigned_abs();
    if k > MAX_SCALE {
        return None;
    }
    usize::try_from(k).ok()
}

/// Render `mantissa * 10^exponent`.
///
/// ```text
///   [-2, 27315]  → "273.15"
///   [-5, 1]      → "0.00001"
///   [3, 12]      → "12e3"
/// ```
///
/// Returns `None` when a negative exponent exceeds [`MAX_SCALE`].
#[must_use]
pub fn decimal_fraction(exponent: i64, mantissa: &BigInt) -> Option<String> {
    let sign = if mantissa.negative { "-" } else { "" };
    let digits = mantissa.magnitude.to_string();
    match exponent {
        0 => Some(format!("{sign}{digits}")),
        e if e > 0 => Some(format!("{sign}{digits}e{e}")),
        e => Some(format!("{sign}{}", place_point(&digits, scale_of(e)?))),
    }
}

/// Render `mantissa * 2^exponent` exactly.
///
/// A negative exponent is handled as `m * 5^k / 10^k`, which terminates in
/// at most `k` fractional digits. Trailing fractional zeros are dropped.
///
/// ```text
///   [-1, 3]   → "1.5"
///   [-2, -3]  → "-0.75"
///   [4, 3]    → "48"
/// ```
///
/// Returns `None` when the exponent magnitude exceeds [`MAX_SCALE`].
#[must_use]
pub fn bigfloat(exponent: i64, mantissa: &BigInt) -> Option<String> {
    let scale = scale_of(exponent)?;
    let sign = if mantissa.negative { "-" } else { "" };
    let mut magnitude = mantissa.magnitude.clone();
    if exponent >= 0 {
        magnitude.shl(exponent.unsigned_abs());
        return Some(format!("{sign}{magnitude}"));
    }

    magnitude.mul_pow5(exponent.unsigned_abs());
    let text = place_point(&magnitude.to_string(), scale);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    Some(format!("{sign}{text}"))
}
