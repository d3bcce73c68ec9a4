#![warn(clippy::pedantic)]

//! Shared fixtures for the integration suites and benchmarks.
//!
//! The workspace only decodes, so tests build their inputs with the small
//! [`Encoder`] below. It always picks the shortest head for an argument,
//! which is what every real-world producer emits.

use cbor_wire::MajorType;

/// Builder for hand-assembled input byte streams.
///
/// ```text
///   Encoder::new()
///       .map(1).text("a")
///       .array(2).uint(1).uint(2)
///       .finish()                  → A1 61 61 82 01 02
/// ```
#[derive(Clone, Debug, Default)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    /// Item head with the shortest argument encoding for `arg`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn head(mut self, major: MajorType, arg: u64) -> Self {
        let m = major.raw() << 5;
        match arg {
            0..=23 => self.buf.push(m | arg as u8),
            24..=0xFF => self.buf.extend_from_slice(&[m | 24, arg as u8]),
            0x100..=0xFFFF => {
                self.buf.push(m | 25);
                self.buf.extend_from_slice(&(arg as u16).to_be_bytes());
            }
            0x1_0000..=0xFFFF_FFFF => {
                self.buf.push(m | 26);
                self.buf.extend_from_slice(&(arg as u32).to_be_bytes());
            }
            _ => {
                self.buf.push(m | 27);
                self.buf.extend_from_slice(&arg.to_be_bytes());
            }
        }
        self
    }

    #[must_use]
    pub fn uint(self, n: u64) -> Self {
        self.head(MajorType::UnsignedInteger, n)
    }

    /// Negative integer `-1 - magnitude`.
    #[must_use]
    pub fn neg(self, magnitude: u64) -> Self {
        self.head(MajorType::NegativeInteger, magnitude)
    }

    #[must_use]
    pub fn int(self, n: i64) -> Self {
        match u64::try_from(n) {
            Ok(u) => self.uint(u),
            Err(_) => self.neg(n.unsigned_abs() - 1),
        }
    }

    #[must_use]
    pub fn bytes(mut self, data: &[u8]) -> Self {
        self = self.head(MajorType::ByteString, data.len() as u64);
        self.buf.extend_from_slice(data);
        self
    }

    #[must_use]
    pub fn text(mut self, s: &str) -> Self {
        self = self.head(MajorType::TextString, s.len() as u64);
        self.buf.extend_from_slice(s.as_bytes());
        self
    }

    #[must_use]
    pub fn array(self, len: u64) -> Self {
        self.head(MajorType::Array, len)
    }

    #[must_use]
    pub fn map(self, len: u64) -> Self {
        self.head(MajorType::Map, len)
    }

    #[must_use]
    pub fn tag(self, number: u64) -> Self {
        self.head(MajorType::SemanticTag, number)
    }

    /// Indefinite-length head for a string or container major type.
    #[must_use]
    pub fn indefinite(mut self, major: MajorType) -> Self {
        self.buf.push((major.raw() << 5) | 31);
        self
    }

    #[must_use]
    pub fn brk(mut self) -> Self {
        self.buf.push(0xFF);
        self
    }

    #[must_use]
    pub fn bool(mut self, value: bool) -> Self {
        self.buf.push(if value { 0xF5 } else { 0xF4 });
        self
    }

    #[must_use]
    pub fn null(mut self) -> Self {
        self.buf.push(0xF6);
        self
    }

    #[must_use]
    pub fn undefined(mut self) -> Self {
        self.buf.push(0xF7);
        self
    }

    #[must_use]
    pub fn half(mut self, bits: u16) -> Self {
        self.buf.push(0xF9);
        self.buf.extend_from_slice(&bits.to_be_bytes());
        self
    }

    #[must_use]
    pub fn single(mut self, value: f32) -> Self {
        self.buf.push(0xFA);
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    #[must_use]
    pub fn double(mut self, value: f64) -> Self {
        self.buf.push(0xFB);
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Raw bytes appended as-is, for malformed input.
    #[must_use]
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(bytes);
        self
    }
}

/// A map `{"k0": [..], "k1": [..], ...}` with `entries` members, each
/// value an array of `width` integers. Used by the benchmarks.
#[must_use]
pub fn wide_document(entries: u64, width: u64) -> Vec<u8> {
    let mut enc = Encoder::new().map(entries);
    for i in 0..entries {
        enc = enc.text(&format!("k{i}")).array(width);
        for j in 0..width {
            enc = enc.uint(i * width + j);
        }
    }
    enc.finish()
}

/// `depth` nested single-element arrays around a zero.
#[must_use]
pub fn nested_arrays(depth: usize) -> Vec<u8> {
    let mut bytes = vec![0x81; depth];
    bytes.push(0x00);
    bytes
}
