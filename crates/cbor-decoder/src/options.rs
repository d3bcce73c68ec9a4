/// Default cap on open containers.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 1024;

/// Default cap on the payload of a tag 2 or tag 3 bignum, about 9800
/// decimal digits.
pub const DEFAULT_MAX_BIGNUM_BYTES: usize = 4096;

/// Limits applied by a [`StreamReader`](crate::StreamReader).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Maximum number of simultaneously open arrays and maps. Opening one
    /// more fails with `NestingTooDeep`.
    pub max_nesting_depth: usize,
    /// Longest bignum byte string converted to decimal, including a
    /// decimal-fraction or bigfloat mantissa. Longer ones fail with
    /// `BignumTooLarge`.
    pub max_bignum_bytes: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            max_bignum_bytes: DEFAULT_MAX_BIGNUM_BYTES,
        }
    }
}

impl DecoderOptions {
    #[must_use]
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    #[must_use]
    pub fn with_max_bignum_bytes(mut self, len: usize) -> Self {
        self.max_bignum_bytes = len;
        self
    }
}
