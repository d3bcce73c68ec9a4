use cbor_types::ByteStringFormat;

/// Configuration for the JSON renderer.
///
/// ```text
/// ┌──────────────┬──────────────────────────────────────────────────┐
/// │ Field        │ Purpose                                          │
/// ├──────────────┼──────────────────────────────────────────────────┤
/// │ mode         │ Compact single-line or indented output           │
/// │ indent       │ Spaces per nesting level in pretty mode          │
/// │ bytes_format │ Encoding for byte strings that carry no format   │
/// └──────────────┴──────────────────────────────────────────────────┘
/// ```
///
/// Byte strings tagged 21, 22 or 23 always use the encoding their tag
/// names; `bytes_format` only applies to untagged ones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    pub mode: OutputMode,
    pub indent: usize,
    pub bytes_format: ByteStringFormat,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode: OutputMode::Compact,
            indent: 2,
            bytes_format: ByteStringFormat::Base64Url,
        }
    }
}

impl RenderConfig {
    #[must_use]
    pub fn pretty() -> Self {
        Self {
            mode: OutputMode::Pretty,
            ..Self::default()
        }
    }
}

/// Output layout.
///
/// ```text
///   Compact   {"a":[1,2]}
///
///   Pretty    {
///               "a": [
///                 1,
///                 2
///               ]
///             }
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    #[default]
    Compact,
    Pretty,
}
