use cbor_decoder::DecodeError;

/// Errors that can occur while re-serializing binary input as JSON.
///
/// ```text
/// ┌────────────┬───────────────────────────────────────────────┐
/// │ Variant    │ Cause                                         │
/// ├────────────┼───────────────────────────────────────────────┤
/// │ Decode     │ input was malformed or the writer failed      │
/// │ Io         │ flushing the output sink failed               │
/// │ InvalidUtf8│ rendered buffer was not UTF-8 (never expected)│
/// └────────────┴───────────────────────────────────────────────┘
/// ```
///
/// Write failures that happen mid-document surface inside
/// `DecodeError::Handler`, since the renderer is driven as a handler.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("rendered output is not UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}
