/// Errors a [`ContentHandler`](crate::ContentHandler) can report back to
/// the decoder.
///
/// Returning an error from any handler method aborts the current decode
/// step; the decoder wraps it as `DecodeError::Handler`. This is the only
/// way for a consumer to stop a read early.
///
/// ```text
/// ┌──────────────────┬───────────────────────────────────────────────┐
/// │ Variant          │ Cause                                         │
/// ├──────────────────┼───────────────────────────────────────────────┤
/// │ UnbalancedEvent  │ end/name event with no matching open container│
/// │ MissingName      │ object member value arrived without a name    │
/// │ Rejected         │ consumer-defined refusal                      │
/// │ Io               │ output sink failed (renderers)                │
/// └──────────────────┴───────────────────────────────────────────────┘
/// ```
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("unbalanced {event} event")]
    UnbalancedEvent { event: &'static str },

    #[error("object member value without a name")]
    MissingName,

    #[error("handler rejected input: {0}")]
    Rejected(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
