use crate::error::HandlerError;
use crate::handler::{ContentHandler, Position, SerializingContext};
use crate::tag::{ByteStringFormat, SemanticTag};

/// One handler call, captured as data.
///
/// Mirrors the [`ContentHandler`] methods one-to-one (plus `Flush`), so a
/// recorded sequence can be asserted on in tests or replayed into another
/// handler later.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    BeginArray { len: Option<usize>, tag: SemanticTag },
    EndArray,
    BeginObject { len: Option<usize>, tag: SemanticTag },
    EndObject,
    Name(String),
    String { value: String, tag: SemanticTag },
    ByteString {
        value: Vec<u8>,
        format: ByteStringFormat,
        tag: SemanticTag,
    },
    UInt64 { value: u64, tag: SemanticTag },
    Int64 { value: i64, tag: SemanticTag },
    Double { value: f64, tag: SemanticTag },
    Bool { value: bool, tag: SemanticTag },
    Null { tag: SemanticTag },
    Bignum(String),
    Flush,
}

impl Event {
    /// Short kind label, e.g. `"begin_array"` or `"uint64"`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BeginArray { .. } => "begin_array",
            Self::EndArray => "end_array",
            Self::BeginObject { .. } => "begin_object",
            Self::EndObject => "end_object",
            Self::Name(_) => "name",
            Self::String { .. } => "string",
            Self::ByteString { .. } => "byte_string",
            Self::UInt64 { .. } => "uint64",
            Self::Int64 { .. } => "int64",
            Self::Double { .. } => "double",
            Self::Bool { .. } => "bool",
            Self::Null { .. } => "null",
            Self::Bignum(_) => "bignum",
            Self::Flush => "flush",
        }
    }

    /// Deliver this event to `handler`.
    ///
    /// # Errors
    ///
    /// Whatever the handler returns.
    pub fn deliver<H: ContentHandler + ?Sized>(
        &self,
        handler: &mut H,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        match self {
            Self::BeginArray { len, tag } => handler.begin_array(*len, *tag, ctx),
            Self::EndArray => handler.end_array(ctx),
            Self::BeginObject { len, tag } => handler.begin_object(*len, *tag, ctx),
            Self::EndObject => handler.end_object(ctx),
            Self::Name(name) => handler.name(name, ctx),
            Self::String { value, tag } => handler.string_value(value, *tag, ctx),
            Self::ByteString { value, format, tag } => {
                handler.byte_string_value(value, *format, *tag, ctx)
            }
            Self::UInt64 { value, tag } => handler.uint64_value(*value, *tag, ctx),
            Self::Int64 { value, tag } => handler.int64_value(*value, *tag, ctx),
            Self::Double { value, tag } => handler.double_value(*value, *tag, ctx),
            Self::Bool { value, tag } => handler.bool_value(*value, *tag, ctx),
            Self::Null { tag } => handler.null_value(*tag, ctx),
            Self::Bignum(decimal) => handler.bignum_value(decimal, ctx),
            Self::Flush => handler.flush(),
        }
    }
}

/// Replay a recorded sequence into `handler`, stopping at the first error.
///
/// # Errors
///
/// Whatever the handler returns.
pub fn replay<H: ContentHandler + ?Sized>(
    events: &[Event],
    handler: &mut H,
) -> Result<(), HandlerError> {
    let ctx = Position { line: 1, column: 1 };
    for event in events {
        event.deliver(handler, &ctx)?;
    }
    Ok(())
}

/// A [`ContentHandler`] that records every call as an [`Event`].
#[derive(Clone, Debug, Default)]
pub struct EventRecorder {
    events: Vec<Event>,
}

impl EventRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    #[must_use]
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    /// Recorded events with the `Flush` markers removed.
    #[must_use]
    pub fn without_flushes(&self) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| !matches!(e, Event::Flush))
            .cloned()
            .collect()
    }

    fn push(&mut self, event: Event) -> Result<(), HandlerError> {
        self.events.push(event);
        Ok(())
    }
}

impl ContentHandler for EventRecorder {
    fn begin_array(
        &mut self,
        len: Option<usize>,
        tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.push(Event::BeginArray { len, tag })
    }

    fn end_array(&mut self, _ctx: &dyn SerializingContext) -> Result<(), HandlerError> {
        self.push(Event::EndArray)
    }

    fn begin_object(
        &mut self,
        len: Option<usize>,
        tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.push(Event::BeginObject { len, tag })
    }

    fn end_object(&mut self, _ctx: &dyn SerializingContext) -> Result<(), HandlerError> {
        self.push(Event::EndObject)
    }

    fn name(&mut self, name: &str, _ctx: &dyn SerializingContext) -> Result<(), HandlerError> {
        self.push(Event::Name(name.to_owned()))
    }

    fn string_value(
        &mut self,
        value: &str,
        tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.push(Event::String {
            value: value.to_owned(),
            tag,
        })
    }

    fn byte_string_value(
        &mut self,
        value: &[u8],
        format: ByteStringFormat,
        tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.push(Event::ByteString {
            value: value.to_vec(),
            format,
            tag,
        })
    }

    fn uint64_value(
        &mut self,
        value: u64,
        tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.push(Event::UInt64 { value, tag })
    }

    fn int64_value(
        &mut self,
        value: i64,
        tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.push(Event::Int64 { value, tag })
    }

    fn double_value(
        &mut self,
        value: f64,
        tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.push(Event::Double { value, tag })
    }

    fn bool_value(
        &mut self,
        value: bool,
        tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.push(Event::Bool { value, tag })
    }

    fn null_value(
        &mut self,
        tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.push(Event::Null { tag })
    }

    fn bignum_value(
        &mut self,
        decimal: &str,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.push(Event::Bignum(decimal.to_owned()))
    }

    fn flush(&mut self) -> Result<(), HandlerError> {
        self.push(Event::Flush)
    }
}
