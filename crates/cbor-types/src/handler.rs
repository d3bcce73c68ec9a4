use crate::error::HandlerError;
use crate::tag::{ByteStringFormat, SemanticTag};

/// Location information handed to every handler call.
///
/// For binary input the line number is always 1; the column is the
/// 1-based byte offset of the decoder's cursor when the event fired.
pub trait SerializingContext {
    fn line_number(&self) -> usize;
    fn column_number(&self) -> usize;
}

/// A fixed position, for handlers driven outside a decoder (tests,
/// replaying recorded events).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl SerializingContext for Position {
    fn line_number(&self) -> usize {
        self.line
    }

    fn column_number(&self) -> usize {
        self.column
    }
}

/// Consumer of decode events.
///
/// The decoder calls these methods in document order. Container events
/// are strictly bracketed: every `begin_*` is followed, after the
/// container's children, by exactly one matching `end_*`. Inside an
/// object each member is a `name` followed by one value (which may itself
/// be a container).
///
/// ```text
///   A1 61 61 82 01 02        {"a": [1, 2]}
///
///   begin_object(Some(1), None)
///     name("a")
///     begin_array(Some(2), None)
///       uint64_value(1, None)
///       uint64_value(2, None)
///     end_array()
///   end_object()
///   flush()
/// ```
///
/// `len` is the element or entry count for definite-length containers
/// and `None` for indefinite ones. `flush` fires each time a top-level
/// item has been fully delivered.
///
/// Every method returns `Result` so a handler can abort the decode (an
/// output sink failing, a value the consumer refuses, ...).
pub trait ContentHandler {
    fn begin_array(
        &mut self,
        len: Option<usize>,
        tag: SemanticTag,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError>;

    fn end_array(&mut self, ctx: &dyn SerializingContext) -> Result<(), HandlerError>;

    fn begin_object(
        &mut self,
        len: Option<usize>,
        tag: SemanticTag,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError>;

    fn end_object(&mut self, ctx: &dyn SerializingContext) -> Result<(), HandlerError>;

    /// Member name inside an object.
    fn name(&mut self, name: &str, ctx: &dyn SerializingContext) -> Result<(), HandlerError>;

    fn string_value(
        &mut self,
        value: &str,
        tag: SemanticTag,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError>;

    fn byte_string_value(
        &mut self,
        value: &[u8],
        format: ByteStringFormat,
        tag: SemanticTag,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError>;

    fn uint64_value(
        &mut self,
        value: u64,
        tag: SemanticTag,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError>;

    fn int64_value(
        &mut self,
        value: i64,
        tag: SemanticTag,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError>;

    fn double_value(
        &mut self,
        value: f64,
        tag: SemanticTag,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError>;

    fn bool_value(
        &mut self,
        value: bool,
        tag: SemanticTag,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError>;

    fn null_value(
        &mut self,
        tag: SemanticTag,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError>;

    /// Arbitrary-precision integer as a decimal string with an optional
    /// leading `-`.
    fn bignum_value(
        &mut self,
        decimal: &str,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError>;

    /// A top-level item has been completely delivered.
    fn flush(&mut self) -> Result<(), HandlerError> {
        Ok(())
    }
}

impl<H: ContentHandler + ?Sized> ContentHandler for &mut H {
    fn begin_array(
        &mut self,
        len: Option<usize>,
        tag: SemanticTag,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        (**self).begin_array(len, tag, ctx)
    }

    fn end_array(&mut self, ctx: &dyn SerializingContext) -> Result<(), HandlerError> {
        (**self).end_array(ctx)
    }

    fn begin_object(
        &mut self,
        len: Option<usize>,
        tag: SemanticTag,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        (**self).begin_object(len, tag, ctx)
    }

    fn end_object(&mut self, ctx: &dyn SerializingContext) -> Result<(), HandlerError> {
        (**self).end_object(ctx)
    }

    fn name(&mut self, name: &str, ctx: &dyn SerializingContext) -> Result<(), HandlerError> {
        (**self).name(name, ctx)
    }

    fn string_value(
        &mut self,
        value: &str,
        tag: SemanticTag,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        (**self).string_value(value, tag, ctx)
    }

    fn byte_string_value(
        &mut self,
        value: &[u8],
        format: ByteStringFormat,
        tag: SemanticTag,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        (**self).byte_string_value(value, format, tag, ctx)
    }

    fn uint64_value(
        &mut self,
        value: u64,
        tag: SemanticTag,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        (**self).uint64_value(value, tag, ctx)
    }

    fn int64_value(
        &mut self,
        value: i64,
        tag: SemanticTag,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        (**self).int64_value(value, tag, ctx)
    }

    fn double_value(
        &mut self,
        value: f64,
        tag: SemanticTag,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        (**self).double_value(value, tag, ctx)
    }

    fn bool_value(
        &mut self,
        value: bool,
        tag: SemanticTag,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        (**self).bool_value(value, tag, ctx)
    }

    fn null_value(
        &mut self,
        tag: SemanticTag,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        (**self).null_value(tag, ctx)
    }

    fn bignum_value(
        &mut self,
        decimal: &str,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        (**self).bignum_value(decimal, ctx)
    }

    fn flush(&mut self) -> Result<(), HandlerError> {
        (**self).flush()
    }
}
