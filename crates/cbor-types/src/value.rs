use crate::error::HandlerError;
use crate::handler::{ContentHandler, SerializingContext};
use crate::tag::{ByteStringFormat, SemanticTag};

/// An owned, in-memory decoded item.
///
/// Built by [`ValueBuilder`] from the event stream. Scalars keep the
/// semantic tag they were delivered with so callers can tell an epoch
/// timestamp from a plain integer, or a decimal fraction string from an
/// ordinary one. Object members keep their wire order.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// `null`, or `undefined` when tagged [`SemanticTag::Undefined`].
    Null(SemanticTag),
    Bool(bool),
    UInt(u64, SemanticTag),
    Int(i64, SemanticTag),
    Float(f64, SemanticTag),
    String(String, SemanticTag),
    Bytes(Vec<u8>, ByteStringFormat),
    /// Decimal digits with an optional leading `-`.
    Bignum(String),
    Array(Vec<Value>, SemanticTag),
    Object(Vec<(String, Value)>),
}

impl Value {
    /// Plain `null`.
    #[must_use]
    pub fn null() -> Self {
        Self::Null(SemanticTag::None)
    }

    /// Untagged unsigned integer.
    #[must_use]
    pub fn uint(v: u64) -> Self {
        Self::UInt(v, SemanticTag::None)
    }

    /// Untagged signed integer.
    #[must_use]
    pub fn int(v: i64) -> Self {
        Self::Int(v, SemanticTag::None)
    }

    /// Untagged text.
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::String(s.into(), SemanticTag::None)
    }

    /// Untagged array.
    #[must_use]
    pub fn array(items: Vec<Value>) -> Self {
        Self::Array(items, SemanticTag::None)
    }

    #[must_use]
    pub fn tag(&self) -> SemanticTag {
        match self {
            Self::Null(tag)
            | Self::UInt(_, tag)
            | Self::Int(_, tag)
            | Self::Float(_, tag)
            | Self::String(_, tag)
            | Self::Array(_, tag) => *tag,
            _ => SemanticTag::None,
        }
    }

    /// Member lookup by name. Returns the first match; `None` for
    /// non-objects.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Object(members) => members
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v),
            _ => None,
        }
    }
}

enum Frame {
    Array {
        items: Vec<Value>,
        tag: SemanticTag,
    },
    Object {
        members: Vec<(String, Value)>,
        pending: Option<String>,
    },
}

/// A [`ContentHandler`] that assembles events into [`Value`] trees.
///
/// Each completed top-level item is appended to an internal list, so one
/// builder can collect every item in a sequence.
#[derive(Default)]
pub struct ValueBuilder {
    stack: Vec<Frame>,
    completed: Vec<Value>,
}

impl ValueBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a container is still open.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Remove and return the completed top-level items so far.
    pub fn take_values(&mut self) -> Vec<Value> {
        std::mem::take(&mut self.completed)
    }

    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.completed
    }

    /// Drop any partially built container.
    pub fn discard_partial(&mut self) {
        self.stack.clear();
    }

    fn push(&mut self, value: Value) -> Result<(), HandlerError> {
        match self.stack.last_mut() {
            None => self.completed.push(value),
            Some(Frame::Array { items, .. }) => items.push(value),
            Some(Frame::Object { members, pending }) => {
                let name = pending.take().ok_or(HandlerError::MissingName)?;
                members.push((name, value));
            }
        }
        Ok(())
    }

    fn check_slot(&self) -> Result<(), HandlerError> {
        if let Some(Frame::Object { pending: None, .. }) = self.stack.last() {
            return Err(HandlerError::MissingName);
        }
        Ok(())
    }
}

impl ContentHandler for ValueBuilder {
    fn begin_array(
        &mut self,
        len: Option<usize>,
        tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.check_slot()?;
        // Cap the preallocation; the length comes from untrusted input.
        let items = Vec::with_capacity(len.unwrap_or(0).min(1024));
        self.stack.push(Frame::Array { items, tag });
        Ok(())
    }

    fn end_array(&mut self, _ctx: &dyn SerializingContext) -> Result<(), HandlerError> {
        match self.stack.pop() {
            Some(Frame::Array { items, tag }) => self.push(Value::Array(items, tag)),
            Some(other) => {
                self.stack.push(other);
                Err(HandlerError::UnbalancedEvent { event: "end_array" })
            }
            None => Err(HandlerError::UnbalancedEvent { event: "end_array" }),
        }
    }

    fn begin_object(
        &mut self,
        len: Option<usize>,
        _tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.check_slot()?;
        let members = Vec::with_capacity(len.unwrap_or(0).min(1024));
        self.stack.push(Frame::Object {
            members,
            pending: None,
        });
        Ok(())
    }

    fn end_object(&mut self, _ctx: &dyn SerializingContext) -> Result<(), HandlerError> {
        match self.stack.pop() {
            Some(Frame::Object {
                members,
                pending: None,
            }) => self.push(Value::Object(members)),
            Some(other) => {
                self.stack.push(other);
                Err(HandlerError::UnbalancedEvent {
                    event: "end_object",
                })
            }
            None => Err(HandlerError::UnbalancedEvent {
                event: "end_object",
            }),
        }
    }

    fn name(&mut self, name: &str, _ctx: &dyn SerializingContext) -> Result<(), HandlerError> {
        match self.stack.last_mut() {
            Some(Frame::Object {
                pending: pending @ None,
                ..
            }) => {
                *pending = Some(name.to_owned());
                Ok(())
            }
            _ => Err(HandlerError::UnbalancedEvent { event: "name" }),
        }
    }

    fn string_value(
        &mut self,
        value: &str,
        tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.push(Value::String(value.to_owned(), tag))
    }

    fn byte_string_value(
        &mut self,
        value: &[u8],
        format: ByteStringFormat,
        _tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.push(Value::Bytes(value.to_vec(), format))
    }

    fn uint64_value(
        &mut self,
        value: u64,
        tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.push(Value::UInt(value, tag))
    }

    fn int64_value(
        &mut self,
        value: i64,
        tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.push(Value::Int(value, tag))
    }

    fn double_value(
        &mut self,
        value: f64,
        tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.push(Value::Float(value, tag))
    }

    fn bool_value(
        &mut self,
        value: bool,
        _tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.push(Value::Bool(value))
    }

    fn null_value(
        &mut self,
        tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.push(Value::Null(tag))
    }

    fn bignum_value(
        &mut self,
        decimal: &str,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.push(Value::Bignum(decimal.to_owned()))
    }
}
