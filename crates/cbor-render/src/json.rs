use std::io::{BufRead, Write};

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use cbor_decoder::{DecoderOptions, StreamReader};
use cbor_types::{ByteStringFormat, ContentHandler, HandlerError, SemanticTag, SerializingContext};
use cbor_wire::{ReaderSource, SliceSource};

use crate::config::{OutputMode, RenderConfig};
use crate::error::RenderError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    Array,
    Object,
}

#[derive(Clone, Copy, Debug)]
struct Level {
    kind: Kind,
    count: usize,
}

/// A [`ContentHandler`] that writes each top-level item as one JSON
/// document, followed by a newline.
///
/// ```text
/// ┌──────────────────┬──────────────────────────────────────────┐
/// │ Event            │ JSON                                     │
/// ├──────────────────┼──────────────────────────────────────────┤
/// │ uint64 / int64   │ number                                   │
/// │ bignum           │ number literal, digits as given          │
/// │ double           │ number; NaN and infinities become null   │
/// │ string           │ string (date-times, decimal fractions    │
/// │                  │ and bigfloats included)                  │
/// │ byte_string      │ string, base64url / base64 / base16      │
/// │ bool / null      │ true, false, null (undefined → null)     │
/// │ begin/end        │ [ ] and { }                              │
/// └──────────────────┴──────────────────────────────────────────┘
/// ```
///
/// Write failures come back as [`HandlerError::Io`], which aborts the
/// decode.
pub struct JsonRenderer<W> {
    out: W,
    config: RenderConfig,
    stack: Vec<Level>,
    after_name: bool,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W, config: RenderConfig) -> Self {
        Self {
            out,
            config,
            stack: Vec::new(),
            after_name: false,
        }
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn pretty(&self) -> bool {
        self.config.mode == OutputMode::Pretty
    }

    fn newline_indent(&mut self, depth: usize) -> Result<(), HandlerError> {
        let width = depth * self.config.indent;
        write!(self.out, "\n{:width$}", "")?;
        Ok(())
    }

    /// Separator and indentation owed before the next value or name.
    fn before_value(&mut self) -> Result<(), HandlerError> {
        if self.after_name {
            self.after_name = false;
            return Ok(());
        }
        let depth = self.stack.len();
        let Some(level) = self.stack.last_mut() else {
            return Ok(());
        };
        let first = level.count == 0;
        level.count += 1;
        if !first {
            self.out.write_all(b",")?;
        }
        if self.pretty() {
            self.newline_indent(depth)?;
        }
        Ok(())
    }

    fn begin(&mut self, kind: Kind) -> Result<(), HandlerError> {
        self.before_value()?;
        self.out
            .write_all(if kind == Kind::Array { b"[" } else { b"{" })?;
        self.stack.push(Level { kind, count: 0 });
        Ok(())
    }

    fn end(&mut self, kind: Kind, event: &'static str) -> Result<(), HandlerError> {
        match self.stack.last() {
            Some(level) if level.kind == kind && !self.after_name => {}
            _ => return Err(HandlerError::UnbalancedEvent { event }),
        }
        let level = self.stack.pop().ok_or(HandlerError::UnbalancedEvent { event })?;
        if self.pretty() && level.count > 0 {
            self.newline_indent(self.stack.len())?;
        }
        self.out
            .write_all(if kind == Kind::Array { b"]" } else { b"}" })?;
        Ok(())
    }

    fn raw(&mut self, text: &str) -> Result<(), HandlerError> {
        self.before_value()?;
        self.out.write_all(text.as_bytes())?;
        Ok(())
    }

    fn json<T: serde::Serialize + ?Sized>(&mut self, value: &T) -> Result<(), HandlerError> {
        self.before_value()?;
        serde_json::to_writer(&mut self.out, value).map_err(std::io::Error::from)?;
        Ok(())
    }

    fn encode_bytes(&self, bytes: &[u8], format: ByteStringFormat) -> String {
        let format = match format {
            ByteStringFormat::None => self.config.bytes_format,
            explicit => explicit,
        };
        match format {
            ByteStringFormat::Base64 => STANDARD.encode(bytes),
            ByteStringFormat::Base16 => hex::encode_upper(bytes),
            ByteStringFormat::Base64Url | ByteStringFormat::None => URL_SAFE_NO_PAD.encode(bytes),
        }
    }
}

impl<W: Write> ContentHandler for JsonRenderer<W> {
    fn begin_array(
        &mut self,
        _len: Option<usize>,
        _tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.begin(Kind::Array)
    }

    fn end_array(&mut self, _ctx: &dyn SerializingContext) -> Result<(), HandlerError> {
        self.end(Kind::Array, "end_array")
    }

    fn begin_object(
        &mut self,
        _len: Option<usize>,
        _tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.begin(Kind::Object)
    }

    fn end_object(&mut self, _ctx: &dyn SerializingContext) -> Result<(), HandlerError> {
        self.end(Kind::Object, "end_object")
    }

    fn name(&mut self, name: &str, _ctx: &dyn SerializingContext) -> Result<(), HandlerError> {
        match self.stack.last() {
            Some(level) if level.kind == Kind::Object && !self.after_name => {}
            _ => return Err(HandlerError::UnbalancedEvent { event: "name" }),
        }
        self.json(name)?;
        let sep: &[u8] = if self.pretty() { b": " } else { b":" };
        self.out.write_all(sep)?;
        self.after_name = true;
        Ok(())
    }

    fn string_value(
        &mut self,
        value: &str,
        _tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.json(value)
    }

    fn byte_string_value(
        &mut self,
        value: &[u8],
        format: ByteStringFormat,
        _tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        let encoded = self.encode_bytes(value, format);
        self.json(&encoded)
    }

    fn uint64_value(
        &mut self,
        value: u64,
        _tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.raw(&value.to_string())
    }

    fn int64_value(
        &mut self,
        value: i64,
        _tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.raw(&value.to_string())
    }

    fn double_value(
        &mut self,
        value: f64,
        _tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        // serde_json writes non-finite floats as null
        self.json(&value)
    }

    fn bool_value(
        &mut self,
        value: bool,
        _tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.raw(if value { "true" } else { "false" })
    }

    fn null_value(
        &mut self,
        _tag: SemanticTag,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.raw("null")
    }

    fn bignum_value(
        &mut self,
        decimal: &str,
        _ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.raw(decimal)
    }

    fn flush(&mut self) -> Result<(), HandlerError> {
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Render every item in `bytes` as newline-separated JSON documents.
///
/// # Errors
///
/// [`RenderError::Decode`] if the input is malformed.
///
/// # Example
///
/// ```rust
/// use cbor_render::{RenderConfig, render_json};
///
/// let json = render_json(&[0xA1, 0x61, 0x61, 0x82, 0x01, 0x02], &RenderConfig::default()).unwrap();
/// assert_eq!(json, "{\"a\":[1,2]}\n");
/// ```
pub fn render_json(bytes: &[u8], config: &RenderConfig) -> Result<String, RenderError> {
    let renderer = JsonRenderer::new(Vec::new(), config.clone());
    let mut reader = StreamReader::new(SliceSource::new(bytes), renderer);
    reader.read_all()?;
    let (_, renderer) = reader.into_parts();
    Ok(String::from_utf8(renderer.into_inner())?)
}

/// Stream items from `input` to `output` as JSON, one document per line
/// (or per indented block in pretty mode). Returns the item count.
///
/// # Errors
///
/// [`RenderError::Decode`] for malformed input or a failed write, and
/// [`RenderError::Io`] if the final flush fails.
pub fn render_stream<R: BufRead, W: Write>(
    input: R,
    output: W,
    config: &RenderConfig,
    options: DecoderOptions,
) -> Result<usize, RenderError> {
    let renderer = JsonRenderer::new(output, config.clone());
    let mut reader = StreamReader::with_options(ReaderSource::new(input), renderer, options);
    let count = reader.read_all()?;
    let (_, renderer) = reader.into_parts();
    renderer.into_inner().flush()?;
    Ok(count)
}
