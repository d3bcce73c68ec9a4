/// Implementation of `cbor inspect`.
///
/// Prints one line per decoder event, prefixed by the byte offset where
/// the event's item starts and indented by nesting depth. Items are
/// separated by a `---` line.
///
/// # Output format
///
/// ```text
///        0  begin_object len=1
///        1    name "a"
///        3    begin_array len=2
///        4      uint64 1
///        5      uint64 2
///             end_array
///           end_object
/// ---
///        6  bignum 256 [bignum+]
/// ---
/// ```
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use cbor_decoder::{DecoderOptions, StreamReader};
use cbor_types::{ByteStringFormat, ContentHandler, HandlerError, SemanticTag, SerializingContext};
use cbor_wire::ReaderSource;

use crate::{InspectArgs, input};

/// Run the `cbor inspect` command.
///
/// # Errors
///
/// Returns an error if the input cannot be opened or is malformed. Events
/// decoded before the failure are still printed.
pub fn run(args: &InspectArgs) -> Result<()> {
    let source = ReaderSource::new(input::open(&args.file)?);
    let options = DecoderOptions::default().with_max_nesting_depth(args.max_depth);
    let printer = EventPrinter::new(BufWriter::new(io::stdout().lock()));

    let mut reader = StreamReader::with_options(source, printer, options);
    let result = reader.read_all();
    let (_, printer) = reader.into_parts();
    printer.out.into_inner().map_err(|e| e.into_error())?.flush()?;

    result.with_context(|| format!("failed to decode {}", input::label(&args.file)))?;
    Ok(())
}

/// Writes a line per event.
struct EventPrinter<W> {
    out: W,
    depth: usize,
}

impl<W: Write> EventPrinter<W> {
    fn new(out: W) -> Self {
        Self { out, depth: 0 }
    }

    /// `ctx` is `None` for closing events, which print without an offset.
    fn line(
        &mut self,
        ctx: Option<&dyn SerializingContext>,
        text: &str,
        tag: SemanticTag,
    ) -> Result<(), HandlerError> {
        match ctx {
            Some(ctx) => write!(self.out, "{:>8}  ", ctx.column_number().saturating_sub(1))?,
            None => write!(self.out, "{:>8}  ", "")?,
        }
        write!(self.out, "{:indent$}{text}", "", indent = self.depth * 2)?;
        if tag != SemanticTag::None {
            write!(self.out, " [{}]", tag.label())?;
        }
        writeln!(self.out)?;
        Ok(())
    }
}

fn len_label(len: Option<usize>) -> String {
    len.map_or_else(|| "len=*".to_string(), |n| format!("len={n}"))
}

impl<W: Write> ContentHandler for EventPrinter<W> {
    fn begin_array(
        &mut self,
        len: Option<usize>,
        tag: SemanticTag,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.line(Some(ctx), &format!("begin_array {}", len_label(len)), tag)?;
        self.depth += 1;
        Ok(())
    }

    fn end_array(&mut self, _ctx: &dyn SerializingContext) -> Result<(), HandlerError> {
        self.depth = self.depth.saturating_sub(1);
        self.line(None, "end_array", SemanticTag::None)
    }

    fn begin_object(
        &mut self,
        len: Option<usize>,
        tag: SemanticTag,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.line(Some(ctx), &format!("begin_object {}", len_label(len)), tag)?;
        self.depth += 1;
        Ok(())
    }

    fn end_object(&mut self, _ctx: &dyn SerializingContext) -> Result<(), HandlerError> {
        self.depth = self.depth.saturating_sub(1);
        self.line(None, "end_object", SemanticTag::None)
    }

    fn name(&mut self, name: &str, ctx: &dyn SerializingContext) -> Result<(), HandlerError> {
        self.line(Some(ctx), &format!("name {name:?}"), SemanticTag::None)
    }

    fn string_value(
        &mut self,
        value: &str,
        tag: SemanticTag,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.line(Some(ctx), &format!("string {value:?}"), tag)
    }

    fn byte_string_value(
        &mut self,
        value: &[u8],
        _format: ByteStringFormat,
        tag: SemanticTag,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        let shown: String = value.iter().take(32).map(|b| format!("{b:02x}")).collect();
        let ellipsis = if value.len() > 32 { "…" } else { "" };
        let text = format!("bytes ({}) h'{shown}{ellipsis}'", value.len());
        self.line(Some(ctx), &text, tag)
    }

    fn uint64_value(
        &mut self,
        value: u64,
        tag: SemanticTag,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.line(Some(ctx), &format!("uint64 {value}"), tag)
    }

    fn int64_value(
        &mut self,
        value: i64,
        tag: SemanticTag,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.line(Some(ctx), &format!("int64 {value}"), tag)
    }

    fn double_value(
        &mut self,
        value: f64,
        tag: SemanticTag,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.line(Some(ctx), &format!("double {value:?}"), tag)
    }

    fn bool_value(
        &mut self,
        value: bool,
        tag: SemanticTag,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        self.line(Some(ctx), &format!("bool {value}"), tag)
    }

    fn null_value(
        &mut self,
        tag: SemanticTag,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        let text = if tag == SemanticTag::Undefined { "undefined" } else { "null" };
        self.line(Some(ctx), text, SemanticTag::None)
    }

    fn bignum_value(
        &mut self,
        decimal: &str,
        ctx: &dyn SerializingContext,
    ) -> Result<(), HandlerError> {
        let tag = if decimal.starts_with('-') {
            SemanticTag::BigIntegerNegative
        } else {
            SemanticTag::BigIntegerPositive
        };
        self.line(Some(ctx), &format!("bignum {decimal}"), tag)
    }

    fn flush(&mut self) -> Result<(), HandlerError> {
        writeln!(self.out, "---")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbor_wire::SliceSource;

    fn print(bytes: &[u8]) -> String {
        let mut reader = StreamReader::new(SliceSource::new(bytes), EventPrinter::new(Vec::new()));
        reader.read_all().unwrap();
        let (_, printer) = reader.into_parts();
        String::from_utf8(printer.out).unwrap()
    }

    #[test]
    fn nested_listing() {
        let text = print(&[0xA1, 0x61, 0x61, 0x82, 0x01, 0x02]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "       0  begin_object len=1");
        assert_eq!(lines[1], "       1    name \"a\"");
        assert_eq!(lines[3], "       4      uint64 1");
        assert_eq!(lines[5], "            end_array");
        assert_eq!(lines[7], "---");
    }

    #[test]
    fn tags_are_labelled() {
        let text = print(&[0xC1, 0x01, 0xF7]);
        assert!(text.contains("uint64 1 [epoch-time]"));
        assert!(text.contains("undefined"));
    }
}
