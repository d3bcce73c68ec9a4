use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use cbor_types::{ContentHandler, HandlerError, Position, SemanticTag, SerializingContext};
use cbor_wire::major::{BREAK, additional};
use cbor_wire::primitive::{
    Length, decode_byte_string, decode_float, decode_length, decode_negative, decode_tag,
    decode_text_string, decode_uint64, to_usize,
};
use cbor_wire::{MajorType, Source, WireError, classify};
use log::{debug, trace};

use crate::bignum::{self, BigInt};
use crate::error::DecodeError;
use crate::options::DecoderOptions;
use crate::tags::TagMeaning;

/// One open container on the nesting stack.
///
/// `remaining` counts elements (arrays) or entries (maps) still owed by a
/// definite-length container and is `None` for indefinite ones, which end
/// at a break byte instead.
#[derive(Clone, Copy, Debug)]
enum Frame {
    Array { remaining: Option<u64> },
    Map { remaining: Option<u64>, expect_name: bool },
}

/// What the loop in [`StreamReader::read`] does next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    /// Decode one (possibly tagged) item.
    Item,
    /// Decode a map key.
    Name,
    /// Close the innermost container.
    Close,
}

/// Streaming decoder: reads binary items from a [`Source`] and drives a
/// [`ContentHandler`].
///
/// Each [`read`](Self::read) consumes exactly one top-level item, which
/// may be an arbitrarily nested container, and emits its events in
/// document order. Nesting is tracked on an explicit frame stack rather
/// than the call stack, so hostile input can only grow a `Vec` up to
/// [`DecoderOptions::max_nesting_depth`].
///
/// ```text
///   read()
///     │
///     ▼
///   ┌──────────────┐  Item   ┌──────────┐  container  ┌───────────┐
///   │ next_step()  │ ──────▶ │ tags,    │ ──────────▶ │ push      │
///   │              │         │ dispatch │             │ Frame     │
///   │              │  Name   ├──────────┤  scalar     ├───────────┤
///   │              │ ──────▶ │ key      │ ──────────▶ │ item      │
///   │              │  Close  ├──────────┤             │ completed │
///   │              │ ──────▶ │ pop +    │ ──────────▶ │           │
///   └──────────────┘         │ end_*    │             └───────────┘
///          ▲                 └──────────┘                   │
///          └───────────── stack not empty ◀─────────────────┘
///                          stack empty → flush()
/// ```
///
/// Errors end the read immediately. Events already delivered stay
/// delivered; the stack is cleared so the next `read` starts at top level.
///
/// # Example
///
/// ```rust
/// use cbor_decoder::StreamReader;
/// use cbor_types::{Event, EventRecorder, SemanticTag};
/// use cbor_wire::SliceSource;
///
/// let bytes = [0x9F, 0x01, 0x02, 0xFF];
/// let mut reader = StreamReader::new(SliceSource::new(&bytes), EventRecorder::new());
/// reader.read().unwrap();
///
/// let (_, recorder) = reader.into_parts();
/// assert_eq!(
///     recorder.without_flushes()[0],
///     Event::BeginArray { len: None, tag: SemanticTag::None }
/// );
/// ```
pub struct StreamReader<S, H> {
    source: S,
    handler: H,
    options: DecoderOptions,
    stack: Vec<Frame>,
    /// Scratch buffer for byte strings and text before validation.
    scratch: Vec<u8>,
}

impl<S: Source, H: ContentHandler> StreamReader<S, H> {
    pub fn new(source: S, handler: H) -> Self {
        Self::with_options(source, handler, DecoderOptions::default())
    }

    pub fn with_options(source: S, handler: H, options: DecoderOptions) -> Self {
        Self {
            source,
            handler,
            options,
            stack: Vec::new(),
            scratch: Vec::new(),
        }
    }

    /// Decode one top-level item.
    ///
    /// Calls `flush` on the handler once the item is complete.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::Wire`] with `UnexpectedEof` if the source is empty
    ///   or runs out mid-item, or another wire error for a malformed head
    ///   or string.
    /// - [`DecodeError::UnexpectedBreak`], [`DecodeError::UnsupportedMapKey`],
    ///   [`DecodeError::UnsupportedSimpleValue`],
    ///   [`DecodeError::InvalidDecimalFraction`] for malformed structure.
    /// - [`DecodeError::NestingTooDeep`] when the depth limit is hit.
    /// - [`DecodeError::BignumTooLarge`] when a bignum payload is longer
    ///   than [`DecoderOptions::max_bignum_bytes`].
    /// - [`DecodeError::Handler`] when the handler refuses an event.
    pub fn read(&mut self) -> Result<(), DecodeError> {
        self.stack.clear();
        let result = self.read_top_level();
        if result.is_err() {
            self.stack.clear();
        }
        result
    }

    /// Decode top-level items until the source is exhausted.
    ///
    /// Returns how many items were read.
    ///
    /// # Errors
    ///
    /// As for [`read`](Self::read); the first failing item ends the loop.
    pub fn read_all(&mut self) -> Result<usize, DecodeError> {
        let mut count = 0;
        while !self.source.is_eof()? {
            self.read()?;
            count += 1;
        }
        Ok(count)
    }

    /// Number of containers currently open. Zero between reads.
    #[must_use]
    pub fn nesting_depth(&self) -> usize {
        self.stack.len()
    }

    /// Bytes consumed from the source so far.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.source.position()
    }

    /// Forget any partially decoded container.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.scratch.clear();
    }

    #[must_use]
    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    #[must_use]
    pub fn into_parts(self) -> (S, H) {
        (self.source, self.handler)
    }

    fn context(&self) -> Position {
        Position {
            line: self.line_number(),
            column: self.column_number(),
        }
    }

    // ── Main loop ─────────────────────────────────────────────────────────

    fn read_top_level(&mut self) -> Result<(), DecodeError> {
        let start = self.source.position();
        if self.source.is_eof()? {
            return Err(WireError::UnexpectedEof { offset: start }.into());
        }

        loop {
            match self.next_step()? {
                Step::Item => self.read_item()?,
                Step::Name => self.read_name()?,
                Step::Close => self.close_container()?,
            }
            if self.stack.is_empty() {
                break;
            }
        }

        trace!("item at offset {start} complete, flushing");
        let offset = self.source.position();
        self.handler.flush().map_err(handler_failed(offset))
    }

    fn next_step(&mut self) -> Result<Step, DecodeError> {
        let Some(&frame) = self.stack.last() else {
            return Ok(Step::Item);
        };
        let (remaining, expect_name) = match frame {
            Frame::Array { remaining } => (remaining, false),
            Frame::Map {
                remaining,
                expect_name,
            } => (remaining, expect_name),
        };
        let value_owed = matches!(frame, Frame::Map { expect_name: false, .. });

        match remaining {
            Some(0) => return Ok(Step::Close),
            Some(_) => {}
            None => {
                let offset = self.source.position();
                match self.source.peek()? {
                    None => return Err(WireError::UnexpectedEof { offset }.into()),
                    // A value still owed is handled as a stray break below
                    Some(BREAK) if !value_owed => {
                        self.source.advance()?;
                        return Ok(Step::Close);
                    }
                    Some(_) => {}
                }
            }
        }

        Ok(if expect_name { Step::Name } else { Step::Item })
    }

    /// Account for a finished child of the innermost container.
    fn item_completed(&mut self) {
        match self.stack.last_mut() {
            Some(Frame::Array { remaining }) => {
                if let Some(n) = remaining {
                    *n -= 1;
                }
            }
            Some(Frame::Map {
                remaining,
                expect_name,
            }) => {
                if let Some(n) = remaining {
                    *n -= 1;
                }
                *expect_name = true;
            }
            None => {}
        }
    }

    // ── Items ─────────────────────────────────────────────────────────────

    /// Consume any tag prefixes, then dispatch on the item's major type.
    fn read_item(&mut self) -> Result<(), DecodeError> {
        let mut tag: Option<TagMeaning> = None;
        loop {
            let offset = self.source.position();
            let byte = self
                .source
                .peek()?
                .ok_or(WireError::UnexpectedEof { offset })?;
            let (major, info) = classify(byte);
            if major != MajorType::SemanticTag {
                let applied = Self::applicable_tag(tag, major, info, offset);
                return self.dispatch(major, info, applied, offset);
            }

            let number = decode_tag(&mut self.source)?;
            if let Some(previous) = tag {
                debug!(
                    "tag {} at offset {offset} overrides outer tag {}",
                    number,
                    previous.number()
                );
            }
            tag = Some(TagMeaning::resolve(number));
        }
    }

    /// Drop a tag that has no meaning for the item it precedes.
    fn applicable_tag(
        tag: Option<TagMeaning>,
        major: MajorType,
        info: u8,
        offset: u64,
    ) -> Option<TagMeaning> {
        let meaning = tag?;
        let is_float = matches!(
            info,
            additional::HALF_FLOAT | additional::SINGLE_FLOAT | additional::DOUBLE_FLOAT
        );
        if meaning.applies_to(major) && (major != MajorType::Simple || is_float) {
            return Some(meaning);
        }
        debug!(
            "ignoring tag {} on {major:?} item at offset {offset}",
            meaning.number()
        );
        None
    }

    fn dispatch(
        &mut self,
        major: MajorType,
        info: u8,
        tag: Option<TagMeaning>,
        offset: u64,
    ) -> Result<(), DecodeError> {
        let ctx = self.context();
        let semantic = tag.map_or(SemanticTag::None, TagMeaning::semantic_tag);

        let emitted = match major {
            MajorType::UnsignedInteger => {
                let n = decode_uint64(&mut self.source)?;
                self.handler.uint64_value(n, semantic, &ctx)
            }
            MajorType::NegativeInteger => {
                let n = decode_negative(&mut self.source)?;
                match n.to_i64() {
                    Some(v) => self.handler.int64_value(v, semantic, &ctx),
                    None => {
                        // bignum_value carries no tag
                        if semantic != SemanticTag::None {
                            debug!(
                                "dropping {} tag on integer below i64::MIN at offset {offset}",
                                semantic.label()
                            );
                        }
                        self.handler.bignum_value(&n.to_i128().to_string(), &ctx)
                    }
                }
            }
            MajorType::ByteString => {
                decode_byte_string(&mut self.source, &mut self.scratch)?;
                match tag {
                    Some(TagMeaning::PositiveBignum) => {
                        self.check_bignum_len(offset)?;
                        self.handler
                            .bignum_value(&bignum::positive_bignum(&self.scratch), &ctx)
                    }
                    Some(TagMeaning::NegativeBignum) => {
                        self.check_bignum_len(offset)?;
                        self.handler
                            .bignum_value(&bignum::negative_bignum(&self.scratch), &ctx)
                    }
                    _ => self.handler.byte_string_value(
                        &self.scratch,
                        semantic.byte_string_format(),
                        semantic,
                        &ctx,
                    ),
                }
            }
            MajorType::TextString => {
                let text = decode_text_string(&mut self.source, &mut self.scratch)?;
                self.handler.string_value(text, semantic, &ctx)
            }
            MajorType::Array => match tag {
                Some(meaning @ (TagMeaning::DecimalFraction | TagMeaning::Bigfloat)) => {
                    let text = self.read_scaled(meaning, offset)?;
                    self.handler.string_value(&text, semantic, &ctx)
                }
                _ => return self.open_container(major, semantic, offset),
            },
            MajorType::Map => return self.open_container(major, semantic, offset),
            MajorType::Simple => self.read_simple(info, semantic, offset, &ctx)?,
            // read_item consumes every tag before dispatching
            MajorType::SemanticTag => Ok(()),
        };
        emitted.map_err(handler_failed(offset))?;

        self.item_completed();
        Ok(())
    }

    /// Simple values and floats. Handler failures come back as the inner
    /// `Ok(Err(..))` so [`dispatch`](Self::dispatch) can wrap them
    /// uniformly.
    fn read_simple(
        &mut self,
        info: u8,
        semantic: SemanticTag,
        offset: u64,
        ctx: &Position,
    ) -> Result<Result<(), HandlerError>, DecodeError> {
        let emitted = match info {
            additional::FALSE | additional::TRUE => {
                self.source.advance()?;
                self.handler
                    .bool_value(info == additional::TRUE, SemanticTag::None, ctx)
            }
            additional::NULL => {
                self.source.advance()?;
                self.handler.null_value(SemanticTag::None, ctx)
            }
            additional::UNDEFINED => {
                self.source.advance()?;
                self.handler.null_value(SemanticTag::Undefined, ctx)
            }
            additional::HALF_FLOAT | additional::SINGLE_FLOAT | additional::DOUBLE_FLOAT => {
                let x = decode_float(&mut self.source)?;
                self.handler.double_value(x, semantic, ctx)
            }
            additional::ONE_BYTE => {
                self.source.advance()?;
                let value = self.source.expect_byte()?;
                return Err(DecodeError::UnsupportedSimpleValue { offset, value });
            }
            additional::INDEFINITE => return Err(DecodeError::UnexpectedBreak { offset }),
            0..=19 => return Err(DecodeError::UnsupportedSimpleValue { offset, value: info }),
            _ => return Err(WireError::InvalidAdditionalInfo { offset, info }.into()),
        };
        Ok(emitted)
    }

    fn open_container(
        &mut self,
        major: MajorType,
        semantic: SemanticTag,
        offset: u64,
    ) -> Result<(), DecodeError> {
        let limit = self.options.max_nesting_depth;
        if self.stack.len() >= limit {
            return Err(DecodeError::NestingTooDeep { offset, limit });
        }

        let ctx = self.context();
        let (remaining, len) = match decode_length(&mut self.source)? {
            Length::Definite(n) => (Some(n), Some(to_usize(n, offset)?)),
            Length::Indefinite => (None, None),
        };

        let emitted = if major == MajorType::Array {
            self.stack.push(Frame::Array { remaining });
            self.handler.begin_array(len, semantic, &ctx)
        } else {
            self.stack.push(Frame::Map {
                remaining,
                expect_name: true,
            });
            self.handler.begin_object(len, semantic, &ctx)
        };
        trace!(
            "open {major:?} at offset {offset}, depth {}",
            self.stack.len()
        );
        emitted.map_err(handler_failed(offset))
    }

    fn close_container(&mut self) -> Result<(), DecodeError> {
        let offset = self.source.position();
        let ctx = self.context();
        let emitted = match self.stack.pop() {
            Some(Frame::Array { .. }) => self.handler.end_array(&ctx),
            Some(Frame::Map { .. }) => self.handler.end_object(&ctx),
            None => return Ok(()),
        };
        trace!("close at offset {offset}, depth {}", self.stack.len());
        emitted.map_err(handler_failed(offset))?;
        self.item_completed();
        Ok(())
    }

    // ── Map keys ──────────────────────────────────────────────────────────

    /// Text keys are passed through; byte-string keys become base64url
    /// names. Tags on keys are skipped.
    fn read_name(&mut self) -> Result<(), DecodeError> {
        loop {
            let offset = self.source.position();
            let byte = self
                .source
                .peek()?
                .ok_or(WireError::UnexpectedEof { offset })?;
            let ctx = self.context();
            let emitted = match major_of(byte) {
                MajorType::SemanticTag => {
                    let number = decode_tag(&mut self.source)?;
                    debug!("ignoring tag {number} on map key at offset {offset}");
                    continue;
                }
                MajorType::TextString => {
                    let name = decode_text_string(&mut self.source, &mut self.scratch)?;
                    self.handler.name(name, &ctx)
                }
                MajorType::ByteString => {
                    decode_byte_string(&mut self.source, &mut self.scratch)?;
                    let name = URL_SAFE_NO_PAD.encode(&self.scratch);
                    self.handler.name(&name, &ctx)
                }
                MajorType::Simple if byte == BREAK => {
                    return Err(DecodeError::UnexpectedBreak { offset });
                }
                found => return Err(DecodeError::UnsupportedMapKey { offset, found }),
            };
            emitted.map_err(handler_failed(offset))?;

            if let Some(Frame::Map { expect_name, .. }) = self.stack.last_mut() {
                *expect_name = false;
            }
            return Ok(());
        }
    }

    // ── Decimal fractions and bigfloats ───────────────────────────────────

    /// Read a tag 4 or tag 5 payload, `[exponent, mantissa]`, and render it
    /// as a decimal string. The array head has not been consumed yet.
    fn read_scaled(&mut self, meaning: TagMeaning, offset: u64) -> Result<String, DecodeError> {
        let invalid = |reason| DecodeError::InvalidDecimalFraction { offset, reason };

        let indefinite = match decode_length(&mut self.source)? {
            Length::Definite(2) => false,
            Length::Indefinite => true,
            Length::Definite(_) => return Err(invalid("expected two elements")),
        };

        let exponent = self.read_exponent(offset)?;
        let mantissa = self.read_mantissa(offset)?;

        if indefinite {
            let at = self.source.position();
            match self.source.peek()? {
                None => return Err(WireError::UnexpectedEof { offset: at }.into()),
                Some(BREAK) => self.source.advance()?,
                Some(_) => return Err(invalid("expected two elements")),
            }
        }

        let rendered = if meaning == TagMeaning::Bigfloat {
            bignum::bigfloat(exponent, &mantissa)
        } else {
            bignum::decimal_fraction(exponent, &mantissa)
        };
        rendered.ok_or_else(|| invalid("exponent out of range"))
    }

    fn read_exponent(&mut self, offset: u64) -> Result<i64, DecodeError> {
        let invalid = |reason| DecodeError::InvalidDecimalFraction { offset, reason };
        let at = self.source.position();
        let byte = self
            .source
            .peek()?
            .ok_or(WireError::UnexpectedEof { offset: at })?;
        match major_of(byte) {
            MajorType::UnsignedInteger => i64::try_from(decode_uint64(&mut self.source)?)
                .map_err(|_| invalid("exponent out of range")),
            MajorType::NegativeInteger => decode_negative(&mut self.source)?
                .to_i64()
                .ok_or_else(|| invalid("exponent out of range")),
            _ => Err(invalid("exponent must be an integer")),
        }
    }

    fn read_mantissa(&mut self, offset: u64) -> Result<BigInt, DecodeError> {
        let invalid = |reason| DecodeError::InvalidDecimalFraction { offset, reason };
        let at = self.source.position();
        let byte = self
            .source
            .peek()?
            .ok_or(WireError::UnexpectedEof { offset: at })?;
        match major_of(byte) {
            MajorType::UnsignedInteger => Ok(BigInt::from_u64(decode_uint64(&mut self.source)?)),
            MajorType::NegativeInteger => {
                Ok(BigInt::from_negative(decode_negative(&mut self.source)?))
            }
            MajorType::SemanticTag => {
                let negative = match TagMeaning::resolve(decode_tag(&mut self.source)?) {
                    TagMeaning::PositiveBignum => false,
                    TagMeaning::NegativeBignum => true,
                    _ => return Err(invalid("mantissa tag must be a bignum")),
                };
                let at = self.source.position();
                let byte = self
                    .source
                    .peek()?
                    .ok_or(WireError::UnexpectedEof { offset: at })?;
                if major_of(byte) != MajorType::ByteString {
                    return Err(invalid("bignum mantissa must be a byte string"));
                }
                decode_byte_string(&mut self.source, &mut self.scratch)?;
                self.check_bignum_len(offset)?;
                Ok(BigInt::from_bignum_bytes(&self.scratch, negative))
            }
            _ => Err(invalid("mantissa must be an integer or bignum")),
        }
    }

    /// Bound the bignum payload held in scratch before it is converted.
    fn check_bignum_len(&self, offset: u64) -> Result<(), DecodeError> {
        let limit = self.options.max_bignum_bytes;
        let len = self.scratch.len();
        if len > limit {
            return Err(DecodeError::BignumTooLarge { offset, len, limit });
        }
        Ok(())
    }
}

impl<S: Source, H> SerializingContext for StreamReader<S, H> {
    fn line_number(&self) -> usize {
        1
    }

    fn column_number(&self) -> usize {
        usize::try_from(self.source.position())
            .map_or(usize::MAX, |offset| offset.saturating_add(1))
    }
}

fn major_of(byte: u8) -> MajorType {
    classify(byte).0
}

fn handler_failed(offset: u64) -> impl FnOnce(HandlerError) -> DecodeError {
    move |source| DecodeError::Handler { offset, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use cbor_types::{ByteStringFormat, Event, EventRecorder};
    use cbor_wire::SliceSource;

    const NONE: SemanticTag = SemanticTag::None;

    fn events(bytes: &[u8]) -> Result<Vec<Event>, DecodeError> {
        let mut reader = StreamReader::new(SliceSource::new(bytes), EventRecorder::new());
        reader.read()?;
        let (_, recorder) = reader.into_parts();
        Ok(recorder.into_events())
    }

    fn error_code(bytes: &[u8]) -> ErrorCode {
        events(bytes).unwrap_err().code()
    }

    #[test]
    fn one_byte_unsigned() {
        assert_eq!(
            events(&[0x18, 0x2A]).unwrap(),
            vec![Event::UInt64 { value: 42, tag: NONE }, Event::Flush]
        );
    }

    #[test]
    fn epoch_tagged_integer() {
        assert_eq!(
            events(&[0xC1, 0x1A, 0x5E, 0x6E, 0xC3, 0xA8]).unwrap(),
            vec![
                Event::UInt64 {
                    value: 1_584_317_352,
                    tag: SemanticTag::EpochTime
                },
                Event::Flush
            ]
        );
    }

    #[test]
    fn indefinite_array() {
        assert_eq!(
            events(&[0x9F, 0x01, 0x02, 0xFF]).unwrap(),
            vec![
                Event::BeginArray { len: None, tag: NONE },
                Event::UInt64 { value: 1, tag: NONE },
                Event::UInt64 { value: 2, tag: NONE },
                Event::EndArray,
                Event::Flush,
            ]
        );
    }

    #[test]
    fn positive_bignum_tag() {
        assert_eq!(
            events(&[0xC2, 0x42, 0x01, 0x00]).unwrap(),
            vec![Event::Bignum("256".into()), Event::Flush]
        );
    }

    #[test]
    fn negative_integers_widen_past_i64() {
        assert_eq!(
            events(&[0x38, 0x63]).unwrap()[0],
            Event::Int64 { value: -100, tag: NONE }
        );
        assert_eq!(
            events(&[0x3B, 0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]).unwrap()[0],
            Event::Int64 { value: i64::MIN, tag: NONE }
        );
        assert_eq!(
            events(&[0x3B, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]).unwrap()[0],
            Event::Bignum("-18446744073709551616".into())
        );
    }

    #[test]
    fn epoch_tag_on_wide_negative_yields_plain_bignum() {
        let bytes = [0xC1, 0x3B, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];
        assert_eq!(
            events(&bytes).unwrap(),
            vec![Event::Bignum("-18446744073709551616".into()), Event::Flush]
        );
    }

    #[test]
    fn nested_definite_map() {
        // {"a": [1, 2]}
        assert_eq!(
            events(&[0xA1, 0x61, 0x61, 0x82, 0x01, 0x02]).unwrap(),
            vec![
                Event::BeginObject { len: Some(1), tag: NONE },
                Event::Name("a".into()),
                Event::BeginArray { len: Some(2), tag: NONE },
                Event::UInt64 { value: 1, tag: NONE },
                Event::UInt64 { value: 2, tag: NONE },
                Event::EndArray,
                Event::EndObject,
                Event::Flush,
            ]
        );
    }

    #[test]
    fn empty_containers() {
        assert_eq!(
            events(&[0x80]).unwrap(),
            vec![
                Event::BeginArray { len: Some(0), tag: NONE },
                Event::EndArray,
                Event::Flush
            ]
        );
        assert_eq!(
            events(&[0xBF, 0xFF]).unwrap(),
            vec![
                Event::BeginObject { len: None, tag: NONE },
                Event::EndObject,
                Event::Flush
            ]
        );
    }

    #[test]
    fn byte_string_tags_set_format() {
        assert_eq!(
            events(&[0xD7, 0x42, 0xAB, 0xCD]).unwrap()[0],
            Event::ByteString {
                value: vec![0xAB, 0xCD],
                format: ByteStringFormat::Base16,
                tag: SemanticTag::Base16,
            }
        );
        assert_eq!(
            events(&[0x41, 0x00]).unwrap()[0],
            Event::ByteString {
                value: vec![0],
                format: ByteStringFormat::None,
                tag: NONE,
            }
        );
    }

    #[test]
    fn date_time_string() {
        let mut bytes = vec![0xC0, 0x74];
        bytes.extend_from_slice(b"2013-03-21T20:04:00Z");
        assert_eq!(
            events(&bytes).unwrap()[0],
            Event::String {
                value: "2013-03-21T20:04:00Z".into(),
                tag: SemanticTag::DateTime
            }
        );
    }

    #[test]
    fn simple_values() {
        assert_eq!(events(&[0xF4]).unwrap()[0], Event::Bool { value: false, tag: NONE });
        assert_eq!(events(&[0xF5]).unwrap()[0], Event::Bool { value: true, tag: NONE });
        assert_eq!(events(&[0xF6]).unwrap()[0], Event::Null { tag: NONE });
        assert_eq!(
            events(&[0xF7]).unwrap()[0],
            Event::Null { tag: SemanticTag::Undefined }
        );
        assert_eq!(
            events(&[0xC1, 0xF9, 0x3C, 0x00]).unwrap()[0],
            Event::Double { value: 1.0, tag: SemanticTag::EpochTime }
        );
    }

    #[test]
    fn unassigned_simple_values_fail() {
        assert_eq!(error_code(&[0xF0]), ErrorCode::UnsupportedSimpleValue);
        assert_eq!(error_code(&[0xF8, 0xFF]), ErrorCode::UnsupportedSimpleValue);
        assert_eq!(error_code(&[0xFC]), ErrorCode::InvalidAdditionalInfo);
    }

    #[test]
    fn stray_break_fails() {
        assert_eq!(error_code(&[0xFF]), ErrorCode::UnexpectedBreak);
        assert_eq!(error_code(&[0x82, 0x01, 0xFF]), ErrorCode::UnexpectedBreak);
        // Break where an indefinite map still owes a value
        assert_eq!(error_code(&[0xBF, 0x61, 0x61, 0xFF]), ErrorCode::UnexpectedBreak);
    }

    #[test]
    fn decimal_fraction_and_bigfloat() {
        // 4([-2, 27315])
        assert_eq!(
            events(&[0xC4, 0x82, 0x21, 0x19, 0x6A, 0xB3]).unwrap()[0],
            Event::String {
                value: "273.15".into(),
                tag: SemanticTag::DecimalFraction
            }
        );
        // 5([-1, 3])
        assert_eq!(
            events(&[0xC5, 0x82, 0x20, 0x03]).unwrap()[0],
            Event::String {
                value: "1.5".into(),
                tag: SemanticTag::Bigfloat
            }
        );
        // 4([-1, 2(h'0100')]) indefinite
        assert_eq!(
            events(&[0xC4, 0x9F, 0x20, 0xC2, 0x42, 0x01, 0x00, 0xFF]).unwrap()[0],
            Event::String {
                value: "25.6".into(),
                tag: SemanticTag::DecimalFraction
            }
        );
    }

    #[test]
    fn malformed_decimal_fraction_fails() {
        assert_eq!(error_code(&[0xC4, 0x81, 0x01]), ErrorCode::InvalidDecimalFraction);
        assert_eq!(
            error_code(&[0xC4, 0x82, 0x61, 0x61, 0x01]),
            ErrorCode::InvalidDecimalFraction
        );
        assert_eq!(
            error_code(&[0xC4, 0x82, 0x01, 0xC0, 0x41, 0x00]),
            ErrorCode::InvalidDecimalFraction
        );
        assert_eq!(
            error_code(&[0xC4, 0x9F, 0x01, 0x01, 0x01, 0xFF]),
            ErrorCode::InvalidDecimalFraction
        );
    }

    #[test]
    fn innermost_tag_wins() {
        // 1(0("x")) → DateTime applies to text; EpochTime is discarded
        assert_eq!(
            events(&[0xC1, 0xC0, 0x61, 0x78]).unwrap()[0],
            Event::String {
                value: "x".into(),
                tag: SemanticTag::DateTime
            }
        );
    }

    #[test]
    fn unknown_and_mismatched_tags_are_dropped() {
        // 55799(1)
        assert_eq!(
            events(&[0xD9, 0xD9, 0xF7, 0x01]).unwrap()[0],
            Event::UInt64 { value: 1, tag: NONE }
        );
        // 0(1): date-time tag on an integer
        assert_eq!(
            events(&[0xC0, 0x01]).unwrap()[0],
            Event::UInt64 { value: 1, tag: NONE }
        );
        // 1(true)
        assert_eq!(
            events(&[0xC1, 0xF5]).unwrap()[0],
            Event::Bool { value: true, tag: NONE }
        );
    }

    #[test]
    fn tag_at_end_of_input_fails() {
        assert_eq!(error_code(&[0xC1]), ErrorCode::UnexpectedEof);
        assert_eq!(error_code(&[]), ErrorCode::UnexpectedEof);
    }

    #[test]
    fn map_key_policy() {
        // {h'0102': 1}
        assert_eq!(
            events(&[0xA1, 0x42, 0x01, 0x02, 0x01]).unwrap()[1],
            Event::Name("AQI".into())
        );
        // {1: 2}
        let err = events(&[0xA1, 0x01, 0x02]).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::UnsupportedMapKey {
                offset: 1,
                found: MajorType::UnsignedInteger
            }
        ));
    }

    #[test]
    fn depth_limit() {
        let options = DecoderOptions::default().with_max_nesting_depth(2);
        let mut reader = StreamReader::with_options(
            SliceSource::new(&[0x81, 0x81, 0x80]),
            EventRecorder::new(),
            options.clone(),
        );
        let err = reader.read().unwrap_err();
        assert!(matches!(err, DecodeError::NestingTooDeep { offset: 2, limit: 2 }));
        assert_eq!(reader.nesting_depth(), 0);

        let mut reader = StreamReader::with_options(
            SliceSource::new(&[0x81, 0x80]),
            EventRecorder::new(),
            options,
        );
        reader.read().unwrap();
    }

    fn read_limited(bytes: &[u8], max_bignum_bytes: usize) -> Result<(), DecodeError> {
        let options = DecoderOptions::default().with_max_bignum_bytes(max_bignum_bytes);
        let mut reader =
            StreamReader::with_options(SliceSource::new(bytes), EventRecorder::new(), options);
        reader.read()
    }

    #[test]
    fn bignum_length_limit() {
        // 2(h'010203'), 3(h'010203')
        for bytes in [[0xC2, 0x43, 0x01, 0x02, 0x03], [0xC3, 0x43, 0x01, 0x02, 0x03]] {
            assert!(read_limited(&bytes, 3).is_ok());
            let err = read_limited(&bytes, 2).unwrap_err();
            assert!(matches!(
                err,
                DecodeError::BignumTooLarge {
                    offset: 1,
                    len: 3,
                    limit: 2
                }
            ));
        }

        // 4([-1, 2(h'010203')]): the mantissa is bounded too
        let fraction = [0xC4, 0x82, 0x20, 0xC2, 0x43, 0x01, 0x02, 0x03];
        assert!(read_limited(&fraction, 3).is_ok());
        assert_eq!(
            read_limited(&fraction, 2).unwrap_err().code(),
            ErrorCode::BignumTooLarge
        );

        // Untagged byte strings are not bignums
        assert!(read_limited(&[0x43, 0x01, 0x02, 0x03], 0).is_ok());
    }

    #[test]
    fn read_all_counts_concatenated_items() {
        let bytes = [0x01, 0x82, 0x02, 0x03, 0x61, 0x7A];
        let mut reader = StreamReader::new(SliceSource::new(&bytes), EventRecorder::new());
        assert_eq!(reader.read_all().unwrap(), 3);
        assert_eq!(reader.position(), 6);
        let flushes = reader
            .handler()
            .events()
            .iter()
            .filter(|e| matches!(e, Event::Flush))
            .count();
        assert_eq!(flushes, 3);
    }

    #[test]
    fn truncated_container_fails_after_partial_events() {
        let mut reader =
            StreamReader::new(SliceSource::new(&[0x83, 0x01, 0x02]), EventRecorder::new());
        assert_eq!(reader.read().unwrap_err().code(), ErrorCode::UnexpectedEof);
        assert_eq!(reader.handler().events().len(), 3);
        assert_eq!(reader.nesting_depth(), 0);
    }

    struct Refuse;

    impl ContentHandler for Refuse {
        fn begin_array(
            &mut self,
            _: Option<usize>,
            _: SemanticTag,
            _: &dyn SerializingContext,
        ) -> Result<(), HandlerError> {
            Err(HandlerError::Rejected("no arrays".into()))
        }
        fn end_array(&mut self, _: &dyn SerializingContext) -> Result<(), HandlerError> {
            Ok(())
        }
        fn begin_object(
            &mut self,
            _: Option<usize>,
            _: SemanticTag,
            _: &dyn SerializingContext,
        ) -> Result<(), HandlerError> {
            Ok(())
        }
        fn end_object(&mut self, _: &dyn SerializingContext) -> Result<(), HandlerError> {
            Ok(())
        }
        fn name(&mut self, _: &str, _: &dyn SerializingContext) -> Result<(), HandlerError> {
            Ok(())
        }
        fn string_value(
            &mut self,
            _: &str,
            _: SemanticTag,
            _: &dyn SerializingContext,
        ) -> Result<(), HandlerError> {
            Ok(())
        }
        fn byte_string_value(
            &mut self,
            _: &[u8],
            _: ByteStringFormat,
            _: SemanticTag,
            _: &dyn SerializingContext,
        ) -> Result<(), HandlerError> {
            Ok(())
        }
        fn uint64_value(
            &mut self,
            _: u64,
            _: SemanticTag,
            ctx: &dyn SerializingContext,
        ) -> Result<(), HandlerError> {
            assert_eq!(ctx.line_number(), 1);
            assert_eq!(ctx.column_number(), 1);
            Ok(())
        }
        fn int64_value(
            &mut self,
            _: i64,
            _: SemanticTag,
            _: &dyn SerializingContext,
        ) -> Result<(), HandlerError> {
            Ok(())
        }
        fn double_value(
            &mut self,
            _: f64,
            _: SemanticTag,
            _: &dyn SerializingContext,
        ) -> Result<(), HandlerError> {
            Ok(())
        }
        fn bool_value(
            &mut self,
            _: bool,
            _: SemanticTag,
            _: &dyn SerializingContext,
        ) -> Result<(), HandlerError> {
            Ok(())
        }
        fn null_value(
            &mut self,
            _: SemanticTag,
            _: &dyn SerializingContext,
        ) -> Result<(), HandlerError> {
            Ok(())
        }
        fn bignum_value(
            &mut self,
            _: &str,
            _: &dyn SerializingContext,
        ) -> Result<(), HandlerError> {
            Ok(())
        }
    }

    #[test]
    fn handler_errors_abort_the_read() {
        let mut reader = StreamReader::new(SliceSource::new(&[0x07, 0x80]), Refuse);
        reader.read().unwrap();
        let err = reader.read().unwrap_err();
        assert_eq!(err.code(), ErrorCode::Handler);
        assert_eq!(err.offset(), Some(1));
    }
}
