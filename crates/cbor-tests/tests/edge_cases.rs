//! Edge case integration tests for the decoder.
//!
//! - **Truncation**: every strict prefix of a valid item must fail with
//!   `UnexpectedEof`, never panic or emit a partial `flush`.
//! - **Depth limit**: nesting past the configured limit is refused before
//!   the frame stack grows.
//! - **Malformed structure**: stray breaks, reserved additional
//!   information, unsupported keys and simple values each map to their own
//!   error code with the offset of the offending byte.
//! - **Trailing data**: the single-item convenience decode reports bytes
//!   left over after the item.

use cbor_decoder::{
    DecodeError, DecoderOptions, ErrorCode, StreamReader, decode_events, decode_value,
};
use cbor_tests::{Encoder, nested_arrays};
use cbor_types::{Event, EventRecorder, Value};
use cbor_wire::{MajorType, ReaderSource, SliceSource};

fn code(bytes: &[u8]) -> ErrorCode {
    match decode_events(bytes) {
        Ok(events) => panic!("expected an error for {bytes:02X?}, got {events:?}"),
        Err(e) => e.code(),
    }
}

fn sample_document() -> Vec<u8> {
    Encoder::new()
        .map(4)
        .text("id")
        .uint(70_000)
        .text("ratio")
        .double(0.25)
        .text("blob")
        .tag(2)
        .bytes(&[0x01, 0x00, 0x00])
        .text("items")
        .indefinite(MajorType::Array)
        .text("x")
        .int(-500)
        .tag(4)
        .array(2)
        .int(-1)
        .uint(15)
        .brk()
        .finish()
}

// ── Truncation ────────────────────────────────────────────────────────────────

#[test]
fn every_prefix_is_unexpected_eof() {
    let bytes = sample_document();
    assert!(decode_events(&bytes).is_ok());

    for cut in 0..bytes.len() {
        let prefix = &bytes[..cut];
        let mut reader = StreamReader::new(SliceSource::new(prefix), EventRecorder::new());
        let err = reader.read().expect_err("prefix must not decode");
        assert_eq!(err.code(), ErrorCode::UnexpectedEof, "cut at {cut}: {err}");

        let (_, recorder) = reader.into_parts();
        assert!(
            !recorder.events().contains(&Event::Flush),
            "cut at {cut} flushed a partial item"
        );
    }
}

#[test]
fn truncation_through_a_reader_source() {
    let bytes = sample_document();
    let prefix = &bytes[..bytes.len() - 1];
    let mut reader = StreamReader::new(ReaderSource::new(prefix), EventRecorder::new());
    let err = reader.read().unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnexpectedEof);
    assert_eq!(err.offset(), Some(prefix.len() as u64));
}

// ── Depth limit ───────────────────────────────────────────────────────────────

#[test]
fn depth_limit_is_enforced() {
    let options = DecoderOptions::default().with_max_nesting_depth(8);

    let ok = nested_arrays(8);
    let mut reader =
        StreamReader::with_options(SliceSource::new(&ok), EventRecorder::new(), options.clone());
    assert!(reader.read().is_ok());

    let deep = nested_arrays(9);
    let mut reader =
        StreamReader::with_options(SliceSource::new(&deep), EventRecorder::new(), options);
    match reader.read() {
        Err(DecodeError::NestingTooDeep { offset, limit }) => {
            assert_eq!(offset, 8);
            assert_eq!(limit, 8);
        }
        other => panic!("expected NestingTooDeep, got {other:?}"),
    }
    assert_eq!(reader.nesting_depth(), 0);
}

#[test]
fn hostile_nesting_under_default_limit_does_not_overflow_the_stack() {
    let bytes = nested_arrays(1000);
    let events = decode_events(&bytes).unwrap();
    // 1000 begins, the zero, 1000 ends, flush
    assert_eq!(events.len(), 2002);
}

#[test]
fn default_limit_rejects_deeper_input() {
    let bytes = nested_arrays(5000);
    assert_eq!(code(&bytes), ErrorCode::NestingTooDeep);
}

// ── Malformed structure ───────────────────────────────────────────────────────

#[test]
fn stray_break_at_top_level() {
    let err = decode_events(&[0xFF]).unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnexpectedBreak);
    assert_eq!(err.offset(), Some(0));
}

#[test]
fn break_inside_definite_array() {
    assert_eq!(code(&[0x82, 0x01, 0xFF]), ErrorCode::UnexpectedBreak);
}

#[test]
fn break_where_a_map_value_is_owed() {
    let bytes = Encoder::new()
        .indefinite(MajorType::Map)
        .text("a")
        .brk()
        .finish();
    assert_eq!(code(&bytes), ErrorCode::UnexpectedBreak);
}

#[test]
fn reserved_additional_information() {
    for byte in [0x1C, 0x1D, 0x1E, 0x3C, 0xFC] {
        assert_eq!(code(&[byte]), ErrorCode::InvalidAdditionalInfo, "byte {byte:02X}");
    }
}

#[test]
fn integer_keys_are_unsupported() {
    let bytes = Encoder::new().map(1).uint(1).uint(2).finish();
    let err = decode_events(&bytes).unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnsupportedMapKey);
    assert_eq!(err.offset(), Some(1));
}

#[test]
fn unassigned_simple_values() {
    assert_eq!(code(&[0xE0]), ErrorCode::UnsupportedSimpleValue);
    assert_eq!(code(&[0xF8, 0x20]), ErrorCode::UnsupportedSimpleValue);
}

#[test]
fn invalid_utf8_text() {
    let bytes = Encoder::new().raw(&[0x62, 0xC3, 0x28]).finish();
    assert_eq!(code(&bytes), ErrorCode::InvalidUtf8);
}

#[test]
fn foreign_chunk_in_indefinite_text() {
    let bytes = Encoder::new()
        .indefinite(MajorType::TextString)
        .bytes(b"x")
        .brk()
        .finish();
    assert_eq!(code(&bytes), ErrorCode::UnexpectedMajorType);
}

#[test]
fn decimal_fraction_needs_two_elements() {
    let bytes = Encoder::new().tag(4).array(3).uint(1).uint(2).uint(3).finish();
    assert_eq!(code(&bytes), ErrorCode::InvalidDecimalFraction);

    let bytes = Encoder::new().tag(4).array(2).text("e").uint(2).finish();
    assert_eq!(code(&bytes), ErrorCode::InvalidDecimalFraction);
}

#[test]
fn huge_length_is_eof_not_allocation() {
    // Byte string claiming 2^40 bytes with none present.
    let bytes = Encoder::new().head(MajorType::ByteString, 1 << 40).finish();
    let code = code(&bytes);
    assert!(
        matches!(code, ErrorCode::UnexpectedEof | ErrorCode::LengthOverflow),
        "got {code}"
    );
}

#[test]
fn oversized_bignums_are_refused_before_conversion() {
    let body = vec![0xAB; 200 * 1024];
    let positive = Encoder::new().tag(2).bytes(&body).finish();
    assert_eq!(code(&positive), ErrorCode::BignumTooLarge);

    let mantissa = Encoder::new()
        .tag(4)
        .array(2)
        .int(-2)
        .tag(3)
        .bytes(&body)
        .finish();
    assert_eq!(code(&mantissa), ErrorCode::BignumTooLarge);

    // Past the default limit, accepted once the limit is raised
    let wide = Encoder::new().tag(2).bytes(&body[..8192]).finish();
    assert_eq!(code(&wide), ErrorCode::BignumTooLarge);
    let options = DecoderOptions::default().with_max_bignum_bytes(8192);
    let mut reader =
        StreamReader::with_options(SliceSource::new(&wide), EventRecorder::new(), options);
    assert!(reader.read().is_ok());
}

// ── Trailing data ─────────────────────────────────────────────────────────────

#[test]
fn trailing_bytes_after_single_item() {
    match decode_value(&[0x01, 0x02, 0x03]) {
        Err(DecodeError::TrailingData {
            offset,
            extra_bytes,
        }) => {
            assert_eq!(offset, 1);
            assert_eq!(extra_bytes, 2);
        }
        other => panic!("expected TrailingData, got {other:?}"),
    }
}

#[test]
fn empty_input_is_eof() {
    assert_eq!(
        decode_value(&[]).unwrap_err().code(),
        ErrorCode::UnexpectedEof
    );
    assert_eq!(decode_events(&[]).unwrap(), Vec::<Event>::new());
}

// ── Recovery ──────────────────────────────────────────────────────────────────

#[test]
fn reader_recovers_after_a_failed_item() {
    // [1, "bad utf8"] followed by a clean 7
    let bytes = Encoder::new()
        .array(2)
        .uint(1)
        .raw(&[0x61, 0xFF])
        .uint(7)
        .finish();
    let mut reader = StreamReader::new(SliceSource::new(&bytes), cbor_types::ValueBuilder::new());
    assert!(reader.read().is_err());
    assert_eq!(reader.nesting_depth(), 0);

    reader.handler_mut().discard_partial();
    reader.read().unwrap();
    let (_, builder) = reader.into_parts();
    assert_eq!(builder.into_values(), vec![Value::uint(7)]);
}
