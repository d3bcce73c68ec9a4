//! Property tests: generated inputs checked against invariants of the
//! decoder rather than fixed expectations.

use cbor_decoder::{StreamReader, decode_events, decode_value, decode_values};
use cbor_tests::Encoder;
use cbor_types::{ByteStringFormat, Event, EventRecorder, SemanticTag, Value};
use cbor_wire::{MajorType, ReaderSource, SliceSource};
use quickcheck::QuickCheck;
use quickcheck_macros::quickcheck;

// ── Integers ──────────────────────────────────────────────────────────────────

#[quickcheck]
fn unsigned_integers_decode_exactly(n: u64) -> bool {
    decode_value(&Encoder::new().uint(n).finish()).ok() == Some(Value::uint(n))
}

#[quickcheck]
fn signed_integers_decode_exactly(n: i64) -> bool {
    let expected = match u64::try_from(n) {
        Ok(u) => Value::uint(u),
        Err(_) => Value::int(n),
    };
    decode_value(&Encoder::new().int(n).finish()).ok() == Some(expected)
}

#[quickcheck]
fn negative_magnitudes_never_wrap(magnitude: u64) -> bool {
    let value = decode_value(&Encoder::new().neg(magnitude).finish()).ok();
    let exact = -1 - i128::from(magnitude);
    match i64::try_from(exact) {
        Ok(small) => value == Some(Value::int(small)),
        Err(_) => value == Some(Value::Bignum(exact.to_string())),
    }
}

#[quickcheck]
fn bignum_bytes_match_native_integers(n: u64) -> bool {
    let bytes = Encoder::new().tag(2).bytes(&n.to_be_bytes()).finish();
    decode_value(&bytes).ok() == Some(Value::Bignum(n.to_string()))
}

#[quickcheck]
fn epoch_tag_survives_on_any_integer(n: i64) -> bool {
    let bytes = Encoder::new().tag(1).int(n).finish();
    decode_value(&bytes).is_ok_and(|v| v.tag() == SemanticTag::EpochTime)
}

// ── Strings ───────────────────────────────────────────────────────────────────

#[quickcheck]
fn text_strings_decode_exactly(s: String) -> bool {
    decode_value(&Encoder::new().text(&s).finish()).ok() == Some(Value::text(s))
}

#[quickcheck]
fn chunked_byte_strings_match_definite(data: Vec<u8>, cuts: Vec<usize>) -> bool {
    let definite = decode_value(&Encoder::new().bytes(&data).finish()).ok();

    let mut enc = Encoder::new().indefinite(MajorType::ByteString);
    let mut rest = data.as_slice();
    for cut in cuts {
        if rest.is_empty() {
            break;
        }
        let (chunk, tail) = rest.split_at(cut % (rest.len() + 1));
        enc = enc.bytes(chunk);
        rest = tail;
    }
    let chunked = decode_value(&enc.bytes(rest).brk().finish()).ok();

    definite == Some(Value::Bytes(data, ByteStringFormat::None)) && chunked == definite
}

// ── Containers ────────────────────────────────────────────────────────────────

#[quickcheck]
fn indefinite_arrays_match_definite(items: Vec<u64>) -> bool {
    let mut definite = Encoder::new().array(items.len() as u64);
    let mut indefinite = Encoder::new().indefinite(MajorType::Array);
    for &n in &items {
        definite = definite.uint(n);
        indefinite = indefinite.uint(n);
    }
    let a = decode_value(&definite.finish()).ok();
    let b = decode_value(&indefinite.brk().finish()).ok();

    a == Some(Value::array(items.into_iter().map(Value::uint).collect())) && a == b
}

#[quickcheck]
fn maps_keep_member_order(members: Vec<(String, i64)>) -> bool {
    let mut enc = Encoder::new().map(members.len() as u64);
    for (name, n) in &members {
        enc = enc.text(name).int(*n);
    }
    let Ok(Value::Object(decoded)) = decode_value(&enc.finish()) else {
        return false;
    };
    decoded.len() == members.len()
        && decoded
            .iter()
            .zip(&members)
            .all(|((name, value), (expected, n))| {
                let expected_value = decode_value(&Encoder::new().int(*n).finish()).ok();
                name == expected && Some(value) == expected_value.as_ref()
            })
}

#[quickcheck]
fn concatenated_items_decode_independently(items: Vec<i64>) -> bool {
    let mut enc = Encoder::new();
    for &n in &items {
        enc = enc.int(n);
    }
    let values = decode_values(&enc.finish()).unwrap_or_default();
    values.len() == items.len()
}

// ── Arbitrary input ───────────────────────────────────────────────────────────

/// Whatever the bytes, decoding returns (no panic) and a streaming source
/// agrees with an in-memory one on both events and outcome.
#[test]
fn slice_and_reader_sources_agree() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(bytes: Vec<u8>) -> bool {
        let mut from_slice = StreamReader::new(SliceSource::new(&bytes), EventRecorder::new());
        let mut from_reader =
            StreamReader::new(ReaderSource::new(bytes.as_slice()), EventRecorder::new());

        let a = from_slice.read_all().map_err(|e| (e.code(), e.offset()));
        let b = from_reader.read_all().map_err(|e| (e.code(), e.offset()));

        // Debug text so NaN payloads compare equal
        let (_, ra) = from_slice.into_parts();
        let (_, rb) = from_reader.into_parts();
        a == b && format!("{:?}", ra.events()) == format!("{:?}", rb.events())
    }

    QuickCheck::new()
        .tests(2000)
        .quickcheck(prop as fn(Vec<u8>) -> bool);
}

/// Every successful decode is bracketed: begins and ends pair up and each
/// item ends with exactly one flush.
#[test]
fn successful_decodes_are_balanced() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(bytes: Vec<u8>) -> bool {
        let Ok(events) = decode_events(&bytes) else {
            return true;
        };
        let mut depth: i64 = 0;
        for event in &events {
            match event {
                Event::BeginArray { .. } | Event::BeginObject { .. } => depth += 1,
                Event::EndArray | Event::EndObject => depth -= 1,
                Event::Flush if depth != 0 => return false,
                _ => {}
            }
            if depth < 0 {
                return false;
            }
        }
        depth == 0 && events.last().is_none_or(|e| *e == Event::Flush)
    }

    QuickCheck::new()
        .tests(2000)
        .quickcheck(prop as fn(Vec<u8>) -> bool);
}
