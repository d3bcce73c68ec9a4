use cbor_types::{Event, EventRecorder, Value, ValueBuilder};
use cbor_wire::{SliceSource, Source, WireError};

use crate::error::DecodeError;
use crate::reader::StreamReader;

/// Decode exactly one item from `bytes` into a [`Value`].
///
/// # Errors
///
/// Any [`DecodeError`] from the item itself, or
/// [`DecodeError::TrailingData`] if bytes remain after it.
///
/// # Example
///
/// ```rust
/// use cbor_decoder::decode_value;
/// use cbor_types::Value;
///
/// let value = decode_value(&[0x82, 0x01, 0x20]).unwrap();
/// assert_eq!(value, Value::array(vec![Value::uint(1), Value::int(-1)]));
/// ```
pub fn decode_value(bytes: &[u8]) -> Result<Value, DecodeError> {
    let mut reader = StreamReader::new(SliceSource::new(bytes), ValueBuilder::new());
    reader.read()?;
    let (source, builder) = reader.into_parts();

    let rest = source.remaining();
    if !rest.is_empty() {
        return Err(DecodeError::TrailingData {
            offset: source.position(),
            extra_bytes: rest.len(),
        });
    }
    builder.into_values().pop().ok_or_else(|| {
        WireError::UnexpectedEof {
            offset: source.position(),
        }
        .into()
    })
}

/// Decode every concatenated item in `bytes`.
///
/// # Errors
///
/// The first [`DecodeError`] encountered.
pub fn decode_values(bytes: &[u8]) -> Result<Vec<Value>, DecodeError> {
    let mut reader = StreamReader::new(SliceSource::new(bytes), ValueBuilder::new());
    reader.read_all()?;
    let (_, builder) = reader.into_parts();
    Ok(builder.into_values())
}

/// Decode every concatenated item in `bytes` into the raw event sequence,
/// `Flush` markers included.
///
/// # Errors
///
/// The first [`DecodeError`] encountered.
pub fn decode_events(bytes: &[u8]) -> Result<Vec<Event>, DecodeError> {
    let mut reader = StreamReader::new(SliceSource::new(bytes), EventRecorder::new());
    reader.read_all()?;
    let (_, recorder) = reader.into_parts();
    Ok(recorder.into_events())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use cbor_types::SemanticTag;

    #[test]
    fn single_value() {
        // {"a": 1, "b": [true, null]}
        let bytes = [0xA2, 0x61, 0x61, 0x01, 0x61, 0x62, 0x82, 0xF5, 0xF6];
        let value = decode_value(&bytes).unwrap();
        assert_eq!(value.get("a"), Some(&Value::uint(1)));
        assert_eq!(
            value.get("b"),
            Some(&Value::array(vec![Value::Bool(true), Value::null()]))
        );
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let err = decode_value(&[0x01, 0x02, 0x03]).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::TrailingData {
                offset: 1,
                extra_bytes: 2
            }
        ));
    }

    #[test]
    fn empty_input_is_eof() {
        assert_eq!(decode_value(&[]).unwrap_err().code(), ErrorCode::UnexpectedEof);
        assert!(decode_values(&[]).unwrap().is_empty());
    }

    #[test]
    fn sequences() {
        let values = decode_values(&[0x01, 0xC1, 0x02, 0x63, b'a', b'b', b'c']).unwrap();
        assert_eq!(
            values,
            vec![
                Value::uint(1),
                Value::UInt(2, SemanticTag::EpochTime),
                Value::text("abc")
            ]
        );

        let events = decode_events(&[0x01, 0x02]).unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(events[1], Event::Flush);
    }
}
