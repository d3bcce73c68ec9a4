#![no_main]

use libfuzzer_sys::fuzz_target;
use cbor_decoder::StreamReader;
use cbor_types::EventRecorder;
use cbor_wire::{ReaderSource, SliceSource};

// Fuzz target: streaming source vs in-memory source.
//
// Both sources must produce the same events, the same outcome, and the
// same error offset for any input.
fuzz_target!(|data: &[u8]| {
    let mut from_slice = StreamReader::new(SliceSource::new(data), EventRecorder::new());
    let mut from_reader = StreamReader::new(ReaderSource::new(data), EventRecorder::new());

    let a = from_slice.read_all().map_err(|e| (e.code(), e.offset()));
    let b = from_reader.read_all().map_err(|e| (e.code(), e.offset()));
    assert_eq!(a, b);

    let (_, ra) = from_slice.into_parts();
    let (_, rb) = from_reader.into_parts();
    assert_eq!(format!("{:?}", ra.events()), format!("{:?}", rb.events()));
});
