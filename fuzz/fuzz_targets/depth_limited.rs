#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use cbor_decoder::{DecodeError, DecoderOptions, StreamReader};
use cbor_types::EventRecorder;
use cbor_wire::SliceSource;

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    max_depth: u8,
    data: Vec<u8>,
}

// Fuzz target: small nesting limits.
//
// The frame stack must never exceed the configured depth, and the reader
// must be back at top level after every read, successful or not.
fuzz_target!(|input: FuzzInput| {
    let limit = usize::from(input.max_depth);
    let options = DecoderOptions::default().with_max_nesting_depth(limit);
    let mut reader =
        StreamReader::with_options(SliceSource::new(&input.data), EventRecorder::new(), options);

    for _ in 0..16 {
        let result = reader.read();
        assert_eq!(reader.nesting_depth(), 0);
        match result {
            Ok(()) => {}
            Err(DecodeError::NestingTooDeep { limit: reported, .. }) => {
                assert_eq!(reported, limit);
                break;
            }
            Err(_) => break,
        }
    }
});
