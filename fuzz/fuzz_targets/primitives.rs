#![no_main]

use libfuzzer_sys::fuzz_target;
use cbor_wire::primitive::{decode_byte_string, decode_float, decode_length, decode_text_string};
use cbor_wire::SliceSource;

// Fuzz target: wire primitives in isolation.
//
// Each primitive must either succeed without reading past the input or
// fail cleanly; none may panic on a mismatched head.
fuzz_target!(|data: &[u8]| {
    let mut scratch = Vec::new();

    let _ = decode_length(&mut SliceSource::new(data));
    let _ = decode_float(&mut SliceSource::new(data));
    let _ = decode_byte_string(&mut SliceSource::new(data), &mut scratch);

    let mut source = SliceSource::new(data);
    if let Ok(text) = decode_text_string(&mut source, &mut scratch) {
        assert!(text.len() <= data.len());
        assert!(source.remaining().len() < data.len());
    }
});
