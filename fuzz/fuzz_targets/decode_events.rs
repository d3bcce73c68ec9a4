#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: full event decode of arbitrary bytes.
//
// Catches bugs in:
// - Argument widths and reserved additional information
// - Indefinite containers and strings missing their break
// - Tag chains and tag payload validation (bignums, decimal fractions)
// - Frame stack bookkeeping after errors
fuzz_target!(|data: &[u8]| {
    let _ = cbor_decoder::decode_events(data);
    let _ = cbor_decoder::decode_value(data);
});
