#![no_main]

use libfuzzer_sys::fuzz_target;
use cbor_render::{RenderConfig, render_json};

// Fuzz target: decode + JSON rendering.
//
// Whatever decodes must render to text that is valid JSON line by line in
// compact mode.
fuzz_target!(|data: &[u8]| {
    let Ok(json) = render_json(data, &RenderConfig::default()) else {
        return;
    };
    for line in json.lines() {
        assert!(
            serde_json::from_str::<serde_json::Value>(line).is_ok(),
            "invalid JSON line: {line}"
        );
    }
    let _ = render_json(data, &RenderConfig::pretty());
});
