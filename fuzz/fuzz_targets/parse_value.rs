#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: parse_value over raw bytes.
//
// Catches bugs in:
// - Marker dispatch and payload bounds checks
// - Aggregate extent computation (nested skip walk)
// - UTF-8 validation of string payloads
fuzz_target!(|data: &[u8]| {
    if let Ok((value, next)) = trellis_wire::parse_value(data, 0) {
        assert!(next <= data.len());
        // a successfully parsed value must also skip to the same offset
        let skipped = trellis_wire::skip_value(data, 0).unwrap();
        assert_eq!(skipped, next);
        // traversing aggregates must stay inside their regions
        if let Some(elements) = value.elements() {
            for element in elements {
                let _ = element;
            }
        }
        if let Some(entries) = value.entries() {
            for entry in entries {
                let _ = entry;
            }
        }
    }
});
