#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: skip a whole stream of values.
//
// The skip walk is iterative; pathological nesting depth must terminate
// without exhausting the stack, and the cursor must strictly advance.
fuzz_target!(|data: &[u8]| {
    let mut offset = 0;
    while offset < data.len() {
        match trellis_wire::skip_value(data, offset) {
            Ok(next) => {
                assert!(next > offset && next <= data.len());
                offset = next;
            }
            Err(_) => break,
        }
    }
});
