#![no_main]

use libfuzzer_sys::fuzz_target;
use trellis_decoder::{DecodeError, Decoder};

// Fuzz target: the decoder must never panic on arbitrary input.
//
// Walks the stream trying a spread of typed reads; any of them may fail,
// but failures must be error values, the cursor must never move backward,
// and a poisoned decoder must stay poisoned.
fuzz_target!(|data: &[u8]| {
    let mut dec = Decoder::new(data);
    let mut step = 0usize;

    loop {
        let before = dec.position();
        let result = match step % 6 {
            0 => dec.try_read::<i64>().map(|_| ()),
            1 => dec.try_read::<&str>().map(|_| ()),
            2 => dec.try_read_nil().map(|_| ()),
            3 => dec.read_nullable::<u32>().map(|_| ()),
            4 => dec.read_array_size().map(|_| ()),
            _ => dec.skip(),
        };
        step += 1;

        assert!(dec.position() >= before);

        match result {
            Ok(()) => {
                // peeks and failed try_reads leave the cursor put; discard
                // one value so the loop always makes progress
                if dec.position() == before && dec.skip().is_err() {
                    break;
                }
            }
            Err(DecodeError::StreamExhausted) => break,
            Err(DecodeError::Malformed(_)) => {
                // poisoned: the same class of error must repeat, forever
                assert!(matches!(dec.skip(), Err(DecodeError::Malformed(_))));
                break;
            }
            Err(_) => {
                // mismatch: discard the value and continue
                if dec.skip().is_err() {
                    break;
                }
            }
        }
    }
});
