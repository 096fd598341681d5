#![warn(clippy::pedantic)]

//! Shared fixture builders for the integration tests and benchmarks.

use trellis_encoder::Writer;
use uuid::Uuid;

/// Fixed identifier used across fixtures so rendered output is stable.
pub const SAMPLE_UUID_BYTES: [u8; 16] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E,
    0x0F,
];

/// The canonical protocol record used by the end-to-end tests:
/// `{"id": <uuid>, "name": "alice", "age": 30, "tags": ["x", "y"]}`.
#[must_use]
pub fn sample_record() -> Vec<u8> {
    let mut w = Writer::new();
    w.write_map_header(4)
        .write_str("id")
        .write_uuid(Uuid::from_bytes(SAMPLE_UUID_BYTES))
        .write_str("name")
        .write_str("alice")
        .write_str("age")
        .write_u64(30)
        .write_str("tags")
        .write_array_header(2)
        .write_str("x")
        .write_str("y");
    w.into_bytes()
}

/// A flat stream of `n` mixed scalar values, for throughput benchmarks.
#[must_use]
pub fn scalar_stream(n: usize) -> Vec<u8> {
    let mut w = Writer::new();
    for i in 0..n {
        match i % 5 {
            0 => {
                w.write_u64(i as u64 * 1000);
            }
            1 => {
                w.write_i64(-(i as i64));
            }
            2 => {
                w.write_str("payload");
            }
            3 => {
                w.write_bool(i % 2 == 0);
            }
            _ => {
                w.write_f64(i as f64 * 0.5);
            }
        }
    }
    w.into_bytes()
}

/// `depth` arrays nested inside each other, innermost holding one int.
#[must_use]
pub fn nested_arrays(depth: usize) -> Vec<u8> {
    let mut w = Writer::new();
    for _ in 0..depth {
        w.write_array_header(1);
    }
    w.write_u64(7);
    w.into_bytes()
}
