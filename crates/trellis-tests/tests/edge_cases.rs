//! Edge case integration tests for the Trellis decoder.
//!
//! These cover the conditions a protocol endpoint actually meets in the
//! wild, beyond the happy-path round-trips:
//!
//! - **Hostile bytes**: reserved markers, truncation at every interesting
//!   position, headers whose claimed lengths exceed the buffer.
//! - **Poisoning**: once a wire error surfaces, the decoder must repeat
//!   the same failure forever instead of resynchronizing onto garbage.
//! - **Zero-copy integrity**: returned views must point into the caller's
//!   buffer, not copies.
//! - **Deep nesting**: aggregate extents are computed iteratively, so
//!   pathological nesting depth must not overflow the stack.

use trellis_decoder::{DecodeError, Decoder};
use trellis_encoder::Writer;
use trellis_tests::nested_arrays;
use trellis_wire::WireError;
use uuid::Uuid;

// ── Hostile bytes ─────────────────────────────────────────────────────────────

#[test]
fn reserved_marker_is_malformed() {
    let buf = hex::decode("c1").unwrap();
    let mut dec = Decoder::new(&buf);
    assert!(matches!(
        dec.read::<i64>(),
        Err(DecodeError::Malformed(WireError::UnknownMarker {
            marker: 0xC1,
            offset: 0,
        }))
    ));
}

#[test]
fn truncation_inside_scalar_payload() {
    // uint64 marker with half its payload
    let buf = hex::decode("cf00010203").unwrap();
    let mut dec = Decoder::new(&buf);
    assert!(matches!(dec.skip(), Err(DecodeError::Malformed(_))));
}

#[test]
fn truncation_inside_string_payload() {
    // str8 claiming 10 bytes with 3 present
    let buf = hex::decode("d90a616263").unwrap();
    let mut dec = Decoder::new(&buf);
    assert!(matches!(
        dec.read::<&str>(),
        Err(DecodeError::Malformed(WireError::UnexpectedEof { .. }))
    ));
}

#[test]
fn aggregate_claiming_more_children_than_bytes() {
    // map16 header claiming 65535 pairs, then nothing
    let buf = hex::decode("deffff").unwrap();
    let mut dec = Decoder::new(&buf);
    assert!(matches!(
        dec.read_map_size(),
        Err(DecodeError::Malformed(WireError::UnexpectedEof { .. }))
    ));
}

#[test]
fn invalid_utf8_in_string_is_malformed() {
    // fixstr of 2 with invalid UTF-8 payload
    let buf = hex::decode("a2fffe").unwrap();
    let mut dec = Decoder::new(&buf);
    assert!(matches!(
        dec.read::<&str>(),
        Err(DecodeError::Malformed(WireError::InvalidUtf8 { offset: 1 }))
    ));
}

#[test]
fn uuid_extension_with_wrong_length_is_malformed() {
    // fixext8 tagged with the UUID type code: right family, wrong width
    let buf = hex::decode("d7030102030405060708").unwrap();
    let mut dec = Decoder::new(&buf);
    assert!(matches!(
        dec.read::<Uuid>(),
        Err(DecodeError::Malformed(WireError::InvalidExtLength {
            type_code: 3,
            expected: 16,
            len: 8,
        }))
    ));
}

// ── Poisoning ─────────────────────────────────────────────────────────────────

#[test]
fn poisoned_decoder_repeats_the_same_error() {
    let buf = hex::decode("c1c0c0").unwrap(); // garbage, then valid nils
    let mut dec = Decoder::new(&buf);

    let first = dec.read::<bool>().unwrap_err();
    assert!(matches!(first, DecodeError::Malformed(_)));

    // the valid nils behind the bad marker must stay unreachable
    for _ in 0..3 {
        assert_eq!(dec.skip().unwrap_err(), first);
        assert_eq!(dec.try_read_nil().unwrap_err(), first);
    }
    assert_eq!(dec.position(), 0);
}

#[test]
fn bad_uuid_length_poisons_the_pass() {
    let mut head = hex::decode("d7030102030405060708").unwrap();
    let mut w = Writer::new();
    w.write_bool(true);
    head.extend_from_slice(w.as_bytes());

    let mut dec = Decoder::new(&head);
    let first = dec.read::<Uuid>().unwrap_err();
    assert!(matches!(first, DecodeError::Malformed(_)));
    // even the well-formed bool behind it is gone for this pass
    assert_eq!(dec.read::<bool>().unwrap_err(), first);
}

#[test]
fn try_variants_propagate_malformed() {
    let buf = hex::decode("c1").unwrap();

    let mut dec = Decoder::new(&buf);
    assert!(matches!(
        dec.try_read::<i32>(),
        Err(DecodeError::Malformed(_))
    ));

    let mut dec = Decoder::new(&buf);
    assert!(matches!(dec.try_read_nil(), Err(DecodeError::Malformed(_))));
}

#[test]
fn exhaustion_is_not_poisoning() {
    let mut w = Writer::new();
    w.write_u32(1);
    let buf = w.into_bytes();

    let mut dec = Decoder::new(&buf);
    assert_eq!(dec.read::<u32>().unwrap(), 1);
    // exhausted reads keep reporting exhaustion, and position holds steady
    assert!(matches!(dec.read::<u32>(), Err(DecodeError::StreamExhausted)));
    assert!(matches!(dec.skip(), Err(DecodeError::StreamExhausted)));
    assert_eq!(dec.position(), buf.len());
}

// ── Zero-copy integrity ───────────────────────────────────────────────────────

#[test]
fn string_and_binary_views_borrow_the_input() {
    let mut w = Writer::new();
    w.write_str("borrowed").write_bin(&[1, 2, 3]);
    let buf = w.into_bytes();

    let mut dec = Decoder::new(&buf);
    let s = dec.read::<&str>().unwrap();
    let b = dec.read_binary().unwrap();

    let range = buf.as_ptr_range();
    assert!(range.contains(&s.as_ptr()));
    assert!(range.contains(&b.as_ptr()));
}

// ── Deep nesting and skipping ─────────────────────────────────────────────────

#[test]
fn skip_survives_pathological_nesting_depth() {
    let buf = nested_arrays(10_000);
    let mut dec = Decoder::new(&buf);
    dec.skip().unwrap();
    assert_eq!(dec.position(), buf.len());
}

#[test]
fn skip_discards_aggregates_wholesale() {
    let mut w = Writer::new();
    w.write_map_header(2)
        .write_str("a")
        .write_array_header(2)
        .write_i64(1)
        .write_i64(2)
        .write_str("b")
        .write_nil();
    w.write_str("after");
    let buf = w.into_bytes();

    let mut dec = Decoder::new(&buf);
    dec.skip().unwrap();
    assert_eq!(dec.read::<&str>().unwrap(), "after");
}

#[test]
fn skip_does_not_validate_nested_strings() {
    // array wrapping a structurally sound but non-UTF-8 string
    let buf = hex::decode("91a2fffe").unwrap();
    let mut dec = Decoder::new(&buf);
    // skipping the aggregate is fine...
    dec.skip().unwrap();
    assert_eq!(dec.position(), buf.len());

    // ...but decoding the element surfaces the corruption
    let mut dec = Decoder::new(&buf);
    assert!(matches!(
        dec.read_array::<String>(),
        Err(DecodeError::Malformed(WireError::InvalidUtf8 { .. }))
    ));
}

#[test]
fn element_failure_leaves_cursor_on_the_aggregate() {
    let buf = hex::decode("91a2fffe").unwrap();
    let mut dec = Decoder::new(&buf);
    assert!(dec.read_array::<String>().is_err());
    assert_eq!(dec.position(), 0);
}
