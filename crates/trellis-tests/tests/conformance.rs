//! Conformance tests: fixed streams rendered to a stable textual form and
//! compared against inline snapshots.
//!
//! The rendering is intentionally dumb — offset, kind, payload — so any
//! change to marker selection, extent computation, or traversal order
//! shows up as a snapshot diff instead of passing silently.

use std::fmt::Write as _;

use insta::assert_snapshot;
use trellis_encoder::Writer;
use trellis_tests::{SAMPLE_UUID_BYTES, sample_record};
use trellis_wire::marker::ext_type;
use trellis_wire::{Value, parse_value};
use uuid::Uuid;

/// Render one value; nested aggregates are rendered inline.
fn render(value: &Value<'_>) -> String {
    match *value {
        Value::Nil => "nil".to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Int(v) => v.to_string(),
        Value::Uint(v) => v.to_string(),
        Value::F32(v) => format!("{v}f32"),
        Value::F64(v) => v.to_string(),
        Value::Str(s) => format!("{s:?}"),
        Value::Bin(b) => format!("bin({} bytes)", b.len()),
        Value::Array { len, .. } => {
            let mut out = format!("array({len}) [");
            for (idx, element) in value.elements().expect("array").enumerate() {
                if idx > 0 {
                    out.push_str(", ");
                }
                out.push_str(&render(&element.expect("element parses")));
            }
            out.push(']');
            out
        }
        Value::Map { len, .. } => {
            let mut out = format!("map({len}) {{");
            for (idx, entry) in value.entries().expect("map").enumerate() {
                if idx > 0 {
                    out.push_str(", ");
                }
                let (k, v) = entry.expect("entry parses");
                let _ = write!(out, "{}: {}", render(&k), render(&v));
            }
            out.push('}');
            out
        }
        Value::Ext { type_code, data } => {
            if type_code == ext_type::UUID && data.len() == ext_type::UUID_LEN {
                let bytes: [u8; 16] = data.try_into().expect("length already checked");
                format!("uuid({})", Uuid::from_bytes(bytes))
            } else {
                format!("ext(type={type_code}, {} bytes)", data.len())
            }
        }
    }
}

/// Render a whole stream, one line per top-level value, plus a footer.
fn render_stream(bytes: &[u8]) -> String {
    let mut out = String::new();
    let mut offset = 0;
    let mut count = 0;
    while offset < bytes.len() {
        let (value, next) = parse_value(bytes, offset).expect("stream parses");
        let _ = writeln!(out, "{offset:04}  {}", render(&value));
        offset = next;
        count += 1;
    }
    let _ = writeln!(out, "---");
    let _ = write!(out, "{count} values, {offset} bytes");
    out
}

#[test]
fn mixed_scalar_stream_renders_stably() {
    let mut w = Writer::new();
    w.write_u32(42);
    w.write_str("alice");
    w.write_bool(true);
    w.write_nil();
    w.write_array_header(3).write_i64(3).write_i64(1).write_i64(2);
    w.write_map_header(1).write_str("age").write_u64(30);
    w.write_uuid(Uuid::from_bytes(SAMPLE_UUID_BYTES));
    w.write_bin(&[0xDE, 0xAD]);

    assert_snapshot!(render_stream(w.as_bytes()), @r#"
    0000  42
    0001  "alice"
    0007  true
    0008  nil
    0009  array(3) [3, 1, 2]
    0013  map(1) {"age": 30}
    0019  uuid(00010203-0405-0607-0809-0a0b0c0d0e0f)
    0037  bin(2 bytes)
    ---
    8 values, 41 bytes
    "#);
}

#[test]
fn sample_record_renders_stably() {
    assert_snapshot!(render_stream(&sample_record()), @r#"
    0000  map(4) {"id": uuid(00010203-0405-0607-0809-0a0b0c0d0e0f), "name": "alice", "age": 30, "tags": array(2) ["x", "y"]}
    ---
    1 values, 48 bytes
    "#);
}
