/// Implementation of `trellis inspect`.
///
/// Reads a stream file and prints one line per top-level value with its
/// byte offset and a rendered form. With `--json` the whole stream is
/// rendered as a JSON array instead, for scripting.
///
/// # Output format
///
/// ```text
/// 0000  map(4) {"id": uuid(…), "name": "alice", "age": 30, "tags": ["x", "y"]}
/// 0042  true
/// 0043  bin(16 bytes)
/// ---
/// 3 values, 59 bytes
/// ```
use std::fmt::Write as _;
use std::fs;

use anyhow::{Context, Result, anyhow};
use trellis_wire::marker::ext_type;
use trellis_wire::{Value, parse_value};
use uuid::Uuid;

use crate::InspectArgs;

/// Run the `trellis inspect` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the stream is
/// malformed; the diagnostic names the offset where parsing died.
pub fn run(args: &InspectArgs) -> Result<()> {
    let bytes =
        fs::read(&args.file).with_context(|| format!("cannot read {}", args.file.display()))?;

    if args.json {
        let rendered = render_json(&bytes)
            .with_context(|| format!("failed to decode {}", args.file.display()))?;
        println!("{}", serde_json::to_string_pretty(&rendered)?);
        return Ok(());
    }

    let mut offset = 0;
    let mut count = 0u64;
    while offset < bytes.len() {
        let (value, next) = parse_value(&bytes, offset)
            .map_err(|e| anyhow!("{e} (while inspecting {})", args.file.display()))?;
        println!("{offset:04}  {}", render(&value));
        offset = next;
        count += 1;
    }

    println!("---");
    println!("{count} values, {offset} bytes");
    Ok(())
}

/// Render one value as a single-line human-readable form.
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
            render_elements(value, &mut out);
            out.push(']');
            out
        }
        Value::Map { len, .. } => {
            let mut out = format!("map({len}) {{");
            render_entries(value, &mut out);
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

fn render_elements(value: &Value<'_>, out: &mut String) {
    let Some(elements) = value.elements() else {
        return;
    };
    for (idx, element) in elements.enumerate() {
        if idx > 0 {
            out.push_str(", ");
        }
        match element {
            Ok(v) => out.push_str(&render(&v)),
            Err(e) => {
                let _ = write!(out, "<{e}>");
                return;
            }
        }
    }
}

fn render_entries(value: &Value<'_>, out: &mut String) {
    let Some(entries) = value.entries() else {
        return;
    };
    for (idx, entry) in entries.enumerate() {
        if idx > 0 {
            out.push_str(", ");
        }
        match entry {
            Ok((k, v)) => {
                out.push_str(&render(&k));
                out.push_str(": ");
                out.push_str(&render(&v));
            }
            Err(e) => {
                let _ = write!(out, "<{e}>");
                return;
            }
        }
    }
}

/// Render the whole stream as a JSON array, one entry per top-level value.
fn render_json(bytes: &[u8]) -> Result<serde_json::Value> {
    let mut out = Vec::new();
    let mut offset = 0;
    while offset < bytes.len() {
        let (value, next) = parse_value(bytes, offset).map_err(|e| anyhow!("{e}"))?;
        out.push(to_json(&value)?);
        offset = next;
    }
    Ok(serde_json::Value::Array(out))
}

fn to_json(value: &Value<'_>) -> Result<serde_json::Value> {
    use serde_json::Value as Json;

    Ok(match *value {
        Value::Nil => Json::Null,
        Value::Bool(b) => Json::Bool(b),
        Value::Int(v) => Json::from(v),
        Value::Uint(v) => Json::from(v),
        Value::F32(v) => serde_json::Number::from_f64(f64::from(v))
            .map(Json::Number)
            .unwrap_or(Json::Null),
        Value::F64(v) => serde_json::Number::from_f64(v)
            .map(Json::Number)
            .unwrap_or(Json::Null),
        Value::Str(s) => Json::from(s),
        Value::Bin(b) => {
            // JSON has no byte type; hex keeps the payload inspectable
            Json::from(b.iter().fold(String::new(), |mut acc, byte| {
                let _ = write!(acc, "{byte:02x}");
                acc
            }))
        }
        Value::Array { .. } => {
            let mut items = Vec::new();
            for element in value.elements().into_iter().flatten() {
                let element = element.map_err(|e| anyhow!("{e}"))?;
                items.push(to_json(&element)?);
            }
            Json::Array(items)
        }
        Value::Map { .. } => {
            let mut object = serde_json::Map::new();
            for entry in value.entries().into_iter().flatten() {
                let (k, v) = entry.map_err(|e| anyhow!("{e}"))?;
                // non-string keys fall back to their rendered form
                let key = match k {
                    Value::Str(s) => s.to_owned(),
                    ref other => render(other),
                };
                object.insert(key, to_json(&v)?);
            }
            Json::Object(object)
        }
        Value::Ext { type_code, data } => {
            if type_code == ext_type::UUID && data.len() == ext_type::UUID_LEN {
                let bytes: [u8; 16] = data.try_into().expect("length already checked");
                Json::from(Uuid::from_bytes(bytes).to_string())
            } else {
                Json::from(format!("ext(type={type_code}, {} bytes)", data.len()))
            }
        }
    })
}
