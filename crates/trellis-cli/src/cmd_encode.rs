/// Implementation of `trellis encode`.
///
/// Reads a JSON document and writes it as one value stream: each JSON
/// value maps onto the closest wire family (null → nil, numbers → the
/// narrowest integer or float64, objects → maps with string keys). A
/// top-level JSON array becomes one encoded array value, not a sequence
/// of top-level values — use the decoder's aggregate reads to traverse it.
use std::fs;

use anyhow::{Context, Result, bail};
use trellis_encoder::Writer;

use crate::EncodeArgs;

/// Run the `trellis encode` command.
///
/// # Errors
///
/// Returns an error if the input is unreadable or not valid JSON, a JSON
/// number is neither an integer nor a finite float, an aggregate exceeds
/// the format's length limits, or the output cannot be written.
pub fn run(args: &EncodeArgs) -> Result<()> {
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;
    let doc: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", args.input.display()))?;

    let mut writer = Writer::new();
    encode_value(&mut writer, &doc)?;

    let bytes = writer.into_bytes();
    fs::write(&args.output, &bytes)
        .with_context(|| format!("cannot write {}", args.output.display()))?;

    println!("{} bytes written to {}", bytes.len(), args.output.display());
    Ok(())
}

fn encode_value(writer: &mut Writer, value: &serde_json::Value) -> Result<()> {
    use serde_json::Value as Json;

    match value {
        Json::Null => {
            writer.write_nil();
        }
        Json::Bool(b) => {
            writer.write_bool(*b);
        }
        Json::Number(n) => {
            if let Some(v) = n.as_i64() {
                writer.write_i64(v);
            } else if let Some(v) = n.as_u64() {
                writer.write_u64(v);
            } else if let Some(v) = n.as_f64() {
                writer.write_f64(v);
            } else {
                bail!("unrepresentable JSON number: {n}");
            }
        }
        Json::String(s) => {
            writer.write_str(s);
        }
        Json::Array(items) => {
            let Ok(len) = u32::try_from(items.len()) else {
                bail!("array of {} elements exceeds the format limit", items.len());
            };
            writer.write_array_header(len);
            for item in items {
                encode_value(writer, item)?;
            }
        }
        Json::Object(entries) => {
            let Ok(len) = u32::try_from(entries.len()) else {
                bail!("object of {} entries exceeds the format limit", entries.len());
            };
            writer.write_map_header(len);
            for (key, val) in entries {
                writer.write_str(key);
                encode_value(writer, val)?;
            }
        }
    }
    Ok(())
}
