/// Implementation of `trellis validate`.
///
/// Walks the stream with the decoder's `skip`, which exercises the full
/// structural checks (markers, lengths, aggregate extents) without
/// materializing payloads. Reports the value count and byte total on
/// success, or the malformed-stream diagnostic with the offset where the
/// walk died.
use std::fs;

use anyhow::{Context, Result, bail};
use trellis_decoder::{DecodeError, Decoder};

use crate::ValidateArgs;

/// Run the `trellis validate` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the stream fails
/// structural validation.
pub fn run(args: &ValidateArgs) -> Result<()> {
    let bytes =
        fs::read(&args.file).with_context(|| format!("cannot read {}", args.file.display()))?;

    let mut decoder = Decoder::new(&bytes);
    let mut count = 0u64;

    loop {
        match decoder.skip() {
            Ok(()) => count += 1,
            Err(DecodeError::StreamExhausted) => break,
            Err(e) => bail!(
                "{} is malformed at offset {}: {e}",
                args.file.display(),
                decoder.position()
            ),
        }
    }

    println!(
        "{}: ok — {count} value{}, {} bytes",
        args.file.display(),
        if count == 1 { "" } else { "s" },
        decoder.position()
    );
    Ok(())
}
