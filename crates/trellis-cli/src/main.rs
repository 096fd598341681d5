/// Trellis command-line tool — inspect, validate, and encode value-stream
/// files in the Trellis wire encoding.
///
/// # Command overview
///
/// ```text
/// trellis <COMMAND> [OPTIONS]
///
/// Commands:
///   inspect    Print each value in a stream file, one line per top-level value
///   validate   Walk a stream file and report its structural health
///   encode     Create a stream file from a JSON document
///   help       Print help information
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                    |
/// |------|--------------------------------------------|
/// | 0    | Success                                    |
/// | 1    | Error (I/O failure, malformed stream, etc.)|
///
/// All error details are written to stderr so stdout can be piped cleanly.
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod cmd_encode;
mod cmd_inspect;
mod cmd_validate;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// The Trellis wire-format command-line tool.
#[derive(Parser)]
#[command(name = "trellis", version, about = "Trellis wire format CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Print each top-level value in a stream file.
    Inspect(InspectArgs),
    /// Walk a stream file and report value count and consumed bytes.
    Validate(ValidateArgs),
    /// Encode a JSON document as a value stream.
    Encode(EncodeArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

#[derive(clap::Args)]
pub struct InspectArgs {
    /// The stream file to inspect.
    pub file: PathBuf,

    /// Render the stream as a JSON array instead of the line format.
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args)]
pub struct ValidateArgs {
    /// The stream file to validate.
    pub file: PathBuf,
}

#[derive(clap::Args)]
pub struct EncodeArgs {
    /// The JSON document to encode.
    pub input: PathBuf,

    /// Output path for the encoded stream.
    #[arg(short, long)]
    pub output: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Inspect(args) => cmd_inspect::run(args),
        Commands::Validate(args) => cmd_validate::run(args),
        Commands::Encode(args) => cmd_encode::run(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
