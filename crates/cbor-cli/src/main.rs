/// Command-line tool for inspecting and converting binary item streams.
///
/// # Command overview
///
/// ```text
/// cbor <COMMAND> [OPTIONS]
///
/// Commands:
///   decode     Re-serialize every item as JSON
///   inspect    Print the decoder's event stream with byte offsets
///   validate   Check that the input decodes cleanly
///   stats      Print item, container and scalar counts
///   help       Print help information
///
/// Global options:
///   -v, --verbose    Log decoder diagnostics (debug level)
///   -h, --help       Print help
///   -V, --version    Print version
/// ```
///
/// Every command takes a file path, or `-` for stdin. `RUST_LOG` overrides
/// the log filter chosen by `--verbose`.
///
/// # Exit codes
///
/// | Code | Meaning                                   |
/// |------|-------------------------------------------|
/// | 0    | Success                                   |
/// | 1    | Error (I/O failure, malformed input, etc.)|
///
/// All error details are written to stderr so stdout can be piped cleanly.
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

mod cmd_decode;
mod cmd_inspect;
mod cmd_stats;
mod cmd_validate;
mod input;
mod summary;

// ── CLI root ──────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "cbor", version, about = "Streaming binary item decoder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log decoder diagnostics (unrecognized tags, container open/close).
    #[arg(short, long, global = true)]
    verbose: bool,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Re-serialize every item as JSON.
    Decode(DecodeArgs),
    /// Print the event stream with byte offsets.
    Inspect(InspectArgs),
    /// Check that the input decodes cleanly.
    Validate(ValidateArgs),
    /// Print item, container and scalar counts.
    Stats(StatsArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `cbor decode`.
///
/// ```text
/// ┌───────────────┬──────────────────────────────────────────────────┐
/// │ Flag          │ Effect                                           │
/// ├───────────────┼──────────────────────────────────────────────────┤
/// │ --pretty      │ indented output instead of one line per item     │
/// │ --bytes F     │ base64url (default) | base64 | base16            │
/// │ --max-depth N │ nesting limit (default 1024)                     │
/// │ -o / --output │ write to file instead of stdout                  │
/// └───────────────┴──────────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct DecodeArgs {
    /// Input file, or `-` for stdin.
    pub file: PathBuf,

    /// Indent the output.
    #[arg(long)]
    pub pretty: bool,

    /// Encoding for untagged byte strings.
    #[arg(long, value_enum, default_value_t = BytesFormat::Base64url)]
    pub bytes: BytesFormat,

    /// Maximum container nesting depth.
    #[arg(long, default_value_t = cbor_decoder::options::DEFAULT_MAX_NESTING_DEPTH)]
    pub max_depth: usize,

    /// Write JSON to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `cbor inspect`.
#[derive(clap::Args)]
pub struct InspectArgs {
    /// Input file, or `-` for stdin.
    pub file: PathBuf,

    /// Maximum container nesting depth.
    #[arg(long, default_value_t = cbor_decoder::options::DEFAULT_MAX_NESTING_DEPTH)]
    pub max_depth: usize,
}

/// Arguments for `cbor validate`.
#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Input file, or `-` for stdin.
    pub file: PathBuf,

    /// Require exactly one top-level item.
    #[arg(long)]
    pub single: bool,

    /// Maximum container nesting depth.
    #[arg(long, default_value_t = cbor_decoder::options::DEFAULT_MAX_NESTING_DEPTH)]
    pub max_depth: usize,
}

/// Arguments for `cbor stats`.
#[derive(clap::Args)]
pub struct StatsArgs {
    /// Input file, or `-` for stdin.
    pub file: PathBuf,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Byte-string encodings selectable on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum BytesFormat {
    Base64url,
    Base64,
    Base16,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = match cli.command {
        Commands::Decode(args) => cmd_decode::run(&args),
        Commands::Inspect(args) => cmd_inspect::run(&args),
        Commands::Validate(args) => cmd_validate::run(&args),
        Commands::Stats(args) => cmd_stats::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
