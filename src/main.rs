//! `enigma`: converts message files with a described rotor machine.
//!
//! **Usage:**
//! ```text
//! enigma <CONFIG> [INPUT] [OUTPUT] [--preserve-spacing] [-v...]
//! ```
//!
//! INPUT defaults to stdin and OUTPUT to stdout. Diagnostics go to stderr.

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use enigma::config::MachineConfig;
use enigma::session::{OutputFormat, Session};

/// Encrypt or decrypt messages with a simulated rotor cipher machine.
#[derive(Parser)]
#[command(name = "enigma", version, about)]
struct Args {
    /// Machine description: alphabet, slot and pawl counts, rotors.
    config: PathBuf,

    /// Settings and message lines (default: stdin).
    input: Option<PathBuf>,

    /// Destination for converted lines (default: stdout).
    output: Option<PathBuf>,

    /// Keep spaces in place instead of writing five-symbol groups.
    #[arg(long)]
    preserve_spacing: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = MachineConfig::load(&args.config)
        .with_context(|| format!("reading machine description {}", args.config.display()))?;
    let machine = config.into_machine().context("building machine")?;

    let format = if args.preserve_spacing {
        OutputFormat::Preserve
    } else {
        OutputFormat::Grouped
    };
    let mut session = Session::new(machine).with_format(format);

    let reader: Box<dyn io::BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening input {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let writer: Box<dyn io::Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating output {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    session.run(reader, writer).context("converting messages")?;
    Ok(())
}
