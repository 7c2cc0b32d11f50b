//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Manage the credentials a crashwatch device uses to reach AWS IoT Core.
///
/// The bundle holds the thing name, WiFi credentials, the IoT endpoint and
/// three PEM blobs (root CA, device certificate, device private key).
#[derive(Parser, Debug)]
#[command(name = "crashwatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Bundle file (default: credentials.toml in the user config directory)
    #[arg(short, long, env = "CRASHWATCH_BUNDLE", global = true)]
    pub bundle: Option<PathBuf>,

    /// Read the bundle from CRASHWATCH_* environment variables (overrides --bundle)
    #[arg(long, global = true)]
    pub from_env: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a template bundle to fill in by hand
    Init(InitArgs),

    /// Print the bundle with secrets masked
    Show,

    /// Validate every value and the certificate/key pairing
    Check,

    /// Render the ESP32 secrets.h header
    Header(HeaderArgs),

    /// Print the bundle file path
    Path,

    /// Run recorded readings through the crash detector
    Replay(ReplayArgs),
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing bundle file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct HeaderArgs {
    /// Write to this file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// File with one JSON reading per line ("-" for stdin)
    pub file: PathBuf,

    /// Lateral acceleration that counts as a crash
    #[arg(long, default_value_t = 5.0)]
    pub lateral_g: f64,

    /// Temperature (Celsius) that counts as a fire
    #[arg(long, default_value_t = 90.0)]
    pub fire_celsius: f64,

    /// Time-series database the records are meant for
    #[arg(long)]
    pub database: Option<String>,

    /// Time-series table the records are meant for
    #[arg(long)]
    pub table: Option<String>,
}
