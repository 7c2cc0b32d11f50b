//! Command implementations.

pub mod check;
pub mod header;
pub mod init;
pub mod path;
pub mod replay;
pub mod show;

use std::path::PathBuf;

use crate::config::BundleSource;
use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Where the bundle is read from
    pub source: BundleSource,
    /// Bundle file path, even when reading from the environment
    pub bundle_path: PathBuf,
    /// Output format
    pub output_format: OutputFormat,
    /// Verbose mode
    pub verbose: bool,
}
