//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use tracing::Level;

use crate::config::{self, BundleSource};

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.no_color);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let bundle_path = config::resolve_bundle_path(cli.bundle)?;
    let source = if cli.from_env {
        BundleSource::Environment
    } else {
        BundleSource::File(bundle_path.clone())
    };

    let ctx = commands::Context {
        source,
        bundle_path,
        output_format: cli.output.unwrap_or_default(),
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Init(args) => commands::init::execute(ctx, args).await,
        Commands::Show => commands::show::execute(ctx).await,
        Commands::Check => commands::check::execute(ctx).await,
        Commands::Header(args) => commands::header::execute(ctx, args).await,
        Commands::Path => commands::path::execute(ctx).await,
        Commands::Replay(args) => commands::replay::execute(ctx, args).await,
    }
}

/// Log to stderr so structured output on stdout stays clean.
fn init_tracing(verbose: bool, no_color: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false)
        .try_init();
}
