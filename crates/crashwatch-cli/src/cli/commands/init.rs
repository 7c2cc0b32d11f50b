//! `crashwatch init` - write a template bundle.

use anyhow::Result;
use colored::Colorize;
use crashwatch_core::{loader, CredentialBundle};

use super::Context;
use crate::cli::args::InitArgs;

pub async fn execute(ctx: Context, args: InitArgs) -> Result<()> {
    let path = &ctx.bundle_path;
    if path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        );
    }

    loader::save(&CredentialBundle::placeholder(), path)?;

    println!(
        "{} Template written to {}",
        "Success:".green().bold(),
        path.display().to_string().cyan()
    );
    println!();
    println!("Fill in every value, then run `crashwatch check`.");
    println!(
        "PEM blobs may be inline or {}.",
        "{ file = \"device.pem.key\" }".dimmed()
    );
    Ok(())
}
