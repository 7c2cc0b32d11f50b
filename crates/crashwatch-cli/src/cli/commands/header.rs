//! `crashwatch header` - render the firmware secrets header.

use anyhow::{Context as _, Result};
use colored::Colorize;
use crashwatch_core::header::render_header;

use super::Context;
use crate::cli::args::HeaderArgs;

pub async fn execute(ctx: Context, args: HeaderArgs) -> Result<()> {
    let bundle = ctx.source.load().await?;
    let header = render_header(&bundle)?;

    match args.out {
        Some(path) => {
            std::fs::write(&path, header)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} Header written to {}",
                "Success:".green().bold(),
                path.display().to_string().cyan()
            );
            eprintln!("Keep it out of version control: it contains the device private key.");
        }
        None => print!("{header}"),
    }
    Ok(())
}
