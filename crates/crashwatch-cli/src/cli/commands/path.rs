//! `crashwatch path` - print the bundle file path.

use anyhow::Result;

use super::Context;

pub async fn execute(ctx: Context) -> Result<()> {
    println!("{}", ctx.bundle_path.display());
    Ok(())
}
