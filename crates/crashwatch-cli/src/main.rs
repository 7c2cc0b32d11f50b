//! crashwatch - device credential and telemetry tool

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    crashwatch_cli::run().await
}
