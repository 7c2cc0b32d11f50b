//! `crashwatch replay` - run recorded readings through the crash detector.

use anyhow::{Context as _, Result};
use colored::Colorize;
use crashwatch_telemetry::{evaluate, CrashDetector, Evaluation, Thresholds, TimeSeriesTarget};
use serde::Serialize;
use tokio::io::AsyncReadExt as _;
use tracing::debug;

use super::Context;
use crate::cli::args::ReplayArgs;
use crate::output::{print_structured, OutputFormat};

#[derive(Debug, Serialize)]
struct LineOutcome {
    line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    evaluation: Option<Evaluation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct ReplaySummary {
    target: TimeSeriesTarget,
    readings: usize,
    records: usize,
    incidents: usize,
    errors: usize,
    lines: Vec<LineOutcome>,
}

pub async fn execute(ctx: Context, args: ReplayArgs) -> Result<()> {
    let input = read_input(&args).await?;

    let defaults = TimeSeriesTarget::default();
    let target = TimeSeriesTarget {
        database: args.database.unwrap_or(defaults.database),
        table: args.table.unwrap_or(defaults.table),
    };
    let mut detector = CrashDetector::new(Thresholds {
        lateral_g: args.lateral_g,
        fire_celsius: args.fire_celsius,
    });

    let lines: Vec<LineOutcome> = input
        .lines()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(idx, text)| match evaluate(&mut detector, text) {
            Ok(evaluation) => LineOutcome {
                line: idx + 1,
                evaluation: Some(evaluation),
                error: None,
            },
            Err(e) => {
                debug!(line = idx + 1, error = %e, "skipping reading");
                LineOutcome {
                    line: idx + 1,
                    evaluation: None,
                    error: Some(e.to_string()),
                }
            }
        })
        .collect();

    let evaluations = || lines.iter().filter_map(|l| l.evaluation.as_ref());
    let summary = ReplaySummary {
        readings: evaluations().count(),
        records: evaluations().map(|e| e.records.len()).sum(),
        incidents: evaluations().filter(|e| e.incident.is_some()).count(),
        errors: lines.iter().filter(|l| l.error.is_some()).count(),
        target,
        lines,
    };

    if ctx.output_format == OutputFormat::Pretty {
        print_pretty(&summary);
        Ok(())
    } else {
        print_structured(ctx.output_format, &summary)
    }
}

async fn read_input(args: &ReplayArgs) -> Result<String> {
    if args.file.as_os_str() == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("Failed to read readings from stdin")?;
        return Ok(buf);
    }
    tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))
}

fn print_pretty(summary: &ReplaySummary) {
    for line in &summary.lines {
        if let Some(error) = &line.error {
            println!("{} line {}: {error}", "Skipped:".yellow().bold(), line.line);
        }
        if let Some(incident) = line.evaluation.as_ref().and_then(|e| e.incident.as_ref()) {
            println!(
                "{} line {}: {}",
                format!("{}:", incident.kind).to_uppercase().red().bold(),
                line.line,
                incident.message()
            );
        }
    }

    println!();
    println!(
        "{} readings, {} records for {}.{}, {} incident(s), {} skipped",
        summary.readings,
        summary.records,
        summary.target.database,
        summary.target.table,
        summary.incidents,
        summary.errors
    );
}
