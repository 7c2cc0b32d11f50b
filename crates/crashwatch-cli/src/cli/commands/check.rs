//! `crashwatch check` - validate the bundle before flashing a device.

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use crashwatch_core::validate::{self, BundleReport};
use crashwatch_core::CertificateSummary;
use serde::Serialize;

use super::Context;
use crate::output::{print_structured, OutputFormat};

#[derive(Debug, Serialize)]
struct Problem {
    field: Option<String>,
    error: String,
}

#[derive(Debug, Serialize)]
struct CheckOutcome<'a> {
    ok: bool,
    problems: Vec<Problem>,
    expired: Vec<String>,
    report: Option<&'a BundleReport>,
}

pub async fn execute(ctx: Context) -> Result<()> {
    let bundle = ctx.source.load().await?;

    let problems: Vec<Problem> = validate::diagnose(&bundle)
        .into_iter()
        .map(|e| Problem {
            field: e.field().map(|f| f.to_string()),
            error: e.to_string(),
        })
        .collect();
    let report = if problems.is_empty() {
        Some(validate::validate(&bundle)?)
    } else {
        None
    };
    let expired: Vec<String> = report
        .as_ref()
        .map(|r| {
            r.expired_certificates(Utc::now())
                .into_iter()
                .map(|c| c.field.to_string())
                .collect()
        })
        .unwrap_or_default();

    let outcome = CheckOutcome {
        ok: problems.is_empty(),
        problems,
        expired,
        report: report.as_ref(),
    };

    if ctx.output_format == OutputFormat::Pretty {
        print_pretty(&outcome, ctx.verbose);
    } else {
        print_structured(ctx.output_format, &outcome)?;
    }

    if !outcome.ok {
        anyhow::bail!(
            "{} problem(s) found in bundle from {}",
            outcome.problems.len(),
            ctx.source
        );
    }
    Ok(())
}

fn print_pretty(outcome: &CheckOutcome<'_>, verbose: bool) {
    if let Some(report) = outcome.report {
        println!("{} Bundle is usable.", "OK:".green().bold());
        println!();
        println!("  {:<20} {}", "thing_name:".bold(), report.thing_name);
        println!("  {:<20} {}", "endpoint:".bold(), report.endpoint.host());
        if let Some(region) = report.endpoint.aws_region() {
            let ats = if report.endpoint.is_ats() { " (ATS)" } else { "" };
            println!("  {:<20} {region}{ats}", "region:".bold());
        }
        print_certificate("root_ca:", &report.root_ca, verbose);
        print_certificate("device_certificate:", &report.device_certificate, verbose);
        println!(
            "  {:<20} {} ({}), matches device certificate",
            "private_key:".bold(),
            report.key_algorithm,
            report.key_encoding.label()
        );
        for field in &outcome.expired {
            println!();
            println!(
                "{} {field} is outside its validity window.",
                "Warning:".yellow().bold()
            );
        }
        return;
    }

    println!("{} {} problem(s):", "Error:".red().bold(), outcome.problems.len());
    println!();
    for problem in &outcome.problems {
        let field = problem.field.as_deref().unwrap_or("bundle");
        println!("  {} {}", format!("{field}:").bold(), problem.error);
    }
}

fn print_certificate(label: &str, cert: &CertificateSummary, verbose: bool) {
    println!("  {:<20} {}", label.bold(), cert.subject);
    println!("  {:<20} issued by {}", "", cert.issuer);
    println!(
        "  {:<20} valid {} to {}",
        "",
        cert.not_before.format("%Y-%m-%d"),
        cert.not_after.format("%Y-%m-%d")
    );
    if verbose {
        println!("  {:<20} serial {}", "", cert.serial);
        println!("  {:<20} sha256 {}", "", cert.fingerprint.dimmed());
        println!("  {:<20} key {}", "", cert.key_algorithm);
    }
}
