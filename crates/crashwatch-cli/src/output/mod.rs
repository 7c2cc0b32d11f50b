//! Output formatting for different formats.

use clap::ValueEnum;
use crashwatch_core::armor;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable, with colors
    #[default]
    Pretty,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => anyhow::bail!(
                "Unknown output format: {}\n\
                 Valid formats: pretty, json, yaml",
                s
            ),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// Print `value` as JSON or YAML. Pretty output is left to the caller.
pub fn print_structured<T: Serialize>(format: OutputFormat, value: &T) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
        OutputFormat::Pretty => {}
    }
    Ok(())
}

/// Mask a secret. No part of a set value is ever shown.
pub fn mask_secret(value: &str) -> String {
    if value.is_empty() {
        "(not set)".to_string()
    } else {
        "****".to_string()
    }
}

/// One-line description of a PEM blob that never includes its body.
pub fn describe_pem(value: &str) -> String {
    if value.trim().is_empty() {
        return "(not set)".to_string();
    }
    if armor::is_placeholder(value) {
        return "(placeholder)".to_string();
    }
    let label = value
        .lines()
        .map(str::trim)
        .find_map(|line| {
            line.strip_prefix("-----BEGIN ")
                .and_then(|rest| rest.strip_suffix("-----"))
        })
        .unwrap_or("unarmored text");
    format!("{label} ({} lines)", value.lines().count())
}
