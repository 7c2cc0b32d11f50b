//! Device telemetry payloads.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TelemetryError};

/// Timestamp layout the firmware publishes. The fraction is mandatory and
/// holds 1 to 6 digits.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S%.f";

const MAX_FRACTION_DIGITS: usize = 6;

/// One sample published by a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub acceleration_x: f64,
    pub acceleration_y: f64,
    pub acceleration_z: f64,
    /// Degrees Celsius
    pub temperature: f64,
    pub latitude: f64,
    pub longitude: f64,
    /// `YYYY/MM/DD HH:MM:SS.ffffff`, device clock (UTC)
    pub timestamp: String,
}

impl Reading {
    /// Parse a JSON payload.
    pub fn from_json(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Milliseconds since the Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns `TelemetryError::Timestamp` unless the timestamp is
    /// `YYYY/MM/DD HH:MM:SS` followed by a dot and 1 to 6 fraction digits.
    pub fn timestamp_millis(&self) -> Result<i64> {
        let invalid = |reason: String| TelemetryError::Timestamp {
            value: self.timestamp.clone(),
            reason,
        };

        let fraction = self
            .timestamp
            .rsplit_once('.')
            .map(|(_, fraction)| fraction)
            .ok_or_else(|| invalid("missing fractional seconds".to_string()))?;
        if fraction.is_empty()
            || fraction.len() > MAX_FRACTION_DIGITS
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid(format!(
                "fractional seconds must be 1 to {MAX_FRACTION_DIGITS} digits"
            )));
        }

        NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT)
            .map(|t| t.and_utc().timestamp_millis())
            .map_err(|e| invalid(e.to_string()))
    }
}
