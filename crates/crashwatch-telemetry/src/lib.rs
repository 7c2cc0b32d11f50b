//! Telemetry handling for crashwatch devices.
//!
//! Devices publish a JSON [`Reading`] per sample. Each reading becomes four
//! time-series [`MeasureRecord`]s and is fed through a [`CrashDetector`],
//! which raises at most one [`Incident`] per event.

pub mod detector;
mod error;
pub mod reading;
pub mod records;

use serde::Serialize;

pub use detector::{CrashDetector, Incident, IncidentKind, Thresholds};
pub use error::{Result, TelemetryError};
pub use reading::Reading;
pub use records::{MeasureRecord, TimeSeriesTarget};

/// Outcome of processing one payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub reading: Reading,
    pub records: Vec<MeasureRecord>,
    pub incident: Option<Incident>,
}

/// Parse `payload`, derive its records and run it through `detector`.
///
/// Nothing is fed to the detector if the payload or its timestamp is bad.
pub fn evaluate(detector: &mut CrashDetector, payload: &str) -> Result<Evaluation> {
    let reading = Reading::from_json(payload)?;
    let records = reading.records()?;
    let incident = detector.observe(&reading);
    Ok(Evaluation {
        reading,
        records,
        incident,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_sequence() {
        let mut detector = CrashDetector::default();
        let calm = r#"{"acceleration_x":0,"acceleration_y":0.2,"acceleration_z":9.8,
            "temperature":22,"latitude":1.5,"longitude":2.5,
            "timestamp":"2024/03/01 12:00:00.000000"}"#;
        let crash = r#"{"acceleration_x":0,"acceleration_y":-9.1,"acceleration_z":9.8,
            "temperature":22,"latitude":1.5,"longitude":2.5,
            "timestamp":"2024/03/01 12:00:01.000000"}"#;

        let first = evaluate(&mut detector, calm).unwrap();
        assert_eq!(first.records.len(), 4);
        assert!(first.incident.is_none());

        let second = evaluate(&mut detector, crash).unwrap();
        assert_eq!(second.incident.unwrap().kind, IncidentKind::Accident);
    }

    #[test]
    fn bad_timestamp_leaves_detector_untouched() {
        let mut detector = CrashDetector::default();
        let payload = r#"{"acceleration_x":0,"acceleration_y":-9.1,"acceleration_z":9.8,
            "temperature":22,"latitude":1.5,"longitude":2.5,"timestamp":"yesterday"}"#;
        assert!(evaluate(&mut detector, payload).is_err());
        assert!(!detector.is_latched());
    }
}
