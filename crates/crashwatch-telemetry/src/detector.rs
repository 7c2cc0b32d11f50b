//! Crash and fire detection over a stream of readings.
//!
//! The detector latches on the first alarm so a single event produces a
//! single notification. It re-arms once lateral acceleration and
//! temperature are both back inside their limits.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

use crate::reading::Reading;

/// Alarm limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Absolute lateral (y) acceleration that counts as a crash
    pub lateral_g: f64,
    /// Temperature above which the car is considered on fire, in Celsius
    pub fire_celsius: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            lateral_g: 5.0,
            fire_celsius: 90.0,
        }
    }
}

/// Kind of incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentKind {
    Accident,
    Fire,
}

impl fmt::Display for IncidentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accident => f.write_str("accident"),
            Self::Fire => f.write_str("fire"),
        }
    }
}

/// A detected incident, ready to notify about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub kind: IncidentKind,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: String,
}

impl Incident {
    /// Map link for the incident location.
    pub fn map_link(&self) -> String {
        format!(
            "https://maps.google.com/maps?q={},{}",
            self.latitude, self.longitude
        )
    }

    /// Notification text.
    pub fn message(&self) -> String {
        let what = match self.kind {
            IncidentKind::Accident => "Car accident detected",
            IncidentKind::Fire => "Car on fire detected",
        };
        format!(
            "{what} at time: {}. Location: {}",
            self.timestamp,
            self.map_link()
        )
    }
}

/// Latching crash/fire detector.
#[derive(Debug, Clone, Default)]
pub struct CrashDetector {
    thresholds: Thresholds,
    latched: bool,
}

impl CrashDetector {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            latched: false,
        }
    }

    pub const fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// An incident has fired and not yet cleared.
    pub const fn is_latched(&self) -> bool {
        self.latched
    }

    /// Feed one reading. Returns an incident only on the reading that trips
    /// the latch.
    pub fn observe(&mut self, reading: &Reading) -> Option<Incident> {
        let lateral = reading.acceleration_y;
        let hot = reading.temperature > self.thresholds.fire_celsius;
        let swerved = lateral.abs() > self.thresholds.lateral_g;

        if !self.latched && (swerved || hot) {
            self.latched = true;
            let kind = if hot {
                IncidentKind::Fire
            } else {
                IncidentKind::Accident
            };
            warn!(
                kind = %kind,
                lateral,
                temperature = reading.temperature,
                timestamp = %reading.timestamp,
                "incident detected"
            );
            return Some(Incident {
                kind,
                latitude: reading.latitude,
                longitude: reading.longitude,
                timestamp: reading.timestamp.clone(),
            });
        }

        if self.latched && lateral.abs() < self.thresholds.lateral_g && !hot {
            self.latched = false;
            info!(timestamp = %reading.timestamp, "incident cleared, detector re-armed");
        }

        None
    }
}
