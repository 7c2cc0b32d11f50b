//! Time-series records derived from a reading.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::reading::Reading;

/// Dimension naming the sensor a measure came from.
pub const SENSOR_DIMENSION: &str = "sensor_type";

/// Where records are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesTarget {
    pub database: String,
    pub table: String,
}

impl Default for TimeSeriesTarget {
    fn default() -> Self {
        Self {
            database: String::from("Car_Database"),
            table: String::from("Car_Table"),
        }
    }
}

/// One measure of one reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MeasureRecord {
    /// `(name, value)` pairs, currently only `sensor_type`
    pub dimensions: Vec<(String, String)>,
    pub measure_name: String,
    /// Value rendered as text
    pub measure_value: String,
    pub measure_value_type: String,
    /// Epoch milliseconds rendered as text
    pub time: String,
}

impl MeasureRecord {
    fn double(sensor: &str, name: &str, value: f64, time: &str) -> Self {
        Self {
            dimensions: vec![(SENSOR_DIMENSION.to_string(), sensor.to_string())],
            measure_name: name.to_string(),
            measure_value: render_double(value),
            measure_value_type: String::from("DOUBLE"),
            time: time.to_string(),
        }
    }

    /// Value of the `sensor_type` dimension.
    pub fn sensor(&self) -> Option<&str> {
        self.dimensions
            .iter()
            .find(|(name, _)| name == SENSOR_DIMENSION)
            .map(|(_, value)| value.as_str())
    }
}

/// Whole values keep a trailing `.0` so `31.0` is stored as `"31.0"`.
fn render_double(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains(['.', 'e']) {
        format!("{text}.0")
    } else {
        text
    }
}

impl Reading {
    /// Acceleration x/y/z and temperature, all stamped with the reading's
    /// time. Location is not stored.
    pub fn records(&self) -> Result<Vec<MeasureRecord>> {
        let time = self.timestamp_millis()?.to_string();
        Ok(vec![
            MeasureRecord::double("accelerometer", "acceleration_x", self.acceleration_x, &time),
            MeasureRecord::double("accelerometer", "acceleration_y", self.acceleration_y, &time),
            MeasureRecord::double("accelerometer", "acceleration_z", self.acceleration_z, &time),
            MeasureRecord::double("temperature", "temperature", self.temperature, &time),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading() -> Reading {
        Reading {
            acceleration_x: 0.5,
            acceleration_y: -6.25,
            acceleration_z: 9.8,
            temperature: 31.0,
            latitude: 53.35,
            longitude: -6.26,
            timestamp: "2024/03/01 12:30:45.250000".into(),
        }
    }

    #[test]
    fn four_measures_per_reading() {
        let records = reading().records().unwrap();
        let names: Vec<_> = records.iter().map(|r| r.measure_name.as_str()).collect();
        assert_eq!(
            names,
            ["acceleration_x", "acceleration_y", "acceleration_z", "temperature"]
        );
        assert!(records.iter().all(|r| r.time == "1709296245250"));
        assert!(records.iter().all(|r| r.measure_value_type == "DOUBLE"));
        assert_eq!(records[1].measure_value, "-6.25");
        assert_eq!(records[3].measure_value, "31.0");
        assert_eq!(records[0].sensor(), Some("accelerometer"));
        assert_eq!(records[3].sensor(), Some("temperature"));
    }

    #[test]
    fn whole_doubles_keep_their_point() {
        assert_eq!(render_double(31.0), "31.0");
        assert_eq!(render_double(-2.0), "-2.0");
        assert_eq!(render_double(0.5), "0.5");
        assert_eq!(render_double(f64::NAN), "NaN");
    }

    #[test]
    fn default_target() {
        let target = TimeSeriesTarget::default();
        assert_eq!(target.database, "Car_Database");
        assert_eq!(target.table, "Car_Table");
    }
}
