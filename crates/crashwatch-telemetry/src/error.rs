use thiserror::Error;

/// Result type alias for telemetry operations
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Errors raised while processing a device reading
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Payload is not a valid reading
    #[error("invalid payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Timestamp does not follow `YYYY/MM/DD HH:MM:SS.ffffff`
    #[error("invalid timestamp {value:?}: {reason}")]
    Timestamp {
        /// Offending timestamp text
        value: String,
        /// Parser message
        reason: String,
    },
}
