//! Error types for padwork-core.

use thiserror::Error;

/// Error type for padwork-core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid tempo: {0}. Must be between 20.0 and 999.0 BPM")]
    InvalidTempo(f64),

    #[error("Invalid time signature: {numerator}/{denominator}")]
    InvalidTimeSignature { numerator: u32, denominator: u32 },

    #[error("Unknown resolution: {0}")]
    UnknownResolution(String),

    #[error("Unknown arpeggiator pattern: {0}")]
    UnknownPattern(String),

    #[error("Unknown setting: {0}")]
    UnknownSetting(String),

    #[error("Setting '{key}' expects a {expected} value, got {actual}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Setting '{key}' value {value} out of range ({min}..={max})")]
    OutOfRange {
        key: String,
        value: i32,
        min: i32,
        max: i32,
    },
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
