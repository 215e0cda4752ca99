//! Error types for padwork-midi.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid MIDI channel: {0}. Must be 0-15")]
    InvalidChannel(u8),

    #[error("Invalid octave range: {0}. Must be 0-4")]
    InvalidOctaveRange(u8),

    #[error("Invalid velocity: {0}. Must be 1-127")]
    InvalidVelocity(u8),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Core(#[from] padwork_core::Error),
}

pub type Result<T> = core::result::Result<T, Error>;
