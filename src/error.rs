//! Centralized error type for the padwork umbrella crate.
//!
//! Wraps all member-crate errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] padwork_core::Error),

    #[error("MIDI: {0}")]
    Midi(#[from] padwork_midi::Error),

    #[error("Control: {0}")]
    Control(#[from] padwork_control::Error),

    #[error("Session builder is missing a {0}")]
    Incomplete(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
