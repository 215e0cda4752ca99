//! Error types for padwork-control.

use thiserror::Error;

use crate::control::ControlId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Duplicate control id: {0}")]
    DuplicateControl(ControlId),

    #[error("Pad note {0} is assigned to more than one pad")]
    DuplicatePadNote(u8),

    #[error("Knob index {0} is assigned to more than one knob")]
    DuplicateKnob(usize),

    #[error("Invalid grid: {rows}x{cols}")]
    InvalidGrid { rows: usize, cols: usize },

    #[error("Layout has {pads} pads but the grid only holds {capacity}")]
    TooManyPads { pads: usize, capacity: usize },

    #[error("Control {0} already has a command")]
    DuplicateCommand(ControlId),

    #[error("Control {0} is not in the layout")]
    UnknownControl(ControlId),

    #[error("Control {0} is not a button")]
    NotAButton(ControlId),

    #[error(transparent)]
    Core(#[from] padwork_core::Error),
}

pub type Result<T> = core::result::Result<T, Error>;
