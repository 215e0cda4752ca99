//! Modes own the knobs and the parameter display.

mod repeat;
mod track;

pub use repeat::NoteRepeatMode;
pub use track::TrackParameterMode;

use padwork_core::TrackParameter;

use crate::context::SurfaceContext;
use crate::stack::{Layer, LayerStack};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeId {
    Track(TrackParameter),
    NoteRepeat,
    Custom(&'static str),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterSlot {
    pub label: String,
    pub value: String,
    /// Position of the value in 0.0..=1.0 for ring/bar displays.
    pub normalized: Option<f64>,
}

/// Text the device shows for the active mode.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterDisplay {
    pub title: String,
    pub slots: Vec<ParameterSlot>,
}

pub trait Mode: Layer<Id = ModeId> {
    fn on_knob(&self, ctx: &mut SurfaceContext<'_>, index: usize, delta: i32);

    fn on_knob_touch(&self, _ctx: &mut SurfaceContext<'_>, _index: usize, _touched: bool) {}

    fn knob_value(&self, ctx: &SurfaceContext<'_>, index: usize) -> Option<f64>;

    fn update_display(&self, ctx: &SurfaceContext<'_>) -> ParameterDisplay;
}

pub type ModeStack = LayerStack<dyn Mode>;
