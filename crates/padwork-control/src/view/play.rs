use std::collections::HashMap;

use padwork_core::compat::Mutex;
use padwork_midi::NoteRepeat;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{PadColor, PadGrid, View, ViewId};
use crate::context::SurfaceContext;
use crate::control::{ControlId, GridGeometry};
use crate::normalizer::ButtonEvent;
use crate::stack::Layer;

pub const MAX_OCTAVE_SHIFT: i8 = 4;

/// Pad -> note mapping of the play view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteLayout {
    /// Note of pad 0 at octave shift 0.
    pub first_note: u8,
    /// Pitch class (0 = C) highlighted on the grid.
    pub root: u8,
    /// Pads per note row. `None` uses the grid width.
    pub row_width: Option<usize>,
    /// Semitones between rows. `None` continues chromatically.
    pub row_interval: Option<u8>,
    pub octave_up: Option<ControlId>,
    pub octave_down: Option<ControlId>,
}

impl NoteLayout {
    pub fn chromatic(first_note: u8) -> Self {
        Self {
            first_note,
            root: first_note % 12,
            row_width: None,
            row_interval: None,
            octave_up: None,
            octave_down: None,
        }
    }

    /// Rows a fourth apart, guitar style.
    pub fn fourths(first_note: u8) -> Self {
        Self {
            row_interval: Some(5),
            ..Self::chromatic(first_note)
        }
    }

    pub fn with_octave_buttons(mut self, up: ControlId, down: ControlId) -> Self {
        self.octave_up = Some(up);
        self.octave_down = Some(down);
        self
    }

    /// Note for `pad`, or `None` if it falls outside 0..=127.
    pub fn note_for(&self, geometry: GridGeometry, pad: usize, octave: i8) -> Option<u8> {
        if pad >= geometry.len() {
            return None;
        }
        let width = self.row_width.unwrap_or(geometry.cols).max(1);
        let interval = self.row_interval.map_or(width as i32, i32::from);
        let (row, col) = (pad / width, pad % width);
        let note = self.first_note as i32
            + 12 * octave as i32
            + row as i32 * interval
            + col as i32;
        u8::try_from(note).ok().filter(|n| *n <= 127)
    }
}

impl Default for NoteLayout {
    fn default() -> Self {
        Self::chromatic(36)
    }
}

#[derive(Debug, Default)]
struct PlayState {
    octave: i8,
    /// Note each sounding pad started, so releases survive octave changes.
    started: HashMap<usize, u8>,
}

/// Pads play notes, through note repeat when it is active.
pub struct PlayView {
    geometry: GridGeometry,
    layout: NoteLayout,
    state: Mutex<PlayState>,
}

impl PlayView {
    pub fn new(geometry: GridGeometry, layout: NoteLayout) -> Self {
        Self {
            geometry,
            layout,
            state: Mutex::new(PlayState::default()),
        }
    }

    pub fn layout(&self) -> &NoteLayout {
        &self.layout
    }

    pub fn octave(&self) -> i8 {
        self.state.lock().octave
    }

    pub fn note_for(&self, pad: usize) -> Option<u8> {
        self.layout.note_for(self.geometry, pad, self.octave())
    }

    fn shift_octave(&self, by: i8) {
        let mut state = self.state.lock();
        let octave = (state.octave + by).clamp(-MAX_OCTAVE_SHIFT, MAX_OCTAVE_SHIFT);
        if self.layout.note_for(self.geometry, 0, octave).is_none() {
            debug!("Octave {} leaves the note range", octave);
            return;
        }
        state.octave = octave;
    }
}

impl Layer for PlayView {
    type Id = ViewId;

    fn id(&self) -> ViewId {
        ViewId::Play
    }

    fn name(&self) -> &str {
        "Play"
    }
}

impl View for PlayView {
    fn draw_grid(&self, _ctx: &SurfaceContext<'_>, grid: &mut PadGrid) {
        let state = self.state.lock();
        for pad in 0..self.geometry.len() {
            let color = match self.layout.note_for(self.geometry, pad, state.octave) {
                None => PadColor::Off,
                Some(_) if state.started.contains_key(&pad) => PadColor::Playing,
                Some(note) if note % 12 == self.layout.root % 12 => PadColor::On,
                Some(_) => PadColor::Dim,
            };
            grid.set(pad, color);
        }
    }

    fn on_grid_note(&self, ctx: &mut SurfaceContext<'_>, pad: usize, velocity: u8) {
        if velocity > 0 {
            let note = {
                let mut state = self.state.lock();
                if state.started.contains_key(&pad) {
                    return;
                }
                let Some(note) = self.layout.note_for(self.geometry, pad, state.octave) else {
                    trace!("Pad {} has no note", pad);
                    return;
                };
                state.started.insert(pad, note);
                note
            };
            ctx.notes.key_down(note, velocity);
        } else {
            let started = self.state.lock().started.remove(&pad);
            match started {
                Some(note) => ctx.notes.key_up(note),
                None => trace!("Release of pad {} that never sounded", pad),
            }
        }
    }

    fn on_button(
        &self,
        _ctx: &mut SurfaceContext<'_>,
        control: ControlId,
        event: &ButtonEvent,
    ) -> bool {
        let by = if Some(control) == self.layout.octave_up {
            1
        } else if Some(control) == self.layout.octave_down {
            -1
        } else {
            return false;
        };
        if event.is_down() {
            self.shift_octave(by);
        }
        true
    }

    /// Pads still down lose their release to the next view: stop them now.
    fn on_deactivate(&self, notes: &NoteRepeat) {
        let started: Vec<u8> = self.state.lock().started.drain().map(|(_, n)| n).collect();
        if !started.is_empty() {
            debug!("Play view covered, releasing {} notes", started.len());
        }
        for note in started {
            notes.key_up(note);
        }
    }

    fn button_color(&self, _ctx: &SurfaceContext<'_>, control: ControlId) -> Option<PadColor> {
        let octave = self.octave();
        let movable = |octave: i8| {
            octave.abs() <= MAX_OCTAVE_SHIFT
                && self.layout.note_for(self.geometry, 0, octave).is_some()
        };
        let can_move = if Some(control) == self.layout.octave_up {
            movable(octave + 1)
        } else if Some(control) == self.layout.octave_down {
            movable(octave - 1)
        } else {
            return None;
        };
        Some(if can_move { PadColor::On } else { PadColor::Dim })
    }
}
