//! Control identities and the data-driven layout of a controller model.

use core::fmt;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Opaque identifier of one physical control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlId(pub u32);

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Shift,
    Delete,
}

/// What a control is, which decides who owns its events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlClass {
    /// Grid pad sending `note`.
    Pad { note: u8 },
    /// Relative encoder.
    Knob { index: usize },
    Button,
    Modifier(Modifier),
}

impl ControlClass {
    #[inline]
    pub fn is_grid(&self) -> bool {
        matches!(self, ControlClass::Pad { .. })
    }
}

/// Pad grid dimensions. Pad 0 is bottom-left, rows fill left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridGeometry {
    pub rows: usize,
    pub cols: usize,
}

impl GridGeometry {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(row, col)` of a pad index.
    #[inline]
    pub fn position(&self, pad: usize) -> Option<(usize, usize)> {
        (pad < self.len()).then(|| (pad / self.cols, pad % self.cols))
    }

    #[inline]
    pub fn pad_at(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self::new(4, 4)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSpec {
    pub id: ControlId,
    pub class: ControlClass,
}

/// Table of controls for one controller model.
///
/// Pads are indexed in ascending note order, so index 0 is the pad with the
/// lowest note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlLayout {
    pub name: String,
    pub grid: GridGeometry,
    pub controls: Vec<ControlSpec>,
}

impl ControlLayout {
    pub fn builder(name: impl Into<String>) -> ControlLayoutBuilder {
        ControlLayoutBuilder {
            layout: ControlLayout {
                name: name.into(),
                grid: GridGeometry::default(),
                controls: Vec::new(),
            },
        }
    }

    /// Check a layout that came from an external loader.
    pub fn validate(&self) -> Result<()> {
        if self.grid.rows == 0 || self.grid.cols == 0 {
            return Err(Error::InvalidGrid {
                rows: self.grid.rows,
                cols: self.grid.cols,
            });
        }

        let mut ids = HashSet::new();
        let mut notes = HashSet::new();
        let mut knobs = HashSet::new();
        for spec in &self.controls {
            if !ids.insert(spec.id) {
                return Err(Error::DuplicateControl(spec.id));
            }
            match spec.class {
                ControlClass::Pad { note } if !notes.insert(note) => {
                    return Err(Error::DuplicatePadNote(note));
                }
                ControlClass::Knob { index } if !knobs.insert(index) => {
                    return Err(Error::DuplicateKnob(index));
                }
                _ => {}
            }
        }

        if notes.len() > self.grid.len() {
            return Err(Error::TooManyPads {
                pads: notes.len(),
                capacity: self.grid.len(),
            });
        }
        Ok(())
    }

    pub fn class_of(&self, id: ControlId) -> Option<ControlClass> {
        self.controls.iter().find(|s| s.id == id).map(|s| s.class)
    }

    pub fn classes(&self) -> HashMap<ControlId, ControlClass> {
        self.controls.iter().map(|s| (s.id, s.class)).collect()
    }

    /// Pad control -> grid index.
    pub fn pad_indices(&self) -> HashMap<ControlId, usize> {
        let mut pads: Vec<(u8, ControlId)> = self
            .controls
            .iter()
            .filter_map(|s| match s.class {
                ControlClass::Pad { note } => Some((note, s.id)),
                _ => None,
            })
            .collect();
        pads.sort_unstable();
        pads.into_iter()
            .enumerate()
            .map(|(index, (_, id))| (id, index))
            .collect()
    }

    /// Note of grid pad 0, if the layout has pads.
    pub fn lowest_pad_note(&self) -> Option<u8> {
        self.controls
            .iter()
            .filter_map(|s| match s.class {
                ControlClass::Pad { note } => Some(note),
                _ => None,
            })
            .min()
    }

    pub fn buttons(&self) -> impl Iterator<Item = ControlId> + '_ {
        self.controls
            .iter()
            .filter(|s| s.class == ControlClass::Button)
            .map(|s| s.id)
    }
}

pub struct ControlLayoutBuilder {
    layout: ControlLayout,
}

impl ControlLayoutBuilder {
    pub fn grid(mut self, rows: usize, cols: usize) -> Self {
        self.layout.grid = GridGeometry::new(rows, cols);
        self
    }

    pub fn control(mut self, id: ControlId, class: ControlClass) -> Self {
        self.layout.controls.push(ControlSpec { id, class });
        self
    }

    pub fn pad(self, id: ControlId, note: u8) -> Self {
        self.control(id, ControlClass::Pad { note })
    }

    /// `count` pads with consecutive ids and notes.
    pub fn pads(mut self, first_id: u32, first_note: u8, count: usize) -> Self {
        for i in 0..count {
            let note = first_note.saturating_add(i as u8);
            self = self.pad(ControlId(first_id + i as u32), note);
        }
        self
    }

    pub fn knob(self, id: ControlId, index: usize) -> Self {
        self.control(id, ControlClass::Knob { index })
    }

    pub fn button(self, id: ControlId) -> Self {
        self.control(id, ControlClass::Button)
    }

    pub fn modifier(self, id: ControlId, modifier: Modifier) -> Self {
        self.control(id, ControlClass::Modifier(modifier))
    }

    pub fn build(self) -> Result<ControlLayout> {
        self.layout.validate()?;
        Ok(self.layout)
    }
}
