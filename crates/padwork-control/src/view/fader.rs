use padwork_core::TrackParameter;
use tracing::debug;

use super::{PadColor, PadGrid, View, ViewId};
use crate::context::SurfaceContext;
use crate::control::GridGeometry;
use crate::stack::Layer;

/// Each grid column is a fader for one track of the bank page.
pub struct TrackFaderView {
    parameter: TrackParameter,
    geometry: GridGeometry,
    name: String,
}

impl TrackFaderView {
    pub fn new(parameter: TrackParameter, geometry: GridGeometry) -> Self {
        Self {
            parameter,
            geometry,
            name: format!("{} Faders", parameter.label()),
        }
    }

    /// Value set by pressing `row` (0 = bottom).
    fn row_value(&self, row: usize) -> f64 {
        (row + 1) as f64 / self.geometry.rows.max(1) as f64
    }
}

impl Layer for TrackFaderView {
    type Id = ViewId;

    fn id(&self) -> ViewId {
        ViewId::Fader(self.parameter)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl View for TrackFaderView {
    fn draw_grid(&self, ctx: &SurfaceContext<'_>, grid: &mut PadGrid) {
        let bank = ctx.tracks();
        let selected = bank.selected();
        for col in 0..self.geometry.cols {
            let Some(value) = bank
                .exists(col)
                .then(|| self.parameter.get(bank, col))
                .flatten()
            else {
                continue;
            };
            let lit = (value * self.geometry.rows as f64).round() as usize;
            let color = if selected == Some(col) {
                PadColor::Selected
            } else {
                PadColor::On
            };
            for row in 0..lit.min(self.geometry.rows) {
                grid.set_at(row, col, color);
            }
        }
    }

    fn on_grid_note(&self, ctx: &mut SurfaceContext<'_>, pad: usize, velocity: u8) {
        if velocity == 0 {
            return;
        }
        let Some((row, col)) = self.geometry.position(pad) else {
            return;
        };
        let bank = ctx.tracks();
        if col >= bank.page_size() || !bank.exists(col) {
            debug!("{}: no track in column {}", self.name, col);
            return;
        }

        if ctx.modifiers.delete {
            self.parameter.reset(bank, col);
        } else {
            self.parameter.set(bank, col, self.row_value(row));
        }
    }

    /// Long press selects the column's track.
    fn on_grid_long_press(&self, ctx: &mut SurfaceContext<'_>, pad: usize) {
        if let Some((_, col)) = self.geometry.position(pad) {
            if !ctx.tracks().select(col) {
                debug!("{}: cannot select track {}", self.name, col);
            }
        }
    }
}
