//! Views own the pad grid and the buttons no command claims.

mod fader;
mod play;
mod user;

pub use fader::TrackFaderView;
pub use play::{NoteLayout, PlayView};
pub use user::UserView;

use padwork_core::compat::Arc;
use padwork_core::TrackParameter;
use padwork_midi::NoteRepeat;

use crate::context::SurfaceContext;
use crate::control::{ControlId, GridGeometry};
use crate::normalizer::ButtonEvent;
use crate::stack::{Layer, LayerStack};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewId {
    Play,
    Fader(TrackParameter),
    User,
    Custom(&'static str),
}

/// Semantic pad/button colour. Mapping to a device palette happens outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PadColor {
    #[default]
    Off,
    Dim,
    On,
    Selected,
    Playing,
    Muted,
    Soloed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PadGrid {
    geometry: GridGeometry,
    pads: Vec<PadColor>,
}

impl PadGrid {
    pub fn new(geometry: GridGeometry) -> Self {
        Self {
            geometry,
            pads: vec![PadColor::Off; geometry.len()],
        }
    }

    pub fn geometry(&self) -> GridGeometry {
        self.geometry
    }

    /// Out-of-range pads are ignored.
    pub fn set(&mut self, pad: usize, color: PadColor) {
        if let Some(slot) = self.pads.get_mut(pad) {
            *slot = color;
        }
    }

    pub fn set_at(&mut self, row: usize, col: usize, color: PadColor) {
        if let Some(pad) = self.geometry.pad_at(row, col) {
            self.set(pad, color);
        }
    }

    pub fn get(&self, pad: usize) -> PadColor {
        self.pads.get(pad).copied().unwrap_or_default()
    }

    pub fn colors(&self) -> &[PadColor] {
        &self.pads
    }

    pub fn fill(&mut self, color: PadColor) {
        self.pads.fill(color);
    }
}

pub trait View: Layer<Id = ViewId> {
    fn draw_grid(&self, ctx: &SurfaceContext<'_>, grid: &mut PadGrid);

    /// Pad press (`velocity > 0`) or release (`velocity == 0`).
    fn on_grid_note(&self, ctx: &mut SurfaceContext<'_>, pad: usize, velocity: u8);

    fn on_grid_long_press(&self, _ctx: &mut SurfaceContext<'_>, _pad: usize) {}

    /// Buttons without a command. Returns `false` if the view ignores it.
    fn on_button(
        &self,
        _ctx: &mut SurfaceContext<'_>,
        _control: ControlId,
        _event: &ButtonEvent,
    ) -> bool {
        false
    }

    fn button_color(&self, _ctx: &SurfaceContext<'_>, _control: ControlId) -> Option<PadColor> {
        None
    }

    /// The view became the top of the stack.
    fn on_activate(&self, _notes: &NoteRepeat) {}

    /// Another view covered this one, or it was popped. Pad releases from
    /// here on reach a different view.
    fn on_deactivate(&self, _notes: &NoteRepeat) {}
}

pub type ViewStack = LayerStack<dyn View>;

/// Push `view`, running the covered and new views' hooks.
pub(crate) fn push_view(views: &mut ViewStack, view: Arc<dyn View>, notes: &NoteRepeat) -> bool {
    let covered = Arc::clone(views.active());
    if !views.push(view) {
        return false;
    }
    covered.on_deactivate(notes);
    views.active().on_activate(notes);
    true
}

/// Pop the active view (only if it is `id`, when given) and run the hooks.
pub(crate) fn pop_view(views: &mut ViewStack, id: Option<ViewId>, notes: &NoteRepeat) -> bool {
    let popped = match id {
        Some(id) => views.pop_if(id),
        None => views.pop(),
    };
    let Some(popped) = popped else {
        return false;
    };
    popped.on_deactivate(notes);
    views.active().on_activate(notes);
    true
}
