use super::{PadGrid, View, ViewId};
use crate::context::SurfaceContext;
use crate::stack::Layer;

/// Pads belong to the device's user mapping; the surface leaves them alone.
#[derive(Debug, Default)]
pub struct UserView;

impl Layer for UserView {
    type Id = ViewId;

    fn id(&self) -> ViewId {
        ViewId::User
    }

    fn name(&self) -> &str {
        "User"
    }
}

impl View for UserView {
    fn draw_grid(&self, _ctx: &SurfaceContext<'_>, _grid: &mut PadGrid) {}

    fn on_grid_note(&self, _ctx: &mut SurfaceContext<'_>, _pad: usize, _velocity: u8) {}
}
