//! Commands that push and pop layers.
//!
//! The stacks only refuse a push of the layer already on top. A command that
//! pops on release therefore remembers whether its own press pushed, so a
//! rapid re-press can never pop a layer someone else put there.

use padwork_core::compat::Arc;
use padwork_core::AtomicFlag;

use super::Command;
use crate::context::SurfaceContext;
use crate::mode::Mode;
use crate::normalizer::{ButtonEvent, ButtonPhase};
use crate::view::{PadColor, View};

/// DOWN toggles the view. Held into a long press, the view becomes a
/// momentary overlay that goes away on release.
pub struct ViewToggleCommand {
    view: Arc<dyn View>,
    pushed: AtomicFlag,
    temporary: AtomicFlag,
}

impl ViewToggleCommand {
    pub fn new(view: Arc<dyn View>) -> Self {
        Self {
            view,
            pushed: AtomicFlag::new(false),
            temporary: AtomicFlag::new(false),
        }
    }
}

impl Command for ViewToggleCommand {
    fn name(&self) -> &str {
        self.view.name()
    }

    fn execute_normal(&self, ctx: &mut SurfaceContext<'_>, event: &ButtonEvent) {
        let id = self.view.id();
        match event.phase {
            ButtonPhase::Down => {
                self.temporary.set(false);
                if self.pushed.get() && ctx.active_view() == id {
                    ctx.pop_view_if(id);
                    self.pushed.set(false);
                } else {
                    self.pushed.set(ctx.push_view(Arc::clone(&self.view)));
                }
            }
            ButtonPhase::Long => {
                if self.pushed.get() {
                    self.temporary.set(true);
                }
            }
            ButtonPhase::Up => {
                if self.temporary.swap(false) && self.pushed.swap(false) {
                    ctx.pop_view_if(id);
                }
            }
        }
    }

    fn color(&self, ctx: &SurfaceContext<'_>) -> Option<PadColor> {
        Some(if ctx.active_view() == self.view.id() {
            PadColor::On
        } else {
            PadColor::Dim
        })
    }
}

/// Mode active only while the button is held.
pub struct MomentaryModeCommand {
    mode: Arc<dyn Mode>,
    pushed: AtomicFlag,
}

impl MomentaryModeCommand {
    pub fn new(mode: Arc<dyn Mode>) -> Self {
        Self {
            mode,
            pushed: AtomicFlag::new(false),
        }
    }
}

impl Command for MomentaryModeCommand {
    fn name(&self) -> &str {
        self.mode.name()
    }

    fn execute_normal(&self, ctx: &mut SurfaceContext<'_>, event: &ButtonEvent) {
        match event.phase {
            ButtonPhase::Down => {
                if !self.pushed.get() {
                    self.pushed.set(ctx.push_mode(Arc::clone(&self.mode)));
                }
            }
            ButtonPhase::Long => {}
            ButtonPhase::Up => {
                if self.pushed.swap(false) {
                    ctx.pop_mode_if(self.mode.id());
                }
            }
        }
    }

    fn color(&self, ctx: &SurfaceContext<'_>) -> Option<PadColor> {
        Some(if ctx.active_mode() == self.mode.id() {
            PadColor::On
        } else {
            PadColor::Dim
        })
    }
}
