use padwork_core::compat::Arc;
use padwork_core::config::keys;
use padwork_core::AtomicFlag;
use tracing::{debug, warn};

use super::Command;
use crate::context::SurfaceContext;
use crate::mode::{Mode, NoteRepeatMode};
use crate::normalizer::ButtonEvent;
use crate::view::PadColor;

/// Normal: toggle note repeat. Shifted: toggle the note-repeat settings mode.
pub struct NoteRepeatCommand {
    settings: Arc<dyn Mode>,
    pushed: AtomicFlag,
}

impl NoteRepeatCommand {
    pub fn new() -> Self {
        Self::with_settings_mode(Arc::new(NoteRepeatMode::new()))
    }

    pub fn with_settings_mode(settings: Arc<dyn Mode>) -> Self {
        Self {
            settings,
            pushed: AtomicFlag::new(false),
        }
    }
}

impl Default for NoteRepeatCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for NoteRepeatCommand {
    fn name(&self) -> &str {
        "Note Repeat"
    }

    fn execute_normal(&self, ctx: &mut SurfaceContext<'_>, event: &ButtonEvent) {
        if !event.is_down() {
            return;
        }
        match ctx.bus.toggle(&keys::NOTE_REPEAT_ACTIVE) {
            Ok(active) => debug!("Note repeat {}", if active { "on" } else { "off" }),
            Err(err) => warn!("Note repeat toggle failed: {}", err),
        }
    }

    fn execute_shifted(&self, ctx: &mut SurfaceContext<'_>, event: &ButtonEvent) {
        if !event.is_down() {
            return;
        }
        let id = self.settings.id();
        if self.pushed.get() && ctx.active_mode() == id {
            ctx.pop_mode_if(id);
            self.pushed.set(false);
        } else {
            self.pushed.set(ctx.push_mode(Arc::clone(&self.settings)));
        }
    }

    fn color(&self, ctx: &SurfaceContext<'_>) -> Option<PadColor> {
        Some(if ctx.bus.get(&keys::NOTE_REPEAT_ACTIVE) {
            PadColor::On
        } else {
            PadColor::Dim
        })
    }
}
