//! What handlers get to touch while they run.

use padwork_core::compat::Arc;
use padwork_core::config::keys;
use padwork_core::{ConfigBus, HostModel, TrackBank};
use padwork_midi::NoteRepeat;

use crate::control::Modifier;
use crate::mode::{Mode, ModeId, ModeStack};
use crate::view::{self, View, ViewId, ViewStack};

/// Held state of the modifier controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModifierState {
    pub shift: bool,
    pub delete: bool,
}

impl ModifierState {
    pub fn set(&mut self, modifier: Modifier, held: bool) {
        match modifier {
            Modifier::Shift => self.shift = held,
            Modifier::Delete => self.delete = held,
        }
    }

    pub fn is_held(&self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Shift => self.shift,
            Modifier::Delete => self.delete,
        }
    }
}

/// Shared collaborators of one controller session.
#[derive(Clone)]
pub struct SurfaceEnv {
    pub host: Arc<dyn HostModel>,
    pub bus: Arc<ConfigBus>,
    pub notes: Arc<NoteRepeat>,
}

/// Handler context. Borrowed for the duration of one event.
pub struct SurfaceContext<'a> {
    pub host: &'a dyn HostModel,
    pub bus: &'a ConfigBus,
    pub notes: &'a NoteRepeat,
    pub modifiers: ModifierState,
    modes: &'a mut ModeStack,
    views: &'a mut ViewStack,
}

impl<'a> SurfaceContext<'a> {
    pub(crate) fn new(
        env: &'a SurfaceEnv,
        modifiers: ModifierState,
        modes: &'a mut ModeStack,
        views: &'a mut ViewStack,
    ) -> Self {
        Self {
            host: &*env.host,
            bus: &env.bus,
            notes: &env.notes,
            modifiers,
            modes,
            views,
        }
    }

    #[inline]
    pub fn tracks(&self) -> &'a dyn TrackBank {
        self.host.tracks()
    }

    pub fn active_mode(&self) -> ModeId {
        self.modes.active_id()
    }

    pub fn push_mode(&mut self, mode: Arc<dyn Mode>) -> bool {
        self.modes.push(mode)
    }

    pub fn pop_mode(&mut self) -> bool {
        self.modes.pop().is_some()
    }

    pub fn pop_mode_if(&mut self, id: ModeId) -> bool {
        self.modes.pop_if(id).is_some()
    }

    pub fn active_view(&self) -> ViewId {
        self.views.active_id()
    }

    pub fn push_view(&mut self, view: Arc<dyn View>) -> bool {
        view::push_view(&mut *self.views, view, self.notes)
    }

    pub fn pop_view(&mut self) -> bool {
        view::pop_view(&mut *self.views, None, self.notes)
    }

    pub fn pop_view_if(&mut self, id: ViewId) -> bool {
        view::pop_view(&mut *self.views, Some(id), self.notes)
    }

    /// Knob speed in percent: slow while Shift is held.
    pub fn knob_speed(&self) -> i32 {
        if self.modifiers.shift {
            self.bus.get(&keys::KNOB_SPEED_SLOW)
        } else {
            self.bus.get(&keys::KNOB_SPEED_NORMAL)
        }
    }

    /// Normalized change for an encoder delta: one detent at full speed is
    /// 1/127 of the range.
    pub fn knob_increment(&self, delta: i32) -> f64 {
        delta as f64 * self.knob_speed() as f64 / 100.0 / 127.0
    }
}
