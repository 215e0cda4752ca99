//! Button commands and the registry that owns them.

mod layer;
mod repeat;
mod track;

pub use layer::{MomentaryModeCommand, ViewToggleCommand};
pub use repeat::NoteRepeatCommand;
pub use track::{StopClipCommand, TrackToggle, TrackToggleCommand};

use std::collections::HashMap;

use padwork_core::compat::Arc;
use tracing::trace;

use crate::context::SurfaceContext;
use crate::control::ControlId;
use crate::error::{Error, Result};
use crate::normalizer::ButtonEvent;
use crate::view::PadColor;

/// Action bound to a button. Receives every phase of the press.
pub trait Command: Send + Sync {
    fn name(&self) -> &str;

    fn execute_normal(&self, ctx: &mut SurfaceContext<'_>, event: &ButtonEvent);

    /// Runs instead of [`execute_normal`](Self::execute_normal) while Shift
    /// is held.
    fn execute_shifted(&self, ctx: &mut SurfaceContext<'_>, event: &ButtonEvent) {
        self.execute_normal(ctx, event);
    }

    /// Button light. `None` leaves it to the active view.
    fn color(&self, _ctx: &SurfaceContext<'_>) -> Option<PadColor> {
        None
    }
}

/// Immutable control -> command table.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<ControlId, Arc<dyn Command>>,
}

impl CommandRegistry {
    pub fn builder() -> CommandRegistryBuilder {
        CommandRegistryBuilder::default()
    }

    pub fn get(&self, control: ControlId) -> Option<&Arc<dyn Command>> {
        self.commands.get(&control)
    }

    pub fn contains(&self, control: ControlId) -> bool {
        self.commands.contains_key(&control)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn controls(&self) -> impl Iterator<Item = ControlId> + '_ {
        self.commands.keys().copied()
    }

    /// Run the command bound to `control`, shifted if Shift is held.
    ///
    /// Returns `false` if nothing is bound.
    pub fn execute(
        &self,
        control: ControlId,
        ctx: &mut SurfaceContext<'_>,
        event: &ButtonEvent,
    ) -> bool {
        let Some(command) = self.commands.get(&control) else {
            return false;
        };
        trace!("{} {:?} -> {}", control, event.phase, command.name());
        if ctx.modifiers.shift {
            command.execute_shifted(ctx, event);
        } else {
            command.execute_normal(ctx, event);
        }
        true
    }
}

#[derive(Default)]
pub struct CommandRegistryBuilder {
    commands: HashMap<ControlId, Arc<dyn Command>>,
    duplicate: Option<ControlId>,
}

impl CommandRegistryBuilder {
    pub fn bind(mut self, control: ControlId, command: impl Command + 'static) -> Self {
        self.bind_arc(control, Arc::new(command));
        self
    }

    pub fn bind_shared(mut self, control: ControlId, command: Arc<dyn Command>) -> Self {
        self.bind_arc(control, command);
        self
    }

    fn bind_arc(&mut self, control: ControlId, command: Arc<dyn Command>) {
        if self.commands.insert(control, command).is_some() && self.duplicate.is_none() {
            self.duplicate = Some(control);
        }
    }

    pub fn build(self) -> Result<CommandRegistry> {
        if let Some(control) = self.duplicate {
            return Err(Error::DuplicateCommand(control));
        }
        Ok(CommandRegistry {
            commands: self.commands,
        })
    }
}
