//! Decides which handler owns each control event.
//!
//! - pads go to the active view
//! - knobs go to the active mode
//! - modifiers update the held-modifier state
//! - buttons go to their command, else to the active view, else are dropped

use std::collections::HashMap;

use padwork_core::compat::Arc;
use padwork_core::Counter;
use tracing::debug;

use crate::command::CommandRegistry;
use crate::context::{ModifierState, SurfaceContext, SurfaceEnv};
use crate::control::{ControlClass, ControlId, GridGeometry};
use crate::mode::{Mode, ModeId, ModeStack, ParameterDisplay};
use crate::normalizer::{ButtonPhase, ControlEvent, ControlInput};
use crate::view::{self, PadColor, PadGrid, View, ViewId, ViewStack};

/// Who handled an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Routed {
    View,
    Mode,
    Command,
    Modifier,
    Dropped,
}

#[derive(Debug, Default)]
pub struct RouterStats {
    pub routed: Counter,
    pub dropped: Counter,
}

/// Everything the device needs to redraw, taken from the active layers only.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceState {
    pub mode: ModeId,
    pub view: ViewId,
    pub display: ParameterDisplay,
    pub grid: PadGrid,
    pub buttons: Vec<(ControlId, PadColor)>,
}

pub struct Router {
    modes: ModeStack,
    views: ViewStack,
    modifiers: ModifierState,
    registry: CommandRegistry,
    pads: HashMap<ControlId, usize>,
    stats: RouterStats,
}

impl Router {
    pub fn new(
        registry: CommandRegistry,
        pads: HashMap<ControlId, usize>,
        default_mode: Arc<dyn Mode>,
        default_view: Arc<dyn View>,
    ) -> Self {
        Self {
            modes: ModeStack::new(default_mode),
            views: ViewStack::new(default_view),
            modifiers: ModifierState::default(),
            registry,
            pads,
            stats: RouterStats::default(),
        }
    }

    pub fn route(&mut self, event: &ControlEvent, env: &SurfaceEnv) -> Routed {
        let routed = match (event.class, event.input) {
            (ControlClass::Modifier(modifier), ControlInput::Button(button)) => {
                match button.phase {
                    ButtonPhase::Down => self.modifiers.set(modifier, true),
                    ButtonPhase::Up => self.modifiers.set(modifier, false),
                    ButtonPhase::Long => {}
                }
                Routed::Modifier
            }

            (ControlClass::Pad { .. }, ControlInput::Button(button)) => {
                match self.pads.get(&event.control).copied() {
                    Some(pad) => {
                        let view = Arc::clone(self.views.active());
                        let mut ctx = SurfaceContext::new(
                            env,
                            self.modifiers,
                            &mut self.modes,
                            &mut self.views,
                        );
                        match button.phase {
                            ButtonPhase::Down => view.on_grid_note(&mut ctx, pad, button.velocity),
                            ButtonPhase::Long => view.on_grid_long_press(&mut ctx, pad),
                            ButtonPhase::Up => view.on_grid_note(&mut ctx, pad, 0),
                        }
                        Routed::View
                    }
                    None => Routed::Dropped,
                }
            }

            (ControlClass::Knob { index }, input) => {
                let mode = Arc::clone(self.modes.active());
                let mut ctx =
                    SurfaceContext::new(env, self.modifiers, &mut self.modes, &mut self.views);
                match input {
                    ControlInput::Knob { delta } => mode.on_knob(&mut ctx, index, delta),
                    ControlInput::Button(button) => match button.phase {
                        ButtonPhase::Down => mode.on_knob_touch(&mut ctx, index, true),
                        ButtonPhase::Up => mode.on_knob_touch(&mut ctx, index, false),
                        ButtonPhase::Long => {}
                    },
                }
                Routed::Mode
            }

            (ControlClass::Button, ControlInput::Button(button)) => {
                let view = Arc::clone(self.views.active());
                let mut ctx =
                    SurfaceContext::new(env, self.modifiers, &mut self.modes, &mut self.views);
                if self.registry.execute(event.control, &mut ctx, &button) {
                    Routed::Command
                } else if view.on_button(&mut ctx, event.control, &button) {
                    Routed::View
                } else {
                    Routed::Dropped
                }
            }

            _ => Routed::Dropped,
        };

        if routed == Routed::Dropped {
            self.stats.dropped.incr();
            debug!("No handler for {:?} on {}", event.input, event.control);
        } else {
            self.stats.routed.incr();
        }
        routed
    }

    /// Ask the active mode and view for their current output.
    pub fn refresh(
        &mut self,
        env: &SurfaceEnv,
        geometry: GridGeometry,
        buttons: &[ControlId],
    ) -> SurfaceState {
        let mode = Arc::clone(self.modes.active());
        let view = Arc::clone(self.views.active());
        let ctx = SurfaceContext::new(env, self.modifiers, &mut self.modes, &mut self.views);

        let mut grid = PadGrid::new(geometry);
        view.draw_grid(&ctx, &mut grid);

        let buttons = buttons
            .iter()
            .map(|&control| {
                let color = self
                    .registry
                    .get(control)
                    .and_then(|command| command.color(&ctx))
                    .or_else(|| view.button_color(&ctx, control))
                    .unwrap_or_default();
                (control, color)
            })
            .collect();

        SurfaceState {
            mode: mode.id(),
            view: view.id(),
            display: mode.update_display(&ctx),
            grid,
            buttons,
        }
    }

    /// Current value of knob `index` in the active mode.
    pub fn knob_value(&mut self, env: &SurfaceEnv, index: usize) -> Option<f64> {
        let mode = Arc::clone(self.modes.active());
        let ctx = SurfaceContext::new(env, self.modifiers, &mut self.modes, &mut self.views);
        mode.knob_value(&ctx, index)
    }

    pub fn push_mode(&mut self, mode: Arc<dyn Mode>) -> bool {
        self.modes.push(mode)
    }

    pub fn pop_mode(&mut self) -> bool {
        self.modes.pop().is_some()
    }

    pub fn push_view(&mut self, view: Arc<dyn View>, env: &SurfaceEnv) -> bool {
        view::push_view(&mut self.views, view, &env.notes)
    }

    pub fn pop_view(&mut self, env: &SurfaceEnv) -> bool {
        view::pop_view(&mut self.views, None, &env.notes)
    }

    pub fn active_mode(&self) -> ModeId {
        self.modes.active_id()
    }

    pub fn active_view(&self) -> ViewId {
        self.views.active_id()
    }

    pub fn mode_ids(&self) -> Vec<ModeId> {
        self.modes.ids()
    }

    pub fn view_ids(&self) -> Vec<ViewId> {
        self.views.ids()
    }

    pub fn modifiers(&self) -> ModifierState {
        self.modifiers
    }

    /// Release all modifiers (focus loss, teardown).
    pub fn clear_modifiers(&mut self) {
        self.modifiers = ModifierState::default();
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn stats(&self) -> &RouterStats {
        &self.stats
    }
}
