//! One controller model wired up: layout, normalizer and router.

use padwork_core::compat::Arc;
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::command::CommandRegistry;
use crate::context::{ModifierState, SurfaceEnv};
use crate::control::{ControlClass, ControlId, ControlLayout};
use crate::error::{Error, Result};
use crate::mode::{Mode, ModeId, TrackParameterMode};
use crate::normalizer::{
    ControlEvent, EventNormalizer, NormalizerStats, RawSignal, DEFAULT_LONG_PRESS_MS,
};
use crate::router::{Routed, Router, RouterStats, SurfaceState};
use crate::view::{NoteLayout, PlayView, View, ViewId};

pub struct Surface {
    layout: ControlLayout,
    normalizer: EventNormalizer,
    router: Router,
    env: SurfaceEnv,
    buttons: Vec<ControlId>,
}

impl Surface {
    pub fn builder(layout: ControlLayout, env: SurfaceEnv) -> SurfaceBuilder {
        SurfaceBuilder {
            layout,
            env,
            registry: None,
            default_mode: None,
            default_view: None,
            long_press_ms: DEFAULT_LONG_PRESS_MS,
        }
    }

    /// Normalize one raw signal and route the result, if any.
    ///
    /// Long presses due by `now_ms` are routed first, so a late release still
    /// follows its LONG.
    pub fn ingest(
        &mut self,
        control: ControlId,
        signal: RawSignal,
        now_ms: u64,
    ) -> Option<Routed> {
        self.poll(now_ms);
        let event = self.normalizer.ingest(control, signal, now_ms)?;
        Some(self.router.route(&event, &self.env))
    }

    /// Route the long presses due at `now_ms`. Returns how many fired.
    pub fn poll(&mut self, now_ms: u64) -> usize {
        let due: SmallVec<[ControlEvent; 4]> = self.normalizer.poll(now_ms);
        for event in &due {
            self.router.route(event, &self.env);
        }
        due.len()
    }

    /// Route an already-normalized event.
    pub fn handle(&mut self, event: &ControlEvent) -> Routed {
        self.router.route(event, &self.env)
    }

    /// Colors and display text for the current layers.
    pub fn refresh(&mut self) -> SurfaceState {
        self.router.refresh(&self.env, self.layout.grid, &self.buttons)
    }

    pub fn knob_value(&mut self, index: usize) -> Option<f64> {
        self.router.knob_value(&self.env, index)
    }

    pub fn push_mode(&mut self, mode: Arc<dyn Mode>) -> bool {
        self.router.push_mode(mode)
    }

    pub fn pop_mode(&mut self) -> bool {
        self.router.pop_mode()
    }

    pub fn push_view(&mut self, view: Arc<dyn View>) -> bool {
        self.router.push_view(view, &self.env)
    }

    pub fn pop_view(&mut self) -> bool {
        self.router.pop_view(&self.env)
    }

    pub fn active_mode(&self) -> ModeId {
        self.router.active_mode()
    }

    pub fn active_view(&self) -> ViewId {
        self.router.active_view()
    }

    pub fn mode_ids(&self) -> Vec<ModeId> {
        self.router.mode_ids()
    }

    pub fn view_ids(&self) -> Vec<ViewId> {
        self.router.view_ids()
    }

    pub fn modifiers(&self) -> ModifierState {
        self.router.modifiers()
    }

    pub fn is_pressed(&self, control: ControlId) -> bool {
        self.normalizer.is_pressed(control)
    }

    pub fn layout(&self) -> &ControlLayout {
        &self.layout
    }

    pub fn env(&self) -> &SurfaceEnv {
        &self.env
    }

    pub fn normalizer_stats(&self) -> &NormalizerStats {
        self.normalizer.stats()
    }

    pub fn router_stats(&self) -> &RouterStats {
        self.router.stats()
    }

    /// Forget held controls and modifiers without emitting releases.
    pub fn reset(&mut self) {
        self.normalizer.reset();
        self.router.clear_modifiers();
    }
}

pub struct SurfaceBuilder {
    layout: ControlLayout,
    env: SurfaceEnv,
    registry: Option<CommandRegistry>,
    default_mode: Option<Arc<dyn Mode>>,
    default_view: Option<Arc<dyn View>>,
    long_press_ms: u64,
}

impl SurfaceBuilder {
    pub fn commands(mut self, registry: CommandRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Bottom of the mode stack. Defaults to track volume.
    pub fn default_mode(mut self, mode: Arc<dyn Mode>) -> Self {
        self.default_mode = Some(mode);
        self
    }

    /// Bottom of the view stack. Defaults to a chromatic play view.
    pub fn default_view(mut self, view: Arc<dyn View>) -> Self {
        self.default_view = Some(view);
        self
    }

    pub fn long_press_ms(mut self, ms: u64) -> Self {
        self.long_press_ms = ms;
        self
    }

    pub fn build(self) -> Result<Surface> {
        self.layout.validate()?;
        let registry = self.registry.unwrap_or_default();

        for control in registry.controls() {
            match self.layout.class_of(control) {
                Some(ControlClass::Button) => {}
                Some(_) => return Err(Error::NotAButton(control)),
                None => return Err(Error::UnknownControl(control)),
            }
        }

        let grid = self.layout.grid;
        let default_mode = self
            .default_mode
            .unwrap_or_else(|| Arc::new(TrackParameterMode::volume()));
        let default_view = self.default_view.unwrap_or_else(|| {
            let note_layout = self
                .layout
                .lowest_pad_note()
                .map_or_else(NoteLayout::default, NoteLayout::chromatic);
            Arc::new(PlayView::new(grid, note_layout))
        });

        let mut buttons: Vec<ControlId> = self.layout.buttons().collect();
        buttons.sort();

        info!(
            "Surface '{}': {} controls, {} commands, {}x{} grid",
            self.layout.name,
            self.layout.controls.len(),
            registry.len(),
            grid.rows,
            grid.cols
        );
        debug!(
            "Default layers: mode {:?}, view {:?}",
            default_mode.id(),
            default_view.id()
        );

        let normalizer = EventNormalizer::with_long_press(&self.layout, self.long_press_ms);
        let router = Router::new(
            registry,
            self.layout.pad_indices(),
            default_mode,
            default_view,
        );

        Ok(Surface {
            layout: self.layout,
            normalizer,
            router,
            env: self.env,
            buttons,
        })
    }
}
