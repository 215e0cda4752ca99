//! Builder for configuring and constructing a `ControllerSession`.

use crossbeam_channel::{bounded, unbounded};
use padwork_control::{
    CommandRegistry, ControlLayout, Mode, Surface, SurfaceEnv, View, DEFAULT_LONG_PRESS_MS,
};
use padwork_core::compat::Arc;
use padwork_core::{ConfigBus, HostModel};
use padwork_midi::{midi_output_channel, MidiOutputConsumer, MidiSink, NoteRepeat, ScheduledEvent};
use tracing::info;

use crate::session::ControllerSession;
use crate::{Error, Result};

/// A layout and a host are required. Everything else has a default:
///
/// - a fresh [`ConfigBus`] with every known key registered
/// - an empty command registry
/// - track volume as the base mode and a chromatic play view
/// - a ring-buffer MIDI output, taken with
///   [`ControllerSession::take_midi_output`]
///
/// # Example
///
/// ```ignore
/// use padwork::prelude::*;
///
/// let mut session = ControllerSession::builder()
///     .layout(layout)
///     .host(host)
///     .commands(registry)
///     .build()?;
///
/// let input = session.input_sender();
/// // hardware thread
/// input.send(InputEvent::new(ControlId(3), RawSignal::Press { velocity: 96 }, now_ms))?;
///
/// // input context
/// session.pump(now_ms);
/// ```
pub struct ControllerSessionBuilder {
    layout: Option<ControlLayout>,
    host: Option<Arc<dyn HostModel>>,
    bus: Option<Arc<ConfigBus>>,
    registry: Option<CommandRegistry>,
    default_mode: Option<Arc<dyn Mode>>,
    default_view: Option<Arc<dyn View>>,
    sink: Option<Box<dyn MidiSink>>,
    seed: Option<u64>,
    long_press_ms: u64,
    input_capacity: Option<usize>,
}

impl Default for ControllerSessionBuilder {
    fn default() -> Self {
        Self {
            layout: None,
            host: None,
            bus: None,
            registry: None,
            default_mode: None,
            default_view: None,
            sink: None,
            seed: None,
            long_press_ms: DEFAULT_LONG_PRESS_MS,
            input_capacity: None,
        }
    }
}

impl ControllerSessionBuilder {
    pub fn layout(mut self, layout: ControlLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn host(mut self, host: Arc<dyn HostModel>) -> Self {
        self.host = Some(host);
        self
    }

    /// Share a settings bus with other sessions. Default: a private bus.
    pub fn bus(mut self, bus: Arc<ConfigBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn commands(mut self, registry: CommandRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn default_mode(mut self, mode: Arc<dyn Mode>) -> Self {
        self.default_mode = Some(mode);
        self
    }

    pub fn default_view(mut self, view: Arc<dyn View>) -> Self {
        self.default_view = Some(view);
        self
    }

    /// Where scheduled NOTE_ON / NOTE_OFF go. Replaces the default ring buffer.
    pub fn sink<S: MidiSink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Seed for the RANDOM pattern. Default: from entropy.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Default: 400 ms
    pub fn long_press_ms(mut self, ms: u64) -> Self {
        self.long_press_ms = ms;
        self
    }

    /// Bound the raw input queue. Default: unbounded.
    pub fn input_capacity(mut self, capacity: usize) -> Self {
        self.input_capacity = Some(capacity);
        self
    }

    pub fn build(self) -> Result<ControllerSession> {
        let layout = self.layout.ok_or(Error::Incomplete("control layout"))?;
        let host = self.host.ok_or(Error::Incomplete("host model"))?;
        let bus = self.bus.unwrap_or_else(|| Arc::new(ConfigBus::with_defaults()));

        let (mut sink, output): (Box<dyn MidiSink>, Option<MidiOutputConsumer>) = match self.sink {
            Some(sink) => (sink, None),
            None => {
                let (producer, consumer) = midi_output_channel();
                (Box::new(producer), Some(consumer))
            }
        };
        let forward = move |event: ScheduledEvent| sink.send(event);
        let notes = Arc::new(match self.seed {
            Some(seed) => NoteRepeat::with_seed(forward, seed),
            None => NoteRepeat::new(forward),
        });
        notes.bind(&bus);

        let env = SurfaceEnv { host, bus, notes };
        let mut surface = Surface::builder(layout, env.clone()).long_press_ms(self.long_press_ms);
        if let Some(registry) = self.registry {
            surface = surface.commands(registry);
        }
        if let Some(mode) = self.default_mode {
            surface = surface.default_mode(mode);
        }
        if let Some(view) = self.default_view {
            surface = surface.default_view(view);
        }
        let surface = match surface.build() {
            Ok(surface) => surface,
            Err(err) => {
                env.notes.unbind(&env.bus);
                return Err(err.into());
            }
        };

        let (input_tx, input_rx) = match self.input_capacity {
            Some(capacity) => bounded(capacity),
            None => unbounded(),
        };

        info!(
            "Controller session '{}' ready (long press {} ms)",
            surface.layout().name,
            self.long_press_ms
        );

        Ok(ControllerSession::new(surface, env, input_tx, input_rx, output))
    }
}
