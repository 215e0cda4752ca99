//! Per-controller session context.
//!
//! A session owns everything that used to be per-controller global state:
//! the surface (normalizer, layer stacks, modifiers), the note-repeat handle
//! and its bus subscriptions, and the raw input queue. Only the
//! [`ConfigBus`] may be shared between sessions.

use crossbeam_channel::{Receiver, Sender};
use padwork_control::{
    ControlId, Mode, ModeId, RawSignal, Routed, Surface, SurfaceEnv, SurfaceState, View, ViewId,
};
use padwork_core::compat::Arc;
use padwork_core::{ConfigBus, HostModel, TransportSnapshot};
use padwork_midi::{MidiOutputConsumer, NoteRepeat};
use tracing::{debug, info, trace};

use crate::ControllerSessionBuilder;

/// One raw signal as delivered by a hardware callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub control: ControlId,
    pub signal: RawSignal,
    /// Host monotonic clock, milliseconds.
    pub timestamp_ms: u64,
}

impl InputEvent {
    pub fn new(control: ControlId, signal: RawSignal, timestamp_ms: u64) -> Self {
        Self {
            control,
            signal,
            timestamp_ms,
        }
    }
}

/// Two entry points, one per execution context:
///
/// - input context: [`pump`](Self::pump) / [`ingest`](Self::ingest), one
///   event at a time, in arrival order
/// - clock context: [`tick`](Self::tick) on the handle from
///   [`clock`](Self::clock), from any thread
pub struct ControllerSession {
    surface: Surface,
    env: SurfaceEnv,
    input_tx: Sender<InputEvent>,
    input_rx: Receiver<InputEvent>,
    output: Option<MidiOutputConsumer>,
    torn_down: bool,
}

impl ControllerSession {
    pub fn builder() -> ControllerSessionBuilder {
        ControllerSessionBuilder::default()
    }

    pub(crate) fn new(
        surface: Surface,
        env: SurfaceEnv,
        input_tx: Sender<InputEvent>,
        input_rx: Receiver<InputEvent>,
        output: Option<MidiOutputConsumer>,
    ) -> Self {
        Self {
            surface,
            env,
            input_tx,
            input_rx,
            output,
            torn_down: false,
        }
    }

    /// Sender for hardware callback threads. Cheap to clone.
    pub fn input_sender(&self) -> Sender<InputEvent> {
        self.input_tx.clone()
    }

    /// Drain the input queue in arrival order, then fire the long presses
    /// due at `now_ms`. Returns the number of raw signals processed.
    pub fn pump(&mut self, now_ms: u64) -> usize {
        let mut processed = 0;
        while let Ok(event) = self.input_rx.try_recv() {
            processed += 1;
            if self.torn_down {
                continue;
            }
            self.ingest(event.control, event.signal, event.timestamp_ms);
        }
        if !self.torn_down {
            self.surface.poll(now_ms);
        }
        if processed > 0 {
            trace!("Pumped {} input events", processed);
        }
        processed
    }

    /// Process one raw signal now. The surface routes long presses that came
    /// due before it first, so a `Long` is never reported after its `Up`.
    pub fn ingest(
        &mut self,
        control: ControlId,
        signal: RawSignal,
        now_ms: u64,
    ) -> Option<Routed> {
        if self.torn_down {
            debug!("Ignored {:?} on {} after teardown", signal, control);
            return None;
        }
        self.surface.ingest(control, signal, now_ms)
    }

    /// Clock context: advance note repeat to `snapshot`.
    pub fn tick(&self, snapshot: &TransportSnapshot) -> usize {
        self.env.notes.process(snapshot)
    }

    /// Clock context: advance note repeat to the host's current transport.
    pub fn tick_from_host(&self) -> usize {
        let snapshot = self.env.host.transport().snapshot();
        self.env.notes.process(&snapshot)
    }

    /// Note-repeat handle for a clock thread.
    pub fn clock(&self) -> Arc<NoteRepeat> {
        Arc::clone(&self.env.notes)
    }

    /// The ring-buffer output, when the session was built without a sink.
    /// Can be taken once.
    pub fn take_midi_output(&mut self) -> Option<MidiOutputConsumer> {
        self.output.take()
    }

    pub fn refresh(&mut self) -> SurfaceState {
        self.surface.refresh()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn push_mode(&mut self, mode: Arc<dyn Mode>) -> bool {
        self.surface.push_mode(mode)
    }

    pub fn pop_mode(&mut self) -> bool {
        self.surface.pop_mode()
    }

    pub fn push_view(&mut self, view: Arc<dyn View>) -> bool {
        self.surface.push_view(view)
    }

    pub fn pop_view(&mut self) -> bool {
        self.surface.pop_view()
    }

    pub fn active_mode(&self) -> ModeId {
        self.surface.active_mode()
    }

    pub fn active_view(&self) -> ViewId {
        self.surface.active_view()
    }

    pub fn bus(&self) -> &Arc<ConfigBus> {
        &self.env.bus
    }

    pub fn host(&self) -> &Arc<dyn HostModel> {
        &self.env.host
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// End the session: stop following the bus, silence every note this
    /// session started and forget held controls.
    ///
    /// Returns the number of NOTE_OFF events sent. Idempotent.
    pub fn teardown(&mut self) -> usize {
        if self.torn_down {
            return 0;
        }
        self.torn_down = true;

        self.env.notes.unbind(&self.env.bus);
        let flushed = self.env.notes.deactivate() + self.env.notes.all_notes_off();
        self.surface.reset();

        info!(
            "Controller session '{}' torn down ({} notes released)",
            self.surface.layout().name,
            flushed
        );
        flushed
    }
}

impl Drop for ControllerSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
