//! Test helpers and fixtures for padwork integration tests
//!
//! - [`MockHost`]: in-memory track bank and transport, fully inspectable
//! - [`Recorder`]: MIDI sink that keeps every scheduled event
//! - [`test_layout`] / [`test_session`]: a 4x4 pad controller with eight
//!   knobs, a handful of buttons and both modifiers

#![allow(dead_code)]

use std::sync::{Arc, Once};

use padwork::prelude::*;
use padwork::TimeSignature;
use parking_lot::Mutex;

/// Tempo used by every scenario (240 ticks of 1/16 = 125 ms).
pub const TEST_BPM: f64 = 120.0;

pub const KNOB_BASE: u32 = 100;
pub const REPEAT: ControlId = ControlId(200);
pub const STOP: ControlId = ControlId(201);
pub const FADERS: ControlId = ControlId(202);
pub const SOLO: ControlId = ControlId(203);
pub const OCTAVE_UP: ControlId = ControlId(204);
pub const OCTAVE_DOWN: ControlId = ControlId(205);
pub const SHIFT: ControlId = ControlId(300);
pub const DELETE: ControlId = ControlId(301);

/// First pad note. Pad `n` plays `FIRST_NOTE + n` in octave 0.
pub const FIRST_NOTE: u8 = 48;

pub const C3: u8 = 48;
pub const E3: u8 = 52;
pub const C4: u8 = 60;

static TRACING: Once = Once::new();

/// Route `tracing` output to the test harness. Honors `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[derive(Debug, Clone)]
pub struct MockTrack {
    pub name: String,
    pub volume: f64,
    pub pan: f64,
    pub sends: [f64; 2],
    pub solo: bool,
    pub mute: bool,
    pub monitor: bool,
    pub stopped_clips: u32,
    pub arrangement_returns: u32,
}

impl MockTrack {
    fn new(index: usize) -> Self {
        Self {
            name: format!("Track {}", index + 1),
            volume: 0.8,
            pan: 0.5,
            sends: [0.0; 2],
            solo: false,
            mute: false,
            monitor: false,
            stopped_clips: 0,
            arrangement_returns: 0,
        }
    }
}

/// In-memory host. Tracks can be removed to simulate a vanished target.
pub struct MockHost {
    tracks: Mutex<Vec<Option<MockTrack>>>,
    selected: Mutex<Option<usize>>,
    transport: Mutex<TransportSnapshot>,
}

impl MockHost {
    pub fn new(count: usize) -> Arc<Self> {
        Arc::new(Self {
            tracks: Mutex::new((0..count).map(|i| Some(MockTrack::new(i))).collect()),
            selected: Mutex::new(Some(0)),
            transport: Mutex::new(TransportSnapshot::stopped_at(0, TEST_BPM)),
        })
    }

    pub fn track(&self, index: usize) -> Option<MockTrack> {
        self.tracks.lock().get(index).cloned().flatten()
    }

    pub fn remove_track(&self, index: usize) {
        if let Some(slot) = self.tracks.lock().get_mut(index) {
            *slot = None;
        }
    }

    pub fn select_none(&self) {
        *self.selected.lock() = None;
    }

    pub fn play_at(&self, ticks: u64) {
        *self.transport.lock() = TransportSnapshot::playing_at(ticks, TEST_BPM);
    }

    pub fn stop_at(&self, ticks: u64) {
        *self.transport.lock() = TransportSnapshot::stopped_at(ticks, TEST_BPM);
    }

    fn with<R>(&self, index: usize, f: impl FnOnce(&mut MockTrack) -> R) -> Option<R> {
        self.tracks.lock().get_mut(index)?.as_mut().map(f)
    }
}

impl TrackBank for MockHost {
    fn page_size(&self) -> usize {
        self.tracks.lock().len()
    }

    fn selected(&self) -> Option<usize> {
        *self.selected.lock()
    }

    fn exists(&self, index: usize) -> bool {
        matches!(self.tracks.lock().get(index), Some(Some(_)))
    }

    fn name(&self, index: usize) -> Option<String> {
        self.with(index, |t| t.name.clone())
    }

    fn volume(&self, index: usize) -> Option<f64> {
        self.with(index, |t| t.volume)
    }

    fn set_volume(&self, index: usize, value: f64) -> bool {
        self.with(index, |t| t.volume = value).is_some()
    }

    fn reset_volume(&self, index: usize) -> bool {
        self.set_volume(index, 0.8)
    }

    fn pan(&self, index: usize) -> Option<f64> {
        self.with(index, |t| t.pan)
    }

    fn set_pan(&self, index: usize, value: f64) -> bool {
        self.with(index, |t| t.pan = value).is_some()
    }

    fn reset_pan(&self, index: usize) -> bool {
        self.set_pan(index, 0.5)
    }

    fn send_level(&self, index: usize, send: usize) -> Option<f64> {
        self.with(index, |t| t.sends.get(send).copied()).flatten()
    }

    fn set_send_level(&self, index: usize, send: usize, value: f64) -> bool {
        self.with(index, |t| match t.sends.get_mut(send) {
            Some(level) => {
                *level = value;
                true
            }
            None => false,
        })
        .unwrap_or(false)
    }

    fn is_solo(&self, index: usize) -> Option<bool> {
        self.with(index, |t| t.solo)
    }

    fn toggle_solo(&self, index: usize) -> bool {
        self.with(index, |t| t.solo = !t.solo).is_some()
    }

    fn is_mute(&self, index: usize) -> Option<bool> {
        self.with(index, |t| t.mute)
    }

    fn toggle_mute(&self, index: usize) -> bool {
        self.with(index, |t| t.mute = !t.mute).is_some()
    }

    fn toggle_monitor(&self, index: usize) -> bool {
        self.with(index, |t| t.monitor = !t.monitor).is_some()
    }

    fn stop_clip(&self, index: usize) -> bool {
        self.with(index, |t| t.stopped_clips += 1).is_some()
    }

    fn return_to_arrangement(&self, index: usize) -> bool {
        self.with(index, |t| t.arrangement_returns += 1).is_some()
    }

    fn select(&self, index: usize) -> bool {
        if !self.exists(index) {
            return false;
        }
        *self.selected.lock() = Some(index);
        true
    }
}

impl HostTransport for MockHost {
    fn is_playing(&self) -> bool {
        self.transport.lock().playing
    }

    fn tempo(&self) -> f64 {
        self.transport.lock().tempo_bpm
    }

    fn time_signature(&self) -> TimeSignature {
        TimeSignature::default()
    }

    fn position_ticks(&self) -> u64 {
        self.transport.lock().position_ticks
    }
}

impl HostModel for MockHost {
    fn tracks(&self) -> &dyn TrackBank {
        self
    }

    fn transport(&self) -> &dyn HostTransport {
        self
    }
}

/// Shared log of everything a session sent to its MIDI sink.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<ScheduledEvent>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sink(&self) -> impl MidiSink + 'static {
        let events = Arc::clone(&self.events);
        move |event: ScheduledEvent| events.lock().push(event)
    }

    pub fn events(&self) -> Vec<ScheduledEvent> {
        self.events.lock().clone()
    }

    pub fn take(&self) -> Vec<ScheduledEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// `(tick, note)` of every NOTE_ON.
    pub fn note_ons(&self) -> Vec<(u64, u8)> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.is_note_on())
            .map(|e| (e.time_ticks, e.note))
            .collect()
    }

    /// `(tick, note)` of every NOTE_OFF.
    pub fn note_offs(&self) -> Vec<(u64, u8)> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.is_note_off())
            .map(|e| (e.time_ticks, e.note))
            .collect()
    }
}

pub fn pad(index: u32) -> ControlId {
    ControlId(index)
}

pub fn knob(index: u32) -> ControlId {
    ControlId(KNOB_BASE + index)
}

/// Pad that plays `note` in octave 0.
pub fn pad_for(note: u8) -> ControlId {
    pad((note - FIRST_NOTE) as u32)
}

pub fn test_layout() -> ControlLayout {
    let mut builder = ControlLayout::builder("Test Pad 16")
        .grid(4, 4)
        .pads(0, FIRST_NOTE, 16);
    for index in 0..8 {
        builder = builder.knob(knob(index), index as usize);
    }
    builder
        .button(REPEAT)
        .button(STOP)
        .button(FADERS)
        .button(SOLO)
        .button(OCTAVE_UP)
        .button(OCTAVE_DOWN)
        .modifier(SHIFT, Modifier::Shift)
        .modifier(DELETE, Modifier::Delete)
        .build()
        .expect("test layout is valid")
}

pub fn test_commands() -> CommandRegistry {
    let geometry = test_layout().grid;
    CommandRegistry::builder()
        .bind(REPEAT, NoteRepeatCommand::new())
        .bind(STOP, StopClipCommand::new(TrackTarget::Selected))
        .bind(
            FADERS,
            ViewToggleCommand::new(Arc::new(TrackFaderView::new(
                TrackParameter::Volume,
                geometry,
            ))),
        )
        .bind(SOLO, TrackToggleCommand::new(TrackTarget::Selected, TrackToggle::Solo))
        .build()
        .expect("test commands are valid")
}

/// A session on `host` with the test layout and commands, output recorded.
pub fn test_session(host: &Arc<MockHost>) -> (ControllerSession, Recorder) {
    init_tracing();
    let recorder = Recorder::new();
    let geometry = test_layout().grid;
    let session = ControllerSession::builder()
        .layout(test_layout())
        .host(host.clone())
        .commands(test_commands())
        .default_view(Arc::new(PlayView::new(
            geometry,
            NoteLayout::chromatic(FIRST_NOTE).with_octave_buttons(OCTAVE_UP, OCTAVE_DOWN),
        )))
        .sink(recorder.sink())
        .seed(1)
        .long_press_ms(400)
        .build()
        .expect("test session builds");
    (session, recorder)
}

/// Set every note-repeat setting through the session's bus.
pub fn configure_repeat(
    session: &ControllerSession,
    period: Resolution,
    length: Resolution,
    pattern: ArpPattern,
    octaves: i32,
) {
    let bus = session.bus();
    bus.set(&keys::NOTE_REPEAT_PERIOD, period).unwrap();
    bus.set(&keys::NOTE_REPEAT_LENGTH, length).unwrap();
    bus.set(&keys::NOTE_REPEAT_MODE, pattern).unwrap();
    bus.set(&keys::NOTE_REPEAT_OCTAVE, octaves).unwrap();
}

/// Clock the session from `from` to `to` (inclusive) every `step` ticks.
pub fn run_clock(session: &ControllerSession, from: u64, to: u64, step: u64) {
    let mut ticks = from;
    while ticks <= to {
        session.tick(&TransportSnapshot::playing_at(ticks, TEST_BPM));
        ticks += step;
    }
}
