//! Note-repeat / arpeggiator scheduler.
//!
//! [`NoteRepeat`] is shared between the input-event context (grid presses,
//! activation) and the clock context ([`NoteRepeat::process`]). Both go
//! through the same two locks, always in the same order:
//!
//! 1. the sink gate, held while events are handed to the [`MidiSink`];
//! 2. the scheduler state, held only while computing the event batch.
//!
//! The state lock is never held across a sink call. The gate makes a
//! returning [`NoteRepeat::deactivate`] final: no event computed before it
//! can reach the sink after it.

mod config;
mod state;

pub use config::{RepeatConfig, MAX_OCTAVE_RANGE};
pub use state::RepeatState;

use arc_swap::ArcSwap;
use padwork_core::compat::{Arc, Mutex};
use padwork_core::config::keys;
use padwork_core::{
    ArpPattern, ConfigBus, Counter, Key, Resolution, SettingType, SubscriptionId,
    TransportSnapshot,
};
use tracing::{debug, warn};

use crate::error::Result;
use crate::output_collector::MidiSink;
use crate::pattern::MAX_NOTE;
use crate::pattern::HeldNote;
use state::{EventBatch, Release, RepeatCore};

#[derive(Debug, Default)]
pub struct RepeatStats {
    dispatched: Counter,
    orphan_releases: Counter,
    flushes: Counter,
}

impl RepeatStats {
    /// Events handed to the sink.
    pub fn dispatched(&self) -> u64 {
        self.dispatched.get()
    }

    /// Grid releases for notes that were neither held nor direct-played.
    pub fn orphan_releases(&self) -> u64 {
        self.orphan_releases.get()
    }

    /// Deactivations, transport stops and relocations that silenced notes.
    pub fn flushes(&self) -> u64 {
        self.flushes.get()
    }
}

pub struct NoteRepeat {
    core: Mutex<RepeatCore>,
    config: ArcSwap<RepeatConfig>,
    sink: Mutex<Box<dyn MidiSink>>,
    stats: RepeatStats,
    subscriptions: Mutex<Vec<SubscriptionId>>,
}

impl NoteRepeat {
    pub fn new<S: MidiSink + 'static>(sink: S) -> Self {
        Self::with_seed(sink, rand::random())
    }

    /// Deterministic RANDOM pattern.
    pub fn with_seed<S: MidiSink + 'static>(sink: S, seed: u64) -> Self {
        Self {
            core: Mutex::new(RepeatCore::new(seed)),
            config: ArcSwap::from_pointee(RepeatConfig::default()),
            sink: Mutex::new(Box::new(sink)),
            stats: RepeatStats::default(),
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    pub fn config(&self) -> Arc<RepeatConfig> {
        self.config.load_full()
    }

    pub fn set_config(&self, config: RepeatConfig) -> Result<()> {
        config.validate()?;
        self.config.store(Arc::new(config));
        Ok(())
    }

    pub fn update_config(&self, apply: impl Fn(&mut RepeatConfig)) {
        self.config.rcu(|current| {
            let mut next = RepeatConfig::clone(current);
            apply(&mut next);
            next
        });
    }

    /// Replace the output sink. Waits for any in-flight dispatch.
    pub fn set_sink<S: MidiSink + 'static>(&self, sink: S) {
        *self.sink.lock() = Box::new(sink);
    }

    pub fn stats(&self) -> &RepeatStats {
        &self.stats
    }

    pub fn state(&self) -> RepeatState {
        self.core.lock().state()
    }

    pub fn is_active(&self) -> bool {
        self.state().is_active()
    }

    pub fn held_notes(&self) -> Vec<HeldNote> {
        self.core.lock().held().to_vec()
    }

    /// Repeat notes with a pending NOTE_OFF.
    pub fn sounding_count(&self) -> usize {
        self.core.lock().sounding_count()
    }

    /// OFF -> ARMED. No-op when already active.
    pub fn activate(&self) {
        self.core.lock().activate();
    }

    /// Flush every sounding repeat note and return to OFF.
    ///
    /// Returns the number of NOTE_OFF events sent. Once this returns no
    /// further repeat events reach the sink until the next activation.
    pub fn deactivate(&self) -> usize {
        let (flushed, sent) = self.dispatch(|core, _, out| core.deactivate(out));
        if flushed {
            self.stats.flushes.incr();
        }
        sent
    }

    pub fn set_active(&self, active: bool) {
        if active {
            self.activate();
        } else {
            self.deactivate();
        }
    }

    /// Grid press. Joins the held set while active, plays straight through
    /// otherwise.
    pub fn key_down(&self, note: u8, velocity: u8) {
        if note > MAX_NOTE {
            warn!("Dropped press of note {} outside the MIDI range", note);
            return;
        }
        self.dispatch(|core, config, out| core.key_down(note, velocity, config, out));
    }

    pub fn key_up(&self, note: u8) {
        let (release, _) = self.dispatch(|core, _, out| core.key_up(note, out));
        if release == Release::Orphan {
            self.stats.orphan_releases.incr();
        }
    }

    /// Clock-context entry point. Returns the number of events sent.
    pub fn process(&self, snapshot: &TransportSnapshot) -> usize {
        let (flushed, sent) =
            self.dispatch(|core, config, out| core.process(snapshot, config, out));
        if flushed {
            self.stats.flushes.incr();
        }
        sent
    }

    /// Silence everything this scheduler started, direct-played notes included.
    pub fn all_notes_off(&self) -> usize {
        let (_, sent) = self.dispatch(|core, _, out| core.all_notes_off(out));
        sent
    }

    /// Follow the note-repeat and accent settings on `bus`.
    ///
    /// Every observer fires once on subscription, so the scheduler is in sync
    /// with the bus when this returns. Observers hold only a weak reference.
    pub fn bind(self: &Arc<Self>, bus: &ConfigBus) {
        let ids = vec![
            self.observe(bus, &keys::NOTE_REPEAT_PERIOD, |c, v: &Resolution| c.period = *v),
            self.observe(bus, &keys::NOTE_REPEAT_LENGTH, |c, v: &Resolution| c.length = *v),
            self.observe(bus, &keys::NOTE_REPEAT_OCTAVE, |c, v: &i32| {
                c.octave_range = (*v).clamp(0, MAX_OCTAVE_RANGE as i32) as u8
            }),
            self.observe(bus, &keys::NOTE_REPEAT_MODE, |c, v: &ArpPattern| c.pattern = *v),
            self.observe(bus, &keys::MIDI_EDIT_CHANNEL, |c, v: &i32| {
                c.channel = (*v).clamp(0, 15) as u8
            }),
            self.observe(bus, &keys::ACCENT_ACTIVE, |c, v: &bool| c.accent = *v),
            self.observe(bus, &keys::ACCENT_VALUE, |c, v: &i32| {
                c.accent_velocity = (*v).clamp(1, 127) as u8
            }),
            {
                let weak = Arc::downgrade(self);
                bus.subscribe(&keys::NOTE_REPEAT_ACTIVE, move |active: &bool| {
                    if let Some(repeat) = weak.upgrade() {
                        repeat.set_active(*active);
                    }
                    Ok(())
                })
            },
        ];
        debug!("Note repeat bound to {} settings", ids.len());
        self.subscriptions.lock().extend(ids);
    }

    /// Drop the observers installed by [`bind`](Self::bind).
    pub fn unbind(&self, bus: &ConfigBus) {
        for id in self.subscriptions.lock().drain(..) {
            bus.unsubscribe(id);
        }
    }

    fn observe<T: SettingType>(
        self: &Arc<Self>,
        bus: &ConfigBus,
        key: &Key<T>,
        apply: fn(&mut RepeatConfig, &T),
    ) -> SubscriptionId {
        let weak = Arc::downgrade(self);
        bus.subscribe(key, move |value: &T| {
            if let Some(repeat) = weak.upgrade() {
                repeat.update_config(|config| apply(config, value));
            }
            Ok(())
        })
    }

    fn dispatch<R>(
        &self,
        step: impl FnOnce(&mut RepeatCore, &RepeatConfig, &mut EventBatch) -> R,
    ) -> (R, usize) {
        let mut sink = self.sink.lock();
        let config = self.config.load();
        let mut batch = EventBatch::new();
        let result = step(&mut self.core.lock(), &config, &mut batch);

        let sent = batch.len();
        for event in batch {
            sink.send(event);
        }
        self.stats.dispatched.add(sent as u64);
        (result, sent)
    }
}

impl core::fmt::Debug for NoteRepeat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NoteRepeat")
            .field("state", &self.state())
            .field("config", &self.config())
            .finish_non_exhaustive()
    }
}
