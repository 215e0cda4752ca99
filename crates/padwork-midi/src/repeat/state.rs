//! The scheduler state machine. Pure: every operation appends the events it
//! produces to a batch and leaves dispatch to the caller.

use std::collections::HashMap;

use padwork_core::{align_down, align_up, TransportSnapshot};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use super::config::RepeatConfig;
use crate::event::ScheduledEvent;
use crate::pattern::{Arpeggiator, HeldNote};

pub type EventBatch = SmallVec<[ScheduledEvent; 16]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RepeatState {
    #[default]
    Off,
    /// Active with no notes held.
    Armed,
    /// Active with at least one note held.
    Running,
}

impl RepeatState {
    #[inline]
    pub fn is_active(self) -> bool {
        self != RepeatState::Off
    }
}

/// Outcome of a grid release, for statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Release {
    Held,
    Direct,
    Orphan,
}

#[derive(Debug)]
pub(crate) struct RepeatCore {
    state: RepeatState,
    held: SmallVec<[HeldNote; 8]>,
    /// (note, channel) -> tick at which its NOTE_OFF is due.
    sounding: HashMap<(u8, u8), u64>,
    /// Grid note -> channel, for notes played straight through while off.
    direct: HashMap<u8, u8>,
    arp: Arpeggiator,
    /// First tick not yet evaluated for boundaries.
    horizon: Option<u64>,
    position: u64,
    playing: bool,
}

impl RepeatCore {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            state: RepeatState::Off,
            held: SmallVec::new(),
            sounding: HashMap::new(),
            direct: HashMap::new(),
            arp: Arpeggiator::new(seed),
            horizon: None,
            position: 0,
            playing: false,
        }
    }

    pub(crate) fn state(&self) -> RepeatState {
        self.state
    }

    pub(crate) fn held(&self) -> &[HeldNote] {
        &self.held
    }

    pub(crate) fn sounding_count(&self) -> usize {
        self.sounding.len()
    }

    pub(crate) fn activate(&mut self) {
        if self.state == RepeatState::Off {
            debug!("Note repeat armed");
            self.state = RepeatState::Armed;
        }
    }

    /// Silence every repeat note and return to OFF.
    pub(crate) fn deactivate(&mut self, out: &mut EventBatch) -> bool {
        if self.state == RepeatState::Off {
            return false;
        }
        self.flush(self.position, out);
        self.held.clear();
        self.arp.reset();
        self.horizon = None;
        self.state = RepeatState::Off;
        debug!("Note repeat off");
        true
    }

    pub(crate) fn key_down(
        &mut self,
        note: u8,
        velocity: u8,
        config: &RepeatConfig,
        out: &mut EventBatch,
    ) {
        if !self.state.is_active() {
            if let Some(channel) = self.direct.remove(&note) {
                out.push(ScheduledEvent::note_off(self.position, note, channel));
            }
            let channel = config.channel;
            out.push(ScheduledEvent::note_on(
                self.position,
                note,
                config.output_velocity(velocity),
                channel,
            ));
            self.direct.insert(note, channel);
            return;
        }

        match self.held.iter_mut().find(|h| h.note == note) {
            Some(held) => held.velocity = velocity,
            None => self.held.push(HeldNote::new(note, velocity)),
        }

        if self.state == RepeatState::Armed {
            trace!("Note repeat running");
            self.state = RepeatState::Running;
            self.arp.reset();
        }
    }

    pub(crate) fn key_up(&mut self, note: u8, out: &mut EventBatch) -> Release {
        if let Some(channel) = self.direct.remove(&note) {
            out.push(ScheduledEvent::note_off(self.position, note, channel));
            return Release::Direct;
        }

        let Some(index) = self.held.iter().position(|h| h.note == note) else {
            warn!("Release of note {} that is not held", note);
            return Release::Orphan;
        };
        self.held.remove(index);

        if self.held.is_empty() && self.state == RepeatState::Running {
            trace!("Note repeat armed (no notes held)");
            self.state = RepeatState::Armed;
        }
        Release::Held
    }

    /// Advance to the transport position in `snapshot`.
    ///
    /// Returns `true` if a flush happened (transport stop or relocation).
    pub(crate) fn process(
        &mut self,
        snapshot: &TransportSnapshot,
        config: &RepeatConfig,
        out: &mut EventBatch,
    ) -> bool {
        let now = snapshot.position_ticks;
        let mut flushed = false;

        if !snapshot.playing {
            if self.playing {
                debug!("Transport stopped, flushing {} notes", self.sounding.len());
                self.flush(now, out);
                self.held.clear();
                self.arp.reset();
                if self.state == RepeatState::Running {
                    self.state = RepeatState::Armed;
                }
                flushed = true;
            }
            self.playing = false;
            self.horizon = None;
            self.position = now;
            return flushed;
        }

        if !self.playing {
            self.playing = true;
            self.horizon = None;
        }

        if let Some(horizon) = self.horizon {
            if now + 1 < horizon {
                debug!("Transport moved back to {}, releasing sounding notes", now);
                self.flush(now, out);
                self.horizon = None;
                flushed = true;
            }
        }

        if self.state == RepeatState::Running && !self.held.is_empty() {
            let period = config.period_ticks();
            let from = self.horizon.unwrap_or(now);
            let mut boundary = align_up(from, period);
            if now.saturating_sub(from) > period {
                // Jumped ahead: skipped boundaries are not replayed.
                debug!("Transport jumped to {}, resuming on the current boundary", now);
                boundary = align_down(now, period);
            }
            while boundary <= now {
                self.fire_boundary(boundary, config, out);
                boundary += period;
            }
        }

        self.horizon = Some(now + 1);
        self.position = now;
        self.collect_due(now, out);
        out.sort();
        flushed
    }

    fn fire_boundary(&mut self, boundary: u64, config: &RepeatConfig, out: &mut EventBatch) {
        let notes = self
            .arp
            .next_notes(config.pattern, &self.held, config.octave_range);
        let channel = config.channel;

        for held in notes {
            let key = (held.note, channel);
            // Still sounding from the previous boundary: cut it before retriggering.
            if let Some(off_at) = self.sounding.remove(&key) {
                out.push(ScheduledEvent::note_off(off_at.min(boundary), held.note, channel));
            }
            out.push(ScheduledEvent::note_on(
                boundary,
                held.note,
                config.output_velocity(held.velocity),
                channel,
            ));
            self.sounding.insert(key, boundary + config.length_ticks());
        }
    }

    fn collect_due(&mut self, now: u64, out: &mut EventBatch) {
        self.sounding.retain(|&(note, channel), off_at| {
            if *off_at <= now {
                out.push(ScheduledEvent::note_off(*off_at, note, channel));
                false
            } else {
                true
            }
        });
    }

    /// NOTE_OFF at `at` for every sounding repeat note.
    fn flush(&mut self, at: u64, out: &mut EventBatch) {
        let start = out.len();
        for ((note, channel), _) in self.sounding.drain() {
            out.push(ScheduledEvent::note_off(at, note, channel));
        }
        out[start..].sort();
    }

    /// Flush repeat notes and direct-played notes alike.
    pub(crate) fn all_notes_off(&mut self, out: &mut EventBatch) {
        self.flush(self.position, out);
        let start = out.len();
        for (note, channel) in self.direct.drain() {
            out.push(ScheduledEvent::note_off(self.position, note, channel));
        }
        out[start..].sort();
    }
}
