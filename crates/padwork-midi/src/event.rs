//! Timed note events produced by the scheduler.

use midi_msg::{Channel, ChannelVoiceMsg, MidiMsg};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    // Declaration order matters: a same-tick NoteOff sorts before NoteOn.
    NoteOff,
    NoteOn,
}

/// A note event stamped with its absolute transport time.
///
/// Ordering is by time, then NoteOff before NoteOn, then note and channel,
/// so a sorted batch always silences a pitch before retriggering it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScheduledEvent {
    pub time_ticks: u64,
    pub kind: EventKind,
    pub note: u8,
    pub channel: u8,
    pub velocity: u8,
}

impl ScheduledEvent {
    #[inline]
    pub fn note_on(time_ticks: u64, note: u8, velocity: u8, channel: u8) -> Self {
        Self {
            time_ticks,
            kind: EventKind::NoteOn,
            note,
            channel,
            velocity,
        }
    }

    #[inline]
    pub fn note_off(time_ticks: u64, note: u8, channel: u8) -> Self {
        Self {
            time_ticks,
            kind: EventKind::NoteOff,
            note,
            channel,
            velocity: 0,
        }
    }

    #[inline]
    pub fn is_note_on(&self) -> bool {
        self.kind == EventKind::NoteOn
    }

    #[inline]
    pub fn is_note_off(&self) -> bool {
        self.kind == EventKind::NoteOff
    }

    #[inline]
    pub fn to_midi_msg(&self) -> MidiMsg {
        let msg = match self.kind {
            EventKind::NoteOn => ChannelVoiceMsg::NoteOn {
                note: self.note,
                velocity: self.velocity,
            },
            EventKind::NoteOff => ChannelVoiceMsg::NoteOff {
                note: self.note,
                velocity: self.velocity,
            },
        };
        MidiMsg::ChannelVoice {
            channel: Channel::from_u8(self.channel),
            msg,
        }
    }

    #[inline]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_midi_msg().to_midi()
    }
}
