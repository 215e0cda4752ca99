//! Typed setting keys and the standard key set.

use core::marker::PhantomData;

use super::value::{SettingType, SettingValue};
use crate::time::{ArpPattern, Resolution};

/// A typed handle onto one bus entry.
#[derive(Debug)]
pub struct Key<T> {
    name: &'static str,
    default: T,
    range: Option<(i32, i32)>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Key<T> {
    pub const fn new(name: &'static str, default: T) -> Self {
        Self {
            name,
            default,
            range: None,
            _marker: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn range(&self) -> Option<(i32, i32)> {
        self.range
    }
}

impl Key<i32> {
    /// Integer key accepting only `min..=max`.
    pub const fn ranged(name: &'static str, default: i32, min: i32, max: i32) -> Self {
        Self {
            name,
            default,
            range: Some((min, max)),
            _marker: PhantomData,
        }
    }
}

impl<T: SettingType> Key<T> {
    pub fn default_value(&self) -> T {
        self.default.clone()
    }

    pub(crate) fn descriptor(&self) -> (&'static str, SettingValue, Option<(i32, i32)>) {
        (self.name, self.default.clone().into_value(), self.range)
    }
}

pub const NOTE_REPEAT_ACTIVE: Key<bool> = Key::new("note_repeat.active", false);
pub const NOTE_REPEAT_PERIOD: Key<Resolution> =
    Key::new("note_repeat.period", Resolution::Sixteenth);
pub const NOTE_REPEAT_LENGTH: Key<Resolution> =
    Key::new("note_repeat.length", Resolution::ThirtySecond);
pub const NOTE_REPEAT_OCTAVE: Key<i32> = Key::ranged("note_repeat.octave", 0, 0, 4);
pub const NOTE_REPEAT_MODE: Key<ArpPattern> = Key::new("note_repeat.mode", ArpPattern::Up);
pub const MIDI_EDIT_CHANNEL: Key<i32> = Key::ranged("midi.edit_channel", 0, 0, 15);
pub const ACCENT_ACTIVE: Key<bool> = Key::new("accent.active", false);
pub const ACCENT_VALUE: Key<i32> = Key::ranged("accent.value", 127, 1, 127);
pub const KNOB_SPEED_NORMAL: Key<i32> = Key::ranged("knob.speed_normal", 100, 1, 100);
pub const KNOB_SPEED_SLOW: Key<i32> = Key::ranged("knob.speed_slow", 10, 1, 100);

/// Name, default and range of every standard key.
pub(crate) fn standard() -> Vec<(&'static str, SettingValue, Option<(i32, i32)>)> {
    vec![
        NOTE_REPEAT_ACTIVE.descriptor(),
        NOTE_REPEAT_PERIOD.descriptor(),
        NOTE_REPEAT_LENGTH.descriptor(),
        NOTE_REPEAT_OCTAVE.descriptor(),
        NOTE_REPEAT_MODE.descriptor(),
        MIDI_EDIT_CHANNEL.descriptor(),
        ACCENT_ACTIVE.descriptor(),
        ACCENT_VALUE.descriptor(),
        KNOB_SPEED_NORMAL.descriptor(),
        KNOB_SPEED_SLOW.descriptor(),
    ]
}
