use padwork_core::config::keys;
use padwork_core::{ArpPattern, ConfigBus, Key, Resolution};
use tracing::warn;

use super::{Mode, ModeId, ParameterDisplay, ParameterSlot};
use crate::context::SurfaceContext;
use crate::stack::Layer;

const PERIOD: usize = 0;
const LENGTH: usize = 1;
const OCTAVE: usize = 2;
const PATTERN: usize = 3;
const CHANNEL: usize = 4;

/// Note-repeat settings on the knobs. Every edit goes through the bus, which
/// in turn reconfigures the scheduler.
#[derive(Debug, Default)]
pub struct NoteRepeatMode;

impl NoteRepeatMode {
    pub fn new() -> Self {
        Self
    }

    fn step_int(bus: &ConfigBus, key: &Key<i32>, delta: i32) {
        let (min, max) = key.range().unwrap_or((i32::MIN, i32::MAX));
        let value = (bus.get(key) + delta.signum()).clamp(min, max);
        if let Err(err) = bus.set(key, value) {
            warn!("Note repeat: {}", err);
        }
    }

    fn step_resolution(bus: &ConfigBus, key: &Key<Resolution>, delta: i32) {
        let current = bus.get(key);
        let value = if delta > 0 { current.next() } else { current.prev() };
        if let Err(err) = bus.set(key, value) {
            warn!("Note repeat: {}", err);
        }
    }
}

impl Layer for NoteRepeatMode {
    type Id = ModeId;

    fn id(&self) -> ModeId {
        ModeId::NoteRepeat
    }

    fn name(&self) -> &str {
        "Note Repeat"
    }
}

impl Mode for NoteRepeatMode {
    fn on_knob(&self, ctx: &mut SurfaceContext<'_>, index: usize, delta: i32) {
        let bus = ctx.bus;
        match index {
            PERIOD => Self::step_resolution(bus, &keys::NOTE_REPEAT_PERIOD, delta),
            LENGTH => Self::step_resolution(bus, &keys::NOTE_REPEAT_LENGTH, delta),
            OCTAVE => Self::step_int(bus, &keys::NOTE_REPEAT_OCTAVE, delta),
            PATTERN => {
                let current = bus.get(&keys::NOTE_REPEAT_MODE);
                let pattern = if delta > 0 { current.next() } else { current.prev() };
                if let Err(err) = bus.set(&keys::NOTE_REPEAT_MODE, pattern) {
                    warn!("Note repeat: {}", err);
                }
            }
            CHANNEL => Self::step_int(bus, &keys::MIDI_EDIT_CHANNEL, delta),
            _ => {}
        }
    }

    fn knob_value(&self, ctx: &SurfaceContext<'_>, index: usize) -> Option<f64> {
        let fraction = |i: usize, len: usize| i as f64 / (len.max(2) - 1) as f64;
        let bus = ctx.bus;
        match index {
            PERIOD => {
                let period = bus.get(&keys::NOTE_REPEAT_PERIOD);
                Some(fraction(period.index(), Resolution::ALL.len()))
            }
            LENGTH => {
                let length = bus.get(&keys::NOTE_REPEAT_LENGTH);
                Some(fraction(length.index(), Resolution::ALL.len()))
            }
            OCTAVE => Some(bus.get(&keys::NOTE_REPEAT_OCTAVE) as f64 / 4.0),
            PATTERN => {
                let pattern = bus.get(&keys::NOTE_REPEAT_MODE);
                let index = ArpPattern::ALL.iter().position(|p| *p == pattern).unwrap_or(0);
                Some(fraction(index, ArpPattern::ALL.len()))
            }
            CHANNEL => Some(bus.get(&keys::MIDI_EDIT_CHANNEL) as f64 / 15.0),
            _ => None,
        }
    }

    fn update_display(&self, ctx: &SurfaceContext<'_>) -> ParameterDisplay {
        let bus = ctx.bus;
        let values = [
            ("Period", bus.get(&keys::NOTE_REPEAT_PERIOD).to_string()),
            ("Length", bus.get(&keys::NOTE_REPEAT_LENGTH).to_string()),
            ("Octave", bus.get(&keys::NOTE_REPEAT_OCTAVE).to_string()),
            ("Mode", bus.get(&keys::NOTE_REPEAT_MODE).to_string()),
            ("Channel", (bus.get(&keys::MIDI_EDIT_CHANNEL) + 1).to_string()),
        ];

        let active = if bus.get(&keys::NOTE_REPEAT_ACTIVE) { "On" } else { "Off" };
        ParameterDisplay {
            title: format!("Note Repeat: {active}"),
            slots: values
                .into_iter()
                .enumerate()
                .map(|(index, (label, value))| ParameterSlot {
                    label: label.to_string(),
                    value,
                    normalized: self.knob_value(ctx, index),
                })
                .collect(),
        }
    }
}
