//! Raw hardware signals -> canonical control events.
//!
//! Per control, a press is always `Down`, at most one `Long`, then `Up`.
//! Duplicate presses, releases without a press, and signals for controls the
//! layout does not know are dropped and counted.

use std::collections::HashMap;

use padwork_core::Counter;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::control::{ControlClass, ControlId, ControlLayout};

pub const DEFAULT_LONG_PRESS_MS: u64 = 400;

/// What the hardware actually sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawSignal {
    /// Key or pad down. Velocity 0 is a release.
    Press { velocity: u8 },
    Release,
    /// Capacitive touch, handled as press/release.
    Touch(bool),
    /// Encoder movement in detents.
    Relative(i32),
}

impl RawSignal {
    /// Decode a relative CC value in 7-bit two's complement
    /// (1..=63 clockwise, 65..=127 counter-clockwise).
    pub fn from_relative_cc(value: u8) -> Self {
        let value = value & 0x7F;
        let delta = if value < 64 {
            value as i32
        } else {
            value as i32 - 128
        };
        RawSignal::Relative(delta)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonPhase {
    Down,
    Long,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    pub phase: ButtonPhase,
    pub timestamp_ms: u64,
    /// Strike velocity of the press (repeated on `Long` and `Up`).
    pub velocity: u8,
    /// Set on `Up` when a `Long` was emitted for this press.
    pub after_long: bool,
}

impl ButtonEvent {
    #[inline]
    pub fn is_down(&self) -> bool {
        self.phase == ButtonPhase::Down
    }

    #[inline]
    pub fn is_long(&self) -> bool {
        self.phase == ButtonPhase::Long
    }

    #[inline]
    pub fn is_up(&self) -> bool {
        self.phase == ButtonPhase::Up
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlInput {
    Button(ButtonEvent),
    Knob { delta: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlEvent {
    pub control: ControlId,
    pub class: ControlClass,
    pub input: ControlInput,
}

impl ControlEvent {
    pub fn button(&self) -> Option<&ButtonEvent> {
        match &self.input {
            ControlInput::Button(event) => Some(event),
            ControlInput::Knob { .. } => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct NormalizerStats {
    pub unknown_controls: Counter,
    pub duplicate_downs: Counter,
    pub orphan_ups: Counter,
    pub long_presses: Counter,
    /// Signals that do not apply to the control's class.
    pub ignored_signals: Counter,
}

#[derive(Debug, Clone, Copy)]
struct Press {
    down_at: u64,
    velocity: u8,
    long_sent: bool,
}

pub struct EventNormalizer {
    classes: HashMap<ControlId, ControlClass>,
    pressed: HashMap<ControlId, Press>,
    long_press_ms: u64,
    stats: NormalizerStats,
}

impl EventNormalizer {
    pub fn new(layout: &ControlLayout) -> Self {
        Self::with_long_press(layout, DEFAULT_LONG_PRESS_MS)
    }

    pub fn with_long_press(layout: &ControlLayout, long_press_ms: u64) -> Self {
        Self {
            classes: layout.classes(),
            pressed: HashMap::new(),
            long_press_ms,
            stats: NormalizerStats::default(),
        }
    }

    pub fn long_press_ms(&self) -> u64 {
        self.long_press_ms
    }

    pub fn stats(&self) -> &NormalizerStats {
        &self.stats
    }

    pub fn is_pressed(&self, control: ControlId) -> bool {
        self.pressed.contains_key(&control)
    }

    /// Convert one raw signal. Returns `None` when the signal is dropped.
    pub fn ingest(
        &mut self,
        control: ControlId,
        signal: RawSignal,
        now_ms: u64,
    ) -> Option<ControlEvent> {
        let Some(&class) = self.classes.get(&control) else {
            self.stats.unknown_controls.incr();
            debug!("Dropped {:?} from unknown control {}", signal, control);
            return None;
        };

        let input = match signal {
            RawSignal::Press { velocity: 0 } | RawSignal::Release | RawSignal::Touch(false) => {
                self.release(control, now_ms)?
            }
            RawSignal::Press { velocity } => self.press(control, velocity, now_ms)?,
            RawSignal::Touch(true) => self.press(control, 127, now_ms)?,
            RawSignal::Relative(delta) => {
                if !matches!(class, ControlClass::Knob { .. }) || delta == 0 {
                    self.stats.ignored_signals.incr();
                    trace!("Ignored relative {} on control {}", delta, control);
                    return None;
                }
                ControlInput::Knob { delta }
            }
        };

        Some(ControlEvent {
            control,
            class,
            input,
        })
    }

    /// Emit `Long` for every control held past the threshold.
    pub fn poll(&mut self, now_ms: u64) -> SmallVec<[ControlEvent; 4]> {
        let mut out = SmallVec::new();
        for (control, press) in self.pressed.iter_mut() {
            if press.long_sent || now_ms.saturating_sub(press.down_at) < self.long_press_ms {
                continue;
            }
            press.long_sent = true;
            let Some(&class) = self.classes.get(control) else {
                continue;
            };
            out.push(ControlEvent {
                control: *control,
                class,
                input: ControlInput::Button(ButtonEvent {
                    phase: ButtonPhase::Long,
                    timestamp_ms: now_ms,
                    velocity: press.velocity,
                    after_long: false,
                }),
            });
        }
        self.stats.long_presses.add(out.len() as u64);
        out.sort_by_key(|e: &ControlEvent| e.control);
        out
    }

    /// Forget every press without emitting `Up` (session teardown).
    pub fn reset(&mut self) {
        self.pressed.clear();
    }

    fn press(&mut self, control: ControlId, velocity: u8, now_ms: u64) -> Option<ControlInput> {
        if self.pressed.contains_key(&control) {
            self.stats.duplicate_downs.incr();
            trace!("Suppressed duplicate press on {}", control);
            return None;
        }
        self.pressed.insert(
            control,
            Press {
                down_at: now_ms,
                velocity,
                long_sent: false,
            },
        );
        Some(ControlInput::Button(ButtonEvent {
            phase: ButtonPhase::Down,
            timestamp_ms: now_ms,
            velocity,
            after_long: false,
        }))
    }

    fn release(&mut self, control: ControlId, now_ms: u64) -> Option<ControlInput> {
        let Some(press) = self.pressed.remove(&control) else {
            self.stats.orphan_ups.incr();
            trace!("Suppressed release without press on {}", control);
            return None;
        };
        Some(ControlInput::Button(ButtonEvent {
            phase: ButtonPhase::Up,
            timestamp_ms: now_ms,
            velocity: press.velocity,
            after_long: press.long_sent,
        }))
    }
}
