use padwork_core::{ArpPattern, Resolution};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const MAX_OCTAVE_RANGE: u8 = 4;

/// Live scheduler parameters. Published through an `ArcSwap` so the clock
/// context reads a consistent snapshot without locking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatConfig {
    pub period: Resolution,
    pub length: Resolution,
    pub octave_range: u8,
    pub pattern: ArpPattern,
    /// Output channel 0-15, also used for direct play.
    pub channel: u8,
    pub accent: bool,
    pub accent_velocity: u8,
}

impl RepeatConfig {
    pub fn with_period(mut self, period: Resolution) -> Self {
        self.period = period;
        self
    }

    pub fn with_length(mut self, length: Resolution) -> Self {
        self.length = length;
        self
    }

    pub fn with_octave_range(mut self, octave_range: u8) -> Self {
        self.octave_range = octave_range;
        self
    }

    pub fn with_pattern(mut self, pattern: ArpPattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel;
        self
    }

    pub fn with_accent(mut self, velocity: Option<u8>) -> Self {
        self.accent = velocity.is_some();
        if let Some(velocity) = velocity {
            self.accent_velocity = velocity;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.channel > 15 {
            return Err(Error::InvalidChannel(self.channel));
        }
        if self.octave_range > MAX_OCTAVE_RANGE {
            return Err(Error::InvalidOctaveRange(self.octave_range));
        }
        if self.accent_velocity == 0 || self.accent_velocity > 127 {
            return Err(Error::InvalidVelocity(self.accent_velocity));
        }
        Ok(())
    }

    #[inline]
    pub fn period_ticks(&self) -> u64 {
        self.period.ticks().max(1)
    }

    #[inline]
    pub fn length_ticks(&self) -> u64 {
        self.length.ticks().max(1)
    }

    /// Velocity actually emitted for a note struck at `velocity`.
    #[inline]
    pub fn output_velocity(&self, velocity: u8) -> u8 {
        if self.accent {
            self.accent_velocity
        } else {
            velocity.clamp(1, 127)
        }
    }
}

impl Default for RepeatConfig {
    fn default() -> Self {
        Self {
            period: Resolution::Sixteenth,
            length: Resolution::ThirtySecond,
            octave_range: 0,
            pattern: ArpPattern::Up,
            channel: 0,
            accent: false,
            accent_velocity: 127,
        }
    }
}
