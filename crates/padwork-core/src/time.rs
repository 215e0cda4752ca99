//! Musical time: transport ticks, note resolutions, time signatures.
//!
//! All scheduling happens in transport ticks at [`TICKS_PER_BEAT`] pulses per
//! quarter note. Ticks only become wall-clock time through the host tempo,
//! which is why [`Resolution`] converts to ticks without a tempo and to
//! milliseconds with one.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Transport ticks per quarter note.
pub const TICKS_PER_BEAT: u64 = 960;

pub const MIN_TEMPO: f64 = 20.0;
pub const MAX_TEMPO: f64 = 999.0;

/// Convert a tick count to milliseconds at the given tempo.
#[inline]
pub fn ticks_to_millis(ticks: u64, bpm: f64) -> f64 {
    ticks as f64 / TICKS_PER_BEAT as f64 * 60_000.0 / bpm
}

/// Convert milliseconds to ticks at the given tempo (truncating).
#[inline]
pub fn millis_to_ticks(millis: f64, bpm: f64) -> u64 {
    (millis * bpm / 60_000.0 * TICKS_PER_BEAT as f64) as u64
}

/// Smallest multiple of `period` that is `>= position`.
#[inline]
pub fn align_up(position: u64, period: u64) -> u64 {
    let period = period.max(1);
    position.div_ceil(period) * period
}

/// Last multiple of `period` at or before `position`.
#[inline]
pub fn align_down(position: u64, period: u64) -> u64 {
    let period = period.max(1);
    position / period * period
}

pub fn validate_tempo(bpm: f64) -> Result<f64> {
    if !(MIN_TEMPO..=MAX_TEMPO).contains(&bpm) {
        return Err(Error::InvalidTempo(bpm));
    }
    Ok(bpm)
}

/// A musical duration used for note-repeat period and gate length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Resolution {
    #[serde(rename = "1/4")]
    Quarter,
    #[serde(rename = "1/4t")]
    QuarterTriplet,
    #[serde(rename = "1/8")]
    Eighth,
    #[serde(rename = "1/8t")]
    EighthTriplet,
    #[default]
    #[serde(rename = "1/16")]
    Sixteenth,
    #[serde(rename = "1/16t")]
    SixteenthTriplet,
    #[serde(rename = "1/32")]
    ThirtySecond,
    #[serde(rename = "1/32t")]
    ThirtySecondTriplet,
}

impl Resolution {
    pub const ALL: [Resolution; 8] = [
        Resolution::Quarter,
        Resolution::QuarterTriplet,
        Resolution::Eighth,
        Resolution::EighthTriplet,
        Resolution::Sixteenth,
        Resolution::SixteenthTriplet,
        Resolution::ThirtySecond,
        Resolution::ThirtySecondTriplet,
    ];

    pub const fn ticks(self) -> u64 {
        match self {
            Resolution::Quarter => TICKS_PER_BEAT,
            Resolution::QuarterTriplet => TICKS_PER_BEAT * 2 / 3,
            Resolution::Eighth => TICKS_PER_BEAT / 2,
            Resolution::EighthTriplet => TICKS_PER_BEAT / 3,
            Resolution::Sixteenth => TICKS_PER_BEAT / 4,
            Resolution::SixteenthTriplet => TICKS_PER_BEAT / 6,
            Resolution::ThirtySecond => TICKS_PER_BEAT / 8,
            Resolution::ThirtySecondTriplet => TICKS_PER_BEAT / 12,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Resolution::Quarter => "1/4",
            Resolution::QuarterTriplet => "1/4t",
            Resolution::Eighth => "1/8",
            Resolution::EighthTriplet => "1/8t",
            Resolution::Sixteenth => "1/16",
            Resolution::SixteenthTriplet => "1/16t",
            Resolution::ThirtySecond => "1/32",
            Resolution::ThirtySecondTriplet => "1/32t",
        }
    }

    #[inline]
    pub fn to_millis(self, bpm: f64) -> f64 {
        ticks_to_millis(self.ticks(), bpm)
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|r| *r == self).unwrap_or(0)
    }

    /// Next (shorter) resolution, wrapping.
    pub fn next(self) -> Resolution {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous (longer) resolution, wrapping.
    pub fn prev(self) -> Resolution {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Resolution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.name() == wanted)
            .ok_or_else(|| Error::UnknownResolution(s.to_string()))
    }
}

/// Pitch sequencing rule applied to held notes on each repeat boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArpPattern {
    #[default]
    Up,
    Down,
    UpDown,
    Random,
    /// Retrigger every held note on each boundary.
    All,
}

impl ArpPattern {
    pub const ALL: [ArpPattern; 5] = [
        ArpPattern::Up,
        ArpPattern::Down,
        ArpPattern::UpDown,
        ArpPattern::Random,
        ArpPattern::All,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            ArpPattern::Up => "Up",
            ArpPattern::Down => "Down",
            ArpPattern::UpDown => "Up/Down",
            ArpPattern::Random => "Random",
            ArpPattern::All => "All",
        }
    }

    pub fn next(self) -> ArpPattern {
        let i = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> ArpPattern {
        let i = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for ArpPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ArpPattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', ' ', '_'], "/").as_str() {
            "up" => Ok(ArpPattern::Up),
            "down" => Ok(ArpPattern::Down),
            "up/down" | "updown" => Ok(ArpPattern::UpDown),
            "random" => Ok(ArpPattern::Random),
            "all" => Ok(ArpPattern::All),
            _ => Err(Error::UnknownPattern(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignature {
    pub numerator: u32,
    pub denominator: u32,
}

impl TimeSignature {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub fn validated(numerator: u32, denominator: u32) -> Result<Self> {
        if numerator == 0 || numerator > 32 || !denominator.is_power_of_two() || denominator > 32
        {
            return Err(Error::InvalidTimeSignature {
                numerator,
                denominator,
            });
        }
        Ok(Self::new(numerator, denominator))
    }

    /// Quarter-note beats per bar.
    #[inline]
    pub fn beats_per_bar(&self) -> f64 {
        self.numerator as f64 * 4.0 / self.denominator as f64
    }

    #[inline]
    pub fn ticks_per_bar(&self) -> u64 {
        TICKS_PER_BEAT * 4 * self.numerator as u64 / self.denominator as u64
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::new(4, 4)
    }
}

/// Bars/beats/ticks position, 1-indexed bars and beats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BBT {
    pub bar: u32,
    pub beat: u32,
    pub ticks: u32,
}

impl BBT {
    pub fn from_ticks(position: u64, signature: TimeSignature) -> Self {
        let ticks_per_bar = signature.ticks_per_bar().max(1);
        let ticks_per_sig_beat = (TICKS_PER_BEAT * 4 / signature.denominator as u64).max(1);
        let bar = position / ticks_per_bar;
        let in_bar = position % ticks_per_bar;
        BBT {
            bar: bar as u32 + 1,
            beat: (in_bar / ticks_per_sig_beat) as u32 + 1,
            ticks: (in_bar % ticks_per_sig_beat) as u32,
        }
    }
}

impl fmt::Display for BBT {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{:03}", self.bar, self.beat, self.ticks)
    }
}

/// What the clock context reads from the host transport once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportSnapshot {
    pub playing: bool,
    pub position_ticks: u64,
    pub tempo_bpm: f64,
}

impl TransportSnapshot {
    pub fn playing_at(position_ticks: u64, tempo_bpm: f64) -> Self {
        Self {
            playing: true,
            position_ticks,
            tempo_bpm,
        }
    }

    pub fn stopped_at(position_ticks: u64, tempo_bpm: f64) -> Self {
        Self {
            playing: false,
            position_ticks,
            tempo_bpm,
        }
    }

    #[inline]
    pub fn position_millis(&self) -> f64 {
        ticks_to_millis(self.position_ticks, self.tempo_bpm)
    }
}

impl Default for TransportSnapshot {
    fn default() -> Self {
        Self::stopped_at(0, 120.0)
    }
}
