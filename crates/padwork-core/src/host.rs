//! Host model capabilities.
//!
//! The host (a DAW extension API, a test double, ...) owns all track and
//! transport state. The interaction core only calls these traits
//! synchronously from the input-event context. Every accessor reports a
//! missing target through `None`/`false` so handlers can turn it into a
//! no-op instead of an error.

use crate::time::{TimeSignature, TransportSnapshot};

/// One page of the host's track bank.
pub trait TrackBank: Send + Sync {
    /// Number of track slots in the visible page.
    fn page_size(&self) -> usize;

    /// Index (within the page) of the selected track, if any.
    fn selected(&self) -> Option<usize>;

    fn exists(&self, index: usize) -> bool;

    fn name(&self, index: usize) -> Option<String>;

    /// Normalized volume 0.0..=1.0.
    fn volume(&self, index: usize) -> Option<f64>;
    fn set_volume(&self, index: usize, value: f64) -> bool;
    fn reset_volume(&self, index: usize) -> bool;

    /// Normalized pan 0.0 (left) ..= 1.0 (right).
    fn pan(&self, index: usize) -> Option<f64>;
    fn set_pan(&self, index: usize, value: f64) -> bool;
    fn reset_pan(&self, index: usize) -> bool;

    fn send_level(&self, index: usize, send: usize) -> Option<f64>;
    fn set_send_level(&self, index: usize, send: usize, value: f64) -> bool;

    fn is_solo(&self, index: usize) -> Option<bool>;
    fn toggle_solo(&self, index: usize) -> bool;

    fn is_mute(&self, index: usize) -> Option<bool>;
    fn toggle_mute(&self, index: usize) -> bool;

    fn toggle_monitor(&self, index: usize) -> bool;

    /// Stop the playing clip of the track.
    fn stop_clip(&self, index: usize) -> bool;

    /// Switch the track from clip playback back to the arrangement.
    fn return_to_arrangement(&self, index: usize) -> bool;

    fn select(&self, index: usize) -> bool;
}

/// Host transport as seen by the interaction core.
pub trait HostTransport: Send + Sync {
    fn is_playing(&self) -> bool;

    fn tempo(&self) -> f64;

    fn time_signature(&self) -> TimeSignature;

    /// Current play position in transport ticks.
    fn position_ticks(&self) -> u64;

    fn snapshot(&self) -> TransportSnapshot {
        TransportSnapshot {
            playing: self.is_playing(),
            position_ticks: self.position_ticks(),
            tempo_bpm: self.tempo(),
        }
    }
}

/// Capability bundle handed to commands, modes and views.
pub trait HostModel: Send + Sync {
    fn tracks(&self) -> &dyn TrackBank;

    fn transport(&self) -> &dyn HostTransport;
}

/// A track reference fixed at handler construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TrackTarget {
    /// Whatever track is selected when the handler runs.
    #[default]
    Selected,
    /// A fixed slot in the visible page.
    Index(usize),
}

impl TrackTarget {
    /// Resolve against the bank. `None` means there is nothing to act on.
    pub fn resolve(self, bank: &dyn TrackBank) -> Option<usize> {
        let index = match self {
            TrackTarget::Selected => bank.selected()?,
            TrackTarget::Index(index) => index,
        };
        bank.exists(index).then_some(index)
    }
}

/// Track parameter addressed by knob modes and fader views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackParameter {
    Volume,
    Pan,
    Send(usize),
}

impl TrackParameter {
    pub fn label(&self) -> String {
        match self {
            TrackParameter::Volume => "Volume".to_string(),
            TrackParameter::Pan => "Pan".to_string(),
            TrackParameter::Send(send) => format!("Send {}", send + 1),
        }
    }

    pub fn get(&self, bank: &dyn TrackBank, index: usize) -> Option<f64> {
        match *self {
            TrackParameter::Volume => bank.volume(index),
            TrackParameter::Pan => bank.pan(index),
            TrackParameter::Send(send) => bank.send_level(index, send),
        }
    }

    /// Set the parameter, clamped to 0.0..=1.0.
    pub fn set(&self, bank: &dyn TrackBank, index: usize, value: f64) -> bool {
        let value = value.clamp(0.0, 1.0);
        match *self {
            TrackParameter::Volume => bank.set_volume(index, value),
            TrackParameter::Pan => bank.set_pan(index, value),
            TrackParameter::Send(send) => bank.set_send_level(index, send, value),
        }
    }

    pub fn reset(&self, bank: &dyn TrackBank, index: usize) -> bool {
        match *self {
            TrackParameter::Volume => bank.reset_volume(index),
            TrackParameter::Pan => bank.reset_pan(index),
            TrackParameter::Send(send) => bank.set_send_level(index, send, 0.0),
        }
    }
}
