//! Core types shared by every padwork crate.
//!
//! # Primary API
//!
//! - [`ConfigBus`] / [`Key`]: process-wide settings with synchronous observers
//! - [`Resolution`], [`ArpPattern`], [`TransportSnapshot`]: musical time
//! - [`HostModel`], [`TrackBank`], [`HostTransport`]: the host capabilities the
//!   interaction core drives
//!
//! # Example
//!
//! ```ignore
//! use padwork_core::{config::keys, ConfigBus, Resolution};
//!
//! let bus = ConfigBus::with_defaults();
//! bus.subscribe(&keys::NOTE_REPEAT_PERIOD, |period: &Resolution| {
//!     println!("period is now {period}");
//!     Ok(())
//! });
//! bus.set(&keys::NOTE_REPEAT_PERIOD, Resolution::Eighth)?;
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod compat;

pub(crate) mod lockfree;
pub use lockfree::{AtomicFlag, Counter};

pub mod time;
pub use time::{
    align_down, align_up, millis_to_ticks, ticks_to_millis, ArpPattern, Resolution, TimeSignature,
    TransportSnapshot, BBT, TICKS_PER_BEAT,
};

pub mod host;
pub use host::{HostModel, HostTransport, TrackBank, TrackParameter, TrackTarget};

pub mod config;
pub use config::{ConfigBus, Key, ObserverError, SettingType, SettingValue, SubscriptionId};
