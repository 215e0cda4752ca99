//! # Padwork - MIDI Controller Interaction Core
//!
//! Turns raw controller input into host actions and transport-locked notes.
//!
//! ## Architecture
//!
//! Padwork is an umbrella crate that coordinates:
//! - **padwork-core** - Settings bus, musical time, host-model capabilities
//! - **padwork-midi** - Scheduled MIDI events, output channel, note repeat / arpeggiator
//! - **padwork-control** - Event normalizer, commands, mode/view stacks, router
//!
//! ## Quick Start
//!
//! ```ignore
//! use padwork::prelude::*;
//!
//! let layout = ControlLayout::builder("Pad 16")
//!     .grid(4, 4)
//!     .pads(0, 36, 16)
//!     .knob(ControlId(100), 0)
//!     .button(ControlId(200))
//!     .modifier(ControlId(300), Modifier::Shift)
//!     .build()?;
//!
//! let commands = CommandRegistry::builder()
//!     .bind(ControlId(200), NoteRepeatCommand::new())
//!     .build()?;
//!
//! let mut session = ControllerSession::builder()
//!     .layout(layout)
//!     .host(host)
//!     .commands(commands)
//!     .build()?;
//!
//! // Input context
//! session.ingest(ControlId(0), RawSignal::Press { velocity: 100 }, now_ms);
//!
//! // Clock context
//! let clock = session.clock();
//! clock.process(&transport.snapshot());
//! ```

/// Re-export of padwork-core for direct access
pub use padwork_core as core;

/// Re-export of padwork-midi for direct access
pub use padwork_midi as midi;

/// Re-export of padwork-control for direct access
pub use padwork_control as control;

pub use padwork_core::{
    config::keys, ArpPattern, ConfigBus, HostModel, HostTransport, Key, Resolution, TimeSignature,
    TrackBank, TrackParameter, TrackTarget, TransportSnapshot, TICKS_PER_BEAT,
};

pub use padwork_midi::{
    midi_output_channel, MidiOutputConsumer, MidiOutputProducer, MidiSink, NoteRepeat,
    RepeatConfig, RepeatState, ScheduledEvent,
};

pub use padwork_control::{
    ButtonEvent, ButtonPhase, Command, CommandRegistry, ControlClass, ControlId, ControlLayout,
    GridGeometry, Mode, ModeId, Modifier, PadColor, RawSignal, Routed, Surface, SurfaceContext,
    SurfaceState, View, ViewId,
};

mod error;
pub use error::{Error, Result};

mod builder;
pub use builder::ControllerSessionBuilder;

mod session;
pub use session::{ControllerSession, InputEvent};

pub mod prelude {
    // Session
    pub use crate::{ControllerSession, ControllerSessionBuilder, InputEvent};

    // Settings
    pub use crate::core::{config::keys, ConfigBus, Key};

    // Host capabilities
    pub use crate::core::{HostModel, HostTransport, TrackBank, TrackParameter, TrackTarget};

    // Time
    pub use crate::core::{ArpPattern, Resolution, TransportSnapshot};

    // Notes
    pub use crate::midi::{MidiSink, NoteRepeat, ScheduledEvent};

    // Surface
    pub use crate::control::command::{
        MomentaryModeCommand, NoteRepeatCommand, StopClipCommand, TrackToggle,
        TrackToggleCommand, ViewToggleCommand,
    };
    pub use crate::control::mode::{NoteRepeatMode, TrackParameterMode};
    pub use crate::control::view::{NoteLayout, PlayView, TrackFaderView, UserView};
    pub use crate::control::{
        CommandRegistry, ControlId, ControlLayout, Modifier, PadColor, RawSignal,
    };
}
