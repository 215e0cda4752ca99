//! MIDI output side of padwork.
//!
//! - [`NoteRepeat`]: transport-locked note repeat / arpeggiator
//! - [`ScheduledEvent`]: timed NOTE_ON / NOTE_OFF handed to a [`MidiSink`]
//! - [`midi_output_channel`]: lock-free ring buffer between the scheduler and
//!   the thread that owns the MIDI port
//!
//! # Example
//!
//! ```ignore
//! use padwork_midi::{midi_output_channel, NoteRepeat};
//!
//! let (producer, mut consumer) = midi_output_channel();
//! let repeat = Arc::new(NoteRepeat::new(producer));
//! repeat.bind(&bus);
//!
//! // clock context
//! repeat.process(&transport.snapshot());
//! for event in consumer.drain_all() {
//!     port.send(&event.to_bytes())?;
//! }
//! ```

pub mod error;
pub use error::{Error, Result};

mod event;
pub use event::{EventKind, ScheduledEvent};

mod output_collector;
pub use output_collector::{
    midi_output_channel, midi_output_channel_with_capacity, MidiOutputConsumer,
    MidiOutputProducer, MidiSink,
};

pub mod pattern;
pub use pattern::{Arpeggiator, HeldNote};

mod repeat;
pub use repeat::{NoteRepeat, RepeatConfig, RepeatState, RepeatStats, MAX_OCTAVE_RANGE};
