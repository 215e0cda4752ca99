//! MIDI output sinks.
//!
//! The scheduler hands every event to a [`MidiSink`]. Transmission is the
//! sink's business; the scheduler only guarantees ordering.

use padwork_core::compat::{Arc, AtomicU64, Ordering};
use ringbuf::{traits::*, HeapCons, HeapProd, HeapRb};
use tracing::warn;

use crate::event::ScheduledEvent;

const DEFAULT_CAPACITY: usize = 256;

/// Fire-and-forget event consumer. Must not block.
pub trait MidiSink: Send {
    fn send(&mut self, event: ScheduledEvent);
}

impl<F> MidiSink for F
where
    F: FnMut(ScheduledEvent) + Send,
{
    #[inline]
    fn send(&mut self, event: ScheduledEvent) {
        self(event)
    }
}

/// Producer side -- the scheduler pushes here from either context.
pub struct MidiOutputProducer {
    producer: HeapProd<ScheduledEvent>,
    dropped: Arc<AtomicU64>,
}

impl MidiOutputProducer {
    /// Returns `false` if the ring buffer is full.
    #[inline]
    pub fn push(&mut self, event: ScheduledEvent) -> bool {
        self.producer.try_push(event).is_ok()
    }
}

impl MidiSink for MidiOutputProducer {
    fn send(&mut self, event: ScheduledEvent) {
        if !self.push(event) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            warn!(
                "MIDI output buffer full, dropped {:?} note {}",
                event.kind, event.note
            );
        }
    }
}

/// Consumer side -- drained by the thread that owns the MIDI port.
pub struct MidiOutputConsumer {
    consumer: HeapCons<ScheduledEvent>,
    dropped: Arc<AtomicU64>,
}

impl MidiOutputConsumer {
    #[inline]
    pub fn pop(&mut self) -> Option<ScheduledEvent> {
        self.consumer.try_pop()
    }

    pub fn drain_all(&mut self) -> Vec<ScheduledEvent> {
        let mut events = Vec::with_capacity(self.consumer.occupied_len());
        while let Some(event) = self.consumer.try_pop() {
            events.push(event);
        }
        events
    }

    #[inline]
    pub fn has_pending(&self) -> bool {
        !self.consumer.is_empty()
    }

    #[inline]
    pub fn pending_count(&self) -> usize {
        self.consumer.occupied_len()
    }

    /// Events the producer could not enqueue because the buffer was full.
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

pub fn midi_output_channel() -> (MidiOutputProducer, MidiOutputConsumer) {
    midi_output_channel_with_capacity(DEFAULT_CAPACITY)
}

pub fn midi_output_channel_with_capacity(
    capacity: usize,
) -> (MidiOutputProducer, MidiOutputConsumer) {
    let rb = HeapRb::new(capacity);
    let (producer, consumer) = rb.split();
    let dropped = Arc::new(AtomicU64::new(0));
    (
        MidiOutputProducer {
            producer,
            dropped: Arc::clone(&dropped),
        },
        MidiOutputConsumer { consumer, dropped },
    )
}
