//! The settings bus as seen from a running session.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use padwork::core::{ObserverError, SettingValue};
use padwork::prelude::*;
use parking_lot::Mutex;

use crate::helpers::*;

#[test]
fn test_late_subscriber_sees_current_value() {
    let host = MockHost::new(2);
    let (session, _) = test_session(&host);
    session
        .bus()
        .set(&keys::NOTE_REPEAT_MODE, ArpPattern::UpDown)
        .unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    session
        .bus()
        .subscribe(&keys::NOTE_REPEAT_MODE, move |pattern: &ArpPattern| {
            sink.lock().push(*pattern);
            Ok(())
        });
    assert_eq!(*seen.lock(), vec![ArpPattern::UpDown]);

    session
        .bus()
        .set(&keys::NOTE_REPEAT_MODE, ArpPattern::Random)
        .unwrap();
    assert_eq!(*seen.lock(), vec![ArpPattern::UpDown, ArpPattern::Random]);
}

#[test]
fn test_failing_observer_does_not_stop_the_scheduler() {
    let host = MockHost::new(2);
    let (mut session, recorder) = test_session(&host);
    let bus = Arc::clone(session.bus());

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    bus.subscribe(&keys::NOTE_REPEAT_ACTIVE, move |_: &bool| {
        counter.fetch_add(1, Ordering::SeqCst);
        Err(ObserverError::new("display offline"))
    });

    bus.set(&keys::NOTE_REPEAT_ACTIVE, true).unwrap();
    assert!(session.clock().is_active());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(bus.observer_failures(), 2);

    session.ingest(pad_for(C3), RawSignal::Press { velocity: 100 }, 0);
    session.tick(&TransportSnapshot::playing_at(0, TEST_BPM));
    assert_eq!(recorder.note_ons(), vec![(0, C3)]);
}

#[test]
fn test_out_of_range_values_are_rejected() {
    let host = MockHost::new(2);
    let (session, _) = test_session(&host);
    let bus = session.bus();

    assert!(bus.set(&keys::NOTE_REPEAT_OCTAVE, 5).is_err());
    assert!(bus.set(&keys::MIDI_EDIT_CHANNEL, 16).is_err());
    assert!(bus
        .set_value(keys::NOTE_REPEAT_ACTIVE.name(), SettingValue::Int(1))
        .is_err());

    assert_eq!(bus.get(&keys::NOTE_REPEAT_OCTAVE), 0);
    assert_eq!(session.clock().config().octave_range, 0);
}

#[test]
fn test_names_parse_for_external_loaders() {
    assert_eq!("1/16".parse::<Resolution>().unwrap(), Resolution::Sixteenth);
    assert_eq!("up-down".parse::<ArpPattern>().unwrap(), ArpPattern::UpDown);
    assert!("1/5".parse::<Resolution>().is_err());
}
