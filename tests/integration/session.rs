//! Session lifecycle: building, the input queue, output and teardown.

use std::sync::Arc;
use std::thread;

use padwork::prelude::*;
use padwork::{Error, ViewId};

use crate::helpers::*;

#[test]
fn test_builder_requires_layout_and_host() {
    let host = MockHost::new(2);

    let err = ControllerSession::builder().host(host.clone()).build().err();
    assert!(matches!(err, Some(Error::Incomplete("control layout"))));

    let err = ControllerSession::builder().layout(test_layout()).build().err();
    assert!(matches!(err, Some(Error::Incomplete("host model"))));
}

#[test]
fn test_builder_rejects_commands_on_pads() {
    let host = MockHost::new(2);
    let commands = CommandRegistry::builder()
        .bind(pad(0), StopClipCommand::new(TrackTarget::Selected))
        .build()
        .unwrap();
    let bus = Arc::new(ConfigBus::with_defaults());

    let err = ControllerSession::builder()
        .layout(test_layout())
        .host(host)
        .bus(bus.clone())
        .commands(commands)
        .build()
        .err();
    assert!(matches!(
        err,
        Some(Error::Control(padwork::control::Error::NotAButton(ControlId(0))))
    ));
    // A failed build leaves nothing subscribed.
    assert_eq!(bus.observer_count(keys::NOTE_REPEAT_ACTIVE.name()), 0);
}

#[test]
fn test_pump_drains_queue_in_arrival_order() {
    let host = MockHost::new(4);
    let (mut session, recorder) = test_session(&host);
    let input = session.input_sender();

    let worker = thread::spawn(move || {
        for (i, note) in [C3, E3, C4].into_iter().enumerate() {
            let at = i as u64 * 10;
            input
                .send(InputEvent::new(pad_for(note), RawSignal::Press { velocity: 90 }, at))
                .unwrap();
        }
        for note in [E3, C3, C4] {
            input
                .send(InputEvent::new(pad_for(note), RawSignal::Release, 50))
                .unwrap();
        }
    });
    worker.join().unwrap();

    assert_eq!(session.pump(60), 6);
    assert_eq!(session.pump(70), 0);

    let order: Vec<(bool, u8)> = recorder
        .events()
        .iter()
        .map(|e| (e.is_note_on(), e.note))
        .collect();
    assert_eq!(
        order,
        vec![
            (true, C3),
            (true, E3),
            (true, C4),
            (false, E3),
            (false, C3),
            (false, C4),
        ]
    );
}

#[test]
fn test_long_press_fires_between_queued_events() {
    let host = MockHost::new(4);
    let (mut session, _) = test_session(&host);
    let input = session.input_sender();

    input
        .send(InputEvent::new(FADERS, RawSignal::Press { velocity: 127 }, 0))
        .unwrap();
    session.pump(100);
    assert_eq!(session.active_view(), ViewId::Fader(TrackParameter::Volume));

    // Held past the threshold before the release arrives: momentary overlay.
    input.send(InputEvent::new(FADERS, RawSignal::Release, 900)).unwrap();
    session.pump(900);
    assert_eq!(session.active_view(), ViewId::Play);
    assert_eq!(session.surface().normalizer_stats().long_presses.get(), 1);
}

#[test]
fn test_pump_polls_long_presses_without_input() {
    let host = MockHost::new(4);
    let (mut session, _) = test_session(&host);

    session.ingest(FADERS, RawSignal::Press { velocity: 127 }, 0);
    assert_eq!(session.pump(399), 0);
    assert_eq!(session.surface().normalizer_stats().long_presses.get(), 0);
    session.pump(400);
    assert_eq!(session.surface().normalizer_stats().long_presses.get(), 1);
}

#[test]
fn test_default_output_is_a_ring_buffer() {
    init_tracing();
    let host = MockHost::new(2);
    let mut session = ControllerSession::builder()
        .layout(test_layout())
        .host(host)
        .build()
        .unwrap();

    let mut output = session.take_midi_output().expect("ring buffer output");
    assert!(session.take_midi_output().is_none());

    session.ingest(pad(4), RawSignal::Press { velocity: 64 }, 0);
    session.ingest(pad(4), RawSignal::Release, 5);

    let events = output.drain_all();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].note, FIRST_NOTE + 4);
    assert_eq!(events[0].to_bytes(), vec![0x90, FIRST_NOTE + 4, 64]);
    assert!(!output.has_pending());
}

#[test]
fn test_clock_handle_runs_on_another_thread() {
    let host = MockHost::new(4);
    let (mut session, recorder) = test_session(&host);
    session.bus().set(&keys::NOTE_REPEAT_ACTIVE, true).unwrap();
    session.ingest(pad_for(C3), RawSignal::Press { velocity: 100 }, 0);

    let clock = session.clock();
    thread::spawn(move || {
        for ticks in (0..=960).step_by(120) {
            clock.process(&TransportSnapshot::playing_at(ticks, TEST_BPM));
        }
    })
    .join()
    .unwrap();

    assert_eq!(recorder.note_ons().len(), 5);
}

#[test]
fn test_teardown_silences_and_unsubscribes() {
    let host = MockHost::new(4);
    let (mut session, recorder) = test_session(&host);
    let bus = Arc::clone(session.bus());
    bus.set(&keys::NOTE_REPEAT_ACTIVE, true).unwrap();

    session.ingest(pad_for(C3), RawSignal::Press { velocity: 100 }, 0);
    session.tick(&TransportSnapshot::playing_at(0, TEST_BPM));
    assert_eq!(session.clock().sounding_count(), 1);
    recorder.take();

    assert_eq!(session.teardown(), 1);
    assert_eq!(recorder.note_offs(), vec![(0, C3)]);
    assert_eq!(bus.observer_count(keys::NOTE_REPEAT_ACTIVE.name()), 0);
    assert_eq!(bus.observer_count(keys::NOTE_REPEAT_PERIOD.name()), 0);

    // Idempotent, and nothing gets through afterwards.
    assert_eq!(session.teardown(), 0);
    assert!(session.is_torn_down());
    assert_eq!(session.ingest(pad_for(E3), RawSignal::Press { velocity: 100 }, 10), None);
    bus.set(&keys::NOTE_REPEAT_ACTIVE, false).unwrap();
    bus.set(&keys::NOTE_REPEAT_ACTIVE, true).unwrap();
    session.tick(&TransportSnapshot::playing_at(240, TEST_BPM));
    assert_eq!(recorder.len(), 1);
}

#[test]
fn test_teardown_releases_direct_notes() {
    let host = MockHost::new(4);
    let (mut session, recorder) = test_session(&host);

    session.ingest(pad_for(E3), RawSignal::Press { velocity: 100 }, 0);
    recorder.take();
    assert_eq!(session.teardown(), 1);
    assert_eq!(recorder.note_offs(), vec![(0, E3)]);
}

#[test]
fn test_sessions_share_a_bus() {
    init_tracing();
    let host = MockHost::new(4);
    let bus = Arc::new(ConfigBus::with_defaults());
    let build = || {
        ControllerSession::builder()
            .layout(test_layout())
            .host(host.clone())
            .bus(bus.clone())
            .seed(3)
            .build()
            .unwrap()
    };
    let mut first = build();
    let second = build();
    assert_eq!(bus.observer_count(keys::NOTE_REPEAT_ACTIVE.name()), 2);

    bus.set(&keys::NOTE_REPEAT_ACTIVE, true).unwrap();
    assert!(first.clock().is_active());
    assert!(second.clock().is_active());

    first.teardown();
    assert_eq!(bus.observer_count(keys::NOTE_REPEAT_ACTIVE.name()), 1);
    bus.set(&keys::NOTE_REPEAT_OCTAVE, 2).unwrap();
    assert_eq!(second.clock().config().octave_range, 2);
    assert_eq!(first.clock().config().octave_range, 0);
}
