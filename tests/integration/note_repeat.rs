//! Note repeat driven through a session: pads in, transport ticks, notes out.

use approx::assert_relative_eq;
use padwork::core::ticks_to_millis;
use padwork::prelude::*;
use padwork::RepeatState;

use crate::helpers::*;

fn press(session: &mut ControllerSession, note: u8, at_ms: u64) {
    session.ingest(pad_for(note), RawSignal::Press { velocity: 100 }, at_ms);
}

fn release(session: &mut ControllerSession, note: u8, at_ms: u64) {
    session.ingest(pad_for(note), RawSignal::Release, at_ms);
}

fn activate(session: &ControllerSession) {
    session.bus().set(&keys::NOTE_REPEAT_ACTIVE, true).unwrap();
}

#[test]
fn test_sixteenths_up_one_octave() {
    let host = MockHost::new(4);
    let (mut session, recorder) = test_session(&host);
    configure_repeat(
        &session,
        Resolution::Sixteenth,
        Resolution::ThirtySecond,
        ArpPattern::Up,
        1,
    );
    activate(&session);
    press(&mut session, C3, 0);
    assert_eq!(session.clock().state(), RepeatState::Running);

    run_clock(&session, 0, 960, 60);

    assert_eq!(
        recorder.note_ons(),
        vec![(0, C3), (240, C4), (480, C3), (720, C4), (960, C3)]
    );
    assert_eq!(
        recorder.note_offs(),
        vec![(120, C3), (360, C4), (600, C3), (840, C4)]
    );

    // 1/16 at 120 BPM is 125 ms, the gate 62.5 ms.
    assert_relative_eq!(ticks_to_millis(240, TEST_BPM), 125.0);
    assert_relative_eq!(ticks_to_millis(120, TEST_BPM), 62.5);
}

#[test]
fn test_down_pattern_uses_pitch_order() {
    let host = MockHost::new(4);
    let (mut session, recorder) = test_session(&host);
    configure_repeat(
        &session,
        Resolution::Sixteenth,
        Resolution::ThirtySecond,
        ArpPattern::Down,
        0,
    );
    activate(&session);
    // Insertion order is C3, E3. DOWN still starts on the higher pitch.
    press(&mut session, C3, 0);
    press(&mut session, E3, 1);

    run_clock(&session, 0, 720, 240);

    let notes: Vec<u8> = recorder.note_ons().into_iter().map(|(_, n)| n).collect();
    assert_eq!(notes, vec![E3, C3, E3, C3]);
}

#[test]
fn test_repress_between_boundaries_uses_final_state() {
    let host = MockHost::new(4);
    let (mut session, recorder) = test_session(&host);
    configure_repeat(
        &session,
        Resolution::Sixteenth,
        Resolution::ThirtySecond,
        ArpPattern::Up,
        0,
    );
    activate(&session);
    press(&mut session, C3, 0);
    run_clock(&session, 0, 60, 60);

    // Between boundaries: C3 goes away, E3 comes in, C3 flickers.
    release(&mut session, C3, 40);
    press(&mut session, E3, 45);
    press(&mut session, C3, 50);
    release(&mut session, C3, 55);
    run_clock(&session, 120, 240, 60);

    assert_eq!(recorder.note_ons(), vec![(0, C3), (240, E3)]);
    let held: Vec<u8> = session.clock().held_notes().iter().map(|h| h.note).collect();
    assert_eq!(held, vec![E3]);
}

#[test]
fn test_deactivate_flushes_sounding_notes_once() {
    let host = MockHost::new(4);
    let (mut session, recorder) = test_session(&host);
    configure_repeat(
        &session,
        Resolution::Sixteenth,
        Resolution::Quarter,
        ArpPattern::All,
        0,
    );
    activate(&session);
    press(&mut session, C3, 0);
    press(&mut session, E3, 0);
    run_clock(&session, 0, 60, 60);
    assert_eq!(session.clock().sounding_count(), 2);
    recorder.take();

    // The note-repeat button toggles the setting, which stops the scheduler.
    session.ingest(REPEAT, RawSignal::Press { velocity: 127 }, 100);
    assert_eq!(session.clock().state(), RepeatState::Off);
    let flushed = recorder.take();
    assert_eq!(flushed.len(), 2);
    assert!(flushed.iter().all(|e| e.is_note_off()));

    run_clock(&session, 120, 1920, 60);
    release(&mut session, C3, 200);
    release(&mut session, E3, 200);
    assert_eq!(recorder.len(), 0);
    assert_eq!(session.clock().stats().orphan_releases(), 2);
}

#[test]
fn test_transport_stop_releases_notes() {
    let host = MockHost::new(4);
    let (mut session, recorder) = test_session(&host);
    configure_repeat(
        &session,
        Resolution::Eighth,
        Resolution::Eighth,
        ArpPattern::Up,
        0,
    );
    activate(&session);
    press(&mut session, C3, 0);

    host.play_at(0);
    session.tick_from_host();
    host.play_at(200);
    session.tick_from_host();
    host.stop_at(200);
    session.tick_from_host();

    assert_eq!(recorder.note_ons(), vec![(0, C3)]);
    assert_eq!(recorder.note_offs(), vec![(200, C3)]);
    assert_eq!(session.clock().sounding_count(), 0);
    // Held notes do not survive a stop.
    assert_eq!(session.clock().state(), RepeatState::Armed);
}

#[test]
fn test_pads_play_through_while_off() {
    let host = MockHost::new(4);
    let (mut session, recorder) = test_session(&host);
    session.bus().set(&keys::MIDI_EDIT_CHANNEL, 9).unwrap();

    press(&mut session, E3, 0);
    release(&mut session, E3, 80);

    let events = recorder.events();
    assert_eq!(events.len(), 2);
    assert!(events[0].is_note_on());
    assert_eq!((events[0].note, events[0].channel, events[0].velocity), (E3, 9, 100));
    assert!(events[1].is_note_off());
    assert_eq!(events[1].channel, 9);
}

#[test]
fn test_accent_overrides_velocity() {
    let host = MockHost::new(4);
    let (mut session, recorder) = test_session(&host);
    configure_repeat(
        &session,
        Resolution::Sixteenth,
        Resolution::ThirtySecond,
        ArpPattern::Up,
        0,
    );
    session.bus().set(&keys::ACCENT_VALUE, 110).unwrap();
    session.bus().set(&keys::ACCENT_ACTIVE, true).unwrap();
    activate(&session);
    session.ingest(pad_for(C3), RawSignal::Press { velocity: 20 }, 0);
    run_clock(&session, 0, 240, 240);

    let velocities: Vec<u8> = recorder
        .events()
        .iter()
        .filter(|e| e.is_note_on())
        .map(|e| e.velocity)
        .collect();
    assert_eq!(velocities, vec![110, 110]);
}

#[test]
fn test_period_change_applies_at_next_boundary() {
    let host = MockHost::new(4);
    let (mut session, recorder) = test_session(&host);
    configure_repeat(
        &session,
        Resolution::Sixteenth,
        Resolution::ThirtySecond,
        ArpPattern::Up,
        0,
    );
    activate(&session);
    press(&mut session, C3, 0);
    run_clock(&session, 0, 240, 60);

    session
        .bus()
        .set(&keys::NOTE_REPEAT_PERIOD, Resolution::Eighth)
        .unwrap();
    run_clock(&session, 300, 960, 60);

    let ticks: Vec<u64> = recorder.note_ons().into_iter().map(|(t, _)| t).collect();
    assert_eq!(ticks, vec![0, 240, 480, 960]);
}
