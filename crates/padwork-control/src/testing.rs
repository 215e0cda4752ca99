//! In-memory host for unit tests.

use padwork_core::compat::{Arc, Mutex};
use padwork_core::{ConfigBus, HostModel, HostTransport, TimeSignature, TrackBank};
use padwork_midi::{NoteRepeat, ScheduledEvent};

use crate::context::SurfaceEnv;

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeTrack {
    pub volume: f64,
    pub pan: f64,
    pub solo: bool,
    pub mute: bool,
    pub stopped: u32,
    pub arranged: u32,
}

pub(crate) struct FakeHost {
    pub tracks: Mutex<Vec<FakeTrack>>,
    pub selected: Mutex<Option<usize>>,
}

impl FakeHost {
    pub fn new(count: usize) -> Self {
        let track = FakeTrack {
            volume: 0.5,
            pan: 0.5,
            ..FakeTrack::default()
        };
        Self {
            tracks: Mutex::new(vec![track; count]),
            selected: Mutex::new(Some(0)),
        }
    }

    pub fn track(&self, index: usize) -> FakeTrack {
        self.tracks.lock()[index].clone()
    }

    fn with<R>(&self, index: usize, f: impl FnOnce(&mut FakeTrack) -> R) -> Option<R> {
        self.tracks.lock().get_mut(index).map(f)
    }
}

impl TrackBank for FakeHost {
    fn page_size(&self) -> usize {
        self.tracks.lock().len()
    }

    fn selected(&self) -> Option<usize> {
        *self.selected.lock()
    }

    fn exists(&self, index: usize) -> bool {
        index < self.tracks.lock().len()
    }

    fn name(&self, index: usize) -> Option<String> {
        self.exists(index).then(|| format!("Track {}", index + 1))
    }

    fn volume(&self, index: usize) -> Option<f64> {
        self.with(index, |t| t.volume)
    }

    fn set_volume(&self, index: usize, value: f64) -> bool {
        self.with(index, |t| t.volume = value).is_some()
    }

    fn reset_volume(&self, index: usize) -> bool {
        self.set_volume(index, 0.5)
    }

    fn pan(&self, index: usize) -> Option<f64> {
        self.with(index, |t| t.pan)
    }

    fn set_pan(&self, index: usize, value: f64) -> bool {
        self.with(index, |t| t.pan = value).is_some()
    }

    fn reset_pan(&self, index: usize) -> bool {
        self.set_pan(index, 0.5)
    }

    fn send_level(&self, _index: usize, _send: usize) -> Option<f64> {
        None
    }

    fn set_send_level(&self, _index: usize, _send: usize, _value: f64) -> bool {
        false
    }

    fn is_solo(&self, index: usize) -> Option<bool> {
        self.with(index, |t| t.solo)
    }

    fn toggle_solo(&self, index: usize) -> bool {
        self.with(index, |t| t.solo = !t.solo).is_some()
    }

    fn is_mute(&self, index: usize) -> Option<bool> {
        self.with(index, |t| t.mute)
    }

    fn toggle_mute(&self, index: usize) -> bool {
        self.with(index, |t| t.mute = !t.mute).is_some()
    }

    fn toggle_monitor(&self, _index: usize) -> bool {
        false
    }

    fn stop_clip(&self, index: usize) -> bool {
        self.with(index, |t| t.stopped += 1).is_some()
    }

    fn return_to_arrangement(&self, index: usize) -> bool {
        self.with(index, |t| t.arranged += 1).is_some()
    }

    fn select(&self, index: usize) -> bool {
        if !self.exists(index) {
            return false;
        }
        *self.selected.lock() = Some(index);
        true
    }
}

impl HostTransport for FakeHost {
    fn is_playing(&self) -> bool {
        false
    }

    fn tempo(&self) -> f64 {
        120.0
    }

    fn time_signature(&self) -> TimeSignature {
        TimeSignature::default()
    }

    fn position_ticks(&self) -> u64 {
        0
    }
}

impl HostModel for FakeHost {
    fn tracks(&self) -> &dyn TrackBank {
        self
    }

    fn transport(&self) -> &dyn HostTransport {
        self
    }
}

pub(crate) struct Fixture {
    pub host: Arc<FakeHost>,
    pub env: SurfaceEnv,
    pub events: Arc<Mutex<Vec<ScheduledEvent>>>,
}

/// Four tracks, default settings, note output captured in `events`.
pub(crate) fn fixture() -> Fixture {
    let host = Arc::new(FakeHost::new(4));
    let bus = Arc::new(ConfigBus::with_defaults());
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let notes = Arc::new(NoteRepeat::with_seed(
        move |event: ScheduledEvent| sink.lock().push(event),
        7,
    ));
    notes.bind(&bus);
    let env = SurfaceEnv {
        host: host.clone(),
        bus,
        notes,
    };
    Fixture { host, env, events }
}
