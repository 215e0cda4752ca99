use padwork_core::TrackTarget;
use tracing::debug;

use super::Command;
use crate::context::SurfaceContext;
use crate::normalizer::ButtonEvent;
use crate::view::PadColor;

/// Normal: stop the track's clip. Shifted: back to the arrangement.
pub struct StopClipCommand {
    target: TrackTarget,
}

impl StopClipCommand {
    pub fn new(target: TrackTarget) -> Self {
        Self { target }
    }
}

impl Command for StopClipCommand {
    fn name(&self) -> &str {
        "Stop Clip"
    }

    fn execute_normal(&self, ctx: &mut SurfaceContext<'_>, event: &ButtonEvent) {
        if !event.is_down() {
            return;
        }
        let bank = ctx.tracks();
        match self.target.resolve(bank) {
            Some(track) => {
                bank.stop_clip(track);
            }
            None => debug!("Stop clip: no track for {:?}", self.target),
        }
    }

    fn execute_shifted(&self, ctx: &mut SurfaceContext<'_>, event: &ButtonEvent) {
        if !event.is_down() {
            return;
        }
        let bank = ctx.tracks();
        match self.target.resolve(bank) {
            Some(track) => {
                bank.return_to_arrangement(track);
            }
            None => debug!("Return to arrangement: no track for {:?}", self.target),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackToggle {
    Solo,
    Mute,
    Monitor,
}

pub struct TrackToggleCommand {
    target: TrackTarget,
    toggle: TrackToggle,
}

impl TrackToggleCommand {
    pub fn new(target: TrackTarget, toggle: TrackToggle) -> Self {
        Self { target, toggle }
    }
}

impl Command for TrackToggleCommand {
    fn name(&self) -> &str {
        match self.toggle {
            TrackToggle::Solo => "Solo",
            TrackToggle::Mute => "Mute",
            TrackToggle::Monitor => "Monitor",
        }
    }

    fn execute_normal(&self, ctx: &mut SurfaceContext<'_>, event: &ButtonEvent) {
        if !event.is_down() {
            return;
        }
        let bank = ctx.tracks();
        let Some(track) = self.target.resolve(bank) else {
            debug!("{}: no track for {:?}", self.name(), self.target);
            return;
        };
        let done = match self.toggle {
            TrackToggle::Solo => bank.toggle_solo(track),
            TrackToggle::Mute => bank.toggle_mute(track),
            TrackToggle::Monitor => bank.toggle_monitor(track),
        };
        if !done {
            debug!("{}: host refused track {}", self.name(), track);
        }
    }

    fn color(&self, ctx: &SurfaceContext<'_>) -> Option<PadColor> {
        let bank = ctx.tracks();
        let track = self.target.resolve(bank)?;
        let (on, color) = match self.toggle {
            TrackToggle::Solo => (bank.is_solo(track)?, PadColor::Soloed),
            TrackToggle::Mute => (bank.is_mute(track)?, PadColor::Muted),
            TrackToggle::Monitor => return Some(PadColor::Dim),
        };
        Some(if on { color } else { PadColor::Dim })
    }
}
