use padwork_core::{TrackBank, TrackParameter};
use tracing::debug;

use super::{Mode, ModeId, ParameterDisplay, ParameterSlot};
use crate::context::SurfaceContext;
use crate::stack::Layer;

/// Knob *i* edits one parameter of track *i* in the bank page.
pub struct TrackParameterMode {
    parameter: TrackParameter,
    name: String,
}

impl TrackParameterMode {
    pub fn new(parameter: TrackParameter) -> Self {
        Self {
            parameter,
            name: parameter.label(),
        }
    }

    pub fn volume() -> Self {
        Self::new(TrackParameter::Volume)
    }

    pub fn pan() -> Self {
        Self::new(TrackParameter::Pan)
    }

    pub fn send(send: usize) -> Self {
        Self::new(TrackParameter::Send(send))
    }

    pub fn parameter(&self) -> TrackParameter {
        self.parameter
    }

    fn target(&self, bank: &dyn TrackBank, index: usize) -> Option<usize> {
        (index < bank.page_size() && bank.exists(index)).then_some(index)
    }

    fn format(&self, value: f64) -> String {
        match self.parameter {
            TrackParameter::Pan => {
                let offset = ((value - 0.5) * 200.0).round() as i32;
                match offset {
                    0 => "C".to_string(),
                    o if o < 0 => format!("L{}", -o),
                    o => format!("R{o}"),
                }
            }
            _ => format!("{:.0}%", value * 100.0),
        }
    }
}

impl Layer for TrackParameterMode {
    type Id = ModeId;

    fn id(&self) -> ModeId {
        ModeId::Track(self.parameter)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Mode for TrackParameterMode {
    fn on_knob(&self, ctx: &mut SurfaceContext<'_>, index: usize, delta: i32) {
        let bank = ctx.tracks();
        let Some(track) = self.target(bank, index) else {
            debug!("{}: no track for knob {}", self.name, index);
            return;
        };

        if ctx.modifiers.delete {
            self.parameter.reset(bank, track);
            return;
        }

        let Some(current) = self.parameter.get(bank, track) else {
            return;
        };
        self.parameter
            .set(bank, track, current + ctx.knob_increment(delta));
    }

    fn knob_value(&self, ctx: &SurfaceContext<'_>, index: usize) -> Option<f64> {
        let bank = ctx.tracks();
        self.parameter.get(bank, self.target(bank, index)?)
    }

    fn update_display(&self, ctx: &SurfaceContext<'_>) -> ParameterDisplay {
        let bank = ctx.tracks();
        let slots = (0..bank.page_size())
            .map(|index| match self.target(bank, index) {
                Some(track) => {
                    let value = self.parameter.get(bank, track);
                    ParameterSlot {
                        label: bank
                            .name(track)
                            .unwrap_or_else(|| format!("Track {}", track + 1)),
                        value: value.map(|v| self.format(v)).unwrap_or_default(),
                        normalized: value,
                    }
                }
                None => ParameterSlot::default(),
            })
            .collect();

        ParameterDisplay {
            title: self.name.clone(),
            slots,
        }
    }
}
