//! Control-surface side of padwork.
//!
//! Raw hardware signals go through the [`EventNormalizer`] into canonical
//! DOWN / LONG / UP and knob events. The [`Router`] then hands each one to its
//! owner: the active [`View`] for pads, the active [`Mode`] for knobs, the
//! [`CommandRegistry`] for buttons. [`Surface`] ties the two together for one
//! controller model.
//!
//! # Example
//!
//! ```ignore
//! use padwork_control::{ControlId, ControlLayout, RawSignal, Surface, SurfaceEnv};
//!
//! let layout = ControlLayout::builder("Pad 16")
//!     .grid(4, 4)
//!     .pads(0, 36, 16)
//!     .knob(ControlId(100), 0)
//!     .build()?;
//!
//! let mut surface = Surface::builder(layout, env).build()?;
//! surface.ingest(ControlId(0), RawSignal::Press { velocity: 100 }, now_ms);
//! surface.poll(now_ms);
//! let state = surface.refresh();
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod control;
pub use control::{ControlClass, ControlId, ControlLayout, ControlSpec, GridGeometry, Modifier};

mod normalizer;
pub use normalizer::{
    ButtonEvent, ButtonPhase, ControlEvent, ControlInput, EventNormalizer, NormalizerStats,
    RawSignal, DEFAULT_LONG_PRESS_MS,
};

mod stack;
pub use stack::{Layer, LayerStack};

mod context;
pub use context::{ModifierState, SurfaceContext, SurfaceEnv};

pub mod command;
pub use command::{Command, CommandRegistry, CommandRegistryBuilder};

pub mod mode;
pub use mode::{Mode, ModeId, ModeStack, ParameterDisplay, ParameterSlot};

pub mod view;
pub use view::{PadColor, PadGrid, View, ViewId, ViewStack};

mod router;
pub use router::{Routed, Router, RouterStats, SurfaceState};

mod surface;
pub use surface::{Surface, SurfaceBuilder};

#[cfg(test)]
pub(crate) mod testing;
