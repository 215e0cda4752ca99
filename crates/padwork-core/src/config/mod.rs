//! Configuration Observer Bus.
//!
//! A registry of typed settings. Every `set` stores the value and then
//! synchronously notifies the observers registered for that key, in
//! registration order. An external loader populates the bus and an external
//! writer persists it; nothing in here touches storage.

mod bus;
pub mod keys;
mod value;

pub use bus::{ConfigBus, ObserverError, SubscriptionId};
pub use keys::Key;
pub use value::{SettingType, SettingValue};
