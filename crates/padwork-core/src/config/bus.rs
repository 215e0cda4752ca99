//! The observer bus itself.

use std::panic::{catch_unwind, AssertUnwindSafe};

use dashmap::DashMap;
use thiserror::Error;
use tracing::{debug, error, warn};

use super::keys::{self, Key};
use super::value::{SettingType, SettingValue};
use crate::compat::{Arc, AtomicU64, Ordering};
use crate::lockfree::Counter;
use crate::{Error, Result};

/// Failure reported by an observer. Logged and counted, never propagated to
/// the setter.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct ObserverError(pub String);

impl ObserverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Handle returned by [`ConfigBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Observer = Arc<dyn Fn(&SettingValue) -> core::result::Result<(), ObserverError> + Send + Sync>;

struct Slot {
    value: SettingValue,
    range: Option<(i32, i32)>,
    observers: Vec<(SubscriptionId, Observer)>,
}

impl Slot {
    fn new(value: SettingValue, range: Option<(i32, i32)>) -> Self {
        Self {
            value,
            range,
            observers: Vec::new(),
        }
    }
}

/// Process-wide settings registry with synchronous change notification.
///
/// Shared between controller sessions as an `Arc<ConfigBus>`. No shard lock is
/// held while observers run, so an observer may read or write the bus.
pub struct ConfigBus {
    slots: DashMap<&'static str, Slot>,
    next_id: AtomicU64,
    failures: Counter,
}

impl ConfigBus {
    /// An empty bus. Keys are registered on first typed access.
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
            next_id: AtomicU64::new(1),
            failures: Counter::new(),
        }
    }

    /// A bus pre-populated with every standard key at its default.
    pub fn with_defaults() -> Self {
        let bus = Self::new();
        for (name, value, range) in keys::standard() {
            bus.slots.insert(name, Slot::new(value, range));
        }
        bus
    }

    /// Register a key at its default value. No-op if already present.
    pub fn register<T: SettingType>(&self, key: &Key<T>) {
        self.slots
            .entry(key.name())
            .or_insert_with(|| Slot::new(key.default_value().into_value(), key.range()));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Current value, or the key's default if it was never registered.
    pub fn get<T: SettingType>(&self, key: &Key<T>) -> T {
        self.slots
            .get(key.name())
            .and_then(|slot| T::from_value(&slot.value))
            .unwrap_or_else(|| key.default_value())
    }

    pub fn get_value(&self, name: &str) -> Option<SettingValue> {
        self.slots.get(name).map(|slot| slot.value.clone())
    }

    /// Store a typed value and notify its observers.
    pub fn set<T: SettingType>(&self, key: &Key<T>, value: T) -> Result<()> {
        self.register(key);
        self.store_and_notify(key.name(), value.into_value())
    }

    /// Store a dynamically typed value (external settings loaders).
    ///
    /// The key must already be registered and the value must match its type.
    pub fn set_value(&self, name: &str, value: SettingValue) -> Result<()> {
        self.store_and_notify(name, value)
    }

    /// Flip a bool setting, returning the new value.
    pub fn toggle(&self, key: &Key<bool>) -> Result<bool> {
        let value = !self.get(key);
        self.set(key, value)?;
        Ok(value)
    }

    /// Register an observer and invoke it once with the current value.
    pub fn subscribe<T, F>(&self, key: &Key<T>, observer: F) -> SubscriptionId
    where
        T: SettingType,
        F: Fn(&T) -> core::result::Result<(), ObserverError> + Send + Sync + 'static,
    {
        let name = key.name();
        let observer: Observer = Arc::new(move |value: &SettingValue| match T::from_value(value) {
            Some(typed) => observer(&typed),
            None => Err(ObserverError::new(format!(
                "expected {} value, got {}",
                T::TYPE_NAME,
                value.type_name()
            ))),
        });

        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let current = {
            let mut slot = self
                .slots
                .entry(name)
                .or_insert_with(|| Slot::new(key.default_value().into_value(), key.range()));
            slot.observers.push((id, Arc::clone(&observer)));
            slot.value.clone()
        };

        debug!("Subscribed {:?} to setting {}", id, name);
        self.invoke(name, &observer, &current);
        id
    }

    /// Remove one observer. Returns `false` if the id is unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        for mut slot in self.slots.iter_mut() {
            if let Some(pos) = slot.observers.iter().position(|(sid, _)| *sid == id) {
                slot.observers.remove(pos);
                return true;
            }
        }
        false
    }

    /// Drop every observer (session teardown). Values are kept.
    pub fn clear_observers(&self) {
        for mut slot in self.slots.iter_mut() {
            slot.observers.clear();
        }
    }

    pub fn observer_count(&self, name: &str) -> usize {
        self.slots
            .get(name)
            .map(|slot| slot.observers.len())
            .unwrap_or(0)
    }

    /// Number of observer invocations that returned an error or panicked.
    pub fn observer_failures(&self) -> u64 {
        self.failures.get()
    }

    fn store_and_notify(&self, name: &str, value: SettingValue) -> Result<()> {
        let (key, observers) = {
            let mut slot = self
                .slots
                .get_mut(name)
                .ok_or_else(|| Error::UnknownSetting(name.to_string()))?;

            if !slot.value.same_type(&value) {
                return Err(Error::TypeMismatch {
                    key: name.to_string(),
                    expected: slot.value.type_name(),
                    actual: value.type_name(),
                });
            }

            if let (SettingValue::Int(v), Some((min, max))) = (&value, slot.range) {
                if *v < min || *v > max {
                    return Err(Error::OutOfRange {
                        key: name.to_string(),
                        value: *v,
                        min,
                        max,
                    });
                }
            }

            slot.value = value.clone();
            let observers: Vec<Observer> = slot
                .observers
                .iter()
                .map(|(_, observer)| Arc::clone(observer))
                .collect();
            (*slot.key(), observers)
        };

        for observer in &observers {
            self.invoke(key, observer, &value);
        }
        Ok(())
    }

    fn invoke(&self, name: &str, observer: &Observer, value: &SettingValue) {
        match catch_unwind(AssertUnwindSafe(|| observer(value))) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                self.failures.incr();
                warn!("Observer for setting {} failed: {}", name, err);
            }
            Err(_) => {
                self.failures.incr();
                error!("Observer for setting {} panicked", name);
            }
        }
    }
}

impl Default for ConfigBus {
    fn default() -> Self {
        Self::with_defaults()
    }
}
