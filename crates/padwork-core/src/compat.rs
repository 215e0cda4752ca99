//! Shared sync and collection re-exports.

pub use parking_lot::{Mutex, MutexGuard, RwLock};

pub use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicU64, AtomicU8, AtomicUsize, Ordering},
        Arc, Weak,
    },
};
