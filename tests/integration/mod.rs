//! Integration test modules for padwork

pub mod note_repeat;
pub mod session;
pub mod settings;
