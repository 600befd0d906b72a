//! Credential store for the Scrivano automation engine.
//!
//! An ordered list of opaque API keys plus a remembered "current index".
//! The index is persisted independently of the list and clamped into range
//! on every read, so deletions or a corrupt snapshot degrade to starting
//! from the first key rather than failing. The access layer pins the index
//! to the last key that worked, making rotation sticky across process
//! restarts.
//!
//! The ring is an explicit component with a constructor, never ambient
//! process state, so tests can run several independent instances.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod ring;

pub use ring::KeyRing;
