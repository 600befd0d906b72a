//! JSON snapshot persistence for the Scrivano automation engine.
//!
//! Persisted state is a handful of key-value snapshots, each a whole JSON
//! document rewritten on every mutation: the job collection, the credential
//! list, the current-credential index, and the authentication flag owned by
//! the UI collaborator. There is no schema versioning; a missing or
//! unreadable snapshot falls back to the key's default value.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod snapshot;

pub use snapshot::{SnapshotKey, SnapshotStore};
