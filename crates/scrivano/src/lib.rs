//! Scrivano: unattended multi-stage script generation.
//!
//! This facade crate ties the workspace together and re-exports the types
//! an embedding application needs: the job engine and its control surface,
//! the access layer, the typed generation client, and the outline parser.
//!
//! # Architecture
//!
//! ```text
//! scrivano_engine   - persistent job queue + cooperative scheduler
//!     │ drives
//! scrivano_client   - typed operations (outline, hook, batches, thumbnails)
//!     │ invokes through
//! scrivano_gateway  - pacing gate + credential failover
//!     │ calls
//! scrivano_gemini   - Gemini REST driver
//! ```
//!
//! # Example
//!
//! ```no_run
//! use scrivano::{
//!     Engine, EngineConfig, Gateway, GeminiProvider, KeyRing, PacingGate, ScriptClient,
//!     SnapshotStore,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SnapshotStore::new("./data")?;
//! let ring = KeyRing::with_store(store.clone());
//! let gateway = Gateway::new(GeminiProvider::new(), ring, PacingGate::default());
//! let client = ScriptClient::new(gateway);
//! let engine = Engine::new(client, store, EngineConfig::default());
//!
//! engine.enqueue("The Lighthouse", "a keeper hears knocking at night", 30);
//! engine.run().await;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod settings;
pub mod telemetry;

pub use settings::ScrivanoSettings;

pub use scrivano_client::{
    CHAPTER_BREAK, ReferenceImage, ScriptClient, ScriptGenerator, ThumbnailIdeas,
};
pub use scrivano_core::{ChapterOutline, count_words};
pub use scrivano_engine::{Engine, EngineConfig, Job, JobStatus, RunState};
pub use scrivano_error::{ScrivanoError, ScrivanoErrorKind, ScrivanoResult};
pub use scrivano_gateway::{Gateway, PacingGate, Provider};
pub use scrivano_gemini::GeminiProvider;
pub use scrivano_keys::KeyRing;
pub use scrivano_outline::{DEFAULT_TITLE, ParsedOutline, parse, render};
pub use scrivano_storage::{SnapshotKey, SnapshotStore};
