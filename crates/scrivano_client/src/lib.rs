//! Typed script-generation operations for the Scrivano automation engine.
//!
//! Each operation builds a provider request, funnels it through the access
//! layer's single `invoke`, and owns the validation of its response shape:
//! outline and hook calls return free text, chapter batches split on the
//! literal `---CHAPTER-BREAK---` delimiter, thumbnail ideas are a
//! schema-constrained JSON call, and thumbnail images expect an image
//! payload. Access-layer failures propagate unchanged.
//!
//! The [`ScriptGenerator`] trait is the seam the job engine drives, so
//! engine tests can substitute a scripted generator for the real client.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod generator;

pub use client::ScriptClient;
pub use generator::{CHAPTER_BREAK, ReferenceImage, ScriptGenerator, ThumbnailIdeas};
