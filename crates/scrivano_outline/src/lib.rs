//! Outline-text parsing for the Scrivano automation engine.
//!
//! Generation responses arrive as loosely structured text in a fixed wire
//! format (`Title:` line, `Chapter <N>:` blocks with word counts and
//! concept lines). This crate turns that text into a refined title plus an
//! ordered list of chapter descriptors.
//!
//! The parser is deliberately best-effort: malformed blocks are silently
//! dropped, extra whitespace is tolerated, and parsing never fails: an
//! input matching nothing yields an empty outline list, which the job
//! engine escalates to a hard failure for the job.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod parser;

pub use parser::{DEFAULT_TITLE, HOOK_TITLE, ParsedOutline, parse, render};
