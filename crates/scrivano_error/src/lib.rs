//! Error types for the Scrivano automation engine.
//!
//! This crate provides the foundation error types used throughout the Scrivano workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use scrivano_error::{ScrivanoResult, HttpError};
//!
//! fn fetch_data() -> ScrivanoResult<String> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod config;
mod engine;
mod error;
mod gateway;
mod gemini;
mod http;
mod json;
mod storage;

pub use client::{ClientError, ClientErrorKind};
pub use config::ConfigError;
pub use engine::{EngineError, EngineErrorKind, STOPPED_BY_USER};
pub use error::{ScrivanoError, ScrivanoErrorKind, ScrivanoResult};
pub use gateway::{GatewayError, GatewayErrorKind, extract_provider_message};
pub use gemini::{GeminiError, GeminiErrorKind};
pub use http::HttpError;
pub use json::JsonError;
pub use storage::{StorageError, StorageErrorKind};
