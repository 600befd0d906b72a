//! Google Gemini REST driver for the Scrivano access layer.
//!
//! Implements the gateway's [`Provider`](scrivano_gateway::Provider) seam
//! over the `generateContent` REST endpoint with `reqwest`. One driver
//! instance serves every credential: the API key travels per call, which is
//! what lets the access layer rotate keys between attempts.
//!
//! The driver forces evaluation of the response payload before reporting
//! success: HTTP error statuses, prompt-feedback block reasons, safety
//! finish reasons, and empty candidate lists all surface as errors so the
//! failover loop never pins a credential on a blocked response.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod dto;
mod provider;

pub use provider::GeminiProvider;
