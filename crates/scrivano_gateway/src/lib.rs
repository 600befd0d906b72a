//! Access layer for the Scrivano automation engine.
//!
//! Every outbound provider call funnels through one operation,
//! [`Gateway::invoke`], which layers two behaviors over a black-box
//! [`Provider`]:
//!
//! - **Global pacing**: a single shared [`PacingGate`] enforces a minimum
//!   delay between any two calls, across all credentials and all callers,
//!   modeling a shared-quota upstream limit.
//! - **Credential failover**: failures are assumed to be credential-specific
//!   (quota, invalid key) more often than request-specific, so the gateway
//!   rotates through the key ring (each key at most once per call) and
//!   pins the ring to the key that worked.
//!
//! Both pieces of shared state are explicit injectable components with
//! process-wide lifetime but ordinary constructors, so tests can run
//! multiple independent instances.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gateway;
mod pacing;
mod provider;

pub use gateway::Gateway;
pub use pacing::{DEFAULT_MIN_CALL_INTERVAL, PacingGate};
pub use provider::Provider;
