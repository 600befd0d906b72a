//! Global call pacing.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Default minimum spacing between any two outbound calls.
///
/// Derived from the provider's shared request-per-minute quota; one call
/// every seven seconds stays under it with headroom for retries.
pub const DEFAULT_MIN_CALL_INTERVAL: Duration = Duration::from_secs(7);

/// Enforces a minimum delay between outbound calls.
///
/// One gate is shared by every caller and every credential: the upstream
/// quota is account-wide, not per-key. The gate holds its lock across the
/// wait and stamps the new call time *before* the call is issued, so two
/// overlapping slow calls cannot both slip under it: the second caller
/// queues on the lock and then measures from the first caller's stamp.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use scrivano_gateway::PacingGate;
///
/// # async fn example() {
/// let gate = PacingGate::new(Duration::from_secs(7));
/// gate.acquire().await; // immediate on first call
/// gate.acquire().await; // sleeps out the remainder of the interval
/// # }
/// ```
#[derive(Debug)]
pub struct PacingGate {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl PacingGate {
    /// Creates a gate with the given minimum spacing.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// The configured minimum spacing.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Waits until the minimum spacing since the previous call has
    /// elapsed, then stamps the current time as the new last-call instant.
    pub async fn acquire(&self) {
        let mut last_call = self.last_call.lock().await;

        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!(wait_ms = wait.as_millis() as u64, "Pacing outbound call");
                tokio::time::sleep(wait).await;
            }
        }

        // Stamp before the call completes, not after, so a slow in-flight
        // call still gates the next one.
        *last_call = Some(Instant::now());
    }

    /// Clears the stamp; the next call proceeds without waiting.
    pub async fn reset(&self) {
        *self.last_call.lock().await = None;
    }
}

impl Default for PacingGate {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CALL_INTERVAL)
    }
}
