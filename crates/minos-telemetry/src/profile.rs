//! Timing helper for startup and request phases.

use std::time::{Duration, Instant};

/// Logs how long something took since `started_at`, at debug level.
///
/// Returns the elapsed time so callers can reuse it.
///
/// # Example
///
/// ```
/// use std::time::Instant;
///
/// let start = Instant::now();
/// // load filters...
/// let elapsed = minos_telemetry::profile("Load filters", start);
/// assert!(elapsed.as_secs() < 60);
/// ```
pub fn profile(label: &str, started_at: Instant) -> Duration {
    let elapsed = started_at.elapsed();
    tracing::debug!(
        duration_ms = elapsed.as_millis() as u64,
        "Performance: {label} took {}ms",
        elapsed.as_millis()
    );
    elapsed
}
