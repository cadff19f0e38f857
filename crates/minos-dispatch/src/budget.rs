//! Request budget for recycled workers.
//!
//! A worker serves a limited number of requests before asking its supervisor
//! to replace it. The limit comes from `max_requests` with up to 20% jitter
//! either way, so workers started together do not restart together.

use std::sync::atomic::{AtomicU64, Ordering};

use minos_config::Config;
use parking_lot::Mutex;
use rand::Rng;

use crate::process::ProcessControl;

/// Configuration key holding the request limit.
pub const MAX_REQUESTS_KEY: &str = "max_requests";

/// Fraction of the limit used as jitter range.
pub const MAX_REQUEST_JITTER: f64 = 0.2;

/// Process-wide request counter and its jittered limit.
#[derive(Debug)]
pub struct WorkerBudget {
    config: Config,
    is_worker: bool,
    count: AtomicU64,
    max_requests: Mutex<Option<u64>>,
}

impl WorkerBudget {
    /// Creates a budget reading its limit from `config`.
    pub fn new(config: Config, is_worker: bool) -> Self {
        Self {
            config,
            is_worker,
            count: AtomicU64::new(0),
            max_requests: Mutex::new(None),
        }
    }

    /// Requests counted so far.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::SeqCst)
    }

    /// Counts one request and asks for a shutdown once the limit is reached.
    ///
    /// Returns the new count.
    pub fn increment(&self, process: &dyn ProcessControl) -> u64 {
        let count = self.count.fetch_add(1, Ordering::SeqCst) + 1;
        minos_telemetry::metrics::record_worker_requests(count);

        if self.should_stop_worker() {
            tracing::info!(count, "request limit reached, requesting shutdown");
            process.request_shutdown();
        }
        count
    }

    /// The jittered limit, `0` meaning unlimited.
    ///
    /// Computed on first use and fixed until [`reset`](Self::reset).
    pub fn max_requests(&self) -> u64 {
        let mut cached = self.max_requests.lock();
        if let Some(max) = *cached {
            return max;
        }

        let max = match self.config.get_u64(MAX_REQUESTS_KEY) {
            Ok(configured) => apply_jitter(configured, &mut rand::thread_rng()),
            Err(_) => 0,
        };
        tracing::info!("Worker started with request limit of {max}");

        *cached = Some(max);
        max
    }

    /// Returns `true` when this worker has used up its budget.
    ///
    /// Always `false` outside a worker; the limit is never computed there.
    pub fn should_stop_worker(&self) -> bool {
        if !self.is_worker {
            return false;
        }
        let max = self.max_requests();
        max > 0 && self.count() >= max
    }

    /// Forgets the cached limit; the next check reads configuration again.
    pub fn reset(&self) {
        *self.max_requests.lock() = None;
    }
}

/// `max` plus a uniform offset in `[-r, r]`, `r = round(max * 0.2)`, floored
/// at zero.
pub fn apply_jitter<R: Rng + ?Sized>(max: u64, rng: &mut R) -> u64 {
    let range = i128::from((max as f64 * MAX_REQUEST_JITTER).round() as u64);
    let jitter = if range > 0 {
        rng.gen_range(-range..=range)
    } else {
        0
    };
    (i128::from(max) + jitter).clamp(0, i128::from(u64::MAX)) as u64
}
