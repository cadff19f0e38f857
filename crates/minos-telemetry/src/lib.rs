//! Observability for Minos.
//!
//! - **Logging**: `tracing` subscriber setup, pretty in development and JSON
//!   elsewhere
//! - **Profiling**: [`profile`] logs how long a startup or request phase took
//! - **Metrics**: Prometheus-format dispatch metrics via the `metrics` crate
//!
//! # Example
//!
//! ```rust,ignore
//! use minos_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::for_environment("production")
//!     .with_metrics_addr("0.0.0.0:9090");
//! init_telemetry(&config)?;
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
mod profile;

pub use config::TelemetryConfig;
pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig};
pub use metrics::{init_metrics, MetricsConfig};
pub use profile::profile;

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Initializes logging, then metrics.
///
/// # Errors
///
/// Returns `TelemetryError` if any subsystem fails to initialize.
pub fn init_telemetry(config: &TelemetryConfig) -> TelemetryResult<()> {
    init_logging(&config.logging)?;
    init_metrics(&config.metrics)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_with_everything_disabled() {
        let config = TelemetryConfig::default().with_logging(LogConfig {
            enabled: false,
            ..LogConfig::default()
        });

        assert!(init_telemetry(&config).is_ok());
    }
}
