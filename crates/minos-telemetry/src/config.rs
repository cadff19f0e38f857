//! Telemetry configuration.

use crate::logging::LogConfig;
use crate::metrics::MetricsConfig;

/// Configuration for all telemetry subsystems.
#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    /// Logging configuration.
    pub logging: LogConfig,

    /// Metrics configuration.
    pub metrics: MetricsConfig,
}

impl TelemetryConfig {
    /// Presets for an environment name; metrics stay disabled.
    #[must_use]
    pub fn for_environment(environment: &str) -> Self {
        Self {
            logging: LogConfig::for_environment(environment),
            metrics: MetricsConfig::default(),
        }
    }

    /// Enables the Prometheus exporter on `addr`.
    #[must_use]
    pub fn with_metrics_addr(mut self, addr: &str) -> Self {
        self.metrics.enabled = true;
        self.metrics.addr = addr.to_string();
        self
    }

    /// Replaces the logging configuration.
    #[must_use]
    pub fn with_logging(mut self, logging: LogConfig) -> Self {
        self.logging = logging;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_environment() {
        let config = TelemetryConfig::for_environment("development");
        assert_eq!(config.logging.level, "debug");
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn test_with_metrics_addr() {
        let config = TelemetryConfig::default().with_metrics_addr("127.0.0.1:9999");

        assert!(config.metrics.enabled);
        assert_eq!(config.metrics.addr, "127.0.0.1:9999");
    }
}
