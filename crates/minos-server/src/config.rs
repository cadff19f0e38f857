//! Server configuration types.
//!
//! # Example
//!
//! ```rust
//! use minos_server::ServerConfig;
//! use std::time::Duration;
//!
//! let config = ServerConfig::builder()
//!     .hostname("127.0.0.1")
//!     .port(3000)
//!     .shutdown_timeout(Duration::from_secs(10))
//!     .build();
//!
//! assert_eq!(config.hostname(), "127.0.0.1");
//! assert_eq!(config.port(), Some(3000));
//! ```

use std::time::Duration;

/// Default bind host.
pub const DEFAULT_HOSTNAME: &str = "0.0.0.0";

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Listener settings.
///
/// The port is optional here; the application falls back to the `port`
/// configuration key when it is not set.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    hostname: String,
    port: Option<u16>,
    shutdown_timeout: Duration,
}

impl ServerConfig {
    /// Creates a new server configuration builder.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Bind host.
    #[must_use]
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Explicit port, if any.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// How long in-flight connections get after shutdown starts.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug, Clone)]
pub struct ServerConfigBuilder {
    hostname: String,
    port: Option<u16>,
    shutdown_timeout: Duration,
}

impl ServerConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hostname: DEFAULT_HOSTNAME.to_string(),
            port: None,
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
        }
    }

    /// Sets the bind host.
    #[must_use]
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    /// Sets the port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the graceful shutdown timeout.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            hostname: self.hostname,
            port: self.port,
            shutdown_timeout: self.shutdown_timeout,
        }
    }
}

impl Default for ServerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.hostname(), "0.0.0.0");
        assert_eq!(config.port(), None);
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_builder() {
        let config = ServerConfig::builder()
            .hostname("localhost")
            .port(8080)
            .shutdown_timeout(Duration::from_secs(5))
            .build();

        assert_eq!(config.hostname(), "localhost");
        assert_eq!(config.port(), Some(8080));
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(5));
    }
}
