//! Server configuration.
//!
//! Limits applied by the bundled HTTP server glue before a request reaches the
//! receive side.

/// Default cap on request bodies: 64 MiB
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Configuration for [`HttpServer`](crate::HttpServer).
///
/// # Example
///
/// ```
/// use simplycall_server::ServerConfig;
///
/// let config = ServerConfig::new().with_max_body_bytes(1024);
/// assert_eq!(config.max_body_bytes, 1024);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Largest accepted request body; larger bodies are answered with 413
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request body limit.
    ///
    /// # Arguments
    ///
    /// * `max_body_bytes` - Largest accepted body, in bytes
    ///
    /// # Returns
    ///
    /// `Self` for builder pattern chaining.
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a description if the body limit is zero.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_body_bytes == 0 {
            return Err("max body size must be greater than zero".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limit() {
        assert_eq!(ServerConfig::default().max_body_bytes, 64 * 1024 * 1024);
        assert_eq!(ServerConfig::new(), ServerConfig::default());
    }

    #[test]
    fn test_with_max_body_bytes() {
        let config = ServerConfig::new().with_max_body_bytes(10);
        assert_eq!(config.max_body_bytes, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_limit_is_invalid() {
        let config = ServerConfig::new().with_max_body_bytes(0);
        assert!(config.validate().is_err());
    }
}
