use crate::error::{ResupError, Result};
use serde::{Deserialize, Serialize};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::Path;

/// Fully resolved supervisor settings
///
/// Built from defaults, an optional TOML/JSON config file and
/// command-line overrides, in that order. The supervised command itself
/// always comes from the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorConfig {
    /// Total number of launches; any negative value means unbounded
    #[serde(default = "default_repeat")]
    pub repeat: i64,

    /// Additional failing runs permitted before giving up
    #[serde(default)]
    pub retries_on_failure: u64,

    /// Host to expose metrics on; metrics stay disabled when unset
    #[serde(default)]
    pub metrics_host: Option<String>,

    /// Port for the metrics endpoint
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,

    /// Show per-run progress lines
    #[serde(default)]
    pub verbose: bool,
}

// Default value functions for serde
fn default_repeat() -> i64 {
    -1
}

fn default_metrics_port() -> u16 {
    3535
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            repeat: default_repeat(),
            retries_on_failure: 0,
            metrics_host: None,
            metrics_port: default_metrics_port(),
            verbose: false,
        }
    }
}

impl SupervisorConfig {
    /// Load settings from a file (supports TOML and JSON)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ResupError::ConfigError(format!("Failed to read config file: {}", e)))?;

        // Determine format based on file extension
        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

        match extension {
            "toml" => Self::parse_toml(&contents),
            "json" => Self::parse_json(&contents),
            _ => Err(ResupError::InvalidConfig(format!(
                "Unsupported file format: {}. Use .toml or .json",
                extension
            ))),
        }
    }

    fn parse_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| ResupError::InvalidConfig(format!("Failed to parse TOML: {}", e)))
    }

    fn parse_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents)
            .map_err(|e| ResupError::InvalidConfig(format!("Failed to parse JSON: {}", e)))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.metrics_host.is_some() && self.metrics_port == 0 {
            return Err(ResupError::InvalidConfig(
                "metrics_port must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the metrics bind address, if metrics are enabled
    ///
    /// # Returns
    /// * `Ok(None)` - No metrics host configured, server stays off
    /// * `Ok(Some(addr))` - Address to bind the metrics server to
    /// * `Err(ResupError::ConfigError)` - The host did not resolve
    pub fn metrics_addr(&self) -> Result<Option<SocketAddr>> {
        let Some(host) = &self.metrics_host else {
            return Ok(None);
        };

        let addr = (host.as_str(), self.metrics_port)
            .to_socket_addrs()
            .map_err(|e| {
                ResupError::ConfigError(format!(
                    "Invalid metrics address {}:{}: {}",
                    host, self.metrics_port, e
                ))
            })?
            .next()
            .ok_or_else(|| {
                ResupError::ConfigError(format!("Metrics host '{}' did not resolve", host))
            })?;

        Ok(Some(addr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SupervisorConfig::default();
        assert_eq!(config.repeat, -1);
        assert_eq!(config.retries_on_failure, 0);
        assert!(config.metrics_host.is_none());
        assert_eq!(config.metrics_port, 3535);
        assert!(!config.verbose);
    }

    #[test]
    fn test_parse_toml_applies_serde_defaults() {
        let config = SupervisorConfig::parse_toml("repeat = 5").unwrap();
        assert_eq!(config.repeat, 5);
        assert_eq!(config.retries_on_failure, 0);
        assert_eq!(config.metrics_port, 3535);
    }

    #[test]
    fn test_parse_json() {
        let config =
            SupervisorConfig::parse_json(r#"{"metrics_host": "127.0.0.1", "metrics_port": 9000}"#)
                .unwrap();
        assert_eq!(config.metrics_host.as_deref(), Some("127.0.0.1"));
        assert_eq!(config.metrics_port, 9000);
    }

    #[test]
    fn test_parse_toml_rejects_garbage() {
        let result = SupervisorConfig::parse_toml("repeat = = 5");
        assert!(matches!(result, Err(ResupError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_port_zero_with_host() {
        let config = SupervisorConfig {
            metrics_host: Some("127.0.0.1".to_string()),
            metrics_port: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ResupError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_metrics_addr_disabled_without_host() {
        let config = SupervisorConfig::default();
        assert_eq!(config.metrics_addr().unwrap(), None);
    }

    #[test]
    fn test_metrics_addr_resolves_host_and_port() {
        let config = SupervisorConfig {
            metrics_host: Some("127.0.0.1".to_string()),
            metrics_port: 3535,
            ..Default::default()
        };
        let addr = config.metrics_addr().unwrap().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:3535");
    }
}
