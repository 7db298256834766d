//! Configuration management.
//!
//! Supports configuration from:
//! - TOML config files
//! - Environment variables
//! - CLI arguments (for the `hubwire` binary)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::condition::keys::MAX_SIZE_IN_INFO_MAP;
use crate::error::{HubwireError, Result};

/// Error mapper configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Include the diagnostic trace in outbound errors
    pub include_stack_trace: bool,

    /// Maximum trace size in bytes
    pub max_trace_bytes: usize,

    /// Gateway id composed into tracking ids
    pub gateway_id: Option<String>,

    /// Client version advertised in outbound info maps
    pub client_version: Option<String>,

    /// API version advertised in outbound info maps
    pub api_version: Option<String>,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            include_stack_trace: false,
            max_trace_bytes: MAX_SIZE_IN_INFO_MAP,
            gateway_id: None,
            client_version: None,
            api_version: None,
        }
    }
}

impl MapperConfig {
    /// Default config file location (`<config dir>/hubwire/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("hubwire").join("config.toml"))
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| HubwireError::Config(format!("Failed to read config file: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| HubwireError::Config(format!("Failed to parse config: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("HUBWIRE_INCLUDE_STACK_TRACE") {
            if let Ok(val) = val.parse() {
                config.include_stack_trace = val;
            }
        }
        if let Ok(val) = std::env::var("HUBWIRE_MAX_TRACE_BYTES") {
            if let Ok(val) = val.parse() {
                config.max_trace_bytes = val;
            }
        }
        if let Ok(gateway) = std::env::var("HUBWIRE_GATEWAY_ID") {
            config.gateway_id = Some(gateway).filter(|g| !g.is_empty());
        }
        if let Ok(version) = std::env::var("HUBWIRE_CLIENT_VERSION") {
            config.client_version = Some(version).filter(|v| !v.is_empty());
        }
        if let Ok(version) = std::env::var("HUBWIRE_API_VERSION") {
            config.api_version = Some(version).filter(|v| !v.is_empty());
        }

        config
    }

    /// Merge with another config (other takes precedence where it differs from defaults)
    pub fn merge(self, other: Self) -> Self {
        let defaults = Self::default();
        Self {
            include_stack_trace: if other.include_stack_trace != defaults.include_stack_trace {
                other.include_stack_trace
            } else {
                self.include_stack_trace
            },
            max_trace_bytes: if other.max_trace_bytes != defaults.max_trace_bytes {
                other.max_trace_bytes
            } else {
                self.max_trace_bytes
            },
            gateway_id: other.gateway_id.or(self.gateway_id),
            client_version: other.client_version.or(self.client_version),
            api_version: other.api_version.or(self.api_version),
        }
    }

    /// Set the gateway id
    #[must_use]
    pub fn with_gateway(mut self, gateway_id: &str) -> Self {
        self.gateway_id = Some(gateway_id.to_string());
        self
    }

    /// Include diagnostic traces in outbound errors
    #[must_use]
    pub fn with_stack_trace(mut self) -> Self {
        self.include_stack_trace = true;
        self
    }

    /// Set the trace budget in bytes
    #[must_use]
    pub fn with_max_trace_bytes(mut self, max: usize) -> Self {
        self.max_trace_bytes = max;
        self
    }

    /// Set the client version
    #[must_use]
    pub fn with_client_version(mut self, version: &str) -> Self {
        self.client_version = Some(version.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serial_test::serial;

    use super::*;

    /// Sets env vars for the duration of a test and removes them on drop.
    struct EnvGuard {
        keys: Vec<&'static str>,
    }

    impl EnvGuard {
        fn new(pairs: &[(&'static str, &str)]) -> Self {
            for (key, value) in pairs {
                std::env::set_var(key, value);
            }
            Self {
                keys: pairs.iter().map(|(key, _)| *key).collect(),
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for key in &self.keys {
                std::env::remove_var(key);
            }
        }
    }

    #[test]
    fn test_default_config() {
        let config = MapperConfig::default();
        assert!(!config.include_stack_trace);
        assert_eq!(config.max_trace_bytes, 32768);
        assert!(config.gateway_id.is_none());
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            include_stack_trace = true
            gateway_id = "edge-01"
            client_version = "hubwire/0.4.0"
        "#;

        let config: MapperConfig = toml::from_str(toml).unwrap();
        assert!(config.include_stack_trace);
        assert_eq!(config.max_trace_bytes, MAX_SIZE_IN_INFO_MAP);
        assert_eq!(config.gateway_id.as_deref(), Some("edge-01"));
        assert_eq!(config.client_version.as_deref(), Some("hubwire/0.4.0"));
        assert!(config.api_version.is_none());
    }

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_trace_bytes = 1024").unwrap();

        let config = MapperConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_trace_bytes, 1024);
    }

    #[test]
    fn test_config_from_missing_file() {
        let err = MapperConfig::from_file("/nonexistent/hubwire.toml").unwrap_err();
        assert!(matches!(err, HubwireError::Config(_)));
    }

    #[test]
    fn test_config_from_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_trace_bytes = \"lots\"").unwrap();

        let err = MapperConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        let _guard = EnvGuard::new(&[
            ("HUBWIRE_INCLUDE_STACK_TRACE", "true"),
            ("HUBWIRE_MAX_TRACE_BYTES", "2048"),
            ("HUBWIRE_GATEWAY_ID", "edge-09"),
            ("HUBWIRE_CLIENT_VERSION", ""),
            ("HUBWIRE_API_VERSION", "2021-04-12"),
        ]);

        let config = MapperConfig::from_env();
        assert!(config.include_stack_trace);
        assert_eq!(config.max_trace_bytes, 2048);
        assert_eq!(config.gateway_id.as_deref(), Some("edge-09"));
        assert!(config.client_version.is_none());
        assert_eq!(config.api_version.as_deref(), Some("2021-04-12"));
    }

    #[test]
    #[serial]
    fn test_config_from_env_ignores_bad_values() {
        let _guard = EnvGuard::new(&[
            ("HUBWIRE_INCLUDE_STACK_TRACE", "yes please"),
            ("HUBWIRE_MAX_TRACE_BYTES", "lots"),
            ("HUBWIRE_GATEWAY_ID", ""),
            ("HUBWIRE_CLIENT_VERSION", ""),
            ("HUBWIRE_API_VERSION", ""),
        ]);

        let config = MapperConfig::from_env();
        assert_eq!(config, MapperConfig::default());
    }

    #[test]
    fn test_merge_prefers_other() {
        let base = MapperConfig::default()
            .with_gateway("gw-base")
            .with_client_version("1.0");
        let overlay = MapperConfig::default()
            .with_gateway("gw-cli")
            .with_max_trace_bytes(512);

        let merged = base.merge(overlay);
        assert_eq!(merged.gateway_id.as_deref(), Some("gw-cli"));
        assert_eq!(merged.client_version.as_deref(), Some("1.0"));
        assert_eq!(merged.max_trace_bytes, 512);
        assert!(!merged.include_stack_trace);
    }
}
