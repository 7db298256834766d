//! Hubwire crate-level error types.
//!
//! Translated faults are *values* in this crate (see [`crate::fault::Fault`]);
//! this module only covers the failures that surround the codec: reading
//! configuration and parsing wire JSON handed to the CLI.
//!
//! | Variant  | Raised by                                  |
//! |----------|--------------------------------------------|
//! | `Config` | [`crate::config::MapperConfig`] loading    |
//! | `Wire`   | malformed wire JSON (record or outcome)    |
//! | `Json`   | serde_json failures outside wire parsing   |
//! | `Io`     | file / stdin access                        |

use thiserror::Error;

/// Hubwire errors.
#[derive(Error, Debug)]
pub enum HubwireError {
    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Wire input could not be parsed into a record or outcome.
    #[error("Invalid wire input: {0}")]
    Wire(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Hubwire operations
pub type Result<T> = std::result::Result<T, HubwireError>;

impl From<toml::de::Error> for HubwireError {
    fn from(err: toml::de::Error) -> Self {
        HubwireError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_error_conversion() {
        let err = toml::from_str::<toml::Value>("not = [valid").unwrap_err();
        let err: HubwireError = err.into();
        assert!(matches!(err, HubwireError::Config(_)));
        assert!(err.to_string().starts_with("Config error"));
    }

    #[test]
    fn test_json_error_source_chain() {
        use std::error::Error;

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: HubwireError = json_err.into();
        assert!(err.source().is_some());
    }
}
