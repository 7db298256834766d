//! Wire-level error representation.
//!
//! These are the shapes the transport collaborator hands to the codec and
//! receives back from it:
//!
//! | Type             | Role                                                  |
//! |------------------|-------------------------------------------------------|
//! | [`AmqpError`]    | `{ condition, description, info }` record on a frame  |
//! | [`AmqpException`]| Transport exception wrapping an optional record       |
//! | [`Outcome`]      | Settlement of one delivery (accepted/rejected/...)    |
//! | [`Fields`]       | Symbolic-key info map with idempotent insertion       |
//!
//! ```text
//! {
//!   "condition": "com.microsoft:timeout",
//!   "description": "Operation timed out",
//!   "info": { "com.microsoft:tracking-id": "0f1e...-G:edge-01" }
//! }
//! ```

mod fields;
mod outcome;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use fields::{Fields, Upsert};
pub use outcome::Outcome;

use crate::condition::{keys, Condition};

/// AMQP error record carried on detach/close/disposition frames.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{condition}: {description}")]
pub struct AmqpError {
    /// Error condition
    pub condition: Condition,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Side-channel metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Fields>,
}

impl AmqpError {
    /// Create a record without info
    pub fn new(condition: Condition, description: impl Into<String>) -> Self {
        Self {
            condition,
            description: description.into(),
            info: None,
        }
    }

    /// Add an info entry (builder style)
    #[must_use]
    pub fn with_info(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.info_mut().upsert(key, value);
        self
    }

    /// Get the info map, allocating it if missing
    pub fn info_mut(&mut self) -> &mut Fields {
        self.info.get_or_insert_with(Fields::new)
    }

    fn info_str(&self, key: &str) -> Option<&str> {
        self.info.as_ref().and_then(|info| info.get_str(key))
    }

    /// Tracking id, if present and non-empty
    pub fn tracking_id(&self) -> Option<&str> {
        self.info_str(keys::TRACKING_ID).filter(|id| !id.is_empty())
    }

    /// Channel correlation id, if present
    pub fn channel_correlation_id(&self) -> Option<&str> {
        self.info_str(keys::CHANNEL_CORRELATION_ID)
    }

    /// Diagnostic trace carried from the producing side
    pub fn stack_trace(&self) -> Option<&str> {
        self.info_str(keys::STACK_TRACE)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Transport exception, optionally wrapping the record that caused it.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AmqpException {
    /// Embedded wire error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<AmqpError>,
    /// Exception message
    #[serde(default)]
    pub message: String,
}

impl AmqpException {
    /// Wrap a wire error; the message is taken from its description
    pub fn new(error: AmqpError) -> Self {
        Self {
            message: error.description.clone(),
            error: Some(error),
        }
    }

    /// Exception with no embedded record
    pub fn without_error(message: impl Into<String>) -> Self {
        Self {
            error: None,
            message: message.into(),
        }
    }
}

impl From<AmqpError> for AmqpException {
    fn from(error: AmqpError) -> Self {
        Self::new(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_accessors() {
        let error = AmqpError::new(Condition::TIMEOUT, "slow")
            .with_info(keys::TRACKING_ID, "abc")
            .with_info(keys::CHANNEL_CORRELATION_ID, "chan-7");

        assert_eq!(error.tracking_id(), Some("abc"));
        assert_eq!(error.channel_correlation_id(), Some("chan-7"));
        assert!(error.stack_trace().is_none());
    }

    #[test]
    fn test_empty_tracking_id_is_absent() {
        let error = AmqpError::new(Condition::TIMEOUT, "slow").with_info(keys::TRACKING_ID, "");
        assert!(error.tracking_id().is_none());
    }

    #[test]
    fn test_json_without_info() {
        let error = AmqpError::from_json(r#"{"condition":"amqp:not-found"}"#).unwrap();
        assert_eq!(error.condition, Condition::NOT_FOUND);
        assert!(error.description.is_empty());
        assert!(error.info.is_none());

        let json = error.to_json().unwrap();
        assert!(!json.contains("info"));
    }

    #[test]
    fn test_display() {
        let error = AmqpError::new(Condition::NOT_ALLOWED, "link closed");
        assert_eq!(error.to_string(), "amqp:not-allowed: link closed");

        let exception = AmqpException::new(error);
        assert_eq!(exception.to_string(), "link closed");
    }
}
