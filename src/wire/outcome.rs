//! Delivery outcomes reported by the transport.

use serde::{Deserialize, Serialize};

use super::AmqpError;

/// Settlement result of one send/receive attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum Outcome {
    /// Delivery accepted by the peer
    Accepted,
    /// Delivery rejected, usually with an error
    Rejected {
        /// Error attached to the rejection
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<AmqpError>,
    },
    /// Delivery released (cooperative abandonment, no error)
    Released,
    /// Delivery modified by the peer
    Modified {
        /// Count this attempt as a failed delivery
        #[serde(default)]
        delivery_failed: bool,
        /// Do not redeliver to the same link
        #[serde(default)]
        undeliverable_here: bool,
    },
}

impl Outcome {
    /// Create a rejected outcome carrying an error
    pub fn rejected(error: AmqpError) -> Self {
        Outcome::Rejected { error: Some(error) }
    }

    /// Get the rejection error, if any
    pub fn error(&self) -> Option<&AmqpError> {
        match self {
            Outcome::Rejected { error } => error.as_ref(),
            _ => None,
        }
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Condition;

    #[test]
    fn test_outcome_json_tags() {
        let released = Outcome::from_json(r#"{"outcome":"released"}"#).unwrap();
        assert_eq!(released, Outcome::Released);

        let rejected = Outcome::from_json(
            r#"{"outcome":"rejected","error":{"condition":"amqp:not-found","description":"gone"}}"#,
        )
        .unwrap();
        assert_eq!(rejected.error().unwrap().condition, Condition::NOT_FOUND);
    }

    #[test]
    fn test_modified_defaults() {
        let modified = Outcome::from_json(r#"{"outcome":"modified"}"#).unwrap();
        assert_eq!(
            modified,
            Outcome::Modified {
                delivery_failed: false,
                undeliverable_here: false
            }
        );
        assert!(modified.error().is_none());
    }
}
