//! Condition vocabulary shared by the outbound and inbound codecs.
//!
//! A [`Condition`] is the wire-level discriminator of an AMQP error: an opaque
//! symbolic string. Two disjoint sub-vocabularies exist:
//!
//! | Vocabulary | Prefix           | Examples                                   |
//! |------------|------------------|--------------------------------------------|
//! | Generic    | `amqp:`          | `amqp:not-found`, `amqp:unauthorized-access` |
//! | Vendor     | `com.microsoft:` | `com.microsoft:timeout`, `com.microsoft:iot-hub-suspended` |
//!
//! Both codecs speak this vocabulary, which is what keeps a fault translated
//! out and back in inside the same fault family. The tables are additive only:
//! new conditions may be appended, existing strings never change.
//!
//! Info-map keys and header names live in [`keys`].

pub mod keys;

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Vendor namespace for domain-specific conditions and info keys.
pub const VENDOR_PREFIX: &str = "com.microsoft";

/// Symbolic AMQP error condition.
///
/// Unknown conditions received from a peer are preserved verbatim; only the
/// codecs decide what they mean.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Condition(Cow<'static, str>);

impl Condition {
    // -- Generic AMQP 1.0 conditions --

    /// An internal error occurred at the peer.
    pub const INTERNAL_ERROR: Self = Self::from_static("amqp:internal-error");
    /// A peer attempted to work with a remote entity that does not exist.
    pub const NOT_FOUND: Self = Self::from_static("amqp:not-found");
    /// A peer attempted to work with a remote entity without authorization.
    pub const UNAUTHORIZED_ACCESS: Self = Self::from_static("amqp:unauthorized-access");
    /// Data could not be decoded.
    pub const DECODE_ERROR: Self = Self::from_static("amqp:decode-error");
    /// A peer exceeded its resource allocation.
    pub const RESOURCE_LIMIT_EXCEEDED: Self = Self::from_static("amqp:resource-limit-exceeded");
    /// The peer tried to use a frame in a manner the protocol does not permit.
    pub const NOT_ALLOWED: Self = Self::from_static("amqp:not-allowed");
    /// An invalid field was passed in a frame body.
    pub const INVALID_FIELD: Self = Self::from_static("amqp:invalid-field");
    /// The peer tried to use functionality that is not implemented.
    pub const NOT_IMPLEMENTED: Self = Self::from_static("amqp:not-implemented");
    /// The client attempted to work with a server entity to which it has no access
    /// because another client is working with it.
    pub const RESOURCE_LOCKED: Self = Self::from_static("amqp:resource-locked");
    /// The client made a request that was not allowed because some precondition failed.
    pub const PRECONDITION_FAILED: Self = Self::from_static("amqp:precondition-failed");
    /// A server entity the client is working with has been deleted.
    pub const RESOURCE_DELETED: Self = Self::from_static("amqp:resource-deleted");
    /// The peer sent a frame that is not permitted in the current state.
    pub const ILLEGAL_STATE: Self = Self::from_static("amqp:illegal-state");
    /// The peer cannot send a frame because the smallest encoding does not fit.
    pub const FRAME_SIZE_TOO_SMALL: Self = Self::from_static("amqp:frame-size-too-small");
    /// An operator intervened to close the connection.
    pub const CONNECTION_FORCED: Self = Self::from_static("amqp:connection:forced");
    /// A valid frame header cannot be formed from the incoming byte stream.
    pub const FRAMING_ERROR: Self = Self::from_static("amqp:connection:framing-error");
    /// The container is no longer available on the current connection.
    pub const CONNECTION_REDIRECT: Self = Self::from_static("amqp:connection:redirect");
    /// The peer violated incoming window for the session.
    pub const WINDOW_VIOLATION: Self = Self::from_static("amqp:session:window-violation");
    /// Input was received for a link that was detached with an error.
    pub const ERRANT_LINK: Self = Self::from_static("amqp:session:errant-link");
    /// An attach was received using a handle that is already in use.
    pub const HANDLE_IN_USE: Self = Self::from_static("amqp:session:handle-in-use");
    /// A frame referenced a handle that is not currently in use.
    pub const UNATTACHED_HANDLE: Self = Self::from_static("amqp:session:unattached-handle");
    /// An operator intervened to detach for some reason.
    pub const DETACH_FORCED: Self = Self::from_static("amqp:link:detach-forced");
    /// The peer sent more message transfers than currently allowed on the link.
    pub const TRANSFER_LIMIT_EXCEEDED: Self = Self::from_static("amqp:link:transfer-limit-exceeded");
    /// The peer sent a larger message than is supported on the link.
    pub const MESSAGE_SIZE_EXCEEDED: Self = Self::from_static("amqp:link:message-size-exceeded");
    /// The address provided cannot be resolved to a terminus at the current container.
    pub const LINK_REDIRECT: Self = Self::from_static("amqp:link:redirect");
    /// The link has been attached elsewhere, causing the existing attachment to be detached.
    pub const STOLEN: Self = Self::from_static("amqp:link:stolen");
    /// The specified txn-id does not exist.
    pub const TRANSACTION_UNKNOWN_ID: Self = Self::from_static("amqp:transaction:unknown-id");
    /// The transaction was rolled back for an unspecified reason.
    pub const TRANSACTION_ROLLBACK: Self = Self::from_static("amqp:transaction:rollback");
    /// The work represented by this transaction took too long.
    pub const TRANSACTION_TIMEOUT: Self = Self::from_static("amqp:transaction:timeout");

    // -- Vendor conditions --

    /// Operation did not complete in time.
    pub const TIMEOUT: Self = Self::from_static("com.microsoft:timeout");
    /// Message was dead-lettered.
    pub const DEAD_LETTER: Self = Self::from_static("com.microsoft:dead-letter");
    /// Lock on a received message was lost before settlement.
    pub const MESSAGE_LOCK_LOST: Self = Self::from_static("com.microsoft:message-lock-lost");
    /// The hub itself could not be found.
    pub const IOT_HUB_NOT_FOUND: Self = Self::from_static("com.microsoft:iot-hub-not-found-error");
    /// Argument validation failed.
    pub const ARGUMENT_ERROR: Self = Self::from_static("com.microsoft:argument-error");
    /// Argument was outside the accepted range.
    pub const ARGUMENT_OUT_OF_RANGE: Self = Self::from_static("com.microsoft:argument-out-of-range");
    /// Device identity already registered.
    pub const DEVICE_ALREADY_EXISTS: Self = Self::from_static("com.microsoft:device-already-exists");
    /// Device container is being throttled.
    pub const DEVICE_CONTAINER_THROTTLED: Self =
        Self::from_static("com.microsoft:device-container-throttled");
    /// Partition could not be found.
    pub const PARTITION_NOT_FOUND: Self = Self::from_static("com.microsoft:partition-not-found");
    /// The hub has been suspended.
    pub const IOT_HUB_SUSPENDED: Self = Self::from_static("com.microsoft:iot-hub-suspended");

    /// Every generic AMQP condition in the vocabulary.
    pub const GENERIC: &'static [Self] = &[
        Self::INTERNAL_ERROR,
        Self::NOT_FOUND,
        Self::UNAUTHORIZED_ACCESS,
        Self::DECODE_ERROR,
        Self::RESOURCE_LIMIT_EXCEEDED,
        Self::NOT_ALLOWED,
        Self::INVALID_FIELD,
        Self::NOT_IMPLEMENTED,
        Self::RESOURCE_LOCKED,
        Self::PRECONDITION_FAILED,
        Self::RESOURCE_DELETED,
        Self::ILLEGAL_STATE,
        Self::FRAME_SIZE_TOO_SMALL,
        Self::CONNECTION_FORCED,
        Self::FRAMING_ERROR,
        Self::CONNECTION_REDIRECT,
        Self::WINDOW_VIOLATION,
        Self::ERRANT_LINK,
        Self::HANDLE_IN_USE,
        Self::UNATTACHED_HANDLE,
        Self::DETACH_FORCED,
        Self::TRANSFER_LIMIT_EXCEEDED,
        Self::MESSAGE_SIZE_EXCEEDED,
        Self::LINK_REDIRECT,
        Self::STOLEN,
        Self::TRANSACTION_UNKNOWN_ID,
        Self::TRANSACTION_ROLLBACK,
        Self::TRANSACTION_TIMEOUT,
    ];

    /// Every vendor condition in the vocabulary.
    pub const VENDOR: &'static [Self] = &[
        Self::TIMEOUT,
        Self::DEAD_LETTER,
        Self::MESSAGE_LOCK_LOST,
        Self::IOT_HUB_NOT_FOUND,
        Self::ARGUMENT_ERROR,
        Self::ARGUMENT_OUT_OF_RANGE,
        Self::DEVICE_ALREADY_EXISTS,
        Self::DEVICE_CONTAINER_THROTTLED,
        Self::PARTITION_NOT_FOUND,
        Self::IOT_HUB_SUSPENDED,
    ];

    const fn from_static(symbol: &'static str) -> Self {
        Self(Cow::Borrowed(symbol))
    }

    /// Create a condition from any symbol, known or not.
    pub fn new(symbol: impl Into<Cow<'static, str>>) -> Self {
        Self(symbol.into())
    }

    /// Symbol as it appears on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if this condition lives under the vendor namespace
    pub fn is_vendor(&self) -> bool {
        self.0
            .strip_prefix(VENDOR_PREFIX)
            .is_some_and(|rest| rest.starts_with(':'))
    }

    /// Check if this condition is part of either vocabulary
    pub fn is_known(&self) -> bool {
        Self::GENERIC.contains(self) || Self::VENDOR.contains(self)
    }

    /// Iterate over the full vocabulary, generic conditions first.
    pub fn all() -> impl Iterator<Item = &'static Condition> {
        Self::GENERIC.iter().chain(Self::VENDOR.iter())
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Condition {
    fn from(symbol: &'static str) -> Self {
        Self(Cow::Borrowed(symbol))
    }
}

impl From<String> for Condition {
    fn from(symbol: String) -> Self {
        Self(Cow::Owned(symbol))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_vendor_conditions_are_distinct_and_prefixed() {
        let mut seen = HashSet::new();
        for condition in Condition::VENDOR {
            assert!(condition.is_vendor(), "{condition} is not vendor-prefixed");
            assert!(seen.insert(condition.as_str()), "duplicate {condition}");
        }
    }

    #[test]
    fn test_generic_conditions_are_amqp_standard() {
        let mut seen = HashSet::new();
        for condition in Condition::GENERIC {
            assert!(condition.as_str().starts_with("amqp:"));
            assert!(!condition.is_vendor());
            assert!(seen.insert(condition.as_str()), "duplicate {condition}");
        }
    }

    #[test]
    fn test_vocabularies_are_disjoint() {
        for condition in Condition::VENDOR {
            assert!(!Condition::GENERIC.contains(condition));
        }
        assert_eq!(
            Condition::all().count(),
            Condition::GENERIC.len() + Condition::VENDOR.len()
        );
    }

    #[test]
    fn test_owned_and_borrowed_compare_equal() {
        let owned = Condition::from("com.microsoft:timeout".to_string());
        assert_eq!(owned, Condition::TIMEOUT);
        assert!(owned.is_known());
    }

    #[test]
    fn test_unknown_condition_preserved() {
        let custom = Condition::new("com.microsoftish:other");
        assert!(!custom.is_vendor());
        assert!(!custom.is_known());
        assert_eq!(custom.to_string(), "com.microsoftish:other");
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&Condition::IOT_HUB_SUSPENDED).unwrap();
        assert_eq!(json, "\"com.microsoft:iot-hub-suspended\"");
        let parsed: Condition = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Condition::IOT_HUB_SUSPENDED);
    }
}
