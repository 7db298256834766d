//! Dispatch tables between conditions and fault kinds.
//!
//! Outbound dispatch is an exhaustive `match` so a new [`FaultKind`] fails to
//! compile until it is mapped. Inbound dispatch uses two static maps:
//!
//! - [`EXCEPTION_CONDITIONS`]: the wide table used for transport exceptions.
//!   Connection, session and link protocol violations degrade to a retryable
//!   resource fault; transactional conditions degrade to communication failure.
//! - [`ERROR_CONDITIONS`]: the narrow table used for bare records received
//!   directly from a frame (vendor conditions plus the generic ones the hub
//!   emits).
//!
//! Conditions missing from a table classify as [`FaultKind::Internal`].

use phf::phf_map;

use crate::condition::Condition;
use crate::fault::FaultKind;

/// Condition → kind for transport exceptions
pub static EXCEPTION_CONDITIONS: phf::Map<&'static str, FaultKind> = phf_map! {
    // Vendor
    "com.microsoft:timeout" => FaultKind::Timeout,
    "com.microsoft:message-lock-lost" => FaultKind::MessageLockLost,
    "com.microsoft:iot-hub-not-found-error" => FaultKind::HubNotFound,
    "com.microsoft:argument-error" => FaultKind::InvalidArgument,
    "com.microsoft:argument-out-of-range" => FaultKind::ArgumentOutOfRange,
    "com.microsoft:device-already-exists" => FaultKind::AlreadyExists,
    "com.microsoft:device-container-throttled" => FaultKind::Throttled,
    "com.microsoft:partition-not-found" => FaultKind::NotFound,
    "com.microsoft:iot-hub-suspended" => FaultKind::ServiceSuspended,
    // Generic
    "amqp:internal-error" => FaultKind::Internal,
    "amqp:not-found" => FaultKind::NotFound,
    "amqp:unauthorized-access" => FaultKind::Unauthorized,
    "amqp:decode-error" => FaultKind::InvalidArgument,
    "amqp:invalid-field" => FaultKind::InvalidArgument,
    "amqp:resource-limit-exceeded" => FaultKind::QueueDepthExceeded,
    "amqp:not-allowed" => FaultKind::InvalidOperation,
    "amqp:illegal-state" => FaultKind::InvalidOperation,
    "amqp:precondition-failed" => FaultKind::InvalidOperation,
    "amqp:not-implemented" => FaultKind::NotSupported,
    "amqp:link:message-size-exceeded" => FaultKind::MessageTooLarge,
    "amqp:resource-deleted" => FaultKind::ResourceFault { retryable: false },
    // Connection / session / link protocol faults
    "amqp:resource-locked" => FaultKind::ResourceFault { retryable: true },
    "amqp:frame-size-too-small" => FaultKind::ResourceFault { retryable: true },
    "amqp:connection:forced" => FaultKind::ResourceFault { retryable: true },
    "amqp:connection:framing-error" => FaultKind::ResourceFault { retryable: true },
    "amqp:connection:redirect" => FaultKind::ResourceFault { retryable: true },
    "amqp:session:window-violation" => FaultKind::ResourceFault { retryable: true },
    "amqp:session:errant-link" => FaultKind::ResourceFault { retryable: true },
    "amqp:session:handle-in-use" => FaultKind::ResourceFault { retryable: true },
    "amqp:session:unattached-handle" => FaultKind::ResourceFault { retryable: true },
    "amqp:link:detach-forced" => FaultKind::ResourceFault { retryable: true },
    "amqp:link:transfer-limit-exceeded" => FaultKind::ResourceFault { retryable: true },
    "amqp:link:redirect" => FaultKind::ResourceFault { retryable: true },
    "amqp:link:stolen" => FaultKind::ResourceFault { retryable: true },
    // Transactions
    "amqp:transaction:unknown-id" => FaultKind::Communication,
    "amqp:transaction:rollback" => FaultKind::Communication,
    "amqp:transaction:timeout" => FaultKind::Communication,
};

/// Condition → kind for bare wire records
pub static ERROR_CONDITIONS: phf::Map<&'static str, FaultKind> = phf_map! {
    "com.microsoft:timeout" => FaultKind::Timeout,
    "com.microsoft:message-lock-lost" => FaultKind::MessageLockLost,
    "com.microsoft:iot-hub-not-found-error" => FaultKind::HubNotFound,
    "com.microsoft:argument-error" => FaultKind::InvalidArgument,
    "com.microsoft:argument-out-of-range" => FaultKind::ArgumentOutOfRange,
    "com.microsoft:device-already-exists" => FaultKind::AlreadyExists,
    "com.microsoft:device-container-throttled" => FaultKind::Throttled,
    "com.microsoft:iot-hub-suspended" => FaultKind::ServiceSuspended,
    "amqp:internal-error" => FaultKind::Internal,
    "amqp:not-found" => FaultKind::NotFound,
    "amqp:not-implemented" => FaultKind::NotSupported,
    "amqp:not-allowed" => FaultKind::InvalidOperation,
    "amqp:unauthorized-access" => FaultKind::Unauthorized,
    "amqp:link:message-size-exceeded" => FaultKind::MessageTooLarge,
    "amqp:resource-limit-exceeded" => FaultKind::QueueDepthExceeded,
};

/// Outbound condition for a fault kind.
///
/// [`Condition::INTERNAL_ERROR`] is the only many-to-one target.
pub fn condition_for(kind: FaultKind) -> Condition {
    match kind {
        FaultKind::Unauthorized => Condition::UNAUTHORIZED_ACCESS,
        FaultKind::NotFound => Condition::NOT_FOUND,
        FaultKind::HubNotFound => Condition::IOT_HUB_NOT_FOUND,
        FaultKind::MessageTooLarge => Condition::MESSAGE_SIZE_EXCEEDED,
        FaultKind::QueueDepthExceeded => Condition::RESOURCE_LIMIT_EXCEEDED,
        FaultKind::Timeout => Condition::TIMEOUT,
        FaultKind::InvalidOperation => Condition::NOT_ALLOWED,
        FaultKind::ArgumentOutOfRange => Condition::ARGUMENT_OUT_OF_RANGE,
        FaultKind::InvalidArgument => Condition::ARGUMENT_ERROR,
        FaultKind::AlreadyExists => Condition::DEVICE_ALREADY_EXISTS,
        FaultKind::Throttled => Condition::DEVICE_CONTAINER_THROTTLED,
        FaultKind::ServiceSuspended => Condition::IOT_HUB_SUSPENDED,
        FaultKind::NotSupported => Condition::NOT_IMPLEMENTED,
        FaultKind::MessageLockLost => Condition::MESSAGE_LOCK_LOST,
        FaultKind::Communication
        | FaultKind::ResourceFault { .. }
        | FaultKind::Canceled
        | FaultKind::Internal => Condition::INTERNAL_ERROR,
    }
}

/// Kind for a condition carried by a transport exception
pub fn exception_kind(condition: &Condition) -> Option<FaultKind> {
    EXCEPTION_CONDITIONS.get(condition.as_str()).copied()
}

/// Kind for a condition carried by a bare record
pub fn error_kind(condition: &Condition) -> Option<FaultKind> {
    ERROR_CONDITIONS.get(condition.as_str()).copied()
}
