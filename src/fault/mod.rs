//! Typed fault taxonomy.
//!
//! Application code reacts to a closed set of [`FaultKind`]s rather than to
//! raw condition strings. A [`Fault`] pairs a kind with a message, an
//! optional tracking id, an optional diagnostic trace, and an optional
//! wrapped [`Cause`].
//!
//! # Families
//!
//! | Family        | Kinds                                                        |
//! |---------------|--------------------------------------------------------------|
//! | Hub           | not-found, hub-not-found, unauthorized, message-too-large, queue-depth-exceeded, throttled, service-suspended, already-exists, message-lock-lost, communication, resource-fault, internal |
//! | Language-level| timeout, invalid-operation, invalid-argument, argument-out-of-range, not-supported |
//! | Cancellation  | canceled                                                     |
//!
//! Hub kinds carry a tracking id field; language-level kinds and
//! cancellation do not (see [`FaultKind::carries_tracking_id`]).
//!
//! Faults are built by the codecs or by the application and are never
//! mutated afterwards, except for the tracking-id back-fill performed by
//! the inbound codec.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::wire::{AmqpError, AmqpException};

/// Message of the degenerate fault produced when no error is available.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error.";

/// Message of the cancellation fault.
pub const CANCELED_MESSAGE: &str = "The operation was canceled.";

/// Closed set of fault kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FaultKind {
    /// Transport-level communication failure
    Communication,
    /// Device or entity not found
    NotFound,
    /// The hub itself was not found
    HubNotFound,
    /// Caller is not authorized
    Unauthorized,
    /// Message exceeds the permitted size
    MessageTooLarge,
    /// Device queue depth exceeded
    QueueDepthExceeded,
    /// Caller is being throttled
    Throttled,
    /// Operation not allowed in the current state
    InvalidOperation,
    /// Operation timed out
    Timeout,
    /// Argument failed validation
    InvalidArgument,
    /// Argument outside the accepted range
    ArgumentOutOfRange,
    /// Operation is not supported
    NotSupported,
    /// The service has been suspended
    ServiceSuspended,
    /// Entity already exists
    AlreadyExists,
    /// Lock on a received message was lost
    MessageLockLost,
    /// Connection, session or link protocol fault
    ResourceFault {
        /// Whether the operation may be retried
        retryable: bool,
    },
    /// Operation was cooperatively abandoned (not a failure)
    Canceled,
    /// Internal or unrecognized error
    Internal,
}

impl FaultKind {
    /// Every member of the taxonomy.
    pub const ALL: &'static [FaultKind] = &[
        FaultKind::Communication,
        FaultKind::NotFound,
        FaultKind::HubNotFound,
        FaultKind::Unauthorized,
        FaultKind::MessageTooLarge,
        FaultKind::QueueDepthExceeded,
        FaultKind::Throttled,
        FaultKind::InvalidOperation,
        FaultKind::Timeout,
        FaultKind::InvalidArgument,
        FaultKind::ArgumentOutOfRange,
        FaultKind::NotSupported,
        FaultKind::ServiceSuspended,
        FaultKind::AlreadyExists,
        FaultKind::MessageLockLost,
        FaultKind::ResourceFault { retryable: true },
        FaultKind::ResourceFault { retryable: false },
        FaultKind::Canceled,
        FaultKind::Internal,
    ];

    /// Stable kebab-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Communication => "communication",
            Self::NotFound => "not-found",
            Self::HubNotFound => "hub-not-found",
            Self::Unauthorized => "unauthorized",
            Self::MessageTooLarge => "message-too-large",
            Self::QueueDepthExceeded => "queue-depth-exceeded",
            Self::Throttled => "throttled",
            Self::InvalidOperation => "invalid-operation",
            Self::Timeout => "timeout",
            Self::InvalidArgument => "invalid-argument",
            Self::ArgumentOutOfRange => "argument-out-of-range",
            Self::NotSupported => "not-supported",
            Self::ServiceSuspended => "service-suspended",
            Self::AlreadyExists => "already-exists",
            Self::MessageLockLost => "message-lock-lost",
            Self::ResourceFault { retryable: true } => "resource-fault",
            Self::ResourceFault { retryable: false } => "resource-fault-fatal",
            Self::Canceled => "canceled",
            Self::Internal => "internal",
        }
    }

    /// Check if the retry collaborator may retry this kind
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Communication
                | Self::Timeout
                | Self::Throttled
                | Self::ResourceFault { retryable: true }
        )
    }

    /// Check if this kind signals cooperative abandonment rather than failure
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Canceled)
    }

    /// Check if faults of this kind have a tracking id field
    pub fn carries_tracking_id(&self) -> bool {
        !matches!(
            self,
            Self::Timeout
                | Self::InvalidOperation
                | Self::InvalidArgument
                | Self::ArgumentOutOfRange
                | Self::NotSupported
                | Self::Canceled
        )
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FaultKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown fault kind: {s}"))
    }
}

/// Underlying cause wrapped by a [`Fault`].
#[derive(Debug, Clone, Error)]
pub enum Cause {
    /// Bare wire error record
    #[error(transparent)]
    Wire(AmqpError),
    /// Transport exception
    #[error(transparent)]
    Exception(AmqpException),
    /// Lower-level fault
    #[error(transparent)]
    Fault(Box<Fault>),
}

/// Application-facing typed fault.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct Fault {
    kind: FaultKind,
    message: String,
    tracking_id: Option<String>,
    trace: Option<String>,
    #[source]
    cause: Option<Cause>,
}

impl Fault {
    /// Create a fault of the given kind
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            tracking_id: None,
            trace: None,
            cause: None,
        }
    }

    /// Degenerate fault for a missing error or outcome
    pub fn unknown() -> Self {
        Self::new(FaultKind::Internal, UNKNOWN_ERROR_MESSAGE)
    }

    /// Cooperative cancellation
    pub fn canceled() -> Self {
        Self::new(FaultKind::Canceled, CANCELED_MESSAGE)
    }

    /// Argument validation failure
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(FaultKind::InvalidArgument, message)
    }

    /// Set the tracking id
    #[must_use]
    pub fn with_tracking_id(mut self, tracking_id: impl Into<String>) -> Self {
        self.tracking_id = Some(tracking_id.into());
        self
    }

    /// Attach a diagnostic trace
    #[must_use]
    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    /// Attach the current backtrace as the diagnostic trace
    #[must_use]
    pub fn with_captured_trace(self) -> Self {
        let trace = std::backtrace::Backtrace::force_capture().to_string();
        self.with_trace(trace)
    }

    /// Wrap an underlying cause
    #[must_use]
    pub fn with_cause(mut self, cause: Cause) -> Self {
        self.cause = Some(cause);
        self
    }

    /// Wrap a lower-level fault
    #[must_use]
    pub fn caused_by(self, inner: Fault) -> Self {
        self.with_cause(Cause::Fault(Box::new(inner)))
    }

    /// Fault kind
    pub fn kind(&self) -> FaultKind {
        self.kind
    }

    /// Human-readable message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Tracking id, if known
    pub fn tracking_id(&self) -> Option<&str> {
        self.tracking_id.as_deref()
    }

    /// Diagnostic trace, if attached
    pub fn trace(&self) -> Option<&str> {
        self.trace.as_deref()
    }

    /// Wrapped cause
    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    /// Wire error this fault was produced from, if any.
    ///
    /// Wrapped faults are followed down to the innermost record. A fault
    /// carrying one is relayed verbatim by the outbound codec.
    pub fn wire_error(&self) -> Option<&AmqpError> {
        match &self.cause {
            Some(Cause::Wire(error)) => Some(error),
            Some(Cause::Exception(exception)) => exception.error.as_ref(),
            Some(Cause::Fault(inner)) => inner.wire_error(),
            None => None,
        }
    }

    /// Tracking id of this fault or the nearest wrapped fault carrying one.
    pub(crate) fn carried_tracking_id(&self) -> Option<&str> {
        match (self.tracking_id(), &self.cause) {
            (Some(id), _) if !id.is_empty() => Some(id),
            (_, Some(Cause::Fault(inner))) => inner.carried_tracking_id(),
            _ => None,
        }
    }

    /// Check if this is a cancellation
    pub fn is_canceled(&self) -> bool {
        self.kind.is_cancellation()
    }

    /// Check if the operation may be retried
    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }

    /// Back-fill the tracking id after construction. Only kinds that carry
    /// the field accept it; returns whether it was set.
    pub(crate) fn backfill_tracking_id(&mut self, tracking_id: &str) -> bool {
        if !self.kind.carries_tracking_id() {
            return false;
        }
        self.tracking_id = Some(tracking_id.to_string());
        true
    }
}
