//! Info-map keys and message header names.
//!
//! These strings must match byte-for-byte with any peer that speaks the same
//! vendor extension.

/// Correlation / tracking id of a failure.
pub const TRACKING_ID: &str = "com.microsoft:tracking-id";
/// Version of the client library that produced the error.
pub const CLIENT_VERSION: &str = "com.microsoft:client-version";
/// Service API version in use.
pub const API_VERSION: &str = "com.microsoft:api-version";
/// Correlation id of the channel (connection/link) the error occurred on.
pub const CHANNEL_CORRELATION_ID: &str = "com.microsoft:channel-correlation-id";
/// Diagnostic trace blob, size-capped by [`MAX_SIZE_IN_INFO_MAP`].
pub const STACK_TRACE: &str = "com.microsoft:stack-trace";

/// Dead-letter reason header on a rejected message.
pub const DEAD_LETTER_REASON_HEADER: &str = "DeadLetterReason";
/// Dead-letter description header on a rejected message.
pub const DEAD_LETTER_ERROR_DESCRIPTION_HEADER: &str = "DeadLetterErrorDescription";

/// Maximum size in bytes of a single diagnostic value in the info map (32 KiB).
pub const MAX_SIZE_IN_INFO_MAP: usize = 32 * 1024;
