//! # Hubwire - Fault Classification and AMQP Wire-Error Codec
//!
//! Translates between the AMQP wire representation of errors used by IoT hub
//! transports and a closed, typed fault taxonomy consumed by application code.
//!
//! ## Features
//!
//! - **Outbound codec**: fault → `{ condition, description, info }` record
//!   with an idempotently inserted tracking id and a size-capped trace
//! - **Inbound codec**: record or transport exception → typed [`Fault`]
//! - **Outcome resolution**: rejected / released / missing outcomes → faults
//! - **Tracking ids**: gateway-aware correlation ids that survive every hop
//!
//! ## Architecture
//!
//! ```text
//!   application fault                           peer / frame
//!          │                                         │
//!          │ to_amqp_error()                         │ AmqpError / AmqpException
//!          v                                         v
//!   ┌─────────────┐   condition vocabulary   ┌──────────────┐
//!   │  outbound   │ ───────────────────────> │   inbound    │
//!   │   codec     │ <─────────────────────── │    codec     │
//!   └─────────────┘                          └──────────────┘
//!          │                                         ^
//!          v                                         │ Rejected { error }
//!      AmqpError ──> frame                 ┌──────────────────┐
//!                                          │ outcome resolver │ <── Outcome
//!                                          └──────────────────┘
//! ```
//!
//! ## Wire Format
//!
//! | Field         | Type                      | Notes                                   |
//! |---------------|---------------------------|-----------------------------------------|
//! | `condition`   | symbol                    | `amqp:*` or `com.microsoft:*`           |
//! | `description` | string                    | fault message                           |
//! | `info`        | `map<symbol, value>`      | always holds `com.microsoft:tracking-id` after encoding |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hubwire::{ErrorMapper, Fault, FaultKind, Outcome};
//!
//! let mapper = ErrorMapper::new();
//!
//! let fault = Fault::new(FaultKind::Throttled, "too many requests");
//! let wire = mapper.to_amqp_error(Some(&fault), Some("edge-01"), false)?;
//! assert!(wire.tracking_id().unwrap().contains("edge-01"));
//!
//! let back = mapper.from_amqp_error(Some(&wire));
//! assert_eq!(back.kind(), FaultKind::Throttled);
//!
//! let canceled = mapper.from_outcome(Some(&Outcome::Released));
//! assert!(canceled.is_canceled());
//! ```
//!
//! ## Modules
//!
//! - [`condition`]: Condition vocabulary and info-map keys
//! - [`tracking`]: Tracking-id composition
//! - [`wire`]: Wire error record, exception wrapper, outcomes
//! - [`fault`]: Typed fault taxonomy
//! - [`codec`]: Outbound/inbound translation and outcome resolution
//! - [`config`]: Mapper configuration
//! - [`error`]: Error types and result aliases

pub mod codec;
pub mod condition;
pub mod config;
pub mod error;
pub mod fault;
pub mod tracking;
pub mod wire;

// Re-exports for convenience
pub use codec::ErrorMapper;
pub use condition::Condition;
pub use config::MapperConfig;
pub use error::{HubwireError, Result};
pub use fault::{Cause, Fault, FaultKind};
pub use tracking::TrackingIdComposer;
pub use wire::{AmqpError, AmqpException, Fields, Outcome};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
