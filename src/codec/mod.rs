//! Fault ⇄ wire-error codec.
//!
//! [`ErrorMapper`] translates in both directions and resolves outcomes:
//!
//! | Direction | Entry point                          | Input → Output                 |
//! |-----------|--------------------------------------|--------------------------------|
//! | Outbound  | [`ErrorMapper::to_amqp_error`]       | [`Fault`] → [`AmqpError`]      |
//! | Inbound   | [`ErrorMapper::from_amqp_exception`] | [`AmqpException`] → [`Fault`]  |
//! | Inbound   | [`ErrorMapper::from_amqp_error`]     | [`AmqpError`] → [`Fault`]      |
//! | Outcome   | [`ErrorMapper::from_outcome`]        | [`Outcome`] → [`Fault`]        |
//!
//! All entry points are synchronous and pure apart from the id source used
//! for fresh tracking ids; a mapper can be shared across threads.
//!
//! # Usage
//!
//! ```rust,ignore
//! use hubwire::codec::ErrorMapper;
//! use hubwire::fault::{Fault, FaultKind};
//!
//! let mapper = ErrorMapper::new();
//!
//! // Service side: surface a fault on the wire
//! let fault = Fault::new(FaultKind::NotFound, "device 'd1' not registered");
//! let wire = mapper.to_amqp_error(Some(&fault), Some("edge-01"), false)?;
//!
//! // Client side: classify what came back
//! let received = mapper.from_amqp_error(Some(&wire));
//! assert_eq!(received.kind(), FaultKind::NotFound);
//! ```
//!
//! [`Fault`]: crate::fault::Fault
//! [`AmqpError`]: crate::wire::AmqpError
//! [`AmqpException`]: crate::wire::AmqpException
//! [`Outcome`]: crate::wire::Outcome

mod inbound;
mod outbound;
mod resolve;
pub mod tables;

pub use inbound::TRACKING_ID_LABEL;
pub use outbound::truncate_trace;

use crate::config::MapperConfig;
use crate::tracking::TrackingIdComposer;

/// Bidirectional fault / wire-error translator.
#[derive(Debug, Clone, Default)]
pub struct ErrorMapper {
    config: MapperConfig,
    composer: TrackingIdComposer,
}

impl ErrorMapper {
    /// Create a mapper with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mapper with the given configuration
    pub fn with_config(config: MapperConfig) -> Self {
        Self {
            config,
            composer: TrackingIdComposer::new(),
        }
    }

    /// Replace the tracking-id composer
    #[must_use]
    pub fn with_composer(mut self, composer: TrackingIdComposer) -> Self {
        self.composer = composer;
        self
    }

    /// Current configuration
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Tracking-id composer in use
    pub fn composer(&self) -> &TrackingIdComposer {
        &self.composer
    }
}
