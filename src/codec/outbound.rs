//! Outbound translation: fault → wire error record.

use super::{tables, ErrorMapper};
use crate::condition::keys;
use crate::fault::Fault;
use crate::wire::{AmqpError, Fields, Outcome, Upsert};

/// Truncate a trace to at most `max_bytes`, backing off to a UTF-8 boundary.
pub fn truncate_trace(trace: &str, max_bytes: usize) -> &str {
    if trace.len() <= max_bytes {
        return trace;
    }
    let mut end = max_bytes;
    while !trace.is_char_boundary(end) {
        end -= 1;
    }
    &trace[..end]
}

impl ErrorMapper {
    /// Translate a fault into a wire error record.
    ///
    /// A fault that already carries a wire error (it came from an inbound
    /// translation, possibly wrapped by later faults) keeps that error's
    /// condition and info verbatim. The returned record always has an info map
    /// with a tracking id: the relayed one, else the fault's own, else fresh.
    ///
    /// A missing fault is a precondition violation and returns an
    /// invalid-argument fault.
    pub fn to_amqp_error(
        &self,
        fault: Option<&Fault>,
        gateway_id: Option<&str>,
        include_stack_trace: bool,
    ) -> Result<AmqpError, Fault> {
        let Some(fault) = fault else {
            return Err(Fault::invalid_argument("fault must not be null"));
        };
        Ok(self.translate(fault, gateway_id, include_stack_trace))
    }

    /// Translate using the configured gateway and trace settings.
    pub fn encode(&self, fault: &Fault) -> AmqpError {
        self.translate(
            fault,
            self.config.gateway_id.as_deref(),
            self.config.include_stack_trace,
        )
    }

    fn translate(
        &self,
        fault: &Fault,
        gateway_id: Option<&str>,
        include_stack_trace: bool,
    ) -> AmqpError {
        let mut error = AmqpError::new(tables::condition_for(fault.kind()), fault.message());
        if let Some(wire) = fault.wire_error() {
            error.condition = wire.condition.clone();
            error.info = wire.info.clone();
        }

        let info = error.info_mut();

        if include_stack_trace {
            if let Some(trace) = fault.trace() {
                let max = self.config.max_trace_bytes;
                let truncated = truncate_trace(trace, max);
                if truncated.len() < trace.len() {
                    tracing::debug!(
                        original = trace.len(),
                        max,
                        "truncated diagnostic trace"
                    );
                }
                info.insert_if_absent(keys::STACK_TRACE, truncated);
            }
        }

        if let Some(version) = &self.config.client_version {
            info.insert_if_absent(keys::CLIENT_VERSION, version.as_str());
        }
        if let Some(version) = &self.config.api_version {
            info.insert_if_absent(keys::API_VERSION, version.as_str());
        }

        let existing = info
            .get_str(keys::TRACKING_ID)
            .filter(|id| !id.is_empty())
            .or_else(|| fault.carried_tracking_id())
            .map(str::to_owned);
        let tracking_id = self.composer.compose(gateway_id, existing.as_deref());
        match info.upsert(keys::TRACKING_ID, tracking_id) {
            Upsert::Replaced(previous) if previous.as_str() == Some("") => {
                tracing::debug!("replaced empty tracking id");
            }
            Upsert::Replaced(previous) if previous.is_string() => {
                tracing::debug!(%previous, "tracking id extended with gateway");
            }
            Upsert::Replaced(previous) => {
                tracing::warn!(%previous, "replaced non-string tracking id");
            }
            Upsert::Inserted | Upsert::Unchanged => {}
        }

        error
    }

    /// Settle a delivery as rejected with the translated fault.
    pub fn to_rejected_outcome(&self, fault: &Fault) -> Outcome {
        Outcome::rejected(self.encode(fault))
    }

    /// Dead-letter headers describing a rejected message.
    pub fn dead_letter_headers(error: &AmqpError) -> Fields {
        [
            (keys::DEAD_LETTER_REASON_HEADER, error.condition.to_string()),
            (
                keys::DEAD_LETTER_ERROR_DESCRIPTION_HEADER,
                error.description.clone(),
            ),
        ]
        .into_iter()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Condition;
    use crate::config::MapperConfig;
    use crate::fault::{Cause, FaultKind};
    use crate::tracking::{IdSource, TrackingIdComposer};

    struct FixedSource;

    impl IdSource for FixedSource {
        fn next_id(&self) -> String {
            "fixed".to_string()
        }
    }

    fn mapper() -> ErrorMapper {
        ErrorMapper::new().with_composer(TrackingIdComposer::with_source(FixedSource))
    }

    #[test]
    fn test_null_fault_is_invalid_argument() {
        let err = mapper().to_amqp_error(None, None, false).unwrap_err();
        assert_eq!(err.kind(), FaultKind::InvalidArgument);
    }

    #[test]
    fn test_basic_translation() {
        let fault = Fault::new(FaultKind::Throttled, "slow down");
        let error = mapper().to_amqp_error(Some(&fault), None, false).unwrap();

        assert_eq!(error.condition, Condition::DEVICE_CONTAINER_THROTTLED);
        assert_eq!(error.description, "slow down");
        assert_eq!(error.tracking_id(), Some("fixed"));
        assert!(error.stack_trace().is_none());
    }

    #[test]
    fn test_passthrough_copies_condition_and_info() {
        let upstream = AmqpError::new(Condition::new("com.contoso:custom"), "odd")
            .with_info(keys::TRACKING_ID, "t-9")
            .with_info("x-extra", "kept");
        let fault =
            Fault::new(FaultKind::Internal, "relayed").with_cause(Cause::Wire(upstream.clone()));

        let error = mapper().to_amqp_error(Some(&fault), None, false).unwrap();
        assert_eq!(error.condition, upstream.condition);
        assert_eq!(error.description, "relayed");
        assert_eq!(error.tracking_id(), Some("t-9"));
        assert_eq!(error.info.unwrap().get_str("x-extra"), Some("kept"));
    }

    #[test]
    fn test_own_tracking_id_is_kept() {
        let fault = Fault::new(FaultKind::NotFound, "missing").with_tracking_id("t-1");

        let error = mapper().to_amqp_error(Some(&fault), None, false).unwrap();
        assert_eq!(error.condition, Condition::NOT_FOUND);
        assert_eq!(error.tracking_id(), Some("t-1"));

        let relayed = mapper().to_amqp_error(Some(&fault), Some("gw"), false).unwrap();
        assert_eq!(relayed.tracking_id(), Some("t-1-G:gw"));
    }

    #[test]
    fn test_wrapped_inbound_fault_relays_record() {
        let upstream = AmqpError::new(Condition::NOT_FOUND, "gone")
            .with_info(keys::TRACKING_ID, "abc");
        let inbound = mapper().from_amqp_error(Some(&upstream));
        let fault = Fault::new(FaultKind::Communication, "relay failed").caused_by(inbound);

        let error = mapper().to_amqp_error(Some(&fault), None, false).unwrap();
        assert_eq!(error.condition, Condition::NOT_FOUND);
        assert_eq!(error.description, "relay failed");
        assert_eq!(error.tracking_id(), Some("abc"));
    }

    #[test]
    fn test_wrapped_fault_tracking_id_is_kept() {
        let inner = Fault::new(FaultKind::Throttled, "slow down").with_tracking_id("t-5");
        let fault = Fault::new(FaultKind::Communication, "relay failed").caused_by(inner);

        let error = mapper().to_amqp_error(Some(&fault), None, false).unwrap();
        assert_eq!(error.condition, Condition::INTERNAL_ERROR);
        assert_eq!(error.tracking_id(), Some("t-5"));
    }

    #[test]
    fn test_empty_tracking_id_treated_as_absent() {
        let upstream = AmqpError::new(Condition::NOT_FOUND, "gone").with_info(keys::TRACKING_ID, "");

        let relayed = Fault::new(FaultKind::NotFound, "gone").with_cause(Cause::Wire(upstream.clone()));
        let error = mapper().to_amqp_error(Some(&relayed), None, false).unwrap();
        assert_eq!(error.tracking_id(), Some("fixed"));

        let owned = relayed.with_tracking_id("t-3");
        let error = mapper().to_amqp_error(Some(&owned), None, false).unwrap();
        assert_eq!(error.tracking_id(), Some("t-3"));
    }

    #[test]
    fn test_non_string_tracking_id_replaced() {
        let upstream = AmqpError::new(Condition::NOT_FOUND, "gone")
            .with_info(keys::TRACKING_ID, serde_json::json!(42));
        let fault = Fault::new(FaultKind::NotFound, "gone").with_cause(Cause::Wire(upstream));

        let error = mapper().to_amqp_error(Some(&fault), None, false).unwrap();
        let info = error.info.unwrap();
        assert_eq!(info.get(keys::TRACKING_ID), Some(&serde_json::json!("fixed")));
        assert_eq!(info.len(), 1);
    }

    #[test]
    fn test_trace_only_when_requested() {
        let fault = Fault::new(FaultKind::Internal, "boom").with_trace("at main");
        let without = mapper().to_amqp_error(Some(&fault), None, false).unwrap();
        assert!(without.stack_trace().is_none());

        let with = mapper().to_amqp_error(Some(&fault), None, true).unwrap();
        assert_eq!(with.stack_trace(), Some("at main"));
    }

    #[test]
    fn test_truncate_trace_utf8_boundary() {
        let trace = "é".repeat(10);
        let truncated = truncate_trace(&trace, 5);
        assert_eq!(truncated.len(), 4);
        assert_eq!(truncate_trace("short", 100), "short");
    }

    #[test]
    fn test_configured_versions_inserted() {
        let config = MapperConfig {
            api_version: Some("2021-04-12".to_string()),
            ..MapperConfig::default().with_client_version("hubwire/0.4.0")
        };
        let mapper = ErrorMapper::with_config(config);
        let error = mapper.encode(&Fault::unknown());

        let info = error.info.unwrap();
        assert_eq!(info.get_str(keys::CLIENT_VERSION), Some("hubwire/0.4.0"));
        assert_eq!(info.get_str(keys::API_VERSION), Some("2021-04-12"));
    }

    #[test]
    fn test_encode_uses_configured_gateway() {
        let mapper = ErrorMapper::with_config(MapperConfig::default().with_gateway("edge-7"))
            .with_composer(TrackingIdComposer::with_source(FixedSource));
        let error = mapper.encode(&Fault::new(FaultKind::NotFound, "missing"));
        assert_eq!(error.tracking_id(), Some("fixed-G:edge-7"));
    }

    #[test]
    fn test_rejected_outcome_and_dead_letter_headers() {
        let outcome = mapper().to_rejected_outcome(&Fault::new(FaultKind::MessageTooLarge, "big"));
        let error = outcome.error().unwrap();
        assert_eq!(error.condition, Condition::MESSAGE_SIZE_EXCEEDED);

        let headers = ErrorMapper::dead_letter_headers(error);
        assert_eq!(
            headers.get_str(keys::DEAD_LETTER_REASON_HEADER),
            Some("amqp:link:message-size-exceeded")
        );
        assert_eq!(
            headers.get_str(keys::DEAD_LETTER_ERROR_DESCRIPTION_HEADER),
            Some("big")
        );
    }
}
