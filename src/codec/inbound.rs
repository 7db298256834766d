//! Inbound translation: wire error → typed fault.
//!
//! The two entry points differ on purpose:
//!
//! - the exception path keeps the description as-is;
//! - the bare-record path appends `"\nTracking Id:<id>"` to the message
//!   before classification.
//!
//! Both back-fill the tracking id field on kinds that carry one.

use super::{tables, ErrorMapper};
use crate::condition::Condition;
use crate::fault::{Cause, Fault, FaultKind};
use crate::wire::{AmqpError, AmqpException};

/// Label preceding the tracking id appended to bare-record messages.
pub const TRACKING_ID_LABEL: &str = "Tracking Id:";

fn classify(kind: Option<FaultKind>, condition: &Condition) -> FaultKind {
    kind.unwrap_or_else(|| {
        tracing::debug!(%condition, "unrecognized condition, classifying as internal");
        FaultKind::Internal
    })
}

impl ErrorMapper {
    /// Classify a transport exception.
    ///
    /// A missing exception, or one without an embedded record, yields the
    /// unknown fault.
    pub fn from_amqp_exception(&self, exception: Option<&AmqpException>) -> Fault {
        let Some(exception) = exception else {
            return Fault::unknown();
        };
        let Some(error) = exception.error.as_ref() else {
            return Fault::unknown().with_cause(Cause::Exception(exception.clone()));
        };

        let message = if error.description.is_empty() {
            exception.message.clone()
        } else {
            error.description.clone()
        };
        let kind = classify(tables::exception_kind(&error.condition), &error.condition);

        let mut fault = Fault::new(kind, message).with_cause(Cause::Exception(exception.clone()));
        if let Some(tracking_id) = error.tracking_id() {
            fault.backfill_tracking_id(tracking_id);
        }
        fault
    }

    /// Classify a bare wire error record.
    ///
    /// A missing record yields the unknown fault.
    pub fn from_amqp_error(&self, error: Option<&AmqpError>) -> Fault {
        let Some(error) = error else {
            return Fault::unknown();
        };

        let mut message = error.description.clone();
        let tracking_id = error.tracking_id();
        if let Some(id) = tracking_id {
            let suffix = format!("\n{TRACKING_ID_LABEL}{id}");
            // A relayed description may already carry the suffix.
            if !message.ends_with(&suffix) {
                message.push_str(&suffix);
            }
        }

        let kind = classify(tables::error_kind(&error.condition), &error.condition);

        let mut fault = Fault::new(kind, message).with_cause(Cause::Wire(error.clone()));
        if let Some(id) = tracking_id {
            fault.backfill_tracking_id(id);
        }
        fault
    }
}
