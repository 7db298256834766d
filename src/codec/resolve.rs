//! Outcome resolution: delivery outcome → typed fault.

use super::ErrorMapper;
use crate::fault::Fault;
use crate::wire::{AmqpException, Outcome};

impl ErrorMapper {
    /// Resolve a delivery outcome into the fault language.
    ///
    /// | Outcome       | Fault                                      |
    /// |---------------|--------------------------------------------|
    /// | missing       | unknown                                    |
    /// | rejected      | exception-path classification of its error |
    /// | released      | canceled                                   |
    /// | anything else | unknown                                    |
    pub fn from_outcome(&self, outcome: Option<&Outcome>) -> Fault {
        match outcome {
            None => Fault::unknown(),
            Some(Outcome::Rejected { error: Some(error) }) => {
                self.from_amqp_exception(Some(&AmqpException::new(error.clone())))
            }
            Some(Outcome::Rejected { error: None }) => self.from_amqp_exception(Some(
                &AmqpException::without_error("Delivery rejected without an error."),
            )),
            Some(Outcome::Released) => Fault::canceled(),
            Some(other) => {
                tracing::debug!(?other, "outcome carries no fault, classifying as unknown");
                Fault::unknown()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Condition;
    use crate::fault::FaultKind;
    use crate::wire::AmqpError;

    #[test]
    fn test_released_is_canceled() {
        let fault = ErrorMapper::new().from_outcome(Some(&Outcome::Released));
        assert_eq!(fault.kind(), FaultKind::Canceled);
        assert!(fault.is_canceled());
    }

    #[test]
    fn test_rejected_not_found() {
        let outcome = Outcome::rejected(AmqpError::new(Condition::NOT_FOUND, "no such device"));
        let fault = ErrorMapper::new().from_outcome(Some(&outcome));
        assert_eq!(fault.kind(), FaultKind::NotFound);
        assert_eq!(fault.message(), "no such device");
    }

    #[test]
    fn test_rejected_without_error_is_unknown() {
        let fault = ErrorMapper::new().from_outcome(Some(&Outcome::Rejected { error: None }));
        assert_eq!(fault.kind(), FaultKind::Internal);
        assert_eq!(fault.message(), "Unknown error.");
    }

    #[test]
    fn test_other_shapes_are_unknown() {
        let mapper = ErrorMapper::new();
        for outcome in [
            Outcome::Accepted,
            Outcome::Modified {
                delivery_failed: true,
                undeliverable_here: false,
            },
        ] {
            let fault = mapper.from_outcome(Some(&outcome));
            assert_eq!(fault.kind(), FaultKind::Internal);
            assert!(!fault.is_canceled());
        }
        assert_eq!(mapper.from_outcome(None).kind(), FaultKind::Internal);
    }
}
