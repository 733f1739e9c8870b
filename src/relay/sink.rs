//! Reporting channel for delivery failures
//!
//! A failed delivery has no caller to return to (`produce` returned long ago),
//! so the delivery loop hands it to a [`FailureSink`] and moves on.

use crate::relay::error::RelayError;

/// A value that could not be delivered
#[derive(Debug)]
pub struct DeliveryFailure {
    /// 1-based position of the value in delivery order
    pub sequence: u64,
    pub error: RelayError,
}

/// Receives delivery failures from the delivery loop
pub trait FailureSink: Send + Sync {
    fn report(&self, failure: DeliveryFailure);
}

/// Default sink: log each failure at warn level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFailureSink;

impl FailureSink for LogFailureSink {
    fn report(&self, failure: DeliveryFailure) {
        log::warn!(
            "Value #{} was not delivered: {}",
            failure.sequence,
            failure.error
        );
    }
}

impl<F> FailureSink for F
where
    F: Fn(DeliveryFailure) + Send + Sync,
{
    fn report(&self, failure: DeliveryFailure) {
        self(failure)
    }
}
