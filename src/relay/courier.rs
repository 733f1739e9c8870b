//! The delivery procedure shared by the run loop and the shutdown drain
//!
//! A `Courier` owns the endpoint handle. Whoever holds the courier is the only
//! context allowed to touch the endpoint, so the handle itself needs no lock.

use crate::relay::error::{DeliveryStage, EndpointError, RelayError, RelayResult};
use crate::relay::statistics::RelayStatistics;
use crate::relay::traits::{Endpoint, EndpointFactory};
use log::{debug, trace, warn};
use std::fmt;

pub(crate) struct Courier<T: Send + 'static> {
    factory: Box<dyn EndpointFactory<T>>,
    endpoint_name: String,
    endpoint: Option<Box<dyn Endpoint<T>>>,
    construction_failed: bool,
    sequence: u64,
}

impl<T> Courier<T>
where
    T: Send + fmt::Debug + 'static,
{
    pub(crate) fn new(factory: Box<dyn EndpointFactory<T>>, endpoint_name: String) -> Self {
        Self {
            factory,
            endpoint_name,
            endpoint: None,
            construction_failed: false,
            sequence: 0,
        }
    }

    /// Position of the most recent delivery attempt (1-based)
    pub(crate) fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Deliver one value: construct the endpoint if needed, reconnect if it
    /// reports itself disconnected, then produce.
    ///
    /// A failed value is not retried; the error is returned to the caller.
    pub(crate) async fn deliver(
        &mut self,
        value: T,
        statistics: &RelayStatistics,
    ) -> RelayResult<()> {
        self.sequence += 1;

        let endpoint = match self.endpoint.take() {
            Some(endpoint) => endpoint,
            None => self.acquire()?,
        };
        let endpoint = self.endpoint.insert(endpoint);

        if !endpoint.is_connected() {
            debug!("Endpoint '{}' is disconnected; connecting", self.endpoint_name);
            statistics.record_reconnect();
            endpoint
                .connect()
                .await
                .map_err(|source| RelayError::Delivery {
                    stage: DeliveryStage::Connect,
                    source,
                })?;
        }

        trace!("Delivering value #{}: {:?}", self.sequence, value);
        endpoint
            .produce(value)
            .await
            .map_err(|source| RelayError::Delivery {
                stage: DeliveryStage::Produce,
                source,
            })
    }

    fn acquire(&mut self) -> RelayResult<Box<dyn Endpoint<T>>> {
        if self.construction_failed {
            return Err(RelayError::EndpointUnavailable {
                name: self.endpoint_name.clone(),
            });
        }

        debug!("Constructing endpoint '{}'", self.endpoint_name);
        self.factory.get(&self.endpoint_name).map_err(|source| {
            self.construction_failed = true;
            RelayError::Construction {
                name: self.endpoint_name.clone(),
                source,
            }
        })
    }

    /// Shut the endpoint down if one was ever constructed
    ///
    /// The handle is taken out first, so a second call finds nothing to do.
    pub(crate) async fn release(&mut self) -> Option<Result<(), EndpointError>> {
        let mut endpoint = self.endpoint.take()?;
        debug!("Shutting down endpoint '{}'", self.endpoint_name);

        let result = endpoint.shutdown().await;
        if let Err(e) = &result {
            warn!("Endpoint '{}' failed to shut down cleanly: {}", self.endpoint_name, e);
        }
        Some(result)
    }
}
