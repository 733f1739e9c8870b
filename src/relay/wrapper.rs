//! ProducerWrapper - buffered, reconnecting delivery to a single endpoint
//!
//! Callers hand values to [`ProducerWrapper::produce`]; a single delivery loop
//! ([`ProducerWrapper::run`]) forwards them to the endpoint in acceptance order.
//! [`ProducerWrapper::shutdown`] closes intake, drains what is left through the
//! same delivery path and releases the endpoint exactly once.

use crate::buffer::api::BoundedBuffer;
use crate::relay::config::RelayConfig;
use crate::relay::courier::Courier;
use crate::relay::error::{RelayError, RelayResult};
use crate::relay::sink::{DeliveryFailure, FailureSink, LogFailureSink};
use crate::relay::state::RelayState;
use crate::relay::statistics::{RelayStatistics, RelayStatsSnapshot};
use crate::relay::traits::EndpointFactory;
use log::{debug, error, info, warn};
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

/// Buffered producer that isolates callers from an intermittently connected endpoint
///
/// # Thread Safety
///
/// `produce` may be called from any number of tasks at once. Exactly one task
/// should drive `run`; the endpoint is only ever touched by whichever context
/// currently holds the courier (the run loop, or the shutdown drain once the
/// loop has finished).
///
/// # Example
///
/// ```rust,no_run
/// use keystream::endpoint::api::StandardEndpointFactory;
/// use keystream::relay::api::{ProducerWrapper, RelayConfig};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let wrapper = Arc::new(ProducerWrapper::new(
///     RelayConfig::new(10),
///     StandardEndpointFactory::logging(),
/// )?);
///
/// let runner = {
///     let wrapper = Arc::clone(&wrapper);
///     tokio::spawn(async move { wrapper.run().await })
/// };
///
/// wrapper.produce('k').await?;
/// wrapper.shutdown().await?;
/// runner.await??;
/// # Ok(())
/// # }
/// ```
pub struct ProducerWrapper<T: Send + 'static> {
    shared: Arc<Shared<T>>,
}

// Shared with the detached shutdown drain task
struct Shared<T: Send + 'static> {
    buffer: BoundedBuffer<T>,
    courier: Mutex<Courier<T>>,
    shutdown_initiated: AtomicBool,
    state: watch::Sender<RelayState>,
    statistics: RelayStatistics,
    failure_sink: Arc<dyn FailureSink>,
    config: RelayConfig,
}

/// Publishes `Stopped` when the drain task ends, even by panic
struct StopOnDrop<'a>(&'a watch::Sender<RelayState>);

impl Drop for StopOnDrop<'_> {
    fn drop(&mut self) {
        self.0.send_replace(RelayState::Stopped);
    }
}

impl<T> ProducerWrapper<T>
where
    T: Send + fmt::Debug + 'static,
{
    /// Create a wrapper; the factory is not called until the first delivery
    pub fn new(
        config: RelayConfig,
        factory: impl EndpointFactory<T> + 'static,
    ) -> RelayResult<Self> {
        let buffer = BoundedBuffer::new(config.buffer_options())?;
        let (state, _) = watch::channel(RelayState::Created);

        Ok(Self {
            shared: Arc::new(Shared {
                buffer,
                courier: Mutex::new(Courier::new(
                    Box::new(factory),
                    config.endpoint_name.clone(),
                )),
                shutdown_initiated: AtomicBool::new(false),
                state,
                statistics: RelayStatistics::new(),
                failure_sink: Arc::new(LogFailureSink),
                config,
            }),
        })
    }

    /// Replace the default (logging) delivery-failure sink
    ///
    /// Only effective before `shutdown` has started.
    pub fn with_failure_sink(mut self, sink: Arc<dyn FailureSink>) -> Self {
        match Arc::get_mut(&mut self.shared) {
            Some(shared) => shared.failure_sink = sink,
            None => warn!("Failure sink left unchanged: shutdown already started"),
        }
        self
    }

    pub fn config(&self) -> &RelayConfig {
        &self.shared.config
    }

    pub fn state(&self) -> RelayState {
        *self.shared.state.borrow()
    }

    pub fn statistics(&self) -> RelayStatsSnapshot {
        self.shared.statistics.snapshot()
    }

    /// Values accepted but not yet taken by the delivery loop
    pub fn buffered(&self) -> usize {
        self.shared.buffer.len()
    }

    pub fn is_shutdown_initiated(&self) -> bool {
        self.shared.shutdown_initiated.load(Ordering::Acquire)
    }

    fn intake_open(&self) -> bool {
        !self.is_shutdown_initiated() && self.state().accepts_values()
    }

    /// Offer a value for delivery
    ///
    /// Returns `Ok(true)` when accepted and `Ok(false)` when the buffer is full
    /// under the drop policy (the value is discarded). Under the wait policy the
    /// call suspends until space frees up. Once shutdown has begun, or the
    /// endpoint turned out to be unavailable, every call fails with
    /// [`RelayError::Closed`].
    pub async fn produce(&self, value: T) -> RelayResult<bool> {
        if !self.intake_open() {
            self.shared.statistics.record_refused_closed();
            return Err(RelayError::Closed);
        }
        let outcome = self.shared.buffer.write(value).await;
        self.record_intake(outcome.map_err(RelayError::from))
    }

    /// Offer a value without ever suspending, regardless of the full policy
    pub fn try_produce(&self, value: T) -> RelayResult<bool> {
        if !self.intake_open() {
            self.shared.statistics.record_refused_closed();
            return Err(RelayError::Closed);
        }
        let outcome = self.shared.buffer.try_write(value);
        self.record_intake(outcome.map_err(RelayError::from))
    }

    fn record_intake(&self, outcome: RelayResult<bool>) -> RelayResult<bool> {
        let statistics = &self.shared.statistics;
        match &outcome {
            Ok(true) => statistics.record_accepted(),
            Ok(false) => {
                statistics.record_rejected_full();
                debug!(
                    "Buffer full ({} values); value dropped",
                    self.shared.buffer.capacity()
                );
            }
            Err(RelayError::Closed) => statistics.record_refused_closed(),
            Err(_) => {}
        }
        outcome
    }

    /// Run the delivery loop until the buffer is closed and drained
    pub async fn run(&self) -> RelayResult<()> {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Run the delivery loop, exiting early when `cancel` completes
    ///
    /// Cancellation is only observed between buffer reads and is ignored once
    /// shutdown has begun, because the drain must finish to release the
    /// endpoint. Returns [`RelayError::EndpointUnavailable`] when the endpoint
    /// cannot be constructed; intake is then closed since no value could ever
    /// be delivered.
    pub async fn run_until<F>(&self, cancel: F) -> RelayResult<()>
    where
        F: Future<Output = ()>,
    {
        let shared = &self.shared;
        let mut courier = shared.courier.lock().await;
        shared.state.send_if_modified(|state| {
            if *state == RelayState::Created {
                *state = RelayState::Running;
                true
            } else {
                false
            }
        });
        debug!("Delivery loop started");

        tokio::pin!(cancel);
        loop {
            let next = tokio::select! {
                biased;
                _ = &mut cancel, if !self.is_shutdown_initiated() => {
                    info!("Delivery loop cancelled with {} values buffered", shared.buffer.len());
                    return Ok(());
                }
                next = shared.buffer.read() => next?,
            };

            let Some(value) = next else {
                debug!("Delivery loop finished: buffer closed and drained");
                return Ok(());
            };

            if let Err(e) = shared.forward(&mut courier, value).await {
                error!("Delivery loop stopped: {}", e);
                shared.buffer.close()?;
                shared.state.send_if_modified(|state| {
                    if *state == RelayState::Running {
                        *state = RelayState::Draining;
                        true
                    } else {
                        false
                    }
                });
                return Err(e);
            }
        }
    }

    /// Close intake, drain every remaining value, then release the endpoint
    ///
    /// The drain runs on its own task: once started it completes even if this
    /// future is dropped. Returns when all three phases are done. A later or
    /// concurrent call waits for the same drain and has no further effect.
    pub async fn shutdown(&self) -> RelayResult<()> {
        if self.shared.shutdown_initiated.swap(true, Ordering::AcqRel) {
            self.shared.wait_until_stopped().await;
            return Ok(());
        }

        info!("Shutdown initiated; closing intake");
        self.shared.state.send_replace(RelayState::Draining);

        let shared = Arc::clone(&self.shared);
        let drain = tokio::spawn(async move {
            let _stopped = StopOnDrop(&shared.state);
            let result = shared.drain_and_release().await;
            info!("Shutdown complete");
            result
        });

        match drain.await {
            Ok(result) => result,
            Err(e) => Err(RelayError::TaskFailed {
                task: "shutdown drain",
                reason: e.to_string(),
            }),
        }
    }
}

impl<T> Shared<T>
where
    T: Send + fmt::Debug + 'static,
{
    // Deliver through the courier. Every failure goes to the sink; fatal ones
    // also end the caller's loop.
    async fn forward(&self, courier: &mut Courier<T>, value: T) -> RelayResult<()> {
        match courier.deliver(value, &self.statistics).await {
            Ok(()) => {
                self.statistics.record_delivered();
                Ok(())
            }
            Err(error) => {
                self.statistics.record_failed();
                let fatal = error.is_fatal();
                self.failure_sink.report(DeliveryFailure {
                    sequence: courier.sequence(),
                    error,
                });
                if fatal {
                    return Err(RelayError::EndpointUnavailable {
                        name: self.config.endpoint_name.clone(),
                    });
                }
                Ok(())
            }
        }
    }

    async fn drain_and_release(&self) -> RelayResult<()> {
        self.buffer.close()?;

        // Waits for an active run loop to finish; it keeps delivering until
        // the closed buffer is empty, so order is preserved across the handoff.
        let mut courier = self.courier.lock().await;

        let mut drained = 0usize;
        for value in self.buffer.drain_all()? {
            drained += 1;
            if let Err(e) = self.forward(&mut courier, value).await {
                debug!("Draining without an endpoint: {}", e);
            }
        }
        if drained > 0 {
            debug!("Drained {} values during shutdown", drained);
        }

        if courier.release().await.is_none() {
            debug!("No endpoint was constructed; nothing to release");
        }
        Ok(())
    }

    async fn wait_until_stopped(&self) {
        let mut stopped = self.state.subscribe();
        let _ = stopped
            .wait_for(|state| *state == RelayState::Stopped)
            .await;
    }
}
