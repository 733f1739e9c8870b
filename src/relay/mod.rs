//! Relay Component
//!
//! Buffers values from any number of callers and delivers them, one at a time
//! and in order, to a downstream endpoint that may disconnect at any point.
//!
//! # Architecture
//!
//! ```text
//!  caller ──produce──▶ ┌───────────────┐  read   ┌──────────────┐   connect?/produce   ┌──────────┐
//!  caller ──produce──▶ │ BoundedBuffer │ ──────▶ │ delivery loop│ ───────────────────▶ │ Endpoint │
//!  caller ──produce──▶ └───────────────┘         │   (Courier)  │                      └──────────┘
//!                                                └──────────────┘
//! ```
//!
//! - The endpoint is built lazily by an [`EndpointFactory`] on the first
//!   delivery, so an idle relay never touches the external resource.
//! - Before each value the endpoint is asked whether it is connected and is
//!   reconnected if not.
//! - A failed delivery is reported to the [`FailureSink`] and the loop moves on
//!   to the next value; nothing is retried or requeued.
//! - Shutdown closes intake, drains the buffer through the same delivery path
//!   and releases the endpoint exactly once.

pub mod api;
mod config;
mod courier;
mod error;
mod sink;
mod state;
mod statistics;
mod traits;
mod wrapper;

pub use config::{RelayConfig, DEFAULT_CAPACITY, DEFAULT_ENDPOINT_NAME};
pub use error::{DeliveryStage, EndpointError, EndpointResult, RelayError, RelayResult};
pub use sink::{DeliveryFailure, FailureSink, LogFailureSink};
pub use state::RelayState;
pub use statistics::{RelayStatistics, RelayStatsSnapshot};
pub use traits::{Endpoint, EndpointFactory};
pub use wrapper::ProducerWrapper;

#[cfg(test)]
mod tests;
