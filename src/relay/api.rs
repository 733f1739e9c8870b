//! Public API for the relay
//!
//! External modules should import from here rather than directly from
//! internal modules.

// Core relay components
pub use crate::relay::config::{RelayConfig, DEFAULT_CAPACITY, DEFAULT_ENDPOINT_NAME};
pub use crate::relay::wrapper::ProducerWrapper;

// Capability traits implemented by endpoints
pub use crate::relay::traits::{Endpoint, EndpointFactory};

// Failure reporting
pub use crate::relay::sink::{DeliveryFailure, FailureSink, LogFailureSink};

// Error handling
pub use crate::relay::error::{
    DeliveryStage, EndpointError, EndpointResult, RelayError, RelayResult,
};

// Lifecycle and statistics
pub use crate::relay::state::RelayState;
pub use crate::relay::statistics::{RelayStatistics, RelayStatsSnapshot};

// Full-queue policy is part of the relay configuration surface
pub use crate::buffer::api::FullPolicy;
