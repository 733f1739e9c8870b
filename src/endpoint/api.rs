//! Public API for concrete endpoints

pub use crate::endpoint::connection::{FileConnection, DEFAULT_DISCONNECT_RANGE};
pub use crate::endpoint::factory::StandardEndpointFactory;
pub use crate::endpoint::file::FileEndpoint;
pub use crate::endpoint::logging::LoggingEndpoint;

// Capability implemented by everything above
pub use crate::relay::api::{Endpoint, EndpointError, EndpointFactory, EndpointResult};
