//! Capability traits at the boundary between the relay and its endpoint

use crate::relay::error::EndpointResult;
use async_trait::async_trait;

/// Downstream destination that consumes values one at a time
///
/// Implementations are stateful and need not be thread safe: the relay only
/// ever touches an endpoint from its delivery loop, one call at a time.
#[async_trait]
pub trait Endpoint<T: Send + 'static>: Send {
    /// Report whether the endpoint can accept a value right now (no side effects)
    fn is_connected(&self) -> bool;

    /// (Re)establish the connection; only called while `is_connected()` is false
    async fn connect(&mut self) -> EndpointResult<()>;

    /// Forward a single value
    async fn produce(&mut self, value: T) -> EndpointResult<()>;

    /// Release the endpoint; called exactly once, after which it is discarded
    async fn shutdown(&mut self) -> EndpointResult<()>;
}

/// Lazily constructs the endpoint the first time a value needs delivering
pub trait EndpointFactory<T: Send + 'static>: Send + Sync {
    /// Build or select the endpoint for `identifier` (e.g. a destination name)
    fn get(&self, identifier: &str) -> EndpointResult<Box<dyn Endpoint<T>>>;
}
