//! Endpoint that only logs

use crate::relay::api::{Endpoint, EndpointResult};
use async_trait::async_trait;
use log::{info, trace};
use std::fmt;
use std::marker::PhantomData;

/// Logs each produced value at info level
///
/// Starts disconnected so the relay exercises its connect path on the first
/// value, exactly as it would against a real resource.
#[derive(Debug)]
pub struct LoggingEndpoint<T> {
    name: String,
    connected: bool,
    produced: u64,
    _values: PhantomData<fn(T)>,
}

impl<T> LoggingEndpoint<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            connected: false,
            produced: 0,
            _values: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of values produced so far
    pub fn produced(&self) -> u64 {
        self.produced
    }
}

#[async_trait]
impl<T> Endpoint<T> for LoggingEndpoint<T>
where
    T: fmt::Display + Send + 'static,
{
    fn is_connected(&self) -> bool {
        trace!("Logging endpoint '{}' connected: {}", self.name, self.connected);
        self.connected
    }

    async fn connect(&mut self) -> EndpointResult<()> {
        info!("Logging endpoint '{}' connected", self.name);
        self.connected = true;
        Ok(())
    }

    async fn produce(&mut self, value: T) -> EndpointResult<()> {
        self.produced += 1;
        info!("Produced value '{}'", value);
        Ok(())
    }

    async fn shutdown(&mut self) -> EndpointResult<()> {
        info!(
            "Logging endpoint '{}' shut down after {} values",
            self.name, self.produced
        );
        self.connected = false;
        Ok(())
    }
}
