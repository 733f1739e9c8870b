//! Construction-time configuration for a relay

use crate::buffer::api::{BufferOptions, FullPolicy};

/// Default endpoint identifier handed to the factory
pub const DEFAULT_ENDPOINT_NAME: &str = "keyloggerdata.txt";

/// Default buffer capacity
pub const DEFAULT_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Maximum number of values waiting for delivery
    pub capacity: usize,
    /// Behaviour of `produce` when the buffer is full
    pub full_policy: FullPolicy,
    /// Allow writes that need not suspend to complete synchronously
    pub sync_fast_path: bool,
    /// Identifier passed to the endpoint factory on first delivery
    pub endpoint_name: String,
}

impl RelayConfig {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    pub fn with_full_policy(mut self, full_policy: FullPolicy) -> Self {
        self.full_policy = full_policy;
        self
    }

    pub fn with_sync_fast_path(mut self, sync_fast_path: bool) -> Self {
        self.sync_fast_path = sync_fast_path;
        self
    }

    pub fn with_endpoint_name(mut self, endpoint_name: impl Into<String>) -> Self {
        self.endpoint_name = endpoint_name.into();
        self
    }

    pub fn buffer_options(&self) -> BufferOptions {
        BufferOptions::new(self.capacity)
            .with_full_policy(self.full_policy)
            .with_sync_fast_path(self.sync_fast_path)
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            full_policy: FullPolicy::Drop,
            sync_fast_path: true,
            endpoint_name: DEFAULT_ENDPOINT_NAME.to_string(),
        }
    }
}
