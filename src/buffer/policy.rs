//! Full-queue policy and construction options for the bounded buffer

use serde::Deserialize;
use strum_macros::{Display, EnumIter, EnumString};

/// Behaviour of a write against a buffer that has no free capacity
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum FullPolicy {
    /// Suspend the writer until a reader frees a slot
    Wait,
    /// Discard the value and report `false` immediately
    #[default]
    Drop,
}

impl FullPolicy {
    /// Whether a write under this policy may suspend its caller
    pub fn may_suspend(&self) -> bool {
        matches!(self, FullPolicy::Wait)
    }
}

/// Options fixed at buffer construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferOptions {
    /// Maximum number of resident items (must be greater than 0)
    pub capacity: usize,
    /// What a write does when the buffer is full
    pub full_policy: FullPolicy,
    /// Allow writes and reads that need not suspend to complete without
    /// yielding to the scheduler first
    pub sync_fast_path: bool,
}

impl BufferOptions {
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
}

impl Default for BufferOptions {
    fn default() -> Self {
        Self {
            capacity: 10,
            full_policy: FullPolicy::default(),
            sync_fast_path: true,
        }
    }
}
