//! Counters describing what happened to produced values

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters updated by producers and the delivery loop
#[derive(Debug, Default)]
pub struct RelayStatistics {
    accepted: AtomicU64,
    rejected_full: AtomicU64,
    refused_closed: AtomicU64,
    delivered: AtomicU64,
    failed: AtomicU64,
    reconnects: AtomicU64,
}

/// Point-in-time copy of [`RelayStatistics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RelayStatsSnapshot {
    pub accepted: u64,
    pub rejected_full: u64,
    pub refused_closed: u64,
    pub delivered: u64,
    pub failed: u64,
    pub reconnects: u64,
}

impl RelayStatsSnapshot {
    /// Accepted values that have neither been delivered nor failed yet
    pub fn in_flight(&self) -> u64 {
        self.accepted.saturating_sub(self.delivered + self.failed)
    }
}

impl RelayStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected_full(&self) {
        self.rejected_full.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_refused_closed(&self) {
        self.refused_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_delivered(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_reconnect(&self) {
        self.reconnects.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> RelayStatsSnapshot {
        RelayStatsSnapshot {
            accepted: self.accepted.load(Ordering::Relaxed),
            rejected_full: self.rejected_full.load(Ordering::Relaxed),
            refused_closed: self.refused_closed.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            reconnects: self.reconnects.load(Ordering::Relaxed),
        }
    }
}
