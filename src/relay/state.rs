//! Lifecycle states of a relay

use strum_macros::Display;

/// `Created` -> `Running` -> `Draining` -> `Stopped`
///
/// `Running` is skipped when `shutdown` is called before `run` ever started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum RelayState {
    Created,
    Running,
    Draining,
    Stopped,
}

impl RelayState {
    /// Whether `produce` may still accept values in this state
    pub fn accepts_values(&self) -> bool {
        matches!(self, RelayState::Created | RelayState::Running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_early_states_accept_values() {
        assert!(RelayState::Created.accepts_values());
        assert!(RelayState::Running.accepts_values());
        assert!(!RelayState::Draining.accepts_values());
        assert!(!RelayState::Stopped.accepts_values());
    }
}
