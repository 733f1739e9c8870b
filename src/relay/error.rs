//! Relay and endpoint error types

use crate::buffer::api::BufferError;
use crate::core::error_handling::ContextualError;
use strum_macros::Display;

/// Failure reported by an endpoint capability
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("Endpoint is not connected")]
    Disconnected,

    #[error("Endpoint I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Endpoint rejected the operation: {reason}")]
    Rejected { reason: String },
}

/// Result type for endpoint operations
pub type EndpointResult<T> = Result<T, EndpointError>;

/// The step of the delivery procedure that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum DeliveryStage {
    Connect,
    Produce,
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Intake is closed for good; distinct from a full buffer
    #[error("Relay is shut down; no further values are accepted")]
    Closed,

    #[error(transparent)]
    Buffer(BufferError),

    #[error("Endpoint '{name}' could not be created: {source}")]
    Construction {
        name: String,
        #[source]
        source: EndpointError,
    },

    #[error("Endpoint '{name}' is unavailable after an earlier construction failure")]
    EndpointUnavailable { name: String },

    #[error("Delivery failed during {stage}: {source}")]
    Delivery {
        stage: DeliveryStage,
        #[source]
        source: EndpointError,
    },

    /// A background task panicked or was aborted before finishing
    #[error("The {task} task failed: {reason}")]
    TaskFailed { task: &'static str, reason: String },
}

impl RelayError {
    /// Errors after which no value can ever reach the endpoint
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RelayError::Construction { .. } | RelayError::EndpointUnavailable { .. }
        )
    }
}

impl From<BufferError> for RelayError {
    fn from(error: BufferError) -> Self {
        match error {
            BufferError::Closed => RelayError::Closed,
            other => RelayError::Buffer(other),
        }
    }
}

/// Result type for relay operations
pub type RelayResult<T> = Result<T, RelayError>;

impl ContextualError for RelayError {
    fn is_user_actionable(&self) -> bool {
        match self {
            RelayError::Buffer(inner) => inner.is_user_actionable(),
            RelayError::Construction { .. } | RelayError::EndpointUnavailable { .. } => true,
            _ => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            RelayError::Buffer(inner) => inner.user_message(),
            RelayError::Construction { .. } | RelayError::EndpointUnavailable { .. } => {
                Some("The output endpoint could not be created; check the output directory")
            }
            _ => None,
        }
    }
}
