//! Buffer Error Types

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BufferError {
    #[error("Buffer is closed to new writes")]
    Closed,

    #[error("Buffer is still open (close it before draining)")]
    StillOpen,

    #[error("Invalid buffer capacity: {capacity} (must be greater than 0)")]
    InvalidCapacity { capacity: usize },

    #[error("Buffer lock poisoned: {message}")]
    Poisoned { message: String },
}

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

impl crate::core::error_handling::ContextualError for BufferError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, BufferError::InvalidCapacity { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            BufferError::InvalidCapacity { .. } => {
                Some("Buffer capacity must be a positive integer")
            }
            _ => None,
        }
    }
}
