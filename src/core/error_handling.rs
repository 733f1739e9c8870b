//! Generic error handling utilities
//!
//! Lets the binary log any module's error the same way, while each error type
//! decides whether its message is fit to show to the person running it.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` must return
/// `Some(message)`; otherwise it returns `None`.
pub trait ContextualError: std::error::Error {
    /// True if this error carries a message the user can act on directly
    ///
    /// Examples of user-actionable errors:
    /// - A zero buffer capacity
    /// - An unknown full-queue policy in the configuration file
    ///
    /// Examples of system errors:
    /// - IO failures while writing to the endpoint
    /// - A poisoned lock
    fn is_user_actionable(&self) -> bool;

    /// The specific user message if this is a user-actionable error
    fn user_message(&self) -> Option<&str>;
}

/// Log an error with a level of detail suited to its kind
///
/// User-actionable errors log their own message; system errors log the
/// operation context. Full details are always available at debug level.
///
/// # Examples
/// ```rust,no_run
/// # use keystream::core::error_handling::log_error_with_context;
/// # use keystream::buffer::api::BoundedBuffer;
/// if let Err(e) = BoundedBuffer::<char>::with_capacity(0) {
///     log_error_with_context(&e, "Creating the relay buffer");
///     // Logs: "FATAL: Buffer capacity must be a positive integer"
/// }
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => log::error!("FATAL: {}", user_msg),
        _ => log::error!("FATAL: {}", operation_context),
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}
