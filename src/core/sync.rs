//! Synchronisation utilities for mutex poisoning
//!
//! Converts poisoned lock results into module errors so callers can propagate
//! them with `?` instead of panicking.

use std::sync::LockResult;

/// Map a poisoned lock result into an application error
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use keystream::buffer::api::BufferError;
/// use keystream::core::sync::handle_mutex_poison;
///
/// let mutex = Mutex::new(42);
/// let guard = handle_mutex_poison(mutex.lock(), |message| BufferError::Poisoned { message })
///     .unwrap();
/// assert_eq!(*guard, 42);
/// ```
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "Internal synchronisation error (mutex poisoned). A panic occurred while holding a lock. PoisonError: {:?}",
            poison_err
        ))
    })
}
