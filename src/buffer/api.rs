//! Public API for the bounded buffer
//!
//! External modules should import from here rather than directly from
//! internal modules.

pub use crate::buffer::bounded::{BoundedBuffer, Drain};
pub use crate::buffer::error::{BufferError, BufferResult};
pub use crate::buffer::policy::{BufferOptions, FullPolicy};
