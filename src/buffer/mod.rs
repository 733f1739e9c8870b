//! Bounded Buffer Component
//!
//! A fixed-capacity FIFO buffer that sits between any number of producers and
//! a single delivery loop.
//!
//! # Overview
//!
//! - **Bounded**: at most `capacity` items are resident while the buffer is open
//! - **Full-queue policy**: writes against a full buffer either suspend
//!   (`wait`) or are rejected immediately (`drop`)
//! - **Close then drain**: closing stops intake; items already accepted stay
//!   readable until drained, in FIFO order
//!
//! ```text
//!  writer ─┐   try_write / write    ┌───┬───┬───┬───┐   read / drain_all
//!  writer ─┼──────────────────────▶ │ 1 │ 2 │ 3 │ . │ ───────────────────▶ reader
//!  writer ─┘                        └───┴───┴───┴───┘
//! ```

pub mod api;
mod bounded;
mod error;
mod policy;

pub use bounded::{BoundedBuffer, Drain};
pub use error::{BufferError, BufferResult};
pub use policy::{BufferOptions, FullPolicy};

#[cfg(test)]
mod tests;
