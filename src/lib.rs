//! keystream: buffered, reconnecting delivery of values to a flaky endpoint
//!
//! - [`buffer`]: bounded FIFO with drop or wait behaviour when full
//! - [`relay`]: the `ProducerWrapper` delivery loop and endpoint capabilities
//! - [`endpoint`]: logging and file-backed endpoints
//! - [`app`]: the command-line application
//! - [`core`]: logging, shutdown, validation and error helpers

pub mod app;
pub mod buffer;
pub mod core;
pub mod endpoint;
pub mod relay;
