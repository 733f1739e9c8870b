//! Concrete Endpoints
//!
//! Implementations of the relay's [`Endpoint`](crate::relay::api::Endpoint)
//! capability used by the binary:
//!
//! - [`LoggingEndpoint`] writes every value to the log and never fails. It is
//!   the default when no output directory is configured.
//! - [`FileEndpoint`] appends characters to a file through a
//!   [`FileConnection`] that drops itself after a handful of writes, which
//!   keeps the relay's reconnect path busy.
//! - [`StandardEndpointFactory`] picks between the two.

pub mod api;
mod connection;
mod factory;
mod file;
mod logging;

pub use connection::{FileConnection, DEFAULT_DISCONNECT_RANGE};
pub use factory::StandardEndpointFactory;
pub use file::FileEndpoint;
pub use logging::LoggingEndpoint;
