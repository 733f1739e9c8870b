//! Command-line parsing and configuration file handling

pub mod api;
pub mod args;
pub mod config;
mod error;

pub use error::{ConfigError, ConfigResult};

#[cfg(test)]
mod tests;
