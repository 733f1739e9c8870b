//! Application module: the `keystream` binary's wiring

pub mod cli;
pub mod input;
pub mod startup;
