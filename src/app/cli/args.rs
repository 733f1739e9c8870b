//! Command-line arguments
//!
//! Every option is optional so that values missing from the command line can
//! be filled from the configuration file afterwards.

use crate::core::validation::{validate_endpoint_name, validate_positive_int};
use crate::relay::api::FullPolicy;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(name = "keystream")]
#[command(about = "Stream typed characters to a flaky endpoint through a bounded buffer")]
#[command(version, long_version = crate::core::version::long_version())]
#[command(after_help = "Input ends at end-of-file, on an ESC character, or on SIGINT/SIGTERM.")]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Maximum number of characters waiting for delivery
    #[arg(short = 'n', long = "capacity", value_name = "COUNT", value_parser = validate_positive_int)]
    pub capacity: Option<usize>,

    /// What to do when the buffer is full
    #[arg(short = 'p', long = "policy", value_name = "POLICY", value_parser = ["drop", "wait"])]
    pub policy: Option<String>,

    /// Write characters to a file in this directory instead of the log
    #[arg(short = 'd', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Name of the output file (or logging endpoint)
    #[arg(short = 'e', long = "endpoint-name", value_name = "NAME", value_parser = validate_endpoint_name)]
    pub endpoint_name: Option<String>,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Log file path
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Force coloured log output
    #[arg(short = 'g', long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Disable coloured log output
    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parsed full-queue policy, if one was given
    ///
    /// Values are restricted by clap, so parsing only fails for values set
    /// programmatically.
    pub fn full_policy(&self) -> Option<Result<FullPolicy, strum::ParseError>> {
        self.policy.as_deref().map(|policy| policy.parse::<FullPolicy>())
    }

    /// Resolve colour output from the flags and whether stderr is a terminal
    pub fn use_color(&self, is_terminal: bool) -> bool {
        (self.color || is_terminal) && !self.no_color
    }
}
