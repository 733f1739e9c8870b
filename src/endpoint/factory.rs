//! Factory selecting the endpoint the binary delivers to

use crate::endpoint::connection::{FileConnection, DEFAULT_DISCONNECT_RANGE};
use crate::endpoint::file::FileEndpoint;
use crate::endpoint::logging::LoggingEndpoint;
use crate::relay::api::{Endpoint, EndpointError, EndpointFactory, EndpointResult};
use log::debug;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

/// Builds a [`FileEndpoint`] under the output directory when one is set,
/// otherwise a [`LoggingEndpoint`]
#[derive(Debug, Clone)]
pub struct StandardEndpointFactory {
    output_dir: Option<PathBuf>,
    disconnect_range: RangeInclusive<usize>,
}

impl StandardEndpointFactory {
    pub fn new(output_dir: Option<PathBuf>) -> Self {
        Self {
            output_dir,
            disconnect_range: DEFAULT_DISCONNECT_RANGE,
        }
    }

    pub fn logging() -> Self {
        Self::new(None)
    }

    pub fn file(output_dir: impl Into<PathBuf>) -> Self {
        Self::new(Some(output_dir.into()))
    }

    /// Forwarded to every [`FileConnection`] this factory creates
    pub fn with_disconnect_range(mut self, range: RangeInclusive<usize>) -> Self {
        self.disconnect_range = range;
        self
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }
}

impl EndpointFactory<char> for StandardEndpointFactory {
    fn get(&self, identifier: &str) -> EndpointResult<Box<dyn Endpoint<char>>> {
        let Some(dir) = &self.output_dir else {
            debug!("No output directory; logging values for '{}'", identifier);
            return Ok(Box::new(LoggingEndpoint::new(identifier)));
        };

        if !dir.is_dir() {
            return Err(EndpointError::Rejected {
                reason: format!("output directory {} does not exist", dir.display()),
            });
        }

        let connection = FileConnection::new(dir, identifier)
            .with_disconnect_range(self.disconnect_range.clone());
        debug!("Writing values to {}", connection.path().display());
        Ok(Box::new(FileEndpoint::new(connection)))
    }
}
