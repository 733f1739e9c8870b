//! Adapter from a `FileConnection` to the relay's endpoint capability

use crate::endpoint::connection::FileConnection;
use crate::relay::api::{Endpoint, EndpointResult};
use async_trait::async_trait;
use std::path::Path;

#[derive(Debug)]
pub struct FileEndpoint {
    connection: FileConnection,
}

impl FileEndpoint {
    pub fn new(connection: FileConnection) -> Self {
        Self { connection }
    }

    pub fn path(&self) -> &Path {
        self.connection.path()
    }
}

#[async_trait]
impl Endpoint<char> for FileEndpoint {
    fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    async fn connect(&mut self) -> EndpointResult<()> {
        self.connection.connect().await
    }

    async fn produce(&mut self, value: char) -> EndpointResult<()> {
        self.connection.write(value).await
    }

    async fn shutdown(&mut self) -> EndpointResult<()> {
        self.connection.disconnect().await
    }
}
