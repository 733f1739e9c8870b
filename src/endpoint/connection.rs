//! A flaky "connection" to a file
//!
//! Stands in for a third-party client whose connection drops without warning:
//! after a random number of writes the connection closes itself and every
//! further write fails until `connect` is called again.

use crate::relay::api::{EndpointError, EndpointResult};
use log::{debug, warn};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Number of writes after which a connection drops, drawn per connect
pub const DEFAULT_DISCONNECT_RANGE: RangeInclusive<usize> = 8..=12;

#[derive(Debug)]
pub struct FileConnection {
    path: PathBuf,
    file: Option<File>,
    writes_since_connect: usize,
    disconnect_after: usize,
    disconnect_range: RangeInclusive<usize>,
}

impl FileConnection {
    /// Connection to `file_name` inside `root`; nothing is opened yet
    pub fn new(root: impl AsRef<Path>, file_name: &str) -> Self {
        Self {
            path: root.as_ref().join(file_name),
            file: None,
            writes_since_connect: 0,
            disconnect_after: 0,
            disconnect_range: DEFAULT_DISCONNECT_RANGE,
        }
    }

    /// Override how many writes a connection survives
    ///
    /// An empty range is replaced by a single-value range at its start.
    pub fn with_disconnect_range(mut self, range: RangeInclusive<usize>) -> Self {
        self.disconnect_range = if range.is_empty() {
            *range.start()..=*range.start()
        } else {
            range
        };
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_connected(&self) -> bool {
        self.file.is_some()
    }

    /// Open the file for appending, creating it if needed
    ///
    /// Connecting an open connection is a no-op.
    pub async fn connect(&mut self) -> EndpointResult<()> {
        if self.file.is_some() {
            return Ok(());
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        self.file = Some(file);
        self.writes_since_connect = 0;
        self.disconnect_after = fastrand::usize(self.disconnect_range.clone()).max(1);
        debug!(
            "Connected to {} (drops after {} writes)",
            self.path.display(),
            self.disconnect_after
        );
        Ok(())
    }

    /// Append one character as UTF-8
    pub async fn write(&mut self, value: char) -> EndpointResult<()> {
        let file = self.file.as_mut().ok_or(EndpointError::Disconnected)?;

        let mut encoded = [0u8; 4];
        file.write_all(value.encode_utf8(&mut encoded).as_bytes())
            .await?;
        self.writes_since_connect += 1;

        if self.writes_since_connect >= self.disconnect_after {
            debug!(
                "Connection to {} dropped after {} writes",
                self.path.display(),
                self.writes_since_connect
            );
            // The character is already written; a failed flush only ends the connection
            if let Err(e) = self.disconnect().await {
                warn!("Flush on dropping {} failed: {}", self.path.display(), e);
            }
        }
        Ok(())
    }

    /// Flush and close the file; closing a closed connection is a no-op
    pub async fn disconnect(&mut self) -> EndpointResult<()> {
        if let Some(mut file) = self.file.take() {
            file.flush().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_while_disconnected_fails() {
        let dir = TempDir::new().unwrap();
        let mut connection = FileConnection::new(dir.path(), "out.txt");

        assert!(!connection.is_connected());
        assert!(matches!(
            connection.write('x').await,
            Err(EndpointError::Disconnected)
        ));
        assert!(!connection.path().exists(), "nothing opened before connect");
    }

    #[tokio::test]
    async fn test_drops_after_threshold_and_reconnects() {
        let dir = TempDir::new().unwrap();
        let mut connection = FileConnection::new(dir.path(), "out.txt").with_disconnect_range(2..=2);

        connection.connect().await.unwrap();
        connection.write('a').await.unwrap();
        assert!(connection.is_connected());
        connection.write('b').await.unwrap();
        assert!(!connection.is_connected(), "second write drops the connection");

        assert!(connection.write('c').await.is_err());

        connection.connect().await.unwrap();
        connection.write('d').await.unwrap();
        connection.disconnect().await.unwrap();

        let contents = std::fs::read_to_string(connection.path()).unwrap();
        assert_eq!(contents, "abd");
    }

    #[tokio::test]
    async fn test_default_threshold_is_within_range() {
        let dir = TempDir::new().unwrap();
        let mut connection = FileConnection::new(dir.path(), "out.txt");
        connection.connect().await.unwrap();

        let mut writes = 0;
        while connection.is_connected() {
            connection.write('k').await.unwrap();
            writes += 1;
            assert!(writes <= 12, "connection outlived its maximum");
        }
        assert!(DEFAULT_DISCONNECT_RANGE.contains(&writes), "dropped after {}", writes);
    }

    #[tokio::test]
    async fn test_multibyte_characters_are_utf8() {
        let dir = TempDir::new().unwrap();
        let mut connection = FileConnection::new(dir.path(), "out.txt").with_disconnect_range(100..=100);

        connection.connect().await.unwrap();
        for value in "héllo✓".chars() {
            connection.write(value).await.unwrap();
        }
        connection.disconnect().await.unwrap();
        connection.disconnect().await.unwrap();

        assert_eq!(std::fs::read_to_string(connection.path()).unwrap(), "héllo✓");
    }

    // /dev/full accepts the buffered write and fails with ENOSPC on flush
    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_failed_flush_on_threshold_still_counts_the_write() {
        let mut connection = FileConnection::new("/dev", "full").with_disconnect_range(1..=1);

        connection.connect().await.unwrap();
        assert!(connection.write('x').await.is_ok());
        assert!(!connection.is_connected());
        assert!(matches!(
            connection.write('y').await,
            Err(EndpointError::Disconnected)
        ));
    }

    #[tokio::test]
    async fn test_connect_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let mut connection = FileConnection::new(dir.path().join("missing"), "out.txt");

        assert!(matches!(connection.connect().await, Err(EndpointError::Io(_))));
        assert!(!connection.is_connected());
    }
}
