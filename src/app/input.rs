//! Feeds characters from an input stream into the relay

use crate::relay::api::{ProducerWrapper, RelayResult};
use log::{debug, info, warn};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::broadcast;

/// Typing ESC ends the session like end-of-file does
pub const ESCAPE: char = '\u{1b}';

/// What the input loop saw
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InputSummary {
    /// Characters offered to the relay
    pub read: u64,
    pub accepted: u64,
    /// Characters refused because the buffer was full
    pub dropped: u64,
}

/// Produce every character of `reader` (line breaks included) until end of
/// input, an ESC character, or a shutdown notification
///
/// Fails only when the relay stops accepting values, which happens when its
/// endpoint could not be constructed.
pub async fn pump<R>(
    mut reader: R,
    wrapper: &ProducerWrapper<char>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> RelayResult<InputSummary>
where
    R: AsyncBufRead + Unpin,
{
    let mut summary = InputSummary::default();
    let mut line = String::new();

    loop {
        line.clear();
        let read = tokio::select! {
            _ = shutdown_rx.recv() => {
                info!("Input stopped by shutdown request");
                return Ok(summary);
            }
            read = reader.read_line(&mut line) => read,
        };

        match read {
            Ok(0) => {
                debug!("End of input");
                return Ok(summary);
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Failed to read input: {}", e);
                return Ok(summary);
            }
        }

        for value in line.chars() {
            if value == ESCAPE {
                info!("Escape received; stopping input");
                return Ok(summary);
            }

            summary.read += 1;
            if wrapper.produce(value).await? {
                summary.accepted += 1;
            } else {
                summary.dropped += 1;
            }
        }
    }
}
