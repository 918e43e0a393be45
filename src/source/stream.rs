//! Stream-based data source.
//!
//! Receives pipeline snapshots from an async byte stream, typically a TCP
//! connection to an instrumented process that writes one JSON snapshot per
//! line.

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{DataSource, PipelineSnapshot};

type ErrorSlot = Arc<Mutex<Option<String>>>;

fn set_error(slot: &ErrorSlot, error: Option<String>) {
    if let Ok(mut guard) = slot.lock() {
        *guard = error;
    }
}

/// A data source that receives pipeline snapshots from an async stream.
///
/// A background task reads newline-delimited JSON and forwards each parsed
/// snapshot. `poll()` drains everything queued and returns only the newest.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use pipewatch::StreamSource;
///
/// # tokio_test::block_on(async {
/// let stream = Cursor::new(b"{}\n".to_vec());
/// let source = StreamSource::spawn(stream, "example");
/// # });
/// ```
#[derive(Debug)]
pub struct StreamSource {
    receiver: mpsc::Receiver<PipelineSnapshot>,
    description: String,
    last_error: ErrorSlot,
}

impl StreamSource {
    /// Spawn a background task that reads from the given async reader.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<R>(reader: R, description: &str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(16);
        let last_error: ErrorSlot = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();

        tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        debug!("snapshot stream reached EOF");
                        set_error(&error_handle, Some("Connection closed".to_string()));
                        break;
                    }
                    Ok(_) if line.trim().is_empty() => continue,
                    Ok(_) => match serde_json::from_str::<PipelineSnapshot>(line.trim()) {
                        Ok(snapshot) => {
                            set_error(&error_handle, None);
                            if tx.send(snapshot).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            warn!("discarding malformed snapshot line: {}", e);
                            set_error(&error_handle, Some(format!("Parse error: {}", e)));
                        }
                    },
                    Err(e) => {
                        warn!("snapshot stream read failed: {}", e);
                        set_error(&error_handle, Some(format!("Read error: {}", e)));
                        break;
                    }
                }
            }
        });

        Self {
            receiver: rx,
            description: format!("stream: {}", description),
            last_error,
        }
    }

    /// Create a StreamSource from a channel of raw JSON payloads.
    ///
    /// Each message is one complete snapshot.
    pub fn from_bytes_channel(mut rx: mpsc::Receiver<Vec<u8>>, description: &str) -> Self {
        let (tx, snapshot_rx) = mpsc::channel(16);
        let last_error: ErrorSlot = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();

        tokio::spawn(async move {
            while let Some(bytes) = rx.recv().await {
                match serde_json::from_slice::<PipelineSnapshot>(&bytes) {
                    Ok(snapshot) => {
                        set_error(&error_handle, None);
                        if tx.send(snapshot).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        set_error(&error_handle, Some(format!("Parse error: {}", e)));
                    }
                }
            }
        });

        Self {
            receiver: snapshot_rx,
            description: format!("stream: {}", description),
            last_error,
        }
    }
}

impl DataSource for StreamSource {
    fn poll(&mut self) -> Option<PipelineSnapshot> {
        let mut newest = None;
        loop {
            match self.receiver.try_recv() {
                Ok(snapshot) => newest = Some(snapshot),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    if let Ok(mut slot) = self.last_error.lock() {
                        slot.get_or_insert_with(|| "Stream disconnected".to_string());
                    }
                    break;
                }
            }
        }
        newest
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|guard| guard.clone())
    }
}
