//! Channel-based data source.
//!
//! Receives pipeline snapshots via a tokio watch channel. An in-process
//! instrumentation layer publishes whole snapshots and the dashboard only
//! ever sees the newest one.

use tokio::sync::watch;

use super::{DataSource, PipelineSnapshot};

/// A data source that receives pipeline snapshots via a channel.
///
/// # Example
///
/// ```
/// use pipewatch::{ChannelSource, DataSource, PipelineSnapshot};
///
/// let (tx, mut source) = ChannelSource::create("in-process");
/// tx.send(PipelineSnapshot::default()).unwrap();
/// assert!(source.poll().is_some());
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<PipelineSnapshot>,
    description: String,
    /// Track if we've returned the initial value yet
    initial_returned: bool,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// `source_description` names where snapshots come from and is shown
    /// in logs.
    pub fn new(receiver: watch::Receiver<PipelineSnapshot>, source_description: &str) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
            initial_returned: false,
        }
    }

    /// Create a channel pair. The sender is handed to the producer.
    pub fn create(source_description: &str) -> (watch::Sender<PipelineSnapshot>, Self) {
        let (tx, rx) = watch::channel(PipelineSnapshot::default());
        (tx, Self::new(rx, source_description))
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<PipelineSnapshot> {
        if !self.initial_returned {
            self.initial_returned = true;
            self.receiver.mark_changed();
        }

        // A closed channel still holds the last value; has_changed() errs then.
        if self.receiver.has_changed().unwrap_or(false) {
            Some(self.receiver.borrow_and_update().clone())
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        if self.receiver.has_changed().is_err() {
            Some("Producer disconnected".to_string())
        } else {
            None
        }
    }
}
