//! Data source abstraction for receiving pipeline snapshots.
//!
//! The instrumentation subsystem owns the live metrics. Every source hands
//! the dashboard an owned, point-in-time [`PipelineSnapshot`], so a frame is
//! always rendered from one coherent view even while the producer keeps
//! updating its own copy.

mod channel;
mod demo;
mod file;
mod snapshot;
mod stream;

pub use channel::ChannelSource;
pub use demo::DemoProducer;
pub use file::FileSource;
pub use snapshot::{
    BufferSize, ElementStats, PadStats, PeerRef, PipelineSnapshot, ProcTime, SnapshotStore,
};
pub use stream::StreamSource;

#[cfg(test)]
pub(crate) use snapshot::fixtures;

use std::fmt::Debug;

/// Trait for receiving pipeline snapshots from various sources.
///
/// # Example
///
/// ```
/// use pipewatch::{DataSource, FileSource};
///
/// let mut source = FileSource::new("pipeline.json");
/// if let Some(snapshot) = source.poll() {
///     println!("Got {} elements", snapshot.len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the latest snapshot.
    ///
    /// Returns `Some(snapshot)` if new data is available, `None` otherwise.
    /// Must not block.
    fn poll(&mut self) -> Option<PipelineSnapshot>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;

    /// The error from the most recent poll, if any.
    fn error(&self) -> Option<String>;
}
