//! # pipewatch
//!
//! A live terminal dashboard for per-element and per-pad performance
//! metrics of a running media pipeline.
//!
//! The pipeline's instrumentation subsystem produces snapshots of element
//! processing times, queue levels, pad data rates, buffer sizes, pad links
//! and per-core CPU load. This crate reads those snapshots from a source
//! (file, network stream or in-process channel) and renders them as a
//! scrollable, keyboard-navigable table.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │ (frame)  │    │(render) │    │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │ nav (selection state machine)                       │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── FileSource | StreamSource | ChannelSource  │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state and the per-iteration step
//! - **[`nav`]**: The element/pad selection state machine and scroll offset
//! - **[`source`]**: Data source abstraction ([`DataSource`] trait) plus the
//!   snapshot model and its read-only [`SnapshotStore`] view
//! - **[`data`]**: Per-frame display model and duration strings
//! - **[`ui`]**: Terminal rendering using ratatui, with theme support
//! - **[`events`]**: Keyboard and mouse input mapping
//! - **[`config`]** and **[`logging`]**: Layered settings and file logging
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a JSON snapshot file written by the pipeline
//! pipewatch --file pipeline.json
//!
//! # Read newline-delimited snapshots over TCP
//! pipewatch --connect localhost:9090
//!
//! # Synthetic pipeline, no producer needed
//! pipewatch --demo
//! ```
//!
//! ### As a library with file source
//!
//! ```
//! use std::time::Duration;
//! use pipewatch::{App, FileSource, Theme};
//!
//! let source = Box::new(FileSource::new("pipeline.json"));
//! let app = App::new(source, Theme::dark(), Duration::from_millis(250));
//! ```
//!
//! ### As a library with stream source (TCP, etc.)
//!
//! ```no_run
//! use std::io::Cursor;
//! use std::time::Duration;
//! use pipewatch::{App, StreamSource, Theme};
//!
//! # tokio_test::block_on(async {
//! // Example with a cursor (in practice, use TcpStream)
//! let data = b"{}\n";
//! let stream = Cursor::new(data.to_vec());
//! let source = StreamSource::spawn(stream, "example");
//! let app = App::new(Box::new(source), Theme::dark(), Duration::from_millis(250));
//! # });
//! ```
//!
//! ### As a library with channel source (in-process producer)
//!
//! ```
//! use std::time::Duration;
//! use pipewatch::{App, ChannelSource, Command, PipelineSnapshot, Theme};
//!
//! let (tx, source) = ChannelSource::create("in-process");
//! let mut app = App::new(Box::new(source), Theme::dark(), Duration::from_millis(250));
//!
//! tx.send(PipelineSnapshot::default()).unwrap();
//! app.reload_data();
//! app.step(Command::Tick);
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod logging;
pub mod nav;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use config::Settings;
pub use data::{FrameModel, PadHighlight, TableRow};
pub use nav::{Command, Mode, Navigator};
pub use source::{
    ChannelSource, DataSource, DemoProducer, ElementStats, FileSource, PadStats, PeerRef,
    PipelineSnapshot, SnapshotStore, StreamSource,
};
pub use ui::{Theme, ThemeChoice};
