//! Display data derived from snapshots.
//!
//! ## Submodules
//!
//! - [`duration`]: Parsing and formatting of duration strings (e.g., "1s", "250ms")
//! - [`frame`]: The per-frame model ([`FrameModel`]) built from the navigator
//!   and a [`SnapshotStore`](crate::source::SnapshotStore)
//!
//! ## Data Flow
//!
//! ```text
//! PipelineSnapshot (point-in-time copy)
//!        │
//!        ├──▶ Navigator::apply() (selection changes)
//!        │
//!        ▼
//! FrameModel::build()  ──▶  ui::render() (styling, scrolling)
//! ```

pub mod duration;
pub mod frame;

pub use frame::{ElementRow, FrameModel, PadHighlight, PadRow, TableRow};
