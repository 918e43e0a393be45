//! Terminal UI rendering using ratatui.
//!
//! ## Submodules
//!
//! - [`dashboard`]: The full-screen frame: header, CPU block, element/pad table
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ key <code>            <date time>    │
//! │ Press 'q' or 'Q' to quit             │
//! ├──────────────────────────────────────┤
//! │ CPU Usage / CPU n  x.x%              │
//! ├──────────────────────────────────────┤
//! │ ElementName  Proctime  ...           │
//! │ element                              │
//! │     pad                              │
//! └──────────────────────────────────────┘
//!   whole layout shifted by the scroll offset
//! ```

pub mod dashboard;
pub mod theme;

pub use dashboard::{dump_to_string, render, render_to_string};
pub use theme::{Theme, ThemeChoice};
