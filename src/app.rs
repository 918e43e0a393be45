//! Application state and per-iteration logic.

use std::time::Duration;

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::data::frame::content_line_count;
use crate::data::FrameModel;
use crate::nav::{Command, Navigator};
use crate::source::{DataSource, PipelineSnapshot};
use crate::ui::Theme;

/// Main application state.
pub struct App {
    pub running: bool,

    // Data source
    source: Box<dyn DataSource>,
    /// The newest point-in-time snapshot; every frame renders from this copy.
    pub snapshot: PipelineSnapshot,
    pub load_error: Option<String>,

    // Navigation state
    pub navigator: Navigator,
    /// Label of the most recent key press, shown on the debug line.
    pub last_key: Option<String>,

    // UI
    pub theme: Theme,
    /// Sleep between loop iterations (time scale / 4).
    pub frame_interval: Duration,
}

impl App {
    /// Create a new App with the given data source.
    pub fn new(source: Box<dyn DataSource>, theme: Theme, frame_interval: Duration) -> Self {
        Self {
            running: true,
            source,
            snapshot: PipelineSnapshot::default(),
            load_error: None,
            navigator: Navigator::new(),
            last_key: None,
            theme,
            frame_interval,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Poll the data source for a newer snapshot.
    ///
    /// Returns true if the snapshot was replaced. Source errors are recorded
    /// for display; the previous snapshot stays in place.
    pub fn reload_data(&mut self) -> bool {
        let updated = match self.source.poll() {
            Some(snapshot) => {
                debug!(
                    elements = snapshot.len(),
                    pads = snapshot.pad_count(),
                    "snapshot updated"
                );
                self.snapshot = snapshot;
                true
            }
            None => false,
        };

        let error = self.source.error();
        if error != self.load_error {
            if let Some(ref err) = error {
                warn!(source = self.source.description(), "{}", err);
            }
            self.load_error = error;
        }
        updated
    }

    /// Run one state transition against the current snapshot.
    pub fn step(&mut self, command: Command) {
        if !self.navigator.is_initialized() {
            self.navigator.ensure_initialized(&self.snapshot);
            if self.navigator.is_initialized() {
                debug!(
                    element = self.navigator.selected_element(),
                    "selection initialized"
                );
            }
        }
        self.navigator.set_content_lines(content_line_count(&self.snapshot));

        match command {
            Command::Quit => self.quit(),
            command => self.navigator.apply(command, &self.snapshot),
        }
    }

    /// Build the model for the frame shown at `now`.
    pub fn frame_model(&self, now: DateTime<Local>) -> FrameModel {
        FrameModel::build(&self.navigator, &self.snapshot, self.last_key.as_deref(), now)
            .with_error(self.load_error.clone())
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        info!("quit requested");
        self.running = false;
    }
}
