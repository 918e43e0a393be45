//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

use crate::data::PadHighlight;

/// Which theme to use, as chosen on the command line or in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    #[default]
    Auto,
    Dark,
    Light,
}

/// Color and style theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Section titles and the table header.
    pub title: Style,
    /// Inverse-video help line.
    pub inverted: Style,
    /// Element names.
    pub element: Style,
    /// The element under the cursor.
    pub element_selected: Style,
    /// The pad under the cursor.
    pub pad_selected: Style,
    /// The pad linked to the one under the cursor.
    pub pad_peer: Style,
    /// CPU labels.
    pub label: Style,
    /// Horizontal rules.
    pub rule: Style,
    /// Source errors.
    pub error: Style,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            title: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            inverted: Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
            element: Style::default().add_modifier(Modifier::BOLD),
            element_selected: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            pad_selected: Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            pad_peer: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            label: Style::default().add_modifier(Modifier::BOLD),
            rule: Style::default().fg(Color::Gray),
            error: Style::default().fg(Color::Red),
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            title: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            inverted: Style::default()
                .fg(Color::White)
                .bg(Color::Black)
                .add_modifier(Modifier::BOLD),
            element: Style::default().add_modifier(Modifier::BOLD),
            element_selected: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            pad_selected: Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            pad_peer: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            label: Style::default().add_modifier(Modifier::BOLD),
            rule: Style::default().fg(Color::DarkGray),
            error: Style::default().fg(Color::Red),
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn from_choice(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Auto => Self::auto_detect(),
            ThemeChoice::Dark => Self::dark(),
            ThemeChoice::Light => Self::light(),
        }
    }

    /// Get style for a pad name
    pub fn pad_style(&self, highlight: PadHighlight) -> Style {
        match highlight {
            PadHighlight::None => Style::default(),
            PadHighlight::Selected => self.pad_selected,
            PadHighlight::Peer => self.pad_peer,
        }
    }

    /// Get style for an element name
    pub fn element_style(&self, selected: bool) -> Style {
        if selected {
            self.element_selected
        } else {
            self.element
        }
    }
}
