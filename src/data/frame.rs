//! Frame model: what one dashboard frame shows, before styling.
//!
//! Built fresh from the navigator and a snapshot store for every frame.
//! Keys that vanish between enumeration and lookup are skipped, and a
//! selection that no longer resolves simply highlights nothing.

use chrono::{DateTime, Local};

use crate::nav::{Mode, Navigator};
use crate::source::SnapshotStore;

/// Lines above the CPU rows: debug line, help line, rule, CPU title.
pub const LINES_BEFORE_CPU: usize = 4;
/// Lines between the CPU rows and the table rows: rule, table header.
pub const LINES_BEFORE_TABLE: usize = 2;

/// Clock format for the debug line.
pub const CLOCK_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// How a pad row is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PadHighlight {
    #[default]
    None,
    /// The pad under the cursor.
    Selected,
    /// The pad linked to the one under the cursor.
    Peer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementRow {
    pub name: String,
    pub proctime: u64,
    pub avg_proctime: f64,
    pub queue_level: u32,
    pub max_queue_level: u32,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PadRow {
    pub name: String,
    pub datarate: f64,
    pub buffer_size: i64,
    pub highlight: PadHighlight,
}

/// One table row: an element, or one of the pads listed under it.
#[derive(Debug, Clone, PartialEq)]
pub enum TableRow {
    Element(ElementRow),
    Pad(PadRow),
}

/// Everything one frame displays.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameModel {
    /// Label for the most recent key press.
    pub last_key: String,
    pub clock: String,
    pub cpu_loads: Vec<f64>,
    pub rows: Vec<TableRow>,
    /// Source error to surface on the help line.
    pub error: Option<String>,
}

impl FrameModel {
    pub fn build<S: SnapshotStore + ?Sized>(
        navigator: &Navigator,
        store: &S,
        last_key: Option<&str>,
        now: DateTime<Local>,
    ) -> Self {
        Self {
            last_key: last_key.unwrap_or("-").to_string(),
            clock: now.format(CLOCK_FORMAT).to_string(),
            cpu_loads: store.cpu_loads().to_vec(),
            rows: build_rows(navigator, store),
            error: None,
        }
    }

    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }

    /// Total lines the frame occupies before scrolling.
    pub fn line_count(&self) -> usize {
        LINES_BEFORE_CPU + self.cpu_loads.len() + LINES_BEFORE_TABLE + self.rows.len()
    }
}

/// Line count of the frame [`FrameModel::build`] would produce, without
/// building it.
pub fn content_line_count<S: SnapshotStore + ?Sized>(store: &S) -> usize {
    let rows: usize = store
        .list_element_names()
        .iter()
        .filter_map(|name| store.get_element(name))
        .map(|element| 1 + element.pads.len())
        .sum();
    LINES_BEFORE_CPU + store.cpu_loads().len() + LINES_BEFORE_TABLE + rows
}

fn build_rows<S: SnapshotStore + ?Sized>(navigator: &Navigator, store: &S) -> Vec<TableRow> {
    let mode = navigator.mode();
    let selected_element = navigator.selected_element();
    let selected_pad = navigator.selected_pad();
    let peer = navigator.peer(store);

    let mut rows = Vec::new();
    for name in store.list_element_names() {
        let Some(element) = store.get_element(&name) else {
            continue;
        };

        rows.push(TableRow::Element(ElementRow {
            selected: mode == Mode::ElementSelect && selected_element == Some(name.as_str()),
            name: name.clone(),
            proctime: element.proctime.value,
            avg_proctime: element.proctime.avg,
            queue_level: element.queue_level,
            max_queue_level: element.max_queue_level,
        }));

        let owns_selection = mode == Mode::PadSelect && selected_element == Some(name.as_str());
        for pad_name in store.list_pad_names(element) {
            let Some(pad) = store.get_pad(element, &pad_name) else {
                continue;
            };

            let highlight = if owns_selection && selected_pad == Some(pad_name.as_str()) {
                PadHighlight::Selected
            } else if peer
                .as_ref()
                .is_some_and(|p| p.element == name && p.pad == pad_name)
            {
                PadHighlight::Peer
            } else {
                PadHighlight::None
            };

            rows.push(TableRow::Pad(PadRow {
                name: pad_name,
                datarate: pad.datarate,
                buffer_size: pad.buffer_size.value,
                highlight,
            }));
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::Command;
    use crate::source::{fixtures, ElementStats, PipelineSnapshot};
    use chrono::TimeZone;

    fn at_noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 12, 0, 5).unwrap()
    }

    fn selected_elements(model: &FrameModel) -> Vec<&str> {
        model
            .rows
            .iter()
            .filter_map(|row| match row {
                TableRow::Element(e) if e.selected => Some(e.name.as_str()),
                _ => None,
            })
            .collect()
    }

    fn pad_highlights(model: &FrameModel) -> Vec<(&str, PadHighlight)> {
        model
            .rows
            .iter()
            .filter_map(|row| match row {
                TableRow::Pad(p) if p.highlight != PadHighlight::None => {
                    Some((p.name.as_str(), p.highlight))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn header_fields() {
        let store = fixtures::linked_pair();
        let model = FrameModel::build(&Navigator::new(), &store, Some("Up"), at_noon());
        assert_eq!(model.clock, "2024-03-09 12:00:05");
        assert_eq!(model.last_key, "Up");
        assert_eq!(model.cpu_loads, vec![12.5, 3.0]);

        let idle = FrameModel::build(&Navigator::new(), &store, None, at_noon());
        assert_eq!(idle.last_key, "-");
    }

    #[test]
    fn rows_follow_snapshot_order_with_pads_under_elements() {
        let store = fixtures::three_stage();
        let model = FrameModel::build(&Navigator::new(), &store, None, at_noon());

        let names: Vec<&str> = model
            .rows
            .iter()
            .map(|row| match row {
                TableRow::Element(e) => e.name.as_str(),
                TableRow::Pad(p) => p.name.as_str(),
            })
            .collect();
        assert_eq!(names, vec!["queue", "sink", "src", "sink", "sink", "src", "src"]);
        assert_eq!(model.line_count(), content_line_count(&store));
    }

    #[test]
    fn element_without_pads_renders_single_row() {
        let mut store = PipelineSnapshot::default();
        store.elements.insert("fakesink0".to_string(), ElementStats::default());

        let model = FrameModel::build(&Navigator::new(), &store, None, at_noon());
        assert_eq!(model.rows.len(), 1);
        assert!(matches!(&model.rows[0], TableRow::Element(e) if e.name == "fakesink0"));
    }

    #[test]
    fn selected_element_highlighted_in_element_mode() {
        let store = fixtures::linked_pair();
        let mut nav = Navigator::new();
        nav.ensure_initialized(&store);

        let model = FrameModel::build(&nav, &store, None, at_noon());
        assert_eq!(selected_elements(&model), vec!["src"]);
        assert!(pad_highlights(&model).is_empty());
    }

    #[test]
    fn pad_mode_highlights_self_and_peer() {
        let store = fixtures::linked_pair();
        let mut nav = Navigator::new();
        nav.ensure_initialized(&store);
        nav.apply(Command::Descend, &store);

        let model = FrameModel::build(&nav, &store, None, at_noon());
        assert!(selected_elements(&model).is_empty());
        assert_eq!(
            pad_highlights(&model),
            vec![("sink0", PadHighlight::Peer), ("src0", PadHighlight::Selected)]
        );
    }

    #[test]
    fn same_pad_name_on_other_element_is_not_selected() {
        let store = fixtures::three_stage();
        let mut nav = Navigator::new();
        nav.ensure_initialized(&store);
        nav.apply(Command::Descend, &store);
        assert_eq!(nav.selected_pad(), Some("src"));

        // queue also has a pad called "src"; only src.src is self-selected,
        // and queue.sink is its peer.
        let model = FrameModel::build(&nav, &store, None, at_noon());
        assert_eq!(
            pad_highlights(&model),
            vec![("sink", PadHighlight::Peer), ("src", PadHighlight::Selected)]
        );
    }

    #[test]
    fn stale_selection_highlights_nothing() {
        let mut store = fixtures::linked_pair();
        let mut nav = Navigator::new();
        nav.ensure_initialized(&store);
        store.elements.remove("src");

        let model = FrameModel::build(&nav, &store, None, at_noon());
        assert!(selected_elements(&model).is_empty());
        assert_eq!(model.rows.len(), 2);
    }

    #[test]
    fn stale_pad_selection_drops_peer_highlight() {
        let mut store = fixtures::linked_pair();
        let mut nav = Navigator::new();
        nav.ensure_initialized(&store);
        nav.apply(Command::Descend, &store);
        store.elements.get_mut("src").unwrap().pads.remove("src0");

        let model = FrameModel::build(&nav, &store, None, at_noon());
        assert!(pad_highlights(&model).is_empty());
    }

    #[test]
    fn line_count_includes_cpu_block() {
        let store = fixtures::linked_pair();
        let model = FrameModel::build(&Navigator::new(), &store, None, at_noon());
        assert_eq!(model.line_count(), 4 + 2 + 2 + 4);
    }
}
