//! Selection state machine over the element → pad hierarchy.
//!
//! Navigation walks enumerations captured when a mode is entered, not the
//! live key set, so a cursor may point at a key the producer has since
//! removed. Every lookup against the snapshot goes through
//! [`SnapshotStore`] and treats a missing key as "unresolved this frame".

use crate::source::{PeerRef, SnapshotStore};

/// Discrete input commands understood by the navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NextSibling,
    PrevSibling,
    /// Element → pad level.
    Descend,
    /// Pad → element level.
    Ascend,
    JumpToPeer,
    ScrollUp,
    ScrollDown,
    Quit,
    /// No input; redraw only.
    Tick,
}

/// Which level of the hierarchy has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    ElementSelect,
    PadSelect,
}

/// A position within a captured, ordered list of keys.
///
/// Never empty; `index` is always in bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    keys: Vec<String>,
    index: usize,
}

impl Cursor {
    /// A cursor on the last key, or `None` for an empty enumeration.
    pub fn at_last(keys: Vec<String>) -> Option<Self> {
        let index = keys.len().checked_sub(1)?;
        Some(Self { keys, index })
    }

    pub fn key(&self) -> &str {
        &self.keys[self.index]
    }

    /// Step forward. Returns false at the end.
    pub fn next(&mut self) -> bool {
        if self.index + 1 < self.keys.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Step back. Returns false at the start.
    pub fn prev(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Move to `key`. On a miss the cursor is left where it was.
    pub fn seek(&mut self, key: &str) -> bool {
        match self.keys.iter().position(|k| k == key) {
            Some(index) => {
                self.index = index;
                true
            }
            None => false,
        }
    }
}

/// The current selection. A pad key only exists at pad level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Element(Cursor),
    Pad { element: Cursor, pad: Cursor },
}

/// Navigation state: selection plus vertical scroll.
#[derive(Debug, Clone)]
pub struct Navigator {
    selection: Option<Selection>,
    scroll_offset: i32,
    scroll_floor: i32,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            selection: None,
            scroll_offset: 0,
            scroll_floor: i32::MIN,
        }
    }

    /// Select the last element of the store's enumeration if nothing is
    /// selected yet. Stays uninitialized while the store is empty.
    pub fn ensure_initialized<S: SnapshotStore + ?Sized>(&mut self, store: &S) {
        if self.selection.is_none() {
            self.selection = Cursor::at_last(store.list_element_names()).map(Selection::Element);
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.selection.is_some()
    }

    pub fn mode(&self) -> Mode {
        match self.selection {
            Some(Selection::Pad { .. }) => Mode::PadSelect,
            _ => Mode::ElementSelect,
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn selected_element(&self) -> Option<&str> {
        match &self.selection {
            Some(Selection::Element(cursor)) => Some(cursor.key()),
            Some(Selection::Pad { element, .. }) => Some(element.key()),
            None => None,
        }
    }

    pub fn selected_pad(&self) -> Option<&str> {
        match &self.selection {
            Some(Selection::Pad { pad, .. }) => Some(pad.key()),
            _ => None,
        }
    }

    /// Always `<= 0`.
    pub fn scroll_offset(&self) -> i32 {
        self.scroll_offset
    }

    /// Bound ScrollDown so the last of `lines` content lines stays reachable.
    pub fn set_content_lines(&mut self, lines: usize) {
        let max = lines.saturating_sub(1).min(i32::MAX as usize) as i32;
        self.scroll_floor = -max;
        self.scroll_offset = self.scroll_offset.max(self.scroll_floor);
    }

    /// Resolve the peer of the selected pad against `store`.
    ///
    /// Derived on every call; `None` outside pad level or when the element,
    /// the pad, or its link has gone away.
    pub fn peer<S: SnapshotStore + ?Sized>(&self, store: &S) -> Option<PeerRef> {
        let Some(Selection::Pad { element, pad }) = &self.selection else {
            return None;
        };
        let stats = store.get_element(element.key())?;
        let pad = store.get_pad(stats, pad.key())?;
        store.resolve_peer(pad)
    }

    /// Apply one command. Commands whose preconditions do not hold are no-ops.
    pub fn apply<S: SnapshotStore + ?Sized>(&mut self, command: Command, store: &S) {
        match command {
            Command::NextSibling => {
                if let Some(cursor) = self.active_cursor() {
                    cursor.next();
                }
            }
            Command::PrevSibling => {
                if let Some(cursor) = self.active_cursor() {
                    cursor.prev();
                }
            }
            Command::Descend => self.descend(store),
            Command::Ascend => self.ascend(store),
            Command::JumpToPeer => self.jump_to_peer(store),
            Command::ScrollUp => {
                if self.scroll_offset < 0 {
                    self.scroll_offset += 1;
                }
            }
            Command::ScrollDown => {
                if self.scroll_offset > self.scroll_floor {
                    self.scroll_offset -= 1;
                }
            }
            Command::Quit | Command::Tick => {}
        }
    }

    fn active_cursor(&mut self) -> Option<&mut Cursor> {
        match self.selection.as_mut()? {
            Selection::Element(cursor) => Some(cursor),
            Selection::Pad { pad, .. } => Some(pad),
        }
    }

    fn descend<S: SnapshotStore + ?Sized>(&mut self, store: &S) {
        let Some(Selection::Element(cursor)) = &self.selection else {
            return;
        };
        let Some(stats) = store.get_element(cursor.key()) else {
            return;
        };
        if let Some(pad) = Cursor::at_last(store.list_pad_names(stats)) {
            self.selection = Some(Selection::Pad {
                element: cursor.clone(),
                pad,
            });
        }
    }

    /// Re-entering element level recaptures the element enumeration, keeping
    /// the cursor on the same element when it still exists.
    fn ascend<S: SnapshotStore + ?Sized>(&mut self, store: &S) {
        let Some(Selection::Pad { element, .. }) = &self.selection else {
            return;
        };
        let cursor = match Cursor::at_last(store.list_element_names()) {
            Some(mut fresh) => {
                fresh.seek(element.key());
                fresh
            }
            None => element.clone(),
        };
        self.selection = Some(Selection::Element(cursor));
    }

    fn jump_to_peer<S: SnapshotStore + ?Sized>(&mut self, store: &S) {
        let Some(peer) = self.peer(store) else {
            return;
        };
        let Some(Selection::Pad { element, .. }) = &self.selection else {
            return;
        };

        let mut element = element.clone();
        if !element.seek(&peer.element) {
            return;
        }
        let Some(stats) = store.get_element(&peer.element) else {
            return;
        };
        let Some(mut pad) = Cursor::at_last(store.list_pad_names(stats)) else {
            return;
        };
        if !pad.seek(&peer.pad) {
            return;
        }

        self.selection = Some(Selection::Pad { element, pad });
    }
}
