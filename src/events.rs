use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

use crate::app::App;
use crate::nav::Command;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Map a key press to a navigation command. Unbound keys become a tick.
pub fn command_for_key(key: KeyEvent) -> Command {
    match key.code {
        // Quit
        KeyCode::Char('q') | KeyCode::Char('Q') => Command::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Command::Quit,

        // Siblings
        KeyCode::Right | KeyCode::Char('l') => Command::NextSibling,
        KeyCode::Left | KeyCode::Char('h') => Command::PrevSibling,

        // Hierarchy
        KeyCode::Down | KeyCode::Char('j') => Command::Descend,
        KeyCode::Up | KeyCode::Char('k') => Command::Ascend,
        KeyCode::Char(' ') => Command::JumpToPeer,

        // Scrolling
        KeyCode::Char('[') => Command::ScrollUp,
        KeyCode::Char(']') => Command::ScrollDown,

        _ => Command::Tick,
    }
}

/// Debug-line label for a key: the zero-padded code point for characters,
/// the key name otherwise.
pub fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(c) => format!("{:08}", u32::from(c)),
        other => format!("{:?}", other),
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    app.last_key = Some(key_label(key.code));
    app.step(command_for_key(key));
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        // Scroll wheel
        MouseEventKind::ScrollUp => app.step(Command::ScrollUp),
        MouseEventKind::ScrollDown => app.step(Command::ScrollDown),
        _ => app.step(Command::Tick),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::Mode;
    use crate::source::{fixtures, ChannelSource};
    use crate::ui::Theme;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        let (tx, source) = ChannelSource::create("test");
        tx.send(fixtures::linked_pair()).unwrap();
        let mut app = App::new(Box::new(source), Theme::dark(), Duration::from_millis(250));
        app.reload_data();
        app
    }

    fn wheel(kind: MouseEventKind) -> MouseEvent {
        MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(command_for_key(press(KeyCode::Right)), Command::NextSibling);
        assert_eq!(command_for_key(press(KeyCode::Left)), Command::PrevSibling);
        assert_eq!(command_for_key(press(KeyCode::Down)), Command::Descend);
        assert_eq!(command_for_key(press(KeyCode::Up)), Command::Ascend);
        assert_eq!(command_for_key(press(KeyCode::Char(' '))), Command::JumpToPeer);
        assert_eq!(command_for_key(press(KeyCode::Char('['))), Command::ScrollUp);
        assert_eq!(command_for_key(press(KeyCode::Char(']'))), Command::ScrollDown);
        assert_eq!(command_for_key(press(KeyCode::Char('q'))), Command::Quit);
        assert_eq!(command_for_key(press(KeyCode::Char('Q'))), Command::Quit);
        assert_eq!(command_for_key(press(KeyCode::Char('x'))), Command::Tick);
        assert_eq!(command_for_key(press(KeyCode::F(5))), Command::Tick);
    }

    #[test]
    fn vi_aliases() {
        assert_eq!(command_for_key(press(KeyCode::Char('l'))), Command::NextSibling);
        assert_eq!(command_for_key(press(KeyCode::Char('h'))), Command::PrevSibling);
        assert_eq!(command_for_key(press(KeyCode::Char('j'))), Command::Descend);
        assert_eq!(command_for_key(press(KeyCode::Char('k'))), Command::Ascend);
    }

    #[test]
    fn ctrl_c_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(command_for_key(key), Command::Quit);
        assert_eq!(command_for_key(press(KeyCode::Char('c'))), Command::Tick);
    }

    #[test]
    fn key_labels() {
        assert_eq!(key_label(KeyCode::Char('q')), "00000113");
        assert_eq!(key_label(KeyCode::Char(' ')), "00000032");
        assert_eq!(key_label(KeyCode::Up), "Up");
    }

    #[test]
    fn key_event_records_label_and_steps() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::Down));
        assert_eq!(app.last_key.as_deref(), Some("Down"));
        assert_eq!(app.navigator.mode(), Mode::PadSelect);

        handle_key_event(&mut app, press(KeyCode::Char(' ')));
        assert_eq!(app.navigator.selected_element(), Some("sink"));

        handle_key_event(&mut app, press(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn key_release_is_ignored() {
        let mut app = app();
        let release = KeyEvent::new_with_kind(
            KeyCode::Char('q'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        );
        handle_key_event(&mut app, release);
        assert!(app.running);
        assert!(app.last_key.is_none());
    }

    #[test]
    fn mouse_wheel_scrolls() {
        let mut app = app();
        handle_mouse_event(&mut app, wheel(MouseEventKind::ScrollDown));
        assert_eq!(app.navigator.scroll_offset(), -1);
        handle_mouse_event(&mut app, wheel(MouseEventKind::ScrollUp));
        assert_eq!(app.navigator.scroll_offset(), 0);
    }
}
