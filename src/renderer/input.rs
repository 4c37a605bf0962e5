//! Input Module - crossterm event conversion
//!
//! Bridges crossterm's event system with [`SurfaceEvent`]s:
//!
//! - key presses become [`KeyboardEvent`]s with DOM-style key names
//! - left button down / drag become `Click` / `PointerDrag`
//! - terminal resize becomes `Resize`
//! - bracketed paste of paths becomes a complete drag gesture ending in
//!   `FilesDropped`, since terminals paste the paths of dropped files;
//!   any other paste is delivered as text

use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{
    poll, read, Event as CrosstermEvent, KeyCode, KeyEvent as CrosstermKeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent as CrosstermMouseEvent, MouseEventKind,
};

use crate::pipeline::SurfaceEvent;
use crate::state::{KeyState, KeyboardEvent, Modifiers};
use crate::types::{Point, Size};

// =============================================================================
// EVENT CONVERSION
// =============================================================================

/// Convert one crossterm event into the surface events it stands for.
pub fn translate(event: CrosstermEvent) -> Vec<SurfaceEvent> {
    match event {
        CrosstermEvent::Key(key) => vec![SurfaceEvent::Key(convert_key_event(key))],
        CrosstermEvent::Mouse(mouse) => convert_mouse_event(mouse).into_iter().collect(),
        CrosstermEvent::Resize(width, height) => vec![SurfaceEvent::Resize(Size::new(width, height))],
        CrosstermEvent::Paste(text) => match dropped_paths(&text) {
            Some(files) => {
                let origin = Point::new(0, 0);
                vec![
                    SurfaceEvent::DragEnter(origin),
                    SurfaceEvent::DragOver(origin),
                    SurfaceEvent::FilesDropped(files),
                ]
            }
            None if text.trim().is_empty() => Vec::new(),
            None => vec![SurfaceEvent::Paste(text)],
        },
        _ => Vec::new(),
    }
}

/// Convert crossterm KeyEvent to our KeyboardEvent
pub fn convert_key_event(event: CrosstermKeyEvent) -> KeyboardEvent {
    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "BackTab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => String::new(),
    };

    let state = match event.kind {
        KeyEventKind::Press => KeyState::Press,
        KeyEventKind::Repeat => KeyState::Repeat,
        KeyEventKind::Release => KeyState::Release,
    };

    KeyboardEvent {
        key,
        modifiers: convert_modifiers(event.modifiers),
        state,
    }
}

/// Left button presses and drags; everything else is ignored.
fn convert_mouse_event(event: CrosstermMouseEvent) -> Option<SurfaceEvent> {
    let point = Point::new(event.column, event.row);
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(SurfaceEvent::Click(point)),
        MouseEventKind::Drag(MouseButton::Left) => Some(SurfaceEvent::PointerDrag(point)),
        _ => None,
    }
}

/// Convert crossterm KeyModifiers to our Modifiers
fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: mods.contains(KeyModifiers::CONTROL),
        alt: mods.contains(KeyModifiers::ALT),
        shift: mods.contains(KeyModifiers::SHIFT),
        meta: mods.contains(KeyModifiers::SUPER),
    }
}

/// One pasted line as a path: a `file://` URL (percent-decoded), an
/// absolute path, or a relative path that exists. Shell quotes are stripped.
fn pasted_path(line: &str) -> Option<PathBuf> {
    let line = line.trim().trim_matches(|c| c == '\'' || c == '"');
    if line.is_empty() {
        return None;
    }
    if let Ok(url) = url::Url::parse(line)
        && url.scheme() == "file"
    {
        return url.to_file_path().ok();
    }
    let path = Path::new(line);
    (path.is_absolute() || path.exists()).then(|| path.to_path_buf())
}

/// Paths in pasted text, one per non-blank line. `None` unless every line
/// is a path.
fn dropped_paths(text: &str) -> Option<Vec<PathBuf>> {
    let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    if lines.is_empty() {
        return None;
    }
    lines.into_iter().map(pasted_path).collect()
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Wait up to `timeout` for the next terminal event.
pub fn poll_events(timeout: Duration) -> std::io::Result<Vec<SurfaceEvent>> {
    if poll(timeout)? {
        Ok(translate(read()?))
    } else {
        Ok(Vec::new())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> CrosstermEvent {
        CrosstermEvent::Key(CrosstermKeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> CrosstermEvent {
        CrosstermEvent::Mouse(CrosstermMouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_key_names() {
        assert_eq!(
            translate(key(KeyCode::Up, KeyModifiers::NONE)),
            vec![SurfaceEvent::Key(KeyboardEvent::new("ArrowUp"))]
        );
        assert_eq!(
            translate(key(KeyCode::Char(' '), KeyModifiers::NONE)),
            vec![SurfaceEvent::Key(KeyboardEvent::new(" "))]
        );
        assert_eq!(
            translate(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            vec![SurfaceEvent::Key(KeyboardEvent::with_modifiers("c", Modifiers::ctrl()))]
        );
    }

    #[test]
    fn test_mouse_left_button_only() {
        assert_eq!(
            translate(mouse(MouseEventKind::Down(MouseButton::Left), 4, 7)),
            vec![SurfaceEvent::Click(Point::new(4, 7))]
        );
        assert_eq!(
            translate(mouse(MouseEventKind::Drag(MouseButton::Left), 5, 7)),
            vec![SurfaceEvent::PointerDrag(Point::new(5, 7))]
        );
        assert!(translate(mouse(MouseEventKind::Down(MouseButton::Right), 4, 7)).is_empty());
        assert!(translate(mouse(MouseEventKind::Moved, 4, 7)).is_empty());
    }

    #[test]
    fn test_resize() {
        assert_eq!(
            translate(CrosstermEvent::Resize(100, 30)),
            vec![SurfaceEvent::Resize(Size::new(100, 30))]
        );
    }

    #[test]
    fn test_paste_becomes_drop_gesture() {
        let events = translate(CrosstermEvent::Paste("'/tmp/a b.txt'\nfile:///tmp/c.png\n".into()));
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], SurfaceEvent::DragEnter(_)));
        assert_eq!(
            events[2],
            SurfaceEvent::FilesDropped(vec![PathBuf::from("/tmp/a b.txt"), PathBuf::from("/tmp/c.png")])
        );
    }

    #[test]
    fn test_file_urls_percent_decoded() {
        let events = translate(CrosstermEvent::Paste("file:///tmp/my%20notes.md".into()));
        assert_eq!(
            events[2],
            SurfaceEvent::FilesDropped(vec![PathBuf::from("/tmp/my notes.md")])
        );
    }

    #[test]
    fn test_plain_text_paste_stays_text() {
        assert_eq!(
            translate(CrosstermEvent::Paste("0.7".into())),
            vec![SurfaceEvent::Paste("0.7".into())]
        );
        // One line that is not a path keeps the whole paste as text
        assert_eq!(
            translate(CrosstermEvent::Paste("/tmp/a.txt\nhello world".into())),
            vec![SurfaceEvent::Paste("/tmp/a.txt\nhello world".into())]
        );
    }

    #[test]
    fn test_blank_paste_ignored() {
        assert!(translate(CrosstermEvent::Paste("  \n".into())).is_empty());
    }
}
