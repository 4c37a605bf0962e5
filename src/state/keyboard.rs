//! Keyboard Module - Keyboard event records
//!
//! The backend translates native key input into [`KeyboardEvent`]s. Key names
//! follow the DOM convention: `"a"`, `" "`, `"Enter"`, `"ArrowUp"`, `"Tab"`,
//! `"Backspace"`, `"PageDown"`.
//!
//! Controls interpret the events themselves; helpers here answer the common
//! questions ("is this an activation?", "is this printable text?").

// =============================================================================
// TYPES
// =============================================================================

/// Keyboard modifier state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Create empty modifiers
    pub fn none() -> Self {
        Self::default()
    }

    /// Create modifiers with ctrl
    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }

    /// Create modifiers with shift
    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }
}

/// Key event state (press, repeat, release)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// Keyboard event
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    /// The key that was pressed (e.g., "a", "Enter", "ArrowUp")
    pub key: String,
    /// Modifier keys state
    pub modifiers: Modifiers,
    /// Press/repeat/release state
    pub state: KeyState,
}

impl KeyboardEvent {
    /// Create a simple key press event
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
            state: KeyState::Press,
        }
    }

    /// Create a key press with modifiers
    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            state: KeyState::Press,
        }
    }

    /// Check if this is a press (or auto-repeat) event
    pub fn is_press(&self) -> bool {
        self.state != KeyState::Release
    }

    /// Enter or Space without modifiers: activates buttons, checkboxes, toggles.
    pub fn is_activation(&self) -> bool {
        self.is_press()
            && !self.modifiers.ctrl
            && !self.modifiers.alt
            && (self.key == "Enter" || self.key == " ")
    }

    /// The character this event types into a text field, if any.
    pub fn printable(&self) -> Option<char> {
        if !self.is_press() || self.modifiers.ctrl || self.modifiers.alt || self.modifiers.meta {
            return None;
        }
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_control() => Some(c),
            _ => None,
        }
    }

    /// Ctrl+C or Ctrl+Q: leave the application.
    pub fn is_quit(&self) -> bool {
        self.is_press() && self.modifiers.ctrl && (self.key == "c" || self.key == "q")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activation_keys() {
        assert!(KeyboardEvent::new("Enter").is_activation());
        assert!(KeyboardEvent::new(" ").is_activation());
        assert!(!KeyboardEvent::new("a").is_activation());
        assert!(!KeyboardEvent::with_modifiers("Enter", Modifiers::ctrl()).is_activation());
    }

    #[test]
    fn test_release_is_not_activation() {
        let event = KeyboardEvent {
            key: "Enter".to_string(),
            modifiers: Modifiers::none(),
            state: KeyState::Release,
        };
        assert!(!event.is_activation());
    }

    #[test]
    fn test_printable() {
        assert_eq!(KeyboardEvent::new("7").printable(), Some('7'));
        assert_eq!(KeyboardEvent::new(".").printable(), Some('.'));
        assert_eq!(KeyboardEvent::with_modifiers("A", Modifiers::shift()).printable(), Some('A'));
        assert_eq!(KeyboardEvent::new("Enter").printable(), None);
        assert_eq!(KeyboardEvent::with_modifiers("c", Modifiers::ctrl()).printable(), None);
    }

    #[test]
    fn test_quit() {
        assert!(KeyboardEvent::with_modifiers("c", Modifiers::ctrl()).is_quit());
        assert!(KeyboardEvent::with_modifiers("q", Modifiers::ctrl()).is_quit());
        assert!(!KeyboardEvent::new("q").is_quit());
    }
}
