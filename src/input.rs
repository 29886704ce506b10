//! Backend-independent input events.
//!
//! The window layer translates platform events into [`UiEvent`]s and buffers
//! them until the next frame; screens and widgets only ever see this type.

use crate::utils::Position;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Primary,
    Secondary,
    Middle,
}

/// Buttons held while the pointer moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MouseButtons {
    pub primary: bool,
    pub secondary: bool,
    pub middle: bool,
}

impl MouseButtons {
    pub const NONE: MouseButtons = MouseButtons {
        primary: false,
        secondary: false,
        middle: false,
    };
    pub const PRIMARY: MouseButtons = MouseButtons {
        primary: true,
        secondary: false,
        middle: false,
    };
    pub const SECONDARY: MouseButtons = MouseButtons {
        primary: false,
        secondary: true,
        middle: false,
    };

    fn set(&mut self, button: MouseButton, held: bool) {
        match button {
            MouseButton::Primary => self.primary = held,
            MouseButton::Secondary => self.secondary = held,
            MouseButton::Middle => self.middle = held,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Character(char),
    Backspace,
    Delete,
    Enter,
    Escape,
    Tab,
    Left,
    Right,
    Up,
    Down,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UiEvent {
    MouseDown {
        button: MouseButton,
        pos: Position,
    },
    MouseUp {
        button: MouseButton,
        pos: Position,
    },
    MouseMotion {
        pos: Position,
        buttons: MouseButtons,
    },
    /// Positive `lines` scrolls up (zoom in on the map).
    Wheel {
        lines: f32,
        pos: Position,
    },
    KeyDown(Key),
    KeyUp(Key),
    Paste(String),
    Quit,
}

impl UiEvent {
    pub fn is_key_up(&self, key: Key) -> bool {
        matches!(self, UiEvent::KeyUp(k) if *k == key)
    }

    /// Position of a primary-button press, if this is one.
    pub fn primary_press(&self) -> Option<Position> {
        match self {
            UiEvent::MouseDown {
                button: MouseButton::Primary,
                pos,
            } => Some(*pos),
            _ => None,
        }
    }

    /// Position of a primary-button release, if this is one.
    pub fn primary_release(&self) -> Option<Position> {
        match self {
            UiEvent::MouseUp {
                button: MouseButton::Primary,
                pos,
            } => Some(*pos),
            _ => None,
        }
    }
}

/// Pointer state folded from the event stream, read by widgets for hover.
#[derive(Default, Debug, Clone)]
pub struct InputState {
    pub pointer: Position,
    pub buttons: MouseButtons,
}

impl InputState {
    pub fn apply(&mut self, event: &UiEvent) {
        match event {
            UiEvent::MouseDown { button, pos } => {
                self.pointer = *pos;
                self.buttons.set(*button, true);
            }
            UiEvent::MouseUp { button, pos } => {
                self.pointer = *pos;
                self.buttons.set(*button, false);
            }
            UiEvent::MouseMotion { pos, buttons } => {
                self.pointer = *pos;
                self.buttons = *buttons;
            }
            UiEvent::Wheel { pos, .. } => self.pointer = *pos,
            _ => {}
        }
    }

    pub fn apply_all(&mut self, events: &[UiEvent]) {
        for event in events {
            self.apply(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_and_buttons_follow_events() {
        let mut input = InputState::default();
        input.apply(&UiEvent::MouseDown {
            button: MouseButton::Primary,
            pos: Position::new(10.0, 20.0),
        });
        assert!(input.buttons.primary);
        assert_eq!(input.pointer, Position::new(10.0, 20.0));

        input.apply(&UiEvent::MouseMotion {
            pos: Position::new(15.0, 25.0),
            buttons: MouseButtons::PRIMARY,
        });
        assert_eq!(input.pointer, Position::new(15.0, 25.0));

        input.apply(&UiEvent::MouseUp {
            button: MouseButton::Primary,
            pos: Position::new(15.0, 25.0),
        });
        assert!(!input.buttons.primary);
    }

    #[test]
    fn key_helpers() {
        assert!(UiEvent::KeyUp(Key::Escape).is_key_up(Key::Escape));
        assert!(!UiEvent::KeyDown(Key::Escape).is_key_up(Key::Escape));
        assert_eq!(UiEvent::KeyDown(Key::Enter).primary_release(), None);
        assert_eq!(UiEvent::KeyDown(Key::Enter).primary_press(), None);
    }
}
