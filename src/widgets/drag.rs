//! Pointer drag and drag-and-scale state machines.
//!
//! The state lives beside the host widget and manipulates it only through
//! [`Draggable`] / [`Scalable`], so any widget with a position and a hit box
//! can be dragged.

use crate::input::{MouseButton, UiEvent};
use crate::traits::{Draggable, Scalable};
use crate::utils::Position;

pub const MIN_SIZE: f32 = 25.0;
pub const MAX_SIZE: f32 = 800.0;
/// Horizontal pointer travel, in pixels, that doubles (or removes) the size.
pub const SCALE_SENSITIVITY: f32 = 100.0;

/// Primary-button drag. Idle while `offset` is `None`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DragState {
    offset: Option<Position>,
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        self.offset.is_some()
    }

    /// Advances the state machine; returns whether the host moved.
    pub fn handle_event<H: Draggable + ?Sized>(&mut self, host: &mut H, event: &UiEvent) -> bool {
        match event {
            UiEvent::MouseDown {
                button: MouseButton::Primary,
                pos,
            } => {
                if host.hit_rect().contains(*pos) {
                    self.offset = Some(host.position() - *pos);
                }
                false
            }
            UiEvent::MouseMotion { pos, buttons } => match self.offset {
                Some(offset) if buttons.primary => {
                    host.set_position(*pos + offset);
                    true
                }
                Some(_) => {
                    // The release happened outside the window.
                    self.offset = None;
                    false
                }
                None => false,
            },
            UiEvent::MouseUp {
                button: MouseButton::Primary,
                ..
            } => {
                self.offset = None;
                false
            }
            _ => false,
        }
    }
}

/// Secondary-button uniform resize.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScaleState {
    anchor: Option<Position>,
    start_size: f32,
}

impl ScaleState {
    pub fn is_scaling(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn scaled_size(start_size: f32, dx: f32) -> f32 {
        (start_size * (1.0 + dx / SCALE_SENSITIVITY)).clamp(MIN_SIZE, MAX_SIZE)
    }

    /// Advances the state machine; returns whether the host was resized.
    pub fn handle_event<H: Scalable + ?Sized>(&mut self, host: &mut H, event: &UiEvent) -> bool {
        match event {
            UiEvent::MouseDown {
                button: MouseButton::Secondary,
                pos,
            } => {
                if host.hit_rect().contains(*pos) {
                    self.anchor = Some(*pos);
                    self.start_size = host.size();
                }
                false
            }
            UiEvent::MouseMotion { pos, buttons } => match self.anchor {
                Some(anchor) if buttons.secondary => {
                    host.set_size(Self::scaled_size(self.start_size, pos.x - anchor.x));
                    true
                }
                Some(_) => {
                    self.anchor = None;
                    false
                }
                None => false,
            },
            UiEvent::MouseUp {
                button: MouseButton::Secondary,
                ..
            } => {
                self.anchor = None;
                false
            }
            _ => false,
        }
    }
}

/// Both machines side by side; they never share a button.
#[derive(Debug, Default, Clone, Copy)]
pub struct DragAndScale {
    pub drag: DragState,
    pub scale: ScaleState,
}

impl DragAndScale {
    pub fn handle_event<H: Scalable + ?Sized>(&mut self, host: &mut H, event: &UiEvent) -> bool {
        let moved = self.drag.handle_event(host, event);
        let scaled = self.scale.handle_event(host, event);
        moved || scaled
    }

    pub fn handle_events<H: Scalable + ?Sized>(&mut self, host: &mut H, events: &[UiEvent]) -> bool {
        let mut changed = false;
        for event in events {
            changed |= self.handle_event(host, event);
        }
        changed
    }

    pub fn is_active(&self) -> bool {
        self.drag.is_dragging() || self.scale.is_scaling()
    }
}
