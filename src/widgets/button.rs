use crate::input::UiEvent;
use crate::traits::{Component, UiContext};
use crate::ui::{draw_text, RenderCommands};
use crate::utils::{Position, Rectangle, Size};
use std::fmt;

type Action = Box<dyn FnMut()>;

/// Clickable rectangle bound to an action. A click is a primary press and
/// release both inside the rectangle; a disabled button never runs its action.
pub struct Button {
    rect: Rectangle,
    text: String,
    action: Action,
    enabled: bool,
    pressed: bool,
}

impl Button {
    pub fn new(
        text: impl Into<String>,
        pos: Position,
        size: Size,
        action: impl FnMut() + 'static,
    ) -> Self {
        Self {
            rect: Rectangle::from_pos_size(pos, size),
            text: text.into(),
            action: Box::new(action),
            enabled: true,
            pressed: false,
        }
    }

    /// Binds `params` to the action; each click calls `action(&params)`.
    pub fn with_params<P: 'static>(
        text: impl Into<String>,
        pos: Position,
        size: Size,
        mut action: impl FnMut(&P) + 'static,
        params: P,
    ) -> Self {
        Self::new(text, pos, size, move || action(&params))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn rect(&self) -> Rectangle {
        self.rect
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_hovered(&self, pointer: Position) -> bool {
        self.enabled && self.rect.contains(pointer)
    }

    /// Runs the action if enabled. Returns whether it ran.
    pub fn click(&mut self) -> bool {
        if !self.enabled {
            return false;
        }
        (self.action)();
        true
    }

    /// Returns whether the event clicked this button.
    pub fn handle_event(&mut self, event: &UiEvent) -> bool {
        if let Some(pos) = event.primary_press() {
            self.pressed = self.rect.contains(pos);
            return false;
        }
        match event.primary_release() {
            Some(pos) => {
                let pressed = std::mem::take(&mut self.pressed);
                pressed && self.rect.contains(pos) && self.click()
            }
            None => false,
        }
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("rect", &self.rect)
            .field("text", &self.text)
            .field("enabled", &self.enabled)
            .field("pressed", &self.pressed)
            .finish_non_exhaustive()
    }
}

impl Component for Button {
    fn draw(&self, cmds: &mut RenderCommands, ctx: &UiContext) {
        let theme = ctx.theme;
        let fill = if self.is_hovered(ctx.input.pointer) {
            theme.button_hover_fill
        } else {
            theme.button_fill
        };
        cmds.draw_rect(self.rect, Some(fill), Some((theme.button_border, 1.0)));

        let color = if self.enabled {
            theme.button_text
        } else {
            theme.button_text_disabled
        };
        draw_text(cmds, ctx.measure, &self.text, self.rect.center(), color, true);
    }

    fn handle_events(&mut self, events: &[UiEvent], _ctx: &UiContext) {
        for event in events {
            self.handle_event(event);
        }
    }
}
