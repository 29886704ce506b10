use crate::input::{Key, UiEvent};
use crate::text::TextMeasure;
use crate::traits::{Component, UiContext};
use crate::ui::{draw_text, RenderCommands};
use crate::utils::{Position, Rectangle, Size};

/// Character allow-list predicate.
pub type CharFilter = fn(char) -> bool;

pub fn numeric_keys(c: char) -> bool {
    c.is_ascii_digit()
}

/// Digits plus a sign, for modifiers and hit points.
pub fn signed_numeric_keys(c: char) -> bool {
    c.is_ascii_digit() || c == '-' || c == '+'
}

pub fn alpha_keys(c: char) -> bool {
    c.is_ascii_alphabetic()
}

const LABEL_GAP: f32 = 6.0;

/// Single-line editable text field.
#[derive(Debug, Clone)]
pub struct TextBox {
    rect: Rectangle,
    value: String,
    allowed: Option<CharFilter>,
    selected: bool,
    center: bool,
    label: Option<String>,
}

impl TextBox {
    pub fn new(pos: Position, size: Size) -> Self {
        Self {
            rect: Rectangle::from_pos_size(pos, size),
            value: String::new(),
            allowed: None,
            selected: false,
            center: false,
            label: None,
        }
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    /// Also filters any value already present.
    pub fn with_allowed(mut self, allowed: CharFilter) -> Self {
        self.allowed = Some(allowed);
        self.value.retain(allowed);
        self
    }

    pub fn centered(mut self) -> Self {
        self.center = true;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replaces the value, dropping characters the allow-list rejects.
    pub fn set_value(&mut self, value: &str) {
        self.value = value.chars().filter(|c| self.accepts(*c)).collect();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn rect(&self) -> Rectangle {
        self.rect
    }

    pub fn set_pos(&mut self, pos: Position) {
        self.rect.set_pos(pos);
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The editable area: the whole box, minus the label on its left.
    pub fn input_rect(&self, measure: &dyn TextMeasure) -> Rectangle {
        match &self.label {
            Some(label) => self.rect.trim_left(measure.width(label) + LABEL_GAP),
            None => self.rect,
        }
    }

    pub fn accepts(&self, c: char) -> bool {
        !c.is_control() && self.allowed.map_or(true, |allowed| allowed(c))
    }

    /// Appends `c` if allowed and the result still fits the input width.
    fn push_char(&mut self, c: char, measure: &dyn TextMeasure) -> bool {
        if !self.accepts(c) {
            return false;
        }
        let width = measure.width(&self.value) + measure.advance(c);
        if width < self.input_rect(measure).width {
            self.value.push(c);
            true
        } else {
            false
        }
    }

    pub fn handle_event(&mut self, event: &UiEvent, measure: &dyn TextMeasure) {
        if let Some(pos) = event.primary_release() {
            self.selected = self.input_rect(measure).contains(pos);
            return;
        }
        if !self.selected {
            return;
        }
        match event {
            UiEvent::KeyDown(Key::Backspace) => {
                self.value.pop();
            }
            UiEvent::KeyDown(Key::Enter) | UiEvent::KeyDown(Key::Escape) => {
                self.selected = false;
            }
            UiEvent::KeyDown(Key::Character(c)) => {
                self.push_char(*c, measure);
            }
            UiEvent::Paste(text) => {
                for c in text.chars() {
                    self.push_char(c, measure);
                }
            }
            _ => {}
        }
    }
}

impl Component for TextBox {
    fn draw(&self, cmds: &mut RenderCommands, ctx: &UiContext) {
        let theme = ctx.theme;
        let input = self.input_rect(ctx.measure);
        let line_height = ctx.measure.line_height();

        if let Some(label) = &self.label {
            let y = self.rect.y + ((self.rect.height - line_height) / 2.0).max(0.0);
            cmds.draw_text(label.as_str(), Position::new(self.rect.x, y), theme.text);
        }

        let border = if self.selected {
            theme.field_border_selected
        } else {
            theme.field_border_idle
        };
        cmds.draw_rect(input, Some(theme.field_fill), Some((border, 1.0)));

        if self.center {
            draw_text(cmds, ctx.measure, &self.value, input.center(), theme.text, true);
        } else {
            let y = input.y + ((input.height - line_height) / 2.0).max(0.0);
            draw_text(
                cmds,
                ctx.measure,
                &self.value,
                Position::new(input.x + 1.0, y),
                theme.text,
                false,
            );
        }
    }

    fn handle_events(&mut self, events: &[UiEvent], ctx: &UiContext) {
        for event in events {
            self.handle_event(event, ctx.measure);
        }
    }
}
