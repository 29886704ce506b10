use super::text_box::CharFilter;
use crate::input::{Key, UiEvent};
use crate::text::{caret_location, wrap_text};
use crate::traits::{Component, UiContext};
use crate::ui::RenderCommands;
use crate::utils::{Position, Rectangle, Size};

const PADDING: f32 = 4.0;

/// Whitespace kept in the value regardless of the character filter.
fn is_layout(c: char) -> bool {
    c == '\n' || c == '\t'
}

/// Multi-line text editor with an explicit cursor. Text is soft-wrapped to
/// the box width when drawn; the stored value only contains the newlines the
/// user typed.
#[derive(Debug, Clone)]
pub struct TextArea {
    rect: Rectangle,
    value: String,
    allowed: Option<CharFilter>,
    selected: bool,
    always_selected: bool,
    /// Char index in `[0, chars(value)]`.
    cursor: usize,
}

impl TextArea {
    pub fn new(pos: Position, size: Size) -> Self {
        Self {
            rect: Rectangle::from_pos_size(pos, size),
            value: String::new(),
            allowed: None,
            selected: false,
            always_selected: false,
            cursor: 0,
        }
    }

    /// Keeps the area in edit mode permanently; clicks no longer toggle it.
    pub fn always_selected(mut self) -> Self {
        self.always_selected = true;
        self.selected = true;
        self
    }

    pub fn with_allowed(mut self, allowed: CharFilter) -> Self {
        self.allowed = Some(allowed);
        self.value.retain(|c| is_layout(c) || allowed(c));
        self.cursor = self.cursor.min(self.char_count());
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replaces the value and moves the cursor to its end. Windows line
    /// and old Mac line endings are stored as plain newlines.
    pub fn set_value(&mut self, value: &str) {
        self.value = value
            .replace("\r\n", "\n")
            .replace('\r', "\n")
            .chars()
            .filter(|c| self.accepts(*c))
            .collect();
        self.cursor = self.char_count();
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.char_count());
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected || self.always_selected;
    }

    pub fn rect(&self) -> Rectangle {
        self.rect
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(b, _)| b)
            .unwrap_or(self.value.len())
    }

    fn accepts(&self, c: char) -> bool {
        is_layout(c) || (!c.is_control() && self.allowed.map_or(true, |allowed| allowed(c)))
    }

    /// Inserts at the cursor and advances it.
    pub fn insert_char(&mut self, c: char) {
        if !self.accepts(c) {
            return;
        }
        let at = self.byte_offset(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Deletes the character before the cursor; no-op at position 0.
    pub fn delete_backward(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_offset(self.cursor - 1);
        self.value.remove(at);
        self.cursor -= 1;
    }

    /// Deletes the character under the cursor; no-op at the end.
    pub fn delete_forward(&mut self) {
        if self.cursor >= self.char_count() {
            return;
        }
        let at = self.byte_offset(self.cursor);
        self.value.remove(at);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    pub fn handle_event(&mut self, event: &UiEvent) {
        if let Some(pos) = event.primary_release() {
            if !self.always_selected {
                self.selected = self.rect.contains(pos);
            }
            return;
        }
        if !self.selected {
            return;
        }
        match event {
            UiEvent::KeyDown(key) => match key {
                Key::Backspace => self.delete_backward(),
                Key::Delete => self.delete_forward(),
                Key::Left => self.move_left(),
                Key::Right => self.move_right(),
                Key::Up => self.cursor = 0,
                Key::Down => self.cursor = self.char_count(),
                Key::Enter => self.insert_char('\n'),
                Key::Tab => self.insert_char('\t'),
                Key::Escape => {
                    if !self.always_selected {
                        self.selected = false;
                    }
                }
                Key::Character(c) => self.insert_char(*c),
                Key::Other => {}
            },
            UiEvent::Paste(text) => {
                for c in text.replace("\r\n", "\n").replace('\r', "\n").chars() {
                    self.insert_char(c);
                }
            }
            _ => {}
        }
    }
}

impl Component for TextArea {
    fn draw(&self, cmds: &mut RenderCommands, ctx: &UiContext) {
        let theme = ctx.theme;
        let border = if self.selected {
            theme.field_border_selected
        } else {
            theme.field_border_idle
        };
        cmds.draw_rect(self.rect, Some(theme.field_fill), Some((border, 1.0)));

        let line_height = ctx.measure.line_height();
        let inner_width = (self.rect.width - 2.0 * PADDING).max(0.0);
        let lines = wrap_text(ctx.measure, &self.value, inner_width);
        let (caret_line, caret_x) = caret_location(ctx.measure, &lines, self.cursor);

        // Scroll just far enough to keep the caret line visible.
        let visible = (((self.rect.height - 2.0 * PADDING) / line_height).floor() as usize).max(1);
        let first = (caret_line + 1).saturating_sub(visible);

        let origin = Position::new(self.rect.x + PADDING, self.rect.y + PADDING);
        for (row, line) in lines.iter().skip(first).take(visible).enumerate() {
            if !line.text.is_empty() {
                cmds.draw_text(
                    line.text.as_str(),
                    Position::new(origin.x, origin.y + row as f32 * line_height),
                    theme.text,
                );
            }
        }

        if self.selected {
            let y = origin.y + (caret_line - first) as f32 * line_height;
            let x = origin.x + caret_x;
            cmds.draw_line(
                Position::new(x, y),
                Position::new(x, y + line_height),
                theme.text,
                1.0,
            );
        }
    }

    fn handle_events(&mut self, events: &[UiEvent], _ctx: &UiContext) {
        for event in events {
            self.handle_event(event);
        }
    }
}
