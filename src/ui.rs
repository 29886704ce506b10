use crate::assets::ImageId;
use crate::text::{text_size, TextMeasure};
use crate::utils::{Color, Position, Rectangle, Size};

/// Colours shared by every widget and screen.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub field_fill: Color,
    pub field_border_selected: Color,
    pub field_border_idle: Color,
    pub button_fill: Color,
    pub button_hover_fill: Color,
    pub button_border: Color,
    pub button_text: Color,
    pub button_text_disabled: Color,
    pub highlight: Color,
    pub warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::rgb(155, 155, 155),
            text: Color::BLACK,
            field_fill: Color::WHITE,
            field_border_selected: Color::BLACK,
            field_border_idle: Color::rgb(220, 220, 220),
            button_fill: Color::rgb(200, 200, 200),
            button_hover_fill: Color::rgb(225, 225, 225),
            button_border: Color::rgb(60, 60, 60),
            button_text: Color::BLACK,
            button_text_disabled: Color::rgb(130, 130, 130),
            highlight: Color::rgb(255, 240, 170),
            warning: Color::RED,
        }
    }
}

impl Theme {
    pub fn with_background(background: Color) -> Self {
        Self {
            background,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Rect {
        rect: Rectangle,
        fill: Option<Color>,
        border: Option<(Color, f32)>,
    },
    /// `pos` is the top-left corner of the text's first line.
    Text {
        text: String,
        pos: Position,
        color: Color,
    },
    Image {
        image: ImageId,
        dest: Rectangle,
    },
    Line {
        from: Position,
        to: Position,
        color: Color,
        thickness: f32,
    },
}

/// Draw commands recorded for one frame, in painter's order.
#[derive(Debug, Default)]
pub struct RenderCommands {
    commands: Vec<DrawCommand>,
}

impl RenderCommands {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn clear_background(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    pub fn draw_rect(&mut self, rect: Rectangle, fill: Option<Color>, border: Option<(Color, f32)>) {
        self.commands.push(DrawCommand::Rect { rect, fill, border });
    }

    pub fn fill_rect(&mut self, rect: Rectangle, color: Color) {
        self.draw_rect(rect, Some(color), None);
    }

    pub fn draw_text(&mut self, text: impl Into<String>, pos: Position, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.into(),
            pos,
            color,
        });
    }

    pub fn draw_image(&mut self, image: ImageId, dest: Rectangle) {
        self.commands.push(DrawCommand::Image { image, dest });
    }

    pub fn draw_line(&mut self, from: Position, to: Position, color: Color, thickness: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            thickness,
        });
    }

    /// All text strings recorded so far, handy for assertions.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Draws multi-line text one line at a time. When `center` is set, each line
/// is centred on `pos`; otherwise `pos` is the top-left corner. Returns the
/// size of the whole block.
pub fn draw_text(
    cmds: &mut RenderCommands,
    measure: &dyn TextMeasure,
    text: &str,
    pos: Position,
    color: Color,
    center: bool,
) -> Size {
    let line_height = measure.line_height();
    let block = text_size(measure, text);
    let mut y = if center {
        pos.y - block.height / 2.0
    } else {
        pos.y
    };

    for line in text.split('\n') {
        let x = if center {
            pos.x - measure.width(line) / 2.0
        } else {
            pos.x
        };
        if !line.is_empty() {
            cmds.draw_text(line, Position::new(x, y), color);
        }
        y += line_height;
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::MonoMetrics;

    #[test]
    fn draw_text_splits_lines() {
        let mut cmds = RenderCommands::new();
        let m = MonoMetrics::new(10.0, 20.0);
        let size = draw_text(&mut cmds, &m, "ab\ncde", Position::new(5.0, 5.0), Color::BLACK, false);
        assert_eq!(size, Size::new(30.0, 40.0));
        assert_eq!(
            cmds.commands()[1],
            DrawCommand::Text {
                text: "cde".into(),
                pos: Position::new(5.0, 25.0),
                color: Color::BLACK
            }
        );
    }

    #[test]
    fn centered_text_is_centered_per_line() {
        let mut cmds = RenderCommands::new();
        let m = MonoMetrics::new(10.0, 20.0);
        draw_text(&mut cmds, &m, "ab", Position::new(50.0, 50.0), Color::BLACK, true);
        assert_eq!(
            cmds.commands()[0],
            DrawCommand::Text {
                text: "ab".into(),
                pos: Position::new(40.0, 40.0),
                color: Color::BLACK
            }
        );
    }
}
