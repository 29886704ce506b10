use crate::utils::Size;
use anyhow::{anyhow, Context};
use rusttype::{Font, Scale};
use std::path::{Path, PathBuf};

/// Per-character text metrics. Widgets measure through this trait so they can
/// be exercised without a font file.
pub trait TextMeasure {
    fn advance(&self, c: char) -> f32;
    fn line_height(&self) -> f32;

    fn width(&self, text: &str) -> f32 {
        text.chars().map(|c| self.advance(c)).sum()
    }
}

/// Spaces a tab stands for when measured with a real font.
const TAB_WIDTH: f32 = 4.0;

/// Fixed advance for every character.
#[derive(Debug, Clone, Copy)]
pub struct MonoMetrics {
    pub advance: f32,
    pub line_height: f32,
}

impl MonoMetrics {
    pub fn new(advance: f32, line_height: f32) -> Self {
        Self {
            advance,
            line_height,
        }
    }
}

impl TextMeasure for MonoMetrics {
    fn advance(&self, c: char) -> f32 {
        if c == '\n' {
            0.0
        } else {
            self.advance
        }
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }
}

/// TrueType metrics at a fixed pixel size.
pub struct FontMetrics {
    font: Font<'static>,
    scale: Scale,
    ascent: f32,
    line_height: f32,
}

impl FontMetrics {
    pub fn from_bytes(bytes: Vec<u8>, font_size: f32) -> Option<Self> {
        let font = Font::try_from_vec(bytes)?;
        let scale = Scale::uniform(font_size);
        let v = font.v_metrics(scale);
        Some(Self {
            font,
            scale,
            ascent: v.ascent,
            line_height: (v.ascent - v.descent + v.line_gap).ceil(),
        })
    }

    pub fn from_file(path: &Path, font_size: f32) -> anyhow::Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
        Self::from_bytes(bytes, font_size)
            .ok_or_else(|| anyhow!("{} is not a usable TrueType font", path.display()))
    }

    pub fn font(&self) -> &Font<'static> {
        &self.font
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn ascent(&self) -> f32 {
        self.ascent
    }
}

impl TextMeasure for FontMetrics {
    fn advance(&self, c: char) -> f32 {
        match c {
            '\n' => 0.0,
            '\t' => TAB_WIDTH * self.advance(' '),
            _ => self.font.glyph(c).scaled(self.scale).h_metrics().advance_width,
        }
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }
}

const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// First existing font among well-known system locations.
pub fn locate_system_font() -> Option<PathBuf> {
    SYSTEM_FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

/// Size of a possibly multi-line string: widest line by number of lines.
pub fn text_size(measure: &dyn TextMeasure, text: &str) -> Size {
    let mut width: f32 = 0.0;
    let mut lines = 0;
    for line in text.split('\n') {
        width = width.max(measure.width(line));
        lines += 1;
    }
    Size::new(width, lines as f32 * measure.line_height())
}

/// One visual line of wrapped text. `start` is the char index in the source
/// string of the line's first character.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLine {
    pub start: usize,
    pub text: String,
}

/// Breaks `text` on explicit newlines and whenever the next character would
/// overflow `max_width`. A line always holds at least one character, so a
/// box narrower than a glyph still makes progress.
pub fn wrap_text(measure: &dyn TextMeasure, text: &str, max_width: f32) -> Vec<WrappedLine> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut start = 0;
    let mut x = 0.0;

    for (i, c) in text.chars().enumerate() {
        if c == '\n' {
            lines.push(WrappedLine {
                start,
                text: std::mem::take(&mut current),
            });
            start = i + 1;
            x = 0.0;
            continue;
        }
        let advance = measure.advance(c);
        if x + advance > max_width && !current.is_empty() {
            lines.push(WrappedLine {
                start,
                text: std::mem::take(&mut current),
            });
            start = i;
            x = 0.0;
        }
        current.push(c);
        x += advance;
    }
    lines.push(WrappedLine {
        start,
        text: current,
    });
    lines
}

/// Line index and x offset of a caret placed before char index `cursor`.
/// A cursor sitting on a soft-wrap boundary belongs to the later line.
pub fn caret_location(
    measure: &dyn TextMeasure,
    lines: &[WrappedLine],
    cursor: usize,
) -> (usize, f32) {
    let line_index = lines
        .iter()
        .rposition(|line| line.start <= cursor)
        .unwrap_or(0);
    let Some(line) = lines.get(line_index) else {
        return (0, 0.0);
    };
    let column = cursor.saturating_sub(line.start);
    let x = line.text.chars().take(column).map(|c| measure.advance(c)).sum();
    (line_index, x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono() -> MonoMetrics {
        MonoMetrics::new(10.0, 20.0)
    }

    #[test]
    fn wraps_on_width_and_newline() {
        let lines = wrap_text(&mono(), "abcdef\ngh", 40.0);
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["abcd", "ef", "gh"]);
        assert_eq!(lines[1].start, 4);
        assert_eq!(lines[2].start, 7);
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        let lines = wrap_text(&mono(), "", 40.0);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].text.is_empty());
    }

    #[test]
    fn trailing_newline_opens_a_line() {
        let lines = wrap_text(&mono(), "ab\n", 40.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].start, 3);
    }

    #[test]
    fn caret_on_wrap_boundary_moves_to_next_line() {
        let m = mono();
        let lines = wrap_text(&m, "abcdef", 40.0);
        assert_eq!(caret_location(&m, &lines, 4), (1, 0.0));
        assert_eq!(caret_location(&m, &lines, 3), (0, 30.0));
        assert_eq!(caret_location(&m, &lines, 6), (1, 20.0));
    }

    #[test]
    fn caret_before_newline_stays_on_line() {
        let m = mono();
        let lines = wrap_text(&m, "ab\ncd", 100.0);
        assert_eq!(caret_location(&m, &lines, 2), (0, 20.0));
        assert_eq!(caret_location(&m, &lines, 3), (1, 0.0));
    }

    #[test]
    fn text_size_counts_lines() {
        let size = text_size(&mono(), "abc\nde");
        assert_eq!(size, Size::new(30.0, 40.0));
    }
}
