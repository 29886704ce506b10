//! Software rasterizer turning a frame's [`DrawCommand`]s into pixels.

use crate::assets::ImageStore;
use crate::text::{FontMetrics, TextMeasure};
use crate::ui::DrawCommand;
use crate::utils::{Color, Position, Rectangle};
use anyhow::anyhow;
use log::trace;
use std::collections::HashMap;
use std::rc::Rc;
use tiny_skia::{
    FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, PremultipliedColorU8, Rect, Stroke,
    Transform,
};

/// Coverage bitmap for one glyph in one colour, offset from the pen position
/// on the baseline.
struct Glyph {
    pixmap: Pixmap,
    left: i32,
    top: i32,
}

pub struct Rasterizer {
    target: Pixmap,
    font: Rc<FontMetrics>,
    glyphs: HashMap<(char, Color), Option<Glyph>>,
}

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

fn to_rect(rect: Rectangle) -> Option<Rect> {
    Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)
}

impl Rasterizer {
    pub fn new(width: u32, height: u32, font: Rc<FontMetrics>) -> anyhow::Result<Self> {
        let target = Pixmap::new(width.max(1), height.max(1))
            .ok_or_else(|| anyhow!("cannot allocate a {width}x{height} frame"))?;
        Ok(Self {
            target,
            font,
            glyphs: HashMap::new(),
        })
    }

    pub fn width(&self) -> u32 {
        self.target.width()
    }

    pub fn height(&self) -> u32 {
        self.target.height()
    }

    /// Premultiplied RGBA8 pixels of the last rendered frame.
    pub fn pixels(&self) -> &[u8] {
        self.target.data()
    }

    pub fn render(&mut self, commands: &[DrawCommand], images: &ImageStore) {
        for command in commands {
            match command {
                DrawCommand::Clear(color) => {
                    self.target.fill(tiny_skia::Color::from_rgba8(
                        color.r, color.g, color.b, color.a,
                    ));
                }
                DrawCommand::Rect { rect, fill, border } => self.draw_rect(*rect, *fill, *border),
                DrawCommand::Text { text, pos, color } => self.draw_text(text, *pos, *color),
                DrawCommand::Image { image, dest } => match images.get(*image) {
                    Some(source) => {
                        let sx = dest.width / source.width() as f32;
                        let sy = dest.height / source.height() as f32;
                        let paint = PixmapPaint {
                            quality: FilterQuality::Bilinear,
                            ..PixmapPaint::default()
                        };
                        self.target.draw_pixmap(
                            0,
                            0,
                            source.as_ref(),
                            &paint,
                            Transform::from_row(sx, 0.0, 0.0, sy, dest.x, dest.y),
                            None,
                        );
                    }
                    None => trace!("image {:?} not loaded", image),
                },
                DrawCommand::Line {
                    from,
                    to,
                    color,
                    thickness,
                } => {
                    let mut pb = PathBuilder::new();
                    pb.move_to(from.x, from.y);
                    pb.line_to(to.x, to.y);
                    if let Some(path) = pb.finish() {
                        let stroke = Stroke {
                            width: *thickness,
                            ..Stroke::default()
                        };
                        self.target.stroke_path(
                            &path,
                            &paint(*color),
                            &stroke,
                            Transform::identity(),
                            None,
                        );
                    }
                }
            }
        }
    }

    fn draw_rect(&mut self, rect: Rectangle, fill: Option<Color>, border: Option<(Color, f32)>) {
        let Some(r) = to_rect(rect) else {
            return;
        };
        if let Some(color) = fill {
            self.target
                .fill_rect(r, &paint(color), Transform::identity(), None);
        }
        if let Some((color, width)) = border {
            let path = PathBuilder::from_rect(r);
            let stroke = Stroke {
                width,
                ..Stroke::default()
            };
            self.target
                .stroke_path(&path, &paint(color), &stroke, Transform::identity(), None);
        }
    }

    fn draw_text(&mut self, text: &str, pos: Position, color: Color) {
        let baseline = (pos.y + self.font.ascent()).round() as i32;
        let mut pen = pos.x;
        for c in text.chars() {
            if c.is_control() {
                pen += self.font.advance(c);
                continue;
            }
            let font = self.font.clone();
            let glyph = self
                .glyphs
                .entry((c, color))
                .or_insert_with(|| rasterize_glyph(&font, c, color));
            if let Some(glyph) = glyph {
                self.target.draw_pixmap(
                    pen.round() as i32 + glyph.left,
                    baseline + glyph.top,
                    glyph.pixmap.as_ref(),
                    &PixmapPaint::default(),
                    Transform::identity(),
                    None,
                );
            }
            pen += self.font.advance(c);
        }
    }
}

fn rasterize_glyph(font: &FontMetrics, c: char, color: Color) -> Option<Glyph> {
    let glyph = font
        .font()
        .glyph(c)
        .scaled(font.scale())
        .positioned(rusttype::point(0.0, 0.0));
    let bb = glyph.pixel_bounding_box()?;
    let width = bb.width() as u32;
    let mut pixmap = Pixmap::new(width, bb.height() as u32)?;
    let pixels = pixmap.pixels_mut();
    glyph.draw(|x, y, coverage| {
        let alpha = (coverage.clamp(0.0, 1.0) * color.a as f32) / 255.0;
        let premul = |v: u8| (v as f32 * alpha).round() as u8;
        if let Some(px) = PremultipliedColorU8::from_rgba(
            premul(color.r),
            premul(color.g),
            premul(color.b),
            (alpha * 255.0).round() as u8,
        ) {
            pixels[(y * width + x) as usize] = px;
        }
    });
    Some(Glyph {
        pixmap,
        left: bb.min.x,
        top: bb.min.y,
    })
}
