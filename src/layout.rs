//! Placement helpers for laying widgets out inside the window.

use crate::utils::{Position, Rectangle, Size};

#[derive(Clone, Copy, Debug, Default)]
pub enum HAnchor {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, Default)]
pub enum VAnchor {
    #[default]
    Top,
    Middle,
    Bottom,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Anchors {
    pub h: HAnchor,
    pub v: VAnchor,
}

impl Anchors {
    pub fn new(h: HAnchor, v: VAnchor) -> Self {
        Self { h, v }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Margins {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Margins {
    pub fn uniform(m: f32) -> Self {
        Self {
            left: m,
            right: m,
            top: m,
            bottom: m,
        }
    }
}

/// Places a box of `size` inside `container`, shrunk by `margins` and
/// aligned by `anchors`.
pub fn anchor_rect(container: Rectangle, size: Size, anchors: Anchors, margins: Margins) -> Rectangle {
    let content = Rectangle::new(
        container.x + margins.left,
        container.y + margins.top,
        container.width - margins.left - margins.right,
        container.height - margins.top - margins.bottom,
    );

    let x = match anchors.h {
        HAnchor::Left => content.x,
        HAnchor::Center => content.x + (content.width - size.width) * 0.5,
        HAnchor::Right => content.x + content.width - size.width,
    };
    let y = match anchors.v {
        VAnchor::Top => content.y,
        VAnchor::Middle => content.y + (content.height - size.height) * 0.5,
        VAnchor::Bottom => content.y + content.height - size.height,
    };
    Rectangle::from_pos_size(Position::new(x, y), size)
}

/// `count` equally sized boxes stacked downwards from `origin`, `gap` apart.
pub fn column(origin: Position, item: Size, gap: f32, count: usize) -> Vec<Rectangle> {
    (0..count)
        .map(|i| {
            let y = origin.y + i as f32 * (item.height + gap);
            Rectangle::from_pos_size(Position::new(origin.x, y), item)
        })
        .collect()
}

/// Splits `row` horizontally by relative `weights`.
pub fn split_row(row: Rectangle, weights: &[f32]) -> Vec<Rectangle> {
    let total: f32 = weights.iter().sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let mut x = row.x;
    weights
        .iter()
        .map(|w| {
            let width = row.width * w / total;
            let rect = Rectangle::new(x, row.y, width, row.height);
            x += width;
            rect
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_in_container() {
        let container = Rectangle::new(0.0, 0.0, 200.0, 100.0);
        let r = anchor_rect(
            container,
            Size::new(100.0, 50.0),
            Anchors::new(HAnchor::Center, VAnchor::Middle),
            Margins::default(),
        );
        assert!((r.x - 50.0).abs() < 1e-3);
        assert!((r.y - 25.0).abs() < 1e-3);
    }

    #[test]
    fn top_right_respects_margins() {
        let r = anchor_rect(
            Rectangle::new(0.0, 0.0, 640.0, 480.0),
            Size::new(140.0, 30.0),
            Anchors::new(HAnchor::Right, VAnchor::Top),
            Margins::uniform(10.0),
        );
        assert_eq!(r, Rectangle::new(490.0, 10.0, 140.0, 30.0));
    }
}
