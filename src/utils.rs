use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Mul<f32> for Size {
    type Output = Size;

    fn mul(self, rhs: f32) -> Self::Output {
        Size {
            width: self.width * rhs,
            height: self.height * rhs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Position {
    type Output = Position;
    fn add(self, rhs: Position) -> Self::Output {
        Position {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Position {
    type Output = Position;
    fn sub(self, rhs: Position) -> Self::Output {
        Position {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Mul<f32> for Position {
    type Output = Position;
    fn mul(self, factor: f32) -> Self::Output {
        Position {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    /// Negative extents are clamped to zero.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn new_square(x: f32, y: f32, side_length: f32) -> Self {
        Self::new(x, y, side_length, side_length)
    }

    pub fn from_pos_size(pos: Position, size: Size) -> Self {
        Self::new(pos.x, pos.y, size.width, size.height)
    }

    /// Half-open hit test: a point on the right or bottom edge is outside.
    pub fn contains(&self, position: Position) -> bool {
        position.x >= self.x
            && position.x < self.x + self.width
            && position.y >= self.y
            && position.y < self.y + self.height
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Position {
        Position {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    pub fn pos(&self) -> Position {
        Position {
            x: self.x,
            y: self.y,
        }
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    pub fn set_pos(&mut self, pos: Position) {
        self.x = pos.x;
        self.y = pos.y;
    }

    /// Shrinks the rectangle from the left by `amount`, keeping the right edge.
    pub fn trim_left(&self, amount: f32) -> Rectangle {
        let amount = amount.clamp(0.0, self.width);
        Rectangle::new(self.x + amount, self.y, self.width - amount, self.height)
    }
}

/// 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

impl From<[u8; 3]> for Color {
    fn from(c: [u8; 3]) -> Self {
        Color::rgb(c[0], c[1], c[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let r = Rectangle::new(10.0, 10.0, 20.0, 20.0);
        assert!(r.contains(Position::new(10.0, 10.0)));
        assert!(r.contains(Position::new(29.9, 29.9)));
        assert!(!r.contains(Position::new(30.0, 15.0)));
        assert!(!r.contains(Position::new(15.0, 30.0)));
        assert!(!r.contains(Position::new(9.9, 15.0)));
    }

    #[test]
    fn corners_and_center() {
        let r = Rectangle::new(0.0, 10.0, 40.0, 20.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.bottom(), 30.0);
        assert_eq!(r.center(), Position::new(20.0, 20.0));
    }

    #[test]
    fn negative_extent_is_clamped() {
        let r = Rectangle::new(0.0, 0.0, -5.0, 3.0);
        assert_eq!(r.width, 0.0);
        assert!(!r.contains(Position::new(0.0, 1.0)));
    }

    #[test]
    fn trim_left_keeps_right_edge() {
        let r = Rectangle::new(0.0, 0.0, 100.0, 10.0).trim_left(30.0);
        assert_eq!(r.x, 30.0);
        assert_eq!(r.right(), 100.0);
    }
}
