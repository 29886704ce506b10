//! Zoomable view onto the battle map.
//!
//! Zoom is always about the centre of the viewport. Tokens are stored in map
//! space and converted on the way to and from the screen.

use crate::utils::{Position, Rectangle, Size};

pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 5.0;
pub const ZOOM_IN_FACTOR: f32 = 1.2;
pub const ZOOM_OUT_FACTOR: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    viewport: Size,
    zoom: f32,
}

impl MapView {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            zoom: MIN_ZOOM,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * ZOOM_IN_FACTOR);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom * ZOOM_OUT_FACTOR);
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Screen position of the map's top-left corner.
    pub fn offset(&self) -> Position {
        Position::new(
            self.viewport.width / 2.0 - self.viewport.width * self.zoom / 2.0,
            self.viewport.height / 2.0 - self.viewport.height * self.zoom / 2.0,
        )
    }

    pub fn to_screen(&self, map_pos: Position) -> Position {
        map_pos * self.zoom + self.offset()
    }

    pub fn to_map(&self, screen_pos: Position) -> Position {
        let offset = self.offset();
        Position::new(
            (screen_pos.x - offset.x) / self.zoom,
            (screen_pos.y - offset.y) / self.zoom,
        )
    }

    /// Where the full map image lands on screen.
    pub fn map_rect(&self) -> Rectangle {
        Rectangle::from_pos_size(self.offset(), self.viewport * self.zoom)
    }
}
