use crate::input::{InputState, UiEvent};
use crate::text::TextMeasure;
use crate::ui::{RenderCommands, Theme};
use crate::utils::{Position, Rectangle, Size};

/// Read-only frame context handed to widgets while they handle events or draw.
pub struct UiContext<'a> {
    pub measure: &'a dyn TextMeasure,
    pub input: &'a InputState,
    pub theme: &'a Theme,
    pub viewport: Size,
}

/// A self-contained drawable, event-handling widget.
pub trait Component {
    fn draw(&self, cmds: &mut RenderCommands, ctx: &UiContext);
    fn handle_events(&mut self, events: &[UiEvent], ctx: &UiContext);
}

/// Host contract for pointer dragging: a movable position and a hit box that
/// follows it.
pub trait Draggable {
    fn position(&self) -> Position;
    fn set_position(&mut self, position: Position);
    fn hit_rect(&self) -> Rectangle;
}

/// Hosts that can also be resized uniformly (width = height).
pub trait Scalable: Draggable {
    fn size(&self) -> f32;
    fn set_size(&mut self, size: f32);
}
