#![allow(dead_code)]

use waids_wyverns::input::{InputState, Key, MouseButton, MouseButtons, UiEvent};
use waids_wyverns::text::MonoMetrics;
use waids_wyverns::traits::UiContext;
use waids_wyverns::ui::Theme;
use waids_wyverns::utils::{Position, Size};

pub const VIEWPORT: Size = Size {
    width: 640.0,
    height: 480.0,
};

pub fn mono() -> MonoMetrics {
    MonoMetrics::new(10.0, 20.0)
}

pub struct Harness {
    pub measure: MonoMetrics,
    pub input: InputState,
    pub theme: Theme,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            measure: mono(),
            input: InputState::default(),
            theme: Theme::default(),
        }
    }

    pub fn ctx(&self) -> UiContext<'_> {
        UiContext {
            measure: &self.measure,
            input: &self.input,
            theme: &self.theme,
            viewport: VIEWPORT,
        }
    }
}

pub fn down(x: f32, y: f32) -> UiEvent {
    UiEvent::MouseDown {
        button: MouseButton::Primary,
        pos: Position::new(x, y),
    }
}

pub fn up(x: f32, y: f32) -> UiEvent {
    UiEvent::MouseUp {
        button: MouseButton::Primary,
        pos: Position::new(x, y),
    }
}

pub fn click(x: f32, y: f32) -> Vec<UiEvent> {
    vec![down(x, y), up(x, y)]
}

pub fn click_at(pos: Position) -> Vec<UiEvent> {
    click(pos.x, pos.y)
}

pub fn motion(x: f32, y: f32, buttons: MouseButtons) -> UiEvent {
    UiEvent::MouseMotion {
        pos: Position::new(x, y),
        buttons,
    }
}

pub fn typed(text: &str) -> Vec<UiEvent> {
    text.chars().map(|c| UiEvent::KeyDown(Key::Character(c))).collect()
}

pub fn key_up(key: Key) -> UiEvent {
    UiEvent::KeyUp(key)
}

/// Die source returning queued faces in order, then 1s.
pub struct Scripted(std::collections::VecDeque<u32>);

impl Scripted {
    pub fn new(faces: &[u32]) -> Self {
        Self(faces.iter().copied().collect())
    }
}

impl waids_wyverns::dice::DieSource for Scripted {
    fn roll(&mut self, _sides: u32) -> u32 {
        self.0.pop_front().unwrap_or(1)
    }
}

pub fn write_png(path: &std::path::Path) {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).expect("mkdir");
    }
    image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 128, 255, 255]))
        .save(path)
        .expect("save png");
}
