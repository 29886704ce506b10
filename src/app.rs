//! Window, event translation and the frame-rate governor.
//!
//! Platform events are buffered between frames; once per tick the buffered
//! batch is handed to the [`ScreenStack`], the resulting draw commands are
//! rasterized and the frame is presented.

use crate::config::AppConfig;
use crate::input::{Key, MouseButton, MouseButtons, UiEvent};
use crate::raster::Rasterizer;
use crate::renderer::Presenter;
use crate::screen::{FrameOutcome, ScreenStack};
use crate::screens::{MenuScreen, Services};
use crate::text::{locate_system_font, FontMetrics};
use crate::ui::{RenderCommands, Theme};
use crate::utils::Position;
use anyhow::{anyhow, Context};
use log::{debug, error, info, warn};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key as WinitKey, ModifiersState, NamedKey},
    window::{Window, WindowId},
};

/// Fixed-rate tick schedule. A late frame does not cause a burst of catch-up
/// frames; the schedule restarts from the late frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    period: Duration,
    next: Instant,
}

impl FrameClock {
    pub fn new(frames_per_second: u32, now: Instant) -> Self {
        Self {
            period: Duration::from_secs(1) / frames_per_second.max(1),
            next: now,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn deadline(&self) -> Instant {
        self.next
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next
    }

    /// Records a frame at `now` and schedules the next one.
    pub fn tick(&mut self, now: Instant) {
        self.next += self.period;
        if self.next <= now {
            self.next = now + self.period;
        }
    }
}

fn translate_key(key: &WinitKey) -> Option<Key> {
    match key {
        WinitKey::Named(named) => Some(match named {
            NamedKey::Backspace => Key::Backspace,
            NamedKey::Delete => Key::Delete,
            NamedKey::Enter => Key::Enter,
            NamedKey::Escape => Key::Escape,
            NamedKey::Tab => Key::Tab,
            NamedKey::ArrowLeft => Key::Left,
            NamedKey::ArrowRight => Key::Right,
            NamedKey::ArrowUp => Key::Up,
            NamedKey::ArrowDown => Key::Down,
            NamedKey::Space => Key::Character(' '),
            _ => Key::Other,
        }),
        WinitKey::Character(s) => s.chars().next().map(Key::Character),
        _ => None,
    }
}

fn translate_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Primary),
        winit::event::MouseButton::Right => Some(MouseButton::Secondary),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

pub struct WaidsApp {
    config: AppConfig,
    stack: ScreenStack,
    services: Services,
    font: Rc<FontMetrics>,
    raster: Rasterizer,
    commands: RenderCommands,
    pending: Vec<UiEvent>,
    pointer: Position,
    buttons: MouseButtons,
    modifiers: ModifiersState,
    clipboard: Option<arboard::Clipboard>,
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    clock: FrameClock,
    error: Option<anyhow::Error>,
}

impl WaidsApp {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let font_path = config
            .font_path
            .clone()
            .or_else(locate_system_font)
            .ok_or_else(|| anyhow!("no font configured and no system font found; set font_path"))?;
        let font = Rc::new(FontMetrics::from_file(&font_path, config.font_size)?);
        info!("using font {}", font_path.display());

        let viewport = config.window.size();
        let services = Services::from_config(&config);
        let menu = MenuScreen::with_services(&services, viewport);
        let stack = ScreenStack::new(
            Rc::new(RefCell::new(menu)),
            Theme::with_background(config.background()),
            viewport,
        );
        let raster = Rasterizer::new(config.window.width, config.window.height, font.clone())?;

        let clipboard = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(e) => {
                warn!("clipboard unavailable: {e}");
                None
            }
        };

        Ok(Self {
            clock: FrameClock::new(config.frames_per_second, Instant::now()),
            config,
            stack,
            services,
            font,
            raster,
            commands: RenderCommands::new(),
            pending: Vec::new(),
            pointer: Position::default(),
            buttons: MouseButtons::NONE,
            modifiers: ModifiersState::empty(),
            clipboard,
            window: None,
            presenter: None,
            error: None,
        })
    }

    /// Maps physical window coordinates onto the logical frame.
    fn to_logical(&self, x: f64, y: f64) -> Position {
        let size = self
            .window
            .as_ref()
            .map(|w| w.inner_size())
            .unwrap_or(PhysicalSize::new(self.config.window.width, self.config.window.height));
        Position::new(
            (x * self.config.window.width as f64 / size.width.max(1) as f64) as f32,
            (y * self.config.window.height as f64 / size.height.max(1) as f64) as f32,
        )
    }

    fn paste(&mut self) {
        match self.clipboard.as_mut().map(|c| c.get_text()) {
            Some(Ok(text)) if !text.is_empty() => self.pending.push(UiEvent::Paste(text)),
            Some(Err(e)) => debug!("nothing to paste: {e}"),
            _ => {}
        }
    }

    fn keyboard(&mut self, event: KeyEvent) {
        let Some(key) = translate_key(&event.logical_key) else {
            return;
        };
        match event.state {
            ElementState::Pressed => {
                let command = self.modifiers.control_key() || self.modifiers.super_key();
                if command {
                    if key == Key::Character('v') || key == Key::Character('V') {
                        self.paste();
                    }
                    return;
                }
                match (&key, event.text.as_ref()) {
                    // Typed text carries shift and layout; prefer it over the key.
                    (Key::Character(_), Some(text)) => {
                        for c in text.chars().filter(|c| !c.is_control()) {
                            self.pending.push(UiEvent::KeyDown(Key::Character(c)));
                        }
                    }
                    _ => self.pending.push(UiEvent::KeyDown(key)),
                }
            }
            ElementState::Released => self.pending.push(UiEvent::KeyUp(key)),
        }
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let events = std::mem::take(&mut self.pending);
        let outcome = self
            .stack
            .run_frame(&events, self.font.as_ref(), &mut self.commands);
        if outcome == FrameOutcome::Quit {
            self.stack.shutdown();
            self.services.mixer.borrow_mut().stop_all();
            event_loop.exit();
            return;
        }

        self.raster
            .render(self.commands.commands(), &self.services.images.borrow());
        if let Some(presenter) = self.presenter.as_mut() {
            if let Err(e) = presenter.present(self.raster.pixels(), self.raster.width(), self.raster.height()) {
                error!("{e:#}");
                self.error = Some(e);
                self.stack.shutdown();
                event_loop.exit();
                return;
            }
        }
        self.clock.tick(now);
    }
}

impl ApplicationHandler<()> for WaidsApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attributes = Window::default_attributes()
            .with_title(&self.config.window.title)
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.error = Some(anyhow!(e).context("creating window"));
                event_loop.exit();
                return;
            }
        };
        match Presenter::new(window.clone(), self.config.window.width, self.config.window.height) {
            Ok(presenter) => self.presenter = Some(presenter),
            Err(e) => {
                self.error = Some(e);
                event_loop.exit();
                return;
            }
        }
        self.window = Some(window);
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.clock.deadline()));
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.pending.push(UiEvent::Quit),
            WindowEvent::Resized(size) => {
                if let Some(presenter) = self.presenter.as_mut() {
                    presenter.resize(size.width, size.height);
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => self.modifiers = modifiers.state(),
            WindowEvent::KeyboardInput { event, .. } => self.keyboard(event),
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer = self.to_logical(position.x, position.y);
                self.pending.push(UiEvent::MouseMotion {
                    pos: self.pointer,
                    buttons: self.buttons,
                });
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(button) = translate_button(button) else {
                    return;
                };
                let pos = self.pointer;
                let pressed = state == ElementState::Pressed;
                match button {
                    MouseButton::Primary => self.buttons.primary = pressed,
                    MouseButton::Secondary => self.buttons.secondary = pressed,
                    MouseButton::Middle => self.buttons.middle = pressed,
                }
                self.pending.push(if pressed {
                    UiEvent::MouseDown { button, pos }
                } else {
                    UiEvent::MouseUp { button, pos }
                });
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => (p.y / 20.0) as f32,
                };
                if lines != 0.0 {
                    self.pending.push(UiEvent::Wheel {
                        lines,
                        pos: self.pointer,
                    });
                }
            }
            WindowEvent::RedrawRequested => self.frame(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.clock.is_due(Instant::now()) {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.clock.deadline()));
    }
}

/// Opens the window on the main menu and runs until the user quits.
pub fn run_app(config: AppConfig) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("creating event loop")?;
    let mut app = WaidsApp::new(config)?;
    event_loop.run_app(&mut app).context("running event loop")?;
    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
