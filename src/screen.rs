//! Screens and the frame iteration that drives them.
//!
//! Exactly one [`ScreenStack`] owns the loop. Opening a screen pushes it;
//! closing it marks it stopped, and the stack pops it once the current frame
//! has finished, handing control back to the screen underneath.

use crate::input::{InputState, Key, UiEvent};
use crate::text::TextMeasure;
use crate::traits::{Component, UiContext};
use crate::ui::{RenderCommands, Theme};
use crate::utils::Size;
use log::{debug, info};
use std::cell::RefCell;
use std::rc::Rc;

/// Running flag shared by every screen.
#[derive(Debug, Default, Clone)]
pub struct ScreenState {
    running: bool,
}

impl ScreenState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.running = true;
    }

    pub fn close(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

pub type ScreenHandle = Rc<RefCell<dyn Screen>>;

/// What the stack should do after a screen's frame.
pub enum Transition {
    None,
    Push(ScreenHandle),
}

/// A full-window interactive mode. Only `draw` (plus access to the running
/// flag) is required; the hooks default to doing nothing.
pub trait Screen {
    fn state(&self) -> &ScreenState;
    fn state_mut(&mut self) -> &mut ScreenState;

    fn title(&self) -> &str {
        "screen"
    }

    fn open(&mut self) {
        self.state_mut().open();
    }

    fn close(&mut self) {
        self.state_mut().close();
    }

    fn is_running(&self) -> bool {
        self.state().is_running()
    }

    /// Polls external state once per frame, before events are dispatched.
    fn update(&mut self, _ctx: &UiContext) {}

    fn handle_events(&mut self, _events: &[UiEvent], _ctx: &UiContext) {}

    fn draw(&self, cmds: &mut RenderCommands, ctx: &UiContext);

    /// Checked after each frame while the screen is still running.
    fn transition(&mut self) -> Transition {
        Transition::None
    }

    /// Called when the screen leaves the stack or the application quits.
    fn on_close(&mut self) {}
}

/// Screen made of an ordered list of independent components. The first
/// component added is drawn first and sees events first.
pub struct ComponentScreen {
    state: ScreenState,
    title: String,
    components: Vec<Box<dyn Component>>,
}

impl ComponentScreen {
    pub fn new(title: impl Into<String>, components: Vec<Box<dyn Component>>) -> Self {
        Self {
            state: ScreenState::new(),
            title: title.into(),
            components,
        }
    }

    pub fn push(&mut self, component: Box<dyn Component>) {
        self.components.push(component);
    }

    pub fn components(&self) -> &[Box<dyn Component>] {
        &self.components
    }
}

impl Screen for ComponentScreen {
    fn state(&self) -> &ScreenState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ScreenState {
        &mut self.state
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn handle_events(&mut self, events: &[UiEvent], ctx: &UiContext) {
        for component in self.components.iter_mut() {
            component.handle_events(events, ctx);
        }
        if events.iter().any(|e| e.is_key_up(Key::Escape)) {
            self.close();
        }
    }

    fn draw(&self, cmds: &mut RenderCommands, ctx: &UiContext) {
        for component in &self.components {
            component.draw(cmds, ctx);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Quit,
}

pub struct ScreenStack {
    screens: Vec<ScreenHandle>,
    input: InputState,
    theme: Theme,
    viewport: Size,
}

impl ScreenStack {
    pub fn new(root: ScreenHandle, theme: Theme, viewport: Size) -> Self {
        let mut stack = Self {
            screens: Vec::new(),
            input: InputState::default(),
            theme,
            viewport,
        };
        stack.push(root);
        stack
    }

    pub fn push(&mut self, screen: ScreenHandle) {
        {
            let mut s = screen.borrow_mut();
            s.open();
            info!("opening screen '{}'", s.title());
        }
        self.screens.push(screen);
    }

    pub fn depth(&self) -> usize {
        self.screens.len()
    }

    pub fn top(&self) -> Option<&ScreenHandle> {
        self.screens.last()
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// One frame: clear, update, dispatch this frame's events, draw, then
    /// apply the screen's close or transition request.
    pub fn run_frame(
        &mut self,
        events: &[UiEvent],
        measure: &dyn TextMeasure,
        cmds: &mut RenderCommands,
    ) -> FrameOutcome {
        let Some(top) = self.screens.last().cloned() else {
            return FrameOutcome::Quit;
        };

        cmds.clear();
        cmds.clear_background(self.theme.background);

        {
            let ctx = UiContext {
                measure,
                input: &self.input,
                theme: &self.theme,
                viewport: self.viewport,
            };
            top.borrow_mut().update(&ctx);
        }

        self.input.apply_all(events);
        if events.iter().any(|e| matches!(e, UiEvent::Quit)) {
            info!("quit requested");
            return FrameOutcome::Quit;
        }

        let ctx = UiContext {
            measure,
            input: &self.input,
            theme: &self.theme,
            viewport: self.viewport,
        };
        let mut screen = top.borrow_mut();
        if !events.is_empty() {
            screen.handle_events(events, &ctx);
        }
        screen.draw(cmds, &ctx);

        if !screen.is_running() {
            info!("closing screen '{}'", screen.title());
            screen.on_close();
            drop(screen);
            self.screens.pop();
        } else if let Transition::Push(next) = screen.transition() {
            drop(screen);
            self.push(next);
        }

        if self.screens.is_empty() {
            debug!("screen stack empty");
            FrameOutcome::Quit
        } else {
            FrameOutcome::Continue
        }
    }

    /// Gives every screen still on the stack a chance to persist its state.
    pub fn shutdown(&mut self) {
        while let Some(screen) = self.screens.pop() {
            let mut screen = screen.borrow_mut();
            screen.close();
            screen.on_close();
        }
    }
}
