mod common;

use common::*;
use std::cell::RefCell;
use std::rc::Rc;
use waids_wyverns::input::{Key, UiEvent};
use waids_wyverns::screen::{
    ComponentScreen, FrameOutcome, Screen, ScreenHandle, ScreenStack, ScreenState, Transition,
};
use waids_wyverns::traits::{Component, UiContext};
use waids_wyverns::ui::{RenderCommands, Theme};
use waids_wyverns::utils::Position;

/// Records what the stack asked of it.
#[derive(Default)]
struct Tally {
    state: ScreenState,
    updates: usize,
    batches: Vec<usize>,
    closed: usize,
    next: Option<ScreenHandle>,
}

impl Screen for Tally {
    fn state(&self) -> &ScreenState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ScreenState {
        &mut self.state
    }

    fn update(&mut self, _ctx: &UiContext) {
        self.updates += 1;
    }

    fn handle_events(&mut self, events: &[UiEvent], _ctx: &UiContext) {
        self.batches.push(events.len());
        if events.iter().any(|e| e.is_key_up(Key::Escape)) {
            self.close();
        }
    }

    fn draw(&self, cmds: &mut RenderCommands, _ctx: &UiContext) {
        cmds.draw_text("tally", Position::new(0.0, 0.0), Theme::default().text);
    }

    fn transition(&mut self) -> Transition {
        match self.next.take() {
            Some(next) => Transition::Push(next),
            None => Transition::None,
        }
    }

    fn on_close(&mut self) {
        self.closed += 1;
    }
}

fn tally() -> Rc<RefCell<Tally>> {
    Rc::new(RefCell::new(Tally::default()))
}

fn stack(root: Rc<RefCell<Tally>>) -> ScreenStack {
    ScreenStack::new(root, Theme::default(), VIEWPORT)
}

#[test]
fn events_arrive_as_one_batch() {
    let root = tally();
    let mut stack = stack(root.clone());
    let mut cmds = RenderCommands::new();
    let m = mono();

    assert_eq!(stack.run_frame(&[], &m, &mut cmds), FrameOutcome::Continue);
    let mut events = click(1.0, 1.0);
    events.extend(typed("abc"));
    stack.run_frame(&events, &m, &mut cmds);

    let root = root.borrow();
    assert_eq!(root.updates, 2);
    // The idle frame does not dispatch.
    assert_eq!(root.batches, vec![5]);
    assert_eq!(cmds.texts().collect::<Vec<_>>(), vec!["tally"]);
}

#[test]
fn transition_pushes_and_close_pops() {
    let root = tally();
    let child = tally();
    root.borrow_mut().next = Some(child.clone());
    let mut stack = stack(root.clone());
    let mut cmds = RenderCommands::new();
    let m = mono();

    stack.run_frame(&[], &m, &mut cmds);
    assert_eq!(stack.depth(), 2);
    assert!(child.borrow().is_running());

    stack.run_frame(&[key_up(Key::Escape)], &m, &mut cmds);
    assert_eq!(stack.depth(), 1);
    assert_eq!(child.borrow().closed, 1);
    assert!(!child.borrow().is_running());
    assert_eq!(root.borrow().closed, 0);
}

#[test]
fn closing_the_root_quits() {
    let root = tally();
    let mut stack = stack(root.clone());
    let mut cmds = RenderCommands::new();
    let outcome = stack.run_frame(&[key_up(Key::Escape)], &mono(), &mut cmds);
    assert_eq!(outcome, FrameOutcome::Quit);
    assert_eq!(stack.depth(), 0);
    assert_eq!(root.borrow().closed, 1);
}

#[test]
fn quit_event_skips_dispatch() {
    let root = tally();
    let mut stack = stack(root.clone());
    let mut cmds = RenderCommands::new();
    let outcome = stack.run_frame(&[UiEvent::Quit], &mono(), &mut cmds);
    assert_eq!(outcome, FrameOutcome::Quit);
    assert!(root.borrow().batches.is_empty());

    stack.shutdown();
    assert_eq!(root.borrow().closed, 1);
    assert_eq!(stack.depth(), 0);
}

/// Appends its tag to a shared log on every batch.
struct Tagged {
    tag: &'static str,
    log: Rc<RefCell<Vec<&'static str>>>,
}

impl Component for Tagged {
    fn draw(&self, cmds: &mut RenderCommands, ctx: &UiContext) {
        cmds.draw_text(self.tag, Position::new(0.0, 0.0), ctx.theme.text);
    }

    fn handle_events(&mut self, _events: &[UiEvent], _ctx: &UiContext) {
        self.log.borrow_mut().push(self.tag);
    }
}

#[test]
fn component_screen_keeps_insertion_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut screen = ComponentScreen::new(
        "ordered",
        vec![
            Box::new(Tagged {
                tag: "first",
                log: log.clone(),
            }),
            Box::new(Tagged {
                tag: "second",
                log: log.clone(),
            }),
        ],
    );
    screen.push(Box::new(Tagged {
        tag: "third",
        log: log.clone(),
    }));
    let handle = Rc::new(RefCell::new(screen));
    let mut stack = ScreenStack::new(handle.clone(), Theme::default(), VIEWPORT);
    let mut cmds = RenderCommands::new();

    stack.run_frame(&typed("x"), &mono(), &mut cmds);
    assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    assert_eq!(
        cmds.texts().collect::<Vec<_>>(),
        vec!["first", "second", "third"]
    );

    let outcome = stack.run_frame(&[key_up(Key::Escape)], &mono(), &mut cmds);
    assert_eq!(outcome, FrameOutcome::Quit);
}
