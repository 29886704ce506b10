use super::dice_roller::DiceRollerScreen;
use super::initiative::InitiativeScreen;
use super::map::MapScreen;
use super::notes::NotesScreen;
use super::sound::SoundScreen;
use super::spells::SpellListScreen;
use super::weather::WeatherTimeScreen;
use super::{CommandQueue, Services};
use crate::input::UiEvent;
use crate::layout::{anchor_rect, column, Anchors, HAnchor, Margins, VAnchor};
use crate::screen::{Screen, ScreenHandle, ScreenState, Transition};
use crate::traits::{Component, UiContext};
use crate::ui::RenderCommands;
use crate::utils::{Position, Rectangle, Size};
use crate::widgets::button::Button;
use std::cell::RefCell;
use std::rc::Rc;

const BUTTON_SIZE: Size = Size {
    width: 400.0,
    height: 30.0,
};

/// Entry screen. Each entry keeps its screen alive, so reopening one shows
/// it as it was left.
pub struct MenuScreen {
    state: ScreenState,
    entries: Vec<ScreenHandle>,
    buttons: Vec<Button>,
    queue: CommandQueue<usize>,
}

impl MenuScreen {
    pub fn new(entries: Vec<(String, ScreenHandle)>, viewport: Size) -> Self {
        let queue = CommandQueue::new();
        let origin = anchor_rect(
            Rectangle::from_pos_size(Position::default(), viewport),
            BUTTON_SIZE,
            Anchors::new(HAnchor::Center, VAnchor::Top),
            Margins::uniform(10.0),
        )
        .pos();
        let slots = column(origin, BUTTON_SIZE, 10.0, entries.len());

        let mut buttons = Vec::with_capacity(entries.len());
        let mut handles = Vec::with_capacity(entries.len());
        for (index, ((title, handle), rect)) in entries.into_iter().zip(slots).enumerate() {
            buttons.push(queue.button(title, rect.pos(), rect.size(), index));
            handles.push(handle);
        }

        Self {
            state: ScreenState::new(),
            entries: handles,
            buttons,
            queue,
        }
    }

    /// The full application menu.
    pub fn with_services(services: &Services, viewport: Size) -> Self {
        fn handle<S: Screen + 'static>(screen: S) -> ScreenHandle {
            Rc::new(RefCell::new(screen))
        }

        let entries = vec![
            ("Maps".to_string(), handle(MapScreen::new(services.clone(), viewport))),
            (
                "Initiative".to_string(),
                handle(InitiativeScreen::new(services.saves.clone(), viewport)),
            ),
            (
                "Dice Roller".to_string(),
                handle(DiceRollerScreen::new(services.dice.clone(), services.saves.clone())),
            ),
            (
                "Sound Player".to_string(),
                handle(SoundScreen::new(services, viewport)),
            ),
            (
                "Notes".to_string(),
                handle(NotesScreen::new(services.saves.clone(), viewport)),
            ),
            (
                "Spell List".to_string(),
                handle(SpellListScreen::new(services.spells.clone(), viewport)),
            ),
            ("Weather and Time".to_string(), handle(WeatherTimeScreen::new())),
        ];
        Self::new(entries, viewport)
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }
}

impl Screen for MenuScreen {
    fn state(&self) -> &ScreenState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ScreenState {
        &mut self.state
    }

    fn title(&self) -> &str {
        "menu"
    }

    fn handle_events(&mut self, events: &[UiEvent], ctx: &UiContext) {
        for button in self.buttons.iter_mut() {
            button.handle_events(events, ctx);
        }
    }

    fn draw(&self, cmds: &mut RenderCommands, ctx: &UiContext) {
        for button in &self.buttons {
            button.draw(cmds, ctx);
        }
    }

    fn transition(&mut self) -> Transition {
        // At most one screen opens per frame; extra clicks are dropped.
        match self.queue.drain().first() {
            Some(&index) => match self.entries.get(index) {
                Some(screen) => Transition::Push(screen.clone()),
                None => Transition::None,
            },
            None => Transition::None,
        }
    }
}
