use super::{parse_signed, CommandQueue};
use crate::initiative::{CharacterInitiative, InitiativeTracker};
use crate::input::{Key, UiEvent};
use crate::persistence::SaveStore;
use crate::screen::{Screen, ScreenState};
use crate::traits::{Component, UiContext};
use crate::ui::RenderCommands;
use crate::utils::{Position, Rectangle, Size};
use crate::widgets::button::Button;
use crate::widgets::text_box::{signed_numeric_keys, TextBox};
use log::{info, warn};
use uuid::Uuid;

const LIST_TOP: f32 = 95.0;
const MARGIN: f32 = 10.0;
const ROW_HEIGHT: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Add,
    Remove,
    SetHealth,
}

pub struct InitiativeScreen {
    state: ScreenState,
    tracker: InitiativeTracker,
    saves: SaveStore,
    viewport: Size,
    name: TextBox,
    initiative: TextBox,
    health: TextBox,
    add: Button,
    remove: Button,
    set_health: Button,
    selected: Option<Uuid>,
    queue: CommandQueue<Command>,
}

impl InitiativeScreen {
    /// Picks up the order saved by a previous session, if any.
    pub fn new(saves: SaveStore, viewport: Size) -> Self {
        let tracker = match saves.load_initiative() {
            Ok(Some(tracker)) => {
                info!("restored {} combatants", tracker.len());
                tracker
            }
            Ok(None) => InitiativeTracker::new(),
            Err(e) => {
                warn!("ignoring saved initiative order: {e:#}");
                InitiativeTracker::new()
            }
        };
        Self::with_tracker(tracker, saves, viewport)
    }

    pub fn with_tracker(tracker: InitiativeTracker, saves: SaveStore, viewport: Size) -> Self {
        let queue = CommandQueue::new();
        Self {
            state: ScreenState::new(),
            tracker,
            saves,
            viewport,
            name: TextBox::new(Position::new(MARGIN, MARGIN), Size::new(220.0, ROW_HEIGHT))
                .with_label("Name:"),
            initiative: TextBox::new(Position::new(240.0, MARGIN), Size::new(110.0, ROW_HEIGHT))
                .with_label("Init:")
                .with_allowed(signed_numeric_keys),
            health: TextBox::new(Position::new(360.0, MARGIN), Size::new(100.0, ROW_HEIGHT))
                .with_label("HP:")
                .with_allowed(signed_numeric_keys),
            add: queue.button("Add", Position::new(470.0, MARGIN), Size::new(70.0, ROW_HEIGHT), Command::Add),
            remove: queue.button(
                "Remove",
                Position::new(MARGIN, 50.0),
                Size::new(120.0, ROW_HEIGHT),
                Command::Remove,
            ),
            set_health: queue.button(
                "Set HP",
                Position::new(140.0, 50.0),
                Size::new(120.0, ROW_HEIGHT),
                Command::SetHealth,
            ),
            selected: None,
            queue,
        }
    }

    pub fn tracker(&self) -> &InitiativeTracker {
        &self.tracker
    }

    pub fn selected(&self) -> Option<Uuid> {
        self.selected
    }

    pub fn name_box(&mut self) -> &mut TextBox {
        &mut self.name
    }

    pub fn initiative_box(&mut self) -> &mut TextBox {
        &mut self.initiative
    }

    pub fn health_box(&mut self) -> &mut TextBox {
        &mut self.health
    }

    /// The combatant described by the input boxes, if they are all valid.
    fn pending_character(&self) -> Option<CharacterInitiative> {
        let name = self.name.value().trim();
        if name.is_empty() {
            return None;
        }
        let initiative = parse_signed(self.initiative.value())?;
        let health = parse_signed(self.health.value())?;
        Some(CharacterInitiative::new(name, initiative, health))
    }

    /// Adds the combatant from the input boxes and clears them.
    pub fn add_from_inputs(&mut self) -> Option<Uuid> {
        let character = self.pending_character()?;
        info!("adding {} at initiative {}", character.name, character.initiative);
        let id = self.tracker.add_character(character);
        self.name.clear();
        self.initiative.clear();
        self.health.clear();
        Some(id)
    }

    fn remove_selected(&mut self) {
        let Some(id) = self.selected.take() else {
            return;
        };
        match self.tracker.remove_character(id) {
            Ok(c) => info!("removed {}", c.name),
            Err(e) => warn!("{e}"),
        }
    }

    fn set_selected_health(&mut self) {
        let Some(health) = parse_signed(self.health.value()) else {
            return;
        };
        if let Some(c) = self.selected.and_then(|id| self.tracker.get_mut(id)) {
            c.health = health;
            self.health.clear();
        }
    }

    fn row_rect(&self, row: usize, line_height: f32) -> Rectangle {
        Rectangle::new(
            MARGIN,
            LIST_TOP + (row as f32 + 1.0) * line_height,
            self.viewport.width - 2.0 * MARGIN,
            line_height,
        )
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Add => {
                self.add_from_inputs();
            }
            Command::Remove => self.remove_selected(),
            Command::SetHealth => self.set_selected_health(),
        }
    }
}

impl Screen for InitiativeScreen {
    fn state(&self) -> &ScreenState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ScreenState {
        &mut self.state
    }

    fn title(&self) -> &str {
        "initiative"
    }

    fn update(&mut self, _ctx: &UiContext) {
        let has_selection = self
            .selected
            .map_or(false, |id| self.tracker.get(id).is_some());
        self.add.set_enabled(self.pending_character().is_some());
        self.remove.set_enabled(has_selection);
        self.set_health
            .set_enabled(has_selection && parse_signed(self.health.value()).is_some());
    }

    fn handle_events(&mut self, events: &[UiEvent], ctx: &UiContext) {
        self.name.handle_events(events, ctx);
        self.initiative.handle_events(events, ctx);
        self.health.handle_events(events, ctx);
        self.add.handle_events(events, ctx);
        self.remove.handle_events(events, ctx);
        self.set_health.handle_events(events, ctx);

        for command in self.queue.drain() {
            self.apply(command);
        }

        let line_height = ctx.measure.line_height();
        for event in events {
            if let Some(pos) = event.primary_release() {
                let order: Vec<Uuid> = self.tracker.character_order().iter().map(|c| c.id).collect();
                if let Some(id) = order
                    .iter()
                    .enumerate()
                    .find(|(row, _)| self.row_rect(*row, line_height).contains(pos))
                    .map(|(_, id)| *id)
                {
                    self.selected = Some(id);
                }
            }
            if event.is_key_up(Key::Enter) {
                self.add_from_inputs();
            }
            if event.is_key_up(Key::Escape) {
                self.close();
            }
        }
    }

    fn draw(&self, cmds: &mut RenderCommands, ctx: &UiContext) {
        self.name.draw(cmds, ctx);
        self.initiative.draw(cmds, ctx);
        self.health.draw(cmds, ctx);
        self.add.draw(cmds, ctx);
        self.remove.draw(cmds, ctx);
        self.set_health.draw(cmds, ctx);

        let theme = ctx.theme;
        let line_height = ctx.measure.line_height();
        cmds.draw_text("Initiative Order:", Position::new(MARGIN, LIST_TOP), theme.text);
        for (row, c) in self.tracker.character_order().into_iter().enumerate() {
            let rect = self.row_rect(row, line_height);
            if rect.bottom() > self.viewport.height {
                break;
            }
            if self.selected == Some(c.id) {
                cmds.fill_rect(rect, theme.highlight);
            }
            cmds.draw_text(
                format!(
                    "Initiative: {}, Name: {}, Health: {}",
                    c.initiative, c.name, c.health
                ),
                rect.pos(),
                theme.text,
            );
        }
    }

    fn on_close(&mut self) {
        if let Err(e) = self.saves.save_initiative(&self.tracker) {
            warn!("could not save initiative order: {e:#}");
        }
    }
}
