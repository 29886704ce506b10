use crate::input::{Key, UiEvent};
use crate::persistence::SaveStore;
use crate::screen::{Screen, ScreenState};
use crate::traits::{Component, UiContext};
use crate::ui::RenderCommands;
use crate::utils::{Position, Size};
use crate::widgets::text_area::TextArea;
use log::warn;

/// Free-form session notes filling the whole window.
pub struct NotesScreen {
    state: ScreenState,
    saves: SaveStore,
    area: TextArea,
}

impl NotesScreen {
    pub fn new(saves: SaveStore, viewport: Size) -> Self {
        let notes = match saves.load_notes() {
            Ok(notes) => notes.unwrap_or_default(),
            Err(e) => {
                warn!("ignoring saved notes: {e:#}");
                String::new()
            }
        };
        Self {
            state: ScreenState::new(),
            saves,
            area: TextArea::new(Position::default(), viewport)
                .always_selected()
                .with_value(&notes),
        }
    }

    pub fn text(&self) -> &str {
        self.area.value()
    }

}

impl Screen for NotesScreen {
    fn state(&self) -> &ScreenState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ScreenState {
        &mut self.state
    }

    fn title(&self) -> &str {
        "notes"
    }

    fn handle_events(&mut self, events: &[UiEvent], ctx: &UiContext) {
        self.area.handle_events(events, ctx);
        if events.iter().any(|e| e.is_key_up(Key::Escape)) {
            self.close();
        }
    }

    fn draw(&self, cmds: &mut RenderCommands, ctx: &UiContext) {
        self.area.draw(cmds, ctx);
    }

    fn on_close(&mut self) {
        if let Err(e) = self.saves.save_notes(self.area.value()) {
            warn!("could not save notes: {e:#}");
        }
    }
}
