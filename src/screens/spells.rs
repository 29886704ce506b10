use crate::input::{Key, UiEvent};
use crate::screen::{Screen, ScreenState};
use crate::spells::SpellBook;
use crate::traits::{Component, UiContext};
use crate::ui::RenderCommands;
use crate::utils::{Position, Size};
use crate::widgets::text_box::TextBox;
use std::rc::Rc;

/// Spell lookup; the list only appears once something is typed.
pub struct SpellListScreen {
    state: ScreenState,
    spells: Rc<SpellBook>,
    search: TextBox,
}

impl SpellListScreen {
    pub fn new(spells: Rc<SpellBook>, viewport: Size) -> Self {
        let size = Size::new(330.0, 40.0);
        let pos = Position::new(
            viewport.width - size.width - 10.0,
            viewport.height - size.height - 10.0,
        );
        Self {
            state: ScreenState::new(),
            spells,
            search: TextBox::new(pos, size).with_label("Filter Spell(s)"),
        }
    }

    pub fn search_box(&mut self) -> &mut TextBox {
        &mut self.search
    }

    pub fn visible_lines(&self) -> Vec<String> {
        self.spells
            .filter(self.search.value())
            .into_iter()
            .map(|(name, level)| format!("{name} {level}"))
            .collect()
    }
}

impl Screen for SpellListScreen {
    fn state(&self) -> &ScreenState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ScreenState {
        &mut self.state
    }

    fn title(&self) -> &str {
        "spell list"
    }

    fn handle_events(&mut self, events: &[UiEvent], ctx: &UiContext) {
        self.search.handle_events(events, ctx);
        if events.iter().any(|e| e.is_key_up(Key::Escape)) {
            self.close();
        }
    }

    fn draw(&self, cmds: &mut RenderCommands, ctx: &UiContext) {
        let line_height = ctx.measure.line_height();
        let bottom = self.search.rect().top();
        for (i, line) in self.visible_lines().into_iter().enumerate() {
            let y = i as f32 * line_height;
            if y + line_height > bottom {
                break;
            }
            cmds.draw_text(line, Position::new(0.0, y), ctx.theme.text);
        }
        self.search.draw(cmds, ctx);
    }
}
