use super::{parse_signed, parse_unsigned, CommandQueue};
use crate::dice::{DiceMacro, DiceRoller, DieType};
use crate::input::{Key, UiEvent};
use crate::persistence::SaveStore;
use crate::screen::{Screen, ScreenState};
use crate::traits::{Component, UiContext};
use crate::ui::{draw_text, RenderCommands};
use crate::utils::{Position, Rectangle, Size};
use crate::widgets::button::Button;
use crate::widgets::text_box::{numeric_keys, signed_numeric_keys, TextBox};
use log::{info, warn};
use std::cell::RefCell;
use std::rc::Rc;

const MARGIN: f32 = 10.0;
const ROW_HEIGHT: f32 = 30.0;
const DIE_BUTTON_WIDTH: f32 = 60.0;
const MACRO_TOP: f32 = 250.0;
/// Most dice a single roll or macro entry may ask for.
pub const MAX_DICE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiceCommand {
    SelectDie(DieType),
    Roll,
    Advantage,
    Disadvantage,
    AddToMacro,
    SaveMacro,
    ClearMacro,
    RollMacro(usize),
    DeleteMacro(usize),
}

pub struct DiceRollerScreen {
    state: ScreenState,
    roller: Rc<RefCell<DiceRoller>>,
    saves: SaveStore,
    count: TextBox,
    modifier: TextBox,
    macro_name: TextBox,
    die_buttons: Vec<(DieType, Button)>,
    roll: Button,
    advantage: Button,
    disadvantage: Button,
    add_to_macro: Button,
    save_macro: Button,
    clear_macro: Button,
    macro_buttons: Vec<(Button, Button)>,
    die: DieType,
    draft: DiceMacro,
    macros: Vec<DiceMacro>,
    result: String,
    queue: CommandQueue<DiceCommand>,
}

impl DiceRollerScreen {
    pub fn new(roller: Rc<RefCell<DiceRoller>>, saves: SaveStore) -> Self {
        let macros = match saves.load_macros() {
            Ok(Some(macros)) => macros,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("ignoring saved dice macros: {e:#}");
                Vec::new()
            }
        };

        let queue = CommandQueue::new();
        let row = |y: f32, x: f32, w: f32| (Position::new(x, y), Size::new(w, ROW_HEIGHT));

        let die_buttons = DieType::ALL
            .iter()
            .enumerate()
            .map(|(i, &die)| {
                let (pos, size) = row(50.0, MARGIN + i as f32 * (DIE_BUTTON_WIDTH + 6.0), DIE_BUTTON_WIDTH);
                (die, queue.button(die.to_string(), pos, size, DiceCommand::SelectDie(die)))
            })
            .collect();

        let (p, s) = row(90.0, MARGIN, 100.0);
        let roll = queue.button("Roll", p, s, DiceCommand::Roll);
        let (p, s) = row(90.0, 120.0, 120.0);
        let advantage = queue.button("Advantage", p, s, DiceCommand::Advantage);
        let (p, s) = row(90.0, 250.0, 130.0);
        let disadvantage = queue.button("Disadvantage", p, s, DiceCommand::Disadvantage);
        let (p, s) = row(170.0, 220.0, 120.0);
        let add_to_macro = queue.button("Add dice", p, s, DiceCommand::AddToMacro);
        let (p, s) = row(170.0, 350.0, 130.0);
        let save_macro = queue.button("Save macro", p, s, DiceCommand::SaveMacro);
        let (p, s) = row(170.0, 490.0, 80.0);
        let clear_macro = queue.button("Clear", p, s, DiceCommand::ClearMacro);

        let mut screen = Self {
            state: ScreenState::new(),
            roller,
            saves,
            count: TextBox::new(Position::new(MARGIN, MARGIN), Size::new(130.0, ROW_HEIGHT))
                .with_label("Count:")
                .with_allowed(numeric_keys)
                .with_value("1")
                .centered(),
            modifier: TextBox::new(Position::new(150.0, MARGIN), Size::new(120.0, ROW_HEIGHT))
                .with_label("Mod:")
                .with_allowed(signed_numeric_keys)
                .with_value("0")
                .centered(),
            macro_name: TextBox::new(Position::new(MARGIN, 170.0), Size::new(200.0, ROW_HEIGHT))
                .with_label("Macro:"),
            die_buttons,
            roll,
            advantage,
            disadvantage,
            add_to_macro,
            save_macro,
            clear_macro,
            macro_buttons: Vec::new(),
            die: DieType::D20,
            draft: DiceMacro::new("", 0),
            macros,
            result: String::new(),
            queue,
        };
        screen.rebuild_macro_buttons();
        screen
    }

    pub fn die(&self) -> DieType {
        self.die
    }

    pub fn result(&self) -> &str {
        &self.result
    }

    pub fn macros(&self) -> &[DiceMacro] {
        &self.macros
    }

    pub fn draft(&self) -> &DiceMacro {
        &self.draft
    }

    pub fn count_box(&mut self) -> &mut TextBox {
        &mut self.count
    }

    pub fn modifier_box(&mut self) -> &mut TextBox {
        &mut self.modifier
    }

    pub fn macro_name_box(&mut self) -> &mut TextBox {
        &mut self.macro_name
    }

    pub fn roll_button(&self) -> &Button {
        &self.roll
    }

    pub fn advantage_button(&self) -> &Button {
        &self.advantage
    }

    fn count(&self) -> Option<u32> {
        parse_unsigned(self.count.value()).filter(|&c| c <= MAX_DICE)
    }

    /// An empty modifier box means no modifier.
    fn modifier(&self) -> Option<i32> {
        if self.modifier.value().trim().is_empty() {
            Some(0)
        } else {
            parse_signed(self.modifier.value())
        }
    }

    fn rebuild_macro_buttons(&mut self) {
        self.macro_buttons = self
            .macros
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let y = MACRO_TOP + i as f32 * (ROW_HEIGHT + 4.0);
                let roll = self.queue.button(
                    m.to_string(),
                    Position::new(MARGIN, y),
                    Size::new(400.0, ROW_HEIGHT),
                    DiceCommand::RollMacro(i),
                );
                let delete = self.queue.button(
                    "X",
                    Position::new(MARGIN + 406.0, y),
                    Size::new(ROW_HEIGHT, ROW_HEIGHT),
                    DiceCommand::DeleteMacro(i),
                );
                (roll, delete)
            })
            .collect();
    }

    fn persist_macros(&self) {
        if let Err(e) = self.saves.save_macros(&self.macros) {
            warn!("could not save dice macros: {e:#}");
        }
    }

    pub fn apply(&mut self, command: DiceCommand) {
        match command {
            DiceCommand::SelectDie(die) => self.die = die,
            DiceCommand::Roll => {
                if let (Some(count), Some(modifier)) = (self.count(), self.modifier()) {
                    let result = self.roller.borrow_mut().roll_many(count, self.die, modifier);
                    self.result = format!("{count}{}: {result}", self.die);
                }
            }
            DiceCommand::Advantage | DiceCommand::Disadvantage => {
                let want_max = command == DiceCommand::Advantage;
                let roll = self.roller.borrow_mut().advantage_disadvantage(want_max, self.die);
                self.result = format!(
                    "{} {}: [{}, {}] -> {}",
                    if want_max { "Advantage" } else { "Disadvantage" },
                    self.die,
                    roll.rolls[0],
                    roll.rolls[1],
                    roll.selected
                );
            }
            DiceCommand::AddToMacro => {
                if let Some(count) = self.count().filter(|&c| c > 0) {
                    let draft = std::mem::replace(&mut self.draft, DiceMacro::new("", 0));
                    self.draft = draft.with_dice(self.die, count);
                }
            }
            DiceCommand::SaveMacro => {
                let name = self.macro_name.value().trim().to_string();
                let Some(modifier) = self.modifier() else {
                    return;
                };
                if name.is_empty() || self.draft.is_empty() {
                    return;
                }
                let mut recipe = std::mem::replace(&mut self.draft, DiceMacro::new("", 0));
                recipe.name = name;
                recipe.modifier = modifier;
                info!("saved macro {recipe}");
                self.macros.push(recipe);
                self.macro_name.clear();
                self.rebuild_macro_buttons();
                self.persist_macros();
            }
            DiceCommand::ClearMacro => self.draft = DiceMacro::new("", 0),
            DiceCommand::RollMacro(i) => {
                if let Some(recipe) = self.macros.get(i) {
                    let result = self.roller.borrow_mut().roll_macro(recipe);
                    let blocks: Vec<String> = result
                        .blocks
                        .iter()
                        .map(|(die, rolls)| {
                            let faces: Vec<String> = rolls.iter().map(|r| r.to_string()).collect();
                            format!("{die} [{}]", faces.join(", "))
                        })
                        .collect();
                    self.result = format!("{}: {} {:+} = {}", result.name, blocks.join(" "), result.modifier, result.total);
                }
            }
            DiceCommand::DeleteMacro(i) => {
                if i < self.macros.len() {
                    let removed = self.macros.remove(i);
                    info!("deleted macro {}", removed.name);
                    self.rebuild_macro_buttons();
                    self.persist_macros();
                }
            }
        }
    }
}

impl Screen for DiceRollerScreen {
    fn state(&self) -> &ScreenState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ScreenState {
        &mut self.state
    }

    fn title(&self) -> &str {
        "dice roller"
    }

    fn update(&mut self, _ctx: &UiContext) {
        let valid = self.count().is_some() && self.modifier().is_some();
        self.roll.set_enabled(valid);
        self.add_to_macro.set_enabled(self.count().map_or(false, |c| c > 0));
        self.save_macro.set_enabled(
            !self.macro_name.value().trim().is_empty()
                && !self.draft.is_empty()
                && self.modifier().is_some(),
        );
        self.clear_macro.set_enabled(!self.draft.dice.is_empty());
    }

    fn handle_events(&mut self, events: &[UiEvent], ctx: &UiContext) {
        self.count.handle_events(events, ctx);
        self.modifier.handle_events(events, ctx);
        self.macro_name.handle_events(events, ctx);
        for (_, button) in self.die_buttons.iter_mut() {
            button.handle_events(events, ctx);
        }
        for button in [
            &mut self.roll,
            &mut self.advantage,
            &mut self.disadvantage,
            &mut self.add_to_macro,
            &mut self.save_macro,
            &mut self.clear_macro,
        ] {
            button.handle_events(events, ctx);
        }
        for (roll, delete) in self.macro_buttons.iter_mut() {
            roll.handle_events(events, ctx);
            delete.handle_events(events, ctx);
        }

        for command in self.queue.drain() {
            self.apply(command);
        }

        if events.iter().any(|e| e.is_key_up(Key::Escape)) {
            self.close();
        }
    }

    fn draw(&self, cmds: &mut RenderCommands, ctx: &UiContext) {
        let theme = ctx.theme;
        self.count.draw(cmds, ctx);
        self.modifier.draw(cmds, ctx);
        for (die, button) in &self.die_buttons {
            button.draw(cmds, ctx);
            if *die == self.die {
                let r = button.rect();
                cmds.draw_rect(
                    Rectangle::new(r.x - 2.0, r.y - 2.0, r.width + 4.0, r.height + 4.0),
                    None,
                    Some((theme.field_border_selected, 2.0)),
                );
            }
        }
        self.roll.draw(cmds, ctx);
        self.advantage.draw(cmds, ctx);
        self.disadvantage.draw(cmds, ctx);

        if !self.result.is_empty() {
            draw_text(cmds, ctx.measure, &self.result, Position::new(MARGIN, 130.0), theme.text, false);
        }

        self.macro_name.draw(cmds, ctx);
        self.add_to_macro.draw(cmds, ctx);
        self.save_macro.draw(cmds, ctx);
        self.clear_macro.draw(cmds, ctx);
        if !self.draft.dice.is_empty() {
            cmds.draw_text(format!("Draft: {}", self.draft), Position::new(MARGIN, 210.0), theme.text);
        }

        for (roll, delete) in &self.macro_buttons {
            roll.draw(cmds, ctx);
            delete.draw(cmds, ctx);
        }
    }

    fn on_close(&mut self) {
        self.persist_macros();
    }
}
