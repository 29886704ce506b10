mod common;

use common::*;
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use waids_wyverns::audio::MusicState;
use waids_wyverns::config::AppConfig;
use waids_wyverns::dice::{DiceRoller, DieType};
use waids_wyverns::input::{Key, UiEvent};
use waids_wyverns::persistence::SaveStore;
use waids_wyverns::screen::{FrameOutcome, Screen, ScreenStack};
use waids_wyverns::screens::dice_roller::{DiceCommand, DiceRollerScreen, MAX_DICE};
use waids_wyverns::screens::initiative::InitiativeScreen;
use waids_wyverns::screens::map::MapScreen;
use waids_wyverns::screens::notes::NotesScreen;
use waids_wyverns::screens::sound::{SoundCommand, SoundScreen};
use waids_wyverns::screens::spells::SpellListScreen;
use waids_wyverns::screens::weather::{validate, WeatherTimeScreen};
use waids_wyverns::screens::{MenuScreen, Services};
use waids_wyverns::spells::SpellBook;
use waids_wyverns::traits::Draggable;
use waids_wyverns::ui::{RenderCommands, Theme};
use waids_wyverns::utils::Position;

fn services(root: &Path) -> Services {
    let config = AppConfig {
        asset_root: root.join("assets"),
        save_dir: root.join("saves"),
        spell_file: root.join("spells.json"),
        dice_seed: Some(1),
        sound_slots: 2,
        ..AppConfig::default()
    };
    Services::from_config(&config)
}

struct Driver {
    stack: ScreenStack,
    measure: waids_wyverns::text::MonoMetrics,
    cmds: RenderCommands,
}

impl Driver {
    fn new<S: Screen + 'static>(screen: Rc<RefCell<S>>) -> Self {
        Self {
            stack: ScreenStack::new(screen, Theme::default(), VIEWPORT),
            measure: mono(),
            cmds: RenderCommands::new(),
        }
    }

    fn frame(&mut self, events: &[UiEvent]) -> FrameOutcome {
        self.stack.run_frame(events, &self.measure, &mut self.cmds)
    }

    fn texts_starting(&self, prefix: &str) -> Vec<String> {
        self.cmds
            .texts()
            .filter(|t| t.starts_with(prefix))
            .map(str::to_string)
            .collect()
    }
}

fn fill_character(screen: &Rc<RefCell<InitiativeScreen>>, name: &str, init: &str, hp: &str) {
    let mut s = screen.borrow_mut();
    s.name_box().set_value(name);
    s.initiative_box().set_value(init);
    s.health_box().set_value(hp);
}

const ADD: (f32, f32) = (500.0, 20.0);
const REMOVE: (f32, f32) = (50.0, 60.0);
const SET_HP: (f32, f32) = (200.0, 60.0);

/// Centre of list row `row` with a 20px line height.
fn row(row: usize) -> (f32, f32) {
    (50.0, 95.0 + (row as f32 + 1.0) * 20.0 + 10.0)
}

#[test]
fn initiative_screen_lists_in_turn_order() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let saves = SaveStore::new(tmp.path());
    let screen = Rc::new(RefCell::new(InitiativeScreen::new(saves.clone(), VIEWPORT)));
    let mut ui = Driver::new(screen.clone());

    for (name, init, hp) in [("Bard", "5", "10"), ("Ogre", "9", "59"), ("Imp", "5", "6")] {
        fill_character(&screen, name, init, hp);
        ui.frame(&click(ADD.0, ADD.1));
    }
    assert_eq!(screen.borrow().tracker().len(), 3);
    assert_eq!(screen.borrow_mut().name_box().value(), "");
    assert_eq!(
        ui.texts_starting("Initiative: "),
        vec![
            "Initiative: 9, Name: Ogre, Health: 59",
            "Initiative: 5, Name: Bard, Health: 10",
            "Initiative: 5, Name: Imp, Health: 6",
        ]
    );

    // Missing initiative keeps Add disabled.
    fill_character(&screen, "Lich", "", "80");
    ui.frame(&click(ADD.0, ADD.1));
    assert_eq!(screen.borrow().tracker().len(), 3);

    // Enter adds once the inputs are valid.
    fill_character(&screen, "Lich", "-2", "80");
    ui.frame(&[key_up(Key::Enter)]);
    assert_eq!(screen.borrow().tracker().len(), 4);
}

#[test]
fn initiative_screen_edits_selection_and_saves() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let saves = SaveStore::new(tmp.path());
    let screen = Rc::new(RefCell::new(InitiativeScreen::new(saves.clone(), VIEWPORT)));
    let mut ui = Driver::new(screen.clone());
    for (name, init, hp) in [("Bard", "5", "10"), ("Ogre", "9", "59")] {
        fill_character(&screen, name, init, hp);
        ui.frame(&click(ADD.0, ADD.1));
    }

    let (x, y) = row(1);
    ui.frame(&click(x, y));
    let bard = screen.borrow().selected().expect("row selected");
    assert_eq!(screen.borrow().tracker().get(bard).map(|c| c.name.as_str()), Some("Bard"));

    screen.borrow_mut().health_box().set_value("3");
    ui.frame(&click(SET_HP.0, SET_HP.1));
    assert_eq!(screen.borrow().tracker().get(bard).map(|c| c.health), Some(3));

    ui.frame(&click(REMOVE.0, REMOVE.1));
    assert!(screen.borrow().tracker().get(bard).is_none());
    assert_eq!(screen.borrow().selected(), None);

    assert_eq!(ui.frame(&[key_up(Key::Escape)]), FrameOutcome::Quit);
    let saved = saves.load_initiative().expect("read").expect("saved");
    assert_eq!(saved.characters().len(), 1);
    assert_eq!(saved.characters()[0].name, "Ogre");

    let reopened = InitiativeScreen::new(saves, VIEWPORT);
    assert_eq!(reopened.tracker().len(), 1);
}

fn dice_screen(saves: SaveStore, faces: &[u32]) -> DiceRollerScreen {
    let roller = Rc::new(RefCell::new(DiceRoller::new(Scripted::new(faces))));
    DiceRollerScreen::new(roller, saves)
}

#[test]
fn dice_screen_rolls_from_buttons() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let screen = Rc::new(RefCell::new(dice_screen(SaveStore::new(tmp.path()), &[3])));
    let mut ui = Driver::new(screen.clone());

    // d6 is the second die button; Roll sits below the row.
    let mut events = click(100.0, 65.0);
    events.extend(click(50.0, 105.0));
    ui.frame(&events);
    assert_eq!(screen.borrow().die(), DieType::D6);
    assert_eq!(screen.borrow().result(), "1d6: [3] = 3");
}

#[test]
fn dice_screen_roll_variants() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let mut screen = dice_screen(SaveStore::new(tmp.path()), &[3, 4, 3, 5, 6, 4]);

    screen.count_box().set_value("2");
    screen.modifier_box().set_value("-1");
    screen.apply(DiceCommand::SelectDie(DieType::D6));
    screen.apply(DiceCommand::Roll);
    assert_eq!(screen.result(), "2d6: [3, 4] -1 = 6");

    screen.apply(DiceCommand::SelectDie(DieType::D20));
    screen.apply(DiceCommand::Advantage);
    assert_eq!(screen.result(), "Advantage d20: [3, 5] -> 5");
    screen.apply(DiceCommand::Disadvantage);
    assert_eq!(screen.result(), "Disadvantage d20: [6, 4] -> 4");

    // Count 0 rolls nothing and leaves only the modifier.
    screen.count_box().set_value("0");
    screen.modifier_box().set_value("5");
    screen.apply(DiceCommand::Roll);
    assert_eq!(screen.result(), "0d20: [] +5 = 5");
}

#[test]
fn dice_screen_caps_the_count() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let screen = Rc::new(RefCell::new(dice_screen(SaveStore::new(tmp.path()), &[])));
    let mut ui = Driver::new(screen.clone());

    screen.borrow_mut().count_box().set_value(&MAX_DICE.to_string());
    ui.frame(&[]);
    assert!(screen.borrow().roll_button().is_enabled());

    screen.borrow_mut().count_box().set_value(&(MAX_DICE + 1).to_string());
    ui.frame(&[]);
    assert!(!screen.borrow().roll_button().is_enabled());
    // Advantage reads only the selected die.
    assert!(screen.borrow().advantage_button().is_enabled());

    screen.borrow_mut().apply(DiceCommand::Roll);
    assert_eq!(screen.borrow().result(), "");
}

#[test]
fn dice_macros_are_built_rolled_and_persisted() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let saves = SaveStore::new(tmp.path());
    let mut screen = dice_screen(saves.clone(), &[1, 2, 4]);

    screen.count_box().set_value("2");
    screen.apply(DiceCommand::SelectDie(DieType::D6));
    screen.apply(DiceCommand::AddToMacro);
    screen.count_box().set_value("1");
    screen.apply(DiceCommand::SelectDie(DieType::D4));
    screen.apply(DiceCommand::AddToMacro);
    assert_eq!(screen.draft().to_string(), "2d6 + 1d4");

    // A macro needs a name.
    screen.apply(DiceCommand::SaveMacro);
    assert!(screen.macros().is_empty());

    screen.macro_name_box().set_value("fireball");
    screen.modifier_box().set_value("+3");
    screen.apply(DiceCommand::SaveMacro);
    assert_eq!(screen.macros().len(), 1);
    assert!(screen.draft().is_empty());
    assert_eq!(
        saves.load_macros().expect("read").map(|m| m.len()),
        Some(1)
    );

    screen.apply(DiceCommand::RollMacro(0));
    assert_eq!(screen.result(), "fireball: d6 [1, 2] d4 [4] +3 = 10");

    let reopened = dice_screen(saves.clone(), &[]);
    assert_eq!(reopened.macros()[0].to_string(), "fireball: 2d6 + 1d4 +3");

    screen.apply(DiceCommand::DeleteMacro(0));
    screen.apply(DiceCommand::DeleteMacro(0));
    assert!(screen.macros().is_empty());
    assert_eq!(saves.load_macros().expect("read"), Some(Vec::new()));
}

const ADD_CHARACTER: (f32, f32) = (550.0, 25.0);
const CHANGE_MAP: (f32, f32) = (550.0, 60.0);
const TOGGLE_REMOVE: (f32, f32) = (550.0, 95.0);

#[test]
fn map_tokens_drag_zoom_and_persist() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let services = services(tmp.path());
    write_png(&tmp.path().join("assets/images/characters/orc.png"));
    write_png(&tmp.path().join("assets/images/maps/cave.png"));

    let screen = Rc::new(RefCell::new(MapScreen::new(services.clone(), VIEWPORT)));
    let mut ui = Driver::new(screen.clone());

    let mut events = click(ADD_CHARACTER.0, ADD_CHARACTER.1);
    events.extend(click(CHANGE_MAP.0, CHANGE_MAP.1));
    ui.frame(&events);
    assert_eq!(screen.borrow().tokens().len(), 1);
    assert!(screen.borrow().map_image().is_some());
    assert_eq!(screen.borrow().tokens()[0].position(), Position::new(0.0, 0.0));

    ui.frame(&[
        down(50.0, 50.0),
        motion(200.0, 200.0, waids_wyverns::input::MouseButtons::PRIMARY),
        up(200.0, 200.0),
    ]);
    assert_eq!(screen.borrow().tokens()[0].map_position(), Position::new(150.0, 150.0));

    ui.frame(&[UiEvent::Wheel {
        lines: 1.0,
        pos: Position::new(320.0, 240.0),
    }]);
    let view = screen.borrow().view();
    assert!((view.zoom() - 1.2).abs() < 1e-5);
    let on_screen = screen.borrow().tokens()[0].position();
    assert!((on_screen.x - 116.0).abs() < 1e-3 && (on_screen.y - 132.0).abs() < 1e-3);

    assert_eq!(ui.frame(&[key_up(Key::Escape)]), FrameOutcome::Quit);
    let restored = MapScreen::new(services, VIEWPORT);
    assert_eq!(restored.tokens().len(), 1);
    assert_eq!(restored.tokens()[0].map_position(), Position::new(150.0, 150.0));
    assert!((restored.view().zoom() - 1.2).abs() < 1e-5);
    assert!(restored.map_image().is_some());
}

#[test]
fn map_remove_mode_deletes_topmost_token() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let services = services(tmp.path());
    write_png(&tmp.path().join("assets/images/characters/orc.png"));

    let images = services.images.clone();
    let screen = Rc::new(RefCell::new(MapScreen::new(services, VIEWPORT)));
    let mut ui = Driver::new(screen.clone());
    let mut events = click(ADD_CHARACTER.0, ADD_CHARACTER.1);
    events.extend(click(ADD_CHARACTER.0, ADD_CHARACTER.1));
    ui.frame(&events);
    assert_eq!(screen.borrow().tokens().len(), 2);
    assert_eq!(images.borrow().len(), 2);

    // Overlapping tokens: only the top one follows the pointer.
    ui.frame(&[
        down(50.0, 50.0),
        motion(250.0, 50.0, waids_wyverns::input::MouseButtons::PRIMARY),
        up(250.0, 50.0),
    ]);
    assert_eq!(screen.borrow().tokens()[0].map_position(), Position::new(0.0, 0.0));
    assert_eq!(screen.borrow().tokens()[1].map_position(), Position::new(200.0, 0.0));

    ui.frame(&click(TOGGLE_REMOVE.0, TOGGLE_REMOVE.1));
    assert!(screen.borrow().is_remove_mode());
    ui.frame(&click(250.0, 50.0));
    assert_eq!(screen.borrow().tokens().len(), 1);
    assert_eq!(screen.borrow().tokens()[0].map_position(), Position::new(0.0, 0.0));
    assert_eq!(images.borrow().len(), 1);
    assert_eq!(ui.texts_starting("remove mode"), vec!["remove mode"]);
}

#[test]
fn dropping_a_token_on_a_button_does_not_press_it() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let services = services(tmp.path());
    write_png(&tmp.path().join("assets/images/characters/orc.png"));

    let screen = Rc::new(RefCell::new(MapScreen::new(services, VIEWPORT)));
    let mut ui = Driver::new(screen.clone());
    ui.frame(&click(ADD_CHARACTER.0, ADD_CHARACTER.1));
    assert_eq!(screen.borrow().tokens().len(), 1);

    ui.frame(&[
        down(50.0, 50.0),
        motion(TOGGLE_REMOVE.0, TOGGLE_REMOVE.1, waids_wyverns::input::MouseButtons::PRIMARY),
        up(TOGGLE_REMOVE.0, TOGGLE_REMOVE.1),
    ]);
    assert!(!screen.borrow().is_remove_mode());
    assert_eq!(screen.borrow().tokens().len(), 1);
}

#[test]
fn sound_screen_drives_the_mixer() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let services = services(tmp.path());
    let music = tmp.path().join("assets/music");
    let sounds = tmp.path().join("assets/sounds");
    fs::create_dir_all(&music).expect("mkdir");
    fs::create_dir_all(&sounds).expect("mkdir");
    fs::write(music.join("a_tavern.ogg"), b"").expect("write");
    fs::write(music.join("b_battle.mp3"), b"").expect("write");
    fs::write(sounds.join("door.wav"), b"").expect("write");

    let mut screen = SoundScreen::new(&services, VIEWPORT);
    screen.apply(SoundCommand::Play);
    assert_eq!(services.mixer.borrow().music_state(), MusicState::Stopped);

    screen.apply(SoundCommand::NextTrack);
    screen.apply(SoundCommand::Play);
    assert_eq!(services.mixer.borrow().music_state(), MusicState::Playing);
    screen.apply(SoundCommand::Pause);
    assert_eq!(services.mixer.borrow().music_state(), MusicState::Paused);
    screen.apply(SoundCommand::NextTrack);
    assert_eq!(services.mixer.borrow().music_state(), MusicState::Stopped);
    assert_eq!(
        services.mixer.borrow().track(),
        Some(music.join("b_battle.mp3").as_path())
    );

    screen.apply(SoundCommand::LoadSlot(1));
    screen.apply(SoundCommand::PlaySlot(1));
    assert!(services.mixer.borrow().slots()[1].playing);
    screen.apply(SoundCommand::StopSlot(1));
    assert!(!services.mixer.borrow().slots()[1].playing);

    let mut ui = Driver::new(Rc::new(RefCell::new(screen)));
    ui.frame(&[]);
    let texts: Vec<&str> = ui.cmds.texts().collect();
    assert!(texts.contains(&"b_battle.mp3"));
    assert!(texts.contains(&"slot 1"));
    assert!(texts.contains(&"door.wav"));
}

#[test]
fn notes_persist_on_close() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let saves = SaveStore::new(tmp.path());
    saves.save_notes("hello").expect("write");

    let screen = Rc::new(RefCell::new(NotesScreen::new(saves.clone(), VIEWPORT)));
    let mut ui = Driver::new(screen.clone());
    ui.frame(&typed(" there"));
    assert_eq!(screen.borrow().text(), "hello there");
    ui.frame(&[key_up(Key::Escape)]);
    assert_eq!(saves.load_notes().expect("read").as_deref(), Some("hello there"));
}

#[test]
fn notes_keep_tabs_and_line_breaks() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let saves = SaveStore::new(tmp.path());
    saves.save_notes("a\tb\r\nc").expect("write");

    let screen = Rc::new(RefCell::new(NotesScreen::new(saves.clone(), VIEWPORT)));
    assert_eq!(screen.borrow().text(), "a\tb\nc");

    let mut ui = Driver::new(screen.clone());
    ui.frame(&[
        UiEvent::Paste("x\ty".into()),
        UiEvent::KeyDown(Key::Tab),
        UiEvent::KeyDown(Key::Character('z')),
    ]);
    assert_eq!(screen.borrow().text(), "a\tb\ncx\ty\tz");

    ui.frame(&[key_up(Key::Escape)]);
    let saved = saves.load_notes().expect("read").expect("saved");
    assert_eq!(saved, "a\tb\ncx\ty\tz");
    assert_eq!(NotesScreen::new(saves, VIEWPORT).text(), saved);
}

#[test]
fn spell_screen_shows_matches_only() {
    let book = SpellBook::from_json(r#"{"Fireball": {"level": 3}, "Fire Bolt": {"level": "cantrip"}, "Shield": {"level": 1}}"#)
        .expect("parse");
    let mut screen = SpellListScreen::new(Rc::new(book), VIEWPORT);
    assert!(screen.visible_lines().is_empty());
    screen.search_box().set_value("FIRE");
    assert_eq!(screen.visible_lines(), vec!["Fire Bolt cantrip", "Fireball 3"]);
    screen.search_box().set_value("1");
    assert_eq!(screen.visible_lines(), vec!["Shield 1"]);
}

#[test]
fn weather_inputs_are_validated() {
    assert_eq!(validate("rain", "7", "05"), Some(("rain".to_string(), 7, 5)));
    assert_eq!(validate("", "7", "05"), None);
    assert_eq!(validate("rain", "0", "05"), None);
    assert_eq!(validate("rain", "13", "05"), None);
    assert_eq!(validate("rain", "12", "60"), None);
    assert_eq!(validate("rain", "", "00"), None);
}

#[test]
fn weather_screen_applies_changes() {
    let screen = Rc::new(RefCell::new(WeatherTimeScreen::new()));
    let mut ui = Driver::new(screen.clone());
    assert_eq!(
        screen.borrow().current().to_string(),
        "Weather: calm\nTime: 12:00 P.M."
    );

    {
        let mut s = screen.borrow_mut();
        s.weather_box().set_value("stormy");
        s.hour_box().set_value("7");
        s.minute_box().set_value("30");
    }
    let mut events = click(390.0, 25.0);
    events.extend(click(540.0, 25.0));
    ui.frame(&events);
    assert_eq!(
        screen.borrow().current().to_string(),
        "Weather: stormy\nTime: 7:30 A.M."
    );

    screen.borrow_mut().hour_box().set_value("13");
    ui.frame(&[]);
    assert!(!screen.borrow().change_button().is_enabled());
    ui.frame(&click(540.0, 25.0));
    assert_eq!(screen.borrow().current().hour, 7);
}

#[test]
fn menu_opens_and_returns() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let services = services(tmp.path());
    let menu = Rc::new(RefCell::new(MenuScreen::with_services(&services, VIEWPORT)));
    assert_eq!(menu.borrow().buttons().len(), 7);
    let mut ui = Driver::new(menu);

    ui.frame(&click(320.0, 25.0));
    assert_eq!(ui.stack.depth(), 2);
    assert_eq!(ui.stack.top().expect("top").borrow().title(), "map");

    ui.frame(&[key_up(Key::Escape)]);
    assert_eq!(ui.stack.depth(), 1);

    ui.frame(&click(320.0, 265.0));
    assert_eq!(ui.stack.top().expect("top").borrow().title(), "weather and time");

    // Escape on the menu itself does nothing.
    ui.frame(&[key_up(Key::Escape)]);
    assert_eq!(ui.frame(&[key_up(Key::Escape)]), FrameOutcome::Continue);
    assert_eq!(ui.stack.depth(), 1);
}
