use super::{CommandQueue, Services};
use crate::assets::{AssetKind, FilePicker};
use crate::audio::{Mixer, MusicState};
use crate::input::{Key, UiEvent};
use crate::layout::split_row;
use crate::screen::{Screen, ScreenState};
use crate::traits::{Component, UiContext};
use crate::ui::{draw_text, RenderCommands};
use crate::utils::{Rectangle, Size};
use crate::widgets::button::Button;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

const ROW_HEIGHT: f32 = 30.0;
const ROW_GAP: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCommand {
    NextTrack,
    Play,
    Pause,
    Stop,
    LoadSlot(usize),
    PlaySlot(usize),
    StopSlot(usize),
}

struct Row {
    label: Rectangle,
    buttons: Vec<Button>,
}

pub struct SoundScreen {
    state: ScreenState,
    mixer: Rc<RefCell<Mixer>>,
    picker: Rc<RefCell<dyn FilePicker>>,
    music: Row,
    slots: Vec<Row>,
    queue: CommandQueue<SoundCommand>,
}

impl SoundScreen {
    pub fn new(services: &Services, viewport: Size) -> Self {
        let queue = CommandQueue::new();
        let row_rect = |i: usize| {
            Rectangle::new(0.0, i as f32 * (ROW_HEIGHT + ROW_GAP), viewport.width, ROW_HEIGHT)
        };
        let make_row = |rect: Rectangle, buttons: &[(&str, SoundCommand)]| {
            let mut weights = vec![3.0];
            weights.extend(std::iter::repeat(1.0).take(buttons.len()));
            let cells = split_row(rect, &weights);
            Row {
                label: cells[0],
                buttons: buttons
                    .iter()
                    .zip(&cells[1..])
                    .map(|((text, command), cell)| queue.button(*text, cell.pos(), cell.size(), *command))
                    .collect(),
            }
        };

        let music = make_row(
            row_rect(0),
            &[
                ("Next", SoundCommand::NextTrack),
                ("|>", SoundCommand::Play),
                ("||", SoundCommand::Pause),
                ("X", SoundCommand::Stop),
            ],
        );
        let slot_count = services.mixer.borrow().slots().len();
        let slots = (0..slot_count)
            .map(|i| {
                make_row(
                    row_rect(i + 1),
                    &[
                        ("Load", SoundCommand::LoadSlot(i)),
                        ("|>", SoundCommand::PlaySlot(i)),
                        ("X", SoundCommand::StopSlot(i)),
                    ],
                )
            })
            .collect();

        Self {
            state: ScreenState::new(),
            mixer: services.mixer.clone(),
            picker: services.picker.clone(),
            music,
            slots,
            queue,
        }
    }

    pub fn apply(&mut self, command: SoundCommand) {
        match command {
            SoundCommand::NextTrack => {
                let picked = self.picker.borrow_mut().pick(AssetKind::Music);
                if let Some(path) = picked {
                    self.mixer.borrow_mut().set_track(path);
                }
            }
            SoundCommand::Play => self.mixer.borrow_mut().play(),
            SoundCommand::Pause => self.mixer.borrow_mut().pause(),
            SoundCommand::Stop => self.mixer.borrow_mut().stop(),
            SoundCommand::LoadSlot(i) => {
                let picked = self.picker.borrow_mut().pick(AssetKind::Sounds);
                if let Some(path) = picked {
                    self.mixer.borrow_mut().load_slot(i, path);
                }
            }
            SoundCommand::PlaySlot(i) => self.mixer.borrow_mut().play_slot(i),
            SoundCommand::StopSlot(i) => self.mixer.borrow_mut().stop_slot(i),
        }
    }

    fn rows_mut(&mut self) -> impl Iterator<Item = &mut Row> {
        std::iter::once(&mut self.music).chain(self.slots.iter_mut())
    }
}

fn file_name(path: Option<&Path>, empty: &str) -> String {
    path.and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| empty.to_string())
}

fn draw_row(cmds: &mut RenderCommands, ctx: &UiContext, row: &Row, text: &str) {
    cmds.draw_rect(row.label, Some(ctx.theme.field_fill), Some((ctx.theme.field_border_idle, 1.0)));
    draw_text(cmds, ctx.measure, text, row.label.center(), ctx.theme.text, true);
    for button in &row.buttons {
        button.draw(cmds, ctx);
    }
}

impl Screen for SoundScreen {
    fn state(&self) -> &ScreenState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ScreenState {
        &mut self.state
    }

    fn title(&self) -> &str {
        "sound player"
    }

    fn update(&mut self, _ctx: &UiContext) {
        let mixer = self.mixer.borrow();
        let state = mixer.music_state();
        let has_track = mixer.track().is_some();
        // Next, play, pause, stop.
        let enabled = [
            true,
            has_track && state != MusicState::Playing,
            state == MusicState::Playing,
            state != MusicState::Stopped,
        ];
        for (button, on) in self.music.buttons.iter_mut().zip(enabled) {
            button.set_enabled(on);
        }
        for (row, slot) in self.slots.iter_mut().zip(mixer.slots()) {
            if let [_, play, stop] = row.buttons.as_mut_slice() {
                play.set_enabled(slot.path.is_some());
                stop.set_enabled(slot.playing);
            }
        }
    }

    fn handle_events(&mut self, events: &[UiEvent], ctx: &UiContext) {
        for row in self.rows_mut() {
            for button in row.buttons.iter_mut() {
                button.handle_events(events, ctx);
            }
        }
        for command in self.queue.drain() {
            self.apply(command);
        }
        if events.iter().any(|e| e.is_key_up(Key::Escape)) {
            self.close();
        }
    }

    fn draw(&self, cmds: &mut RenderCommands, ctx: &UiContext) {
        let mixer = self.mixer.borrow();
        let status = match mixer.music_state() {
            MusicState::Stopped => "",
            MusicState::Playing => " (playing)",
            MusicState::Paused => " (paused)",
        };
        let track = format!("{}{status}", file_name(mixer.track(), "no track"));
        draw_row(cmds, ctx, &self.music, &track);

        for (i, (row, slot)) in self.slots.iter().zip(mixer.slots()).enumerate() {
            let name = file_name(slot.path.as_deref(), &format!("slot {}", i + 1));
            draw_row(cmds, ctx, row, &name);
        }
    }
}
