//! Battle map with draggable, scalable character tokens.

use super::{CommandQueue, Services};
use crate::assets::{AssetKind, ImageId};
use crate::camera::MapView;
use crate::input::{Key, UiEvent};
use crate::layout::{anchor_rect, column, Anchors, HAnchor, Margins, VAnchor};
use crate::persistence::{MapSave, TokenSave};
use crate::screen::{Screen, ScreenState};
use crate::traits::{Component, Draggable, Scalable, UiContext};
use crate::ui::RenderCommands;
use crate::utils::{Position, Rectangle, Size};
use crate::widgets::button::Button;
use crate::widgets::drag::DragAndScale;
use log::{info, warn};
use std::path::{Path, PathBuf};

pub const TOKEN_SIZE: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    AddCharacter,
    ChangeMap,
    ToggleRemove,
}

/// A character image placed on the map. Position and size are stored in map
/// space; the host accessors work in screen space through `view`.
#[derive(Debug, Clone)]
pub struct Token {
    image: ImageId,
    path: PathBuf,
    map_pos: Position,
    size: f32,
    view: MapView,
    pointer: DragAndScale,
}

impl Token {
    pub fn new(image: ImageId, path: PathBuf, map_pos: Position, size: f32, view: MapView) -> Self {
        Self {
            image,
            path,
            map_pos,
            size,
            view,
            pointer: DragAndScale::default(),
        }
    }

    pub fn image(&self) -> ImageId {
        self.image
    }

    pub fn map_position(&self) -> Position {
        self.map_pos
    }

    pub fn set_view(&mut self, view: MapView) {
        self.view = view;
    }

    pub fn handle_event(&mut self, event: &UiEvent) -> bool {
        let mut pointer = self.pointer;
        let changed = pointer.handle_event(self, event);
        self.pointer = pointer;
        changed
    }

    fn save(&self) -> TokenSave {
        TokenSave {
            image: self.path.clone(),
            position: self.map_pos,
            size: self.size,
        }
    }
}

impl Draggable for Token {
    fn position(&self) -> Position {
        self.view.to_screen(self.map_pos)
    }

    fn set_position(&mut self, position: Position) {
        self.map_pos = self.view.to_map(position);
    }

    fn hit_rect(&self) -> Rectangle {
        Rectangle::new_square(self.position().x, self.position().y, self.size * self.view.zoom())
    }
}

impl Scalable for Token {
    fn size(&self) -> f32 {
        self.size
    }

    fn set_size(&mut self, size: f32) {
        self.size = size;
    }
}

pub struct MapScreen {
    state: ScreenState,
    services: Services,
    view: MapView,
    map: Option<(ImageId, PathBuf)>,
    tokens: Vec<Token>,
    remove_mode: bool,
    buttons: Vec<Button>,
    queue: CommandQueue<Command>,
}

impl MapScreen {
    pub fn new(services: Services, viewport: Size) -> Self {
        let queue = CommandQueue::new();
        let size = Size::new(140.0, 30.0);
        let top_right = anchor_rect(
            Rectangle::from_pos_size(Position::default(), viewport),
            size,
            Anchors::new(HAnchor::Right, VAnchor::Top),
            Margins::uniform(10.0),
        );
        let entries = [
            ("Add Character", Command::AddCharacter),
            ("Change Map", Command::ChangeMap),
            ("Toggle Remove", Command::ToggleRemove),
        ];
        let buttons = column(top_right.pos(), size, 5.0, entries.len())
            .into_iter()
            .zip(entries)
            .map(|(rect, (text, command))| queue.button(text, rect.pos(), size, command))
            .collect();

        let mut screen = Self {
            state: ScreenState::new(),
            services,
            view: MapView::new(viewport),
            map: None,
            tokens: Vec::new(),
            remove_mode: false,
            buttons,
            queue,
        };
        screen.restore();
        screen
    }

    pub fn view(&self) -> MapView {
        self.view
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn map_image(&self) -> Option<ImageId> {
        self.map.as_ref().map(|(id, _)| *id)
    }

    pub fn is_remove_mode(&self) -> bool {
        self.remove_mode
    }

    fn restore(&mut self) {
        let saved = match self.services.saves.load_map() {
            Ok(Some(saved)) => saved,
            Ok(None) => return,
            Err(e) => {
                warn!("ignoring saved map: {e:#}");
                return;
            }
        };
        self.view.set_zoom(saved.zoom);
        if let Some(path) = saved.map {
            self.set_map(&path);
        }
        for token in saved.tokens {
            if let Some(id) = self.load_image(&token.image, None) {
                self.tokens
                    .push(Token::new(id, token.image, token.position, token.size, self.view));
            }
        }
        info!("restored map with {} tokens", self.tokens.len());
    }

    fn load_image(&self, path: &Path, scale: Option<Size>) -> Option<ImageId> {
        match self.services.images.borrow_mut().load(path, scale) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("{e}");
                None
            }
        }
    }

    fn set_map(&mut self, path: &Path) {
        if let Some(id) = self.load_image(path, Some(self.view.viewport())) {
            if let Some((old, _)) = self.map.replace((id, path.to_path_buf())) {
                self.services.images.borrow_mut().remove(old);
            }
        }
    }

    /// Places a token at the map origin, at the current zoom.
    pub fn add_character(&mut self, path: &Path) {
        if let Some(id) = self.load_image(path, None) {
            let origin = self.view.to_map(Position::default());
            self.tokens
                .push(Token::new(id, path.to_path_buf(), origin, TOKEN_SIZE, self.view));
        }
    }

    /// Drops a token along with its decoded image.
    fn remove_token(&mut self, index: usize) {
        let token = self.tokens.remove(index);
        self.services.images.borrow_mut().remove(token.image);
    }

    pub fn zoom_in(&mut self) {
        self.view.zoom_in();
        self.sync_view();
    }

    pub fn zoom_out(&mut self) {
        self.view.zoom_out();
        self.sync_view();
    }

    fn sync_view(&mut self) {
        for token in self.tokens.iter_mut() {
            token.set_view(self.view);
        }
    }

    pub fn toggle_remove_mode(&mut self) {
        self.remove_mode = !self.remove_mode;
    }

    /// Topmost token under `pos`.
    fn token_at(&self, pos: Position) -> Option<usize> {
        self.tokens.iter().rposition(|t| t.hit_rect().contains(pos))
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::AddCharacter => {
                let picked = self.services.picker.borrow_mut().pick(AssetKind::Characters);
                if let Some(path) = picked {
                    self.add_character(&path);
                }
            }
            Command::ChangeMap => {
                let picked = self.services.picker.borrow_mut().pick(AssetKind::Maps);
                if let Some(path) = picked {
                    self.set_map(&path);
                }
            }
            Command::ToggleRemove => self.toggle_remove_mode(),
        }
    }

    fn over_button(&self, pos: Position) -> bool {
        self.buttons.iter().any(|b| b.rect().contains(pos))
    }

    fn snapshot(&self) -> MapSave {
        MapSave {
            map: self.map.as_ref().map(|(_, path)| path.clone()),
            tokens: self.tokens.iter().map(Token::save).collect(),
            zoom: self.view.zoom(),
        }
    }
}

impl Screen for MapScreen {
    fn state(&self) -> &ScreenState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ScreenState {
        &mut self.state
    }

    fn title(&self) -> &str {
        "map"
    }

    fn handle_events(&mut self, events: &[UiEvent], ctx: &UiContext) {
        for button in self.buttons.iter_mut() {
            button.handle_events(events, ctx);
        }
        for command in self.queue.drain() {
            self.apply(command);
        }

        for event in events {
            match event {
                // A press grabs only the topmost token under the pointer.
                UiEvent::MouseDown { pos, .. } => {
                    if !self.remove_mode && !self.over_button(*pos) {
                        if let Some(i) = self.token_at(*pos) {
                            self.tokens[i].handle_event(event);
                        }
                    }
                }
                UiEvent::MouseUp { pos, .. } if self.remove_mode => {
                    if event.primary_release().is_some() && !self.over_button(*pos) {
                        if let Some(i) = self.token_at(*pos) {
                            self.remove_token(i);
                        }
                    }
                }
                UiEvent::Wheel { lines, .. } => {
                    if *lines > 0.0 {
                        self.zoom_in();
                    } else if *lines < 0.0 {
                        self.zoom_out();
                    }
                }
                _ if event.is_key_up(Key::Escape) => self.close(),
                _ => {
                    for token in self.tokens.iter_mut() {
                        token.handle_event(event);
                    }
                }
            }
        }
    }

    fn draw(&self, cmds: &mut RenderCommands, ctx: &UiContext) {
        if let Some((image, _)) = &self.map {
            cmds.draw_image(*image, self.view.map_rect());
        }
        for token in &self.tokens {
            cmds.draw_image(token.image, token.hit_rect());
        }
        for button in &self.buttons {
            button.draw(cmds, ctx);
        }
        if self.remove_mode {
            cmds.draw_text("remove mode", Position::default(), ctx.theme.warning);
        }
    }

    fn on_close(&mut self) {
        if let Err(e) = self.services.saves.save_map(&self.snapshot()) {
            warn!("could not save map: {e:#}");
        }
    }
}
