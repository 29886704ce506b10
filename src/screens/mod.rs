//! The application's screens and the services they share.

pub mod dice_roller;
pub mod initiative;
pub mod map;
pub mod menu;
pub mod notes;
pub mod sound;
pub mod spells;
pub mod weather;

use crate::assets::{AssetLoader, CyclingPicker, DirectoryLoader, FilePicker, ImageStore};
use crate::audio::{AudioBackend, Mixer, NullAudio};
use crate::config::AppConfig;
use crate::dice::DiceRoller;
use crate::persistence::SaveStore;
use crate::rng::RngService;
use crate::spells::SpellBook;
use crate::utils::{Position, Size};
use crate::widgets::button::Button;
use log::{info, warn};
use std::cell::RefCell;
use std::rc::Rc;

pub use menu::MenuScreen;

/// Collaborators constructed once at startup and handed to every screen.
#[derive(Clone)]
pub struct Services {
    pub loader: Rc<dyn AssetLoader>,
    pub picker: Rc<RefCell<dyn FilePicker>>,
    pub images: Rc<RefCell<ImageStore>>,
    pub mixer: Rc<RefCell<Mixer>>,
    pub saves: SaveStore,
    pub spells: Rc<SpellBook>,
    pub dice: Rc<RefCell<DiceRoller>>,
}

impl Services {
    pub fn from_config(config: &AppConfig) -> Self {
        let loader: Rc<dyn AssetLoader> = Rc::new(DirectoryLoader::new(&config.asset_root));
        let picker = Rc::new(RefCell::new(CyclingPicker::new(loader.clone())));

        let spells = match SpellBook::load(&config.spell_file) {
            Ok(book) => book,
            Err(e) => {
                warn!("spell list unavailable: {e:#}");
                SpellBook::default()
            }
        };

        let rng = match config.dice_seed {
            Some(seed) => RngService::with_seed(seed),
            None => RngService::from_clock(),
        };
        info!("dice seed {}", rng.base_seed());

        Self {
            loader,
            picker,
            images: Rc::new(RefCell::new(ImageStore::new())),
            mixer: Rc::new(RefCell::new(Mixer::new(
                audio_backend(config.sound_slots),
                config.sound_slots,
            ))),
            saves: SaveStore::new(&config.save_dir),
            spells: Rc::new(spells),
            dice: Rc::new(RefCell::new(DiceRoller::new(
                rng.derive_stream_by_name("dice"),
            ))),
        }
    }
}

#[cfg(feature = "rodio-backend")]
fn audio_backend(slots: usize) -> Box<dyn AudioBackend> {
    match crate::audio::RodioAudio::new(slots) {
        Ok(backend) => Box::new(backend),
        Err(e) => {
            warn!("falling back to silent audio: {e:#}");
            Box::new(NullAudio)
        }
    }
}

#[cfg(not(feature = "rodio-backend"))]
fn audio_backend(_slots: usize) -> Box<dyn AudioBackend> {
    Box::new(NullAudio)
}

/// Actions requested by buttons during event handling, applied by the
/// owning screen once its widgets are done with the frame's events.
pub(crate) struct CommandQueue<C> {
    pending: Rc<RefCell<Vec<C>>>,
}

impl<C> Clone for CommandQueue<C> {
    fn clone(&self) -> Self {
        Self {
            pending: self.pending.clone(),
        }
    }
}

impl<C: Clone + 'static> CommandQueue<C> {
    pub(crate) fn new() -> Self {
        Self {
            pending: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub(crate) fn push(&self, command: C) {
        self.pending.borrow_mut().push(command);
    }

    pub(crate) fn drain(&self) -> Vec<C> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }

    /// A button whose click enqueues `command`.
    pub(crate) fn button(&self, text: impl Into<String>, pos: Position, size: Size, command: C) -> Button {
        let queue = self.clone();
        Button::with_params(text, pos, size, move |c: &C| queue.push(c.clone()), command)
    }
}

/// Parses a text box value as a signed number; a lone sign or empty string
/// is not a number.
pub fn parse_signed(value: &str) -> Option<i32> {
    value.trim().parse().ok()
}

pub fn parse_unsigned(value: &str) -> Option<u32> {
    value.trim().parse().ok()
}
