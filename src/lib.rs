//! Waids & Wyverns: a game master's desk for tabletop sessions.
//!
//! Screens (initiative tracker, dice roller, battle map, sound board, notes,
//! spell list, weather and time) run on a small retained-mode widget layer.
//! Widgets emit [`ui::DrawCommand`]s that [`raster::Rasterizer`] turns into
//! pixels and [`renderer::Presenter`] puts on the window.

pub mod app;
pub mod assets;
pub mod audio;
pub mod camera;
pub mod config;
pub mod dice;
pub mod initiative;
pub mod input;
pub mod layout;
pub mod persistence;
pub mod raster;
pub mod renderer;
pub mod rng;
pub mod screen;
pub mod screens;
pub mod spells;
pub mod text;
pub mod traits;
pub mod ui;
pub mod utils;
pub mod widgets {
    pub mod button;
    pub mod drag;
    pub mod text_area;
    pub mod text_box;
}

pub use app::run_app;
pub use config::AppConfig;
pub use dice::{DiceRoller, DieType, RollResult};
pub use initiative::{CharacterInitiative, InitiativeTracker};
pub use screen::{ComponentScreen, Screen, ScreenStack};
