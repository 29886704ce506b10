//! Application settings, read from a TOML file.

use crate::utils::{Color, Size};
use anyhow::Context;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "waids_wyverns.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Waids & Wyverns".to_string(),
            width: 640,
            height: 480,
        }
    }
}

impl WindowConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub frames_per_second: u32,
    pub background_color: [u8; 3],
    pub font_path: Option<PathBuf>,
    pub font_size: f32,
    pub asset_root: PathBuf,
    pub save_dir: PathBuf,
    pub spell_file: PathBuf,
    pub dice_seed: Option<u64>,
    pub sound_slots: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            frames_per_second: 60,
            background_color: [155, 155, 155],
            font_path: None,
            font_size: 18.0,
            asset_root: PathBuf::from("assets"),
            save_dir: PathBuf::from("saves"),
            spell_file: PathBuf::from("assets/spells.json"),
            dice_seed: None,
            sound_slots: 8,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(data: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(data).context("invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_toml_str(&data)
            .with_context(|| format!("parsing config {}", path.display()))?;
        info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// An explicit path must exist; otherwise the default file is read when
    /// present and built-in defaults are used when it is not.
    pub fn resolve(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::load(default)
                } else {
                    info!("no {DEFAULT_CONFIG_FILE}, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn background(&self) -> Color {
        Color::from(self.background_color)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.frames_per_second > 0, "frames_per_second must be positive");
        anyhow::ensure!(
            self.window.width > 0 && self.window.height > 0,
            "window size must be positive"
        );
        anyhow::ensure!(self.font_size > 0.0, "font_size must be positive");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = AppConfig::from_toml_str("frames_per_second = 30\n[window]\ntitle = \"Table\"\n")
            .unwrap();
        assert_eq!(cfg.frames_per_second, 30);
        assert_eq!(cfg.window.title, "Table");
        assert_eq!(cfg.window.width, 640);
        assert_eq!(cfg.sound_slots, 8);
    }

    #[test]
    fn zero_fps_is_rejected() {
        assert!(AppConfig::from_toml_str("frames_per_second = 0").is_err());
    }
}
