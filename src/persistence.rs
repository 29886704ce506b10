//! Session state saved between runs: notes, initiative order, dice macros and
//! the battle map layout.

use crate::dice::DiceMacro;
use crate::initiative::InitiativeTracker;
use crate::utils::Position;
use anyhow::Context;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const NOTES_FILE: &str = "notes.txt";
const INITIATIVE_FILE: &str = "initiative.json";
const MACROS_FILE: &str = "macros.json";
const MAP_FILE: &str = "map.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSave {
    pub image: PathBuf,
    /// Map-space position.
    pub position: Position,
    pub size: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapSave {
    pub map: Option<PathBuf>,
    pub tokens: Vec<TokenSave>,
    #[serde(default = "default_zoom")]
    pub zoom: f32,
}

fn default_zoom() -> f32 {
    1.0
}

#[derive(Debug, Clone)]
pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn read(&self, name: &str) -> anyhow::Result<Option<String>> {
        let path = self.path(name);
        match fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no saved {}", path.display());
                Ok(None)
            }
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    fn write(&self, name: &str, data: &str) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating save directory {}", self.dir.display()))?;
        let path = self.path(name);
        fs::write(&path, data).with_context(|| format!("writing {}", path.display()))?;
        info!("saved {}", path.display());
        Ok(())
    }

    pub fn load_json<T: DeserializeOwned>(&self, name: &str) -> anyhow::Result<Option<T>> {
        match self.read(name)? {
            Some(data) => {
                let value = serde_json::from_str(&data)
                    .with_context(|| format!("parsing {}", self.path(name).display()))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    pub fn save_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> anyhow::Result<()> {
        let data = serde_json::to_string_pretty(value).context("serializing save data")?;
        self.write(name, &data)
    }

    pub fn load_notes(&self) -> anyhow::Result<Option<String>> {
        self.read(NOTES_FILE)
    }

    pub fn save_notes(&self, notes: &str) -> anyhow::Result<()> {
        self.write(NOTES_FILE, notes)
    }

    pub fn load_initiative(&self) -> anyhow::Result<Option<InitiativeTracker>> {
        self.load_json(INITIATIVE_FILE)
    }

    pub fn save_initiative(&self, tracker: &InitiativeTracker) -> anyhow::Result<()> {
        self.save_json(INITIATIVE_FILE, tracker)
    }

    pub fn load_macros(&self) -> anyhow::Result<Option<Vec<DiceMacro>>> {
        self.load_json(MACROS_FILE)
    }

    pub fn save_macros(&self, macros: &[DiceMacro]) -> anyhow::Result<()> {
        self.save_json(MACROS_FILE, macros)
    }

    pub fn load_map(&self) -> anyhow::Result<Option<MapSave>> {
        self.load_json(MAP_FILE)
    }

    pub fn save_map(&self, map: &MapSave) -> anyhow::Result<()> {
        self.save_json(MAP_FILE, map)
    }
}
