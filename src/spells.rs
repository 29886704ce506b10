//! Read-only spell reference loaded from JSON.
//!
//! The file is an object keyed by spell name; each entry needs a `level`,
//! any other fields are kept but not interpreted.

use anyhow::Context;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpellLevel {
    Number(u32),
    Text(String),
}

impl fmt::Display for SpellLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpellLevel::Number(n) => write!(f, "{n}"),
            SpellLevel::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellInfo {
    pub level: SpellLevel,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpellBook {
    spells: BTreeMap<String, SpellInfo>,
}

impl SpellBook {
    pub fn from_json(data: &str) -> anyhow::Result<Self> {
        serde_json::from_str(data).context("invalid spell list")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading spell list {}", path.display()))?;
        let book = Self::from_json(&data)?;
        info!("loaded {} spells from {}", book.len(), path.display());
        Ok(book)
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&SpellInfo> {
        self.spells.get(name)
    }

    /// Spells whose name contains `query` (ignoring case) or whose level is
    /// exactly `query`, in name order. An empty query matches nothing.
    pub fn filter<'a>(&'a self, query: &str) -> Vec<(&'a str, &'a SpellLevel)> {
        if query.is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.spells
            .iter()
            .filter(|(name, info)| {
                name.to_lowercase().contains(&needle) || info.level.to_string() == query
            })
            .map(|(name, info)| (name.as_str(), &info.level))
            .collect()
    }
}
