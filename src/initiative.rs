//! Turn-order tracking for combat encounters.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error("no character with id {0} in the initiative order")]
    NotFound(Uuid),
}

/// One combatant. Identity is `id`; names may repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterInitiative {
    pub id: Uuid,
    pub name: String,
    pub initiative: i32,
    pub health: i32,
}

impl CharacterInitiative {
    pub fn new(name: impl Into<String>, initiative: i32, health: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            initiative,
            health,
        }
    }
}

/// Combatants in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InitiativeTracker {
    characters: Vec<CharacterInitiative>,
}

impl InitiativeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_character(&mut self, character: CharacterInitiative) -> Uuid {
        let id = character.id;
        self.characters.push(character);
        id
    }

    /// Removes the first character with `id`.
    pub fn remove_character(&mut self, id: Uuid) -> Result<CharacterInitiative, TrackerError> {
        let index = self
            .characters
            .iter()
            .position(|c| c.id == id)
            .ok_or(TrackerError::NotFound(id))?;
        Ok(self.characters.remove(index))
    }

    /// Highest initiative first; ties keep the order they were added in.
    pub fn character_order(&self) -> Vec<&CharacterInitiative> {
        let mut order: Vec<&CharacterInitiative> = self.characters.iter().collect();
        // `sort_by` is stable.
        order.sort_by(|a, b| b.initiative.cmp(&a.initiative));
        order
    }

    pub fn get(&self, id: Uuid) -> Option<&CharacterInitiative> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut CharacterInitiative> {
        self.characters.iter_mut().find(|c| c.id == id)
    }

    pub fn characters(&self) -> &[CharacterInitiative] {
        &self.characters
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}
