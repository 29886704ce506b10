//! Dice engine: die types, uniform rolls, modifiers, advantage and macros.
//!
//! Rolls come from an injected [`DieSource`] so sessions can be seeded and
//! tests can script exact faces.

use crate::rng::RngStream;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiceError {
    #[error("unsupported die type '{0}'")]
    UnsupportedDie(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DieType {
    #[serde(rename = "d4")]
    D4,
    #[serde(rename = "d6")]
    D6,
    #[serde(rename = "d8")]
    D8,
    #[serde(rename = "d10")]
    D10,
    #[serde(rename = "d12")]
    D12,
    #[serde(rename = "d20")]
    D20,
    #[serde(rename = "d100")]
    D100,
}

impl DieType {
    pub const ALL: [DieType; 7] = [
        DieType::D4,
        DieType::D6,
        DieType::D8,
        DieType::D10,
        DieType::D12,
        DieType::D20,
        DieType::D100,
    ];

    pub fn sides(self) -> u32 {
        match self {
            DieType::D4 => 4,
            DieType::D6 => 6,
            DieType::D8 => 8,
            DieType::D10 => 10,
            DieType::D12 => 12,
            DieType::D20 => 20,
            DieType::D100 => 100,
        }
    }

    pub fn from_sides(sides: u32) -> Result<Self, DiceError> {
        Self::ALL
            .into_iter()
            .find(|d| d.sides() == sides)
            .ok_or_else(|| DiceError::UnsupportedDie(format!("d{sides}")))
    }
}

impl fmt::Display for DieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

impl FromStr for DieType {
    type Err = DiceError;

    /// Accepts `"d20"`, `"D20"` or a bare side count such as `"20"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('d')
            .or_else(|| trimmed.strip_prefix('D'))
            .unwrap_or(trimmed);
        digits
            .parse::<u32>()
            .ok()
            .and_then(|sides| Self::from_sides(sides).ok())
            .ok_or_else(|| DiceError::UnsupportedDie(s.to_string()))
    }
}

/// Source of die faces. Implementations must return a value in
/// `[1, sides]`.
pub trait DieSource {
    fn roll(&mut self, sides: u32) -> u32;
}

impl DieSource for RngStream {
    fn roll(&mut self, sides: u32) -> u32 {
        self.range_u32(1, sides.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    pub rolls: Vec<u32>,
    pub modifier: i32,
    pub total: i64,
}

impl RollResult {
    fn new(rolls: Vec<u32>, modifier: i32) -> Self {
        let total = rolls.iter().map(|&r| r as i64).sum::<i64>() + modifier as i64;
        Self {
            rolls,
            modifier,
            total,
        }
    }
}

impl fmt::Display for RollResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rolls: Vec<String> = self.rolls.iter().map(|r| r.to_string()).collect();
        write!(f, "[{}]", rolls.join(", "))?;
        if self.modifier != 0 {
            write!(f, " {:+}", self.modifier)?;
        }
        write!(f, " = {}", self.total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvantageRoll {
    pub rolls: [u32; 2],
    pub selected: u32,
}

/// One die type and how many of it a macro rolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieCount {
    pub die: DieType,
    pub count: u32,
}

/// Named roll recipe. The modifier is added once to the whole roll, not per
/// die type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceMacro {
    pub name: String,
    pub dice: Vec<DieCount>,
    pub modifier: i32,
}

impl DiceMacro {
    pub fn new(name: impl Into<String>, modifier: i32) -> Self {
        Self {
            name: name.into(),
            dice: Vec::new(),
            modifier,
        }
    }

    /// Adds `count` dice, merging with an existing entry for the same die.
    pub fn with_dice(mut self, die: DieType, count: u32) -> Self {
        match self.dice.iter_mut().find(|d| d.die == die) {
            Some(entry) => entry.count += count,
            None => self.dice.push(DieCount { die, count }),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.dice.iter().all(|d| d.count == 0)
    }
}

impl fmt::Display for DiceMacro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .dice
            .iter()
            .filter(|d| d.count > 0)
            .map(|d| format!("{}{}", d.count, d.die))
            .collect();
        if !self.name.is_empty() {
            write!(f, "{}: ", self.name)?;
        }
        f.write_str(&parts.join(" + "))?;
        if self.modifier != 0 {
            write!(f, " {:+}", self.modifier)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroResult {
    pub name: String,
    pub blocks: Vec<(DieType, Vec<u32>)>,
    pub modifier: i32,
    pub total: i64,
}

pub struct DiceRoller {
    source: Box<dyn DieSource>,
}

impl DiceRoller {
    pub fn new(source: impl DieSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    pub fn roll_die(&mut self, die: DieType) -> u32 {
        let sides = die.sides();
        let face = self.source.roll(sides);
        debug_assert!((1..=sides).contains(&face), "die source out of range");
        face.clamp(1, sides)
    }

    pub fn roll_many(&mut self, count: u32, die: DieType, modifier: i32) -> RollResult {
        let rolls = (0..count).map(|_| self.roll_die(die)).collect();
        RollResult::new(rolls, modifier)
    }

    /// Rolls two dice and keeps the higher (`want_max`) or the lower.
    pub fn advantage_disadvantage(&mut self, want_max: bool, die: DieType) -> AdvantageRoll {
        let rolls = [self.roll_die(die), self.roll_die(die)];
        let selected = if want_max {
            rolls[0].max(rolls[1])
        } else {
            rolls[0].min(rolls[1])
        };
        AdvantageRoll { rolls, selected }
    }

    pub fn roll_macro(&mut self, recipe: &DiceMacro) -> MacroResult {
        let blocks: Vec<(DieType, Vec<u32>)> = recipe
            .dice
            .iter()
            .filter(|d| d.count > 0)
            .map(|d| (d.die, self.roll_many(d.count, d.die, 0).rolls))
            .collect();
        let sum: i64 = blocks
            .iter()
            .flat_map(|(_, rolls)| rolls.iter())
            .map(|&r| r as i64)
            .sum();
        MacroResult {
            name: recipe.name.clone(),
            blocks,
            modifier: recipe.modifier,
            total: sum + recipe.modifier as i64,
        }
    }
}

impl fmt::Debug for DiceRoller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiceRoller").finish_non_exhaustive()
    }
}
