use crate::{MonsterType, Move};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

impl fmt::Display for MoveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveCategory::Physical => write!(f, "Physical"),
            MoveCategory::Special => write!(f, "Special"),
            MoveCategory::Status => write!(f, "Status"),
        }
    }
}

/// Stats that can be boosted or lowered in battle. HP is never boosted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatType {
    Attack,
    Defense,
    SpAttack,
    SpDefense,
    Speed,
    Accuracy,
    Evasion,
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatType::Attack => write!(f, "Attack"),
            StatType::Defense => write!(f, "Defense"),
            StatType::SpAttack => write!(f, "Special Attack"),
            StatType::SpDefense => write!(f, "Special Defense"),
            StatType::Speed => write!(f, "Speed"),
            StatType::Accuracy => write!(f, "accuracy"),
            StatType::Evasion => write!(f, "evasiveness"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    User,
    Foe,
}

/// Major status conditions. A monster carries at most one and keeps it after switching out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusType {
    Poison,
    Burn,
    Sleep,
    Paralysis,
    Freeze,
}

impl fmt::Display for StatusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusType::Poison => write!(f, "poison"),
            StatusType::Burn => write!(f, "burn"),
            StatusType::Sleep => write!(f, "sleep"),
            StatusType::Paralysis => write!(f, "paralysis"),
            StatusType::Freeze => write!(f, "freeze"),
        }
    }
}

/// Volatile conditions only last while the monster stays in battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VolatileType {
    Confusion,
    Flinch,
}

impl fmt::Display for VolatileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolatileType::Confusion => write!(f, "confusion"),
            VolatileType::Flinch => write!(f, "flinching"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MoveEffect {
    Boost(Target, StatType, i8), // who, which stat, stages
    Status(StatusType),
    Volatile(VolatileType),
    Heal(u8),   // % of the user's max HP
    Recoil(u8), // % of damage dealt
    Drain(u8),  // % of damage dealt
}

/// An effect that only happens with some probability after a move connects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryEffect {
    pub chance: u8, // percent
    pub target: Target,
    pub effect: MoveEffect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub id: Move,
    pub name: String,
    pub move_type: MonsterType,
    pub category: MoveCategory,
    pub power: Option<u16>,
    pub accuracy: Option<u8>, // None = never misses
    pub max_sp: u8,
    #[serde(default)]
    pub priority: i8,
    #[serde(default)]
    pub crit_stage: u8,
    pub target: Target,
    #[serde(default)]
    pub effects: Vec<MoveEffect>,
    #[serde(default)]
    pub secondaries: Vec<SecondaryEffect>,
    pub description: String,
}

impl MoveData {
    pub fn is_damaging(&self) -> bool {
        self.category != MoveCategory::Status && self.power.unwrap_or(0) > 0
    }

    pub fn targets_user(&self) -> bool {
        self.target == Target::User
    }
}
