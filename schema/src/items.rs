use crate::StatusType;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter)]
pub enum Item {
    // Recovery
    Potion,
    SuperPotion,
    HyperPotion,
    MaxPotion,
    FullRestore,
    Revive,
    MaxRevive,
    Antidote,
    BurnHeal,
    Awakening,
    ParalyzeHeal,
    IceHeal,
    FullHeal,
    Elixir,
    MaxElixir,
    // Recruitment
    FriendshipBerry,
    GoldenLure,
    // Evolution
    FireStone,
    ThunderStone,
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            Item::Potion => "Potion",
            Item::SuperPotion => "Super Potion",
            Item::HyperPotion => "Hyper Potion",
            Item::MaxPotion => "Max Potion",
            Item::FullRestore => "Full Restore",
            Item::Revive => "Revive",
            Item::MaxRevive => "Max Revive",
            Item::Antidote => "Antidote",
            Item::BurnHeal => "Burn Heal",
            Item::Awakening => "Awakening",
            Item::ParalyzeHeal => "Paralyze Heal",
            Item::IceHeal => "Ice Heal",
            Item::FullHeal => "Full Heal",
            Item::Elixir => "Elixir",
            Item::MaxElixir => "Max Elixir",
            Item::FriendshipBerry => "Friendship Berry",
            Item::GoldenLure => "Golden Lure",
            Item::FireStone => "Fire Stone",
            Item::ThunderStone => "Thunder Stone",
        };
        write!(f, "{}", display_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CureTarget {
    Status(StatusType),
    All,
}

impl CureTarget {
    pub fn cures(&self, status: StatusType) -> bool {
        match self {
            CureTarget::Status(target) => *target == status,
            CureTarget::All => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecoveryEffect {
    #[serde(default)]
    pub hp: u16,
    #[serde(default)]
    pub restore_max_hp: bool,
    #[serde(default)]
    pub revive: bool,
    #[serde(default)]
    pub max_revive: bool,
    #[serde(default)]
    pub cure: Option<CureTarget>,
    #[serde(default)]
    pub sp: u8, // applied to every move
    #[serde(default)]
    pub restore_max_sp: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemKind {
    Recovery(RecoveryEffect),
    Recruit {
        affinity_bonus: i8,
        rate_multiplier: f32,
    },
    Evolution,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemData {
    pub id: Item,
    pub name: String,
    pub kind: ItemKind,
    pub price: u32,
    pub usable_in_battle: bool,
    pub description: String,
}
