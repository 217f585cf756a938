use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter)]
pub enum Move {
    // Normal
    Tackle,
    Scratch,
    QuickAttack,
    BodySlam,
    DoubleEdge,
    Bite,
    Growl,
    TailWhip,
    Harden,
    SwordsDance,
    DoubleTeam,
    Recover,
    // Fire
    Ember,
    Flamethrower,
    WillOWisp,
    // Water
    WaterGun,
    Surf,
    // Grass
    VineWhip,
    RazorLeaf,
    GigaDrain,
    SleepPowder,
    // Electric
    ThunderShock,
    Thunderbolt,
    ThunderWave,
    // Ice
    PowderSnow,
    IceBeam,
    // Rock / Ground
    RockThrow,
    MudSlap,
    SandAttack,
    // Flying
    Gust,
    WingAttack,
    // Ghost
    Lick,
    ShadowBall,
    ConfuseRay,
    // Poison
    PoisonSting,
    Sludge,
    PoisonPowder,
    // Psychic
    Confusion,
    Hypnosis,
    Agility,
    // Bug
    BugBite,

    // Used by the engine only; never part of a learnset
    Struggle,
    HitItself,
}

impl Move {
    /// Internal moves are injected by the engine and cannot be learned.
    pub fn is_internal(&self) -> bool {
        matches!(self, Move::Struggle | Move::HitItself)
    }

    /// Converts the CamelCase variant into a display name ("QuickAttack" -> "Quick Attack").
    pub fn display_name(&self) -> String {
        match self {
            Move::DoubleEdge => "Double-Edge".to_string(),
            Move::WillOWisp => "Will-O-Wisp".to_string(),
            Move::MudSlap => "Mud-Slap".to_string(),
            Move::HitItself => "its own attack".to_string(),
            _ => {
                let debug_string = format!("{:?}", self);
                debug_string
                    .chars()
                    .enumerate()
                    .map(|(i, c)| {
                        if i > 0 && c.is_uppercase() {
                            format!(" {}", c)
                        } else {
                            c.to_string()
                        }
                    })
                    .collect()
            }
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
