use crate::{Item, MonsterType, Move, Species};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub sp_attack: u8,
    pub sp_defense: u8,
    pub speed: u8,
}

impl BaseStats {
    pub fn total(&self) -> u16 {
        self.hp as u16
            + self.attack as u16
            + self.defense as u16
            + self.sp_attack as u16
            + self.sp_defense as u16
            + self.speed as u16
    }
}

/// Experience curve category. Determines how much total experience a level requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowthRate {
    Fast,
    MediumFast,
    MediumSlow,
    Slow,
    Erratic,
    Fluctuating,
}

impl GrowthRate {
    /// Total experience needed to reach `level`. Level 1 (and 0) always requires 0.
    pub fn exp_for_level(&self, level: u8) -> u32 {
        if level <= 1 {
            return 0;
        }
        let n = level as i64;
        let cube = n * n * n;

        let exp = match self {
            GrowthRate::Fast => 4 * cube / 5,
            GrowthRate::MediumFast => cube,
            GrowthRate::MediumSlow => 6 * cube / 5 - 15 * n * n + 100 * n - 140,
            GrowthRate::Slow => 5 * cube / 4,
            GrowthRate::Erratic => match n {
                ..50 => cube * (100 - n) / 50,
                50..68 => cube * (150 - n) / 100,
                68..98 => cube * ((1911 - 10 * n) / 3) / 500,
                _ => cube * (160 - n) / 100,
            },
            GrowthRate::Fluctuating => match n {
                ..15 => cube * ((n + 1) / 3 + 24) / 50,
                15..36 => cube * (n + 14) / 50,
                _ => cube * (n / 2 + 32) / 50,
            },
        };

        exp.max(0) as u32
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Learnset {
    pub level_up: HashMap<u8, Vec<Move>>, // level -> moves learned at that level
    #[serde(default)]
    pub can_learn: Vec<Move>, // Moves learnable outside of levelling
}

impl Learnset {
    pub fn learns_at_level(&self, level: u8) -> Option<&Vec<Move>> {
        self.level_up.get(&level)
    }

    pub fn can_learn_move(&self, move_: Move) -> bool {
        self.level_up.values().any(|moves| moves.contains(&move_)) || self.can_learn.contains(&move_)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvolutionMethod {
    Level(u8),
    Item(Item),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionData {
    pub evolves_into: Species,
    pub method: EvolutionMethod,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDrop {
    pub item: Item,
    pub chance: u8,         // percent
    pub quantity: (u8, u8), // inclusive range
}

/// What a defeated monster leaves behind for the winning side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropTable {
    pub gold: (u32, u32), // inclusive range
    #[serde(default)]
    pub items: Vec<ItemDrop>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruitAnswer {
    pub text: String,
    pub affinity: i8,
}

/// How a wild monster reacts to being recruited: base rate plus the question it asks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruitData {
    pub rate: u8, // 0-255, higher is easier
    pub question: String,
    pub answers: Vec<RecruitAnswer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesData {
    pub id: Species,
    pub name: String,
    pub types: Vec<MonsterType>,
    pub base_stats: BaseStats,
    pub growth_rate: GrowthRate,
    pub exp_yield: u16,
    pub learnset: Learnset,
    pub evolution: Option<EvolutionData>,
    pub recruit: RecruitData,
    #[serde(default)]
    pub drops: DropTable,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_RATES: [GrowthRate; 6] = [
        GrowthRate::Fast,
        GrowthRate::MediumFast,
        GrowthRate::MediumSlow,
        GrowthRate::Slow,
        GrowthRate::Erratic,
        GrowthRate::Fluctuating,
    ];

    #[test]
    fn test_curves_start_at_zero_and_never_decrease() {
        for rate in ALL_RATES {
            assert_eq!(rate.exp_for_level(1), 0, "{:?} should start at 0", rate);
            let mut previous = 0;
            for level in 2..=100u8 {
                let exp = rate.exp_for_level(level);
                assert!(exp >= previous, "{:?} decreased at level {}", rate, level);
                previous = exp;
            }
        }
    }

    #[test]
    fn test_known_curve_values() {
        assert_eq!(GrowthRate::MediumFast.exp_for_level(100), 1_000_000);
        assert_eq!(GrowthRate::Fast.exp_for_level(100), 800_000);
        assert_eq!(GrowthRate::Slow.exp_for_level(100), 1_250_000);
        assert_eq!(GrowthRate::MediumSlow.exp_for_level(100), 1_059_860);
        assert_eq!(GrowthRate::Erratic.exp_for_level(100), 600_000);
        assert_eq!(GrowthRate::Fluctuating.exp_for_level(100), 1_640_000);
        assert_eq!(GrowthRate::MediumSlow.exp_for_level(2), 9);
        assert_eq!(GrowthRate::MediumFast.exp_for_level(10), 1000);
    }

    #[test]
    fn test_base_stat_total() {
        let stats = BaseStats {
            hp: 45,
            attack: 49,
            defense: 49,
            sp_attack: 65,
            sp_defense: 65,
            speed: 45,
        };
        assert_eq!(stats.total(), 318);
    }
}
