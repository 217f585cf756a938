use crate::battle::conditions::BattlerCondition;
use crate::errors::ActionError;
use crate::inventory::Inventory;
use crate::monster::MonsterInst;
use crate::party::Party;
use crate::{Item, Move};
use schema::{StatType, VolatileType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub const MAX_STAT_STAGE: i8 = 6;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum PlayerAction {
    // The index refers to the move's position (0-3) in the active monster's move list.
    UseMove { move_index: usize },

    // The index refers to the monster's position (0-5) in the player's team.
    SwitchMonster { team_index: usize },

    UseItem { item: Item, team_index: usize },

    /// Wild battles only. `answer_index` picks a reply to the monster's question.
    Recruit { answer_index: usize, lure: Option<Item> },

    Run,
    Forfeit,
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerAction::UseMove { move_index } => write!(f, "use move #{}", move_index + 1),
            PlayerAction::SwitchMonster { team_index } => {
                write!(f, "switch to team slot {}", team_index + 1)
            }
            PlayerAction::UseItem { item, team_index } => {
                write!(f, "use {} on team slot {}", item, team_index + 1)
            }
            PlayerAction::Recruit { answer_index, lure } => match lure {
                Some(lure) => write!(f, "recruit (answer {}, {})", answer_index + 1, lure),
                None => write!(f, "recruit (answer {})", answer_index + 1),
            },
            PlayerAction::Run => write!(f, "run"),
            PlayerAction::Forfeit => write!(f, "forfeit"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattlePlayer {
    // A unique identifier, e.g. a save slot for the hero or "wild_sparkit" for an encounter.
    pub player_id: String,
    pub player_name: String,

    pub team: [Option<MonsterInst>; 6],

    // The index (0-5) of the monster in `team` that is currently active.
    pub active_index: usize,

    // Stage modifications, value is the stage (-6 to +6)
    pub stat_stages: HashMap<StatType, i8>,

    // Volatile conditions on the active monster, one per kind
    pub conditions: HashMap<VolatileType, BattlerCondition>,

    pub last_move: Option<Move>,
    pub inventory: Inventory,
    pub money: u32,
}

impl BattlePlayer {
    pub fn new(player_id: String, player_name: String, team: Vec<MonsterInst>) -> Self {
        let mut team_array = [const { None }; 6];
        for (i, monster) in team.into_iter().take(6).enumerate() {
            team_array[i] = Some(monster);
        }

        let mut player = BattlePlayer {
            player_id,
            player_name,
            team: team_array,
            active_index: 0,
            stat_stages: HashMap::new(),
            conditions: HashMap::new(),
            last_move: None,
            inventory: Inventory::new(),
            money: 0,
        };
        // Lead with the first monster that can fight.
        if let Some(index) = player.first_healthy_index() {
            player.active_index = index;
        }
        player
    }

    pub fn from_party(player_id: String, player_name: String, party: &Party) -> Self {
        Self::new(player_id, player_name, party.members().to_vec())
    }

    pub fn with_inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = inventory;
        self
    }

    pub fn with_money(mut self, money: u32) -> Self {
        self.money = money;
        self
    }

    /// The team as a party again, e.g. to carry results out of a battle.
    pub fn to_party(&self) -> Party {
        Party::from_team(self.team.clone())
    }

    pub fn active_monster(&self) -> Option<&MonsterInst> {
        self.team.get(self.active_index).and_then(|slot| slot.as_ref())
    }

    pub fn active_monster_mut(&mut self) -> Option<&mut MonsterInst> {
        self.team.get_mut(self.active_index).and_then(|slot| slot.as_mut())
    }

    pub fn has_condition(&self, condition_type: VolatileType) -> bool {
        self.conditions.contains_key(&condition_type)
    }

    /// Add or overwrite a condition of the same kind
    pub fn add_condition(&mut self, condition: BattlerCondition) {
        self.conditions.insert(condition.volatile_type(), condition);
    }

    pub fn remove_condition(&mut self, condition_type: VolatileType) -> Option<BattlerCondition> {
        self.conditions.remove(&condition_type)
    }

    pub fn get_condition(&self, condition_type: VolatileType) -> Option<&BattlerCondition> {
        self.conditions.get(&condition_type)
    }

    /// Switch the active monster. Stat stages and volatile conditions stay behind.
    pub fn switch_monster(&mut self, new_index: usize) -> Result<(), ActionError> {
        if new_index >= 6 || self.team[new_index].is_none() {
            return Err(ActionError::InvalidTeamIndex(new_index));
        }

        self.clear_active_state();
        self.active_index = new_index;
        Ok(())
    }

    pub fn clear_active_state(&mut self) {
        self.conditions.clear();
        self.stat_stages.clear();
        self.last_move = None;
    }

    // === Stat Stage Management ===

    pub fn get_stat_stage(&self, stat: StatType) -> i8 {
        self.stat_stages.get(&stat).copied().unwrap_or(0)
    }

    /// Set the stage for a stat type (clamped to -6 to +6)
    pub fn set_stat_stage(&mut self, stat: StatType, stage: i8) {
        let clamped = stage.clamp(-MAX_STAT_STAGE, MAX_STAT_STAGE);
        if clamped == 0 {
            self.stat_stages.remove(&stat);
        } else {
            self.stat_stages.insert(stat, clamped);
        }
    }

    /// Apply a stage change and return the change that actually took place.
    pub fn modify_stat_stage(&mut self, stat: StatType, delta: i8) -> i8 {
        let current = self.get_stat_stage(stat);
        self.set_stat_stage(stat, current.saturating_add(delta));
        self.get_stat_stage(stat) - current
    }

    // === Team queries ===

    pub fn has_healthy_monster(&self) -> bool {
        self.first_healthy_index().is_some()
    }

    pub fn first_healthy_index(&self) -> Option<usize> {
        self.team
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|monster| !monster.is_fainted()))
    }

    /// Team slots the player could switch into right now.
    pub fn valid_switches(&self) -> Vec<usize> {
        self.team
            .iter()
            .enumerate()
            .filter(|(index, slot)| {
                *index != self.active_index
                    && slot.as_ref().is_some_and(|monster| !monster.is_fainted())
            })
            .map(|(index, _)| index)
            .collect()
    }

    pub fn first_open_slot(&self) -> Option<usize> {
        self.team.iter().position(|slot| slot.is_none())
    }
}
