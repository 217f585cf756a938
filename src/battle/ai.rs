//! A module for defining AI behaviors for battle opponents.

use crate::battle::calculators::type_multiplier;
use crate::battle::state::BattleState;
use crate::battle::stats::effective_attack;
use crate::battle::turn_orchestrator::get_valid_actions;
use crate::errors::MoveDataResult;
use crate::move_data::get_move_data;
use crate::player::PlayerAction;
use crate::Move;
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schema::{MoveCategory, MoveEffect, Target};
use std::collections::VecDeque;

/// A trait for any system that can decide on a battle action.
/// This provides a common interface for different AI difficulties or strategies.
pub trait Behavior {
    /// Inspects the battle state and decides on the next action for the given player.
    fn decide_action(&mut self, player_index: usize, battle_state: &BattleState) -> PlayerAction;
}

pub struct ScoringAI {
    rng: StdRng,
}

impl ScoringAI {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The core scoring logic. Assigns a floating-point value to a given action.
    fn score_action(&mut self, action: &PlayerAction, player_index: usize, state: &BattleState) -> f32 {
        let opponent_index = 1 - player_index;

        match action {
            PlayerAction::UseMove { move_index } => self
                .score_move(*move_index, player_index, opponent_index, state)
                .unwrap_or(0.0),
            PlayerAction::SwitchMonster { .. } => self.score_switch(),
            PlayerAction::UseItem { team_index, .. } => score_item(*team_index, player_index, state),
            PlayerAction::Recruit { lure, .. } => {
                if lure.is_some() {
                    1.5
                } else {
                    2.0
                }
            }
            PlayerAction::Run => 0.5,
            PlayerAction::Forfeit => -1000.0, // Never choose to forfeit unless it's the only option.
        }
    }

    fn score_move(
        &mut self,
        move_index: usize,
        player_index: usize,
        opponent_index: usize,
        state: &BattleState,
    ) -> MoveDataResult<f32> {
        let player = &state.players[player_index];
        let opponent = &state.players[opponent_index];
        let Some(attacker) = player.active_monster() else {
            return Ok(0.0);
        };
        let Some(defender) = opponent.active_monster() else {
            return Ok(0.0); // Cannot score if there is no target.
        };

        let move_used = attacker
            .moves
            .get(move_index)
            .and_then(|slot| slot.as_ref())
            .filter(|instance| instance.sp > 0)
            .map(|instance| instance.move_)
            .unwrap_or(Move::Struggle);
        let move_data = get_move_data(move_used)?;

        // --- Step 1: Core damage score ---
        let mut damage_score = 0.0;
        if move_data.is_damaging() {
            let base_power = move_data.power.unwrap_or(0) as f32;

            let effectiveness = type_multiplier(move_data, defender);
            // If the opponent is immune, this is a terrible move.
            if effectiveness < 0.1 {
                return Ok(-1.0);
            }

            let stab_multiplier = if attacker.types().contains(&move_data.move_type) {
                state.config.stab_multiplier
            } else {
                1.0
            };

            let effective_stat = effective_attack(attacker, player, move_data.category);
            let level_scalar = (attacker.level as f32 * 2.0).max(1.0);
            let normalized_power = effective_stat as f32 / level_scalar;

            damage_score = base_power * effectiveness * stab_multiplier * normalized_power;
        }

        // --- Step 2: Utility score ---
        let on_target = |target: Target| match target {
            Target::User => player,
            Target::Foe => opponent,
        };
        let mut utility_score = 0.0;
        let primary = move_data.effects.iter().map(|effect| (move_data.target, effect, 100u8));
        let secondary = move_data
            .secondaries
            .iter()
            .map(|secondary| (secondary.target, &secondary.effect, secondary.chance));

        for (target, effect, chance) in primary.chain(secondary) {
            let chance = chance.min(100) as f32 / 100.0;
            match effect {
                // Self-buffs are valuable if the stat isn't maxed out.
                MoveEffect::Boost(Target::User, stat, stages) if *stages > 0 => {
                    let current_stage = player.get_stat_stage(*stat);
                    if current_stage < 6 {
                        let potential_gain = 1.0 - (current_stage as f32 / 6.0);
                        utility_score += 20.0 * (*stages as f32) * potential_gain * chance;
                    }
                }
                // Opponent debuffs are valuable if the stat isn't minimized.
                MoveEffect::Boost(Target::Foe, stat, stages) if *stages < 0 => {
                    if opponent.get_stat_stage(*stat) > -6 {
                        utility_score += 15.0 * (stages.abs() as f32) * chance;
                    }
                }
                MoveEffect::Status(_) => {
                    if on_target(target).active_monster().is_some_and(|m| m.status.is_none()) {
                        utility_score += 45.0 * chance;
                    }
                }
                MoveEffect::Volatile(_) => {
                    utility_score += 30.0 * chance;
                }
                MoveEffect::Heal(percent) => {
                    let missing = 1.0 - attacker.current_hp() as f32 / attacker.max_hp().max(1) as f32;
                    utility_score += *percent as f32 * missing;
                }
                _ => {}
            }
        }

        // --- Step 3: Combine and apply final modifiers ---
        let mut final_score = damage_score + utility_score;

        // Don't use a Status move if it has no utility (e.g., trying to boost a maxed stat).
        if move_data.category == MoveCategory::Status && utility_score < 1.0 {
            return Ok(-1.0);
        }

        let accuracy = move_data.accuracy.unwrap_or(101); // Give a slight edge to sure-hit moves
        final_score *= accuracy as f32 / 100.0;

        // Small random factor to break ties and prevent repetitive loops.
        let random_factor = 1.0 + (self.rng.random::<f32>() * 0.1 - 0.05); // +/- 5%
        final_score *= random_factor;

        Ok(final_score)
    }

    fn score_switch(&mut self) -> f32 {
        // Better than an immune move, worse than almost any decent attack.
        1.0 + self.rng.random::<f32>() * 0.1
    }
}

/// Healing is worth more the closer the target is to fainting.
fn score_item(team_index: usize, player_index: usize, state: &BattleState) -> f32 {
    let player = &state.players[player_index];
    let Some(monster) = player.team.get(team_index).and_then(|slot| slot.as_ref()) else {
        return 0.0;
    };
    if monster.is_fainted() {
        return 10.0;
    }
    let hp_fraction = monster.current_hp() as f32 / monster.max_hp().max(1) as f32;
    let status_bonus = if monster.status.is_some() { 10.0 } else { 0.0 };
    let active_bonus = if team_index == player.active_index { 1.0 } else { 0.5 };
    (60.0 * (1.0 - hp_fraction) - 15.0 + status_bonus) * active_bonus
}

impl Default for ScoringAI {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Behavior for ScoringAI {
    fn decide_action(&mut self, player_index: usize, battle_state: &BattleState) -> PlayerAction {
        // During a replacement phase these are all switches.
        let valid_actions = get_valid_actions(battle_state, player_index);

        valid_actions
            .into_iter()
            .map(|action| {
                let score = self.score_action(&action, player_index, battle_state);
                (action, score)
            })
            .max_by_key(|(_, score)| OrderedFloat(*score))
            .map(|(action, _)| action)
            .unwrap_or(PlayerAction::Forfeit)
    }
}

/// Plays back a fixed list of actions, then falls back to the first valid action.
#[derive(Debug, Default)]
pub struct ScriptedBehavior {
    actions: VecDeque<PlayerAction>,
}

impl ScriptedBehavior {
    pub fn new(actions: impl IntoIterator<Item = PlayerAction>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.actions.len()
    }
}

impl Behavior for ScriptedBehavior {
    fn decide_action(&mut self, player_index: usize, battle_state: &BattleState) -> PlayerAction {
        self.actions.pop_front().unwrap_or_else(|| {
            get_valid_actions(battle_state, player_index)
                .into_iter()
                .next()
                .unwrap_or(PlayerAction::Forfeit)
        })
    }
}
