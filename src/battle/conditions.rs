//! Start, before-move and after-turn hooks for status and volatile conditions.
//!
//! Hooks never touch the battle state directly. They read it and return the
//! commands that carry out their effect, the same way attack calculation does.

use crate::battle::commands::{BattleCommand, PlayerTarget};
use crate::battle::state::{ActionFailureReason, BattleEvent, BattleState, TurnRng};
use crate::config::BattleConfig;
use crate::monster::StatusCondition;
use schema::{MonsterType, StatusType, VolatileType};
use serde::{Deserialize, Serialize};

/// Conditions that last only while the battler stays in.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlerCondition {
    Confused { turns_remaining: u8 }, // Counts down before each move
    Flinched,                         // Cleared at the end of the turn
}

impl BattlerCondition {
    pub fn volatile_type(&self) -> VolatileType {
        match self {
            BattlerCondition::Confused { .. } => VolatileType::Confusion,
            BattlerCondition::Flinched => VolatileType::Flinch,
        }
    }
}

/// Build the status a monster receives, rolling its duration where it has one.
pub fn on_start_status(status: StatusType, config: &BattleConfig, rng: &mut TurnRng) -> StatusCondition {
    match status {
        StatusType::Poison => StatusCondition::Poison,
        StatusType::Burn => StatusCondition::Burn,
        StatusType::Paralysis => StatusCondition::Paralysis,
        StatusType::Freeze => StatusCondition::Freeze,
        StatusType::Sleep => {
            StatusCondition::Sleep(rng.next_in_range(config.sleep_turns, "sleep duration"))
        }
    }
}

pub fn on_start_volatile(
    volatile: VolatileType,
    config: &BattleConfig,
    rng: &mut TurnRng,
) -> BattlerCondition {
    match volatile {
        VolatileType::Confusion => BattlerCondition::Confused {
            turns_remaining: rng.next_in_range(config.confusion_turns, "confusion duration"),
        },
        VolatileType::Flinch => BattlerCondition::Flinched,
    }
}

/// Types that can never receive a status.
pub fn is_status_immune(status: StatusType, types: &[MonsterType]) -> bool {
    match status {
        StatusType::Burn => types.contains(&MonsterType::Fire),
        StatusType::Poison => types.contains(&MonsterType::Poison),
        StatusType::Freeze => types.contains(&MonsterType::Ice),
        StatusType::Paralysis => types.contains(&MonsterType::Electric),
        StatusType::Sleep => false,
    }
}

/// Result of the before-move checks for one battler.
#[derive(Debug, Clone, Default)]
pub struct BeforeMove {
    pub commands: Vec<BattleCommand>,
    pub blocked: Option<ActionFailureReason>,
    /// Confusion took over; the battler attacks itself instead.
    pub hits_itself: bool,
}

/// Everything that can stop a battler from moving, checked in order:
/// sleep, freeze, flinch, confusion, paralysis.
pub fn on_before_move(state: &BattleState, player_index: usize, rng: &mut TurnRng) -> BeforeMove {
    let mut outcome = BeforeMove::default();
    let player = &state.players[player_index];
    let Some(monster) = player.active_monster() else {
        return outcome;
    };
    let target = PlayerTarget::from_index(player_index);
    let config = &state.config;
    let species = monster.species;

    match monster.status {
        Some(StatusCondition::Sleep(turns)) if turns > 0 => {
            outcome.commands.push(BattleCommand::SetStatus {
                target,
                status: StatusCondition::Sleep(turns - 1),
                announce: false,
            });
            outcome.blocked = Some(ActionFailureReason::IsAsleep);
            return outcome;
        }
        Some(StatusCondition::Sleep(_)) => {
            // Woke up; the move goes ahead this turn.
            outcome.commands.push(BattleCommand::CureStatus { target });
        }
        Some(StatusCondition::Freeze) => {
            if rng.next_outcome("freeze thaw check") <= config.freeze_thaw_chance {
                outcome.commands.push(BattleCommand::CureStatus { target });
            } else {
                outcome.blocked = Some(ActionFailureReason::IsFrozen);
                return outcome;
            }
        }
        _ => {}
    }

    if player.has_condition(VolatileType::Flinch) {
        outcome.commands.push(BattleCommand::RemoveCondition {
            target,
            condition_type: VolatileType::Flinch,
        });
        outcome.blocked = Some(ActionFailureReason::IsFlinching);
        return outcome;
    }

    if let Some(BattlerCondition::Confused { turns_remaining }) =
        player.get_condition(VolatileType::Confusion).copied()
    {
        if turns_remaining == 0 {
            outcome.commands.push(BattleCommand::RemoveCondition {
                target,
                condition_type: VolatileType::Confusion,
            });
            outcome.commands.push(BattleCommand::EmitEvent(BattleEvent::ConditionExpired {
                target: species,
                condition: VolatileType::Confusion,
            }));
        } else {
            outcome.commands.push(BattleCommand::AddCondition {
                target,
                condition: BattlerCondition::Confused {
                    turns_remaining: turns_remaining - 1,
                },
                announce: false,
            });
            if rng.next_outcome("confusion self-hit check") <= config.confusion_self_hit_chance {
                outcome.blocked = Some(ActionFailureReason::IsConfused);
                outcome.hits_itself = true;
                return outcome;
            }
        }
    }

    if matches!(monster.status, Some(StatusCondition::Paralysis))
        && rng.next_outcome("paralysis check") <= config.paralysis_skip_chance
    {
        outcome.blocked = Some(ActionFailureReason::IsParalyzed);
    }

    outcome
}

/// End-of-turn status damage for one battler: poison and burn.
pub fn on_after_turn(state: &BattleState, player_index: usize) -> Vec<BattleCommand> {
    let Some(monster) = state.players[player_index].active_monster() else {
        return Vec::new();
    };
    if monster.is_fainted() {
        return Vec::new();
    }

    let divisor = match monster.status {
        Some(StatusCondition::Poison) => state.config.poison_damage_divisor,
        Some(StatusCondition::Burn) => state.config.burn_damage_divisor,
        _ => return Vec::new(),
    };
    let amount = (monster.max_hp() / divisor).max(1);

    vec![BattleCommand::DealStatusDamage {
        target: PlayerTarget::from_index(player_index),
        amount,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::{create_test_battle, TestMonsterBuilder};
    use crate::Species;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn battle_with_status(status: Option<StatusCondition>) -> BattleState {
        let mut builder = TestMonsterBuilder::new(Species::Sproutle, 20);
        if let Some(status) = status {
            builder = builder.with_status(status);
        }
        create_test_battle(builder.build(), TestMonsterBuilder::new(Species::Emberpup, 20).build())
    }

    #[test]
    fn test_sleep_counts_down_then_wakes() {
        let state = battle_with_status(Some(StatusCondition::Sleep(2)));
        let mut rng = TurnRng::new_for_test(vec![]);
        let outcome = on_before_move(&state, 0, &mut rng);
        assert_eq!(outcome.blocked, Some(ActionFailureReason::IsAsleep));
        assert!(matches!(
            outcome.commands[0],
            BattleCommand::SetStatus {
                status: StatusCondition::Sleep(1),
                ..
            }
        ));

        let state = battle_with_status(Some(StatusCondition::Sleep(0)));
        let outcome = on_before_move(&state, 0, &mut rng);
        assert_eq!(outcome.blocked, None);
        assert!(matches!(outcome.commands[0], BattleCommand::CureStatus { .. }));
    }

    #[rstest]
    #[case(20, None)] // thaws
    #[case(21, Some(ActionFailureReason::IsFrozen))]
    fn test_freeze_thaw_roll(#[case] roll: u8, #[case] expected: Option<ActionFailureReason>) {
        let state = battle_with_status(Some(StatusCondition::Freeze));
        let mut rng = TurnRng::new_for_test(vec![roll]);
        assert_eq!(on_before_move(&state, 0, &mut rng).blocked, expected);
    }

    #[rstest]
    #[case(25, Some(ActionFailureReason::IsParalyzed))]
    #[case(26, None)]
    fn test_paralysis_roll(#[case] roll: u8, #[case] expected: Option<ActionFailureReason>) {
        let state = battle_with_status(Some(StatusCondition::Paralysis));
        let mut rng = TurnRng::new_for_test(vec![roll]);
        assert_eq!(on_before_move(&state, 0, &mut rng).blocked, expected);
    }

    #[test]
    fn test_flinch_blocks_and_clears() {
        let mut state = battle_with_status(None);
        state.players[0].add_condition(BattlerCondition::Flinched);
        let mut rng = TurnRng::new_for_test(vec![]);
        let outcome = on_before_move(&state, 0, &mut rng);
        assert_eq!(outcome.blocked, Some(ActionFailureReason::IsFlinching));
        assert!(matches!(
            outcome.commands[0],
            BattleCommand::RemoveCondition {
                condition_type: VolatileType::Flinch,
                ..
            }
        ));
    }

    #[test]
    fn test_confusion_self_hit_and_expiry() {
        let mut state = battle_with_status(None);
        state.players[0].add_condition(BattlerCondition::Confused { turns_remaining: 2 });

        let mut rng = TurnRng::new_for_test(vec![50]);
        let outcome = on_before_move(&state, 0, &mut rng);
        assert!(outcome.hits_itself);
        assert_eq!(outcome.blocked, Some(ActionFailureReason::IsConfused));

        let mut rng = TurnRng::new_for_test(vec![51]);
        assert!(!on_before_move(&state, 0, &mut rng).hits_itself);

        state.players[0].add_condition(BattlerCondition::Confused { turns_remaining: 0 });
        let mut rng = TurnRng::new_for_test(vec![]);
        let outcome = on_before_move(&state, 0, &mut rng);
        assert!(!outcome.hits_itself);
        assert!(outcome.commands.iter().any(|command| matches!(
            command,
            BattleCommand::EmitEvent(BattleEvent::ConditionExpired { .. })
        )));
    }

    #[rstest]
    #[case(StatusCondition::Poison, 8)]
    #[case(StatusCondition::Burn, 16)]
    fn test_after_turn_damage(#[case] status: StatusCondition, #[case] divisor: u16) {
        let state = battle_with_status(Some(status));
        let max_hp = state.players[0].active_monster().unwrap().max_hp();
        let commands = on_after_turn(&state, 0);
        assert_eq!(commands.len(), 1);
        match &commands[0] {
            BattleCommand::DealStatusDamage { amount, .. } => {
                assert_eq!(*amount, (max_hp / divisor).max(1))
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_sleep_duration_uses_configured_range() {
        let config = BattleConfig::default();
        let mut rng = TurnRng::new_for_test(vec![1, 3]);
        assert_eq!(
            on_start_status(StatusType::Sleep, &config, &mut rng),
            StatusCondition::Sleep(1)
        );
        assert_eq!(
            on_start_status(StatusType::Sleep, &config, &mut rng),
            StatusCondition::Sleep(3)
        );
    }

    #[test]
    fn test_type_based_status_immunity() {
        assert!(is_status_immune(StatusType::Burn, &[MonsterType::Fire]));
        assert!(is_status_immune(StatusType::Poison, &[MonsterType::Bug, MonsterType::Poison]));
        assert!(!is_status_immune(StatusType::Sleep, &[MonsterType::Psychic]));
    }
}
