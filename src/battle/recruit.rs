//! Recruiting wild monsters.
//!
//! A recruit attempt answers the wild monster's question. Each answer shifts the
//! monster's affinity toward the player, and affinity carries over between
//! attempts in the same battle. A recruit item from the bag can be offered with
//! the answer to add affinity or multiply the base rate.

use crate::battle::commands::{BattleCommand, ExecutionError, PlayerTarget};
use crate::battle::state::{ActionFailureReason, BattleEvent, BattleState, GameState, TurnRng};
use crate::errors::ItemUseError;
use crate::item_data::get_item_data;
use crate::monster::{MonsterInst, StatusCondition};
use crate::species::get_species_data;
use crate::Item;
use schema::ItemKind;

pub const MAX_AFFINITY: i8 = 10;

fn status_bonus(status: Option<StatusCondition>) -> f32 {
    match status {
        Some(StatusCondition::Sleep(_)) | Some(StatusCondition::Freeze) => 2.0,
        Some(_) => 1.5,
        None => 1.0,
    }
}

/// Probability (0.0..=1.0) that a recruit attempt succeeds.
///
/// `(3 * max_hp - 2 * hp) / (3 * max_hp) * rate * rate_multiplier * status_bonus / 255`,
/// scaled by an affinity factor of `1 + affinity / 10` kept within 0.25..=3.0.
pub fn recruit_chance(target: &MonsterInst, rate: u8, affinity: i8, rate_multiplier: f32) -> f32 {
    let max_hp = target.max_hp().max(1) as f32;
    let hp = target.current_hp() as f32;

    let hp_factor = (3.0 * max_hp - 2.0 * hp) / (3.0 * max_hp);
    let base = hp_factor * rate as f32 * rate_multiplier * status_bonus(target.status) / 255.0;
    let affinity_factor = (1.0 + affinity as f32 / 10.0).clamp(0.25, 3.0);

    (base * affinity_factor).clamp(0.0, 1.0)
}

/// Build the commands for one recruit attempt by `player_index`.
pub fn calculate_recruit_outcome(
    state: &BattleState,
    player_index: usize,
    answer_index: usize,
    lure: Option<Item>,
    rng: &mut TurnRng,
) -> Result<Vec<BattleCommand>, ExecutionError> {
    let recruiter = PlayerTarget::from_index(player_index);
    let wild_player = &state.players[recruiter.opponent().to_index()];
    let target = wild_player.active_monster().ok_or(ExecutionError::NoMonster)?;

    if !state.is_wild() {
        let monster = state.players[player_index]
            .active_monster()
            .ok_or(ExecutionError::NoMonster)?;
        return Ok(vec![BattleCommand::EmitEvent(BattleEvent::ActionFailed {
            monster: monster.species,
            reason: ActionFailureReason::MoveFailed,
        })]);
    }

    let recruit_data = &get_species_data(target.species)?.recruit;
    let answer = recruit_data.answers.get(answer_index).ok_or_else(|| {
        ExecutionError::StateValidation(format!("{} has no answer {}", target.species, answer_index))
    })?;

    let mut commands = Vec::new();
    let (affinity_bonus, rate_multiplier) = match lure {
        Some(item) => match &get_item_data(item)?.kind {
            ItemKind::Recruit {
                affinity_bonus,
                rate_multiplier,
            } => {
                commands.push(BattleCommand::ConsumeItem {
                    target: recruiter,
                    item,
                });
                (*affinity_bonus, *rate_multiplier)
            }
            _ => return Err(ItemUseError::WrongContext(item).into()),
        },
        None => (0, 1.0),
    };

    let affinity = state
        .recruit_affinity
        .saturating_add(answer.affinity)
        .saturating_add(affinity_bonus)
        .clamp(-MAX_AFFINITY, MAX_AFFINITY);
    commands.push(BattleCommand::SetRecruitAffinity(affinity));
    commands.push(BattleCommand::EmitEvent(BattleEvent::RecruitAttempted {
        target: target.species,
        affinity,
    }));

    let chance = recruit_chance(target, recruit_data.rate, affinity, rate_multiplier);
    let threshold = (chance * 100.0).round() as u8;
    let roll = rng.next_outcome("recruit check");
    log::debug!(
        "Recruit {}: chance {:.3}, needed <= {}, rolled {}",
        target.species,
        chance,
        threshold,
        roll
    );

    if roll <= threshold {
        commands.push(BattleCommand::RecruitMonster { target: recruiter });
        commands.push(BattleCommand::SetGameState(GameState::Recruited));
        commands.push(BattleCommand::EmitEvent(BattleEvent::BattleEnded {
            outcome: GameState::Recruited,
        }));
    } else {
        commands.push(BattleCommand::EmitEvent(BattleEvent::RecruitFailed {
            monster: target.species,
        }));
    }
    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::{create_test_battle, create_wild_battle, TestMonsterBuilder};
    use crate::Species;
    use pretty_assertions::assert_eq;

    fn sparkit_encounter() -> BattleState {
        create_wild_battle(
            TestMonsterBuilder::new(Species::Sproutle, 15).build(),
            TestMonsterBuilder::new(Species::Sparkit, 8).build(),
        )
    }

    #[test]
    fn test_recruit_chance_factors() {
        let mut monster = TestMonsterBuilder::new(Species::Sparkit, 8).build();
        let full_hp = recruit_chance(&monster, 190, 0, 1.0);
        assert!((full_hp - 190.0 / 3.0 / 255.0).abs() < 0.001);

        // Lower HP, status and affinity all help
        monster.set_hp(1);
        assert!(recruit_chance(&monster, 190, 0, 1.0) > full_hp);
        monster.status = Some(StatusCondition::Sleep(2));
        let asleep = recruit_chance(&monster, 190, 0, 1.0);
        assert_eq!(asleep, 1.0);

        let monster = TestMonsterBuilder::new(Species::Sparkit, 8).build();
        assert!(recruit_chance(&monster, 190, 5, 1.0) > full_hp);
        assert!(recruit_chance(&monster, 190, -10, 1.0) < full_hp);
        assert!((recruit_chance(&monster, 190, 0, 2.0) - 2.0 * full_hp).abs() < 0.001);
    }

    #[test]
    fn test_recruit_success_and_failure_rolls() {
        let state = sparkit_encounter();
        // Answer 0 has affinity 3: 190 / 3 / 255 * 1.3 = 0.323
        let mut rng = TurnRng::new_for_test(vec![32]);
        let commands = calculate_recruit_outcome(&state, 0, 0, None, &mut rng).unwrap();
        assert!(commands.contains(&BattleCommand::SetGameState(GameState::Recruited)));
        assert!(commands.contains(&BattleCommand::SetRecruitAffinity(3)));

        let mut rng = TurnRng::new_for_test(vec![33]);
        let commands = calculate_recruit_outcome(&state, 0, 0, None, &mut rng).unwrap();
        assert_eq!(
            commands.last(),
            Some(&BattleCommand::EmitEvent(BattleEvent::RecruitFailed {
                monster: Species::Sparkit
            }))
        );
    }

    #[test]
    fn test_affinity_accumulates_and_clamps() {
        let mut state = sparkit_encounter();
        state.recruit_affinity = 9;
        let mut rng = TurnRng::new_for_test(vec![100]);
        let commands = calculate_recruit_outcome(&state, 0, 0, None, &mut rng).unwrap();
        assert!(commands.contains(&BattleCommand::SetRecruitAffinity(10)));

        state.recruit_affinity = -8;
        let mut rng = TurnRng::new_for_test(vec![100]);
        let commands = calculate_recruit_outcome(&state, 0, 2, None, &mut rng).unwrap();
        assert!(commands.contains(&BattleCommand::SetRecruitAffinity(-10)));
    }

    #[test]
    fn test_lure_is_consumed_and_adds_affinity() {
        let state = sparkit_encounter();
        let mut rng = TurnRng::new_for_test(vec![100]);
        let commands =
            calculate_recruit_outcome(&state, 0, 1, Some(Item::FriendshipBerry), &mut rng).unwrap();
        assert_eq!(
            commands[0],
            BattleCommand::ConsumeItem {
                target: PlayerTarget::Player1,
                item: Item::FriendshipBerry,
            }
        );
        assert!(commands.contains(&BattleCommand::SetRecruitAffinity(4)));

        let mut rng = TurnRng::new_for_test(vec![100]);
        let result = calculate_recruit_outcome(&state, 0, 1, Some(Item::Potion), &mut rng);
        assert_eq!(
            result,
            Err(ExecutionError::Item(ItemUseError::WrongContext(Item::Potion)))
        );
    }

    #[test]
    fn test_unknown_answer_is_an_error() {
        let state = sparkit_encounter();
        let mut rng = TurnRng::new_for_test(vec![]);
        assert!(matches!(
            calculate_recruit_outcome(&state, 0, 9, None, &mut rng),
            Err(ExecutionError::StateValidation(_))
        ));
    }

    #[test]
    fn test_cannot_recruit_trainer_monsters() {
        let state = create_test_battle(
            TestMonsterBuilder::new(Species::Sproutle, 15).build(),
            TestMonsterBuilder::new(Species::Sparkit, 8).build(),
        );
        let mut rng = TurnRng::new_for_test(vec![]);
        let commands = calculate_recruit_outcome(&state, 0, 0, None, &mut rng).unwrap();
        assert!(matches!(
            commands.as_slice(),
            [BattleCommand::EmitEvent(BattleEvent::ActionFailed { .. })]
        ));
    }
}
