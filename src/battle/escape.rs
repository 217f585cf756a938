use crate::battle::commands::BattleCommand;
use crate::battle::state::{ActionFailureReason, BattleEvent, BattleState, GameState, TurnRng};
use crate::battle::stats::effective_speed;

/// Odds out of 256 that a slower monster gets away on attempt number `attempts`.
pub fn escape_odds(speed: u16, foe_speed: u16, attempts: u8) -> u32 {
    let speed_term = speed as u32 * 128 / foe_speed.max(1) as u32;
    (speed_term + 30 * attempts as u32) % 256
}

/// Try to run from a wild battle.
///
/// A monster at least as fast as its foe always gets away. Otherwise one roll is
/// scaled to 0..256 and compared against [`escape_odds`], which grows with every
/// failed attempt.
pub fn calculate_escape_outcome(
    state: &BattleState,
    player_index: usize,
    rng: &mut TurnRng,
) -> Vec<BattleCommand> {
    let player = &state.players[player_index];
    let Some(runner) = player.active_monster() else {
        return Vec::new();
    };

    if !state.is_wild() {
        return vec![BattleCommand::EmitEvent(BattleEvent::ActionFailed {
            monster: runner.species,
            reason: ActionFailureReason::CannotEscape,
        })];
    }

    let opponent = &state.players[1 - player_index];
    let attempts = state.escape_attempts.saturating_add(1);
    let mut commands = vec![BattleCommand::IncrementEscapeAttempts];

    let speed = effective_speed(runner, player);
    let foe_speed = opponent
        .active_monster()
        .map(|foe| effective_speed(foe, opponent))
        .unwrap_or(0);

    let escaped = if speed >= foe_speed {
        true
    } else {
        let odds = escape_odds(speed, foe_speed, attempts);
        let roll = rng.next_outcome("escape check");
        ((roll.saturating_sub(1)) as u32 * 256 / 100) < odds
    };

    commands.push(BattleCommand::EmitEvent(BattleEvent::EscapeAttempted {
        player_index,
        success: escaped,
    }));
    if escaped {
        commands.push(BattleCommand::SetGameState(GameState::Escaped));
        commands.push(BattleCommand::EmitEvent(BattleEvent::BattleEnded {
            outcome: GameState::Escaped,
        }));
    }
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::{create_test_battle, create_wild_battle, TestMonsterBuilder};
    use crate::Species;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(50, 100, 1, 94)]
    #[case(50, 100, 2, 124)]
    #[case(100, 100, 0, 128)]
    #[case(90, 20, 1, 94)] // 576 + 30 wraps around
    fn test_escape_odds(#[case] speed: u16, #[case] foe: u16, #[case] attempts: u8, #[case] expected: u32) {
        assert_eq!(escape_odds(speed, foe, attempts), expected);
    }

    #[test]
    fn test_faster_monster_always_escapes() {
        let state = create_wild_battle(
            TestMonsterBuilder::new(Species::Sparkit, 20).build(),
            TestMonsterBuilder::new(Species::Pebblor, 5).build(),
        );
        let mut rng = TurnRng::new_for_test(vec![]);
        let commands = calculate_escape_outcome(&state, 0, &mut rng);
        assert!(commands.contains(&BattleCommand::SetGameState(GameState::Escaped)));
    }

    #[test]
    fn test_slower_monster_rolls_against_odds() {
        let state = create_wild_battle(
            TestMonsterBuilder::new(Species::Pebblor, 5).build(),
            TestMonsterBuilder::new(Species::Sparkit, 30).build(),
        );
        let mut rng = TurnRng::new_for_test(vec![100]);
        let commands = calculate_escape_outcome(&state, 0, &mut rng);
        assert_eq!(
            commands,
            vec![
                BattleCommand::IncrementEscapeAttempts,
                BattleCommand::EmitEvent(BattleEvent::EscapeAttempted {
                    player_index: 0,
                    success: false,
                }),
            ]
        );

        let mut rng = TurnRng::new_for_test(vec![1]);
        let commands = calculate_escape_outcome(&state, 0, &mut rng);
        assert!(commands.contains(&BattleCommand::SetGameState(GameState::Escaped)));
    }

    #[test]
    fn test_no_escape_from_trainer_battles() {
        let state = create_test_battle(
            TestMonsterBuilder::new(Species::Sparkit, 20).build(),
            TestMonsterBuilder::new(Species::Pebblor, 5).build(),
        );
        let mut rng = TurnRng::new_for_test(vec![]);
        let commands = calculate_escape_outcome(&state, 0, &mut rng);
        assert!(matches!(
            commands.as_slice(),
            [BattleCommand::EmitEvent(BattleEvent::ActionFailed {
                reason: ActionFailureReason::CannotEscape,
                ..
            })]
        ));
    }
}
