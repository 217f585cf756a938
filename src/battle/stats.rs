use crate::battle::state::TurnRng;
use crate::config::BattleConfig;
use crate::monster::{MonsterInst, StatusCondition};
use crate::player::BattlePlayer;
use schema::{MoveCategory, MoveData, StatType};

/// Effective attacking stat for a move category, including stat stages and burn.
/// Status moves don't use an attacking stat and get 0.
pub fn effective_attack(monster: &MonsterInst, player: &BattlePlayer, category: MoveCategory) -> u16 {
    let (base_attack, attack_stat) = match category {
        MoveCategory::Physical => (monster.stats.attack, StatType::Attack),
        MoveCategory::Special => (monster.stats.sp_attack, StatType::SpAttack),
        MoveCategory::Status => return 0,
    };

    let stage = player.get_stat_stage(attack_stat);
    let mut attack = apply_stat_stage_multiplier(base_attack, stage);

    // Burn halves physical attack
    if category == MoveCategory::Physical && matches!(monster.status, Some(StatusCondition::Burn)) {
        attack /= 2;
    }

    attack.max(1)
}

pub fn effective_defense(monster: &MonsterInst, player: &BattlePlayer, category: MoveCategory) -> u16 {
    let (base_defense, defense_stat) = match category {
        MoveCategory::Physical => (monster.stats.defense, StatType::Defense),
        MoveCategory::Special => (monster.stats.sp_defense, StatType::SpDefense),
        MoveCategory::Status => return 0,
    };

    let stage = player.get_stat_stage(defense_stat);
    apply_stat_stage_multiplier(base_defense, stage).max(1)
}

/// Effective speed including stat stages and paralysis
pub fn effective_speed(monster: &MonsterInst, player: &BattlePlayer) -> u16 {
    let stage = player.get_stat_stage(StatType::Speed);
    let mut speed = apply_stat_stage_multiplier(monster.stats.speed, stage);

    // Paralysis quarters speed
    if matches!(monster.status, Some(StatusCondition::Paralysis)) {
        speed /= 4;
    }

    speed
}

/// Roll whether a move hits. Moves without an accuracy value never miss and consume no roll.
pub fn move_hits(
    attacker_player: &BattlePlayer,
    defender_player: &BattlePlayer,
    move_data: &MoveData,
    rng: &mut TurnRng,
) -> bool {
    let Some(base_accuracy) = move_data.accuracy else {
        return true;
    };

    // Attacker's accuracy minus the defender's evasion
    let accuracy_stage = attacker_player.get_stat_stage(StatType::Accuracy);
    let evasion_stage = defender_player.get_stat_stage(StatType::Evasion);
    let adjusted_stage = (accuracy_stage - evasion_stage).clamp(-6, 6);

    let modified_accuracy = (base_accuracy as f64 * accuracy_stage_multiplier(adjusted_stage)).round();
    let clamped_accuracy = modified_accuracy.clamp(1.0, 100.0) as u8;

    rng.next_outcome("accuracy check") <= clamped_accuracy
}

pub fn is_critical_hit(crit_stage: u8, config: &BattleConfig, rng: &mut TurnRng) -> bool {
    rng.next_outcome("critical hit check") <= config.crit_chance(crit_stage)
}

/// Accuracy/evasion multiplier for a combined stage in -6..=6
pub fn accuracy_stage_multiplier(stage: i8) -> f64 {
    match stage.clamp(-6, 6) {
        -6 => 3.0 / 9.0,
        -5 => 3.0 / 8.0,
        -4 => 3.0 / 7.0,
        -3 => 3.0 / 6.0,
        -2 => 3.0 / 5.0,
        -1 => 3.0 / 4.0,
        1 => 4.0 / 3.0,
        2 => 5.0 / 3.0,
        3 => 6.0 / 3.0,
        4 => 7.0 / 3.0,
        5 => 8.0 / 3.0,
        6 => 9.0 / 3.0,
        _ => 1.0,
    }
}

/// Stat stage multiplier: `(2 + stage) / 2` when raised, `2 / (2 - stage)` when lowered.
pub fn stat_stage_multiplier(stage: i8) -> f64 {
    let clamped_stage = stage.clamp(-6, 6);
    if clamped_stage < 0 {
        2.0 / (2.0 - clamped_stage as f64)
    } else {
        (2.0 + clamped_stage as f64) / 2.0
    }
}

fn apply_stat_stage_multiplier(base_stat: u16, stage: i8) -> u16 {
    if stage == 0 {
        return base_stat;
    }
    ((base_stat as f64) * stat_stage_multiplier(stage)).round() as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::{create_test_player, TestMonsterBuilder};
    use crate::move_data::get_move_data;
    use crate::{Move, Species};
    use rstest::rstest;

    #[rstest]
    #[case(0, 100)]
    #[case(1, 150)]
    #[case(2, 200)]
    #[case(6, 400)]
    #[case(-1, 67)]
    #[case(-2, 50)]
    #[case(-6, 25)]
    fn test_stat_stage_multipliers(#[case] stage: i8, #[case] expected: u16) {
        assert_eq!(apply_stat_stage_multiplier(100, stage), expected);
    }

    #[test]
    fn test_accuracy_stage_multipliers() {
        assert!((accuracy_stage_multiplier(0) - 1.0).abs() < 0.001);
        assert!((accuracy_stage_multiplier(1) - 4.0 / 3.0).abs() < 0.001);
        assert!((accuracy_stage_multiplier(-1) - 3.0 / 4.0).abs() < 0.001);
        assert!((accuracy_stage_multiplier(6) - 3.0).abs() < 0.001);
        assert!((accuracy_stage_multiplier(-6) - 1.0 / 3.0).abs() < 0.001);
    }

    #[test]
    fn test_burn_and_paralysis_modifiers() {
        let burned = TestMonsterBuilder::new(Species::Emberpup, 50)
            .with_status(StatusCondition::Burn)
            .build();
        let player = create_test_player("p1", "Player 1", vec![burned.clone()]);
        assert_eq!(
            effective_attack(&burned, &player, MoveCategory::Physical),
            (burned.stats.attack / 2).max(1)
        );
        assert_eq!(
            effective_attack(&burned, &player, MoveCategory::Special),
            burned.stats.sp_attack
        );

        let paralyzed = TestMonsterBuilder::new(Species::Sparkit, 50)
            .with_status(StatusCondition::Paralysis)
            .build();
        let player = create_test_player("p1", "Player 1", vec![paralyzed.clone()]);
        assert_eq!(effective_speed(&paralyzed, &player), paralyzed.stats.speed / 4);
    }

    #[test]
    fn test_stages_apply_to_effective_stats() {
        let monster = TestMonsterBuilder::new(Species::Sproutle, 50).build();
        let mut player = create_test_player("p1", "Player 1", vec![monster.clone()]);
        player.set_stat_stage(StatType::Defense, 2);
        assert_eq!(
            effective_defense(&monster, &player, MoveCategory::Physical),
            monster.stats.defense * 2
        );
        assert_eq!(effective_defense(&monster, &player, MoveCategory::Status), 0);
    }

    #[test]
    fn test_move_hits_uses_accuracy_and_evasion() {
        let monster = TestMonsterBuilder::new(Species::Sproutle, 10).build();
        let attacker = create_test_player("p1", "Player 1", vec![monster.clone()]);
        let mut defender = create_test_player("p2", "Player 2", vec![monster]);
        let sleep_powder = get_move_data(Move::SleepPowder).unwrap(); // 75 accuracy

        let mut rng = TurnRng::new_for_test(vec![75, 76]);
        assert!(move_hits(&attacker, &defender, sleep_powder, &mut rng));
        assert!(!move_hits(&attacker, &defender, sleep_powder, &mut rng));

        // -1 evasion for the defender turns into +1 for the attacker: 75 * 4/3 = 100
        defender.set_stat_stage(StatType::Evasion, -1);
        let mut rng = TurnRng::new_for_test(vec![100]);
        assert!(move_hits(&attacker, &defender, sleep_powder, &mut rng));
    }

    #[test]
    fn test_critical_hits_follow_config() {
        let config = BattleConfig::default();
        let mut rng = TurnRng::new_for_test(vec![6, 7, 13]);
        assert!(is_critical_hit(0, &config, &mut rng));
        assert!(!is_critical_hit(0, &config, &mut rng));
        assert!(is_critical_hit(1, &config, &mut rng));
    }
}
