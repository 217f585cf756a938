use crate::config::BattleConfig;

/// Experience each participant receives for defeating a monster.
///
/// The total is `floor(exp_yield * level * bonus / 7)` where `bonus` is the
/// configured trainer bonus for trainer battles and 1.0 otherwise. The total is
/// split evenly between participants (rounded down, at least 1 each).
pub fn calculate_exp_gain(
    exp_yield: u16,
    defeated_level: u8,
    is_trainer: bool,
    participants: usize,
    config: &BattleConfig,
) -> u32 {
    if participants == 0 {
        return 0;
    }
    let bonus = if is_trainer { config.trainer_exp_bonus } else { 1.0 };
    let total = (exp_yield as f32 * defeated_level as f32 * bonus / 7.0).floor() as u32;
    (total / participants as u32).max(1)
}
