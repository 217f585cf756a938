pub mod evolution;
pub mod experience;
pub mod learning;
pub mod participation;

pub use experience::calculate_exp_gain;
pub use participation::BattleParticipationTracker;
