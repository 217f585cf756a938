pub mod ai;
pub mod calculators;
pub mod commands;
pub mod conditions;
pub mod escape;
pub mod recruit;
pub mod state;
pub mod stats;
pub mod system;
pub mod turn_orchestrator;

#[cfg(test)]
pub mod tests;
