// Monster RPG Schema - Shared type definitions
// This crate contains the static, designer-authored data types (species
// templates, move definitions, item definitions) shared by the battle engine
// and anything that needs to read the RON data tables.

// Re-export the main types
pub use battle_data::*;
pub use items::*;
pub use monster_types::*;
pub use moves::*;
pub use species::*;
pub use species_data::*;

pub mod battle_data;
pub mod items;
pub mod monster_types;
pub mod moves;
pub mod species;
pub mod species_data;
