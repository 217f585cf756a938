//! Monster RPG Battle Engine
//!
//! Turn-based battles between two sides of up to six monsters each. A battle
//! runs as a stack of states (`battle::system`), and every turn is resolved by
//! pure calculators that describe their effects as commands
//! (`battle::turn_orchestrator`). Static species, move and item tables live in
//! the `schema` crate and the RON files under `data/`.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod config;
pub mod errors;
pub mod inventory;
pub mod item_data;
pub mod items;
pub mod monster;
pub mod move_data;
pub mod party;
pub mod player;
pub mod progression;
pub mod species;
pub mod state_machine;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    BaseStats,
    DropTable,
    EvolutionData,
    EvolutionMethod,
    GrowthRate,
    // Core Enums
    Item,
    ItemData,
    ItemKind,
    Learnset,
    MonsterType,
    Move,
    MoveCategory,
    MoveData,
    MoveEffect,
    RecruitData,
    Species,
    SpeciesData,
    StatType,
    StatusType,
    Target,
    VolatileType,
};

// --- From this crate's modules (`src/`) ---

// Turn resolution and the battle state machine.
pub use battle::ai::{Behavior, ScoringAI, ScriptedBehavior};
pub use battle::state::{BattleEvent, BattleKind, BattleState, EventBus, GameState, TurnRng};
pub use battle::system::{BattleOutcome, BattleSystem};
pub use battle::turn_orchestrator::{
    get_valid_actions, ready_for_turn_resolution, resolve_turn, validate_player_action,
};

// Core runtime types for a battle.
pub use config::BattleConfig;
pub use inventory::Inventory;
pub use monster::{MonsterInst, StatusCondition};
pub use party::Party;
pub use player::{BattlePlayer, PlayerAction};

// Primary data access functions.
pub use item_data::get_item_data;
pub use move_data::get_move_data;
pub use species::get_species_data;

// Crate-specific error and result types.
pub use errors::{
    ActionError, BattleEngineError, BattleResult, BattleSystemError, ConfigError,
    ItemDataError, ItemUseError, MoveDataError, MoveDataResult, PartyError, SpeciesDataError,
    SpeciesDataResult,
};
