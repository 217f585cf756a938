use crate::{Item, Move, Species};
use thiserror::Error;

/// Main error type for the monster battle engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleEngineError {
    /// Error related to move data lookup or processing
    #[error("Move data error: {0}")]
    MoveData(#[from] MoveDataError),
    /// Error related to species data lookup or processing
    #[error("Species data error: {0}")]
    SpeciesData(#[from] SpeciesDataError),
    #[error("Item data error: {0}")]
    ItemData(#[from] ItemDataError),
    /// Error related to invalid player actions
    #[error("Action error: {0}")]
    Action(#[from] ActionError),
    #[error("Item use error: {0}")]
    ItemUse(#[from] ItemUseError),
    #[error("Party error: {0}")]
    Party(#[from] PartyError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Battle system error: {0}")]
    System(#[from] BattleSystemError),
}

/// Errors related to move data operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveDataError {
    /// The specified move was not found in the database
    #[error("Move not found: {0:?}")]
    MoveNotFound(Move),
    /// Move data is malformed or incomplete
    #[error("Malformed move data: {0}")]
    MalformedData(String),
}

/// Errors related to species data operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeciesDataError {
    /// The specified species was not found in the database
    #[error("Species not found: {0:?}")]
    SpeciesNotFound(Species),
    /// Species data is malformed or incomplete
    #[error("Malformed species data: {0}")]
    MalformedData(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemDataError {
    #[error("Item not found: {0:?}")]
    ItemNotFound(Item),
    #[error("Malformed item data: {0}")]
    MalformedData(String),
}

/// Errors related to player actions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Move index is out of bounds or the slot is empty
    #[error("Invalid move index: {0}")]
    InvalidMoveIndex(usize),
    /// The move in this slot has no SP left while another move still does
    #[error("Move {0} has no SP left")]
    NoSpRemaining(usize),
    /// Team index is out of bounds or the slot is empty
    #[error("Invalid team index: {0}")]
    InvalidTeamIndex(usize),
    /// Action is not valid in the current battle state
    #[error("Invalid action: {0}")]
    InvalidAction(String),
}

/// Reasons an item could not be used. The item is never consumed when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemUseError {
    #[error("{0} would have no effect")]
    NoEffect(Item),
    #[error("{0} can't be used right now")]
    WrongContext(Item),
    #[error("No {0} left in the bag")]
    NotInInventory(Item),
    #[error(transparent)]
    ItemData(#[from] ItemDataError),
    #[error(transparent)]
    SpeciesData(#[from] SpeciesDataError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartyError {
    #[error("The party already has {0} members")]
    PartyFull(usize),
    #[error("No party member at index {0}")]
    InvalidIndex(usize),
}

/// Errors raised when loading or validating a `BattleConfig`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {message}")]
    Io { path: String, message: String },
    #[error("could not parse config: {0}")]
    Parse(String),
    #[error("{field} is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Ways a driven battle can stop without reaching an outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleSystemError {
    #[error("battle still running after {0} turns")]
    TurnLimitExceeded(u32),
    #[error("battle stalled in {0}")]
    Stalled(String),
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using MoveDataError
pub type MoveDataResult<T> = Result<T, MoveDataError>;

/// Type alias for Results using SpeciesDataError
pub type SpeciesDataResult<T> = Result<T, SpeciesDataError>;

pub type ItemDataResult<T> = Result<T, ItemDataError>;

pub type ConfigResult<T> = Result<T, ConfigError>;
