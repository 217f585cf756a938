use crate::battle::state::{BattleState, TurnRng};
use crate::errors::BattleResult;
use crate::monster::{MonsterInst, StatusCondition};
use crate::player::BattlePlayer;
use crate::{Move, Species};

/// A builder for creating test monsters with common defaults.
///
/// # Example
/// ```ignore
/// let monster = TestMonsterBuilder::new(Species::Sparkit, 25)
///     .with_moves(vec![Move::Tackle])
///     .with_status(StatusCondition::Paralysis)
///     .build();
/// ```
pub struct TestMonsterBuilder {
    species: Species,
    level: u8,
    moves: Option<Vec<Move>>,
    status: Option<StatusCondition>,
    current_hp: Option<u16>,
}

impl TestMonsterBuilder {
    /// Without explicit moves the monster knows what its learnset teaches by `level`.
    pub fn new(species: Species, level: u8) -> Self {
        Self {
            species,
            level,
            moves: None,
            status: None,
            current_hp: None,
        }
    }

    pub fn with_moves(mut self, moves: Vec<Move>) -> Self {
        self.moves = Some(moves);
        self
    }

    pub fn with_status(mut self, status: StatusCondition) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the current HP. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn build(self) -> MonsterInst {
        let mut monster = match MonsterInst::new(self.species, self.level, self.moves) {
            Ok(monster) => monster,
            Err(err) => panic!("Failed to load species data for {:?}: {}", self.species, err),
        };

        if let Some(hp) = self.current_hp {
            monster.set_hp(hp);
        }
        monster.status = self.status;
        monster
    }
}

/// Creates a default test player with a given ID, name, and team.
pub fn create_test_player(id: &str, name: &str, team: Vec<MonsterInst>) -> BattlePlayer {
    BattlePlayer::new(id.to_string(), name.to_string(), team)
}

/// Creates a standard 1v1 trainer battle for testing.
pub fn create_test_battle(p1_monster: MonsterInst, p2_monster: MonsterInst) -> BattleState {
    create_team_battle(vec![p1_monster], vec![p2_monster])
}

pub fn create_team_battle(p1_team: Vec<MonsterInst>, p2_team: Vec<MonsterInst>) -> BattleState {
    let player1 = create_test_player("p1", "Player 1", p1_team);
    let player2 = create_test_player("p2", "Player 2", p2_team);

    BattleState::new("test_battle".to_string(), player1, player2)
}

/// Player 1 against a single wild monster.
pub fn create_wild_battle(player_monster: MonsterInst, wild_monster: MonsterInst) -> BattleState {
    let player = create_test_player("p1", "Player 1", vec![player_monster]);
    BattleState::new_wild("test_encounter".to_string(), player, wild_monster)
}

/// A `TurnRng` with a long list of middling values (50).
/// Useful when the specific outcome is not important, preventing panics from exhaustion.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![50; 100])
}

/// Unwrap a result with a readable panic message.
pub fn assert_ok<T>(result: BattleResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}
