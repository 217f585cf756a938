use crate::config::BattleConfig;
use crate::errors::ConfigResult;
use crate::monster::MonsterInst;
use crate::player::{BattlePlayer, PlayerAction};
use crate::progression::BattleParticipationTracker;
use crate::{Item, Move, Species};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schema::{StatType, StatusType, VolatileType};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Copy)]
pub enum GameState {
    WaitingForActions,
    TurnInProgress,
    WaitingForPlayer1Replacement, // Player 1 needs to send out a new monster after a faint
    WaitingForPlayer2Replacement, // Player 2 needs to send out a new monster after a faint
    WaitingForBothReplacements,   // Both players need to send out new monsters after faints
    Player1Win,
    Player2Win,
    Draw,
    Escaped,   // Player 1 ran from a wild battle
    Recruited, // Player 1 recruited the wild monster
}

impl GameState {
    pub fn is_over(&self) -> bool {
        matches!(
            self,
            GameState::Player1Win
                | GameState::Player2Win
                | GameState::Draw
                | GameState::Escaped
                | GameState::Recruited
        )
    }

    /// Index of the winning side. Escaping has no winner.
    pub fn winner(&self) -> Option<usize> {
        match self {
            GameState::Player1Win | GameState::Recruited => Some(0),
            GameState::Player2Win => Some(1),
            _ => None,
        }
    }

    pub fn needs_replacement(&self, player_index: usize) -> bool {
        match self {
            GameState::WaitingForPlayer1Replacement => player_index == 0,
            GameState::WaitingForPlayer2Replacement => player_index == 1,
            GameState::WaitingForBothReplacements => true,
            _ => false,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleKind {
    Wild,
    Trainer,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Turn Management
    TurnStarted {
        turn_number: u32,
    },
    TurnEnded,

    // Monster Actions
    MonsterSwitched {
        player_index: usize,
        old_monster: Species,
        new_monster: Species,
    },
    MoveUsed {
        player_index: usize,
        monster: Species,
        move_used: Move,
    },
    MoveMissed {
        attacker: Species,
        defender: Species,
        move_used: Move,
    },
    MoveHit {
        attacker: Species,
        defender: Species,
        move_used: Move,
    },
    CriticalHit {
        attacker: Species,
        defender: Species,
        move_used: Move,
    },
    AttackTypeEffectiveness {
        multiplier: f32,
    },
    DamageDealt {
        target: Species,
        damage: u16,
        remaining_hp: u16,
    },
    MonsterHealed {
        target: Species,
        amount: u16,
        new_hp: u16,
    },
    MonsterFainted {
        player_index: usize,
        monster: Species,
    },

    // Status and volatile conditions
    StatusApplied {
        target: Species,
        status: StatusType,
    },
    StatusRemoved {
        target: Species,
        status: StatusType,
    },
    StatusDamage {
        target: Species,
        status: StatusType,
        damage: u16,
        remaining_hp: u16,
    },
    ConditionApplied {
        target: Species,
        condition: VolatileType,
    },
    ConditionExpired {
        target: Species,
        condition: VolatileType,
    },
    StatStageChanged {
        target: Species,
        stat: StatType,
        old_stage: i8,
        new_stage: i8,
    },
    StatChangeBlocked {
        target: Species,
        stat: StatType,
        rising: bool,
    },

    ActionFailed {
        monster: Species,
        reason: ActionFailureReason,
    },
    ItemUsed {
        player_index: usize,
        item: Item,
        target: Species,
    },

    // Wild encounters
    EscapeAttempted {
        player_index: usize,
        success: bool,
    },
    RecruitAttempted {
        target: Species,
        affinity: i8,
    },
    RecruitSucceeded {
        monster: Species,
        team_slot: Option<usize>,
    },
    RecruitFailed {
        monster: Species,
    },

    // Progression
    ExpGained {
        player_index: usize,
        monster: Species,
        amount: u32,
    },
    LevelUp {
        player_index: usize,
        monster: Species,
        new_level: u8,
    },
    MoveLearned {
        monster: Species,
        move_learned: Move,
    },
    MoveNotLearned {
        monster: Species,
        move_not_learned: Move,
    },
    Evolved {
        player_index: usize,
        from: Species,
        into: Species,
    },

    // Rewards
    ItemDropped {
        player_index: usize,
        item: Item,
        quantity: u16,
    },
    MoneyGained {
        player_index: usize,
        amount: u32,
    },

    // Battle End
    PlayerDefeated {
        player_index: usize,
    },
    BattleEnded {
        outcome: GameState,
    },
}

impl BattleEvent {
    /// Formats the event into a human-readable string using battle context.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self, battle_state: &BattleState) -> Option<String> {
        let player_name = |index: &usize| {
            battle_state
                .players
                .get(*index)
                .map(|player| player.player_name.as_str())
                .unwrap_or("???")
        };

        match self {
            // === Turn Management Events ===
            BattleEvent::TurnStarted { turn_number } => {
                Some(format!("=== Turn {} ===", turn_number))
            }
            BattleEvent::TurnEnded => None,

            // === Switching ===
            BattleEvent::MonsterSwitched {
                player_index,
                old_monster,
                new_monster,
            } => Some(format!(
                "{} recalled {} and sent out {}!",
                player_name(player_index),
                old_monster,
                new_monster
            )),

            // === Move Events ===
            BattleEvent::MoveUsed { monster, move_used, .. } if *move_used == Move::HitItself => {
                Some(format!("{} hurt itself in its confusion!", monster))
            }
            // The wild side has no trainer to name
            BattleEvent::MoveUsed {
                player_index: 1,
                monster,
                move_used,
            } if battle_state.is_wild() => Some(format!("Wild {} used {}!", monster, move_used)),
            BattleEvent::MoveUsed {
                player_index,
                monster,
                move_used,
            } => Some(format!(
                "{}'s {} used {}!",
                player_name(player_index),
                monster,
                move_used
            )),
            BattleEvent::MoveMissed { attacker, .. } => {
                Some(format!("{}'s attack missed!", attacker))
            }
            BattleEvent::MoveHit { .. } => None, // Obvious from damage/effects
            BattleEvent::CriticalHit { .. } => Some("A critical hit!".to_string()),
            BattleEvent::AttackTypeEffectiveness { multiplier } => match *multiplier {
                m if m > 1.0 => Some("It's super effective!".to_string()),
                m if m > 0.0 && m < 1.0 => Some("It's not very effective...".to_string()),
                m if m == 0.0 => Some("It had no effect!".to_string()),
                _ => None,
            },

            // === Damage and Healing Events ===
            BattleEvent::DamageDealt { target, damage, .. } => {
                Some(format!("{} took {} damage!", target, damage))
            }
            BattleEvent::MonsterHealed { target, amount, .. } => {
                Some(format!("{} recovered {} HP!", target, amount))
            }
            BattleEvent::MonsterFainted { monster, .. } => Some(format!("{} fainted!", monster)),

            // === Status Events ===
            BattleEvent::StatusApplied { target, status } => {
                Some(format!("{} {}", target, Self::format_status_applied(*status)))
            }
            BattleEvent::StatusRemoved { target, status } => {
                Some(format!("{} {}", target, Self::format_status_removed(*status)))
            }
            BattleEvent::StatusDamage {
                target,
                status,
                damage,
                ..
            } => Some(format!(
                "{} is hurt by its {}! ({} damage)",
                target, status, damage
            )),
            BattleEvent::ConditionApplied { target, condition } => match condition {
                VolatileType::Confusion => Some(format!("{} became confused!", target)),
                VolatileType::Flinch => None, // Reported when it stops a move
            },
            BattleEvent::ConditionExpired { target, condition } => match condition {
                VolatileType::Confusion => Some(format!("{} snapped out of its confusion!", target)),
                VolatileType::Flinch => None,
            },

            // === Stat Change Events ===
            BattleEvent::StatStageChanged {
                target,
                stat,
                old_stage,
                new_stage,
            } => {
                let magnitude = match (new_stage - old_stage).abs() {
                    1 => "",
                    2 => " sharply",
                    _ => " drastically",
                };
                if new_stage > old_stage {
                    Some(format!("{}'s {}{} rose!", target, stat, magnitude))
                } else {
                    Some(format!("{}'s {}{} fell!", target, stat, magnitude))
                }
            }
            BattleEvent::StatChangeBlocked { target, stat, rising } => Some(format!(
                "{}'s {} won't go any {}!",
                target,
                stat,
                if *rising { "higher" } else { "lower" }
            )),

            // === Action Failure Events ===
            BattleEvent::ActionFailed { monster, reason } => {
                Some(Self::format_action_failure_reason(*monster, reason))
            }
            BattleEvent::ItemUsed {
                player_index,
                item,
                target,
            } => Some(format!(
                "{} used a {} on {}!",
                player_name(player_index),
                item,
                target
            )),

            // === Wild Encounter Events ===
            BattleEvent::EscapeAttempted { success, .. } => {
                if *success {
                    Some("Got away safely!".to_string())
                } else {
                    Some("Couldn't get away!".to_string())
                }
            }
            BattleEvent::RecruitAttempted { target, affinity } => {
                let mood = match affinity {
                    a if *a >= 5 => "looks delighted",
                    a if *a > 0 => "seems interested",
                    0 => "is sizing you up",
                    _ => "looks annoyed",
                };
                Some(format!("{} {}...", target, mood))
            }
            BattleEvent::RecruitSucceeded { monster, team_slot } => match team_slot {
                Some(_) => Some(format!("{} joined the party!", monster)),
                None => Some(format!("{} joined! The party is full, so it was sent to storage.", monster)),
            },
            BattleEvent::RecruitFailed { monster } => {
                Some(format!("{} refused to join.", monster))
            }

            // === Progression Events ===
            BattleEvent::ExpGained { monster, amount, .. } => {
                Some(format!("{} gained {} Exp. Points!", monster, amount))
            }
            BattleEvent::LevelUp {
                monster, new_level, ..
            } => Some(format!("{} grew to level {}!", monster, new_level)),
            BattleEvent::MoveLearned {
                monster,
                move_learned,
            } => Some(format!("{} learned {}!", monster, move_learned)),
            BattleEvent::MoveNotLearned {
                monster,
                move_not_learned,
            } => Some(format!(
                "{} wants to learn {}, but it already knows four moves.",
                monster, move_not_learned
            )),
            BattleEvent::Evolved { from, into, .. } => {
                Some(format!("{} evolved into {}!", from, into))
            }

            // === Reward Events ===
            BattleEvent::ItemDropped {
                player_index,
                item,
                quantity,
            } => Some(format!(
                "{} found {} x{}!",
                player_name(player_index),
                item,
                quantity
            )),
            BattleEvent::MoneyGained {
                player_index,
                amount,
            } => Some(format!("{} picked up ${}!", player_name(player_index), amount)),

            // === Battle End Events ===
            BattleEvent::PlayerDefeated { player_index } => Some(format!(
                "{} is out of usable monsters!",
                player_name(player_index)
            )),
            BattleEvent::BattleEnded { outcome } => match outcome.winner() {
                _ if *outcome == GameState::Escaped => None, // Already reported by the escape
                Some(index) => Some(format!("{} has won the battle!", player_name(&index))),
                None => Some("The battle ended in a draw!".to_string()),
            },
        }
    }

    // --- Private Helper Functions ---

    fn format_status_applied(status: StatusType) -> &'static str {
        match status {
            StatusType::Poison => "was poisoned!",
            StatusType::Burn => "was burned!",
            StatusType::Sleep => "fell asleep!",
            StatusType::Paralysis => "is paralyzed! It may be unable to move!",
            StatusType::Freeze => "was frozen solid!",
        }
    }

    fn format_status_removed(status: StatusType) -> &'static str {
        match status {
            StatusType::Poison => "was cured of its poisoning.",
            StatusType::Burn => "was cured of its burn.",
            StatusType::Sleep => "woke up!",
            StatusType::Paralysis => "was cured of paralysis.",
            StatusType::Freeze => "thawed out!",
        }
    }

    fn format_action_failure_reason(monster: Species, reason: &ActionFailureReason) -> String {
        match reason {
            ActionFailureReason::IsAsleep => format!("{} is fast asleep.", monster),
            ActionFailureReason::IsFrozen => format!("{} is frozen solid!", monster),
            ActionFailureReason::IsParalyzed => format!("{} is paralyzed! It can't move!", monster),
            ActionFailureReason::IsFlinching => format!("{} flinched and couldn't move!", monster),
            ActionFailureReason::IsConfused => format!("{} is confused!", monster),
            ActionFailureReason::NoSpRemaining => {
                format!("{} has no SP left for that move!", monster)
            }
            ActionFailureReason::MonsterFainted => format!("{} can't battle!", monster),
            ActionFailureReason::NoEnemyPresent => "But there was no target...".to_string(),
            ActionFailureReason::CannotEscape => "There's no running from a trainer battle!".to_string(),
            ActionFailureReason::MoveFailed => "But it failed!".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionFailureReason {
    IsAsleep,
    IsFrozen,
    IsParalyzed,
    IsFlinching,
    IsConfused,
    NoSpRemaining,
    MonsterFainted, // The acting monster fainted before it could move
    NoEnemyPresent, // A foe-targeting move found nothing to hit
    CannotEscape,
    MoveFailed,
}

/// Collects the events of a turn (or a whole battle) in order.
///
/// ```rust,ignore
/// event_bus.log_debug("Turn 1 events:");   // every event at debug level
/// event_bus.log_formatted(&battle_state);  // human-readable lines at info level
/// println!("{}", event_bus);               // raw event list
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }

    pub fn extend(&mut self, other: EventBus) {
        self.events.extend(other.events);
    }

    /// Log all events in debug format under a header message.
    pub fn log_debug(&self, message: &str) {
        log::debug!("{}", message);
        for event in &self.events {
            log::debug!("  {:?}", event);
        }
    }

    /// Log the formatted text of every event that has any.
    pub fn log_formatted(&self, battle_state: &BattleState) {
        for line in self.formatted_lines(battle_state) {
            log::info!("{}", line);
        }
    }

    pub fn formatted_lines(&self, battle_state: &BattleState) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|event| event.format(battle_state))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl std::fmt::Display for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum RngSource {
    Scripted { outcomes: Vec<u8>, index: usize },
    Seeded(StdRng),
}

/// Source of every random decision in a battle. Outcomes are percentiles in 1..=100.
#[derive(Debug, Clone)]
pub struct TurnRng {
    source: RngSource,
}

impl TurnRng {
    /// Replays `outcomes` in order and panics once they run out.
    pub fn new_for_test(outcomes: Vec<u8>) -> Self {
        Self {
            source: RngSource::Scripted { outcomes, index: 0 },
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: RngSource::Seeded(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn new_random() -> Self {
        Self {
            source: RngSource::Seeded(StdRng::from_rng(&mut rand::rng())),
        }
    }

    pub fn next_outcome(&mut self, reason: &str) -> u8 {
        let outcome = match &mut self.source {
            RngSource::Scripted { outcomes, index } => {
                let Some(outcome) = outcomes.get(*index).copied() else {
                    panic!(
                        "TurnRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                        reason
                    );
                };
                *index += 1;
                outcome
            }
            RngSource::Seeded(rng) => rng.random_range(1..=100),
        };
        log::debug!("[RNG] Consumed {} for: {}", outcome, reason);
        outcome
    }

    /// Map one outcome onto the inclusive range `(min, max)`.
    pub fn next_in_range(&mut self, (min, max): (u8, u8), reason: &str) -> u8 {
        let roll = self.next_outcome(reason);
        if max <= min {
            return min;
        }
        let span = (max - min) as u16 + 1;
        min + ((roll - 1) as u16 % span) as u8
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BattleState {
    pub battle_id: String,
    pub kind: BattleKind,
    pub players: [BattlePlayer; 2],
    pub turn_number: u32,
    pub game_state: GameState,
    pub action_queue: [Option<PlayerAction>; 2],
    pub config: BattleConfig,
    pub participation: BattleParticipationTracker,
    pub escape_attempts: u8,
    /// Accumulated answer affinity toward the wild monster, -10..=10.
    pub recruit_affinity: i8,
    /// A recruited monster that found no free team slot.
    pub recruited: Option<MonsterInst>,
}

impl BattleState {
    pub fn new(id: String, player1: BattlePlayer, player2: BattlePlayer) -> Self {
        let mut participation = BattleParticipationTracker::new();
        participation.record_participation(player1.active_index, player2.active_index);

        Self {
            battle_id: id,
            kind: BattleKind::Trainer,
            players: [player1, player2],
            turn_number: 1,
            game_state: GameState::WaitingForActions,
            action_queue: [None, None],
            config: BattleConfig::default(),
            participation,
            escape_attempts: 0,
            recruit_affinity: 0,
            recruited: None,
        }
    }

    /// An encounter with a single wild monster.
    pub fn new_wild(id: String, player: BattlePlayer, wild_monster: MonsterInst) -> Self {
        let species = wild_monster.species;
        let wild = BattlePlayer::new(
            format!("wild_{}", species.name().to_lowercase()),
            format!("Wild {}", species),
            vec![wild_monster],
        );
        let mut state = Self::new(id, player, wild);
        state.kind = BattleKind::Wild;
        state
    }

    /// Install rule overrides. Rejects configs that fail [`BattleConfig::validate`].
    pub fn with_config(mut self, config: BattleConfig) -> ConfigResult<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn is_wild(&self) -> bool {
        self.kind == BattleKind::Wild
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::{create_test_battle, create_wild_battle, TestMonsterBuilder};
    use pretty_assertions::assert_eq;

    fn create_test_battle_state() -> BattleState {
        create_test_battle(
            TestMonsterBuilder::new(Species::Sproutle, 10).build(),
            TestMonsterBuilder::new(Species::Emberpup, 10).build(),
        )
    }

    #[test]
    fn test_silent_events_return_none() {
        let state = create_test_battle_state();
        let silent = [
            BattleEvent::TurnEnded,
            BattleEvent::MoveHit {
                attacker: Species::Sproutle,
                defender: Species::Emberpup,
                move_used: Move::Tackle,
            },
            BattleEvent::AttackTypeEffectiveness { multiplier: 1.0 },
            BattleEvent::ConditionApplied {
                target: Species::Emberpup,
                condition: VolatileType::Flinch,
            },
        ];
        for event in silent {
            assert_eq!(event.format(&state), None, "{:?} should be silent", event);
        }
    }

    #[test]
    fn test_event_text_samples() {
        let state = create_test_battle_state();
        let cases = [
            (BattleEvent::TurnStarted { turn_number: 3 }, "=== Turn 3 ==="),
            (
                BattleEvent::MoveUsed {
                    player_index: 0,
                    monster: Species::Sproutle,
                    move_used: Move::VineWhip,
                },
                "Player 1's Sproutle used Vine Whip!",
            ),
            (
                BattleEvent::MoveUsed {
                    player_index: 1,
                    monster: Species::Emberpup,
                    move_used: Move::HitItself,
                },
                "Emberpup hurt itself in its confusion!",
            ),
            (
                BattleEvent::AttackTypeEffectiveness { multiplier: 2.0 },
                "It's super effective!",
            ),
            (
                BattleEvent::StatusApplied {
                    target: Species::Emberpup,
                    status: StatusType::Sleep,
                },
                "Emberpup fell asleep!",
            ),
            (
                BattleEvent::StatStageChanged {
                    target: Species::Sproutle,
                    stat: StatType::Attack,
                    old_stage: 0,
                    new_stage: 2,
                },
                "Sproutle's Attack sharply rose!",
            ),
            (
                BattleEvent::BattleEnded {
                    outcome: GameState::Player2Win,
                },
                "Player 2 has won the battle!",
            ),
        ];
        for (event, expected) in cases {
            assert_eq!(event.format(&state).as_deref(), Some(expected));
        }
    }

    #[test]
    fn test_wild_moves_name_the_monster_only() {
        let state = create_wild_battle(
            TestMonsterBuilder::new(Species::Sproutle, 10).build(),
            TestMonsterBuilder::new(Species::Pebblor, 10).build(),
        );
        let wild_move = BattleEvent::MoveUsed {
            player_index: 1,
            monster: Species::Pebblor,
            move_used: Move::Tackle,
        };
        let own_move = BattleEvent::MoveUsed {
            player_index: 0,
            monster: Species::Sproutle,
            move_used: Move::Tackle,
        };
        assert_eq!(wild_move.format(&state).as_deref(), Some("Wild Pebblor used Tackle!"));
        assert_eq!(
            own_move.format(&state).as_deref(),
            Some("Player 1's Sproutle used Tackle!")
        );
    }

    #[test]
    fn test_range_mapping_covers_the_full_u8_span() {
        let mut rng = TurnRng::new_for_test(vec![1, 100]);
        assert_eq!(rng.next_in_range((0, 255), "wide"), 0);
        assert_eq!(rng.next_in_range((0, 255), "wide"), 99);
    }

    #[test]
    fn test_with_config_rejects_invalid_rules() {
        let config = BattleConfig {
            sleep_turns: (0, 255),
            ..BattleConfig::default()
        };
        let result = create_test_battle_state().with_config(config);
        assert!(matches!(
            result,
            Err(crate::errors::ConfigError::Invalid {
                field: "sleep_turns",
                ..
            })
        ));

        let tuned = BattleConfig {
            freeze_thaw_chance: 40,
            ..BattleConfig::default()
        };
        let state = create_test_battle_state().with_config(tuned).unwrap();
        assert_eq!(state.config.freeze_thaw_chance, 40);
    }

    #[test]
    fn test_event_bus_collects_in_order() {
        let state = create_test_battle_state();
        let mut bus = EventBus::new();
        bus.push(BattleEvent::TurnStarted { turn_number: 1 });
        bus.push(BattleEvent::TurnEnded);
        assert_eq!(bus.len(), 2);
        assert_eq!(bus.formatted_lines(&state), vec!["=== Turn 1 ===".to_string()]);
        assert!(bus.to_string().contains("TurnEnded"));
        bus.log_debug("test events");
    }

    #[test]
    fn test_scripted_rng_replays_outcomes() {
        let mut rng = TurnRng::new_for_test(vec![7, 93]);
        assert_eq!(rng.next_outcome("first"), 7);
        assert_eq!(rng.next_outcome("second"), 93);
    }

    #[test]
    #[should_panic(expected = "TurnRng exhausted")]
    fn test_scripted_rng_panics_when_exhausted() {
        let mut rng = TurnRng::new_for_test(vec![]);
        rng.next_outcome("nothing left");
    }

    #[test]
    fn test_seeded_rng_is_deterministic_and_in_range() {
        let mut a = TurnRng::from_seed(42);
        let mut b = TurnRng::from_seed(42);
        for _ in 0..200 {
            let outcome = a.next_outcome("a");
            assert!((1..=100).contains(&outcome));
            assert_eq!(outcome, b.next_outcome("b"));
        }
    }

    #[test]
    fn test_range_mapping() {
        let mut rng = TurnRng::new_for_test(vec![1, 2, 3, 4, 100]);
        let values: Vec<u8> = (0..5).map(|_| rng.next_in_range((1, 3), "range")).collect();
        assert_eq!(values, vec![1, 2, 3, 1, 1]);
    }

    #[test]
    fn test_game_state_helpers() {
        assert!(GameState::Recruited.is_over());
        assert!(!GameState::WaitingForPlayer2Replacement.is_over());
        assert_eq!(GameState::Recruited.winner(), Some(0));
        assert_eq!(GameState::Escaped.winner(), None);
        assert!(GameState::WaitingForBothReplacements.needs_replacement(1));
        assert!(!GameState::WaitingForPlayer1Replacement.needs_replacement(1));
    }

    #[test]
    fn test_wild_battle_setup() {
        let state = create_wild_battle(
            TestMonsterBuilder::new(Species::Sproutle, 10).build(),
            TestMonsterBuilder::new(Species::Sparkit, 4).build(),
        );
        assert!(state.is_wild());
        assert_eq!(state.players[1].player_name, "Wild Sparkit");
        assert_eq!(state.participation.get_participants_against(1, 0), vec![0]);
    }
}
