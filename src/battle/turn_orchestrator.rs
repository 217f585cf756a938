use crate::battle::calculators::calculate_attack_outcome;
use crate::battle::commands::{execute_command_batch, BattleCommand, ExecutionError, PlayerTarget};
use crate::battle::conditions::{on_after_turn, on_before_move};
use crate::battle::escape::calculate_escape_outcome;
use crate::battle::recruit::calculate_recruit_outcome;
use crate::battle::state::{
    ActionFailureReason, BattleEvent, BattleKind, BattleState, EventBus, GameState, TurnRng,
};
use crate::battle::stats::effective_speed;
use crate::errors::ActionError;
use crate::item_data::get_item_data;
use crate::items::apply_item;
use crate::move_data::get_move_data;
use crate::player::{BattlePlayer, PlayerAction};
use crate::progression::experience::calculate_exp_gain;
use crate::species::get_species_data;
use crate::{Item, Move};
use schema::{ItemKind, VolatileType};
use std::collections::VecDeque;

/// Internal action types for the action stack.
/// These are the resolved form of a `PlayerAction` plus anything the engine schedules itself.
#[derive(Debug, Clone, PartialEq)]
pub enum BattleAction {
    Forfeit {
        player_index: usize,
    },
    Run {
        player_index: usize,
    },
    Switch {
        player_index: usize,
        team_index: usize,
    },
    UseItem {
        player_index: usize,
        item: Item,
        team_index: usize,
    },
    Recruit {
        player_index: usize,
        answer_index: usize,
        lure: Option<Item>,
    },
    AttackHit {
        attacker_index: usize,
        defender_index: usize,
        move_used: Move,
    },
    /// A confused battler strikes itself instead of moving.
    ConfusionHit {
        player_index: usize,
    },
}

/// Action stack for managing battle action execution
#[derive(Debug, Default)]
pub struct ActionStack {
    actions: VecDeque<BattleAction>,
}

impl ActionStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_back(&mut self, action: BattleAction) {
        self.actions.push_back(action);
    }

    pub fn push_front(&mut self, action: BattleAction) {
        self.actions.push_front(action);
    }

    pub fn pop_front(&mut self) -> Option<BattleAction> {
        self.actions.pop_front()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

fn is_replacement_phase(state: &BattleState) -> bool {
    matches!(
        state.game_state,
        GameState::WaitingForPlayer1Replacement
            | GameState::WaitingForPlayer2Replacement
            | GameState::WaitingForBothReplacements
    )
}

/// The wild side of an encounter can't use the bag, run, recruit or give up.
fn is_wild_side(state: &BattleState, player_index: usize) -> bool {
    state.kind == BattleKind::Wild && player_index == 1
}

fn can_use_wild_actions(state: &BattleState, player_index: usize) -> bool {
    state.kind == BattleKind::Wild && player_index == 0
}

/// Players that still owe an action before the battle can move on.
pub fn players_to_act(state: &BattleState) -> Vec<usize> {
    match state.game_state {
        GameState::WaitingForActions | GameState::WaitingForBothReplacements => vec![0, 1],
        GameState::WaitingForPlayer1Replacement => vec![0],
        GameState::WaitingForPlayer2Replacement => vec![1],
        _ => Vec::new(),
    }
}

/// Recovery items in the bag that would do something for the team member at `team_index`.
fn item_works_on(player: &BattlePlayer, item: Item, team_index: usize) -> bool {
    let Ok(item_data) = get_item_data(item) else {
        return false;
    };
    if !item_data.usable_in_battle || !matches!(item_data.kind, ItemKind::Recovery(_)) {
        return false;
    }
    match player.team.get(team_index).and_then(|slot| slot.as_ref()) {
        Some(monster) => {
            let mut trial = monster.clone();
            apply_item(item, &mut trial).is_ok()
        }
        None => false,
    }
}

fn is_lure(item: Item) -> bool {
    get_item_data(item).is_ok_and(|data| matches!(data.kind, ItemKind::Recruit { .. }))
}

fn recruit_answer_count(state: &BattleState, player_index: usize) -> usize {
    state.players[1 - player_index]
        .active_monster()
        .and_then(|monster| get_species_data(monster.species).ok())
        .map(|data| data.recruit.answers.len())
        .unwrap_or(0)
}

pub fn get_valid_actions(state: &BattleState, player_index: usize) -> Vec<PlayerAction> {
    let player = &state.players[player_index];
    let mut actions = Vec::new();

    if state.game_state.is_over() {
        return actions;
    }

    // --- Forced Replacement ---
    // Switching is the only thing a player can do after a faint. An empty list means
    // there is nobody left to send out.
    if is_replacement_phase(state) {
        if state.game_state.needs_replacement(player_index) {
            actions.extend(
                player
                    .valid_switches()
                    .into_iter()
                    .map(|team_index| PlayerAction::SwitchMonster { team_index }),
            );
        }
        return actions;
    }

    // A. Moves
    if let Some(active_monster) = player.active_monster().filter(|monster| !monster.is_fainted()) {
        let usable_moves: Vec<PlayerAction> = active_monster
            .moves
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.as_ref().is_some_and(|instance| instance.sp > 0))
            .map(|(move_index, _)| PlayerAction::UseMove { move_index })
            .collect();

        if usable_moves.is_empty() {
            // Out of SP everywhere: the orchestrator turns this into Struggle.
            actions.push(PlayerAction::UseMove { move_index: 0 });
        } else {
            actions.extend(usable_moves);
        }
    }

    // B. Switches
    actions.extend(
        player
            .valid_switches()
            .into_iter()
            .map(|team_index| PlayerAction::SwitchMonster { team_index }),
    );

    if is_wild_side(state, player_index) {
        return actions;
    }

    // C. Items
    for (item, _) in player.inventory.items() {
        for team_index in 0..player.team.len() {
            if item_works_on(player, item, team_index) {
                actions.push(PlayerAction::UseItem { item, team_index });
            }
        }
    }

    // D. Wild encounter actions
    if can_use_wild_actions(state, player_index) {
        let lures: Vec<Item> = player
            .inventory
            .items()
            .map(|(item, _)| item)
            .filter(|item| is_lure(*item))
            .collect();
        for answer_index in 0..recruit_answer_count(state, player_index) {
            actions.push(PlayerAction::Recruit {
                answer_index,
                lure: None,
            });
            for lure in &lures {
                actions.push(PlayerAction::Recruit {
                    answer_index,
                    lure: Some(*lure),
                });
            }
        }
        actions.push(PlayerAction::Run);
    }

    actions.push(PlayerAction::Forfeit);
    actions
}

/// Check a submitted action against the current battle state.
pub fn validate_player_action(
    state: &BattleState,
    player_index: usize,
    action: &PlayerAction,
) -> Result<(), ActionError> {
    if player_index >= 2 {
        return Err(ActionError::InvalidAction(format!(
            "invalid player index {}",
            player_index
        )));
    }
    if state.game_state.is_over() {
        return Err(ActionError::InvalidAction("the battle is over".to_string()));
    }

    let player = &state.players[player_index];

    if is_replacement_phase(state) {
        if !state.game_state.needs_replacement(player_index) {
            return Err(ActionError::InvalidAction(format!(
                "{} doesn't need to act right now",
                player.player_name
            )));
        }
        if !matches!(action, PlayerAction::SwitchMonster { .. }) {
            return Err(ActionError::InvalidAction(
                "a fainted monster must be replaced".to_string(),
            ));
        }
    }

    match action {
        PlayerAction::UseMove { move_index } => {
            let monster = player
                .active_monster()
                .filter(|monster| !monster.is_fainted())
                .ok_or_else(|| ActionError::InvalidAction("no monster able to fight".to_string()))?;
            let Some(instance) = monster.moves.get(*move_index).and_then(|slot| slot.as_ref()) else {
                return Err(ActionError::InvalidMoveIndex(*move_index));
            };
            // An empty move only stands in for Struggle once nothing else has SP
            if instance.sp == 0 && monster.has_usable_move() {
                return Err(ActionError::NoSpRemaining(*move_index));
            }
        }
        PlayerAction::SwitchMonster { team_index } => {
            if !player.valid_switches().contains(team_index) {
                return Err(ActionError::InvalidTeamIndex(*team_index));
            }
        }
        PlayerAction::UseItem { item, team_index } => {
            if is_wild_side(state, player_index) {
                return Err(ActionError::InvalidAction("wild monsters can't use items".to_string()));
            }
            if !player.inventory.contains(*item) {
                return Err(ActionError::InvalidAction(format!("no {} in the bag", item)));
            }
            if player.team.get(*team_index).and_then(|slot| slot.as_ref()).is_none() {
                return Err(ActionError::InvalidTeamIndex(*team_index));
            }
            if !item_works_on(player, *item, *team_index) {
                return Err(ActionError::InvalidAction(format!(
                    "{} would have no effect",
                    item
                )));
            }
        }
        PlayerAction::Recruit { answer_index, lure } => {
            if !can_use_wild_actions(state, player_index) {
                return Err(ActionError::InvalidAction(
                    "only wild monsters can be recruited".to_string(),
                ));
            }
            if *answer_index >= recruit_answer_count(state, player_index) {
                return Err(ActionError::InvalidAction(format!(
                    "there is no answer {}",
                    answer_index
                )));
            }
            if let Some(lure) = lure {
                if !player.inventory.contains(*lure) || !is_lure(*lure) {
                    return Err(ActionError::InvalidAction(format!("{} can't be offered", lure)));
                }
            }
        }
        PlayerAction::Run => {
            if !can_use_wild_actions(state, player_index) {
                return Err(ActionError::InvalidAction(
                    "there's no running from a trainer battle".to_string(),
                ));
            }
        }
        PlayerAction::Forfeit => {
            if is_wild_side(state, player_index) {
                return Err(ActionError::InvalidAction("wild monsters can't forfeit".to_string()));
            }
        }
    }

    Ok(())
}

/// Check if battle is ready for turn resolution (everyone who has to act has an action queued)
pub fn ready_for_turn_resolution(battle_state: &BattleState) -> bool {
    let to_act = players_to_act(battle_state);
    !to_act.is_empty()
        && to_act
            .iter()
            .all(|player_index| battle_state.action_queue[*player_index].is_some())
}

/// Main entry point for turn resolution.
/// Executes one complete turn (or a replacement phase) and returns everything that happened.
pub fn resolve_turn(battle_state: &mut BattleState, rng: &mut TurnRng) -> EventBus {
    let mut bus = EventBus::new();

    if is_replacement_phase(battle_state) {
        // Forced replacements don't advance the turn
        resolve_replacement_phase(battle_state, &mut bus, rng);
    } else {
        // 1. Initialization
        initialize_turn(battle_state, &mut bus);

        // 2. Build initial action stack from player actions
        let mut action_stack = build_initial_action_stack(battle_state);

        // 3. Execute actions from stack until empty
        while let Some(action) = action_stack.pop_front() {
            if let Err(err) =
                execute_battle_action(action.clone(), battle_state, &mut action_stack, &mut bus, rng)
            {
                log::warn!("{:?} could not be carried out: {}", action, err);
            }

            // Forfeit, escape and recruitment end the battle mid-turn
            if battle_state.game_state != GameState::TurnInProgress {
                break;
            }
        }

        // 4. End-of-Turn Phase (only if battle is still ongoing)
        if battle_state.game_state == GameState::TurnInProgress {
            execute_end_turn_phase(battle_state, &mut bus);
        }

        // 5. Cleanup & Finalization
        finalize_turn(battle_state, &mut bus, rng);
    }

    bus
}

/// Handle forced replacement phase without turn progression
fn resolve_replacement_phase(battle_state: &mut BattleState, bus: &mut EventBus, rng: &mut TurnRng) {
    let mut action_stack = build_initial_action_stack(battle_state);

    while let Some(action) = action_stack.pop_front() {
        // Only switches count during a replacement phase
        if matches!(action, BattleAction::Switch { .. }) {
            if let Err(err) = execute_battle_action(action, battle_state, &mut action_stack, bus, rng) {
                log::warn!("Replacement failed: {}", err);
            }
        }
    }

    if !battle_state.game_state.is_over() {
        check_win_conditions(battle_state, bus);
    }

    if !battle_state.game_state.is_over() {
        apply_commands(
            vec![BattleCommand::SetGameState(GameState::WaitingForActions)],
            battle_state,
            bus,
        );
    }

    apply_commands(vec![BattleCommand::ClearActionQueue], battle_state, bus);
}

/// Run commands that can't fail in practice, logging if one does.
fn apply_commands(commands: Vec<BattleCommand>, battle_state: &mut BattleState, bus: &mut EventBus) {
    if let Err(err) = execute_command_batch(commands, battle_state, bus, &mut ActionStack::new()) {
        log::warn!("Command failed: {}", err);
    }
}

fn initialize_turn(battle_state: &mut BattleState, bus: &mut EventBus) {
    apply_commands(
        vec![BattleCommand::SetGameState(GameState::TurnInProgress)],
        battle_state,
        bus,
    );
    bus.push(BattleEvent::TurnStarted {
        turn_number: battle_state.turn_number,
    });
}

/// Build initial action stack from player actions in priority order
fn build_initial_action_stack(battle_state: &BattleState) -> ActionStack {
    let mut stack = ActionStack::new();

    let queued: Vec<(usize, PlayerAction)> = (0..2)
        .filter_map(|player_index| {
            battle_state.action_queue[player_index]
                .clone()
                .map(|action| (player_index, action))
        })
        .collect();

    for (player_index, player_action) in determine_action_order(battle_state, &queued) {
        if let Some(battle_action) =
            convert_player_action_to_battle_action(&player_action, player_index, battle_state)
        {
            stack.push_back(battle_action);
        }
    }

    stack
}

/// The move a `UseMove` choice actually performs: the chosen move, or Struggle without SP.
fn resolve_chosen_move(player: &BattlePlayer, move_index: usize) -> Option<Move> {
    let monster = player.active_monster()?;
    let chosen = monster
        .moves
        .get(move_index)
        .and_then(|slot| slot.as_ref())
        .filter(|instance| instance.sp > 0)
        .map(|instance| instance.move_)
        .unwrap_or(Move::Struggle);
    Some(chosen)
}

fn convert_player_action_to_battle_action(
    player_action: &PlayerAction,
    player_index: usize,
    battle_state: &BattleState,
) -> Option<BattleAction> {
    let action = match player_action {
        PlayerAction::Forfeit => BattleAction::Forfeit { player_index },
        PlayerAction::Run => BattleAction::Run { player_index },
        PlayerAction::SwitchMonster { team_index } => BattleAction::Switch {
            player_index,
            team_index: *team_index,
        },
        PlayerAction::UseItem { item, team_index } => BattleAction::UseItem {
            player_index,
            item: *item,
            team_index: *team_index,
        },
        PlayerAction::Recruit { answer_index, lure } => BattleAction::Recruit {
            player_index,
            answer_index: *answer_index,
            lure: *lure,
        },
        PlayerAction::UseMove { move_index } => BattleAction::AttackHit {
            attacker_index: player_index,
            defender_index: 1 - player_index,
            move_used: resolve_chosen_move(&battle_state.players[player_index], *move_index)?,
        },
    };
    Some(action)
}

/// Execute a single battle action, potentially adding more actions to the stack
pub fn execute_battle_action(
    action: BattleAction,
    battle_state: &mut BattleState,
    action_stack: &mut ActionStack,
    bus: &mut EventBus,
    rng: &mut TurnRng,
) -> Result<(), ExecutionError> {
    match action {
        BattleAction::Forfeit { player_index } => {
            execute_forfeit(player_index, battle_state, bus, action_stack)
        }

        BattleAction::Run { player_index } => {
            let commands = calculate_escape_outcome(battle_state, player_index, rng);
            execute_command_batch(commands, battle_state, bus, action_stack)
        }

        BattleAction::Switch {
            player_index,
            team_index,
        } => {
            let player = &battle_state.players[player_index];
            let target_healthy = player
                .team
                .get(team_index)
                .and_then(|slot| slot.as_ref())
                .is_some_and(|monster| !monster.is_fainted());
            if !target_healthy {
                if let Some(monster) = player.active_monster() {
                    bus.push(BattleEvent::ActionFailed {
                        monster: monster.species,
                        reason: ActionFailureReason::MonsterFainted,
                    });
                }
                return Ok(());
            }

            execute_command_batch(
                vec![BattleCommand::SwitchMonster {
                    target: PlayerTarget::from_index(player_index),
                    team_index,
                }],
                battle_state,
                bus,
                action_stack,
            )
        }

        BattleAction::UseItem {
            player_index,
            item,
            team_index,
        } => execute_command_batch(
            vec![BattleCommand::UseItem {
                target: PlayerTarget::from_index(player_index),
                item,
                team_index,
            }],
            battle_state,
            bus,
            action_stack,
        ),

        BattleAction::Recruit {
            player_index,
            answer_index,
            lure,
        } => {
            let commands =
                calculate_recruit_outcome(battle_state, player_index, answer_index, lure, rng)?;
            execute_command_batch(commands, battle_state, bus, action_stack)
        }

        BattleAction::AttackHit {
            attacker_index,
            defender_index,
            move_used,
        } => execute_attack_hit(
            attacker_index,
            defender_index,
            move_used,
            action_stack,
            bus,
            rng,
            battle_state,
        ),

        BattleAction::ConfusionHit { player_index } => {
            let commands =
                calculate_attack_outcome(battle_state, player_index, player_index, Move::HitItself, rng)?;
            execute_command_batch(commands, battle_state, bus, action_stack)
        }
    }
}

/// Execute forfeit action - player loses immediately
fn execute_forfeit(
    player_index: usize,
    battle_state: &mut BattleState,
    bus: &mut EventBus,
    action_stack: &mut ActionStack,
) -> Result<(), ExecutionError> {
    let outcome = if player_index == 0 {
        GameState::Player2Win
    } else {
        GameState::Player1Win
    };
    execute_command_batch(
        vec![
            BattleCommand::SetGameState(outcome),
            BattleCommand::EmitEvent(BattleEvent::PlayerDefeated { player_index }),
            BattleCommand::EmitEvent(BattleEvent::BattleEnded { outcome }),
        ],
        battle_state,
        bus,
        action_stack,
    )
}

/// One use of a move: before-move checks, SP, then the attack itself.
pub fn execute_attack_hit(
    attacker_index: usize,
    defender_index: usize,
    move_used: Move,
    action_stack: &mut ActionStack,
    bus: &mut EventBus,
    rng: &mut TurnRng,
    battle_state: &mut BattleState,
) -> Result<(), ExecutionError> {
    let attacker_target = PlayerTarget::from_index(attacker_index);
    let Some(attacker) = battle_state.players[attacker_index].active_monster() else {
        return Err(ExecutionError::NoMonster);
    };
    // Fainted before its turn came up
    if attacker.is_fainted() {
        return Ok(());
    }
    let species = attacker.species;

    let has_sp = move_used.is_internal()
        || attacker
            .moves
            .iter()
            .flatten()
            .any(|instance| instance.move_ == move_used && instance.sp > 0);
    if !has_sp {
        bus.push(BattleEvent::ActionFailed {
            monster: species,
            reason: ActionFailureReason::NoSpRemaining,
        });
        return Ok(());
    }

    let before = on_before_move(battle_state, attacker_index, rng);
    execute_command_batch(before.commands, battle_state, bus, action_stack)?;

    if let Some(reason) = before.blocked {
        bus.push(BattleEvent::ActionFailed {
            monster: species,
            reason,
        });
        if before.hits_itself {
            action_stack.push_front(BattleAction::ConfusionHit {
                player_index: attacker_index,
            });
        }
        return Ok(());
    }

    execute_command_batch(
        vec![
            BattleCommand::ConsumeSp {
                target: attacker_target,
                move_used,
            },
            BattleCommand::SetLastMove {
                target: attacker_target,
                move_used,
            },
        ],
        battle_state,
        bus,
        action_stack,
    )?;

    let commands =
        calculate_attack_outcome(battle_state, attacker_index, defender_index, move_used, rng)?;
    execute_command_batch(commands, battle_state, bus, action_stack)
}

pub fn determine_action_order(
    battle_state: &BattleState,
    actions: &[(usize, PlayerAction)],
) -> Vec<(usize, PlayerAction)> {
    let mut player_priorities: Vec<(usize, PlayerAction, ActionPriority)> = actions
        .iter()
        .map(|(player_index, action)| {
            let priority = calculate_action_priority(*player_index, action, battle_state);
            (*player_index, action.clone(), priority)
        })
        .collect();

    // Stable sort: identical priorities keep player 1 ahead of player 2.
    player_priorities.sort_by(|a, b| {
        b.2.action_priority
            .cmp(&a.2.action_priority)
            .then_with(|| b.2.move_priority.cmp(&a.2.move_priority))
            .then_with(|| b.2.speed.cmp(&a.2.speed))
    });

    player_priorities
        .into_iter()
        .map(|(player_index, action, _)| (player_index, action))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActionPriority {
    action_priority: i8, // Forfeit: 10, Run: 8, Switch: 6, Item: 5, Recruit: 4, Move: 0
    move_priority: i8,   // Only relevant for moves
    speed: u16,          // Effective speed for tiebreaking
}

impl ActionPriority {
    fn fixed(action_priority: i8) -> Self {
        Self {
            action_priority,
            move_priority: 0,
            speed: 0,
        }
    }
}

fn calculate_action_priority(
    player_index: usize,
    action: &PlayerAction,
    battle_state: &BattleState,
) -> ActionPriority {
    match action {
        PlayerAction::Forfeit => ActionPriority::fixed(10),
        PlayerAction::Run => ActionPriority::fixed(8),
        PlayerAction::SwitchMonster { .. } => ActionPriority::fixed(6),
        PlayerAction::UseItem { .. } => ActionPriority::fixed(5),
        PlayerAction::Recruit { .. } => ActionPriority::fixed(4),
        PlayerAction::UseMove { move_index } => {
            let player = &battle_state.players[player_index];
            let speed = player
                .active_monster()
                .map(|monster| effective_speed(monster, player))
                .unwrap_or(0);
            let move_priority = resolve_chosen_move(player, *move_index)
                .and_then(|move_| get_move_data(move_).ok())
                .map(|move_data| move_data.priority)
                .unwrap_or(0);

            ActionPriority {
                action_priority: 0,
                move_priority,
                speed,
            }
        }
    }
}

/// Poison and burn damage, then flinches wear off.
pub fn execute_end_turn_phase(battle_state: &mut BattleState, bus: &mut EventBus) {
    for player_index in 0..2 {
        let commands = on_after_turn(battle_state, player_index);
        apply_commands(commands, battle_state, bus);
    }

    for player_index in 0..2 {
        if battle_state.players[player_index].has_condition(VolatileType::Flinch) {
            apply_commands(
                vec![BattleCommand::RemoveCondition {
                    target: PlayerTarget::from_index(player_index),
                    condition_type: VolatileType::Flinch,
                }],
                battle_state,
                bus,
            );
        }
    }
}

fn finalize_turn(battle_state: &mut BattleState, bus: &mut EventBus, rng: &mut TurnRng) {
    // 1. Rewards for every active monster that fainted this turn
    if let Err(err) = award_faint_rewards(battle_state, bus, rng) {
        log::warn!("Could not award battle rewards: {}", err);
    }

    // 2. Check for win conditions, which override everything else
    if !battle_state.game_state.is_over() {
        check_win_conditions(battle_state, bus);
    }

    // 3. Increment turn number and return to action selection if the battle goes on
    if battle_state.game_state == GameState::TurnInProgress {
        apply_commands(
            vec![
                BattleCommand::IncrementTurnNumber,
                BattleCommand::SetGameState(GameState::WaitingForActions),
            ],
            battle_state,
            bus,
        );
    }

    // 4. Override the default state with a replacement phase if needed
    check_for_pending_replacements(battle_state, bus);

    // 5. Clear the action queue from the turn that just ended
    apply_commands(vec![BattleCommand::ClearActionQueue], battle_state, bus);

    bus.push(BattleEvent::TurnEnded);
}

fn roll_gold(range: (u32, u32), rng: &mut TurnRng) -> u32 {
    let (min, max) = range;
    if max <= min {
        return min;
    }
    let roll = rng.next_outcome("gold drop") as u32;
    min + (roll - 1) * (max - min) / 99
}

/// Experience for the side that knocked out a monster, plus drops when the foe was player 2's.
fn award_faint_rewards(
    battle_state: &mut BattleState,
    bus: &mut EventBus,
    rng: &mut TurnRng,
) -> Result<(), ExecutionError> {
    let mut commands = Vec::new();

    for fainted_player in 0..2 {
        let player = &battle_state.players[fainted_player];
        let Some(monster) = player.active_monster().filter(|monster| monster.is_fainted()) else {
            continue;
        };
        let species_data = get_species_data(monster.species)?;
        let winner = 1 - fainted_player;
        let winner_target = PlayerTarget::from_index(winner);

        // Wild monsters don't grow from battles
        if !is_wild_side(battle_state, winner) {
            let winner_team = &battle_state.players[winner].team;
            let participants: Vec<usize> = battle_state
                .participation
                .get_participants_against(fainted_player, player.active_index)
                .into_iter()
                .filter(|index| {
                    winner_team[*index]
                        .as_ref()
                        .is_some_and(|participant| !participant.is_fainted())
                })
                .collect();
            let amount = calculate_exp_gain(
                species_data.exp_yield,
                monster.level,
                battle_state.kind == BattleKind::Trainer,
                participants.len(),
                &battle_state.config,
            );
            for team_index in participants {
                commands.push(BattleCommand::AwardExp {
                    target: winner_target,
                    team_index,
                    amount,
                });
            }
        }

        if fainted_player == 1 {
            let gold = roll_gold(species_data.drops.gold, rng);
            if gold > 0 {
                commands.push(BattleCommand::AddMoney {
                    target: winner_target,
                    amount: gold,
                });
            }
            for drop in &species_data.drops.items {
                let dropped = drop.chance >= 100 || rng.next_outcome("item drop chance") <= drop.chance;
                if !dropped {
                    continue;
                }
                let (min, max) = drop.quantity;
                let quantity = if max > min {
                    rng.next_in_range(drop.quantity, "item drop quantity")
                } else {
                    min
                };
                if quantity > 0 {
                    commands.push(BattleCommand::AddItem {
                        target: winner_target,
                        item: drop.item,
                        quantity: quantity as u16,
                    });
                }
            }
        }
    }

    execute_command_batch(commands, battle_state, bus, &mut ActionStack::new())
}

/// At the end of the turn, checks if any active monsters have fainted and if replacements are needed.
fn check_for_pending_replacements(battle_state: &mut BattleState, bus: &mut EventBus) {
    if battle_state.game_state.is_over() {
        return;
    }

    let needs_replacement = |player: &BattlePlayer| {
        player.active_monster().is_some_and(|monster| monster.is_fainted())
            && player.has_healthy_monster()
    };
    let p1_needs_replacement = needs_replacement(&battle_state.players[0]);
    let p2_needs_replacement = needs_replacement(&battle_state.players[1]);

    let new_game_state = match (p1_needs_replacement, p2_needs_replacement) {
        (true, true) => Some(GameState::WaitingForBothReplacements),
        (true, false) => Some(GameState::WaitingForPlayer1Replacement),
        (false, true) => Some(GameState::WaitingForPlayer2Replacement),
        (false, false) => None,
    };

    if let Some(state) = new_game_state {
        apply_commands(vec![BattleCommand::SetGameState(state)], battle_state, bus);
    }
}

/// Check win conditions and update battle state accordingly
fn check_win_conditions(battle_state: &mut BattleState, bus: &mut EventBus) {
    let player1_has_monsters = battle_state.players[0].has_healthy_monster();
    let player2_has_monsters = battle_state.players[1].has_healthy_monster();

    let (outcome, defeated) = match (player1_has_monsters, player2_has_monsters) {
        (false, false) => (GameState::Draw, Vec::new()),
        (false, true) => (GameState::Player2Win, vec![0]),
        (true, false) => (GameState::Player1Win, vec![1]),
        (true, true) => return,
    };

    let mut commands = vec![BattleCommand::SetGameState(outcome)];
    commands.extend(
        defeated
            .into_iter()
            .map(|player_index| BattleCommand::EmitEvent(BattleEvent::PlayerDefeated { player_index })),
    );
    commands.push(BattleCommand::EmitEvent(BattleEvent::BattleEnded { outcome }));
    apply_commands(commands, battle_state, bus);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::{create_test_battle, create_wild_battle, TestMonsterBuilder};
    use crate::inventory::Inventory;
    use crate::Species;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn order_of(state: &BattleState, actions: [PlayerAction; 2]) -> Vec<usize> {
        let [first, second] = actions;
        determine_action_order(state, &[(0, first), (1, second)])
            .into_iter()
            .map(|(player_index, _)| player_index)
            .collect()
    }

    #[rstest]
    #[case(PlayerAction::UseMove { move_index: 0 }, PlayerAction::Forfeit, vec![1, 0])]
    #[case(PlayerAction::UseMove { move_index: 0 }, PlayerAction::SwitchMonster { team_index: 1 }, vec![1, 0])]
    #[case(PlayerAction::Recruit { answer_index: 0, lure: None }, PlayerAction::SwitchMonster { team_index: 1 }, vec![1, 0])]
    #[case(PlayerAction::Run, PlayerAction::SwitchMonster { team_index: 1 }, vec![0, 1])]
    #[case(PlayerAction::SwitchMonster { team_index: 1 }, PlayerAction::SwitchMonster { team_index: 1 }, vec![0, 1])]
    fn test_action_classes_order(
        #[case] p1: PlayerAction,
        #[case] p2: PlayerAction,
        #[case] expected: Vec<usize>,
    ) {
        let state = create_test_battle(
            TestMonsterBuilder::new(Species::Sparkit, 20).build(),
            TestMonsterBuilder::new(Species::Pebblor, 20).build(),
        );
        assert_eq!(order_of(&state, [p1, p2]), expected);
    }

    #[test]
    fn test_move_priority_beats_speed() {
        let state = create_test_battle(
            TestMonsterBuilder::new(Species::Pebblor, 20)
                .with_moves(vec![Move::Tackle])
                .build(),
            TestMonsterBuilder::new(Species::Sparkit, 20)
                .with_moves(vec![Move::ThunderShock, Move::QuickAttack])
                .build(),
        );
        // Sparkit is faster with a normal move
        let normal = order_of(
            &state,
            [
                PlayerAction::UseMove { move_index: 0 },
                PlayerAction::UseMove { move_index: 0 },
            ],
        );
        assert_eq!(normal, vec![1, 0]);

        let state = create_test_battle(
            TestMonsterBuilder::new(Species::Pebblor, 20)
                .with_moves(vec![Move::QuickAttack])
                .build(),
            TestMonsterBuilder::new(Species::Sparkit, 20)
                .with_moves(vec![Move::ThunderShock])
                .build(),
        );
        let quick = order_of(
            &state,
            [
                PlayerAction::UseMove { move_index: 0 },
                PlayerAction::UseMove { move_index: 0 },
            ],
        );
        assert_eq!(quick, vec![0, 1]);
    }

    #[test]
    fn test_speed_ties_favor_player_one() {
        let state = create_test_battle(
            TestMonsterBuilder::new(Species::Sproutle, 20).build(),
            TestMonsterBuilder::new(Species::Sproutle, 20).build(),
        );
        let order = order_of(
            &state,
            [
                PlayerAction::UseMove { move_index: 0 },
                PlayerAction::UseMove { move_index: 0 },
            ],
        );
        assert_eq!(order, vec![0, 1]);
    }

    #[test]
    fn test_valid_actions_in_trainer_battle() {
        let mut state = create_test_battle(
            TestMonsterBuilder::new(Species::Sproutle, 20)
                .with_moves(vec![Move::Tackle, Move::Growl])
                .build(),
            TestMonsterBuilder::new(Species::Emberpup, 20).build(),
        );
        state.players[0].team[1] = Some(TestMonsterBuilder::new(Species::Sparkit, 20).build());
        state.players[0].active_monster_mut().unwrap().take_damage(10);
        state.players[0].inventory = [(Item::Potion, 1), (Item::Antidote, 1)].into_iter().collect();

        assert_eq!(
            get_valid_actions(&state, 0),
            vec![
                PlayerAction::UseMove { move_index: 0 },
                PlayerAction::UseMove { move_index: 1 },
                PlayerAction::SwitchMonster { team_index: 1 },
                PlayerAction::UseItem {
                    item: Item::Potion,
                    team_index: 0
                },
                PlayerAction::Forfeit,
            ]
        );
    }

    #[test]
    fn test_struggle_when_out_of_sp() {
        let mut state = create_test_battle(
            TestMonsterBuilder::new(Species::Sproutle, 20)
                .with_moves(vec![Move::Tackle])
                .build(),
            TestMonsterBuilder::new(Species::Emberpup, 20).build(),
        );
        state.players[0].active_monster_mut().unwrap().moves[0]
            .as_mut()
            .unwrap()
            .sp = 0;

        assert_eq!(
            get_valid_actions(&state, 0),
            vec![PlayerAction::UseMove { move_index: 0 }, PlayerAction::Forfeit]
        );
        assert_eq!(resolve_chosen_move(&state.players[0], 0), Some(Move::Struggle));
        assert_eq!(
            validate_player_action(&state, 0, &PlayerAction::UseMove { move_index: 0 }),
            Ok(())
        );
        assert_eq!(
            validate_player_action(&state, 0, &PlayerAction::UseMove { move_index: 2 }),
            Err(ActionError::InvalidMoveIndex(2))
        );
    }

    #[test]
    fn test_empty_move_is_rejected_while_others_have_sp() {
        let mut state = create_test_battle(
            TestMonsterBuilder::new(Species::Sproutle, 20)
                .with_moves(vec![Move::Tackle, Move::VineWhip])
                .build(),
            TestMonsterBuilder::new(Species::Emberpup, 20).build(),
        );
        state.players[0].active_monster_mut().unwrap().moves[0]
            .as_mut()
            .unwrap()
            .sp = 0;

        assert_eq!(
            validate_player_action(&state, 0, &PlayerAction::UseMove { move_index: 0 }),
            Err(ActionError::NoSpRemaining(0))
        );
        assert_eq!(
            validate_player_action(&state, 0, &PlayerAction::UseMove { move_index: 1 }),
            Ok(())
        );
        let actions = get_valid_actions(&state, 0);
        assert!(!actions.contains(&PlayerAction::UseMove { move_index: 0 }));
        assert!(actions.contains(&PlayerAction::UseMove { move_index: 1 }));
    }

    #[test]
    fn test_wild_battle_actions() {
        let mut state = create_wild_battle(
            TestMonsterBuilder::new(Species::Sproutle, 20)
                .with_moves(vec![Move::Tackle])
                .build(),
            TestMonsterBuilder::new(Species::Sparkit, 5)
                .with_moves(vec![Move::ThunderShock])
                .build(),
        );
        state.players[0].inventory = Inventory::from_iter([(Item::GoldenLure, 1)]);

        let actions = get_valid_actions(&state, 0);
        // 3 answers, each with and without the lure
        let recruits = actions
            .iter()
            .filter(|action| matches!(action, PlayerAction::Recruit { .. }))
            .count();
        assert_eq!(recruits, 6);
        assert!(actions.contains(&PlayerAction::Run));

        assert_eq!(
            get_valid_actions(&state, 1),
            vec![PlayerAction::UseMove { move_index: 0 }]
        );
        assert!(validate_player_action(&state, 1, &PlayerAction::Forfeit).is_err());
    }

    #[test]
    fn test_trainer_battle_rejects_wild_actions() {
        let state = create_test_battle(
            TestMonsterBuilder::new(Species::Sproutle, 20).build(),
            TestMonsterBuilder::new(Species::Emberpup, 20).build(),
        );
        assert!(validate_player_action(&state, 0, &PlayerAction::Run).is_err());
        assert!(validate_player_action(
            &state,
            0,
            &PlayerAction::Recruit {
                answer_index: 0,
                lure: None
            }
        )
        .is_err());
        assert_eq!(
            validate_player_action(&state, 0, &PlayerAction::SwitchMonster { team_index: 3 }),
            Err(ActionError::InvalidTeamIndex(3))
        );
    }

    #[test]
    fn test_ready_for_turn_resolution() {
        let mut state = create_test_battle(
            TestMonsterBuilder::new(Species::Sproutle, 20).build(),
            TestMonsterBuilder::new(Species::Emberpup, 20).build(),
        );
        assert!(!ready_for_turn_resolution(&state));
        state.action_queue[0] = Some(PlayerAction::UseMove { move_index: 0 });
        assert!(!ready_for_turn_resolution(&state));
        state.action_queue[1] = Some(PlayerAction::UseMove { move_index: 0 });
        assert!(ready_for_turn_resolution(&state));

        state.game_state = GameState::WaitingForPlayer2Replacement;
        state.action_queue = [None, Some(PlayerAction::SwitchMonster { team_index: 1 })];
        assert!(ready_for_turn_resolution(&state));
    }
}
