//! Drives a single encounter from first action to final outcome.
//!
//! The battle runs on a [`StateMachine`] whose owner is a [`BattleContext`]:
//! `ActionSelectionState` collects actions from both controllers and pushes a
//! `RunTurnState`, which resolves the turn and either pops back to selection or
//! hands over to `BattleOverState`.

use crate::battle::ai::Behavior;
use crate::battle::state::{BattleEvent, BattleKind, BattleState, GameState, TurnRng};
use crate::battle::turn_orchestrator::{
    get_valid_actions, players_to_act, ready_for_turn_resolution, resolve_turn,
    validate_player_action,
};
use crate::errors::BattleSystemError;
use crate::progression::evolution::check_level_evolution;
use crate::state_machine::{State, StateMachine, Transition};

pub const DEFAULT_TURN_LIMIT: u32 = 500;

/// Everything the battle states share.
pub struct BattleContext {
    pub state: BattleState,
    pub controllers: [Box<dyn Behavior>; 2],
    pub rng: TurnRng,
    pub log: Vec<BattleEvent>,
    pub turn_limit: u32,
    error: Option<BattleSystemError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BattleOutcome {
    pub final_state: GameState,
    /// Index of the winning side. `None` for draws and escapes.
    pub winner: Option<usize>,
    pub turns: u32,
}

struct ActionSelectionState;

impl State<BattleContext> for ActionSelectionState {
    fn name(&self) -> &'static str {
        "ActionSelection"
    }

    fn execute(&mut self, ctx: &mut BattleContext) -> Transition<BattleContext> {
        if ctx.state.game_state.is_over() {
            return Transition::Switch(Box::new(BattleOverState));
        }

        for player_index in players_to_act(&ctx.state) {
            if ctx.state.action_queue[player_index].is_some() {
                continue;
            }
            let chosen = ctx.controllers[player_index].decide_action(player_index, &ctx.state);
            let action = match validate_player_action(&ctx.state, player_index, &chosen) {
                Ok(()) => Some(chosen),
                Err(err) => {
                    log::warn!(
                        "{} chose {} which is not allowed ({}); using a fallback",
                        ctx.state.players[player_index].player_name,
                        chosen,
                        err
                    );
                    get_valid_actions(&ctx.state, player_index).into_iter().next()
                }
            };
            ctx.state.action_queue[player_index] = action;
        }

        if ready_for_turn_resolution(&ctx.state) {
            Transition::Push(Box::new(RunTurnState))
        } else {
            ctx.error = Some(BattleSystemError::Stalled(format!("{:?}", ctx.state.game_state)));
            Transition::Quit
        }
    }
}

struct RunTurnState;

impl State<BattleContext> for RunTurnState {
    fn name(&self) -> &'static str {
        "RunTurn"
    }

    fn execute(&mut self, ctx: &mut BattleContext) -> Transition<BattleContext> {
        if ctx.state.turn_number > ctx.turn_limit {
            ctx.error = Some(BattleSystemError::TurnLimitExceeded(ctx.turn_limit));
            return Transition::Quit;
        }

        let bus = resolve_turn(&mut ctx.state, &mut ctx.rng);
        bus.log_formatted(&ctx.state);
        ctx.log.extend(bus.into_events());

        if ctx.state.game_state.is_over() {
            Transition::Switch(Box::new(BattleOverState))
        } else {
            Transition::Pop
        }
    }
}

/// Post-battle growth. Monsters that levelled past an evolution threshold evolve here.
struct BattleOverState;

impl State<BattleContext> for BattleOverState {
    fn name(&self) -> &'static str {
        "BattleOver"
    }

    fn enter(&mut self, ctx: &mut BattleContext) {
        log::info!(
            "Battle {} finished after {} turns: {:?}",
            ctx.state.battle_id,
            ctx.state.turn_number,
            ctx.state.game_state
        );
    }

    fn execute(&mut self, ctx: &mut BattleContext) -> Transition<BattleContext> {
        let kind = ctx.state.kind;
        for (player_index, player) in ctx.state.players.iter_mut().enumerate() {
            // The wild side never grows
            if kind == BattleKind::Wild && player_index == 1 {
                continue;
            }
            for monster in player.team.iter_mut().flatten() {
                let from = monster.species;
                match check_level_evolution(monster) {
                    Ok(Some(into)) => match monster.evolve_into(into) {
                        Ok(()) => ctx.log.push(BattleEvent::Evolved {
                            player_index,
                            from,
                            into,
                        }),
                        Err(err) => log::warn!("{} could not evolve: {}", from, err),
                    },
                    Ok(None) => {}
                    Err(err) => log::warn!("Evolution check for {} failed: {}", from, err),
                }
            }
        }
        Transition::Quit
    }
}

pub struct BattleSystem {
    machine: StateMachine<BattleContext>,
}

impl BattleSystem {
    pub fn new(state: BattleState, controllers: [Box<dyn Behavior>; 2], rng: TurnRng) -> Self {
        let context = BattleContext {
            state,
            controllers,
            rng,
            log: Vec::new(),
            turn_limit: DEFAULT_TURN_LIMIT,
            error: None,
        };
        let mut machine = StateMachine::new(context);
        machine.push(Box::new(ActionSelectionState));
        Self { machine }
    }

    pub fn with_turn_limit(mut self, turn_limit: u32) -> Self {
        self.machine.owner_mut().turn_limit = turn_limit;
        self
    }

    /// Advance the state machine by one state execution. Returns false once the battle is done.
    pub fn step(&mut self) -> bool {
        self.machine.execute()
    }

    pub fn run_to_completion(&mut self) -> Result<BattleOutcome, BattleSystemError> {
        while self.step() {}

        let ctx = self.machine.owner();
        if let Some(err) = &ctx.error {
            return Err(err.clone());
        }
        if !ctx.state.game_state.is_over() {
            return Err(BattleSystemError::Stalled(format!("{:?}", ctx.state.game_state)));
        }
        Ok(BattleOutcome {
            final_state: ctx.state.game_state,
            winner: ctx.state.game_state.winner(),
            turns: ctx.state.turn_number,
        })
    }

    pub fn current_phase(&self) -> Option<&'static str> {
        self.machine.current_state_name()
    }

    pub fn state(&self) -> &BattleState {
        &self.machine.owner().state
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.machine.owner().log
    }

    pub fn into_parts(self) -> (BattleState, Vec<BattleEvent>) {
        let ctx = self.machine.into_owner();
        (ctx.state, ctx.log)
    }
}
