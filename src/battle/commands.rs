use crate::battle::conditions::BattlerCondition;
use crate::battle::state::{ActionFailureReason, BattleEvent, BattleState, EventBus, GameState};
use crate::battle::turn_orchestrator::{ActionStack, BattleAction};
use crate::errors::{ItemDataError, ItemUseError, MoveDataError, SpeciesDataError};
use crate::items::use_item;
use crate::monster::{LearnMoveOutcome, MonsterInst, StatusCondition};
use crate::progression::learning::moves_learned_at_level;
use crate::{Item, Move};
use schema::{StatType, VolatileType};
use thiserror::Error;

/// Player target for commands - provides type safety over raw indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerTarget {
    Player1,
    Player2,
}

impl PlayerTarget {
    pub fn to_index(self) -> usize {
        match self {
            PlayerTarget::Player1 => 0,
            PlayerTarget::Player2 => 1,
        }
    }

    pub fn opponent(self) -> PlayerTarget {
        match self {
            PlayerTarget::Player1 => PlayerTarget::Player2,
            PlayerTarget::Player2 => PlayerTarget::Player1,
        }
    }

    /// 0 is player 1; every other index is player 2.
    pub fn from_index(index: usize) -> PlayerTarget {
        match index {
            0 => PlayerTarget::Player1,
            _ => PlayerTarget::Player2,
        }
    }
}

/// Atomic commands representing final state changes
#[derive(Debug, Clone, PartialEq)]
pub enum BattleCommand {
    // Direct state changes
    SetGameState(GameState),
    IncrementTurnNumber,
    ClearActionQueue,

    // Monster modifications (always the active monster)
    DealDamage {
        target: PlayerTarget,
        amount: u16,
    },
    DealStatusDamage {
        target: PlayerTarget,
        amount: u16,
    },
    HealMonster {
        target: PlayerTarget,
        amount: u16,
    },
    /// With `announce` the status only lands on a healthy, unstatused monster and is reported.
    /// Without it the status is overwritten silently (sleep counting down).
    SetStatus {
        target: PlayerTarget,
        status: StatusCondition,
        announce: bool,
    },
    CureStatus {
        target: PlayerTarget,
    },
    ConsumeSp {
        target: PlayerTarget,
        move_used: Move,
    },

    // Player state changes
    ChangeStatStage {
        target: PlayerTarget,
        stat: StatType,
        delta: i8,
    },
    AddCondition {
        target: PlayerTarget,
        condition: BattlerCondition,
        announce: bool,
    },
    RemoveCondition {
        target: PlayerTarget,
        condition_type: VolatileType,
    },
    SetLastMove {
        target: PlayerTarget,
        move_used: Move,
    },
    SwitchMonster {
        target: PlayerTarget,
        team_index: usize,
    },

    // Items, money and growth
    UseItem {
        target: PlayerTarget,
        item: Item,
        team_index: usize,
    },
    ConsumeItem {
        target: PlayerTarget,
        item: Item,
    },
    AddMoney {
        target: PlayerTarget,
        amount: u32,
    },
    AddItem {
        target: PlayerTarget,
        item: Item,
        quantity: u16,
    },
    AwardExp {
        target: PlayerTarget,
        team_index: usize,
        amount: u32,
    },

    // Wild encounters
    IncrementEscapeAttempts,
    SetRecruitAffinity(i8),
    /// Move the opponent's active monster into `target`'s team.
    RecruitMonster {
        target: PlayerTarget,
    },

    // Battle flow
    EmitEvent(BattleEvent),
    PushAction(BattleAction),
}

/// Error types for command execution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecutionError {
    #[error("no active monster")]
    NoMonster,
    #[error("no monster at team index {0}")]
    InvalidTeamIndex(usize),
    #[error("{0} is not known or has no SP left")]
    InvalidMove(Move),
    #[error(transparent)]
    Item(#[from] ItemUseError),
    #[error(transparent)]
    ItemData(#[from] ItemDataError),
    #[error(transparent)]
    MoveData(#[from] MoveDataError),
    #[error(transparent)]
    SpeciesData(#[from] SpeciesDataError),
    #[error("invalid battle state: {0}")]
    StateValidation(String),
}

pub fn execute_command_batch(
    commands: Vec<BattleCommand>,
    state: &mut BattleState,
    bus: &mut EventBus,
    action_stack: &mut ActionStack,
) -> Result<(), ExecutionError> {
    for command in commands {
        execute_command(command, state, bus, action_stack)?;
    }
    Ok(())
}

/// Helper function to execute commands that operate on the active monster
fn execute_monster_command<F>(
    target: PlayerTarget,
    state: &mut BattleState,
    operation: F,
) -> Result<(), ExecutionError>
where
    F: FnOnce(&mut MonsterInst, usize) -> Result<(), ExecutionError>,
{
    let player_index = target.to_index();
    match state.players[player_index].active_monster_mut() {
        Some(monster) => operation(monster, player_index),
        None => Err(ExecutionError::NoMonster),
    }
}

/// DealDamage with its events. The faint event only fires for the hit that knocks it out.
fn execute_deal_damage_command(
    target: PlayerTarget,
    amount: u16,
    state: &mut BattleState,
    bus: &mut EventBus,
) -> Result<(), ExecutionError> {
    execute_monster_command(target, state, |monster, player_index| {
        let damage = amount.min(monster.current_hp());
        let did_faint = monster.take_damage(amount);

        bus.push(BattleEvent::DamageDealt {
            target: monster.species,
            damage,
            remaining_hp: monster.current_hp(),
        });

        if did_faint {
            bus.push(BattleEvent::MonsterFainted {
                player_index,
                monster: monster.species,
            });
        }
        Ok(())
    })
}

fn execute_status_damage_command(
    target: PlayerTarget,
    amount: u16,
    state: &mut BattleState,
    bus: &mut EventBus,
) -> Result<(), ExecutionError> {
    execute_monster_command(target, state, |monster, player_index| {
        let Some(status) = monster.status.map(|status| status.status_type()) else {
            return Ok(());
        };
        let damage = amount.min(monster.current_hp());
        let did_faint = monster.take_damage(amount);

        bus.push(BattleEvent::StatusDamage {
            target: monster.species,
            status,
            damage,
            remaining_hp: monster.current_hp(),
        });

        if did_faint {
            bus.push(BattleEvent::MonsterFainted {
                player_index,
                monster: monster.species,
            });
        }
        Ok(())
    })
}

fn execute_award_exp_command(
    target: PlayerTarget,
    team_index: usize,
    amount: u32,
    state: &mut BattleState,
    bus: &mut EventBus,
) -> Result<(), ExecutionError> {
    let player_index = target.to_index();
    let level_cap = state.config.level_cap;
    let monster = state.players[player_index]
        .team
        .get_mut(team_index)
        .and_then(|slot| slot.as_mut())
        .ok_or(ExecutionError::InvalidTeamIndex(team_index))?;

    let level_ups = monster.add_exp(amount, level_cap)?;
    bus.push(BattleEvent::ExpGained {
        player_index,
        monster: monster.species,
        amount,
    });

    for level_up in level_ups {
        bus.push(BattleEvent::LevelUp {
            player_index,
            monster: monster.species,
            new_level: level_up.level,
        });

        for move_ in moves_learned_at_level(monster.species, level_up.level)? {
            match monster.learn_move(move_) {
                LearnMoveOutcome::Learned { .. } => bus.push(BattleEvent::MoveLearned {
                    monster: monster.species,
                    move_learned: move_,
                }),
                LearnMoveOutcome::NoFreeSlot => bus.push(BattleEvent::MoveNotLearned {
                    monster: monster.species,
                    move_not_learned: move_,
                }),
                LearnMoveOutcome::AlreadyKnown => {}
            }
        }
    }
    Ok(())
}

fn execute_use_item_command(
    target: PlayerTarget,
    item: Item,
    team_index: usize,
    state: &mut BattleState,
    bus: &mut EventBus,
) -> Result<(), ExecutionError> {
    let player_index = target.to_index();
    let player = &mut state.players[player_index];
    let monster = player
        .team
        .get_mut(team_index)
        .and_then(|slot| slot.as_mut())
        .ok_or(ExecutionError::InvalidTeamIndex(team_index))?;
    let species = monster.species;

    match use_item(&mut player.inventory, item, monster) {
        Ok(outcome) => {
            bus.push(BattleEvent::ItemUsed {
                player_index,
                item,
                target: species,
            });
            if outcome.hp_restored > 0 {
                bus.push(BattleEvent::MonsterHealed {
                    target: species,
                    amount: outcome.hp_restored,
                    new_hp: monster.current_hp(),
                });
            }
            if let Some(status) = outcome.cured {
                bus.push(BattleEvent::StatusRemoved {
                    target: species,
                    status,
                });
            }
            Ok(())
        }
        // The situation changed since the item was chosen; the item is kept.
        Err(ItemUseError::NoEffect(_)) => {
            bus.push(BattleEvent::ActionFailed {
                monster: species,
                reason: ActionFailureReason::MoveFailed,
            });
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn execute_recruit_command(
    target: PlayerTarget,
    state: &mut BattleState,
    bus: &mut EventBus,
) -> Result<(), ExecutionError> {
    let recruiter_index = target.to_index();
    let recruited = state.players[target.opponent().to_index()]
        .active_monster()
        .cloned()
        .ok_or(ExecutionError::NoMonster)?;
    let species = recruited.species;

    let recruiter = &mut state.players[recruiter_index];
    let team_slot = recruiter.first_open_slot();
    match team_slot {
        Some(slot) => {
            recruiter.team[slot] = Some(recruited);
            state.participation.clear_slot(recruiter_index, slot);
        }
        None => state.recruited = Some(recruited),
    }

    bus.push(BattleEvent::RecruitSucceeded {
        monster: species,
        team_slot,
    });
    Ok(())
}

pub fn execute_command(
    command: BattleCommand,
    state: &mut BattleState,
    bus: &mut EventBus,
    action_stack: &mut ActionStack,
) -> Result<(), ExecutionError> {
    log::debug!("Executing {:?}", command);

    match command {
        BattleCommand::EmitEvent(event) => {
            bus.push(event);
            Ok(())
        }
        BattleCommand::DealDamage { target, amount } => {
            execute_deal_damage_command(target, amount, state, bus)
        }
        BattleCommand::DealStatusDamage { target, amount } => {
            execute_status_damage_command(target, amount, state, bus)
        }
        BattleCommand::HealMonster { target, amount } => {
            execute_monster_command(target, state, |monster, _| {
                let healed = monster.heal(amount);
                if healed > 0 {
                    bus.push(BattleEvent::MonsterHealed {
                        target: monster.species,
                        amount: healed,
                        new_hp: monster.current_hp(),
                    });
                }
                Ok(())
            })
        }
        BattleCommand::SetStatus {
            target,
            status,
            announce,
        } => execute_monster_command(target, state, |monster, _| {
            if !announce {
                monster.status = Some(status);
            } else if monster.set_status(status) {
                bus.push(BattleEvent::StatusApplied {
                    target: monster.species,
                    status: status.status_type(),
                });
            }
            Ok(())
        }),
        BattleCommand::CureStatus { target } => {
            execute_monster_command(target, state, |monster, _| {
                if let Some(status) = monster.cure_status() {
                    bus.push(BattleEvent::StatusRemoved {
                        target: monster.species,
                        status: status.status_type(),
                    });
                }
                Ok(())
            })
        }
        BattleCommand::ConsumeSp { target, move_used } => {
            execute_monster_command(target, state, |monster, _| {
                monster
                    .use_move(move_used)
                    .map_err(|_| ExecutionError::InvalidMove(move_used))
            })
        }
        BattleCommand::ChangeStatStage {
            target,
            stat,
            delta,
        } => {
            let player = &mut state.players[target.to_index()];
            let species = player
                .active_monster()
                .map(|monster| monster.species)
                .ok_or(ExecutionError::NoMonster)?;
            let old_stage = player.get_stat_stage(stat);
            let change = player.modify_stat_stage(stat, delta);
            if change == 0 {
                bus.push(BattleEvent::StatChangeBlocked {
                    target: species,
                    stat,
                    rising: delta > 0,
                });
            } else {
                bus.push(BattleEvent::StatStageChanged {
                    target: species,
                    stat,
                    old_stage,
                    new_stage: old_stage + change,
                });
            }
            Ok(())
        }
        BattleCommand::AddCondition {
            target,
            condition,
            announce,
        } => {
            let player = &mut state.players[target.to_index()];
            player.add_condition(condition);
            if announce {
                if let Some(monster) = player.active_monster() {
                    bus.push(BattleEvent::ConditionApplied {
                        target: monster.species,
                        condition: condition.volatile_type(),
                    });
                }
            }
            Ok(())
        }
        BattleCommand::RemoveCondition {
            target,
            condition_type,
        } => {
            state.players[target.to_index()].remove_condition(condition_type);
            Ok(())
        }
        BattleCommand::SetLastMove { target, move_used } => {
            state.players[target.to_index()].last_move = Some(move_used);
            Ok(())
        }
        BattleCommand::SwitchMonster { target, team_index } => {
            let player_index = target.to_index();
            let player = &mut state.players[player_index];
            let old_monster = player
                .active_monster()
                .map(|monster| monster.species)
                .ok_or(ExecutionError::NoMonster)?;
            player
                .switch_monster(team_index)
                .map_err(|_| ExecutionError::InvalidTeamIndex(team_index))?;
            let new_monster = player
                .active_monster()
                .map(|monster| monster.species)
                .ok_or(ExecutionError::NoMonster)?;

            state.participation.record_participation(
                state.players[0].active_index,
                state.players[1].active_index,
            );
            bus.push(BattleEvent::MonsterSwitched {
                player_index,
                old_monster,
                new_monster,
            });
            Ok(())
        }
        BattleCommand::UseItem {
            target,
            item,
            team_index,
        } => execute_use_item_command(target, item, team_index, state, bus),
        BattleCommand::ConsumeItem { target, item } => {
            state.players[target.to_index()].inventory.remove(item, 1)?;
            Ok(())
        }
        BattleCommand::AddMoney { target, amount } => {
            let player_index = target.to_index();
            let player = &mut state.players[player_index];
            player.money = player.money.saturating_add(amount);
            bus.push(BattleEvent::MoneyGained {
                player_index,
                amount,
            });
            Ok(())
        }
        BattleCommand::AddItem {
            target,
            item,
            quantity,
        } => {
            let player_index = target.to_index();
            state.players[player_index].inventory.add(item, quantity);
            bus.push(BattleEvent::ItemDropped {
                player_index,
                item,
                quantity,
            });
            Ok(())
        }
        BattleCommand::AwardExp {
            target,
            team_index,
            amount,
        } => execute_award_exp_command(target, team_index, amount, state, bus),
        BattleCommand::IncrementEscapeAttempts => {
            state.escape_attempts = state.escape_attempts.saturating_add(1);
            Ok(())
        }
        BattleCommand::SetRecruitAffinity(affinity) => {
            state.recruit_affinity = affinity;
            Ok(())
        }
        BattleCommand::RecruitMonster { target } => execute_recruit_command(target, state, bus),
        BattleCommand::SetGameState(new_state) => {
            state.game_state = new_state;
            Ok(())
        }
        BattleCommand::IncrementTurnNumber => {
            state.turn_number += 1;
            Ok(())
        }
        BattleCommand::ClearActionQueue => {
            state.action_queue = [None, None];
            Ok(())
        }
        BattleCommand::PushAction(action) => {
            action_stack.push_front(action);
            Ok(())
        }
    }
}
