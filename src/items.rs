use crate::errors::ItemUseError;
use crate::inventory::Inventory;
use crate::item_data::get_item_data;
use crate::monster::MonsterInst;
use crate::progression::evolution::check_item_evolution;
use crate::{Item, Species};
use schema::{ItemKind, RecoveryEffect, StatusType};
use serde::{Deserialize, Serialize};

const REVIVE_PERCENT: u8 = 50;

/// What using an item actually did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemOutcome {
    pub hp_restored: u16,
    pub revived: bool,
    pub cured: Option<StatusType>,
    pub sp_restored: u16,
    pub evolved_into: Option<Species>,
}

impl ItemOutcome {
    fn had_effect(&self) -> bool {
        self.hp_restored > 0
            || self.revived
            || self.cured.is_some()
            || self.sp_restored > 0
            || self.evolved_into.is_some()
    }
}

/// Use an item on a monster. Nothing changes when the item would have no effect.
///
/// Recruitment items only work through a recruit attempt in a wild battle, so they
/// are rejected here with `WrongContext`.
pub fn apply_item(item: Item, monster: &mut MonsterInst) -> Result<ItemOutcome, ItemUseError> {
    let item_data = get_item_data(item)?;

    let outcome = match &item_data.kind {
        ItemKind::Recovery(effect) => apply_recovery(effect, monster),
        ItemKind::Recruit { .. } => return Err(ItemUseError::WrongContext(item)),
        ItemKind::Evolution => match check_item_evolution(monster, item)? {
            Some(species) => {
                monster.evolve_into(species)?;
                ItemOutcome {
                    evolved_into: Some(species),
                    ..ItemOutcome::default()
                }
            }
            None => ItemOutcome::default(),
        },
    };

    if outcome.had_effect() {
        log::debug!("{} used on {}: {:?}", item, monster.display_name(), outcome);
        Ok(outcome)
    } else {
        Err(ItemUseError::NoEffect(item))
    }
}

/// Use one unit of an item from the bag. The unit is only consumed if the item worked.
pub fn use_item(
    inventory: &mut Inventory,
    item: Item,
    monster: &mut MonsterInst,
) -> Result<ItemOutcome, ItemUseError> {
    if !inventory.contains(item) {
        return Err(ItemUseError::NotInInventory(item));
    }
    let outcome = apply_item(item, monster)?;
    inventory.remove(item, 1)?;
    Ok(outcome)
}

fn apply_recovery(effect: &RecoveryEffect, monster: &mut MonsterInst) -> ItemOutcome {
    let mut outcome = ItemOutcome::default();

    if effect.revive {
        let percent = if effect.max_revive { 100 } else { REVIVE_PERCENT };
        if monster.revive(percent) {
            outcome.revived = true;
            outcome.hp_restored = monster.current_hp();
        }
        return outcome;
    }

    // Everything else needs a conscious target.
    if monster.is_fainted() {
        return outcome;
    }

    if effect.restore_max_hp {
        outcome.hp_restored = monster.heal(monster.max_hp());
    } else if effect.hp > 0 {
        outcome.hp_restored = monster.heal(effect.hp);
    }

    if let Some(cure) = effect.cure {
        if let Some(status) = monster.status.map(|status| status.status_type()) {
            if cure.cures(status) {
                monster.cure_status();
                outcome.cured = Some(status);
            }
        }
    }

    for instance in monster.moves.iter_mut().flatten() {
        let restored = if effect.restore_max_sp {
            instance.restore_max()
        } else {
            instance.restore_sp(effect.sp)
        };
        outcome.sp_restored += restored as u16;
    }

    outcome
}
