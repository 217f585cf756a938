use crate::errors::SpeciesDataResult;
use crate::monster::MonsterInst;
use crate::species::get_species_data;
use crate::{Item, Species};
use schema::EvolutionMethod;

/// Species this monster should evolve into at its current level, if any.
/// Fainted monsters never evolve.
pub fn check_level_evolution(monster: &MonsterInst) -> SpeciesDataResult<Option<Species>> {
    if monster.is_fainted() {
        return Ok(None);
    }
    let species_data = get_species_data(monster.species)?;

    Ok(species_data
        .evolution
        .as_ref()
        .and_then(|evolution| match evolution.method {
            EvolutionMethod::Level(required_level) if monster.level >= required_level => {
                Some(evolution.evolves_into)
            }
            _ => None,
        }))
}

/// Species this monster evolves into when `item` is used on it, if any
pub fn check_item_evolution(monster: &MonsterInst, item: Item) -> SpeciesDataResult<Option<Species>> {
    let species_data = get_species_data(monster.species)?;

    Ok(species_data
        .evolution
        .as_ref()
        .and_then(|evolution| match evolution.method {
            EvolutionMethod::Item(required) if required == item => Some(evolution.evolves_into),
            _ => None,
        }))
}
