use crate::errors::SpeciesDataResult;
use crate::species::get_species_data;
use crate::{Move, Species};
use schema::Learnset;

/// Moves a species learns exactly at `level`
pub fn moves_learned_at_level(species: Species, level: u8) -> SpeciesDataResult<Vec<Move>> {
    let species_data = get_species_data(species)?;
    Ok(species_data
        .learnset
        .learns_at_level(level)
        .cloned()
        .unwrap_or_default())
}

/// The moves a freshly created monster of this species knows at `level`
pub fn moves_known_at_level(species: Species, level: u8) -> SpeciesDataResult<Vec<Move>> {
    let species_data = get_species_data(species)?;
    Ok(known_moves_from_learnset(&species_data.learnset, level))
}

/// Every move learned up to `level` in learning order, keeping the last four.
pub fn known_moves_from_learnset(learnset: &Learnset, level: u8) -> Vec<Move> {
    let mut levels: Vec<u8> = learnset
        .level_up
        .keys()
        .copied()
        .filter(|&learn_level| learn_level <= level)
        .collect();
    levels.sort_unstable();

    let mut known: Vec<Move> = Vec::new();
    for learn_level in levels {
        for move_ in &learnset.level_up[&learn_level] {
            known.retain(|existing| existing != move_);
            known.push(*move_);
        }
    }

    let skip = known.len().saturating_sub(4);
    known.split_off(skip)
}
