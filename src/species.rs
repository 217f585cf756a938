use crate::errors::{SpeciesDataError, SpeciesDataResult};
use schema::SpeciesData;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

// Re-export the Species enum from the schema crate
pub use schema::Species;

static SPECIES_DATA: LazyLock<Result<HashMap<Species, SpeciesData>, String>> =
    LazyLock::new(|| {
        let entries: Vec<SpeciesData> =
            ron::from_str(include_str!("../data/species.ron")).map_err(|err| err.to_string())?;
        Ok(entries.into_iter().map(|entry| (entry.id, entry)).collect())
    });

/// Get the static template for a species
pub fn get_species_data(species: Species) -> SpeciesDataResult<&'static SpeciesData> {
    let table = SPECIES_DATA
        .as_ref()
        .map_err(|err| SpeciesDataError::MalformedData(err.clone()))?;
    table
        .get(&species)
        .ok_or(SpeciesDataError::SpeciesNotFound(species))
}

/// Display detailed information about a species including stats and description
pub fn display_species_detailed(species: Species, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match get_species_data(species) {
        Ok(data) => {
            writeln!(f, "{}", data.name)?;
            writeln!(f, "--------------------")?;
            writeln!(f, "{}", data.description)?;
            writeln!(f, "--------------------")?;

            let type_names: Vec<String> = data.types.iter().map(|t| t.to_string()).collect();
            writeln!(f, "Type(s): {}", type_names.join(" / "))?;
            writeln!(f, "--------------------")?;

            writeln!(f, "Base Stats:")?;
            let base_stats = &data.base_stats;
            const LABEL_WIDTH: usize = 12;

            writeln!(f, "{:<LABEL_WIDTH$} : {}", "HP", base_stats.hp)?;
            writeln!(f, "{:<LABEL_WIDTH$} : {}", "Attack", base_stats.attack)?;
            writeln!(f, "{:<LABEL_WIDTH$} : {}", "Defense", base_stats.defense)?;
            writeln!(f, "{:<LABEL_WIDTH$} : {}", "Sp. Atk", base_stats.sp_attack)?;
            writeln!(f, "{:<LABEL_WIDTH$} : {}", "Sp. Def", base_stats.sp_defense)?;
            writeln!(f, "{:<LABEL_WIDTH$} : {}", "Speed", base_stats.speed)?;
            write!(f, "{:<LABEL_WIDTH$} : {}", "Total", base_stats.total())
        }
        // Fall back to the bare name if the table is unavailable.
        Err(_) => write!(f, "{}", species.name()),
    }
}

/// `Display` adapter around [`display_species_detailed`].
pub struct SpeciesSummary(pub Species);

impl fmt::Display for SpeciesSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_species_detailed(self.0, f)
    }
}
