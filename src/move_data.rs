use crate::errors::{MoveDataError, MoveDataResult};
use crate::Move;
use schema::MoveData;
use std::collections::HashMap;
use std::sync::LazyLock;

// Fallback when a move is missing from the table. Only reachable with a broken data file.
const DEFAULT_MAX_SP: u8 = 20;

// Parsed once on first access. A parse failure is kept so every lookup can report it.
static MOVE_DATA: LazyLock<Result<HashMap<Move, MoveData>, String>> = LazyLock::new(|| {
    let entries: Vec<MoveData> =
        ron::from_str(include_str!("../data/moves.ron")).map_err(|err| err.to_string())?;
    let mut table = HashMap::with_capacity(entries.len());
    for entry in entries {
        if table.contains_key(&entry.id) {
            log::warn!("Duplicate move entry for {:?}; keeping the last one", entry.id);
        }
        table.insert(entry.id, entry);
    }
    Ok(table)
});

/// Get move data for a specific move from the embedded table
pub fn get_move_data(move_: Move) -> MoveDataResult<&'static MoveData> {
    let table = MOVE_DATA
        .as_ref()
        .map_err(|err| MoveDataError::MalformedData(err.clone()))?;
    table.get(&move_).ok_or(MoveDataError::MoveNotFound(move_))
}

/// Get max SP for a specific move
pub fn get_move_max_sp(move_: Move) -> u8 {
    match get_move_data(move_) {
        Ok(data) => data.max_sp,
        Err(err) => {
            log::warn!("{err}; using default max SP");
            DEFAULT_MAX_SP
        }
    }
}
