use serde::{Deserialize, Serialize};

/// Tracks which team members have faced each other during battle.
/// `participation[player][my_monster][opponent_monster]` is true once they met.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleParticipationTracker {
    participation: [[[bool; 6]; 6]; 2],
}

impl BattleParticipationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the active monsters of both players faced each other
    pub fn record_participation(&mut self, p0_active: usize, p1_active: usize) {
        if p0_active < 6 && p1_active < 6 {
            self.participation[0][p0_active][p1_active] = true;
            self.participation[1][p1_active][p0_active] = true;
        }
    }

    /// Team indices on the other side that faced `opponent_player`'s monster at `opponent_index`
    pub fn get_participants_against(&self, opponent_player: usize, opponent_index: usize) -> Vec<usize> {
        if opponent_player >= 2 || opponent_index >= 6 {
            return Vec::new();
        }

        let participant_player = 1 - opponent_player;
        (0..6)
            .filter(|&index| self.participation[participant_player][index][opponent_index])
            .collect()
    }

    /// Forget everything a team slot has seen. Used when a recruited monster takes over a slot.
    pub fn clear_slot(&mut self, player: usize, index: usize) {
        if player >= 2 || index >= 6 {
            return;
        }
        self.participation[player][index] = [false; 6];
        for row in self.participation[1 - player].iter_mut() {
            row[index] = false;
        }
    }
}
