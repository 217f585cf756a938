use crate::errors::{ActionError, SpeciesDataResult};
use crate::move_data::get_move_max_sp;
use crate::progression::learning::known_moves_from_learnset;
use crate::species::get_species_data;
use crate::{Move, Species};
use schema::{BaseStats, MonsterType, SpeciesData, StatusType};
use serde::{Deserialize, Serialize};

pub const MAX_LEVEL: u8 = 100;

/// Major status condition carried by a monster. Sleep counts the turns left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCondition {
    Poison,
    Burn,
    Sleep(u8),
    Paralysis,
    Freeze,
}

impl StatusCondition {
    pub fn status_type(&self) -> StatusType {
        match self {
            StatusCondition::Poison => StatusType::Poison,
            StatusCondition::Burn => StatusType::Burn,
            StatusCondition::Sleep(_) => StatusType::Sleep,
            StatusCondition::Paralysis => StatusType::Paralysis,
            StatusCondition::Freeze => StatusType::Freeze,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveInstance {
    pub move_: Move,
    pub sp: u8,
}

impl MoveInstance {
    /// Create a new move instance with max SP
    pub fn new(move_: Move) -> Self {
        MoveInstance {
            move_,
            sp: get_move_max_sp(move_),
        }
    }

    pub fn max_sp(&self) -> u8 {
        get_move_max_sp(self.move_)
    }

    /// Use the move (decrease SP). Returns false when there is nothing left.
    pub fn use_move(&mut self) -> bool {
        if self.sp > 0 {
            self.sp -= 1;
            true
        } else {
            false
        }
    }

    /// Restore SP, returning how much was actually restored.
    pub fn restore_sp(&mut self, amount: u8) -> u8 {
        let before = self.sp;
        self.sp = self.sp.saturating_add(amount).min(self.max_sp());
        self.sp - before
    }

    pub fn restore_max(&mut self) -> u8 {
        let before = self.sp;
        self.sp = self.max_sp();
        self.sp - before
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentStats {
    pub hp: u16, // max HP
    pub attack: u16,
    pub defense: u16,
    pub sp_attack: u16,
    pub sp_defense: u16,
    pub speed: u16,
}

impl CurrentStats {
    /// `floor(base * level / 100) + 5`; HP uses `+ 10 + level` instead.
    pub fn calculate(base: &BaseStats, level: u8) -> Self {
        let level = level as u16;
        let other = |base: u8| base as u16 * level / 100 + 5;
        CurrentStats {
            hp: base.hp as u16 * level / 100 + 10 + level,
            attack: other(base.attack),
            defense: other(base.defense),
            sp_attack: other(base.sp_attack),
            sp_defense: other(base.sp_defense),
            speed: other(base.speed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UseMoveError {
    NoSpRemaining,
    MoveNotKnown,
}

/// One level gained by [`MonsterInst::add_exp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUp {
    pub level: u8,
    pub max_hp_gain: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LearnMoveOutcome {
    Learned { slot: usize },
    AlreadyKnown,
    /// All four slots are taken; the caller decides whether to `replace_move`.
    NoFreeSlot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterInst {
    pub species: Species,
    pub nickname: Option<String>,
    pub level: u8,
    pub exp: u32,
    current_hp: u16,
    pub stats: CurrentStats,
    pub moves: [Option<MoveInstance>; 4],
    pub status: Option<StatusCondition>,
}

impl MonsterInst {
    /// Create a monster, looking up its species template.
    /// Without explicit moves it knows the last four moves its learnset teaches by `level`.
    pub fn new(species: Species, level: u8, moves: Option<Vec<Move>>) -> SpeciesDataResult<Self> {
        let species_data = get_species_data(species)?;
        Ok(Self::new_with_data(species_data, level, moves))
    }

    pub fn new_with_data(species_data: &SpeciesData, level: u8, moves: Option<Vec<Move>>) -> Self {
        let level = level.clamp(1, MAX_LEVEL);
        let stats = CurrentStats::calculate(&species_data.base_stats, level);
        let moves =
            moves.unwrap_or_else(|| known_moves_from_learnset(&species_data.learnset, level));

        let mut move_array = [const { None }; 4];
        for (slot, move_) in moves.into_iter().take(4).enumerate() {
            move_array[slot] = Some(MoveInstance::new(move_));
        }

        MonsterInst {
            species: species_data.id,
            nickname: None,
            level,
            exp: species_data.growth_rate.exp_for_level(level),
            current_hp: stats.hp,
            stats,
            moves: move_array,
            status: None,
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(self.species.name())
    }

    /// Types from the species table. An unreadable table yields no types, which is neutral in every matchup.
    pub fn types(&self) -> &'static [MonsterType] {
        match get_species_data(self.species) {
            Ok(data) => &data.types,
            Err(err) => {
                log::warn!("{err}; treating {} as typeless", self.species);
                &[]
            }
        }
    }

    pub fn max_hp(&self) -> u16 {
        self.stats.hp
    }

    pub fn current_hp(&self) -> u16 {
        self.current_hp
    }

    pub fn set_hp(&mut self, hp: u16) {
        self.current_hp = hp.min(self.max_hp());
    }

    pub fn set_hp_to_max(&mut self) {
        self.current_hp = self.max_hp();
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    /// Apply damage. Returns true if this damage made the monster faint.
    pub fn take_damage(&mut self, amount: u16) -> bool {
        let was_fainted = self.is_fainted();
        self.current_hp = self.current_hp.saturating_sub(amount);
        if self.is_fainted() {
            // Fainted monsters drop their status.
            self.status = None;
        }
        !was_fainted && self.is_fainted()
    }

    /// Heal without exceeding max HP. Fainted monsters are not healed. Returns the HP restored.
    pub fn heal(&mut self, amount: u16) -> u16 {
        if self.is_fainted() {
            return 0;
        }
        let before = self.current_hp;
        self.current_hp = self.current_hp.saturating_add(amount).min(self.max_hp());
        self.current_hp - before
    }

    /// Bring a fainted monster back with `percent` of its max HP (at least 1).
    pub fn revive(&mut self, percent: u8) -> bool {
        if !self.is_fainted() {
            return false;
        }
        let restored = (self.max_hp() as u32 * percent.min(100) as u32 / 100).max(1);
        self.current_hp = restored as u16;
        true
    }

    /// Inflict a status. Fails if the monster already has one or has fainted.
    pub fn set_status(&mut self, status: StatusCondition) -> bool {
        if self.status.is_some() || self.is_fainted() {
            return false;
        }
        self.status = Some(status);
        true
    }

    pub fn cure_status(&mut self) -> Option<StatusCondition> {
        self.status.take()
    }

    pub fn use_move(&mut self, move_: Move) -> Result<(), UseMoveError> {
        // Engine-injected moves never consume SP.
        if move_.is_internal() {
            return Ok(());
        }
        let instance = self
            .moves
            .iter_mut()
            .flatten()
            .find(|instance| instance.move_ == move_)
            .ok_or(UseMoveError::MoveNotKnown)?;
        if instance.use_move() {
            Ok(())
        } else {
            Err(UseMoveError::NoSpRemaining)
        }
    }

    pub fn known_moves(&self) -> Vec<Move> {
        self.moves.iter().flatten().map(|instance| instance.move_).collect()
    }

    pub fn has_usable_move(&self) -> bool {
        self.moves.iter().flatten().any(|instance| instance.sp > 0)
    }

    /// Add experience, levelling up as many times as it allows (never past `level_cap`).
    /// Each new level raises max HP and current HP by the same amount.
    pub fn add_exp(&mut self, amount: u32, level_cap: u8) -> SpeciesDataResult<Vec<LevelUp>> {
        let species_data = get_species_data(self.species)?;
        let growth_rate = species_data.growth_rate;
        let level_cap = level_cap.clamp(1, MAX_LEVEL);

        self.exp = self.exp.saturating_add(amount);
        let mut level_ups = Vec::new();

        while self.level < level_cap && self.exp >= growth_rate.exp_for_level(self.level + 1) {
            self.level += 1;
            let old_max_hp = self.max_hp();
            self.stats = CurrentStats::calculate(&species_data.base_stats, self.level);
            let max_hp_gain = self.max_hp().saturating_sub(old_max_hp);
            if !self.is_fainted() {
                self.current_hp = (self.current_hp + max_hp_gain).min(self.max_hp());
            }
            level_ups.push(LevelUp {
                level: self.level,
                max_hp_gain,
            });
        }

        if self.level >= level_cap {
            self.exp = self.exp.min(growth_rate.exp_for_level(self.level));
        }

        Ok(level_ups)
    }

    pub fn learn_move(&mut self, move_: Move) -> LearnMoveOutcome {
        if self.known_moves().contains(&move_) {
            return LearnMoveOutcome::AlreadyKnown;
        }
        match self.moves.iter().position(|slot| slot.is_none()) {
            Some(slot) => {
                self.moves[slot] = Some(MoveInstance::new(move_));
                LearnMoveOutcome::Learned { slot }
            }
            None => LearnMoveOutcome::NoFreeSlot,
        }
    }

    /// Overwrite a move slot, returning the move that was forgotten.
    pub fn replace_move(&mut self, slot: usize, move_: Move) -> Result<Option<Move>, ActionError> {
        let entry = self
            .moves
            .get_mut(slot)
            .ok_or(ActionError::InvalidMoveIndex(slot))?;
        let forgotten = entry.replace(MoveInstance::new(move_)).map(|old| old.move_);
        Ok(forgotten)
    }

    /// Change species and recalculate stats. Damage taken carries over.
    pub fn evolve_into(&mut self, species: Species) -> SpeciesDataResult<()> {
        let species_data = get_species_data(species)?;
        let damage_taken = self.max_hp() - self.current_hp;
        self.species = species;
        self.stats = CurrentStats::calculate(&species_data.base_stats, self.level);
        if !self.is_fainted() {
            self.current_hp = self.max_hp().saturating_sub(damage_taken).max(1);
        }
        Ok(())
    }
}
