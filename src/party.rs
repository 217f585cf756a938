use crate::errors::PartyError;
use crate::monster::MonsterInst;
use serde::{Deserialize, Serialize};

pub const MAX_PARTY_SIZE: usize = 6;

/// The monsters a player carries between battles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Party {
    members: Vec<MonsterInst>,
}

impl Party {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_members(members: Vec<MonsterInst>) -> Result<Self, PartyError> {
        if members.len() > MAX_PARTY_SIZE {
            return Err(PartyError::PartyFull(MAX_PARTY_SIZE));
        }
        Ok(Self { members })
    }

    pub fn add(&mut self, monster: MonsterInst) -> Result<(), PartyError> {
        if self.is_full() {
            return Err(PartyError::PartyFull(self.members.len()));
        }
        self.members.push(monster);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<MonsterInst, PartyError> {
        if index >= self.members.len() {
            return Err(PartyError::InvalidIndex(index));
        }
        Ok(self.members.remove(index))
    }

    pub fn swap(&mut self, a: usize, b: usize) -> Result<(), PartyError> {
        for index in [a, b] {
            if index >= self.members.len() {
                return Err(PartyError::InvalidIndex(index));
            }
        }
        self.members.swap(a, b);
        Ok(())
    }

    pub fn members(&self) -> &[MonsterInst] {
        &self.members
    }

    pub fn get(&self, index: usize) -> Option<&MonsterInst> {
        self.members.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut MonsterInst> {
        self.members.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= MAX_PARTY_SIZE
    }

    pub fn first_healthy_index(&self) -> Option<usize> {
        self.members.iter().position(|monster| !monster.is_fainted())
    }

    pub fn has_healthy(&self) -> bool {
        self.first_healthy_index().is_some()
    }

    /// Full recovery for every member: HP, status and SP. Fainted members are revived.
    pub fn heal_all(&mut self) {
        for monster in &mut self.members {
            monster.set_hp_to_max();
            monster.cure_status();
            for instance in monster.moves.iter_mut().flatten() {
                instance.restore_max();
            }
        }
    }

    /// Lay the party out as a battle team. The first healthy member should lead, so
    /// callers normally pair this with `first_healthy_index`.
    pub fn to_team(&self) -> [Option<MonsterInst>; 6] {
        let mut team = [const { None }; 6];
        for (slot, monster) in self.members.iter().enumerate() {
            team[slot] = Some(monster.clone());
        }
        team
    }

    /// Rebuild a party from a battle team, keeping slot order and skipping empty slots.
    pub fn from_team(team: [Option<MonsterInst>; 6]) -> Self {
        Self {
            members: team.into_iter().flatten().collect(),
        }
    }
}
