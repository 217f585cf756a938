use crate::errors::ItemUseError;
use crate::Item;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A bag of items keyed by item, ordered the same way the `Item` enum is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    items: BTreeMap<Item, u16>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: Item, quantity: u16) {
        if quantity == 0 {
            return;
        }
        let count = self.items.entry(item).or_insert(0);
        *count = count.saturating_add(quantity);
    }

    /// Take `quantity` of an item out of the bag. Nothing is removed if there are not enough.
    pub fn remove(&mut self, item: Item, quantity: u16) -> Result<(), ItemUseError> {
        let count = self
            .items
            .get_mut(&item)
            .filter(|count| **count >= quantity)
            .ok_or(ItemUseError::NotInInventory(item))?;
        *count -= quantity;
        if *count == 0 {
            self.items.remove(&item);
        }
        Ok(())
    }

    pub fn count(&self, item: Item) -> u16 {
        self.items.get(&item).copied().unwrap_or(0)
    }

    pub fn contains(&self, item: Item) -> bool {
        self.count(item) > 0
    }

    pub fn items(&self) -> impl Iterator<Item = (Item, u16)> + '_ {
        self.items.iter().map(|(item, count)| (*item, *count))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<(Item, u16)> for Inventory {
    fn from_iter<I: IntoIterator<Item = (Item, u16)>>(iter: I) -> Self {
        let mut inventory = Inventory::new();
        for (item, quantity) in iter {
            inventory.add(item, quantity);
        }
        inventory
    }
}
