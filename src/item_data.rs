use crate::errors::{ItemDataError, ItemDataResult};
use crate::Item;
use schema::ItemData;
use std::collections::HashMap;
use std::sync::LazyLock;

static ITEM_DATA: LazyLock<Result<HashMap<Item, ItemData>, String>> = LazyLock::new(|| {
    let entries: Vec<ItemData> =
        ron::from_str(include_str!("../data/items.ron")).map_err(|err| err.to_string())?;
    Ok(entries.into_iter().map(|entry| (entry.id, entry)).collect())
});

pub fn get_item_data(item: Item) -> ItemDataResult<&'static ItemData> {
    let table = ITEM_DATA
        .as_ref()
        .map_err(|err| ItemDataError::MalformedData(err.clone()))?;
    table.get(&item).ok_or(ItemDataError::ItemNotFound(item))
}
