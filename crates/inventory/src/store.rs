//! Free-function API over [`Inventory`].
//!
//! Each function is a thin wrapper over the matching `Inventory` method, kept
//! for callers that prefer a procedural surface.

use stockroom_core::DomainResult;

use crate::fixture;
use crate::inventory::{Category, Inventory};
use crate::item::{Item, ItemUpdate};
use crate::merge;

/// Fresh demo inventory (Electronics, Groceries, Clothing).
pub fn create_inventory() -> Inventory {
    fixture::sample_inventory()
}

pub fn update_inventory(inventory: &mut Inventory, category: &str, item_name: &str, update_info: ItemUpdate) {
    inventory.update(category, item_name, update_info);
}

pub fn merge_inventories(inv1: &Inventory, inv2: &Inventory) -> Inventory {
    merge::merge(inv1, inv2)
}

pub fn get_items_in_category(inventory: &Inventory, category: &str) -> Category {
    inventory.items_in_category(category)
}

/// Fails with `DomainError::EmptyCollection` when there are no items at all.
pub fn find_most_expensive_item(inventory: &Inventory) -> DomainResult<Item> {
    inventory.most_expensive_item()
}

pub fn check_item_in_stock(inventory: &Inventory, item_name: &str) -> Option<Item> {
    inventory.item_in_stock(item_name)
}

pub fn view_categories(inventory: &Inventory) -> Vec<String> {
    inventory.category_names()
}

pub fn view_all_items(inventory: &Inventory) -> Vec<Item> {
    inventory.all_items()
}

pub fn view_category_item_pairs(inventory: &Inventory) -> Vec<(String, String)> {
    inventory.category_item_pairs()
}

/// `deep = true` gives a fully independent copy; `false` shares the category
/// mappings with `inventory` (see [`Inventory::shallow_copy`]).
pub fn copy_inventory(inventory: &Inventory, deep: bool) -> Inventory {
    if deep {
        inventory.deep_copy()
    } else {
        inventory.shallow_copy()
    }
}
