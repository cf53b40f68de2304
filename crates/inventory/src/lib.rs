//! Inventory record-keeping (in-memory).
//!
//! Categories of named items with price and quantity, plus update, merge,
//! query and copy operations. Pure domain logic: no IO and no persistence.
//!
//! An [`Inventory`] is single-threaded. Shallow copies share category handles
//! (`Rc<RefCell<_>>`), so the type is neither `Send` nor `Sync`.

pub mod fixture;
pub mod inventory;
pub mod item;
pub mod merge;
pub mod store;

pub use inventory::{Category, CategoryHandle, Inventory};
pub use item::{AttributeValue, Item, ItemUpdate};
pub use store::{
    check_item_in_stock, copy_inventory, create_inventory, find_most_expensive_item,
    get_items_in_category, merge_inventories, update_inventory, view_all_items, view_categories,
    view_category_item_pairs,
};
