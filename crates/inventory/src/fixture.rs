//! Demo inventory.

use crate::inventory::{Category, Inventory};
use crate::item::Item;

/// Sample inventory with Electronics, Groceries and Clothing.
///
/// Built from scratch on every call; nothing is cached or shared.
pub fn sample_inventory() -> Inventory {
    let electronics = category([
        Item::new("Laptop", 1000.0, 5),
        Item::new("Smartphone", 500.0, 10),
    ]);
    let groceries = category([Item::new("Apples", 1.5, 100), Item::new("Bread", 2.0, 50)]);
    let clothing = category(
        [("T-shirt", 15.0), ("Jeans", 50.0)]
            .map(|(name, price)| Item::new(name, price, 20)),
    );

    Inventory::from_categories([
        ("Electronics".to_string(), electronics),
        ("Groceries".to_string(), groceries),
        ("Clothing".to_string(), clothing),
    ])
}

fn category<const N: usize>(items: [Item; N]) -> Category {
    items
        .into_iter()
        .map(|item| (item.name.clone(), item))
        .collect()
}
