//! Lossless merge of two inventories.

use tracing::{debug, trace};

use crate::inventory::Inventory;
use crate::item::{AttributeValue, Item};

/// Combine two inventories into a new one, leaving both inputs untouched.
///
/// Starts from a deep copy of `base`. Categories and items only in `incoming`
/// are copied over whole. Items present in both are reconciled field by field:
/// quantities add up, every other field keeps the larger value (an attribute
/// missing from the `base` item counts as [`AttributeValue::DEFAULT`]). An
/// item's name is its key and is never changed by a merge.
pub fn merge(base: &Inventory, incoming: &Inventory) -> Inventory {
    let mut merged = base.deep_copy();

    for (category, handle) in incoming.categories() {
        let incoming_items = handle.borrow();

        let Some(target) = merged.category(category) else {
            debug!(category = %category, items = incoming_items.len(), "carrying over category");
            merged.insert_category(category.clone(), incoming_items.clone());
            continue;
        };

        let mut items = target.borrow_mut();
        for (name, item) in incoming_items.iter() {
            match items.get_mut(name) {
                Some(existing) => {
                    trace!(category = %category, item = %name, "reconciling item");
                    reconcile(existing, item);
                }
                None => {
                    trace!(category = %category, item = %name, "carrying over item");
                    let carried = Item {
                        name: name.clone(),
                        ..item.clone()
                    };
                    items.insert(name.clone(), carried);
                }
            }
        }
    }

    merged
}

fn reconcile(acc: &mut Item, incoming: &Item) {
    acc.quantity = acc.quantity.saturating_add(incoming.quantity);

    if incoming.price > acc.price {
        acc.price = incoming.price;
    }

    for (key, value) in &incoming.attributes {
        let current = acc
            .attributes
            .entry(key.clone())
            .or_insert(AttributeValue::DEFAULT);
        if value.total_cmp(current).is_gt() {
            *current = value.clone();
        }
    }
}
