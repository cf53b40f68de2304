//! Nested category -> item mapping with explicit shallow/deep copy semantics.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, trace};

use stockroom_core::{DomainError, DomainResult};

use crate::item::{Item, ItemUpdate};

/// Items of one category, keyed by item name.
pub type Category = BTreeMap<String, Item>;

/// Shared handle to a category.
///
/// Shallow copies of an [`Inventory`] hold clones of the same handle, so edits
/// made through one are visible through the other. Borrows must not be held
/// across calls into the inventory that owns the handle.
pub type CategoryHandle = Rc<RefCell<Category>>;

/// Top-level mapping from category name to category.
///
/// Categories and items iterate in lexicographic name order. Every query that
/// depends on order (tie-breaks, first match) follows that order.
///
/// `Clone` is the shallow copy: the outer map is new, the category handles are
/// shared. Use [`Inventory::deep_copy`] for a fully independent value.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    categories: BTreeMap<String, CategoryHandle>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an inventory that owns the given categories outright.
    ///
    /// Each item is renamed to the key it is stored under.
    pub fn from_categories(categories: impl IntoIterator<Item = (String, Category)>) -> Self {
        Self {
            categories: categories
                .into_iter()
                .map(|(name, items)| (name, Rc::new(RefCell::new(keyed(items)))))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Total number of items across all categories.
    pub fn item_count(&self) -> usize {
        self.categories.values().map(|c| c.borrow().len()).sum()
    }

    pub fn contains_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// Shared handle to a category, if present.
    pub fn category(&self, category: &str) -> Option<CategoryHandle> {
        self.categories.get(category).cloned()
    }

    /// Owned snapshot of one item.
    pub fn item(&self, category: &str, item_name: &str) -> Option<Item> {
        self.categories
            .get(category)
            .and_then(|c| c.borrow().get(item_name).cloned())
    }

    /// Like [`Inventory::item`], but absence is an error.
    pub fn require_item(&self, category: &str, item_name: &str) -> DomainResult<Item> {
        self.item(category, item_name)
            .ok_or_else(|| DomainError::not_found(format!("{category}/{item_name}")))
    }

    /// Insert (or replace) a whole category with a freshly owned mapping.
    ///
    /// Each item is renamed to the key it is stored under.
    pub fn insert_category(&mut self, name: impl Into<String>, items: Category) -> Option<Category> {
        self.categories
            .insert(name.into(), Rc::new(RefCell::new(keyed(items))))
            .map(unshare)
    }

    /// Remove a category from this inventory only; shallow copies keep theirs.
    pub fn remove_category(&mut self, name: &str) -> Option<Category> {
        self.categories.remove(name).map(unshare)
    }

    /// Whether both inventories hold the very same handle for `category`.
    pub fn shares_category_with(&self, other: &Inventory, category: &str) -> bool {
        match (self.categories.get(category), other.categories.get(category)) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Overwrite an existing item's fields, or insert a new item (creating the
    /// category when needed).
    ///
    /// A new item is always named `item_name`; missing price/quantity start at
    /// zero. No validation is performed on the values.
    pub fn update(&mut self, category: &str, item_name: &str, update: ItemUpdate) {
        let handle = self
            .categories
            .entry(category.to_string())
            .or_insert_with(|| {
                debug!(category, "creating category");
                Rc::new(RefCell::new(Category::new()))
            })
            .clone();
        let mut items = handle.borrow_mut();

        match items.get_mut(item_name) {
            Some(existing) => {
                debug!(category, item = item_name, "updating item");
                update.apply_to(existing);
            }
            None => {
                debug!(category, item = item_name, "inserting item");
                items.insert(item_name.to_string(), update.into_item(item_name));
            }
        }
    }

    /// Items of `category`, or an empty mapping when the category is absent.
    ///
    /// The result is a snapshot; use [`Inventory::category`] to edit in place.
    pub fn items_in_category(&self, category: &str) -> Category {
        self.categories
            .get(category)
            .map(|c| c.borrow().clone())
            .unwrap_or_default()
    }

    /// Item with the highest price; on ties the first in iteration order wins.
    pub fn most_expensive_item(&self) -> DomainResult<Item> {
        let mut best: Option<Item> = None;
        for handle in self.categories.values() {
            for item in handle.borrow().values() {
                if best.as_ref().is_none_or(|current| item.price > current.price) {
                    best = Some(item.clone());
                }
            }
        }
        best.ok_or_else(|| DomainError::empty_collection("inventory contains no items"))
    }

    /// First item named `item_name` with positive quantity, scanning categories in order.
    pub fn item_in_stock(&self, item_name: &str) -> Option<Item> {
        self.categories.values().find_map(|handle| {
            handle
                .borrow()
                .get(item_name)
                .filter(|item| item.in_stock())
                .cloned()
        })
    }

    pub fn category_names(&self) -> Vec<String> {
        self.categories.keys().cloned().collect()
    }

    /// Every item, category by category.
    pub fn all_items(&self) -> Vec<Item> {
        self.categories
            .values()
            .flat_map(|handle| handle.borrow().values().cloned().collect::<Vec<_>>())
            .collect()
    }

    /// `(category, item)` name pairs in the same order as [`Inventory::all_items`].
    pub fn category_item_pairs(&self) -> Vec<(String, String)> {
        self.categories
            .iter()
            .flat_map(|(category, handle)| {
                handle
                    .borrow()
                    .keys()
                    .map(|item| (category.clone(), item.clone()))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// New outer map whose categories are the same shared handles.
    pub fn shallow_copy(&self) -> Inventory {
        trace!(categories = self.categories.len(), "shallow copy");
        self.clone()
    }

    /// Fully independent copy: no category or item is shared.
    pub fn deep_copy(&self) -> Inventory {
        trace!(categories = self.categories.len(), "deep copy");
        Self {
            categories: self
                .categories
                .iter()
                .map(|(name, handle)| (name.clone(), Rc::new(RefCell::new(handle.borrow().clone()))))
                .collect(),
        }
    }

    pub(crate) fn categories(&self) -> impl Iterator<Item = (&String, &CategoryHandle)> {
        self.categories.iter()
    }
}

fn keyed(items: Category) -> Category {
    items
        .into_iter()
        .map(|(key, mut item)| {
            if item.name != key {
                debug!(item = %key, stored_name = %item.name, "renaming item to its key");
                item.name = key.clone();
            }
            (key, item)
        })
        .collect()
}

fn unshare(handle: CategoryHandle) -> Category {
    Rc::try_unwrap(handle)
        .map(RefCell::into_inner)
        .unwrap_or_else(|shared| shared.borrow().clone())
}

/// Structural equality: same category names holding equal items.
impl PartialEq for Inventory {
    fn eq(&self, other: &Self) -> bool {
        self.categories.len() == other.categories.len()
            && self
                .categories
                .iter()
                .zip(other.categories.iter())
                .all(|((na, a), (nb, b))| na == nb && *a.borrow() == *b.borrow())
    }
}

impl Serialize for Inventory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for (name, handle) in &self.categories {
            map.serialize_entry(name, &*handle.borrow())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Inventory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        BTreeMap::<String, Category>::deserialize(deserializer).map(Inventory::from_categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn two_by_two() -> Inventory {
        let mut inv = Inventory::new();
        inv.update("Fruit", "Apple", ItemUpdate::new().price(1.0).quantity(3));
        inv.update("Fruit", "Pear", ItemUpdate::new().price(2.0).quantity(0));
        inv.update("Tools", "Hammer", ItemUpdate::new().price(12.5).quantity(1));
        inv.update("Tools", "Saw", ItemUpdate::new().price(30.0).quantity(2));
        inv
    }

    #[test]
    fn update_creates_category_and_item() {
        let mut inv = Inventory::new();
        inv.update("Toys", "Robot", ItemUpdate::new().price(30.0).quantity(4));

        assert_eq!(inv.item("Toys", "Robot"), Some(Item::new("Robot", 30.0, 4)));
    }

    #[test]
    fn update_existing_preserves_absent_fields() {
        let mut inv = two_by_two();
        inv.update("Tools", "Saw", ItemUpdate::new().quantity(99));

        let saw = inv.item("Tools", "Saw").unwrap();
        assert_eq!(saw.quantity, 99);
        assert_eq!(saw.price, 30.0);
        assert_eq!(saw.name, "Saw");
    }

    #[test]
    fn require_item_reports_missing_path() {
        let inv = two_by_two();
        assert_eq!(inv.require_item("Tools", "Saw").unwrap().price, 30.0);
        assert_eq!(
            inv.require_item("Tools", "Anvil").unwrap_err(),
            DomainError::not_found("Tools/Anvil")
        );
    }

    #[test]
    fn update_accepts_negative_quantity() {
        let mut inv = two_by_two();
        inv.update("Fruit", "Apple", ItemUpdate::new().quantity(-4));
        assert_eq!(inv.item("Fruit", "Apple").unwrap().quantity, -4);
    }

    #[test]
    fn items_in_missing_category_is_empty() {
        let inv = two_by_two();
        assert!(inv.items_in_category("Toys").is_empty());
        assert_eq!(inv.items_in_category("Fruit").len(), 2);
    }

    #[test]
    fn most_expensive_item_on_empty_inventory_fails() {
        let err = Inventory::new().most_expensive_item().unwrap_err();
        assert!(matches!(err, DomainError::EmptyCollection(_)));

        let mut only_empty_categories = Inventory::new();
        only_empty_categories.insert_category("Empty", Category::new());
        assert!(only_empty_categories.most_expensive_item().is_err());
    }

    #[test]
    fn most_expensive_item_tie_goes_to_first_in_order() {
        let mut inv = Inventory::new();
        inv.update("B", "Second", ItemUpdate::new().price(5.0));
        inv.update("A", "First", ItemUpdate::new().price(5.0));

        assert_eq!(inv.most_expensive_item().unwrap().name, "First");
    }

    #[test]
    fn item_in_stock_skips_zero_quantity() {
        let inv = two_by_two();
        assert_eq!(inv.item_in_stock("Apple").map(|i| i.quantity), Some(3));
        assert_eq!(inv.item_in_stock("Pear"), None);
        assert_eq!(inv.item_in_stock("Anvil"), None);
    }

    #[test]
    fn item_in_stock_falls_through_to_later_category() {
        let mut inv = Inventory::new();
        inv.update("A", "Bolt", ItemUpdate::new().quantity(0));
        inv.update("B", "Bolt", ItemUpdate::new().quantity(7).price(0.1));

        assert_eq!(inv.item_in_stock("Bolt").unwrap().quantity, 7);
    }

    #[test]
    fn views_follow_name_order() {
        let inv = two_by_two();

        assert_eq!(inv.category_names(), vec!["Fruit", "Tools"]);
        let names: Vec<_> = inv.all_items().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["Apple", "Pear", "Hammer", "Saw"]);
        assert_eq!(
            inv.category_item_pairs()[2],
            ("Tools".to_string(), "Hammer".to_string())
        );
        assert_eq!(inv.item_count(), 4);
    }

    #[test]
    fn shallow_copy_shares_categories_but_not_outer_map() {
        let original = two_by_two();
        let mut copy = original.shallow_copy();

        copy.update("Fruit", "Apple", ItemUpdate::new().quantity(42));
        assert_eq!(original.item("Fruit", "Apple").unwrap().quantity, 42);
        assert!(copy.shares_category_with(&original, "Fruit"));

        copy.update("Toys", "Robot", ItemUpdate::new().price(30.0).quantity(4));
        assert!(!original.contains_category("Toys"));

        copy.remove_category("Tools");
        assert!(original.contains_category("Tools"));
    }

    #[test]
    fn deep_copy_is_independent() {
        let original = two_by_two();
        let copy = original.deep_copy();
        assert_eq!(copy, original);
        assert!(!copy.shares_category_with(&original, "Fruit"));

        if let Some(fruit) = copy.category("Fruit") {
            fruit.borrow_mut().get_mut("Apple").unwrap().price = 99.0;
        }
        assert_eq!(original.item("Fruit", "Apple").unwrap().price, 1.0);
        assert_ne!(copy, original);
    }

    #[test]
    fn remove_shared_category_returns_contents() {
        let mut original = two_by_two();
        let _copy = original.shallow_copy();

        let removed = original.remove_category("Fruit").unwrap();
        assert_eq!(removed.len(), 2);
    }

    #[test]
    fn inserted_items_take_their_key_as_name() {
        let mut items = Category::new();
        items.insert("Saw".to_string(), Item::new("Zaw", 10.0, 1));

        let mut inv = Inventory::from_categories([("Tools".to_string(), items.clone())]);
        assert_eq!(inv.item("Tools", "Saw").unwrap().name, "Saw");

        inv.insert_category("Spare", items);
        assert_eq!(inv.item("Spare", "Saw").unwrap().name, "Saw");
    }

    #[test]
    fn deserialized_items_take_their_key_as_name() {
        let inv: Inventory = serde_json::from_str(
            r#"{"Tools": {"Saw": {"name": "Zaw", "price": 10.0, "quantity": 1}}}"#,
        )
        .unwrap();

        assert_eq!(inv.item("Tools", "Saw"), Some(Item::new("Saw", 10.0, 1)));
    }

    #[test]
    fn serializes_as_nested_object() {
        let mut inv = Inventory::new();
        inv.update("Toys", "Robot", ItemUpdate::new().price(30.0).quantity(4));

        let json = serde_json::to_value(&inv).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"Toys": {"Robot": {"name": "Robot", "price": 30.0, "quantity": 4}}})
        );

        let back: Inventory = serde_json::from_value(json).unwrap();
        assert_eq!(back, inv);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: editing every item of a deep copy never touches the original.
        #[test]
        fn deep_copy_edits_stay_local(
            entries in prop::collection::vec(("[A-C]", "[a-e]", 0.0f64..500.0, 0i64..50), 0..12)
        ) {
            let mut original = Inventory::new();
            for (category, item, price, quantity) in &entries {
                original.update(category, item, ItemUpdate::new().price(*price).quantity(*quantity));
            }
            let snapshot = original.deep_copy();

            let mut copy = original.deep_copy();
            prop_assert_eq!(&copy, &original);
            for (category, item) in copy.category_item_pairs() {
                copy.update(&category, &item, ItemUpdate::new().price(-1.0).quantity(-1));
            }
            copy.insert_category("Extra", Category::new());

            prop_assert_eq!(original, snapshot);
        }
    }
}
