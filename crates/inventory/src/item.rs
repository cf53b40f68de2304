use core::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Extra item field beyond `name`/`price`/`quantity` (e.g. `discount`, `supplier`).
///
/// Serialized untagged, so an item reads as a flat record:
/// `{"name": "Laptop", "price": 1000.0, "quantity": 5, "supplier": "Acme"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl AttributeValue {
    /// Value assumed for an attribute the item does not carry yet.
    pub const DEFAULT: AttributeValue = AttributeValue::Number(0.0);

    fn rank(&self) -> u8 {
        match self {
            AttributeValue::Number(_) => 0,
            AttributeValue::Text(_) => 1,
            AttributeValue::Flag(_) => 2,
        }
    }

    /// Total order used by merge reconciliation.
    ///
    /// Same-kind values compare naturally; across kinds `Number < Text < Flag`.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (AttributeValue::Number(a), AttributeValue::Number(b)) => a.total_cmp(b),
            (AttributeValue::Text(a), AttributeValue::Text(b)) => a.cmp(b),
            (AttributeValue::Flag(a), AttributeValue::Flag(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Where an open-ended `(key, value)` pair ends up on an item.
enum Field {
    Name(String),
    Price(f64),
    Quantity(i64),
    Extra(String, AttributeValue),
    Ignored,
}

impl Field {
    /// `name`, `price` and `quantity` are typed fields, never attributes.
    /// A reserved key carrying a value of the wrong kind is dropped.
    fn route(key: String, value: AttributeValue) -> Self {
        let field = match (key.as_str(), value) {
            ("name", AttributeValue::Text(name)) => Field::Name(name),
            ("price", AttributeValue::Number(price)) => Field::Price(price),
            ("quantity", AttributeValue::Number(n)) if n.is_finite() && n.fract() == 0.0 => {
                Field::Quantity(n as i64)
            }
            ("name" | "price" | "quantity", _) => Field::Ignored,
            (_, value) => Field::Extra(key.clone(), value),
        };
        if matches!(field, Field::Ignored) {
            debug!(key = %key, "dropping reserved field with mismatched value");
        }
        field
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Flag(value)
    }
}

/// An inventory record. Stored under its `name` inside a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub price: f64,
    /// Units on hand. Not clamped: a negative value is the caller's problem.
    pub quantity: i64,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl Item {
    pub fn new(name: impl Into<String>, price: f64, quantity: i64) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
            attributes: BTreeMap::new(),
        }
    }

    /// Set an open-ended field; `name`, `price` and `quantity` go to the typed fields.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        match Field::route(key.into(), value.into()) {
            Field::Name(name) => self.name = name,
            Field::Price(price) => self.price = price,
            Field::Quantity(quantity) => self.quantity = quantity,
            Field::Extra(key, value) => {
                self.attributes.insert(key, value);
            }
            Field::Ignored => {}
        }
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

/// Partial item record: every field that is `Some` (or present in
/// `attributes`) overwrites, everything else is left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl ItemUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Set an open-ended field; `name`, `price` and `quantity` go to the typed fields.
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.assign(key.into(), value.into());
        self
    }

    fn assign(&mut self, key: String, value: AttributeValue) {
        match Field::route(key, value) {
            Field::Name(name) => self.name = Some(name),
            Field::Price(price) => self.price = Some(price),
            Field::Quantity(quantity) => self.quantity = Some(quantity),
            Field::Extra(key, value) => {
                self.attributes.insert(key, value);
            }
            Field::Ignored => {}
        }
    }

    /// Move reserved keys that were pushed straight into `attributes` onto the typed fields.
    fn normalized(&self) -> ItemUpdate {
        let mut update = ItemUpdate {
            attributes: BTreeMap::new(),
            ..self.clone()
        };
        for (key, value) in &self.attributes {
            update.assign(key.clone(), value.clone());
        }
        update
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.quantity.is_none() && self.attributes.is_empty()
    }

    /// Overwrite the fields carried by this update.
    ///
    /// `name` is never applied: an item's name is its key in the category, and
    /// renaming in place would break that.
    pub fn apply_to(&self, item: &mut Item) {
        let update = self.normalized();
        if let Some(price) = update.price {
            item.price = price;
        }
        if let Some(quantity) = update.quantity {
            item.quantity = quantity;
        }
        item.attributes.extend(update.attributes);
    }

    /// Build a fresh item stored under `key`; missing price/quantity default to zero.
    pub fn into_item(self, key: &str) -> Item {
        let update = self.normalized();
        Item {
            name: key.to_string(),
            price: update.price.unwrap_or(0.0),
            quantity: update.quantity.unwrap_or(0),
            attributes: update.attributes,
        }
    }
}
