use serde::{Deserialize, Serialize};

use super::{Quantity, compute_amount};

/// Row identifier. Assigned once when the row is created and never reused
/// while the row exists; it is independent of the row's position.
pub type ItemId = u64;

/// The editable columns of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    /// Free-text label
    Item,
    /// Number of bags
    Bags,
    /// Weight in kilograms
    Kgs,
    /// Rate per kilogram
    Rs,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Item, Field::Bags, Field::Kgs, Field::Rs];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Item => "item",
            Field::Bags => "bags",
            Field::Kgs => "kgs",
            Field::Rs => "rs",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "item" => Some(Field::Item),
            "bags" => Some(Field::Bags),
            "kgs" => Some(Field::Kgs),
            "rs" => Some(Field::Rs),
            _ => None,
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the sheet. Numeric columns are stored as the text the user
/// typed, so partial input like "12." survives until it is finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ItemId,
    pub item: String,
    pub bags: String,
    pub kgs: String,
    pub rs: String,
}

impl LineItem {
    pub fn new(
        id: ItemId,
        item: impl Into<String>,
        bags: impl Into<String>,
        kgs: impl Into<String>,
        rs: impl Into<String>,
    ) -> Self {
        Self {
            id,
            item: item.into(),
            bags: bags.into(),
            kgs: kgs.into(),
            rs: rs.into(),
        }
    }

    /// A row with every text field empty.
    pub fn blank(id: ItemId) -> Self {
        Self::new(id, "", "", "", "")
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Item => &self.item,
            Field::Bags => &self.bags,
            Field::Kgs => &self.kgs,
            Field::Rs => &self.rs,
        }
    }

    /// Return a copy with `field` replaced by `value`, stored verbatim.
    pub fn with_field(&self, field: Field, value: impl Into<String>) -> Self {
        let mut row = self.clone();
        let value = value.into();
        match field {
            Field::Item => row.item = value,
            Field::Bags => row.bags = value,
            Field::Kgs => row.kgs = value,
            Field::Rs => row.rs = value,
        }
        row
    }

    /// Derived amount for this row: round(kgs * rs).
    pub fn amount(&self) -> Quantity {
        compute_amount(&self.kgs, &self.rs)
    }
}
