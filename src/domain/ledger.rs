use serde::{Deserialize, Serialize};

use super::{Field, ItemId, LineItem, Quantity, coerce, round_amount, seed_items};

/// Amount for one row from its raw kgs and rate text: round(kgs * rs).
/// Malformed text counts as zero, so this never fails.
pub fn compute_amount(kgs: &str, rs: &str) -> Quantity {
    round_amount(coerce(kgs).saturating_mul(coerce(rs)))
}

/// Column totals shown in the footer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub bags: Quantity,
    pub kgs: Quantity,
    pub amount: Quantity,
}

/// Compute footer totals from a list of rows.
/// Totals = column sums of the coerced bags and kgs, plus the sum of row amounts
pub fn compute_totals(rows: &[LineItem]) -> Totals {
    rows.iter().fold(Totals::default(), |acc, row| Totals {
        bags: acc.bags.saturating_add(coerce(&row.bags)),
        kgs: acc.kgs.saturating_add(coerce(&row.kgs)),
        amount: acc.amount.saturating_add(row.amount()),
    })
}

/// A change to the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    SetField {
        id: ItemId,
        field: Field,
        value: String,
    },
    AddRow,
    RemoveRow(ItemId),
    Reset,
}

/// An ordered, immutable snapshot of the sheet's rows.
///
/// Every operation returns a new `Ledger` and leaves `self` as it was, so a
/// reader holding a snapshot never sees a half-applied edit. Row order is
/// insertion order, which is also display and print order.
///
/// Serialized as a plain list of rows. Deserializing goes through
/// [`Ledger::from_items`], so duplicate ids never get in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Ledger {
    items: Vec<LineItem>,
}

impl From<Vec<LineItem>> for Ledger {
    fn from(items: Vec<LineItem>) -> Self {
        Self::from_items(items)
    }
}

impl From<Ledger> for Vec<LineItem> {
    fn from(ledger: Ledger) -> Self {
        ledger.items
    }
}

impl Ledger {
    /// An empty sheet.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The default sheet loaded at startup.
    pub fn seeded() -> Self {
        Self {
            items: seed_items(),
        }
    }

    /// Build a ledger from existing rows, keeping their order.
    /// Later rows whose id is already taken are dropped.
    pub fn from_items(items: Vec<LineItem>) -> Self {
        let mut unique: Vec<LineItem> = Vec::with_capacity(items.len());
        for item in items {
            if !unique.iter().any(|existing| existing.id == item.id) {
                unique.push(item);
            }
        }
        Self { items: unique }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ItemId) -> Option<&LineItem> {
        self.items.iter().find(|row| row.id == id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    /// Id the next added row will get: one past the largest id, or 1 when empty.
    /// `None` once the largest id is `ItemId::MAX`.
    pub fn next_id(&self) -> Option<ItemId> {
        match self.items.iter().map(|row| row.id).max() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        }
    }

    /// Freshly computed footer totals. Nothing is cached.
    pub fn totals(&self) -> Totals {
        compute_totals(&self.items)
    }

    /// Apply a mutation and return the resulting ledger.
    #[must_use]
    pub fn apply(&self, mutation: Mutation) -> Self {
        match mutation {
            Mutation::SetField { id, field, value } => self.set_field(id, field, value),
            Mutation::AddRow => self.add_row(),
            Mutation::RemoveRow(id) => self.remove_row(id),
            Mutation::Reset => self.reset(),
        }
    }

    /// Replace one field of the row with `id`. Unknown ids change nothing.
    /// Numeric text is not checked here; it is coerced when read.
    #[must_use]
    pub fn set_field(&self, id: ItemId, field: Field, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            items: self
                .items
                .iter()
                .map(|row| {
                    if row.id == id {
                        row.with_field(field, value.clone())
                    } else {
                        row.clone()
                    }
                })
                .collect(),
        }
    }

    /// Append an empty row with an id greater than every existing id.
    /// When no such id is left the ledger comes back unchanged.
    #[must_use]
    pub fn add_row(&self) -> Self {
        let Some(id) = self.next_id() else {
            tracing::warn!("no row id left above {}, row not added", ItemId::MAX);
            return self.clone();
        };
        let mut items = self.items.clone();
        items.push(LineItem::blank(id));
        Self { items }
    }

    /// Drop the row with `id`. Unknown ids change nothing.
    #[must_use]
    pub fn remove_row(&self, id: ItemId) -> Self {
        Self {
            items: self
                .items
                .iter()
                .filter(|row| row.id != id)
                .cloned()
                .collect(),
        }
    }

    /// Discard everything and start over from the seed rows.
    #[must_use]
    pub fn reset(&self) -> Self {
        Self::seeded()
    }
}
