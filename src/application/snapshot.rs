use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ItemId, Ledger, Quantity, Totals};

/// Everything a renderer needs to draw the sheet at one point in time:
/// every row with its derived amount, plus the footer totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub heading: String,
    pub taken_at: DateTime<Utc>,
    pub rows: Vec<RowView>,
    pub totals: Totals,
}

/// A row as displayed: raw text plus the amount computed from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowView {
    /// 1-based display position
    pub position: usize,
    pub id: ItemId,
    pub item: String,
    pub bags: String,
    pub kgs: String,
    pub rs: String,
    pub amount: Quantity,
}

impl TableSnapshot {
    /// Capture the complete state of `ledger`, with totals computed fresh.
    pub fn capture(heading: &str, ledger: &Ledger) -> Self {
        let rows = ledger
            .items()
            .iter()
            .enumerate()
            .map(|(index, row)| RowView {
                position: index + 1,
                id: row.id,
                item: row.item.clone(),
                bags: row.bags.clone(),
                kgs: row.kgs.clone(),
                rs: row.rs.clone(),
                amount: row.amount(),
            })
            .collect();

        Self {
            heading: heading.to_string(),
            taken_at: Utc::now(),
            rows,
            totals: ledger.totals(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
