use crate::domain::{Ledger, Mutation};

use super::TableSnapshot;

pub const DEFAULT_HEADING: &str = "Material Billing";

/// The prompt to show before `mutation` runs, if it is destructive.
pub fn confirmation_for(mutation: &Mutation) -> Option<Confirmation> {
    match mutation {
        Mutation::RemoveRow(_) => Some(Confirmation {
            title: "Delete Item",
            message: "Are you sure you want to remove this row?",
            confirm_label: "Delete",
        }),
        Mutation::Reset => Some(Confirmation {
            title: "Reset Table",
            message: "Reload default data?",
            confirm_label: "Reset",
        }),
        Mutation::SetField { .. } | Mutation::AddRow => None,
    }
}

/// A yes/no question put to the user before a destructive action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    pub title: &'static str,
    pub message: &'static str,
    pub confirm_label: &'static str,
}

/// Asks the user to confirm a destructive action.
pub trait ConfirmationGate {
    /// Returns true only on an affirmative answer.
    fn request_confirmation(&mut self, request: &Confirmation) -> bool;
}

/// Gate that accepts every request without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl ConfirmationGate for AssumeYes {
    fn request_confirmation(&mut self, _request: &Confirmation) -> bool {
        true
    }
}

/// What happened to a dispatched action.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The action ran; carries the complete new state.
    Applied(TableSnapshot),
    /// The user declined; the sheet is unchanged.
    Cancelled,
}

/// Owns the current sheet and the heading shown above it.
///
/// All changes go through [`LedgerSession::dispatch`], which swaps in a new
/// ledger snapshot as a whole.
#[derive(Debug, Clone)]
pub struct LedgerSession {
    ledger: Ledger,
    heading: String,
}

impl Default for LedgerSession {
    fn default() -> Self {
        Self::new(DEFAULT_HEADING)
    }
}

impl LedgerSession {
    /// Start a session on the default seed rows.
    pub fn new(heading: impl Into<String>) -> Self {
        Self::with_ledger(heading, Ledger::seeded())
    }

    pub fn with_ledger(heading: impl Into<String>, ledger: Ledger) -> Self {
        Self {
            ledger,
            heading: heading.into(),
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn heading(&self) -> &str {
        &self.heading
    }

    pub fn set_heading(&mut self, heading: impl Into<String>) {
        self.heading = heading.into();
    }

    /// Current state with freshly computed totals.
    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot::capture(&self.heading, &self.ledger)
    }

    /// Apply `mutation`, asking `gate` first when it is destructive.
    pub fn dispatch(&mut self, mutation: Mutation, gate: &mut dyn ConfirmationGate) -> Outcome {
        if let Some(request) = confirmation_for(&mutation) {
            if !gate.request_confirmation(&request) {
                tracing::debug!(?mutation, "mutation cancelled at confirmation");
                return Outcome::Cancelled;
            }
        }

        tracing::debug!(?mutation, "applying mutation");
        self.ledger = self.ledger.apply(mutation);
        Outcome::Applied(self.snapshot())
    }
}
