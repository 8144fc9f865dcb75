use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::*;

/// An ad-hoc field expense requested against a milestone, outside the
/// formally estimated BOQ.
///
/// Expenses are never deleted; approval actions only move the status, which
/// keeps the full audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: DbId,
    pub milestone_id: DbId,
    pub title: String,
    pub detail: ExpenseDetail,
    pub amount: f64,
    pub status: ExpenseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_note: Option<String>,
    #[serde(default)]
    pub revision: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Expense {
    pub fn new(
        id: DbId,
        milestone_id: DbId,
        title: impl Into<String>,
        detail: ExpenseDetail,
        amount: f64,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id,
            milestone_id,
            title: title.into(),
            detail,
            amount,
            status: ExpenseStatus::Requested,
            review_note: None,
            revision: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn expense_type(&self) -> ExpenseType {
        match self.detail {
            ExpenseDetail::Supply { .. } => ExpenseType::Supply,
            ExpenseDetail::Labor { .. } => ExpenseType::Labor,
        }
    }

    /// Applies an already-validated status change and bumps the revision.
    pub fn record_status(&mut self, status: ExpenseStatus) {
        self.status = status;
        self.revision += 1;
        self.updated_at = chrono::Utc::now();
    }

    pub fn record_rejection(&mut self, note: impl Into<String>) {
        self.review_note = Some(note.into());
        self.record_status(ExpenseStatus::Rejected);
    }
}

impl Identifiable for Expense {
    fn id(&self) -> DbId {
        self.id
    }
}

impl Versioned for Expense {
    fn revision(&self) -> u64 {
        self.revision
    }
}

impl Displayable for Expense {
    fn display_label(&self) -> String {
        format!("{} [{}]", self.title, self.status)
    }
}

/// Type-specific expense fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ExpenseDetail {
    Supply {
        date: NaiveDate,
        quantity: f64,
        unit: String,
        price_per_qty: f64,
    },
    Labor {
        date_from: NaiveDate,
        date_to: NaiveDate,
    },
}

/// The two expense categories field staff can request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExpenseType {
    Supply,
    Labor,
}

/// Dual-stage approval states. `FinanceApproved` is the terminal payable
/// state; `Rejected` is terminal as well.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExpenseStatus {
    Requested,
    EngineerApproved,
    FinanceApproved,
    Rejected,
}

impl ExpenseStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ExpenseStatus::FinanceApproved | ExpenseStatus::Rejected
        )
    }
}

impl fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExpenseStatus::Requested => "Requested",
            ExpenseStatus::EngineerApproved => "Approved by Engineer",
            ExpenseStatus::FinanceApproved => "Approved by Finance",
            ExpenseStatus::Rejected => "Rejected",
        };
        f.write_str(label)
    }
}
