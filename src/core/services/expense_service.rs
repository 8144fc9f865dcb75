//! Intake and dual-stage approval of ad-hoc expenses against a milestone.
//!
//! Expenses live outside the formally estimated BOQ: field staff request
//! them, the engineer screens them, finance releases them. Totals are
//! computed on read and never stored.

use chrono::NaiveDate;

use crate::domain::common::valid_money;
use crate::domain::{DbId, Expense, ExpenseDetail, ExpenseStatus, ExpenseType};
use crate::errors::{CoreError, Result};
use crate::ledger::ProjectBook;

/// Intake payload for a supply expense.
///
/// When `amount` is supplied it always wins; the computed
/// `quantity * price_per_qty` value is advisory only.
#[derive(Debug, Clone)]
pub struct SupplyExpenseInput {
    pub title: String,
    pub date: NaiveDate,
    pub quantity: f64,
    pub unit: String,
    pub price_per_qty: f64,
    pub amount: Option<f64>,
}

/// Intake payload for a labor expense; the amount is entered directly.
#[derive(Debug, Clone)]
pub struct LaborExpenseInput {
    pub title: String,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub amount: f64,
}

/// Expense intake and approval workflow over [`ProjectBook`] snapshots.
pub struct ExpenseService;

impl ExpenseService {
    /// Records a supply expense request and returns its id.
    pub fn submit_supply(
        book: &mut ProjectBook,
        milestone_id: DbId,
        input: SupplyExpenseInput,
    ) -> Result<DbId> {
        Self::ensure_milestone_exists(book, milestone_id)?;
        if input.title.trim().is_empty() {
            return Err(CoreError::Validation("expense title is required".into()));
        }
        if !valid_money(input.quantity) {
            return Err(CoreError::Validation("quantity must be positive".into()));
        }
        if !valid_money(input.price_per_qty) {
            return Err(CoreError::Validation(
                "price per quantity must be positive".into(),
            ));
        }
        let amount = match input.amount {
            Some(explicit) => {
                if !valid_money(explicit) {
                    return Err(CoreError::Validation(
                        "explicit amount must be positive".into(),
                    ));
                }
                explicit
            }
            None => input.quantity * input.price_per_qty,
        };
        let detail = ExpenseDetail::Supply {
            date: input.date,
            quantity: input.quantity,
            unit: input.unit,
            price_per_qty: input.price_per_qty,
        };
        let id = book.allocate_id();
        book.add_expense(Expense::new(id, milestone_id, input.title, detail, amount));
        tracing::info!(expense_id = id, milestone_id, amount, "supply expense requested");
        Ok(id)
    }

    /// Records a labor expense request and returns its id.
    pub fn submit_labor(
        book: &mut ProjectBook,
        milestone_id: DbId,
        input: LaborExpenseInput,
    ) -> Result<DbId> {
        Self::ensure_milestone_exists(book, milestone_id)?;
        if input.title.trim().is_empty() {
            return Err(CoreError::Validation("expense title is required".into()));
        }
        if input.date_to < input.date_from {
            return Err(CoreError::Validation(
                "labor period end precedes its start".into(),
            ));
        }
        if !valid_money(input.amount) {
            return Err(CoreError::Validation("amount must be positive".into()));
        }
        let detail = ExpenseDetail::Labor {
            date_from: input.date_from,
            date_to: input.date_to,
        };
        let id = book.allocate_id();
        book.add_expense(Expense::new(
            id,
            milestone_id,
            input.title,
            detail,
            input.amount,
        ));
        tracing::info!(expense_id = id, milestone_id, "labor expense requested");
        Ok(id)
    }

    /// First approval stage: `Requested -> EngineerApproved`.
    pub fn approve_by_engineer(book: &mut ProjectBook, expense_id: DbId) -> Result<()> {
        Self::transition(
            book,
            expense_id,
            ExpenseStatus::Requested,
            ExpenseStatus::EngineerApproved,
        )
    }

    /// Second approval stage: `EngineerApproved -> FinanceApproved`, the
    /// terminal payable state.
    pub fn approve_by_finance(book: &mut ProjectBook, expense_id: DbId) -> Result<()> {
        Self::transition(
            book,
            expense_id,
            ExpenseStatus::EngineerApproved,
            ExpenseStatus::FinanceApproved,
        )
    }

    /// Rejects a pending request. Valid from `Requested` or
    /// `EngineerApproved` only, and the note is mandatory.
    pub fn reject(book: &mut ProjectBook, expense_id: DbId, note: &str) -> Result<()> {
        if note.trim().is_empty() {
            return Err(CoreError::Validation("rejection note is required".into()));
        }
        let expense = Self::expense_mut(book, expense_id)?;
        if expense.status.is_terminal() {
            return Err(CoreError::InvalidTransition {
                entity: "expense",
                id: expense_id,
                from: expense.status.to_string(),
                to: ExpenseStatus::Rejected.to_string(),
            });
        }
        expense.record_rejection(note.trim());
        book.touch();
        tracing::info!(expense_id, "expense rejected");
        Ok(())
    }

    /// Lists the expenses of a milestone, optionally narrowed to one type.
    /// Pure read.
    pub fn list(
        book: &ProjectBook,
        milestone_id: DbId,
        expense_type: Option<ExpenseType>,
    ) -> Result<Vec<&Expense>> {
        Self::ensure_milestone_exists(book, milestone_id)?;
        Ok(book
            .expenses_for(milestone_id)
            .filter(|expense| expense_type.map_or(true, |ty| expense.expense_type() == ty))
            .collect())
    }

    /// Sums the amounts of the visible rows. Computed on read, never stored.
    pub fn total_amount(expenses: &[&Expense]) -> f64 {
        expenses.iter().map(|expense| expense.amount).sum()
    }

    fn transition(
        book: &mut ProjectBook,
        expense_id: DbId,
        expected_from: ExpenseStatus,
        to: ExpenseStatus,
    ) -> Result<()> {
        let expense = Self::expense_mut(book, expense_id)?;
        if expense.status != expected_from {
            return Err(CoreError::InvalidTransition {
                entity: "expense",
                id: expense_id,
                from: expense.status.to_string(),
                to: to.to_string(),
            });
        }
        expense.record_status(to);
        book.touch();
        tracing::info!(expense_id, status = %to, "expense status advanced");
        Ok(())
    }

    fn expense_mut(book: &mut ProjectBook, expense_id: DbId) -> Result<&mut Expense> {
        book.expense_mut(expense_id).ok_or(CoreError::NotFound {
            entity: "expense",
            id: expense_id,
        })
    }

    fn ensure_milestone_exists(book: &ProjectBook, milestone_id: DbId) -> Result<()> {
        if book.milestone(milestone_id).is_none() {
            return Err(CoreError::NotFound {
                entity: "milestone",
                id: milestone_id,
            });
        }
        Ok(())
    }
}
