//! Stateless services over [`crate::ledger::ProjectBook`] snapshots.
//!
//! Mutating operations take `&mut ProjectBook` and re-check their state
//! preconditions inside that exclusive access: a caller acting on a stale
//! snapshot fails with `InvalidTransition` and must re-fetch. Reads take
//! `&ProjectBook` and tolerate running against a pre-edit snapshot.

pub mod budget_service;
pub mod expense_service;
pub mod milestone_service;
pub mod payment_service;
pub mod project_service;

pub use budget_service::{BoqComparison, BudgetDistribution, BudgetService, CategoryTotal};
pub use expense_service::{ExpenseService, LaborExpenseInput, SupplyExpenseInput};
pub use milestone_service::MilestoneService;
pub use payment_service::PaymentService;
pub use project_service::{ProjectInput, ProjectService};

#[cfg(test)]
mod tests;
