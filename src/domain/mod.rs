//! Pure domain models (Project, Milestone, BOQ items, Expenses, Payments).
//! No I/O, no transport, no storage. Only data types and core enums.

pub mod boq;
pub mod common;
pub mod expense;
pub mod milestone;
pub mod payment;
pub mod project;

pub use boq::{BoqItem, EtoEntry, LtoEntry, MtoEntry};
pub use common::{CostCategory, DbId, Displayable, Identifiable, NamedEntity, Timestamp, Versioned};
pub use expense::{Expense, ExpenseDetail, ExpenseStatus, ExpenseType};
pub use milestone::{Milestone, ProgressStatus, StatusChangeEvent};
pub use payment::{Payment, PaymentMethod, PaymentScheduleEntry, ScheduleStatus};
pub use project::{Project, ProjectStatus};
