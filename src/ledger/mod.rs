//! The `ProjectBook` aggregate: the single owner of all tracked entities.
//!
//! Every mutating service operation takes `&mut ProjectBook`, so the
//! exclusive borrow enforces the single-writer discipline; reads work on
//! `&ProjectBook` snapshots and may run ahead of or behind concurrent edits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    BoqItem, DbId, Expense, Milestone, Payment, PaymentScheduleEntry, Project, StatusChangeEvent,
};

const CURRENT_SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectBook {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub boq_items: Vec<BoqItem>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub schedule_entries: Vec<PaymentScheduleEntry>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub status_events: Vec<StatusChangeEvent>,
    #[serde(default = "ProjectBook::first_id")]
    next_id: DbId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "ProjectBook::schema_version_default")]
    pub schema_version: u8,
}

impl ProjectBook {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            projects: Vec::new(),
            milestones: Vec::new(),
            boq_items: Vec::new(),
            expenses: Vec::new(),
            schedule_entries: Vec::new(),
            payments: Vec::new(),
            status_events: Vec::new(),
            next_id: Self::first_id(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    /// Hands out the next monotonically increasing entity id.
    pub fn allocate_id(&mut self) -> DbId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_project(&mut self, project: Project) -> DbId {
        let id = project.id;
        self.projects.push(project);
        self.touch();
        id
    }

    pub fn add_milestone(&mut self, milestone: Milestone) -> DbId {
        let id = milestone.id;
        self.milestones.push(milestone);
        self.touch();
        id
    }

    pub fn add_boq_item(&mut self, item: BoqItem) -> DbId {
        let id = item.id;
        self.boq_items.push(item);
        self.touch();
        id
    }

    pub fn add_expense(&mut self, expense: Expense) -> DbId {
        let id = expense.id;
        self.expenses.push(expense);
        self.touch();
        id
    }

    pub fn add_schedule_entry(&mut self, entry: PaymentScheduleEntry) -> DbId {
        let id = entry.id;
        self.schedule_entries.push(entry);
        self.touch();
        id
    }

    pub fn add_payment(&mut self, payment: Payment) -> DbId {
        let id = payment.id;
        self.payments.push(payment);
        self.touch();
        id
    }

    pub fn record_event(&mut self, event: StatusChangeEvent) {
        self.status_events.push(event);
        self.touch();
    }

    pub fn project(&self, id: DbId) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    pub fn project_mut(&mut self, id: DbId) -> Option<&mut Project> {
        self.projects.iter_mut().find(|project| project.id == id)
    }

    pub fn milestone(&self, id: DbId) -> Option<&Milestone> {
        self.milestones.iter().find(|milestone| milestone.id == id)
    }

    pub fn milestone_mut(&mut self, id: DbId) -> Option<&mut Milestone> {
        self.milestones
            .iter_mut()
            .find(|milestone| milestone.id == id)
    }

    pub fn boq_item(&self, id: DbId) -> Option<&BoqItem> {
        self.boq_items.iter().find(|item| item.id == id)
    }

    pub fn boq_item_mut(&mut self, id: DbId) -> Option<&mut BoqItem> {
        self.boq_items.iter_mut().find(|item| item.id == id)
    }

    pub fn expense(&self, id: DbId) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id == id)
    }

    pub fn expense_mut(&mut self, id: DbId) -> Option<&mut Expense> {
        self.expenses.iter_mut().find(|expense| expense.id == id)
    }

    pub fn schedule_entry(&self, id: DbId) -> Option<&PaymentScheduleEntry> {
        self.schedule_entries.iter().find(|entry| entry.id == id)
    }

    pub fn schedule_entry_mut(&mut self, id: DbId) -> Option<&mut PaymentScheduleEntry> {
        self.schedule_entries.iter_mut().find(|entry| entry.id == id)
    }

    pub fn boq_items_for(&self, milestone_id: DbId) -> impl Iterator<Item = &BoqItem> {
        self.boq_items
            .iter()
            .filter(move |item| item.milestone_id == milestone_id)
    }

    pub fn expenses_for(&self, milestone_id: DbId) -> impl Iterator<Item = &Expense> {
        self.expenses
            .iter()
            .filter(move |expense| expense.milestone_id == milestone_id)
    }

    pub fn schedule_entries_for(
        &self,
        milestone_id: DbId,
    ) -> impl Iterator<Item = &PaymentScheduleEntry> {
        self.schedule_entries
            .iter()
            .filter(move |entry| entry.milestone_id == milestone_id)
    }

    pub fn payments_for(&self, schedule_entry_id: DbId) -> impl Iterator<Item = &Payment> {
        self.payments
            .iter()
            .filter(move |payment| payment.schedule_entry_id == schedule_entry_id)
    }

    /// The milestone's initiating schedule entry: earliest due date, ties
    /// broken by lowest id.
    pub fn initiating_entry(&self, milestone_id: DbId) -> Option<&PaymentScheduleEntry> {
        self.schedule_entries_for(milestone_id)
            .min_by_key(|entry| (entry.due_date, entry.id))
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    fn first_id() -> DbId {
        1
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::Project;

    fn sample_date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn ids_are_monotonically_increasing() {
        let mut book = ProjectBook::new("Riverside Duplex");
        let first = book.allocate_id();
        let second = book.allocate_id();
        let third = book.allocate_id();
        assert!(first < second && second < third);
    }

    #[test]
    fn add_and_lookup_project() {
        let mut book = ProjectBook::new("Riverside Duplex");
        let id = book.allocate_id();
        book.add_project(Project::new(
            id,
            "Duplex A",
            "R. Santos",
            "Engr. Cruz",
            "F. Dizon",
            sample_date(2024, 1, 8),
        ));
        assert_eq!(book.project(id).map(|p| p.name.as_str()), Some("Duplex A"));
        assert!(book.project(id + 99).is_none());
    }

    #[test]
    fn initiating_entry_prefers_earliest_due_date_then_lowest_id() {
        use crate::domain::PaymentScheduleEntry;

        let mut book = ProjectBook::new("Riverside Duplex");
        let milestone_id = 1;
        let later = book.allocate_id();
        book.add_schedule_entry(PaymentScheduleEntry::new(
            later,
            milestone_id,
            "Progress billing",
            40_000.0,
            sample_date(2024, 3, 1),
        ));
        let earlier = book.allocate_id();
        book.add_schedule_entry(PaymentScheduleEntry::new(
            earlier,
            milestone_id,
            "Down payment",
            20_000.0,
            sample_date(2024, 1, 15),
        ));

        let initiating = book.initiating_entry(milestone_id).unwrap();
        assert_eq!(initiating.id, earlier);
    }
}
