//! The milestone lifecycle state machine.
//!
//! `Pending -> PaymentConfirmed -> InProgress -> Completed`, with
//! `Cancelled` reachable from every non-terminal state. Each transition
//! re-checks its precondition against current book state, emits a
//! [`StatusChangeEvent`] on success, and hands the event to the payment
//! schedule synchronously.

use chrono::NaiveDate;

use crate::core::services::PaymentService;
use crate::domain::{DbId, Milestone, ProgressStatus, StatusChangeEvent};
use crate::errors::{CoreError, Result};
use crate::ledger::ProjectBook;

/// Lifecycle operations for [`Milestone`] entities.
pub struct MilestoneService;

impl MilestoneService {
    /// Creates a milestone under an existing, non-archived project.
    pub fn create(
        book: &mut ProjectBook,
        project_id: DbId,
        title: &str,
        details: &str,
        start_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Result<DbId> {
        let project = book.project(project_id).ok_or(CoreError::NotFound {
            entity: "project",
            id: project_id,
        })?;
        if project.archived {
            return Err(CoreError::Validation(format!(
                "project {} is archived and no longer accepts milestones",
                project_id
            )));
        }
        if title.trim().is_empty() {
            return Err(CoreError::Validation("milestone title is required".into()));
        }
        if due_date < start_date {
            return Err(CoreError::Validation(
                "milestone due date precedes start date".into(),
            ));
        }
        let id = book.allocate_id();
        book.add_milestone(Milestone::new(
            id, project_id, title, details, start_date, due_date,
        ));
        tracing::info!(milestone_id = id, project_id, "milestone created");
        Ok(id)
    }

    /// Drives a milestone to `target`, enforcing the transition table and
    /// the per-edge preconditions.
    ///
    /// * `Pending -> PaymentConfirmed` requires the initiating schedule
    ///   entry to be settled.
    /// * `In Progress -> Completed` requires a completion-photo reference in
    ///   `evidence`.
    /// * Any non-terminal state may be cancelled; terminal states reject
    ///   every request.
    ///
    /// On success the status-change event is appended to the book's log and
    /// applied to the payment schedule before it is returned.
    pub fn transition(
        book: &mut ProjectBook,
        milestone_id: DbId,
        target: ProgressStatus,
        evidence: Option<&str>,
    ) -> Result<StatusChangeEvent> {
        let current = book
            .milestone(milestone_id)
            .ok_or(CoreError::NotFound {
                entity: "milestone",
                id: milestone_id,
            })?
            .progress_status;

        if !current.can_transition(target) {
            return Err(CoreError::InvalidTransition {
                entity: "milestone",
                id: milestone_id,
                from: current.to_string(),
                to: target.to_string(),
            });
        }

        match target {
            ProgressStatus::PaymentConfirmed => Self::ensure_initiating_payment(book, milestone_id)?,
            ProgressStatus::Completed => {
                let photo = evidence.map(str::trim).filter(|value| !value.is_empty());
                let photo = photo.ok_or(CoreError::MissingEvidence {
                    entity: "milestone",
                    id: milestone_id,
                    what: "completion photo",
                })?;
                if let Some(milestone) = book.milestone_mut(milestone_id) {
                    milestone.attach_completion_photo(photo);
                }
            }
            _ => {}
        }

        let event = StatusChangeEvent::new(milestone_id, current, target);
        if let Some(milestone) = book.milestone_mut(milestone_id) {
            milestone.record_status(target);
        }
        book.record_event(event.clone());
        PaymentService::apply_status_change(book, &event);
        tracing::info!(milestone_id, from = %event.from, to = %event.to, "milestone transitioned");
        Ok(event)
    }

    /// Returns a snapshot of the milestones of a project. Pure read.
    pub fn list(book: &ProjectBook, project_id: DbId) -> Result<Vec<&Milestone>> {
        if book.project(project_id).is_none() {
            return Err(CoreError::NotFound {
                entity: "project",
                id: project_id,
            });
        }
        Ok(book
            .milestones
            .iter()
            .filter(|milestone| milestone.project_id == project_id)
            .collect())
    }

    /// The payment gate: the milestone's initiating schedule entry (earliest
    /// due date, lowest id) must have a settled payment on record.
    fn ensure_initiating_payment(book: &ProjectBook, milestone_id: DbId) -> Result<()> {
        let settled = book
            .initiating_entry(milestone_id)
            .map(|entry| entry.is_settled())
            .unwrap_or(false);
        if !settled {
            return Err(CoreError::InvalidTransition {
                entity: "milestone",
                id: milestone_id,
                from: ProgressStatus::Pending.to_string(),
                to: ProgressStatus::PaymentConfirmed.to_string(),
            });
        }
        Ok(())
    }
}
