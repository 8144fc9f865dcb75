use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::*;

/// A discrete, payment-gated phase of project execution.
///
/// Milestones are mutated only through the state machine; `Completed` and
/// `Cancelled` have no outgoing transitions, which is what freezes finished
/// milestones apart from their audit fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub details: String,
    pub progress_status: ProgressStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_photo: Option<String>,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub revision: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Milestone {
    pub fn new(
        id: DbId,
        project_id: DbId,
        title: impl Into<String>,
        details: impl Into<String>,
        start_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id,
            project_id,
            title: title.into(),
            details: details.into(),
            progress_status: ProgressStatus::Pending,
            completion_photo: None,
            start_date,
            due_date,
            revision: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies an already-validated status change and bumps the revision.
    pub fn record_status(&mut self, status: ProgressStatus) {
        self.progress_status = status;
        self.revision += 1;
        self.updated_at = chrono::Utc::now();
    }

    pub fn attach_completion_photo(&mut self, artifact: impl Into<String>) {
        self.completion_photo = Some(artifact.into());
    }
}

impl Identifiable for Milestone {
    fn id(&self) -> DbId {
        self.id
    }
}

impl NamedEntity for Milestone {
    fn name(&self) -> &str {
        &self.title
    }
}

impl Versioned for Milestone {
    fn revision(&self) -> u64 {
        self.revision
    }
}

impl Displayable for Milestone {
    fn display_label(&self) -> String {
        format!("{} [{}]", self.title, self.progress_status)
    }
}

/// Lifecycle states of a milestone.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ProgressStatus {
    Pending,
    PaymentConfirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl ProgressStatus {
    /// Returns the set of states reachable from `self`.
    ///
    /// Terminal states return an empty slice because no further transitions
    /// are allowed.
    pub fn valid_transitions(self) -> &'static [ProgressStatus] {
        use ProgressStatus::*;
        match self {
            Pending => &[PaymentConfirmed, Cancelled],
            PaymentConfirmed => &[InProgress, Cancelled],
            InProgress => &[Completed, Cancelled],
            Completed | Cancelled => &[],
        }
    }

    /// Check whether a transition from `self` to `to` is structurally valid.
    pub fn can_transition(self, to: ProgressStatus) -> bool {
        self.valid_transitions().contains(&to)
    }

    pub fn is_terminal(self) -> bool {
        self.valid_transitions().is_empty()
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProgressStatus::Pending => "Pending",
            ProgressStatus::PaymentConfirmed => "Payment Confirmed",
            ProgressStatus::InProgress => "In Progress",
            ProgressStatus::Completed => "Completed",
            ProgressStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

/// Emitted by every successful milestone transition; consumed by the payment
/// schedule and any downstream read models.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusChangeEvent {
    pub milestone_id: DbId,
    pub from: ProgressStatus,
    pub to: ProgressStatus,
    pub occurred_at: Timestamp,
}

impl StatusChangeEvent {
    pub fn new(milestone_id: DbId, from: ProgressStatus, to: ProgressStatus) -> Self {
        Self {
            milestone_id,
            from,
            to,
            occurred_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ProgressStatus::*;

    #[test]
    fn pending_reaches_payment_confirmed_and_cancelled_only() {
        assert!(Pending.can_transition(PaymentConfirmed));
        assert!(Pending.can_transition(Cancelled));
        assert!(!Pending.can_transition(InProgress));
        assert!(!Pending.can_transition(Completed));
    }

    #[test]
    fn payment_confirmed_reaches_in_progress() {
        assert!(PaymentConfirmed.can_transition(InProgress));
        assert!(!PaymentConfirmed.can_transition(Completed));
    }

    #[test]
    fn in_progress_reaches_completed() {
        assert!(InProgress.can_transition(Completed));
        assert!(!InProgress.can_transition(PaymentConfirmed));
    }

    #[test]
    fn cancel_allowed_from_every_non_terminal_state() {
        assert!(Pending.can_transition(Cancelled));
        assert!(PaymentConfirmed.can_transition(Cancelled));
        assert!(InProgress.can_transition(Cancelled));
    }

    #[test]
    fn terminal_states_have_no_exits() {
        assert!(Completed.valid_transitions().is_empty());
        assert!(Cancelled.valid_transitions().is_empty());
        assert!(Completed.is_terminal());
        assert!(Cancelled.is_terminal());
    }

    #[test]
    fn no_state_reenters_itself() {
        for state in [Pending, PaymentConfirmed, InProgress, Completed, Cancelled] {
            assert!(!state.can_transition(state));
        }
    }
}
