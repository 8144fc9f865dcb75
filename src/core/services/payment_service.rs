//! Payment schedule and settlement: what the client owes per milestone and
//! how it is satisfied.
//!
//! A payment fully settles its schedule entry; partial balances are modeled
//! as separate entries. Payment records are immutable; corrections are new
//! compensating records.

use chrono::NaiveDate;

use crate::domain::common::valid_money;
use crate::domain::{
    DbId, Payment, PaymentMethod, PaymentScheduleEntry, ProgressStatus, ScheduleStatus,
    StatusChangeEvent,
};
use crate::errors::{CoreError, Result};
use crate::gateway::{CheckoutSession, PaymentGateway};
use crate::ledger::ProjectBook;

/// Schedule and settlement operations over [`ProjectBook`] snapshots.
pub struct PaymentService;

impl PaymentService {
    /// Defines an amount due for a milestone and returns the entry id.
    pub fn schedule(
        book: &mut ProjectBook,
        milestone_id: DbId,
        payment_name: &str,
        amount: f64,
        due_date: NaiveDate,
    ) -> Result<DbId> {
        if book.milestone(milestone_id).is_none() {
            return Err(CoreError::NotFound {
                entity: "milestone",
                id: milestone_id,
            });
        }
        if payment_name.trim().is_empty() {
            return Err(CoreError::Validation("payment name is required".into()));
        }
        if !valid_money(amount) {
            return Err(CoreError::Validation("amount must be positive".into()));
        }
        let id = book.allocate_id();
        book.add_schedule_entry(PaymentScheduleEntry::new(
            id,
            milestone_id,
            payment_name,
            amount,
            due_date,
        ));
        tracing::info!(entry_id = id, milestone_id, amount, "schedule entry created");
        Ok(id)
    }

    /// Records an over-the-counter settlement.
    ///
    /// Cash requires both a proof photo and a signature reference; a missing
    /// artifact fails with `MissingProof` and leaves the entry untouched.
    pub fn record_cash_payment(
        book: &mut ProjectBook,
        entry_id: DbId,
        amount_paid: f64,
        payment_date: NaiveDate,
        proof_photo: Option<&str>,
        signature: Option<&str>,
        processed_by: &str,
    ) -> Result<DbId> {
        Self::ensure_settleable(book, entry_id)?;
        if !valid_money(amount_paid) {
            return Err(CoreError::Validation("amount paid must be positive".into()));
        }
        let proof_photo = non_empty(proof_photo).ok_or(CoreError::MissingProof {
            entry_id,
            what: "proof photo",
        })?;
        let signature = non_empty(signature).ok_or(CoreError::MissingProof {
            entry_id,
            what: "signature",
        })?;
        if processed_by.trim().is_empty() {
            return Err(CoreError::Validation("processor is required".into()));
        }

        let payment_id = book.allocate_id();
        let payment = Payment::new(
            payment_id,
            entry_id,
            amount_paid,
            payment_date,
            PaymentMethod::Cash,
            processed_by,
        )
        .with_proof(proof_photo, signature);
        book.add_payment(payment);
        Self::mark_settled(book, entry_id);
        tracing::info!(entry_id, payment_id, amount_paid, "cash payment recorded");
        Ok(payment_id)
    }

    /// Opens a hosted-checkout session with the external gateway.
    ///
    /// The entry stays pending until the confirmation callback arrives, so
    /// an abandoned checkout needs no cleanup.
    pub fn begin_gateway_checkout(
        book: &ProjectBook,
        gateway: &dyn PaymentGateway,
        entry_id: DbId,
    ) -> Result<CheckoutSession> {
        let entry = Self::ensure_settleable(book, entry_id)?;
        let session = gateway.create_checkout(entry)?;
        tracing::info!(entry_id, session_id = %session.session_id, "gateway checkout opened");
        Ok(session)
    }

    /// Accepts the gateway's confirmation callback and settles the entry for
    /// its scheduled amount.
    pub fn confirm_gateway_payment(
        book: &mut ProjectBook,
        entry_id: DbId,
        reference_number: &str,
        payment_date: NaiveDate,
        processed_by: &str,
    ) -> Result<DbId> {
        let entry = Self::ensure_settleable(book, entry_id)?;
        let amount = entry.amount;
        if reference_number.trim().is_empty() {
            return Err(CoreError::Validation(
                "gateway reference number is required".into(),
            ));
        }
        if processed_by.trim().is_empty() {
            return Err(CoreError::Validation("processor is required".into()));
        }

        let payment_id = book.allocate_id();
        let payment = Payment::new(
            payment_id,
            entry_id,
            amount,
            payment_date,
            PaymentMethod::Gateway,
            processed_by,
        )
        .with_reference(reference_number.trim());
        book.add_payment(payment);
        Self::mark_settled(book, entry_id);
        tracing::info!(entry_id, payment_id, "gateway payment confirmed");
        Ok(payment_id)
    }

    /// Consumes milestone status-change events: completion unlocks the next
    /// still-pending entry of the milestone by surfacing it as due.
    pub fn apply_status_change(book: &mut ProjectBook, event: &StatusChangeEvent) {
        if event.to != ProgressStatus::Completed {
            return;
        }
        let next = book
            .schedule_entries_for(event.milestone_id)
            .filter(|entry| entry.status == ScheduleStatus::Pending)
            .min_by_key(|entry| (entry.due_date, entry.id))
            .map(|entry| entry.id);
        if let Some(entry_id) = next {
            if let Some(entry) = book.schedule_entry_mut(entry_id) {
                entry.record_status(ScheduleStatus::ForPayment);
            }
            book.touch();
            tracing::debug!(entry_id, milestone_id = event.milestone_id, "entry unlocked for payment");
        }
    }

    /// Lists the schedule entries of a milestone. Pure read.
    pub fn list(book: &ProjectBook, milestone_id: DbId) -> Result<Vec<&PaymentScheduleEntry>> {
        if book.milestone(milestone_id).is_none() {
            return Err(CoreError::NotFound {
                entity: "milestone",
                id: milestone_id,
            });
        }
        Ok(book.schedule_entries_for(milestone_id).collect())
    }

    /// Verifies the entry exists and was not already settled: a second
    /// settlement attempt fails instead of double-paying.
    fn ensure_settleable(book: &ProjectBook, entry_id: DbId) -> Result<&PaymentScheduleEntry> {
        let entry = book.schedule_entry(entry_id).ok_or(CoreError::NotFound {
            entity: "schedule entry",
            id: entry_id,
        })?;
        if entry.is_settled() {
            return Err(CoreError::InvalidTransition {
                entity: "schedule entry",
                id: entry_id,
                from: ScheduleStatus::Paid.to_string(),
                to: ScheduleStatus::Paid.to_string(),
            });
        }
        Ok(entry)
    }

    fn mark_settled(book: &mut ProjectBook, entry_id: DbId) {
        if let Some(entry) = book.schedule_entry_mut(entry_id) {
            entry.record_status(ScheduleStatus::Paid);
        }
        book.touch();
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
