use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::*;

/// An amount due from the client, tied to a milestone phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentScheduleEntry {
    pub id: DbId,
    pub milestone_id: DbId,
    pub payment_name: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub status: ScheduleStatus,
    #[serde(default)]
    pub revision: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PaymentScheduleEntry {
    pub fn new(
        id: DbId,
        milestone_id: DbId,
        payment_name: impl Into<String>,
        amount: f64,
        due_date: NaiveDate,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id,
            milestone_id,
            payment_name: payment_name.into(),
            amount,
            due_date,
            status: ScheduleStatus::Pending,
            revision: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies an already-validated status change and bumps the revision.
    pub fn record_status(&mut self, status: ScheduleStatus) {
        self.status = status;
        self.revision += 1;
        self.updated_at = chrono::Utc::now();
    }

    pub fn is_settled(&self) -> bool {
        self.status == ScheduleStatus::Paid
    }
}

impl Identifiable for PaymentScheduleEntry {
    fn id(&self) -> DbId {
        self.id
    }
}

impl NamedEntity for PaymentScheduleEntry {
    fn name(&self) -> &str {
        &self.payment_name
    }
}

impl Versioned for PaymentScheduleEntry {
    fn revision(&self) -> u64 {
        self.revision
    }
}

/// Settlement states of a schedule entry. `ForPayment` surfaces the entry as
/// due now; settlement accepts `Pending` entries as well.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ScheduleStatus {
    Pending,
    ForPayment,
    Paid,
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScheduleStatus::Pending => "Pending",
            ScheduleStatus::ForPayment => "For Payment",
            ScheduleStatus::Paid => "Paid",
        };
        f.write_str(label)
    }
}

/// A settlement event against a schedule entry.
///
/// Immutable after creation: corrections are new compensating records, never
/// edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: DbId,
    pub schedule_entry_id: DbId,
    pub amount_paid: f64,
    pub payment_date: NaiveDate,
    pub method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    pub processed_by: String,
    pub created_at: Timestamp,
}

impl Payment {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: DbId,
        schedule_entry_id: DbId,
        amount_paid: f64,
        payment_date: NaiveDate,
        method: PaymentMethod,
        processed_by: impl Into<String>,
    ) -> Self {
        Self {
            id,
            schedule_entry_id,
            amount_paid,
            payment_date,
            method,
            reference_number: None,
            proof_photo: None,
            signature: None,
            processed_by: processed_by.into(),
            created_at: chrono::Utc::now(),
        }
    }

    pub fn with_reference(mut self, reference_number: impl Into<String>) -> Self {
        self.reference_number = Some(reference_number.into());
        self
    }

    pub fn with_proof(
        mut self,
        proof_photo: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        self.proof_photo = Some(proof_photo.into());
        self.signature = Some(signature.into());
        self
    }
}

impl Identifiable for Payment {
    fn id(&self) -> DbId {
        self.id
    }
}

/// How the client settled: over the counter or through the gateway.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    Gateway,
}
