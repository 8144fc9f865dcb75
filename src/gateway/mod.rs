//! Seam for the external payment gateway collaborator.
//!
//! The core never talks to the gateway network API itself; the transport
//! layer supplies an implementation of [`PaymentGateway`]. Checkout calls
//! block from the caller's perspective and are never retried internally; a
//! client that abandons checkout simply leaves its schedule entry pending.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{DbId, PaymentScheduleEntry};
use crate::errors::Result;

/// A checkout session opened with the external gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutSession {
    pub session_id: Uuid,
    pub schedule_entry_id: DbId,
    pub amount: f64,
    pub checkout_url: String,
}

impl CheckoutSession {
    pub fn new(schedule_entry_id: DbId, amount: f64, checkout_url: impl Into<String>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            schedule_entry_id,
            amount,
            checkout_url: checkout_url.into(),
        }
    }
}

/// Abstraction over the hosted-checkout provider.
///
/// Implementations should surface provider outages as
/// [`crate::errors::CoreError::ExternalService`] so callers can retry.
pub trait PaymentGateway: Send + Sync {
    /// Opens a checkout session for the full amount of a schedule entry.
    fn create_checkout(&self, entry: &PaymentScheduleEntry) -> Result<CheckoutSession>;
}
