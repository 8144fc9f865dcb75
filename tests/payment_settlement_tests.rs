mod common;

use common::{sample_book, sample_date};
use sitework_core::core::services::PaymentService;
use sitework_core::domain::{PaymentScheduleEntry, ScheduleStatus};
use sitework_core::errors::{CoreError, Result};
use sitework_core::gateway::{CheckoutSession, PaymentGateway};

struct HostedCheckout;

impl PaymentGateway for HostedCheckout {
    fn create_checkout(&self, entry: &PaymentScheduleEntry) -> Result<CheckoutSession> {
        Ok(CheckoutSession::new(
            entry.id,
            entry.amount,
            format!("https://pay.example/checkout/{}", entry.id),
        ))
    }
}

#[test]
fn cash_and_gateway_settlements_coexist_on_one_milestone() {
    let (mut book, _, milestone_id) = sample_book();
    let down_payment = PaymentService::schedule(
        &mut book,
        milestone_id,
        "Down payment",
        20_000.0,
        sample_date(2024, 1, 15),
    )
    .unwrap();
    let progress = PaymentService::schedule(
        &mut book,
        milestone_id,
        "Progress billing",
        45_000.0,
        sample_date(2024, 3, 1),
    )
    .unwrap();

    PaymentService::record_cash_payment(
        &mut book,
        down_payment,
        20_000.0,
        sample_date(2024, 1, 14),
        Some("photos/or-1021.jpg"),
        Some("signatures/or-1021.png"),
        "cashier-2",
    )
    .unwrap();

    let session = PaymentService::begin_gateway_checkout(&book, &HostedCheckout, progress).unwrap();
    assert_eq!(session.amount, 45_000.0);
    PaymentService::confirm_gateway_payment(
        &mut book,
        progress,
        "GW-55102",
        sample_date(2024, 3, 2),
        "webhook",
    )
    .unwrap();

    assert!(book.schedule_entry(down_payment).unwrap().is_settled());
    assert!(book.schedule_entry(progress).unwrap().is_settled());
    assert_eq!(book.payments.len(), 2);
}

#[test]
fn abandoned_checkout_needs_no_cleanup() {
    let (mut book, _, milestone_id) = sample_book();
    let entry = PaymentService::schedule(
        &mut book,
        milestone_id,
        "Progress billing",
        45_000.0,
        sample_date(2024, 3, 1),
    )
    .unwrap();

    // The client opens checkout twice and never completes either.
    PaymentService::begin_gateway_checkout(&book, &HostedCheckout, entry).unwrap();
    PaymentService::begin_gateway_checkout(&book, &HostedCheckout, entry).unwrap();

    assert_eq!(
        book.schedule_entry(entry).unwrap().status,
        ScheduleStatus::Pending
    );
    assert!(book.payments.is_empty());
}

#[test]
fn settled_entries_reject_further_checkout_and_confirmation() {
    let (mut book, _, milestone_id) = sample_book();
    let entry = PaymentService::schedule(
        &mut book,
        milestone_id,
        "Progress billing",
        45_000.0,
        sample_date(2024, 3, 1),
    )
    .unwrap();
    PaymentService::confirm_gateway_payment(
        &mut book,
        entry,
        "GW-55102",
        sample_date(2024, 3, 2),
        "webhook",
    )
    .unwrap();

    let err = PaymentService::begin_gateway_checkout(&book, &HostedCheckout, entry).unwrap_err();
    assert!(matches!(err, CoreError::InvalidTransition { .. }));

    let err = PaymentService::confirm_gateway_payment(
        &mut book,
        entry,
        "GW-55103",
        sample_date(2024, 3, 3),
        "webhook",
    )
    .unwrap_err();
    assert!(matches!(err, CoreError::InvalidTransition { .. }));
    assert_eq!(book.payments.len(), 1);
}
