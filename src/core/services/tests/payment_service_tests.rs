use chrono::NaiveDate;

use crate::core::services::{MilestoneService, PaymentService, ProjectInput, ProjectService};
use crate::domain::{DbId, PaymentMethod, PaymentScheduleEntry, ScheduleStatus};
use crate::errors::{CoreError, Result};
use crate::gateway::{CheckoutSession, PaymentGateway};
use crate::ledger::ProjectBook;

struct StaticGateway;

impl PaymentGateway for StaticGateway {
    fn create_checkout(&self, entry: &PaymentScheduleEntry) -> Result<CheckoutSession> {
        Ok(CheckoutSession::new(
            entry.id,
            entry.amount,
            format!("https://pay.example/checkout/{}", entry.id),
        ))
    }
}

struct DownGateway;

impl PaymentGateway for DownGateway {
    fn create_checkout(&self, _entry: &PaymentScheduleEntry) -> Result<CheckoutSession> {
        Err(CoreError::ExternalService {
            service: "gateway",
            message: "connect timeout".into(),
        })
    }
}

#[test]
fn cash_without_signature_is_missing_proof_and_leaves_entry_pending() {
    let (mut book, entry) = book_with_entry();
    let err = PaymentService::record_cash_payment(
        &mut book,
        entry,
        20_000.0,
        sample_date(2024, 1, 14),
        Some("photos/or-1021.jpg"),
        None,
        "cashier-2",
    )
    .unwrap_err();
    assert!(matches!(
        err,
        CoreError::MissingProof {
            what: "signature",
            ..
        }
    ));
    assert_eq!(
        book.schedule_entry(entry).unwrap().status,
        ScheduleStatus::Pending
    );
    assert!(book.payments.is_empty());
}

#[test]
fn cash_without_photo_is_missing_proof() {
    let (mut book, entry) = book_with_entry();
    let err = PaymentService::record_cash_payment(
        &mut book,
        entry,
        20_000.0,
        sample_date(2024, 1, 14),
        None,
        Some("signatures/or-1021.png"),
        "cashier-2",
    )
    .unwrap_err();
    assert!(matches!(
        err,
        CoreError::MissingProof {
            what: "proof photo",
            ..
        }
    ));
}

#[test]
fn cash_with_both_artifacts_settles_the_entry() {
    let (mut book, entry) = book_with_entry();
    let payment_id = PaymentService::record_cash_payment(
        &mut book,
        entry,
        20_000.0,
        sample_date(2024, 1, 14),
        Some("photos/or-1021.jpg"),
        Some("signatures/or-1021.png"),
        "cashier-2",
    )
    .unwrap();

    let payment = book
        .payments_for(entry)
        .find(|payment| payment.id == payment_id)
        .unwrap();
    assert_eq!(payment.method, PaymentMethod::Cash);
    assert_eq!(payment.proof_photo.as_deref(), Some("photos/or-1021.jpg"));
    assert_eq!(payment.signature.as_deref(), Some("signatures/or-1021.png"));
    assert!(book.schedule_entry(entry).unwrap().is_settled());
}

#[test]
fn settled_entries_cannot_be_paid_twice() {
    let (mut book, entry) = book_with_entry();
    PaymentService::record_cash_payment(
        &mut book,
        entry,
        20_000.0,
        sample_date(2024, 1, 14),
        Some("photos/or-1021.jpg"),
        Some("signatures/or-1021.png"),
        "cashier-2",
    )
    .unwrap();

    let err = PaymentService::record_cash_payment(
        &mut book,
        entry,
        20_000.0,
        sample_date(2024, 1, 15),
        Some("photos/or-1022.jpg"),
        Some("signatures/or-1022.png"),
        "cashier-2",
    )
    .unwrap_err();
    assert!(matches!(err, CoreError::InvalidTransition { .. }));
    assert_eq!(book.payments.len(), 1);
}

#[test]
fn non_positive_amounts_are_rejected() {
    let (mut book, entry) = book_with_entry();
    for amount in [0.0, -50.0, f64::NAN] {
        let err = PaymentService::record_cash_payment(
            &mut book,
            entry,
            amount,
            sample_date(2024, 1, 14),
            Some("photos/or-1021.jpg"),
            Some("signatures/or-1021.png"),
            "cashier-2",
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }
    assert!(book.payments.is_empty());
}

#[test]
fn gateway_checkout_leaves_the_entry_pending_until_confirmation() {
    let (mut book, entry) = book_with_entry();
    let session = PaymentService::begin_gateway_checkout(&book, &StaticGateway, entry).unwrap();
    assert_eq!(session.schedule_entry_id, entry);
    assert_eq!(session.amount, 20_000.0);
    assert_eq!(
        book.schedule_entry(entry).unwrap().status,
        ScheduleStatus::Pending
    );

    let payment_id = PaymentService::confirm_gateway_payment(
        &mut book,
        entry,
        "GW-88231",
        sample_date(2024, 1, 16),
        "webhook",
    )
    .unwrap();
    let payment = book
        .payments_for(entry)
        .find(|payment| payment.id == payment_id)
        .unwrap();
    assert_eq!(payment.method, PaymentMethod::Gateway);
    assert_eq!(payment.reference_number.as_deref(), Some("GW-88231"));
    assert!(book.schedule_entry(entry).unwrap().is_settled());
}

#[test]
fn gateway_outage_surfaces_as_external_service_failure() {
    let (book, entry) = book_with_entry();
    let err = PaymentService::begin_gateway_checkout(&book, &DownGateway, entry).unwrap_err();
    assert!(matches!(err, CoreError::ExternalService { .. }));
}

#[test]
fn confirmation_requires_a_reference_number() {
    let (mut book, entry) = book_with_entry();
    let err = PaymentService::confirm_gateway_payment(
        &mut book,
        entry,
        " ",
        sample_date(2024, 1, 16),
        "webhook",
    )
    .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
    assert_eq!(
        book.schedule_entry(entry).unwrap().status,
        ScheduleStatus::Pending
    );
}

#[test]
fn corrections_are_new_compensating_records() {
    let (mut book, milestone_id, entry) = book_with_entry_and_milestone();
    PaymentService::record_cash_payment(
        &mut book,
        entry,
        20_000.0,
        sample_date(2024, 1, 14),
        Some("photos/or-1021.jpg"),
        Some("signatures/or-1021.png"),
        "cashier-2",
    )
    .unwrap();

    // The original record stays; the adjustment is its own entry + payment.
    let adjustment = PaymentService::schedule(
        &mut book,
        milestone_id,
        "Down payment adjustment",
        500.0,
        sample_date(2024, 1, 20),
    )
    .unwrap();
    PaymentService::record_cash_payment(
        &mut book,
        adjustment,
        500.0,
        sample_date(2024, 1, 21),
        Some("photos/or-1030.jpg"),
        Some("signatures/or-1030.png"),
        "cashier-2",
    )
    .unwrap();

    assert_eq!(book.payments.len(), 2);
    assert_eq!(book.payments_for(entry).count(), 1);
    assert_eq!(book.payments_for(adjustment).count(), 1);
}

#[test]
fn scheduling_validates_name_and_amount() {
    let (mut book, milestone_id, _) = book_with_entry_and_milestone();
    let err = PaymentService::schedule(&mut book, milestone_id, " ", 100.0, sample_date(2024, 2, 1))
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));

    let err =
        PaymentService::schedule(&mut book, milestone_id, "Retention", 0.0, sample_date(2024, 2, 1))
            .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

fn sample_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn book_with_entry() -> (ProjectBook, DbId) {
    let (book, _, entry) = book_with_entry_and_milestone();
    (book, entry)
}

fn book_with_entry_and_milestone() -> (ProjectBook, DbId, DbId) {
    let mut book = ProjectBook::new("Settlement");
    let project_id = ProjectService::create(
        &mut book,
        ProjectInput {
            name: "Two-storey residence".into(),
            client: "R. Santos".into(),
            engineer: "Engr. Cruz".into(),
            foreman: "F. Dizon".into(),
            start_date: sample_date(2024, 1, 8),
            end_date: None,
        },
    )
    .unwrap();
    let milestone_id = MilestoneService::create(
        &mut book,
        project_id,
        "Masonry works",
        "Ground floor walls",
        sample_date(2024, 2, 1),
        sample_date(2024, 3, 15),
    )
    .unwrap();
    let entry = PaymentService::schedule(
        &mut book,
        milestone_id,
        "Down payment",
        20_000.0,
        sample_date(2024, 1, 15),
    )
    .unwrap();
    (book, milestone_id, entry)
}
