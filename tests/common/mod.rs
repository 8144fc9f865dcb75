use chrono::NaiveDate;

use sitework_core::core::services::{MilestoneService, ProjectInput, ProjectService};
use sitework_core::domain::DbId;
use sitework_core::ledger::ProjectBook;

pub fn sample_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A book holding one active project with one pending milestone.
pub fn sample_book() -> (ProjectBook, DbId, DbId) {
    let mut book = ProjectBook::new("Riverside Duplex");
    let project_id = ProjectService::create(
        &mut book,
        ProjectInput {
            name: "Duplex A".into(),
            client: "R. Santos".into(),
            engineer: "Engr. Cruz".into(),
            foreman: "F. Dizon".into(),
            start_date: sample_date(2024, 1, 8),
            end_date: Some(sample_date(2024, 9, 30)),
        },
    )
    .expect("project intake");
    let milestone_id = MilestoneService::create(
        &mut book,
        project_id,
        "Masonry works",
        "Ground floor walls and partitions",
        sample_date(2024, 2, 1),
        sample_date(2024, 3, 15),
    )
    .expect("milestone intake");
    (book, project_id, milestone_id)
}
