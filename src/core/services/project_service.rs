//! Project intake and status edits.

use chrono::NaiveDate;

use crate::domain::{DbId, Project, ProjectStatus};
use crate::errors::{CoreError, Result};
use crate::ledger::ProjectBook;

/// Intake payload for a new project.
#[derive(Debug, Clone)]
pub struct ProjectInput {
    pub name: String,
    pub client: String,
    pub engineer: String,
    pub foreman: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

/// Provides validated mutations for [`Project`] entities.
pub struct ProjectService;

impl ProjectService {
    /// Registers a new project and returns its id.
    pub fn create(book: &mut ProjectBook, input: ProjectInput) -> Result<DbId> {
        if input.name.trim().is_empty() {
            return Err(CoreError::Validation("project name is required".into()));
        }
        if input.client.trim().is_empty() {
            return Err(CoreError::Validation("client is required".into()));
        }
        if let Some(end_date) = input.end_date {
            if end_date < input.start_date {
                return Err(CoreError::Validation(
                    "project end date precedes start date".into(),
                ));
            }
        }
        let id = book.allocate_id();
        let mut project = Project::new(
            id,
            input.name,
            input.client,
            input.engineer,
            input.foreman,
            input.start_date,
        );
        project.end_date = input.end_date;
        book.add_project(project);
        tracing::info!(project_id = id, "project registered");
        Ok(id)
    }

    /// Updates the commercial status of a project.
    pub fn set_status(book: &mut ProjectBook, project_id: DbId, status: ProjectStatus) -> Result<()> {
        let project = book.project_mut(project_id).ok_or(CoreError::NotFound {
            entity: "project",
            id: project_id,
        })?;
        project.set_status(status);
        book.touch();
        Ok(())
    }

    /// Archives a project. Archived projects are kept for audit and reject
    /// new milestones; there is no hard delete.
    pub fn archive(book: &mut ProjectBook, project_id: DbId) -> Result<()> {
        let project = book.project_mut(project_id).ok_or(CoreError::NotFound {
            entity: "project",
            id: project_id,
        })?;
        project.archive();
        book.touch();
        tracing::info!(project_id, "project archived");
        Ok(())
    }

    /// Returns a snapshot of the projects currently tracked in the book.
    pub fn list(book: &ProjectBook) -> Vec<&Project> {
        book.projects.iter().collect()
    }
}
