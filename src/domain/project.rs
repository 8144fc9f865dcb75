use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::*;

/// Represents a construction project under execution.
///
/// Projects are never hard-deleted; [`Project::archive`] flips the flag and
/// archived projects stop accepting new milestones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub client: String,
    pub engineer: String,
    pub foreman: String,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub status: ProjectStatus,
    #[serde(default)]
    pub archived: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    pub fn new(
        id: DbId,
        name: impl Into<String>,
        client: impl Into<String>,
        engineer: impl Into<String>,
        foreman: impl Into<String>,
        start_date: NaiveDate,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id,
            name: name.into(),
            client: client.into(),
            engineer: engineer.into(),
            foreman: foreman.into(),
            start_date,
            end_date: None,
            status: ProjectStatus::Active,
            archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn set_status(&mut self, status: ProjectStatus) {
        self.status = status;
        self.touch();
    }

    pub fn archive(&mut self) {
        self.archived = true;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = chrono::Utc::now();
    }
}

impl Identifiable for Project {
    fn id(&self) -> DbId {
        self.id
    }
}

impl NamedEntity for Project {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Project {
    fn display_label(&self) -> String {
        format!("{} ({:?})", self.name, self.status)
    }
}

/// Enumerates the coarse commercial states of a project.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProjectStatus {
    Active,
    OnHold,
    Completed,
}
