//! Id lookups over the caller's project and collaborator lists.

use std::collections::HashMap;

use crate::model::{Collaborator, CollaboratorId, Project, ProjectId};

/// Placeholder shown for a collaborator (or a table cell) that cannot be
/// resolved.
pub const MISSING_NAME: &str = "—";

/// Borrowed id → record lookups. When a list repeats an id, the last record
/// wins.
#[derive(Debug, Clone, Default)]
pub struct Directory<'a> {
    projects: HashMap<&'a str, &'a Project>,
    collaborators: HashMap<&'a str, &'a Collaborator>,
}

impl<'a> Directory<'a> {
    #[must_use]
    pub fn new(projects: &'a [Project], collaborators: &'a [Collaborator]) -> Self {
        Self {
            projects: projects.iter().map(|p| (p.id.as_str(), p)).collect(),
            collaborators: collaborators.iter().map(|c| (c.id.as_str(), c)).collect(),
        }
    }

    #[must_use]
    pub fn project(&self, id: &ProjectId) -> Option<&'a Project> {
        self.projects.get(id.as_str()).copied()
    }

    #[must_use]
    pub fn collaborator(&self, id: &CollaboratorId) -> Option<&'a Collaborator> {
        self.collaborators.get(id.as_str()).copied()
    }

    #[must_use]
    pub fn project_title(&self, id: &ProjectId) -> Option<&'a str> {
        self.project(id).map(|p| p.title.as_str())
    }

    #[must_use]
    pub fn collaborator_name(&self, id: &CollaboratorId) -> Option<&'a str> {
        self.collaborator(id).map(|c| c.name.as_str())
    }

    /// Collaborator display name, or [`MISSING_NAME`].
    #[must_use]
    pub fn collaborator_label(&self, id: &CollaboratorId) -> &'a str {
        self.collaborator_name(id).unwrap_or(MISSING_NAME)
    }
}
