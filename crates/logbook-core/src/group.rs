//! Project → collaborator → activity grouping.
//!
//! [`GroupedIndex::build`] makes one pass over an activity subset and files
//! every activity under its own `(project, collaborator)` pair. The index
//! stores no meaningful order: every consumer-visible ordering comes from the
//! sort functions here, applied when the index is read.
//!
//! # Ordering
//!
//! - Projects: ascending by title under [`compare_labels`], then by id.
//! - Collaborators: ascending by display name under [`compare_labels`], then
//!   by id.
//! - Activities: newest `created_at` first, then ascending activity id.
//!
//! The id tie-breaks make the output independent of input order, so two
//! permutations of the same subset group identically. Unknown projects and
//! collaborators sort with an empty label, ahead of named ones.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::debug;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::directory::Directory;
use crate::model::{Activity, CollaboratorId, ProjectId};

/// Accent- and case-folded key approximating a locale-aware comparison.
#[must_use]
pub fn collation_key(raw: &str) -> String {
    raw.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Compare two display labels: folded key first, raw text second.
#[must_use]
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b)).then_with(|| a.cmp(b))
}

/// Sort activities newest first; equal instants fall back to id order.
pub fn sort_newest_first(activities: &mut [&Activity]) {
    activities.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// The activities of one project, keyed by collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectGroup<'a> {
    by_collaborator: BTreeMap<&'a CollaboratorId, Vec<&'a Activity>>,
}

impl<'a> ProjectGroup<'a> {
    /// Total activities across all collaborators.
    #[must_use]
    pub fn activity_count(&self) -> usize {
        self.by_collaborator.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn collaborator_count(&self) -> usize {
        self.by_collaborator.len()
    }

    /// Collaborator ids ordered by display name.
    #[must_use]
    pub fn sorted_collaborator_ids(&self, directory: &Directory<'_>) -> Vec<&'a CollaboratorId> {
        let mut ids: Vec<&'a CollaboratorId> = self.by_collaborator.keys().copied().collect();
        ids.sort_by_cached_key(|id| {
            let name = directory.collaborator_name(id).unwrap_or("");
            (collation_key(name), name.to_string(), *id)
        });
        ids
    }

    /// One collaborator's activities, newest first. Empty for unknown ids.
    #[must_use]
    pub fn sorted_activities(&self, collaborator: &CollaboratorId) -> Vec<&'a Activity> {
        let mut list = self
            .by_collaborator
            .get(collaborator)
            .cloned()
            .unwrap_or_default();
        sort_newest_first(&mut list);
        list
    }
}

/// Two-level index over an activity subset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedIndex<'a> {
    projects: BTreeMap<&'a ProjectId, ProjectGroup<'a>>,
}

impl<'a> GroupedIndex<'a> {
    /// File each activity under its project and collaborator.
    pub fn build<I>(activities: I) -> Self
    where
        I: IntoIterator<Item = &'a Activity>,
    {
        let mut projects: BTreeMap<&'a ProjectId, ProjectGroup<'a>> = BTreeMap::new();
        for activity in activities {
            projects
                .entry(&activity.project_id)
                .or_default()
                .by_collaborator
                .entry(&activity.collaborator_id)
                .or_default()
                .push(activity);
        }
        let index = Self { projects };
        debug!(
            projects = index.projects.len(),
            activities = index.activity_count(),
            "built grouped index"
        );
        index
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    #[must_use]
    pub fn activity_count(&self) -> usize {
        self.projects.values().map(ProjectGroup::activity_count).sum()
    }

    #[must_use]
    pub fn project(&self, id: &ProjectId) -> Option<&ProjectGroup<'a>> {
        self.projects.get(id)
    }

    /// Project ids ordered by title.
    #[must_use]
    pub fn sorted_project_ids(&self, directory: &Directory<'_>) -> Vec<&'a ProjectId> {
        let mut ids: Vec<&'a ProjectId> = self.projects.keys().copied().collect();
        ids.sort_by_cached_key(|id| {
            let title = directory.project_title(id).unwrap_or("");
            (collation_key(title), title.to_string(), *id)
        });
        ids
    }

    /// The whole hierarchy in display order.
    #[must_use]
    pub fn ordered(&self, directory: &Directory<'_>) -> Vec<OrderedProject<'a>> {
        self.sorted_project_ids(directory)
            .into_iter()
            .filter_map(|project_id| {
                let group = self.projects.get(project_id)?;
                let collaborators = group
                    .sorted_collaborator_ids(directory)
                    .into_iter()
                    .map(|collaborator_id| OrderedCollaborator {
                        id: collaborator_id,
                        activities: group.sorted_activities(collaborator_id),
                    })
                    .collect();
                Some(OrderedProject {
                    id: project_id,
                    collaborators,
                })
            })
            .collect()
    }
}

/// A project with its collaborators already in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedProject<'a> {
    pub id: &'a ProjectId,
    pub collaborators: Vec<OrderedCollaborator<'a>>,
}

impl OrderedProject<'_> {
    #[must_use]
    pub fn activity_count(&self) -> usize {
        self.collaborators.iter().map(|c| c.activities.len()).sum()
    }
}

/// A collaborator's activities within one project, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedCollaborator<'a> {
    pub id: &'a CollaboratorId,
    pub activities: Vec<&'a Activity>,
}
