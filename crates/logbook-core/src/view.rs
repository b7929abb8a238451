//! Dashboard view: one card per project.
//!
//! Cards list the project's involved collaborators from the unfiltered log,
//! so names do not disappear when a filter hides their work. The activities
//! shown on a card are the filtered ones, grouped by collaborator.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::clock::Clock;
use crate::directory::Directory;
use crate::filter::filter_activities;
use crate::group::{GroupedIndex, ProjectGroup, compare_labels};
use crate::model::{Activity, CollaboratorId, Project, ProjectId};
use crate::report::ReportInput;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollaboratorActivities<'a> {
    pub collaborator_id: &'a CollaboratorId,
    pub name: &'a str,
    pub color: &'a str,
    pub activities: Vec<&'a Activity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectCard<'a> {
    pub project_id: &'a ProjectId,
    pub title: &'a str,
    pub subtitle: &'a str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub closed: bool,
    /// Names of everyone who ever logged on this project, sorted.
    pub involved: Vec<&'a str>,
    /// Filtered activities on this project, known collaborator or not.
    pub activity_count: usize,
    pub groups: Vec<CollaboratorActivities<'a>>,
}

impl ProjectCard<'_> {
    /// No filtered activity matched this project.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.activity_count == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView<'a> {
    pub today: NaiveDate,
    pub cards: Vec<ProjectCard<'a>>,
}

/// Build the dashboard for `input`.
///
/// Projects are sorted by title and restricted by the project selector.
/// Activities from collaborators missing from the list count toward
/// `activity_count` but get no group.
pub fn dashboard<'a>(input: ReportInput<'a>, clock: &impl Clock) -> DashboardView<'a> {
    let today = clock.now().date_naive();
    let directory = Directory::new(input.projects, input.collaborators);
    let filtered = filter_activities(input.activities, input.filters, clock);
    let index = GroupedIndex::build(filtered);

    let mut projects: Vec<&'a Project> = input
        .projects
        .iter()
        .filter(|p| input.filters.project_id.admits(&p.id))
        .collect();
    projects.sort_by(|a, b| compare_labels(&a.title, &b.title).then_with(|| a.id.cmp(&b.id)));

    let cards: Vec<ProjectCard<'a>> = projects
        .into_iter()
        .map(|project| {
            let group = index.project(&project.id);
            let groups = group
                .map(|group| {
                    group
                        .sorted_collaborator_ids(&directory)
                        .into_iter()
                        .filter_map(|id| {
                            let collaborator = directory.collaborator(id)?;
                            Some(CollaboratorActivities {
                                collaborator_id: id,
                                name: &collaborator.name,
                                color: &collaborator.color,
                                activities: group.sorted_activities(id),
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();

            ProjectCard {
                project_id: &project.id,
                title: &project.title,
                subtitle: &project.subtitle,
                start_date: project.start_date,
                end_date: project.end_date,
                closed: project.is_closed(today),
                involved: involved_names(input.activities, &project.id, &directory),
                activity_count: group.map_or(0, ProjectGroup::activity_count),
                groups,
            }
        })
        .collect();

    debug!(cards = cards.len(), "built dashboard view");
    DashboardView { today, cards }
}

/// Sorted names of known collaborators with any activity on `project`.
pub fn involved_names<'a>(
    activities: &'a [Activity],
    project: &ProjectId,
    directory: &Directory<'a>,
) -> Vec<&'a str> {
    let ids: BTreeSet<&CollaboratorId> = activities
        .iter()
        .filter(|a| &a.project_id == project)
        .map(|a| &a.collaborator_id)
        .collect();
    let mut names: Vec<&'a str> = ids
        .into_iter()
        .filter_map(|id| directory.collaborator_name(id))
        .collect();
    names.sort_by(|a, b| compare_labels(a, b));
    names
}
