//! Report layout engine.
//!
//! Both export shapes start from the same [`Prepared`] data: the activity log
//! filtered by [`crate::filter::filter_activities`], then grouped and ordered
//! by [`GroupedIndex`]. Using one preparation step for both keeps the tabular
//! row count and the editorial bullet count equal for any filter.
//!
//! - [`tabular`] lays rows out for a three-column table with vertical spans.
//! - [`editorial`] flows headings and wrapped bullets across fixed-height
//!   pages.
//!
//! Neither layout writes a file. They return document models that an
//! external renderer draws cell by cell or op by op.

pub mod editorial;
pub mod tabular;
pub mod wrap;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::Clock;
use crate::dates;
use crate::directory::Directory;
use crate::filter::{Filters, filter_activities};
use crate::group::{GroupedIndex, OrderedProject};
use crate::model::{Activity, Collaborator, Project};

/// Separator between a date and an activity body.
pub const DATE_SEPARATOR: &str = " — ";

/// Read-only inputs shared by both layouts.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub projects: &'a [Project],
    pub collaborators: &'a [Collaborator],
    pub activities: &'a [Activity],
    pub filters: &'a Filters,
}

/// Text formatting knobs shared by both layouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateOptions {
    #[serde(default = "default_short_format")]
    pub short_format: String,
}

impl Default for DateOptions {
    fn default() -> Self {
        Self {
            short_format: default_short_format(),
        }
    }
}

fn default_short_format() -> String {
    dates::SHORT_DATE_FORMAT.to_string()
}

/// Filtered, grouped, and ordered data ready for layout.
#[derive(Debug, Clone)]
pub struct Prepared<'a> {
    pub directory: Directory<'a>,
    pub projects: Vec<OrderedProject<'a>>,
    pub offset: FixedOffset,
}

impl<'a> Prepared<'a> {
    /// Filter, then group, then order.
    pub fn new(input: ReportInput<'a>, clock: &impl Clock) -> Self {
        let directory = Directory::new(input.projects, input.collaborators);
        let filtered = filter_activities(input.activities, input.filters, clock);
        let index = GroupedIndex::build(filtered);
        let projects = index.ordered(&directory);
        debug!(
            projects = projects.len(),
            activities = index.activity_count(),
            "prepared report data"
        );
        Self {
            directory,
            projects,
            offset: *clock.now().offset(),
        }
    }

    /// Total activities across every project.
    #[must_use]
    pub fn activity_count(&self) -> usize {
        self.projects.iter().map(OrderedProject::activity_count).sum()
    }

    /// `<short date> — <body>` for one activity.
    #[must_use]
    pub fn activity_line(&self, activity: &Activity, options: &DateOptions) -> String {
        format!(
            "{}{DATE_SEPARATOR}{}",
            dates::format_short(activity.created_at, self.offset, &options.short_format),
            activity.text
        )
    }
}
