//! Three-column table layout with vertical cell merging.
//!
//! Columns are project, activity, collaborator. Rows run project by project
//! (title order), collaborator by collaborator within a project (name order),
//! newest activity first within a collaborator.
//!
//! Merge rules:
//!
//! - The project cell of a project's first row spans all of that project's
//!   rows; the rows below carry [`Cell::Covered`].
//! - A collaborator with more than [`MERGE_ABOVE`] rows in a project gets one
//!   spanning name cell. With fewer rows the name repeats on every row.

use serde::Serialize;
use tracing::debug;

use super::{DateOptions, Prepared, ReportInput};
use crate::clock::Clock;
use crate::directory::MISSING_NAME;

/// Collaborator cells merge only above this many rows.
pub const MERGE_ABOVE: usize = 2;

pub const TITLE: &str = "Activity export (tabular)";
pub const COLUMNS: [&str; 3] = ["PROJECTS", "ACTIVITIES", "COLLABORATORS"];

/// One table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
    /// Shown once, visually covering `rows` rows starting here.
    Spanning { text: String, rows: usize },
    /// Shown in this row only.
    Text { text: String },
    /// Empty; an earlier [`Cell::Spanning`] covers it.
    Covered,
}

impl Cell {
    /// Text drawn in this row.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Spanning { text, .. } | Self::Text { text } => text,
            Self::Covered => "",
        }
    }

    /// Rows this cell covers, zero for a covered cell.
    #[must_use]
    pub const fn row_span(&self) -> usize {
        match self {
            Self::Spanning { rows, .. } => *rows,
            Self::Text { .. } => 1,
            Self::Covered => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub project: Cell,
    pub activity: String,
    pub collaborator: Cell,
}

/// The tabular export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabularDocument {
    pub title: String,
    pub filter_header: String,
    pub columns: [&'static str; 3],
    pub rows: Vec<TableRow>,
}

impl TabularDocument {
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Lay out the filtered, grouped activities as table rows.
pub fn layout(input: ReportInput<'_>, clock: &impl Clock, options: &DateOptions) -> TabularDocument {
    let prepared = Prepared::new(input, clock);
    let mut rows = Vec::with_capacity(prepared.activity_count());

    for project in &prepared.projects {
        let project_title = prepared
            .directory
            .project_title(project.id)
            .unwrap_or(MISSING_NAME);
        let project_rows = project.activity_count();
        let mut project_cursor = 0;

        for collaborator in &project.collaborators {
            let name = prepared.directory.collaborator_label(collaborator.id);
            let count = collaborator.activities.len();
            let merge = count > MERGE_ABOVE;

            for (i, activity) in collaborator.activities.iter().enumerate() {
                let project_cell = if project_cursor == 0 {
                    Cell::Spanning {
                        text: project_title.to_string(),
                        rows: project_rows,
                    }
                } else {
                    Cell::Covered
                };
                let collaborator_cell = match (merge, i) {
                    (true, 0) => Cell::Spanning {
                        text: name.to_string(),
                        rows: count,
                    },
                    (true, _) => Cell::Covered,
                    (false, _) => Cell::Text {
                        text: name.to_string(),
                    },
                };
                rows.push(TableRow {
                    project: project_cell,
                    activity: prepared.activity_line(activity, options),
                    collaborator: collaborator_cell,
                });
                project_cursor += 1;
            }
        }
    }

    debug!(rows = rows.len(), "laid out tabular export");
    TabularDocument {
        title: TITLE.to_string(),
        filter_header: input.filters.describe(),
        columns: COLUMNS,
        rows,
    }
}
