//! Narrative layout flowed across fixed-height pages.
//!
//! Each project opens with a heading and its period, each collaborator with
//! an indented name, followed by one bullet per activity. Bullets are
//! wrapped to [`EditorialGeometry::wrap_columns`] first; every wrapped line
//! then passes its own page-break check.
//!
//! Coordinates are in points from the top-left corner of an A4 page. A
//! vertical cursor tracks the next baseline. Before a project or
//! collaborator heading the page breaks when the cursor is past
//! `heading_break`; before a bullet line, when it is past `line_break`.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::wrap::wrap;
use super::{DateOptions, Prepared, ReportInput};
use crate::clock::Clock;
use crate::directory::MISSING_NAME;

pub const TITLE: &str = "Activity export (editorial)";
/// Heading used for a project missing from the project list.
pub const MISSING_PROJECT: &str = "Project";
pub const BULLET: &str = "• ";

/// Page geometry and spacing, all in points except `wrap_columns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorialGeometry {
    pub top_margin: f32,
    pub left_margin: f32,
    pub collaborator_indent: f32,
    pub bullet_indent: f32,
    pub rule_end: f32,
    pub heading_break: f32,
    pub line_break: f32,
    pub title_advance: f32,
    pub header_advance: f32,
    pub project_advance: f32,
    pub period_advance: f32,
    pub collaborator_advance: f32,
    pub line_advance: f32,
    pub collaborator_gap: f32,
    pub section_gap: f32,
    pub rule_gap: f32,
    pub wrap_columns: usize,
}

impl Default for EditorialGeometry {
    fn default() -> Self {
        Self {
            top_margin: 40.0,
            left_margin: 40.0,
            collaborator_indent: 50.0,
            bullet_indent: 60.0,
            rule_end: 555.0,
            heading_break: 740.0,
            line_break: 760.0,
            title_advance: 18.0,
            header_advance: 18.0,
            project_advance: 14.0,
            period_advance: 14.0,
            collaborator_advance: 12.0,
            line_advance: 12.0,
            collaborator_gap: 8.0,
            section_gap: 10.0,
            rule_gap: 14.0,
            wrap_columns: 100,
        }
    }
}

/// What a text op represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextRole {
    Title,
    FilterHeader,
    ProjectHeading,
    ProjectPeriod,
    CollaboratorHeading,
    /// First line of an activity.
    Bullet,
    /// A wrapped continuation of the previous bullet.
    Continuation,
}

impl TextRole {
    /// Font size in points.
    #[must_use]
    pub const fn font_size(self) -> f32 {
        match self {
            Self::Title => 14.0,
            Self::ProjectHeading => 12.0,
            Self::CollaboratorHeading => 11.0,
            Self::FilterHeader | Self::ProjectPeriod | Self::Bullet | Self::Continuation => 10.0,
        }
    }
}

/// One draw instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        size: f32,
        role: TextRole,
        text: String,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub number: usize,
    pub ops: Vec<DrawOp>,
}

/// The editorial export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorialDocument {
    pub pages: Vec<Page>,
}

impl EditorialDocument {
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Every text op with the given role, in draw order.
    pub fn texts(&self, role: TextRole) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(|page| &page.ops).filter_map(move |op| match op {
            DrawOp::Text { role: r, text, .. } if *r == role => Some(text.as_str()),
            _ => None,
        })
    }

    /// Number of activities listed.
    #[must_use]
    pub fn bullet_count(&self) -> usize {
        self.texts(TextRole::Bullet).count()
    }
}

/// Page-owning writer with a vertical cursor.
struct PageWriter<'g> {
    geometry: &'g EditorialGeometry,
    pages: Vec<Page>,
    y: f32,
}

impl<'g> PageWriter<'g> {
    fn new(geometry: &'g EditorialGeometry) -> Self {
        Self {
            geometry,
            pages: vec![Page {
                number: 1,
                ops: Vec::new(),
            }],
            y: geometry.top_margin,
        }
    }

    fn break_past(&mut self, limit: f32) {
        if self.y > limit {
            let number = self.pages.len() + 1;
            trace!(page = number, cursor = self.y, limit, "page break");
            self.pages.push(Page {
                number,
                ops: Vec::new(),
            });
            self.y = self.geometry.top_margin;
        }
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn text(&mut self, x: f32, role: TextRole, text: String, advance: f32) {
        let y = self.y;
        self.push(DrawOp::Text {
            x,
            y,
            size: role.font_size(),
            role,
            text,
        });
        self.y += advance;
    }

    fn rule(&mut self) {
        let op = DrawOp::Rule {
            x1: self.geometry.left_margin,
            x2: self.geometry.rule_end,
            y: self.y,
        };
        self.push(op);
    }

    fn advance(&mut self, by: f32) {
        self.y += by;
    }

    fn finish(self) -> EditorialDocument {
        EditorialDocument { pages: self.pages }
    }
}

/// Flow the filtered, grouped activities onto pages.
pub fn layout(
    input: ReportInput<'_>,
    clock: &impl Clock,
    options: &DateOptions,
    geometry: &EditorialGeometry,
) -> EditorialDocument {
    let prepared = Prepared::new(input, clock);
    let g = geometry;
    let mut out = PageWriter::new(g);

    out.text(g.left_margin, TextRole::Title, TITLE.to_string(), g.title_advance);
    out.text(
        g.left_margin,
        TextRole::FilterHeader,
        input.filters.describe(),
        g.header_advance,
    );

    for project in &prepared.projects {
        let record = prepared.directory.project(project.id);
        let heading = record.map_or_else(
            || MISSING_PROJECT.to_string(),
            |p| format!("{} — {}", p.title, p.subtitle),
        );
        let period = record.map_or_else(
            || format!("Project period: {MISSING_NAME} → {MISSING_NAME}"),
            |p| format!("Project period: {} → {}", p.start_date, p.end_date),
        );

        out.break_past(g.heading_break);
        out.text(g.left_margin, TextRole::ProjectHeading, heading, g.project_advance);
        out.text(g.left_margin, TextRole::ProjectPeriod, period, g.period_advance);

        for collaborator in &project.collaborators {
            out.break_past(g.heading_break);
            out.text(
                g.collaborator_indent,
                TextRole::CollaboratorHeading,
                prepared.directory.collaborator_label(collaborator.id).to_string(),
                g.collaborator_advance,
            );

            for activity in &collaborator.activities {
                let bullet = format!("{BULLET}{}", prepared.activity_line(activity, options));
                for (i, line) in wrap(&bullet, g.wrap_columns).into_iter().enumerate() {
                    let role = if i == 0 {
                        TextRole::Bullet
                    } else {
                        TextRole::Continuation
                    };
                    out.break_past(g.line_break);
                    out.text(g.bullet_indent, role, line, g.line_advance);
                }
            }
            out.advance(g.collaborator_gap);
        }

        out.advance(g.section_gap);
        out.rule();
        out.advance(g.rule_gap);
    }

    let doc = out.finish();
    trace!(pages = doc.page_count(), "laid out editorial export");
    doc
}
