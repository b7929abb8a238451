//! The record set a report is computed from.
//!
//! A snapshot is parsed from JSON text; reading the text is the caller's job.
//! Keys are camelCase and unknown fields are ignored, so a full application
//! state dump parses as long as it carries the three record lists. Saved
//! filters are picked up from a top-level `filters` object or from
//! `dashboard.filters`.
//!
//! Timestamps may be RFC 3339 or carry no offset at all
//! (`2025-01-31T23:59:59`); the latter are wall-clock times in the offset the
//! snapshot is read at.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::error::ErrorCode;
use crate::filter::Filters;
use crate::model::{Activity, ActivityId, Collaborator, CollaboratorId, Project, ProjectId};
use crate::report::ReportInput;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot is not valid JSON at line {line}, column {column}: {source}")]
    Syntax {
        line: usize,
        column: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("snapshot has an unexpected shape at line {line}, column {column}: {source}")]
    Shape {
        line: usize,
        column: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl SnapshotError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        ErrorCode::InputParseError
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(source: serde_json::Error) -> Self {
        let (line, column) = (source.line(), source.column());
        if source.is_data() {
            Self::Shape {
                line,
                column,
                source,
            }
        } else {
            Self::Syntax {
                line,
                column,
                source,
            }
        }
    }
}

/// Projects, collaborators, activities, and any saved filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub projects: Vec<Project>,
    pub collaborators: Vec<Collaborator>,
    pub activities: Vec<Activity>,
    pub filters: Filters,
}

/// A timestamp as written in the snapshot file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WrittenInstant {
    Zoned(DateTime<Utc>),
    WallClock(NaiveDateTime),
}

impl WrittenInstant {
    fn resolve(self, offset: FixedOffset) -> DateTime<Utc> {
        match self {
            Self::Zoned(ts) => ts,
            Self::WallClock(local) => dates::at_offset(local, offset)
                .map_or_else(|| local.and_utc(), |ts| ts.with_timezone(&Utc)),
        }
    }
}

impl<'de> Deserialize<'de> for WrittenInstant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if let Ok(ts) = raw.trim().parse::<DateTime<FixedOffset>>() {
            return Ok(Self::Zoned(ts.with_timezone(&Utc)));
        }
        dates::parse_wall_clock(&raw)
            .map(Self::WallClock)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp '{raw}'")))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawActivity {
    id: ActivityId,
    project_id: ProjectId,
    collaborator_id: CollaboratorId,
    text: String,
    created_at: WrittenInstant,
    updated_at: WrittenInstant,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProject {
    id: ProjectId,
    title: String,
    #[serde(default)]
    subtitle: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    created_at: WrittenInstant,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCollaborator {
    id: CollaboratorId,
    name: String,
    #[serde(default)]
    color: String,
    created_at: WrittenInstant,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnapshot {
    #[serde(default)]
    projects: Vec<RawProject>,
    #[serde(default)]
    collaborators: Vec<RawCollaborator>,
    #[serde(default)]
    activities: Vec<RawActivity>,
    #[serde(default)]
    filters: Option<Filters>,
    #[serde(default)]
    dashboard: Option<RawDashboard>,
}

#[derive(Deserialize)]
struct RawDashboard {
    #[serde(default)]
    filters: Option<Filters>,
}

impl Snapshot {
    /// Parse snapshot JSON, reading offset-less timestamps as UTC.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when the text is not JSON or a record is
    /// missing a required field or carries a malformed timestamp.
    pub fn from_json(raw: &str) -> Result<Self, SnapshotError> {
        Self::from_json_at(raw, Utc.fix())
    }

    /// Parse snapshot JSON, reading offset-less timestamps in `offset`.
    ///
    /// # Errors
    ///
    /// Same as [`Snapshot::from_json`].
    pub fn from_json_at(raw: &str, offset: FixedOffset) -> Result<Self, SnapshotError> {
        let raw: RawSnapshot = serde_json::from_str(raw)?;
        let filters = raw
            .filters
            .or_else(|| raw.dashboard.and_then(|d| d.filters))
            .unwrap_or_default();
        Ok(Self {
            projects: raw
                .projects
                .into_iter()
                .map(|p| Project {
                    id: p.id,
                    title: p.title,
                    subtitle: p.subtitle,
                    start_date: p.start_date,
                    end_date: p.end_date,
                    created_at: p.created_at.resolve(offset),
                })
                .collect(),
            collaborators: raw
                .collaborators
                .into_iter()
                .map(|c| Collaborator {
                    id: c.id,
                    name: c.name,
                    color: c.color,
                    created_at: c.created_at.resolve(offset),
                })
                .collect(),
            activities: raw
                .activities
                .into_iter()
                .map(|a| Activity {
                    id: a.id,
                    project_id: a.project_id,
                    collaborator_id: a.collaborator_id,
                    text: a.text,
                    created_at: a.created_at.resolve(offset),
                    updated_at: a.updated_at.resolve(offset),
                })
                .collect(),
            filters,
        })
    }

    /// Borrow the records for a report under `filters`.
    #[must_use]
    pub fn report_input<'a>(&'a self, filters: &'a Filters) -> ReportInput<'a> {
        ReportInput {
            projects: &self.projects,
            collaborators: &self.collaborators,
            activities: &self.activities,
            filters,
        }
    }
}
