//! Per-collaborator recency.
//!
//! Recency always reads the full, unfiltered activity log: a collaborator's
//! freshness does not change because a report is filtered to one project or
//! one week.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::clock::Clock;
use crate::dates;
use crate::group::compare_labels;
use crate::model::{Activity, Collaborator, CollaboratorId};

/// Most recent `created_at` per collaborator id, `None` when they have
/// logged nothing.
pub type RecencyMap<'a> = BTreeMap<&'a CollaboratorId, Option<DateTime<Utc>>>;

/// Freshness of a collaborator's latest activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecencyStatus {
    Ok,
    Warning,
    Stale,
    /// No activity at all, rendered distinctly from `Stale`.
    NoData,
}

impl RecencyStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Warning => "warning",
            Self::Stale => "stale",
            Self::NoData => "no-data",
        }
    }
}

impl fmt::Display for RecencyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day thresholds for [`classify`]. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecencyThresholds {
    #[serde(default = "default_ok_days")]
    pub ok_days: i64,
    #[serde(default = "default_warning_days")]
    pub warning_days: i64,
}

impl Default for RecencyThresholds {
    fn default() -> Self {
        Self {
            ok_days: default_ok_days(),
            warning_days: default_warning_days(),
        }
    }
}

const fn default_ok_days() -> i64 {
    7
}

const fn default_warning_days() -> i64 {
    10
}

/// Latest activity per collaborator.
///
/// Every known collaborator gets an entry. Activities whose collaborator is
/// not in `collaborators` still get one, so callers can spot orphans.
pub fn compute_recency<'a>(
    activities: &'a [Activity],
    collaborators: &'a [Collaborator],
) -> RecencyMap<'a> {
    let mut latest: RecencyMap<'a> = collaborators.iter().map(|c| (&c.id, None)).collect();
    for activity in activities {
        let slot = latest.entry(&activity.collaborator_id).or_default();
        if slot.is_none_or(|current| current < activity.created_at) {
            *slot = Some(activity.created_at);
        }
    }
    latest
}

/// Classify a latest-activity instant relative to `now`.
///
/// Days are counted with [`dates::days_since`], which rounds down.
#[must_use]
pub fn classify(
    last: Option<DateTime<Utc>>,
    now: DateTime<FixedOffset>,
    thresholds: RecencyThresholds,
) -> RecencyStatus {
    let Some(last) = last else {
        return RecencyStatus::NoData;
    };
    let days = dates::days_since(last, now);
    if days <= thresholds.ok_days {
        RecencyStatus::Ok
    } else if days <= thresholds.warning_days {
        RecencyStatus::Warning
    } else {
        RecencyStatus::Stale
    }
}

/// One row of the recency listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecencyEntry<'a> {
    pub collaborator_id: &'a CollaboratorId,
    pub name: &'a str,
    pub color: &'a str,
    pub last_activity: Option<DateTime<Utc>>,
    pub days_since: Option<i64>,
    pub status: RecencyStatus,
}

/// Recency of every known collaborator, ordered by name.
pub fn recency_report<'a>(
    activities: &'a [Activity],
    collaborators: &'a [Collaborator],
    clock: &impl Clock,
    thresholds: RecencyThresholds,
) -> Vec<RecencyEntry<'a>> {
    let now = clock.now();
    let latest = compute_recency(activities, collaborators);
    let mut entries: Vec<RecencyEntry<'a>> = collaborators
        .iter()
        .map(|c| {
            let last = latest.get(&c.id).copied().flatten();
            RecencyEntry {
                collaborator_id: &c.id,
                name: &c.name,
                color: &c.color,
                last_activity: last,
                days_since: last.map(|ts| dates::days_since(ts, now)),
                status: classify(last, now, thresholds),
            }
        })
        .collect();
    entries.sort_by(|a, b| {
        compare_labels(a.name, b.name).then_with(|| a.collaborator_id.cmp(b.collaborator_id))
    });
    entries
}
