//! Filter criteria, the date-range predicate, and the filter engine.
//!
//! A [`Filters`] value combines a date window ([`DatePreset`] plus optional
//! custom bounds) with exact-match project and collaborator selectors.
//! Filtering is order-preserving and borrows from the input log.
//!
//! Custom bounds arrive as the raw `YYYY-MM-DD` strings a form produced. A
//! bound that does not parse restricts nothing on its side; it never aborts
//! a report.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::clock::Clock;
use crate::dates;
use crate::model::{Activity, CollaboratorId, ProjectId};

/// Literal accepted in place of an id to mean "no filter".
pub const ALL: &str = "all";

/// Date window mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePreset {
    #[default]
    All,
    /// Rolling window starting at midnight seven days before today.
    Last7,
    /// Inclusive `date_from..=date_to`, either side optional.
    Custom,
}

impl DatePreset {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Last7 => "last7",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for DatePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a date preset name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date preset '{0}': expected all, last7, or custom")]
pub struct ParsePresetError(String);

impl FromStr for DatePreset {
    type Err = ParsePresetError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "last7" => Ok(Self::Last7),
            "custom" => Ok(Self::Custom),
            _ => Err(ParsePresetError(raw.to_string())),
        }
    }
}

/// Exact-match selector over an id type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector<T> {
    All,
    Only(T),
}

impl<T> Default for Selector<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T> Selector<T>
where
    T: Borrow<str> + for<'a> From<&'a str>,
{
    /// Read a raw selector value. Missing, empty, and `"all"` mean
    /// [`Selector::All`].
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("" | ALL) => Self::All,
            Some(id) => Self::Only(T::from(id)),
        }
    }

    /// The selected id, or `"all"`.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL,
            Self::Only(id) => id.borrow(),
        }
    }
}

impl<T: PartialEq> Selector<T> {
    #[must_use]
    pub fn admits(&self, id: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == id,
        }
    }

    #[must_use]
    pub const fn selected(&self) -> Option<&T> {
        match self {
            Self::All => None,
            Self::Only(id) => Some(id),
        }
    }
}

impl<T> FromStr for Selector<T>
where
    T: Borrow<str> + for<'a> From<&'a str>,
{
    type Err = Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(Some(raw)))
    }
}

impl<T> Serialize for Selector<T>
where
    T: Borrow<str> + for<'a> From<&'a str>,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de, T> Deserialize<'de> for Selector<T>
where
    T: Borrow<str> + for<'a> From<&'a str>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Self::parse(raw.as_deref()))
    }
}

/// User-selected filter criteria. The default selects everything.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    #[serde(default)]
    pub date_preset: DatePreset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    #[serde(default)]
    pub project_id: Selector<ProjectId>,
    #[serde(default)]
    pub collaborator_id: Selector<CollaboratorId>,
}

impl Filters {
    /// One-line description of the active selection, used as report header.
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "Filters: period={}, project={}, collaborator={}",
            self.date_preset,
            self.project_id.label(),
            self.collaborator_id.label()
        )
    }
}

/// A date preset resolved against a clock, ready to test many instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateWindow {
    Unbounded,
    /// Everything at or after the instant, future included.
    Since(DateTime<FixedOffset>),
    /// Calendar-date range in the clock's offset.
    Range {
        from: Option<NaiveDate>,
        until: Option<DateTime<FixedOffset>>,
        offset: FixedOffset,
    },
}

impl DateWindow {
    /// Resolve `filters` against `now`.
    #[must_use]
    pub fn resolve(filters: &Filters, now: DateTime<FixedOffset>) -> Self {
        let offset = *now.offset();
        match filters.date_preset {
            DatePreset::All => Self::Unbounded,
            DatePreset::Last7 => {
                let today = now.date_naive();
                let first_day = today.checked_sub_days(Days::new(7)).unwrap_or(today);
                dates::start_of_day(first_day, offset).map_or_else(
                    || {
                        debug!(%first_day, "last7 start out of range, window left open");
                        Self::Unbounded
                    },
                    Self::Since,
                )
            }
            DatePreset::Custom => Self::Range {
                from: resolve_bound("date_from", filters.date_from.as_deref()),
                until: resolve_bound("date_to", filters.date_to.as_deref()).and_then(|to| {
                    let until = dates::end_of_day(to, offset);
                    if until.is_none() {
                        debug!(bound = "date_to", %to, "ignoring out-of-range date bound");
                    }
                    until
                }),
                offset,
            },
        }
    }

    #[must_use]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        match *self {
            Self::Unbounded => true,
            Self::Since(start) => ts >= start,
            Self::Range {
                from,
                until,
                offset,
            } => {
                if from.is_some_and(|from| dates::local_date(ts, offset) < from) {
                    return false;
                }
                until.is_none_or(|until| ts <= until)
            }
        }
    }
}

fn resolve_bound(name: &str, raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?;
    let parsed = dates::parse_ymd(raw);
    if parsed.is_none() && !raw.trim().is_empty() {
        debug!(bound = name, value = raw, "ignoring unparseable date bound");
    }
    parsed
}

/// Whether `ts` falls inside the effective window of `filters` at `now`.
#[must_use]
pub fn matches_date(ts: DateTime<Utc>, filters: &Filters, now: DateTime<FixedOffset>) -> bool {
    DateWindow::resolve(filters, now).contains(ts)
}

/// Keep the activities that pass the date window and both selectors.
///
/// Input order is preserved. The window is resolved once per call.
pub fn filter_activities<'a>(
    activities: &'a [Activity],
    filters: &Filters,
    clock: &impl Clock,
) -> Vec<&'a Activity> {
    let window = DateWindow::resolve(filters, clock.now());
    let kept: Vec<&Activity> = activities
        .iter()
        .filter(|activity| {
            window.contains(activity.created_at)
                && filters.project_id.admits(&activity.project_id)
                && filters.collaborator_id.admits(&activity.collaborator_id)
        })
        .collect();
    debug!(
        total = activities.len(),
        kept = kept.len(),
        preset = %filters.date_preset,
        "filtered activity log"
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::model::ActivityId;

    fn activity(id: &str, project: &str, collaborator: &str, created_at: &str) -> Activity {
        let created_at: DateTime<Utc> = created_at.parse().expect("valid instant");
        Activity {
            id: ActivityId::from(id),
            project_id: ProjectId::from(project),
            collaborator_id: CollaboratorId::from(collaborator),
            text: format!("work {id}"),
            created_at,
            updated_at: created_at,
        }
    }

    fn clock(now: &str) -> FixedClock {
        FixedClock::parse(now).expect("valid clock")
    }

    fn custom(from: Option<&str>, to: Option<&str>) -> Filters {
        Filters {
            date_preset: DatePreset::Custom,
            date_from: from.map(str::to_string),
            date_to: to.map(str::to_string),
            ..Filters::default()
        }
    }

    #[test]
    fn all_preset_matches_everything() {
        let now = clock("2025-03-10T12:00:00Z").now();
        let filters = Filters::default();
        assert!(matches_date("1999-01-01T00:00:00Z".parse().expect("ts"), &filters, now));
        assert!(matches_date("2099-01-01T00:00:00Z".parse().expect("ts"), &filters, now));
    }

    #[test]
    fn last7_lower_bound_is_truncated_to_midnight() {
        let now = clock("2025-03-10T15:00:00Z").now();
        let filters = Filters {
            date_preset: DatePreset::Last7,
            ..Filters::default()
        };
        // 2025-03-03 00:00 is the boundary, not 2025-03-03 15:00.
        assert!(matches_date("2025-03-03T00:00:00Z".parse().expect("ts"), &filters, now));
        assert!(matches_date("2025-03-03T01:00:00Z".parse().expect("ts"), &filters, now));
        assert!(!matches_date("2025-03-02T23:59:59Z".parse().expect("ts"), &filters, now));
    }

    #[test]
    fn last7_includes_now_and_future() {
        let now = clock("2025-03-10T00:00:00Z").now();
        let filters = Filters {
            date_preset: DatePreset::Last7,
            ..Filters::default()
        };
        assert!(matches_date("2025-03-10T00:00:00Z".parse().expect("ts"), &filters, now));
        assert!(matches_date("2025-04-01T00:00:00Z".parse().expect("ts"), &filters, now));
        // Seven days and one second before a midnight `now`.
        assert!(!matches_date("2025-03-02T23:59:59Z".parse().expect("ts"), &filters, now));
    }

    #[test]
    fn last7_boundary_uses_clock_offset() {
        let now = clock("2025-03-10T08:00:00+02:00").now();
        let filters = Filters {
            date_preset: DatePreset::Last7,
            ..Filters::default()
        };
        // Local midnight 2025-03-03 is 22:00 UTC on 2025-03-02.
        assert!(matches_date("2025-03-02T22:00:00Z".parse().expect("ts"), &filters, now));
        assert!(!matches_date("2025-03-02T21:59:59Z".parse().expect("ts"), &filters, now));
    }

    #[test]
    fn custom_range_includes_whole_upper_day() {
        let now = clock("2025-06-01T00:00:00Z").now();
        let filters = custom(Some("2025-01-01"), Some("2025-01-31"));
        assert!(matches_date("2025-01-01T00:00:00Z".parse().expect("ts"), &filters, now));
        assert!(matches_date("2025-01-31T23:59:59Z".parse().expect("ts"), &filters, now));
        assert!(!matches_date("2025-02-01T00:00:00Z".parse().expect("ts"), &filters, now));
        assert!(!matches_date("2024-12-31T23:59:59Z".parse().expect("ts"), &filters, now));
    }

    #[test]
    fn custom_range_missing_bounds_are_open() {
        let now = clock("2025-06-01T00:00:00Z").now();
        let only_from = custom(Some("2025-01-10"), None);
        assert!(matches_date("2030-01-01T00:00:00Z".parse().expect("ts"), &only_from, now));
        assert!(!matches_date("2025-01-09T12:00:00Z".parse().expect("ts"), &only_from, now));

        let only_to = custom(None, Some("2025-01-10"));
        assert!(matches_date("1990-01-01T00:00:00Z".parse().expect("ts"), &only_to, now));
        assert!(!matches_date("2025-01-11T00:00:00Z".parse().expect("ts"), &only_to, now));
    }

    #[test]
    fn malformed_bounds_restrict_nothing() {
        let now = clock("2025-06-01T00:00:00Z").now();
        let filters = custom(Some("not-a-date"), Some("2025-02-30"));
        assert!(matches_date("1990-01-01T00:00:00Z".parse().expect("ts"), &filters, now));
        assert!(matches_date("2090-01-01T00:00:00Z".parse().expect("ts"), &filters, now));
    }

    #[test]
    fn out_of_range_upper_bound_restricts_nothing() {
        let log = vec![
            activity("a1", "p1", "c1", "2024-12-31T10:00:00Z"),
            activity("a2", "p1", "c1", "2025-01-01T10:00:00Z"),
        ];
        let clock = clock("2025-01-02T00:00:00-05:00");
        let filters = custom(Some("2025-01-01"), Some("+262142-12-31"));
        let ids: Vec<&str> = filter_activities(&log, &filters, &clock)
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ids, ["a2"]);

        let only_to = custom(None, Some("+262142-12-31"));
        assert_eq!(filter_activities(&log, &only_to, &clock).len(), 2);
    }

    #[test]
    fn selectors_filter_by_exact_id() {
        let log = vec![
            activity("a1", "p1", "c1", "2025-01-01T10:00:00Z"),
            activity("a2", "p2", "c1", "2025-01-02T10:00:00Z"),
            activity("a3", "p1", "c2", "2025-01-03T10:00:00Z"),
        ];
        let clock = clock("2025-06-01T00:00:00Z");

        let by_project = Filters {
            project_id: Selector::Only(ProjectId::from("p1")),
            ..Filters::default()
        };
        let ids: Vec<&str> = filter_activities(&log, &by_project, &clock)
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ids, ["a1", "a3"]);

        let by_both = Filters {
            project_id: Selector::Only(ProjectId::from("p1")),
            collaborator_id: Selector::Only(CollaboratorId::from("c2")),
            ..Filters::default()
        };
        let ids: Vec<&str> = filter_activities(&log, &by_both, &clock)
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ids, ["a3"]);
    }

    #[test]
    fn empty_log_filters_to_empty() {
        let clock = clock("2025-06-01T00:00:00Z");
        assert!(filter_activities(&[], &Filters::default(), &clock).is_empty());
    }

    #[test]
    fn selector_parses_all_literal() {
        assert_eq!(Selector::<ProjectId>::parse(None), Selector::All);
        assert_eq!(Selector::<ProjectId>::parse(Some("all")), Selector::All);
        assert_eq!(Selector::<ProjectId>::parse(Some("")), Selector::All);
        assert_eq!(
            Selector::<ProjectId>::parse(Some("p9")),
            Selector::Only(ProjectId::from("p9"))
        );
    }

    #[test]
    fn filters_deserialize_from_form_payload() {
        let raw = r#"{
            "datePreset": "custom",
            "dateFrom": "2025-01-01",
            "dateTo": "",
            "projectId": "all",
            "collaboratorId": "c7"
        }"#;
        let filters: Filters = serde_json::from_str(raw).expect("parse filters");
        assert_eq!(filters.date_preset, DatePreset::Custom);
        assert_eq!(filters.project_id, Selector::All);
        assert_eq!(filters.collaborator_id.label(), "c7");

        let empty: Filters = serde_json::from_str("{}").expect("parse empty filters");
        assert_eq!(empty, Filters::default());
    }

    #[test]
    fn describe_names_every_selector() {
        let filters = Filters {
            date_preset: DatePreset::Last7,
            collaborator_id: Selector::Only(CollaboratorId::from("c1")),
            ..Filters::default()
        };
        assert_eq!(
            filters.describe(),
            "Filters: period=last7, project=all, collaborator=c1"
        );
    }

    #[test]
    fn preset_parses_case_insensitively() {
        assert_eq!("LAST7".parse::<DatePreset>(), Ok(DatePreset::Last7));
        assert!("fortnight".parse::<DatePreset>().is_err());
    }
}
