//! `lb activities` — the filtered log, newest first.

use std::io::Write;

use chrono::{DateTime, Utc};
use clap::Args;
use logbook_core::clock::Clock;
use logbook_core::dates;
use logbook_core::directory::{Directory, MISSING_NAME};
use logbook_core::filter::filter_activities;
use logbook_core::group::sort_newest_first;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use super::Session;
use super::filter_args::FilterArgs;
use crate::output::{pretty_rule, pretty_section, render_mode};

/// Arguments for `lb activities`.
#[derive(Args, Debug, Default, Clone)]
pub struct ActivitiesArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Show at most this many activities.
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ActivityRow<'a> {
    id: &'a str,
    date: String,
    project_id: &'a str,
    project: &'a str,
    collaborator_id: &'a str,
    collaborator: &'a str,
    text: &'a str,
    created_at: DateTime<Utc>,
}

/// Payload for `lb activities`.
#[derive(Debug, Serialize)]
struct ActivityListing<'a> {
    filters: String,
    total: usize,
    activities: Vec<ActivityRow<'a>>,
}

/// Execute `lb activities`.
pub fn run_activities(args: &ActivitiesArgs, session: &Session) -> anyhow::Result<()> {
    let clock = session.clock()?;
    let snapshot = session.snapshot(&clock)?;
    let filters = session.filters(&args.filters, &snapshot)?;
    let offset = *clock.now().offset();
    let pattern = &session.config.dates.short_format;

    let directory = Directory::new(&snapshot.projects, &snapshot.collaborators);
    let mut kept = filter_activities(&snapshot.activities, &filters, &clock);
    sort_newest_first(&mut kept);
    let total = kept.len();
    if let Some(limit) = args.limit {
        kept.truncate(limit);
    }

    let activities = kept
        .into_iter()
        .map(|a| ActivityRow {
            id: a.id.as_str(),
            date: dates::format_short(a.created_at, offset, pattern),
            project_id: a.project_id.as_str(),
            project: directory.project_title(&a.project_id).unwrap_or(MISSING_NAME),
            collaborator_id: a.collaborator_id.as_str(),
            collaborator: directory.collaborator_label(&a.collaborator_id),
            text: &a.text,
            created_at: a.created_at,
        })
        .collect();

    let listing = ActivityListing {
        filters: filters.describe(),
        total,
        activities,
    };

    render_mode(session.output, &listing, render_text, render_pretty)
}

fn render_text(listing: &ActivityListing<'_>, w: &mut dyn Write) -> std::io::Result<()> {
    for row in &listing.activities {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}",
            row.id, row.date, row.project, row.collaborator, row.text
        )?;
    }
    Ok(())
}

fn render_pretty(listing: &ActivityListing<'_>, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &listing.filters)?;
    if listing.activities.is_empty() {
        writeln!(w, "No activities match the active filters.")?;
        return Ok(());
    }
    let project_width = column_width(listing.activities.iter().map(|r| r.project));
    let name_width = column_width(listing.activities.iter().map(|r| r.collaborator));
    for row in &listing.activities {
        writeln!(
            w,
            "{}  {}  {}  {}",
            row.date,
            pad(row.project, project_width),
            pad(row.collaborator, name_width),
            row.text
        )?;
    }
    pretty_rule(w)?;
    if listing.activities.len() < listing.total {
        writeln!(w, "{} of {} activities", listing.activities.len(), listing.total)
    } else {
        writeln!(w, "{} activities", listing.total)
    }
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    values.map(UnicodeWidthStr::width).max().unwrap_or(0)
}

/// Left-align `text` in `width` terminal columns.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}
