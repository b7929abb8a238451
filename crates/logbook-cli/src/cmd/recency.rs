//! `lb recency` — how recently each collaborator logged anything.
//!
//! Always computed over the whole log; report filters do not apply.

use std::io::Write;

use clap::Args;
use logbook_core::clock::Clock;
use logbook_core::dates;
use logbook_core::recency::{RecencyEntry, RecencyStatus, recency_report};
use serde::Serialize;

use super::Session;
use crate::output::{pretty_section, render_mode};

const LAST_SEEN_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Arguments for `lb recency`.
#[derive(Args, Debug, Default, Clone)]
pub struct RecencyArgs {
    /// Only list collaborators with this status.
    #[arg(long, value_name = "STATUS", value_parser = parse_status)]
    pub status: Option<RecencyStatus>,
}

fn parse_status(raw: &str) -> Result<RecencyStatus, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "ok" => Ok(RecencyStatus::Ok),
        "warning" => Ok(RecencyStatus::Warning),
        "stale" => Ok(RecencyStatus::Stale),
        "no-data" | "none" => Ok(RecencyStatus::NoData),
        other => Err(format!(
            "unknown status '{other}': expected ok, warning, stale, or no-data"
        )),
    }
}

#[derive(Debug, Serialize)]
struct RecencyListing<'a> {
    ok_days: i64,
    warning_days: i64,
    collaborators: Vec<RecencyEntry<'a>>,
    #[serde(skip)]
    last_seen: Vec<String>,
}

/// Execute `lb recency`.
pub fn run_recency(args: &RecencyArgs, session: &Session) -> anyhow::Result<()> {
    let clock = session.clock()?;
    let snapshot = session.snapshot(&clock)?;
    let offset = *clock.now().offset();
    let thresholds = session.config.recency;

    let mut collaborators = recency_report(
        &snapshot.activities,
        &snapshot.collaborators,
        &clock,
        thresholds,
    );
    if let Some(status) = args.status {
        collaborators.retain(|entry| entry.status == status);
    }
    let last_seen = collaborators
        .iter()
        .map(|entry| {
            entry.last_activity.map_or_else(
                || "no activity".to_string(),
                |ts| dates::format_short(ts, offset, LAST_SEEN_FORMAT),
            )
        })
        .collect();

    let listing = RecencyListing {
        ok_days: thresholds.ok_days,
        warning_days: thresholds.warning_days,
        collaborators,
        last_seen,
    };
    render_mode(session.output, &listing, render_text, render_pretty)
}

fn render_text(listing: &RecencyListing<'_>, w: &mut dyn Write) -> std::io::Result<()> {
    for (entry, last) in listing.collaborators.iter().zip(&listing.last_seen) {
        let days = entry
            .days_since
            .map_or_else(|| "-".to_string(), |d| d.to_string());
        writeln!(w, "{}\t{}\t{}\t{}", entry.name, entry.status, days, last)?;
    }
    Ok(())
}

fn render_pretty(listing: &RecencyListing<'_>, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(
        w,
        &format!(
            "Recency (ok ≤ {} days, warning ≤ {} days)",
            listing.ok_days, listing.warning_days
        ),
    )?;
    if listing.collaborators.is_empty() {
        return writeln!(w, "No collaborators.");
    }
    let width = listing
        .collaborators
        .iter()
        .map(|e| e.name.chars().count())
        .max()
        .unwrap_or(0);
    for (entry, last) in listing.collaborators.iter().zip(&listing.last_seen) {
        writeln!(
            w,
            "{} {:<width$}  {:<8} last: {}",
            marker(entry.status),
            entry.name,
            entry.status.as_str(),
            last
        )?;
    }
    Ok(())
}

const fn marker(status: RecencyStatus) -> char {
    match status {
        RecencyStatus::Ok => '●',
        RecencyStatus::Warning => '◐',
        RecencyStatus::Stale => '○',
        RecencyStatus::NoData => '·',
    }
}
