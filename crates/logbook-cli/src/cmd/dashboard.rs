//! `lb dashboard` — project cards with involved collaborators and the
//! filtered activities grouped by collaborator.

use std::io::Write;

use clap::Args;
use logbook_core::clock::Clock;
use logbook_core::dates;
use logbook_core::directory::MISSING_NAME;
use logbook_core::view::{DashboardView, ProjectCard, dashboard};
use serde::Serialize;

use super::Session;
use super::filter_args::FilterArgs;
use crate::output::{pretty_kv, pretty_section, render_mode};

/// Arguments for `lb dashboard`.
#[derive(Args, Debug, Default, Clone)]
pub struct DashboardArgs {
    #[command(flatten)]
    pub filters: FilterArgs,
}

#[derive(Debug, Serialize)]
struct DashboardOutput<'a> {
    filters: String,
    #[serde(flatten)]
    view: DashboardView<'a>,
    #[serde(skip)]
    lines: Vec<CardLines>,
}

/// Pre-formatted date text for one card.
#[derive(Debug, Default)]
struct CardLines {
    period: String,
    groups: Vec<Vec<String>>,
}

/// Execute `lb dashboard`.
pub fn run_dashboard(args: &DashboardArgs, session: &Session) -> anyhow::Result<()> {
    let clock = session.clock()?;
    let snapshot = session.snapshot(&clock)?;
    let filters = session.filters(&args.filters, &snapshot)?;
    let offset = *clock.now().offset();
    let pattern = session.config.dates.short_format.as_str();

    let view = dashboard(snapshot.report_input(&filters), &clock);
    let lines = view
        .cards
        .iter()
        .map(|card| card_lines(card, offset, pattern))
        .collect();

    let output = DashboardOutput {
        filters: filters.describe(),
        view,
        lines,
    };
    render_mode(session.output, &output, render_text, render_pretty)
}

fn card_lines(card: &ProjectCard<'_>, offset: chrono::FixedOffset, pattern: &str) -> CardLines {
    CardLines {
        period: format!(
            "{} → {}",
            dates::format_date(card.start_date, pattern),
            dates::format_date(card.end_date, pattern)
        ),
        groups: card
            .groups
            .iter()
            .map(|group| {
                group
                    .activities
                    .iter()
                    .map(|a| {
                        format!(
                            "{} — {}",
                            dates::format_short(a.created_at, offset, pattern),
                            a.text
                        )
                    })
                    .collect()
            })
            .collect(),
    }
}

fn heading(card: &ProjectCard<'_>) -> String {
    let mut heading = card.title.to_string();
    if !card.subtitle.is_empty() {
        heading.push_str(" — ");
        heading.push_str(card.subtitle);
    }
    if card.closed {
        heading.push_str(" [closed]");
    }
    heading
}

fn involved(card: &ProjectCard<'_>) -> String {
    if card.involved.is_empty() {
        MISSING_NAME.to_string()
    } else {
        card.involved.join(", ")
    }
}

fn render_text(output: &DashboardOutput<'_>, w: &mut dyn Write) -> std::io::Result<()> {
    for (card, lines) in output.view.cards.iter().zip(&output.lines) {
        writeln!(w, "{}\t{}\t{}", card.project_id, heading(card), lines.period)?;
        writeln!(w, "\tinvolved\t{}", involved(card))?;
        for (group, entries) in card.groups.iter().zip(&lines.groups) {
            for entry in entries {
                writeln!(w, "\t{}\t{}", group.name, entry)?;
            }
        }
    }
    Ok(())
}

fn render_pretty(output: &DashboardOutput<'_>, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "{}", output.filters)?;
    if output.view.cards.is_empty() {
        writeln!(w)?;
        return writeln!(w, "No projects.");
    }
    for (card, lines) in output.view.cards.iter().zip(&output.lines) {
        writeln!(w)?;
        pretty_section(w, &heading(card))?;
        pretty_kv(w, "Period", &lines.period)?;
        pretty_kv(w, "Involved", involved(card))?;
        if card.is_empty() {
            writeln!(w, "  No activities match the active filters.")?;
            continue;
        }
        for (group, entries) in card.groups.iter().zip(&lines.groups) {
            writeln!(w, "  {}", group.name)?;
            for entry in entries {
                writeln!(w, "    • {entry}")?;
            }
        }
    }
    Ok(())
}
