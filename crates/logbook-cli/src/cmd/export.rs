//! `lb export` — the tabular and editorial report documents.
//!
//! JSON output is the document model itself, ready for an external
//! renderer. Text and pretty output draw the model in the terminal.

use std::io::Write;

use clap::{Args, ValueEnum};
use logbook_core::report::editorial::{self, DrawOp, EditorialDocument, TextRole};
use logbook_core::report::tabular::{self, Cell, TabularDocument};
use unicode_width::UnicodeWidthStr;

use super::Session;
use super::filter_args::FilterArgs;
use crate::output::{OutputMode, pretty_rule, render, render_mode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportKind {
    /// Three-column table with merged cells.
    Tabular,
    /// Narrative pages with headings and bullets.
    Editorial,
}

/// Arguments for `lb export`.
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Document shape to produce.
    #[arg(value_enum)]
    pub kind: ExportKind,

    #[command(flatten)]
    pub filters: FilterArgs,
}

/// Execute `lb export`.
pub fn run_export(args: &ExportArgs, session: &Session) -> anyhow::Result<()> {
    let clock = session.clock()?;
    let snapshot = session.snapshot(&clock)?;
    let filters = session.filters(&args.filters, &snapshot)?;
    let input = snapshot.report_input(&filters);
    let config = &session.config;

    match args.kind {
        ExportKind::Tabular => {
            let doc = tabular::layout(input, &clock, &config.dates);
            tracing::info!(rows = doc.row_count(), "tabular export ready");
            render_mode(session.output, &doc, render_table_text, render_table_pretty)
        }
        ExportKind::Editorial => {
            let doc = editorial::layout(input, &clock, &config.dates, &config.editorial);
            tracing::info!(
                pages = doc.page_count(),
                bullets = doc.bullet_count(),
                "editorial export ready"
            );
            let banners = session.output == OutputMode::Pretty;
            render(session.output, &doc, |doc, w| render_pages(doc, banners, w))
        }
    }
}

fn render_table_text(doc: &TabularDocument, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "{}", doc.title)?;
    writeln!(w, "{}", doc.filter_header)?;
    writeln!(w, "{}", doc.columns.join("\t"))?;
    for row in &doc.rows {
        writeln!(
            w,
            "{}\t{}\t{}",
            row.project.text(),
            row.activity,
            row.collaborator.text()
        )?;
    }
    Ok(())
}

fn render_table_pretty(doc: &TabularDocument, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "{}", doc.title)?;
    writeln!(w, "{}", doc.filter_header)?;
    writeln!(w)?;

    let widths = [
        column_width(doc.columns[0], doc.rows.iter().map(|r| &r.project)),
        doc.rows
            .iter()
            .map(|r| r.activity.width())
            .chain([doc.columns[1].width()])
            .max()
            .unwrap_or(0),
        column_width(doc.columns[2], doc.rows.iter().map(|r| &r.collaborator)),
    ];

    write_row(w, &widths, doc.columns)?;
    writeln!(
        w,
        "{}",
        widths
            .iter()
            .map(|width| "-".repeat(*width + 2))
            .collect::<Vec<_>>()
            .join("+")
    )?;
    for (i, row) in doc.rows.iter().enumerate() {
        // A rule above each new project block.
        if i > 0 && matches!(row.project, Cell::Spanning { .. }) {
            writeln!(
                w,
                "{}",
                widths
                    .iter()
                    .enumerate()
                    .map(|(col, width)| {
                        let fill = if col == 0 { '-' } else { ' ' };
                        fill.to_string().repeat(*width + 2)
                    })
                    .collect::<Vec<_>>()
                    .join("+")
            )?;
        }
        write_row(
            w,
            &widths,
            [row.project.text(), &row.activity, row.collaborator.text()],
        )?;
    }
    Ok(())
}

fn column_width<'a>(header: &str, cells: impl Iterator<Item = &'a Cell>) -> usize {
    cells
        .map(|c| c.text().width())
        .chain([header.width()])
        .max()
        .unwrap_or(0)
}

fn write_row(w: &mut dyn Write, widths: &[usize; 3], cells: [&str; 3]) -> std::io::Result<()> {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(text, width)| {
            let fill = width.saturating_sub(text.width());
            format!(" {text}{} ", " ".repeat(fill))
        })
        .collect();
    writeln!(w, "{}", padded.join("|").trim_end())
}

fn indent(role: TextRole) -> usize {
    match role {
        TextRole::Title
        | TextRole::FilterHeader
        | TextRole::ProjectHeading
        | TextRole::ProjectPeriod => 0,
        TextRole::CollaboratorHeading => 2,
        TextRole::Bullet => 4,
        TextRole::Continuation => 6,
    }
}

fn render_pages(doc: &EditorialDocument, banners: bool, w: &mut dyn Write) -> std::io::Result<()> {
    for page in &doc.pages {
        if banners {
            writeln!(w, "── page {} ──", page.number)?;
        } else if page.number > 1 {
            // Form feed between pages keeps text output printable.
            writeln!(w, "\x0c")?;
        }
        for op in &page.ops {
            match op {
                DrawOp::Text { role, text, .. } => {
                    writeln!(w, "{:indent$}{text}", "", indent = indent(*role))?;
                }
                DrawOp::Rule { .. } => pretty_rule(w)?,
            }
        }
    }
    Ok(())
}
