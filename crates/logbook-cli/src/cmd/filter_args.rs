//! Filter flags shared by the report commands.

use clap::Args;
use logbook_core::dates;
use logbook_core::filter::{DatePreset, Filters, Selector};

/// Flags that narrow a report. Unset flags keep the filters saved in the
/// snapshot unless `--reset` is given.
#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct FilterArgs {
    /// Date window: all, last7, or custom.
    #[arg(long, value_name = "PRESET")]
    pub period: Option<DatePreset>,

    /// First day of a custom window (inclusive). Implies `--period custom`.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub from: Option<String>,

    /// Last day of a custom window (inclusive). Implies `--period custom`.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub to: Option<String>,

    /// Only this project id (`all` for every project).
    #[arg(long, value_name = "ID")]
    pub project: Option<String>,

    /// Only this collaborator id (`all` for everyone).
    #[arg(long, value_name = "ID")]
    pub collaborator: Option<String>,

    /// Ignore filters saved in the snapshot.
    #[arg(long)]
    pub reset: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("--{flag} expects YYYY-MM-DD, got '{value}'")]
pub struct FilterArgError {
    pub flag: &'static str,
    pub value: String,
}

impl FilterArgs {
    /// Overlay these flags on `saved`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterArgError`] when `--from` or `--to` is not a calendar
    /// date.
    pub fn apply(&self, saved: &Filters) -> Result<Filters, FilterArgError> {
        let mut filters = if self.reset {
            Filters::default()
        } else {
            saved.clone()
        };

        if let Some(from) = &self.from {
            filters.date_from = Some(checked_date("from", from)?);
        }
        if let Some(to) = &self.to {
            filters.date_to = Some(checked_date("to", to)?);
        }
        match self.period {
            Some(preset) => filters.date_preset = preset,
            None if self.from.is_some() || self.to.is_some() => {
                filters.date_preset = DatePreset::Custom;
            }
            None => {}
        }
        if let Some(project) = &self.project {
            filters.project_id = Selector::parse(Some(project.as_str()));
        }
        if let Some(collaborator) = &self.collaborator {
            filters.collaborator_id = Selector::parse(Some(collaborator.as_str()));
        }
        Ok(filters)
    }
}

fn checked_date(flag: &'static str, raw: &str) -> Result<String, FilterArgError> {
    dates::parse_ymd(raw)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .ok_or_else(|| FilterArgError {
            flag,
            value: raw.to_string(),
        })
}
