//! Command handlers for `lb`.

pub mod activities;
pub mod completions;
pub mod dashboard;
pub mod export;
pub mod filter_args;
pub mod recency;

use std::path::PathBuf;

use anyhow::Context as _;
use logbook_core::clock::{Clock, FixedClock, SystemClock};
use logbook_core::config::ProjectConfig;
use logbook_core::error::ErrorCode;
use logbook_core::filter::Filters;
use logbook_core::snapshot::Snapshot;
use tracing::{debug, warn};

use crate::output::{CliError, OutputMode, render_error};
use filter_args::FilterArgs;

/// Everything a command needs besides its own arguments.
#[derive(Debug, Clone)]
pub struct Session {
    pub input: PathBuf,
    pub now: Option<String>,
    pub output: OutputMode,
    pub config: ProjectConfig,
}

impl Session {
    /// Read and parse the snapshot named by `--input`. Timestamps written
    /// without an offset are read in the clock's offset.
    ///
    /// # Errors
    ///
    /// Fails when the file is missing, unreadable, or not a snapshot.
    pub fn snapshot(&self, clock: &FixedClock) -> anyhow::Result<Snapshot> {
        let path = &self.input;
        if !path.exists() {
            return Err(fail(
                self.output,
                ErrorCode::InputNotFound,
                path.display().to_string(),
            ));
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let snapshot = Snapshot::from_json_at(&raw, *clock.now().offset())
            .map_err(|e| fail(self.output, e.error_code(), format!("{}: {e}", path.display())))?;
        debug!(
            path = %path.display(),
            projects = snapshot.projects.len(),
            collaborators = snapshot.collaborators.len(),
            activities = snapshot.activities.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    /// The clock for this run: `--now` if given, otherwise the host clock
    /// read once so every step of a command sees the same instant.
    ///
    /// # Errors
    ///
    /// Fails when `--now` is not RFC 3339.
    pub fn clock(&self) -> anyhow::Result<FixedClock> {
        match self.now.as_deref() {
            None => Ok(FixedClock::new(SystemClock.now())),
            Some(raw) => FixedClock::parse(raw)
                .map_err(|e| fail(self.output, ErrorCode::InvalidClock, format!("'{raw}': {e}"))),
        }
    }

    /// Filter flags laid over the filters saved in `snapshot`.
    ///
    /// # Errors
    ///
    /// Fails when a date flag is malformed.
    pub fn filters(&self, args: &FilterArgs, snapshot: &Snapshot) -> anyhow::Result<Filters> {
        let filters = args
            .apply(&snapshot.filters)
            .map_err(|e| fail(self.output, ErrorCode::InvalidFilter, e.to_string()))?;
        debug!(filters = %filters.describe(), "resolved filters");
        Ok(filters)
    }
}

/// Report `code` on stderr in the active output mode and return the error
/// for the caller to propagate.
pub fn fail(output: OutputMode, code: ErrorCode, detail: impl AsRef<str>) -> anyhow::Error {
    let err = CliError::from_code(code, detail);
    if let Err(render_err) = render_error(output, &err) {
        warn!(error = %render_err, "failed to render error");
    }
    anyhow::anyhow!("{} ({code})", err.message)
}
