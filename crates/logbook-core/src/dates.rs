//! Calendar helpers.
//!
//! Date-only values (`YYYY-MM-DD`) are [`NaiveDate`]s and are never parsed as
//! UTC instants. Instants are projected into a local offset before their
//! calendar date is taken, so a late-evening activity stays on its own day.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use std::fmt::{self, Write};

/// Default short date format (`31/01/2025`).
pub const SHORT_DATE_FORMAT: &str = "%d/%m/%Y";

const DAY_MS: i64 = 86_400_000;

/// Calendar date of `ts` as seen in `offset`.
#[must_use]
pub fn local_date(ts: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    ts.with_timezone(&offset).date_naive()
}

/// Interpret a wall-clock time in `offset`.
///
/// `None` when the instant falls outside chrono's representable range.
#[must_use]
pub fn at_offset(local: NaiveDateTime, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let utc = local.checked_sub_signed(TimeDelta::seconds(i64::from(offset.local_minus_utc())))?;
    Some(DateTime::from_naive_utc_and_offset(utc, offset))
}

/// Midnight at the start of `date` in `offset`.
#[must_use]
pub fn start_of_day(date: NaiveDate, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    at_offset(date.and_time(NaiveTime::MIN), offset)
}

/// `23:59:59` of `date` in `offset`, the last instant an inclusive upper
/// date bound admits.
#[must_use]
pub fn end_of_day(date: NaiveDate, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let last_second = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    at_offset(date.and_time(last_second), offset)
}

/// Parse a timestamp written without an offset, e.g. `2025-01-31T23:59:59`
/// or `2025-01-31T23:59:59.250`. Minutes-only times are accepted too.
#[must_use]
pub fn parse_wall_clock(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .ok()
}

/// Parse a `YYYY-MM-DD` bound. Anything else yields `None`.
#[must_use]
pub fn parse_ymd(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Format the local calendar date of `ts` with a strftime pattern.
///
/// A pattern chrono cannot render falls back to [`SHORT_DATE_FORMAT`].
#[must_use]
pub fn format_short(ts: DateTime<Utc>, offset: FixedOffset, pattern: &str) -> String {
    let local = ts.with_timezone(&offset);
    render_or(local.format(pattern), || local.format(SHORT_DATE_FORMAT))
}

/// Format a date-only value, e.g. a project's start or end date.
#[must_use]
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    let midnight = date.and_time(NaiveTime::MIN);
    render_or(midnight.format(pattern), || date.format(SHORT_DATE_FORMAT))
}

fn render_or<F: fmt::Display>(formatted: impl fmt::Display, fallback: impl FnOnce() -> F) -> String {
    let mut out = String::new();
    if write!(out, "{formatted}").is_err() {
        tracing::debug!("unrenderable date pattern, using default");
        out.clear();
        let _ = write!(out, "{}", fallback());
    }
    out
}

/// Whole days elapsed from `ts` to `now`, rounded down.
///
/// Future instants give negative values (`-1` for anything up to a day
/// ahead).
#[must_use]
pub fn days_since(ts: DateTime<Utc>, now: DateTime<FixedOffset>) -> i64 {
    let elapsed = now.with_timezone(&Utc) - ts;
    elapsed.num_milliseconds().div_euclid(DAY_MS)
}
