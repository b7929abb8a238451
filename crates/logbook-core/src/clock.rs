//! Injectable wall clock.
//!
//! The "last 7 days" window and recency classification both depend on the
//! current instant. The clock's UTC offset also defines the local calendar:
//! an activity's calendar date is its instant viewed in that offset.

use chrono::{DateTime, FixedOffset, Local};

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The host clock, in the host's local offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(DateTime<FixedOffset>);

impl FixedClock {
    #[must_use]
    pub const fn new(now: DateTime<FixedOffset>) -> Self {
        Self(now)
    }

    /// Parse an RFC 3339 instant, keeping its offset as the local calendar.
    ///
    /// # Errors
    ///
    /// Returns the chrono parse error when `raw` is not RFC 3339.
    pub fn parse(raw: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(raw).map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<FixedOffset> {
        (**self).now()
    }
}
