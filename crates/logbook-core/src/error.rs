use std::fmt;

/// Machine-readable error codes for scripts and agents driving the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InputNotFound,
    InputParseError,
    ConfigParseError,
    InvalidClock,
    InvalidFilter,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InputNotFound => "E1001",
            Self::InputParseError => "E1002",
            Self::ConfigParseError => "E1003",
            Self::InvalidClock => "E2001",
            Self::InvalidFilter => "E2002",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InputNotFound => "Snapshot file not found",
            Self::InputParseError => "Snapshot parse error",
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidClock => "Invalid --now timestamp",
            Self::InvalidFilter => "Invalid filter value",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InputNotFound => {
                Some("Pass --input <FILE> or set LOGBOOK_INPUT to a snapshot JSON file.")
            }
            Self::InputParseError => {
                Some("Check that the file holds projects, collaborators and activities in camelCase JSON.")
            }
            Self::ConfigParseError => Some("Fix syntax in logbook.toml and retry."),
            Self::InvalidClock => Some("Use RFC 3339, e.g. 2025-02-01T09:00:00+01:00."),
            Self::InvalidFilter => Some("Use --period all|last7|custom and dates as YYYY-MM-DD."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
