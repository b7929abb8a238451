//! Shared output layer for pretty/text/JSON parity across all CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its output
//! accordingly: pretty output for humans, compact text for pipes, or stable
//! JSON for an external renderer.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format` flag
//! 2. hidden `--json` flag
//! 3. `FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 4. `output` in the user config
//! 5. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.
//!
//! Steps 2 to 5 are resolved by [`logbook_core::config::resolve_config`].

use clap::ValueEnum;
use logbook_core::error::ErrorCode;
use serde::Serialize;
use std::io::{self, Write};

/// Shared width for human pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 72;

/// Write a horizontal separator used by pretty human output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// Render a left-aligned key/value line in human output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<12} {}", format!("{key}:"), value.as_ref())
}

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-optimized output (tables, sections, visual framing).
    Pretty,
    /// Plain text for pipes and scripts.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    /// Returns `true` if JSON output was requested.
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }

    /// Returns `true` if pretty output was requested.
    pub const fn is_pretty(self) -> bool {
        matches!(self, Self::Pretty)
    }

    /// Map a canonical mode name; unknown names read as text.
    pub fn from_name(name: &str) -> Self {
        match name {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            _ => Self::Text,
        }
    }
}

/// Apply the `--format` flag over an already resolved mode name.
pub fn resolve_output_mode(format_flag: Option<OutputMode>, resolved: &str) -> OutputMode {
    format_flag.unwrap_or_else(|| OutputMode::from_name(resolved))
}

/// Mode to use before config has loaded, e.g. to report a config error.
pub const fn fallback_output_mode(format_flag: Option<OutputMode>, json_flag: bool) -> OutputMode {
    match (format_flag, json_flag) {
        (Some(mode), _) => mode,
        (None, true) => OutputMode::Json,
        (None, false) => OutputMode::Text,
    }
}

/// A structured error with optional suggestion and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Machine-readable error code (`E####`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    /// Create a simple error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            error_code: None,
        }
    }

    /// Create an error carrying a stable code and its hint.
    pub fn from_code(code: ErrorCode, detail: impl AsRef<str>) -> Self {
        Self {
            message: format!("{}: {}", code.message(), detail.as_ref()),
            suggestion: code.hint().map(str::to_string),
            error_code: Some(code.code().to_string()),
        }
    }
}

/// Render a serializable value to stdout in the requested format.
///
/// In JSON mode, the value is serialized with `serde_json`. In pretty/text mode,
/// the provided `human_fn` closure is called to produce text output.
/// For distinct text/pretty rendering, use [`render_mode`].
pub fn render<T: Serialize>(
    mode: OutputMode,
    value: &T,
    human_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_to(&mut out, mode, value, human_fn)
}

fn render_to<T: Serialize>(
    out: &mut dyn Write,
    mode: OutputMode,
    value: &T,
    human_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            human_fn(value, out)?;
        }
    }
    Ok(())
}

/// Render a serializable value with explicit pretty/text renderers.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Pretty => render(mode, value, pretty_fn),
        OutputMode::Text | OutputMode::Json => render(mode, value, text_fn),
    }
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    render_error_to(&mut out, mode, error)
}

fn render_error_to(out: &mut dyn Write, mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({
                "error": error,
            });
            serde_json::to_writer_pretty(&mut *out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            match error.error_code {
                Some(ref code) => writeln!(out, "error[{code}]: {}", error.message)?,
                None => writeln!(out, "error: {}", error.message)?,
            }
            if let Some(ref suggestion) = error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── OutputMode ──────────────────────────────────────────────────────────

    #[test]
    fn output_mode_predicates() {
        assert!(OutputMode::Json.is_json());
        assert!(!OutputMode::Pretty.is_json());
        assert!(OutputMode::Pretty.is_pretty());
        assert!(!OutputMode::Text.is_pretty());
    }

    #[test]
    fn from_name_maps_canonical_names() {
        assert_eq!(OutputMode::from_name("json"), OutputMode::Json);
        assert_eq!(OutputMode::from_name("pretty"), OutputMode::Pretty);
        assert_eq!(OutputMode::from_name("text"), OutputMode::Text);
        assert_eq!(OutputMode::from_name("???"), OutputMode::Text);
    }

    // ── resolution ──────────────────────────────────────────────────────────

    #[test]
    fn format_flag_wins_over_resolved_mode() {
        assert_eq!(
            resolve_output_mode(Some(OutputMode::Text), "json"),
            OutputMode::Text
        );
        assert_eq!(resolve_output_mode(None, "pretty"), OutputMode::Pretty);
    }

    #[test]
    fn fallback_mode_honours_flags() {
        assert_eq!(fallback_output_mode(None, true), OutputMode::Json);
        assert_eq!(
            fallback_output_mode(Some(OutputMode::Pretty), true),
            OutputMode::Pretty
        );
        assert_eq!(fallback_output_mode(None, false), OutputMode::Text);
    }

    // ── CliError ────────────────────────────────────────────────────────────

    #[test]
    fn cli_error_simple() {
        let err = CliError::new("oops");
        assert_eq!(err.message, "oops");
        assert!(err.suggestion.is_none());
        assert!(err.error_code.is_none());
    }

    #[test]
    fn cli_error_from_code_carries_hint() {
        let err = CliError::from_code(ErrorCode::InvalidClock, "yesterday");
        assert_eq!(err.message, "Invalid --now timestamp: yesterday");
        assert_eq!(err.error_code.as_deref(), Some("E2001"));
        assert!(err.suggestion.is_some());
    }

    // ── rendering ───────────────────────────────────────────────────────────

    #[test]
    fn render_json_output() {
        #[derive(Serialize)]
        struct TestData {
            name: String,
            count: u32,
        }
        let data = TestData {
            name: "test".into(),
            count: 42,
        };
        let mut buf = Vec::new();
        render_to(&mut buf, OutputMode::Json, &data, |_, _| Ok(())).expect("render");
        let value: serde_json::Value = serde_json::from_slice(&buf).expect("valid JSON");
        assert_eq!(value["count"], 42);
    }

    #[test]
    fn render_text_calls_human_fn() {
        #[derive(Serialize)]
        struct TestData {
            val: u32,
        }
        let data = TestData { val: 99 };
        let mut buf = Vec::new();
        render_to(&mut buf, OutputMode::Text, &data, |d, w| writeln!(w, "val={}", d.val))
            .expect("render");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "val=99\n");
    }

    #[test]
    fn render_error_json_wraps_error() {
        let err = CliError::from_code(ErrorCode::InputNotFound, "missing.json");
        let mut buf = Vec::new();
        render_error_to(&mut buf, OutputMode::Json, &err).expect("render");
        let value: serde_json::Value = serde_json::from_slice(&buf).expect("valid JSON");
        assert_eq!(value["error"]["error_code"], "E1001");
    }

    #[test]
    fn render_error_text_shows_code_and_suggestion() {
        let err = CliError::from_code(ErrorCode::ConfigParseError, "logbook.toml");
        let mut buf = Vec::new();
        render_error_to(&mut buf, OutputMode::Text, &err).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.starts_with("error[E1003]: Config file parse error"));
        assert!(text.contains("suggestion:"));
    }

    #[test]
    fn pretty_helpers_write_lines() {
        let mut buf = Vec::new();
        pretty_section(&mut buf, "Recency").expect("write");
        pretty_kv(&mut buf, "period", "all").expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Recency");
        assert_eq!(lines[1].len(), PRETTY_RULE_WIDTH);
        assert_eq!(lines[2], "period:      all");
    }
}
