use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::io::IsTerminal;
use std::path::Path;

use crate::recency::RecencyThresholds;
use crate::report::DateOptions;
use crate::report::editorial::EditorialGeometry;

pub const PROJECT_CONFIG_FILE: &str = "logbook.toml";

/// Settings read from `logbook.toml` next to the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub recency: RecencyThresholds,
    #[serde(default)]
    pub editorial: EditorialGeometry,
    #[serde(default)]
    pub dates: DateOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub user: UserConfig,
    pub resolved_output: String,
}

/// Load `logbook.toml` from `root`, falling back to defaults when absent.
///
/// # Errors
///
/// Fails when the file exists but cannot be read or parsed.
pub fn load_project_config(root: &Path) -> Result<ProjectConfig> {
    let path = root.join(PROJECT_CONFIG_FILE);
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config = toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded project config");
    Ok(config)
}

/// Load the per-user config from the platform config directory.
///
/// # Errors
///
/// Fails when the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };
    load_user_config_from(&config_dir.join("logbook/config.toml"))
}

fn load_user_config_from(path: &Path) -> Result<UserConfig> {
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Merge project config, user config and the environment.
///
/// # Errors
///
/// Propagates config read and parse failures.
pub fn resolve_config(root: &Path, cli_json: bool) -> Result<EffectiveConfig> {
    let project = load_project_config(root)?;
    let user = load_user_config()?;

    let env_format = env::var("FORMAT").ok();
    let resolved_output = resolve_output(cli_json, user.output.as_deref(), env_format.as_deref());

    Ok(EffectiveConfig {
        project,
        user,
        resolved_output,
    })
}

/// Canonical output mode name for a raw value, if it names one.
#[must_use]
pub fn normalize_output_mode(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pretty" | "human" => Some("pretty"),
        "text" | "plain" => Some("text"),
        "json" => Some("json"),
        _ => None,
    }
}

fn resolve_output(cli_json: bool, user_output: Option<&str>, env_format: Option<&str>) -> String {
    if cli_json {
        return "json".to_string();
    }

    if let Some(mode) = env_format.and_then(normalize_output_mode) {
        return mode.to_string();
    }

    if let Some(mode) = user_output.and_then(normalize_output_mode) {
        return mode.to_string();
    }

    if std::io::stdout().is_terminal() {
        "pretty".to_string()
    } else {
        "text".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_project_config_uses_defaults() {
        let root = tempfile::tempdir().expect("temp dir");
        let cfg = load_project_config(root.path()).expect("load should succeed");
        assert_eq!(cfg, ProjectConfig::default());
        assert_eq!(cfg.recency.ok_days, 7);
        assert_eq!(cfg.recency.warning_days, 10);
        assert!((cfg.editorial.heading_break - 740.0).abs() < f32::EPSILON);
        assert_eq!(cfg.dates.short_format, "%d/%m/%Y");
    }

    #[test]
    fn partial_project_config_keeps_other_defaults() {
        let root = tempfile::tempdir().expect("temp dir");
        std::fs::write(
            root.path().join(PROJECT_CONFIG_FILE),
            "[recency]\nok_days = 3\n\n[editorial]\nwrap_columns = 60\n",
        )
        .expect("write config");

        let cfg = load_project_config(root.path()).expect("load should succeed");
        assert_eq!(cfg.recency.ok_days, 3);
        assert_eq!(cfg.recency.warning_days, 10);
        assert_eq!(cfg.editorial.wrap_columns, 60);
        assert!((cfg.editorial.line_break - 760.0).abs() < f32::EPSILON);
        assert_eq!(cfg.dates, DateOptions::default());
    }

    #[test]
    fn malformed_project_config_names_the_file() {
        let root = tempfile::tempdir().expect("temp dir");
        std::fs::write(root.path().join(PROJECT_CONFIG_FILE), "[recency\nok_days = ")
            .expect("write config");

        let err = load_project_config(root.path()).expect_err("parse must fail");
        assert!(format!("{err}").contains("logbook.toml"));
    }

    #[test]
    fn user_config_reads_output() {
        let root = tempfile::tempdir().expect("temp dir");
        let path = root.path().join("config.toml");
        std::fs::write(&path, "output = \"json\"\n").expect("write config");

        let cfg = load_user_config_from(&path).expect("load should succeed");
        assert_eq!(cfg.output.as_deref(), Some("json"));
    }

    #[test]
    fn missing_user_config_is_default() {
        let root = tempfile::tempdir().expect("temp dir");
        let cfg = load_user_config_from(&root.path().join("absent.toml")).expect("load");
        assert!(cfg.output.is_none());
    }

    #[test]
    fn cli_json_overrides_env_and_config() {
        assert_eq!(resolve_output(true, Some("pretty"), Some("text")), "json");
    }

    #[test]
    fn env_beats_user_config() {
        assert_eq!(resolve_output(false, Some("json"), Some("text")), "text");
        assert_eq!(resolve_output(false, Some("json"), Some("bogus")), "json");
    }

    #[test]
    fn aliases_are_normalized() {
        assert_eq!(normalize_output_mode(" Human "), Some("pretty"));
        assert_eq!(normalize_output_mode("plain"), Some("text"));
        assert_eq!(normalize_output_mode("yaml"), None);
    }
}
