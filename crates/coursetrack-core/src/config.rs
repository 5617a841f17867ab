//! Configuration loading.
//!
//! Search order:
//! 1. an explicit `--config` path
//! 2. `coursetrack.toml` in the current directory
//! 3. `~/.config/coursetrack/config.toml`
//!
//! Relative paths inside a config file are resolved against the file's directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level coursetrack configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseTrackConfig {
    /// Course catalog TOML file.
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,
    /// Directory holding persisted progress.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Append completion events here as JSON lines.
    #[serde(default)]
    pub completion_log: Option<PathBuf>,
}

fn default_catalog() -> PathBuf {
    PathBuf::from("courses/installer.toml")
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".coursetrack")
}

impl Default for CourseTrackConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            data_dir: default_data_dir(),
            completion_log: None,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path, base: Option<&Path>) -> PathBuf {
    let resolved = PathBuf::from(resolve_env_vars(&path.to_string_lossy()));
    match base {
        Some(base) if resolved.is_relative() => base.join(resolved),
        _ => resolved,
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// `COURSETRACK_CATALOG` and `COURSETRACK_DATA_DIR` override the file.
pub fn load_config_from(path: Option<&Path>) -> Result<CourseTrackConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("coursetrack.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match &config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let parsed = toml::from_str::<CourseTrackConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            parsed
        }
        None => CourseTrackConfig::default(),
    };

    let base = config_path
        .as_deref()
        .and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty());
    config.catalog = resolve_path(&config.catalog, base);
    config.data_dir = resolve_path(&config.data_dir, base);
    config.completion_log = config
        .completion_log
        .as_deref()
        .map(|p| resolve_path(p, base));

    // Env overrides are taken as given, relative to the working directory
    if let Ok(catalog) = std::env::var("COURSETRACK_CATALOG") {
        config.catalog = PathBuf::from(catalog);
    }
    if let Ok(dir) = std::env::var("COURSETRACK_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("coursetrack"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_COURSETRACK_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_COURSETRACK_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_COURSETRACK_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        std::env::remove_var("_COURSETRACK_TEST_VAR");
    }

    #[test]
    fn resolved_values_are_not_expanded_again() {
        std::env::set_var("_COURSETRACK_NESTED_VAR", "${_COURSETRACK_NESTED_VAR}/x");
        assert_eq!(
            resolve_env_vars("${_COURSETRACK_NESTED_VAR}-${_COURSETRACK_UNSET_VAR}"),
            "${_COURSETRACK_NESTED_VAR}/x-"
        );
        std::env::remove_var("_COURSETRACK_NESTED_VAR");
    }

    #[test]
    fn default_config() {
        let config = CourseTrackConfig::default();
        assert_eq!(config.catalog, PathBuf::from("courses/installer.toml"));
        assert_eq!(config.data_dir, PathBuf::from(".coursetrack"));
        assert!(config.completion_log.is_none());
    }

    #[test]
    fn parse_config() {
        let toml_str = r#"
catalog = "courses/installer.toml"
data_dir = "/var/lib/coursetrack"
completion_log = "completions.jsonl"
"#;
        let config: CourseTrackConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.catalog, PathBuf::from("courses/installer.toml"));
        assert_eq!(
            config.completion_log,
            Some(PathBuf::from("completions.jsonl"))
        );
    }

    #[test]
    fn relative_paths_follow_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coursetrack.toml");
        std::fs::write(
            &path,
            "catalog = \"course.toml\"\ndata_dir = \"/abs/data\"\ncompletion_log = \"done.jsonl\"\n",
        )
        .unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.catalog, dir.path().join("course.toml"));
        assert_eq!(config.completion_log, Some(dir.path().join("done.jsonl")));
        if std::env::var("COURSETRACK_DATA_DIR").is_err() {
            assert_eq!(config.data_dir, PathBuf::from("/abs/data"));
        }
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let result = load_config_from(Some(Path::new("/definitely/not/here.toml")));
        assert!(result.is_err());
    }
}
