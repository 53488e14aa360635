//! Configuration file discovery and loading.
//!
//! This module finds the config file for a run and parses it into a
//! [`SherylConfig`].

use crate::config::schema::SherylConfig;
use crate::error::{Result, SherylError};
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

/// File names probed, in order, when no explicit config file is given.
pub const CONFIG_FILE_NAMES: &[&str] = &["sheryl.yml", "sheryl.yaml", ".sheryl.yml", ".sheryl.yaml"];

/// Resolve the config file to load.
///
/// `config_override` may name a file or a directory. A directory (or the
/// `base_dir` when no override is given) is searched for the first of
/// [`CONFIG_FILE_NAMES`].
///
/// # Errors
///
/// Returns `ConfigNotFound` if nothing suitable exists.
pub fn find_config(base_dir: &Path, config_override: Option<&Path>) -> Result<PathBuf> {
    let search_dir = match config_override {
        Some(path) if path.is_dir() => path.to_path_buf(),
        Some(path) => {
            return if path.exists() {
                Ok(path.to_path_buf())
            } else {
                Err(SherylError::ConfigNotFound {
                    path: path.to_path_buf(),
                })
            };
        }
        None => base_dir.to_path_buf(),
    };

    CONFIG_FILE_NAMES
        .iter()
        .map(|name| search_dir.join(name))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| SherylError::ConfigNotFound {
            path: search_dir.join(CONFIG_FILE_NAMES[0]),
        })
}

/// Load a single config file and parse it into [`SherylConfig`].
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
/// Other read failures are wrapped with the file path.
pub fn load_config_file(path: &Path) -> Result<SherylConfig> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SherylError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => Err(e).with_context(|| format!("Failed to read config {}", path.display()))?,
    };

    parse_config(&content, path)
}

/// Parse YAML content into [`SherylConfig`].
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_config(content: &str, source_path: &Path) -> Result<SherylConfig> {
    if content.trim().is_empty() {
        return Ok(SherylConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| SherylError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Find and load the config for a run.
pub fn load_config(base_dir: &Path, config_override: Option<&Path>) -> Result<(PathBuf, SherylConfig)> {
    let path = find_config(base_dir, config_override)?;
    tracing::debug!("Loading config from {}", path.display());
    let config = load_config_file(&path)?;
    Ok((path, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn find_config_uses_default_name() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("sheryl.yml"), "steps: []").unwrap();

        let path = find_config(temp.path(), None).unwrap();
        assert_eq!(path, temp.path().join("sheryl.yml"));
    }

    #[test]
    fn find_config_falls_back_to_yaml_extension() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("sheryl.yaml"), "steps: []").unwrap();

        let path = find_config(temp.path(), None).unwrap();
        assert_eq!(path, temp.path().join("sheryl.yaml"));
    }

    #[test]
    fn find_config_prefers_yml_over_hidden() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("sheryl.yml"), "").unwrap();
        fs::write(temp.path().join(".sheryl.yml"), "").unwrap();

        let path = find_config(temp.path(), None).unwrap();
        assert_eq!(path, temp.path().join("sheryl.yml"));
    }

    #[test]
    fn find_config_accepts_explicit_file() {
        let temp = TempDir::new().unwrap();
        let custom = temp.path().join("pipeline.yaml");
        fs::write(&custom, "steps: []").unwrap();

        let path = find_config(Path::new("/unused"), Some(&custom)).unwrap();
        assert_eq!(path, custom);
    }

    #[test]
    fn find_config_searches_explicit_directory() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".sheryl.yaml"), "").unwrap();

        let path = find_config(Path::new("/unused"), Some(temp.path())).unwrap();
        assert_eq!(path, temp.path().join(".sheryl.yaml"));
    }

    #[test]
    fn find_config_reports_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = find_config(temp.path(), None);
        assert!(matches!(result, Err(SherylError::ConfigNotFound { .. })));

        let result = find_config(temp.path(), Some(&temp.path().join("nope.yml")));
        assert!(matches!(result, Err(SherylError::ConfigNotFound { .. })));
    }

    #[test]
    fn load_config_file_parses_valid_yaml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("sheryl.yml");
        fs::write(&config_path, "steps:\n  - name: a\n    cmd: echo a\n").unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.steps.len(), 1);
        assert_eq!(config.steps[0].name, "a");
    }

    #[test]
    fn load_config_file_returns_not_found_error() {
        let result = load_config_file(Path::new("/nonexistent/sheryl.yml"));
        assert!(matches!(result, Err(SherylError::ConfigNotFound { .. })));
    }

    #[test]
    fn load_config_file_wraps_read_failures_with_path() {
        let temp = TempDir::new().unwrap();
        let err = load_config_file(temp.path()).unwrap_err();

        assert!(matches!(err, SherylError::Other(_)));
        let message = err.to_string();
        assert!(message.contains("Failed to read config"), "{}", message);
        assert!(message.contains(&temp.path().display().to_string()));
    }

    #[test]
    fn parse_config_returns_parse_error_for_invalid_yaml() {
        let content = "invalid: yaml: content: [";
        let result = parse_config(content, Path::new("test.yml"));
        assert!(matches!(result, Err(SherylError::ConfigParseError { .. })));
    }

    #[test]
    fn parse_config_handles_empty_file() {
        let config = parse_config("", Path::new("sheryl.yml")).unwrap();
        assert!(config.steps.is_empty());
    }

    #[test]
    fn load_config_returns_resolved_path() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("sheryl.yml"), "steps: []").unwrap();

        let (path, config) = load_config(temp.path(), None).unwrap();
        assert_eq!(path, temp.path().join("sheryl.yml"));
        assert!(config.steps.is_empty());
    }
}
