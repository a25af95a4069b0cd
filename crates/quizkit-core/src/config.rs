//! Configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level quizkit configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizkitConfig {
    /// Directory scanned for quiz files.
    #[serde(default = "default_corpus_dir")]
    pub corpus_dir: PathBuf,
    /// Output directory for graded reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Report format used when `--format` is omitted.
    #[serde(default = "default_format")]
    pub default_format: String,
    /// Name used when an attempt carries none.
    #[serde(default = "default_participant")]
    pub participant: String,
}

fn default_corpus_dir() -> PathBuf {
    PathBuf::from("./quizzes")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./quizkit-results")
}
fn default_format() -> String {
    "text".to_string()
}
fn default_participant() -> String {
    "Anonymous".to_string()
}

impl Default for QuizkitConfig {
    fn default() -> Self {
        Self {
            corpus_dir: default_corpus_dir(),
            output_dir: default_output_dir(),
            default_format: default_format(),
            participant: default_participant(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Unset variables expand to the empty string. Expanded values are not
/// scanned again.
pub fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizkit.toml` in the current directory
/// 2. `~/.config/quizkit/config.toml`
///
/// `QUIZKIT_CORPUS_DIR` overrides `corpus_dir`.
pub fn load_config() -> Result<QuizkitConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizkitConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizkit.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizkitConfig::default(),
    };

    if let Ok(dir) = std::env::var("QUIZKIT_CORPUS_DIR") {
        if !dir.is_empty() {
            config.corpus_dir = PathBuf::from(dir);
        }
    }

    Ok(config)
}

/// Parse config TOML and expand `${VAR}` references in every string value.
pub fn parse_config(content: &str) -> Result<QuizkitConfig> {
    let mut config: QuizkitConfig = toml::from_str(content)?;
    config.corpus_dir = resolve_path(&config.corpus_dir);
    config.output_dir = resolve_path(&config.output_dir);
    config.default_format = resolve_env_vars(&config.default_format);
    config.participant = resolve_env_vars(&config.participant);
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizkit"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_QUIZKIT_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_QUIZKIT_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_QUIZKIT_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${_QUIZKIT_UNSET_VAR}x"), "x");
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        std::env::remove_var("_QUIZKIT_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_expand_values() {
        std::env::set_var("_QUIZKIT_SELF_REF", "${_QUIZKIT_SELF_REF}");
        assert_eq!(
            resolve_env_vars("a/${_QUIZKIT_SELF_REF}/b"),
            "a/${_QUIZKIT_SELF_REF}/b"
        );
        std::env::remove_var("_QUIZKIT_SELF_REF");
    }

    #[test]
    fn default_config() {
        let config = QuizkitConfig::default();
        assert_eq!(config.corpus_dir, PathBuf::from("./quizzes"));
        assert_eq!(config.default_format, "text");
        assert_eq!(config.participant, "Anonymous");
    }

    #[test]
    fn parse_partial_config() {
        std::env::set_var("_QUIZKIT_TEST_ROOT", "/srv");
        let config = parse_config(
            r#"
corpus_dir = "${_QUIZKIT_TEST_ROOT}/quizzes"
participant = "Grace"
"#,
        )
        .unwrap();
        assert_eq!(config.corpus_dir, PathBuf::from("/srv/quizzes"));
        assert_eq!(config.participant, "Grace");
        assert_eq!(config.output_dir, PathBuf::from("./quizkit-results"));
        std::env::remove_var("_QUIZKIT_TEST_ROOT");
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config_from(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "default_format = \"json\"\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.default_format, "json");
    }
}
