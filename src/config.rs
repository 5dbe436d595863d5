use crate::locator::{DEFAULT_GHOST_METHODS, DetectionPolicy, MethodFilter};
use crate::selector::{DEFAULT_EXTENSIONS, DEFAULT_IGNORED_DIRS, FileSelector};
use anyhow::{Context, Result};
use log::warn;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const CONFIG_FILE_NAME: &str = "logboss.toml";

#[derive(Debug, Default, Deserialize)]
pub struct LogbossConfig {
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub files: FilesConfig,
}

#[derive(Debug, Deserialize)]
pub struct DetectionConfig {
    /// Empty means every `console.*` call counts as live.
    #[serde(default)]
    pub live_methods: Vec<String>,
    #[serde(default = "default_ghost_methods")]
    pub ghost_methods: Vec<String>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            live_methods: Vec::new(),
            ghost_methods: default_ghost_methods(),
        }
    }
}

fn default_ghost_methods() -> Vec<String> {
    DEFAULT_GHOST_METHODS.iter().map(|m| m.to_string()).collect()
}

impl DetectionConfig {
    pub fn policy(&self) -> DetectionPolicy {
        let live_methods = valid_methods(&self.live_methods);
        let live = if live_methods.is_empty() {
            MethodFilter::Any
        } else {
            MethodFilter::Only(live_methods)
        };
        DetectionPolicy {
            live,
            ghost_methods: valid_methods(&self.ghost_methods),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FilesConfig {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_ignore_dirs")]
    pub ignore_dirs: Vec<String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            ignore_dirs: default_ignore_dirs(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
}

fn default_ignore_dirs() -> Vec<String> {
    DEFAULT_IGNORED_DIRS.iter().map(|dir| dir.to_string()).collect()
}

impl FilesConfig {
    /// CLI extensions win over the config file when given.
    pub fn selector(&self, cli_extensions: &[String]) -> FileSelector {
        let extensions = if cli_extensions.is_empty() {
            self.extensions.clone()
        } else {
            cli_extensions.to_vec()
        };
        FileSelector::new(extensions, self.ignore_dirs.clone())
    }
}

pub fn load() -> Result<LogbossConfig> {
    let current_dir = std::env::current_dir()?;
    let Some(path) = find_config_path(&current_dir) else {
        return Ok(LogbossConfig::default());
    };
    load_from(&path)
}

pub fn load_from(path: &Path) -> Result<LogbossConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;
    Ok(config)
}

fn find_config_path(start_dir: &Path) -> Option<PathBuf> {
    let mut current = Some(start_dir);
    while let Some(dir) = current {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        current = dir.parent();
    }
    None
}

static METHOD_NAME: OnceLock<Regex> = OnceLock::new();

fn method_name_regex() -> &'static Regex {
    METHOD_NAME
        .get_or_init(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid method regex"))
}

fn valid_methods(values: &[String]) -> Vec<String> {
    let mut methods: Vec<String> = Vec::new();
    for value in values {
        let value = value.trim();
        if method_name_regex().is_match(value) {
            if !methods.iter().any(|m| m == value) {
                methods.push(value.to_string());
            }
        } else {
            warn!("Ignoring invalid console method name '{}'", value);
        }
    }
    methods
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: LogbossConfig = toml::from_str("").unwrap();
        let policy = config.detection.policy();
        assert_eq!(policy, DetectionPolicy::default());
        assert_eq!(config.files.extensions, vec!["js", "ts", "jsx", "tsx"]);
        assert_eq!(config.files.ignore_dirs, vec!["node_modules"]);
    }

    #[test]
    fn detection_lists_are_independent() {
        let config: LogbossConfig = toml::from_str(
            r#"
[detection]
live_methods = ["log", "error"]
ghost_methods = ["log", "table", "not valid", "log"]
"#,
        )
        .unwrap();
        let policy = config.detection.policy();
        assert_eq!(
            policy.live,
            MethodFilter::Only(vec!["log".to_string(), "error".to_string()])
        );
        assert_eq!(policy.ghost_methods, vec!["log", "table"]);
    }

    #[test]
    fn cli_extensions_override_config() {
        let config: LogbossConfig = toml::from_str("[files]\nextensions = [\"js\"]\n").unwrap();
        let from_config = config.files.selector(&[]);
        assert!(from_config.is_source_file(Path::new("a.js")));
        assert!(!from_config.is_source_file(Path::new("a.ts")));

        let from_cli = config.files.selector(&["ts".to_string()]);
        assert!(from_cli.is_source_file(Path::new("a.ts")));
        assert!(!from_cli.is_source_file(Path::new("a.js")));
    }

    #[test]
    fn malformed_config_reports_path() {
        let dir = std::env::temp_dir().join(format!("logboss_cfg_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[detection]\nlive_methods = 3\n").unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }
}
