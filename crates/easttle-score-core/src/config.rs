//! Configuration loading and discovery.
//!
//! Settings come from, lowest precedence first:
//! 1. Built-in defaults
//! 2. The user config file (`~/.config/easttle-score/config.<ext>` on Linux)
//! 3. Project config files found by walking up from the working directory
//! 4. Files passed explicitly (`--config`)
//! 5. `EASTTLE_SCORE_*` environment variables
//!
//! # Project config names
//!
//! In each directory the loader looks for, lowest precedence first:
//! `.easttle.<ext>`, `easttle.<ext>`, `.easttle-score.<ext>`,
//! `easttle-score.<ext>`, where `<ext>` is `toml`, `yaml`, `yml` or `json`.
//! Only the closest directory holding any of them contributes, and the walk
//! stops at a directory containing `.git`.
//!
//! Nested keys map to environment variables with a double underscore, so
//! `EASTTLE_SCORE_FEEDBACK__AUDIENCE=parent` sets `feedback.audience`.
//!
//! # Example
//! ```no_run
//! use camino::Utf8PathBuf;
//! use easttle_score_core::config::ConfigLoader;
//!
//! let cwd = Utf8PathBuf::try_from(std::env::current_dir().unwrap()).unwrap();
//! let (config, _sources) = ConfigLoader::new()
//!     .with_project_search(&cwd)
//!     .load()
//!     .unwrap();
//! println!("history lives in {}", config.resolve_data_dir().unwrap());
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::DEFAULT_MAX_INPUT_BYTES;
use crate::error::{ConfigError, ConfigResult, StoreError, StoreResult};
use crate::feedback::{Audience, Depth};

/// Default audience and depth for displayed feedback.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Who feedback is shown for (student, teacher, parent).
    pub audience: Audience,
    /// How much detail to show (simple, standard, comprehensive).
    pub depth: Depth,
}

/// The configuration for easttle-score.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Log level (debug, info, warn, error).
    pub log_level: LogLevel,
    /// Directory for JSONL log files.
    pub log_dir: Option<Utf8PathBuf>,
    /// Directory holding assessment history and the custom chart.
    ///
    /// Defaults to the platform data directory.
    pub data_dir: Option<Utf8PathBuf>,
    /// Maximum input size in bytes (default: 5 MiB).
    pub max_input_bytes: Option<usize>,
    /// Ignore `max_input_bytes` and accept input of any size.
    pub disable_input_limit: bool,
    /// Year level (0–8) used for next steps when none is given per run.
    pub year_level: Option<u8>,
    /// Feedback display defaults.
    pub feedback: FeedbackConfig,
}

impl Config {
    /// Effective input size limit, `None` when disabled.
    pub fn input_limit(&self) -> Option<usize> {
        if self.disable_input_limit {
            None
        } else {
            Some(self.max_input_bytes.unwrap_or(DEFAULT_MAX_INPUT_BYTES))
        }
    }

    /// Directory for stored data: `data_dir` if set, otherwise the
    /// platform data directory.
    pub fn resolve_data_dir(&self) -> StoreResult<Utf8PathBuf> {
        self.data_dir
            .clone()
            .or_else(user_data_dir)
            .ok_or(StoreError::NoDataDir)
    }
}

/// Log level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging.
    Debug,
    /// Normal operation (default).
    #[default]
    Info,
    /// Potential problems only.
    Warn,
    /// Failures only.
    Error,
}

impl LogLevel {
    /// Lowercase name, usable as an `EnvFilter` directive.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Which configuration files were loaded.
///
/// Returned with [`Config`] from [`ConfigLoader::load()`] so commands can
/// report them without searching again.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    /// Project files, lowest precedence first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_files: Vec<Utf8PathBuf>,
    /// User config file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_file: Option<Utf8PathBuf>,
    /// Files given with `--config`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// The highest-precedence file that was loaded, if any.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.explicit_files
            .last()
            .map(Utf8PathBuf::as_path)
            .or_else(|| self.project_files.last().map(Utf8PathBuf::as_path))
            .or(self.user_file.as_deref())
    }
}

const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Name used for platform directories.
const APP_NAME: &str = "easttle-score";

/// Project config base names, lowest precedence first.
const APP_NAMES: &[&str] = &["easttle", "easttle-score"];

const ENV_PREFIX: &str = "EASTTLE_SCORE_";

/// Builder that discovers and merges configuration sources.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    project_search_root: Option<Utf8PathBuf>,
    include_user_config: bool,
    boundary_marker: Option<String>,
    explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigLoader {
    /// A loader that reads the user config and stops at `.git`.
    pub fn new() -> Self {
        Self {
            project_search_root: None,
            include_user_config: true,
            boundary_marker: Some(".git".to_string()),
            explicit_files: Vec::new(),
        }
    }

    /// Walk up from `path` looking for project config files.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.project_search_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Include or skip the user config file.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.include_user_config = include;
        self
    }

    /// Stop the upward walk at a directory containing `marker`.
    pub fn with_boundary_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.boundary_marker = Some(marker.into());
        self
    }

    /// Walk all the way to the filesystem root.
    pub fn without_boundary_marker(mut self) -> Self {
        self.boundary_marker = None;
        self
    }

    /// Add a file to merge after discovered files. Later files win.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Merge every source into a [`Config`].
    #[tracing::instrument(skip(self), fields(search_root = ?self.project_search_root))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        tracing::debug!("loading configuration");
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let mut sources = ConfigSources::default();

        if self.include_user_config
            && let Some(user_config) = self.find_user_config()
        {
            figment = Self::merge_file(figment, &user_config);
            sources.user_file = Some(user_config);
        }

        if let Some(ref root) = self.project_search_root {
            let project_configs = self.find_project_configs(root);
            for pc in &project_configs {
                figment = Self::merge_file(figment, pc);
            }
            sources.project_files = project_configs;
        }

        for file in &self.explicit_files {
            figment = Self::merge_file(figment, file);
        }
        sources.explicit_files = self.explicit_files;

        // EASTTLE_SCORE_YEAR_LEVEL=3, EASTTLE_SCORE_FEEDBACK__DEPTH=simple
        figment = figment.merge(Env::prefixed(ENV_PREFIX).lowercase(true).split("__"));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::debug!(
            log_level = config.log_level.as_str(),
            data_dir = ?config.data_dir,
            "configuration loaded"
        );
        Ok((config, sources))
    }

    /// Like [`load`](Self::load), but fails when no config file exists.
    pub fn load_or_error(self) -> ConfigResult<(Config, ConfigSources)> {
        let has_user = self.include_user_config && self.find_user_config().is_some();
        let has_project = self
            .project_search_root
            .as_ref()
            .is_some_and(|root| !self.find_project_configs(root).is_empty());
        let has_explicit = !self.explicit_files.is_empty();

        if !has_user && !has_project && !has_explicit {
            return Err(ConfigError::NotFound);
        }

        self.load()
    }

    /// Config files in the closest directory at or above `start` that has any.
    fn find_project_configs(&self, start: &Utf8Path) -> Vec<Utf8PathBuf> {
        let mut current = Some(start.to_path_buf());

        while let Some(dir) = current {
            let found: Vec<Utf8PathBuf> = APP_NAMES
                .iter()
                .flat_map(|app| [format!(".{app}"), (*app).to_string()])
                .flat_map(|base| {
                    CONFIG_EXTENSIONS
                        .iter()
                        .map(move |ext| format!("{base}.{ext}"))
                })
                .map(|name| dir.join(name))
                .filter(|path| path.is_file())
                .collect();

            if !found.is_empty() {
                return found;
            }

            // Checked after the config files so a config beside `.git` is found.
            if let Some(ref marker) = self.boundary_marker
                && dir.join(marker).exists()
                && dir != start
            {
                break;
            }

            current = dir.parent().map(Utf8Path::to_path_buf);
        }

        Vec::new()
    }

    fn find_user_config(&self) -> Option<Utf8PathBuf> {
        let config_dir = user_config_dir()?;
        CONFIG_EXTENSIONS
            .iter()
            .map(|ext| config_dir.join(format!("config.{ext}")))
            .find(|path| path.is_file())
    }

    fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
        match path.extension() {
            Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
            Some("json") => figment.merge(Json::file_exact(path.as_str())),
            _ => figment.merge(Toml::file_exact(path.as_str())),
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME)
}

/// User config directory, e.g. `~/.config/easttle-score/` on Linux.
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    let dirs = project_dirs()?;
    Utf8PathBuf::from_path_buf(dirs.config_dir().to_path_buf()).ok()
}

/// User data directory, e.g. `~/.local/share/easttle-score/` on Linux.
pub fn user_data_dir() -> Option<Utf8PathBuf> {
    let dirs = project_dirs()?;
    Utf8PathBuf::from_path_buf(dirs.data_dir().to_path_buf()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serializes tests that mutate environment variables.
    static TEST_ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn utf8(path: &std::path::Path) -> Utf8PathBuf {
        Utf8PathBuf::try_from(path.to_path_buf()).unwrap()
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.log_dir.is_none());
        assert!(config.data_dir.is_none());
        assert!(config.year_level.is_none());
        assert_eq!(config.feedback.audience, Audience::Teacher);
        assert_eq!(config.feedback.depth, Depth::Standard);
        assert_eq!(config.input_limit(), Some(DEFAULT_MAX_INPUT_BYTES));
    }

    #[test]
    fn loads_with_no_files() {
        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .load()
            .unwrap();
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(sources.primary_file().is_none());
    }

    #[test]
    fn explicit_toml_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.toml");
        fs::write(
            &path,
            r#"log_level = "debug"
data_dir = "/tmp/easttle-data"
year_level = 3

[feedback]
audience = "parent"
depth = "comprehensive"
"#,
        )
        .unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_file(utf8(&path))
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.data_dir.as_deref(), Some(Utf8Path::new("/tmp/easttle-data")));
        assert_eq!(config.year_level, Some(3));
        assert_eq!(config.feedback.audience, Audience::Parent);
        assert_eq!(config.feedback.depth, Depth::Comprehensive);
        assert_eq!(sources.primary_file(), Some(utf8(&path).as_path()));
    }

    #[test]
    fn later_explicit_file_wins() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("base.toml");
        fs::write(&base, "log_level = \"warn\"\nyear_level = 2\n").unwrap();
        let over = tmp.path().join("over.toml");
        fs::write(&over, "log_level = \"error\"\n").unwrap();

        let (config, _) = ConfigLoader::new()
            .with_user_config(false)
            .with_file(utf8(&base))
            .with_file(utf8(&over))
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Error);
        assert_eq!(config.year_level, Some(2));
    }

    #[test]
    fn project_config_found_from_subdirectory() {
        let tmp = TempDir::new().unwrap();
        let project = tmp.path().join("class");
        let deep = project.join("term1").join("week3");
        fs::create_dir_all(&deep).unwrap();
        fs::write(project.join(".easttle-score.toml"), "year_level = 4\n").unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .with_project_search(utf8(&deep))
            .load()
            .unwrap();

        assert_eq!(config.year_level, Some(4));
        assert_eq!(sources.project_files.len(), 1);
    }

    #[test]
    fn git_boundary_stops_search() {
        let tmp = TempDir::new().unwrap();
        let parent = tmp.path().join("parent");
        let repo = parent.join("repo");
        let work = repo.join("work");
        fs::create_dir_all(&work).unwrap();
        fs::write(parent.join(".easttle.toml"), "log_level = \"warn\"\n").unwrap();
        fs::create_dir(repo.join(".git")).unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_boundary_marker(".git")
            .with_project_search(utf8(&work))
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Info);
        assert!(sources.project_files.is_empty());
    }

    #[test]
    fn explicit_file_beats_project_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("easttle.toml"), "log_level = \"warn\"\n").unwrap();
        let over = tmp.path().join("override.json");
        fs::write(&over, r#"{"log_level": "error"}"#).unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .with_project_search(utf8(tmp.path()))
            .with_file(utf8(&over))
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Error);
        assert_eq!(sources.project_files.len(), 1);
        assert_eq!(sources.explicit_files.len(), 1);
    }

    #[test]
    fn load_or_error_needs_a_file() {
        let result = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .load_or_error();
        assert!(matches!(result, Err(ConfigError::NotFound)));
    }

    #[test]
    fn name_precedence_within_a_directory() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".easttle.toml"), "log_level = \"debug\"\nyear_level = 1\n").unwrap();
        fs::write(tmp.path().join("easttle.yaml"), "log_level: warn\n").unwrap();
        fs::write(tmp.path().join("easttle-score.toml"), "log_level = \"error\"\n").unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .with_project_search(utf8(tmp.path()))
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Error);
        assert_eq!(config.year_level, Some(1));
        assert_eq!(sources.project_files.len(), 3);
        assert!(sources.primary_file().unwrap().as_str().ends_with("easttle-score.toml"));
    }

    #[test]
    fn only_closest_directory_contributes() {
        let tmp = TempDir::new().unwrap();
        let child = tmp.path().join("child");
        fs::create_dir_all(&child).unwrap();
        fs::write(tmp.path().join("easttle.toml"), "year_level = 7\n").unwrap();
        fs::write(child.join("easttle.toml"), "log_level = \"warn\"\n").unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .with_project_search(utf8(&child))
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Warn);
        assert!(config.year_level.is_none());
        assert_eq!(sources.project_files.len(), 1);
    }

    #[test]
    fn input_limit_settings() {
        let config: Config = serde_yaml::from_str("max_input_bytes: 1024\n").unwrap();
        assert_eq!(config.input_limit(), Some(1024));

        let config: Config =
            serde_yaml::from_str("max_input_bytes: 1024\ndisable_input_limit: true\n").unwrap();
        assert_eq!(config.input_limit(), None);
    }

    #[test]
    fn yaml_feedback_section() {
        let config: Config =
            serde_yaml::from_str("feedback:\n  audience: student\n").unwrap();
        assert_eq!(config.feedback.audience, Audience::Student);
        assert_eq!(config.feedback.depth, Depth::Standard);
    }

    #[test]
    fn unknown_audience_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "[feedback]\naudience = \"principal\"\n").unwrap();
        let result = ConfigLoader::new()
            .with_user_config(false)
            .with_file(utf8(&path))
            .load();
        assert!(matches!(result, Err(ConfigError::Deserialize(_))));
    }

    #[test]
    fn explicit_data_dir_is_used() {
        let config = Config {
            data_dir: Some(Utf8PathBuf::from("/srv/easttle")),
            ..Config::default()
        };
        assert_eq!(config.resolve_data_dir().unwrap(), Utf8PathBuf::from("/srv/easttle"));
    }

    #[test]
    fn user_dirs_are_named_for_the_app() {
        if let Some(path) = user_config_dir() {
            assert!(path.as_str().contains("easttle-score"));
        }
        if let Some(path) = user_data_dir() {
            assert!(path.as_str().contains("easttle-score"));
        }
    }

    #[test]
    #[allow(unsafe_code)]
    fn env_vars_override_files() {
        let _lock = TEST_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "year_level = 2\n[feedback]\ndepth = \"simple\"\n").unwrap();

        // SAFETY: the mutex serializes environment access across tests.
        unsafe {
            std::env::set_var("EASTTLE_SCORE_YEAR_LEVEL", "6");
            std::env::set_var("EASTTLE_SCORE_FEEDBACK__DEPTH", "comprehensive");
        }

        let result = ConfigLoader::new()
            .with_user_config(false)
            .with_file(utf8(&path))
            .load();

        // SAFETY: as above.
        unsafe {
            std::env::remove_var("EASTTLE_SCORE_YEAR_LEVEL");
            std::env::remove_var("EASTTLE_SCORE_FEEDBACK__DEPTH");
        }

        let (config, _) = result.unwrap();
        assert_eq!(config.year_level, Some(6));
        assert_eq!(config.feedback.depth, Depth::Comprehensive);
    }
}
