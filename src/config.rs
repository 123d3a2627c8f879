//! Configuration module for the engagement notebook

use crate::{HermitError, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the engagement directory created under the home directory
pub const ENGAGEMENT_DIR_NAME: &str = "engagement";

/// Name of the optional per-user config file in the home directory
pub const CONFIG_FILE_NAME: &str = ".hermit.toml";

#[cfg(unix)]
const DEFAULT_SHELL: &str = "/bin/sh";
#[cfg(not(unix))]
const DEFAULT_SHELL: &str = "cmd";

/// Runtime configuration, built once at start-up and passed to every operation
#[derive(Debug, Clone, PartialEq)]
pub struct EngagementConfig {
    /// Root of the engagement directory tree
    pub root: PathBuf,

    /// Calendar date used to name the daily command log
    pub date: NaiveDate,

    /// Shell used to run logged commands
    pub shell: String,

    /// Default log filter when RUST_LOG is unset
    pub log_level: String,

    /// Colored console output
    pub color: bool,
}

/// On-disk configuration format. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub root: Option<PathBuf>,
    pub shell: Option<String>,
    pub log_level: Option<String>,
    pub color: Option<bool>,
}

impl EngagementConfig {
    /// Create a configuration rooted at `<home>/engagement` for the given date
    pub fn new<P: AsRef<Path>>(home: P, date: NaiveDate) -> Self {
        Self {
            root: home.as_ref().join(ENGAGEMENT_DIR_NAME),
            date,
            shell: DEFAULT_SHELL.to_string(),
            log_level: "info".to_string(),
            color: true,
        }
    }

    /// Set the engagement root directly
    pub fn with_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.root = root.into();
        self
    }

    /// Set the date used for the daily command log
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Set the shell used to run logged commands
    pub fn with_shell<S: Into<String>>(mut self, shell: S) -> Self {
        self.shell = shell.into();
        self
    }

    pub fn helpers_dir(&self) -> PathBuf {
        self.root.join("helpers")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn nmap_results_dir(&self) -> PathBuf {
        self.root.join("nmap_results")
    }

    /// Daily command log, e.g. `logs/command-log.2024-03-01.txt`
    pub fn command_log(&self) -> PathBuf {
        self.logs_dir()
            .join(format!("command-log.{}.txt", self.date.format("%Y-%m-%d")))
    }

    pub fn notes_log(&self) -> PathBuf {
        self.logs_dir().join("notes-log.txt")
    }

    pub fn targets_log(&self) -> PathBuf {
        self.logs_dir().join("nmap-targets.txt")
    }

    pub fn summary_log(&self) -> PathBuf {
        self.logs_dir().join("nmap-summary.csv")
    }

    /// Apply the values present in a config file on top of this configuration
    pub fn apply_file(mut self, file: ConfigFile) -> Self {
        if let Some(root) = file.root {
            self.root = root;
        }
        if let Some(shell) = file.shell {
            self.shell = shell;
        }
        if let Some(level) = file.log_level {
            self.log_level = level;
        }
        if let Some(color) = file.color {
            self.color = color;
        }
        self
    }

    /// Load configuration from a TOML file, using `home` and `date` for
    /// anything the file leaves out
    pub fn from_toml_file<P: AsRef<Path>, H: AsRef<Path>>(
        path: P,
        home: H,
        date: NaiveDate,
    ) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            HermitError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let file: ConfigFile = toml::from_str(&content)
            .map_err(|e| HermitError::ConfigError(format!("Failed to parse TOML: {}", e)))?;

        let config = Self::new(home, date).apply_file(file);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location (~/.hermit.toml), falling
    /// back to defaults when it does not exist
    pub fn load_default() -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            HermitError::ConfigError("Home directory not found".to_string())
        })?;
        let today = Local::now().date_naive();

        let config_path = home.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            log::debug!("Loading config from {}", config_path.display());
            return Self::from_toml_file(&config_path, &home, today);
        }

        Ok(Self::new(home, today))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.root.as_os_str().is_empty() {
            return Err(HermitError::ConfigError(
                "Engagement root cannot be empty".to_string(),
            ));
        }

        if self.shell.trim().is_empty() {
            return Err(HermitError::ConfigError("Shell cannot be empty".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_paths_follow_home_and_date() {
        let config = EngagementConfig::new("/home/op", date());

        assert_eq!(config.root, PathBuf::from("/home/op/engagement"));
        assert_eq!(config.helpers_dir(), PathBuf::from("/home/op/engagement/helpers"));
        assert_eq!(config.nmap_results_dir(), PathBuf::from("/home/op/engagement/nmap_results"));
        assert_eq!(
            config.command_log(),
            PathBuf::from("/home/op/engagement/logs/command-log.2024-03-01.txt")
        );
        assert_eq!(config.notes_log(), PathBuf::from("/home/op/engagement/logs/notes-log.txt"));
        assert_eq!(config.targets_log(), PathBuf::from("/home/op/engagement/logs/nmap-targets.txt"));
        assert_eq!(config.summary_log(), PathBuf::from("/home/op/engagement/logs/nmap-summary.csv"));
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "root = \"/srv/op\"").unwrap();
        writeln!(file, "shell = \"/bin/bash\"").unwrap();
        writeln!(file, "color = false").unwrap();

        let config = EngagementConfig::from_toml_file(file.path(), "/home/op", date()).unwrap();
        assert_eq!(config.root, PathBuf::from("/srv/op"));
        assert_eq!(config.shell, "/bin/bash");
        assert_eq!(config.log_level, "info");
        assert!(!config.color);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "root = [unterminated").unwrap();

        let err = EngagementConfig::from_toml_file(file.path(), "/home/op", date()).unwrap_err();
        assert!(matches!(err, HermitError::ConfigError(_)));
    }

    #[test]
    fn test_validate_rejects_empty_shell() {
        let config = EngagementConfig::new("/home/op", date()).with_shell("  ");
        assert!(config.validate().is_err());
    }
}
