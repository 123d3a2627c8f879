//! Timestamped note logging

use super::{open_append, separator, Clock};
use crate::config::EngagementConfig;
use crate::{HermitError, Result};
use log::info;
use std::io::Write;
use std::path::PathBuf;

pub struct NoteLogger<'a, C: Clock> {
    config: &'a EngagementConfig,
    clock: C,
}

impl<'a, C: Clock> NoteLogger<'a, C> {
    pub fn new(config: &'a EngagementConfig, clock: C) -> Self {
        Self { config, clock }
    }

    /// Append a time-stamped note to the notes log and return its path
    pub fn log_note(&self, note: &str) -> Result<PathBuf> {
        let note = note.trim();
        if note.is_empty() {
            return Err(HermitError::EmptyInput("Note"));
        }

        let path = self.config.notes_log();
        let timestamp = self.clock.now().format("%Y-%m-%d %H:%M:%S");

        let mut log_file = open_append(&path)?;
        write!(log_file, "{}: {}\n{}\n\n", timestamp, note, separator())?;

        info!("Note saved to {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::FixedClock;
    use crate::workspace::setup_directories;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_note_entries_append() {
        let home = TempDir::new().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let config = EngagementConfig::new(home.path(), date);
        setup_directories(&config).unwrap();
        let logger = NoteLogger::new(&config, FixedClock(date.and_hms_opt(14, 2, 7).unwrap()));

        logger.log_note("  creds reused on 10.0.0.5  ").unwrap();
        logger.log_note("smb signing disabled").unwrap();

        let log = fs::read_to_string(config.notes_log()).unwrap();
        let rule = "#".repeat(60);
        assert_eq!(
            log,
            format!(
                "2024-03-01 14:02:07: creds reused on 10.0.0.5\n{rule}\n\n\
                 2024-03-01 14:02:07: smb signing disabled\n{rule}\n\n"
            )
        );
    }

    #[test]
    fn test_empty_note_rejected() {
        let home = TempDir::new().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let config = EngagementConfig::new(home.path(), date);
        let logger = NoteLogger::new(&config, FixedClock(date.and_hms_opt(0, 0, 0).unwrap()));

        assert!(matches!(logger.log_note(""), Err(HermitError::EmptyInput("Note"))));
        assert!(!config.notes_log().exists());
    }
}
