//! The notebook ties configuration and clock to the individual operations

use crate::config::EngagementConfig;
use crate::journal::{Clock, CommandLogger, CommandRecord, NoteLogger, SystemClock};
use crate::nmap::{ExtractionReport, TargetExtractor, TargetFilter};
use crate::workspace;
use crate::Result;
use std::path::{Path, PathBuf};

pub struct Notebook {
    config: EngagementConfig,
    clock: Box<dyn Clock>,
}

impl Notebook {
    /// Notebook stamped with local system time
    pub fn new(config: EngagementConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }

    pub fn with_clock<C: Clock + 'static>(config: EngagementConfig, clock: C) -> Self {
        Self {
            config,
            clock: Box::new(clock),
        }
    }

    pub fn config(&self) -> &EngagementConfig {
        &self.config
    }

    /// Create the engagement directories
    pub fn setup(&self) -> Result<Vec<PathBuf>> {
        workspace::setup_directories(&self.config)
    }

    pub fn log_command(&self, command: &str) -> Result<CommandRecord> {
        CommandLogger::new(&self.config, self.clock.as_ref()).log_command(command)
    }

    pub fn add_note(&self, note: &str) -> Result<PathBuf> {
        NoteLogger::new(&self.config, self.clock.as_ref()).log_note(note)
    }

    pub fn find_targets<P: AsRef<Path>>(&self, nmap_file: P, filter: &TargetFilter) -> Result<ExtractionReport> {
        TargetExtractor::new(&self.config).extract(nmap_file, filter)
    }
}
