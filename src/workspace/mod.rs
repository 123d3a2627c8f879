//! Engagement directory bootstrapping

use crate::config::EngagementConfig;
use crate::Result;
use log::debug;
use std::fs;
use std::path::PathBuf;

/// Directories every engagement needs, in creation order
pub fn engagement_dirs(config: &EngagementConfig) -> Vec<PathBuf> {
    vec![
        config.root.clone(),
        config.helpers_dir(),
        config.logs_dir(),
        config.nmap_results_dir(),
    ]
}

/// Create the engagement directory structure if it does not exist.
///
/// Safe to call any number of times. Returns the directories that now exist.
pub fn setup_directories(config: &EngagementConfig) -> Result<Vec<PathBuf>> {
    let dirs = engagement_dirs(config);
    for dir in &dirs {
        fs::create_dir_all(dir)?;
        debug!("Ensured directory {}", dir.display());
    }
    Ok(dirs)
}
