//! Hermit - an engagement notebook
//!
//! Logs shell commands and timestamped notes during a security engagement, and
//! turns Nmap discovery output into deduplicated target lists and a per-port
//! summary.

pub mod config;
pub mod error;
pub mod journal;
pub mod menu;
pub mod nmap;
pub mod notebook;
pub mod output;
pub mod workspace;

// Re-export commonly used types
pub use config::EngagementConfig;
pub use error::{HermitError, HermitResult};
pub use journal::{Clock, CommandRecord, FixedClock, SystemClock};
pub use menu::{dispatch, Action, Choice, Outcome};
pub use nmap::{ExtractionReport, PortIndex, Target, TargetExtractor, TargetFilter};
pub use notebook::Notebook;
pub use output::Console;

pub type Result<T> = std::result::Result<T, HermitError>;
