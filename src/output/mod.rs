//! Console output formatting

use crate::journal::CommandRecord;
use crate::nmap::ExtractionReport;
use colored::*;
use std::path::Path;

/// Formats user-facing console text, optionally colored
#[derive(Debug, Clone, Copy)]
pub struct Console {
    colored: bool,
}

impl Console {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    /// Console without ANSI escapes
    pub fn plain() -> Self {
        Self { colored: false }
    }

    fn paint(&self, text: &str, style: fn(ColoredString) -> ColoredString) -> String {
        if self.colored {
            style(text.normal()).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn banner(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.paint("  _   _  _____  ____   __  __  ___  _____ ", |s| s.bright_green().bold()));
        out.push('\n');
        out.push_str(&self.paint(" | |_| || ____||  _ \\ |  \\/  ||_ _||_   _|", |s| s.bright_green().bold()));
        out.push('\n');
        out.push_str(&self.paint(" |  _  ||  _|  | |_) || |\\/| | | |   | |  ", |s| s.bright_green().bold()));
        out.push('\n');
        out.push_str(&self.paint(" |_| |_||_____||_| \\_\\|_|  |_||___|  |_|  ", |s| s.bright_green().bold()));
        out.push('\n');
        out.push_str(&self.paint("   engagement notebook: commands, notes, targets", |s| s.bright_blue()));
        out.push('\n');
        out
    }

    pub fn menu(&self) -> String {
        format!(
            "\n{}\n1) Log a command (alias: lc)\n2) Add a note (alias: an)\n3) Find Nmap targets (alias: fnt)\n4) Exit (alias: exit)\n",
            self.paint("Choose an option:", |s| s.bright_cyan().bold())
        )
    }

    pub fn setup_done(&self, root: &Path) -> String {
        format!(
            "{} {}",
            self.paint("Engagement directories created or already exist at", |s| s.bright_blue()),
            root.display()
        )
    }

    pub fn command_logged(&self, record: &CommandRecord, log_path: &Path) -> String {
        let mut out = format!(
            "{} {}",
            self.paint("Command logged to", |s| s.bright_green()),
            log_path.display()
        );
        if let Some(err) = &record.spawn_error {
            out.push('\n');
            out.push_str(&self.warning(&format!("Command could not be started: {}", err)));
        }
        out
    }

    pub fn note_saved(&self, log_path: &Path) -> String {
        format!(
            "{} {}",
            self.paint("Note saved to", |s| s.bright_green()),
            log_path.display()
        )
    }

    /// Target list (or the no-targets notice) followed by the summary location
    pub fn extraction(&self, report: &ExtractionReport) -> String {
        let mut lines = Vec::new();
        match &report.targets_path {
            Some(path) if report.has_targets() => {
                lines.push(format!(
                    "{} {}",
                    self.paint("Found targets saved to", |s| s.bright_green()),
                    path.display()
                ));
                for target in &report.targets {
                    lines.push(self.paint(target, |s| s.bright_yellow()));
                }
            }
            _ => lines.push(self.warning("No targets found with the specified filters.")),
        }
        lines.push(format!(
            "{} {}",
            self.paint("Summary saved to", |s| s.bright_blue()),
            report.summary_path.display()
        ));
        lines.join("\n")
    }

    pub fn warning(&self, message: &str) -> String {
        self.paint(message, |s| s.bright_yellow())
    }

    pub fn error(&self, message: &str) -> String {
        self.paint(&format!("Error: {}", message), |s| s.bright_red())
    }
}
