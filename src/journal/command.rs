//! Shell command logging

use super::{open_append, separator, Clock};
use crate::config::EngagementConfig;
use crate::{HermitError, Result};
use chrono::NaiveDateTime;
use log::{info, warn};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

const TIME_FORMAT: &str = "%H:%M:%S";

/// What happened when a command was logged
#[derive(Debug, Clone, Serialize)]
pub struct CommandRecord {
    pub command: String,
    pub started: NaiveDateTime,
    pub ended: NaiveDateTime,
    /// Merged stdout and stderr
    pub output: String,
    /// None when the process was killed by a signal or never started
    pub exit_code: Option<i32>,
    /// Set when the shell could not be started at all
    pub spawn_error: Option<String>,
}

impl CommandRecord {
    pub fn succeeded(&self) -> bool {
        self.spawn_error.is_none() && self.exit_code == Some(0)
    }
}

/// Runs commands through the host shell and appends them to the daily log
pub struct CommandLogger<'a, C: Clock> {
    config: &'a EngagementConfig,
    clock: C,
}

impl<'a, C: Clock> CommandLogger<'a, C> {
    pub fn new(config: &'a EngagementConfig, clock: C) -> Self {
        Self { config, clock }
    }

    /// Path of the log this logger appends to
    pub fn log_path(&self) -> PathBuf {
        self.config.command_log()
    }

    /// Run `command` and append its output to the daily command log.
    ///
    /// A command that cannot be started is recorded as `Error: ...` in the log
    /// and is not returned as an error. Only failures to write the log itself
    /// propagate.
    pub fn log_command(&self, command: &str) -> Result<CommandRecord> {
        let command = command.trim();
        if command.is_empty() {
            return Err(HermitError::EmptyInput("Command"));
        }

        let path = self.log_path();
        let mut log_file = open_append(&path)?;

        let started = self.clock.now();
        writeln!(log_file, "[[ Command Start ]] {}", started.format(TIME_FORMAT))?;
        writeln!(log_file, "[[ Command Text ]] {}\n", command)?;
        log_file.flush()?;

        let (output, exit_code, spawn_error) = match shell_command(&self.config.shell, command).output() {
            Ok(out) => {
                let text = String::from_utf8_lossy(&out.stdout).into_owned();
                log_file.write_all(text.as_bytes())?;
                (text, out.status.code(), None)
            }
            Err(e) => {
                warn!("Failed to run '{}' with {}: {}", command, self.config.shell, e);
                writeln!(log_file, "Error: {}", e)?;
                (String::new(), None, Some(e.to_string()))
            }
        };

        let ended = self.clock.now();
        writeln!(log_file, "\n[[ Command Ended ]] {}", ended.format(TIME_FORMAT))?;
        writeln!(log_file, "{}\n", separator())?;

        info!("Command logged to {}", path.display());

        Ok(CommandRecord {
            command: command.to_string(),
            started,
            ended,
            output,
            exit_code,
            spawn_error,
        })
    }
}

/// Build a shell invocation whose stderr is folded into stdout
#[cfg(unix)]
fn shell_command(shell: &str, command: &str) -> Command {
    let mut cmd = Command::new(shell);
    cmd.arg("-c").arg(format!("exec 2>&1\n{}", command));
    cmd
}

#[cfg(not(unix))]
fn shell_command(shell: &str, command: &str) -> Command {
    let mut cmd = Command::new(shell);
    cmd.arg("/C").arg(format!("{} 2>&1", command));
    cmd
}
