//! Menu choices, action dispatch and the interactive terminal loop
//!
//! `dispatch` does the work and never touches the terminal, so the same code
//! path serves both the interactive menu and the CLI subcommands.

use crate::journal::CommandRecord;
use crate::nmap::{ExtractionReport, TargetFilter};
use crate::notebook::Notebook;
use crate::output::Console;
use crate::{HermitError, Result};
use log::error;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

/// Printed when input ends or the operator presses Ctrl-C
pub const INTERRUPTED_MESSAGE: &str = "\nExecution interrupted. Exiting...";

/// A menu entry, selected by number or alias
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    LogCommand,
    AddNote,
    FindTargets,
    Exit,
}

impl FromStr for Choice {
    type Err = HermitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "1" | "lc" => Ok(Choice::LogCommand),
            "2" | "an" => Ok(Choice::AddNote),
            "3" | "fnt" => Ok(Choice::FindTargets),
            "4" | "exit" => Ok(Choice::Exit),
            other => Err(HermitError::InvalidChoice(other.to_string())),
        }
    }
}

/// A fully specified request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    LogCommand(String),
    AddNote(String),
    FindTargets { path: PathBuf, filter: TargetFilter },
    Exit,
}

#[derive(Debug)]
pub enum Outcome {
    CommandLogged(CommandRecord, PathBuf),
    NoteSaved(PathBuf),
    TargetsFound(ExtractionReport),
    Exit,
}

/// Carry out one action against the notebook
pub fn dispatch(notebook: &Notebook, action: Action) -> Result<Outcome> {
    match action {
        Action::LogCommand(command) => {
            let record = notebook.log_command(&command)?;
            Ok(Outcome::CommandLogged(record, notebook.config().command_log()))
        }
        Action::AddNote(note) => notebook.add_note(&note).map(Outcome::NoteSaved),
        Action::FindTargets { path, filter } => notebook
            .find_targets(&path, &filter)
            .map(Outcome::TargetsFound),
        Action::Exit => Ok(Outcome::Exit),
    }
}

/// Console text for a finished action
pub fn render(console: &Console, outcome: &Outcome) -> String {
    match outcome {
        Outcome::CommandLogged(record, path) => console.command_logged(record, path),
        Outcome::NoteSaved(path) => console.note_saved(path),
        Outcome::TargetsFound(report) => console.extraction(report),
        Outcome::Exit => "Exiting. Goodbye!".to_string(),
    }
}

/// Make Ctrl-C print the interruption notice and exit with status 0.
///
/// Can only be installed once per process.
pub fn install_interrupt_handler() -> Result<()> {
    ctrlc::set_handler(|| {
        println!("{}", INTERRUPTED_MESSAGE);
        std::process::exit(0);
    })?;
    Ok(())
}

/// Print `prompt` and read one trimmed line. `None` means end of input.
fn prompt<R: BufRead, W: Write>(reader: &mut R, writer: &mut W, prompt: &str) -> Result<Option<String>> {
    write!(writer, "{}", prompt)?;
    writer.flush()?;

    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Ask for whatever arguments `choice` needs
fn read_action<R: BufRead, W: Write>(choice: Choice, reader: &mut R, writer: &mut W) -> Result<Option<Action>> {
    let action = match choice {
        Choice::LogCommand => {
            prompt(reader, writer, "Enter the command to run: ")?.map(Action::LogCommand)
        }
        Choice::AddNote => prompt(reader, writer, "Enter your note: ")?.map(Action::AddNote),
        Choice::FindTargets => {
            let Some(path) = prompt(reader, writer, "Enter the path to the Nmap results file: ")? else {
                return Ok(None);
            };
            let Some(port) = prompt(reader, writer, "Filter by port (leave empty for all): ")? else {
                return Ok(None);
            };
            let Some(service) = prompt(reader, writer, "Filter by service (leave empty for all): ")? else {
                return Ok(None);
            };
            Some(Action::FindTargets {
                path: PathBuf::from(path),
                filter: TargetFilter::new(Some(port.as_str()), Some(service.as_str())),
            })
        }
        Choice::Exit => Some(Action::Exit),
    };
    Ok(action)
}

/// Run the menu until the operator exits or input ends.
///
/// Failed actions are reported and the loop carries on; only a broken
/// terminal (failing reads or writes) ends it with an error.
pub fn run_interactive<R: BufRead, W: Write>(
    notebook: &Notebook,
    console: &Console,
    mut reader: R,
    mut writer: W,
) -> Result<()> {
    loop {
        write!(writer, "{}", console.menu())?;

        let Some(raw) = prompt(&mut reader, &mut writer, "Enter your choice (1, 2, 3, 4, or alias): ")? else {
            writeln!(writer, "{}", INTERRUPTED_MESSAGE)?;
            return Ok(());
        };

        let choice = match raw.parse::<Choice>() {
            Ok(choice) => choice,
            Err(_) => {
                writeln!(
                    writer,
                    "{}",
                    console.warning("Invalid choice. Please enter 1, 2, 3, 4, or a valid alias.")
                )?;
                continue;
            }
        };

        let Some(action) = read_action(choice, &mut reader, &mut writer)? else {
            writeln!(writer, "{}", INTERRUPTED_MESSAGE)?;
            return Ok(());
        };

        match dispatch(notebook, action) {
            Ok(Outcome::Exit) => {
                writeln!(writer, "{}", render(console, &Outcome::Exit))?;
                return Ok(());
            }
            Ok(outcome) => writeln!(writer, "{}", render(console, &outcome))?,
            Err(HermitError::EmptyInput(what)) => {
                writeln!(writer, "{}", console.warning(&format!("{} cannot be empty.", what)))?
            }
            Err(e) if e.is_user_error() => writeln!(writer, "{}", console.error(&e.to_string()))?,
            Err(e) => {
                error!("{:?} failed: {}", choice, e);
                writeln!(writer, "{}", console.error(&e.to_string()))?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_numbers_and_aliases() {
        assert_eq!("1".parse::<Choice>().unwrap(), Choice::LogCommand);
        assert_eq!("lc".parse::<Choice>().unwrap(), Choice::LogCommand);
        assert_eq!(" AN ".parse::<Choice>().unwrap(), Choice::AddNote);
        assert_eq!("3".parse::<Choice>().unwrap(), Choice::FindTargets);
        assert_eq!("Fnt".parse::<Choice>().unwrap(), Choice::FindTargets);
        assert_eq!("EXIT".parse::<Choice>().unwrap(), Choice::Exit);
        assert_eq!("4".parse::<Choice>().unwrap(), Choice::Exit);
    }

    #[test]
    fn test_invalid_choice() {
        let err = "5".parse::<Choice>().unwrap_err();
        assert!(matches!(err, HermitError::InvalidChoice(ref s) if s == "5"));
        assert!("".parse::<Choice>().is_err());
        assert!("log".parse::<Choice>().is_err());
    }

    #[test]
    fn test_interrupt_handler_installs() {
        assert!(install_interrupt_handler().is_ok());
    }
}
