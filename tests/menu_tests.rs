//! Dispatch and interactive menu tests with scripted input

use chrono::NaiveDate;
use hermit::menu::run_interactive;
use hermit::{dispatch, Action, Console, EngagementConfig, FixedClock, HermitError, Notebook, Outcome, TargetFilter};
use std::fs;
use std::io::Cursor;
use tempfile::TempDir;

fn notebook() -> (TempDir, Notebook) {
    let home = TempDir::new().unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let config = EngagementConfig::new(home.path(), date);
    let notebook = Notebook::with_clock(config, FixedClock(date.and_hms_opt(10, 30, 0).unwrap()));
    notebook.setup().unwrap();
    (home, notebook)
}

fn run_script(notebook: &Notebook, script: &str) -> String {
    let mut out = Vec::new();
    run_interactive(notebook, &Console::plain(), Cursor::new(script.as_bytes()), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_dispatch_note() {
    let (_home, notebook) = notebook();

    let outcome = dispatch(&notebook, Action::AddNote("pivot via jump box".into())).unwrap();

    match outcome {
        Outcome::NoteSaved(path) => assert_eq!(path, notebook.config().notes_log()),
        other => panic!("unexpected outcome {:?}", other),
    }
    let log = fs::read_to_string(notebook.config().notes_log()).unwrap();
    assert!(log.starts_with("2024-03-01 10:30:00: pivot via jump box\n"));
}

#[test]
fn test_dispatch_empty_inputs_write_nothing() {
    let (_home, notebook) = notebook();

    let err = dispatch(&notebook, Action::LogCommand("  ".into())).unwrap_err();
    assert!(matches!(err, HermitError::EmptyInput("Command")));
    let err = dispatch(&notebook, Action::AddNote(String::new())).unwrap_err();
    assert!(matches!(err, HermitError::EmptyInput("Note")));

    assert!(!notebook.config().command_log().exists());
    assert!(!notebook.config().notes_log().exists());
}

#[test]
fn test_dispatch_missing_scan() {
    let (home, notebook) = notebook();
    let action = Action::FindTargets {
        path: home.path().join("missing.nmap"),
        filter: TargetFilter::default(),
    };

    let err = dispatch(&notebook, action).unwrap_err();
    assert!(matches!(err, HermitError::InputNotFound(_)));
}

#[test]
fn test_dispatch_exit() {
    let (_home, notebook) = notebook();
    assert!(matches!(dispatch(&notebook, Action::Exit).unwrap(), Outcome::Exit));
}

#[cfg(unix)]
#[test]
fn test_dispatch_command_uses_dated_log() {
    let (_home, notebook) = notebook();

    let outcome = dispatch(&notebook, Action::LogCommand("printf 'ok'".into())).unwrap();

    match outcome {
        Outcome::CommandLogged(record, path) => {
            assert_eq!(record.output, "ok");
            assert!(path.ends_with("logs/command-log.2024-03-01.txt"));
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn test_interactive_session() {
    let (_home, notebook) = notebook();
    let scan = notebook.config().nmap_results_dir().join("scan.txt");
    fs::write(&scan, "Discovered open port 3389/tcp on 10.1.1.4\n").unwrap();

    let script = format!("an\nfound rdp\n9\n2\n\n3\n{}\n\n\nexit\n", scan.display());
    let out = run_script(&notebook, &script);

    assert!(out.contains("Choose an option:"));
    assert!(out.contains("Note saved to"));
    assert!(out.contains("Invalid choice. Please enter 1, 2, 3, 4, or a valid alias."));
    assert!(out.contains("Note cannot be empty."));
    assert!(out.contains("10.1.1.4:3389:unknown"));
    assert!(out.trim_end().ends_with("Exiting. Goodbye!"));

    let notes = fs::read_to_string(notebook.config().notes_log()).unwrap();
    assert_eq!(notes.matches("found rdp").count(), 1);
    assert_eq!(
        fs::read_to_string(notebook.config().targets_log()).unwrap(),
        "10.1.1.4:3389:unknown"
    );
}

#[test]
fn test_interactive_reports_missing_file_and_continues() {
    let (home, notebook) = notebook();
    let script = format!("fnt\n{}\n22\n\n4\n", home.path().join("gone.txt").display());

    let out = run_script(&notebook, &script);

    assert!(out.contains("Error: File '"));
    assert!(out.contains("not found."));
    assert!(out.contains("Exiting. Goodbye!"));
    assert!(!notebook.config().summary_log().exists());
}

#[test]
fn test_interactive_stops_at_end_of_input() {
    let (_home, notebook) = notebook();

    let out = run_script(&notebook, "2\n");

    assert!(out.contains("Enter your note: "));
    assert!(out.contains("Execution interrupted. Exiting..."));
    assert!(!notebook.config().notes_log().exists());
}
