use anyhow::{anyhow, Context};
use chrono::{Local, NaiveDate};
use clap::{Arg, ArgAction, ArgMatches, Command};
use colored::*;
use hermit::{
    config::EngagementConfig,
    menu::{dispatch, install_interrupt_handler, render, run_interactive, Action, Outcome},
    nmap::TargetFilter,
    output::Console,
    Notebook,
};
use log::debug;
use std::io;
use std::path::PathBuf;
use std::process;

fn build_cli() -> Command {
    Command::new("hermit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Engagement notebook: log commands and notes, extract targets from Nmap output")
        .arg(
            Arg::new("root")
                .long("root")
                .value_name("DIR")
                .help("Engagement directory (default: ~/engagement)")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Config file (default: ~/.hermit.toml)")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("date")
                .long("date")
                .value_name("YYYY-MM-DD")
                .help("Date used to name the daily command log (default: today)")
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .help("Disable colored output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("no-banner")
                .long("no-banner")
                .help("Hide the banner")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(Command::new("init").about("Create the engagement directories and exit"))
        .subcommand(
            Command::new("log")
                .visible_alias("lc")
                .about("Run a shell command and append it with its output to the daily log")
                .arg(
                    Arg::new("command")
                        .value_name("COMMAND")
                        .help("Shell command line, quoted as one argument")
                        .required(true)
                        .allow_hyphen_values(true),
                ),
        )
        .subcommand(
            Command::new("note")
                .visible_alias("an")
                .about("Append a timestamped note")
                .arg(
                    Arg::new("text")
                        .value_name("TEXT")
                        .help("Note text")
                        .required(true)
                        .num_args(1..),
                ),
        )
        .subcommand(
            Command::new("targets")
                .visible_alias("fnt")
                .about("Extract targets and a per-port summary from Nmap output")
                .arg(
                    Arg::new("file")
                        .value_name("FILE")
                        .help("Nmap results file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .value_name("PORT")
                        .help("Only keep targets on this port"),
                )
                .arg(
                    Arg::new("service")
                        .short('s')
                        .long("service")
                        .value_name("SERVICE")
                        .help("Only keep targets whose service contains this text (case-insensitive)"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the extraction report as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<EngagementConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => {
            let home = dirs::home_dir().ok_or_else(|| anyhow!("Home directory not found"))?;
            EngagementConfig::from_toml_file(path, home, Local::now().date_naive())?
        }
        None => EngagementConfig::load_default()?,
    };

    if let Some(root) = matches.get_one::<PathBuf>("root") {
        config = config.with_root(root.clone());
    }

    if let Some(date) = matches.get_one::<String>("date") {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", date))?;
        config = config.with_date(date);
    }

    if matches.get_flag("no-color") {
        config.color = false;
    }

    config.validate()?;
    Ok(config)
}

fn init_logging(config: &EngagementConfig, verbose: bool) {
    let level = if verbose { "debug" } else { config.log_level.as_str() };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Note words given as separate arguments, joined with spaces
fn joined(matches: &ArgMatches, id: &str) -> String {
    matches
        .get_many::<String>(id)
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

fn run() -> anyhow::Result<()> {
    let matches = build_cli().get_matches();
    install_interrupt_handler()?;

    let config = load_config(&matches)?;
    init_logging(&config, matches.get_flag("verbose"));
    if !config.color {
        colored::control::set_override(false);
    }
    debug!("Engagement root: {}", config.root.display());

    let console = Console::new(config.color);
    let notebook = Notebook::new(config);
    notebook
        .setup()
        .with_context(|| format!("Failed to create {}", notebook.config().root.display()))?;

    let action = match matches.subcommand() {
        Some(("init", _)) => {
            println!("{}", console.setup_done(&notebook.config().root));
            return Ok(());
        }
        Some(("log", sub)) => {
            Action::LogCommand(sub.get_one::<String>("command").cloned().unwrap_or_default())
        }
        Some(("note", sub)) => Action::AddNote(joined(sub, "text")),
        Some(("targets", sub)) => {
            let path = sub
                .get_one::<PathBuf>("file")
                .cloned()
                .ok_or_else(|| anyhow!("Missing Nmap results file"))?;
            let filter = TargetFilter::new(
                sub.get_one::<String>("port").map(String::as_str),
                sub.get_one::<String>("service").map(String::as_str),
            );
            let outcome = dispatch(&notebook, Action::FindTargets { path, filter })?;
            match &outcome {
                Outcome::TargetsFound(report) if sub.get_flag("json") => {
                    println!("{}", serde_json::to_string_pretty(report)?);
                }
                _ => println!("{}", render(&console, &outcome)),
            }
            return Ok(());
        }
        _ => {
            if !matches.get_flag("no-banner") {
                println!("{}", console.banner());
            }
            println!("{}", console.setup_done(&notebook.config().root));
            run_interactive(&notebook, &console, io::stdin().lock(), io::stdout())?;
            return Ok(());
        }
    };

    let outcome = dispatch(&notebook, action)?;
    println!("{}", render(&console, &outcome));
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".bright_red().bold(), e);
        process::exit(1);
    }
}
