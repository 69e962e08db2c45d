//! Command-line front end for NoteSync.
//!
//! # Responsibility
//! - Run one login plus one category/note use-case per invocation.
//! - Talk to the remote service, or to a local cache with `--offline`.

use clap::{Parser, Subcommand};
use log::error;
use notesync_core::client::{DEFAULT_SERVER_URL, SERVER_URL_ENV, TIMEOUT_SECS_ENV};
use notesync_core::{
    default_log_level, init_logging, ClientConfig, HttpNoteDbClient, NoteDbClient, NoteSession,
    SqliteNoteDbClient, User,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "notesync", version, about = "Manage categorized notes on a NoteSync server")]
struct Cli {
    /// Server base URL.
    #[arg(long, env = SERVER_URL_ENV, default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Whole-request timeout in seconds (transport default when omitted).
    #[arg(long, env = TIMEOUT_SECS_ENV)]
    timeout_secs: Option<u64>,

    /// Username to log in with.
    #[arg(long, short)]
    user: String,

    /// Use the local SQLite cache at this path instead of the server.
    #[arg(long, value_name = "PATH")]
    offline: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when omitted.
    #[arg(long, value_name = "DIR")]
    log_dir: Option<String>,

    /// Log level used with `--log-dir`.
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every category and its notes.
    Show,
    /// Append a note to a category.
    Add { category: String, note: String },
    /// Remove the first matching note from a category.
    Remove { category: String, note: String },
    /// Create an empty category.
    CreateCategory { name: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("warning: {err}");
        }
    }

    let outcome = match cli.offline.as_ref() {
        Some(path) => SqliteNoteDbClient::open_path(path)
            .map_err(|err| format!("failed to open cache `{}`: {err}", path.display()))
            .and_then(|client| run(client, &cli)),
        None => {
            let config = ClientConfig {
                base_url: cli.server.clone(),
                timeout: cli.timeout_secs.map(Duration::from_secs),
            };
            HttpNoteDbClient::new(&config)
                .map_err(|err| err.to_string())
                .and_then(|client| run(client, &cli))
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_run module=cli status=error error={message}");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run<C: NoteDbClient>(client: C, cli: &Cli) -> Result<(), String> {
    client.open().map_err(|err| err.to_string())?;
    let mut session = NoteSession::new(client);
    session
        .login(cli.user.as_str())
        .map_err(|err| err.to_string())?;

    let result = match &cli.command {
        Command::Show => {
            if let Some(user) = session.current_user() {
                print_user(user);
            }
            Ok(())
        }
        Command::Add { category, note } => session.add_note(category, note),
        Command::Remove { category, note } => session.remove_note(category, note),
        Command::CreateCategory { name } => session.create_category(name),
    };
    result.map_err(|err| err.to_string())?;

    session.client().close().map_err(|err| err.to_string())
}

fn print_user(user: &User) {
    println!("{user}");
    for name in user.category_names() {
        let Some(category) = user.category(name) else {
            continue;
        };
        println!("  {name} ({})", category.len());
        for note in category.notes() {
            println!("    - {note}");
        }
    }
}
