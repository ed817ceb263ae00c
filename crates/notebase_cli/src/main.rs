//! Maintenance command line for a notebase store.
//!
//! `ping` checks core linkage; `status` opens an existing store (applying
//! pending migrations) and prints its schema version and row counts.

use clap::{Parser, Subcommand};
use log::info;
use notebase_core::db::migrations::{current_user_version, latest_version};
use notebase_core::{
    init_logging, open_db_existing, NoteRepository, OwnerFilter, SqliteNoteRepository,
    SqliteUserRepository, StoreConfig, UserRepository,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "notebase", version, about = "Inspect a notebase store")]
struct Cli {
    /// Store file; overrides NOTEBASE_DB_PATH.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print core ping and version.
    Ping,
    /// Print schema version and row counts of an existing store.
    ///
    /// Fails if the store file does not exist. Pending migrations are applied.
    Status,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();
    let mut config = StoreConfig::from_env()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    if let Some(log_dir) = config.log_dir.as_ref() {
        let log_dir = if log_dir.is_absolute() {
            log_dir.clone()
        } else {
            std::env::current_dir()?.join(log_dir)
        };
        init_logging(config.log_level, log_dir)?;
    }

    match cli.command {
        Command::Ping => {
            println!("notebase_core ping={}", notebase_core::ping());
            println!("notebase_core version={}", notebase_core::core_version());
        }
        Command::Status => print_status(&config)?,
    }

    Ok(())
}

fn print_status(config: &StoreConfig) -> Result<(), Box<dyn Error>> {
    let mut conn = open_db_existing(&config.db_path)?;
    let schema_version = current_user_version(&conn)?;

    let notes = SqliteNoteRepository::try_new(&conn)?;
    let note_count = notes.count_notes(OwnerFilter::Any)?;
    let unowned_count = notes.count_notes(OwnerFilter::Unowned)?;

    let users = SqliteUserRepository::try_new(&mut conn)?;
    let user_count = users.count_users()?;

    info!(
        "event=cli_status module=cli status=ok users={} notes={}",
        user_count, note_count
    );
    println!("store={}", config.db_path.display());
    println!("schema_version={schema_version} latest={}", latest_version());
    println!("users={user_count}");
    println!("notes={note_count} unowned={unowned_count}");
    Ok(())
}
