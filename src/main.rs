mod app;

use app::App;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use vocab_mastery::database::db;
use vocab_mastery::{Config, Result, logging};

#[derive(Parser, Debug)]
#[command(name = "vocab")]
#[command(about = "Vocabulary flashcards with mastery-tier spaced repetition")]
struct Cli {
    /// Path to a config file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the database path from the config
    #[arg(short, long)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all decks
    Decks,
    /// Create an empty deck
    NewDeck { name: String },
    /// Delete a deck with all its cards
    DeleteDeck { name: String },
    /// Add a word to a deck
    Add {
        deck: String,
        term: String,
        definition: String,
    },
    /// Delete a card by id (see `list`)
    DeleteCard { id: i64 },
    /// Show the cards of a deck with their mastery
    List { deck: String },
    /// Study the cards due today
    Study { deck: String },
    /// Show cards scheduled for later days
    Upcoming { deck: String },
    /// Reset learning data of a deck
    Reset { deck: String },
    /// Move the simulated date one day forward
    AdvanceDay,
    /// Export a deck to a JSON file
    Export { deck: String, path: PathBuf },
    /// Import a deck from a JSON file
    Import { path: PathBuf },
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load_or_default(cli.config.as_deref())?;
    logging::init_tracing(&config.log_level);

    let database_path = cli.database.unwrap_or(config.database_path);
    let conn = db::init_database(&database_path)?;
    let mut app = App::new(conn, config.study);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Decks => app.list_decks(&mut out)?,
        Command::NewDeck { name } => app.new_deck(&name, &mut out)?,
        Command::DeleteDeck { name } => app.delete_deck(&name, &mut out)?,
        Command::Add {
            deck,
            term,
            definition,
        } => app.add_card(&deck, &term, &definition, &mut out)?,
        Command::DeleteCard { id } => app.delete_card(id, &mut out)?,
        Command::List { deck } => app.list_cards(&deck, &mut out)?,
        Command::Study { deck } => {
            let stdin = io::stdin();
            app.study(&deck, &mut stdin.lock(), &mut out)?
        }
        Command::Upcoming { deck } => app.upcoming(&deck, &mut out)?,
        Command::Reset { deck } => app.reset(&deck, &mut out)?,
        Command::AdvanceDay => app.advance_day(&mut out)?,
        Command::Export { deck, path } => app.export(&deck, &path, &mut out)?,
        Command::Import { path } => app.import(&path, &mut out)?,
    }

    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
