//! Charlist CLI
//!
//! Command-line front end for the character sheet organizer database

use charlist_core::logging_facility;
use charlist_engine::CharacterRepository;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod settings;

use settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "charlist")]
#[command(about = "Character sheet organizer - characters, tags, packages and backups", long_about = None)]
struct Cli {
    /// Database file; overrides CHARLIST_DB and the settings file
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Settings file
    #[arg(long, global = true, default_value = settings::DEFAULT_SETTINGS_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Character operations
    Character(commands::character::CharacterArgs),
    /// Tag catalog and tag links
    Tag(commands::tag::TagArgs),
    /// Rule package catalog and package links
    Package(commands::package::PackageArgs),
    /// Backup records of a character
    Backup(commands::backup::BackupArgs),
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> commands::CommandResult {
    let settings = Settings::load(&cli.config)?;
    logging_facility::init(settings.log_profile);

    let db_path = settings.database_path(cli.db, std::env::var(settings::DATABASE_ENV).ok());
    let repo = CharacterRepository::open(&db_path)?;

    let result = match cli.command {
        Commands::Character(args) => commands::character::execute(args, &repo, &settings),
        Commands::Tag(args) => commands::tag::execute(args, &repo),
        Commands::Package(args) => commands::package::execute(args, &repo),
        Commands::Backup(args) => commands::backup::execute(args, &repo),
    };

    repo.close()?;
    result
}
