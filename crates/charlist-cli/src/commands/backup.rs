//! Backup commands
//!
//! Usage: charlist backup <list|add|delete>

use super::{require_character, CommandResult};
use charlist_core::model::{Backup, BackupId};
use charlist_core::timestamp;
use charlist_engine::CharacterRepository;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct BackupArgs {
    #[command(subcommand)]
    pub command: BackupCommand,
}

#[derive(Debug, Subcommand)]
pub enum BackupCommand {
    /// List backups of a character, newest first
    List(ListArgs),
    /// Record a backup file for a character
    Add(AddArgs),
    /// Delete a backup record
    Delete(DeleteArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    pub character_id: i64,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    pub character_id: i64,
    pub path: String,

    /// "yyyy-MM-dd HH:mm:ss"; defaults to now
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub backup_id: i64,
}

pub fn execute(args: BackupArgs, repo: &CharacterRepository) -> CommandResult {
    match args.command {
        BackupCommand::List(list_args) => {
            let character = require_character(repo, list_args.character_id)?;
            for backup in repo.get_backups_for_character(character.id)? {
                println!(
                    "{}\t{}\t{}",
                    backup.id,
                    timestamp::format(&backup.backup_date),
                    backup.backup_path
                );
            }
            Ok(())
        }
        BackupCommand::Add(add_args) => {
            let date = match add_args.date.as_deref() {
                Some(text) => timestamp::parse(text)?,
                None => timestamp::now(),
            };
            let character = require_character(repo, add_args.character_id)?;
            let backup = repo.add_backup(Backup::new(character.id, add_args.path, date))?;
            println!("Added backup {}", backup.id);
            Ok(())
        }
        BackupCommand::Delete(delete_args) => {
            repo.delete_backup(BackupId::new(delete_args.backup_id))?;
            println!("Deleted backup {}", delete_args.backup_id);
            Ok(())
        }
    }
}
