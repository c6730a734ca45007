//! Character commands
//!
//! Usage: charlist character <list|show|add|touch|delete>

use super::{require_character, CommandResult};
use crate::settings::Settings;
use charlist_core::model::{Character, CharacterTag, Color, Package, TagDraft};
use charlist_core::timestamp;
use charlist_engine::CharacterRepository;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct CharacterArgs {
    #[command(subcommand)]
    pub command: CharacterCommand,
}

#[derive(Debug, Subcommand)]
pub enum CharacterCommand {
    /// List characters, most recently opened first
    List(ListArgs),
    /// Show a character with its tags, packages and backups
    Show(IdArgs),
    /// Add a character
    Add(AddArgs),
    /// Mark a character as opened now
    Touch(IdArgs),
    /// Delete a character together with its links and backups
    Delete(IdArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only characters carrying this tag
    #[arg(long)]
    pub tag: Option<String>,
}

#[derive(Debug, Args)]
pub struct IdArgs {
    pub id: i64,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Character name (defaults to the configured default name)
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub campaign: String,

    /// Sheet file (defaults to <characters_dir>/<name>.xml)
    #[arg(long)]
    pub sheet: Option<String>,

    /// Tag to attach; created in the catalog if missing
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Package id to attach
    #[arg(long = "package")]
    pub packages: Vec<i64>,
}

pub fn execute(args: CharacterArgs, repo: &CharacterRepository, settings: &Settings) -> CommandResult {
    match args.command {
        CharacterCommand::List(list_args) => execute_list(list_args, repo),
        CharacterCommand::Show(id_args) => execute_show(id_args, repo),
        CharacterCommand::Add(add_args) => execute_add(add_args, repo, settings),
        CharacterCommand::Touch(id_args) => execute_touch(id_args, repo),
        CharacterCommand::Delete(id_args) => execute_delete(id_args, repo),
    }
}

fn execute_list(args: ListArgs, repo: &CharacterRepository) -> CommandResult {
    for character in repo.get_all_characters()? {
        if let Some(tag) = &args.tag {
            if !character.has_tag(tag) {
                continue;
            }
        }
        println!(
            "{}\t{}\t{}\t{}\t{}",
            character.id,
            character.display_name(),
            character.campaign.as_deref().unwrap_or_default(),
            timestamp::format(&character.last_opened),
            character.tag_names().join(",")
        );
    }
    Ok(())
}

fn execute_show(args: IdArgs, repo: &CharacterRepository) -> CommandResult {
    let character = require_character(repo, args.id)?;

    println!("id:          {}", character.id);
    println!("name:        {}", character.display_name());
    println!(
        "campaign:    {}",
        character.campaign.as_deref().unwrap_or_default()
    );
    println!("last opened: {}", timestamp::format(&character.last_opened));
    println!("sheet:       {}", character.sheet_path);
    for tag in &character.tags {
        println!("tag:         {} {}", tag.name(), tag.color());
    }
    for package in &character.packages {
        println!("package:     {} {}", package.id, package.name);
    }
    for backup in &character.backups {
        println!(
            "backup:      {} {} {}",
            backup.id,
            timestamp::format(&backup.backup_date),
            backup.backup_path
        );
    }
    Ok(())
}

fn execute_add(args: AddArgs, repo: &CharacterRepository, settings: &Settings) -> CommandResult {
    let name = args
        .name
        .unwrap_or_else(|| settings.default_character_name.clone());
    let sheet = match args.sheet {
        Some(sheet) => sheet,
        None => settings.sheet_path_for(&name).display().to_string(),
    };

    let mut character = Character::new(name, args.campaign, timestamp::now(), sheet);
    character.tags = args
        .tags
        .into_iter()
        .map(|tag| CharacterTag::Draft(TagDraft::new(tag, Color::GRAY)))
        .collect();
    character.packages = resolve_packages(repo, &args.packages)?;

    let added = repo.add_character(character)?;
    println!("Added character {}", added.id);
    Ok(())
}

fn execute_touch(args: IdArgs, repo: &CharacterRepository) -> CommandResult {
    let character = require_character(repo, args.id)?;
    let touched = repo.update_last_opened(character)?;
    println!(
        "Opened character {} at {}",
        touched.id,
        timestamp::format(&touched.last_opened)
    );
    Ok(())
}

fn execute_delete(args: IdArgs, repo: &CharacterRepository) -> CommandResult {
    let character = require_character(repo, args.id)?;
    repo.delete_character(character.id)?;
    println!("Deleted character {}", character.id);
    Ok(())
}

fn resolve_packages(
    repo: &CharacterRepository,
    ids: &[i64],
) -> Result<Vec<Package>, Box<dyn std::error::Error>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let catalog = repo.get_all_packages()?;
    ids.iter()
        .map(|id| {
            catalog
                .iter()
                .find(|p| p.id.get() == *id)
                .cloned()
                .ok_or_else(|| format!("package {} not found", id).into())
        })
        .collect()
}
