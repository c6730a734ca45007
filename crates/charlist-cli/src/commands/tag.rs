//! Tag commands
//!
//! Usage: charlist tag <list|add|delete|link|unlink>

use super::{require_character, CommandResult};
use charlist_core::model::{CharacterTag, Color, TagDraft};
use charlist_engine::CharacterRepository;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct TagArgs {
    #[command(subcommand)]
    pub command: TagCommand,
}

#[derive(Debug, Subcommand)]
pub enum TagCommand {
    /// List the tag catalog
    List,
    /// Add a tag to the catalog (an existing tag keeps its colour)
    Add(AddArgs),
    /// Delete a tag from the catalog and from every character
    Delete(NameArgs),
    /// Attach a tag to a character
    Link(LinkArgs),
    /// Detach a tag from a character
    Unlink(LinkArgs),
}

#[derive(Debug, Args)]
pub struct AddArgs {
    pub name: String,

    /// #RRGGBB or #AARRGGBB
    #[arg(long, default_value = "#808080")]
    pub color: String,
}

#[derive(Debug, Args)]
pub struct NameArgs {
    pub name: String,
}

#[derive(Debug, Args)]
pub struct LinkArgs {
    pub character_id: i64,
    pub name: String,
}

pub fn execute(args: TagArgs, repo: &CharacterRepository) -> CommandResult {
    match args.command {
        TagCommand::List => {
            for tag in repo.get_all_tags()? {
                println!("{}\t{}\t{}", tag.id, tag.name, tag.color);
            }
            Ok(())
        }
        TagCommand::Add(add_args) => {
            let color = Color::parse_hex(&add_args.color)?;
            let tag = repo.add_tag(TagDraft::new(add_args.name, color))?;
            println!("{}\t{}\t{}", tag.id, tag.name, tag.color);
            Ok(())
        }
        TagCommand::Delete(name_args) => {
            let tag = repo
                .get_all_tags()?
                .into_iter()
                .find(|t| t.name == name_args.name)
                .ok_or_else(|| format!("tag '{}' not found", name_args.name))?;
            repo.delete_tag(&tag)?;
            println!("Deleted tag {}", tag.name);
            Ok(())
        }
        TagCommand::Link(link_args) => execute_link(link_args, repo),
        TagCommand::Unlink(link_args) => execute_unlink(link_args, repo),
    }
}

fn execute_link(args: LinkArgs, repo: &CharacterRepository) -> CommandResult {
    let mut character = require_character(repo, args.character_id)?;
    if character.has_tag(&args.name) {
        println!("Character {} already has tag {}", character.id, args.name);
        return Ok(());
    }

    let stored = repo
        .get_all_tags()?
        .into_iter()
        .find(|t| t.name == args.name);
    character.tags.push(match stored {
        Some(tag) => CharacterTag::Stored(tag),
        None => CharacterTag::Draft(TagDraft::new(args.name.clone(), Color::GRAY)),
    });

    let updated = repo.update_character(character)?;
    println!("Linked tag {} to character {}", args.name, updated.id);
    Ok(())
}

fn execute_unlink(args: LinkArgs, repo: &CharacterRepository) -> CommandResult {
    let mut character = require_character(repo, args.character_id)?;
    character.tags.retain(|t| t.name() != args.name);

    let updated = repo.update_character(character)?;
    println!("Unlinked tag {} from character {}", args.name, updated.id);
    Ok(())
}
