//! Package commands
//!
//! Usage: charlist package <list|add|delete|link|unlink>

use super::{require_character, CommandResult};
use charlist_core::model::{Package, PackageDraft};
use charlist_engine::CharacterRepository;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct PackageArgs {
    #[command(subcommand)]
    pub command: PackageCommand,
}

#[derive(Debug, Subcommand)]
pub enum PackageCommand {
    /// List the package catalog
    List,
    /// Register a rule package
    Add(AddArgs),
    /// Delete a package no character uses
    Delete(IdArgs),
    /// Attach a package to a character
    Link(LinkArgs),
    /// Detach a package from a character
    Unlink(LinkArgs),
}

#[derive(Debug, Args)]
pub struct AddArgs {
    pub name: String,
    pub file_path: String,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub version: Option<String>,
}

#[derive(Debug, Args)]
pub struct IdArgs {
    pub id: i64,
}

#[derive(Debug, Args)]
pub struct LinkArgs {
    pub character_id: i64,
    pub package_id: i64,
}

pub fn execute(args: PackageArgs, repo: &CharacterRepository) -> CommandResult {
    match args.command {
        PackageCommand::List => {
            for package in repo.get_all_packages()? {
                println!(
                    "{}\t{}\t{}\t{}",
                    package.id,
                    package.name,
                    package.version.as_deref().unwrap_or("-"),
                    package.file_path
                );
            }
            Ok(())
        }
        PackageCommand::Add(add_args) => {
            let mut draft = PackageDraft::new(add_args.name, add_args.file_path);
            draft.description = add_args.description;
            draft.version = add_args.version;
            let package = repo.add_package(draft)?;
            println!("Added package {}\t{}", package.id, package.name);
            Ok(())
        }
        PackageCommand::Delete(id_args) => {
            let package = find_package(repo, id_args.id)?;
            repo.delete_package(&package)?;
            println!("Deleted package {}", package.name);
            Ok(())
        }
        PackageCommand::Link(link_args) => {
            let package = find_package(repo, link_args.package_id)?;
            let mut character = require_character(repo, link_args.character_id)?;
            if !character.packages.contains(&package) {
                character.packages.push(package.clone());
            }
            let updated = repo.update_character(character)?;
            println!("Linked package {} to character {}", package.name, updated.id);
            Ok(())
        }
        PackageCommand::Unlink(link_args) => {
            let mut character = require_character(repo, link_args.character_id)?;
            character.packages.retain(|p| p.id.get() != link_args.package_id);
            let updated = repo.update_character(character)?;
            println!(
                "Unlinked package {} from character {}",
                link_args.package_id, updated.id
            );
            Ok(())
        }
    }
}

fn find_package(repo: &CharacterRepository, id: i64) -> Result<Package, Box<dyn std::error::Error>> {
    repo.get_all_packages()?
        .into_iter()
        .find(|p| p.id.get() == id)
        .ok_or_else(|| format!("package {} not found", id).into())
}
