//! Subcommand handlers
//!
//! Each handler prints plain tab-separated text on stdout.

use charlist_core::model::{Character, CharacterId};
use charlist_engine::CharacterRepository;

pub mod backup;
pub mod character;
pub mod package;
pub mod tag;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Load a character or fail with a not-found message
pub(crate) fn require_character(
    repo: &CharacterRepository,
    id: i64,
) -> Result<Character, Box<dyn std::error::Error>> {
    repo.get_character(CharacterId::new(id))?
        .ok_or_else(|| format!("character {} not found", id).into())
}
