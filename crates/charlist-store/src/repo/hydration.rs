//! Hydration layer - assembles full character aggregates from SQLite rows
//!
//! Association order is deterministic: tags and packages by name, backups
//! newest first.

use crate::errors::Result;
use crate::repo::SqliteRepo;
use charlist_core::model::{Character, CharacterId, CharacterTag};
use rusqlite::Connection;

/// Load one character with its tags, packages and backups
///
/// Returns `Ok(None)` when no character has this id.
pub fn load_character(conn: &Connection, id: CharacterId) -> Result<Option<Character>> {
    match SqliteRepo::get_character(conn, id)? {
        Some(mut character) => {
            load_associations(conn, &mut character)?;
            Ok(Some(character))
        }
        None => Ok(None),
    }
}

/// Load every character, most recently opened first, fully populated
pub fn load_all_characters(conn: &Connection) -> Result<Vec<Character>> {
    SqliteRepo::list_characters(conn)?
        .into_iter()
        .map(|mut character| {
            load_associations(conn, &mut character)?;
            Ok(character)
        })
        .collect()
}

/// Replace the association lists of `character` with the persisted ones
///
/// Scalar fields are left as they are, so a caller can refresh an aggregate
/// it has just written without a second row read.
pub fn load_associations(conn: &Connection, character: &mut Character) -> Result<()> {
    character.tags = SqliteRepo::list_tags_for_character(conn, character.id)?
        .into_iter()
        .map(CharacterTag::Stored)
        .collect();
    character.packages = SqliteRepo::list_packages_for_character(conn, character.id)?;
    character.backups = SqliteRepo::list_backups_for_character(conn, character.id)?;
    Ok(())
}
