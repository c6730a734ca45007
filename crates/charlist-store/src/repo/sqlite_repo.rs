//! SQLite repository implementation
//!
//! Row-level gateway over the character schema. Each function issues a
//! single statement (get-or-create issues a lookup and at most one insert)
//! and knows nothing about the aggregate shape; reconciliation lives in the
//! engine.
//!
//! Every function takes `&Connection`, so callers may pass a
//! `rusqlite::Transaction` to group several calls atomically.

use crate::errors::{from_rusqlite, Result};
use charlist_core::model::{
    Backup, BackupId, Character, CharacterId, Color, Package, PackageDraft, PackageId, Tag,
    TagDraft, TagId,
};
use charlist_core::timestamp;
use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Params, Row};

/// SQLite gateway for characters, catalog entities, junctions and backups
pub struct SqliteRepo;

impl SqliteRepo {
    // ==================== Characters ====================

    /// Insert the scalar fields of a character and return the generated id
    ///
    /// The incoming id and association lists are ignored. A missing name or
    /// campaign fails on the NOT NULL constraint.
    pub fn insert_character(conn: &Connection, character: &Character) -> Result<CharacterId> {
        conn.execute(
            "INSERT INTO characters (name, campaign, last_opened, sheet_path)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                character.name,
                character.campaign,
                timestamp::format(&character.last_opened),
                character.sheet_path,
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(CharacterId::new(conn.last_insert_rowid()))
    }

    /// Get the scalar fields of a character; associations are left empty
    pub fn get_character(conn: &Connection, id: CharacterId) -> Result<Option<Character>> {
        conn.query_row(
            "SELECT id, name, campaign, last_opened, sheet_path FROM characters WHERE id = ?1",
            [id.get()],
            character_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Overwrite the scalar fields of a character, returning rows touched
    pub fn update_character(conn: &Connection, character: &Character) -> Result<usize> {
        conn.execute(
            "UPDATE characters SET name = ?1, campaign = ?2, last_opened = ?3, sheet_path = ?4
             WHERE id = ?5",
            params![
                character.name,
                character.campaign,
                timestamp::format(&character.last_opened),
                character.sheet_path,
                character.id.get(),
            ],
        )
        .map_err(from_rusqlite)
    }

    /// Delete a character row; junction rows and backups go with it via
    /// ON DELETE CASCADE
    pub fn delete_character(conn: &Connection, id: CharacterId) -> Result<usize> {
        conn.execute("DELETE FROM characters WHERE id = ?1", [id.get()])
            .map_err(from_rusqlite)
    }

    /// All characters, most recently opened first
    pub fn list_characters(conn: &Connection) -> Result<Vec<Character>> {
        collect_rows(
            conn,
            "SELECT id, name, campaign, last_opened, sheet_path FROM characters
             ORDER BY last_opened DESC",
            [],
            character_from_row,
        )
    }

    /// Characters currently linked to a package
    pub fn list_characters_for_package(
        conn: &Connection,
        package_id: PackageId,
    ) -> Result<Vec<Character>> {
        collect_rows(
            conn,
            "SELECT c.id, c.name, c.campaign, c.last_opened, c.sheet_path
             FROM characters c
             JOIN character_package cp ON c.id = cp.character_id
             WHERE cp.package_id = ?1
             ORDER BY c.id",
            [package_id.get()],
            character_from_row,
        )
    }

    // ==================== Tags ====================

    /// Insert a tag catalog row; fails if the name is taken
    pub fn insert_tag(conn: &Connection, draft: &TagDraft) -> Result<TagId> {
        conn.execute(
            "INSERT INTO tags (name, color) VALUES (?1, ?2)",
            params![draft.name, draft.color.to_signed()],
        )
        .map_err(from_rusqlite)?;

        Ok(TagId::new(conn.last_insert_rowid()))
    }

    pub fn find_tag_id_by_name(conn: &Connection, name: &str) -> Result<Option<TagId>> {
        conn.query_row("SELECT id FROM tags WHERE name = ?1", [name], |row| {
            row.get(0).map(TagId::new)
        })
        .optional()
        .map_err(from_rusqlite)
    }

    /// Return the id of the tag named `name`, creating it with `color` if
    /// absent
    ///
    /// An existing tag keeps its stored colour.
    pub fn get_or_create_tag_id(conn: &Connection, name: &str, color: Color) -> Result<TagId> {
        if let Some(id) = Self::find_tag_id_by_name(conn, name)? {
            return Ok(id);
        }

        let id = Self::insert_tag(conn, &TagDraft::new(name, color))?;
        tracing::debug!(tag_id = id.get(), name, "tag created");
        Ok(id)
    }

    pub fn get_tag(conn: &Connection, id: TagId) -> Result<Option<Tag>> {
        conn.query_row(
            "SELECT id, name, color FROM tags WHERE id = ?1",
            [id.get()],
            tag_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Delete a tag catalog row
    ///
    /// Unguarded: links from every character are dropped by the cascade.
    pub fn delete_tag(conn: &Connection, id: TagId) -> Result<usize> {
        conn.execute("DELETE FROM tags WHERE id = ?1", [id.get()])
            .map_err(from_rusqlite)
    }

    /// Whole tag catalog ordered by name
    pub fn list_tags(conn: &Connection) -> Result<Vec<Tag>> {
        collect_rows(
            conn,
            "SELECT id, name, color FROM tags ORDER BY name",
            [],
            tag_from_row,
        )
    }

    pub fn list_tags_for_character(conn: &Connection, character_id: CharacterId) -> Result<Vec<Tag>> {
        collect_rows(
            conn,
            "SELECT t.id, t.name, t.color
             FROM tags t
             JOIN character_tags ct ON t.id = ct.tag_id
             WHERE ct.character_id = ?1
             ORDER BY t.name",
            [character_id.get()],
            tag_from_row,
        )
    }

    /// Link a tag to a character; an existing link is left alone
    ///
    /// Returns whether a new junction row was written.
    pub fn link_tag(conn: &Connection, character_id: CharacterId, tag_id: TagId) -> Result<bool> {
        let inserted = conn
            .execute(
                "INSERT OR IGNORE INTO character_tags (character_id, tag_id) VALUES (?1, ?2)",
                [character_id.get(), tag_id.get()],
            )
            .map_err(from_rusqlite)?;
        Ok(inserted > 0)
    }

    /// Remove the link between a character and the tag named `name`
    ///
    /// Returns whether a junction row was deleted. The catalog row stays.
    pub fn unlink_tag_by_name(
        conn: &Connection,
        character_id: CharacterId,
        name: &str,
    ) -> Result<bool> {
        let deleted = conn
            .execute(
                "DELETE FROM character_tags
                 WHERE character_id = ?1
                   AND tag_id = (SELECT id FROM tags WHERE name = ?2)",
                params![character_id.get(), name],
            )
            .map_err(from_rusqlite)?;
        Ok(deleted > 0)
    }

    // ==================== Packages ====================

    /// Insert a package catalog row; fails if the name is taken
    pub fn insert_package(conn: &Connection, draft: &PackageDraft) -> Result<PackageId> {
        conn.execute(
            "INSERT INTO packages (name, description, file_path, version) VALUES (?1, ?2, ?3, ?4)",
            params![draft.name, draft.description, draft.file_path, draft.version],
        )
        .map_err(from_rusqlite)?;

        Ok(PackageId::new(conn.last_insert_rowid()))
    }

    pub fn get_package(conn: &Connection, id: PackageId) -> Result<Option<Package>> {
        conn.query_row(
            "SELECT id, name, description, file_path, version FROM packages WHERE id = ?1",
            [id.get()],
            package_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    pub fn find_package_by_name(conn: &Connection, name: &str) -> Result<Option<Package>> {
        conn.query_row(
            "SELECT id, name, description, file_path, version FROM packages WHERE name = ?1",
            [name],
            package_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    pub fn update_package(conn: &Connection, package: &Package) -> Result<usize> {
        conn.execute(
            "UPDATE packages SET name = ?1, description = ?2, file_path = ?3, version = ?4
             WHERE id = ?5",
            params![
                package.name,
                package.description,
                package.file_path,
                package.version,
                package.id.get(),
            ],
        )
        .map_err(from_rusqlite)
    }

    /// Delete a package catalog row without checking for users
    ///
    /// The in-use guard belongs to the caller; at this level the cascade
    /// silently drops junction rows.
    pub fn delete_package(conn: &Connection, id: PackageId) -> Result<usize> {
        conn.execute("DELETE FROM packages WHERE id = ?1", [id.get()])
            .map_err(from_rusqlite)
    }

    /// Whole package catalog ordered by name
    pub fn list_packages(conn: &Connection) -> Result<Vec<Package>> {
        collect_rows(
            conn,
            "SELECT id, name, description, file_path, version FROM packages ORDER BY name",
            [],
            package_from_row,
        )
    }

    pub fn list_packages_for_character(
        conn: &Connection,
        character_id: CharacterId,
    ) -> Result<Vec<Package>> {
        collect_rows(
            conn,
            "SELECT p.id, p.name, p.description, p.file_path, p.version
             FROM packages p
             JOIN character_package cp ON p.id = cp.package_id
             WHERE cp.character_id = ?1
             ORDER BY p.name",
            [character_id.get()],
            package_from_row,
        )
    }

    /// Link a package to a character; an existing link is left alone
    pub fn link_package(
        conn: &Connection,
        character_id: CharacterId,
        package_id: PackageId,
    ) -> Result<bool> {
        let inserted = conn
            .execute(
                "INSERT OR IGNORE INTO character_package (character_id, package_id) VALUES (?1, ?2)",
                [character_id.get(), package_id.get()],
            )
            .map_err(from_rusqlite)?;
        Ok(inserted > 0)
    }

    pub fn unlink_package(
        conn: &Connection,
        character_id: CharacterId,
        package_id: PackageId,
    ) -> Result<bool> {
        let deleted = conn
            .execute(
                "DELETE FROM character_package WHERE character_id = ?1 AND package_id = ?2",
                [character_id.get(), package_id.get()],
            )
            .map_err(from_rusqlite)?;
        Ok(deleted > 0)
    }

    // ==================== Backups ====================

    /// Insert a backup row and return the generated id
    ///
    /// Fails with a foreign-key violation if the owning character is absent.
    pub fn insert_backup(conn: &Connection, backup: &Backup) -> Result<BackupId> {
        conn.execute(
            "INSERT INTO character_backups (character_id, backup_path, backup_date)
             VALUES (?1, ?2, ?3)",
            params![
                backup.character_id.get(),
                backup.backup_path,
                timestamp::format(&backup.backup_date),
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(BackupId::new(conn.last_insert_rowid()))
    }

    pub fn get_backup(conn: &Connection, id: BackupId) -> Result<Option<Backup>> {
        conn.query_row(
            "SELECT id, character_id, backup_path, backup_date FROM character_backups WHERE id = ?1",
            [id.get()],
            backup_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Overwrite path and date of a backup; ownership never changes
    ///
    /// Only matches a row owned by `backup.character_id`, so an id belonging
    /// to another character updates nothing.
    pub fn update_backup(conn: &Connection, backup: &Backup) -> Result<usize> {
        conn.execute(
            "UPDATE character_backups SET backup_path = ?1, backup_date = ?2
             WHERE id = ?3 AND character_id = ?4",
            params![
                backup.backup_path,
                timestamp::format(&backup.backup_date),
                backup.id.get(),
                backup.character_id.get(),
            ],
        )
        .map_err(from_rusqlite)
    }

    pub fn delete_backup(conn: &Connection, id: BackupId) -> Result<usize> {
        conn.execute("DELETE FROM character_backups WHERE id = ?1", [id.get()])
            .map_err(from_rusqlite)
    }

    /// Backups of a character, newest first
    pub fn list_backups_for_character(
        conn: &Connection,
        character_id: CharacterId,
    ) -> Result<Vec<Backup>> {
        collect_rows(
            conn,
            "SELECT id, character_id, backup_path, backup_date
             FROM character_backups
             WHERE character_id = ?1
             ORDER BY backup_date DESC, id DESC",
            [character_id.get()],
            backup_from_row,
        )
    }
}

fn collect_rows<T, P, F>(conn: &Connection, sql: &str, params: P, map: F) -> Result<Vec<T>>
where
    P: Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql).map_err(from_rusqlite)?;
    let rows = stmt
        .query_map(params, map)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(rows)
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let raw: String = row.get(idx)?;
    timestamp::parse(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn character_from_row(row: &Row<'_>) -> rusqlite::Result<Character> {
    Ok(Character {
        id: CharacterId::new(row.get(0)?),
        name: row.get(1)?,
        campaign: row.get(2)?,
        last_opened: timestamp_column(row, 3)?,
        sheet_path: row.get(4)?,
        tags: Vec::new(),
        packages: Vec::new(),
        backups: Vec::new(),
    })
}

fn tag_from_row(row: &Row<'_>) -> rusqlite::Result<Tag> {
    let color: Option<i32> = row.get(2)?;
    Ok(Tag {
        id: TagId::new(row.get(0)?),
        name: row.get(1)?,
        color: color.map(Color::from_signed).unwrap_or_default(),
    })
}

fn package_from_row(row: &Row<'_>) -> rusqlite::Result<Package> {
    Ok(Package {
        id: PackageId::new(row.get(0)?),
        name: row.get(1)?,
        description: row.get(2)?,
        file_path: row.get(3)?,
        version: row.get(4)?,
    })
}

fn backup_from_row(row: &Row<'_>) -> rusqlite::Result<Backup> {
    Ok(Backup {
        id: BackupId::new(row.get(0)?),
        character_id: CharacterId::new(row.get(1)?),
        backup_path: row.get(2)?,
        backup_date: timestamp_column(row, 3)?,
    })
}
