//! Character repository with boundary logging
//!
//! High-level API over one SQLite connection. Every public method loads or
//! writes whole aggregates and is serialised through the connection mutex.
//!
//! ## Logging Ownership
//!
//! This layer owns lifecycle logging:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! The store uses only `tracing::debug!()` for internal details.
//!
//! ## Atomicity
//!
//! `add_character` and `update_character` run inside one transaction. A
//! failure in any step rolls back the scalar write and every link change
//! made before it.

use crate::sync;
use charlist_core::errors::{CharlistError, ExError, ExErrorKind, Result};
use charlist_core::model::{
    Backup, BackupId, Character, CharacterId, Package, PackageDraft, Tag, TagDraft,
};
use charlist_core::{log_op_end, log_op_error, log_op_start, timestamp};
use charlist_store::errors::from_rusqlite;
use charlist_store::repo::hydration;
use charlist_store::{db, migrations, SqliteRepo};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Repository for characters, their tags, rule packages and backups
pub struct CharacterRepository {
    conn: Mutex<Connection>,
}

impl CharacterRepository {
    /// Wrap an open connection, enabling foreign keys and applying migrations
    ///
    /// # Errors
    ///
    /// Storage failure while configuring the connection or creating tables;
    /// `MigrationChecksum` if the database was migrated by a different schema.
    pub fn new(conn: Connection) -> Result<Self> {
        db::configure(&conn)?;
        Self::with_configured(conn)
    }

    fn with_configured(mut conn: Connection) -> Result<Self> {
        let applied = migrations::apply_migrations(&mut conn)?;
        if applied > 0 {
            tracing::info!(applied, "schema migrations applied");
        }
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open (or create) a database file
    ///
    /// # Errors
    ///
    /// See [`CharacterRepository::new`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "opening character database");
        Self::with_configured(db::open(path)?)
    }

    /// Private in-memory database, used by tests
    ///
    /// # Errors
    ///
    /// See [`CharacterRepository::new`].
    pub fn open_in_memory() -> Result<Self> {
        Self::with_configured(db::open_in_memory()?)
    }

    /// Close the underlying connection
    ///
    /// # Errors
    ///
    /// Storage failure if SQLite refuses to close the handle.
    pub fn close(self) -> Result<()> {
        let conn = self
            .conn
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        conn.close().map_err(|(_, err)| from_rusqlite(err))
    }

    // ==================== Characters ====================

    /// Insert a character and link every tag and package it carries
    ///
    /// Tags are matched to the catalog by name (created if absent); packages
    /// must already exist. Returns the aggregate as read back from the store.
    ///
    /// # Errors
    ///
    /// Storage failure, including a missing name or campaign and a package
    /// id that is not in the catalog. Nothing is written on failure.
    pub fn add_character(&self, mut character: Character) -> Result<Character> {
        self.boundary("add_character", |conn| {
            let tx = conn.transaction().map_err(from_rusqlite)?;

            character.id = SqliteRepo::insert_character(&tx, &character)?;
            for tag in &character.tags {
                let tag_id = SqliteRepo::get_or_create_tag_id(&tx, tag.name(), tag.color())?;
                SqliteRepo::link_tag(&tx, character.id, tag_id)?;
            }
            for package in &character.packages {
                SqliteRepo::link_package(&tx, character.id, package.id)?;
            }
            let stored = reload(&tx, character)?;

            tx.commit().map_err(from_rusqlite)?;
            tracing::debug!(character_id = stored.id.get(), "character inserted");
            Ok(stored)
        })
    }

    /// Fully populated character, or `None` if the id is unknown
    ///
    /// # Errors
    ///
    /// Storage failure, including a malformed persisted timestamp.
    pub fn get_character(&self, id: CharacterId) -> Result<Option<Character>> {
        self.boundary("get_character", |conn| hydration::load_character(conn, id))
    }

    /// Every character, most recently opened first
    ///
    /// # Errors
    ///
    /// Storage failure.
    pub fn get_all_characters(&self) -> Result<Vec<Character>> {
        self.boundary("get_all_characters", |conn| {
            hydration::load_all_characters(conn)
        })
    }

    /// Persist `character` as the desired state of its row and associations
    ///
    /// Order: scalar fields, tags, packages, backups, then a reload of the
    /// whole aggregate from the store. Unsaved backups come back with their
    /// generated ids.
    ///
    /// An id with no row is not an error: the scalar update touches nothing
    /// and, as long as there is nothing to link, the submitted scalars are
    /// returned with empty associations.
    ///
    /// # Errors
    ///
    /// Storage failure at any step; the whole update is rolled back.
    pub fn update_character(&self, mut character: Character) -> Result<Character> {
        self.boundary("update_character", |conn| {
            let tx = conn.transaction().map_err(from_rusqlite)?;
            let id = character.id;

            let rows = SqliteRepo::update_character(&tx, &character)?;
            let tags = sync::sync_tags(&tx, id, &character.tags)?;
            let packages = sync::sync_packages(&tx, id, &character.packages)?;
            let backups = sync::sync_backups(&tx, id, &mut character.backups)?;
            let stored = reload(&tx, character)?;

            tx.commit().map_err(from_rusqlite)?;
            tracing::debug!(
                character_id = id.get(),
                rows,
                tags_added = tags.added,
                tags_removed = tags.removed,
                packages_added = packages.added,
                packages_removed = packages.removed,
                backups_added = backups.added,
                backups_removed = backups.removed,
                backups_updated = backups.updated,
                "character synchronized"
            );
            Ok(stored)
        })
    }

    /// Stamp `last_opened` with the current time and save scalar fields only
    ///
    /// # Errors
    ///
    /// Storage failure.
    pub fn update_last_opened(&self, mut character: Character) -> Result<Character> {
        self.boundary("update_last_opened", |conn| {
            character.last_opened = timestamp::now();
            SqliteRepo::update_character(conn, &character)?;
            Ok(character)
        })
    }

    /// Delete a character; its links and backups go with it, catalog rows stay
    ///
    /// # Errors
    ///
    /// Storage failure.
    pub fn delete_character(&self, id: CharacterId) -> Result<()> {
        self.boundary("delete_character", |conn| {
            let rows = SqliteRepo::delete_character(conn, id)?;
            tracing::debug!(character_id = id.get(), rows, "character deleted");
            Ok(())
        })
    }

    // ==================== Tags ====================

    /// Whole tag catalog, ordered by name
    ///
    /// # Errors
    ///
    /// Storage failure.
    pub fn get_all_tags(&self) -> Result<Vec<Tag>> {
        self.boundary("get_all_tags", |conn| SqliteRepo::list_tags(conn))
    }

    /// Get or create a tag by name
    ///
    /// An existing tag is returned as stored, keeping its original colour.
    ///
    /// # Errors
    ///
    /// Storage failure.
    pub fn add_tag(&self, draft: TagDraft) -> Result<Tag> {
        self.boundary("add_tag", |conn| {
            let id = SqliteRepo::get_or_create_tag_id(conn, &draft.name, draft.color)?;
            let stored = SqliteRepo::get_tag(conn, id)?;
            Ok(stored.unwrap_or_else(|| Tag::new(id, draft.name, draft.color)))
        })
    }

    /// Delete a tag from the catalog, unlinking it from every character
    ///
    /// # Errors
    ///
    /// Storage failure.
    pub fn delete_tag(&self, tag: &Tag) -> Result<()> {
        self.boundary("delete_tag", |conn| {
            SqliteRepo::delete_tag(conn, tag.id)?;
            Ok(())
        })
    }

    // ==================== Packages ====================

    /// Whole package catalog, ordered by name
    ///
    /// # Errors
    ///
    /// Storage failure.
    pub fn get_all_packages(&self) -> Result<Vec<Package>> {
        self.boundary("get_all_packages", |conn| SqliteRepo::list_packages(conn))
    }

    /// Insert a package into the catalog
    ///
    /// A name already in the catalog returns the stored package unchanged;
    /// the draft's other fields are discarded.
    ///
    /// # Errors
    ///
    /// Storage failure.
    pub fn add_package(&self, draft: PackageDraft) -> Result<Package> {
        self.boundary("add_package", |conn| {
            if let Some(existing) = SqliteRepo::find_package_by_name(conn, &draft.name)? {
                return Ok(existing);
            }
            let id = SqliteRepo::insert_package(conn, &draft)?;
            Ok(draft.into_package(id))
        })
    }

    /// Delete a package that no character uses
    ///
    /// # Errors
    ///
    /// `PackageInUse` if at least one character links the package; the row
    /// is left intact. Storage failure otherwise.
    pub fn delete_package(&self, package: &Package) -> Result<()> {
        self.boundary("delete_package", |conn| {
            let users = SqliteRepo::list_characters_for_package(conn, package.id)?;
            if !users.is_empty() {
                return Err(CharlistError::PackageInUse {
                    package_id: package.id.get(),
                    name: package.name.clone(),
                    character_count: users.len(),
                }
                .into());
            }
            SqliteRepo::delete_package(conn, package.id)?;
            Ok(())
        })
    }

    // ==================== Backups ====================

    /// Backups of a character, newest first
    ///
    /// # Errors
    ///
    /// Storage failure.
    pub fn get_backups_for_character(&self, character_id: CharacterId) -> Result<Vec<Backup>> {
        self.boundary("get_backups_for_character", |conn| {
            SqliteRepo::list_backups_for_character(conn, character_id)
        })
    }

    /// Insert a backup record and return the stored row; the incoming id is ignored
    ///
    /// # Errors
    ///
    /// Storage failure, including an owner that does not exist.
    pub fn add_backup(&self, mut backup: Backup) -> Result<Backup> {
        self.boundary("add_backup", |conn| {
            backup.id = SqliteRepo::insert_backup(conn, &backup)?;
            Ok(SqliteRepo::get_backup(conn, backup.id)?.unwrap_or(backup))
        })
    }

    /// Delete a backup record by id; an unknown id is a no-op
    ///
    /// # Errors
    ///
    /// Storage failure.
    pub fn delete_backup(&self, id: BackupId) -> Result<()> {
        self.boundary("delete_backup", |conn| {
            SqliteRepo::delete_backup(conn, id)?;
            Ok(())
        })
    }

    /// Delete the record behind a backup value
    ///
    /// # Errors
    ///
    /// Storage failure.
    pub fn delete_backup_entry(&self, backup: &Backup) -> Result<()> {
        self.delete_backup(backup.id)
    }

    // ==================== Internals ====================

    fn lock(&self, op: &str) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| {
            ExError::new(ExErrorKind::Internal)
                .with_op(op)
                .with_message("connection mutex poisoned")
        })
    }

    /// Run `f` on the locked connection between start and end events
    fn boundary<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut Connection) -> Result<T>,
    ) -> Result<T> {
        log_op_start!(op);
        let start = Instant::now();

        let result = self.lock(op).and_then(|mut conn| f(&mut *conn));

        match &result {
            Ok(_) => {
                log_op_end!(op, duration_ms = start.elapsed().as_millis() as u64);
            }
            Err(err) => {
                log_op_error!(
                    op,
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
            }
        }

        result
    }
}

/// Read a just-written character back inside the same transaction
///
/// Falls back to the submitted scalars when the row is absent, which only
/// happens for an update of an unknown id.
fn reload(conn: &Connection, mut submitted: Character) -> Result<Character> {
    match hydration::load_character(conn, submitted.id)? {
        Some(stored) => Ok(stored),
        None => {
            hydration::load_associations(conn, &mut submitted)?;
            Ok(submitted)
        }
    }
}
