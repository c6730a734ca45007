//! Association reconciliation
//!
//! Each `sync_*` function moves the persisted links of one character to the
//! desired list it is given. The diff helpers are pure so the set algebra can
//! be checked without a database.
//!
//! Tag and package identity is the store id. A tag without an id (a draft) is
//! never equal to a linked tag, so it always lands in `added`; the
//! get-or-create lookup by name is then the only place a draft is matched to
//! an existing catalog row, and `INSERT OR IGNORE` keeps the link unique.

use charlist_core::model::{Backup, BackupId, CharacterId, CharacterTag, Package, PackageId, Tag};
use charlist_store::errors::Result;
use charlist_store::SqliteRepo;
use rusqlite::Connection;
use std::collections::BTreeSet;

/// Row operations issued by one reconciliation step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncCounts {
    pub added: usize,
    pub removed: usize,
    pub updated: usize,
}

#[derive(Debug)]
pub struct TagDiff<'a> {
    pub removed: Vec<&'a Tag>,
    pub added: Vec<&'a CharacterTag>,
}

/// `removed = current \ desired`, `added = desired \ current`, by id
pub fn diff_tags<'a>(current: &'a [Tag], desired: &'a [CharacterTag]) -> TagDiff<'a> {
    let desired_ids: BTreeSet<_> = desired.iter().filter_map(CharacterTag::id).collect();
    let current_ids: BTreeSet<_> = current.iter().map(|t| t.id).collect();

    TagDiff {
        removed: current
            .iter()
            .filter(|t| !desired_ids.contains(&t.id))
            .collect(),
        added: desired
            .iter()
            .filter(|t| t.id().map_or(true, |id| !current_ids.contains(&id)))
            .collect(),
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct PackageDiff {
    pub removed: Vec<PackageId>,
    pub added: Vec<PackageId>,
}

pub fn diff_packages(current: &[Package], desired: &[Package]) -> PackageDiff {
    let current_ids: BTreeSet<_> = current.iter().map(|p| p.id).collect();
    let desired_ids: BTreeSet<_> = desired.iter().map(|p| p.id).collect();

    PackageDiff {
        removed: current_ids.difference(&desired_ids).copied().collect(),
        added: desired_ids.difference(&current_ids).copied().collect(),
    }
}

/// Persisted backup ids absent from the desired list
pub fn stale_backup_ids(current: &[Backup], desired: &[Backup]) -> Vec<BackupId> {
    let keep: BTreeSet<_> = desired
        .iter()
        .filter(|b| !b.is_unsaved())
        .map(|b| b.id)
        .collect();
    current
        .iter()
        .map(|b| b.id)
        .filter(|id| !keep.contains(id))
        .collect()
}

/// Unlink tags missing from `desired`, get-or-create and link the rest
pub fn sync_tags(
    conn: &Connection,
    character_id: CharacterId,
    desired: &[CharacterTag],
) -> Result<SyncCounts> {
    let current = SqliteRepo::list_tags_for_character(conn, character_id)?;
    let diff = diff_tags(&current, desired);
    let mut counts = SyncCounts::default();

    for tag in &diff.removed {
        if SqliteRepo::unlink_tag_by_name(conn, character_id, &tag.name)? {
            counts.removed += 1;
        }
    }
    for tag in &diff.added {
        let tag_id = SqliteRepo::get_or_create_tag_id(conn, tag.name(), tag.color())?;
        if SqliteRepo::link_tag(conn, character_id, tag_id)? {
            counts.added += 1;
        }
    }

    Ok(counts)
}

/// Link and unlink package ids; packages are never created here
pub fn sync_packages(
    conn: &Connection,
    character_id: CharacterId,
    desired: &[Package],
) -> Result<SyncCounts> {
    let current = SqliteRepo::list_packages_for_character(conn, character_id)?;
    let diff = diff_packages(&current, desired);
    let mut counts = SyncCounts::default();

    for package_id in diff.removed {
        if SqliteRepo::unlink_package(conn, character_id, package_id)? {
            counts.removed += 1;
        }
    }
    for package_id in diff.added {
        if SqliteRepo::link_package(conn, character_id, package_id)? {
            counts.added += 1;
        }
    }

    Ok(counts)
}

/// Delete stale backups, insert unsaved ones and refresh the rest
///
/// Inserted backups get their new id written back into `desired`. Every
/// entry is re-owned by `character_id` first. Saved entries are updated
/// whether or not they changed; an id owned by another character is left
/// alone.
pub fn sync_backups(
    conn: &Connection,
    character_id: CharacterId,
    desired: &mut [Backup],
) -> Result<SyncCounts> {
    let current = SqliteRepo::list_backups_for_character(conn, character_id)?;
    let mut counts = SyncCounts::default();

    for id in stale_backup_ids(&current, desired) {
        counts.removed += SqliteRepo::delete_backup(conn, id)?;
    }

    for backup in desired.iter_mut() {
        backup.character_id = character_id;
        if backup.is_unsaved() {
            backup.id = SqliteRepo::insert_backup(conn, backup)?;
            counts.added += 1;
        } else {
            counts.updated += SqliteRepo::update_backup(conn, backup)?;
        }
    }

    Ok(counts)
}
