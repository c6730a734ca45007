//! Migration runner
//!
//! Brings a database up to the embedded schema. Each pending migration runs
//! in its own transaction together with its ledger row.

use crate::errors::{checksum_mismatch, from_rusqlite, migration_error, Result};
use crate::migrations::embedded::{get_migrations, Migration};
use charlist_core::timestamp;
use rusqlite::{params, Connection, OptionalExtension};

enum LedgerState {
    Pending,
    Applied,
    Altered { recorded: String },
}

/// Apply every pending migration, returning how many ran
///
/// # Errors
///
/// `MigrationChecksum` if an applied migration's recorded checksum differs
/// from the embedded SQL; storage failure if a migration does not execute.
pub fn apply_migrations(conn: &mut Connection) -> Result<usize> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY,
            migration_id TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL,
            checksum TEXT NOT NULL
        );",
    )
    .map_err(from_rusqlite)?;

    let mut applied = 0;
    for migration in get_migrations() {
        let checksum = migration.checksum();
        match ledger_state(conn, &migration, &checksum)? {
            LedgerState::Applied => {
                tracing::debug!(migration_id = migration.id, "migration up to date");
            }
            LedgerState::Altered { recorded } => {
                return Err(checksum_mismatch(migration.id, &recorded, &checksum));
            }
            LedgerState::Pending => {
                run_migration(conn, &migration, &checksum)?;
                applied += 1;
            }
        }
    }

    Ok(applied)
}

/// Ids of applied migrations in application order
///
/// # Errors
///
/// Storage failure, including a database that was never migrated.
pub fn applied_migrations(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT migration_id FROM schema_version ORDER BY id")
        .map_err(from_rusqlite)?;
    let ids = stmt
        .query_map([], |row| row.get(0))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<String>, _>>()
        .map_err(from_rusqlite)?;
    Ok(ids)
}

fn ledger_state(conn: &Connection, migration: &Migration, checksum: &str) -> Result<LedgerState> {
    let recorded: Option<String> = conn
        .query_row(
            "SELECT checksum FROM schema_version WHERE migration_id = ?1",
            [migration.id],
            |row| row.get(0),
        )
        .optional()
        .map_err(from_rusqlite)?;

    Ok(match recorded {
        None => LedgerState::Pending,
        Some(recorded) if recorded == checksum => LedgerState::Applied,
        Some(recorded) => LedgerState::Altered { recorded },
    })
}

fn run_migration(conn: &mut Connection, migration: &Migration, checksum: &str) -> Result<()> {
    let tx = conn.transaction().map_err(from_rusqlite)?;

    tx.execute_batch(migration.sql)
        .map_err(|e| migration_error(migration.id, &e.to_string()))?;
    tx.execute(
        "INSERT INTO schema_version (migration_id, applied_at, checksum) VALUES (?1, ?2, ?3)",
        params![
            migration.id,
            timestamp::format(&timestamp::now()),
            checksum
        ],
    )
    .map_err(from_rusqlite)?;

    tx.commit().map_err(from_rusqlite)?;
    tracing::debug!(migration_id = migration.id, "migration applied");
    Ok(())
}
