//! Store error constructors
//!
//! Everything the store returns is an `ExError`. SQLite faults of any kind
//! become `Storage`; migration problems carry the migration id as entity.

use charlist_core::errors::{ExError, ExErrorKind};

pub type Result<T> = std::result::Result<T, ExError>;

/// Migration SQL failed to execute
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Storage)
        .with_op("apply_migration")
        .with_entity_id(migration_id)
        .with_message(reason)
}

/// Applied migration no longer matches the embedded SQL
pub fn checksum_mismatch(migration_id: &str, recorded: &str, embedded: &str) -> ExError {
    ExError::new(ExErrorKind::MigrationChecksum)
        .with_op("apply_migration")
        .with_entity_id(migration_id)
        .with_message(format!(
            "recorded checksum {} differs from embedded {}",
            recorded, embedded
        ))
}

/// Constraint violations, I/O faults, bad column values and the rest
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Storage)
        .with_op("sqlite")
        .with_message(err.to_string())
}
