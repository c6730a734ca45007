use super::{BackupId, CharacterId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Backup snapshot owned by exactly one character
///
/// `id == BackupId::UNSAVED` means the row does not exist yet; the
/// synchronization step inserts it and writes the generated id back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backup {
    pub id: BackupId,
    pub character_id: CharacterId,
    pub backup_path: String,
    pub backup_date: NaiveDateTime,
}

impl Backup {
    /// Unsaved backup for the given character
    pub fn new(
        character_id: CharacterId,
        backup_path: impl Into<String>,
        backup_date: NaiveDateTime,
    ) -> Self {
        Self {
            id: BackupId::UNSAVED,
            character_id,
            backup_path: backup_path.into(),
            backup_date,
        }
    }

    pub fn is_unsaved(&self) -> bool {
        self.id.is_unsaved()
    }
}
