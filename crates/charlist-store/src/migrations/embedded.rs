//! Migrations compiled into the binary
//!
//! Ids sort in application order. A migration's SQL must never change once
//! released: the runner compares its SHA-256 against the ledger.

use sha2::{Digest, Sha256};

pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

impl Migration {
    /// Lowercase hex SHA-256 of the SQL text
    pub fn checksum(&self) -> String {
        hex::encode(Sha256::digest(self.sql.as_bytes()))
    }
}

pub fn get_migrations() -> Vec<Migration> {
    vec![Migration {
        id: "001_character_schema",
        sql: include_str!("../../migrations/001_character_schema.sql"),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_stable_hex() {
        let migration = &get_migrations()[0];
        let checksum = migration.checksum();
        assert_eq!(checksum.len(), 64);
        assert_eq!(checksum, migration.checksum());
        assert!(checksum.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_checksum_changes_with_sql() {
        let a = Migration { id: "a", sql: "CREATE TABLE t (x);" };
        let b = Migration { id: "a", sql: "CREATE TABLE t (y);" };
        assert_ne!(a.checksum(), b.checksum());
    }
}
