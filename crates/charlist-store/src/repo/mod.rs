//! Repository layer for persisting the character aggregate to SQLite

pub mod hydration;
pub mod sqlite_repo;

pub use sqlite_repo::SqliteRepo;
