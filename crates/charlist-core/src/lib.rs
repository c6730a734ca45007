//! Charlist Core - entity model, error facility and logging facility
//!
//! This crate provides the foundational pieces shared by every layer of the
//! character sheet organizer:
//! - Character aggregate with its tags, rule packages and backups
//! - Typed store identifiers and the unsaved-id sentinel
//! - Fixed-format timestamp codec used by the persisted schema
//! - Structured error taxonomy (`ExError` / `CharlistError`)
//! - Structured logging facility with boundary macros

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod timestamp;

pub use charlist_core_types as core_types;

// Re-export commonly used types
pub use errors::{CharlistError, ExError, ExErrorKind, Result};
pub use model::{
    Backup, BackupId, Character, CharacterId, CharacterTag, Color, Package, PackageDraft,
    PackageId, Tag, TagDraft, TagId,
};
