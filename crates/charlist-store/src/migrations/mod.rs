//! Schema migrations
//!
//! Embedded SQL files applied in order, each recorded in `schema_version`
//! with its checksum. Running them again on every startup is safe.

mod embedded;
mod runner;

pub use embedded::{get_migrations, Migration};
pub use runner::{applied_migrations, apply_migrations};
