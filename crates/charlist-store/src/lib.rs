//! SQLite persistence for characters and their catalogs
//!
//! [`db`] opens connections with foreign keys enforced, [`migrations`] brings
//! the schema up to date, and [`SqliteRepo`] reads and writes single rows.
//! Assembling a whole character from its rows lives in [`repo::hydration`].

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

pub use errors::Result;
pub use repo::SqliteRepo;
