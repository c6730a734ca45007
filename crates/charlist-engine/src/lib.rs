//! Charlist Engine - Synchronization layer
//!
//! Turns a desired in-memory character aggregate into the minimal set of
//! row operations, and exposes the repository API consumed by the UI and
//! the command line.

pub mod repository;
pub mod sync;

pub use repository::CharacterRepository;
