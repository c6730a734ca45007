//! Core types shared across the charlist facilities
//!
//! This crate holds the canonical vocabulary used by both the error
//! and logging facilities, so every layer emits the same field keys
//! and event names.

pub mod schema;
