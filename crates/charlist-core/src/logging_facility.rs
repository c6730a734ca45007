//! Structured logging
//!
//! - [`init`] installs the subscriber once, per [`Profile`]
//! - `log_op_start!` / `log_op_end!` / `log_op_error!` mark operation
//!   boundaries with a fixed field set
//! - [`test_capture`] records events in memory for assertions
//!
//! ```rust
//! use charlist_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```
//!
//! Only the repository layer in `charlist-engine` emits boundary events.
//! The store logs row-level detail at debug level.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
