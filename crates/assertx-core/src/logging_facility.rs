//! Structured logging for the assertion engine
//!
//! - `init(profile)` installs the global subscriber once
//! - `log_op_start!`, `log_op_end!` and `log_op_error!` emit lifecycle events
//!   at the evaluation boundary ([`crate::engine`])
//! - [`init_test_capture`] records events in memory for assertions in tests
//!
//! ```rust
//! use assertx_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```
//!
//! Modules below the boundary (comparator, resolver, combinators) only
//! emit `tracing::debug!` details and never lifecycle events.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
