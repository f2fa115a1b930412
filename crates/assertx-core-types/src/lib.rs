//! Core types shared across assertx facilities
//!
//! This crate provides the canonical schema constants used by both the
//! error facility and the logging facility, so that every emitted event
//! and every structured error carries the same field keys.

pub mod schema;
