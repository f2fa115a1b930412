//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Evaluation fields
pub const FIELD_CONSTRAINT: &str = "constraint";
pub const FIELD_COST: &str = "cost";
pub const FIELD_MATCHED: &str = "matched";
pub const FIELD_ASSERTION_COUNT: &str = "assertion_count";

// Attribute resolution fields
pub const FIELD_SUBJECT: &str = "subject";
pub const FIELD_ATTRIBUTE: &str = "attribute";

// Structural comparison fields
pub const FIELD_MISMATCH_COUNT: &str = "mismatch_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
