//! Lifecycle logging macros.
//!
//! Every event carries `component`, `op` and `event`; end events add
//! `duration_ms`, error events add `err.kind` and `err.code`.

/// Log the start of an operation.
///
/// ```
/// # use assertx_core::log_op_start;
/// log_op_start!("evaluate");
/// log_op_start!("evaluate", constraint = "is anything");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::assertx_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::assertx_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation.
///
/// ```
/// # use assertx_core::log_op_end;
/// log_op_end!("evaluate", duration_ms = 3u64);
/// log_op_end!("evaluate", duration_ms = 3u64, matched = true);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::assertx_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::assertx_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log a failed operation. `$err` is anything convertible into
/// [`ExError`](crate::errors::ExError).
///
/// ```
/// # use assertx_core::{log_op_error, errors::AssertxError};
/// let err = AssertxError::InvalidAttributeName { name: "1x".to_string() };
/// log_op_error!("read_attribute", err, duration_ms = 0u64);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::assertx_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::assertx_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            $($field)*
        );
    }};
}
