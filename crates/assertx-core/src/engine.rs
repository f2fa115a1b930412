//! Evaluation boundary.
//!
//! The entry points a caller (an assertion facade) uses: evaluate a
//! constraint against a value, resolve an attribute, compare two document
//! trees. These functions own lifecycle logging (`log_op_start!`,
//! `log_op_end!`, `log_op_error!`); the modules beneath them only emit
//! `tracing::debug!` details.
//!
//! ## Assertion counting
//!
//! Every evaluation adds the constraint's cost to the [`AssertionCounter`]
//! handed in by the caller, and every explicit failure signal adds one.
//! The counter is the only shared mutable state of the engine; it uses
//! atomic increments so a single counter can be shared between threads.

use crate::attribute;
use crate::constraint::Constraint;
use crate::errors::{AssertxError, Result};
use crate::structure::{self, StructureMismatch, TreeNode};
use crate::value::Value;
use crate::{log_op_end, log_op_error, log_op_start};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Running count of performed assertions.
#[derive(Debug, Default)]
pub struct AssertionCounter {
    count: AtomicUsize,
}

impl AssertionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `cost` assertions.
    pub fn add(&self, cost: usize) {
        self.count.fetch_add(cost, Ordering::Relaxed);
    }

    /// Count one explicit failure signal.
    pub fn record_failure_signal(&self) {
        self.add(1);
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.count.store(0, Ordering::Relaxed);
    }
}

/// Outcome of one evaluation, with everything a reporter needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    matched: bool,
    cost: usize,
    description: String,
    failure: Option<String>,
    actual: String,
}

impl Verdict {
    pub fn matched(&self) -> bool {
        self.matched
    }

    pub fn cost(&self) -> usize {
        self.cost
    }

    /// Description of the whole constraint.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Description of what failed, if the match failed.
    pub fn failure_description(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Rendering of the evaluated value.
    pub fn actual(&self) -> &str {
        &self.actual
    }

    /// Escalate a failed verdict into an error.
    ///
    /// # Errors
    ///
    /// `AssertionFailed` when the constraint did not match.
    pub fn into_result(self) -> Result<()> {
        match self.failure {
            None => Ok(()),
            Some(description) => Err(AssertxError::AssertionFailed {
                actual: self.actual,
                description,
            }),
        }
    }
}

/// Evaluate `constraint` against `actual`, adding its cost to `counter`.
pub fn evaluate(constraint: &Constraint, actual: &Value, counter: &AssertionCounter) -> Verdict {
    let description = constraint.describe();
    log_op_start!("evaluate", constraint = description.as_str());
    let start = Instant::now();

    let cost = constraint.cost();
    let (matched, failure) = constraint.evaluate(actual);
    counter.add(cost);

    log_op_end!(
        "evaluate",
        duration_ms = start.elapsed().as_millis() as u64,
        matched = matched,
        cost = cost as u64,
        assertion_count = counter.count() as u64
    );

    Verdict {
        matched,
        cost,
        description,
        failure,
        actual: actual.to_string(),
    }
}

/// Evaluate and escalate a failed match.
///
/// # Errors
///
/// `AssertionFailed` when the constraint did not match.
pub fn assert_that(
    constraint: &Constraint,
    actual: &Value,
    counter: &AssertionCounter,
) -> Result<()> {
    evaluate(constraint, actual, counter).into_result()
}

/// Count an explicit failure signal and build the error that carries it.
pub fn signal_failure(counter: &AssertionCounter, message: impl Into<String>) -> AssertxError {
    counter.record_failure_signal();
    AssertxError::FailureSignaled {
        message: message.into(),
    }
}

/// Resolve an attribute, with lifecycle logging.
///
/// # Errors
///
/// See [`attribute::resolve_attribute`].
pub fn read_attribute(subject: &Value, name: &str) -> Result<Value> {
    log_op_start!(
        "read_attribute",
        subject = %subject.type_name(),
        attribute = name
    );
    let start = Instant::now();

    let value = attribute::resolve_attribute(subject, name).map_err(|e| {
        log_op_error!(
            "read_attribute",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "read_attribute",
        duration_ms = start.elapsed().as_millis() as u64
    );
    Ok(value)
}

/// Compare two document trees, with lifecycle logging.
pub fn compare_structure(
    expected: &TreeNode,
    actual: &TreeNode,
    check_attributes: bool,
) -> Vec<StructureMismatch> {
    log_op_start!("compare_structure", check_attributes = check_attributes);
    let start = Instant::now();

    let mismatches = structure::equal_structure(expected, actual, check_attributes);

    log_op_end!(
        "compare_structure",
        duration_ms = start.elapsed().as_millis() as u64,
        mismatch_count = mismatches.len() as u64
    );
    mismatches
}
