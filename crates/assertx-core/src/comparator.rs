//! Structural equality with tolerance, depth bound, canonicalization and
//! case folding.
//!
//! ## Rules
//!
//! - Numeric leaves (int or float, in any combination) match when
//!   `|expected - actual| <= tolerance`. NaN never matches; equal
//!   infinities do.
//! - Booleans are their own leaf kind and never compare equal to numbers.
//! - Strings compare exactly, or case-folded when `ignore_case` is set.
//!   Map keys are never case-folded.
//! - Sequences compare by length then position. With `canonicalize` both
//!   sides are ordered by a derived total order first, so the comparison
//!   becomes multiset equality.
//! - Mappings compare key sets (order ignored), then values per key.
//! - Objects of the same class compare every slot, whatever its visibility.
//! - Each step into a sequence, mapping or object consumes one unit of
//!   `max_depth`. Once it is exhausted, two composites are unequal unless
//!   they are the same object. Cyclic graphs therefore terminate as
//!   "unequal" rather than hanging.
//! - Anything else (mismatched shapes, null against non-null) is unequal.

use crate::errors::{AssertxError, Result};
use crate::reflect::{ObjectRef, Slot};
use crate::value::{Key, Value};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Default recursion budget for structural comparison.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Configuration for an equality check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EqualityOptions {
    /// Allowed absolute difference between numeric leaves
    pub tolerance: f64,
    /// Recursion budget for nested sequences, mappings and objects
    pub max_depth: usize,
    /// Compare sequences as order-independent multisets
    pub canonicalize: bool,
    /// Case-fold string leaves before comparing
    pub ignore_case: bool,
}

impl Default for EqualityOptions {
    fn default() -> Self {
        Self {
            tolerance: 0.0,
            max_depth: DEFAULT_MAX_DEPTH,
            canonicalize: false,
            ignore_case: false,
        }
    }
}

impl EqualityOptions {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn canonicalized(mut self) -> Self {
        self.canonicalize = true;
        self
    }

    pub fn case_insensitive(mut self) -> Self {
        self.ignore_case = true;
        self
    }

    /// # Errors
    ///
    /// `InvalidTolerance` if the tolerance is negative or NaN.
    pub fn validate(&self) -> Result<()> {
        if self.tolerance.is_nan() || self.tolerance < 0.0 {
            return Err(AssertxError::InvalidTolerance {
                tolerance: self.tolerance,
            });
        }
        Ok(())
    }
}

/// Compare `expected` and `actual` under `options`.
pub fn equals(expected: &Value, actual: &Value, options: &EqualityOptions) -> bool {
    Comparator::new(*options).equals(expected, actual)
}

/// Structural comparator bound to a fixed set of options.
#[derive(Debug, Clone, Copy, Default)]
pub struct Comparator {
    options: EqualityOptions,
}

impl Comparator {
    pub fn new(options: EqualityOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EqualityOptions {
        &self.options
    }

    pub fn equals(&self, expected: &Value, actual: &Value) -> bool {
        self.compare(expected, actual, self.options.max_depth)
    }

    fn compare(&self, expected: &Value, actual: &Value, depth: usize) -> bool {
        match (expected, actual) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(e), Value::Bool(a)) => e == a,
            (e, a) if e.is_numeric() && a.is_numeric() => self.numeric_equal(e, a),
            (Value::Str(e), Value::Str(a)) => self.string_equal(e, a),
            (Value::Type(e), Value::Type(a)) => Rc::ptr_eq(e, a) || e.name() == a.name(),
            (Value::Object(e), Value::Object(a)) if e.ptr_eq(a) => true,
            (e, a) if depth == 0 && e.is_composite() && a.is_composite() => {
                tracing::debug!(
                    expected_kind = %e.kind(),
                    actual_kind = %a.kind(),
                    "depth bound reached, treating substructure as unequal"
                );
                false
            }
            (Value::List(e), Value::List(a)) => self.list_equal(e, a, depth),
            (Value::Map(e), Value::Map(a)) => self.map_equal(e, a, depth),
            (Value::Object(e), Value::Object(a)) => self.object_equal(e, a, depth),
            _ => false,
        }
    }

    fn numeric_equal(&self, expected: &Value, actual: &Value) -> bool {
        let tolerance = self.options.tolerance;
        match (expected, actual) {
            (Value::Int(e), Value::Int(a)) => {
                let diff = (i128::from(*e) - i128::from(*a)).unsigned_abs();
                diff == 0 || (diff as f64) <= tolerance
            }
            (e, a) => match (e.as_f64(), a.as_f64()) {
                (Some(e), Some(a)) => e == a || (e - a).abs() <= tolerance,
                _ => false,
            },
        }
    }

    fn string_equal(&self, expected: &str, actual: &str) -> bool {
        if self.options.ignore_case {
            expected.to_lowercase() == actual.to_lowercase()
        } else {
            expected == actual
        }
    }

    fn list_equal(&self, expected: &[Value], actual: &[Value], depth: usize) -> bool {
        if expected.len() != actual.len() {
            return false;
        }
        let (expected, actual) = if self.options.canonicalize {
            (self.sorted(expected, depth - 1), self.sorted(actual, depth - 1))
        } else {
            (expected.iter().collect(), actual.iter().collect())
        };
        expected
            .into_iter()
            .zip(actual)
            .all(|(e, a)| self.compare(e, a, depth - 1))
    }

    fn map_equal(&self, expected: &[(Key, Value)], actual: &[(Key, Value)], depth: usize) -> bool {
        if expected.len() != actual.len() {
            return false;
        }
        let actual: BTreeMap<&Key, &Value> = actual.iter().map(|(k, v)| (k, v)).collect();
        expected.iter().all(|(key, e)| match actual.get(key) {
            Some(a) => self.compare(e, a, depth - 1),
            None => false,
        })
    }

    fn object_equal(&self, expected: &ObjectRef, actual: &ObjectRef, depth: usize) -> bool {
        if expected.class().name() != actual.class().name() {
            return false;
        }
        let expected_slots = expected.slots();
        let actual_slots = actual.slots();
        if expected_slots.len() != actual_slots.len() {
            return false;
        }
        expected_slots.iter().all(|e| {
            match actual_slots.iter().find(|a| same_slot(e, a)) {
                Some(a) => match (e.value(), a.value()) {
                    (None, None) => true,
                    (Some(ev), Some(av)) => self.compare(ev, av, depth - 1),
                    _ => false,
                },
                None => false,
            }
        })
    }

    /// Order `items` by the canonical total order, without touching the
    /// caller's data.
    fn sorted<'a>(&self, items: &'a [Value], depth: usize) -> Vec<&'a Value> {
        let mut refs: Vec<&Value> = items.iter().collect();
        refs.sort_by(|a, b| self.canonical_cmp(a, b, depth));
        refs
    }

    /// Total order used for canonicalization: kind first, then value.
    /// Integers and floats share one numeric rank and are ordered by their
    /// exact mathematical value, so `1` and `1.0` sort together and
    /// `2^53 + 1` sorts after `2^53` even against a float. Structures
    /// deeper than the budget compare equal.
    fn canonical_cmp(&self, a: &Value, b: &Value, depth: usize) -> Ordering {
        let rank = |v: &Value| -> u8 {
            match v {
                Value::Null => 0,
                Value::Bool(_) => 1,
                Value::Int(_) | Value::Float(_) => 2,
                Value::Str(_) => 3,
                Value::List(_) => 4,
                Value::Map(_) => 5,
                Value::Object(_) => 6,
                Value::Type(_) => 7,
            }
        };
        match (a, b) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
            (Value::Int(x), Value::Int(y)) => x.cmp(y),
            (Value::Int(x), Value::Float(y)) => int_float_cmp(*x, *y),
            (Value::Float(x), Value::Int(y)) => int_float_cmp(*y, *x).reverse(),
            (Value::Float(x), Value::Float(y)) => float_cmp(*x, *y),
            (Value::Str(x), Value::Str(y)) => {
                if self.options.ignore_case {
                    x.to_lowercase().cmp(&y.to_lowercase())
                } else {
                    x.cmp(y)
                }
            }
            (Value::Type(x), Value::Type(y)) => x.name().cmp(y.name()),
            (x, y) if x.is_composite() && y.is_composite() && depth == 0 => {
                rank(x).cmp(&rank(y))
            }
            (Value::List(x), Value::List(y)) => {
                let (x, y) = if self.options.canonicalize {
                    (self.sorted(x, depth - 1), self.sorted(y, depth - 1))
                } else {
                    (x.iter().collect(), y.iter().collect())
                };
                self.lexicographic(x.into_iter(), y.into_iter(), depth - 1)
            }
            (Value::Map(x), Value::Map(y)) => {
                let x: BTreeMap<&Key, &Value> = x.iter().map(|(k, v)| (k, v)).collect();
                let y: BTreeMap<&Key, &Value> = y.iter().map(|(k, v)| (k, v)).collect();
                x.keys()
                    .cmp(y.keys())
                    .then_with(|| self.lexicographic(x.into_values(), y.into_values(), depth - 1))
            }
            (Value::Object(x), Value::Object(y)) => {
                if x.ptr_eq(y) {
                    return Ordering::Equal;
                }
                x.class()
                    .name()
                    .cmp(y.class().name())
                    .then_with(|| self.slots_cmp(x, y, depth - 1))
            }
            (x, y) => rank(x).cmp(&rank(y)),
        }
    }

    fn slots_cmp(&self, x: &ObjectRef, y: &ObjectRef, depth: usize) -> Ordering {
        let (xs, ys) = (x.slots(), y.slots());
        for (a, b) in xs.iter().zip(ys.iter()) {
            let ord = match (a.value(), b.value()) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(a), Some(b)) => self.canonical_cmp(a, b, depth),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        xs.len().cmp(&ys.len())
    }

    fn lexicographic<'a>(
        &self,
        mut x: impl Iterator<Item = &'a Value>,
        mut y: impl Iterator<Item = &'a Value>,
        depth: usize,
    ) -> Ordering {
        loop {
            match (x.next(), y.next()) {
                (None, None) => return Ordering::Equal,
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some(a), Some(b)) => match self.canonical_cmp(a, b, depth) {
                    Ordering::Equal => continue,
                    other => return other,
                },
            }
        }
    }
}

fn same_slot(a: &Slot, b: &Slot) -> bool {
    a.declaring_class() == b.declaring_class() && a.name() == b.name()
}

/// Strict identity.
///
/// Objects are identical only when they are the same instance. Scalars
/// must agree on kind and value (`1` is not identical to `1.0`); boolean
/// pairs follow the boolean leaf rule and NaN is never identical to
/// anything. Sequences and mappings must hold identical entries in the
/// same order.
pub fn identical(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(_), Value::Bool(_)) => Comparator::default().equals(expected, actual),
        (Value::Int(e), Value::Int(a)) => e == a,
        (Value::Float(e), Value::Float(a)) => e == a,
        (Value::Str(e), Value::Str(a)) => e == a,
        (Value::List(e), Value::List(a)) => {
            e.len() == a.len() && e.iter().zip(a.iter()).all(|(e, a)| identical(e, a))
        }
        (Value::Map(e), Value::Map(a)) => {
            e.len() == a.len()
                && e.iter()
                    .zip(a.iter())
                    .all(|((ek, ev), (ak, av))| ek == ak && identical(ev, av))
        }
        (Value::Object(e), Value::Object(a)) => e.ptr_eq(a),
        (Value::Type(e), Value::Type(a)) => Rc::ptr_eq(e, a),
        _ => false,
    }
}

/// Smallest float that no `i64` reaches: 2^63.
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

/// Exact ordering of an integer against a float. Positive NaN sorts above
/// every integer, negative NaN below, matching `f64::total_cmp`.
fn int_float_cmp(int: i64, float: f64) -> Ordering {
    if float.is_nan() {
        return if float.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if float >= I64_UPPER {
        return Ordering::Less;
    }
    if float < -I64_UPPER {
        return Ordering::Greater;
    }
    // In range, so the truncated float is exactly representable as i64.
    let whole = float.trunc();
    int.cmp(&(whole as i64)).then_with(|| {
        if float > whole {
            Ordering::Less
        } else if float < whole {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    })
}

/// Float ordering where `-0.0 == 0.0`, so it agrees with
/// [`int_float_cmp`]. NaN falls back to `total_cmp`.
fn float_cmp(x: f64, y: f64) -> Ordering {
    x.partial_cmp(&y).unwrap_or_else(|| x.total_cmp(&y))
}
