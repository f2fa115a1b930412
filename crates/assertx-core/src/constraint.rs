//! Constraints and the combinator algebra.
//!
//! A [`Constraint`] is an immutable predicate over a [`Value`] with a
//! human-readable description and a cost (the number of atomic checks it
//! stands for). The set of variants is closed; combinators hold further
//! constraints, so composition nests to any depth.
//!
//! ## Combinator semantics
//!
//! | Variant | Matches when                       | Cost            |
//! |---------|------------------------------------|-----------------|
//! | `Not`   | inner does not match               | inner           |
//! | `And`   | every member matches (empty: true) | sum of members  |
//! | `Or`    | some member matches (empty: false) | sum of members  |
//! | `Xor`   | an odd number of members match     | sum of members  |

use crate::attribute;
use crate::comparator::{self, Comparator, EqualityOptions};
use crate::errors::Result;
use crate::value::{Key, Value, ValueKind};
use std::fmt;
use std::sync::Arc;

/// Equality against a fixed expected value.
#[derive(Debug, Clone)]
pub struct EqualityCheck {
    expected: Value,
    options: EqualityOptions,
}

impl EqualityCheck {
    /// # Errors
    ///
    /// `InvalidTolerance` if `options.tolerance` is negative or NaN.
    pub fn new(expected: Value, options: EqualityOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { expected, options })
    }

    pub fn expected(&self) -> &Value {
        &self.expected
    }

    pub fn options(&self) -> &EqualityOptions {
        &self.options
    }

    pub fn matches(&self, actual: &Value) -> bool {
        Comparator::new(self.options).equals(&self.expected, actual)
    }
}

/// Expected type of a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeCheck {
    Kind(ValueKind),
    Numeric,
    Scalar,
    /// Object whose class is, or inherits from, the named class
    InstanceOf(String),
}

impl TypeCheck {
    fn matches(&self, value: &Value) -> bool {
        match self {
            TypeCheck::Kind(kind) => value.kind() == *kind,
            TypeCheck::Numeric => value.is_numeric(),
            TypeCheck::Scalar => value.is_scalar(),
            TypeCheck::InstanceOf(class) => value
                .as_object()
                .is_some_and(|obj| obj.class().is_subclass_of(class)),
        }
    }
}

impl fmt::Display for TypeCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeCheck::Kind(kind) => write!(f, "is of type \"{}\"", kind),
            TypeCheck::Numeric => f.write_str("is of type \"numeric\""),
            TypeCheck::Scalar => f.write_str("is of type \"scalar\""),
            TypeCheck::InstanceOf(class) => write!(f, "is an instance of class \"{}\"", class),
        }
    }
}

/// User-supplied predicate.
#[derive(Clone)]
pub struct Callback {
    description: String,
    predicate: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// A composable predicate over a value.
#[derive(Debug, Clone)]
pub enum Constraint {
    IsEqual(EqualityCheck),
    IsIdentical(Value),
    IsType(TypeCheck),
    IsAnything,
    GreaterThan(Value),
    LessThan(Value),
    StringContains { needle: String, ignore_case: bool },
    ArrayHasKey(Key),
    Count(usize),
    ObjectHasAttribute(String),
    Callback(Callback),
    /// Resolve the named attribute of the value, then evaluate `inner` on it
    Attribute { name: String, inner: Box<Constraint> },
    Not(Box<Constraint>),
    And(Vec<Constraint>),
    Or(Vec<Constraint>),
    Xor(Vec<Constraint>),
}

impl Constraint {
    // ----- constructors -----

    pub fn equal_to(expected: impl Into<Value>) -> Self {
        Constraint::IsEqual(EqualityCheck {
            expected: expected.into(),
            options: EqualityOptions::default(),
        })
    }

    /// # Errors
    ///
    /// `InvalidTolerance` if `options.tolerance` is negative or NaN.
    pub fn equal_to_with(expected: impl Into<Value>, options: EqualityOptions) -> Result<Self> {
        EqualityCheck::new(expected.into(), options).map(Constraint::IsEqual)
    }

    pub fn identical_to(expected: impl Into<Value>) -> Self {
        Constraint::IsIdentical(expected.into())
    }

    pub fn of_kind(kind: ValueKind) -> Self {
        Constraint::IsType(TypeCheck::Kind(kind))
    }

    pub fn instance_of(class: impl Into<String>) -> Self {
        Constraint::IsType(TypeCheck::InstanceOf(class.into()))
    }

    pub fn greater_than(value: impl Into<Value>) -> Self {
        Constraint::GreaterThan(value.into())
    }

    pub fn less_than(value: impl Into<Value>) -> Self {
        Constraint::LessThan(value.into())
    }

    pub fn contains_string(needle: impl Into<String>) -> Self {
        Constraint::StringContains {
            needle: needle.into(),
            ignore_case: false,
        }
    }

    pub fn contains_string_ignoring_case(needle: impl Into<String>) -> Self {
        Constraint::StringContains {
            needle: needle.into(),
            ignore_case: true,
        }
    }

    /// Matches sequences and mappings with exactly `n` elements.
    pub fn count(n: usize) -> Self {
        Constraint::Count(n)
    }

    pub fn has_key(key: impl Into<Key>) -> Self {
        Constraint::ArrayHasKey(key.into())
    }

    pub fn has_attribute(name: impl Into<String>) -> Self {
        Constraint::ObjectHasAttribute(name.into())
    }

    pub fn callback<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Constraint::Callback(Callback {
            description: description.into(),
            predicate: Arc::new(predicate),
        })
    }

    pub fn attribute(name: impl Into<String>, inner: Constraint) -> Self {
        Constraint::Attribute {
            name: name.into(),
            inner: Box::new(inner),
        }
    }

    pub fn not(inner: Constraint) -> Self {
        Constraint::Not(Box::new(inner))
    }

    pub fn and(members: impl IntoIterator<Item = Constraint>) -> Self {
        Constraint::And(members.into_iter().collect())
    }

    pub fn or(members: impl IntoIterator<Item = Constraint>) -> Self {
        Constraint::Or(members.into_iter().collect())
    }

    pub fn xor(members: impl IntoIterator<Item = Constraint>) -> Self {
        Constraint::Xor(members.into_iter().collect())
    }

    // ----- evaluation -----

    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Constraint::IsEqual(check) => check.matches(value),
            Constraint::IsIdentical(expected) => comparator::identical(expected, value),
            Constraint::IsType(check) => check.matches(value),
            Constraint::IsAnything => true,
            Constraint::GreaterThan(bound) => order(value, bound) == Some(std::cmp::Ordering::Greater),
            Constraint::LessThan(bound) => order(value, bound) == Some(std::cmp::Ordering::Less),
            Constraint::StringContains {
                needle,
                ignore_case,
            } => match value.as_str() {
                Some(haystack) if *ignore_case => {
                    haystack.to_lowercase().contains(&needle.to_lowercase())
                }
                Some(haystack) => haystack.contains(needle.as_str()),
                None => false,
            },
            Constraint::ArrayHasKey(key) => {
                matches!(value, Value::Map(_) | Value::List(_)) && value.get(key).is_some()
            }
            Constraint::Count(expected) => value.len() == Some(*expected),
            Constraint::ObjectHasAttribute(name) => attribute::has_attribute(value, name),
            Constraint::Callback(callback) => (callback.predicate)(value),
            Constraint::Attribute { name, inner } => {
                match attribute::resolve_attribute(value, name) {
                    Ok(resolved) => inner.matches(&resolved),
                    Err(err) => {
                        tracing::debug!(attribute = name.as_str(), error = %err, "attribute not resolvable");
                        false
                    }
                }
            }
            Constraint::Not(inner) => !inner.matches(value),
            Constraint::And(members) => members.iter().all(|c| c.matches(value)),
            Constraint::Or(members) => members.iter().any(|c| c.matches(value)),
            Constraint::Xor(members) => members.iter().filter(|c| c.matches(value)).count() % 2 == 1,
        }
    }

    /// Number of atomic checks this constraint represents.
    pub fn cost(&self) -> usize {
        match self {
            Constraint::Attribute { inner, .. } | Constraint::Not(inner) => inner.cost(),
            Constraint::And(members) | Constraint::Or(members) | Constraint::Xor(members) => {
                members.iter().map(Constraint::cost).sum()
            }
            _ => 1,
        }
    }

    /// What the constraint checks, phrased to follow "Failed asserting that <value>".
    pub fn describe(&self) -> String {
        match self {
            Constraint::IsEqual(check) => {
                let mut out = format!("is equal to {}", check.expected);
                if check.options.tolerance > 0.0 {
                    out.push_str(&format!(" with delta <{}>", check.options.tolerance));
                }
                out
            }
            Constraint::IsIdentical(expected) => format!("is identical to {}", expected),
            Constraint::IsType(check) => check.to_string(),
            Constraint::IsAnything => "is anything".to_string(),
            Constraint::GreaterThan(bound) => format!("is greater than {}", bound),
            Constraint::LessThan(bound) => format!("is less than {}", bound),
            Constraint::StringContains {
                needle,
                ignore_case,
            } => {
                if *ignore_case {
                    format!("contains {:?} ignoring case", needle)
                } else {
                    format!("contains {:?}", needle)
                }
            }
            Constraint::ArrayHasKey(key) => format!("has the key {}", key),
            Constraint::Count(n) => format!("count matches {}", n),
            Constraint::ObjectHasAttribute(name) => format!("has attribute {:?}", name),
            Constraint::Callback(callback) => callback.description.clone(),
            Constraint::Attribute { name, inner } => {
                format!("attribute {:?} {}", name, inner.describe())
            }
            Constraint::Not(inner) => format!("not {}", inner.describe()),
            Constraint::And(members) if members.is_empty() => "is anything".to_string(),
            Constraint::Or(members) | Constraint::Xor(members) if members.is_empty() => {
                "matches no constraint".to_string()
            }
            Constraint::And(members) => join(members, " and "),
            Constraint::Or(members) => join(members, " or "),
            Constraint::Xor(members) => join(members, " xor "),
        }
    }

    /// Evaluate once, returning the match result and, on failure, the
    /// description to report. A conjunction names its first failing
    /// member; every other variant reports its full description. Each
    /// nested constraint (and each user callback) runs at most once.
    pub fn evaluate(&self, value: &Value) -> (bool, Option<String>) {
        match self {
            Constraint::And(members) => {
                for member in members {
                    if let (false, failure) = member.evaluate(value) {
                        return (false, failure);
                    }
                }
                (true, None)
            }
            Constraint::Attribute { name, inner } => {
                match attribute::resolve_attribute(value, name) {
                    Ok(resolved) => match inner.evaluate(&resolved) {
                        (true, _) => (true, None),
                        (false, failure) => {
                            let failure = failure.unwrap_or_else(|| inner.describe());
                            (false, Some(format!("attribute {:?} {}", name, failure)))
                        }
                    },
                    Err(err) => {
                        tracing::debug!(attribute = name.as_str(), error = %err, "attribute not resolvable");
                        (
                            false,
                            Some(format!("has a resolvable attribute {:?} ({})", name, err)),
                        )
                    }
                }
            }
            _ => {
                let matched = self.matches(value);
                (matched, (!matched).then(|| self.describe()))
            }
        }
    }

    /// Description to report when `value` fails this constraint.
    pub fn failure_description(&self, value: &Value) -> String {
        self.evaluate(value)
            .1
            .unwrap_or_else(|| self.describe())
    }

    fn is_combinator(&self) -> bool {
        matches!(
            self,
            Constraint::And(_) | Constraint::Or(_) | Constraint::Xor(_)
        )
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

fn join(members: &[Constraint], separator: &str) -> String {
    members
        .iter()
        .map(|c| {
            if c.is_combinator() {
                format!("( {} )", c.describe())
            } else {
                c.describe()
            }
        })
        .collect::<Vec<_>>()
        .join(separator)
}

/// Ordering for `GreaterThan`/`LessThan`: numbers numerically, strings
/// lexicographically, anything else unordered.
fn order(value: &Value, bound: &Value) -> Option<std::cmp::Ordering> {
    match (value, bound) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (a, b) if a.is_numeric() && b.is_numeric() => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
