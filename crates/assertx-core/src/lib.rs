//! assertx core: the constraint evaluation engine behind a test-assertion
//! library.
//!
//! - [`comparator`]: structural equality with tolerance, depth bound,
//!   canonicalization and case folding
//! - [`constraint`]: atomic checks and the `Not`/`And`/`Or`/`Xor`
//!   combinators, with cost and description
//! - [`attribute`]: reads of declared fields regardless of visibility,
//!   searching ancestors
//! - [`structure`]: structural comparison of document trees
//! - [`engine`]: evaluation boundary and assertion counting
//!
//! ```
//! use assertx_core::{evaluate, AssertionCounter, Constraint, Value};
//!
//! let counter = AssertionCounter::new();
//! let c = Constraint::and(vec![Constraint::greater_than(1), Constraint::less_than(10)]);
//! assert!(evaluate(&c, &Value::Int(5), &counter).matched());
//! assert_eq!(counter.count(), 2);
//! ```

pub use assertx_core_types;

pub mod attribute;
pub mod comparator;
pub mod config;
pub mod constraint;
pub mod engine;
pub mod errors;
pub mod logging_facility;
pub mod reflect;
pub mod structure;
pub mod value;

pub use attribute::{has_attribute, resolve_attribute, AccessGuard};
pub use comparator::{equals, Comparator, EqualityOptions};
pub use config::EngineConfig;
pub use constraint::Constraint;
pub use engine::{assert_that, evaluate, signal_failure, AssertionCounter, Verdict};
pub use errors::{AssertxError, ExError, ExErrorKind, Result};
pub use reflect::{ClassBuilder, ClassRef, ObjectRef, TypeRegistry, Visibility};
pub use structure::{equal_structure, StructureMismatch, TreeNode};
pub use value::{Key, Value};
