//! Attribute resolution
//!
//! Reads a named field from an object instance or a class, whatever its
//! declared visibility, searching the class first and then each ancestor.
//! Non-public reads happen inside an [`AccessGuard`], which marks the
//! declaration accessible for the duration of the read and restores the
//! previous flag when dropped, on success and failure alike.

use crate::errors::{AssertxError, Result};
use crate::reflect::{ClassRef, FieldDecl, ObjectRef, TypeRegistry};
use crate::value::Value;

/// Whether `name` matches `[A-Za-z_\x7f-\xff][A-Za-z0-9_\x7f-\xff]*`.
///
/// Every byte of a non-ASCII UTF-8 character falls in `\x80-\xff`, so any
/// non-ASCII character is accepted wherever a letter is.
pub fn is_valid_attribute_name(name: &str) -> bool {
    let mut chars = name.chars();
    let is_start = |c: char| c.is_ascii_alphabetic() || c == '_' || u32::from(c) >= 0x7f;
    match chars.next() {
        Some(first) if is_start(first) => chars.all(|c| is_start(c) || c.is_ascii_digit()),
        _ => false,
    }
}

fn check_name(name: &str) -> Result<()> {
    if is_valid_attribute_name(name) {
        Ok(())
    } else {
        Err(AssertxError::InvalidAttributeName {
            name: name.to_string(),
        })
    }
}

/// Scoped elevation of a field's accessibility.
///
/// Restores the flag it found on drop, so nested or repeated guards over
/// the same declaration unwind to the original state.
pub struct AccessGuard<'a> {
    decl: &'a FieldDecl,
    previous: bool,
}

impl<'a> AccessGuard<'a> {
    pub fn acquire(decl: &'a FieldDecl) -> Self {
        let previous = decl.accessible_flag();
        decl.set_accessible(true);
        Self { decl, previous }
    }
}

impl Drop for AccessGuard<'_> {
    fn drop(&mut self) {
        self.decl.set_accessible(self.previous);
    }
}

/// Resolve `name` on an object instance or a type reference.
///
/// # Errors
///
/// - `InvalidAttributeName` if `name` is not an identifier
/// - `InvalidSubject` if `subject` is neither an object nor a type
/// - `AttributeNotFound` if no class in the chain declares `name`
/// - `AttributeUninitialized` if the declaration holds no value
pub fn resolve_attribute(subject: &Value, name: &str) -> Result<Value> {
    check_name(name)?;
    match subject {
        Value::Object(object) => resolve_instance_attribute(object, name),
        Value::Type(class) => resolve_static_attribute(class, name),
        other => Err(AssertxError::InvalidSubject {
            reason: format!(
                "expected an object or a type reference, got {}",
                other.type_name()
            ),
        }),
    }
}

/// Resolve a static field, walking from `class` up through its ancestors.
///
/// # Errors
///
/// See [`resolve_attribute`].
pub fn resolve_static_attribute(class: &ClassRef, name: &str) -> Result<Value> {
    check_name(name)?;
    for declaring in class.ancestors() {
        if let Some(decl) = declaring.own_field(name).filter(|d| d.is_static()) {
            let _guard = AccessGuard::acquire(decl);
            tracing::debug!(class = declaring.name(), attribute = name, "reading static field");
            return declaring.read_static(name);
        }
    }
    Err(AssertxError::AttributeNotFound {
        class: class.name().to_string(),
        name: name.to_string(),
    })
}

/// Resolve a static field on the class registered as `class_name`.
///
/// # Errors
///
/// `UnknownClass` when `class_name` is not registered (reported as an
/// invalid subject), otherwise see [`resolve_attribute`].
pub fn resolve_static_attribute_by_name(
    registry: &TypeRegistry,
    class_name: &str,
    name: &str,
) -> Result<Value> {
    check_name(name)?;
    let class = registry.resolve(class_name)?;
    resolve_static_attribute(class, name)
}

/// Resolve a field on an instance: the exact class first, then ancestors.
/// Static declarations found on the way read the class storage.
///
/// # Errors
///
/// See [`resolve_attribute`].
pub fn resolve_instance_attribute(object: &ObjectRef, name: &str) -> Result<Value> {
    check_name(name)?;
    for declaring in object.class().ancestors() {
        if let Some(decl) = declaring.own_field(name) {
            let _guard = AccessGuard::acquire(decl);
            tracing::debug!(class = declaring.name(), attribute = name, "reading instance field");
            return if decl.is_static() {
                declaring.read_static(name)
            } else {
                object.read_slot(declaring, decl)
            };
        }
    }
    Err(AssertxError::AttributeNotFound {
        class: object.class().name().to_string(),
        name: name.to_string(),
    })
}

/// Whether `name` is declared, static or not, on the class of `subject`
/// or one of its ancestors. `subject` is an object or a type.
/// Initialization is not required.
pub fn has_attribute(subject: &Value, name: &str) -> bool {
    if !is_valid_attribute_name(name) {
        return false;
    }
    let class = match subject {
        Value::Object(object) => object.class(),
        Value::Type(class) => class,
        _ => return false,
    };
    class.ancestors().any(|c| c.own_field(name).is_some())
}
