#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use assertx_core::attribute::{
    resolve_attribute, resolve_instance_attribute, resolve_static_attribute,
    resolve_static_attribute_by_name,
};
use assertx_core::errors::{ExError, ExErrorKind};
use assertx_core::{AssertxError, Constraint, Value};
use common::{child_instance, parent_child_classes, registry};

#[test]
fn test_private_ancestor_field_is_resolved() {
    let (_, _, object) = child_instance();
    let value = resolve_attribute(&Value::Object(object), "x").unwrap();
    assert_eq!(value, Value::Int(5));
}

#[test]
fn test_own_field_is_resolved() {
    let (_, _, object) = child_instance();
    assert_eq!(
        resolve_instance_attribute(&object, "y").unwrap(),
        Value::Int(7)
    );
}

#[test]
fn test_instance_sees_current_value() {
    let (_, _, object) = child_instance();
    object.set("x", Value::Int(42)).unwrap();
    assert_eq!(
        resolve_attribute(&Value::Object(object), "x").unwrap(),
        Value::Int(42)
    );
}

#[test]
fn test_static_field_walks_ancestors() {
    let (_, child) = parent_child_classes();
    assert_eq!(
        resolve_static_attribute(&child, "count").unwrap(),
        Value::Int(3)
    );
    assert_eq!(
        resolve_static_attribute(&child, "secret").unwrap(),
        Value::from("s")
    );
}

#[test]
fn test_static_lookup_ignores_instance_fields() {
    let (_, child) = parent_child_classes();
    let err = resolve_attribute(&Value::Type(child), "x").unwrap_err();
    assert!(matches!(err, AssertxError::AttributeNotFound { .. }));
}

#[test]
fn test_static_by_class_name() {
    let registry = registry();
    assert_eq!(
        resolve_static_attribute_by_name(&registry, "Child", "count").unwrap(),
        Value::Int(3)
    );

    let err = resolve_static_attribute_by_name(&registry, "Missing", "count").unwrap_err();
    let ex: ExError = err.into();
    assert_eq!(ex.kind(), ExErrorKind::InvalidSubject);
}

#[test]
fn test_missing_attribute_is_not_found() {
    let (_, _, object) = child_instance();
    let err = resolve_attribute(&Value::Object(object), "nope").unwrap_err();
    let ex: ExError = err.into();
    assert_eq!(ex.kind(), ExErrorKind::NotFound);
    assert_eq!(ex.attribute(), Some("nope"));
}

#[test]
fn test_invalid_name_fails_before_reflection() {
    for name in ["", "9lives", "has space", "dash-ed"] {
        let err = resolve_attribute(&Value::Null, name).unwrap_err();
        assert!(
            matches!(err, AssertxError::InvalidAttributeName { .. }),
            "{:?}",
            name
        );
    }
}

#[test]
fn test_non_object_subject_is_invalid() {
    for subject in [Value::Int(1), Value::from("Parent"), Value::list([])] {
        let err = resolve_attribute(&subject, "x").unwrap_err();
        let ex: ExError = err.into();
        assert_eq!(ex.kind(), ExErrorKind::InvalidSubject);
    }
}

#[test]
fn test_access_restored_after_successful_read() {
    let (parent, _, object) = child_instance();
    let decl = parent.own_field("x").unwrap();
    assert!(!decl.is_accessible());

    resolve_instance_attribute(&object, "x").unwrap();

    assert!(!decl.is_accessible());
}

#[test]
fn test_access_restored_after_failed_read() {
    let (parent, _, object) = child_instance();
    let decl = parent.own_field("label").unwrap();

    let err = resolve_instance_attribute(&object, "label").unwrap_err();

    assert!(matches!(err, AssertxError::AttributeUninitialized { .. }));
    assert!(!decl.is_accessible());
}

#[test]
fn test_private_static_access_restored() {
    let (_, child) = parent_child_classes();
    resolve_static_attribute(&child, "secret").unwrap();
    assert!(!child.own_field("secret").unwrap().is_accessible());
}

#[test]
fn test_attribute_constraint_delegates_to_resolved_value() {
    let (_, _, object) = child_instance();
    let subject = Value::Object(object);

    let c = Constraint::attribute("x", Constraint::equal_to(5));
    assert!(c.matches(&subject));
    assert_eq!(c.cost(), 1);

    let missing = Constraint::attribute("nope", Constraint::IsAnything);
    assert!(!missing.matches(&subject));
    assert!(missing
        .failure_description(&subject)
        .starts_with("has a resolvable attribute \"nope\""));
}
