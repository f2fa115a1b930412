//! Type model and introspection API
//!
//! Classes declare fields with a visibility and an optional static flag.
//! Non-public fields can only be read while they are marked accessible;
//! [`crate::attribute`] brackets such reads with a guard that restores
//! the previous accessibility.
//!
//! Instances hold one slot per non-static field declared on their class
//! or any ancestor, keyed by `(declaring class, field name)`, so a private
//! field of an ancestor and a same-named field of a subclass coexist.

use crate::errors::{AssertxError, Result};
use crate::value::Value;
use std::cell::{Cell, Ref, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Shared handle to a class declaration.
pub type ClassRef = Rc<Class>;

/// Declared visibility of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

/// A field declaration.
#[derive(Debug)]
pub struct FieldDecl {
    name: String,
    visibility: Visibility,
    is_static: bool,
    default: Option<Value>,
    accessible: Cell<bool>,
}

impl FieldDecl {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Value a fresh instance (or the class, for statics) starts with.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Whether a read is currently permitted: public fields always are,
    /// others only while marked accessible.
    pub fn is_accessible(&self) -> bool {
        self.visibility == Visibility::Public || self.accessible.get()
    }

    /// Raw accessibility flag, independent of visibility.
    pub fn accessible_flag(&self) -> bool {
        self.accessible.get()
    }

    pub fn set_accessible(&self, accessible: bool) {
        self.accessible.set(accessible);
    }
}

/// A class declaration: name, optional parent, own fields, static storage.
pub struct Class {
    name: String,
    parent: Option<ClassRef>,
    fields: Vec<FieldDecl>,
    statics: RefCell<BTreeMap<String, Option<Value>>>,
}

impl Class {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&ClassRef> {
        self.parent.as_ref()
    }

    /// Fields declared by this class itself, excluding inherited ones.
    pub fn own_fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    /// Look up a field declared by this class itself.
    pub fn own_field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// This class followed by each ancestor, nearest first.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors {
            current: Some(self),
        }
    }

    /// Whether this class is `name` or inherits from it.
    pub fn is_subclass_of(&self, name: &str) -> bool {
        self.ancestors().any(|c| c.name == name)
    }

    /// Read a static field of this class.
    ///
    /// # Errors
    ///
    /// - `AttributeNotFound` if this class declares no such static field
    /// - `InvalidSubject` if the field is not currently accessible
    /// - `AttributeUninitialized` if the field holds no value
    pub fn read_static(&self, name: &str) -> Result<Value> {
        let decl = self
            .own_field(name)
            .filter(|d| d.is_static)
            .ok_or_else(|| AssertxError::AttributeNotFound {
                class: self.name.clone(),
                name: name.to_string(),
            })?;
        if !decl.is_accessible() {
            return Err(inaccessible(&self.name, name));
        }
        self.statics
            .borrow()
            .get(name)
            .cloned()
            .flatten()
            .ok_or_else(|| AssertxError::AttributeUninitialized {
                class: self.name.clone(),
                name: name.to_string(),
            })
    }

    /// Replace the current value of a static field declared by this class.
    ///
    /// # Errors
    ///
    /// `AttributeNotFound` if this class declares no such static field.
    pub fn set_static(&self, name: &str, value: Value) -> Result<()> {
        if !self.own_field(name).is_some_and(|d| d.is_static) {
            return Err(AssertxError::AttributeNotFound {
                class: self.name.clone(),
                name: name.to_string(),
            });
        }
        self.statics.borrow_mut().insert(name.to_string(), Some(value));
        Ok(())
    }
}

fn inaccessible(class: &str, name: &str) -> AssertxError {
    AssertxError::InvalidSubject {
        reason: format!("{}::{} is not accessible", class, name),
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.name.as_str()))
            .field(
                "fields",
                &self.fields.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Iterator over a class and its ancestors.
pub struct Ancestors<'a> {
    current: Option<&'a Class>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Class;

    fn next(&mut self) -> Option<Self::Item> {
        let class = self.current?;
        self.current = class.parent.as_deref();
        Some(class)
    }
}

/// Builder for [`Class`] declarations.
///
/// ```
/// use assertx_core::reflect::{ClassBuilder, Visibility};
/// use assertx_core::value::Value;
///
/// let parent = ClassBuilder::new("Parent")
///     .field_with_default("x", Visibility::Private, Value::Int(5))
///     .build();
/// let child = ClassBuilder::new("Child").extends(&parent).build();
/// assert!(child.is_subclass_of("Parent"));
/// ```
pub struct ClassBuilder {
    name: String,
    parent: Option<ClassRef>,
    fields: Vec<FieldDecl>,
}

impl ClassBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            fields: Vec::new(),
        }
    }

    pub fn extends(mut self, parent: &ClassRef) -> Self {
        self.parent = Some(Rc::clone(parent));
        self
    }

    /// Declare an instance field that starts uninitialized.
    pub fn field(self, name: impl Into<String>, visibility: Visibility) -> Self {
        self.declare(name.into(), visibility, false, None)
    }

    /// Declare an instance field with a default value.
    pub fn field_with_default(
        self,
        name: impl Into<String>,
        visibility: Visibility,
        default: Value,
    ) -> Self {
        self.declare(name.into(), visibility, false, Some(default))
    }

    /// Declare a static field with its initial value.
    pub fn static_field(
        self,
        name: impl Into<String>,
        visibility: Visibility,
        value: Value,
    ) -> Self {
        self.declare(name.into(), visibility, true, Some(value))
    }

    fn declare(
        mut self,
        name: String,
        visibility: Visibility,
        is_static: bool,
        default: Option<Value>,
    ) -> Self {
        // Redeclaration replaces the earlier declaration.
        self.fields.retain(|f| f.name != name);
        self.fields.push(FieldDecl {
            name,
            visibility,
            is_static,
            default,
            accessible: Cell::new(false),
        });
        self
    }

    pub fn build(self) -> ClassRef {
        let statics = self
            .fields
            .iter()
            .filter(|f| f.is_static)
            .map(|f| (f.name.clone(), f.default.clone()))
            .collect();
        Rc::new(Class {
            name: self.name,
            parent: self.parent,
            fields: self.fields,
            statics: RefCell::new(statics),
        })
    }
}

/// One instance field slot.
#[derive(Debug)]
pub struct Slot {
    declaring_class: String,
    name: String,
    value: Option<Value>,
}

impl Slot {
    pub fn declaring_class(&self) -> &str {
        &self.declaring_class
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }
}

struct Instance {
    class: ClassRef,
    slots: RefCell<Vec<Slot>>,
}

/// Shared handle to an object instance. Clones share identity.
#[derive(Clone)]
pub struct ObjectRef(Rc<Instance>);

impl ObjectRef {
    /// Instantiate `class`, giving every declared instance field (own and
    /// inherited) its default value.
    pub fn new(class: &ClassRef) -> Self {
        let mut slots = Vec::new();
        for declaring in class.ancestors() {
            for decl in declaring.fields.iter().filter(|d| !d.is_static) {
                slots.push(Slot {
                    declaring_class: declaring.name.clone(),
                    name: decl.name.clone(),
                    value: decl.default.clone(),
                });
            }
        }
        ObjectRef(Rc::new(Instance {
            class: Rc::clone(class),
            slots: RefCell::new(slots),
        }))
    }

    pub fn class(&self) -> &ClassRef {
        &self.0.class
    }

    /// Reference identity.
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Address-based identity token, stable for the lifetime of the object.
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    /// Shared view of every slot, nearest declaring class first.
    pub fn slots(&self) -> Ref<'_, Vec<Slot>> {
        self.0.slots.borrow()
    }

    /// Set the field `name` as seen from the object's own class: the
    /// nearest declaring class in the ancestor chain wins.
    ///
    /// # Errors
    ///
    /// `AttributeNotFound` if no class in the chain declares `name`.
    pub fn set(&self, name: &str, value: Value) -> Result<()> {
        let declaring = self
            .class()
            .ancestors()
            .find(|c| c.own_field(name).is_some_and(|d| !d.is_static))
            .map(|c| c.name.clone())
            .ok_or_else(|| AssertxError::AttributeNotFound {
                class: self.class().name.clone(),
                name: name.to_string(),
            })?;
        self.set_declared(&declaring, name, value)
    }

    /// Set the slot of field `name` declared by `declaring_class`.
    ///
    /// # Errors
    ///
    /// `AttributeNotFound` if the instance has no such slot.
    pub fn set_declared(&self, declaring_class: &str, name: &str, value: Value) -> Result<()> {
        let mut slots = self.0.slots.borrow_mut();
        let slot = slots
            .iter_mut()
            .find(|s| s.declaring_class == declaring_class && s.name == name)
            .ok_or_else(|| AssertxError::AttributeNotFound {
                class: declaring_class.to_string(),
                name: name.to_string(),
            })?;
        slot.value = Some(value);
        Ok(())
    }

    /// Read the slot for `decl`, declared by `declaring`.
    ///
    /// # Errors
    ///
    /// - `InvalidSubject` if the field is not currently accessible
    /// - `AttributeNotFound` if the instance has no such slot
    /// - `AttributeUninitialized` if the slot holds no value
    pub fn read_slot(&self, declaring: &Class, decl: &FieldDecl) -> Result<Value> {
        if !decl.is_accessible() {
            return Err(inaccessible(&declaring.name, &decl.name));
        }
        let slots = self.0.slots.borrow();
        let slot = slots
            .iter()
            .find(|s| s.declaring_class == declaring.name && s.name == decl.name)
            .ok_or_else(|| AssertxError::AttributeNotFound {
                class: declaring.name.clone(),
                name: decl.name.clone(),
            })?;
        slot.value
            .clone()
            .ok_or_else(|| AssertxError::AttributeUninitialized {
                class: declaring.name.clone(),
                name: decl.name.clone(),
            })
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef({}#{:x})", self.0.class.name, self.id())
    }
}

/// Registry of classes by name, for lookups that start from a class name.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    classes: BTreeMap<String, ClassRef>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class, replacing any class with the same name.
    pub fn register(&mut self, class: &ClassRef) {
        self.classes.insert(class.name.clone(), Rc::clone(class));
    }

    pub fn get(&self, name: &str) -> Option<&ClassRef> {
        self.classes.get(name)
    }

    /// # Errors
    ///
    /// `UnknownClass` if no class named `name` is registered.
    pub fn resolve(&self, name: &str) -> Result<&ClassRef> {
        self.get(name).ok_or_else(|| AssertxError::UnknownClass {
            class: name.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hierarchy() -> (ClassRef, ClassRef, ClassRef) {
        let base = ClassBuilder::new("Base")
            .field_with_default("id", Visibility::Private, Value::Int(1))
            .build();
        let mid = ClassBuilder::new("Mid")
            .extends(&base)
            .field("label", Visibility::Protected)
            .build();
        let leaf = ClassBuilder::new("Leaf")
            .extends(&mid)
            .field_with_default("id", Visibility::Public, Value::Int(2))
            .build();
        (base, mid, leaf)
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let (_, _, leaf) = hierarchy();
        let names: Vec<&str> = leaf.ancestors().map(|c| c.name()).collect();
        assert_eq!(names, vec!["Leaf", "Mid", "Base"]);
        assert!(leaf.is_subclass_of("Base"));
        assert!(!leaf.is_subclass_of("Other"));
    }

    #[test]
    fn test_instance_has_slot_per_declaring_class() {
        let (_, _, leaf) = hierarchy();
        let obj = ObjectRef::new(&leaf);

        let slots = obj.slots();
        let keys: Vec<(&str, &str)> = slots
            .iter()
            .map(|s| (s.declaring_class(), s.name()))
            .collect();
        assert_eq!(keys, vec![("Leaf", "id"), ("Mid", "label"), ("Base", "id")]);
    }

    #[test]
    fn test_set_targets_nearest_declaration() {
        let (_, mid, leaf) = hierarchy();
        let obj = ObjectRef::new(&leaf);

        obj.set("id", Value::Int(9)).unwrap();
        obj.set("label", Value::from("x")).unwrap();

        let decl = mid.own_field("label").unwrap();
        assert!(obj.read_slot(&mid, decl).is_err(), "protected needs access");
        decl.set_accessible(true);
        assert_eq!(obj.read_slot(&mid, decl).unwrap(), Value::from("x"));
        decl.set_accessible(false);

        let leaf_id = leaf.own_field("id").unwrap();
        assert_eq!(obj.read_slot(&leaf, leaf_id).unwrap(), Value::Int(9));
    }

    #[test]
    fn test_set_unknown_field_fails() {
        let (_, _, leaf) = hierarchy();
        let obj = ObjectRef::new(&leaf);
        let err = obj.set("missing", Value::Null).unwrap_err();
        assert!(matches!(err, AssertxError::AttributeNotFound { .. }));
    }

    #[test]
    fn test_static_storage() {
        let class = ClassBuilder::new("Counter")
            .static_field("count", Visibility::Public, Value::Int(0))
            .build();

        assert_eq!(class.read_static("count").unwrap(), Value::Int(0));
        class.set_static("count", Value::Int(3)).unwrap();
        assert_eq!(class.read_static("count").unwrap(), Value::Int(3));
        assert!(class.set_static("other", Value::Null).is_err());
    }

    #[test]
    fn test_registry_resolve() {
        let (base, _, _) = hierarchy();
        let mut registry = TypeRegistry::new();
        registry.register(&base);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve("Base").unwrap().name(), "Base");
        assert!(matches!(
            registry.resolve("Nope"),
            Err(AssertxError::UnknownClass { .. })
        ));
    }
}
