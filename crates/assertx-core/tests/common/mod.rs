use assertx_core::reflect::{ClassBuilder, ClassRef, ObjectRef, TypeRegistry, Visibility};
use assertx_core::Value;

/// `Parent { private x = 5, protected label, public static count = 3 }`
/// and `Child extends Parent { public y = 7, private static secret = "s" }`.
#[allow(dead_code)]
pub fn parent_child_classes() -> (ClassRef, ClassRef) {
    let parent = ClassBuilder::new("Parent")
        .field_with_default("x", Visibility::Private, Value::Int(5))
        .field("label", Visibility::Protected)
        .static_field("count", Visibility::Public, Value::Int(3))
        .build();
    let child = ClassBuilder::new("Child")
        .extends(&parent)
        .field_with_default("y", Visibility::Public, Value::Int(7))
        .static_field("secret", Visibility::Private, Value::from("s"))
        .build();
    (parent, child)
}

/// A `Child` instance.
#[allow(dead_code)]
pub fn child_instance() -> (ClassRef, ClassRef, ObjectRef) {
    let (parent, child) = parent_child_classes();
    let object = ObjectRef::new(&child);
    (parent, child, object)
}

/// Registry holding `Parent` and `Child`.
#[allow(dead_code)]
pub fn registry() -> TypeRegistry {
    let (parent, child) = parent_child_classes();
    let mut registry = TypeRegistry::new();
    registry.register(&parent);
    registry.register(&child);
    registry
}

/// `Node { public next }`, with `next` pointing back at the node itself.
#[allow(dead_code)]
pub fn self_referential_node() -> ObjectRef {
    let class = ClassBuilder::new("Node")
        .field("next", Visibility::Public)
        .build();
    let node = ObjectRef::new(&class);
    node.set("next", Value::Object(node.clone()))
        .expect("Node declares next");
    node
}

/// `[[[ ... [leaf] ... ]]]` nested `levels` deep.
#[allow(dead_code)]
pub fn nested_list(levels: usize, leaf: Value) -> Value {
    (0..levels).fold(leaf, |inner, _| Value::List(vec![inner]))
}
