//! Walkthrough of the assertion engine
//!
//! - Equality with tolerance, canonicalization and case folding
//! - Combinators and their failure descriptions
//! - Attribute reads through private ancestor fields
//! - Structural comparison of document trees
//! - Assertion counting

use assertx_core::{
    comparator::EqualityOptions,
    engine::{compare_structure, evaluate, read_attribute},
    logging_facility::{init, Profile},
    AssertionCounter, ClassBuilder, Constraint, ObjectRef, TreeNode, Value, Visibility,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init(Profile::Development);
    let counter = AssertionCounter::new();

    // ═══════════════════════════════════════════════════════════
    // SECTION 1: Equality
    // ═══════════════════════════════════════════════════════════
    println!("SECTION 1: Equality\n");

    let options = EqualityOptions::default()
        .with_tolerance(0.01)
        .canonicalized()
        .case_insensitive();
    let expected = Value::list([Value::from("Alpha"), Value::Float(2.5)]);
    let c = Constraint::equal_to_with(expected, options)?;
    let actual = Value::list([Value::Float(2.505), Value::from("alpha")]);
    let verdict = evaluate(&c, &actual, &counter);
    println!("  {} {} -> {}", actual, c, verdict.matched());
    println!();

    // ═══════════════════════════════════════════════════════════
    // SECTION 2: Combinators
    // ═══════════════════════════════════════════════════════════
    println!("SECTION 2: Combinators\n");

    let in_range = Constraint::and([Constraint::greater_than(0), Constraint::less_than(10)]);
    let c = Constraint::or([in_range, Constraint::equal_to(100)]);
    for n in [5, 50, 100] {
        let verdict = evaluate(&c, &Value::Int(n), &counter);
        match verdict.failure_description() {
            None => println!("  {} passes", n),
            Some(why) => println!("  Failed asserting that {} {}", n, why),
        }
    }
    println!();

    // ═══════════════════════════════════════════════════════════
    // SECTION 3: Attributes
    // ═══════════════════════════════════════════════════════════
    println!("SECTION 3: Attributes\n");

    let parent = ClassBuilder::new("Parent")
        .field_with_default("x", Visibility::Private, Value::Int(5))
        .build();
    let child = ClassBuilder::new("Child").extends(&parent).build();
    let subject = Value::Object(ObjectRef::new(&child));

    println!("  Child.x = {}", read_attribute(&subject, "x")?);
    match read_attribute(&subject, "missing") {
        Ok(v) => println!("  Child.missing = {}", v),
        Err(e) => println!("  Child.missing: {}", e),
    }
    println!();

    // ═══════════════════════════════════════════════════════════
    // SECTION 4: Document structure
    // ═══════════════════════════════════════════════════════════
    println!("SECTION 4: Document structure\n");

    let expected = TreeNode::new("a").with_child(TreeNode::new("b"));
    let actual = TreeNode::new("a")
        .with_child(TreeNode::new("b"))
        .with_child(TreeNode::new("c"));
    for mismatch in compare_structure(&expected, &actual, false) {
        println!("  {} at {}", mismatch.message, mismatch.path);
    }
    println!();

    println!("Assertions performed: {}", counter.count());
    Ok(())
}
