#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use assertx_core::assertx_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_ERR_CODE, FIELD_ERR_KIND,
};
use assertx_core::engine::{compare_structure, evaluate, read_attribute};
use assertx_core::errors::AssertxError;
use assertx_core::logging_facility::test_capture::init_test_capture;
use assertx_core::structure::TreeNode;
use assertx_core::{log_op_end, log_op_error, log_op_start};
use assertx_core::{AssertionCounter, Constraint, Value};
use common::child_instance;

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    assert_eq!(capture.events_for(op_name, EVENT_START).len(), 1);
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42u64);

    let end_events = capture.events_for(op_name, EVENT_END);
    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = AssertxError::AttributeNotFound {
        class: "Child".to_string(),
        name: "z".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10u64);

    let error_events = capture.events_for(op_name, EVENT_END_ERROR);
    assert_eq!(error_events.len(), 1, "Should have exactly one error event");
    assert_eq!(error_events[0].field(FIELD_ERR_CODE), Some("ERR_NOT_FOUND"));
    assert_eq!(error_events[0].field(FIELD_ERR_KIND), Some("NotFound"));
}

#[test]
fn test_log_macros_with_multiple_fields() {
    let capture = init_test_capture();
    let op_name = "test_log_macros_fields_unique_4";

    log_op_start!(op_name, subject = "Child", attribute = "x");

    let start = capture
        .events_for(op_name, EVENT_START)
        .into_iter()
        .next()
        .expect("Should have start event");
    assert_eq!(start.field("subject"), Some("Child"));
    assert_eq!(start.field("attribute"), Some("x"));
}

#[test]
#[should_panic(expected = "Expected event")]
fn test_capture_assert_event_exists_fails() {
    let capture = init_test_capture();
    capture.assert_event_exists("nonexistent_op_truly_unique_999", EVENT_START);
}

#[test]
fn test_capture_count_events() {
    let capture = init_test_capture();
    let op1_name = "test_count_events_op1_unique_5";
    let op2_name = "test_count_events_op2_unique_5";

    log_op_start!(op1_name);
    log_op_start!(op2_name);
    log_op_end!(op1_name, duration_ms = 10u64);

    let ours = |e: &assertx_core::logging_facility::CapturedEvent| {
        e.op.as_deref() == Some(op1_name) || e.op.as_deref() == Some(op2_name)
    };
    let start_count = capture.count_events(|e| ours(e) && e.event.as_deref() == Some(EVENT_START));
    let end_count = capture.count_events(|e| ours(e) && e.event.as_deref() == Some(EVENT_END));

    assert_eq!(start_count, 2);
    assert_eq!(end_count, 1);
}

#[test]
fn test_evaluate_owns_its_lifecycle() {
    let capture = init_test_capture();
    let counter = AssertionCounter::new();
    let c = Constraint::and([
        Constraint::equal_to("evaluate-lifecycle-marker"),
        Constraint::IsAnything,
        Constraint::IsAnything,
    ]);
    let description = c.describe();

    evaluate(&c, &Value::Null, &counter);

    let starts: Vec<_> = capture
        .events_for("evaluate", EVENT_START)
        .into_iter()
        .filter(|e| e.field("constraint") == Some(description.as_str()))
        .collect();
    assert_eq!(starts.len(), 1);
    assert_eq!(
        starts[0].component.as_deref(),
        Some("assertx_core::engine")
    );

    let ends = capture.events_for("evaluate", EVENT_END);
    assert!(ends
        .iter()
        .any(|e| e.field("matched") == Some("false") && e.field("cost") == Some("3")));
}

#[test]
fn test_read_attribute_failure_logs_error() {
    let capture = init_test_capture();
    let (_, _, object) = child_instance();

    let _ = read_attribute(&Value::Object(object), "absent_logged_attribute");

    capture.assert_event_exists("read_attribute", EVENT_START);
    let errors = capture.events_for("read_attribute", EVENT_END_ERROR);
    assert!(errors
        .iter()
        .any(|e| e.field(FIELD_ERR_CODE) == Some("ERR_NOT_FOUND")));
}

#[test]
fn test_compare_structure_logs_mismatch_count() {
    let capture = init_test_capture();
    let expected = TreeNode::new("doc").with_child(TreeNode::new("b"));
    let actual = TreeNode::new("doc");

    compare_structure(&expected, &actual, false);

    let ends = capture.events_for("compare_structure", EVENT_END);
    assert!(ends.iter().any(|e| e.field("mismatch_count") == Some("1")));
}
