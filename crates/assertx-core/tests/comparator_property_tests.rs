#![allow(clippy::unwrap_used, clippy::expect_used)]

use assertx_core::comparator::{equals, EqualityOptions};
use assertx_core::Value;
use proptest::prelude::*;

fn ints(items: &[i64]) -> Value {
    Value::list(items.iter().copied().map(Value::Int))
}

fn permuted_ints() -> impl Strategy<Value = (Vec<i64>, Vec<i64>)> {
    prop::collection::vec(-50i64..50, 0..12)
        .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
}

const TWO_POW_53: i64 = 1 << 53;

/// Mixed integer and float elements, drawn both from small values and from
/// the neighbourhood of 2^53 where `i64 as f64` starts to round.
fn mixed_numeric() -> impl Strategy<Value = Value> {
    let offset = prop_oneof![-50i64..50, (TWO_POW_53 - 4)..(TWO_POW_53 + 4)];
    (any::<bool>(), offset).prop_map(|(as_float, n)| {
        if as_float {
            Value::Float(n as f64)
        } else {
            Value::Int(n)
        }
    })
}

fn permuted_mixed() -> impl Strategy<Value = (Vec<Value>, Vec<Value>)> {
    prop::collection::vec(mixed_numeric(), 0..12)
        .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
}

proptest! {
    #[test]
    fn prop_numeric_reflexive(a in -1.0e9f64..1.0e9) {
        prop_assert!(equals(&Value::Float(a), &Value::Float(a), &EqualityOptions::default()));
    }

    #[test]
    fn prop_int_reflexive(a in any::<i64>()) {
        prop_assert!(equals(&Value::Int(a), &Value::Int(a), &EqualityOptions::default()));
    }

    #[test]
    fn prop_float_tolerance(a in -1.0e6f64..1.0e6, b in -1.0e6f64..1.0e6, t in 0.0f64..100.0) {
        let options = EqualityOptions::default().with_tolerance(t);
        let within = (a - b).abs() <= t;
        prop_assert_eq!(equals(&Value::Float(a), &Value::Float(b), &options), within);
    }

    #[test]
    fn prop_int_tolerance(a in -10_000i64..10_000, b in -10_000i64..10_000, t in 0u32..500) {
        let options = EqualityOptions::default().with_tolerance(f64::from(t));
        let within = (a - b).unsigned_abs() <= u64::from(t);
        prop_assert_eq!(equals(&Value::Int(a), &Value::Int(b), &options), within);
    }

    #[test]
    fn prop_canonicalized_permutation_equal((s, p) in permuted_ints()) {
        let options = EqualityOptions::default().canonicalized();
        prop_assert!(equals(&ints(&s), &ints(&p), &options));
    }

    #[test]
    fn prop_canonicalized_mixed_numeric_permutation_equal((s, p) in permuted_mixed()) {
        let options = EqualityOptions::default().canonicalized();
        prop_assert!(equals(&Value::list(s), &Value::list(p), &options));
    }

    #[test]
    fn prop_positional_permutation_detects_reorder((s, p) in permuted_ints()) {
        let options = EqualityOptions::default();
        prop_assert_eq!(equals(&ints(&s), &ints(&p), &options), s == p);
    }

    #[test]
    fn prop_case_folding(word in "[a-zA-Z]{1,16}") {
        let upper = Value::from(word.to_uppercase());
        let lower = Value::from(word.to_lowercase());
        let folded = EqualityOptions::default().case_insensitive();
        prop_assert!(equals(&upper, &lower, &folded));
    }
}

#[test]
fn test_case_sensitivity_default() {
    let options = EqualityOptions::default();
    assert!(!equals(&Value::from("ABC"), &Value::from("abc"), &options));
    assert!(equals(
        &Value::from("ABC"),
        &Value::from("abc"),
        &options.case_insensitive()
    ));
}

#[test]
fn test_nan_and_infinity() {
    let options = EqualityOptions::default().with_tolerance(1.0);
    assert!(!equals(&Value::Float(f64::NAN), &Value::Float(f64::NAN), &options));
    assert!(equals(
        &Value::Float(f64::INFINITY),
        &Value::Float(f64::INFINITY),
        &options
    ));
    assert!(!equals(
        &Value::Float(f64::INFINITY),
        &Value::Float(f64::NEG_INFINITY),
        &options
    ));
}

#[test]
fn test_int_and_float_mix() {
    let options = EqualityOptions::default();
    assert!(equals(&Value::Int(2), &Value::Float(2.0), &options));
    assert!(equals(
        &Value::Int(2),
        &Value::Float(2.4),
        &options.with_tolerance(0.5)
    ));
}

#[test]
fn test_booleans_are_not_numbers() {
    let options = EqualityOptions::default().with_tolerance(10.0);
    assert!(!equals(&Value::Bool(true), &Value::Int(1), &options));
    assert!(!equals(&Value::Bool(false), &Value::Int(0), &options));
    assert!(equals(&Value::Bool(true), &Value::Bool(true), &options));
}

#[test]
fn test_mapping_key_order_is_ignored() {
    let a = Value::map([("a", Value::Int(1)), ("b", Value::Int(2))]);
    let b = Value::map([("b", Value::Int(2)), ("a", Value::Int(1))]);
    assert!(equals(&a, &b, &EqualityOptions::default()));
}

#[test]
fn test_mismatched_shapes() {
    let options = EqualityOptions::default().canonicalized();
    let list = Value::list([Value::Int(1)]);
    let map = Value::map([(0i64, Value::Int(1))]);
    assert!(!equals(&list, &map, &options));
    assert!(!equals(&Value::Null, &Value::Int(0), &options));
}

#[test]
fn test_canonicalize_recurses_into_nested_sequences() {
    let expected = Value::list([ints(&[1, 2]), ints(&[3, 4])]);
    let actual = Value::list([ints(&[4, 3]), ints(&[2, 1])]);
    assert!(!equals(&expected, &actual, &EqualityOptions::default()));
    assert!(equals(
        &expected,
        &actual,
        &EqualityOptions::default().canonicalized()
    ));
}

#[test]
fn test_canonicalize_orders_ints_and_floats_near_two_pow_53_exactly() {
    let items = [
        Value::Int(TWO_POW_53 + 1),
        Value::Float(TWO_POW_53 as f64),
        Value::Int(TWO_POW_53),
    ];
    let options = EqualityOptions::default().canonicalized();
    let orders = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
    for a in &orders {
        for b in &orders {
            let left = Value::list(a.iter().map(|&i| items[i].clone()));
            let right = Value::list(b.iter().map(|&i| items[i].clone()));
            assert!(equals(&left, &right, &options), "{:?} vs {:?}", a, b);
        }
    }
}
