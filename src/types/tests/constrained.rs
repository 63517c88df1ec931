// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(clippy::unwrap_used, clippy::panic)] // tests unwrap to assert outcomes

use crate::*;

fn name_type() -> Type {
    registry::lookup("strict.string")
        .unwrap()
        .constrained([("size", Value::range(3, 12))])
        .unwrap()
}

#[test]
fn violation_message() {
    let err = name_type().apply(&Value::from("he")).unwrap_err();
    assert_eq!(
        err.to_string(),
        r#""he" violates constraints (size?(3..12, "he") failed)"#
    );
    assert_eq!(err.reason(), r#"size?(3..12, "he")"#);
}

#[test]
fn valid_input_is_unchanged() {
    let base = registry::lookup("strict.string").unwrap();
    let t = name_type();
    let input = Value::from("hello");
    assert_eq!(t.apply(&input).unwrap(), base.apply(&input).unwrap());
    assert!(t.is_valid(&input));
    assert!(t.is_constrained());
}

#[test]
fn constraints_accumulate() {
    let t = name_type().constrained([("format", Value::from("^h"))]).unwrap();
    assert!(matches!(t.kind(), Kind::Constrained { rule: Rule::And(..), .. }));
    assert!(t.is_valid(&Value::from("hello")));
    assert!(!t.is_valid(&Value::from("jello")));
    assert!(!t.is_valid(&Value::from("h")));
}

#[test]
fn optional_constrains_the_right_branch() {
    let t = Type::definition(Primitive::String)
        .optional()
        .constrained([("min_size", Value::from(2))])
        .unwrap();
    assert!(t.is_optional());
    assert!(t.is_valid(&Value::Null));
    assert!(t.is_valid(&Value::from("ab")));
    assert!(!t.is_valid(&Value::from("a")));
}

#[test]
fn try_reports_the_input() {
    let outcome = name_type().try_apply(&Value::from("he"));
    assert_eq!(outcome.input(), &Value::from("he"));
    assert!(matches!(
        outcome.error(),
        Some(CoercionError::Constraint { .. })
    ));
}

#[test]
fn rule_of_a_sum_is_a_disjunction() {
    let t = Type::strict(Primitive::Integer) | Type::strict(Primitive::String);
    assert!(matches!(t.rule(), Some(Rule::Or(..))));
    assert!(Type::definition(Primitive::String).rule().is_none());
}

#[test]
fn bad_options() {
    assert!(Type::any().constrained([("nope", Value::from(1))]).is_err());
}
