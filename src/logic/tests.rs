// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(clippy::unwrap_used, clippy::panic)] // tests unwrap to assert outcomes

use super::*;

fn rule(options: Vec<(&str, Value)>) -> Rule {
    build_rule(options).unwrap()
}

#[test]
fn size_with_range() {
    let r = rule(vec![("size", Value::range(3, 12))]);
    assert!(r.is_success(&Value::from("hello")));
    assert!(!r.is_success(&Value::from("he")));

    let failure = r.evaluate(&Value::from("he")).unwrap_err();
    assert_eq!(failure.to_string(), r#"size?(3..12, "he")"#);
}

#[test]
fn options_are_conjoined_in_order() {
    let r = rule(vec![("min_size", Value::from(2)), ("format", Value::from("^a"))]);
    assert!(matches!(r, Rule::And(..)));
    assert!(r.is_success(&Value::from("abc")));

    // `And` reports only the first violated side.
    let failure = r.evaluate(&Value::from("b")).unwrap_err();
    assert_eq!(failure.to_string(), r#"min_size?(2, "b")"#);
}

#[test]
fn and_reports_the_first_violation() {
    let r = rule(vec![("min_size", Value::from(2)), ("format", Value::from("^a"))]);
    let failure = r.evaluate(&Value::from("b")).unwrap_err();
    assert_eq!(failure.to_string(), r#"min_size?(2, "b")"#);
    let failure = r.evaluate(&Value::from("bb")).unwrap_err();
    assert_eq!(failure.to_string(), r#"format?(/^a/, "bb")"#);
}

#[test]
fn or_reports_both_sides() {
    let r = rule(vec![("lt", Value::from(5))]).or(rule(vec![("gt", Value::from(18))]));
    assert!(r.is_success(&Value::from(3)));
    assert!(r.is_success(&Value::from(20)));
    let failure = r.evaluate(&Value::from(10)).unwrap_err();
    assert_eq!(failure.to_string(), "lt?(5, 10) OR gt?(18, 10)");
}

#[test]
fn type_predicate() {
    let r = Rule::type_of(Primitive::Integer);
    assert!(r.is_success(&Value::from(1)));
    assert!(!r.is_success(&Value::from(1.5)));
    assert!(!r.is_success(&Value::from("1")));
    assert_eq!(
        r.evaluate(&Value::from("1")).unwrap_err().to_string(),
        r#"type?(Integer, "1")"#
    );
}

#[test]
fn unary_predicates_take_true() {
    assert!(rule(vec![("filled", Value::from(true))]).is_success(&Value::from("x")));
    assert!(!rule(vec![("filled", Value::from(true))]).is_success(&Value::from("")));
    assert!(rule(vec![("odd", Value::from(true))]).is_success(&Value::from(3)));
    assert!(rule(vec![("even?", Value::from(true))]).is_success(&Value::from(4)));
    assert!(build_rule([("nil", Value::from(1))]).is_err());
}

#[test]
fn inclusion() {
    let allowed = Value::from(vec![Value::from("a"), Value::from("b")]);
    let r = rule(vec![("included_in", allowed.clone())]);
    assert!(r.is_success(&Value::from("a")));
    assert!(!r.is_success(&Value::from("c")));

    let r = rule(vec![("excluded_from", allowed.clone())]);
    assert!(r.is_success(&Value::from("c")));

    let r = rule(vec![("includes", Value::from("b"))]);
    assert!(r.is_success(&allowed));
}

#[test]
fn numeric_comparisons() {
    let r = rule(vec![("gteq", Value::from(18))]);
    assert!(r.is_success(&Value::from(18)));
    assert!(r.is_success(&Value::from(18.0)));
    assert!(!r.is_success(&Value::from(17)));
    assert!(!r.is_success(&Value::from("20")));
}

#[test]
fn malformed_options() {
    assert!(matches!(
        build_rule([("frobnicate", Value::from(1))]),
        Err(CoercionError::Argument(_))
    ));
    assert!(matches!(
        build_rule([("format", Value::from("("))]),
        Err(CoercionError::Argument(_))
    ));
    assert!(matches!(
        build_rule([("gt", Value::from("x"))]),
        Err(CoercionError::Argument(_))
    ));
    assert!(build_rule(Vec::<(&str, Value)>::new()).is_err());
}
