// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(clippy::unwrap_used, clippy::panic)] // tests unwrap to assert outcomes

use crate::*;

fn int(v: &Value) -> Result<i64, CoercionError> {
    match v {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| CoercionError::Argument(format!("{v} is too large"))),
        _ => Err(CoercionError::Argument(format!("{v} is not a number"))),
    }
}

#[test]
fn coercible_integer() {
    let t = registry::lookup("coercible.integer").unwrap();
    assert_eq!(t.apply(&Value::from("42")).unwrap(), Value::from(42));
    let err = t.apply(&Value::from("foo")).unwrap_err();
    assert_eq!(err.to_string(), r#"invalid value for Integer(): "foo""#);
    assert!(!t.is_valid(&Value::from("foo")));
    assert!(t.try_apply(&Value::from("foo")).is_failure());
}

#[test]
fn function_errors_are_failures() {
    let t = Type::definition(Primitive::Integer)
        .constructor_fn(|v| Ok(Value::from(int(v)? * 2)));
    assert_eq!(t.apply(&Value::from(2)).unwrap(), Value::from(4));
    assert!(!t.is_valid(&Value::from("2")));
    let outcome = t.try_apply(&Value::from("2"));
    assert_eq!(outcome.input(), &Value::from("2"));
    assert_eq!(
        outcome.error().unwrap().to_string(),
        r#""2" is not a number"#
    );
}

#[test]
fn appended_functions_run_after_existing_ones() {
    let t = Type::definition(Primitive::Integer)
        .constructor_fn(|v| Ok(Value::from(int(v)? + 1)))
        .constructor_fn(|v| Ok(Value::from(int(v)? * 10)));
    assert!(matches!(t.kind(), Kind::Constructor { fns, .. } if fns.len() == 2));
    assert_eq!(t.apply(&Value::from(1)).unwrap(), Value::from(20));
}

#[test]
fn rules_see_the_coerced_value() {
    let t = Type::definition(Primitive::Integer)
        .constructor_fn(|v| Ok(Value::from(int(v)? - 1)))
        .constrained([("gt", Value::from(0))])
        .unwrap();
    assert_eq!(t.apply(&Value::from(2)).unwrap(), Value::from(1));
    let err = t.apply(&Value::from(1)).unwrap_err();
    assert_eq!(err.to_string(), "0 violates constraints (gt?(0, 0) failed)");
}

#[test]
fn undefined_stops_the_pipeline() {
    let t = Type::strict(Primitive::String).constructor_fn(|v| {
        Ok(if v.is_empty_string() {
            Value::Undefined
        } else {
            v.clone()
        })
    });
    assert_eq!(t.apply(&Value::from("")).unwrap(), Value::Undefined);
    assert!(t.try_apply(&Value::from("")).is_success());
}

#[test]
fn constructor_identity_drives_equality() {
    let c = Coercion::new(|v| Ok(v.clone()));
    let a = Type::definition(Primitive::String).constructor(c.clone());
    let b = Type::definition(Primitive::String).constructor(c);
    assert_eq!(a, b);
    let other = Type::definition(Primitive::String).constructor_fn(|v| Ok(v.clone()));
    assert_ne!(a, other);
}
