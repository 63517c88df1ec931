// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(clippy::unwrap_used, clippy::panic)] // tests unwrap to assert outcomes

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::*;

#[test]
fn static_default_fills_absent_input() {
    let t = registry::lookup("strict.string")
        .unwrap()
        .default(Value::from("anon"))
        .unwrap();
    assert!(t.is_default());
    assert_eq!(t.apply(&Value::Undefined).unwrap(), Value::from("anon"));
    assert_eq!(t.apply(&Value::from("jane")).unwrap(), Value::from("jane"));
    assert!(t.is_valid(&Value::Undefined));
    assert!(t.try_apply(&Value::Undefined).is_success());
}

#[test]
fn nil_result_is_replaced() {
    let t = registry::lookup("params.integer")
        .unwrap()
        .default(Value::from(0))
        .unwrap();
    assert_eq!(t.apply(&Value::from("")).unwrap(), Value::from(0));
    assert_eq!(t.apply(&Value::from("7")).unwrap(), Value::from(7));
}

#[test]
fn nil_default_requires_an_optional_type() {
    let err = Type::strict(Primitive::String).default(Value::Null).unwrap_err();
    assert!(matches!(err, CoercionError::Argument(_)));
    assert!(Type::strict(Primitive::String).optional().default(Value::Null).is_ok());
    assert!(Type::strict(Primitive::Nil).default(Value::Null).is_ok());
}

#[test]
fn invalid_default_is_rejected() {
    let err = Type::strict(Primitive::Integer)
        .default(Value::from("zero"))
        .unwrap_err();
    assert!(err.to_string().starts_with(r#"default value "zero" is invalid for Integer"#));
}

#[test]
fn generators_run_on_every_miss() {
    let counter = Arc::new(AtomicU64::new(0));
    let seen = counter.clone();
    let t = Type::definition(Primitive::Integer).default_with(Generator::new(move || {
        Value::from(seen.fetch_add(1, Ordering::SeqCst))
    }));
    assert_eq!(t.apply(&Value::Undefined).unwrap(), Value::from(0u64));
    assert_eq!(t.apply(&Value::Undefined).unwrap(), Value::from(1u64));
    assert_eq!(t.apply(&Value::from(9)).unwrap(), Value::from(9));
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[test]
fn maybe() {
    let t = registry::lookup("strict.integer").unwrap().maybe();
    assert_eq!(t.apply(&Value::Null).unwrap(), Value::Null);
    assert_eq!(t.apply(&Value::Undefined).unwrap(), Value::Null);
    assert_eq!(t.apply(&Value::from(3)).unwrap(), Value::from(3));
    assert!(!t.is_valid(&Value::from("3")));
    assert!(t.maybe().ptr_eq(&t));
}

#[test]
fn safe_returns_the_input() {
    let t = registry::lookup("coercible.integer").unwrap().safe();
    assert_eq!(t.apply(&Value::from("12")).unwrap(), Value::from(12));
    assert_eq!(t.apply(&Value::from("twelve")).unwrap(), Value::from("twelve"));
    assert!(!t.is_valid(&Value::from("twelve")));
    assert!(t.safe().ptr_eq(&t));
}
