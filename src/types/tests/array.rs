// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(clippy::unwrap_used, clippy::panic)] // tests unwrap to assert outcomes

use crate::*;

fn strings(items: &[&str]) -> Value {
    Value::from(items.iter().map(|s| Value::from(*s)).collect::<Vec<_>>())
}

#[test]
fn member_applies_to_every_element() {
    let t = registry::lookup("array<coercible.string>").unwrap();
    let input = Value::from(vec![Value::from(1), Value::symbol("a")]);
    assert_eq!(t.apply(&input).unwrap(), strings(&["1", "a"]));
    assert_eq!(t.member().unwrap(), &registry::lookup("coercible.string").unwrap());
}

#[test]
fn first_failing_element_is_reported() {
    let t = registry::lookup("strict.array<strict.string>").unwrap();
    let input = Value::from(vec![Value::from("a"), Value::from(1), Value::from(2)]);
    let err = t.apply(&input).unwrap_err();
    assert_eq!(
        err.to_string(),
        "1 violates constraints (type?(String, 1) failed)"
    );
    let outcome = t.try_apply(&input);
    assert_eq!(outcome.input(), &input);
    assert_eq!(outcome.error(), Some(&err));
}

#[test]
fn non_arrays() {
    let t = Type::definition(Primitive::Array)
        .of(Type::definition(Primitive::String))
        .unwrap();
    assert_eq!(t.apply(&Value::from("oops")).unwrap(), Value::from("oops"));
    assert!(!t.is_valid(&Value::from("oops")));
}

#[test]
fn undefined_elements_are_dropped() {
    let member = Type::strict(Primitive::String).constructor_fn(|v| {
        Ok(if v.is_empty_string() {
            Value::Undefined
        } else {
            v.clone()
        })
    });
    let t = Type::definition(Primitive::Array).of(member).unwrap();
    assert_eq!(t.apply(&strings(&["", "foo"])).unwrap(), strings(&["foo"]));
    assert_eq!(
        t.try_apply(&strings(&["", "foo"])),
        Outcome::Success(strings(&["foo"]))
    );
}

#[test]
fn params_array() {
    let t = registry::lookup("params.array<params.integer>").unwrap();
    assert_eq!(t.apply(&Value::from("oops")).unwrap(), Value::from("oops"));
    assert_eq!(t.apply(&Value::from("")).unwrap(), Value::new_array());
    assert_eq!(
        t.apply(&strings(&["1", "2"])).unwrap(),
        Value::from(vec![Value::from(1), Value::from(2)])
    );
}

#[test]
fn safe_array_keeps_invalid_input() {
    let t = registry::lookup("json.array<strict.integer>").unwrap();
    let input = strings(&["1"]);
    assert_eq!(t.apply(&input).unwrap(), input);
    assert!(!t.is_valid(&input));
}

#[test]
fn only_array_types_take_members() {
    assert!(Type::definition(Primitive::String)
        .of(Type::any())
        .is_err());
    assert!(registry::lookup("string<integer>").is_err());
}
