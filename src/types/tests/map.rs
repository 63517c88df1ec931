// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(clippy::unwrap_used, clippy::panic)] // tests unwrap to assert outcomes

use crate::*;

fn option_key() -> Type {
    registry::lookup("strict.string")
        .unwrap()
        .constructor_fn(|v| {
            Ok(match v {
                Value::String(s) => Value::from(s.trim().to_lowercase()),
                _ => v.clone(),
            })
        })
        .constrained([("format", Value::from("^opt_"))])
        .unwrap()
}

fn options() -> Type {
    Type::definition(Primitive::Hash)
        .map(option_key(), registry::lookup("strict.bool").unwrap())
        .unwrap()
}

#[test]
fn valid_entries_are_coerced() {
    let input: Value = [
        (Value::from(" OPT_a "), Value::from(true)),
        (Value::from("opt_b"), Value::from(false)),
    ]
    .into_iter()
    .collect();
    let want: Value = [
        (Value::from("opt_a"), Value::from(true)),
        (Value::from("opt_b"), Value::from(false)),
    ]
    .into_iter()
    .collect();
    assert_eq!(options().apply(&input).unwrap(), want);
}

#[test]
fn every_violation_is_reported() {
    let input: Value = [
        (Value::symbol("opt_sym"), Value::from(false)),
        (Value::from(" opt_foo "), Value::from("bar")),
        (Value::from("other"), Value::from(true)),
    ]
    .into_iter()
    .collect();

    let t = options();
    assert!(!t.is_valid(&input));

    let CoercionError::Map { errors } = t.apply(&input).unwrap_err() else {
        panic!("expected a map error");
    };
    assert_eq!(
        errors,
        vec![
            r#"input key :opt_sym is invalid: type?(String, :opt_sym)"#.to_string(),
            r#"input value "bar" for key " opt_foo " is invalid: type?(FalseClass, "bar")"#.to_string(),
            r#"input key "other" is invalid: format?(/^opt_/, "other")"#.to_string(),
        ]
    );

    let outcome = t.try_apply(&input);
    assert_eq!(outcome.error().unwrap().to_string(), errors.join("\n"));
}

#[test]
fn non_hash_input() {
    assert!(matches!(
        options().apply(&Value::from("x")),
        Err(CoercionError::TypeMismatch { .. })
    ));
}

#[test]
fn rebuilding_keeps_the_other_component() {
    let t = options().with_meta([("doc", Value::from("flags"))]);
    let relaxed = t.with_value_type(Type::any()).unwrap();
    assert_eq!(relaxed.meta(), t.meta());
    let Kind::Map { key, value } = relaxed.kind() else {
        panic!("expected a map");
    };
    assert_eq!(key, &option_key_of(&t));
    assert_eq!(value, &Type::any());

    let keyed = t.with_key_type(Type::any()).unwrap();
    let entry: Value = [(Value::from("x"), Value::from(true))].into_iter().collect();
    assert!(keyed.is_valid(&entry));
    assert!(Type::any().with_key_type(Type::any()).is_err());
}

fn option_key_of(t: &Type) -> Type {
    match t.kind() {
        Kind::Map { key, .. } => key.clone(),
        _ => panic!("expected a map"),
    }
}
