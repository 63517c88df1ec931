// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(clippy::unwrap_used, clippy::panic)] // tests unwrap to assert outcomes

use crate::*;

fn states() -> Type {
    registry::lookup("strict.string")
        .unwrap()
        .enumeration(["draft", "published", "archived"].map(Value::from))
        .unwrap()
}

#[test]
fn values_in_declaration_order() {
    assert_eq!(
        states().values(),
        vec![Value::from("draft"), Value::from("published"), Value::from("archived")]
    );
}

#[test]
fn accepts_only_listed_values() {
    let t = states();
    assert_eq!(t.apply(&Value::from("draft")).unwrap(), Value::from("draft"));
    let err = t.apply(&Value::from("deleted")).unwrap_err();
    assert_eq!(
        err.to_string(),
        r#""deleted" violates constraints (included_in?(["draft", "published", "archived"], "deleted") failed)"#
    );
    assert!(!t.is_valid(&Value::from(1)));
}

#[test]
fn mapping_aliases_values_to_keys() {
    let t = registry::lookup("strict.integer")
        .unwrap()
        .enumeration_mapping(vec![
            (Value::from(0), Value::from("draft")),
            (Value::from(1), Value::from("published")),
        ])
        .unwrap();
    assert_eq!(t.apply(&Value::from("published")).unwrap(), Value::from(1));
    assert_eq!(t.apply(&Value::from(0)).unwrap(), Value::from(0));
    assert!(!t.is_valid(&Value::from("archived")));
    assert_eq!(t.values(), vec![Value::from(0), Value::from(1)]);
}

#[test]
fn empty_enum_is_an_argument_error() {
    assert!(matches!(
        Type::any().enumeration(Vec::new()),
        Err(CoercionError::Argument(_))
    ));
}
