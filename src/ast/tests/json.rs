// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(clippy::unwrap_used, clippy::panic)] // tests unwrap to assert outcomes

use crate::*;

#[test]
fn wire_format() {
    let t = registry::lookup("strict.string")
        .unwrap()
        .constrained([("size", Value::range(3, 12))])
        .unwrap();
    let text = t.to_ast(true).to_json_str().unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["tag"], "constrained");
    assert_eq!(json["payload"]["inner"]["tag"], "definition");
    assert_eq!(json["payload"]["inner"]["payload"]["primitive"], "String");
    assert_eq!(json["payload"]["rule"]["tag"], "and");
    assert_eq!(
        json["payload"]["rule"]["payload"]["left"]["payload"]["name"],
        "type?"
    );
}

#[test]
fn built_in_trees_survive_json() {
    let email = registry::lookup("strict.string")
        .unwrap()
        .constrained([("format", Value::from("@"))])
        .unwrap();
    let admin = registry::lookup("params.bool")
        .unwrap()
        .default(Value::from(false))
        .unwrap();
    let t = registry::lookup("params.hash")
        .unwrap()
        .symbolized([
            (Value::symbol("email"), email),
            (Value::symbol("age"), registry::lookup("params.integer").unwrap().maybe()),
            (Value::symbol("admin"), admin),
        ])
        .unwrap()
        .with_meta([("doc", Value::from("signup form"))]);

    let json = t.to_ast(true).to_json_str().unwrap();
    let node = Node::from_json_str(&json).unwrap();
    assert_eq!(node, t.to_ast(true));
    let compiled = compile(&node).unwrap();
    assert!(compiled.eq_with_meta(&t));

    let input: Value = Value::from_json_str(r#"{"email": "jane@doe.org", "age": "21"}"#).unwrap();
    let want: Value = [
        (Value::symbol("admin"), Value::from(false)),
        (Value::symbol("age"), Value::from(21)),
        (Value::symbol("email"), Value::from("jane@doe.org")),
    ]
    .into_iter()
    .collect();
    assert_eq!(compiled.apply(&input).unwrap(), want);
}

#[test]
fn unknown_tags_are_unsupported() {
    let json = r#"{"tag": "safe", "payload": {"inner": {"tag": "frobnicate", "payload": {}}}}"#;
    assert!(matches!(
        Node::from_json_str(json),
        Err(CompileError::UnsupportedNode(tag)) if tag == "frobnicate"
    ));
}

#[test]
fn malformed_payload() {
    let json = r#"{"tag": "definition", "payload": {"primitive": "Banana"}}"#;
    assert!(matches!(Node::from_json_str(json), Err(CompileError::Json(_))));
    assert!(Node::from_json_str("not json").is_err());
}

#[test]
fn unknown_predicate() {
    let json = r#"{"tag": "constrained", "payload": {
        "inner": {"tag": "definition", "payload": {"primitive": "String"}},
        "rule": {"tag": "predicate", "payload": {"name": "shiny?", "args": []}}}}"#;
    let node = Node::from_json_str(json).unwrap();
    assert!(matches!(compile(&node), Err(CompileError::Coercion(_))));
}

fn through_json(t: &Type) -> Type {
    let json = t.to_ast(true).to_json_str().unwrap();
    let node = Node::from_json_str(&json).unwrap();
    assert_eq!(node, t.to_ast(true), "{json}");
    compile(&node).unwrap()
}

#[test]
fn every_variant_survives_json() {
    for t in super::round_trip::variants() {
        let compiled = through_json(&t);
        assert!(compiled.eq_with_meta(&t), "{t:?} != {compiled:?}");
    }
}

#[test]
fn operand_kinds_are_kept() {
    let sized = registry::lookup("strict.string")
        .unwrap()
        .constrained([("size", Value::range(3, 12))])
        .unwrap();
    let compiled = through_json(&sized);
    assert!(compiled.is_valid(&Value::from("abcd")));
    assert!(!compiled.is_valid(&Value::from("ab")));

    let symbols = registry::lookup("strict.symbol")
        .unwrap()
        .enumeration([Value::symbol("a"), Value::symbol("b")])
        .unwrap();
    let compiled = through_json(&symbols);
    assert_eq!(compiled.values(), vec![Value::symbol("a"), Value::symbol("b")]);
    assert!(compiled.is_valid(&Value::symbol("a")));
    assert!(!compiled.is_valid(&Value::from("a")));

    let date = Value::from(chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap());
    let dated = registry::lookup("params.date")
        .unwrap()
        .default(date.clone())
        .unwrap();
    let compiled = through_json(&dated);
    assert_eq!(compiled.apply(&Value::Undefined).unwrap(), date);
}

#[test]
fn decimals_keep_their_digits() {
    let exact = Value::from(Number::parse_decimal("12345678901234567890.12").unwrap());
    let t = registry::lookup("json.decimal")
        .unwrap()
        .default(exact.clone())
        .unwrap();
    let json = t.to_ast(true).to_json_str().unwrap();
    assert!(json.contains(r#""decimal": "12345678901234567890.12""#), "{json}");
    assert_eq!(through_json(&t).apply(&Value::Undefined).unwrap(), exact);
}

#[test]
fn malformed_literal() {
    let json = r#"{"tag": "default", "payload": {
        "inner": {"tag": "definition", "payload": {"primitive": "Date"}},
        "default": {"value": {"date": "2020-02-30"}}}}"#;
    assert!(matches!(Node::from_json_str(json), Err(CompileError::Json(_))));
}
