// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::assertions_on_result_states
)] // registry tests unwrap/panic to assert outcomes

use super::super::*;
use crate::*;

fn string_type() -> Type {
    Type::definition(Primitive::String)
}

#[test]
fn test_registry_new() {
    let registry: Registry<Type> = Registry::new("test");
    assert!(registry.is_empty());
    assert_eq!(registry.len(), 0);
}

#[test]
fn test_registry_register_overwrites() {
    let registry = Registry::new("test");
    registry.register("name", string_type()).unwrap();
    registry.register("name", Type::any()).unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("name").unwrap(), Type::any());
}

#[test]
fn test_registry_invalid_names() {
    let registry = Registry::new("test");
    for name in ["", "   ", "\t\n"] {
        let result = registry.register(name, string_type());
        assert!(matches!(result, Err(RegistryError::InvalidName { .. })));
    }
    let message = validate_name(" ", "TYPES").unwrap_err().to_string();
    assert!(message.starts_with("TYPES registration failed"));
}

#[test]
fn test_registry_get_returns_same_instance() {
    let registry = Registry::new("test");
    let t = string_type();
    registry.register("name", t.clone()).unwrap();
    assert!(registry.get("name").unwrap().ptr_eq(&t));
    assert!(registry.get("missing").is_none());
}

#[test]
fn test_registry_get_or_insert_keeps_first() {
    let registry = Registry::new("test");
    let first = string_type();
    let kept = registry.get_or_insert("name", first.clone());
    let again = registry.get_or_insert("name", Type::any());
    assert!(kept.ptr_eq(&first));
    assert!(again.ptr_eq(&first));
}

#[test]
fn test_registry_retain() {
    let registry = Registry::new("test");
    registry.register("a", string_type()).unwrap();
    registry.register("b", string_type()).unwrap();
    registry.retain(|name| name != "a");
    assert!(!registry.contains("a"));

    let mut names = registry.list_names();
    names.sort();
    assert_eq!(names, vec![std::sync::Arc::from("b")]);

    registry.retain(|name| name != "b");
    assert!(registry.is_empty());
}

#[test]
fn test_named_coercion_cannot_shadow_builtin() {
    let shadow = Coercion::named("params.integer", |_| Ok(Value::from(0)));
    let reference = register_coercion(&shadow);
    assert_ne!(reference.as_ref(), "params.integer");
    assert_eq!(reference, shadow.address());
    assert_eq!(coercion(&reference).unwrap(), shadow);

    let builtin = coercion("params.integer").unwrap();
    assert_eq!(builtin, coercions::builtin("params.integer").unwrap());
    assert_eq!(builtin.call(&Value::from("7")).unwrap(), Value::from(7));

    // The built-in itself keeps its name.
    assert_eq!(register_coercion(&builtin).as_ref(), "params.integer");
}

#[test]
fn test_named_generator_cannot_shadow_builtin() {
    let shadow = Generator::named("time.now", || Value::Null);
    let reference = register_generator(&shadow);
    assert_eq!(reference, shadow.address());
    assert_eq!(
        generator("time.now").unwrap(),
        coercions::builtin_generator("time.now").unwrap()
    );
}

#[test]
fn test_registry_concurrent_access() {
    use std::sync::Arc;
    use std::thread;

    let registry = Arc::new(Registry::new("test"));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                registry
                    .register(&format!("type_{i}"), Type::definition(Primitive::Integer))
                    .unwrap();
                registry.get_or_insert("shared", Type::definition(Primitive::String))
            })
        })
        .collect();

    let shared: Vec<Type> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(registry.len(), 9);
    assert!(shared.iter().all(|t| t.ptr_eq(&shared[0])));
}
