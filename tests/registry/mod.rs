// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(test)]

use std::sync::{Arc, Barrier, Mutex};
use std::thread;

use anyhow::Result;
use typesmith::*;

// Tests that reset the global registry must not overlap with tests that
// depend on its cache.
static GLOBAL: Mutex<()> = Mutex::new(());

#[test]
fn concurrent_lookups_share_one_instance() -> Result<()> {
    let _guard = GLOBAL.lock().unwrap_or_else(|e| e.into_inner());

    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                lookup("optional.array<coercible.float>")
            })
        })
        .collect();

    let mut types = vec![];
    for handle in handles {
        match handle.join() {
            Ok(t) => types.push(t?),
            Err(_) => anyhow::bail!("lookup thread panicked"),
        }
    }

    let cached = lookup("optional.array<coercible.float>")?;
    assert!(types.iter().all(|t| t.ptr_eq(&cached)));
    Ok(())
}

#[test]
fn reset_drops_registrations() -> Result<()> {
    let _guard = GLOBAL.lock().unwrap_or_else(|e| e.into_inner());

    let email = lookup("strict.string")?.constrained([("format", Value::from("@"))])?;
    register("email", email.clone())?;
    assert!(lookup("email")?.ptr_eq(&email));
    let params_integer = lookup("params.integer")?;

    reset();

    assert!(matches!(
        lookup("email"),
        Err(RegistryError::UnknownType { .. })
    ));
    assert_eq!(lookup("params.integer")?, params_integer);
    Ok(())
}

#[test]
fn registered_types_compose_with_prefixes() -> Result<()> {
    let _guard = GLOBAL.lock().unwrap_or_else(|e| e.into_inner());

    let id = lookup("params.integer")?.constrained([("gt", Value::from(0))])?;
    register("app.id", id)?;

    let ids = lookup("array<app.id>")?;
    let input = Value::from(vec![Value::from("1"), Value::from("2")]);
    assert_eq!(
        ids.apply(&input)?,
        Value::from(vec![Value::from(1), Value::from(2)])
    );
    assert!(!ids.is_valid(&Value::from(vec![Value::from("0")])));

    let optional = lookup("optional.app.id")?;
    assert_eq!(optional.apply(&Value::Null)?, Value::Null);
    Ok(())
}
