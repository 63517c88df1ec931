// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Built-in registry entries: nominal definitions and their `strict`,
//! `coercible`, `params` and `json` variants.

use log::warn;

use crate::coercions;
use crate::primitive::Primitive;
use crate::registry::Registry;
use crate::types::Type;

const COERCIBLE: &[(&str, Primitive, &str)] = &[
    ("coercible.string", Primitive::String, "kernel.string"),
    ("coercible.integer", Primitive::Integer, "kernel.integer"),
    ("coercible.float", Primitive::Float, "kernel.float"),
    ("coercible.decimal", Primitive::Decimal, "kernel.decimal"),
    ("coercible.array", Primitive::Array, "kernel.array"),
    ("coercible.hash", Primitive::Hash, "kernel.hash"),
    ("coercible.symbol", Primitive::Symbol, "kernel.symbol"),
];

const PARAMS: &[(&str, Primitive, &str)] = &[
    ("params.nil", Primitive::Nil, "params.nil"),
    ("params.true", Primitive::True, "params.true"),
    ("params.false", Primitive::False, "params.false"),
    ("params.integer", Primitive::Integer, "params.integer"),
    ("params.float", Primitive::Float, "params.float"),
    ("params.decimal", Primitive::Decimal, "params.decimal"),
    ("params.date", Primitive::Date, "params.date"),
    ("params.date_time", Primitive::DateTime, "params.date_time"),
    ("params.time", Primitive::Time, "params.time"),
];

const JSON: &[(&str, Primitive, &str)] = &[
    ("json.nil", Primitive::Nil, "json.nil"),
    ("json.date", Primitive::Date, "json.date"),
    ("json.date_time", Primitive::DateTime, "json.date_time"),
    ("json.time", Primitive::Time, "json.time"),
    ("json.decimal", Primitive::Decimal, "json.decimal"),
];

fn put(registry: &Registry<Type>, name: &str, t: Type) {
    if let Err(e) = registry.register(name, t) {
        warn!("skipping built-in type: {e}");
    }
}

fn constructed(primitive: Primitive, coercion: &str) -> Option<Type> {
    match coercions::builtin(coercion) {
        Some(c) => Some(Type::definition(primitive).constructor(c)),
        None => {
            warn!("built-in coercion {coercion} is not defined");
            None
        }
    }
}

fn put_all(registry: &Registry<Type>, table: &[(&str, Primitive, &str)]) {
    for (name, primitive, coercion) in table {
        if let Some(t) = constructed(*primitive, coercion) {
            put(registry, name, t);
        }
    }
}

/// Registers every built-in type into `registry`.
pub fn seed(registry: &Registry<Type>) {
    for primitive in Primitive::ALL {
        put(registry, primitive.identifier(), Type::definition(primitive));
        if primitive != Primitive::Any {
            let name = format!("strict.{}", primitive.identifier());
            put(registry, &name, Type::strict(primitive));
        }
    }
    if let Some(any) = registry.get("any") {
        put(registry, "object", any);
    }
    put(
        registry,
        "bool",
        Type::definition(Primitive::True) | Type::definition(Primitive::False),
    );
    put(
        registry,
        "strict.bool",
        Type::strict(Primitive::True) | Type::strict(Primitive::False),
    );

    put_all(registry, COERCIBLE);
    put_all(registry, PARAMS);
    put_all(registry, JSON);

    if let (Some(t), Some(f)) = (registry.get("params.true"), registry.get("params.false")) {
        put(registry, "params.bool", t | f);
    }
    if let Some(t) = constructed(Primitive::Array, "params.array") {
        put(registry, "params.array", t.safe());
    }
    if let Some(t) = constructed(Primitive::Hash, "params.hash") {
        put(registry, "params.hash", t.safe());
    }
    put(registry, "json.array", Type::definition(Primitive::Array).safe());
    put(registry, "json.hash", Type::definition(Primitive::Hash).safe());
}
