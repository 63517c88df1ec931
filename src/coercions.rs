// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Coercion functions and default generators.
//!
//! Both are reference counted closures compared by identity. Built-in ones
//! carry a stable name (`params.integer`) which doubles as their AST reference;
//! anonymous closures are referenced as `fn_<address>`, valid within the
//! current process only.

use core::fmt;
use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

use crate::error::CoercionError;
use crate::value::Value;

mod json;
mod kernel;
mod params;


pub type CoercionFn = dyn Fn(&Value) -> Result<Value, CoercionError> + Send + Sync;
pub type GeneratorFn = dyn Fn() -> Value + Send + Sync;

fn address_reference<T: ?Sized>(f: &Arc<T>) -> Arc<str> {
    format!("fn_{:x}", Arc::as_ptr(f).cast::<()>() as usize).into()
}

/// A possibly failing transformation applied before a type's own checks.
#[derive(Clone)]
pub struct Coercion {
    name: Option<Arc<str>>,
    f: Arc<CoercionFn>,
}

impl Coercion {
    pub fn new<F>(f: F) -> Coercion
    where
        F: Fn(&Value) -> Result<Value, CoercionError> + Send + Sync + 'static,
    {
        Coercion {
            name: None,
            f: Arc::new(f),
        }
    }

    pub fn named<F>(name: &str, f: F) -> Coercion
    where
        F: Fn(&Value) -> Result<Value, CoercionError> + Send + Sync + 'static,
    {
        Coercion {
            name: Some(name.into()),
            f: Arc::new(f),
        }
    }

    pub fn call(&self, input: &Value) -> Result<Value, CoercionError> {
        (self.f)(input)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Opaque reference used by the AST codec.
    pub fn reference(&self) -> Arc<str> {
        match &self.name {
            Some(name) => name.clone(),
            None => address_reference(&self.f),
        }
    }

    /// Reference derived from the function's address, unique in this process.
    pub fn address(&self) -> Arc<str> {
        address_reference(&self.f)
    }

    /// Runs `self` then `next`. A result of `Undefined` stops the chain.
    pub fn then(&self, next: &Coercion) -> Coercion {
        let (first, second) = (self.clone(), next.clone());
        Coercion::new(move |input| {
            let value = first.call(input)?;
            if value.is_undefined() {
                return Ok(value);
            }
            second.call(&value)
        })
    }
}

impl PartialEq for Coercion {
    fn eq(&self, other: &Self) -> bool {
        Arc::as_ptr(&self.f).cast::<()>() == Arc::as_ptr(&other.f).cast::<()>()
    }
}

impl fmt::Debug for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coercion({})", self.reference())
    }
}

/// A zero-argument default generator, invoked on every miss.
#[derive(Clone)]
pub struct Generator {
    name: Option<Arc<str>>,
    f: Arc<GeneratorFn>,
}

impl Generator {
    pub fn new<F>(f: F) -> Generator
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Generator {
            name: None,
            f: Arc::new(f),
        }
    }

    pub fn named<F>(name: &str, f: F) -> Generator
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Generator {
            name: Some(name.into()),
            f: Arc::new(f),
        }
    }

    pub fn call(&self) -> Value {
        (self.f)()
    }

    pub fn reference(&self) -> Arc<str> {
        match &self.name {
            Some(name) => name.clone(),
            None => address_reference(&self.f),
        }
    }

    pub fn address(&self) -> Arc<str> {
        address_reference(&self.f)
    }
}

impl PartialEq for Generator {
    fn eq(&self, other: &Self) -> bool {
        Arc::as_ptr(&self.f).cast::<()>() == Arc::as_ptr(&other.f).cast::<()>()
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Generator({})", self.reference())
    }
}

type BuiltinFn = fn(&Value) -> Result<Value, CoercionError>;

const BUILTIN_FNS: &[(&str, BuiltinFn)] = &[
    ("kernel.string", kernel::to_string),
    ("kernel.integer", kernel::to_integer),
    ("kernel.float", kernel::to_float),
    ("kernel.decimal", kernel::to_decimal),
    ("kernel.array", kernel::to_array),
    ("kernel.hash", kernel::to_hash),
    ("kernel.symbol", kernel::to_symbol),
    ("params.nil", params::to_nil),
    ("params.true", params::to_true),
    ("params.false", params::to_false),
    ("params.integer", params::to_int),
    ("params.float", params::to_float),
    ("params.decimal", params::to_decimal),
    ("params.date", params::to_date),
    ("params.date_time", params::to_date_time),
    ("params.time", params::to_time),
    ("params.array", params::to_ary),
    ("params.hash", params::to_hash),
    ("json.nil", json::to_nil),
    ("json.date", json::to_date),
    ("json.date_time", json::to_date_time),
    ("json.time", json::to_time),
    ("json.decimal", json::to_decimal),
];

lazy_static::lazy_static! {
    static ref BUILTINS: BTreeMap<&'static str, Coercion> = BUILTIN_FNS
        .iter()
        .map(|(name, f)| (*name, Coercion::named(name, *f)))
        .collect();

    static ref BUILTIN_GENERATORS: BTreeMap<&'static str, Generator> = [
        ("time.now", Generator::named("time.now", || Value::Time(Utc::now()))),
        ("date.today", Generator::named("date.today", || Value::Date(Utc::now().date_naive()))),
    ]
    .into_iter()
    .collect();
}

/// Built-in coercion by name. The same instance is returned on every call.
pub fn builtin(name: &str) -> Option<Coercion> {
    BUILTINS.get(name).cloned()
}

pub fn builtins() -> impl Iterator<Item = &'static Coercion> {
    BUILTINS.values()
}

pub fn builtin_generator(name: &str) -> Option<Generator> {
    BUILTIN_GENERATORS.get(name).cloned()
}

pub fn builtin_generators() -> impl Iterator<Item = &'static Generator> {
    BUILTIN_GENERATORS.values()
}

pub(crate) fn parse_date(s: &str) -> Option<Value> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .ok()
        .map(Value::Date)
}

fn parse_fixed(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S %z"))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
                .ok()
                .map(|naive| naive.and_utc().fixed_offset())
        })
}

pub(crate) fn parse_date_time(s: &str) -> Option<Value> {
    parse_fixed(s).map(Value::DateTime)
}

pub(crate) fn parse_time(s: &str) -> Option<Value> {
    parse_fixed(s).map(|t| Value::Time(t.with_timezone(&Utc)))
}
