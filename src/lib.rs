// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

// Use README.md as crate documentation.
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

pub mod ast;
pub mod builder;
mod builtins;
pub mod coercions;
mod error;
pub mod logic;
mod number;
mod primitive;
pub mod registry;
mod result;
pub mod types;
mod value;

pub use ast::{compile, CompileError, Node};
pub use coercions::{Coercion, Generator};
pub use error::CoercionError;
pub use logic::{build_rule, Rule, RuleFailure};
pub use number::{Decimal, Number};
pub use primitive::Primitive;
pub use registry::{lookup, register, reset, RegistryError, TypeRegistry};
pub use result::{Failure, Outcome};
pub use types::{Kind, KeyTransform, Meta, Policy, Type};
pub use value::Value;
