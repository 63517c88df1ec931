// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Shorthand constructors for common type shapes.

use crate::coercions::Coercion;
use crate::error::CoercionError;
use crate::logic::build_rule;
use crate::primitive::Primitive;
use crate::types::Type;
use crate::value::Value;

fn primitive_of(value: &Value) -> Primitive {
    Primitive::from_name(value.class_name()).unwrap_or(Primitive::Any)
}

pub fn definition(primitive: Primitive) -> Type {
    Type::definition(primitive)
}

/// Instances of `primitive`: the definition constrained by `type?`.
pub fn instance(primitive: Primitive) -> Type {
    Type::strict(primitive)
}

/// Values equal to `value`.
pub fn value(value: Value) -> Result<Type, CoercionError> {
    let rule = build_rule([("eql", value.clone())])?;
    Ok(Type::definition(primitive_of(&value)).constrained_by(rule))
}

/// Values identical to `value`.
pub fn constant(value: Value) -> Result<Type, CoercionError> {
    let rule = build_rule([("is", value.clone())])?;
    Ok(Type::definition(primitive_of(&value)).constrained_by(rule))
}

pub fn array(member: Type) -> Result<Type, CoercionError> {
    Type::definition(Primitive::Array).of(member)
}

/// A hash schema with the default policy.
pub fn hash<K, I>(members: I) -> Result<Type, CoercionError>
where
    K: Into<Value>,
    I: IntoIterator<Item = (K, Type)>,
{
    Type::definition(Primitive::Hash).schema(members)
}

pub fn map(key: Type, value: Type) -> Type {
    Type::hash_map(key, value)
}

/// `primitive` built from input by `coercion`.
pub fn constructor(primitive: Primitive, coercion: Coercion) -> Type {
    Type::definition(primitive).constructor(coercion)
}
