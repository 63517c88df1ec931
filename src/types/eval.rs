// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::coercions::Coercion;
use crate::error::CoercionError;
use crate::primitive::Primitive;
use crate::result::Outcome;
use crate::types::{map, Kind, Type};
use crate::value::Value;

// Runs the constructor pipeline. `Undefined` stops it early.
fn run_fns(fns: &[Coercion], input: &Value) -> Result<Value, CoercionError> {
    let mut value = input.clone();
    for f in fns {
        value = f.call(&value)?;
        if value.is_undefined() {
            break;
        }
    }
    Ok(value)
}

fn map_enum(mapping: &[(Value, Value)], input: &Value) -> Value {
    if mapping.iter().any(|(k, _)| k == input) {
        return input.clone();
    }
    mapping
        .iter()
        .find(|(_, alias)| alias == input)
        .map_or_else(|| input.clone(), |(k, _)| k.clone())
}

fn check_rule(
    rule: &crate::logic::Rule,
    value: Value,
) -> Result<Value, CoercionError> {
    match rule.evaluate(&value) {
        Ok(()) => Ok(value),
        Err(failure) => Err(CoercionError::Constraint {
            input: value,
            failure,
        }),
    }
}

impl Type {
    /// Coerces `input`, failing with the first representative error.
    ///
    /// Nominal types are lenient here: a definition returns its input
    /// unchanged, and so does an array given something that is not an array.
    pub fn apply(&self, input: &Value) -> Result<Value, CoercionError> {
        match self.kind() {
            Kind::Definition { .. } => Ok(input.clone()),
            Kind::Constructor { inner, fns } => {
                let value = run_fns(fns, input)?;
                if value.is_undefined() {
                    return Ok(value);
                }
                inner.apply(&value)
            }
            Kind::Constrained { inner, rule } => check_rule(rule, inner.apply(input)?),
            Kind::Sum { left, right } => match left.try_apply(input) {
                Outcome::Success(v) => Ok(v),
                Outcome::Failure(_) => right.apply(input),
            },
            Kind::Enum { inner, mapping } => inner.apply(&map_enum(mapping, input)),
            Kind::Safe { inner } => Ok(match inner.try_apply(input) {
                Outcome::Success(v) => v,
                Outcome::Failure(_) => input.clone(),
            }),
            Kind::Default { inner, value } => {
                if input.is_undefined() {
                    return Ok(value.evaluate());
                }
                let coerced = inner.apply(input)?;
                Ok(if coerced.is_absent() {
                    value.evaluate()
                } else {
                    coerced
                })
            }
            Kind::Maybe { inner } => {
                if input.is_absent() {
                    Ok(Value::Null)
                } else {
                    inner.apply(input)
                }
            }
            Kind::Schema(schema) => schema.resolve(input, true),
            Kind::Array { member } => match input {
                Value::Array(items) => {
                    let mut output = Vec::with_capacity(items.len());
                    for item in items.iter() {
                        let value = member.apply(item)?;
                        if !value.is_undefined() {
                            output.push(value);
                        }
                    }
                    Ok(Value::from(output))
                }
                _ => Ok(input.clone()),
            },
            Kind::Map { key, value } => map::resolve(key, value, input),
        }
    }

    /// Coerces `input` without raising.
    pub fn try_apply(&self, input: &Value) -> Outcome {
        match self.kind() {
            Kind::Definition { primitive } => {
                if primitive.is_instance(input) {
                    Outcome::Success(input.clone())
                } else {
                    Outcome::failure(
                        input,
                        CoercionError::TypeMismatch {
                            input: input.clone(),
                            expected: *primitive,
                        },
                    )
                }
            }
            Kind::Constructor { inner, fns } => match run_fns(fns, input) {
                Ok(value) if value.is_undefined() => Outcome::Success(value),
                Ok(value) => inner.try_apply(&value),
                Err(error) => Outcome::failure(input, error),
            },
            Kind::Constrained { inner, rule } => {
                match inner.apply(input).and_then(|v| check_rule(rule, v)) {
                    Ok(v) => Outcome::Success(v),
                    Err(error) => Outcome::failure(input, error),
                }
            }
            Kind::Sum { left, right } => match left.try_apply(input) {
                success @ Outcome::Success(_) => success,
                Outcome::Failure(_) => right.try_apply(input),
            },
            Kind::Enum { inner, mapping } => inner.try_apply(&map_enum(mapping, input)),
            Kind::Safe { inner } => inner.try_apply(input),
            Kind::Default { inner, value } => {
                if input.is_undefined() {
                    return Outcome::Success(value.evaluate());
                }
                match inner.try_apply(input) {
                    Outcome::Success(v) if v.is_absent() => Outcome::Success(value.evaluate()),
                    outcome => outcome,
                }
            }
            Kind::Maybe { inner } => {
                if input.is_absent() {
                    Outcome::Success(Value::Null)
                } else {
                    inner.try_apply(input)
                }
            }
            Kind::Schema(schema) => match schema.resolve(input, false) {
                Ok(v) => Outcome::Success(v),
                Err(error) => Outcome::failure(input, error),
            },
            Kind::Array { member } => match input {
                Value::Array(items) => {
                    let mut output = Vec::with_capacity(items.len());
                    for item in items.iter() {
                        match member.try_apply(item) {
                            Outcome::Success(v) if v.is_undefined() => {}
                            Outcome::Success(v) => output.push(v),
                            Outcome::Failure(f) => return Outcome::failure(input, f.error),
                        }
                    }
                    Outcome::Success(Value::from(output))
                }
                _ => Outcome::failure(
                    input,
                    CoercionError::TypeMismatch {
                        input: input.clone(),
                        expected: Primitive::Array,
                    },
                ),
            },
            Kind::Map { key, value } => match map::resolve(key, value, input) {
                Ok(v) => Outcome::Success(v),
                Err(error) => Outcome::failure(input, error),
            },
        }
    }

    /// Whether `input` coerces successfully. Never fails.
    pub fn is_valid(&self, input: &Value) -> bool {
        match self.kind() {
            Kind::Default { inner, .. } => input.is_undefined() || inner.is_valid(input),
            _ => self.try_apply(input).is_success(),
        }
    }

    /// Case-equality, an alias of [`Type::is_valid`].
    pub fn matches(&self, input: &Value) -> bool {
        self.is_valid(input)
    }
}
