// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Strict conversions used by `coercible.*` types. Impossible conversions fail.

use std::collections::BTreeMap;

use crate::error::CoercionError;
use crate::number::Number;
use crate::value::Value;

fn cannot_convert(input: &Value, target: &str) -> CoercionError {
    let source = match input {
        Value::Null => "nil",
        _ => input.class_name(),
    };
    CoercionError::coercion(input, format!("can't convert {source} into {target}"))
}

pub(super) fn to_string(input: &Value) -> Result<Value, CoercionError> {
    match input {
        Value::String(_) => Ok(input.clone()),
        Value::Symbol(s) => Ok(Value::String(s.clone())),
        Value::Null => Ok(Value::from("")),
        Value::Undefined => Err(cannot_convert(input, "String")),
        _ => Ok(Value::from(input.to_string())),
    }
}

pub(super) fn to_integer(input: &Value) -> Result<Value, CoercionError> {
    match input {
        Value::Number(n) => n
            .truncate()
            .map(Value::from)
            .ok_or_else(|| CoercionError::coercion(input, format!("{input} cannot be an Integer"))),
        Value::String(s) => Number::parse_integer(s).map(Value::from).ok_or_else(|| {
            CoercionError::coercion(input, format!("invalid value for Integer(): {input}"))
        }),
        _ => Err(cannot_convert(input, "Integer")),
    }
}

pub(super) fn to_float(input: &Value) -> Result<Value, CoercionError> {
    match input {
        Value::Number(n) => Ok(Value::from(n.to_float())),
        Value::String(s) => Number::parse_float(s)
            .map(|n| Value::from(n.to_float()))
            .ok_or_else(|| {
                CoercionError::coercion(input, format!("invalid value for Float(): {input}"))
            }),
        _ => Err(cannot_convert(input, "Float")),
    }
}

pub(super) fn to_decimal(input: &Value) -> Result<Value, CoercionError> {
    let invalid =
        || CoercionError::coercion(input, format!("invalid value for BigDecimal(): {input}"));
    match input {
        Value::Number(n) => n.to_decimal().map(Value::from).ok_or_else(invalid),
        Value::String(s) => Number::parse_decimal(s).map(Value::from).ok_or_else(invalid),
        _ => Err(cannot_convert(input, "BigDecimal")),
    }
}

pub(super) fn to_array(input: &Value) -> Result<Value, CoercionError> {
    match input {
        Value::Array(_) => Ok(input.clone()),
        Value::Set(items) => Ok(Value::from(items.iter().cloned().collect::<Vec<_>>())),
        Value::Null => Ok(Value::new_array()),
        Value::Object(fields) => Ok(Value::from(
            fields
                .iter()
                .map(|(k, v)| Value::from(vec![k.clone(), v.clone()]))
                .collect::<Vec<_>>(),
        )),
        Value::Undefined => Err(cannot_convert(input, "Array")),
        _ => Ok(Value::from(vec![input.clone()])),
    }
}

pub(super) fn to_hash(input: &Value) -> Result<Value, CoercionError> {
    match input {
        Value::Object(_) => Ok(input.clone()),
        Value::Null => Ok(Value::new_object()),
        Value::Array(items) => {
            let mut fields = BTreeMap::new();
            for item in items.iter() {
                match item {
                    Value::Array(pair) if pair.len() == 2 => {
                        fields.insert(pair[0].clone(), pair[1].clone());
                    }
                    _ => return Err(cannot_convert(input, "Hash")),
                }
            }
            Ok(Value::from(fields))
        }
        _ => Err(cannot_convert(input, "Hash")),
    }
}

pub(super) fn to_symbol(input: &Value) -> Result<Value, CoercionError> {
    match input {
        Value::Symbol(_) => Ok(input.clone()),
        Value::String(s) => Ok(Value::Symbol(s.clone())),
        _ => Err(CoercionError::coercion(
            input,
            format!("{input} is not a symbol nor a string"),
        )),
    }
}
