// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Lenient conversions for form parameters. Empty strings mean "no value" and
//! input that cannot be converted is returned unchanged for the wrapped type to
//! judge.

use crate::coercions::{parse_date, parse_date_time, parse_time};
use crate::error::CoercionError;
use crate::number::Number;
use crate::value::Value;

const TRUE_VALUES: &[&str] = &[
    "1", "on", "On", "ON", "t", "true", "True", "TRUE", "T", "y", "yes", "Yes", "YES", "Y",
];

const FALSE_VALUES: &[&str] = &[
    "0", "off", "Off", "OFF", "f", "false", "False", "FALSE", "F", "n", "no", "No", "NO", "N",
];

pub(super) fn to_nil(input: &Value) -> Result<Value, CoercionError> {
    if input.is_empty_string() {
        Ok(Value::Null)
    } else {
        Ok(input.clone())
    }
}

pub(super) fn to_true(input: &Value) -> Result<Value, CoercionError> {
    match input {
        Value::String(s) if TRUE_VALUES.contains(&s.as_ref()) => Ok(Value::Bool(true)),
        _ => Ok(input.clone()),
    }
}

pub(super) fn to_false(input: &Value) -> Result<Value, CoercionError> {
    match input {
        Value::String(s) if FALSE_VALUES.contains(&s.as_ref()) => Ok(Value::Bool(false)),
        _ => Ok(input.clone()),
    }
}

pub(super) fn to_int(input: &Value) -> Result<Value, CoercionError> {
    Ok(match input {
        Value::String(s) if s.is_empty() => Value::Null,
        Value::String(s) => Number::parse_integer(s).map_or_else(|| input.clone(), Value::from),
        Value::Number(n) => n.truncate().map_or_else(|| input.clone(), Value::from),
        _ => input.clone(),
    })
}

pub(super) fn to_float(input: &Value) -> Result<Value, CoercionError> {
    Ok(match input {
        Value::String(s) if s.is_empty() => Value::Null,
        Value::String(s) => {
            Number::parse_float(s).map_or_else(|| input.clone(), |n| Value::from(n.to_float()))
        }
        Value::Number(n) => Value::from(n.to_float()),
        _ => input.clone(),
    })
}

pub(super) fn to_decimal(input: &Value) -> Result<Value, CoercionError> {
    Ok(match input {
        Value::String(s) if s.is_empty() => Value::Null,
        Value::String(s) => Number::parse_decimal(s).map_or_else(|| input.clone(), Value::from),
        Value::Number(n) => n.to_decimal().map_or_else(|| input.clone(), Value::from),
        _ => input.clone(),
    })
}

fn parse_with(input: &Value, parse: fn(&str) -> Option<Value>) -> Value {
    match input {
        Value::String(s) if s.is_empty() => Value::Null,
        Value::String(s) => parse(s).unwrap_or_else(|| input.clone()),
        _ => input.clone(),
    }
}

pub(super) fn to_date(input: &Value) -> Result<Value, CoercionError> {
    Ok(parse_with(input, parse_date))
}

pub(super) fn to_date_time(input: &Value) -> Result<Value, CoercionError> {
    Ok(parse_with(input, parse_date_time))
}

pub(super) fn to_time(input: &Value) -> Result<Value, CoercionError> {
    Ok(parse_with(input, parse_time))
}

pub(super) fn to_ary(input: &Value) -> Result<Value, CoercionError> {
    if input.is_empty_string() {
        Ok(Value::new_array())
    } else {
        Ok(input.clone())
    }
}

pub(super) fn to_hash(input: &Value) -> Result<Value, CoercionError> {
    if input.is_empty_string() || input.is_null() {
        Ok(Value::new_object())
    } else {
        Ok(input.clone())
    }
}
