// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Conversions for values decoded from JSON, where only strings carry dates
//! and decimals.

use crate::coercions::{parse_date, parse_date_time, parse_time};
use crate::error::CoercionError;
use crate::number::Number;
use crate::value::Value;

pub(super) fn to_nil(input: &Value) -> Result<Value, CoercionError> {
    if input.is_absent() {
        Ok(Value::Null)
    } else {
        Ok(input.clone())
    }
}

fn parse_with(input: &Value, parse: fn(&str) -> Option<Value>) -> Value {
    match input {
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

pub(super) fn to_decimal(input: &Value) -> Result<Value, CoercionError> {
    Ok(match input {
        Value::Number(n) => n.to_decimal().map_or_else(|| input.clone(), Value::from),
        Value::String(s) => Number::parse_decimal(s).map_or_else(|| input.clone(), Value::from),
        _ => input.clone(),
    })
}
