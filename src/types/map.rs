// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::BTreeMap;

use crate::error::CoercionError;
use crate::primitive::Primitive;
use crate::result::Outcome;
use crate::types::Type;
use crate::value::Value;

/// Coerces every entry of `input`. All offending keys and values are
/// reported together, in key order.
pub(crate) fn resolve(key: &Type, value: &Type, input: &Value) -> Result<Value, CoercionError> {
    let Value::Object(fields) = input else {
        return Err(CoercionError::TypeMismatch {
            input: input.clone(),
            expected: Primitive::Hash,
        });
    };

    let mut output = BTreeMap::new();
    let mut errors = vec![];
    for (k, v) in fields.iter() {
        match (key.try_apply(k), value.try_apply(v)) {
            (Outcome::Success(k2), Outcome::Success(v2)) => {
                output.insert(k2, v2);
            }
            (key_outcome, value_outcome) => {
                if let Outcome::Failure(f) = key_outcome {
                    errors.push(format!("input key {k} is invalid: {}", f.error.reason()));
                }
                if let Outcome::Failure(f) = value_outcome {
                    errors.push(format!(
                        "input value {v} for key {k} is invalid: {}",
                        f.error.reason()
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(Value::from(output))
    } else {
        Err(CoercionError::Map { errors })
    }
}
