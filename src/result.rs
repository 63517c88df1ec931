// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::error::CoercionError;
use crate::value::Value;

/// The input that could not be normalized and the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub input: Value,
    pub error: CoercionError,
}

/// Outcome of the non-raising `try_apply` family.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Value),
    Failure(Failure),
}

impl Outcome {
    pub fn failure(input: &Value, error: CoercionError) -> Outcome {
        Outcome::Failure(Failure {
            input: input.clone(),
            error,
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// The coerced value on success, the original input on failure.
    pub fn input(&self) -> &Value {
        match self {
            Outcome::Success(v) => v,
            Outcome::Failure(f) => &f.input,
        }
    }

    pub fn error(&self) -> Option<&CoercionError> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(f) => Some(&f.error),
        }
    }

    pub fn into_result(self) -> Result<Value, CoercionError> {
        match self {
            Outcome::Success(v) => Ok(v),
            Outcome::Failure(f) => Err(f.error),
        }
    }
}

impl From<Outcome> for Result<Value, CoercionError> {
    fn from(outcome: Outcome) -> Self {
        outcome.into_result()
    }
}
