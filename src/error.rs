// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::logic::RuleFailure;
use crate::primitive::Primitive;
use crate::value::Value;

fn inspect_keys(keys: &[Value]) -> String {
    Value::from(keys.to_vec()).to_string()
}

/// Errors raised while coercing or validating a value, and while configuring
/// types.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoercionError {
    /// A rule rejected the coerced value.
    #[error("{input} violates constraints ({failure} failed)")]
    Constraint { input: Value, failure: RuleFailure },

    /// The value is not an instance of the expected primitive.
    #[error("{input} must be an instance of {expected}")]
    TypeMismatch { input: Value, expected: Primitive },

    /// A coercion function could not convert the value.
    #[error("{message}")]
    Coercion { input: Value, message: String },

    #[error("{key} is missing in Hash input")]
    MissingKey { key: Value },

    /// Every key of the input that the schema does not declare.
    #[error("unexpected keys {} in Hash input", inspect_keys(.keys))]
    UnknownKeys { keys: Vec<Value> },

    /// A schema member failed; `key` names the member.
    #[error("invalid value for key {key}: {error}")]
    Member { key: Value, error: Box<CoercionError> },

    /// One message per offending map entry.
    #[error("{}", .errors.join("\n"))]
    Map { errors: Vec<String> },

    /// Malformed type configuration.
    #[error("{0}")]
    Argument(String),
}

impl CoercionError {
    pub(crate) fn coercion(input: &Value, message: impl Into<String>) -> CoercionError {
        CoercionError::Coercion {
            input: input.clone(),
            message: message.into(),
        }
    }

    /// The short reason used inside aggregated messages: the violated
    /// predicate for constraint errors, the full message otherwise.
    pub fn reason(&self) -> String {
        match self {
            CoercionError::Constraint { failure, .. } => failure.to_string(),
            _ => self.to_string(),
        }
    }

    /// Constraint, mismatch and coercion failures.
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            CoercionError::Constraint { .. }
                | CoercionError::TypeMismatch { .. }
                | CoercionError::Coercion { .. }
        )
    }
}
