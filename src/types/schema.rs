// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoercionError;
use crate::primitive::Primitive;
use crate::result::Outcome;
use crate::types::{Kind, Type};
use crate::value::Value;

/// How a hash schema treats missing and unknown keys.
///
/// | policy                 | missing key                  | unknown keys | defaults |
/// |------------------------|------------------------------|--------------|----------|
/// | `Schema`               | default, else omitted        | dropped      | yes      |
/// | `Weak` / `Permissive`  | default, else omitted        | dropped      | yes      |
/// | `Strict`               | `MissingKey`                 | `UnknownKeys`| no       |
/// | `StrictWithDefaults`   | default, else `MissingKey`   | `UnknownKeys`| yes      |
/// | `Symbolized`           | default, else omitted        | dropped      | yes      |
///
/// `Weak` and `Symbolized` keep the raw value of a member that fails to coerce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    Schema,
    Weak,
    Permissive,
    Strict,
    StrictWithDefaults,
    Symbolized,
}

impl Policy {
    fn rejects_unknown_keys(&self) -> bool {
        matches!(self, Policy::Strict | Policy::StrictWithDefaults)
    }

    fn requires_keys(&self) -> bool {
        matches!(self, Policy::Strict | Policy::StrictWithDefaults)
    }

    fn applies_defaults(&self) -> bool {
        !matches!(self, Policy::Strict)
    }

    fn is_lenient(&self) -> bool {
        matches!(self, Policy::Weak | Policy::Symbolized)
    }

    pub fn default_key_transform(&self) -> KeyTransform {
        match self {
            Policy::Symbolized => KeyTransform::Symbolize,
            _ => KeyTransform::Identity,
        }
    }
}

/// Applied to every input key before member lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyTransform {
    Identity,
    Symbolize,
    Stringify,
}

impl KeyTransform {
    pub fn apply(&self, key: &Value) -> Value {
        match (self, key) {
            (KeyTransform::Symbolize, Value::String(s)) => Value::Symbol(s.clone()),
            (KeyTransform::Stringify, Value::Symbol(s)) => Value::String(s.clone()),
            _ => key.clone(),
        }
    }
}

/// Named, ordered members of a hash schema.
#[derive(Debug, Clone)]
pub struct Schema {
    members: Vec<(Value, Type)>,
    policy: Policy,
    key_transform: KeyTransform,
}

impl Schema {
    pub fn new(policy: Policy, members: Vec<(Value, Type)>) -> Schema {
        Schema {
            members,
            policy,
            key_transform: policy.default_key_transform(),
        }
    }

    pub fn members(&self) -> &[(Value, Type)] {
        &self.members
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn key_transform(&self) -> KeyTransform {
        self.key_transform
    }

    pub fn with_key_transform(&self, key_transform: KeyTransform) -> Schema {
        Schema {
            key_transform,
            ..self.clone()
        }
    }

    pub(crate) fn map_members(&self, f: impl Fn(&Type) -> Type) -> Schema {
        Schema {
            members: self
                .members
                .iter()
                .map(|(name, t)| (name.clone(), f(t)))
                .collect(),
            ..self.clone()
        }
    }

    /// Coerces `input`. Members are applied when `raising`, tried otherwise;
    /// either way the first failing member (declaration order) is reported.
    pub(crate) fn resolve(&self, input: &Value, raising: bool) -> Result<Value, CoercionError> {
        let Value::Object(fields) = input else {
            return Err(CoercionError::TypeMismatch {
                input: input.clone(),
                expected: Primitive::Hash,
            });
        };

        let fields: BTreeMap<Value, &Value> = fields
            .iter()
            .map(|(k, v)| (self.key_transform.apply(k), v))
            .collect();

        if self.policy.rejects_unknown_keys() {
            let unknown: Vec<Value> = fields
                .keys()
                .filter(|k| !self.members.iter().any(|(name, _)| name == *k))
                .cloned()
                .collect();
            if !unknown.is_empty() {
                return Err(CoercionError::UnknownKeys { keys: unknown });
            }
        }

        let mut output = BTreeMap::new();
        for (name, member) in &self.members {
            let value = match fields.get(name) {
                Some(raw) => self.coerce_member(name, member, raw, raising)?,
                None => match self.missing(name, member)? {
                    Some(value) => value,
                    None => continue,
                },
            };
            if !value.is_undefined() {
                output.insert(name.clone(), value);
            }
        }
        Ok(Value::from(output))
    }

    fn coerce_member(
        &self,
        name: &Value,
        member: &Type,
        raw: &Value,
        raising: bool,
    ) -> Result<Value, CoercionError> {
        let attributed = |error| CoercionError::Member {
            key: name.clone(),
            error: Box::new(error),
        };
        if self.policy.is_lenient() {
            return Ok(match member.try_apply(raw) {
                Outcome::Success(v) => v,
                Outcome::Failure(_) => raw.clone(),
            });
        }
        if raising {
            member.apply(raw).map_err(attributed)
        } else {
            member.try_apply(raw).into_result().map_err(attributed)
        }
    }

    // Value for a member whose key is absent; `None` leaves the key out.
    fn missing(&self, name: &Value, member: &Type) -> Result<Option<Value>, CoercionError> {
        if self.policy.applies_defaults() {
            if let Some(value) = member.evaluate_default() {
                return Ok(Some(value));
            }
            if let Kind::Maybe { .. } = member.kind() {
                return Ok(Some(Value::Null));
            }
        }
        if self.policy.requires_keys() {
            return Err(CoercionError::MissingKey { key: name.clone() });
        }
        Ok(None)
    }
}
