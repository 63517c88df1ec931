// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Composable type descriptions.
//!
//! A [`Type`] is an immutable, cheaply clonable description of an expected
//! value shape together with its coercion and validation behavior. Every
//! combinator returns a new `Type`; the receiver is never modified.
//!
//! ```text
//! let age = lookup("params.integer")?.constrained([("gteq", Value::from(18))])?;
//! let user = Type::definition(Primitive::Hash).schema([("age", age)])?;
//! user.apply(&input)?;
//! ```

use core::fmt;
use core::ops::BitOr;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::coercions::{Coercion, Generator};
use crate::error::CoercionError;
use crate::logic::{build_rule, Rule};
use crate::primitive::Primitive;
use crate::result::Outcome;
use crate::value::Value;

mod eval;
mod map;
mod schema;

pub use schema::{KeyTransform, Policy, Schema};


/// Opaque annotations carried by every type.
pub type Meta = BTreeMap<String, Value>;

/// Default of a `Default` type: a fixed value or a generator run on each miss.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Static(Value),
    Generator(Generator),
}

impl DefaultValue {
    pub fn evaluate(&self) -> Value {
        match self {
            DefaultValue::Static(v) => v.clone(),
            DefaultValue::Generator(g) => g.call(),
        }
    }
}

/// The variants of [`Type`].
#[derive(Debug, Clone)]
pub enum Kind {
    /// A primitive marker. Applying passes input through unchanged.
    Definition { primitive: Primitive },
    /// Coercion functions run in order before `inner`.
    Constructor { inner: Type, fns: Vec<Coercion> },
    /// `inner` followed by a rule check on the coerced value.
    Constrained { inner: Type, rule: Rule },
    /// `left`, falling back to `right`.
    Sum { left: Type, right: Type },
    /// `inner` is constrained to the mapping keys; values alias their key.
    Enum {
        inner: Type,
        mapping: Vec<(Value, Value)>,
    },
    /// Returns the original input instead of failing.
    Safe { inner: Type },
    Default { inner: Type, value: DefaultValue },
    /// Absent input becomes `nil`; anything else goes through `inner`.
    Maybe { inner: Type },
    Schema(Schema),
    Array { member: Type },
    Map { key: Type, value: Type },
}

struct TypeNode {
    kind: Kind,
    meta: Meta,
}

#[derive(Clone)]
pub struct Type {
    node: Arc<TypeNode>,
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Type");
        s.field("kind", self.kind());
        if !self.meta().is_empty() {
            s.field("meta", self.meta());
        }
        s.finish()
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Equality ignores meta. See [`Type::eq_with_meta`].
impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other, false)
    }
}

impl BitOr for Type {
    type Output = Type;

    fn bitor(self, rhs: Type) -> Type {
        self.or(&rhs)
    }
}

impl BitOr for &Type {
    type Output = Type;

    fn bitor(self, rhs: &Type) -> Type {
        self.or(rhs)
    }
}

impl Type {
    pub(crate) fn from_kind(kind: Kind, meta: Meta) -> Type {
        Type {
            node: Arc::new(TypeNode { kind, meta }),
        }
    }

    fn wrap(kind: Kind) -> Type {
        Type::from_kind(kind, Meta::new())
    }

    /// Same meta, different kind.
    fn with_kind(&self, kind: Kind) -> Type {
        Type::from_kind(kind, self.meta().clone())
    }

    pub fn definition(primitive: Primitive) -> Type {
        Type::wrap(Kind::Definition { primitive })
    }

    pub fn any() -> Type {
        Type::definition(Primitive::Any)
    }

    /// A definition constrained by `type?(primitive)`.
    pub fn strict(primitive: Primitive) -> Type {
        Type::definition(primitive).constrained_by(Rule::type_of(primitive))
    }

    /// A map type over `key` and `value`.
    pub fn hash_map(key: Type, value: Type) -> Type {
        Type::from_kind(Kind::Map { key, value }, Meta::new())
    }

    pub fn kind(&self) -> &Kind {
        &self.node.kind
    }

    pub fn meta(&self) -> &Meta {
        &self.node.meta
    }

    /// Whether both handles point at the same instance.
    pub fn ptr_eq(&self, other: &Type) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Equality that also compares meta at every level.
    pub fn eq_with_meta(&self, other: &Type) -> bool {
        self.equals(other, true)
    }

    fn equals(&self, other: &Type, with_meta: bool) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if with_meta && self.meta() != other.meta() {
            return false;
        }
        match (self.kind(), other.kind()) {
            (Kind::Definition { primitive: a }, Kind::Definition { primitive: b }) => a == b,
            (
                Kind::Constructor { inner: a, fns: fa },
                Kind::Constructor { inner: b, fns: fb },
            ) => fa == fb && a.equals(b, with_meta),
            (
                Kind::Constrained { inner: a, rule: ra },
                Kind::Constrained { inner: b, rule: rb },
            ) => ra == rb && a.equals(b, with_meta),
            (Kind::Sum { left: la, right: ra }, Kind::Sum { left: lb, right: rb }) => {
                la.equals(lb, with_meta) && ra.equals(rb, with_meta)
            }
            (
                Kind::Enum {
                    inner: a,
                    mapping: ma,
                },
                Kind::Enum {
                    inner: b,
                    mapping: mb,
                },
            ) => ma == mb && a.equals(b, with_meta),
            (Kind::Safe { inner: a }, Kind::Safe { inner: b })
            | (Kind::Maybe { inner: a }, Kind::Maybe { inner: b }) => a.equals(b, with_meta),
            (
                Kind::Default { inner: a, value: va },
                Kind::Default { inner: b, value: vb },
            ) => va == vb && a.equals(b, with_meta),
            (Kind::Schema(a), Kind::Schema(b)) => {
                a.policy() == b.policy()
                    && a.key_transform() == b.key_transform()
                    && a.members().len() == b.members().len()
                    && a.members()
                        .iter()
                        .zip(b.members())
                        .all(|((ka, ta), (kb, tb))| ka == kb && ta.equals(tb, with_meta))
            }
            (Kind::Array { member: a }, Kind::Array { member: b }) => a.equals(b, with_meta),
            (Kind::Map { key: ka, value: va }, Kind::Map { key: kb, value: vb }) => {
                ka.equals(kb, with_meta) && va.equals(vb, with_meta)
            }
            _ => false,
        }
    }

    /// Human readable name, e.g. `NilClass | String`.
    pub fn name(&self) -> String {
        match self.kind() {
            Kind::Definition {
                primitive: Primitive::Any,
            } => "Any".to_string(),
            Kind::Definition { primitive } => primitive.name().to_string(),
            Kind::Constructor { inner, .. }
            | Kind::Constrained { inner, .. }
            | Kind::Enum { inner, .. }
            | Kind::Safe { inner }
            | Kind::Default { inner, .. } => inner.name(),
            Kind::Maybe { inner } => format!("Maybe<{}>", inner.name()),
            Kind::Sum { left, right } => format!("{} | {}", left.name(), right.name()),
            Kind::Schema(_) => Primitive::Hash.name().to_string(),
            Kind::Array { .. } => Primitive::Array.name().to_string(),
            Kind::Map { .. } => "Map".to_string(),
        }
    }

    pub fn primitive(&self) -> Option<Primitive> {
        match self.kind() {
            Kind::Definition { primitive } => Some(*primitive),
            Kind::Constructor { inner, .. }
            | Kind::Constrained { inner, .. }
            | Kind::Enum { inner, .. }
            | Kind::Safe { inner }
            | Kind::Default { inner, .. }
            | Kind::Maybe { inner } => inner.primitive(),
            Kind::Schema(_) | Kind::Map { .. } => Some(Primitive::Hash),
            Kind::Array { .. } => Some(Primitive::Array),
            Kind::Sum { .. } => None,
        }
    }

    /// True for sums whose leftmost alternative accepts `nil`.
    pub fn is_optional(&self) -> bool {
        match self.kind() {
            Kind::Sum { left, .. } => match left.kind() {
                Kind::Sum { .. } => left.is_optional(),
                _ => left.primitive() == Some(Primitive::Nil),
            },
            _ => false,
        }
    }

    pub fn is_constrained(&self) -> bool {
        match self.kind() {
            Kind::Constrained { .. } => true,
            Kind::Constructor { inner, .. }
            | Kind::Enum { inner, .. }
            | Kind::Safe { inner }
            | Kind::Default { inner, .. }
            | Kind::Maybe { inner } => inner.is_constrained(),
            Kind::Sum { left, right } => left.is_constrained() || right.is_constrained(),
            _ => false,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self.kind(), Kind::Default { .. })
    }

    /// The rule checked by this type; sums combine their branches with `Or`.
    pub fn rule(&self) -> Option<Rule> {
        match self.kind() {
            Kind::Constrained { rule, .. } => Some(rule.clone()),
            Kind::Constructor { inner, .. }
            | Kind::Enum { inner, .. }
            | Kind::Safe { inner }
            | Kind::Default { inner, .. }
            | Kind::Maybe { inner } => inner.rule(),
            Kind::Sum { left, right } => match (left.rule(), right.rule()) {
                (Some(l), Some(r)) => Some(l.or(r)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Value used for a missing schema member, if any.
    pub fn evaluate_default(&self) -> Option<Value> {
        match self.kind() {
            Kind::Default { value, .. } => Some(value.evaluate()),
            _ => None,
        }
    }

    /// Array member type.
    pub fn member(&self) -> Option<&Type> {
        match self.kind() {
            Kind::Array { member } => Some(member),
            _ => None,
        }
    }

    /// Wrapped type of decorators (constructor, constrained, enum, safe,
    /// default, maybe).
    pub fn inner(&self) -> Option<&Type> {
        match self.kind() {
            Kind::Constructor { inner, .. }
            | Kind::Constrained { inner, .. }
            | Kind::Enum { inner, .. }
            | Kind::Safe { inner }
            | Kind::Default { inner, .. }
            | Kind::Maybe { inner } => Some(inner),
            _ => None,
        }
    }

    /// Merges `entries` into this type's meta.
    pub fn with_meta<K, I>(&self, entries: I) -> Type
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let mut meta = self.meta().clone();
        meta.extend(entries.into_iter().map(|(k, v)| (k.into(), v)));
        Type::from_kind(self.kind().clone(), meta)
    }

    /// This type without its own meta. Children keep theirs.
    pub fn pristine(&self) -> Type {
        Type::from_kind(self.kind().clone(), Meta::new())
    }

    /// This type with meta removed at every level.
    pub fn without_meta(&self) -> Type {
        let kind = match self.kind() {
            Kind::Definition { primitive } => Kind::Definition {
                primitive: *primitive,
            },
            Kind::Constructor { inner, fns } => Kind::Constructor {
                inner: inner.without_meta(),
                fns: fns.clone(),
            },
            Kind::Constrained { inner, rule } => Kind::Constrained {
                inner: inner.without_meta(),
                rule: rule.clone(),
            },
            Kind::Sum { left, right } => Kind::Sum {
                left: left.without_meta(),
                right: right.without_meta(),
            },
            Kind::Enum { inner, mapping } => Kind::Enum {
                inner: inner.without_meta(),
                mapping: mapping.clone(),
            },
            Kind::Safe { inner } => Kind::Safe {
                inner: inner.without_meta(),
            },
            Kind::Default { inner, value } => Kind::Default {
                inner: inner.without_meta(),
                value: value.clone(),
            },
            Kind::Maybe { inner } => Kind::Maybe {
                inner: inner.without_meta(),
            },
            Kind::Schema(schema) => Kind::Schema(schema.map_members(Type::without_meta)),
            Kind::Array { member } => Kind::Array {
                member: member.without_meta(),
            },
            Kind::Map { key, value } => Kind::Map {
                key: key.without_meta(),
                value: value.without_meta(),
            },
        };
        Type::wrap(kind)
    }

    /// Runs `coercion` on input before this type. On a constructor type the
    /// function is appended and runs after the existing ones.
    pub fn constructor(&self, coercion: Coercion) -> Type {
        match self.kind() {
            Kind::Constructor { inner, fns } => {
                let mut fns = fns.clone();
                fns.push(coercion);
                self.with_kind(Kind::Constructor {
                    inner: inner.clone(),
                    fns,
                })
            }
            _ => Type::wrap(Kind::Constructor {
                inner: self.clone(),
                fns: vec![coercion],
            }),
        }
    }

    pub fn constructor_fn<F>(&self, f: F) -> Type
    where
        F: Fn(&Value) -> Result<Value, CoercionError> + Send + Sync + 'static,
    {
        self.constructor(Coercion::new(f))
    }

    /// Adds constraints built from `(predicate, operand)` options.
    pub fn constrained<K, I>(&self, options: I) -> Result<Type, CoercionError>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Ok(self.constrained_by(build_rule(options)?))
    }

    /// Adds `rule`. An existing rule is kept and joined with `And`.
    pub fn constrained_by(&self, rule: Rule) -> Type {
        match self.kind() {
            Kind::Constrained {
                inner,
                rule: existing,
            } => self.with_kind(Kind::Constrained {
                inner: inner.clone(),
                rule: existing.clone().and(rule),
            }),
            Kind::Constructor { inner, fns } => self.with_kind(Kind::Constructor {
                inner: inner.constrained_by(rule),
                fns: fns.clone(),
            }),
            Kind::Safe { inner } => self.with_kind(Kind::Safe {
                inner: inner.constrained_by(rule),
            }),
            Kind::Default { inner, value } => self.with_kind(Kind::Default {
                inner: inner.constrained_by(rule),
                value: value.clone(),
            }),
            Kind::Maybe { inner } => self.with_kind(Kind::Maybe {
                inner: inner.constrained_by(rule),
            }),
            Kind::Enum { inner, mapping } => self.with_kind(Kind::Enum {
                inner: inner.constrained_by(rule),
                mapping: mapping.clone(),
            }),
            Kind::Sum { left, right } if self.is_optional() => self.with_kind(Kind::Sum {
                left: left.clone(),
                right: right.constrained_by(rule),
            }),
            _ => Type::wrap(Kind::Constrained {
                inner: self.clone(),
                rule,
            }),
        }
    }

    /// Sum of `self` and `other`, tried in that order.
    pub fn or(&self, other: &Type) -> Type {
        Type::wrap(Kind::Sum {
            left: self.clone(),
            right: other.clone(),
        })
    }

    /// `strict.nil | self`.
    pub fn optional(&self) -> Type {
        Type::strict(Primitive::Nil).or(self)
    }

    pub fn maybe(&self) -> Type {
        match self.kind() {
            Kind::Maybe { .. } => self.clone(),
            _ => Type::wrap(Kind::Maybe {
                inner: self.clone(),
            }),
        }
    }

    pub fn safe(&self) -> Type {
        match self.kind() {
            Kind::Safe { .. } => self.clone(),
            _ => Type::wrap(Kind::Safe {
                inner: self.clone(),
            }),
        }
    }

    /// Static default. `nil` is only accepted by types that accept `nil`, and
    /// any other value must be valid for this type.
    pub fn default(&self, value: Value) -> Result<Type, CoercionError> {
        if value.is_null() {
            if !self.is_optional() && self.primitive() != Some(Primitive::Nil) {
                return Err(CoercionError::Argument(format!(
                    "nil cannot be used as a default of {}, use an optional type",
                    self.name()
                )));
            }
        } else if let Outcome::Failure(failure) = self.try_apply(&value) {
            return Err(CoercionError::Argument(format!(
                "default value {value} is invalid for {}: {}",
                self.name(),
                failure.error
            )));
        }
        Ok(Type::wrap(Kind::Default {
            inner: self.clone(),
            value: DefaultValue::Static(value),
        }))
    }

    /// Default produced by `generator` on every miss.
    pub fn default_with(&self, generator: Generator) -> Type {
        Type::wrap(Kind::Default {
            inner: self.clone(),
            value: DefaultValue::Generator(generator),
        })
    }

    /// Restricts this type to `values`.
    pub fn enumeration<I>(&self, values: I) -> Result<Type, CoercionError>
    where
        I: IntoIterator<Item = Value>,
    {
        self.enumeration_mapping(values.into_iter().map(|v| (v.clone(), v)).collect())
    }

    /// Restricts this type to the mapping keys. An input equal to a mapping
    /// value is replaced by its key.
    pub fn enumeration_mapping(&self, mapping: Vec<(Value, Value)>) -> Result<Type, CoercionError> {
        if mapping.is_empty() {
            return Err(CoercionError::Argument(
                "an enum needs at least one value".to_string(),
            ));
        }
        let values: Vec<Value> = mapping.iter().map(|(k, _)| k.clone()).collect();
        let inner = self.constrained([("included_in", Value::from(values))])?;
        Ok(Type::wrap(Kind::Enum { inner, mapping }))
    }

    /// Enum values in declaration order.
    pub fn values(&self) -> Vec<Value> {
        match self.kind() {
            Kind::Enum { mapping, .. } => mapping.iter().map(|(k, _)| k.clone()).collect(),
            _ => vec![],
        }
    }

    // Rebuilds the constructor / constrained / safe / default wrappers around
    // `f(core)`.
    fn rebuild_core(
        &self,
        f: &dyn Fn(&Type) -> Result<Type, CoercionError>,
    ) -> Result<Type, CoercionError> {
        Ok(match self.kind() {
            Kind::Constructor { inner, fns } => self.with_kind(Kind::Constructor {
                inner: inner.rebuild_core(f)?,
                fns: fns.clone(),
            }),
            Kind::Constrained { inner, rule } => self.with_kind(Kind::Constrained {
                inner: inner.rebuild_core(f)?,
                rule: rule.clone(),
            }),
            Kind::Safe { inner } => self.with_kind(Kind::Safe {
                inner: inner.rebuild_core(f)?,
            }),
            Kind::Default { inner, value } => self.with_kind(Kind::Default {
                inner: inner.rebuild_core(f)?,
                value: value.clone(),
            }),
            _ => f(self)?,
        })
    }

    /// Array of `member`.
    pub fn of(&self, member: Type) -> Result<Type, CoercionError> {
        self.rebuild_core(&|core| match core.kind() {
            Kind::Definition {
                primitive: Primitive::Array,
            }
            | Kind::Array { .. } => Ok(core.with_kind(Kind::Array {
                member: member.clone(),
            })),
            _ => Err(CoercionError::Argument(format!(
                "{} is not an array type",
                core.name()
            ))),
        })
    }

    /// Hash schema with `policy`.
    pub fn schema_with<K, I>(&self, policy: Policy, members: I) -> Result<Type, CoercionError>
    where
        K: Into<Value>,
        I: IntoIterator<Item = (K, Type)>,
    {
        let schema = Schema::new(
            policy,
            members.into_iter().map(|(k, t)| (k.into(), t)).collect(),
        );
        self.rebuild_core(&|core| match core.kind() {
            Kind::Definition {
                primitive: Primitive::Hash,
            }
            | Kind::Schema(_) => Ok(core.with_kind(Kind::Schema(schema.clone()))),
            _ => Err(CoercionError::Argument(format!(
                "{} is not a hash type",
                core.name()
            ))),
        })
    }

    pub fn schema<K, I>(&self, members: I) -> Result<Type, CoercionError>
    where
        K: Into<Value>,
        I: IntoIterator<Item = (K, Type)>,
    {
        self.schema_with(Policy::Schema, members)
    }

    pub fn weak<K, I>(&self, members: I) -> Result<Type, CoercionError>
    where
        K: Into<Value>,
        I: IntoIterator<Item = (K, Type)>,
    {
        self.schema_with(Policy::Weak, members)
    }

    pub fn permissive<K, I>(&self, members: I) -> Result<Type, CoercionError>
    where
        K: Into<Value>,
        I: IntoIterator<Item = (K, Type)>,
    {
        self.schema_with(Policy::Permissive, members)
    }

    pub fn strict_schema<K, I>(&self, members: I) -> Result<Type, CoercionError>
    where
        K: Into<Value>,
        I: IntoIterator<Item = (K, Type)>,
    {
        self.schema_with(Policy::Strict, members)
    }

    pub fn strict_with_defaults<K, I>(&self, members: I) -> Result<Type, CoercionError>
    where
        K: Into<Value>,
        I: IntoIterator<Item = (K, Type)>,
    {
        self.schema_with(Policy::StrictWithDefaults, members)
    }

    pub fn symbolized<K, I>(&self, members: I) -> Result<Type, CoercionError>
    where
        K: Into<Value>,
        I: IntoIterator<Item = (K, Type)>,
    {
        self.schema_with(Policy::Symbolized, members)
    }

    /// Replaces the key transform of a hash schema.
    pub fn with_key_transform(&self, transform: KeyTransform) -> Result<Type, CoercionError> {
        self.rebuild_core(&|core| match core.kind() {
            Kind::Schema(schema) => {
                Ok(core.with_kind(Kind::Schema(schema.with_key_transform(transform))))
            }
            _ => Err(CoercionError::Argument(format!(
                "{} is not a hash schema",
                core.name()
            ))),
        })
    }

    /// Map from `key` to `value` entries.
    pub fn map(&self, key: Type, value: Type) -> Result<Type, CoercionError> {
        self.rebuild_core(&|core| match core.kind() {
            Kind::Definition {
                primitive: Primitive::Hash,
            }
            | Kind::Map { .. } => Ok(core.with_kind(Kind::Map {
                key: key.clone(),
                value: value.clone(),
            })),
            _ => Err(CoercionError::Argument(format!(
                "{} is not a hash type",
                core.name()
            ))),
        })
    }

    pub fn with_key_type(&self, key: Type) -> Result<Type, CoercionError> {
        self.rebuild_core(&|core| match core.kind() {
            Kind::Map { value, .. } => Ok(core.with_kind(Kind::Map {
                key: key.clone(),
                value: value.clone(),
            })),
            _ => Err(CoercionError::Argument(format!(
                "{} is not a map type",
                core.name()
            ))),
        })
    }

    pub fn with_value_type(&self, value: Type) -> Result<Type, CoercionError> {
        self.rebuild_core(&|core| match core.kind() {
            Kind::Map { key, .. } => Ok(core.with_kind(Kind::Map {
                key: key.clone(),
                value: value.clone(),
            })),
            _ => Err(CoercionError::Argument(format!(
                "{} is not a map type",
                core.name()
            ))),
        })
    }

    /// Wraps `value` as a success, rejecting values this type does not accept.
    pub fn success(&self, value: Value) -> Result<Outcome, CoercionError> {
        if self.is_valid(&value) {
            Ok(Outcome::Success(value))
        } else {
            Err(CoercionError::Argument(format!(
                "Invalid success value '{value}' for {}",
                self.name()
            )))
        }
    }

    pub fn failure(&self, input: &Value, error: CoercionError) -> Outcome {
        Outcome::failure(input, error)
    }
}
