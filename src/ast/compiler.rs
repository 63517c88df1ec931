// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use log::warn;

use crate::ast::{ArgNode, DefaultNode, MemberNode, Node, RuleNode, SchemaOptions};
use crate::error::CoercionError;
use crate::logic::{Operand, Pattern, Predicate, PredicateName, Rule};
use crate::registry::{self, instances, RegistryError, TypeRegistry};
use crate::types::{DefaultValue, Kind, Meta, Schema, Type};
use crate::value::Value;

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("unsupported node: {0}")]
    UnsupportedNode(String),

    #[error("unknown function reference {0}")]
    UnknownFunction(String),

    #[error("malformed node: {0}")]
    Malformed(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Coercion(#[from] CoercionError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Rebuilds types from [`Node`] trees, resolving nominal definitions and the
/// params/json families through a type registry.
pub struct Compiler<'a> {
    registry: &'a TypeRegistry,
}

/// Compiles `node` against the global registry.
pub fn compile(node: &Node) -> Result<Type, CompileError> {
    Compiler::new(&instances::TYPES).compile(node)
}

fn with_meta(t: Type, meta: &Meta) -> Type {
    if meta.is_empty() {
        t
    } else {
        t.with_meta(meta.clone())
    }
}

impl<'a> Compiler<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Compiler<'a> {
        Compiler { registry }
    }

    pub fn compile(&self, node: &Node) -> Result<Type, CompileError> {
        let built = |kind: Kind, meta: &Meta| Type::from_kind(kind, meta.clone());
        Ok(match node {
            Node::Definition { primitive, meta } => {
                let nominal = self.registry.definition(*primitive).ok().filter(|t| {
                    matches!(t.kind(), Kind::Definition { primitive: p } if p == primitive)
                });
                let t = nominal.unwrap_or_else(|| Type::definition(*primitive));
                with_meta(t, meta)
            }
            Node::Constructor { inner, fns, meta } => built(
                Kind::Constructor {
                    inner: self.compile(inner)?,
                    fns: fns
                        .iter()
                        .map(|name| {
                            registry::coercion(name).ok_or_else(|| {
                                warn!("no coercion registered as {name}");
                                CompileError::UnknownFunction(name.clone())
                            })
                        })
                        .collect::<Result<_, _>>()?,
                },
                meta,
            ),
            Node::Constrained { inner, rule, meta } => built(
                Kind::Constrained {
                    inner: self.compile(inner)?,
                    rule: self.rule(rule)?,
                },
                meta,
            ),
            Node::Sum { left, right, meta } => built(
                Kind::Sum {
                    left: self.compile(left)?,
                    right: self.compile(right)?,
                },
                meta,
            ),
            Node::Enum {
                inner,
                mapping,
                meta,
            } => built(
                Kind::Enum {
                    inner: self.compile(inner)?,
                    mapping: mapping.clone(),
                },
                meta,
            ),
            Node::Safe { inner, meta } => built(
                Kind::Safe {
                    inner: self.compile(inner)?,
                },
                meta,
            ),
            Node::Default {
                inner,
                default,
                meta,
            } => {
                let value = match default {
                    DefaultNode::Value(v) => DefaultValue::Static(v.clone()),
                    DefaultNode::Generator(name) => {
                        DefaultValue::Generator(registry::generator(name).ok_or_else(|| {
                            warn!("no generator registered as {name}");
                            CompileError::UnknownFunction(name.clone())
                        })?)
                    }
                };
                built(
                    Kind::Default {
                        inner: self.compile(inner)?,
                        value,
                    },
                    meta,
                )
            }
            Node::Maybe { inner, meta } => built(
                Kind::Maybe {
                    inner: self.compile(inner)?,
                },
                meta,
            ),
            Node::HashSchema {
                members,
                options,
                meta,
            } => built(Kind::Schema(self.schema(members, options)?), meta),
            Node::Array { member, meta } => built(
                Kind::Array {
                    member: self.compile(member)?,
                },
                meta,
            ),
            Node::Map { key, value, meta } => built(
                Kind::Map {
                    key: self.compile(key)?,
                    value: self.compile(value)?,
                },
                meta,
            ),
            Node::ParamsHash {
                members,
                options,
                meta,
            } => self.family_schema("params.hash", members, options, meta)?,
            Node::JsonHash {
                members,
                options,
                meta,
            } => self.family_schema("json.hash", members, options, meta)?,
            Node::ParamsArray { member, meta } => {
                self.family_array("params.array", member, meta)?
            }
            Node::JsonArray { member, meta } => self.family_array("json.array", member, meta)?,
        })
    }

    fn family_schema(
        &self,
        identifier: &str,
        members: &[MemberNode],
        options: &SchemaOptions,
        meta: &Meta,
    ) -> Result<Type, CompileError> {
        let schema = self.schema(members, options)?;
        let t = self
            .registry
            .lookup(identifier)?
            .schema_with(schema.policy(), schema.members().to_vec())?
            .with_key_transform(schema.key_transform())?;
        Ok(with_meta(t, meta))
    }

    fn family_array(
        &self,
        identifier: &str,
        member: &Node,
        meta: &Meta,
    ) -> Result<Type, CompileError> {
        let t = self
            .registry
            .lookup(identifier)?
            .of(self.compile(member)?)?;
        Ok(with_meta(t, meta))
    }

    fn schema(
        &self,
        members: &[MemberNode],
        options: &SchemaOptions,
    ) -> Result<Schema, CompileError> {
        let members = members
            .iter()
            .map(|m| Ok((m.name.clone(), self.compile(&m.node)?)))
            .collect::<Result<Vec<_>, CompileError>>()?;
        Ok(Schema::new(options.policy, members).with_key_transform(options.key_transform))
    }

    fn rule(&self, node: &RuleNode) -> Result<Rule, CompileError> {
        Ok(match node {
            RuleNode::Predicate { name, args } => {
                let name = PredicateName::parse(name)?;
                let args = args
                    .iter()
                    .map(|arg| {
                        Ok(match arg {
                            ArgNode::Type(p) => Operand::Value(Value::Class(*p)),
                            ArgNode::Pattern(source) => Operand::Pattern(Pattern::new(source)?),
                            ArgNode::Value(v) => Operand::Value(v.clone()),
                        })
                    })
                    .collect::<Result<Vec<_>, CoercionError>>()?;
                Rule::Predicate(Predicate::new(name, args)?)
            }
            RuleNode::And { left, right } => self.rule(left)?.and(self.rule(right)?),
            RuleNode::Or { left, right } => self.rule(left)?.or(self.rule(right)?),
        })
    }
}
