// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Portable tree form of a [`Type`].
//!
//! Every node is serialized as `{"tag": ..., "payload": {...}}`. Tags and
//! payload shapes are an interchange format: `compile(&t.to_ast(true))`
//! rebuilds a type equal to `t`, meta included. Values inside nodes use the
//! tagged [`literal`] encoding so they survive a trip through JSON.

use serde::{Deserialize, Serialize};

use crate::logic::{Operand, Rule};
use crate::primitive::Primitive;
use crate::registry;
use crate::types::{DefaultValue, Kind, KeyTransform, Meta, Policy, Schema, Type};
use crate::value::Value;

mod compiler;
pub mod literal;

pub use compiler::{compile, CompileError, Compiler};


const NODE_TAGS: &[&str] = &[
    "definition",
    "constructor",
    "constrained",
    "sum",
    "enum",
    "safe",
    "default",
    "maybe",
    "hash_schema",
    "array",
    "map",
    "params_hash",
    "params_array",
    "json_hash",
    "json_array",
    "member",
    "predicate",
    "and",
    "or",
];

/// Predicate operand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgNode {
    Type(Primitive),
    Pattern(String),
    Value(#[serde(with = "literal::value")] Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag", content = "payload", rename_all = "snake_case")]
pub enum RuleNode {
    Predicate { name: String, args: Vec<ArgNode> },
    And { left: Box<RuleNode>, right: Box<RuleNode> },
    Or { left: Box<RuleNode>, right: Box<RuleNode> },
}

/// A hash schema member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag", rename = "member")]
pub struct MemberNode {
    #[serde(with = "literal::value")]
    pub name: Value,
    #[serde(rename = "type")]
    pub node: Node,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultNode {
    Value(#[serde(with = "literal::value")] Value),
    /// Reference of a registered generator.
    Generator(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaOptions {
    pub policy: Policy,
    pub key_transform: KeyTransform,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag", content = "payload", rename_all = "snake_case")]
pub enum Node {
    Definition {
        primitive: Primitive,
        #[serde(default, skip_serializing_if = "Meta::is_empty", with = "literal::meta")]
        meta: Meta,
    },
    Constructor {
        inner: Box<Node>,
        /// Coercion references, in call order.
        fns: Vec<String>,
        #[serde(default, skip_serializing_if = "Meta::is_empty", with = "literal::meta")]
        meta: Meta,
    },
    Constrained {
        inner: Box<Node>,
        rule: RuleNode,
        #[serde(default, skip_serializing_if = "Meta::is_empty", with = "literal::meta")]
        meta: Meta,
    },
    Sum {
        left: Box<Node>,
        right: Box<Node>,
        #[serde(default, skip_serializing_if = "Meta::is_empty", with = "literal::meta")]
        meta: Meta,
    },
    Enum {
        inner: Box<Node>,
        #[serde(with = "literal::pairs")]
        mapping: Vec<(Value, Value)>,
        #[serde(default, skip_serializing_if = "Meta::is_empty", with = "literal::meta")]
        meta: Meta,
    },
    Safe {
        inner: Box<Node>,
        #[serde(default, skip_serializing_if = "Meta::is_empty", with = "literal::meta")]
        meta: Meta,
    },
    Default {
        inner: Box<Node>,
        default: DefaultNode,
        #[serde(default, skip_serializing_if = "Meta::is_empty", with = "literal::meta")]
        meta: Meta,
    },
    Maybe {
        inner: Box<Node>,
        #[serde(default, skip_serializing_if = "Meta::is_empty", with = "literal::meta")]
        meta: Meta,
    },
    HashSchema {
        members: Vec<MemberNode>,
        options: SchemaOptions,
        #[serde(default, skip_serializing_if = "Meta::is_empty", with = "literal::meta")]
        meta: Meta,
    },
    Array {
        member: Box<Node>,
        #[serde(default, skip_serializing_if = "Meta::is_empty", with = "literal::meta")]
        meta: Meta,
    },
    Map {
        key: Box<Node>,
        value: Box<Node>,
        #[serde(default, skip_serializing_if = "Meta::is_empty", with = "literal::meta")]
        meta: Meta,
    },
    /// `params.hash` schema.
    ParamsHash {
        members: Vec<MemberNode>,
        options: SchemaOptions,
        #[serde(default, skip_serializing_if = "Meta::is_empty", with = "literal::meta")]
        meta: Meta,
    },
    /// `params.array` of a member.
    ParamsArray {
        member: Box<Node>,
        #[serde(default, skip_serializing_if = "Meta::is_empty", with = "literal::meta")]
        meta: Meta,
    },
    /// `json.hash` schema.
    JsonHash {
        members: Vec<MemberNode>,
        options: SchemaOptions,
        #[serde(default, skip_serializing_if = "Meta::is_empty", with = "literal::meta")]
        meta: Meta,
    },
    /// `json.array` of a member.
    JsonArray {
        member: Box<Node>,
        #[serde(default, skip_serializing_if = "Meta::is_empty", with = "literal::meta")]
        meta: Meta,
    },
}

impl Node {
    pub fn tag(&self) -> &'static str {
        match self {
            Node::Definition { .. } => "definition",
            Node::Constructor { .. } => "constructor",
            Node::Constrained { .. } => "constrained",
            Node::Sum { .. } => "sum",
            Node::Enum { .. } => "enum",
            Node::Safe { .. } => "safe",
            Node::Default { .. } => "default",
            Node::Maybe { .. } => "maybe",
            Node::HashSchema { .. } => "hash_schema",
            Node::Array { .. } => "array",
            Node::Map { .. } => "map",
            Node::ParamsHash { .. } => "params_hash",
            Node::ParamsArray { .. } => "params_array",
            Node::JsonHash { .. } => "json_hash",
            Node::JsonArray { .. } => "json_array",
        }
    }

    pub fn meta(&self) -> &Meta {
        match self {
            Node::Definition { meta, .. }
            | Node::Constructor { meta, .. }
            | Node::Constrained { meta, .. }
            | Node::Sum { meta, .. }
            | Node::Enum { meta, .. }
            | Node::Safe { meta, .. }
            | Node::Default { meta, .. }
            | Node::Maybe { meta, .. }
            | Node::HashSchema { meta, .. }
            | Node::Array { meta, .. }
            | Node::Map { meta, .. }
            | Node::ParamsHash { meta, .. }
            | Node::ParamsArray { meta, .. }
            | Node::JsonHash { meta, .. }
            | Node::JsonArray { meta, .. } => meta,
        }
    }

    pub fn to_json_str(&self) -> Result<String, CompileError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(json: &str) -> Result<Node, CompileError> {
        let tree: serde_json::Value = serde_json::from_str(json)?;
        Node::from_tree(tree)
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(yaml: &str) -> Result<Node, CompileError> {
        let tree: serde_json::Value =
            serde_yaml::from_str(yaml).map_err(|e| CompileError::Malformed(e.to_string()))?;
        Node::from_tree(tree)
    }

    fn from_tree(tree: serde_json::Value) -> Result<Node, CompileError> {
        match serde_json::from_value(tree.clone()) {
            Ok(node) => Ok(node),
            Err(e) => match unknown_tag(&tree) {
                Some(tag) => Err(CompileError::UnsupportedNode(tag)),
                None => Err(CompileError::Json(e)),
            },
        }
    }
}

// First `tag` in the tree that names no node.
fn unknown_tag(tree: &serde_json::Value) -> Option<String> {
    match tree {
        serde_json::Value::Object(fields) => {
            if let Some(serde_json::Value::String(tag)) = fields.get("tag") {
                if !NODE_TAGS.contains(&tag.as_str()) {
                    return Some(tag.clone());
                }
            }
            fields.values().find_map(unknown_tag)
        }
        serde_json::Value::Array(items) => items.iter().find_map(unknown_tag),
        _ => None,
    }
}

fn rule_node(rule: &Rule) -> RuleNode {
    match rule {
        Rule::Predicate(p) => RuleNode::Predicate {
            name: p.name().as_str().to_string(),
            args: p
                .args()
                .iter()
                .map(|arg| match arg {
                    Operand::Value(Value::Class(primitive)) => ArgNode::Type(*primitive),
                    Operand::Value(v) => ArgNode::Value(v.clone()),
                    Operand::Pattern(p) => ArgNode::Pattern(p.as_str().to_string()),
                })
                .collect(),
        },
        Rule::And(l, r) => RuleNode::And {
            left: Box::new(rule_node(l)),
            right: Box::new(rule_node(r)),
        },
        Rule::Or(l, r) => RuleNode::Or {
            left: Box::new(rule_node(l)),
            right: Box::new(rule_node(r)),
        },
    }
}

fn member_nodes(schema: &Schema, include_meta: bool) -> Vec<MemberNode> {
    schema
        .members()
        .iter()
        .map(|(name, t)| MemberNode {
            name: name.clone(),
            node: t.to_ast(include_meta),
        })
        .collect()
}

fn options(schema: &Schema) -> SchemaOptions {
    SchemaOptions {
        policy: schema.policy(),
        key_transform: schema.key_transform(),
    }
}

impl Type {
    /// Decomposes this type into a [`Node`] tree.
    ///
    /// Closures used as constructors or generators are registered under their
    /// `fn_<address>` reference so the tree compiles back in this process.
    pub fn to_ast(&self, include_meta: bool) -> Node {
        let meta = if include_meta {
            self.meta().clone()
        } else {
            Meta::new()
        };
        if let Some(node) = self.specialized_ast(include_meta, &meta) {
            return node;
        }
        let boxed = |t: &Type| Box::new(t.to_ast(include_meta));
        match self.kind() {
            Kind::Definition { primitive } => Node::Definition {
                primitive: *primitive,
                meta,
            },
            Kind::Constructor { inner, fns } => Node::Constructor {
                inner: boxed(inner),
                fns: fns
                    .iter()
                    .map(|f| registry::register_coercion(f).to_string())
                    .collect(),
                meta,
            },
            Kind::Constrained { inner, rule } => Node::Constrained {
                inner: boxed(inner),
                rule: rule_node(rule),
                meta,
            },
            Kind::Sum { left, right } => Node::Sum {
                left: boxed(left),
                right: boxed(right),
                meta,
            },
            Kind::Enum { inner, mapping } => Node::Enum {
                inner: boxed(inner),
                mapping: mapping.clone(),
                meta,
            },
            Kind::Safe { inner } => Node::Safe {
                inner: boxed(inner),
                meta,
            },
            Kind::Default { inner, value } => Node::Default {
                inner: boxed(inner),
                default: match value {
                    DefaultValue::Static(v) => DefaultNode::Value(v.clone()),
                    DefaultValue::Generator(g) => {
                        DefaultNode::Generator(registry::register_generator(g).to_string())
                    }
                },
                meta,
            },
            Kind::Maybe { inner } => Node::Maybe {
                inner: boxed(inner),
                meta,
            },
            Kind::Schema(schema) => Node::HashSchema {
                members: member_nodes(schema, include_meta),
                options: options(schema),
                meta,
            },
            Kind::Array { member } => Node::Array {
                member: boxed(member),
                meta,
            },
            Kind::Map { key, value } => Node::Map {
                key: boxed(key),
                value: boxed(value),
                meta,
            },
        }
    }

    // The params/json hash and array tags. Only used when the wrapped nodes
    // carry no meta of their own, which the tags cannot represent.
    fn specialized_ast(&self, include_meta: bool, meta: &Meta) -> Option<Node> {
        let Kind::Safe { inner } = self.kind() else {
            return None;
        };
        let bare = |t: &Type| !include_meta || t.meta().is_empty();
        if !bare(inner) {
            return None;
        }
        let meta = meta.clone();
        match inner.kind() {
            Kind::Constructor { inner: core, fns } if fns.len() == 1 && bare(core) => {
                match (fns[0].name(), core.kind()) {
                    (Some("params.hash"), Kind::Schema(schema)) => Some(Node::ParamsHash {
                        members: member_nodes(schema, include_meta),
                        options: options(schema),
                        meta,
                    }),
                    (Some("params.array"), Kind::Array { member }) => Some(Node::ParamsArray {
                        member: Box::new(member.to_ast(include_meta)),
                        meta,
                    }),
                    _ => None,
                }
            }
            Kind::Schema(schema) => Some(Node::JsonHash {
                members: member_nodes(schema, include_meta),
                options: options(schema),
                meta,
            }),
            Kind::Array { member } => Some(Node::JsonArray {
                member: Box::new(member.to_ast(include_meta)),
                meta,
            }),
            _ => None,
        }
    }
}
