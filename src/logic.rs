// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Constraint rules.
//!
//! A [`Rule`] is a tree of predicates joined by `And`/`Or`. Rules are built from
//! declarative options (`[("size", Value::range(3, 12))]`) by [`build_rule`] and
//! evaluated against an already coerced value.

use core::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::CoercionError;
use crate::primitive::Primitive;
use crate::value::Value;

mod predicates;

pub use predicates::PredicateName;

#[cfg(test)]
mod tests;

/// A compiled `format?` pattern. Compared by its source text.
#[derive(Debug, Clone)]
pub struct Pattern(Arc<Regex>);

impl Pattern {
    pub fn new(source: &str) -> Result<Pattern, CoercionError> {
        Regex::new(source)
            .map(|r| Pattern(Arc::new(r)))
            .map_err(|e| CoercionError::Argument(format!("invalid format pattern {source:?}: {e}")))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.as_str())
    }
}

/// A predicate operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(Value),
    Pattern(Pattern),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Value(v) => write!(f, "{v}"),
            Operand::Pattern(p) => write!(f, "{p}"),
        }
    }
}

/// A named predicate with its curried operands. The evaluated value is the
/// implicit last argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    name: PredicateName,
    args: Vec<Operand>,
}

impl Predicate {
    /// Builds a predicate, checking operand count and shape.
    pub fn new(name: PredicateName, args: Vec<Operand>) -> Result<Predicate, CoercionError> {
        name.check_operands(&args)?;
        Ok(Predicate { name, args })
    }

    pub fn name(&self) -> PredicateName {
        self.name
    }

    pub fn args(&self) -> &[Operand] {
        &self.args
    }

    pub fn test(&self, input: &Value) -> bool {
        self.name.test(&self.args, input)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Predicate(Predicate),
    And(Box<Rule>, Box<Rule>),
    Or(Box<Rule>, Box<Rule>),
}

/// Why a rule rejected a value.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleFailure {
    Predicate {
        name: PredicateName,
        args: Vec<Operand>,
        input: Value,
    },
    Or(Box<RuleFailure>, Box<RuleFailure>),
}

impl fmt::Display for RuleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleFailure::Predicate { name, args, input } => {
                write!(f, "{}(", name.as_str())?;
                for arg in args {
                    write!(f, "{arg}, ")?;
                }
                write!(f, "{input})")
            }
            RuleFailure::Or(left, right) => write!(f, "{left} OR {right}"),
        }
    }
}

impl Rule {
    /// `type?(primitive)`.
    pub fn type_of(primitive: Primitive) -> Rule {
        Rule::Predicate(Predicate {
            name: PredicateName::Type,
            args: vec![Operand::Value(Value::Class(primitive))],
        })
    }

    pub fn and(self, other: Rule) -> Rule {
        Rule::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Rule) -> Rule {
        Rule::Or(Box::new(self), Box::new(other))
    }

    /// Evaluates the rule. `And` stops at the first failing side.
    pub fn evaluate(&self, input: &Value) -> Result<(), RuleFailure> {
        match self {
            Rule::Predicate(p) if p.test(input) => Ok(()),
            Rule::Predicate(p) => Err(RuleFailure::Predicate {
                name: p.name,
                args: p.args.clone(),
                input: input.clone(),
            }),
            Rule::And(left, right) => {
                left.evaluate(input)?;
                right.evaluate(input)
            }
            Rule::Or(left, right) => match left.evaluate(input) {
                Ok(()) => Ok(()),
                Err(l) => match right.evaluate(input) {
                    Ok(()) => Ok(()),
                    Err(r) => Err(RuleFailure::Or(Box::new(l), Box::new(r))),
                },
            },
        }
    }

    pub fn is_success(&self, input: &Value) -> bool {
        self.evaluate(input).is_ok()
    }
}

/// Builds a rule from `(predicate name, operand)` options, conjoined left to
/// right. Unary predicates (`filled`, `nil`, ...) take `true` as operand.
pub fn build_rule<K, I>(options: I) -> Result<Rule, CoercionError>
where
    K: AsRef<str>,
    I: IntoIterator<Item = (K, Value)>,
{
    let mut rule: Option<Rule> = None;
    for (name, operand) in options {
        let name = PredicateName::parse(name.as_ref())?;
        let predicate = Rule::Predicate(Predicate::new(name, name.operands_from(operand)?)?);
        rule = Some(match rule {
            Some(existing) => existing.and(predicate),
            None => predicate,
        });
    }
    rule.ok_or_else(|| CoercionError::Argument("constraint options must not be empty".to_string()))
}
