// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::cmp::Ordering;

use crate::error::CoercionError;
use crate::logic::{Operand, Pattern};
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateName {
    Type,
    Eql,
    Is,
    Size,
    MinSize,
    MaxSize,
    Gt,
    Gteq,
    Lt,
    Lteq,
    IncludedIn,
    ExcludedFrom,
    Includes,
    Excludes,
    Format,
    Filled,
    Empty,
    Nil,
    True,
    False,
    Odd,
    Even,
}

const ALL: [PredicateName; 22] = [
    PredicateName::Type,
    PredicateName::Eql,
    PredicateName::Is,
    PredicateName::Size,
    PredicateName::MinSize,
    PredicateName::MaxSize,
    PredicateName::Gt,
    PredicateName::Gteq,
    PredicateName::Lt,
    PredicateName::Lteq,
    PredicateName::IncludedIn,
    PredicateName::ExcludedFrom,
    PredicateName::Includes,
    PredicateName::Excludes,
    PredicateName::Format,
    PredicateName::Filled,
    PredicateName::Empty,
    PredicateName::Nil,
    PredicateName::True,
    PredicateName::False,
    PredicateName::Odd,
    PredicateName::Even,
];

impl PredicateName {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredicateName::Type => "type?",
            PredicateName::Eql => "eql?",
            PredicateName::Is => "is?",
            PredicateName::Size => "size?",
            PredicateName::MinSize => "min_size?",
            PredicateName::MaxSize => "max_size?",
            PredicateName::Gt => "gt?",
            PredicateName::Gteq => "gteq?",
            PredicateName::Lt => "lt?",
            PredicateName::Lteq => "lteq?",
            PredicateName::IncludedIn => "included_in?",
            PredicateName::ExcludedFrom => "excluded_from?",
            PredicateName::Includes => "includes?",
            PredicateName::Excludes => "excludes?",
            PredicateName::Format => "format?",
            PredicateName::Filled => "filled?",
            PredicateName::Empty => "empty?",
            PredicateName::Nil => "nil?",
            PredicateName::True => "true?",
            PredicateName::False => "false?",
            PredicateName::Odd => "odd?",
            PredicateName::Even => "even?",
        }
    }

    /// Accepts both `size` and `size?`.
    pub fn parse(name: &str) -> Result<PredicateName, CoercionError> {
        let bare = name.strip_suffix('?').unwrap_or(name);
        ALL.iter()
            .copied()
            .find(|p| p.as_str().strip_suffix('?') == Some(bare))
            .ok_or_else(|| CoercionError::Argument(format!("unknown predicate {name:?}")))
    }

    fn arity(&self) -> usize {
        match self {
            PredicateName::Filled
            | PredicateName::Empty
            | PredicateName::Nil
            | PredicateName::True
            | PredicateName::False
            | PredicateName::Odd
            | PredicateName::Even => 0,
            _ => 1,
        }
    }

    /// Turns a constraint option value into operands.
    pub(crate) fn operands_from(&self, option: Value) -> Result<Vec<Operand>, CoercionError> {
        match (self, option) {
            (p, Value::Bool(true)) if p.arity() == 0 => Ok(vec![]),
            (p, other) if p.arity() == 0 => Err(CoercionError::Argument(format!(
                "{} takes no operand, got {other}",
                p.as_str()
            ))),
            (PredicateName::Format, Value::String(source)) => {
                Ok(vec![Operand::Pattern(Pattern::new(&source)?)])
            }
            (_, other) => Ok(vec![Operand::Value(other)]),
        }
    }

    pub(crate) fn check_operands(&self, args: &[Operand]) -> Result<(), CoercionError> {
        if args.len() != self.arity() {
            return Err(CoercionError::Argument(format!(
                "{} expects {} operand(s), got {}",
                self.as_str(),
                self.arity(),
                args.len()
            )));
        }
        let shape_ok = match (self, args.first()) {
            (_, None) => true,
            (PredicateName::Type, Some(Operand::Value(Value::Class(_)))) => true,
            (PredicateName::Format, Some(Operand::Pattern(_))) => true,
            (PredicateName::Size, Some(Operand::Value(Value::Number(_) | Value::Range(..)))) => {
                true
            }
            (
                PredicateName::MinSize
                | PredicateName::MaxSize
                | PredicateName::Gt
                | PredicateName::Gteq
                | PredicateName::Lt
                | PredicateName::Lteq,
                Some(Operand::Value(Value::Number(_))),
            ) => true,
            (
                PredicateName::IncludedIn | PredicateName::ExcludedFrom,
                Some(Operand::Value(Value::Array(_) | Value::Set(_) | Value::Range(..))),
            ) => true,
            (
                PredicateName::Eql
                | PredicateName::Is
                | PredicateName::Includes
                | PredicateName::Excludes,
                Some(Operand::Value(_)),
            ) => true,
            _ => false,
        };
        if shape_ok {
            Ok(())
        } else {
            Err(CoercionError::Argument(format!(
                "invalid operand for {}",
                self.as_str()
            )))
        }
    }

    pub(crate) fn test(&self, args: &[Operand], input: &Value) -> bool {
        let operand = match args.first() {
            Some(Operand::Value(v)) => Some(v),
            _ => None,
        };
        match (self, operand) {
            (PredicateName::Type, Some(Value::Class(p))) => p.is_instance(input),
            (PredicateName::Eql | PredicateName::Is, Some(expected)) => expected == input,
            (PredicateName::Size, Some(Value::Number(n))) => {
                size_of(input).is_some_and(|s| compare_size(s, n) == Some(Ordering::Equal))
            }
            (PredicateName::Size, Some(Value::Range(start, end))) => size_of(input)
                .is_some_and(|s| {
                    compare_size(s, start) != Some(Ordering::Less)
                        && compare_size(s, end) != Some(Ordering::Greater)
                }),
            (PredicateName::MinSize, Some(Value::Number(n))) => {
                size_of(input).is_some_and(|s| compare_size(s, n) != Some(Ordering::Less))
            }
            (PredicateName::MaxSize, Some(Value::Number(n))) => {
                size_of(input).is_some_and(|s| compare_size(s, n) != Some(Ordering::Greater))
            }
            (PredicateName::Gt, Some(Value::Number(n))) => {
                compare_number(input, n) == Some(Ordering::Greater)
            }
            (PredicateName::Gteq, Some(Value::Number(n))) => matches!(
                compare_number(input, n),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            (PredicateName::Lt, Some(Value::Number(n))) => {
                compare_number(input, n) == Some(Ordering::Less)
            }
            (PredicateName::Lteq, Some(Value::Number(n))) => matches!(
                compare_number(input, n),
                Some(Ordering::Less | Ordering::Equal)
            ),
            (PredicateName::IncludedIn, Some(list)) => contains(list, input),
            (PredicateName::ExcludedFrom, Some(list)) => !contains(list, input),
            (PredicateName::Includes, Some(element)) => contains(input, element),
            (PredicateName::Excludes, Some(element)) => !contains(input, element),
            (PredicateName::Format, _) => match (args.first(), input) {
                (Some(Operand::Pattern(p)), Value::String(s)) => p.is_match(s),
                _ => false,
            },
            (PredicateName::Filled, _) => !is_empty(input),
            (PredicateName::Empty, _) => is_empty(input),
            (PredicateName::Nil, _) => input.is_null(),
            (PredicateName::True, _) => matches!(input, Value::Bool(true)),
            (PredicateName::False, _) => matches!(input, Value::Bool(false)),
            (PredicateName::Odd, _) => matches!(input, Value::Number(n) if n.is_odd()),
            (PredicateName::Even, _) => matches!(input, Value::Number(n) if n.is_even()),
            _ => false,
        }
    }
}

fn size_of(input: &Value) -> Option<usize> {
    match input {
        Value::Symbol(_) => None,
        _ => input.size(),
    }
}

fn compare_size(size: usize, bound: &crate::number::Number) -> Option<Ordering> {
    Some(crate::number::Number::from(size).cmp_value(bound))
}

fn compare_number(input: &Value, bound: &crate::number::Number) -> Option<Ordering> {
    match input {
        Value::Number(n) => Some(n.cmp_value(bound)),
        _ => None,
    }
}

fn contains(collection: &Value, element: &Value) -> bool {
    match (collection, element) {
        (Value::Array(items), _) => items.contains(element),
        (Value::Set(items), _) => items.contains(element),
        (Value::Object(fields), _) => fields.contains_key(element),
        (Value::Range(start, end), Value::Number(n)) => start <= n && n <= end,
        (Value::String(haystack), Value::String(needle)) => haystack.contains(needle.as_ref()),
        _ => false,
    }
}

fn is_empty(input: &Value) -> bool {
    match input {
        Value::Null | Value::Undefined => true,
        _ => input.size() == Some(0),
    }
}
