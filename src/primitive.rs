// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Shape markers wrapped by definition types.
///
/// The serialized names are the class names used in AST payloads and error
/// messages (`type?(String, 1)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Primitive {
    #[serde(rename = "Object")]
    Any,
    #[serde(rename = "NilClass")]
    Nil,
    Symbol,
    Class,
    #[serde(rename = "TrueClass")]
    True,
    #[serde(rename = "FalseClass")]
    False,
    Integer,
    Float,
    #[serde(rename = "BigDecimal")]
    Decimal,
    String,
    Date,
    DateTime,
    Time,
    Range,
    Array,
    Hash,
    Set,
}

impl Primitive {
    pub const ALL: [Primitive; 17] = [
        Primitive::Any,
        Primitive::Nil,
        Primitive::Symbol,
        Primitive::Class,
        Primitive::True,
        Primitive::False,
        Primitive::Integer,
        Primitive::Float,
        Primitive::Decimal,
        Primitive::String,
        Primitive::Date,
        Primitive::DateTime,
        Primitive::Time,
        Primitive::Range,
        Primitive::Array,
        Primitive::Hash,
        Primitive::Set,
    ];

    /// Class name as it appears in messages and AST payloads.
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Any => "Object",
            Primitive::Nil => "NilClass",
            Primitive::Symbol => "Symbol",
            Primitive::Class => "Class",
            Primitive::True => "TrueClass",
            Primitive::False => "FalseClass",
            Primitive::Integer => "Integer",
            Primitive::Float => "Float",
            Primitive::Decimal => "BigDecimal",
            Primitive::String => "String",
            Primitive::Date => "Date",
            Primitive::DateTime => "DateTime",
            Primitive::Time => "Time",
            Primitive::Range => "Range",
            Primitive::Array => "Array",
            Primitive::Hash => "Hash",
            Primitive::Set => "Set",
        }
    }

    pub fn from_name(name: &str) -> Option<Primitive> {
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }

    /// Base name of the nominal registry entry for this primitive.
    pub fn identifier(&self) -> &'static str {
        match self {
            Primitive::Any => "any",
            Primitive::Nil => "nil",
            Primitive::Symbol => "symbol",
            Primitive::Class => "class",
            Primitive::True => "true",
            Primitive::False => "false",
            Primitive::Integer => "integer",
            Primitive::Float => "float",
            Primitive::Decimal => "decimal",
            Primitive::String => "string",
            Primitive::Date => "date",
            Primitive::DateTime => "date_time",
            Primitive::Time => "time",
            Primitive::Range => "range",
            Primitive::Array => "array",
            Primitive::Hash => "hash",
            Primitive::Set => "set",
        }
    }

    /// Whether `value` is an instance of this primitive.
    pub fn is_instance(&self, value: &Value) -> bool {
        match (self, value) {
            (Primitive::Any, _) => true,
            (Primitive::Nil, Value::Null) => true,
            (Primitive::Symbol, Value::Symbol(_)) => true,
            (Primitive::Class, Value::Class(_)) => true,
            (Primitive::True, Value::Bool(true)) => true,
            (Primitive::False, Value::Bool(false)) => true,
            (Primitive::Integer, Value::Number(n)) => n.is_integer(),
            (Primitive::Float, Value::Number(n)) => n.is_float(),
            (Primitive::Decimal, Value::Number(n)) => n.is_decimal(),
            (Primitive::String, Value::String(_)) => true,
            (Primitive::Date, Value::Date(_)) => true,
            (Primitive::DateTime, Value::DateTime(_)) => true,
            (Primitive::Time, Value::Time(_)) => true,
            (Primitive::Range, Value::Range(..)) => true,
            (Primitive::Array, Value::Array(_)) => true,
            (Primitive::Hash, Value::Object(_)) => true,
            (Primitive::Set, Value::Set(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
