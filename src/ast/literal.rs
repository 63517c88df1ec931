// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Tagged encoding of values carried by AST nodes.
//!
//! Plain JSON cannot tell a symbol from a string, a date from its text or a
//! decimal from a float, so values inside a [`Node`](super::Node) are written
//! as single-key objects naming their kind: `{"symbol": "a"}`,
//! `{"date": "2020-01-02"}`, `{"range": [{"integer": "3"}, {"integer": "12"}]}`.
//! Numbers are kept as text so big integers and decimals keep every digit.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::number::Number;
use crate::primitive::Primitive;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    Nil,
    Undefined,
    Bool(bool),
    Integer(String),
    Float(String),
    Decimal(String),
    Symbol(String),
    String(String),
    Date(String),
    DateTime(String),
    Time(String),
    Range(Box<Literal>, Box<Literal>),
    Class(Primitive),
    Array(Vec<Literal>),
    Set(Vec<Literal>),
    Hash(Vec<(Literal, Literal)>),
}

impl From<&Value> for Literal {
    fn from(value: &Value) -> Literal {
        match value {
            Value::Null => Literal::Nil,
            Value::Undefined => Literal::Undefined,
            Value::Bool(b) => Literal::Bool(*b),
            Value::Number(n) => number(n),
            Value::Symbol(s) => Literal::Symbol(s.to_string()),
            Value::String(s) => Literal::String(s.to_string()),
            Value::Date(d) => Literal::Date(d.format("%Y-%m-%d").to_string()),
            Value::DateTime(d) => Literal::DateTime(d.to_rfc3339()),
            Value::Time(t) => Literal::Time(t.to_rfc3339()),
            Value::Range(start, end) => {
                Literal::Range(Box::new(number(start)), Box::new(number(end)))
            }
            Value::Class(p) => Literal::Class(*p),
            Value::Array(items) => Literal::Array(items.iter().map(Literal::from).collect()),
            Value::Set(items) => Literal::Set(items.iter().map(Literal::from).collect()),
            Value::Object(fields) => Literal::Hash(
                fields
                    .iter()
                    .map(|(k, v)| (Literal::from(k), Literal::from(v)))
                    .collect(),
            ),
        }
    }
}

fn number(n: &Number) -> Literal {
    match n {
        // Debug keeps the shortest text that parses back to the same bits.
        Number::Float(f) => Literal::Float(format!("{f:?}")),
        Number::Decimal(d) => Literal::Decimal(d.to_string()),
        _ => Literal::Integer(n.format_decimal()),
    }
}

impl Literal {
    pub fn into_value(self) -> Result<Value, String> {
        let invalid = |kind: &str, text: &str| format!("invalid {kind} literal `{text}`");
        Ok(match self {
            Literal::Nil => Value::Null,
            Literal::Undefined => Value::Undefined,
            Literal::Bool(b) => Value::Bool(b),
            Literal::Integer(_) | Literal::Float(_) | Literal::Decimal(_) => {
                Value::Number(self.into_number()?)
            }
            Literal::Symbol(s) => Value::Symbol(s.into()),
            Literal::String(s) => Value::String(s.into()),
            Literal::Date(s) => Value::Date(
                NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| invalid("date", &s))?,
            ),
            Literal::DateTime(s) => Value::DateTime(
                DateTime::parse_from_rfc3339(&s).map_err(|_| invalid("date_time", &s))?,
            ),
            Literal::Time(s) => Value::Time(
                DateTime::parse_from_rfc3339(&s)
                    .map_err(|_| invalid("time", &s))?
                    .with_timezone(&Utc),
            ),
            Literal::Range(start, end) => Value::Range(start.into_number()?, end.into_number()?),
            Literal::Class(p) => Value::Class(p),
            Literal::Array(items) => Value::Array(Arc::new(
                items
                    .into_iter()
                    .map(Literal::into_value)
                    .collect::<Result<_, _>>()?,
            )),
            Literal::Set(items) => Value::Set(Arc::new(
                items
                    .into_iter()
                    .map(Literal::into_value)
                    .collect::<Result<BTreeSet<_>, _>>()?,
            )),
            Literal::Hash(pairs) => Value::Object(Arc::new(
                pairs
                    .into_iter()
                    .map(|(k, v)| Ok((k.into_value()?, v.into_value()?)))
                    .collect::<Result<BTreeMap<_, _>, String>>()?,
            )),
        })
    }

    fn into_number(self) -> Result<Number, String> {
        let parsed = match &self {
            Literal::Integer(s) => Number::parse_integer(s),
            Literal::Decimal(s) => Number::parse_decimal(s),
            Literal::Float(s) => s.parse::<f64>().ok().map(Number::Float),
            _ => return Err(format!("expected a number literal, found {self:?}")),
        };
        parsed.ok_or_else(|| format!("invalid number literal {self:?}"))
    }
}

/// `#[serde(with)]` adapter for a single value.
pub mod value {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Literal;
    use crate::value::Value;

    pub fn serialize<S: Serializer>(value: &Value, serializer: S) -> Result<S::Ok, S::Error> {
        Literal::from(value).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
        Literal::deserialize(deserializer)?
            .into_value()
            .map_err(D::Error::custom)
    }
}

/// `#[serde(with)]` adapter for enum mappings.
pub mod pairs {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Literal;
    use crate::value::Value;

    pub fn serialize<S: Serializer>(
        pairs: &[(Value, Value)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(
            pairs
                .iter()
                .map(|(k, v)| (Literal::from(k), Literal::from(v))),
        )
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(Value, Value)>, D::Error> {
        Vec::<(Literal, Literal)>::deserialize(deserializer)?
            .into_iter()
            .map(|(k, v)| Ok((k.into_value()?, v.into_value()?)))
            .collect::<Result<_, String>>()
            .map_err(D::Error::custom)
    }
}

/// `#[serde(with)]` adapter for node meta.
pub mod meta {
    use std::collections::BTreeMap;

    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Literal;
    use crate::types::Meta;

    pub fn serialize<S: Serializer>(meta: &Meta, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(meta.iter().map(|(k, v)| (k, Literal::from(v))))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Meta, D::Error> {
        BTreeMap::<String, Literal>::deserialize(deserializer)?
            .into_iter()
            .map(|(k, v)| Ok((k, v.into_value()?)))
            .collect::<Result<_, String>>()
            .map_err(D::Error::custom)
    }
}
