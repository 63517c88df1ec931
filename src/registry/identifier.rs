// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Identifier grammar: `prefix(.prefix)*.basename(<member>)?`.

use super::RegistryError;

/// A namespace prefix. Each one names a combinator or a family of
/// pre-registered constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefix {
    Strict,
    Coercible,
    Optional,
    Maybe,
    Params,
    Json,
}

impl Prefix {
    pub fn parse(s: &str) -> Option<Prefix> {
        Some(match s {
            "strict" => Prefix::Strict,
            "coercible" => Prefix::Coercible,
            "optional" => Prefix::Optional,
            "maybe" => Prefix::Maybe,
            "params" => Prefix::Params,
            "json" => Prefix::Json,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Prefix::Strict => "strict",
            Prefix::Coercible => "coercible",
            Prefix::Optional => "optional",
            Prefix::Maybe => "maybe",
            Prefix::Params => "params",
            Prefix::Json => "json",
        }
    }

    // `optional` and `maybe` wrap whatever follows, generic forms included.
    fn wraps_generic(&self) -> bool {
        matches!(self, Prefix::Optional | Prefix::Maybe)
    }
}

/// One parsing step of an identifier. Nested parts stay unparsed until they
/// are resolved, so registered names always win over synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier<'a> {
    /// `outer<member>`, e.g. `strict.array<coercible.string>`.
    Generic { outer: &'a str, member: &'a str },
    /// `prefix.rest`.
    Prefixed { prefix: Prefix, rest: &'a str },
    Base(&'a str),
}

impl<'a> Identifier<'a> {
    pub fn parse(identifier: &'a str) -> Result<Identifier<'a>, RegistryError> {
        let invalid = |reason: &str| RegistryError::InvalidIdentifier {
            identifier: identifier.into(),
            reason: reason.to_string(),
        };

        if identifier.trim().is_empty() {
            return Err(invalid("empty identifier"));
        }

        let prefixed = identifier
            .split_once('.')
            .and_then(|(head, rest)| Prefix::parse(head).map(|p| (p, rest)));

        if let Some((prefix, rest)) = prefixed {
            if prefix.wraps_generic() || !rest.contains('<') {
                if rest.is_empty() {
                    return Err(invalid("missing base name"));
                }
                return Ok(Identifier::Prefixed { prefix, rest });
            }
        }

        if let Some(open) = identifier.find('<') {
            let Some(close) = identifier.rfind('>') else {
                return Err(invalid("unterminated '<'"));
            };
            if close != identifier.len() - 1 || close < open {
                return Err(invalid("'>' must end the identifier"));
            }
            let outer = &identifier[..open];
            let member = &identifier[open + 1..close];
            if outer.is_empty() || member.trim().is_empty() {
                return Err(invalid("empty generic part"));
            }
            return Ok(Identifier::Generic { outer, member });
        }

        if identifier.contains('>') {
            return Err(invalid("unmatched '>'"));
        }
        Ok(Identifier::Base(identifier))
    }
}
