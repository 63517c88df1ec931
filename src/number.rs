// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.
#![allow(
    clippy::float_cmp,
    clippy::as_conversions,
    clippy::option_if_let_else,
    clippy::pattern_type_mismatch
)]

use core::cmp::Ordering;
use core::fmt::{self, Debug, Display, Formatter};
use core::str::FromStr;
use std::sync::Arc;

use num_bigint::BigInt as NumBigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use serde::ser::Serializer;
use serde::Serialize;

pub type BigInt = NumBigInt;

const F64_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0; // 2^53

// Exponents beyond this are rejected when parsing decimals.
const MAX_DECIMAL_EXPONENT: i64 = 4096;

fn power_of_ten(exponent: u32) -> BigInt {
    BigInt::from(10u8).pow(exponent)
}

/// An exact base-10 number, `unscaled * 10^-scale`.
///
/// Trailing zeros of the fraction are removed on construction, so equal
/// values have equal representations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decimal {
    unscaled: BigInt,
    scale: u32,
}

impl Decimal {
    fn scaled(unscaled: BigInt, scale: i64) -> Option<Decimal> {
        if scale.abs() > MAX_DECIMAL_EXPONENT {
            return None;
        }
        let (mut unscaled, mut scale) = if scale < 0 {
            (unscaled * power_of_ten(scale.unsigned_abs() as u32), 0)
        } else {
            (unscaled, scale as u32)
        };
        let ten = BigInt::from(10u8);
        while scale > 0 && (&unscaled % &ten).is_zero() {
            unscaled /= &ten;
            scale -= 1;
        }
        Some(Decimal { unscaled, scale })
    }

    /// Parses `[+-]digits[.digits][e[+-]digits]`. Surrounding whitespace and
    /// `_` separators are accepted.
    pub fn parse(s: &str) -> Option<Decimal> {
        let canonical = s.trim().replace('_', "");
        let (mantissa, exponent) = match canonical.find(|c: char| c == 'e' || c == 'E') {
            Some(at) => (&canonical[..at], canonical[at + 1..].parse::<i64>().ok()?),
            None => (canonical.as_str(), 0),
        };
        let (negative, unsigned) = match mantissa.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, mantissa.strip_prefix('+').unwrap_or(mantissa)),
        };
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if (whole.is_empty() && fraction.is_empty())
            || !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit())
        {
            return None;
        }
        let digits = format!("{whole}{fraction}");
        let mut unscaled = BigInt::parse_bytes(digits.as_bytes(), 10)?;
        if negative {
            unscaled = -unscaled;
        }
        let scale = i64::try_from(fraction.len()).ok()?.checked_sub(exponent)?;
        Decimal::scaled(unscaled, scale)
    }

    /// The decimal spelled by the shortest representation of `value`.
    pub fn from_f64(value: f64) -> Option<Decimal> {
        if value.is_finite() {
            Decimal::parse(&format!("{value}"))
        } else {
            None
        }
    }

    pub fn is_integral(&self) -> bool {
        self.scale == 0
    }

    /// The integer part, rounded toward zero.
    pub fn trunc(&self) -> BigInt {
        &self.unscaled / power_of_ten(self.scale)
    }

    pub fn to_f64(&self) -> f64 {
        self.to_string().parse::<f64>().unwrap_or(f64::NAN)
    }

    /// Compares by value.
    pub fn compare(&self, other: &Decimal) -> Ordering {
        let scale = self.scale.max(other.scale);
        let left = &self.unscaled * power_of_ten(scale - self.scale);
        let right = &other.unscaled * power_of_ten(scale - other.scale);
        left.cmp(&right)
    }
}

impl From<BigInt> for Decimal {
    fn from(unscaled: BigInt) -> Decimal {
        Decimal { unscaled, scale: 0 }
    }
}

impl Display for Decimal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.unscaled.is_negative() { "-" } else { "" };
        let digits = self.unscaled.magnitude().to_string();
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{sign}{digits}.0");
        }
        let padded = format!("{digits:0>width$}", width = scale + 1);
        let (whole, fraction) = padded.split_at(padded.len() - scale);
        write!(f, "{sign}{whole}.{fraction}")
    }
}

/// A numeric value.
///
/// Integers are kept exact (falling back to arbitrary precision when they do not
/// fit in 64 bits). Floats are kept as `f64` and decimals as exact base-10
/// values. The `Integer`, `Float` and `Decimal` primitives are told apart by
/// representation.
#[derive(Clone)]
pub enum Number {
    UInt(u64),
    Int(i64),
    Float(f64),
    BigInt(Arc<BigInt>),
    Decimal(Arc<Decimal>),
}

impl Number {
    fn from_bigint_owned(value: BigInt) -> Self {
        if value.is_zero() {
            return Number::UInt(0);
        }

        if value.is_negative() {
            if let Some(i) = value.to_i64() {
                return Number::Int(i);
            }
        } else if let Some(u) = value.to_u64() {
            return Number::UInt(u);
        }

        Number::BigInt(Arc::new(value))
    }

    fn from_i128(value: i128) -> Self {
        if value >= 0 {
            if let Ok(u) = u64::try_from(value) {
                return Number::UInt(u);
            }
        }

        if let Ok(i) = i64::try_from(value) {
            Number::Int(i)
        } else {
            Number::BigInt(Arc::new(BigInt::from(value)))
        }
    }

    fn to_bigint_owned(&self) -> Option<BigInt> {
        match self {
            Number::UInt(v) => Some(BigInt::from(*v)),
            Number::Int(v) => Some(BigInt::from(*v)),
            Number::BigInt(v) => Some((**v).clone()),
            Number::Float(f) => Self::float_to_small_bigint(*f),
            Number::Decimal(d) if d.is_integral() => Some(d.trunc()),
            Number::Decimal(_) => None,
        }
    }

    fn float_to_small_bigint(value: f64) -> Option<BigInt> {
        if !value.is_finite() || value.fract() != 0.0 || value.abs() > F64_SAFE_INTEGER {
            return None;
        }
        if value >= 0.0 {
            Some(BigInt::from(value as u64))
        } else {
            Some(BigInt::from(value as i64))
        }
    }

    fn to_f64_lossy(&self) -> f64 {
        match self {
            Number::UInt(v) => *v as f64,
            Number::Int(v) => *v as f64,
            Number::Float(v) => *v,
            Number::BigInt(v) => match v.to_f64() {
                Some(f) => f,
                None if v.is_negative() => f64::NEG_INFINITY,
                None => f64::INFINITY,
            },
            Number::Decimal(d) => d.to_f64(),
        }
    }

    // Exact decimal form of an integer or decimal.
    fn exact_decimal(&self) -> Option<Decimal> {
        match self {
            Number::Float(_) => None,
            Number::Decimal(d) => Some((**d).clone()),
            _ => self.to_bigint_owned().map(Decimal::from),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Number::Float(_) => 2,
            Number::Decimal(_) => 1,
            _ => 0,
        }
    }

    /// Parses a base-10 integer literal. Surrounding whitespace and `_`
    /// separators are accepted, anything else is rejected.
    pub fn parse_integer(s: &str) -> Option<Number> {
        let canonical = s.trim().replace('_', "");
        let (negative, digits) = match canonical.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, canonical.strip_prefix('+').unwrap_or(&canonical)),
        };
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let mut value = BigInt::parse_bytes(digits.as_bytes(), 10)?;
        if negative {
            value = -value;
        }
        Some(Number::from_bigint_owned(value))
    }

    /// Parses a float literal, always producing a `Float`.
    pub fn parse_float(s: &str) -> Option<Number> {
        let canonical = s.trim().replace('_', "");
        if canonical.is_empty()
            || !canonical
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        {
            return None;
        }
        canonical.parse::<f64>().ok().map(Number::Float)
    }

    /// Parses a decimal literal, always producing a `Decimal`.
    pub fn parse_decimal(s: &str) -> Option<Number> {
        Decimal::parse(s).map(Number::from)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Number::UInt(_) | Number::Int(_) | Number::BigInt(_))
    }

    pub fn is_decimal(&self) -> bool {
        matches!(self, Number::Decimal(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    pub fn is_odd(&self) -> bool {
        match self {
            Number::UInt(v) => v % 2 == 1,
            Number::Int(v) => v % 2 != 0,
            Number::BigInt(v) => !(&**v % 2u8).is_zero(),
            Number::Float(_) | Number::Decimal(_) => false,
        }
    }

    pub fn is_even(&self) -> bool {
        self.is_integer() && !self.is_odd()
    }

    /// Drops the fractional part of a float. Integers are returned as is and
    /// non-finite floats yield `None`.
    pub fn truncate(&self) -> Option<Number> {
        match self {
            Number::Float(f) if f.is_finite() => {
                let t = f.trunc();
                if t.abs() <= i64::MAX as f64 {
                    Some(Number::from_i128(t as i128))
                } else {
                    None
                }
            }
            Number::Float(_) => None,
            Number::Decimal(d) => Some(Number::from_bigint_owned(d.trunc())),
            _ => Some(self.clone()),
        }
    }

    /// Converts to a float, keeping integer precision where possible.
    pub fn to_float(&self) -> Number {
        Number::Float(self.to_f64_lossy())
    }

    /// Converts to an exact decimal. Non-finite floats yield `None`.
    pub fn to_decimal(&self) -> Option<Number> {
        match self {
            Number::Float(f) => Decimal::from_f64(*f).map(Number::from),
            _ => self.exact_decimal().map(Number::from),
        }
    }

    /// Compares by value only, so `1`, `1.0` and the decimal `1.0` are equal.
    pub fn cmp_value(&self, other: &Number) -> Ordering {
        match (self, other) {
            (Number::Float(_), _) | (_, Number::Float(_)) => self
                .to_f64_lossy()
                .partial_cmp(&other.to_f64_lossy())
                .unwrap_or(Ordering::Equal),
            (Number::Decimal(_), _) | (_, Number::Decimal(_)) => {
                match (self.exact_decimal(), other.exact_decimal()) {
                    (Some(a), Some(b)) => a.compare(&b),
                    _ => Ordering::Equal,
                }
            }
            _ => match (self.to_bigint_owned(), other.to_bigint_owned()) {
                (Some(a), Some(b)) => a.cmp(&b),
                _ => Ordering::Equal,
            },
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Number::UInt(v) => Some(*v),
            Number::Int(v) if *v >= 0 => Some(*v as u64),
            Number::BigInt(v) => v.to_u64(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::UInt(v) if *v <= i64::MAX as u64 => Some(*v as i64),
            Number::Int(v) => Some(*v),
            Number::BigInt(v) => v.to_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Number::Float(f) if f.is_finite() => Some(*f),
            Number::UInt(v) if *v <= F64_SAFE_INTEGER as u64 => Some(*v as f64),
            Number::Int(v) if (*v as i128).abs() <= F64_SAFE_INTEGER as i128 => Some(*v as f64),
            Number::BigInt(v) if v.bits() <= 53 => v.to_f64(),
            _ => None,
        }
    }

    pub fn format_decimal(&self) -> String {
        match self {
            Number::UInt(v) => v.to_string(),
            Number::Int(v) => v.to_string(),
            Number::BigInt(v) => v.to_string(),
            Number::Float(f) if f.is_nan() => "NaN".to_string(),
            Number::Float(f) if f.is_finite() && f.fract() == 0.0 => format!("{f:.1}"),
            Number::Float(f) => f.to_string(),
            Number::Decimal(d) => d.to_string(),
        }
    }
}

impl Debug for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_decimal())
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_decimal())
    }
}

impl Serialize for Number {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Number::UInt(v) => serializer.serialize_u64(*v),
            Number::Int(v) => serializer.serialize_i64(*v),
            Number::Float(v) => serializer.serialize_f64(*v),
            Number::BigInt(_) | Number::Decimal(_) => {
                let n = serde_json::Number::from_str(&self.format_decimal())
                    .map_err(|_| serde::ser::Error::custom("could not serialize number"))?;
                n.serialize(serializer)
            }
        }
    }
}

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        Number::from_bigint_owned(value)
    }
}

impl From<Decimal> for Number {
    fn from(value: Decimal) -> Self {
        Number::Decimal(Arc::new(value))
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Number::UInt(value)
    }
}

impl From<usize> for Number {
    fn from(value: usize) -> Self {
        Number::UInt(value as u64)
    }
}

impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Number::UInt(u64::from(value))
    }
}

impl From<u128> for Number {
    fn from(value: u128) -> Self {
        match u64::try_from(value) {
            Ok(n) => Number::UInt(n),
            Err(_) => Number::from_bigint_owned(BigInt::from(value)),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::from_i128(i128::from(value))
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::from_i128(i128::from(value))
    }
}

impl From<i128> for Number {
    fn from(value: i128) -> Self {
        Number::from_i128(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseNumberError;

impl FromStr for Number {
    type Err = ParseNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Number::parse_integer(s)
            .or_else(|| Number::parse_float(s))
            .ok_or(ParseNumberError)
    }
}

// Numbers compare by value. When representations denote the same value,
// integers sort before decimals and decimals before floats so that `Eq` stays
// consistent with `Ord`.
impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_value(other)
            .then_with(|| self.rank().cmp(&other.rank()))
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Number {}
