//! Text, boolean, integer and float targets.

use std::fmt::Display;
use std::str::FromStr;

use num_traits::{Float, PrimInt};

use super::{resolve, Indirection};
use crate::error::{ConvertError, Result};
use crate::options::{BoolOptions, ScalarOptions};
use crate::value::Value;

/// An integer type values can be converted into.
pub trait IntTarget: PrimInt + Default + Display + 'static {
    const NAME: &'static str;
    const SIGNED: bool;

    /// Two's-complement truncation to this width.
    fn from_i64_wrapping(v: i64) -> Self;
    fn from_u64_wrapping(v: u64) -> Self;
}

macro_rules! int_target {
    ($($ty:ty => $signed:expr),* $(,)?) => {
        $(
            #[allow(clippy::unnecessary_cast)]
            impl IntTarget for $ty {
                const NAME: &'static str = stringify!($ty);
                const SIGNED: bool = $signed;

                fn from_i64_wrapping(v: i64) -> Self {
                    v as $ty
                }

                fn from_u64_wrapping(v: u64) -> Self {
                    v as $ty
                }
            }
        )*
    };
}

int_target! {
    i8 => true,
    i16 => true,
    i32 => true,
    i64 => true,
    isize => true,
    u8 => false,
    u16 => false,
    u32 => false,
    u64 => false,
    usize => false,
}

/// A floating point type values can be converted into.
pub trait FloatTarget: Float + Default + Display + FromStr + 'static {
    const NAME: &'static str;

    fn from_f64(v: f64) -> Self;
    fn from_i64(v: i64) -> Self;
    fn from_u64(v: u64) -> Self;
}

macro_rules! float_target {
    ($($ty:ty),*) => {
        $(
            #[allow(clippy::unnecessary_cast)]
            impl FloatTarget for $ty {
                const NAME: &'static str = stringify!($ty);

                fn from_f64(v: f64) -> Self {
                    v as $ty
                }

                fn from_i64(v: i64) -> Self {
                    v as $ty
                }

                fn from_u64(v: u64) -> Self {
                    v as $ty
                }
            }
        )*
    };
}

float_target!(f32, f64);

/// A numeric payload widened to one of three lanes.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Number {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

fn number(value: &Value) -> Option<Number> {
    Some(match value {
        Value::I8(n) => Number::Signed(i64::from(*n)),
        Value::I16(n) => Number::Signed(i64::from(*n)),
        Value::I32(n) => Number::Signed(i64::from(*n)),
        Value::I64(n) => Number::Signed(*n),
        Value::U8(n) => Number::Unsigned(u64::from(*n)),
        Value::U16(n) => Number::Unsigned(u64::from(*n)),
        Value::U32(n) => Number::Unsigned(u64::from(*n)),
        Value::U64(n) => Number::Unsigned(*n),
        Value::F32(f) => Number::Float(f64::from(*f)),
        Value::F64(f) => Number::Float(*f),
        _ => return None,
    })
}

/// Base-10 rendering of a numeric value. Floats use the shortest text that
/// reads back to the same value, never an exponent.
pub(crate) fn numeric_text(value: &Value) -> Option<String> {
    Some(match value {
        Value::I8(n) => n.to_string(),
        Value::I16(n) => n.to_string(),
        Value::I32(n) => n.to_string(),
        Value::I64(n) => n.to_string(),
        Value::U8(n) => n.to_string(),
        Value::U16(n) => n.to_string(),
        Value::U32(n) => n.to_string(),
        Value::U64(n) => n.to_string(),
        Value::F32(f) => f.to_string(),
        Value::F64(f) => f.to_string(),
        _ => return None,
    })
}

pub fn to_text(value: &Value, options: &ScalarOptions<String>) -> Result<String> {
    let value = resolve(value, Indirection::Follow);

    if let Value::Custom(custom) = value.as_ref() {
        return custom
            .render_text()
            .or_else(|| custom.render_error())
            .ok_or_else(|| ConvertError::unsupported(&value, "string"));
    }

    match value.as_ref() {
        Value::Null => Ok(options.default.clone().unwrap_or_default()),
        Value::Text(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Timestamp(t) => Ok(t.to_string()),
        other => numeric_text(other).ok_or_else(|| ConvertError::unsupported(other, "string")),
    }
}

/// Literals accepted as booleans when no truthy sentinel is given.
const TRUE_LITERALS: [&str; 3] = ["1", "t", "true"];
const FALSE_LITERALS: [&str; 3] = ["0", "f", "false"];

fn parse_bool_literal(text: &str) -> Option<bool> {
    if TRUE_LITERALS.iter().any(|lit| text.eq_ignore_ascii_case(lit)) {
        Some(true)
    } else if FALSE_LITERALS.iter().any(|lit| text.eq_ignore_ascii_case(lit)) {
        Some(false)
    } else {
        None
    }
}

pub fn to_bool(value: &Value, options: &BoolOptions) -> Result<bool> {
    let value = resolve(value, Indirection::Follow);
    match value.as_ref() {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(*b),
        Value::Text(s) => match &options.truthy {
            Some(sentinel) => Ok(s == sentinel),
            None => parse_bool_literal(s).ok_or_else(|| ConvertError::parse(s, "bool", "not a boolean literal")),
        },
        other => match numeric_text(other) {
            Some(text) => Ok(match &options.truthy {
                Some(sentinel) => text == *sentinel,
                None => text != "0",
            }),
            None => Err(ConvertError::unsupported(other, "bool")),
        },
    }
}

pub fn to_int<T: IntTarget>(value: &Value, options: &ScalarOptions<T>) -> Result<T> {
    let value = resolve(value, Indirection::Follow);
    match value.as_ref() {
        Value::Null => Ok(options.default.unwrap_or_default()),
        Value::Bool(b) => Ok(if *b { T::one() } else { T::zero() }),
        Value::Text(s) => parse_int(s),
        other => match number(other) {
            Some(n) => int_from_number(n),
            None => Err(ConvertError::unsupported(other, T::NAME)),
        },
    }
}

fn int_from_number<T: IntTarget>(n: Number) -> Result<T> {
    match n {
        Number::Signed(i) if !T::SIGNED && i < 0 => Err(ConvertError::negative(i, T::NAME)),
        Number::Signed(i) => Ok(T::from_i64_wrapping(i)),
        Number::Unsigned(u) => Ok(T::from_u64_wrapping(u)),
        Number::Float(f) if !T::SIGNED && f < 0.0 => Err(ConvertError::negative(f, T::NAME)),
        Number::Float(f) if T::SIGNED => Ok(T::from_i64_wrapping(f as i64)),
        Number::Float(f) => Ok(T::from_u64_wrapping(f as u64)),
    }
}

fn parse_int<T: IntTarget>(text: &str) -> Result<T> {
    let (negative, magnitude) = parse_int_literal(text).map_err(|reason| ConvertError::parse(text, T::NAME, reason))?;

    if T::SIGNED {
        // Parse into 64 bits, then narrow like any other signed input.
        let wide = if negative {
            if magnitude > i64::MIN.unsigned_abs() {
                return Err(ConvertError::parse(text, T::NAME, "value out of range"));
            }
            (magnitude as i64).wrapping_neg()
        } else {
            i64::try_from(magnitude).map_err(|_| ConvertError::parse(text, T::NAME, "value out of range"))?
        };
        Ok(T::from_i64_wrapping(wide))
    } else {
        if negative && magnitude != 0 {
            return Err(ConvertError::negative(text, T::NAME));
        }
        num_traits::cast::<u64, T>(magnitude).ok_or_else(|| ConvertError::parse(text, T::NAME, "value out of range"))
    }
}

/// Splits an integer literal into sign and magnitude. Accepts an optional
/// sign, a `0x`/`0o`/`0b` prefix or a bare leading `0` for octal, and `_`
/// between digits.
fn parse_int_literal(text: &str) -> std::result::Result<(bool, u64), &'static str> {
    let (negative, unsigned) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let lower = unsigned.get(..2).map(str::to_ascii_lowercase);
    let (radix, digits) = match lower.as_deref() {
        Some("0x") => (16, &unsigned[2..]),
        Some("0o") => (8, &unsigned[2..]),
        Some("0b") => (2, &unsigned[2..]),
        _ if unsigned.len() > 1 && unsigned.starts_with('0') => (8, &unsigned[1..]),
        _ => (10, unsigned),
    };

    if digits.is_empty() {
        return Err("invalid syntax");
    }

    let mut magnitude: u64 = 0;
    let mut previous_underscore = true;
    for c in digits.chars() {
        if c == '_' {
            if previous_underscore {
                return Err("invalid syntax");
            }
            previous_underscore = true;
            continue;
        }
        previous_underscore = false;
        let digit = c.to_digit(radix).ok_or("invalid syntax")?;
        magnitude = magnitude
            .checked_mul(u64::from(radix))
            .and_then(|m| m.checked_add(u64::from(digit)))
            .ok_or("value out of range")?;
    }
    if previous_underscore {
        return Err("invalid syntax");
    }

    Ok((negative, magnitude))
}

pub fn to_float<T: FloatTarget>(value: &Value, options: &ScalarOptions<T>) -> Result<T> {
    let value = resolve(value, Indirection::Follow);
    match value.as_ref() {
        Value::Null => Ok(options.default.unwrap_or_default()),
        Value::Bool(b) => Ok(if *b { T::one() } else { T::zero() }),
        Value::Text(s) => s
            .parse::<T>()
            .map_err(|_| ConvertError::parse(s, T::NAME, "invalid float literal")),
        other => match number(other) {
            Some(Number::Signed(i)) => Ok(T::from_i64(i)),
            Some(Number::Unsigned(u)) => Ok(T::from_u64(u)),
            Some(Number::Float(f)) => Ok(T::from_f64(f)),
            None => Err(ConvertError::unsupported(other, T::NAME)),
        },
    }
}
