//! Tagged value representation for dynamically typed input.

use chrono::{DateTime, FixedOffset, Utc};
use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::boxed::Boxed;
use crate::convert::scalar::numeric_text;
use crate::kind::Kind;
use crate::timestamp::Timestamp;

/// Capabilities of a user-defined value that sits outside the closed kind
/// set. Every method is optional; a custom value that offers none of them
/// fails every conversion.
pub trait Dynamic: fmt::Debug + Send + Sync {
    /// Name used in error messages.
    fn type_name(&self) -> &str;

    /// Preferred text rendering.
    fn render_text(&self) -> Option<String> {
        None
    }

    /// Error-message rendering, used when there is no text rendering.
    fn render_error(&self) -> Option<String> {
        None
    }

    /// View the value as an ordered sequence.
    fn as_sequence(&self) -> Option<Vec<Value>> {
        None
    }
}

/// A runtime value of one of a closed set of kinds.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Text(String),
    Bytes(Vec<u8>),
    Timestamp(Timestamp),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    /// Mapping whose keys are arbitrary values.
    Pairs(Vec<(Value, Value)>),
    Boxed(Box<Boxed>),
    /// Pointer to another value; `None` is a null pointer.
    Indirect(Option<Box<Value>>),
    Custom(Arc<dyn Dynamic>),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::I8(_) => Kind::I8,
            Value::I16(_) => Kind::I16,
            Value::I32(_) => Kind::I32,
            Value::I64(_) => Kind::I64,
            Value::U8(_) => Kind::U8,
            Value::U16(_) => Kind::U16,
            Value::U32(_) => Kind::U32,
            Value::U64(_) => Kind::U64,
            Value::F32(_) => Kind::F32,
            Value::F64(_) => Kind::F64,
            Value::Text(_) => Kind::Text,
            Value::Bytes(_) => Kind::Bytes,
            Value::Timestamp(_) => Kind::Timestamp,
            Value::List(_) => Kind::List,
            Value::Map(_) => Kind::Map,
            Value::Pairs(_) => Kind::Pairs,
            Value::Boxed(_) => Kind::Boxed,
            Value::Indirect(_) => Kind::Indirect,
            Value::Custom(_) => Kind::Custom,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn list<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn map<K: Into<String>, V: Into<Value>>(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn pairs<K: Into<Value>, V: Into<Value>>(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        Value::Pairs(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn indirect(target: impl Into<Value>) -> Self {
        Value::Indirect(Some(Box::new(target.into())))
    }

    pub fn null_pointer() -> Self {
        Value::Indirect(None)
    }

    pub fn custom(value: impl Dynamic + 'static) -> Self {
        Value::Custom(Arc::new(value))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Short rendering used in error messages.
    pub(crate) fn describe(&self) -> String {
        const LIMIT: usize = 80;

        let rendered = match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Text(s) => format!("{s:?}"),
            Value::Bytes(b) => format!("b{:?}", String::from_utf8_lossy(b)),
            Value::Timestamp(t) => t.to_string(),
            Value::Boxed(b) => format!("box({})", b.value().describe()),
            Value::Indirect(Some(target)) => format!("&{}", target.describe()),
            Value::Indirect(None) => "nil pointer".to_string(),
            Value::Custom(c) => format!("<{}>", c.type_name()),
            Value::List(_) | Value::Map(_) | Value::Pairs(_) => {
                serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
            }
            other => numeric_text(other).unwrap_or_else(|| format!("{other:?}")),
        };

        if rendered.chars().count() > LIMIT {
            let mut short: String = rendered.chars().take(LIMIT).collect();
            short.push_str("...");
            short
        } else {
            rendered
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I8(a), Value::I8(b)) => a == b,
            (Value::I16(a), Value::I16(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::U8(a), Value::U8(b)) => a == b,
            (Value::U16(a), Value::U16(b)) => a == b,
            (Value::U32(a), Value::U32(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Pairs(a), Value::Pairs(b)) => a == b,
            (Value::Boxed(a), Value::Boxed(b)) => a == b,
            (Value::Indirect(a), Value::Indirect(b)) => a == b,
            // Custom values have no structure to compare, only identity.
            (Value::Custom(a), Value::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::I8(n) => serializer.serialize_i8(*n),
            Value::I16(n) => serializer.serialize_i16(*n),
            Value::I32(n) => serializer.serialize_i32(*n),
            Value::I64(n) => serializer.serialize_i64(*n),
            Value::U8(n) => serializer.serialize_u8(*n),
            Value::U16(n) => serializer.serialize_u16(*n),
            Value::U32(n) => serializer.serialize_u32(*n),
            Value::U64(n) => serializer.serialize_u64(*n),
            Value::F32(f) => serializer.serialize_f32(*f),
            Value::F64(f) => serializer.serialize_f64(*f),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Bytes(b) => serializer.serialize_bytes(b),
            Value::Timestamp(t) => serializer.collect_str(t),
            Value::List(items) => serializer.collect_seq(items),
            Value::Map(map) => serializer.collect_map(map),
            Value::Pairs(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (key, value) in pairs {
                    let key = crate::to_text(key, &Default::default()).map_err(S::Error::custom)?;
                    map.serialize_entry(&key, value)?;
                }
                map.end()
            }
            Value::Boxed(b) => b.value().serialize(serializer),
            Value::Indirect(Some(target)) => target.serialize(serializer),
            Value::Indirect(None) => serializer.serialize_none(),
            Value::Custom(c) => match c.render_text().or_else(|| c.render_error()) {
                Some(text) => serializer.serialize_str(&text),
                None => Err(S::Error::custom(format!(
                    "custom value {} has no text rendering",
                    c.type_name()
                ))),
            },
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => Text,
    Vec<u8> => Bytes,
    Timestamp => Timestamp,
    Vec<Value> => List,
    BTreeMap<String, Value> => Map,
}

impl From<isize> for Value {
    fn from(v: isize) -> Self {
        Value::I64(v as i64)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::U64(v as u64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v.into())
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Value::Timestamp(v.into())
    }
}

impl From<Boxed> for Value {
    fn from(v: Boxed) -> Self {
        Value::Boxed(Box::new(v))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        Value::Indirect(v.map(|target| Box::new(target.into())))
    }
}
