//! `Boxed`: a value with conversion accessors that never fail.
//!
//! Every accessor runs the corresponding conversion and returns the target's
//! fallback (zero value, empty collection) when the conversion errors. Use
//! [`Boxed::try_get`] or the free functions when the error matters.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::convert::collection::map_get;
use crate::convert::time::format_timestamp;
use crate::convert::Convert;
use crate::error::Result;
use crate::options::FormatOptions;
use crate::timestamp::Timestamp;
use crate::value::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Boxed(Value);

/// Shorthand for [`Boxed::new`].
pub fn boxed(value: impl Into<Value>) -> Boxed {
    Boxed::new(value)
}

macro_rules! accessors {
    ($($name:ident => $ty:ty),* $(,)?) => {
        $(
            pub fn $name(&self) -> $ty {
                self.get()
            }
        )*
    };
}

impl Boxed {
    /// Wrap a value. A value that is already boxed is not wrapped twice.
    pub fn new(value: impl Into<Value>) -> Self {
        match value.into() {
            Value::Boxed(inner) => *inner,
            other => Boxed(other),
        }
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_inner(self) -> Value {
        self.0
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_null()
    }

    /// True when the text rendering is empty.
    pub fn is_empty(&self) -> bool {
        self.string().is_empty()
    }

    pub fn get<T: Convert>(&self) -> T {
        self.0.to()
    }

    pub fn get_with<T: Convert>(&self, options: &T::Options) -> T {
        self.0.to_with(options)
    }

    pub fn try_get<T: Convert>(&self) -> Result<T> {
        self.0.try_to()
    }

    accessors! {
        string => String,
        bool => bool,
        i8 => i8,
        i16 => i16,
        i32 => i32,
        i64 => i64,
        int => i64,
        u8 => u8,
        u16 => u16,
        u32 => u32,
        u64 => u64,
        uint => u64,
        f32 => f32,
        f64 => f64,
        timestamp => Timestamp,
        string_slice => Vec<String>,
        int_slice => Vec<i64>,
        bool_slice => Vec<bool>,
        time_slice => Vec<Timestamp>,
        slice => Vec<Value>,
        value_slice => Vec<Boxed>,
        map => BTreeMap<String, Value>,
        map_slice => Vec<BTreeMap<String, Value>>,
        value_map => BTreeMap<String, Boxed>,
    }

    /// Canonical timestamp text, or empty text if the value is not a
    /// timestamp.
    pub fn time_string(&self) -> String {
        self.time_string_with(&FormatOptions::default())
    }

    pub fn time_string_with(&self, options: &FormatOptions) -> String {
        format_timestamp(&self.0, options).unwrap_or_else(|error| {
            tracing::debug!(%error, "timestamp rendering failed");
            String::new()
        })
    }

    /// Nested lookup; a missing path gives a nil box.
    pub fn map_get(&self, path: &str) -> Boxed {
        map_get(&self.0, path).unwrap_or_else(|error| {
            tracing::debug!(%error, path, "map lookup failed");
            Boxed::default()
        })
    }
}

impl From<Value> for Boxed {
    fn from(value: Value) -> Self {
        Boxed::new(value)
    }
}

impl fmt::Display for Boxed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.string())
    }
}
