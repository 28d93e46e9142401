//! The conversion engine.
//!
//! Each target family has a module of free functions (`scalar`, `time`,
//! `collection`). The [`Convert`] trait ties a Rust target type to its
//! function and options so callers can write `value.try_to::<u16>()`.

pub mod collection;
pub mod scalar;
pub mod time;

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::boxed::Boxed;
use crate::document::parse_document;
use crate::error::{ConvertError, Result};
use crate::options::{BoolOptions, MapOptions, ScalarOptions, SequenceOptions, TimeOptions};
use crate::timestamp::Timestamp;
use crate::value::Value;

/// Whether [`resolve`] follows indirections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Indirection {
    Follow,
    Keep,
}

/// Shared precondition of every entry point: bytes become text, boxes are
/// opened and (optionally) pointers are followed, repeated until none
/// applies. A null pointer resolves to [`Value::Null`].
pub(crate) fn resolve(value: &Value, indirection: Indirection) -> Cow<'_, Value> {
    let follow = indirection == Indirection::Follow;
    let mut current = Cow::Borrowed(value);
    loop {
        current = match current {
            Cow::Borrowed(v) => match v {
                Value::Bytes(bytes) => Cow::Owned(Value::Text(String::from_utf8_lossy(bytes).into_owned())),
                Value::Boxed(inner) => Cow::Borrowed(inner.value()),
                Value::Indirect(Some(target)) if follow => Cow::Borrowed(target.as_ref()),
                Value::Indirect(None) if follow => return Cow::Owned(Value::Null),
                _ => return Cow::Borrowed(v),
            },
            Cow::Owned(v) => match v {
                Value::Bytes(bytes) => Cow::Owned(Value::Text(bytes_to_text(bytes))),
                Value::Boxed(inner) => Cow::Owned(inner.into_inner()),
                Value::Indirect(Some(target)) if follow => Cow::Owned(*target),
                Value::Indirect(None) if follow => return Cow::Owned(Value::Null),
                other => return Cow::Owned(other),
            },
        };
    }
}

fn bytes_to_text(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

/// A Rust type that dynamic values convert into.
pub trait Convert: Sized {
    type Options: Default;

    fn convert(value: &Value, options: &Self::Options) -> Result<Self>;

    /// What the convenience forms return when the conversion fails.
    fn fallback(options: &Self::Options) -> Self;

    /// Hook for `Vec<Self>` targets given a text input. Types that read text
    /// as a whole document return `Some`; everything else splits the text.
    fn from_document_list(_text: &str, _options: &Self::Options) -> Option<Result<Vec<Self>>> {
        None
    }

    /// Whether a mapping converts to `Vec<Self>` as its entries laid out
    /// flat: key, value, key, value.
    const FLATTENS_MAPS: bool = false;
}

impl Value {
    pub fn try_to<T: Convert>(&self) -> Result<T> {
        T::convert(self, &T::Options::default())
    }

    pub fn try_to_with<T: Convert>(&self, options: &T::Options) -> Result<T> {
        T::convert(self, options)
    }

    /// Convert, substituting the fallback value on failure.
    pub fn to<T: Convert>(&self) -> T {
        self.to_with(&T::Options::default())
    }

    pub fn to_with<T: Convert>(&self, options: &T::Options) -> T {
        T::convert(self, options).unwrap_or_else(|error| {
            tracing::debug!(kind = %self.kind(), %error, "conversion failed, using fallback");
            T::fallback(options)
        })
    }
}

impl Convert for String {
    type Options = ScalarOptions<String>;

    fn convert(value: &Value, options: &Self::Options) -> Result<Self> {
        scalar::to_text(value, options)
    }

    fn fallback(options: &Self::Options) -> Self {
        options.default.clone().unwrap_or_default()
    }
}

impl Convert for bool {
    type Options = BoolOptions;

    fn convert(value: &Value, options: &Self::Options) -> Result<Self> {
        scalar::to_bool(value, options)
    }

    fn fallback(_options: &Self::Options) -> Self {
        false
    }
}

macro_rules! convert_numeric {
    ($func:ident: $($ty:ty),*) => {
        $(
            impl Convert for $ty {
                type Options = ScalarOptions<$ty>;

                fn convert(value: &Value, options: &Self::Options) -> Result<Self> {
                    scalar::$func(value, options)
                }

                fn fallback(options: &Self::Options) -> Self {
                    options.default.unwrap_or_default()
                }
            }
        )*
    };
}

convert_numeric!(to_int: i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
convert_numeric!(to_float: f32, f64);

impl Convert for Timestamp {
    type Options = TimeOptions;

    fn convert(value: &Value, options: &Self::Options) -> Result<Self> {
        time::to_timestamp(value, options)
    }

    fn fallback(_options: &Self::Options) -> Self {
        Timestamp::unix_epoch()
    }
}

impl Convert for Value {
    type Options = ();

    const FLATTENS_MAPS: bool = true;

    fn convert(value: &Value, _options: &()) -> Result<Self> {
        Ok(resolve(value, Indirection::Keep).into_owned())
    }

    fn fallback(_options: &()) -> Self {
        Value::Null
    }
}

impl Convert for Boxed {
    type Options = ();

    const FLATTENS_MAPS: bool = true;

    fn convert(value: &Value, _options: &()) -> Result<Self> {
        Ok(Boxed::new(resolve(value, Indirection::Keep).into_owned()))
    }

    fn fallback(_options: &()) -> Self {
        Boxed::default()
    }
}

impl Convert for BTreeMap<String, Value> {
    type Options = MapOptions;

    fn convert(value: &Value, options: &Self::Options) -> Result<Self> {
        collection::to_map(value, options)
    }

    fn fallback(_options: &Self::Options) -> Self {
        BTreeMap::new()
    }

    fn from_document_list(text: &str, options: &Self::Options) -> Option<Result<Vec<Self>>> {
        Some(document_list(text, options))
    }
}

impl Convert for BTreeMap<String, Boxed> {
    type Options = MapOptions;

    fn convert(value: &Value, options: &Self::Options) -> Result<Self> {
        collection::to_boxed_map(value, options)
    }

    fn fallback(_options: &Self::Options) -> Self {
        BTreeMap::new()
    }

    fn from_document_list(text: &str, options: &Self::Options) -> Option<Result<Vec<Self>>> {
        Some(document_list(text, options))
    }
}

fn document_list<T>(text: &str, options: &MapOptions) -> Result<Vec<T>>
where
    T: Convert<Options = MapOptions>,
{
    match parse_document(text, options.format)? {
        Value::List(items) => collection::convert_elements(&items, options),
        other => Err(ConvertError::document(
            options.format,
            format!("expected an array at the root, found {}", other.kind()),
        )),
    }
}

impl<T: Convert> Convert for Vec<T> {
    type Options = SequenceOptions<T::Options>;

    fn convert(value: &Value, options: &Self::Options) -> Result<Self> {
        collection::to_sequence(value, options)
    }

    fn fallback(_options: &Self::Options) -> Self {
        Vec::new()
    }
}
