//! Sequence and mapping targets, and nested path lookup.

use std::collections::BTreeMap;

use super::scalar::to_text;
use super::{resolve, Convert, Indirection};
use crate::boxed::Boxed;
use crate::document::parse_document;
use crate::error::{ConvertError, Result};
use crate::options::{MapOptions, ScalarOptions, SequenceOptions};
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Run {
    Letters,
    Digits,
}

/// Split text into pieces. An empty separator splits into characters; no
/// separator splits into maximal runs of letters and maximal runs of
/// digits, dropping everything else.
pub fn split_text(text: &str, separator: Option<&str>) -> Vec<String> {
    match separator {
        Some("") => text.chars().map(String::from).collect(),
        Some(sep) => text.split(sep).map(String::from).collect(),
        None => {
            let mut pieces = Vec::new();
            let mut current = String::new();
            let mut run = None;
            for c in text.chars() {
                let next = if c.is_alphabetic() {
                    Some(Run::Letters)
                } else if c.is_numeric() {
                    Some(Run::Digits)
                } else {
                    None
                };
                if next != run && !current.is_empty() {
                    pieces.push(std::mem::take(&mut current));
                }
                if next.is_some() {
                    current.push(c);
                }
                run = next;
            }
            if !current.is_empty() {
                pieces.push(current);
            }
            pieces
        }
    }
}

/// Convert every element, failing on the first element that does not
/// convert.
pub(crate) fn convert_elements<T: Convert>(items: &[Value], options: &T::Options) -> Result<Vec<T>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| T::convert(item, options).map_err(|e| ConvertError::element(index, e)))
        .collect()
}

fn convert_pieces<T: Convert>(text: &str, options: &SequenceOptions<T::Options>) -> Result<Vec<T>> {
    if let Some(parsed) = T::from_document_list(text, &options.element) {
        return parsed;
    }
    let pieces: Vec<Value> = split_text(text, options.separator.as_deref())
        .into_iter()
        .map(Value::Text)
        .collect();
    convert_elements(&pieces, &options.element)
}

pub fn to_sequence<T: Convert>(value: &Value, options: &SequenceOptions<T::Options>) -> Result<Vec<T>> {
    let value = resolve(value, Indirection::Keep);
    match value.as_ref() {
        Value::List(items) => convert_elements(items, &options.element),
        Value::Text(text) => convert_pieces(text, options),
        Value::Map(map) if T::FLATTENS_MAPS => {
            let flat: Vec<Value> = map
                .iter()
                .flat_map(|(key, item)| [Value::Text(key.clone()), item.clone()])
                .collect();
            convert_elements(&flat, &options.element)
        }
        Value::Custom(custom) => {
            if let Some(items) = custom.as_sequence() {
                return convert_elements(&items, &options.element);
            }
            match to_text(&value, &ScalarOptions::default()) {
                Ok(text) => convert_pieces(&text, options),
                Err(_) => Err(ConvertError::unsupported(&value, "sequence")),
            }
        }
        scalar if scalar.kind().is_scalar() => {
            let text = to_text(scalar, &ScalarOptions::default())?;
            convert_pieces(&text, options)
        }
        other => Err(ConvertError::unsupported(other, "sequence")),
    }
}

pub fn to_map(value: &Value, options: &MapOptions) -> Result<BTreeMap<String, Value>> {
    let value = resolve(value, Indirection::Keep);
    match value.as_ref() {
        Value::Map(map) => Ok(map.clone()),
        Value::Pairs(pairs) => pairs
            .iter()
            .map(|(key, item)| to_text(key, &ScalarOptions::default()).map(|key| (key, item.clone())))
            .collect(),
        Value::Text(text) => match parse_document(text, options.format)? {
            Value::Map(map) => Ok(map),
            other => Err(ConvertError::document(
                options.format,
                format!("expected a mapping at the root, found {}", other.kind()),
            )),
        },
        other => Err(ConvertError::unsupported(other, "map")),
    }
}

pub fn to_boxed_map(value: &Value, options: &MapOptions) -> Result<BTreeMap<String, Boxed>> {
    Ok(to_map(value, options)?
        .into_iter()
        .map(|(key, item)| (key, Boxed::new(item)))
        .collect())
}

/// Look up a dot-separated path. Every segment but the last must name a
/// mapping. The leaf is returned as is, boxed.
pub fn map_get(value: &Value, path: &str) -> Result<Boxed> {
    let mut map = to_map(value, &MapOptions::default())?;
    let (parents, leaf) = match path.rsplit_once('.') {
        Some((parents, leaf)) => (Some(parents), leaf),
        None => (None, path),
    };

    for segment in parents.into_iter().flat_map(|p| p.split('.')) {
        let child = take(&mut map, path, segment)?;
        map = match open(child) {
            Value::Map(inner) => inner,
            pairs @ Value::Pairs(_) => to_map(&pairs, &MapOptions::default())?,
            _ => {
                return Err(ConvertError::NotAMap {
                    path: path.to_string(),
                    segment: segment.to_string(),
                })
            }
        };
    }

    take(&mut map, path, leaf).map(Boxed::new)
}

fn take(map: &mut BTreeMap<String, Value>, path: &str, segment: &str) -> Result<Value> {
    map.remove(segment).ok_or_else(|| ConvertError::MissingKey {
        path: path.to_string(),
        segment: segment.to_string(),
    })
}

fn open(value: Value) -> Value {
    match value {
        Value::Boxed(inner) => open(inner.into_inner()),
        other => other,
    }
}
