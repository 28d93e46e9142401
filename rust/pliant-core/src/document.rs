//! Structured text documents (JSON, TOML) read into [`Value`]s.

use serde::Deserialize;
use strum::{Display, EnumString};

use crate::convert::time::parse_timestamp;
use crate::error::{ConvertError, Result};
use crate::value::Value;

/// Interchange format used when text has to be read as a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    #[default]
    Json,
    Toml,
}

/// Parse `text` as a whole document. JSON documents may have any root;
/// TOML documents are always tables.
pub fn parse_document(text: &str, format: DocumentFormat) -> Result<Value> {
    let parsed = match format {
        DocumentFormat::Json => serde_json::from_str::<serde_json::Value>(text)
            .map(Value::from)
            .map_err(|e| ConvertError::document(format, e)),
        DocumentFormat::Toml => text
            .parse::<toml::Table>()
            .map(|table| Value::from(toml::Value::Table(table)))
            .map_err(|e| ConvertError::document(format, e.message())),
    };
    if let Err(error) = &parsed {
        tracing::debug!(%format, %error, "document did not parse");
    }
    parsed
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::I64(i)
                } else if let Some(u) = n.as_u64() {
                    Value::U64(u)
                } else {
                    Value::F64(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<toml::Value> for Value {
    fn from(v: toml::Value) -> Self {
        match v {
            toml::Value::String(s) => Value::Text(s),
            toml::Value::Integer(i) => Value::I64(i),
            toml::Value::Float(f) => Value::F64(f),
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(dt) => {
                let text = dt.to_string();
                match parse_timestamp(&text, None) {
                    Ok(ts) => Value::Timestamp(ts),
                    Err(_) => Value::Text(text),
                }
            }
            toml::Value::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            toml::Value::Table(table) => {
                Value::Map(table.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}
