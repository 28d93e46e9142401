//! Conversion errors.

use thiserror::Error;

use crate::document::DocumentFormat;
use crate::kind::Kind;
use crate::value::Value;

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;

/// Why a conversion failed. Every conversion reports failure through this
/// type; nothing in the engine panics on unexpected input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    #[error("unable to convert {value} of kind {kind} to {target}")]
    Unsupported {
        value: String,
        kind: Kind,
        target: &'static str,
    },
    #[error("unable to convert {value} to {target}: negative value not allowed")]
    Negative { value: String, target: &'static str },
    #[error("unable to parse {input:?} as {target}: {reason}")]
    Parse {
        input: String,
        target: &'static str,
        reason: String,
    },
    #[error("unable to parse date: {input}")]
    Date { input: String },
    #[error("unable to parse {input:?} with layout {layout:?}: {reason}")]
    Layout {
        input: String,
        layout: String,
        reason: String,
    },
    #[error("invalid output layout {layout:?}")]
    OutputLayout { layout: String },
    #[error("{value} is out of range for {target}")]
    OutOfRange { value: String, target: &'static str },
    #[error("invalid {format} document: {reason}")]
    Document {
        format: DocumentFormat,
        reason: String,
    },
    #[error("path '{path}' part '{segment}' does not exist in map")]
    MissingKey { path: String, segment: String },
    #[error("part '{segment}' in path '{path}' is not a map")]
    NotAMap { path: String, segment: String },
    #[error("element {index}: {source}")]
    Element {
        index: usize,
        source: Box<ConvertError>,
    },
}

impl ConvertError {
    pub fn unsupported(value: &Value, target: &'static str) -> Self {
        ConvertError::Unsupported {
            value: value.describe(),
            kind: value.kind(),
            target,
        }
    }

    pub fn negative(value: impl ToString, target: &'static str) -> Self {
        ConvertError::Negative {
            value: value.to_string(),
            target,
        }
    }

    pub fn parse(input: &str, target: &'static str, reason: impl ToString) -> Self {
        ConvertError::Parse {
            input: input.to_string(),
            target,
            reason: reason.to_string(),
        }
    }

    pub fn document(format: DocumentFormat, reason: impl ToString) -> Self {
        ConvertError::Document {
            format,
            reason: reason.to_string(),
        }
    }

    pub fn element(index: usize, source: ConvertError) -> Self {
        ConvertError::Element {
            index,
            source: Box::new(source),
        }
    }

    pub fn is_negative(&self) -> bool {
        matches!(self.root(), ConvertError::Negative { .. })
    }

    /// The innermost error, looking through element wrappers.
    pub fn root(&self) -> &ConvertError {
        match self {
            ConvertError::Element { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_names_value_and_kind() {
        let err = ConvertError::unsupported(&Value::list([1i64, 2]), "i64");
        assert_eq!(err.to_string(), "unable to convert [1,2] of kind list to i64");
    }

    #[test]
    fn test_negative_message() {
        let err = ConvertError::negative(-1, "u8");
        assert!(err.is_negative());
        assert!(err.to_string().contains("negative value not allowed"));
    }

    #[test]
    fn test_element_root() {
        let err = ConvertError::element(2, ConvertError::negative(-3, "u16"));
        assert!(err.is_negative());
        assert_eq!(
            err.to_string(),
            "element 2: unable to convert -3 to u16: negative value not allowed"
        );
    }
}
