//! Per-family conversion options. Every field is optional and the
//! `Default` of each struct selects the plain conversion rules.

use serde::Deserialize;

use crate::document::DocumentFormat;

/// Options for text and numeric targets.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScalarOptions<T> {
    /// Returned instead of the zero value when the input is null, and by the
    /// convenience forms when the conversion fails.
    pub default: Option<T>,
}

impl<T> Default for ScalarOptions<T> {
    fn default() -> Self {
        Self { default: None }
    }
}

impl<T> ScalarOptions<T> {
    pub fn with_default(default: T) -> Self {
        Self {
            default: Some(default),
        }
    }
}

/// Options for boolean targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BoolOptions {
    /// Exact text that means `true`; anything else is `false`. Replaces the
    /// boolean literal grammar and the non-zero rule.
    pub truthy: Option<String>,
}

impl BoolOptions {
    pub fn truthy(sentinel: impl Into<String>) -> Self {
        Self {
            truthy: Some(sentinel.into()),
        }
    }
}

/// Options for timestamp targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TimeOptions {
    /// chrono `strftime` pattern that text must match. Disables the
    /// fallback layout chain.
    pub layout: Option<String>,
}

impl TimeOptions {
    pub fn layout(layout: impl Into<String>) -> Self {
        Self {
            layout: Some(layout.into()),
        }
    }
}

/// Options for rendering a value as timestamp text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FormatOptions {
    /// Output pattern; the canonical layout when absent.
    pub output: Option<String>,
    /// Layout used to parse text input.
    pub input: Option<String>,
}

/// Options for sequence targets: how to split text, and the options for
/// each element.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SequenceOptions<O> {
    /// Split text on this separator. Without one, text splits into maximal
    /// runs of letters and digits.
    pub separator: Option<String>,
    #[serde(default)]
    pub element: O,
}

impl<O: Default> SequenceOptions<O> {
    pub fn separated(separator: impl Into<String>) -> Self {
        Self {
            separator: Some(separator.into()),
            element: O::default(),
        }
    }
}

impl<O> SequenceOptions<O> {
    pub fn with_element(mut self, element: O) -> Self {
        self.element = element;
        self
    }
}

/// Options for mapping targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct MapOptions {
    /// Format of text input.
    #[serde(default)]
    pub format: DocumentFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_empty() {
        assert_eq!(ScalarOptions::<i32>::default().default, None);
        assert_eq!(BoolOptions::default().truthy, None);
        assert_eq!(MapOptions::default().format, DocumentFormat::Json);
    }

    #[test]
    fn test_sequence_options_from_toml() {
        let opts: SequenceOptions<BoolOptions> =
            toml::from_str("separator = \";\"\n[element]\ntruthy = \"yes\"\n").unwrap();
        assert_eq!(opts.separator.as_deref(), Some(";"));
        assert_eq!(opts.element, BoolOptions::truthy("yes"));
    }

    #[test]
    fn test_options_from_json() {
        let opts: SequenceOptions<ScalarOptions<i64>> = serde_json::from_str(r#"{"element": {"default": 7}}"#).unwrap();
        assert_eq!(opts.separator, None);
        assert_eq!(opts.element.default, Some(7));

        let opts: MapOptions = serde_json::from_str(r#"{"format": "toml"}"#).unwrap();
        assert_eq!(opts.format, DocumentFormat::Toml);
    }
}
