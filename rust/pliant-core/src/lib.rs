//! Pliant Core
//!
//! Least-surprise conversion of dynamically typed values (configuration
//! entries, decoded JSON/TOML, heterogeneous maps) into concrete Rust types.
//!
//! ```
//! use pliant_core::{boxed, Value};
//!
//! let port: u16 = Value::from("8080").try_to().unwrap();
//! assert_eq!(port, 8080);
//! assert_eq!(boxed("0x1f").int(), 31);
//! ```

pub mod boxed;
pub mod convert;
pub mod document;
pub mod error;
pub mod kind;
pub mod options;
pub mod timestamp;
pub mod value;

pub use boxed::{boxed, Boxed};
pub use convert::collection::{map_get, split_text, to_boxed_map, to_map, to_sequence};
pub use convert::scalar::{to_bool, to_float, to_int, to_text, FloatTarget, IntTarget};
pub use convert::time::{format_timestamp, parse_timestamp, to_timestamp, TimeLayout, CANONICAL_LAYOUT, TIME_LAYOUTS};
pub use convert::Convert;
pub use document::{parse_document, DocumentFormat};
pub use error::{ConvertError, Result};
pub use kind::Kind;
pub use options::{BoolOptions, FormatOptions, MapOptions, ScalarOptions, SequenceOptions, TimeOptions};
pub use timestamp::{Timestamp, ZoneName};
pub use value::{Dynamic, Value};
