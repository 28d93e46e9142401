use pliant_core::{
    format_timestamp, map_get, parse_document, BoolOptions, Convert, ConvertError, FormatOptions, MapOptions,
    ScalarOptions, SequenceOptions, TimeOptions, Timestamp, Value,
};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::cli::{Cli, Target};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error("invalid --default {value:?}: {source}")]
    Default { value: String, source: ConvertError },
    #[error("the get target needs --path")]
    MissingPath,
    #[error("failed to encode result: {0}")]
    Output(#[from] serde_json::Error),
}

/// The input literal as a value. Text that does not parse as a document in
/// the chosen format is kept as text.
pub fn read_input(cli: &Cli) -> Value {
    if cli.raw {
        return Value::from(cli.input.as_str());
    }
    parse_document(&cli.input, cli.from).unwrap_or_else(|_| Value::from(cli.input.as_str()))
}

/// Run the conversion the arguments describe and return it as JSON.
pub fn execute(cli: &Cli) -> Result<String, CliError> {
    let input = read_input(cli);
    tracing::debug!(target_type = ?cli.target, kind = %input.kind(), "converting");

    match cli.target {
        Target::Text => scalar::<String>(cli, &input),
        Target::Bool => render(&input.try_to_with::<bool>(&bool_options(cli))?),
        Target::I8 => scalar::<i8>(cli, &input),
        Target::I16 => scalar::<i16>(cli, &input),
        Target::I32 => scalar::<i32>(cli, &input),
        Target::I64 => scalar::<i64>(cli, &input),
        Target::U8 => scalar::<u8>(cli, &input),
        Target::U16 => scalar::<u16>(cli, &input),
        Target::U32 => scalar::<u32>(cli, &input),
        Target::U64 => scalar::<u64>(cli, &input),
        Target::F32 => scalar::<f32>(cli, &input),
        Target::F64 => scalar::<f64>(cli, &input),
        Target::Time => render(&input.try_to_with::<Timestamp>(&time_options(cli))?),
        Target::TimeString => {
            let options = FormatOptions {
                output: cli.output_layout.clone(),
                input: cli.layout.clone(),
            };
            render(&format_timestamp(&input, &options)?)
        }
        Target::Strings => sequence::<String>(cli, &input, ScalarOptions::default()),
        Target::Ints => sequence::<i64>(cli, &input, ScalarOptions::default()),
        Target::Bools => sequence::<bool>(cli, &input, bool_options(cli)),
        Target::Times => sequence::<Timestamp>(cli, &input, time_options(cli)),
        Target::Map => render(&input.try_to_with::<BTreeMap<String, Value>>(&MapOptions { format: cli.from })?),
        Target::Get => {
            let path = cli.path.as_deref().ok_or(CliError::MissingPath)?;
            render(&map_get(&input, path)?)
        }
    }
}

fn render<T: Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string(value)?)
}

fn scalar<T>(cli: &Cli, input: &Value) -> Result<String, CliError>
where
    T: Convert<Options = ScalarOptions<T>> + Serialize,
{
    let options = match &cli.default {
        Some(text) => ScalarOptions::with_default(Value::from(text.as_str()).try_to::<T>().map_err(|source| {
            CliError::Default {
                value: text.clone(),
                source,
            }
        })?),
        None => ScalarOptions::default(),
    };
    render(&input.try_to_with::<T>(&options)?)
}

fn sequence<T>(cli: &Cli, input: &Value, element: T::Options) -> Result<String, CliError>
where
    T: Convert + Serialize,
{
    let options = SequenceOptions {
        separator: cli.separator.clone(),
        element,
    };
    render(&input.try_to_with::<Vec<T>>(&options)?)
}

fn bool_options(cli: &Cli) -> BoolOptions {
    BoolOptions {
        truthy: cli.truthy.clone(),
    }
}

fn time_options(cli: &Cli) -> TimeOptions {
    TimeOptions {
        layout: cli.layout.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn run(args: &[&str]) -> Result<String, CliError> {
        let mut argv = vec!["pliant"];
        argv.extend_from_slice(args);
        execute(&Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn test_input_keeps_document_kinds() {
        let cli = Cli::try_parse_from(["pliant", "string", "[1,2]"]).unwrap();
        assert_eq!(read_input(&cli), Value::list([1i64, 2]));
        let cli = Cli::try_parse_from(["pliant", "--raw", "string", "[1,2]"]).unwrap();
        assert_eq!(read_input(&cli), Value::from("[1,2]"));
        let cli = Cli::try_parse_from(["pliant", "string", "hello"]).unwrap();
        assert_eq!(read_input(&cli), Value::from("hello"));
    }

    #[test]
    fn test_scalars() {
        assert_eq!(run(&["i32", "\"42\""]).unwrap(), "42");
        assert_eq!(run(&["u8", "0x10"]).unwrap(), "16");
        assert_eq!(run(&["string", "1.5"]).unwrap(), "\"1.5\"");
        assert_eq!(run(&["bool", "0"]).unwrap(), "false");
        assert_eq!(run(&["--truthy", "yes", "bool", "yes"]).unwrap(), "true");
    }

    #[test]
    fn test_default_applies_to_null() {
        assert_eq!(run(&["--default", "7", "i16", "null"]).unwrap(), "7");
        assert!(matches!(
            run(&["--default", "x", "i16", "null"]),
            Err(CliError::Default { .. })
        ));
    }

    #[test]
    fn test_negative_to_unsigned_fails() {
        let err = run(&["u8", "-1"]).unwrap_err();
        assert!(err.to_string().contains("negative value not allowed"));
    }

    #[test]
    fn test_sequences() {
        assert_eq!(run(&["strings", "a1 b2"]).unwrap(), r#"["a","1","b","2"]"#);
        assert_eq!(run(&["--separator", ";", "ints", "1;2;3"]).unwrap(), "[1,2,3]");
        assert_eq!(run(&["bools", "[true, 0, \"f\"]"]).unwrap(), "[true,false,false]");
    }

    #[test]
    fn test_time_targets() {
        assert_eq!(run(&["time", "0"]).unwrap(), "\"1970-01-01T00:00:00+00:00\"");
        assert_eq!(
            run(&["--output-layout", "%d/%m/%Y", "time-string", "2006-01-02"]).unwrap(),
            "\"02/01/2006\""
        );
    }

    #[test]
    fn test_map_and_get() {
        assert_eq!(run(&["map", r#"{"b": 1, "a": [true]}"#]).unwrap(), r#"{"a":[true],"b":1}"#);
        assert_eq!(run(&["--path", "a.b", "get", r#"{"a": {"b": "x"}}"#]).unwrap(), "\"x\"");
        assert!(matches!(run(&["get", "{}"]), Err(CliError::MissingPath)));
        assert!(matches!(
            run(&["--path", "a.c", "get", r#"{"a": {}}"#]),
            Err(CliError::Convert(ConvertError::MissingKey { .. }))
        ));
    }

    #[test]
    fn test_toml_input() {
        assert_eq!(run(&["--from", "toml", "--path", "port", "get", "port = 80"]).unwrap(), "80");
    }
}
